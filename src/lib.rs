//! outreach-chat - Terminal client library for the outreach mail backend
//!
//! This library provides the pieces behind the `outreach-chat` binary:
//! session bootstrap, a typed client for the backend's chat, history and
//! billing endpoints, and the orchestration that turns user actions into
//! requests and view updates.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Wire types, the [`api::ChatApi`] trait and its HTTP implementation
//! - `session`: Access token storage and session bootstrap
//! - `client`: [`ChatClient`], the per-session orchestrator
//! - `view`: The [`view::ChatView`] rendering seam and the terminal renderer
//! - `commands`: Handlers for each CLI subcommand and the interactive session
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use outreach_chat::api::fake::FakeApi;
//! use outreach_chat::view::RecordingView;
//! use outreach_chat::{ChatClient, Draft, FailurePolicy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = ChatClient::new(FakeApi::new(), RecordingView::new(), FailurePolicy::Swallow);
//!     client.start().await?;
//!     client
//!         .send_message(&Draft::new("Introduce our product").recipient("Ada"))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use client::{ChatClient, Draft, Outcome};
pub use config::{Config, FailurePolicy};
pub use error::{OutreachError, Result};
