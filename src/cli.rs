//! Command-line interface definition for outreach-chat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, the interactive session and
//! one-shot conversation and billing operations.

use clap::{Parser, Subcommand};

/// outreach-chat - Terminal client for the outreach mail backend
///
/// Chat with the backend to draft personalised outreach emails, browse
/// past conversations and manage your plan.
#[derive(Parser, Debug, Clone)]
#[command(name = "outreach-chat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Override the backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for outreach-chat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the access token
    Login {
        /// Account email; prompted for when omitted
        #[arg(short, long)]
        email: Option<String>,

        /// Account password; prompted for when omitted
        #[arg(long, env = "OUTREACH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and store the access token
    Register {
        /// Account email; prompted for when omitted
        #[arg(short, long)]
        email: Option<String>,

        /// Account password; prompted for when omitted
        #[arg(long, env = "OUTREACH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Start an interactive chat session
    Chat {
        /// Open this conversation on startup
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// List conversations
    Chats,

    /// Show the messages of a conversation
    Show {
        /// Conversation id
        chat_id: String,
    },

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Recipient name
        #[arg(long)]
        to: Option<String>,

        /// Recipient's company
        #[arg(long)]
        company: Option<String>,

        /// Recipient's job title
        #[arg(long)]
        job: Option<String>,

        /// Conversation to send to; a new one is created when omitted
        #[arg(long)]
        chat: Option<String>,
    },

    /// Delete a conversation
    Delete {
        /// Conversation id
        chat_id: String,
    },

    /// Show remaining daily quota and current plan
    Quota,

    /// Show available plans
    Plans,

    /// Analyze a LinkedIn profile (counts against quota)
    Analyze {
        /// Public LinkedIn profile URL
        profile_url: String,
    },

    /// Show insights for the analyzed profile (counts against quota)
    Insights,

    /// Request a plan change
    Upgrade {
        /// Target plan (free, pro, ultra, business)
        plan: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            no_color: false,
            base_url: None,
            command: Commands::Chat { resume: None },
        }
    }
}
