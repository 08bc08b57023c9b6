/*!
Command handlers for the CLI

Each subcommand of `outreach-chat` maps to one handler here. Handlers are
thin: they build a [`ChatClient`] over the HTTP backend and a terminal view,
then call a single orchestration operation.

- `auth`: login, registration and logout
- `chat`: interactive session
- `special_commands`: slash commands understood by the interactive session

One-shot commands run with [`FailurePolicy::Propagate`] so that a failed
request makes the process exit non-zero; the interactive session uses the
configured policy.
*/

use std::io::Stdout;

use crate::api::{ChatId, HttpApi, Plan, PublicApi};
use crate::client::{ChatClient, Draft, Outcome};
use crate::config::{Config, FailurePolicy};
use crate::error::{OutreachError, Result};
use crate::session::{bootstrap, credential_store};
use crate::view::{ChatView, TerminalView};

pub mod auth;
pub mod chat;
pub mod special_commands;

/// Client wired to the real backend and stdout
pub type TerminalClient = ChatClient<HttpApi, TerminalView<Stdout>>;

/// Bootstrap the session and build a client
///
/// # Errors
///
/// Returns [`OutreachError::MissingCredentials`] after redirecting to login
/// when no token is stored.
pub fn connect(config: &Config, policy: FailurePolicy) -> Result<TerminalClient> {
    let mut view = TerminalView::stdout(&config.display);
    let store = credential_store(config);
    let Some(session) = bootstrap(store.as_ref(), &mut view)? else {
        return Err(OutreachError::MissingCredentials("no access token stored".to_string()).into());
    };
    let api = HttpApi::new(&config.server, session)?;
    Ok(ChatClient::new(api, view, policy))
}

/// `outreach-chat chats`
pub async fn list_chats(config: &Config) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.load_chats().await?;
    Ok(())
}

/// `outreach-chat show <id>`
pub async fn show_chat(config: &Config, chat_id: &str) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.load_chat(&ChatId::new(chat_id)).await?;
    Ok(())
}

/// `outreach-chat send`
///
/// Without `chat_id` a new conversation is created for the message.
///
/// # Errors
///
/// Returns [`OutreachError::EmptyMessage`] for blank text before any
/// credential lookup or request.
pub async fn send(config: &Config, draft: Draft, chat_id: Option<String>) -> Result<()> {
    if draft.content.trim().is_empty() {
        return Err(OutreachError::EmptyMessage.into());
    }
    let mut client = connect(config, FailurePolicy::Propagate)?;
    if let Some(chat_id) = chat_id {
        client.load_chat(&ChatId::new(chat_id)).await?;
    }
    client.send_message(&draft).await?;
    if let Some(chat_id) = client.active_chat() {
        tracing::info!("Message sent to chat {}", chat_id);
    }
    Ok(())
}

/// `outreach-chat delete <id>`
pub async fn delete_chat(config: &Config, chat_id: &str) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.delete_chat(&ChatId::new(chat_id)).await?;
    Ok(())
}

/// `outreach-chat quota`
pub async fn show_quota(config: &Config) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.refresh_quota(None).await?;
    Ok(())
}

/// `outreach-chat plans`; works without logging in
pub async fn show_plans(config: &Config) -> Result<()> {
    let plans = PublicApi::new(&config.server)?.list_plans().await?;
    TerminalView::stdout(&config.display).render_plans(&plans);
    Ok(())
}

/// `outreach-chat analyze <url>`
pub async fn analyze(config: &Config, profile_url: &str) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    if client.analyze_profile(profile_url).await? == Outcome::Skipped {
        return Err(OutreachError::InvalidProfileUrl(profile_url.to_string()).into());
    }
    Ok(())
}

/// `outreach-chat insights`
pub async fn insights(config: &Config) -> Result<()> {
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.profile_insights().await?;
    Ok(())
}

/// `outreach-chat upgrade <plan>`
///
/// Like the interactive `/upgrade`, success is only logged.
pub async fn upgrade(config: &Config, plan: &str) -> Result<()> {
    let plan: Plan = plan.parse()?;
    let mut client = connect(config, FailurePolicy::Propagate)?;
    client.select_plan(plan).await?;
    Ok(())
}
