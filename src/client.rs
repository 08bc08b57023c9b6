//! Chat session orchestration
//!
//! [`ChatClient`] sequences backend requests and view updates for every
//! user action: listing chats, opening one, sending a message, refreshing
//! quota and changing plan. It owns the only mutable session state, the
//! active conversation id.
//!
//! Every request is best-effort. What happens on failure is decided by the
//! configured [`FailurePolicy`]: with `Swallow` the error is logged and the
//! operation reports [`Outcome::Skipped`], leaving view and state exactly as
//! they were; with `Propagate` the error is returned. Nothing is retried.
//! Refreshes that follow a change the backend already committed are only
//! logged when they fail.
//!
//! All operations take `&mut self`, so responses are applied in the order
//! the requests were issued and two handlers never interleave.

use crate::api::{ChatApi, ChatId, Message, Plan, ProfileRequest, SendMessageRequest};
use crate::config::FailurePolicy;
use crate::error::Result;
use crate::view::ChatView;

/// Notice shown when the user picks the plan they are already on
pub const ALREADY_FREE_NOTICE: &str = "Already on FREE plan";

/// Whether an operation changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Request succeeded and the view/state were updated
    Applied,
    /// Nothing was changed (empty input, free plan, or a swallowed failure)
    Skipped,
}

impl Outcome {
    /// `true` for [`Outcome::Applied`]
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Message being composed: text plus outreach context
///
/// The metadata fields are sent as-is (after trimming) and never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Message text; required
    pub content: String,
    /// Who the outreach is for
    pub recipient_name: String,
    /// Recipient's company
    pub company: String,
    /// Recipient's job title
    pub job_title: String,
}

impl Draft {
    /// Draft with only message text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the recipient name
    pub fn recipient(mut self, name: impl Into<String>) -> Self {
        self.recipient_name = name.into();
        self
    }

    /// Set the company
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Set the job title
    pub fn job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = title.into();
        self
    }

    fn to_request(&self, chat_id: ChatId) -> SendMessageRequest {
        SendMessageRequest {
            chat_id,
            content: self.content.trim().to_string(),
            recipient_name: self.recipient_name.trim().to_string(),
            company: self.company.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
        }
    }
}

/// Mutable per-session state
///
/// `active_chat`, when set, always names a conversation the backend has
/// acknowledged: one it created for us or one it returned on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    active_chat: Option<ChatId>,
}

impl ChatSession {
    /// Active conversation, if any
    pub fn active_chat(&self) -> Option<&ChatId> {
        self.active_chat.as_ref()
    }
}

/// Request/response orchestrator for one logged-in user
pub struct ChatClient<A: ChatApi, V: ChatView> {
    api: A,
    view: V,
    session: ChatSession,
    policy: FailurePolicy,
}

impl<A: ChatApi, V: ChatView> ChatClient<A, V> {
    /// Client with no active conversation
    pub fn new(api: A, view: V, policy: FailurePolicy) -> Self {
        Self {
            api,
            view,
            session: ChatSession::default(),
            policy,
        }
    }

    /// Active conversation, if any
    pub fn active_chat(&self) -> Option<&ChatId> {
        self.session.active_chat()
    }

    /// Session state
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Backend handle
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Rendering surface
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable rendering surface
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Failure policy in effect
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Consume the client, returning the view
    pub fn into_view(self) -> V {
        self.view
    }

    /// Startup sequence: chat list, then quota
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("Loading chat list and quota");
        self.load_chats().await?;
        self.refresh_quota(None).await?;
        Ok(())
    }

    /// Fetch the conversation list and replace the rendered one
    pub async fn load_chats(&mut self) -> Result<Outcome> {
        let result = self.api.list_chats().await;
        let Some(chats) = self.settle("load chats", result)? else {
            return Ok(Outcome::Skipped);
        };
        tracing::debug!("Rendering {} chats", chats.len());
        self.view.render_chat_list(&chats);
        Ok(Outcome::Applied)
    }

    /// Open `chat_id`: make it active and render its messages
    pub async fn load_chat(&mut self, chat_id: &ChatId) -> Result<Outcome> {
        let result = self.api.get_chat(chat_id).await;
        let Some(detail) = self.settle("load chat", result)? else {
            return Ok(Outcome::Skipped);
        };
        tracing::debug!("Opened chat {} ({} messages)", chat_id, detail.messages.len());
        self.session.active_chat = Some(chat_id.clone());
        self.view.render_messages(&detail.messages);
        Ok(Outcome::Applied)
    }

    /// Create a fresh conversation and make it active
    ///
    /// The message area is emptied and the chat list refreshed.
    pub async fn new_chat(&mut self) -> Result<Outcome> {
        let result = self.api.create_chat().await;
        let Some(chat_id) = self.settle("create chat", result)? else {
            return Ok(Outcome::Skipped);
        };
        tracing::info!("Created chat {}", chat_id);
        self.session.active_chat = Some(chat_id);
        self.view.clear_messages();
        self.reload_chats_after("create chat").await;
        Ok(Outcome::Applied)
    }

    /// Send `draft` to the active conversation
    ///
    /// Creates a conversation first when none is active. Whitespace-only
    /// content is a no-op. On success the user message and the reply are
    /// appended (in that order), quota is refreshed, the input is cleared
    /// and the chat list reloaded. Once the backend has accepted the message
    /// the outcome is `Applied`, whatever happens to the refreshes.
    pub async fn send_message(&mut self, draft: &Draft) -> Result<Outcome> {
        if draft.content.trim().is_empty() {
            tracing::debug!("Ignoring empty message");
            return Ok(Outcome::Skipped);
        }

        if self.session.active_chat.is_none() && !self.new_chat().await?.is_applied() {
            tracing::debug!("No conversation to send to, dropping message");
            return Ok(Outcome::Skipped);
        }
        let Some(chat_id) = self.session.active_chat.clone() else {
            return Ok(Outcome::Skipped);
        };

        let request = draft.to_request(chat_id);
        let result = self.api.send_message(&request).await;
        let Some(response) = self.settle("send message", result)? else {
            return Ok(Outcome::Skipped);
        };

        self.view.append_message(&Message::user(request.content));
        self.view
            .append_message(&Message::assistant(response.message));
        if let Some(mail) = &response.generated_mail {
            self.view.render_generated_mail(mail);
        }

        tracing::debug!(
            "Refreshing quota (backend reported {} remaining)",
            response.quota_remaining
        );
        self.refresh_quota_after("send message").await;
        self.view.clear_input();
        self.reload_chats_after("send message").await;
        Ok(Outcome::Applied)
    }

    /// Fetch quota and render it
    ///
    /// `hint` is the remaining count a previous response reported; the
    /// authoritative value is always re-fetched.
    pub async fn refresh_quota(&mut self, hint: Option<i64>) -> Result<Outcome> {
        if let Some(hint) = hint {
            tracing::debug!("Refreshing quota (backend reported {} remaining)", hint);
        }
        let result = self.api.get_quota().await;
        let Some(quota) = self.settle("refresh quota", result)? else {
            return Ok(Outcome::Skipped);
        };
        self.view.render_quota(&quota);
        Ok(Outcome::Applied)
    }

    /// Request an upgrade to `plan`
    ///
    /// Choosing the free tier shows [`ALREADY_FREE_NOTICE`] and sends nothing.
    /// Otherwise the request is sent and its result only logged; the view is
    /// not updated either way.
    pub async fn select_plan(&mut self, plan: Plan) -> Result<Outcome> {
        if plan.is_free() {
            self.view.show_notice(ALREADY_FREE_NOTICE);
            return Ok(Outcome::Skipped);
        }
        let result = self.api.upgrade_plan(plan).await;
        match self.settle("upgrade plan", result)? {
            Some(()) => {
                tracing::info!("Requested upgrade to {}", plan);
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Skipped),
        }
    }

    /// Delete `chat_id`; deleting the active chat clears the message area
    pub async fn delete_chat(&mut self, chat_id: &ChatId) -> Result<Outcome> {
        let result = self.api.delete_chat(chat_id).await;
        if self.settle("delete chat", result)?.is_none() {
            return Ok(Outcome::Skipped);
        }
        tracing::info!("Deleted chat {}", chat_id);
        if self.session.active_chat.as_ref() == Some(chat_id) {
            self.session.active_chat = None;
            self.view.clear_messages();
        }
        self.reload_chats_after("delete chat").await;
        Ok(Outcome::Applied)
    }

    /// Fetch and render the plan catalogue
    pub async fn show_plans(&mut self) -> Result<Outcome> {
        let result = self.api.list_plans().await;
        let Some(plans) = self.settle("list plans", result)? else {
            return Ok(Outcome::Skipped);
        };
        self.view.render_plans(&plans);
        Ok(Outcome::Applied)
    }

    /// Ask the backend to analyze a LinkedIn profile
    ///
    /// A blank URL issues no request. Anything that does not parse as an
    /// http(s) URL is reported as a notice. The analysis counts against the
    /// daily quota, so quota is re-fetched once it has been rendered.
    pub async fn analyze_profile(&mut self, profile_url: &str) -> Result<Outcome> {
        let profile_url = profile_url.trim();
        if profile_url.is_empty() {
            return Ok(Outcome::Skipped);
        }
        match url::Url::parse(profile_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                self.view
                    .show_notice(&format!("Not a profile URL: {}", profile_url));
                return Ok(Outcome::Skipped);
            }
        }

        let request = ProfileRequest {
            profile_url: profile_url.to_string(),
        };
        let result = self.api.analyze_profile(&request).await;
        let Some(analysis) = self.settle("analyze profile", result)? else {
            return Ok(Outcome::Skipped);
        };
        tracing::info!("Analyzed profile {} ({})", analysis.profile_url, analysis.status);
        self.view.render_profile_analysis(&analysis);
        self.refresh_quota_after("analyze profile").await;
        Ok(Outcome::Applied)
    }

    /// Fetch and render profile insights, then re-fetch quota
    pub async fn profile_insights(&mut self) -> Result<Outcome> {
        let result = self.api.profile_insights().await;
        let Some(insights) = self.settle("load profile insights", result)? else {
            return Ok(Outcome::Skipped);
        };
        self.view.render_profile_insights(&insights);
        self.refresh_quota_after("load profile insights").await;
        Ok(Outcome::Applied)
    }

    /// Re-fetch quota after `action` committed; failures are only logged
    async fn refresh_quota_after(&mut self, action: &str) {
        match self.api.get_quota().await {
            Ok(quota) => self.view.render_quota(&quota),
            Err(e) => tracing::warn!("Failed to refresh quota after {}: {:#}", action, e),
        }
    }

    /// Re-fetch the chat list after `action` committed; failures are only logged
    async fn reload_chats_after(&mut self, action: &str) {
        match self.api.list_chats().await {
            Ok(chats) => self.view.render_chat_list(&chats),
            Err(e) => tracing::warn!("Failed to reload chats after {}: {:#}", action, e),
        }
    }

    /// Apply the failure policy to a request result
    fn settle<T>(&self, action: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => match self.policy {
                FailurePolicy::Swallow => {
                    tracing::warn!("Failed to {}: {:#}", action, e);
                    Ok(None)
                }
                FailurePolicy::Propagate => Err(e.context(format!("Failed to {}", action))),
            },
        }
    }
}
