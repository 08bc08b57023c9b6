//! In-process fake backend for orchestration tests
//!
//! [`FakeApi`] implements [`ChatApi`] against in-memory state and records
//! every call it receives, so tests can assert both what was rendered and
//! which requests were issued, in which order. Clones share state: keep one
//! clone as a handle after moving the other into a
//! [`ChatClient`](crate::client::ChatClient).
//!
//! # Example
//!
//! ```
//! use outreach_chat::api::fake::{ApiCall, FakeApi};
//! use outreach_chat::api::ChatApi;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let api = FakeApi::new();
//! api.fail("get_quota", 503);
//!
//! assert!(api.get_quota().await.is_err());
//! assert_eq!(api.calls(), vec![ApiCall::GetQuota]);
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{
    ChatApi, ChatDetail, ChatId, ChatSummary, Message, Plan, PlanInfo, ProfileAnalysis,
    ProfileData, ProfileInsights, ProfileRequest, Quota, SendMessageRequest, SendMessageResponse,
};
use crate::error::{OutreachError, Result};

/// One request observed by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `GET /api/history/chats`
    ListChats,
    /// `POST /api/chat/create-chat`
    CreateChat,
    /// `GET /api/history/chat/{id}`
    GetChat(ChatId),
    /// `DELETE /api/history/chat/{id}`
    DeleteChat(ChatId),
    /// `POST /api/chat/message`
    SendMessage(SendMessageRequest),
    /// `GET /api/billing/quota`
    GetQuota,
    /// `POST /api/billing/upgrade`
    UpgradePlan(Plan),
    /// `GET /api/billing/plans`
    ListPlans,
    /// `POST /api/linkedin/analyze` with the profile URL
    AnalyzeProfile(String),
    /// `GET /api/linkedin/insights`
    ProfileInsights,
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ApiCall>,
    failures: HashMap<&'static str, u16>,
    chats: Vec<ChatSummary>,
    details: HashMap<ChatId, ChatDetail>,
    next_ids: VecDeque<ChatId>,
    created: usize,
    quota: Quota,
    plans: Vec<PlanInfo>,
    insights: ProfileInsights,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            failures: HashMap::new(),
            chats: Vec::new(),
            details: HashMap::new(),
            next_ids: VecDeque::new(),
            created: 0,
            quota: Quota {
                remaining: 3,
                daily_limit: 3,
                plan: Plan::Free.to_string(),
            },
            plans: Vec::new(),
            insights: ProfileInsights::default(),
        }
    }
}

/// Scriptable in-memory [`ChatApi`]
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// Empty backend on the FREE plan with 3/3 requests left
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `operation` (e.g. `"get_quota"`) answer with `status` until [`recover`](Self::recover)
    pub fn fail(&self, operation: &'static str, status: u16) {
        self.state().failures.insert(operation, status);
    }

    /// Undo [`fail`](Self::fail)
    pub fn recover(&self, operation: &'static str) {
        self.state().failures.remove(operation);
    }

    /// Replace the conversation list
    pub fn set_chats(&self, chats: Vec<ChatSummary>) {
        self.state().chats = chats;
    }

    /// Store a conversation retrievable through `get_chat`
    pub fn insert_chat(&self, chat_id: ChatId, messages: Vec<Message>) {
        let detail = ChatDetail {
            chat_id: Some(chat_id.clone()),
            messages,
        };
        self.state().details.insert(chat_id, detail);
    }

    /// Id handed out by the next `create_chat`
    pub fn push_next_chat_id(&self, chat_id: ChatId) {
        self.state().next_ids.push_back(chat_id);
    }

    /// Replace the quota returned by `get_quota`
    pub fn set_quota(&self, quota: Quota) {
        self.state().quota = quota;
    }

    /// Replace the plan catalogue
    pub fn set_plans(&self, plans: Vec<PlanInfo>) {
        self.state().plans = plans;
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Replace the insights returned by `profile_insights`
    pub fn set_insights(&self, insights: ProfileInsights) {
        self.state().insights = insights;
    }

    fn record(&self, operation: &'static str, call: ApiCall) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(status) = state.failures.get(operation).copied() {
            return Err(OutreachError::Api {
                operation,
                status,
                message: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(state)
    }
}

#[async_trait]
impl ChatApi for FakeApi {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let state = self.record("list_chats", ApiCall::ListChats)?;
        Ok(state.chats.clone())
    }

    async fn create_chat(&self) -> Result<ChatId> {
        let mut state = self.record("create_chat", ApiCall::CreateChat)?;
        state.created += 1;
        let chat_id = match state.next_ids.pop_front() {
            Some(id) => id,
            None => ChatId::new(format!("chat-{}", state.created)),
        };
        state.details.insert(
            chat_id.clone(),
            ChatDetail {
                chat_id: Some(chat_id.clone()),
                messages: Vec::new(),
            },
        );
        Ok(chat_id)
    }

    async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatDetail> {
        let state = self.record("get_chat", ApiCall::GetChat(chat_id.clone()))?;
        state.details.get(chat_id).cloned().ok_or_else(|| {
            OutreachError::Api {
                operation: "get_chat",
                status: 404,
                message: "Chat not found".to_string(),
            }
            .into()
        })
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()> {
        let mut state = self.record("delete_chat", ApiCall::DeleteChat(chat_id.clone()))?;
        state.chats.retain(|c| &c.chat_id != chat_id);
        if state.details.remove(chat_id).is_none() {
            return Err(OutreachError::Api {
                operation: "delete_chat",
                status: 404,
                message: "Chat not found".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<SendMessageResponse> {
        let mut state = self.record("send_message", ApiCall::SendMessage(request.clone()))?;
        let reply = format!(
            "Generated outreach for {} at {}",
            request.recipient_name, request.company
        );
        if let Some(detail) = state.details.get_mut(&request.chat_id) {
            detail.messages.push(Message::user(request.content.clone()));
            detail.messages.push(Message::assistant(reply.clone()));
        }
        state.quota.remaining = (state.quota.remaining - 1).max(0);
        Ok(SendMessageResponse {
            chat_id: Some(request.chat_id.clone()),
            message: reply,
            generated_mail: None,
            quota_remaining: state.quota.remaining,
        })
    }

    async fn get_quota(&self) -> Result<Quota> {
        let state = self.record("get_quota", ApiCall::GetQuota)?;
        Ok(state.quota.clone())
    }

    async fn upgrade_plan(&self, plan: Plan) -> Result<()> {
        let mut state = self.record("upgrade_plan", ApiCall::UpgradePlan(plan))?;
        state.quota.plan = plan.to_string();
        Ok(())
    }

    async fn list_plans(&self) -> Result<Vec<PlanInfo>> {
        let state = self.record("list_plans", ApiCall::ListPlans)?;
        Ok(state.plans.clone())
    }

    async fn analyze_profile(&self, request: &ProfileRequest) -> Result<ProfileAnalysis> {
        let mut state = self.record(
            "analyze_profile",
            ApiCall::AnalyzeProfile(request.profile_url.clone()),
        )?;
        state.quota.remaining = (state.quota.remaining - 1).max(0);
        Ok(ProfileAnalysis {
            profile_url: request.profile_url.clone(),
            status: "analyzed".to_string(),
            profile_context: format!("Profile at {}", request.profile_url),
            note: None,
            data: ProfileData::default(),
        })
    }

    async fn profile_insights(&self) -> Result<ProfileInsights> {
        let mut state = self.record("profile_insights", ApiCall::ProfileInsights)?;
        state.quota.remaining = (state.quota.remaining - 1).max(0);
        Ok(state.insights.clone())
    }
}
