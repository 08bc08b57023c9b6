//! Backend API abstraction for the outreach chat service
//!
//! This module defines the wire types exchanged with the backend and the
//! [`ChatApi`] trait the orchestration layer talks to. The production
//! implementation is [`HttpApi`]; [`fake::FakeApi`] replaces it in tests.

use crate::error::{OutreachError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod fake;
pub mod http;
pub mod public;

pub use http::HttpApi;
pub use public::PublicApi;

/// Backend-assigned conversation identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact listings
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user
    User,
    /// Reply produced by the backend
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// Build a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Entry of the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Conversation id
    pub chat_id: ChatId,
    /// First characters of the opening message (empty for a new chat)
    #[serde(default)]
    pub preview: String,
    /// Creation timestamp as sent by the backend
    pub created_at: String,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Number of stored messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
}

impl ChatSummary {
    /// Format the creation timestamp as a local date
    ///
    /// Accepts RFC 3339 timestamps and the naive ISO form the backend writes
    /// (`2024-05-01T10:20:30.123456`). Anything else is returned verbatim.
    pub fn created_date(&self, format: &str) -> String {
        format_timestamp(&self.created_at, format)
    }
}

/// Render a backend timestamp with a `chrono` format string
pub fn format_timestamp(raw: &str, format: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(format).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(format).to_string();
    }
    raw.to_string()
}

/// Response of `GET /api/history/chats`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatList {
    #[serde(default)]
    pub(crate) chats: Vec<ChatSummary>,
}

/// Full conversation as returned by `GET /api/history/chat/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDetail {
    /// Conversation id, when the backend echoes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    /// Messages in stored order
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Response of `POST /api/chat/create-chat`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedChat {
    pub(crate) chat_id: ChatId,
}

/// Body of `POST /api/chat/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Target conversation
    pub chat_id: ChatId,
    /// Message text
    pub content: String,
    /// Name of the person the outreach is addressed to
    pub recipient_name: String,
    /// Recipient's company
    pub company: String,
    /// Recipient's job title
    pub job_title: String,
}

/// Outreach email drafted by the backend alongside a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMail {
    /// Email subject line
    #[serde(default)]
    pub subject: String,
    /// Email body
    #[serde(default)]
    pub body: String,
    /// Short preview text
    #[serde(default)]
    pub preview: String,
    /// Backend's personalization estimate in `0.0..=1.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalization_score: Option<f64>,
}

/// Response of `POST /api/chat/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Conversation the message landed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    /// Assistant reply
    pub message: String,
    /// Drafted email, if the backend produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_mail: Option<GeneratedMail>,
    /// Remaining daily quota after this message
    pub quota_remaining: i64,
}

/// Daily usage quota of the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    /// Requests left today
    pub remaining: i64,
    /// Requests allowed per day
    pub daily_limit: i64,
    /// Current plan name
    pub plan: String,
}

impl Quota {
    /// `"{remaining}/{daily_limit} remaining"`
    pub fn status_line(&self) -> String {
        format!("{}/{} remaining", self.remaining, self.daily_limit)
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    /// Default tier every account starts on
    Free,
    /// Paid tier
    Pro,
    /// Larger paid tier
    Ultra,
    /// Contract tier
    Business,
}

impl Plan {
    /// Every plan, cheapest first
    pub const ALL: [Plan; 4] = [Plan::Free, Plan::Pro, Plan::Ultra, Plan::Business];

    /// Backend literal for this plan
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Pro => "PRO",
            Plan::Ultra => "ULTRA",
            Plan::Business => "BUSINESS",
        }
    }

    /// Whether this is the free tier
    pub fn is_free(&self) -> bool {
        matches!(self, Plan::Free)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = OutreachError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Plan::ALL
            .into_iter()
            .find(|plan| plan.as_str() == wanted)
            .ok_or_else(|| OutreachError::InvalidPlan(s.trim().to_string()))
    }
}

/// Body of `POST /api/billing/upgrade`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PlanUpgrade {
    pub(crate) new_plan: Plan,
}

/// Entry of the plan catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    /// Plan name
    pub name: String,
    /// Requests allowed per day
    pub daily_limit: i64,
    /// Monthly price; a number, or a string such as `"contact"`
    #[serde(default)]
    pub price: serde_json::Value,
    /// Marketing feature list
    #[serde(default)]
    pub features: Vec<String>,
}

impl PlanInfo {
    /// Human readable price
    pub fn price_label(&self) -> String {
        match &self.price {
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => "free".to_string(),
            serde_json::Value::Number(n) => format!("${}/mo", n),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "-".to_string(),
            other => other.to_string(),
        }
    }
}

/// Response of `GET /api/billing/plans`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlanCatalogue {
    #[serde(default)]
    pub(crate) plans: Vec<PlanInfo>,
}

/// Body of `POST /api/linkedin/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Public LinkedIn profile URL
    pub profile_url: String,
}

/// Profile fields extracted by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Headline, usually the current job title
    #[serde(default)]
    pub headline: Option<String>,
    /// "About" section
    #[serde(default)]
    pub about: Option<String>,
    /// Listed skills
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Response of `POST /api/linkedin/analyze`
///
/// Counts against the daily quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    /// Profile that was analyzed
    #[serde(default)]
    pub profile_url: String,
    /// Backend status, e.g. `placeholder` while scraping is not wired up
    #[serde(default)]
    pub status: String,
    /// Summary the backend will feed into mail generation
    #[serde(default)]
    pub profile_context: String,
    /// Free-form remark from the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Extracted profile fields
    #[serde(default)]
    pub data: ProfileData,
}

/// Response of `GET /api/linkedin/insights`
///
/// Counts against the daily quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInsights {
    /// Observations about the analyzed profile
    #[serde(default)]
    pub insights: Vec<String>,
    /// Suggested angles for the outreach mail
    #[serde(default)]
    pub outreach_suggestions: Vec<String>,
}

/// Authenticated operations of the outreach backend
///
/// Every method corresponds to one HTTP request. Implementations report
/// non-success statuses as [`OutreachError::Api`] and never retry.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /api/history/chats`
    async fn list_chats(&self) -> Result<Vec<ChatSummary>>;

    /// `POST /api/chat/create-chat`
    async fn create_chat(&self) -> Result<ChatId>;

    /// `GET /api/history/chat/{id}`
    async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatDetail>;

    /// `DELETE /api/history/chat/{id}`
    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()>;

    /// `POST /api/chat/message`
    async fn send_message(&self, request: &SendMessageRequest) -> Result<SendMessageResponse>;

    /// `GET /api/billing/quota`
    async fn get_quota(&self) -> Result<Quota>;

    /// `POST /api/billing/upgrade`
    async fn upgrade_plan(&self, plan: Plan) -> Result<()>;

    /// `GET /api/billing/plans`
    async fn list_plans(&self) -> Result<Vec<PlanInfo>>;

    /// `POST /api/linkedin/analyze`
    async fn analyze_profile(&self, request: &ProfileRequest) -> Result<ProfileAnalysis>;

    /// `GET /api/linkedin/insights`
    async fn profile_insights(&self) -> Result<ProfileInsights>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_short() {
        let id = ChatId::new("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(ChatId::new("abc").short(), "abc");
    }

    #[test]
    fn test_profile_analysis_placeholder_body() {
        let json = r#"{
            "profile_context": "Data fetched from LinkedIn profile",
            "profile_url": "https://www.linkedin.com/in/ada",
            "status": "placeholder",
            "note": "Scraping logic not implemented.",
            "data": {"name": "Profile Name", "headline": "Job Title", "about": "Profile summary",
                     "experience": [], "education": [], "skills": []}
        }"#;
        let analysis: ProfileAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.status, "placeholder");
        assert_eq!(analysis.data.headline.as_deref(), Some("Job Title"));
        assert!(analysis.data.skills.is_empty());
    }

    #[test]
    fn test_profile_insights_without_suggestions() {
        let json = r#"{"insights": ["Profile analysis feature"]}"#;
        let insights: ProfileInsights = serde_json::from_str(json).unwrap();
        assert_eq!(insights.insights, vec!["Profile analysis feature".to_string()]);
        assert!(insights.outreach_suggestions.is_empty());
    }

    #[test]
    fn test_chat_list_deserialization() {
        let json = r#"{"chats":[
            {"chat_id":"a","created_at":"2024-05-01T10:20:30.123456","updated_at":"2024-05-01T11:00:00","message_count":2,"preview":"Hello"},
            {"chat_id":"b","created_at":"2024-04-30T09:00:00","preview":""}
        ]}"#;
        let list: ChatList = serde_json::from_str(json).unwrap();
        assert_eq!(list.chats.len(), 2);
        assert_eq!(list.chats[0].chat_id.as_str(), "a");
        assert_eq!(list.chats[0].message_count, Some(2));
        assert_eq!(list.chats[1].preview, "");
    }

    #[test]
    fn test_created_date_naive_iso() {
        let summary = ChatSummary {
            chat_id: ChatId::new("a"),
            preview: String::new(),
            created_at: "2024-05-01T10:20:30.123456".to_string(),
            updated_at: None,
            message_count: None,
        };
        assert_eq!(summary.created_date("%Y-%m-%d"), "2024-05-01");
        assert_eq!(summary.created_date("%d/%m/%Y"), "01/05/2024");
    }

    #[test]
    fn test_created_date_unparseable_is_verbatim() {
        assert_eq!(format_timestamp("yesterday", "%Y"), "yesterday");
    }

    #[test]
    fn test_message_roles_round_trip_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        let parsed: Message = serde_json::from_str(r#"{"role":"user","content":"x"}"#).unwrap();
        assert_eq!(parsed, Message::user("x"));
    }

    #[test]
    fn test_chat_detail_ignores_extra_fields() {
        let json = r#"{"chat_id":"c1","messages":[{"role":"user","content":"q","timestamp":"t"}],"created_at":"x"}"#;
        let detail: ChatDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.chat_id, Some(ChatId::new("c1")));
        assert_eq!(detail.messages, vec![Message::user("q")]);
    }

    #[test]
    fn test_send_message_response_with_mail() {
        let json = r#"{
            "chat_id":"c1",
            "message":"Generated outreach for Ada at Acme",
            "generated_mail":{"subject":"Quick question about Acme","body":"Hi Ada","preview":"Quick question about Acme","personalization_score":0.85},
            "quota_remaining":2
        }"#;
        let response: SendMessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.quota_remaining, 2);
        let mail = response.generated_mail.unwrap();
        assert_eq!(mail.subject, "Quick question about Acme");
        assert_eq!(mail.personalization_score, Some(0.85));
    }

    #[test]
    fn test_quota_status_line() {
        let quota = Quota {
            remaining: 7,
            daily_limit: 10,
            plan: "PRO".to_string(),
        };
        assert_eq!(quota.status_line(), "7/10 remaining");
    }

    #[test]
    fn test_quota_ignores_extra_fields() {
        let json = r#"{"plan":"FREE","daily_limit":3,"daily_requests":1,"remaining":2,"quota_exceeded":false}"#;
        let quota: Quota = serde_json::from_str(json).unwrap();
        assert_eq!(quota.status_line(), "2/3 remaining");
        assert_eq!(quota.plan, "FREE");
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("pro".parse::<Plan>().unwrap(), Plan::Pro);
        assert_eq!(" Business ".parse::<Plan>().unwrap(), Plan::Business);
        assert!("gold".parse::<Plan>().is_err());
        assert!(Plan::Free.is_free());
        assert!(!Plan::Ultra.is_free());
    }

    #[test]
    fn test_plan_upgrade_body() {
        let body = serde_json::to_string(&PlanUpgrade {
            new_plan: Plan::Ultra,
        })
        .unwrap();
        assert_eq!(body, r#"{"new_plan":"ULTRA"}"#);
    }

    #[test]
    fn test_plan_price_label() {
        let catalogue: PlanCatalogue = serde_json::from_str(
            r#"{"plans":[
                {"name":"FREE","daily_limit":3,"price":0,"features":["3 requests/day"]},
                {"name":"PRO","daily_limit":200,"price":29,"features":[]},
                {"name":"BUSINESS","daily_limit":999999,"price":"contact","features":[]}
            ]}"#,
        )
        .unwrap();
        let labels: Vec<String> = catalogue.plans.iter().map(|p| p.price_label()).collect();
        assert_eq!(labels, vec!["free", "$29/mo", "contact"]);
    }
}
