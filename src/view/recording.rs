//! A [`ChatView`] that remembers what it was asked to render
//!
//! Besides the raw event log, [`RecordingView`] keeps the "current screen"
//! (list, messages, quota text, plan badge) the way a real surface would,
//! so tests can assert that a failed request left prior content untouched.

use crate::api::{
    ChatId, ChatSummary, GeneratedMail, Message, PlanInfo, ProfileAnalysis, ProfileInsights,
    Quota,
};
use crate::view::ChatView;

/// One hook invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// [`ChatView::render_chat_list`], ids in render order
    ChatList(Vec<ChatId>),
    /// [`ChatView::render_messages`]
    Messages(Vec<Message>),
    /// [`ChatView::append_message`]
    Appended(Message),
    /// [`ChatView::render_generated_mail`]
    GeneratedMail(GeneratedMail),
    /// [`ChatView::render_quota`]
    Quota(Quota),
    /// [`ChatView::render_plans`]
    Plans(Vec<String>),
    /// [`ChatView::render_profile_analysis`], the analyzed URL
    ProfileAnalysis(String),
    /// [`ChatView::render_profile_insights`]
    ProfileInsights(ProfileInsights),
    /// [`ChatView::clear_input`]
    InputCleared,
    /// [`ChatView::show_notice`]
    Notice(String),
    /// [`ChatView::redirect_to_login`]
    RedirectToLogin,
}

/// Test double for [`ChatView`]
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
    chat_list: Vec<ChatSummary>,
    messages: Vec<Message>,
    quota_text: Option<String>,
    plan_badge: Option<String>,
}

impl RecordingView {
    /// Blank screen, no events
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hook call, in order
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Forget recorded events; the screen state is kept
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Conversations currently listed
    pub fn chat_list(&self) -> &[ChatSummary] {
        &self.chat_list
    }

    /// Messages currently shown
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Quota status text, e.g. `"7/10 remaining"`
    pub fn quota_text(&self) -> Option<&str> {
        self.quota_text.as_deref()
    }

    /// Plan badge text
    pub fn plan_badge(&self) -> Option<&str> {
        self.plan_badge.as_deref()
    }

    /// Notices shown so far
    pub fn notices(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(n) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether a login redirect happened
    pub fn redirected(&self) -> bool {
        self.events.contains(&ViewEvent::RedirectToLogin)
    }
}

impl ChatView for RecordingView {
    fn render_chat_list(&mut self, chats: &[ChatSummary]) {
        self.chat_list = chats.to_vec();
        self.events.push(ViewEvent::ChatList(
            chats.iter().map(|c| c.chat_id.clone()).collect(),
        ));
    }

    fn render_messages(&mut self, messages: &[Message]) {
        self.messages = messages.to_vec();
        self.events.push(ViewEvent::Messages(messages.to_vec()));
    }

    fn append_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
        self.events.push(ViewEvent::Appended(message.clone()));
    }

    fn render_generated_mail(&mut self, mail: &GeneratedMail) {
        self.events.push(ViewEvent::GeneratedMail(mail.clone()));
    }

    fn render_quota(&mut self, quota: &Quota) {
        self.quota_text = Some(quota.status_line());
        self.plan_badge = Some(quota.plan.clone());
        self.events.push(ViewEvent::Quota(quota.clone()));
    }

    fn render_plans(&mut self, plans: &[PlanInfo]) {
        self.events.push(ViewEvent::Plans(
            plans.iter().map(|p| p.name.clone()).collect(),
        ));
    }

    fn render_profile_analysis(&mut self, analysis: &ProfileAnalysis) {
        self.events
            .push(ViewEvent::ProfileAnalysis(analysis.profile_url.clone()));
    }

    fn render_profile_insights(&mut self, insights: &ProfileInsights) {
        self.events.push(ViewEvent::ProfileInsights(insights.clone()));
    }

    fn clear_input(&mut self) {
        self.events.push(ViewEvent::InputCleared);
    }

    fn show_notice(&mut self, notice: &str) {
        self.events.push(ViewEvent::Notice(notice.to_string()));
    }

    fn redirect_to_login(&mut self) {
        self.events.push(ViewEvent::RedirectToLogin);
    }
}
