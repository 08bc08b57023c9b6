//! View-update interface
//!
//! The orchestration in [`client`](crate::client) never touches a rendering
//! surface directly; it calls these hooks instead. [`TerminalView`] draws to
//! a terminal, [`RecordingView`] captures calls for tests.

use crate::api::{
    ChatSummary, GeneratedMail, Message, PlanInfo, ProfileAnalysis, ProfileInsights, Quota,
};

pub mod recording;
pub mod terminal;

pub use recording::RecordingView;
pub use terminal::TerminalView;

/// Rendering hooks driven by [`ChatClient`](crate::client::ChatClient)
pub trait ChatView {
    /// Replace the conversation list with `chats`, in the given order
    fn render_chat_list(&mut self, chats: &[ChatSummary]);

    /// Replace the message area with `messages` and scroll to the latest
    fn render_messages(&mut self, messages: &[Message]);

    /// Append one message to the message area and scroll to it
    fn append_message(&mut self, message: &Message);

    /// Show the email the backend drafted for the last message
    fn render_generated_mail(&mut self, mail: &GeneratedMail);

    /// Show remaining quota and plan
    fn render_quota(&mut self, quota: &Quota);

    /// Show the plan catalogue
    fn render_plans(&mut self, plans: &[PlanInfo]);

    /// Show what the backend extracted from a LinkedIn profile
    fn render_profile_analysis(&mut self, analysis: &ProfileAnalysis);

    /// Show profile insights and outreach suggestions
    fn render_profile_insights(&mut self, insights: &ProfileInsights);

    /// Empty the message input after a successful send
    fn clear_input(&mut self);

    /// Blocking informational notice
    fn show_notice(&mut self, notice: &str);

    /// Send the user to the login flow; nothing else happens afterwards
    fn redirect_to_login(&mut self);

    /// Empty the message area
    fn clear_messages(&mut self) {
        self.render_messages(&[]);
    }
}
