//! Terminal rendering of the chat client
//!
//! Writes to any `std::io::Write` (stdout in the binary, a `Vec<u8>` in
//! tests). Write failures are logged and otherwise ignored; a broken pipe
//! must not take the session down.

use std::io::Write;

use colored::{ColoredString, Colorize};
use prettytable::{format, row, Table};

use crate::api::{
    ChatId, ChatSummary, GeneratedMail, Message, PlanInfo, ProfileAnalysis, ProfileInsights,
    Quota, Role,
};
use crate::config::DisplayConfig;
use crate::view::ChatView;

/// [`ChatView`] that prints to a terminal
pub struct TerminalView<W: Write> {
    out: W,
    date_format: String,
    color: bool,
    listed: Vec<ChatId>,
    staged_input: Option<String>,
    redirected: bool,
}

impl TerminalView<std::io::Stdout> {
    /// View printing to stdout
    pub fn stdout(display: &DisplayConfig) -> Self {
        Self::new(std::io::stdout(), display)
    }
}

impl<W: Write> TerminalView<W> {
    /// View printing to `out`
    pub fn new(out: W, display: &DisplayConfig) -> Self {
        Self {
            out,
            date_format: display.date_format.clone(),
            color: display.color,
            listed: Vec::new(),
            staged_input: None,
            redirected: false,
        }
    }

    /// Consume the view, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Conversation shown at 1-based position `index` in the last listing
    pub fn chat_at(&self, index: usize) -> Option<&ChatId> {
        index.checked_sub(1).and_then(|i| self.listed.get(i))
    }

    /// Remember text the user submitted until a send clears it
    pub fn stage_input(&mut self, text: impl Into<String>) {
        self.staged_input = Some(text.into());
    }

    /// Text still pending from a send that did not go through
    pub fn take_staged_input(&mut self) -> Option<String> {
        self.staged_input.take()
    }

    /// Whether [`ChatView::redirect_to_login`] was called
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    /// Print a titled `FORMAT_BORDERS_ONLY` table
    ///
    /// Cells hold plain text only; escape codes inside a cell would count
    /// toward its width. Styling is applied to whole rendered lines.
    fn emit_table(&mut self, table: &Table) {
        let rendered = table.to_string();
        for (idx, line) in rendered.lines().enumerate() {
            // line 0 is the top border, line 1 the titles
            let line = if idx == 1 {
                self.paint(line, |s| s.bold())
            } else {
                line.to_string()
            };
            self.emit(&line);
        }
    }

    fn emit_list(&mut self, heading: &str, items: &[String]) {
        let heading = self.paint(heading, |s| s.bold());
        self.emit(&heading);
        for item in items {
            self.emit(&format!("  - {}", item));
        }
    }

    fn message_line(&self, message: &Message) -> String {
        let label = match message.role {
            Role::User => self.paint("you", |s| s.green().bold()),
            Role::Assistant => self.paint("assistant", |s| s.cyan().bold()),
        };
        format!("{}: {}", label, message.content)
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_chat_list(&mut self, chats: &[ChatSummary]) {
        self.listed = chats.iter().map(|c| c.chat_id.clone()).collect();

        if chats.is_empty() {
            let line = self.paint("No conversations yet.", |s| s.yellow());
            self.emit(&line);
            return;
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.set_titles(row!["#", "ID", "Preview", "Created"]);
        for (idx, chat) in chats.iter().enumerate() {
            let preview = if chat.preview.is_empty() {
                "(empty)".to_string()
            } else {
                chat.preview.clone()
            };
            table.add_row(row![
                idx + 1,
                chat.chat_id.short(),
                preview,
                chat.created_date(&self.date_format)
            ]);
        }
        self.emit_table(&table);
    }

    fn render_messages(&mut self, messages: &[Message]) {
        let rule = self.paint(&"─".repeat(40), |s| s.dimmed());
        self.emit(&rule);
        for message in messages {
            let line = self.message_line(message);
            self.emit(&line);
        }
    }

    fn append_message(&mut self, message: &Message) {
        let line = self.message_line(message);
        self.emit(&line);
    }

    fn render_generated_mail(&mut self, mail: &GeneratedMail) {
        let header = self.paint("Drafted email", |s| s.magenta().bold());
        self.emit(&header);
        let subject = format!("Subject: {}", mail.subject);
        self.emit(&subject);
        self.emit("");
        for line in mail.body.lines() {
            self.emit(line);
        }
        if let Some(score) = mail.personalization_score {
            let score = format!("Personalization: {:.0}%", score * 100.0);
            let score = self.paint(&score, |s| s.dimmed());
            self.emit(&score);
        }
    }

    fn render_quota(&mut self, quota: &Quota) {
        let status = quota.status_line();
        let status = if quota.remaining <= 0 {
            self.paint(&status, |s| s.red())
        } else {
            self.paint(&status, |s| s.green())
        };
        let badge = self.paint(&quota.plan, |s| s.blue().bold());
        self.emit(&format!("Quota: {}  Plan: {}", status, badge));
    }

    fn render_plans(&mut self, plans: &[PlanInfo]) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.set_titles(row!["Plan", "Daily limit", "Price", "Features"]);
        for plan in plans {
            table.add_row(row![
                plan.name,
                plan.daily_limit,
                plan.price_label(),
                plan.features.join(", ")
            ]);
        }
        self.emit_table(&table);
    }

    fn render_profile_analysis(&mut self, analysis: &ProfileAnalysis) {
        let header = self.paint("Profile analysis", |s| s.magenta().bold());
        self.emit(&header);
        self.emit(&format!("URL: {}", analysis.profile_url));
        self.emit(&format!("Status: {}", analysis.status));
        let data = &analysis.data;
        if let Some(name) = &data.name {
            self.emit(&format!("Name: {}", name));
        }
        if let Some(headline) = &data.headline {
            self.emit(&format!("Headline: {}", headline));
        }
        if !data.skills.is_empty() {
            self.emit(&format!("Skills: {}", data.skills.join(", ")));
        }
        if !analysis.profile_context.is_empty() {
            self.emit("");
            for line in analysis.profile_context.lines() {
                self.emit(line);
            }
        }
        if let Some(note) = &analysis.note {
            let note = self.paint(note, |s| s.dimmed());
            self.emit(&note);
        }
    }

    fn render_profile_insights(&mut self, insights: &ProfileInsights) {
        if insights.insights.is_empty() && insights.outreach_suggestions.is_empty() {
            let line = self.paint("No insights yet.", |s| s.yellow());
            self.emit(&line);
            return;
        }
        if !insights.insights.is_empty() {
            self.emit_list("Insights", &insights.insights);
        }
        if !insights.outreach_suggestions.is_empty() {
            self.emit_list("Outreach suggestions", &insights.outreach_suggestions);
        }
    }

    fn clear_input(&mut self) {
        self.staged_input = None;
    }

    fn show_notice(&mut self, notice: &str) {
        let line = self.paint(notice, |s| s.yellow().bold());
        self.emit(&line);
    }

    fn redirect_to_login(&mut self) {
        self.redirected = true;
        let hint = self.paint("outreach-chat login", |s| s.cyan());
        self.emit(&format!("Not logged in. Run `{}` to authenticate.", hint));
    }
}
