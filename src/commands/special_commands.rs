//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` (and the bare words `exit`/`quit`) control the
//! session instead of being sent as messages. Command names are
//! case-insensitive; arguments keep their case.

use crate::api::Plan;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Which chat `/open` and `/delete` refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    /// 1-based position in the last rendered list
    Index(usize),
    /// Full backend id
    Id(String),
}

impl ChatRef {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(index) => ChatRef::Index(index),
            Err(_) => ChatRef::Id(arg.to_string()),
        }
    }
}

/// Outreach context field set with `/to`, `/company` or `/job`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// Recipient name
    Recipient,
    /// Recipient's company
    Company,
    /// Recipient's job title
    JobTitle,
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Reload the conversation list
    ListChats,

    /// Open a conversation from the list
    OpenChat(ChatRef),

    /// Start a new conversation
    NewChat,

    /// Delete a conversation
    DeleteChat(ChatRef),

    /// Refresh quota and plan
    Quota,

    /// Show the plan catalogue
    Plans,

    /// Request a plan change
    Upgrade(Plan),

    /// Set an outreach context field; an empty value clears it
    SetField(DraftField, String),

    /// Show the outreach context that will accompany the next message
    ShowDraft,

    /// Analyze a LinkedIn profile by URL
    AnalyzeProfile(String),

    /// Show insights for the analyzed profile
    Insights,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input as a message
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognised `/` commands,
/// `CommandError::MissingArgument` when a required argument is absent and
/// `CommandError::UnsupportedArgument` for an invalid one.
///
/// # Examples
///
/// ```
/// use outreach_chat::commands::special_commands::{parse_special_command, ChatRef, SpecialCommand};
/// use outreach_chat::api::Plan;
///
/// assert_eq!(parse_special_command("/open 2").unwrap(), SpecialCommand::OpenChat(ChatRef::Index(2)));
/// assert_eq!(parse_special_command("/upgrade pro").unwrap(), SpecialCommand::Upgrade(Plan::Pro));
/// assert_eq!(parse_special_command("hello there").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/chats" | "/list" => Ok(SpecialCommand::ListChats),
        "/new" => Ok(SpecialCommand::NewChat),
        "/quota" => Ok(SpecialCommand::Quota),
        "/plans" => Ok(SpecialCommand::Plans),
        "/draft" => Ok(SpecialCommand::ShowDraft),
        "/insights" => Ok(SpecialCommand::Insights),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        "/open" => require(&name, arg, "/open <number|chat_id>")
            .map(|a| SpecialCommand::OpenChat(ChatRef::parse(a))),
        "/delete" => require(&name, arg, "/delete <number|chat_id>")
            .map(|a| SpecialCommand::DeleteChat(ChatRef::parse(a))),

        "/analyze" => require(&name, arg, "/analyze <profile_url>")
            .map(|a| SpecialCommand::AnalyzeProfile(a.to_string())),

        "/upgrade" => {
            let arg = require(&name, arg, "/upgrade <free|pro|ultra|business>")?;
            arg.parse::<Plan>()
                .map(SpecialCommand::Upgrade)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: name.clone(),
                    arg: arg.to_string(),
                })
        }

        "/to" => Ok(SpecialCommand::SetField(DraftField::Recipient, arg.to_string())),
        "/company" => Ok(SpecialCommand::SetField(DraftField::Company, arg.to_string())),
        "/job" => Ok(SpecialCommand::SetField(DraftField::JobTitle, arg.to_string())),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn require<'a>(command: &str, arg: &'a str, usage: &str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg)
    }
}

/// Help text for the interactive session
pub fn help_text() -> &'static str {
    r#"Type a message and press Enter to send it to the active conversation.
A new conversation is created automatically if none is open.

Conversations:
  /chats              Reload the conversation list
  /open <n|id>        Open conversation number n (from /chats) or by id
  /new                Start a new conversation
  /delete <n|id>      Delete a conversation

Outreach context (sent with every message):
  /to <name>          Recipient name
  /company <name>     Recipient's company
  /job <title>        Recipient's job title
  /draft              Show the current context
  (give no value to clear a field)

LinkedIn (counts against quota):
  /analyze <url>      Analyze a LinkedIn profile
  /insights           Show insights and outreach suggestions

Billing:
  /quota              Show remaining daily quota and plan
  /plans              Show available plans
  /upgrade <plan>     Request a plan change (free, pro, ultra, business)

  /help               Show this help
  exit, quit          Leave the session
"#
}
