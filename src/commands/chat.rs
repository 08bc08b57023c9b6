//! Interactive chat mode handler.
//!
//! Bootstraps the session, loads the chat list and quota, then runs a
//! readline loop: plain lines are sent as messages, `/` lines are special
//! commands. The outreach context (`/to`, `/company`, `/job`) persists
//! across messages. If a send does not go through, the text is offered
//! again at the next prompt.

use std::io::Write;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::{ChatApi, ChatId};
use crate::client::{ChatClient, Draft};
use crate::commands::connect;
use crate::commands::special_commands::{
    help_text, parse_special_command, ChatRef, DraftField, SpecialCommand,
};
use crate::config::Config;
use crate::error::Result;
use crate::view::{ChatView, TerminalView};

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `resume` - Conversation to open right away
pub async fn run_chat(config: Config, resume: Option<String>) -> Result<()> {
    let mut client = connect(&config, config.client.failure_policy)?;
    print_welcome();

    client.start().await?;
    if let Some(chat_id) = resume {
        client.load_chat(&ChatId::new(chat_id)).await?;
    }

    let mut context = Draft::default();
    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format_prompt(client.active_chat());
        let line = match client.view_mut().take_staged_input() {
            Some(pending) => rl.readline_with_initial(&prompt, (pending.as_str(), "")),
            None => rl.readline(&prompt),
        };

        match line {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                match handle_input(&mut client, &mut context, input).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Process one line of input; `Ok(false)` ends the session
pub async fn handle_input<A, W>(
    client: &mut ChatClient<A, TerminalView<W>>,
    context: &mut Draft,
    input: &str,
) -> Result<bool>
where
    A: ChatApi,
    W: Write,
{
    let command = match parse_special_command(input) {
        Ok(command) => command,
        Err(e) => {
            client.view_mut().show_notice(&e.to_string());
            return Ok(true);
        }
    };

    match command {
        SpecialCommand::None => {
            let draft = Draft {
                content: input.to_string(),
                ..context.clone()
            };
            client.view_mut().stage_input(input);
            client.send_message(&draft).await?;
        }
        SpecialCommand::Exit => return Ok(false),
        SpecialCommand::ListChats => {
            client.load_chats().await?;
        }
        SpecialCommand::OpenChat(chat_ref) => {
            if let Some(chat_id) = resolve(client, &chat_ref) {
                client.load_chat(&chat_id).await?;
            }
        }
        SpecialCommand::NewChat => {
            client.new_chat().await?;
        }
        SpecialCommand::DeleteChat(chat_ref) => {
            if let Some(chat_id) = resolve(client, &chat_ref) {
                client.delete_chat(&chat_id).await?;
            }
        }
        SpecialCommand::Quota => {
            client.refresh_quota(None).await?;
        }
        SpecialCommand::Plans => {
            client.show_plans().await?;
        }
        SpecialCommand::Upgrade(plan) => {
            client.select_plan(plan).await?;
        }
        SpecialCommand::SetField(field, value) => {
            match field {
                DraftField::Recipient => context.recipient_name = value,
                DraftField::Company => context.company = value,
                DraftField::JobTitle => context.job_title = value,
            }
            let summary = describe_context(context);
            client.view_mut().show_notice(&summary);
        }
        SpecialCommand::ShowDraft => {
            let summary = describe_context(context);
            client.view_mut().show_notice(&summary);
        }
        SpecialCommand::AnalyzeProfile(profile_url) => {
            client.analyze_profile(&profile_url).await?;
        }
        SpecialCommand::Insights => {
            client.profile_insights().await?;
        }
        SpecialCommand::Help => {
            client.view_mut().show_notice(help_text());
        }
    }
    Ok(true)
}

fn resolve<A, W>(client: &mut ChatClient<A, TerminalView<W>>, chat_ref: &ChatRef) -> Option<ChatId>
where
    A: ChatApi,
    W: Write,
{
    match chat_ref {
        ChatRef::Id(id) => Some(ChatId::new(id.as_str())),
        ChatRef::Index(index) => {
            let found = client.view().chat_at(*index).cloned();
            if found.is_none() {
                client
                    .view_mut()
                    .show_notice(&format!("No conversation #{}; run /chats to list them", index));
            }
            found
        }
    }
}

fn describe_context(context: &Draft) -> String {
    fn or_dash(value: &str) -> &str {
        if value.is_empty() {
            "-"
        } else {
            value
        }
    }
    format!(
        "To: {}  Company: {}  Job: {}",
        or_dash(&context.recipient_name),
        or_dash(&context.company),
        or_dash(&context.job_title)
    )
}

fn format_prompt(active: Option<&ChatId>) -> String {
    match active {
        Some(chat_id) => format!("[{}] >> ", chat_id.short()).cyan().to_string(),
        None => "[new] >> ".cyan().to_string(),
    }
}

fn print_welcome() {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║              Outreach Chat - Interactive Session              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Type '/help' for available commands, 'exit' to quit\n");
}
