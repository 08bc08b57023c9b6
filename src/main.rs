//! outreach-chat - Terminal client for the outreach mail backend
//!
#![doc = "outreach-chat - Terminal client for the outreach mail backend"]
#![doc = "Main entry point for the outreach-chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use outreach_chat::cli::{Cli, Commands};
use outreach_chat::client::Draft;
use outreach_chat::commands;
use outreach_chat::commands::auth::AuthAction;
use outreach_chat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Login { email, password } => {
            tracing::info!("Logging in to {}", config.server.base_url);
            commands::auth::authenticate(&config, AuthAction::Login, email, password).await?;
            Ok(())
        }
        Commands::Register { email, password } => {
            tracing::info!("Registering with {}", config.server.base_url);
            commands::auth::authenticate(&config, AuthAction::Register, email, password).await?;
            Ok(())
        }
        Commands::Logout => {
            commands::auth::logout(&config)?;
            Ok(())
        }
        Commands::Chat { resume } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(r) = &resume {
                tracing::debug!("Resuming conversation: {}", r);
            }
            commands::chat::run_chat(config, resume).await?;
            Ok(())
        }
        Commands::Chats => {
            commands::list_chats(&config).await?;
            Ok(())
        }
        Commands::Show { chat_id } => {
            commands::show_chat(&config, &chat_id).await?;
            Ok(())
        }
        Commands::Send {
            message,
            to,
            company,
            job,
            chat,
        } => {
            let draft = Draft::new(message)
                .recipient(to.unwrap_or_default())
                .company(company.unwrap_or_default())
                .job_title(job.unwrap_or_default());
            commands::send(&config, draft, chat).await?;
            Ok(())
        }
        Commands::Delete { chat_id } => {
            commands::delete_chat(&config, &chat_id).await?;
            Ok(())
        }
        Commands::Quota => {
            commands::show_quota(&config).await?;
            Ok(())
        }
        Commands::Plans => {
            commands::show_plans(&config).await?;
            Ok(())
        }
        Commands::Analyze { profile_url } => {
            tracing::info!("Analyzing profile {}", profile_url);
            commands::analyze(&config, &profile_url).await?;
            Ok(())
        }
        Commands::Insights => {
            commands::insights(&config).await?;
            Ok(())
        }
        Commands::Upgrade { plan } => {
            tracing::info!("Requesting plan change to {}", plan);
            commands::upgrade(&config, &plan).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with rendered output.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "outreach_chat=debug"
    } else {
        "outreach_chat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
