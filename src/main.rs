//! tutorchat - terminal client for an AI tutor service
//!
#![doc = "tutorchat - terminal client for an AI tutor service"]
#![doc = "Main entry point for the tutorchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tutorchat::cli::{Cli, Commands, ProfileCommand};
use tutorchat::commands;
use tutorchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { session } => {
            if let Some(s) = &session {
                tracing::debug!("Opening session: {}", s);
            }
            commands::chat::run_chat(config, session).await?;
            Ok(())
        }
        Commands::Ask { prompt, session } => {
            commands::backend::ask(&config, &prompt, &session).await?;
            Ok(())
        }
        Commands::History { session, json } => {
            commands::backend::history(&config, &session, json).await?;
            Ok(())
        }
        Commands::Sessions { json } => {
            commands::backend::sessions(&config, json).await?;
            Ok(())
        }
        Commands::Clear { session, yes } => {
            commands::backend::clear(&config, &session, yes).await?;
            Ok(())
        }
        Commands::Health { json } => {
            commands::backend::health(&config, json).await?;
            Ok(())
        }
        Commands::Profile { command } => match command {
            ProfileCommand::Show { json } => commands::profile::show(&config, json),
            ProfileCommand::Set {
                name,
                email,
                skills,
            } => commands::profile::set(&config, name, email, skills),
        },
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug output for this
/// crate. Logs go to stderr so command output stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tutorchat=debug"
    } else {
        "tutorchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
