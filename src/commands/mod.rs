/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat with the tutor
- `backend`: One-shot commands against the backend (ask, history, sessions, clear, health)
- `profile`: Local learner profile

Handlers share identity resolution: the configured user wins, then the
local profile, then the anonymous pseudo-user.
*/

use crate::config::Config;
use crate::error::Result;
use crate::profile::ProfileStore;
use crate::store::{UserIdentity, ANONYMOUS_USER_ID, ANONYMOUS_USER_NAME};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

// One-shot backend commands
pub mod backend;

// Learner profile commands
pub mod profile;

// Special commands parser for the chat loop
pub mod special_commands;

/// Open the local profile, logging instead of failing
///
/// Chatting works without a profile, so an unreadable profile only costs
/// the stats.
pub fn open_profile(config: &Config) -> Option<ProfileStore> {
    match ProfileStore::open(config.profile.path.clone()) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("Profile unavailable: {}", e);
            None
        }
    }
}

/// Read the local profile if one exists, without creating it
///
/// Used by commands that only need an identity.
pub fn peek_profile(config: &Config) -> Option<ProfileStore> {
    match ProfileStore::open_existing(config.profile.path.clone()) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Profile unavailable: {}", e);
            None
        }
    }
}

/// Decide who to chat as
///
/// # Examples
///
/// ```
/// use tutorchat::commands::resolve_identity;
/// use tutorchat::config::Config;
///
/// let user = resolve_identity(&Config::default(), None);
/// assert_eq!(user.id, "anonymous");
/// ```
pub fn resolve_identity(config: &Config, profile: Option<&ProfileStore>) -> UserIdentity {
    let profile = profile.map(|p| p.profile());
    let id = config
        .user
        .id
        .clone()
        .or_else(|| profile.map(|p| p.id.clone()))
        .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string());
    let name = config
        .user
        .name
        .clone()
        .or_else(|| profile.map(|p| p.name.clone()))
        .unwrap_or_else(|| ANONYMOUS_USER_NAME.to_string());
    UserIdentity::new(id, name)
}

/// Ask a yes/no question; anything but `y`/`yes` is no
fn confirm(rl: &mut DefaultEditor, question: &str) -> Result<bool> {
    match rl.readline(question) {
        Ok(answer) => Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        )),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Builds the HTTP gateway and the chat store, attaches the terminal
    //! view as the store's observer, and runs a readline loop that maps
    //! slash commands onto store operations and sends everything else as
    //! a prompt.

    use super::*;
    use crate::commands::special_commands::{
        parse_special_command, print_help, SessionTarget, SpecialCommand,
    };
    use crate::gateway::HttpGateway;
    use crate::store::{ChatStore, SendOutcome};
    use crate::ui::view::{print_banner, print_notices, print_quick_prompts, print_roster};
    use crate::ui::{greeting_for_hour, quick_prompt, ChatView};
    use chrono::{Local, Timelike};
    use colored::Colorize;
    use std::sync::Arc;

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Session to open instead of the default one
    ///
    /// # Errors
    ///
    /// Returns error if the gateway cannot be built or the terminal fails
    pub async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
        let mut profile = open_profile(&config);
        let user = resolve_identity(&config, profile.as_ref());
        tracing::info!("Starting interactive chat as {}", user.id);

        let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
        let base_url = gateway.base_url().to_string();

        print_banner(&user, greeting_for_hour(Local::now().hour()));

        let view = ChatView::stdout(config.chat.show_timestamps);
        let mut store = ChatStore::new(gateway, user, session).with_observer(Box::new(view));
        store.initialize().await;

        let mut rl = DefaultEditor::new()?;
        let mut prefill: Option<String> = None;

        loop {
            let prompt = format!("{} ", ">>".cyan().bold());
            let line = match prefill.take() {
                Some(text) => rl.readline_with_initial(&prompt, (text.as_str(), "")),
                None => rl.readline(&prompt),
            };

            match line {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::NewSession => {
                            store.start_new_session();
                            continue;
                        }
                        SpecialCommand::ClearSession => {
                            if config.chat.confirm_clear
                                && !confirm(&mut rl, "Clear this conversation? [y/N] ")?
                            {
                                continue;
                            }
                            store.clear_active_session().await;
                            print_notices(&store.take_notices());
                            continue;
                        }
                        SpecialCommand::ListSessions => {
                            store.refresh_roster().await;
                            print_roster(
                                store.state().roster(),
                                Some(store.state().active_session_id()),
                            );
                            continue;
                        }
                        SpecialCommand::SwitchSession(target) => {
                            let Some(session_id) = resolve_target(&store, target) else {
                                continue;
                            };
                            if store.switch_session(&session_id) {
                                store.reload_history().await;
                            } else {
                                println!("Already in session {}\n", session_id.cyan());
                            }
                            continue;
                        }
                        SpecialCommand::Reload => {
                            store.reload_history().await;
                            continue;
                        }
                        SpecialCommand::Quick(None) => {
                            print_quick_prompts();
                            continue;
                        }
                        SpecialCommand::Quick(Some(n)) => {
                            prefill = quick_prompt(n).map(|p| p.text.to_string());
                            continue;
                        }
                        SpecialCommand::LastReply => {
                            match store.last_assistant_reply() {
                                Some(reply) => println!("\n{}\n", reply),
                                None => println!("{}", "No reply to show yet.".yellow()),
                            }
                            continue;
                        }
                        SpecialCommand::ShowStatus => {
                            print_status(&store, &base_url);
                            continue;
                        }
                        SpecialCommand::Help => {
                            print_help();
                            continue;
                        }
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {}
                    }

                    rl.add_history_entry(trimmed)?;

                    match store.send_message(&line).await {
                        SendOutcome::Rejected => {}
                        SendOutcome::Replied | SendOutcome::Discarded => {
                            if let Some(profile) = profile.as_mut() {
                                if let Err(e) = profile.record_chat() {
                                    tracing::warn!("Failed to update profile stats: {}", e);
                                }
                            }
                        }
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
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn resolve_target(store: &ChatStore, target: SessionTarget) -> Option<String> {
        match target {
            SessionTarget::Id(id) => Some(id),
            SessionTarget::Index(n) => {
                let found = n
                    .checked_sub(1)
                    .and_then(|i| store.state().roster().get(i))
                    .map(|s| s.session_id.clone());
                if found.is_none() {
                    eprintln!(
                        "{}\n",
                        format!("No session #{}; run /sessions to list them", n).red()
                    );
                }
                found
            }
        }
    }

    fn print_status(store: &ChatStore, base_url: &str) {
        let state = store.state();
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     AI Tutor Session Status                  ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("User:              {} ({})", store.user().name, store.user().id);
        println!("Session:           {}", state.active_session_id().cyan());
        println!("Conversation Size: {} messages", state.messages().len());
        println!("Known Sessions:    {}", state.roster().len());
        println!("Backend:           {}", base_url);
        println!();
    }
}
