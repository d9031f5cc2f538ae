//! Special commands parser for interactive chat
//!
//! Special commands control the session instead of being sent to the
//! tutor. They are prefixed with `/` and the command word is
//! case-insensitive; arguments such as session ids keep their case.

use crate::ui::prompts::QUICK_PROMPTS;
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

/// Session named by `/switch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    /// 1-based position in the last printed roster, written `#n`
    Index(usize),
    /// Literal session id
    Id(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a fresh session
    NewSession,

    /// Delete the active session on the backend, then start fresh
    ClearSession,

    /// Refresh and print the session roster
    ListSessions,

    /// Make another session active and load its history
    SwitchSession(SessionTarget),

    /// Reload the active session's history
    Reload,

    /// List quick prompts, or load prompt `n` into the input line
    Quick(Option<usize>),

    /// Reprint the last tutor reply unstyled, for copying
    LastReply,

    /// Display session status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send as a prompt
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognised `/` command,
/// `CommandError::MissingArgument` when `/switch` has no target and
/// `CommandError::UnsupportedArgument` for a bad `/quick` number, a bad
/// `/switch #n` index or an argument to a command that takes none.
///
/// # Examples
///
/// ```
/// use tutorchat::commands::special_commands::{
///     parse_special_command, SessionTarget, SpecialCommand,
/// };
///
/// let cmd = parse_special_command("/switch session_ada_17").unwrap();
/// assert_eq!(
///     cmd,
///     SpecialCommand::SwitchSession(SessionTarget::Id("session_ada_17".to_string()))
/// );
///
/// let cmd = parse_special_command("What is a prime number?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
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

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    let no_arg = |command: SpecialCommand| {
        if arg.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: word.clone(),
                arg: arg.to_string(),
            })
        }
    };

    match word.as_str() {
        "/new" => no_arg(SpecialCommand::NewSession),
        "/clear" => no_arg(SpecialCommand::ClearSession),
        "/sessions" => no_arg(SpecialCommand::ListSessions),
        "/reload" => no_arg(SpecialCommand::Reload),
        "/last" => no_arg(SpecialCommand::LastReply),
        "/status" => no_arg(SpecialCommand::ShowStatus),
        "/help" | "/?" => no_arg(SpecialCommand::Help),
        "/exit" | "/quit" => no_arg(SpecialCommand::Exit),

        "/switch" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/switch".to_string(),
                    usage: "/switch <session-id|#n>".to_string(),
                });
            }
            let target = match arg.strip_prefix('#') {
                Some(index) => match index.parse::<usize>() {
                    Ok(index) if index > 0 => SessionTarget::Index(index),
                    _ => {
                        return Err(CommandError::UnsupportedArgument {
                            command: "/switch".to_string(),
                            arg: arg.to_string(),
                        })
                    }
                },
                None => SessionTarget::Id(arg.to_string()),
            };
            Ok(SpecialCommand::SwitchSession(target))
        }

        "/quick" => {
            if arg.is_empty() {
                return Ok(SpecialCommand::Quick(None));
            }
            match arg.parse::<usize>() {
                Ok(n) if (1..=QUICK_PROMPTS.len()).contains(&n) => {
                    Ok(SpecialCommand::Quick(Some(n)))
                }
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/quick".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

SESSIONS:
  /new            - Start a new session
  /clear          - Delete the current session's messages and start fresh
  /sessions       - List previous sessions
  /switch <id>    - Open a session by id
  /switch #<n>    - Open session number n from /sessions
  /reload         - Reload the current session's history

PROMPTS:
  /quick          - List quick-start prompts
  /quick <n>      - Load quick-start prompt n into the input line
  /last           - Reprint the tutor's last reply as plain text

SESSION INFORMATION:
  /status         - Show identity, session and backend
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Command names are case-insensitive; session ids are not
  - Regular text (not starting with /) is sent to the tutor
  - Only one question can be in flight at a time
"#
    );
}
