//! One-shot commands against the tutor backend
//!
//! Unlike the interactive chat, these surface backend failures as errors
//! so scripts get a non-zero exit status. `ask` is the exception: it goes
//! through the chat store and prints the fallback reply like the chat
//! does.

use crate::commands::{confirm, open_profile, peek_profile, resolve_identity};
use crate::config::Config;
use crate::error::{Result, TutorError};
use crate::gateway::{Gateway, HealthReport, HttpGateway};
use crate::store::{ChatStore, SendOutcome};
use crate::ui::{format_message, print_roster};
use colored::Colorize;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Send one prompt and print the reply
///
/// # Errors
///
/// Returns error if the gateway cannot be built or the prompt is blank
pub async fn ask(config: &Config, prompt: &str, session: &str) -> Result<()> {
    let mut profile = open_profile(config);
    let user = resolve_identity(config, profile.as_ref());
    let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
    let mut store = ChatStore::new(gateway, user, Some(session.to_string()));

    match store.send_message(prompt).await {
        SendOutcome::Rejected => {
            return Err(TutorError::Input("Prompt cannot be empty".to_string()).into());
        }
        SendOutcome::Replied | SendOutcome::Discarded => {
            if let Some(profile) = profile.as_mut() {
                if let Err(e) = profile.record_chat() {
                    tracing::warn!("Failed to update profile stats: {}", e);
                }
            }
        }
    }

    if let Some(reply) = store.state().last_assistant_reply() {
        print!("{}", format_message(reply, false));
    }
    Ok(())
}

/// Print the messages of a session
///
/// # Errors
///
/// Returns error if the backend cannot be reached or answers badly
pub async fn history(config: &Config, session: &str, json: bool) -> Result<()> {
    let user = resolve_identity(config, peek_profile(config).as_ref());
    let gateway = HttpGateway::new(&config.gateway)?;
    let messages = gateway
        .fetch_history(&user.id, session)
        .await
        .map_err(|e| TutorError::Gateway(format!("Failed to load history: {}", e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!(
            "{}",
            format!("No messages in session {}.", session).yellow()
        );
        return Ok(());
    }
    for message in &messages {
        println!("{}", format_message(message, config.chat.show_timestamps));
    }
    Ok(())
}

/// List the sessions known for the user
///
/// # Errors
///
/// Returns error if the backend cannot be reached or answers badly
pub async fn sessions(config: &Config, json: bool) -> Result<()> {
    let user = resolve_identity(config, peek_profile(config).as_ref());
    let gateway = HttpGateway::new(&config.gateway)?;
    let roster = gateway
        .fetch_sessions(&user.id)
        .await
        .map_err(|e| TutorError::Gateway(format!("Failed to load sessions: {}", e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&roster)?);
    } else {
        print_roster(&roster, None);
        if !roster.is_empty() {
            println!(
                "Use {} to continue a session.",
                "tutorchat chat --session <ID>".cyan()
            );
        }
    }
    Ok(())
}

/// Delete the messages of a session
///
/// # Errors
///
/// Returns error if the backend refuses or cannot be reached
pub async fn clear(config: &Config, session: &str, yes: bool) -> Result<()> {
    if !yes {
        let mut rl = DefaultEditor::new()?;
        let question = format!("Clear all messages in session {}? [y/N] ", session);
        if !confirm(&mut rl, &question)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let user = resolve_identity(config, peek_profile(config).as_ref());
    let gateway = HttpGateway::new(&config.gateway)?;
    match gateway.clear_session(&user.id, session).await {
        Ok(true) => {
            println!("{}", "Chat cleared successfully!".green());
            Ok(())
        }
        Ok(false) => Err(TutorError::Gateway(
            "Error clearing chat. Please try again.".to_string(),
        )
        .into()),
        Err(e) => Err(TutorError::Gateway(format!("Failed to clear session: {}", e)).into()),
    }
}

fn print_health(report: &HealthReport) {
    let status = if report.is_healthy() {
        report.status.green()
    } else {
        report.status.red()
    };
    println!("Status:   {}", status);
    println!(
        "Database: {} ({})",
        if report.database.connected {
            "connected".green()
        } else {
            "disconnected".red()
        },
        report.database.message
    );
    println!(
        "Model:    {}",
        report.selected_model.as_deref().unwrap_or("-")
    );
    if let Some(timestamp) = &report.timestamp {
        println!("Checked:  {}", timestamp);
    }
}

/// Probe backend health
///
/// # Errors
///
/// Returns error if the backend cannot be reached or reports unhealthy
pub async fn health(config: &Config, json: bool) -> Result<()> {
    let gateway = HttpGateway::new(&config.gateway)?;
    let report = gateway
        .health()
        .await
        .map_err(|e| TutorError::Gateway(format!("Health check failed: {}", e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_health(&report);
    }

    if !report.is_healthy() {
        return Err(TutorError::Gateway(format!(
            "Backend at {} is {}",
            gateway.base_url(),
            report.status
        ))
        .into());
    }
    Ok(())
}
