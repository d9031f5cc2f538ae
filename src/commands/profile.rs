//! Learner profile commands

use crate::config::Config;
use crate::error::Result;
use crate::profile::{ProfileStats, ProfileStore, UserProfile};
use chrono::Utc;
use colored::Colorize;
use prettytable::{format, Table};
use serde::Serialize;

#[derive(Serialize)]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a UserProfile,
    stats: ProfileStats,
}

/// Show the profile and learning stats
///
/// # Errors
///
/// Returns error if the profile cannot be read or created
pub fn show(config: &Config, json: bool) -> Result<()> {
    let store = ProfileStore::open(config.profile.path.clone())?;
    let profile = store.profile();
    let stats = profile.stats(Utc::now());

    if json {
        let view = ProfileView { profile, stats };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Name".bold(), profile.name]);
    table.add_row(prettytable::row!["User ID".bold(), profile.id.cyan()]);
    let email = if profile.email.is_empty() {
        "-"
    } else {
        profile.email.as_str()
    };
    table.add_row(prettytable::row!["Email".bold(), email]);
    table.add_row(prettytable::row![
        "Member since".bold(),
        profile.join_date.format("%Y-%m-%d")
    ]);
    table.add_row(prettytable::row!["Skills learned".bold(), stats.skills_learned]);
    table.add_row(prettytable::row!["Chat sessions".bold(), stats.total_chats]);
    table.add_row(prettytable::row!["Days active".bold(), stats.days_active]);

    println!("\nLearner Profile:");
    table.printstd();
    if !profile.skills_learned.is_empty() {
        println!("Skills: {}", profile.skills_learned.join(", "));
    }
    println!();
    Ok(())
}

/// Update profile fields
///
/// # Errors
///
/// Returns error on invalid name/email or if the profile cannot be saved
pub fn set(
    config: &Config,
    name: Option<String>,
    email: Option<String>,
    skills: Vec<String>,
) -> Result<()> {
    let mut store = ProfileStore::open(config.profile.path.clone())?;

    if name.is_some() || email.is_some() {
        store.update(name.as_deref(), email.as_deref())?;
    }
    let added = store.add_skills(&skills)?;

    tracing::debug!("Profile saved to {}", store.path().display());
    println!("{}", "Profile updated.".green());
    if added > 0 {
        println!("Recorded {} new skill(s).", added);
    }
    Ok(())
}
