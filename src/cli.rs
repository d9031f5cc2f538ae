//! Command-line interface definition for tutorchat
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// tutorchat - terminal client for the AI tutor service
///
/// Chat with the tutor, browse past sessions and keep a local learner
/// profile.
#[derive(Parser, Debug, Clone)]
#[command(name = "tutorchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend origin, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// User id to chat as, overriding the config file
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for tutorchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat with the tutor
    Chat {
        /// Session to open instead of the default one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Send a single prompt and print the reply
    Ask {
        /// Prompt text
        prompt: String,

        /// Session to post into
        #[arg(short, long, default_value = "default")]
        session: String,
    },

    /// Print the messages of a session
    History {
        /// Session to show
        #[arg(short, long, default_value = "default")]
        session: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known sessions
    Sessions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the messages of a session
    Clear {
        /// Session to clear
        #[arg(short, long, default_value = "default")]
        session: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check backend health
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit the local learner profile
    Profile {
        /// Profile subcommand
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Show the profile and learning stats
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update profile fields
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Skill to record as learned (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
