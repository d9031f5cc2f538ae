//! Terminal rendering of the chat state
//!
//! [`ChatView`] is registered as the store's [`StateObserver`] and prints
//! whatever is new after each change, so the newest message is always the
//! last thing on screen.

use crate::gateway::{Message, Sender, SessionSummary};
use crate::store::{Change, ChatState, Notice, NoticeLevel, StateObserver, UserIdentity};
use crate::ui::format::{render_line, style_body};
use crate::ui::prompts::QUICK_PROMPTS;
use chrono::Local;
use colored::Colorize;
use prettytable::{format, Table};
use std::io::Write;

const TYPING_LINE: &str = "AI Tutor is typing...";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Label shown above a message
fn sender_label(sender: Sender) -> String {
    match sender {
        Sender::User => "You".cyan().bold().to_string(),
        Sender::Assistant => "AI Tutor".green().bold().to_string(),
    }
}

/// Format one message for the terminal
///
/// The body is styled line by line and indented under a sender label.
pub fn format_message(message: &Message, show_timestamps: bool) -> String {
    let mut out = sender_label(message.sender);
    if show_timestamps {
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        out.push_str(&format!(" {}", time.to_string().dimmed()));
    }
    out.push('\n');
    for line in style_body(&message.text) {
        out.push_str("  ");
        out.push_str(&render_line(&line));
        out.push('\n');
    }
    out
}

/// Print the session roster as a table, marking the active session
pub fn print_roster(roster: &[SessionSummary], active: Option<&str>) {
    if roster.is_empty() {
        println!("{}", "No previous sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Session".bold(),
        "Started".bold(),
        "Messages".bold()
    ]);

    for (i, session) in roster.iter().enumerate() {
        let marker = if Some(session.session_id.as_str()) == active {
            format!("{}*", i + 1).green().to_string()
        } else {
            (i + 1).to_string()
        };
        let started = session
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        table.add_row(prettytable::row![
            marker,
            session.session_id.cyan(),
            started,
            session.message_count
        ]);
    }

    table.printstd();
}

/// Print notices, success in green and failure in red
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.text.green()),
            NoticeLevel::Failure => println!("{}", notice.text.red()),
        }
    }
}

/// Print the numbered quick-start prompts
pub fn print_quick_prompts() {
    println!("\nQuick Start:");
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            prompt.text,
            format!("({})", prompt.category).dimmed()
        );
    }
    println!("Use {} to load one into the prompt.\n", "/quick <n>".cyan());
}

/// Print the welcome banner
pub fn print_banner(user: &UserIdentity, greeting: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  AI Tutor - Interactive Chat                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("{}, {}!", greeting, user.name.bold());
    println!("Ready to learn something new today? Let's explore your potential together.");
    print_quick_prompts();
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

/// Incremental renderer for the chat log
pub struct ChatView {
    out: Box<dyn Write + Send>,
    show_timestamps: bool,
    rendered: usize,
    header_epoch: Option<u64>,
    typing_visible: bool,
}

impl ChatView {
    /// View writing to stdout
    pub fn stdout(show_timestamps: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), show_timestamps)
    }

    /// View writing to an arbitrary sink
    pub fn with_writer(out: Box<dyn Write + Send>, show_timestamps: bool) -> Self {
        Self {
            out,
            show_timestamps,
            rendered: 0,
            header_epoch: None,
            typing_visible: false,
        }
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::debug!("Failed to write chat output: {}", e);
        }
    }

    fn hide_typing(&mut self) {
        if self.typing_visible {
            self.emit(CLEAR_LINE);
            self.typing_visible = false;
        }
    }

    fn show_typing(&mut self) {
        if !self.typing_visible {
            let line = TYPING_LINE.dimmed().to_string();
            self.emit(&line);
            self.typing_visible = true;
        }
    }

    fn redraw(&mut self, state: &ChatState) {
        // A header for this epoch with nothing under it yet is reused
        if self.header_epoch != Some(state.epoch()) || self.rendered > 0 {
            let header = format!(
                "\n── Session {} ──\n",
                state.active_session_id().cyan()
            );
            self.emit(&header);
            self.header_epoch = Some(state.epoch());
        }
        self.rendered = 0;
        self.render_new(state);
    }

    fn render_new(&mut self, state: &ChatState) {
        let messages = state.messages();
        if self.rendered > messages.len() {
            self.rendered = 0;
        }
        let fresh: Vec<String> = messages[self.rendered..]
            .iter()
            .map(|m| format_message(m, self.show_timestamps))
            .collect();
        for block in fresh {
            self.emit(&block);
        }
        self.rendered = messages.len();
    }
}

impl StateObserver for ChatView {
    fn on_change(&mut self, state: &ChatState, change: Change) {
        match change {
            Change::SessionReplaced | Change::HistoryLoaded => {
                self.hide_typing();
                self.redraw(state);
            }
            Change::MessageAppended => {
                self.hide_typing();
                self.render_new(state);
            }
            Change::AwaitingReply(true) => self.show_typing(),
            Change::AwaitingReply(false) => self.hide_typing(),
            Change::RosterUpdated => {}
        }
    }
}
