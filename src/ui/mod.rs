//! Presentation layer
//!
//! Everything that turns chat state into terminal output: message
//! styling, the incremental chat view, tables and the start screen.

pub mod format;
pub mod prompts;
pub mod view;

pub use prompts::{greeting_for_hour, quick_prompt, QuickPrompt, QUICK_PROMPTS};
pub use view::{format_message, print_notices, print_roster, ChatView};
