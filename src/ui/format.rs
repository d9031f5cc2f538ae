//! Inline styling of message bodies
//!
//! Display-only: the stored text is never modified. Supports `**bold**`,
//! `*italic*`, bold numbered-list prefixes and `-`/`•` bullets. Blank lines
//! are dropped.

use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;

/// A run of text with one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Unstyled text
    Plain(String),
    /// Bold text
    Bold(String),
    /// Italic text
    Italic(String),
}

/// One displayed line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    /// Spans in display order
    pub spans: Vec<Span>,
}

impl StyledLine {
    /// Text of the line without styling
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span {
                Span::Plain(s) | Span::Bold(s) | Span::Italic(s) => s.as_str(),
            })
            .collect()
    }
}

fn inline_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*").expect("valid inline pattern"))
}

fn numbered_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\s").expect("valid numbered pattern"))
}

fn push_inline(spans: &mut Vec<Span>, text: &str) {
    let mut last = 0;
    for caps in inline_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::Plain(text[last..whole.start()].to_string()));
        }
        if let Some(bold) = caps.get(1) {
            spans.push(Span::Bold(bold.as_str().to_string()));
        } else if let Some(italic) = caps.get(2) {
            spans.push(Span::Italic(italic.as_str().to_string()));
        }
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::Plain(text[last..].to_string()));
    }
}

fn style_line(line: &str) -> StyledLine {
    let mut spans = Vec::new();

    if let Some(prefix) = numbered_prefix().find(line) {
        spans.push(Span::Bold(prefix.as_str().to_string()));
        push_inline(&mut spans, &line[prefix.end()..]);
    } else if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("• "))
    {
        spans.push(Span::Plain("• ".to_string()));
        push_inline(&mut spans, rest);
    } else {
        push_inline(&mut spans, line);
    }

    StyledLine { spans }
}

/// Split a message body into styled, non-blank lines
///
/// # Examples
///
/// ```
/// use tutorchat::ui::format::{style_body, Span};
///
/// let lines = style_body("1. **Ownership**\n\n- borrow *carefully*");
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].spans[0], Span::Bold("1. ".to_string()));
/// assert_eq!(lines[1].plain_text(), "• borrow carefully");
/// ```
pub fn style_body(text: &str) -> Vec<StyledLine> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(style_line)
        .collect()
}

/// Render a styled line with terminal colors
pub fn render_line(line: &StyledLine) -> String {
    line.spans
        .iter()
        .map(|span| match span {
            Span::Plain(s) => s.normal().to_string(),
            Span::Bold(s) => s.bold().to_string(),
            Span::Italic(s) => s.italic().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Span {
        Span::Plain(s.to_string())
    }

    #[test]
    fn test_plain_text_is_single_span() {
        let lines = style_body("Just text");
        assert_eq!(lines, vec![StyledLine { spans: vec![plain("Just text")] }]);
    }

    #[test]
    fn test_bold_and_italic() {
        let lines = style_body("A **strong** and *soft* word");
        assert_eq!(
            lines[0].spans,
            vec![
                plain("A "),
                Span::Bold("strong".to_string()),
                plain(" and "),
                Span::Italic("soft".to_string()),
                plain(" word"),
            ]
        );
    }

    #[test]
    fn test_numbered_prefix_is_bold() {
        let lines = style_body("12. Practice daily");
        assert_eq!(
            lines[0].spans,
            vec![Span::Bold("12. ".to_string()), plain("Practice daily")]
        );
    }

    #[test]
    fn test_bullets_are_normalized() {
        let lines = style_body("- dash\n• dot\n-not a bullet");
        assert_eq!(lines[0].plain_text(), "• dash");
        assert_eq!(lines[1].plain_text(), "• dot");
        assert_eq!(lines[2].plain_text(), "-not a bullet");
    }

    #[test]
    fn test_blank_lines_dropped() {
        let lines = style_body("first\n\n   \nsecond\n");
        let texts: Vec<String> = lines.iter().map(|l| l.plain_text()).collect();
        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_unmatched_asterisk_is_plain() {
        let lines = style_body("2 * 3 = 6");
        assert_eq!(lines[0].spans, vec![plain("2 * 3 = 6")]);
    }

    #[test]
    fn test_render_keeps_text() {
        colored::control::set_override(false);
        let lines = style_body("**Hi** there");
        assert_eq!(render_line(&lines[0]), "Hi there");
    }
}
