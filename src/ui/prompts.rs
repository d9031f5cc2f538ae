//! Greeting and quick-start prompts

/// A canned prompt offered on the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickPrompt {
    /// Text placed in the input line
    pub text: &'static str,
    /// Subject shown next to the prompt
    pub category: &'static str,
}

/// Quick-start prompts, numbered from 1 in the UI
pub const QUICK_PROMPTS: [QuickPrompt; 6] = [
    QuickPrompt {
        text: "Test my Python skills",
        category: "Programming",
    },
    QuickPrompt {
        text: "Give me a vocabulary quiz",
        category: "Language",
    },
    QuickPrompt {
        text: "Explain a math concept",
        category: "Mathematics",
    },
    QuickPrompt {
        text: "Suggest learning resources",
        category: "Study Tips",
    },
    QuickPrompt {
        text: "Help me brainstorm ideas",
        category: "Creativity",
    },
    QuickPrompt {
        text: "Review my progress",
        category: "Analysis",
    },
];

/// Look up a quick prompt by its 1-based number
pub fn quick_prompt(number: usize) -> Option<&'static QuickPrompt> {
    number.checked_sub(1).and_then(|i| QUICK_PROMPTS.get(i))
}

/// Greeting for a local hour of day (0-23)
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "Good morning");
        assert_eq!(greeting_for_hour(11), "Good morning");
        assert_eq!(greeting_for_hour(12), "Good afternoon");
        assert_eq!(greeting_for_hour(17), "Good afternoon");
        assert_eq!(greeting_for_hour(18), "Good evening");
        assert_eq!(greeting_for_hour(23), "Good evening");
    }

    #[test]
    fn test_quick_prompt_numbering() {
        assert!(quick_prompt(0).is_none());
        assert_eq!(quick_prompt(1).unwrap().category, "Programming");
        assert_eq!(quick_prompt(6).unwrap().text, "Review my progress");
        assert!(quick_prompt(7).is_none());
    }
}
