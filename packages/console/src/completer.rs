use reedline::{Completer, Span, Suggestion};

use crate::commands::{command_words, find_command};

/// Completes command words and aliases.
pub struct ConsoleCompleter {
    commands: Vec<&'static str>,
}

impl ConsoleCompleter {
    pub fn new() -> Self {
        Self {
            commands: command_words().collect(),
        }
    }
}

impl Default for ConsoleCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ConsoleCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();

        // Only the command word is completed.
        if words.is_empty() || (words.len() == 1 && !line_to_pos.ends_with(' ')) {
            let prefix = words.first().copied().unwrap_or("");
            let start = line_to_pos.rfind(prefix).unwrap_or(0);

            for cmd in &self.commands {
                if cmd.starts_with(prefix) {
                    suggestions.push(Suggestion {
                        value: cmd.to_string(),
                        description: find_command(cmd).map(|spec| spec.description.to_string()),
                        style: None,
                        extra: None,
                        span: Span::new(start, pos),
                        append_whitespace: true,
                        match_indices: None,
                    });
                }
            }
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.value.as_str()).collect()
    }

    #[test]
    fn completes_command_prefix() {
        let mut completer = ConsoleCompleter::new();

        let suggestions = completer.complete("de", 2);

        assert_eq!(values(&suggestions), vec!["delete"]);
        assert_eq!(suggestions[0].span, Span::new(0, 2));
        assert_eq!(
            suggestions[0].description.as_deref(),
            Some("Delete an object")
        );
    }

    #[test]
    fn empty_line_offers_everything() {
        let mut completer = ConsoleCompleter::new();

        let suggestions = completer.complete("", 0);

        assert_eq!(suggestions.len(), command_words().count());
    }

    #[test]
    fn arguments_are_not_completed() {
        let mut completer = ConsoleCompleter::new();

        assert!(completer.complete("show ", 5).is_empty());
        assert!(completer.complete("show 1", 6).is_empty());
    }
}
