use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::find_command;

/// Colors the command word and, for `add`/`save`, the fields after `|`.
#[derive(Debug, Default)]
pub struct ConsoleHighlighter;

impl ConsoleHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for ConsoleHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let (word, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let spec = find_command(word);
        let word_style = if spec.is_some() {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((word_style, word.to_string()));

        if rest.is_empty() {
            return styled;
        }

        match spec.map(|spec| spec.name) {
            Some("add") | Some("save") => match rest.find('|') {
                Some(bar) => {
                    styled.push((Style::new(), rest[..bar].to_string()));
                    styled.push((Style::new().fg(Color::DarkGray), "|".to_string()));
                    styled.push((Style::new().fg(Color::Green), rest[bar + 1..].to_string()));
                }
                None => styled.push((Style::new(), rest.to_string())),
            },
            Some("show") | Some("get") | Some("edit") | Some("delete") => {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            _ => styled.push((Style::new(), rest.to_string())),
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_empty_returns_empty() {
        let styled = ConsoleHighlighter::new().highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_known_command_bold_cyan() {
        let styled = ConsoleHighlighter::new().highlight("LIST", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].1, "LIST");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);
    }

    #[test]
    fn highlight_unknown_command_red() {
        let styled = ConsoleHighlighter::new().highlight("read /x", 0);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
        assert_eq!(styled.buffer[1].1, " /x");
    }

    #[test]
    fn highlight_target_argument() {
        let styled = ConsoleHighlighter::new().highlight("rm 3", 0);
        assert_eq!(styled.buffer[1].1, " 3");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_fields_after_bar() {
        let styled = ConsoleHighlighter::new().highlight("add Widget | color:blue", 0);
        assert_eq!(styled.buffer.len(), 4);
        assert_eq!(styled.buffer[1].1, " Widget ");
        assert_eq!(styled.buffer[2].1, "|");
        assert_eq!(styled.buffer[3].1, " color:blue");
        assert_eq!(styled.buffer[3].0.foreground, Some(Color::Green));
    }

    #[test]
    fn highlight_add_without_fields() {
        let styled = ConsoleHighlighter::new().highlight("add Widget", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[1].0.foreground, None);
    }
}
