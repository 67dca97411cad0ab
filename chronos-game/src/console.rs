//! In-process log buffer rendered as the game console.
use serde::{Deserialize, Serialize};

/// Visual tone of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Plain,
    Success,
    Warning,
    Error,
    Question,
    Treasure,
}

impl Tone {
    /// CSS class used by the web console.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Question => "question",
            Self::Treasure => "treasure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Console {
    lines: Vec<LogLine>,
}

impl Console {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, tone: Tone, text: impl Into<String>) {
        self.lines.push(LogLine {
            text: text.into(),
            tone,
        });
    }

    pub fn plain(&mut self, text: impl Into<String>) {
        self.push(Tone::Plain, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Tone::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Tone::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Tone::Error, text);
    }

    pub fn question(&mut self, text: impl Into<String>) {
        self.push(Tone::Question, text);
    }

    pub fn treasure(&mut self, text: impl Into<String>) {
        self.push(Tone::Treasure, text);
    }

    pub fn blank(&mut self) {
        self.plain("");
    }

    #[must_use]
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines appended since `mark` (a previous [`Console::len`]).
    #[must_use]
    pub fn since(&self, mark: usize) -> &[LogLine] {
        self.lines.get(mark..).unwrap_or(&[])
    }

    /// True if any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_returns_only_new_lines() {
        let mut console = Console::new();
        console.success("one");
        let mark = console.len();
        console.error("two");
        console.blank();
        let fresh = console.since(mark);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].tone, Tone::Error);
        assert!(console.since(99).is_empty());
        assert!(console.contains("two"));
    }

    #[test]
    fn tones_map_to_css_classes() {
        assert_eq!(Tone::Plain.css_class(), "");
        assert_eq!(Tone::Treasure.css_class(), "treasure");
    }
}
