//! Source text bookkeeping
//!
//! [`SourceInfo`] keeps the original text together with a line-start table so
//! that byte offsets convert to [`SourceLocation`]s by binary search, and
//! renders the context window shown under every error.

use super::ast::SourceLocation;
use crate::config::LineEnding;

/// Lines shown above and below the offending line
const CONTEXT_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: String,
    pub text: String,
    pub line_ending: LineEnding,
    /// Byte offset where each line starts; always non-empty
    line_starts: Vec<usize>,
}

impl SourceInfo {
    pub fn new(text: &str, path: impl Into<String>, line_ending: LineEnding) -> Self {
        let eol = line_ending.as_str();
        let mut line_starts = vec![0];
        let mut search_from = 0;
        while let Some(found) = text[search_from..].find(eol) {
            search_from += found + eol.len();
            line_starts.push(search_from);
        }
        Self {
            path: path.into(),
            text: text.to_string(),
            line_ending,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a 1-based line and column.
    pub fn location_of(&self, offset: usize) -> SourceLocation {
        let line_index = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        SourceLocation::new(line_index + 1, offset - self.line_starts[line_index] + 1)
    }

    /// Text of a 1-based line without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let index = line.checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = match self.line_starts.get(index + 1) {
            Some(next) => next - self.line_ending.as_str().len(),
            None => self.text.len(),
        };
        self.text.get(start..end)
    }

    /// Render the offending line with two lines of context on each side and
    /// a caret under the column.
    pub fn error_context(&self, location: SourceLocation) -> String {
        let first = location.line.saturating_sub(CONTEXT_LINES).max(1);
        let last = (location.line + CONTEXT_LINES).min(self.line_count());
        let width = last.to_string().len();

        let mut out = format!("{:>width$}--> {} ({})", "", self.path, location);
        for line in first..=last {
            let text = self.line(line).unwrap_or("");
            out.push_str(&format!("\n{:>width$} | {}", line, text));
            if line == location.line {
                let pad = " ".repeat(location.column.saturating_sub(1));
                out.push_str(&format!("\n{:>width$} | {}^", "", pad));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_of() {
        let info = SourceInfo::new("ab\ncd\n\nef", "t.sv", LineEnding::Lf);
        assert_eq!(info.location_of(0), SourceLocation::new(1, 1));
        assert_eq!(info.location_of(2), SourceLocation::new(1, 3));
        assert_eq!(info.location_of(3), SourceLocation::new(2, 1));
        assert_eq!(info.location_of(6), SourceLocation::new(3, 1));
        assert_eq!(info.location_of(8), SourceLocation::new(4, 2));
        assert_eq!(info.location_of(9), SourceLocation::new(4, 3));
    }

    #[test]
    fn test_crlf_lines() {
        let info = SourceInfo::new("ab\r\ncd", "t.sv", LineEnding::CrLf);
        assert_eq!(info.line_count(), 2);
        assert_eq!(info.line(1), Some("ab"));
        assert_eq!(info.line(2), Some("cd"));
        assert_eq!(info.location_of(4), SourceLocation::new(2, 1));
    }

    #[test]
    fn test_error_context_window() {
        let text = "l1\nl2\nl3\nl4\nl5\nl6";
        let info = SourceInfo::new(text, "t.sv", LineEnding::Lf);
        let rendered = info.error_context(SourceLocation::new(4, 2));
        assert!(rendered.contains("--> t.sv (line 4, column 2)"));
        assert!(!rendered.contains("l1"));
        assert!(rendered.contains("2 | l2"));
        assert!(rendered.contains("6 | l6"));
        assert!(rendered.contains("  |  ^"));
    }
}
