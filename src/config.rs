//! Parse configuration
//!
//! [`ParseOptions`] carries everything a single parse needs besides the
//! source text itself: the end-of-line convention used to split lines for
//! position tracking, the path shown in diagnostics, and whether module
//! bodies are parsed or only module headers.

use std::fmt;

/// End-of-line convention of a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Guess the convention from the first line break found in `text`.
    ///
    /// Text without any line break is reported as [`LineEnding::Lf`].
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => return LineEnding::Lf,
                b'\r' => {
                    return if bytes.get(i + 1) == Some(&b'\n') {
                        LineEnding::CrLf
                    } else {
                        LineEnding::Cr
                    };
                }
                _ => {}
            }
        }
        LineEnding::Lf
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "LF"),
            LineEnding::CrLf => write!(f, "CRLF"),
            LineEnding::Cr => write!(f, "CR"),
        }
    }
}

/// Options for one parse invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub line_ending: LineEnding,
    /// Display path used only in diagnostics
    pub path: String,
    /// When false, module spans are still isolated but only headers are parsed
    pub parse_bodies: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            path: "<input>".to_string(),
            parse_bodies: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_parse_bodies(mut self, parse_bodies: bool) -> Self {
        self.parse_bodies = parse_bodies;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_endings() {
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("single line"), LineEnding::Lf);
    }

    #[test]
    fn test_builder() {
        let opts = ParseOptions::new()
            .with_path("top.sv")
            .with_line_ending(LineEnding::CrLf)
            .with_parse_bodies(false);
        assert_eq!(opts.path, "top.sv");
        assert_eq!(opts.line_ending.as_str(), "\r\n");
        assert!(!opts.parse_bodies);
    }
}
