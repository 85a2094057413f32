//! Lexer and parser error types
//!
//! Every failure is fatal: the first error aborts the whole parse and carries
//! its position plus a rendered context window (see
//! [`SourceInfo::error_context`]).

use super::ast::SourceLocation;
use super::source::SourceInfo;
use super::token::TokenKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),
    #[error("unrecognized character '{0}'")]
    UnrecognizedCharacter(char),
    #[error("unexpected escape outside a string literal")]
    UnexpectedEscape,
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {location}\n{context}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
    /// Unlexed text from the error position to the end of its line
    pub remaining: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("lexical error: {0}")]
    Lexical(LexErrorKind),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    #[error("no matching {close} for {open}")]
    UnmatchedPair { open: TokenKind, close: TokenKind },
    #[error("invalid token {found} for expression")]
    InvalidExpressionToken { found: String },
    #[error("unsupported directive '{0}'")]
    UnsupportedDirective(String),
    #[error("directive '{0}' is rejected, macros are not expanded")]
    RejectedDirective(String),
    #[error("unimplemented construct starting with {0}")]
    Unimplemented(String),
    #[error("{0}")]
    Malformed(String),
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {location}\n{context}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub location: SourceLocation,
    pub context: String,
}

impl ParseError {
    pub fn new(kind: ErrorKind, location: SourceLocation, source: &SourceInfo) -> Self {
        Self {
            kind,
            location,
            context: source.error_context(location),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            kind: ErrorKind::Lexical(err.kind),
            location: err.location,
            context: err.context,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;

    #[test]
    fn test_lex_error_converts() {
        let err = LexError {
            kind: LexErrorKind::UnrecognizedCharacter('\u{a7}'),
            location: SourceLocation::new(1, 3),
            remaining: "\u{a7}x".to_string(),
            context: String::new(),
        };
        let parse_err: ParseError = err.into();
        assert_eq!(parse_err.location, SourceLocation::new(1, 3));
        assert!(matches!(
            parse_err.kind,
            ErrorKind::Lexical(LexErrorKind::UnrecognizedCharacter(_))
        ));
    }

    #[test]
    fn test_display_includes_context() {
        let info = SourceInfo::new("module m; wire a endmodule", "m.sv", LineEnding::Lf);
        let err = ParseError::new(
            ErrorKind::UnexpectedEnd {
                expected: "';'".to_string(),
            },
            SourceLocation::new(1, 17),
            &info,
        );
        let text = err.to_string();
        assert!(text.starts_with("unexpected end of input, expected ';' at line 1, column 17"));
        assert!(text.contains("1 | module m; wire a endmodule"));
    }
}
