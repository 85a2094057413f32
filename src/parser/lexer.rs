//! Lexer (tokenizer) for Verilog/SystemVerilog source
//!
//! Converts raw source text into a flat [`Token`] stream. At each position a
//! single whitespace character is skipped, otherwise the recognizers below are
//! tried in a fixed priority order against text anchored at the cursor, and
//! the first match wins:
//!
//! 1. line comment, block comment
//! 2. string literal
//! 3. numeric literal (based, real, plain digit run, unbased `'0 '1 'x 'z`)
//! 4. directive (back-quote + identifier)
//! 5. operators and punctuation, longest form first
//! 6. reserved words (whole-word lookup)
//! 7. identifier
//!
//! The stream always ends with a synthetic [`TokenKind::Eof`]. Comments are
//! kept so that the token texts reproduce the source modulo whitespace.

use super::errors::{LexError, LexErrorKind};
use super::source::SourceInfo;
use super::token::{Token, TokenKind, OPERATORS};
use crate::config::LineEnding;
use once_cell::sync::Lazy;
use regex::Regex;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("lexer pattern")
}

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| pattern(r"^//[^\r\n]*"));
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| pattern(r"^/\*(?s:.*?)\*/"));
static STRING: Lazy<Regex> = Lazy::new(|| pattern(r#"^"(?:\\\r\n|\\(?s:.)|[^"\\\r\n])*""#));
static BASED: Lazy<Regex> =
    Lazy::new(|| pattern(r"^(?:[0-9][0-9_]*)?'[sS]?([bBoOdDhH])([0-9a-fA-FxXzZ?_]+)"));
static REAL: Lazy<Regex> = Lazy::new(|| {
    pattern(r"^[0-9][0-9_]*(?:\.[0-9][0-9_]*(?:[eE][+-]?[0-9][0-9_]*)?|[eE][+-]?[0-9][0-9_]*)")
});
static INTEGER: Lazy<Regex> = Lazy::new(|| pattern(r"^[0-9][0-9_]*"));
static UNBASED: Lazy<Regex> = Lazy::new(|| pattern(r"^'[01xXzZ]"));
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| pattern(r"^`[a-zA-Z_][a-zA-Z0-9_$]*"));
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| pattern(r"^[a-zA-Z_][a-zA-Z0-9_$]*"));

type Recognized = Result<Option<(TokenKind, usize)>, LexErrorKind>;
type Recognizer = fn(&str) -> Recognized;

/// Recognizers in priority order
const RECOGNIZERS: &[Recognizer] = &[
    lex_comment,
    lex_string,
    lex_number,
    lex_directive,
    lex_operator,
    lex_keyword,
    lex_identifier,
];

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Length of the word-like run starting at `text`, for error messages
fn word_len(text: &str) -> usize {
    text.char_indices()
        .find(|&(_, ch)| !(is_identifier_char(ch) || ch == '\''))
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn lex_comment(rest: &str) -> Recognized {
    if let Some(m) = LINE_COMMENT.find(rest) {
        return Ok(Some((TokenKind::LineComment, m.end())));
    }
    if rest.starts_with("/*") {
        return match BLOCK_COMMENT.find(rest) {
            Some(m) => Ok(Some((TokenKind::BlockComment, m.end()))),
            None => Err(LexErrorKind::UnterminatedBlockComment),
        };
    }
    Ok(None)
}

fn lex_string(rest: &str) -> Recognized {
    if !rest.starts_with('"') {
        return Ok(None);
    }
    match STRING.find(rest) {
        Some(m) => Ok(Some((TokenKind::StringLiteral, m.end()))),
        None => Err(LexErrorKind::UnterminatedString),
    }
}

fn based_digits_valid(base: &str, digits: &str) -> bool {
    let base = base.to_ascii_lowercase();
    digits.chars().all(|c| {
        matches!(c, 'x' | 'X' | 'z' | 'Z' | '?' | '_')
            || match base.as_str() {
                "b" => matches!(c, '0' | '1'),
                "o" => matches!(c, '0'..='7'),
                "d" => c.is_ascii_digit(),
                _ => c.is_ascii_hexdigit(),
            }
    })
}

fn lex_number(rest: &str) -> Recognized {
    let invalid = || LexErrorKind::InvalidLiteral(rest[..word_len(rest)].to_string());

    if let Some(caps) = BASED.captures(rest) {
        let len = caps[0].len();
        let trailing = rest[len..].chars().next().is_some_and(is_identifier_char);
        if trailing || !based_digits_valid(&caps[1], &caps[2]) {
            return Err(invalid());
        }
        return Ok(Some((TokenKind::Literal, len)));
    }

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some(m) = REAL.find(rest) {
            return Ok(Some((TokenKind::Literal, m.end())));
        }
        let len = INTEGER.find(rest).map(|m| m.end()).unwrap_or(0);
        // a size that is not followed by a valid base
        if rest[len..].starts_with('\'') {
            return Err(invalid());
        }
        return Ok(Some((TokenKind::Literal, len)));
    }

    if let Some(m) = UNBASED.find(rest) {
        if rest[m.end()..].chars().next().is_some_and(is_identifier_char) {
            return Err(invalid());
        }
        return Ok(Some((TokenKind::Literal, m.end())));
    }
    Ok(None)
}

fn lex_directive(rest: &str) -> Recognized {
    Ok(DIRECTIVE.find(rest).map(|m| (TokenKind::Directive, m.end())))
}

fn lex_operator(rest: &str) -> Recognized {
    Ok(OPERATORS
        .iter()
        .find(|(text, _)| rest.starts_with(text))
        .map(|&(text, kind)| (kind, text.len())))
}

fn lex_keyword(rest: &str) -> Recognized {
    Ok(IDENTIFIER
        .find(rest)
        .and_then(|m| TokenKind::keyword(m.as_str()).map(|kind| (kind, m.end()))))
}

fn lex_identifier(rest: &str) -> Recognized {
    Ok(IDENTIFIER.find(rest).map(|m| (TokenKind::Identifier, m.end())))
}

/// Lexer over one source buffer
pub struct Lexer<'a> {
    source: &'a SourceInfo,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceInfo) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let text = self.source.text.as_str();
        let mut tokens = Vec::new();

        loop {
            let rest = &text[self.position..];
            let Some(ch) = rest.chars().next() else {
                let location = self.source.location_of(self.position);
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    location,
                    end: location,
                    offset: self.position,
                });
                break;
            };

            if ch.is_ascii_whitespace() || ch == '\u{0b}' {
                self.position += 1;
                continue;
            }

            let (kind, len) = self.next_token(rest, ch)?;
            tokens.push(Token {
                kind,
                text: rest[..len].to_string(),
                location: self.source.location_of(self.position),
                end: self.source.location_of(self.position + len),
                offset: self.position,
            });
            self.position += len;
        }

        tracing::debug!(path = %self.source.path, tokens = tokens.len(), "lexed source");
        Ok(tokens)
    }

    fn next_token(&self, rest: &str, ch: char) -> Result<(TokenKind, usize), LexError> {
        for recognize in RECOGNIZERS {
            match recognize(rest) {
                Ok(Some(found)) => return Ok(found),
                Ok(None) => {}
                Err(kind) => return Err(self.error(kind, rest)),
            }
        }
        let kind = if ch == '\\' {
            LexErrorKind::UnexpectedEscape
        } else {
            LexErrorKind::UnrecognizedCharacter(ch)
        };
        Err(self.error(kind, rest))
    }

    fn error(&self, kind: LexErrorKind, rest: &str) -> LexError {
        let location = self.source.location_of(self.position);
        let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
        LexError {
            kind,
            location,
            remaining: rest[..line_end].to_string(),
            context: self.source.error_context(location),
        }
    }
}

/// Tokenize `text` with LF line endings; convenience for tools and tests.
pub fn lex(text: &str) -> Result<Vec<Token>, LexError> {
    let source = SourceInfo::new(text, "<input>", LineEnding::Lf);
    Lexer::new(&source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;
    use rstest::rstest;

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(text)
            .expect("lexing failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = lex("module m; endmodule").unwrap();
        assert_eq!(tokens.len(), 5);
        assert!(tokens[0].is(TokenKind::Module));
        assert!(tokens[1].is(TokenKind::Identifier));
        assert_eq!(tokens[1].text, "m");
        assert!(tokens[2].is(TokenKind::Semicolon));
        assert!(tokens[3].is(TokenKind::EndModule));
        assert!(tokens[4].is(TokenKind::Eof));
        assert_eq!(tokens[3].location, SourceLocation::new(1, 11));
        assert_eq!(tokens[3].end, SourceLocation::new(1, 20));
    }

    #[rstest]
    #[case("<<<=", TokenKind::ArithLeftShiftAssignment)]
    #[case(">>>=", TokenKind::ArithRightShiftAssignment)]
    #[case("<<<", TokenKind::ArithLeftShift)]
    #[case("<<=", TokenKind::LogicLeftShiftAssignment)]
    #[case("<<", TokenKind::LogicLeftShift)]
    #[case("<=", TokenKind::LessEqual)]
    #[case("<->", TokenKind::Equivalence)]
    #[case("==?", TokenKind::WildcardEqual)]
    #[case("!==", TokenKind::CaseInequal)]
    #[case("+:", TokenKind::PlusColon)]
    #[case("::", TokenKind::ScopeResolution)]
    #[case("begin", TokenKind::Begin)]
    #[case("begin_keyword_2", TokenKind::Identifier)]
    #[case("always_ff", TokenKind::AlwaysFf)]
    #[case("endmodule", TokenKind::EndModule)]
    #[case("ns", TokenKind::NanoSecond)]
    #[case("nsx", TokenKind::Identifier)]
    #[case("data$1", TokenKind::Identifier)]
    #[case("`timescale", TokenKind::Directive)]
    #[case("\"a\\\"b\"", TokenKind::StringLiteral)]
    #[case("16'sh17ff", TokenKind::Literal)]
    #[case("'o777", TokenKind::Literal)]
    #[case("8'bxx_01", TokenKind::Literal)]
    #[case("1_000", TokenKind::Literal)]
    #[case("3.14e-2", TokenKind::Literal)]
    #[case("'1", TokenKind::Literal)]
    #[case("// note", TokenKind::LineComment)]
    #[case("/* a\n b */", TokenKind::BlockComment)]
    fn test_single_token(#[case] text: &str, #[case] expected: TokenKind) {
        let tokens = lex(text).unwrap();
        assert_eq!(tokens.len(), 2, "{text:?} should be one token");
        assert_eq!(tokens[0].kind, expected);
        assert_eq!(tokens[0].text, text);
    }

    #[test]
    fn test_time_literal_splits() {
        assert_eq!(
            kinds("#10ns"),
            vec![
                TokenKind::Sharp,
                TokenKind::Literal,
                TokenKind::NanoSecond,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_block_comment_is_shortest_match() {
        let tokens = lex("/* a */ b /* c */").unwrap();
        assert_eq!(tokens[0].text, "/* a */");
        assert!(tokens[1].is(TokenKind::Identifier));
        assert!(tokens[2].is(TokenKind::BlockComment));
    }

    #[test]
    fn test_string_line_continuation() {
        let tokens = lex("\"Humpty \\\n Dumpty\" x").unwrap();
        assert!(tokens[0].is(TokenKind::StringLiteral));
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[1].location, SourceLocation::new(2, 10));
    }

    #[test]
    fn test_unpacked_array_quote() {
        assert_eq!(
            kinds("'{1}"),
            vec![
                TokenKind::SingleQuote,
                TokenKind::LBrace,
                TokenKind::Literal,
                TokenKind::RBrace,
                TokenKind::Eof
            ]
        );
    }

    #[rstest]
    #[case("\"abc", LexErrorKind::UnterminatedString)]
    #[case("\"ab\ncd\"", LexErrorKind::UnterminatedString)]
    #[case("/* never closed", LexErrorKind::UnterminatedBlockComment)]
    #[case("a \\b", LexErrorKind::UnexpectedEscape)]
    #[case("x \u{a7}", LexErrorKind::UnrecognizedCharacter('\u{a7}'))]
    #[case("4'b102", LexErrorKind::InvalidLiteral("4'b102".to_string()))]
    #[case("8'hFG", LexErrorKind::InvalidLiteral("8'hFG".to_string()))]
    #[case("8'q1", LexErrorKind::InvalidLiteral("8'q1".to_string()))]
    fn test_lex_errors(#[case] text: &str, #[case] expected: LexErrorKind) {
        let err = lex(text).unwrap_err();
        assert_eq!(err.kind, expected);
    }

    #[test]
    fn test_error_reports_position_and_remaining() {
        let err = lex("wire a;\nwire \\b;\nwire c;").unwrap_err();
        assert_eq!(err.location, SourceLocation::new(2, 6));
        assert_eq!(err.remaining, "\\b;");
        assert!(err.context.contains("2 | wire \\b;"));
    }

    #[test]
    fn test_crlf_positions() {
        let source = SourceInfo::new("a\r\n  b", "t.sv", LineEnding::CrLf);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
    }
}
