//! Cursor over a bounded slice of the token arena
//!
//! A [`Context`] never owns tokens: it is a `Copy` view made of the shared
//! arena, absolute `[start, end)` bounds and a cursor. Structural routines
//! isolate a balanced span with one of the scanning primitives and then parse
//! a fresh sub-context over exactly that span, so a malformed nested block
//! cannot desynchronize the enclosing parse.
//!
//! Reading at the bound yields `None`; the `expect*` helpers turn that into
//! an "unexpected end" error positioned just past the last token of the span.

use super::ast::{SourceLocation, TokenRange};
use super::errors::{ErrorKind, ParseError, Result};
use super::source::SourceInfo;
use super::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy)]
pub struct Context<'t> {
    tokens: &'t [Token],
    start: usize,
    end: usize,
    cursor: usize,
    end_location: SourceLocation,
    source: &'t SourceInfo,
}

/// Kinds that count as the same opener or closer while matching pairs
fn same_family(kind: TokenKind, target: TokenKind) -> bool {
    match target {
        TokenKind::Case => matches!(
            kind,
            TokenKind::Case | TokenKind::Casez | TokenKind::Casex
        ),
        _ => kind == target,
    }
}

impl<'t> Context<'t> {
    /// Context over a whole arena; a trailing end-of-input token is excluded.
    pub fn root(tokens: &'t [Token], source: &'t SourceInfo) -> Self {
        let end = match tokens.last() {
            Some(last) if last.is(TokenKind::Eof) => tokens.len() - 1,
            _ => tokens.len(),
        };
        Self::bounded(tokens, 0, end, source)
    }

    fn bounded(tokens: &'t [Token], start: usize, end: usize, source: &'t SourceInfo) -> Self {
        let end_location = if end > start {
            tokens[end - 1].end
        } else if start > 0 {
            tokens[start - 1].end
        } else {
            tokens
                .first()
                .map(|t| t.location)
                .unwrap_or(SourceLocation::new(1, 1))
        };
        Self {
            tokens,
            start,
            end,
            cursor: start,
            end_location,
            source,
        }
    }

    /// Fresh context over `[start, end)` of the same arena
    pub fn subcontext(&self, start: usize, end: usize) -> Self {
        let start = start.clamp(self.start, self.end);
        let end = end.clamp(start, self.end);
        Self::bounded(self.tokens, start, end, self.source)
    }

    pub fn source(&self) -> &'t SourceInfo {
        self.source
    }

    /// Absolute index of the cursor
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn bounds(&self) -> TokenRange {
        TokenRange::new(self.start, self.end)
    }

    /// Range from `start` up to the cursor
    pub fn range_from(&self, start: usize) -> TokenRange {
        TokenRange::new(start, self.cursor)
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.end
    }

    pub fn current(&self) -> Option<&'t Token> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.get(self.cursor)
        }
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    /// Token `n` places after the current one
    pub fn peek(&self, n: usize) -> Option<&'t Token> {
        let index = self.cursor + n;
        if index < self.end {
            self.tokens.get(index)
        } else {
            None
        }
    }

    pub fn peek_kind(&self, n: usize) -> Option<TokenKind> {
        self.peek(n).map(|t| t.kind)
    }

    /// Most recently consumed token
    pub fn last(&self) -> Option<&'t Token> {
        if self.cursor > self.start {
            self.tokens.get(self.cursor - 1)
        } else {
            None
        }
    }

    /// Token at an absolute index inside this context
    pub fn token(&self, index: usize) -> Option<&'t Token> {
        if (self.start..self.end).contains(&index) {
            self.tokens.get(index)
        } else {
            None
        }
    }

    /// Location of the current token, or just past the span at its end
    pub fn location(&self) -> SourceLocation {
        self.current()
            .map(|t| t.location)
            .unwrap_or(self.end_location)
    }

    pub fn end_location(&self) -> SourceLocation {
        self.end_location
    }

    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.current()?;
        self.cursor += 1;
        Some(token)
    }

    pub fn consume(&mut self) -> Result<&'t Token> {
        self.advance()
            .ok_or_else(|| self.unexpected_end("a token"))
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Consume the current token if it has the given kind
    pub fn eat(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<&'t Token> {
        self.expect_described(kind, &kind.to_string())
    }

    pub fn expect_described(&mut self, kind: TokenKind, expected: &str) -> Result<&'t Token> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(self.unexpected(expected, token)),
            None => Err(self.unexpected_end(expected)),
        }
    }

    /// Identifiers, plus time-unit words used as names
    pub fn expect_identifier(&mut self) -> Result<&'t Token> {
        match self.current() {
            Some(token) if token.is(TokenKind::Identifier) || token.kind.is_time_unit() => {
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(self.unexpected("identifier", token)),
            None => Err(self.unexpected_end("identifier")),
        }
    }

    /// Fail unless every token of the span was consumed.
    pub fn expect_end(&self, expected: &str) -> Result<()> {
        match self.current() {
            Some(token) => Err(self.unexpected(expected, token)),
            None => Ok(()),
        }
    }

    /// Move the cursor onto the next token of `kind` without consuming it and
    /// return its index.
    pub fn consume_until(&mut self, kind: TokenKind) -> Result<usize> {
        self.try_consume_until(kind)
            .ok_or_else(|| self.unexpected_end(&kind.to_string()))
    }

    /// Like [`Context::consume_until`], leaving the cursor untouched on failure.
    pub fn try_consume_until(&mut self, kind: TokenKind) -> Option<usize> {
        let index = (self.cursor..self.end).find(|&i| self.tokens[i].kind == kind)?;
        self.cursor = index;
        Some(index)
    }

    /// Starting exactly at `open`, move onto the `close` that brings the
    /// nesting depth back to zero and return its index.
    pub fn consume_until_matching_pair(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Result<usize> {
        let opener = match self.current() {
            Some(token) if same_family(token.kind, open) => token,
            Some(token) => return Err(self.unexpected(&open.to_string(), token)),
            None => return Err(self.unexpected_end(&open.to_string())),
        };
        let mut depth = 0usize;
        for index in self.cursor..self.end {
            let kind = self.tokens[index].kind;
            if same_family(kind, open) {
                depth += 1;
            } else if same_family(kind, close) {
                depth -= 1;
                if depth == 0 {
                    self.cursor = index;
                    return Ok(index);
                }
            }
        }
        Err(ParseError::new(
            ErrorKind::UnmatchedPair { open, close },
            opener.location,
            self.source,
        ))
    }

    /// Consume a balanced `open ... close` span and return a context over
    /// its interior along with the index of the opener.
    pub fn enclosed(&mut self, open: TokenKind, close: TokenKind) -> Result<(usize, Context<'t>)> {
        let open_index = self.cursor;
        let close_index = self.consume_until_matching_pair(open, close)?;
        self.cursor = close_index + 1;
        Ok((open_index, self.subcontext(open_index + 1, close_index)))
    }

    /// Move onto the next `expect` token found at nesting `depth` of the
    /// `open`/`close` pair and return its index.
    pub fn consume_until_at_depth(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        expect: TokenKind,
        depth: usize,
    ) -> Result<usize> {
        self.try_consume_until_at_depth(open, close, expect, depth)
            .ok_or_else(|| self.unexpected_end(&expect.to_string()))
    }

    pub fn try_consume_until_at_depth(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        expect: TokenKind,
        depth: usize,
    ) -> Option<usize> {
        let mut level = 0usize;
        for index in self.cursor..self.end {
            let kind = self.tokens[index].kind;
            if kind == expect && level == depth {
                self.cursor = index;
                return Some(index);
            }
            if same_family(kind, open) {
                level += 1;
            } else if same_family(kind, close) {
                level = level.checked_sub(1)?;
            }
        }
        None
    }

    /// Move onto the next `expect` token that sits outside every `()`, `[]`
    /// and `{}` pair and return its index. A `:` answering an open `?` at the
    /// same level belongs to that conditional and is passed over.
    pub fn consume_until_top_level(&mut self, expect: TokenKind) -> Result<usize> {
        self.try_consume_until_top_level(expect)
            .ok_or_else(|| self.unexpected_end(&expect.to_string()))
    }

    pub fn try_consume_until_top_level(&mut self, expect: TokenKind) -> Option<usize> {
        let mut level = 0usize;
        let mut conditionals = 0usize;
        for index in self.cursor..self.end {
            let kind = self.tokens[index].kind;
            if level == 0 {
                match kind {
                    TokenKind::Colon if conditionals > 0 => {
                        conditionals -= 1;
                        continue;
                    }
                    _ if kind == expect => {
                        self.cursor = index;
                        return Some(index);
                    }
                    TokenKind::QuestionMark => conditionals += 1,
                    _ => {}
                }
            }
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => level += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    level = level.checked_sub(1)?;
                }
                _ => {}
            }
        }
        None
    }

    pub fn error(&self, kind: ErrorKind, location: SourceLocation) -> ParseError {
        ParseError::new(kind, location, self.source)
    }

    pub fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        self.error(
            ErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: found.describe(),
            },
            found.location,
        )
    }

    pub fn unexpected_end(&self, expected: &str) -> ParseError {
        self.error(
            ErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
            self.end_location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;
    use crate::parser::lexer::Lexer;
    use rstest::rstest;

    fn arena(text: &str) -> (SourceInfo, Vec<Token>) {
        let source = SourceInfo::new(text, "t.sv", LineEnding::Lf);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        (source, tokens)
    }

    #[test]
    fn test_matching_pair_skips_nested() {
        let (source, tokens) =
            arena("module m; begin begin end (a(b)) end endmodule module n; endmodule");
        let mut ctx = Context::root(&tokens, &source);
        let close = ctx
            .consume_until_matching_pair(TokenKind::Module, TokenKind::EndModule)
            .unwrap();
        assert_eq!(close, 13);
        assert!(ctx.check(TokenKind::EndModule));
        assert_eq!(ctx.current().unwrap().location.column, 38);
    }

    #[test]
    fn test_matching_pair_case_family() {
        let (source, tokens) = arena("casez (a) 1: case (b) endcase endcase x");
        let mut ctx = Context::root(&tokens, &source);
        let close = ctx
            .consume_until_matching_pair(TokenKind::Case, TokenKind::EndCase)
            .unwrap();
        assert!(ctx.check(TokenKind::EndCase));
        assert_eq!(ctx.peek_kind(1), Some(TokenKind::Identifier));
        assert_eq!(close, tokens.len() - 3);
    }

    #[test]
    fn test_unmatched_pair() {
        let (source, tokens) = arena("begin begin end");
        let mut ctx = Context::root(&tokens, &source);
        let err = ctx
            .consume_until_matching_pair(TokenKind::Begin, TokenKind::End)
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnmatchedPair { .. }));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_consume_until_at_depth() {
        let (source, tokens) = arena("a[1:0]: x");
        let mut ctx = Context::root(&tokens, &source);
        let colon = ctx
            .consume_until_at_depth(TokenKind::LBracket, TokenKind::RBracket, TokenKind::Colon, 0)
            .unwrap();
        assert_eq!(colon, 6);
        assert_eq!(tokens[colon].location.column, 7);
    }

    #[rstest]
    #[case::plain("a[1:0]: x", 6)]
    #[case::parenthesized_conditional("(s ? 1 : 2): x", 7)]
    #[case::bare_conditional("s ? 1 : 2 : x", 5)]
    #[case::nested_conditional("a ? b ? 1 : 2 : 3 : x", 9)]
    #[case::concatenation("{c ? 1 : 2, d}: x", 9)]
    #[case::select("v[s ? 1 : 0]: x", 8)]
    fn test_consume_until_top_level(#[case] text: &str, #[case] expected: usize) {
        let (source, tokens) = arena(text);
        let mut ctx = Context::root(&tokens, &source);
        let colon = ctx.consume_until_top_level(TokenKind::Colon).unwrap();
        assert_eq!(colon, expected);
        assert_eq!(tokens[colon].kind, TokenKind::Colon);
        assert_eq!(ctx.position(), expected);
    }

    #[test]
    fn test_top_level_scan_without_match() {
        let (source, tokens) = arena("(a : b) [c:d]");
        let mut ctx = Context::root(&tokens, &source);
        assert_eq!(ctx.try_consume_until_top_level(TokenKind::Colon), None);
        assert_eq!(ctx.position(), 0);
        let err = ctx.consume_until_top_level(TokenKind::Colon).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_try_consume_until_keeps_cursor() {
        let (source, tokens) = arena("a b c");
        let mut ctx = Context::root(&tokens, &source);
        ctx.advance();
        assert_eq!(ctx.try_consume_until(TokenKind::Semicolon), None);
        assert_eq!(ctx.position(), 1);
        let err = ctx.consume_until(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 6));
    }

    #[test]
    fn test_subcontext_bounds_and_end_location() {
        let (source, tokens) = arena("( a , b ) ;");
        let mut ctx = Context::root(&tokens, &source);
        let (open, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen).unwrap();
        assert_eq!(open, 0);
        assert!(ctx.check(TokenKind::Semicolon));
        assert_eq!(inner.expect_identifier().unwrap().text, "a");
        inner.expect(TokenKind::Comma).unwrap();
        inner.expect_identifier().unwrap();
        assert!(inner.is_at_end());
        assert!(inner.current().is_none());
        assert_eq!(inner.end_location(), SourceLocation::new(1, 8));

        let empty = Context::root(&tokens[..0], &source);
        assert!(empty.is_at_end());
        assert_eq!(empty.end_location(), SourceLocation::new(1, 1));
    }

    #[test]
    fn test_expect_reports_found_token() {
        let (source, tokens) = arena("wire a endmodule");
        let mut ctx = Context::root(&tokens, &source);
        ctx.advance();
        ctx.advance();
        let err = ctx.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 8));
        assert_eq!(err.message(), "expected ';', found 'endmodule'");
    }
}
