//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the top-level item loop, module
//! header parsing and module body dispatch.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser over bounded [`Context`]s:
//! - This module: Parser struct, modules, body-item dispatch
//! - `declarations`: parameters, ports, data types, nets/variables, instances
//! - `statements`: procedural blocks, statements, generate constructs
//! - `expressions`: the Pratt expression engine
//! - `directives`: pre-compile directives
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks.
//! They take `&self` plus the context they read from; every nested scope is
//! parsed from a fresh sub-context over its balanced span.

use super::ast::*;
use super::context::Context;
use super::errors::{ErrorKind, Result};
use super::lexer::Lexer;
use super::source::SourceInfo;
use super::token::{Token, TokenKind};
use crate::config::ParseOptions;
use crate::diagnostics::{ConsoleSink, Diagnostic, DiagnosticSink};

/// Recursive descent parser for a Verilog/SystemVerilog subset
pub struct Parser {
    pub(crate) source: SourceInfo,
    pub(crate) tokens: Vec<Token>,
    pub(crate) options: ParseOptions,
    pub(crate) sink: Box<dyn DiagnosticSink>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, ParseOptions::default())
    }

    /// Lex `source` and prepare a parser; comments are dropped from the arena.
    pub fn with_options(source: &str, options: ParseOptions) -> Result<Self> {
        let source = SourceInfo::new(source, options.path.clone(), options.line_ending);
        let tokens = Lexer::new(&source)
            .tokenize()?
            .into_iter()
            .filter(|token| !token.kind.is_comment())
            .collect();
        Ok(Self {
            source,
            tokens,
            options,
            sink: Box::new(ConsoleSink),
        })
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Parse the whole file into top-level items
    pub fn parse(self) -> Result<SourceUnit> {
        let items = {
            let mut ctx = Context::root(&self.tokens, &self.source);
            let mut items = Vec::new();
            while !ctx.is_at_end() {
                items.push(self.parse_item(&mut ctx)?);
            }
            items
        };
        tracing::debug!(path = %self.source.path, items = items.len(), "parsed source");

        Ok(SourceUnit {
            items,
            tokens: self.tokens,
            source: self.source,
        })
    }

    /// Parse the whole input as one expression, `<=` read as a relation.
    pub fn parse_standalone_expression(&self) -> Result<Expr> {
        let mut ctx = Context::root(&self.tokens, &self.source);
        let expr = self.parse_expression(&mut ctx)?;
        ctx.expect_end("end of expression")?;
        Ok(expr)
    }

    /// Parse the whole input as one procedural statement.
    pub fn parse_standalone_statement(&self) -> Result<Statement> {
        let mut ctx = Context::root(&self.tokens, &self.source);
        let statement = self.parse_statement(&mut ctx)?;
        ctx.expect_end("end of statement")?;
        Ok(statement)
    }

    pub(crate) fn warn(&self, message: String, location: SourceLocation) {
        let diagnostic = Diagnostic::warning(
            message,
            &self.source.path,
            location,
            self.source.error_context(location),
        );
        self.sink.emit(&diagnostic);
    }

    fn parse_item(&self, ctx: &mut Context<'_>) -> Result<Item> {
        match ctx.current() {
            Some(token) if token.is(TokenKind::Module) => self.parse_module(ctx).map(Item::Module),
            Some(token) if token.is(TokenKind::Directive) => {
                self.parse_directive(ctx).map(Item::Directive)
            }
            Some(token) => Err(ctx.error(ErrorKind::Unimplemented(token.describe()), token.location)),
            None => Err(ctx.unexpected_end("module or directive")),
        }
    }

    /// Parse `module name [#(params)] [(ports)]; items endmodule [: name]`
    pub(crate) fn parse_module(&self, ctx: &mut Context<'_>) -> Result<ModuleNode> {
        let start = ctx.position();
        let location = ctx.location();
        let close = ctx.consume_until_matching_pair(TokenKind::Module, TokenKind::EndModule)?;
        let mut module = ctx.subcontext(start, close);
        ctx.expect(TokenKind::EndModule)?;

        module.expect(TokenKind::Module)?;
        let name = module.expect_identifier()?.text.clone();

        let params = if module.eat(TokenKind::Sharp).is_some() {
            let (_, mut inner) = module.enclosed(TokenKind::LParen, TokenKind::RParen)?;
            self.parse_header_params(&mut inner)?
        } else {
            Vec::new()
        };

        let ports = if module.check(TokenKind::LParen) {
            let (_, mut inner) = module.enclosed(TokenKind::LParen, TokenKind::RParen)?;
            self.parse_port_list(&mut inner)?
        } else {
            PortList::Empty
        };

        module.expect_described(TokenKind::Semicolon, "';' after module header")?;

        let body = if self.options.parse_bodies {
            self.parse_body_items(&mut module)?
        } else {
            Vec::new()
        };

        self.parse_end_label(ctx, Some(&name))?;
        tracing::debug!(module = %name, items = body.len(), "parsed module");

        Ok(ModuleNode {
            name,
            params,
            ports,
            body,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Optional `: label` after a block opener
    pub(crate) fn parse_block_label(&self, ctx: &mut Context<'_>) -> Result<Option<String>> {
        if ctx.eat(TokenKind::Colon).is_some() {
            Ok(Some(ctx.expect_identifier()?.text.clone()))
        } else {
            Ok(None)
        }
    }

    /// Optional `: label` after a block closer; it must repeat the opener's.
    pub(crate) fn parse_end_label(&self, ctx: &mut Context<'_>, expected: Option<&str>) -> Result<()> {
        let Some(colon) = ctx.eat(TokenKind::Colon) else {
            return Ok(());
        };
        let label = ctx.expect_identifier()?;
        match expected {
            Some(name) if name == label.text => Ok(()),
            Some(name) => Err(ctx.error(
                ErrorKind::Malformed(format!(
                    "end label '{}' does not match '{}'",
                    label.text, name
                )),
                label.location,
            )),
            None => Err(ctx.error(
                ErrorKind::Malformed(format!("end label '{}' on an unlabeled block", label.text)),
                colon.location,
            )),
        }
    }

    pub(crate) fn parse_body_items(&self, ctx: &mut Context<'_>) -> Result<Vec<BodyItem>> {
        let mut items = Vec::new();
        while !ctx.is_at_end() {
            items.push(self.parse_body_item(ctx)?);
        }
        Ok(items)
    }

    /// Dispatch one module item on its leading token
    pub(crate) fn parse_body_item(&self, ctx: &mut Context<'_>) -> Result<BodyItem> {
        let Some(token) = ctx.current() else {
            return Err(ctx.unexpected_end("module item"));
        };

        match token.kind {
            TokenKind::Parameter | TokenKind::Localparam => {
                self.parse_param_declaration(ctx).map(BodyItem::ParamDef)
            }
            kind if kind.is_direction() => self.parse_port_declaration(ctx).map(BodyItem::PortDef),
            kind if kind.is_net_type()
                || kind.is_integer_vector_type()
                || kind.is_integer_atom_type()
                || kind.is_non_integer_type() =>
            {
                self.parse_variable_declaration(ctx).map(BodyItem::VariableDef)
            }
            TokenKind::Genvar => self.parse_genvar(ctx).map(BodyItem::Genvar),
            TokenKind::Assign => self.parse_assign(ctx).map(BodyItem::Assign),
            TokenKind::Always
            | TokenKind::AlwaysComb
            | TokenKind::AlwaysFf
            | TokenKind::AlwaysLatch => self.parse_always(ctx).map(BodyItem::Always),
            TokenKind::Initial => self.parse_initial(ctx).map(BodyItem::Initial),
            TokenKind::Identifier
                if matches!(
                    ctx.peek_kind(1),
                    Some(TokenKind::Identifier) | Some(TokenKind::Sharp)
                ) =>
            {
                self.parse_instantiation(ctx).map(BodyItem::Instantiation)
            }
            TokenKind::Begin => self.parse_generate_block(ctx).map(BodyItem::Block),
            TokenKind::Generate => self.parse_generate_region(ctx).map(BodyItem::GenerateRegion),
            TokenKind::If | TokenKind::For | TokenKind::Case => {
                self.parse_generate(ctx).map(BodyItem::Generate)
            }
            TokenKind::Directive => self.parse_directive(ctx).map(BodyItem::Directive),
            TokenKind::Semicolon => {
                let start = ctx.position();
                ctx.advance();
                Ok(BodyItem::Empty(EmptyNode {
                    location: token.location,
                    range: ctx.range_from(start),
                }))
            }
            _ => Err(ctx.error(ErrorKind::Unimplemented(token.describe()), token.location)),
        }
    }
}
