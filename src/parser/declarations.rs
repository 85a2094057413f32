//! Declaration parsing
//!
//! This module handles parameters, ports, data types, nets and variables,
//! genvars and module instantiations.
//!
//! # Grammar
//!
//! ```text
//! header_params  ::= [ 'parameter' | 'localparam' ] [ data_type ] param_assign { ',' ... }
//! param_assign   ::= identifier { dimension } [ '=' expression ]
//! ansi_ports     ::= direction [ net_type ] [ data_type ] declarator { ',' ... }
//! non_ansi_ports ::= identifier { ',' identifier }
//! data_type      ::= integer_vector_type [ signing ] { packed_range }
//!                  | integer_atom_type [ signing ]
//!                  | non_integer_type
//!                  | [ signing ] packed_range { packed_range }
//! declarator     ::= identifier { dimension } [ '=' expression ]
//! dimension      ::= '[' expression [ ':' expression ] ']'
//! instantiation  ::= identifier [ '#' '(' connections ')' ] identifier '(' connections ')' ';'
//! connection     ::= '.' identifier '(' [ expression ] ')' | expression
//! ```
//!
//! Within a header group, a declaration keyword, data type, direction or net
//! type starts a new group; a bare identifier joins the previous group and
//! shares its type.

use super::ast::*;
use super::context::Context;
use super::errors::{ErrorKind, Result};
use super::parse::Parser;
use super::token::TokenKind;

impl Parser {
    /// Parse the interior of a `#( ... )` header parameter list
    pub(crate) fn parse_header_params(&self, ctx: &mut Context<'_>) -> Result<Vec<ParamDefNode>> {
        let mut groups: Vec<ParamDefNode> = Vec::new();
        let mut local = false;

        while !ctx.is_at_end() {
            let start = ctx.position();
            let location = ctx.location();

            let keyword = if ctx.eat(TokenKind::Parameter).is_some() {
                Some(false)
            } else if ctx.eat(TokenKind::Localparam).is_some() {
                Some(true)
            } else {
                None
            };
            let data_type = self.parse_data_type(ctx)?;
            let starts_group = keyword.is_some() || data_type.is_some() || groups.is_empty();
            if let Some(keyword) = keyword {
                local = keyword;
            }

            let assignment = self.parse_param_assignment(ctx)?;
            if starts_group {
                groups.push(ParamDefNode {
                    local,
                    data_type,
                    assignments: vec![assignment],
                    location,
                    range: ctx.range_from(start),
                });
            } else if let Some(group) = groups.last_mut() {
                group.assignments.push(assignment);
                group.range.end = ctx.position();
            }

            if ctx.is_at_end() {
                break;
            }
            ctx.expect_described(TokenKind::Comma, "',' or ')'")?;
        }

        Ok(groups)
    }

    /// Parse `parameter|localparam [type] a = 1, b = 2;` in a module body
    pub(crate) fn parse_param_declaration(&self, ctx: &mut Context<'_>) -> Result<ParamDefNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut decl = self.statement_span(ctx)?;

        let local = decl.consume()?.is(TokenKind::Localparam);
        let data_type = self.parse_data_type(&mut decl)?;
        let mut assignments = Vec::new();
        loop {
            assignments.push(self.parse_param_assignment(&mut decl)?);
            if decl.is_at_end() {
                break;
            }
            decl.expect_described(TokenKind::Comma, "',' or ';'")?;
        }

        Ok(ParamDefNode {
            local,
            data_type,
            assignments,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_param_assignment(&self, ctx: &mut Context<'_>) -> Result<ParamAssignNode> {
        let start = ctx.position();
        let location = ctx.location();
        let name = ctx.expect_identifier()?.text.clone();
        let dims = self.parse_unpacked_dims(ctx)?;
        let default = if ctx.eat(TokenKind::Assignment).is_some() {
            Some(self.parse_expression(ctx)?)
        } else {
            None
        };

        Ok(ParamAssignNode {
            name,
            dims,
            default,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse the interior of the header port parentheses
    pub(crate) fn parse_port_list(&self, ctx: &mut Context<'_>) -> Result<PortList> {
        match ctx.current_kind() {
            None => Ok(PortList::Empty),
            Some(kind) if kind.is_direction() => self.parse_ansi_ports(ctx).map(PortList::Ansi),
            Some(_) => self.parse_non_ansi_ports(ctx).map(PortList::NonAnsi),
        }
    }

    fn parse_ansi_ports(&self, ctx: &mut Context<'_>) -> Result<Vec<AnsiPortDefNode>> {
        let mut groups: Vec<AnsiPortDefNode> = Vec::new();

        while !ctx.is_at_end() {
            let start = ctx.position();
            let location = ctx.location();

            let direction = ctx.current_kind().and_then(Direction::from_kind);
            if direction.is_some() {
                ctx.advance();
            }
            let net_type = self.parse_net_type(ctx);
            let data_type = self.parse_data_type(ctx)?;
            let starts_group = direction.is_some() || net_type.is_some() || data_type.is_some();
            let declarator = self.parse_declarator(ctx)?;

            if starts_group {
                let Some(direction) = direction.or_else(|| groups.last().map(|g| g.direction))
                else {
                    return Err(ctx.error(
                        ErrorKind::Malformed("port declared without a direction".to_string()),
                        location,
                    ));
                };
                groups.push(AnsiPortDefNode {
                    direction,
                    net_type,
                    data_type,
                    declarators: vec![declarator],
                    location,
                    range: ctx.range_from(start),
                });
            } else if let Some(group) = groups.last_mut() {
                group.declarators.push(declarator);
                group.range.end = ctx.position();
            }

            if ctx.is_at_end() {
                break;
            }
            ctx.expect_described(TokenKind::Comma, "',' or ')'")?;
        }

        Ok(groups)
    }

    fn parse_non_ansi_ports(&self, ctx: &mut Context<'_>) -> Result<Vec<NonAnsiPortDefNode>> {
        let mut ports = Vec::new();
        loop {
            let start = ctx.position();
            let token = ctx.expect_identifier()?;
            ports.push(NonAnsiPortDefNode {
                name: token.text.clone(),
                location: token.location,
                range: ctx.range_from(start),
            });
            if ctx.is_at_end() {
                return Ok(ports);
            }
            ctx.expect_described(TokenKind::Comma, "',' or ')'")?;
        }
    }

    /// Parse `input|output|inout [net] [type] a, b;` in a module body
    pub(crate) fn parse_port_declaration(&self, ctx: &mut Context<'_>) -> Result<AnsiPortDefNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut decl = self.statement_span(ctx)?;

        let keyword = decl.consume()?;
        let Some(direction) = Direction::from_kind(keyword.kind) else {
            return Err(decl.unexpected("port direction", keyword));
        };
        let net_type = self.parse_net_type(&mut decl);
        let data_type = self.parse_data_type(&mut decl)?;
        let declarators = self.parse_declarators(&mut decl)?;

        Ok(AnsiPortDefNode {
            direction,
            net_type,
            data_type,
            declarators,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse `[net] [type] a [dims] [= init], b;`
    pub(crate) fn parse_variable_declaration(&self, ctx: &mut Context<'_>) -> Result<VariableDefNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut decl = self.statement_span(ctx)?;

        let net_type = self.parse_net_type(&mut decl);
        let data_type = self.parse_data_type(&mut decl)?;
        let declarators = self.parse_declarators(&mut decl)?;

        Ok(VariableDefNode {
            net_type,
            data_type,
            declarators,
            location,
            range: ctx.range_from(start),
        })
    }

    pub(crate) fn parse_genvar(&self, ctx: &mut Context<'_>) -> Result<GenvarNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut decl = self.statement_span(ctx)?;

        decl.expect(TokenKind::Genvar)?;
        let mut names = Vec::new();
        loop {
            names.push(decl.expect_identifier()?.text.clone());
            if decl.is_at_end() {
                break;
            }
            decl.expect_described(TokenKind::Comma, "',' or ';'")?;
        }

        Ok(GenvarNode {
            names,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse `proto [#(params)] inst (ports);`
    pub(crate) fn parse_instantiation(&self, ctx: &mut Context<'_>) -> Result<InstantiationNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut inst = self.statement_span(ctx)?;

        let prototype = inst.expect_identifier()?.text.clone();
        let params = if inst.eat(TokenKind::Sharp).is_some() {
            let (_, mut inner) = inst.enclosed(TokenKind::LParen, TokenKind::RParen)?;
            self.parse_connections(&mut inner, |name, value, location, range| ParaSetNode {
                name,
                value,
                location,
                range,
            })?
        } else {
            Vec::new()
        };
        let instance = inst.expect_identifier()?.text.clone();
        let (_, mut inner) = inst.enclosed(TokenKind::LParen, TokenKind::RParen)?;
        let ports = self.parse_connections(&mut inner, |name, value, location, range| {
            PortConnectNode {
                name,
                value,
                location,
                range,
            }
        })?;
        inst.expect_end("';'")?;

        Ok(InstantiationNode {
            prototype,
            params,
            instance,
            ports,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_connections<T>(
        &self,
        ctx: &mut Context<'_>,
        build: impl Fn(Option<String>, Option<Expr>, SourceLocation, TokenRange) -> T,
    ) -> Result<Vec<T>> {
        let mut connections = Vec::new();
        while !ctx.is_at_end() {
            let start = ctx.position();
            let location = ctx.location();

            let (name, value) = if ctx.eat(TokenKind::Dot).is_some() {
                let name = ctx.expect_identifier()?.text.clone();
                let (_, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;
                let value = if inner.is_at_end() {
                    None
                } else {
                    let value = self.parse_expression(&mut inner)?;
                    inner.expect_end("')'")?;
                    Some(value)
                };
                (Some(name), value)
            } else {
                (None, Some(self.parse_expression(ctx)?))
            };
            connections.push(build(name, value, location, ctx.range_from(start)));

            if ctx.is_at_end() {
                break;
            }
            ctx.expect_described(TokenKind::Comma, "',' or ')'")?;
        }
        Ok(connections)
    }

    /// Parse an explicit or implicit data type, or return `None` when the
    /// current token cannot start one.
    pub(crate) fn parse_data_type(&self, ctx: &mut Context<'_>) -> Result<Option<DataTypeNode>> {
        let Some(kind) = ctx.current_kind() else {
            return Ok(None);
        };
        if !kind.starts_data_type() {
            return Ok(None);
        }
        let start = ctx.position();
        let location = ctx.location();

        let keyword = if kind.is_integer_vector_type()
            || kind.is_integer_atom_type()
            || kind.is_non_integer_type()
        {
            ctx.advance();
            Some(kind)
        } else {
            None
        };

        let signing = match keyword {
            Some(kind) if kind.is_non_integer_type() => None,
            _ => self.parse_signing(ctx),
        };

        let mut packed = Vec::new();
        if keyword.map_or(true, |kind| kind.is_integer_vector_type()) {
            while ctx.check(TokenKind::LBracket) {
                packed.push(self.parse_packed_range(ctx)?);
            }
        }

        Ok(Some(DataTypeNode {
            keyword,
            signing,
            packed,
            location,
            range: ctx.range_from(start),
        }))
    }

    fn parse_signing(&self, ctx: &mut Context<'_>) -> Option<Signing> {
        if ctx.eat(TokenKind::Signed).is_some() {
            Some(Signing::Signed)
        } else if ctx.eat(TokenKind::Unsigned).is_some() {
            Some(Signing::Unsigned)
        } else {
            None
        }
    }

    fn parse_net_type(&self, ctx: &mut Context<'_>) -> Option<TokenKind> {
        let kind = ctx.current_kind().filter(|kind| kind.is_net_type())?;
        ctx.advance();
        Some(kind)
    }

    fn parse_packed_range(&self, ctx: &mut Context<'_>) -> Result<RangeNode> {
        let location = ctx.location();
        match self.parse_dimension(ctx)? {
            Dimension::Range(range) => Ok(range),
            Dimension::Size(_) => Err(ctx.error(
                ErrorKind::Malformed("packed dimension requires '[left:right]'".to_string()),
                location,
            )),
        }
    }

    /// Parse `[left:right]` or `[size]`; the separating `:` is the first one
    /// outside nested pairs and conditionals.
    pub(crate) fn parse_dimension(&self, ctx: &mut Context<'_>) -> Result<Dimension> {
        let start = ctx.position();
        let location = ctx.location();
        let (_, mut inner) = ctx.enclosed(TokenKind::LBracket, TokenKind::RBracket)?;
        let inner_start = inner.position();

        match inner.try_consume_until_top_level(TokenKind::Colon) {
            Some(colon) => {
                let mut left_ctx = inner.subcontext(inner_start, colon);
                let left = self.parse_expression(&mut left_ctx)?;
                left_ctx.expect_end("':'")?;
                inner.advance();
                let right = self.parse_expression(&mut inner)?;
                inner.expect_end("']'")?;
                Ok(Dimension::Range(RangeNode {
                    left,
                    right,
                    location,
                    range: ctx.range_from(start),
                }))
            }
            None => {
                let index = self.parse_expression(&mut inner)?;
                inner.expect_end("']'")?;
                Ok(Dimension::Size(IndexNode {
                    index,
                    location,
                    range: ctx.range_from(start),
                }))
            }
        }
    }

    fn parse_unpacked_dims(&self, ctx: &mut Context<'_>) -> Result<Vec<Dimension>> {
        let mut dims = Vec::new();
        while ctx.check(TokenKind::LBracket) {
            dims.push(self.parse_dimension(ctx)?);
        }
        Ok(dims)
    }

    fn parse_declarator(&self, ctx: &mut Context<'_>) -> Result<VariableDefInitNode> {
        let start = ctx.position();
        let location = ctx.location();
        let name = ctx.expect_identifier()?.text.clone();
        let dims = self.parse_unpacked_dims(ctx)?;
        let init = if ctx.eat(TokenKind::Assignment).is_some() {
            Some(self.parse_expression(ctx)?)
        } else {
            None
        };

        Ok(VariableDefInitNode {
            name,
            dims,
            init,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_declarators(&self, ctx: &mut Context<'_>) -> Result<Vec<VariableDefInitNode>> {
        let mut declarators = Vec::new();
        loop {
            declarators.push(self.parse_declarator(ctx)?);
            if ctx.is_at_end() {
                return Ok(declarators);
            }
            ctx.expect_described(TokenKind::Comma, "',' or ';'")?;
        }
    }

    /// Consume up to and including the next `;` and return a context over
    /// the tokens before it.
    pub(crate) fn statement_span<'t>(&self, ctx: &mut Context<'t>) -> Result<Context<'t>> {
        let start = ctx.position();
        let semicolon = ctx.consume_until(TokenKind::Semicolon)?;
        ctx.advance();
        Ok(ctx.subcontext(start, semicolon))
    }
}
