//! Statement parsing
//!
//! This module handles procedural blocks, procedural statements, continuous
//! assignments and generate constructs.
//!
//! # Grammar
//!
//! ```text
//! statement   ::= 'begin' [ ':' label ] { statement } 'end' [ ':' label ]
//!               | 'if' '(' expression ')' statement [ 'else' statement ]
//!               | ( 'case' | 'casez' | 'casex' ) '(' expression ')' { case_item } 'endcase'
//!               | 'for' '(' [ for_init ] ';' [ expression ] ';' [ expression ] ')' statement
//!               | delay statement
//!               | sensitivity statement
//!               | expression ';'
//!               | ';'
//! case_item   ::= expression { ',' expression } ':' statement
//!               | 'default' [ ':' ] statement
//! sensitivity ::= '@' '*' | '@' '(' '*' ')' | '@' identifier
//!               | '@' '(' event { ( 'or' | ',' ) event } ')'
//! event       ::= [ 'posedge' | 'negedge' | 'edge' ] expression
//! always      ::= ( 'always' | 'always_comb' | 'always_ff' | 'always_latch' ) [ sensitivity ] statement
//! assign      ::= 'assign' [ delay ] assignment { ',' assignment } ';'
//! generate    ::= 'generate' { item } 'endgenerate'
//!               | 'if' '(' expression ')' gen_block [ 'else' gen_block ]
//!               | 'for' '(' loop_header ')' gen_block
//!               | 'case' '(' expression ')' { gen_case_item } 'endcase'
//! gen_block   ::= 'begin' [ ':' label ] { item } 'end' [ ':' label ] | item
//! ```

use super::ast::*;
use super::context::Context;
use super::errors::{ErrorKind, Result};
use super::parse::Parser;
use super::token::TokenKind;

impl Parser {
    /// Parse a procedural statement
    pub(crate) fn parse_statement(&self, ctx: &mut Context<'_>) -> Result<Statement> {
        let Some(token) = ctx.current() else {
            return Err(ctx.unexpected_end("statement"));
        };

        match token.kind {
            TokenKind::Begin => self.parse_begin_end(ctx).map(Statement::Block),
            TokenKind::If => self.parse_if_else(ctx).map(Statement::If),
            TokenKind::Case | TokenKind::Casez | TokenKind::Casex => {
                self.parse_case(ctx).map(Statement::Case)
            }
            TokenKind::For => self.parse_for(ctx).map(Statement::For),
            TokenKind::Sharp => {
                let start = ctx.position();
                let delay = self.parse_delay(ctx, 0)?;
                let body = self.parse_statement(ctx)?;
                Ok(Statement::Delay(DelayStatementNode {
                    delay,
                    body: Box::new(body),
                    location: token.location,
                    range: ctx.range_from(start),
                }))
            }
            TokenKind::At => {
                let start = ctx.position();
                let sensitivity = self.parse_sensitivity(ctx)?;
                let body = self.parse_statement(ctx)?;
                Ok(Statement::Event(EventStatementNode {
                    sensitivity,
                    body: Box::new(body),
                    location: token.location,
                    range: ctx.range_from(start),
                }))
            }
            TokenKind::Semicolon => {
                let start = ctx.position();
                ctx.advance();
                Ok(Statement::Empty(EmptyNode {
                    location: token.location,
                    range: ctx.range_from(start),
                }))
            }
            _ => {
                let start = ctx.position();
                let mut inner = self.statement_span(ctx)?;
                let expr = self.parse_statement_expression(&mut inner)?;
                inner.expect_end("';'")?;
                Ok(Statement::Expression(ExpressionStatementNode {
                    expr,
                    location: token.location,
                    range: ctx.range_from(start),
                }))
            }
        }
    }

    fn parse_begin_end(&self, ctx: &mut Context<'_>) -> Result<BeginEndNode> {
        let start = ctx.position();
        let location = ctx.location();
        let (_, mut inner) = ctx.enclosed(TokenKind::Begin, TokenKind::End)?;

        let label = self.parse_block_label(&mut inner)?;
        let mut statements = Vec::new();
        while !inner.is_at_end() {
            statements.push(self.parse_statement(&mut inner)?);
        }
        self.parse_end_label(ctx, label.as_deref())?;

        Ok(BeginEndNode {
            label,
            statements,
            location,
            range: ctx.range_from(start),
        })
    }

    /// `'(' expression ')'` after `if`, `case` and friends
    fn parse_condition(&self, ctx: &mut Context<'_>) -> Result<Expr> {
        let (_, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;
        let condition = self.parse_expression(&mut inner)?;
        inner.expect_end("')'")?;
        Ok(condition)
    }

    fn parse_if_else(&self, ctx: &mut Context<'_>) -> Result<IfElseNode> {
        let start = ctx.position();
        let location = ctx.location();
        ctx.expect(TokenKind::If)?;

        let condition = self.parse_condition(ctx)?;
        let then_branch = Box::new(self.parse_statement(ctx)?);
        let else_branch = if ctx.eat(TokenKind::Else).is_some() {
            Some(Box::new(self.parse_statement(ctx)?))
        } else {
            None
        };

        Ok(IfElseNode {
            condition,
            then_branch,
            else_branch,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_case(&self, ctx: &mut Context<'_>) -> Result<CaseNode> {
        let start = ctx.position();
        let location = ctx.location();
        let kind = match ctx.current_kind() {
            Some(TokenKind::Casez) => CaseKind::Casez,
            Some(TokenKind::Casex) => CaseKind::Casex,
            _ => CaseKind::Case,
        };

        let (_, mut body) = ctx.enclosed(TokenKind::Case, TokenKind::EndCase)?;
        let selector = self.parse_condition(&mut body)?;
        let (items, default) = self.parse_case_items(&mut body, Self::parse_statement)?;

        Ok(CaseNode {
            kind,
            selector,
            items,
            default: default.map(Box::new),
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse case items up to the end of `ctx`; each label list ends at the
    /// first `:` outside brackets.
    fn parse_case_items<T>(
        &self,
        ctx: &mut Context<'_>,
        parse_body: impl Fn(&Self, &mut Context<'_>) -> Result<T>,
    ) -> Result<(Vec<CaseItemNode<T>>, Option<T>)> {
        let mut items = Vec::new();
        let mut default = None;

        while !ctx.is_at_end() {
            let start = ctx.position();
            let location = ctx.location();

            if ctx.eat(TokenKind::Default).is_some() {
                ctx.eat(TokenKind::Colon);
                if default.is_some() {
                    return Err(ctx.error(
                        ErrorKind::Malformed("multiple default items in case".to_string()),
                        location,
                    ));
                }
                default = Some(parse_body(self, ctx)?);
                continue;
            }

            let colon = ctx.consume_until_top_level(TokenKind::Colon)?;
            let mut labels_ctx = ctx.subcontext(start, colon);
            ctx.advance();
            let labels = self.parse_expression_list(&mut labels_ctx)?;
            if labels.is_empty() {
                return Err(ctx.error(
                    ErrorKind::Malformed("case item without a label".to_string()),
                    location,
                ));
            }
            let body = parse_body(self, ctx)?;

            items.push(CaseItemNode {
                labels,
                body,
                location,
                range: ctx.range_from(start),
            });
        }

        Ok((items, default))
    }

    fn parse_for(&self, ctx: &mut Context<'_>) -> Result<ForNode> {
        let start = ctx.position();
        let location = ctx.location();
        ctx.expect(TokenKind::For)?;

        let header = self.parse_loop_header(ctx)?;
        let body = self.parse_statement(ctx)?;

        Ok(ForNode {
            header,
            body: Box::new(body),
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse `( [init] ; [condition] ; [step] )`
    fn parse_loop_header(&self, ctx: &mut Context<'_>) -> Result<LoopHeaderNode> {
        let start = ctx.position();
        let location = ctx.location();
        let (_, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;

        let mut clauses = Vec::with_capacity(2);
        for _ in 0..2 {
            let clause_start = inner.position();
            let semicolon = inner.consume_until_at_depth(
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                0,
            )?;
            clauses.push(inner.subcontext(clause_start, semicolon));
            inner.advance();
        }

        let mut init_ctx = clauses[0];
        let init = if init_ctx.is_at_end() {
            None
        } else {
            Some(self.parse_for_init(&mut init_ctx)?)
        };

        let mut condition_ctx = clauses[1];
        let condition = if condition_ctx.is_at_end() {
            None
        } else {
            let condition = self.parse_expression(&mut condition_ctx)?;
            condition_ctx.expect_end("';'")?;
            Some(condition)
        };

        let step = if inner.is_at_end() {
            None
        } else {
            let step = self.parse_statement_expression(&mut inner)?;
            inner.expect_end("')'")?;
            Some(step)
        };

        Ok(LoopHeaderNode {
            init,
            condition,
            step,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_for_init(&self, ctx: &mut Context<'_>) -> Result<ForInitNode> {
        let start = ctx.position();
        let location = ctx.location();
        let genvar = ctx.eat(TokenKind::Genvar).is_some();
        let data_type = self.parse_data_type(ctx)?;
        let assignment = self.parse_statement_expression(ctx)?;
        ctx.expect_end("';'")?;

        Ok(ForInitNode {
            genvar,
            data_type,
            assignment,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse an event control: `@*`, `@(*)`, `@name` or `@( events )`
    pub(crate) fn parse_sensitivity(&self, ctx: &mut Context<'_>) -> Result<SensitivityNode> {
        let start = ctx.position();
        let location = ctx.location();
        ctx.expect(TokenKind::At)?;

        let (star, events) = if ctx.eat(TokenKind::Mul).is_some() {
            (true, Vec::new())
        } else if ctx.check(TokenKind::LParen) {
            let (_, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;
            if inner.check(TokenKind::Mul) && inner.peek(1).is_none() {
                (true, Vec::new())
            } else {
                (false, self.parse_events(&mut inner)?)
            }
        } else {
            let event_start = ctx.position();
            let event_location = ctx.location();
            let expr = self.parse_operand(ctx)?;
            let event = EventNode {
                edge: None,
                expr,
                location: event_location,
                range: ctx.range_from(event_start),
            };
            (false, vec![event])
        };

        Ok(SensitivityNode {
            star,
            events,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_events(&self, ctx: &mut Context<'_>) -> Result<Vec<EventNode>> {
        let mut events = Vec::new();
        loop {
            let start = ctx.position();
            let location = ctx.location();
            let edge = match ctx.current_kind() {
                Some(TokenKind::Posedge) => Some(Edge::Posedge),
                Some(TokenKind::Negedge) => Some(Edge::Negedge),
                Some(TokenKind::Edge) => Some(Edge::Any),
                _ => None,
            };
            if edge.is_some() {
                ctx.advance();
            }
            let expr = self.parse_expression(ctx)?;
            events.push(EventNode {
                edge,
                expr,
                location,
                range: ctx.range_from(start),
            });

            if ctx.is_at_end() {
                return Ok(events);
            }
            if ctx.eat(TokenKind::Or).is_none() {
                ctx.expect_described(TokenKind::Comma, "'or', ',' or ')'")?;
            }
        }
    }

    pub(crate) fn parse_always(&self, ctx: &mut Context<'_>) -> Result<AlwaysBlockNode> {
        let start = ctx.position();
        let location = ctx.location();
        let token = ctx.consume()?;
        let kind = match token.kind {
            TokenKind::AlwaysComb => AlwaysKind::Comb,
            TokenKind::AlwaysFf => AlwaysKind::Ff,
            TokenKind::AlwaysLatch => AlwaysKind::Latch,
            _ => AlwaysKind::Always,
        };

        let sensitivity = if ctx.check(TokenKind::At) {
            Some(self.parse_sensitivity(ctx)?)
        } else {
            None
        };
        let body = self.parse_statement(ctx)?;

        Ok(AlwaysBlockNode {
            kind,
            sensitivity,
            body,
            location,
            range: ctx.range_from(start),
        })
    }

    pub(crate) fn parse_initial(&self, ctx: &mut Context<'_>) -> Result<InitialBlockNode> {
        let start = ctx.position();
        let location = ctx.location();
        ctx.expect(TokenKind::Initial)?;
        let body = self.parse_statement(ctx)?;

        Ok(InitialBlockNode {
            body,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse `assign [#delay] a = b, c = d;`
    pub(crate) fn parse_assign(&self, ctx: &mut Context<'_>) -> Result<AssignNode> {
        let start = ctx.position();
        let location = ctx.location();
        let mut inner = self.statement_span(ctx)?;
        inner.expect(TokenKind::Assign)?;

        let delay = if inner.check(TokenKind::Sharp) {
            Some(self.parse_delay(&mut inner, 0)?)
        } else {
            None
        };

        let mut assignments = Vec::new();
        loop {
            let expr = self.parse_statement_expression(&mut inner)?;
            if !matches!(
                expr.kind,
                ExprKind::Assignment {
                    op: AssignOp::Assign,
                    ..
                }
            ) {
                return Err(inner.error(
                    ErrorKind::Malformed("continuous assignment requires '='".to_string()),
                    expr.location,
                ));
            }
            assignments.push(expr);
            if inner.is_at_end() {
                break;
            }
            inner.expect_described(TokenKind::Comma, "',' or ';'")?;
        }

        Ok(AssignNode {
            delay,
            assignments,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse `generate ... endgenerate`
    pub(crate) fn parse_generate_region(&self, ctx: &mut Context<'_>) -> Result<GenerateRegionNode> {
        let start = ctx.position();
        let location = ctx.location();
        let (_, mut inner) = ctx.enclosed(TokenKind::Generate, TokenKind::EndGenerate)?;
        let items = self.parse_body_items(&mut inner)?;

        Ok(GenerateRegionNode {
            items,
            location,
            range: ctx.range_from(start),
        })
    }

    /// Parse a generate `if`, `for` or `case`
    pub(crate) fn parse_generate(&self, ctx: &mut Context<'_>) -> Result<GenerateNode> {
        let start = ctx.position();
        let location = ctx.location();
        let Some(token) = ctx.current() else {
            return Err(ctx.unexpected_end("generate construct"));
        };

        match token.kind {
            TokenKind::If => {
                ctx.advance();
                let condition = self.parse_condition(ctx)?;
                let then_block = self.parse_generate_block(ctx)?;
                let else_block = if ctx.eat(TokenKind::Else).is_some() {
                    Some(self.parse_generate_block(ctx)?)
                } else {
                    None
                };
                Ok(GenerateNode::If(GenerateIfNode {
                    condition,
                    then_block,
                    else_block,
                    location,
                    range: ctx.range_from(start),
                }))
            }
            TokenKind::For => {
                ctx.advance();
                let header = self.parse_loop_header(ctx)?;
                let body = self.parse_generate_block(ctx)?;
                Ok(GenerateNode::For(GenerateForNode {
                    header,
                    body,
                    location,
                    range: ctx.range_from(start),
                }))
            }
            TokenKind::Case => {
                let (_, mut body) = ctx.enclosed(TokenKind::Case, TokenKind::EndCase)?;
                let selector = self.parse_condition(&mut body)?;
                let (items, default) =
                    self.parse_case_items(&mut body, Self::parse_generate_block)?;
                Ok(GenerateNode::Case(GenerateCaseNode {
                    selector,
                    items,
                    default,
                    location,
                    range: ctx.range_from(start),
                }))
            }
            _ => Err(ctx.unexpected("'if', 'for' or 'case'", token)),
        }
    }

    /// Parse `begin [: label] items end [: label]`, or a single item
    pub(crate) fn parse_generate_block(&self, ctx: &mut Context<'_>) -> Result<GenerateBlockNode> {
        let start = ctx.position();
        let location = ctx.location();

        if !ctx.check(TokenKind::Begin) {
            let item = self.parse_body_item(ctx)?;
            return Ok(GenerateBlockNode {
                label: None,
                items: vec![item],
                location,
                range: ctx.range_from(start),
            });
        }

        let (_, mut inner) = ctx.enclosed(TokenKind::Begin, TokenKind::End)?;
        let label = self.parse_block_label(&mut inner)?;
        let items = self.parse_body_items(&mut inner)?;
        self.parse_end_label(ctx, label.as_deref())?;

        Ok(GenerateBlockNode {
            label,
            items,
            location,
            range: ctx.range_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn statement(source: &str) -> Statement {
        Parser::new(source)
            .expect("Parser creation failed")
            .parse_standalone_statement()
            .expect("Parsing failed")
    }

    fn body(source: &str) -> Vec<BodyItem> {
        let unit = Parser::new(source)
            .expect("Parser creation failed")
            .parse()
            .expect("Parsing failed");
        match unit.items.into_iter().next() {
            Some(Item::Module(module)) => module.body,
            _ => panic!("Expected module"),
        }
    }

    #[test]
    fn test_non_blocking_assignment_statement() {
        let Statement::Expression(stmt) = statement("z <= z + 1;") else {
            panic!("Expected expression statement");
        };
        match &stmt.expr.kind {
            ExprKind::Assignment { op, value, .. } => {
                assert_eq!(*op, AssignOp::NonBlocking);
                assert!(matches!(
                    value.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            _ => panic!("Expected assignment"),
        }
    }

    #[test]
    fn test_relational_inside_condition() {
        let Statement::If(node) = statement("if (a <= b) x = 1; else x = 0;") else {
            panic!("Expected if statement");
        };
        assert!(matches!(
            node.condition.kind,
            ExprKind::Binary {
                op: BinaryOp::LessEqual,
                ..
            }
        ));
        assert!(node.else_branch.is_some());
    }

    #[test]
    fn test_labeled_block() {
        let Statement::Block(block) = statement("begin : blk a = 1; ; end : blk") else {
            panic!("Expected block");
        };
        assert_eq!(block.label.as_deref(), Some("blk"));
        assert_eq!(block.statements.len(), 2);
        assert!(matches!(block.statements[1], Statement::Empty(_)));
    }

    #[test]
    fn test_case_items_and_default() {
        let Statement::Case(node) = statement(
            "casez (sel) 2'b0?: y = a; 2'b10, 2'b11: begin y = b; end default y = 0; endcase",
        ) else {
            panic!("Expected case");
        };
        assert_eq!(node.kind, CaseKind::Casez);
        assert_eq!(node.items.len(), 2);
        assert_eq!(node.items[1].labels.len(), 2);
        assert!(node.default.is_some());
    }

    #[test]
    fn test_case_label_with_part_select() {
        let Statement::Case(node) = statement("case (op) ops[1:0]: y = 1; endcase") else {
            panic!("Expected case");
        };
        assert!(matches!(node.items[0].labels[0].kind, ExprKind::Slice { .. }));
    }

    #[rstest]
    #[case::parenthesized_conditional("(a ? 1 : 2)")]
    #[case::bare_conditional("a ? 1 : 2")]
    #[case::concatenation("{a ? 2'd1 : 2'd2, b}")]
    #[case::select("v[a ? 1 : 0]")]
    #[case::slice_with_conditional("v[a ? 3 : 1 : 0]")]
    fn test_case_label_with_nested_colon(#[case] label: &str) {
        let source = format!("case (s) {label}: y = 1; default: y = 0; endcase");
        let Statement::Case(node) = statement(&source) else {
            panic!("Expected case");
        };
        assert_eq!(node.items.len(), 1);
        assert_eq!(node.items[0].labels.len(), 1);
        let Statement::Expression(body) = &node.items[0].body else {
            panic!("Expected expression statement");
        };
        let ExprKind::Assignment { target, .. } = &body.expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(target.as_identifier(), Some("y"));
        assert!(node.default.is_some());
    }

    #[test]
    fn test_parenthesized_conditional_label_in_module() {
        let items = body("module m; always @* case (s) (a ? 1 : 2): y = 1; endcase endmodule");
        let BodyItem::Always(always) = &items[0] else {
            panic!("Expected always block");
        };
        let Statement::Case(node) = &always.body else {
            panic!("Expected case");
        };
        let ExprKind::Parenthesis(inner) = &node.items[0].labels[0].kind else {
            panic!("Expected parenthesized label");
        };
        assert!(matches!(inner.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn test_for_loop_header() {
        let Statement::For(node) = statement("for (int i = 0; i < 4; i++) sum += i;") else {
            panic!("Expected for loop");
        };
        let init = node.header.init.as_ref().unwrap();
        assert_eq!(
            init.data_type.as_ref().and_then(|t| t.keyword),
            Some(TokenKind::Int)
        );
        assert!(node.header.condition.is_some());
        assert!(matches!(
            node.header.step.as_ref().unwrap().kind,
            ExprKind::Unary {
                op: UnaryOp::PostIncrement,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_for_header() {
        let Statement::For(node) = statement("for (;;) ;") else {
            panic!("Expected for loop");
        };
        assert!(node.header.init.is_none());
        assert!(node.header.condition.is_none());
        assert!(node.header.step.is_none());
    }

    #[test]
    fn test_delay_with_unit() {
        let Statement::Delay(node) = statement("#10ns a = 1;") else {
            panic!("Expected delay");
        };
        assert_eq!(node.delay.unit, Some(TimeUnit::Ns));
        assert_eq!(node.delay.magnitude.integer_value(), Some(10));
    }

    #[test]
    fn test_delay_unit_must_touch_magnitude() {
        let Statement::Delay(node) = statement("#10 ns = 1;") else {
            panic!("Expected delay");
        };
        assert_eq!(node.delay.unit, None);
        assert!(matches!(node.body.as_ref(), Statement::Expression(_)));
    }

    #[test]
    fn test_sensitivity_lists() {
        let items = body(
            "module m; always @(posedge clk or negedge rst_n, en) q <= d; \
             always @* y = a; always @(*) z = b; always_comb w = c; endmodule",
        );
        let sensitivities: Vec<Option<&SensitivityNode>> = items
            .iter()
            .map(|item| match item {
                BodyItem::Always(block) => block.sensitivity.as_ref(),
                _ => panic!("Expected always block"),
            })
            .collect();
        let first = sensitivities[0].unwrap();
        assert_eq!(first.events.len(), 3);
        assert_eq!(first.events[0].edge, Some(Edge::Posedge));
        assert_eq!(first.events[2].edge, None);
        assert!(sensitivities[1].unwrap().star);
        assert!(sensitivities[2].unwrap().star);
        assert!(sensitivities[3].is_none());
    }

    #[test]
    fn test_assign_requires_blocking_form() {
        let items = body("module m; assign #2 a = b, c = d; endmodule");
        match &items[0] {
            BodyItem::Assign(node) => {
                assert!(node.delay.is_some());
                assert_eq!(node.assignments.len(), 2);
            }
            _ => panic!("Expected assign"),
        }

        let err = Parser::new("module m; assign a + b; endmodule")
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Malformed(_)));
    }

    #[test]
    fn test_generate_constructs() {
        let items = body(
            "module m; genvar i; generate for (i = 0; i < 4; i = i + 1) begin : g \
             assign y[i] = a[i]; end endgenerate \
             if (W > 1) begin wire x; end else wire z; \
             case (MODE) 0, 1: wire p; default: begin end endcase endmodule",
        );
        assert!(matches!(items[0], BodyItem::Genvar(_)));
        match &items[1] {
            BodyItem::GenerateRegion(region) => match &region.items[0] {
                BodyItem::Generate(GenerateNode::For(node)) => {
                    assert_eq!(node.body.label.as_deref(), Some("g"));
                }
                _ => panic!("Expected generate for"),
            },
            _ => panic!("Expected generate region"),
        }
        match &items[2] {
            BodyItem::Generate(GenerateNode::If(node)) => {
                assert_eq!(node.else_block.as_ref().unwrap().items.len(), 1);
            }
            _ => panic!("Expected generate if"),
        }
        match &items[3] {
            BodyItem::Generate(GenerateNode::Case(node)) => {
                assert_eq!(node.items[0].labels.len(), 2);
                assert!(node.default.as_ref().unwrap().items.is_empty());
            }
            _ => panic!("Expected generate case"),
        }
    }

    #[test]
    fn test_missing_semicolon_in_block() {
        let err = Parser::new("begin a = 1 end")
            .unwrap()
            .parse_standalone_statement()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedEnd { .. }));
        assert_eq!(err.location, SourceLocation::new(1, 12));
    }
}
