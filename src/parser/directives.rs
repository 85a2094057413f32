//! Pre-compile directive parsing
//!
//! Directives are recognized by their text and parsed together with their
//! arguments. Nothing is preprocessed: `` `include `` is only recorded, and
//! conditional regions are skipped whole with a warning.
//!
//! # Grammar
//!
//! ```text
//! directive ::= '`resetall' | '`celldefine' | '`endcelldefine'
//!             | '`begin_keywords' string | '`end_keywords'
//!             | '`include' string
//!             | '`timescale' time_value '/' time_value
//!             | '`default_nettype' word
//!             | '`unconnected_drive' ( 'pull0' | 'pull1' ) | '`nounconnected_drive'
//!             | ( '`ifdef' | '`ifndef' ) identifier { token } '`endif'
//! time_value ::= ( '1' | '10' | '100' ) time_unit
//! ```

use super::ast::*;
use super::context::Context;
use super::errors::{ErrorKind, Result};
use super::parse::Parser;
use super::token::TokenKind;

fn unquote(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

impl Parser {
    pub(crate) fn parse_directive(&self, ctx: &mut Context<'_>) -> Result<DirectiveNode> {
        let start = ctx.position();
        let token = ctx.expect(TokenKind::Directive)?;
        let location = token.location;
        let name = token.text.trim_start_matches('`');

        let kind = match name {
            "resetall" => DirectiveKind::ResetAll,
            "celldefine" => DirectiveKind::CellDefine,
            "endcelldefine" => DirectiveKind::EndCellDefine,
            "begin_keywords" | "begin_keyword" => DirectiveKind::BeginKeywords {
                version: self.parse_string_argument(ctx, "keyword version string")?,
            },
            "end_keywords" | "end_keyword" => DirectiveKind::EndKeywords,
            "include" => DirectiveKind::Include {
                path: self.parse_string_argument(ctx, "include path string")?,
            },
            "timescale" => {
                let unit = self.parse_time_value(ctx)?;
                ctx.expect_described(TokenKind::Div, "'/' between time unit and precision")?;
                let precision = self.parse_time_value(ctx)?;
                DirectiveKind::Timescale { unit, precision }
            }
            "default_nettype" => {
                let net_type = match ctx.current() {
                    Some(word) if word.kind.is_word() => {
                        ctx.advance();
                        word.text.clone()
                    }
                    Some(other) => return Err(ctx.unexpected("net type", other)),
                    None => return Err(ctx.unexpected_end("net type")),
                };
                DirectiveKind::DefaultNettype { net_type }
            }
            "unconnected_drive" => match ctx.current() {
                Some(pull) if pull.is(TokenKind::Pull0) || pull.is(TokenKind::Pull1) => {
                    ctx.advance();
                    DirectiveKind::UnconnectedDrive { pull: pull.kind }
                }
                Some(other) => return Err(ctx.unexpected("'pull0' or 'pull1'", other)),
                None => return Err(ctx.unexpected_end("'pull0' or 'pull1'")),
            },
            "nounconnected_drive" => DirectiveKind::NoUnconnectedDrive,
            "ifdef" | "ifndef" => self.skip_conditional(ctx, name == "ifndef", location)?,
            "else" | "elsif" | "endif" => {
                return Err(ctx.error(
                    ErrorKind::Malformed(format!("'{}' without a matching '`ifdef'", token.text)),
                    location,
                ))
            }
            "define" | "undef" | "undefineall" => {
                return Err(ctx.error(ErrorKind::RejectedDirective(token.text.clone()), location))
            }
            _ => {
                return Err(ctx.error(ErrorKind::UnsupportedDirective(token.text.clone()), location))
            }
        };

        Ok(DirectiveNode {
            kind,
            location,
            range: ctx.range_from(start),
        })
    }

    fn parse_string_argument(&self, ctx: &mut Context<'_>, expected: &str) -> Result<String> {
        let token = ctx.expect_described(TokenKind::StringLiteral, expected)?;
        Ok(unquote(&token.text))
    }

    fn parse_time_value(&self, ctx: &mut Context<'_>) -> Result<TimeValue> {
        let token = ctx.expect_described(TokenKind::Literal, "time magnitude")?;
        let magnitude = match token.text.as_str() {
            "1" => 1,
            "10" => 10,
            "100" => 100,
            other => {
                return Err(ctx.error(
                    ErrorKind::Malformed(format!(
                        "invalid time magnitude '{}', expected 1, 10 or 100",
                        other
                    )),
                    token.location,
                ))
            }
        };

        let unit = match ctx.current() {
            Some(unit) => match TimeUnit::from_kind(unit.kind) {
                Some(value) => {
                    ctx.advance();
                    value
                }
                None => return Err(ctx.unexpected("time unit", unit)),
            },
            None => return Err(ctx.unexpected_end("time unit")),
        };

        Ok(TimeValue { magnitude, unit })
    }

    /// Skip to the `` `endif `` closing this conditional, counting nested
    /// conditionals, and warn that the region was not evaluated.
    fn skip_conditional(
        &self,
        ctx: &mut Context<'_>,
        negated: bool,
        location: SourceLocation,
    ) -> Result<DirectiveKind> {
        let macro_name = ctx.expect_identifier()?.text.clone();
        let skip_start = ctx.position();

        let mut depth = 1usize;
        loop {
            let Some(token) = ctx.advance() else {
                return Err(ctx.error(
                    ErrorKind::Malformed(format!(
                        "no matching '`endif' for conditional on '{}'",
                        macro_name
                    )),
                    location,
                ));
            };
            if !token.is(TokenKind::Directive) {
                continue;
            }
            match token.text.as_str() {
                "`ifdef" | "`ifndef" => depth += 1,
                "`endif" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }

        let skipped = TokenRange::new(skip_start, ctx.position() - 1);
        tracing::debug!(macro_name = %macro_name, tokens = skipped.len(), "skipped conditional region");
        self.warn(
            format!(
                "conditional compilation on '{}' is not evaluated, {} token(s) skipped",
                macro_name,
                skipped.len()
            ),
            location,
        );

        Ok(DirectiveKind::Conditional {
            negated,
            macro_name,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::diagnostics::Severity;

    fn directives(source: &str) -> Vec<DirectiveKind> {
        let unit = Parser::new(source)
            .expect("Parser creation failed")
            .with_sink(CollectingSink::new())
            .parse()
            .expect("Parsing failed");
        unit.items
            .into_iter()
            .map(|item| match item {
                Item::Directive(node) => node.kind,
                _ => panic!("Expected directive"),
            })
            .collect()
    }

    #[test]
    fn test_simple_directives() {
        let kinds = directives(
            "`resetall\n`celldefine\n`endcelldefine\n`begin_keywords \"1800-2017\"\n`end_keywords\n\
             `include \"defs.vh\"\n`default_nettype none\n`unconnected_drive pull1\n`nounconnected_drive\n",
        );
        assert_eq!(
            kinds,
            vec![
                DirectiveKind::ResetAll,
                DirectiveKind::CellDefine,
                DirectiveKind::EndCellDefine,
                DirectiveKind::BeginKeywords {
                    version: "1800-2017".to_string()
                },
                DirectiveKind::EndKeywords,
                DirectiveKind::Include {
                    path: "defs.vh".to_string()
                },
                DirectiveKind::DefaultNettype {
                    net_type: "none".to_string()
                },
                DirectiveKind::UnconnectedDrive {
                    pull: TokenKind::Pull1
                },
                DirectiveKind::NoUnconnectedDrive,
            ]
        );
    }

    #[test]
    fn test_timescale() {
        let kinds = directives("`timescale 1ns / 10ps");
        assert_eq!(
            kinds,
            vec![DirectiveKind::Timescale {
                unit: TimeValue {
                    magnitude: 1,
                    unit: TimeUnit::Ns
                },
                precision: TimeValue {
                    magnitude: 10,
                    unit: TimeUnit::Ps
                },
            }]
        );
    }

    #[test]
    fn test_timescale_rejects_magnitude() {
        let err = Parser::new("`timescale 5ns/1ps")
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Malformed(_)));
        assert_eq!(err.location, SourceLocation::new(1, 12));
    }

    #[test]
    fn test_nested_conditional_is_skipped_with_warning() {
        let sink = CollectingSink::new();
        let unit = Parser::new("`ifdef A\n`ifndef B\nwire x;\n`endif\n`endif\nmodule m; endmodule")
            .unwrap()
            .with_sink(sink.clone())
            .parse()
            .unwrap();
        assert_eq!(unit.items.len(), 2);
        match &unit.items[0] {
            Item::Directive(DirectiveNode {
                kind:
                    DirectiveKind::Conditional {
                        negated,
                        macro_name,
                        skipped,
                    },
                ..
            }) => {
                assert!(!negated);
                assert_eq!(macro_name, "A");
                assert_eq!(skipped.len(), 6);
            }
            _ => panic!("Expected conditional"),
        }
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_unterminated_conditional() {
        let err = Parser::new("`ifdef A\nwire x;")
            .unwrap()
            .with_sink(CollectingSink::new())
            .parse()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Malformed(_)));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_macro_directives_are_rejected() {
        let err = Parser::new("`define W 8").unwrap().parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::RejectedDirective("`define".to_string()));

        let err = Parser::new("`pragma protect").unwrap().parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedDirective("`pragma".to_string()));

        let err = Parser::new("`endif").unwrap().parse().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Malformed(_)));
    }
}
