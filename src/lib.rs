//! # Introduction
//!
//! svparse is a front end for a synthesizable subset of Verilog and
//! SystemVerilog. It turns source text into a syntax tree in which every node
//! knows its position and the exact token span it was built from, and it
//! reports malformed input with a rendered source excerpt.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → SourceUnit → Prototype extraction
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds a [`SourceUnit`].
//! 2. [`prototype`]: reduces each module to its parameters and ports.
//! 3. [`diagnostics`]: warning sinks for recoverable findings.
//! 4. [`config`]: parse options.
//!
//! ## Example
//!
//! ```
//! let unit = svparse::parse_str("module m(input a, output b); assign b = a; endmodule")?;
//! let module = unit.modules().next().expect("one module");
//! assert_eq!(module.name, "m");
//! # Ok::<(), svparse::ParseError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod parser;
pub mod prototype;

pub use parser::ast::SourceUnit;
pub use parser::{ParseError, Parser};

/// Parse `source` with default options.
pub fn parse_str(source: &str) -> Result<SourceUnit, ParseError> {
    Parser::new(source)?.parse()
}
