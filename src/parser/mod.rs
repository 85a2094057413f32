//! Verilog/SystemVerilog source parser
//!
//! This module transforms source text into a syntax tree:
//! - [`source`]: Source text, line table and error-context rendering
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`context`]: Bounded cursors over the token arena
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! - Modules with ANSI or non-ANSI port lists and `#(...)` parameter lists
//! - Parameter, port, net, variable and genvar declarations
//! - Continuous assignments, `always*`/`initial` blocks, instantiations
//! - Procedural `begin`/`if`/`case`/`for`, delays and event controls
//! - Generate regions, generate `if`/`for`/`case` and named blocks
//! - Pre-compile directives; conditional regions are skipped, macros rejected
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser. Every construct with a balanced
//! closer is first isolated into its own bounded context, so errors are
//! reported inside the construct that caused them. Expressions use a Pratt
//! parser. No external parser generator dependencies.

pub mod ast;
pub mod context;
mod declarations;
mod directives;
pub mod errors;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod source;
mod statements;
pub mod token;

pub use errors::{ErrorKind, LexError, LexErrorKind, ParseError};
pub use expressions::binding_power;
pub use parse::Parser;
