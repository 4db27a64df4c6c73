//! # Introduction
//!
//! lexor turns programs written in a small structured teaching language into
//! a syntax tree, and renders that tree through visitors.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Visitor
//! ```
//!
//! 1. [`parser::lexer`] — scans source into tokens; unknown characters are
//!    reported and skipped.
//! 2. [`parser::parse`] — recursive descent over statements, with a two-stack
//!    precedence automaton for expressions. The first syntax error is fatal.
//! 3. [`parser::ast`] — the node types.
//! 4. [`visitor`] — the [`visitor::Visitor`] trait plus the tree printer and
//!    node counter built on it.
//!
//! ## Example
//!
//! ```
//! use lexor::parser::parse::Parser;
//! use lexor::visitor::AstPrinter;
//!
//! let source = "SCRIPT AREA\nSTART SCRIPT\nINT _x = 10 $\nEND SCRIPT";
//! let program = Parser::new(source).parse_program().unwrap();
//! let text = AstPrinter::new().print(&program);
//! assert!(text.contains("(Declare INT _x = 10)"));
//! ```

pub mod parser;
pub mod visitor;

use parser::ast::Program;
use parser::parse::{ParseError, Parser};

/// Parse a whole program, discarding lexical diagnostics.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source).parse_program()
}
