//! Script source parser
//!
//! This module transforms script source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`parse::Parser`] and its error type
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! ```text
//! SCRIPT AREA
//! START SCRIPT
//!     INT x, y = 2 $
//!     x = y * (3 + 1) $
//!     IF x > 5 START IF
//!         PRINT: x & $ $
//!     END IF
//! END SCRIPT
//! ```
//!
//! - Types: `INT`, `FLOAT`, `CHAR`, `BOOL`
//! - Statements: assignment, `PRINT`, `SCAN`, `IF`/`ELSE IF`/`ELSE`,
//!   `REPEAT WHEN`, `FOR`
//! - Every simple statement ends with `$`; `%%` starts a comment
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent for statements; expressions go through an
//! explicit two-stack operator precedence automaton (see `expressions`).
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

