//! Declaration parsing implementation
//!
//! Declarations open a script, before any statement:
//!
//! ```text
//! declaration ::= type entry ("," entry)* "$"
//! entry       ::= identifier ["=" expression]
//! type        ::= "INT" | "FLOAT" | "CHAR" | "BOOL"
//! ```
//!
//! Each entry becomes its own [`VarDecl`] sharing the declaration's type token.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one declaration line, e.g. `INT a, b = 2, c $`.
    pub(crate) fn parse_declaration(&mut self) -> Result<Vec<VarDecl>, ParseError> {
        if !self.peek().kind.is_type_keyword() {
            return Err(self.unexpected("a type keyword (INT, FLOAT, CHAR or BOOL)"));
        }
        let var_type = self.advance().clone();

        let mut decls = Vec::new();
        loop {
            let name = self.expect_identifier("for variable name")?;
            let initializer = if self.match_token(TokenKind::Equal) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            decls.push(VarDecl {
                var_type: var_type.clone(),
                name,
                initializer,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect_terminator("declaration")?;
        Ok(decls)
    }
}
