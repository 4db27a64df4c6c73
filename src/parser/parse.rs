//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, program header and trailer
//! - `declarations`: Parsing the typed declarations that open a script
//! - `statements`: Parsing statements and `START ... END` blocks
//! - `expressions`: The dual-stack operator precedence automaton
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use std::fmt;

/// Fatal syntax error. Parsing stops at the first one.
///
/// Every variant records the line it was raised on, what the parser was
/// looking for, and what it found instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A specific token or construct was required but something else was found
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    /// Input ended inside a `START <kw> ... END <kw>` block
    UnterminatedBlock {
        block: TokenKind,
        opened_at: usize,
        line: usize,
    },

    /// A `)` without an open `(`, or a `(` never closed
    MismatchedParentheses { found: String, line: usize },

    /// An operator was reduced with fewer operands than its arity
    MissingOperand {
        operator: String,
        found: String,
        line: usize,
    },

    /// An expression that reduces to no value, or to more than one
    InvalidExpression {
        reason: String,
        found: String,
        line: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::UnterminatedBlock { line, .. }
            | ParseError::MismatchedParentheses { line, .. }
            | ParseError::MissingOperand { line, .. }
            | ParseError::InvalidExpression { line, .. } => *line,
        }
    }

    /// The construct the parser expected at the point of failure.
    pub fn expected(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } => expected.clone(),
            ParseError::UnterminatedBlock { block, .. } => format!("'END {}'", block),
            ParseError::MismatchedParentheses { .. } => "matching parentheses".to_string(),
            ParseError::MissingOperand { operator, .. } => {
                format!("an operand for '{}'", operator)
            }
            ParseError::InvalidExpression { .. } => "a single expression".to_string(),
        }
    }

    /// What was actually observed at the point of failure.
    pub fn found(&self) -> &str {
        match self {
            ParseError::UnexpectedToken { found, .. }
            | ParseError::MismatchedParentheses { found, .. }
            | ParseError::MissingOperand { found, .. }
            | ParseError::InvalidExpression { found, .. } => found,
            ParseError::UnterminatedBlock { .. } => "end of input",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at line {}: ", self.line())?;
        match self {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => write!(f, "Expected {}, found {}", expected, found),
            ParseError::UnterminatedBlock {
                block, opened_at, ..
            } => write!(
                f,
                "Unterminated {} block opened at line {}: expected 'END {}', found end of input",
                block, opened_at, block
            ),
            ParseError::MismatchedParentheses { found, .. } => {
                write!(f, "Mismatched parentheses near {}", found)
            }
            ParseError::MissingOperand {
                operator, found, ..
            } => write!(
                f,
                "Missing operand for operator '{}' near {}",
                operator, found
            ),
            ParseError::InvalidExpression { reason, found, .. } => {
                write!(f, "Invalid expression ({}) near {}", reason, found)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive descent parser for script programs
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    diagnostics: Vec<LexError>,
}

impl Parser {
    /// Scan `source` and prepare to parse it. Lexical errors do not fail
    /// construction; they are kept in [`Parser::diagnostics`].
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        Self {
            tokens,
            position: 0,
            diagnostics: lexer.into_errors(),
        }
    }

    /// Parse an already scanned token sequence. An EOF token is appended if
    /// the sequence does not end with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Self {
            tokens,
            position: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Recoverable lexical errors found while scanning the source.
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parse the entire program:
    /// `SCRIPT AREA START SCRIPT <declarations> <statements> END SCRIPT`
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        self.expect(TokenKind::Script, "'SCRIPT' at the beginning of the program")?;
        self.expect(TokenKind::Area, "'AREA' after 'SCRIPT'")?;
        let opened_at = self.expect(TokenKind::Start, "'START'")?.line;
        self.expect(TokenKind::Script, "'SCRIPT' after 'START'")?;

        while self.peek().kind.is_type_keyword() {
            program.declarations.extend(self.parse_declaration()?);
        }

        program.statements = self.parse_block(TokenKind::Script, opened_at)?.statements;

        if !self.is_at_end() {
            return Err(self.unexpected("end of input after 'END SCRIPT'"));
        }

        log::debug!(
            "parsed {} declaration(s) and {} statement(s)",
            program.declarations.len(),
            program.statements.len()
        );
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    /// Consume a token of `kind` or fail naming `expected`.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::Identifier, &format!("identifier {ctx}"))
    }

    pub(crate) fn expect_terminator(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect(TokenKind::Dollar, &format!("'$' at the end of {ctx}"))?;
        Ok(())
    }

    /// Build an [`ParseError::UnexpectedToken`] for the current token.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.describe(),
            line: token.line,
        }
    }
}
