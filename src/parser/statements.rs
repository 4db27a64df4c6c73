//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Assignments: `x = 42 $`
//! - I/O: `PRINT: expr $`, `SCAN: a, b $`
//! - Control flow: `IF`, `REPEAT WHEN`, `FOR`
//! - Blocks: `START <kw> ... END <kw>`
//!
//! # Grammar
//!
//! ```text
//! statement ::= print_stmt | scan_stmt | if_stmt | repeat_stmt
//!             | for_stmt | assignment "$"
//! block(kw) ::= statement* "END" kw
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::expressions::Closing;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenKind::Print) {
            return self.parse_print_statement();
        }

        if self.match_token(TokenKind::Scan) {
            return self.parse_scan_statement();
        }

        if self.match_token(TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(TokenKind::Repeat) {
            return self.parse_repeat_statement();
        }

        if self.match_token(TokenKind::For) {
            return self.parse_for_statement();
        }

        // Anything else must be an assignment
        let assignment = self.parse_assignment(Closing::Reject)?;
        self.expect_terminator("assignment")?;
        Ok(Stmt::Assignment(assignment))
    }

    /// Parse statements up to and including `END <kind>`.
    ///
    /// `opened_at` is the line of the `START` that opened the block, reported
    /// if the input runs out first.
    pub(crate) fn parse_block(
        &mut self,
        kind: TokenKind,
        opened_at: usize,
    ) -> Result<Block, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::End) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        if self.is_at_end() {
            return Err(ParseError::UnterminatedBlock {
                block: kind,
                opened_at,
                line: self.peek().line,
            });
        }

        self.expect(TokenKind::End, &format!("'END' for {}", kind))?;
        self.expect(kind, &format!("'{}' after 'END'", kind))?;

        Ok(Block { statements })
    }

    /// Parse `identifier = expression` without a terminator.
    pub(crate) fn parse_assignment(&mut self, closing: Closing) -> Result<Assignment, ParseError> {
        let name = self.expect_identifier("for assignment")?;
        self.expect(TokenKind::Equal, "'=' after identifier")?;
        let value = self.parse_expression_with(closing)?;

        Ok(Assignment { name, value })
    }

    /// Parse `PRINT: expr (& expr)* $`
    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Colon, "':' after 'PRINT'")?;

        let mut expressions = vec![self.parse_expression()?];
        while self.match_token(TokenKind::Ampersand) {
            expressions.push(self.parse_expression()?);
        }

        self.expect_terminator("PRINT statement")?;
        Ok(Stmt::Print(PrintStmt { expressions }))
    }

    /// Parse `SCAN: a (, b)* $`
    fn parse_scan_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Colon, "':' after 'SCAN'")?;

        let mut names = vec![self.expect_identifier("in SCAN")?];
        while self.match_token(TokenKind::Comma) {
            names.push(self.expect_identifier("after ','")?);
        }

        self.expect_terminator("SCAN statement")?;
        Ok(Stmt::Scan(ScanStmt { names }))
    }

    /// Parse if statement with its `ELSE IF` and `ELSE` alternatives
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        log::trace!("IF statement at line {}", self.previous().line);

        let condition = self.parse_expression()?;
        let then_branch = self.parse_if_block("IF")?;

        let mut alternatives = Vec::new();
        let mut else_branch = None;

        while self.match_token(TokenKind::Else) {
            if self.match_token(TokenKind::If) {
                let condition = self.parse_expression()?;
                let body = self.parse_if_block("ELSE IF")?;
                alternatives.push(ElseIf { condition, body });
            } else {
                // A bare ELSE always ends the chain
                else_branch = Some(self.parse_if_block("ELSE")?);
                break;
            }
        }

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            alternatives,
            else_branch,
        }))
    }

    /// Parse `START IF ... END IF` following an IF, ELSE IF or ELSE.
    fn parse_if_block(&mut self, ctx: &str) -> Result<Block, ParseError> {
        let opened_at = self
            .expect(TokenKind::Start, &format!("'START' before {} block", ctx))?
            .line;
        self.expect(TokenKind::If, "'IF' after 'START'")?;
        self.parse_block(TokenKind::If, opened_at)
    }

    /// Parse `REPEAT WHEN cond START REPEAT ... END REPEAT`
    fn parse_repeat_statement(&mut self) -> Result<Stmt, ParseError> {
        log::trace!("REPEAT statement at line {}", self.previous().line);

        self.expect(TokenKind::When, "'WHEN' after 'REPEAT'")?;
        let condition = self.parse_expression()?;

        let opened_at = self
            .expect(TokenKind::Start, "'START' before REPEAT block")?
            .line;
        self.expect(TokenKind::Repeat, "'REPEAT' after 'START'")?;
        let body = self.parse_block(TokenKind::Repeat, opened_at)?;

        Ok(Stmt::Repeat(RepeatStmt { condition, body }))
    }

    /// Parse `FOR (init, cond, update) START FOR ... END FOR`
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        log::trace!("FOR statement at line {}", self.previous().line);

        self.expect(TokenKind::LeftParen, "'(' after 'FOR'")?;
        let init = self.parse_assignment(Closing::Reject)?;
        self.expect(TokenKind::Comma, "',' after FOR initializer")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Comma, "',' after FOR condition")?;
        // The header's closing ')' ends the update expression
        let update = self.parse_assignment(Closing::Yield)?;
        self.expect(TokenKind::RightParen, "')' after FOR header")?;

        let opened_at = self
            .expect(TokenKind::Start, "'START' before FOR block")?
            .line;
        self.expect(TokenKind::For, "'FOR' after 'START'")?;
        let body = self.parse_block(TokenKind::For, opened_at)?;

        Ok(Stmt::For(ForStmt {
            init,
            condition,
            update,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(body: &str) -> Result<Vec<Stmt>, ParseError> {
        let source = format!("SCRIPT AREA\nSTART SCRIPT\n{}\nEND SCRIPT", body);
        Parser::new(&source).parse_program().map(|p| p.statements)
    }

    #[test]
    fn test_assignment() {
        let stmts = statements("x = y + 1 $").unwrap();

        match &stmts[0] {
            Stmt::Assignment(assign) => {
                assert_eq!(assign.name.lexeme, "x");
                assert!(matches!(assign.value, Expr::Binary(_)));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_missing_terminator() {
        let err = statements("x = 1\ny = 2 $").unwrap_err();

        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert!(err.expected().contains("'$'"));
        assert_eq!(err.found(), "identifier 'y'");
        assert_eq!(err.line(), 4);

        let err = statements("x = 1 END SCRIPT").unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(err.expected().contains("'$'"));
    }

    #[test]
    fn test_print_and_scan() {
        let stmts = statements("SCAN: a, b $\nPRINT: a & $ & b $").unwrap();

        match &stmts[0] {
            Stmt::Scan(scan) => {
                let names: Vec<&str> = scan.names.iter().map(|t| t.lexeme.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("Expected SCAN, got {:?}", other),
        }
        match &stmts[1] {
            Stmt::Print(print) => {
                // `&` is folded into the expression as a concatenation operator
                assert_eq!(print.expressions.len(), 1);
                assert!(matches!(print.expressions[0], Expr::Binary(_)));
            }
            other => panic!("Expected PRINT, got {:?}", other),
        }
    }

    #[test]
    fn test_print_requires_colon() {
        let err = statements("PRINT x $").unwrap_err();

        assert!(err.expected().contains("':' after 'PRINT'"));
    }

    #[test]
    fn test_scan_rejects_expression() {
        let err = statements("SCAN: a + b $").unwrap_err();

        assert!(err.expected().contains("'$'"));
        assert_eq!(err.found(), "'+'");
    }

    #[test]
    fn test_if_with_alternatives() {
        let body = "IF x > 0 START IF\n  PRINT: 1 $\nEND IF\n\
                    ELSE IF x < 0 START IF\n  PRINT: 2 $\nEND IF\n\
                    ELSE IF x == 0 START IF\n  PRINT: 3 $\nEND IF\n\
                    ELSE START IF\n  PRINT: 4 $\n  PRINT: 5 $\nEND IF";
        let stmts = statements(body).unwrap();

        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::If(node) => {
                assert_eq!(node.then_branch.statements.len(), 1);
                assert_eq!(node.alternatives.len(), 2);
                assert_eq!(node.alternatives[0].condition.line(), 6);
                assert_eq!(node.alternatives[1].condition.line(), 9);
                let else_branch = node.else_branch.as_ref().expect("else branch");
                assert_eq!(else_branch.statements.len(), 2);
            }
            other => panic!("Expected IF, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_after_else_is_not_consumed() {
        let body = "IF a START IF\nEND IF\n\
                    ELSE START IF\nEND IF\n\
                    ELSE IF b START IF\nEND IF";
        let err = statements(body).unwrap_err();

        // The IF stops at the bare ELSE; the following ELSE is read as the
        // start of a new statement
        assert_eq!(err.line(), 7);
        assert_eq!(err.found(), "'ELSE'");
        assert!(err.expected().contains("identifier"));
    }

    #[test]
    fn test_repeat() {
        let stmts = statements("REPEAT WHEN n > 0 START REPEAT\n n = n - 1 $\nEND REPEAT").unwrap();

        match &stmts[0] {
            Stmt::Repeat(node) => {
                assert!(matches!(node.condition, Expr::Binary(_)));
                assert_eq!(node.body.statements.len(), 1);
            }
            other => panic!("Expected REPEAT, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_requires_when() {
        let err = statements("REPEAT n > 0 START REPEAT END REPEAT").unwrap_err();

        assert!(err.expected().contains("'WHEN'"));
    }

    #[test]
    fn test_for_loop() {
        let stmts =
            statements("FOR (i = 0, i < (10 + 1), i = i + 1) START FOR\n PRINT: i $\nEND FOR")
                .unwrap();

        match &stmts[0] {
            Stmt::For(node) => {
                assert_eq!(node.init.name.lexeme, "i");
                assert!(matches!(node.condition, Expr::Binary(_)));
                assert_eq!(node.update.name.lexeme, "i");
                assert!(matches!(node.update.value, Expr::Binary(_)));
                assert_eq!(node.body.statements.len(), 1);
            }
            other => panic!("Expected FOR, got {:?}", other),
        }
    }

    #[test]
    fn test_for_update_may_use_parentheses() {
        let stmts = statements("FOR (i = 0, i < 3, i = (i + 1) * 2) START FOR END FOR").unwrap();

        match &stmts[0] {
            Stmt::For(node) => assert!(matches!(node.update.value, Expr::Binary(_))),
            other => panic!("Expected FOR, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_paren_in_for_condition() {
        let err = statements("FOR (i = 0, i < 3), i = i + 1) START FOR END FOR").unwrap_err();

        assert!(matches!(err, ParseError::MismatchedParentheses { .. }));
    }

    #[test]
    fn test_nested_blocks() {
        let body = "REPEAT WHEN a START REPEAT\n\
                    IF b START IF\n\
                    FOR (i = 0, i < 2, i = i + 1) START FOR\n\
                    x = x + i $\n\
                    END FOR\n\
                    END IF\n\
                    END REPEAT";
        let stmts = statements(body).unwrap();

        let Stmt::Repeat(repeat) = &stmts[0] else {
            panic!("Expected REPEAT");
        };
        let Stmt::If(inner) = &repeat.body.statements[0] else {
            panic!("Expected IF");
        };
        assert!(matches!(inner.then_branch.statements[0], Stmt::For(_)));
    }

    #[test]
    fn test_mismatched_block_end() {
        let err = statements("IF a START IF\nx = 1 $\nEND REPEAT").unwrap_err();

        assert!(err.expected().contains("'IF' after 'END'"));
        assert_eq!(err.found(), "'REPEAT'");
    }

    #[test]
    fn test_unterminated_block() {
        let source = "SCRIPT AREA\nSTART SCRIPT\nREPEAT WHEN a START REPEAT\nx = 1 $\n";
        let err = Parser::new(source).parse_program().unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnterminatedBlock {
                block: TokenKind::Repeat,
                opened_at: 3,
                ..
            }
        ));
        assert_eq!(err.found(), "end of input");
    }

    #[test]
    fn test_declaration_after_statement_rejected() {
        let err = statements("x = 1 $\nINT y $").unwrap_err();

        assert_eq!(err.found(), "'INT'");
    }
}
