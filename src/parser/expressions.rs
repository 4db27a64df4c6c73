//! Expression parsing implementation
//!
//! Expressions are parsed by an explicit operator precedence automaton with
//! two stacks: one of finished operand subtrees and one of pending operators.
//! No recursion is involved, so nesting depth is bounded only by memory.
//!
//! # Algorithm
//!
//! Tokens are read for as long as they can belong to an expression:
//!
//! - A literal or identifier is pushed onto the operand stack.
//! - `(` is pushed onto the operator stack.
//! - `)` reduces pending operators down to the matching `(`, then wraps the
//!   enclosed operand in a [`Grouping`].
//! - A binary operator first reduces every pending operator of greater or
//!   equal precedence (so equal levels associate to the left), then is pushed.
//! - `+`, `-` and `NOT` met where an operand is expected are unary; they are
//!   pushed without reducing and bind to the single operand that follows.
//! - A `$` met where an operand is expected becomes a [`Newline`] leaf.
//!
//! When the run ends the operator stack is drained and exactly one operand
//! must remain.
//!
//! # Precedence
//!
//! | Level | Operators                    |
//! |-------|------------------------------|
//! | 5     | unary `+` `-` `NOT`          |
//! | 4     | `*` `/` `%`                  |
//! | 3     | `+` `-` `&`                  |
//! | 2     | `>` `>=` `<` `<=` `==` `<>`  |
//! | 1     | `AND`                        |
//! | 0     | `OR`                         |

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};

/// Binding strength of a prefix operator, above every binary level.
const UNARY_PRECEDENCE: u8 = 5;

/// How an expression treats a `)` that has no `(` of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closing {
    /// The `)` is a mismatched parenthesis.
    Reject,
    /// The `)` belongs to the enclosing construct; the expression ends before it.
    Yield,
}

/// Precedence of an infix operator token.
pub fn binary_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Star | TokenKind::Slash | TokenKind::Modulo => Some(4),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Ampersand => Some(3),
        TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::EqualEqual
        | TokenKind::NotEqual => Some(2),
        TokenKind::And => Some(1),
        TokenKind::Or => Some(0),
        _ => None,
    }
}

/// Entry on the operator stack.
#[derive(Debug)]
enum Pending {
    /// An open `(`; `base` is the operand stack height when it was pushed.
    Open { token: Token, base: usize },
    Unary(Token),
    Binary(Token),
}

impl Pending {
    /// `None` for `(`, which no operator may reduce past.
    fn precedence(&self) -> Option<u8> {
        match self {
            Pending::Open { .. } => None,
            Pending::Unary(_) => Some(UNARY_PRECEDENCE),
            Pending::Binary(token) => binary_precedence(token.kind),
        }
    }
}

/// The two stacks of the automaton.
#[derive(Debug, Default)]
struct Automaton {
    operands: Vec<Expr>,
    operators: Vec<Pending>,
}

impl Automaton {
    fn has_open_paren(&self) -> bool {
        self.operators
            .iter()
            .any(|op| matches!(op, Pending::Open { .. }))
    }

    /// Operand stack height below which the innermost open group may not reach.
    fn floor(&self) -> usize {
        self.operators
            .iter()
            .rev()
            .find_map(|op| match op {
                Pending::Open { base, .. } => Some(*base),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Pop one operator and combine it with its operands.
    ///
    /// `near` is the token that triggered the reduction, used for diagnostics.
    fn reduce(&mut self, near: &Token) -> Result<(), ParseError> {
        let floor = self.floor();
        let available = self.operands.len().saturating_sub(floor);

        match self.operators.pop() {
            Some(Pending::Unary(operator)) => {
                if available < 1 {
                    return Err(missing_operand(&operator, near));
                }
                let Some(operand) = self.operands.pop() else {
                    return Err(missing_operand(&operator, near));
                };
                self.operands.push(Expr::unary(operator, operand));
            }
            Some(Pending::Binary(operator)) => {
                if available < 2 {
                    return Err(missing_operand(&operator, near));
                }
                let (Some(right), Some(left)) = (self.operands.pop(), self.operands.pop()) else {
                    return Err(missing_operand(&operator, near));
                };
                let node = match operator.kind {
                    TokenKind::And | TokenKind::Or => Expr::logical(left, operator, right),
                    _ => Expr::binary(left, operator, right),
                };
                self.operands.push(node);
            }
            Some(Pending::Open { token, .. }) => {
                return Err(ParseError::MismatchedParentheses {
                    found: near.describe(),
                    line: token.line,
                });
            }
            None => {
                return Err(ParseError::InvalidExpression {
                    reason: "no operator to apply".to_string(),
                    found: near.describe(),
                    line: near.line,
                });
            }
        }

        Ok(())
    }

    /// Reduce every pending operator binding at least as tightly as `level`.
    fn reduce_while_at_least(&mut self, level: u8, near: &Token) -> Result<(), ParseError> {
        while self
            .operators
            .last()
            .and_then(Pending::precedence)
            .is_some_and(|top| top >= level)
        {
            self.reduce(near)?;
        }
        Ok(())
    }

    /// Handle a `)`: reduce back to the innermost `(` and group what it enclosed.
    fn close_group(&mut self, close: &Token) -> Result<(), ParseError> {
        while !matches!(self.operators.last(), Some(Pending::Open { .. }) | None) {
            self.reduce(close)?;
        }

        let Some(Pending::Open { base, .. }) = self.operators.pop() else {
            return Err(ParseError::MismatchedParentheses {
                found: close.describe(),
                line: close.line,
            });
        };

        if self.operands.len() != base + 1 {
            let reason = if self.operands.len() <= base {
                "empty parentheses"
            } else {
                "missing operator between operands"
            };
            return Err(ParseError::InvalidExpression {
                reason: reason.to_string(),
                found: close.describe(),
                line: close.line,
            });
        }

        if let Some(inner) = self.operands.pop() {
            self.operands.push(Expr::grouping(inner));
        }
        Ok(())
    }

    /// Drain the operator stack and return the single remaining operand.
    fn finish(mut self, end: &Token) -> Result<Expr, ParseError> {
        while let Some(top) = self.operators.last() {
            if let Pending::Open { token, .. } = top {
                return Err(ParseError::MismatchedParentheses {
                    found: end.describe(),
                    line: token.line,
                });
            }
            self.reduce(end)?;
        }

        if self.operands.len() > 1 {
            return Err(ParseError::InvalidExpression {
                reason: "missing operator between operands".to_string(),
                found: end.describe(),
                line: end.line,
            });
        }

        self.operands
            .pop()
            .ok_or_else(|| ParseError::InvalidExpression {
                reason: "expected an expression".to_string(),
                found: end.describe(),
                line: end.line,
            })
    }
}

fn missing_operand(operator: &Token, near: &Token) -> ParseError {
    ParseError::MissingOperand {
        operator: operator.lexeme.clone(),
        found: near.describe(),
        line: operator.line,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_expression_with(Closing::Reject)
    }

    /// Run the automaton over the longest run of expression tokens.
    pub(crate) fn parse_expression_with(&mut self, closing: Closing) -> Result<Expr, ParseError> {
        let mut automaton = Automaton::default();
        let mut expecting_operand = true;

        loop {
            let kind = self.peek().kind;

            if !expecting_operand && (kind.is_operand() || kind == TokenKind::LeftParen) {
                if automaton.has_open_paren() {
                    return Err(ParseError::InvalidExpression {
                        reason: "missing operator between operands".to_string(),
                        found: self.peek().describe(),
                        line: self.peek().line,
                    });
                }
                // A complete operand followed by another starts the next statement
                break;
            }

            if kind.is_operand() {
                let token = self.advance().clone();
                let leaf = if kind == TokenKind::Identifier {
                    Expr::identifier(token)
                } else {
                    Expr::literal(token)
                };
                automaton.operands.push(leaf);
                expecting_operand = false;
                continue;
            }

            match kind {
                TokenKind::LeftParen => {
                    let token = self.advance().clone();
                    let base = automaton.operands.len();
                    automaton.operators.push(Pending::Open { token, base });
                    expecting_operand = true;
                }
                TokenKind::RightParen => {
                    if !automaton.has_open_paren() {
                        if closing == Closing::Yield {
                            break;
                        }
                        let token = self.peek();
                        return Err(ParseError::MismatchedParentheses {
                            found: token.describe(),
                            line: token.line,
                        });
                    }
                    let token = self.advance().clone();
                    automaton.close_group(&token)?;
                    expecting_operand = false;
                }
                TokenKind::Dollar if expecting_operand => {
                    let line = self.advance().line;
                    automaton.operands.push(Expr::Newline(Newline { line }));
                    expecting_operand = false;
                }
                TokenKind::Not if !expecting_operand => {
                    return Err(self.unexpected("an operator before 'NOT'"));
                }
                _ if kind.is_operator() => {
                    let token = self.advance().clone();
                    let is_prefix = expecting_operand
                        && matches!(kind, TokenKind::Plus | TokenKind::Minus | TokenKind::Not);

                    if is_prefix {
                        automaton.operators.push(Pending::Unary(token));
                    } else {
                        let Some(level) = binary_precedence(kind) else {
                            return Err(self.unexpected("an operator"));
                        };
                        automaton.reduce_while_at_least(level, &token)?;
                        automaton.operators.push(Pending::Binary(token));
                    }
                    expecting_operand = true;
                }
                _ => break,
            }
        }

        automaton.finish(self.peek())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn parse(source: &str) -> Result<Expr, ParseError> {
        let mut parser = Parser::from_tokens(Lexer::new(source).tokenize());
        parser.parse_expression()
    }

    /// Fully parenthesised prefix rendering, e.g. `(+ 1 (* 2 3))`.
    fn sexpr(expr: &Expr) -> String {
        match expr {
            Expr::Binary(node) => format!(
                "({} {} {})",
                node.operator.lexeme,
                sexpr(&node.left),
                sexpr(&node.right)
            ),
            Expr::Logical(node) => format!(
                "({} {} {})",
                node.operator.lexeme,
                sexpr(&node.left),
                sexpr(&node.right)
            ),
            Expr::Unary(node) => format!("({} {})", node.operator.lexeme, sexpr(&node.operand)),
            Expr::Grouping(node) => format!("[{}]", sexpr(&node.inner)),
            Expr::Literal(node) => node.value.lexeme.clone(),
            Expr::Identifier(node) => node.name.lexeme.clone(),
            Expr::Newline(_) => "$".to_string(),
        }
    }

    fn shape(source: &str) -> String {
        sexpr(&parse(source).unwrap())
    }

    #[test]
    fn test_precedence_with_group() {
        assert_eq!(shape("10 + 5 * (2 + 3)"), "(+ 10 (* 5 [(+ 2 3)]))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(shape("10 - 5 - 2"), "(- (- 10 5) 2)");
        assert_eq!(shape("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(shape("a < b == c"), "(== (< a b) c)");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(shape("-5 + 3"), "(+ (- 5) 3)");
        assert_eq!(shape("5 - -3"), "(- 5 (- 3))");
        assert_eq!(shape("-2 * 3"), "(* (- 2) 3)");
        assert_eq!(shape("2 * -3 + 1"), "(+ (* 2 (- 3)) 1)");
        assert_eq!(shape("- - x"), "(- (- x))");
        assert_eq!(shape("+(1)"), "(+ [1])");
    }

    #[test]
    fn test_all_levels_together() {
        assert_eq!(
            shape("a OR b AND c > d + e * f"),
            "(OR a (AND b (> c (+ d (* e f)))))"
        );
        assert_eq!(
            shape("a * b + c >= d AND e OR f"),
            "(OR (AND (>= (+ (* a b) c) d) e) f)"
        );
    }

    #[test]
    fn test_logical_nodes() {
        let expr = parse("NOT a AND b OR c").unwrap();

        let Expr::Logical(or) = &expr else {
            panic!("Expected OR at the root, got {:?}", expr);
        };
        assert_eq!(or.operator.kind, TokenKind::Or);
        let Expr::Logical(and) = or.left.as_ref() else {
            panic!("Expected AND on the left");
        };
        assert!(matches!(and.left.as_ref(), Expr::Unary(u) if u.operator.kind == TokenKind::Not));
    }

    #[test]
    fn test_concatenation_is_additive() {
        assert_eq!(shape("a & b * 2 & c"), "(& (& a (* b 2)) c)");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 200;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let expr = parse(&source).unwrap();

        let mut groups = 0;
        let mut current = &expr;
        while let Expr::Grouping(node) = current {
            groups += 1;
            current = node.inner.as_ref();
        }
        assert_eq!(groups, depth);
        assert!(matches!(current, Expr::Literal(_)));
    }

    #[test]
    fn test_nested_groups_and_unary() {
        assert_eq!(shape("-(a - (b - c)) * 2"), "(* (- [(- a [(- b c)])]) 2)");
        assert_eq!(shape("NOT (a OR b)"), "(NOT [(OR a b)])");
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse("(1 + 2").unwrap_err();

        assert!(matches!(err, ParseError::MismatchedParentheses { .. }));
        assert!(err.to_string().contains("Mismatched parentheses"));
    }

    #[test]
    fn test_stray_close_paren() {
        let err = parse("1 + 2)").unwrap_err();

        assert!(matches!(err, ParseError::MismatchedParentheses { .. }));
        assert_eq!(err.found(), "')'");
    }

    #[test]
    fn test_yield_leaves_close_paren() {
        let mut parser = Parser::from_tokens(Lexer::new("i + 1) START").tokenize());
        let expr = parser.parse_expression_with(Closing::Yield).unwrap();

        assert!(matches!(expr, Expr::Binary(_)));
        assert_eq!(parser.peek().kind, TokenKind::RightParen);
    }

    #[test]
    fn test_missing_operand() {
        let err = parse("1 +").unwrap_err();
        assert!(matches!(err, ParseError::MissingOperand { ref operator, .. } if operator == "+"));

        let err = parse("* 2").unwrap_err();
        assert!(matches!(err, ParseError::MissingOperand { ref operator, .. } if operator == "*"));

        let err = parse("1 + (* 2)").unwrap_err();
        assert!(matches!(err, ParseError::MissingOperand { ref operator, .. } if operator == "*"));

        let err = parse("NOT").unwrap_err();
        assert!(matches!(err, ParseError::MissingOperand { ref operator, .. } if operator == "NOT"));
    }

    #[test]
    fn test_empty_expression() {
        let err = parse("").unwrap_err();

        assert!(matches!(err, ParseError::InvalidExpression { .. }));
        assert_eq!(err.found(), "end of input");
    }

    #[test]
    fn test_empty_parentheses() {
        let err = parse("()").unwrap_err();

        assert!(matches!(err, ParseError::InvalidExpression { ref reason, .. } if reason == "empty parentheses"));
    }

    #[test]
    fn test_adjacent_operands() {
        let mut parser = Parser::from_tokens(Lexer::new("1 2").tokenize());
        let expr = parser.parse_expression().unwrap();
        assert_eq!(sexpr(&expr), "1");
        assert_eq!(parser.peek().lexeme, "2");

        let mut parser = Parser::from_tokens(Lexer::new("a + b (c)").tokenize());
        let expr = parser.parse_expression().unwrap();
        assert_eq!(sexpr(&expr), "(+ a b)");
        assert_eq!(parser.peek().kind, TokenKind::LeftParen);

        let err = parse("(a b)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidExpression { ref reason, .. } if reason == "missing operator between operands"));
        assert_eq!(err.found(), "identifier 'b'");
    }

    #[test]
    fn test_not_in_operator_position() {
        let err = parse("a NOT b").unwrap_err();

        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert_eq!(err.found(), "'NOT'");
    }

    #[test]
    fn test_newline_leaf() {
        assert_eq!(shape("a & $ & b"), "(& (& a $) b)");
        assert_eq!(shape("$"), "$");
    }

    #[test]
    fn test_dollar_after_operand_ends_expression() {
        let mut parser = Parser::from_tokens(Lexer::new("x + 1 $").tokenize());
        let expr = parser.parse_expression().unwrap();

        assert_eq!(sexpr(&expr), "(+ x 1)");
        assert_eq!(parser.peek().kind, TokenKind::Dollar);
    }

    #[test]
    fn test_stops_at_non_expression_token() {
        let mut parser = Parser::from_tokens(Lexer::new("x > 0 START IF").tokenize());
        parser.parse_expression().unwrap();

        assert_eq!(parser.peek().kind, TokenKind::Start);
    }

    #[test]
    fn test_literal_kinds() {
        let expr = parse("'c' == TRUE").unwrap();
        let Expr::Binary(node) = expr else {
            panic!("Expected binary expression");
        };
        assert!(matches!(node.left.as_ref(), Expr::Literal(l) if l.value.kind == TokenKind::CharLiteral));
        assert!(matches!(node.right.as_ref(), Expr::Literal(l) if l.value.kind == TokenKind::BoolLiteral));
    }

    #[test]
    fn test_precedence_table() {
        assert_eq!(binary_precedence(TokenKind::Or), Some(0));
        assert_eq!(binary_precedence(TokenKind::And), Some(1));
        assert_eq!(binary_precedence(TokenKind::NotEqual), Some(2));
        assert_eq!(binary_precedence(TokenKind::Ampersand), Some(3));
        assert_eq!(binary_precedence(TokenKind::Modulo), Some(4));
        assert_eq!(binary_precedence(TokenKind::Not), None);
    }
}
