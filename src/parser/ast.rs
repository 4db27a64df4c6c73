// AST (Abstract Syntax Tree) definitions for script programs
//
// Every node owns its children outright. Nodes keep the tokens they were
// built from so later passes can report lines and lexemes.

use crate::parser::lexer::Token;

/// Root of a parsed script: the declarations block followed by the statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

/// `INT x = 1` — one entry of a (possibly comma-separated) declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub var_type: Token,
    pub name: Token,
    pub initializer: Option<Expr>,
}

/// `x = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: Token,
    pub value: Expr,
}

/// Statements between `START <kw>` and `END <kw>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

/// One `ELSE IF <cond> START IF ... END IF` alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub alternatives: Vec<ElseIf>,
    pub else_branch: Option<Block>,
}

/// `REPEAT WHEN <cond> START REPEAT ... END REPEAT`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub condition: Expr,
    pub body: Block,
}

/// `FOR (init, cond, update) START FOR ... END FOR`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Assignment,
    pub condition: Expr,
    pub update: Assignment,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanStmt {
    pub names: Vec<Token>,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment(Assignment),
    If(IfStmt),
    Repeat(RepeatStmt),
    For(ForStmt),
    Print(PrintStmt),
    Scan(ScanStmt),
}

/// Arithmetic, concatenation and relational operators.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// `AND` / `OR`, kept apart from [`BinaryExpr`] for short-circuit evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Prefix `NOT`, `+` or `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub inner: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: Token,
}

/// A `$` met where an operand was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct Newline {
    pub line: usize,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Unary(UnaryExpr),
    Grouping(Grouping),
    Literal(Literal),
    Identifier(Identifier),
    Newline(Newline),
}

impl Expr {
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Logical(LogicalExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn unary(operator: Token, operand: Expr) -> Self {
        Expr::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn grouping(inner: Expr) -> Self {
        Expr::Grouping(Grouping {
            inner: Box::new(inner),
        })
    }

    pub fn literal(value: Token) -> Self {
        Expr::Literal(Literal { value })
    }

    pub fn identifier(name: Token) -> Self {
        Expr::Identifier(Identifier { name })
    }

    /// Source line of the leftmost token in this expression.
    pub fn line(&self) -> usize {
        match self {
            Expr::Binary(node) => node.left.line(),
            Expr::Logical(node) => node.left.line(),
            Expr::Unary(node) => node.operator.line,
            Expr::Grouping(node) => node.inner.line(),
            Expr::Literal(node) => node.value.line,
            Expr::Identifier(node) => node.name.line,
            Expr::Newline(node) => node.line,
        }
    }
}
