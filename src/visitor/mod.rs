//! Tree traversal
//!
//! A [`Visitor`] has one method per node kind. Every node implements [`Node`],
//! whose single `accept` method calls back into the matching visitor method,
//! so new consumers of the tree can be added without touching the node types.
//!
//! - [`printer`]: renders a tree as indented text
//! - [`counter`]: tallies the nodes of each kind

pub mod counter;
pub mod printer;

use crate::parser::ast::*;

pub use counter::NodeCounter;
pub use printer::AstPrinter;

/// One method per node kind; `Output` is what each visit produces.
pub trait Visitor {
    type Output;

    fn visit_program(&mut self, node: &Program) -> Self::Output;
    fn visit_var_decl(&mut self, node: &VarDecl) -> Self::Output;
    fn visit_assignment(&mut self, node: &Assignment) -> Self::Output;
    fn visit_block(&mut self, node: &Block) -> Self::Output;
    fn visit_if(&mut self, node: &IfStmt) -> Self::Output;
    fn visit_repeat(&mut self, node: &RepeatStmt) -> Self::Output;
    fn visit_for(&mut self, node: &ForStmt) -> Self::Output;
    fn visit_print(&mut self, node: &PrintStmt) -> Self::Output;
    fn visit_scan(&mut self, node: &ScanStmt) -> Self::Output;
    fn visit_binary(&mut self, node: &BinaryExpr) -> Self::Output;
    fn visit_logical(&mut self, node: &LogicalExpr) -> Self::Output;
    fn visit_unary(&mut self, node: &UnaryExpr) -> Self::Output;
    fn visit_grouping(&mut self, node: &Grouping) -> Self::Output;
    fn visit_literal(&mut self, node: &Literal) -> Self::Output;
    fn visit_identifier(&mut self, node: &Identifier) -> Self::Output;
    fn visit_newline(&mut self, node: &Newline) -> Self::Output;
}

/// The single traversal entry point of every node.
pub trait Node {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

macro_rules! impl_node {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

impl_node! {
    Program => visit_program,
    VarDecl => visit_var_decl,
    Assignment => visit_assignment,
    Block => visit_block,
    IfStmt => visit_if,
    RepeatStmt => visit_repeat,
    ForStmt => visit_for,
    PrintStmt => visit_print,
    ScanStmt => visit_scan,
    BinaryExpr => visit_binary,
    LogicalExpr => visit_logical,
    UnaryExpr => visit_unary,
    Grouping => visit_grouping,
    Literal => visit_literal,
    Identifier => visit_identifier,
    Newline => visit_newline,
}

impl Node for Stmt {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Stmt::Assignment(node) => visitor.visit_assignment(node),
            Stmt::If(node) => visitor.visit_if(node),
            Stmt::Repeat(node) => visitor.visit_repeat(node),
            Stmt::For(node) => visitor.visit_for(node),
            Stmt::Print(node) => visitor.visit_print(node),
            Stmt::Scan(node) => visitor.visit_scan(node),
        }
    }
}

impl Node for Expr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Binary(node) => visitor.visit_binary(node),
            Expr::Logical(node) => visitor.visit_logical(node),
            Expr::Unary(node) => visitor.visit_unary(node),
            Expr::Grouping(node) => visitor.visit_grouping(node),
            Expr::Literal(node) => visitor.visit_literal(node),
            Expr::Identifier(node) => visitor.visit_identifier(node),
            Expr::Newline(node) => visitor.visit_newline(node),
        }
    }
}
