//! Node tally, one count per node kind.

use super::{Node, Visitor};
use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// Counts every node reachable from the one it is given.
#[derive(Debug, Default)]
pub struct NodeCounter {
    counts: FxHashMap<&'static str, usize>,
}

impl NodeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the nodes of `root` and everything beneath it.
    pub fn count<N: Node + ?Sized>(root: &N) -> Self {
        let mut counter = Self::new();
        root.accept(&mut counter);
        counter
    }

    /// Number of nodes of the given kind, e.g. `"Binary"`.
    pub fn get(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    fn bump(&mut self, kind: &'static str) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    fn block(&mut self, block: &Block) {
        block.accept(self);
    }
}

impl Visitor for NodeCounter {
    type Output = ();

    fn visit_program(&mut self, node: &Program) {
        self.bump("Program");
        for decl in &node.declarations {
            decl.accept(self);
        }
        for stmt in &node.statements {
            stmt.accept(self);
        }
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        self.bump("VarDecl");
        if let Some(init) = &node.initializer {
            init.accept(self);
        }
    }

    fn visit_assignment(&mut self, node: &Assignment) {
        self.bump("Assignment");
        node.value.accept(self);
    }

    fn visit_block(&mut self, node: &Block) {
        self.bump("Block");
        for stmt in &node.statements {
            stmt.accept(self);
        }
    }

    fn visit_if(&mut self, node: &IfStmt) {
        self.bump("If");
        node.condition.accept(self);
        self.block(&node.then_branch);
        for alt in &node.alternatives {
            alt.condition.accept(self);
            self.block(&alt.body);
        }
        if let Some(else_branch) = &node.else_branch {
            self.block(else_branch);
        }
    }

    fn visit_repeat(&mut self, node: &RepeatStmt) {
        self.bump("Repeat");
        node.condition.accept(self);
        self.block(&node.body);
    }

    fn visit_for(&mut self, node: &ForStmt) {
        self.bump("For");
        node.init.accept(self);
        node.condition.accept(self);
        node.update.accept(self);
        self.block(&node.body);
    }

    fn visit_print(&mut self, node: &PrintStmt) {
        self.bump("Print");
        for expr in &node.expressions {
            expr.accept(self);
        }
    }

    fn visit_scan(&mut self, _node: &ScanStmt) {
        self.bump("Scan");
    }

    fn visit_binary(&mut self, node: &BinaryExpr) {
        self.bump("Binary");
        node.left.accept(self);
        node.right.accept(self);
    }

    fn visit_logical(&mut self, node: &LogicalExpr) {
        self.bump("Logical");
        node.left.accept(self);
        node.right.accept(self);
    }

    fn visit_unary(&mut self, node: &UnaryExpr) {
        self.bump("Unary");
        node.operand.accept(self);
    }

    fn visit_grouping(&mut self, node: &Grouping) {
        self.bump("Grouping");
        node.inner.accept(self);
    }

    fn visit_literal(&mut self, _node: &Literal) {
        self.bump("Literal");
    }

    fn visit_identifier(&mut self, _node: &Identifier) {
        self.bump("Identifier");
    }

    fn visit_newline(&mut self, _node: &Newline) {
        self.bump("Newline");
    }
}
