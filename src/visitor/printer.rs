//! Indented text rendering of a syntax tree
//!
//! Expressions print in prefix form, `(+ 1 (* 2 3))`; statements print one
//! per line, with the bodies of compound statements indented beneath them.

use super::{Node, Visitor};
use crate::parser::ast::*;

const INDENT: &str = "  ";

/// Renders any node as a `String`.
#[derive(Debug, Default)]
pub struct AstPrinter {
    depth: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print<N: Node + ?Sized>(&mut self, node: &N) -> String {
        node.accept(self)
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }

    /// Render `block` one level deeper than the current line.
    fn nested(&mut self, block: &Block) -> String {
        self.depth += 1;
        let text = block.accept(self);
        self.depth -= 1;
        text
    }
}

impl Visitor for AstPrinter {
    type Output = String;

    fn visit_program(&mut self, node: &Program) -> String {
        let mut out = String::from("AST_ROOT:\n");

        self.depth = 2;
        out.push_str("  DECLARATIONS:\n");
        for decl in &node.declarations {
            let line = decl.accept(self);
            out.push_str(&format!("{}{}\n", self.indent(), line));
        }

        out.push_str("  STATEMENTS:\n");
        for stmt in &node.statements {
            let line = stmt.accept(self);
            out.push_str(&format!("{}{}\n", self.indent(), line));
        }
        self.depth = 0;

        out
    }

    fn visit_var_decl(&mut self, node: &VarDecl) -> String {
        match &node.initializer {
            Some(init) => format!(
                "(Declare {} {} = {})",
                node.var_type.lexeme,
                node.name.lexeme,
                init.accept(self)
            ),
            None => format!("(Declare {} {})", node.var_type.lexeme, node.name.lexeme),
        }
    }

    fn visit_assignment(&mut self, node: &Assignment) -> String {
        format!("(Assign {} = {})", node.name.lexeme, node.value.accept(self))
    }

    fn visit_block(&mut self, node: &Block) -> String {
        let indent = self.indent();
        if node.statements.is_empty() {
            return format!("{}(empty)", indent);
        }

        let mut lines = Vec::with_capacity(node.statements.len());
        for stmt in &node.statements {
            lines.push(format!("{}{}", indent, stmt.accept(self)));
        }
        lines.join("\n")
    }

    fn visit_if(&mut self, node: &IfStmt) -> String {
        let mut out = format!("(If {}", node.condition.accept(self));

        self.depth += 1;
        let label = self.indent();

        out.push_str(&format!("\n{}THEN:\n", label));
        out.push_str(&self.nested(&node.then_branch));

        for alt in &node.alternatives {
            let condition = alt.condition.accept(self);
            out.push_str(&format!("\n{}ELSE IF {}:\n", label, condition));
            out.push_str(&self.nested(&alt.body));
        }

        if let Some(else_branch) = &node.else_branch {
            out.push_str(&format!("\n{}ELSE:\n", label));
            out.push_str(&self.nested(else_branch));
        }
        self.depth -= 1;

        out.push(')');
        out
    }

    fn visit_repeat(&mut self, node: &RepeatStmt) -> String {
        let condition = node.condition.accept(self);
        format!("(Repeat WHEN {}\n{})", condition, self.nested(&node.body))
    }

    fn visit_for(&mut self, node: &ForStmt) -> String {
        let init = node.init.accept(self);
        let condition = node.condition.accept(self);
        let update = node.update.accept(self);
        format!(
            "(For {}, {}, {}\n{})",
            init,
            condition,
            update,
            self.nested(&node.body)
        )
    }

    fn visit_print(&mut self, node: &PrintStmt) -> String {
        let parts: Vec<String> = node.expressions.iter().map(|e| e.accept(self)).collect();
        format!("(Print {})", parts.join(" "))
    }

    fn visit_scan(&mut self, node: &ScanStmt) -> String {
        let names: Vec<&str> = node.names.iter().map(|t| t.lexeme.as_str()).collect();
        format!("(Scan {})", names.join(", "))
    }

    fn visit_binary(&mut self, node: &BinaryExpr) -> String {
        format!(
            "({} {} {})",
            node.operator.lexeme,
            node.left.accept(self),
            node.right.accept(self)
        )
    }

    fn visit_logical(&mut self, node: &LogicalExpr) -> String {
        format!(
            "({} {} {})",
            node.operator.lexeme,
            node.left.accept(self),
            node.right.accept(self)
        )
    }

    fn visit_unary(&mut self, node: &UnaryExpr) -> String {
        format!("({} {})", node.operator.lexeme, node.operand.accept(self))
    }

    fn visit_grouping(&mut self, node: &Grouping) -> String {
        format!("(group {})", node.inner.accept(self))
    }

    fn visit_literal(&mut self, node: &Literal) -> String {
        node.value.lexeme.clone()
    }

    fn visit_identifier(&mut self, node: &Identifier) -> String {
        node.name.lexeme.clone()
    }

    fn visit_newline(&mut self, _node: &Newline) -> String {
        "NEWLINE".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn render(body: &str) -> String {
        let source = format!("SCRIPT AREA\nSTART SCRIPT\n{}\nEND SCRIPT", body);
        let program = Parser::new(&source).parse_program().unwrap();
        AstPrinter::new().print(&program)
    }

    #[test]
    fn test_print_declarations() {
        let out = render("INT _x = 10 $\nCHAR c $");

        assert_eq!(
            out,
            "AST_ROOT:\n  DECLARATIONS:\n    (Declare INT _x = 10)\n    (Declare CHAR c)\n  STATEMENTS:\n"
        );
    }

    #[test]
    fn test_print_expressions() {
        let out = render("x = 10 + 5 * (2 + 3) $\ny = NOT a OR -b $\nPRINT: x & $ $");

        assert!(out.contains("(Assign x = (+ 10 (* 5 (group (+ 2 3)))))"));
        assert!(out.contains("(Assign y = (OR (NOT a) (- b)))"));
        assert!(out.contains("(Print (& x NEWLINE))"));
    }

    #[test]
    fn test_print_if_chain() {
        let out = render(
            "IF a START IF\nx = 1 $\nEND IF\nELSE IF b START IF\nEND IF\nELSE START IF\nSCAN: x, y $\nEND IF",
        );

        let expected = "    (If a\n\
                        \x20     THEN:\n\
                        \x20       (Assign x = 1)\n\
                        \x20     ELSE IF b:\n\
                        \x20       (empty)\n\
                        \x20     ELSE:\n\
                        \x20       (Scan x, y))\n";
        assert!(out.ends_with(expected), "got:\n{}", out);
    }

    #[test]
    fn test_print_loops() {
        let out = render(
            "REPEAT WHEN n > 0 START REPEAT\nn = n - 1 $\nEND REPEAT\n\
             FOR (i = 0, i < 3, i = i + 1) START FOR\nPRINT: i $\nEND FOR",
        );

        assert!(out.contains("    (Repeat WHEN (> n 0)\n      (Assign n = (- n 1)))\n"));
        assert!(out.contains(
            "    (For (Assign i = 0), (< i 3), (Assign i = (+ i 1))\n      (Print i))\n"
        ));
    }

    #[test]
    fn test_print_single_expression() {
        let expr = Parser::new("a <> 'z'").parse_expression().unwrap();

        assert_eq!(AstPrinter::new().print(&expr), "(<> a 'z')");
    }
}
