use itertools::Itertools;
use parser::{Expr, LiteralValue, Visitor};
use scanner::Token;

/// Fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr<'_>) -> String {
        expr.accept(self)
    }

    fn parenthesize<'a>(&mut self, name: &str, exprs: &[&Expr<'a>]) -> String {
        format!("({name} {})", exprs.iter().map(|e| e.accept(self)).join(" "))
    }
}

impl<'a> Visitor<'a, String> for AstPrinter {
    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }

    fn visit_conditional(
        &mut self,
        condition: &Expr<'a>,
        then_branch: &Expr<'a>,
        else_branch: &Expr<'a>,
    ) -> String {
        self.parenthesize("?:", &[condition, then_branch, else_branch])
    }

    fn visit_grouping(&mut self, expression: &Expr<'a>) -> String {
        self.parenthesize("group", &[expression])
    }

    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> String {
        value.to_string()
    }

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }
}
