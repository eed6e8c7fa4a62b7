use std::fmt::{self, Display, Formatter};

use scanner::Token;

/// Expression tree produced by the parser. Every child is owned by exactly one
/// parent, and nothing is mutated once the parser hands the tree out.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Conditional {
        condition: Box<Expr<'a>>,
        then_branch: Box<Expr<'a>>,
        else_branch: Box<Expr<'a>>,
    },
    Grouping(Box<Expr<'a>>),
    Literal(LiteralValue<'a>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl<'a> Display for LiteralValue<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}

/// A read-only operation over [`Expr`], one method per variant.
///
/// New operations (printers, analyses) implement this trait; the node
/// definitions never change for them. [`Expr::accept`] is the only place that
/// looks at which variant a node is.
pub trait Visitor<'a, R> {
    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> R;

    fn visit_conditional(
        &mut self,
        condition: &Expr<'a>,
        then_branch: &Expr<'a>,
        else_branch: &Expr<'a>,
    ) -> R;

    fn visit_grouping(&mut self, expression: &Expr<'a>) -> R;

    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> R;

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> R;
}

impl<'a> Expr<'a> {
    pub fn accept<R, V: Visitor<'a, R> + ?Sized>(&self, visitor: &mut V) -> R {
        match self {
            Expr::Binary { left, operator, right } => visitor.visit_binary(left, operator, right),
            Expr::Conditional { condition, then_branch, else_branch } => {
                visitor.visit_conditional(condition, then_branch, else_branch)
            }
            Expr::Grouping(expression) => visitor.visit_grouping(expression),
            Expr::Literal(value) => visitor.visit_literal(value),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
        }
    }
}
