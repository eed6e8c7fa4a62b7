use parser::{Expr, LiteralValue, Visitor};
use scanner::Token;

/// Reverse Polish notation, e.g. `1 2 3 * + ` for `1 + 2 * 3`.
///
/// Operands are separated by a space and every operator is followed by one.
/// Groupings vanish since postfix order needs no parentheses. Conditionals
/// have no postfix form and produce no text.
#[derive(Debug, Default)]
pub struct RpnPrinter {
    output: String,
    // Whether the last thing written was an operand.
    after_operand: bool,
}

impl RpnPrinter {
    pub fn print(&mut self, expr: &Expr<'_>) -> String {
        self.output.clear();
        self.after_operand = false;
        expr.accept(self);
        std::mem::take(&mut self.output)
    }

    fn operand(&mut self, text: &str) {
        if self.after_operand {
            self.output.push(' ');
        }
        self.output.push_str(text);
        self.after_operand = true;
    }

    fn operator(&mut self, text: &str) {
        if self.after_operand {
            self.output.push(' ');
        }
        self.output.push_str(text);
        self.output.push(' ');
        self.after_operand = false;
    }
}

impl<'a> Visitor<'a, ()> for RpnPrinter {
    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) {
        left.accept(self);
        right.accept(self);
        self.operator(operator.lexeme());
    }

    fn visit_conditional(&mut self, _: &Expr<'a>, _: &Expr<'a>, _: &Expr<'a>) {}

    fn visit_grouping(&mut self, expression: &Expr<'a>) {
        expression.accept(self)
    }

    fn visit_literal(&mut self, value: &LiteralValue<'a>) {
        self.operand(&value.to_string())
    }

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) {
        right.accept(self);
        self.operator(operator.lexeme());
    }
}
