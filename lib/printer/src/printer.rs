//! Text renderings of expression trees, each one a [`parser::Visitor`].

mod ast_printer;
mod rpn_printer;

pub use ast_printer::AstPrinter;
pub use rpn_printer::RpnPrinter;
