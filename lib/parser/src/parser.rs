mod expr;

use errors::{At, LoxError, LoxErrors};
use log::{debug, trace};
use scanner::{Literal, Token, TokenType};

pub use expr::{Expr, LiteralValue, Visitor};

use TokenType::*;

type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expected expression.")]
    ExpectedExpression,
    #[error("Expected ')' after expression.")]
    MissingRightParen,
    #[error("Expected ':' token in ternary operation.")]
    MissingTernaryColon,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl<'a> From<ParserError<'a>> for LoxError {
    fn from(error: ParserError<'a>) -> Self {
        let at = if error.token.is_eof() {
            At::End
        } else {
            At::Lexeme(error.token.lexeme().to_string())
        };
        LoxError::new(error.token.line(), at, error.error)
    }
}

/// Recursive descent parser for a single expression.
///
/// Each precedence level calls the next tighter one, folding operators of its
/// own level into a left-leaning tree:
///
/// ```text
/// expression → comma
/// comma      → ternary ( "," ternary )*
/// ternary    → equality ( "?" equality ":" equality )*
/// equality   → comparison ( ("!=" | "==") comparison )*
/// comparison → term ( (">" | ">=" | "<" | "<=") term )*
/// term       → factor ( ("-" | "+") factor )*
/// factor     → unary ( ("/" | "*") unary )*
/// unary      → ("!" | "-") unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
///
/// The branches of a ternary parse at `equality`, so a ternary nested in a
/// branch needs parentheses.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map(Token::line).unwrap_or(cursor::Line(1));
            tokens.push(Token::new(Eof, "", None, line));
        }
        Self { tokens, current: 0 }
    }

    /// Parses one expression. Tokens after it are left unread.
    pub fn parse(mut self) -> std::result::Result<Expr<'a>, LoxErrors> {
        self.expression().map_err(|e| {
            debug!("Parse failed at {}: {e}", e.token);
            LoxError::from(e).into()
        })
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.comma()
    }

    fn comma(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.ternary()?;

        while let Some(operator) = self.match_any(&[Comma]) {
            let right = Box::new(self.ternary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn ternary(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.equality()?;

        while self.match_any(&[QuestionMark]).is_some() {
            let then_branch = Box::new(self.equality()?);
            self.consume(Colon, ParserErrorType::MissingTernaryColon)?;
            let else_branch = Box::new(self.equality()?);
            expr = Expr::Conditional { condition: Box::new(expr), then_branch, else_branch };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.match_any(&[BangEqual, EqualEqual]) {
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.term()?;

        while let Some(operator) = self.match_any(&[Greater, GreaterEqual, Less, LessEqual]) {
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.match_any(&[Minus, Plus]) {
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.match_any(&[Slash, Star]) {
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.match_any(&[Bang, Minus]) {
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.advance();
        trace!("Parsing primary {token}");
        match (token.kind, token.literal) {
            (False, _) => Ok(Expr::Literal(LiteralValue::Boolean(false))),
            (True, _) => Ok(Expr::Literal(LiteralValue::Boolean(true))),
            (Nil, _) => Ok(Expr::Literal(LiteralValue::Nil)),
            (Number, Some(Literal::Number(n))) => Ok(Expr::Literal(LiteralValue::Number(n))),
            (Str, Some(Literal::Str(s))) => Ok(Expr::Literal(LiteralValue::Str(s))),
            (LeftParen, _) => {
                let expr = self.expression()?;
                self.consume(RightParen, ParserErrorType::MissingRightParen)?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        }
    }

    /// Skips tokens until a likely statement boundary: just past a `;`, just
    /// before a statement keyword, or at the end of input.
    ///
    /// A statement-level driver calls this after each parse error so it can
    /// keep reporting independent errors. Expressions alone never need it.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().is_some_and(|t| t.kind == Semicolon) {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn previous(&self) -> Option<&Token<'a>> {
        self.current.checked_sub(1).map(|i| &self.tokens[i])
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Returns the current token and moves past it. Never moves past `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Consumes the current token if it is one of `kinds`.
    fn match_any(&mut self, kinds: &[TokenType]) -> Option<Token<'a>> {
        kinds.contains(&self.peek().kind).then(|| self.advance())
    }

    fn consume(&mut self, kind: TokenType, error: ParserErrorType) -> Result<'a, Token<'a>> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(ParserError::new(error, self.peek().clone()))
        }
    }
}
