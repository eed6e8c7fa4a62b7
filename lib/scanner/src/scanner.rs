use cursor::{Cursor, Line};
use errors::{At, LoxError};
use log::trace;

pub mod token;
pub use token::{Literal, Token, TokenType};
use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedBlockComment,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for LoxError {
    fn from(value: ScanError) -> Self {
        LoxError::new(value.line, At::Nothing, value.error)
    }
}

/// Turns source text into tokens in a single forward pass.
///
/// Lexical errors are collected and scanning carries on, so one pass reports
/// every bad character. The returned tokens always end with exactly one
/// [`TokenType::Eof`].
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    start: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self { start: cursor.clone(), cursor, tokens: Vec::new(), errors: Vec::new() }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token<'a>>, Vec<ScanError>) {
        loop {
            self.start = self.cursor.clone();
            match self.cursor.next() {
                Some(c) => self.scan_token(c),
                None => break,
            }
        }

        self.tokens.push(Token::new(Eof, "", None, self.cursor.line()));
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            ':' => self.add_token(Colon),
            '?' => self.add_token(QuestionMark),

            '!' => self.add_two_char_token('=', BangEqual, Bang),
            '=' => self.add_two_char_token('=', EqualEqual, Equal),
            '<' => self.add_two_char_token('=', LessEqual, Less),
            '>' => self.add_two_char_token('=', GreaterEqual, Greater),

            '/' => {
                if self.cursor.advance_if('/') {
                    self.cursor.advance_while(|c| c != '\n');
                } else if self.cursor.advance_if('*') {
                    self.block_comment();
                } else {
                    self.add_token(Slash)
                }
            }

            '"' => self.string(),

            d if d.is_ascii_digit() => self.number(),

            a if is_alpha(a) => self.identifier(),

            // The cursor counts lines, so '\n' needs no special handling.
            ' ' | '\r' | '\t' | '\n' => (),

            c => self.error(ScanErrorType::UnexpectedCharacter(c), self.cursor.line()),
        }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn add_token(&mut self, kind: TokenType) {
        self.add_literal_token(kind, None)
    }

    fn add_literal_token(&mut self, kind: TokenType, literal: Option<Literal<'a>>) {
        let token = Token::new(kind, self.lexeme(), literal, self.start.line());
        trace!("Scanned {token} on line {}", token.line);
        self.tokens.push(token);
    }

    fn add_two_char_token(&mut self, second: char, matched: TokenType, single: TokenType) {
        if self.cursor.advance_if(second) {
            self.add_token(matched)
        } else {
            self.add_token(single)
        }
    }

    fn error(&mut self, error: ScanErrorType, line: Line) {
        trace!("Scan error on line {line}: {error}");
        self.errors.push(ScanError { error, line });
    }

    // Block comments do not nest: the first "*/" ends the comment.
    fn block_comment(&mut self) {
        loop {
            match (self.cursor.peek(), self.cursor.peek_next()) {
                (Some('*'), Some('/')) => {
                    self.cursor.next();
                    self.cursor.next();
                    return;
                }
                (Some(_), _) => {
                    self.cursor.next();
                }
                (None, _) => {
                    return self.error(ScanErrorType::UnterminatedBlockComment, self.start.line())
                }
            }
        }
    }

    fn string(&mut self) {
        self.cursor.advance_while(|c| c != '"');

        if !self.cursor.advance_if('"') {
            return self.error(ScanErrorType::UnterminatedString, self.start.line());
        }

        let lexeme = self.lexeme();
        self.add_literal_token(Str, Some(Literal::Str(&lexeme[1..lexeme.len() - 1])));
    }

    fn number(&mut self) {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        match self.lexeme().parse() {
            Ok(n) => self.add_literal_token(Number, Some(Literal::Number(n))),
            Err(e) => unreachable!("digit runs always parse as f64: {e}"),
        }
    }

    fn identifier(&mut self) {
        self.cursor.advance_while(|c| is_alpha(c) || c.is_ascii_digit());
        self.add_token(TokenType::keyword(self.lexeme()).unwrap_or(Identifier));
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Scans `source`, returning its tokens together with any lexical errors.
pub fn scan(source: &str) -> (Vec<Token<'_>>, Vec<ScanError>) {
    Scanner::new(source).scan_tokens()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn token(kind: TokenType, lexeme: &str, line: usize) -> Token<'_> {
        Token::new(kind, lexeme, None, Line(line))
    }

    fn eof(line: usize) -> Token<'static> {
        token(Eof, "", line)
    }

    fn scan_ok(source: &str) -> Vec<Token<'_>> {
        let (tokens, errors) = scan(source);
        assert_eq!(errors, vec![]);
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenType> {
        scan_ok(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn single_char_tokens() {
        let source = "(){},.-+;*/:?";
        assert_eq!(
            kinds(source),
            vec![
                LeftParen,
                RightParen,
                LeftBrace,
                RightBrace,
                Comma,
                Dot,
                Minus,
                Plus,
                Semicolon,
                Star,
                Slash,
                Colon,
                QuestionMark,
                Eof
            ]
        );
    }

    #[test]
    fn two_char_tokens() {
        let source = "! != = == < <= > >=";
        assert_eq!(
            scan_ok(source),
            vec![
                token(Bang, "!", 1),
                token(BangEqual, "!=", 1),
                token(Equal, "=", 1),
                token(EqualEqual, "==", 1),
                token(Less, "<", 1),
                token(LessEqual, "<=", 1),
                token(Greater, ">", 1),
                token(GreaterEqual, ">=", 1),
                eof(1),
            ]
        );

        // No whitespace between operators: longest match wins, left to right.
        assert_eq!(kinds("!==<=>"), vec![BangEqual, Equal, LessEqual, Greater, Eof]);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            scan_ok("1 + 2 * 3"),
            vec![
                Token::new(Number, "1", Some(Literal::Number(1.0)), Line(1)),
                token(Plus, "+", 1),
                Token::new(Number, "2", Some(Literal::Number(2.0)), Line(1)),
                token(Star, "*", 1),
                Token::new(Number, "3", Some(Literal::Number(3.0)), Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            scan_ok("123.45")[0],
            Token::new(Number, "123.45", Some(Literal::Number(123.45)), Line(1))
        );

        // A trailing dot is not part of the number.
        assert_eq!(
            scan_ok("7."),
            vec![
                Token::new(Number, "7", Some(Literal::Number(7.0)), Line(1)),
                token(Dot, ".", 1),
                eof(1)
            ]
        );

        // Neither is a leading one.
        assert_eq!(kinds(".5"), vec![Dot, Number, Eof]);

        assert_eq!(kinds("1.2.3"), vec![Number, Dot, Number, Eof]);
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan_ok("\"hello world\""),
            vec![
                Token::new(Str, "\"hello world\"", Some(Literal::Str("hello world")), Line(1)),
                eof(1),
            ]
        );

        assert_eq!(
            scan_ok("\"\"")[0],
            Token::new(Str, "\"\"", Some(Literal::Str("")), Line(1))
        );
    }

    #[test]
    fn multiline_string() {
        let (tokens, errors) = scan("\"a\nb\nc\" d");
        assert!(errors.is_empty());
        assert_eq!(
            tokens,
            vec![
                Token::new(Str, "\"a\nb\nc\"", Some(Literal::Str("a\nb\nc")), Line(1)),
                token(Identifier, "d", 3),
                eof(3),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let (tokens, errors) = scan("\"abc");
        assert_eq!(tokens, vec![eof(1)]);
        assert_eq!(
            errors,
            vec![ScanError { error: ScanErrorType::UnterminatedString, line: Line(1) }]
        );

        // Reported on the line of the opening quote
        let (tokens, errors) = scan("1\n\"hello\nworld");
        assert_eq!(kinds_of(&tokens), vec![Number, Eof]);
        assert_eq!(tokens.last(), Some(&eof(3)));
        assert_eq!(
            errors,
            vec![ScanError { error: ScanErrorType::UnterminatedString, line: Line(2) }]
        );
    }

    fn kinds_of(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(
            scan_ok("and class else false fun for if nil or print return super this true var while"),
            vec![
                token(And, "and", 1),
                token(Class, "class", 1),
                token(Else, "else", 1),
                token(False, "false", 1),
                token(Fun, "fun", 1),
                token(For, "for", 1),
                token(If, "if", 1),
                token(Nil, "nil", 1),
                token(Or, "or", 1),
                token(Print, "print", 1),
                token(Return, "return", 1),
                token(Super, "super", 1),
                token(This, "this", 1),
                token(True, "true", 1),
                token(Var, "var", 1),
                token(While, "while", 1),
                eof(1),
            ]
        );

        assert_eq!(
            scan_ok("_foo orchid nil2 x_1"),
            vec![
                token(Identifier, "_foo", 1),
                token(Identifier, "orchid", 1),
                token(Identifier, "nil2", 1),
                token(Identifier, "x_1", 1),
                eof(1),
            ]
        );
    }

    #[test]
    fn line_comments() {
        assert_eq!(
            scan_ok("a // comment\nb // trailing"),
            vec![token(Identifier, "a", 1), token(Identifier, "b", 2), eof(2)]
        );
    }

    #[test]
    fn block_comments() {
        assert_eq!(
            scan_ok("a /* one\ntwo */ b"),
            vec![token(Identifier, "a", 1), token(Identifier, "b", 2), eof(2)]
        );

        // Not nestable: the first "*/" closes the comment.
        assert_eq!(
            scan_ok("/* outer /* inner */ c */"),
            vec![token(Identifier, "c", 1), token(Star, "*", 1), token(Slash, "/", 1), eof(1)]
        );

        assert_eq!(kinds("/**/1"), vec![Number, Eof]);
    }

    #[test]
    fn unterminated_block_comment() {
        let (tokens, errors) = scan("1\n/* never\nclosed *");
        assert_eq!(kinds_of(&tokens), vec![Number, Eof]);
        assert_eq!(tokens.last().map(|t| t.line), Some(Line(3)));
        assert_eq!(
            errors,
            vec![ScanError { error: ScanErrorType::UnterminatedBlockComment, line: Line(2) }]
        );
    }

    #[test]
    fn unexpected_characters_do_not_stop_scanning() {
        let (tokens, errors) = scan("1 @ 2\n# 3");
        assert_eq!(kinds_of(&tokens), vec![Number, Number, Number, Eof]);
        assert_eq!(
            errors,
            vec![
                ScanError { error: ScanErrorType::UnexpectedCharacter('@'), line: Line(1) },
                ScanError { error: ScanErrorType::UnexpectedCharacter('#'), line: Line(2) },
            ]
        );
        assert_eq!(
            errors.into_iter().map(LoxError::from).join("\n"),
            "[line 1] Error: Unexpected character: @.\n[line 2] Error: Unexpected character: #."
        );
    }

    #[test]
    fn eof_terminates_and_lines_never_decrease() {
        let sources = [
            "",
            "\n\n",
            "(1 + 2)\n* 3 // done",
            "\"multi\nline\" ? a : b\n/* x\ny */ nil",
            "@\n\"unterminated",
        ];
        for source in sources {
            let (tokens, _) = scan(source);
            assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1, "{source:?}");
            assert!(tokens.last().is_some_and(Token::is_eof), "{source:?}");
            assert!(tokens.windows(2).all(|w| w[0].line <= w[1].line), "{source:?}");
        }

        assert_eq!(scan_ok("\n\n"), vec![eof(3)]);
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(
            scan_ok(" \t\r\n1\r\n"),
            vec![Token::new(Number, "1", Some(Literal::Number(1.0)), Line(2)), eof(3)]
        );
    }
}
