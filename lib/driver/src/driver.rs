use errors::LoxErrors;
use itertools::Itertools;
use log::debug;
use parser::Parser;
use printer::{AstPrinter, RpnPrinter};
use scanner::{Scanner, Token};

/// What to print for a successfully scanned (and parsed) source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Output {
    /// Parenthesized prefix form of the expression.
    #[default]
    Ast,
    /// Reverse Polish form of the expression.
    Rpn,
    /// The scanned tokens, one source line per output line. Skips parsing.
    Tokens,
}

/// Runs one source unit (a file, or a single prompt line) through the front end.
///
/// Every diagnostic goes into a fresh [`LoxErrors`]: lexical errors first, then
/// the syntax error, if any. The parser still runs after lexical errors so both
/// kinds surface in one pass. Any diagnostic means no output.
pub fn run_source(source: &str, output: Output) -> Result<String, LoxErrors> {
    let mut errors = LoxErrors::new();

    let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
    debug!("Scanned {} tokens, {} lexical errors", tokens.len(), scan_errors.len());
    errors.extend(scan_errors);

    let rendered = match output {
        Output::Tokens => Some(format_tokens(&tokens)),
        Output::Ast | Output::Rpn => match Parser::new(tokens).parse() {
            Ok(expr) if output == Output::Rpn => Some(RpnPrinter::default().print(&expr)),
            Ok(expr) => Some(AstPrinter.print(&expr)),
            Err(parse_errors) => {
                errors.extend(parse_errors.0);
                None
            }
        },
    };

    match rendered {
        Some(text) if !errors.had_error() => Ok(text),
        _ => Err(errors),
    }
}

fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .group_by(|token| token.line)
        .into_iter()
        .map(|(line, mut tokens)| format!("{line}: {}", tokens.join(" ")))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn outputs() {
        assert_eq!(run_source("1 + 2 * 3", Output::Ast), Ok("(+ 1 (* 2 3))".to_string()));
        assert_eq!(run_source("1 + 2 * 3", Output::Rpn), Ok("1 2 3 * + ".to_string()));
        assert_eq!(
            run_source("1 +\n\"two\"", Output::Tokens),
            Ok("1: [NUMBER 1 1] [PLUS + null]\n2: [STRING \"two\" two] [EOF  null]".to_string())
        );
    }

    #[test]
    fn token_dump_groups_by_line() {
        assert_eq!(
            run_source("(\n\n-1)", Output::Tokens),
            Ok("1: [LEFT_PAREN ( null]\n3: [MINUS - null] [NUMBER 1 1] [RIGHT_PAREN ) null] \
                [EOF  null]"
                .to_string())
        );
    }

    #[test]
    fn output_names() {
        assert_eq!("rpn".parse(), Ok(Output::Rpn));
        assert_eq!("tokens".parse(), Ok(Output::Tokens));
        assert_eq!(Output::default().to_string(), "ast");
        assert!("lisp".parse::<Output>().is_err());
    }

    #[test]
    fn lexical_and_syntax_errors_are_reported_together() {
        let errors = run_source("@ 1 +", Output::Ast).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character: @.\n[line 1] Error at end: Expected expression."
        );
    }

    #[test]
    fn lexical_error_discards_output() {
        // Parses fine once the bad character is dropped, but still fails.
        let errors = run_source("1 + $2", Output::Rpn).unwrap_err();
        assert_eq!(errors.to_string(), "[line 1] Error: Unexpected character: $.");

        let errors = run_source("\"open", Output::Tokens).unwrap_err();
        assert_eq!(errors.to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn each_run_starts_clean() {
        assert!(run_source("(", Output::Ast).is_err());
        assert_eq!(run_source("nil", Output::Ast), Ok("nil".to_string()));
    }
}
