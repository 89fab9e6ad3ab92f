mod error;
mod lexer;
mod shunting;

pub use error::ParseError;

use crate::types::ExpressionToken;

/// Split an expression into classified tokens in a single left-to-right scan.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::UnexpectedChar`] at the first character outside the
/// expression alphabet.
pub fn tokenize(expression: &str) -> Result<Vec<ExpressionToken>, ParseError> {
    use winnow::Parser;
    if expression.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    lexer::tokens.parse(expression).map_err(|err| {
        let offset = err.offset();
        let ch = expression[offset..].chars().next().unwrap_or(' ');
        ParseError::UnexpectedChar { ch, offset }
    })
}

/// Reorder an infix token sequence into postfix notation.
///
/// # Errors
///
/// Returns [`ParseError`] when parentheses are unbalanced or a comma appears
/// outside an argument list.
pub fn to_postfix(tokens: Vec<ExpressionToken>) -> Result<Vec<ExpressionToken>, ParseError> {
    shunting::to_postfix(tokens)
}

/// Tokenize an expression and convert it to postfix in one step.
///
/// ```
/// let postfix = vatcalc::parse::parse("2 + 3 * 4")?;
/// let rendered: Vec<String> = postfix.iter().map(ToString::to_string).collect();
/// assert_eq!(rendered.join(" "), "2 3 4 * +");
/// # Ok::<(), vatcalc::parse::ParseError>(())
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if tokenization or conversion fails.
pub fn parse(expression: &str) -> Result<Vec<ExpressionToken>, ParseError> {
    to_postfix(tokenize(expression)?)
}

/// Check that an expression is structurally well-formed without evaluating it.
///
/// Variables do not need to resolve and division by zero is not detected
/// here; those surface at evaluation time.
///
/// # Errors
///
/// Returns the same [`ParseError`]s as [`parse()`].
pub fn validate(expression: &str) -> Result<(), ParseError> {
    parse(expression).map(|_| ())
}
