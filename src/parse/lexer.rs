use winnow::ascii::multispace0;
use winnow::combinator::{alt, preceded, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::types::{ExpressionToken, TokenKind};

// -- Numbers ----------------------------------------------------------------

fn number(input: &mut &str) -> ModalResult<ExpressionToken> {
    // Must start with a digit; ".5" is not a number, write "0.5".
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        take_while(0.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .map(|s: &str| ExpressionToken::new(s, TokenKind::Number))
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn identifier(input: &mut &str) -> ModalResult<ExpressionToken> {
    let name = take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)?;
    // A name directly followed by '(' is a function call; whitespace before
    // the parenthesis demotes it to a plain variable reference.
    let kind = if input.starts_with('(') {
        TokenKind::Function
    } else {
        TokenKind::Variable
    };
    Ok(ExpressionToken::new(name, kind))
}

// -- Operators & punctuation ------------------------------------------------

fn symbol(input: &mut &str) -> ModalResult<ExpressionToken> {
    let ch = one_of(['+', '-', '*', '/', '^', '(', ')', ',']).parse_next(input)?;
    let kind = match ch {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        ',' => TokenKind::Comma,
        _ => TokenKind::Operator,
    };
    Ok(ExpressionToken::new(String::from(ch), kind))
}

// -- Entry point ------------------------------------------------------------

fn token(input: &mut &str) -> ModalResult<ExpressionToken> {
    alt((number, identifier, symbol)).parse_next(input)
}

/// Lex a whole expression in one left-to-right scan, skipping whitespace
/// between tokens.
pub(super) fn tokens(input: &mut &str) -> ModalResult<Vec<ExpressionToken>> {
    let toks: Vec<ExpressionToken> = repeat(0.., preceded(multispace0, token)).parse_next(input)?;
    multispace0.parse_next(input)?;
    Ok(toks)
}
