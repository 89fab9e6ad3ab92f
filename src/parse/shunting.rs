use super::error::ParseError;
use crate::types::{ExpressionToken, TokenKind};

// Operator precedence; parentheses and functions sit at 0 so the pop loops
// never cross them.
fn precedence(token: &ExpressionToken) -> u8 {
    match token.text() {
        "+" | "-" => 1,
        "*" | "/" => 2,
        "^" => 3,
        _ => 0,
    }
}

fn is_right_associative(token: &ExpressionToken) -> bool {
    token.text() == "^"
}

/// Reorder an infix token sequence into postfix (reverse Polish) via the
/// shunting-yard algorithm.
///
/// `^` binds right-to-left; the other operators left-to-right. Function
/// tokens ride the operator stack and are emitted when their closing
/// parenthesis is reached, so `max(2, 3) + 1` becomes `2 3 max 1 +`.
pub(super) fn to_postfix(
    tokens: Vec<ExpressionToken>,
) -> Result<Vec<ExpressionToken>, ParseError> {
    let mut output: Vec<ExpressionToken> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<ExpressionToken> = Vec::new();

    for token in tokens {
        match token.kind() {
            TokenKind::Number | TokenKind::Variable => output.push(token),
            TokenKind::Function => ops.push(token),
            TokenKind::Comma => loop {
                let Some(top) = ops.pop() else {
                    return Err(ParseError::MisplacedComma);
                };
                if top.kind() == TokenKind::LeftParen {
                    // The argument list's parenthesis stays on the stack.
                    ops.push(top);
                    break;
                }
                output.push(top);
            },
            TokenKind::Operator => {
                let prec = precedence(&token);
                let right = is_right_associative(&token);
                while let Some(top) = ops.last() {
                    let top_prec = precedence(top);
                    let pops = if right {
                        top_prec > prec
                    } else {
                        top_prec >= prec
                    };
                    if !pops {
                        break;
                    }
                    let Some(top) = ops.pop() else { break };
                    output.push(top);
                }
                ops.push(token);
            }
            TokenKind::LeftParen => ops.push(token),
            TokenKind::RightParen => {
                loop {
                    let Some(top) = ops.pop() else {
                        return Err(ParseError::MismatchedParen);
                    };
                    if top.kind() == TokenKind::LeftParen {
                        break;
                    }
                    output.push(top);
                }
                // A function call ends with its closing parenthesis.
                if ops.last().is_some_and(|t| t.kind() == TokenKind::Function) {
                    if let Some(func) = ops.pop() {
                        output.push(func);
                    }
                }
            }
        }
    }

    while let Some(top) = ops.pop() {
        if top.kind() == TokenKind::LeftParen {
            return Err(ParseError::UnclosedParen);
        }
        output.push(top);
    }

    Ok(output)
}
