use rust_decimal::{Decimal, MathematicalOps};

use crate::error::EngineError;
use crate::types::{ExpressionToken, Parameters, TokenKind};

/// Evaluate an arithmetic expression against a parameter map.
///
/// The expression is parsed to postfix and folded over a value stack; all
/// arithmetic is exact [`Decimal`] arithmetic.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for a blank expression,
/// [`EngineError::ParameterNotFound`] when a variable is missing from
/// `params`, and [`EngineError::InvalidExpression`] for syntax errors,
/// division by zero, unknown functions, and non-numeric parameters.
pub fn evaluate(expression: &str, params: &Parameters) -> Result<Decimal, EngineError> {
    if expression.trim().is_empty() {
        return Err(EngineError::validation("expression must not be empty"));
    }
    let postfix = crate::parse::parse(expression)?;
    evaluate_postfix(&postfix, params)
}

/// Evaluate an already-converted postfix token sequence.
///
/// # Errors
///
/// Same failure modes as [`evaluate()`], minus the parse errors.
pub fn evaluate_postfix(
    tokens: &[ExpressionToken],
    params: &Parameters,
) -> Result<Decimal, EngineError> {
    let mut stack: Vec<Decimal> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind() {
            TokenKind::Number => {
                let value = token.text().parse::<Decimal>().map_err(|_| {
                    EngineError::invalid_expression(format!(
                        "Invalid numeric literal: {}",
                        token.text()
                    ))
                })?;
                stack.push(value);
            }
            TokenKind::Variable => {
                let name = token.text();
                let value = params.get(name).ok_or_else(|| EngineError::ParameterNotFound {
                    name: name.to_owned(),
                })?;
                let number = value.to_decimal().ok_or_else(|| {
                    EngineError::invalid_expression(format!("Parameter '{name}' is not numeric"))
                })?;
                stack.push(number);
            }
            TokenKind::Operator => {
                let right = pop_operand(&mut stack, token.text())?;
                let left = pop_operand(&mut stack, token.text())?;
                stack.push(apply_operator(token.text(), left, right)?);
            }
            TokenKind::Function => {
                let result = apply_function(token.text(), &mut stack)?;
                stack.push(result);
            }
            TokenKind::LeftParen | TokenKind::RightParen | TokenKind::Comma => {
                return Err(EngineError::invalid_expression(format!(
                    "Unexpected token '{}' in postfix sequence",
                    token.text()
                )));
            }
        }
    }

    let result = stack
        .pop()
        .ok_or_else(|| EngineError::invalid_expression("Expression produced no value"))?;
    if !stack.is_empty() {
        return Err(EngineError::invalid_expression(
            "Expression did not reduce to a single value",
        ));
    }
    Ok(result)
}

fn pop_operand(stack: &mut Vec<Decimal>, token: &str) -> Result<Decimal, EngineError> {
    stack
        .pop()
        .ok_or_else(|| EngineError::invalid_expression(format!("Not enough operands for '{token}'")))
}

fn overflow() -> EngineError {
    EngineError::invalid_expression("Numeric overflow while evaluating expression")
}

fn apply_operator(op: &str, left: Decimal, right: Decimal) -> Result<Decimal, EngineError> {
    match op {
        "+" => left.checked_add(right).ok_or_else(overflow),
        "-" => left.checked_sub(right).ok_or_else(overflow),
        "*" => left.checked_mul(right).ok_or_else(overflow),
        "/" => {
            if right.is_zero() {
                return Err(EngineError::invalid_expression(
                    "Division by zero is not allowed",
                ));
            }
            left.checked_div(right).ok_or_else(overflow)
        }
        "^" => left.checked_powd(right).ok_or_else(overflow),
        other => Err(EngineError::invalid_expression(format!(
            "Unknown operator: {other}"
        ))),
    }
}

fn apply_function(name: &str, stack: &mut Vec<Decimal>) -> Result<Decimal, EngineError> {
    match name {
        "max" => {
            let b = pop_operand(stack, name)?;
            let a = pop_operand(stack, name)?;
            Ok(a.max(b))
        }
        "min" => {
            let b = pop_operand(stack, name)?;
            let a = pop_operand(stack, name)?;
            Ok(a.min(b))
        }
        "if" => {
            let if_false = pop_operand(stack, name)?;
            let if_true = pop_operand(stack, name)?;
            let cond = pop_operand(stack, name)?;
            Ok(if cond > Decimal::ZERO { if_true } else { if_false })
        }
        "abs" => Ok(pop_operand(stack, name)?.abs()),
        // Banker's rounding: midpoints go to the nearest even integer.
        "round" => Ok(pop_operand(stack, name)?.round()),
        "floor" => Ok(pop_operand(stack, name)?.floor()),
        "ceiling" => Ok(pop_operand(stack, name)?.ceil()),
        "sqrt" => {
            let a = pop_operand(stack, name)?;
            a.sqrt().ok_or_else(|| {
                EngineError::invalid_expression("Square root of a negative number")
            })
        }
        other => Err(EngineError::invalid_expression(format!(
            "Unknown function: {other}"
        ))),
    }
}
