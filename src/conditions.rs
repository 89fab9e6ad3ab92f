use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::types::{ConditionOperator, Parameters, Rule, Value};

/// Decide whether a rule's conditions all hold for the given parameters.
///
/// A rule with no conditions is unconditionally applicable. A condition whose
/// parameter is absent from `params` makes the whole rule inapplicable; this
/// is an ordinary `false`, not an error, unlike a missing variable inside an
/// expression.
///
/// # Errors
///
/// Returns [`EngineError::InvalidOperator`] when a condition names an
/// operator outside the supported set.
pub fn check_conditions(rule: &Rule, params: &Parameters) -> Result<bool, EngineError> {
    for condition in rule.conditions() {
        let Some(value) = params.get(condition.parameter()) else {
            return Ok(false);
        };
        let op: ConditionOperator = condition.operator().parse()?;
        if !compare(value, op, condition.value()) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// A condition operand after best-effort type resolution.
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Number(Decimal),
    Date(NaiveDateTime),
    Bool(bool),
    Text(String),
}

fn resolve_value(value: &Value) -> Resolved {
    match value {
        Value::Int(v) => Resolved::Number(Decimal::from(*v)),
        Value::Decimal(v) => Resolved::Number(*v),
        Value::DateTime(v) => Resolved::Date(*v),
        Value::Bool(v) => Resolved::Bool(*v),
        // Strings go through the same inference chain as condition literals,
        // so a numeric string compares numerically.
        Value::String(v) => resolve_text(v),
    }
}

// Resolution priority: decimal, then date/time, then boolean, then plain text.
fn resolve_text(text: &str) -> Resolved {
    let trimmed = text.trim();
    if let Ok(number) = trimmed.parse::<Decimal>() {
        return Resolved::Number(number);
    }
    if let Some(date) = parse_datetime(trimmed) {
        return Resolved::Date(date);
    }
    if let Ok(flag) = trimmed.to_ascii_lowercase().parse::<bool>() {
        return Resolved::Bool(flag);
    }
    Resolved::Text(text.to_owned())
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(Into::into)
}

fn compare(value: &Value, op: ConditionOperator, literal: &str) -> bool {
    match (resolve_value(value), resolve_text(literal)) {
        (Resolved::Number(a), Resolved::Number(b)) => compare_ord(a.cmp(&b), op),
        (Resolved::Date(a), Resolved::Date(b)) => compare_ord(a.cmp(&b), op),
        (Resolved::Bool(a), Resolved::Bool(b)) => match op {
            ConditionOperator::Equals => a == b,
            ConditionOperator::NotEquals => a != b,
            _ => false,
        },
        (Resolved::Text(a), Resolved::Text(b)) => compare_text(&a, &b, op),
        // Mismatched categories degrade to a case-insensitive comparison of
        // the canonical string forms. Kept for compatibility with existing
        // rule data; see the crate tests for the observable consequences.
        (a, b) => compare_text(&render(&a), &render(&b), op),
    }
}

fn compare_ord(ord: Ordering, op: ConditionOperator) -> bool {
    match op {
        ConditionOperator::Equals => ord == Ordering::Equal,
        ConditionOperator::NotEquals => ord != Ordering::Equal,
        ConditionOperator::GreaterThan => ord == Ordering::Greater,
        ConditionOperator::LessThan => ord == Ordering::Less,
        ConditionOperator::GreaterThanOrEqual => ord != Ordering::Less,
        ConditionOperator::LessThanOrEqual => ord != Ordering::Greater,
        ConditionOperator::Contains
        | ConditionOperator::StartsWith
        | ConditionOperator::EndsWith => false,
    }
}

fn compare_text(a: &str, b: &str, op: ConditionOperator) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    match op {
        ConditionOperator::Equals => a == b,
        ConditionOperator::NotEquals => a != b,
        ConditionOperator::Contains => a.contains(&b),
        ConditionOperator::StartsWith => a.starts_with(&b),
        ConditionOperator::EndsWith => a.ends_with(&b),
        ConditionOperator::GreaterThan
        | ConditionOperator::LessThan
        | ConditionOperator::GreaterThanOrEqual
        | ConditionOperator::LessThanOrEqual => false,
    }
}

fn render(resolved: &Resolved) -> String {
    match resolved {
        Resolved::Number(v) => v.to_string(),
        Resolved::Date(v) => v.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Resolved::Bool(v) => v.to_string(),
        Resolved::Text(v) => v.clone(),
    }
}
