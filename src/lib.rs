mod conditions;
mod engine;
mod error;
mod evaluate;
pub mod parse;
mod types;

pub use conditions::check_conditions;
pub use engine::RuleEngine;
pub use error::{EngineError, ErrorCode};
pub use evaluate::{evaluate, evaluate_postfix};
pub use types::{
    ConditionOperator, CountryCode, Currency, ExpressionToken, Money, ParameterType, Parameters,
    Rule, RuleBuilder, RuleCondition, RuleId, RuleParameter, RuleType, TokenKind, Value,
};
