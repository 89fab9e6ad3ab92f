mod country;
mod money;
mod params;
mod rule;
mod token;
mod value;

pub use country::CountryCode;
pub use money::{Currency, Money};
pub use params::Parameters;
pub use rule::{
    ConditionOperator, ParameterType, Rule, RuleBuilder, RuleCondition, RuleId, RuleParameter,
    RuleType,
};
pub use token::{ExpressionToken, TokenKind};
pub use value::Value;
