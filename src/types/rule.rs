use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::country::CountryCode;
use crate::error::EngineError;

/// Opaque rule identifier.
///
/// Identifiers are assigned by whatever system persists the rules; the engine
/// only requires them to be unique within a rule set. Ordered so that
/// per-rule result maps have a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RuleId(String);

impl RuleId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(v: &str) -> Self {
        RuleId(v.to_owned())
    }
}

impl From<String> for RuleId {
    fn from(v: String) -> Self {
        RuleId(v)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The cost category a rule contributes to.
///
/// Categories are aggregated in the fixed order given by
/// [`AGGREGATION_ORDER`](RuleType::AGGREGATION_ORDER); every category adds to
/// the running total except [`Discount`](RuleType::Discount), which subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleType {
    VatRate,
    Threshold,
    Complexity,
    SpecialRequirement,
    Discount,
}

impl RuleType {
    /// The order in which categories are folded into a country cost.
    pub const AGGREGATION_ORDER: [RuleType; 5] = [
        RuleType::VatRate,
        RuleType::Threshold,
        RuleType::Complexity,
        RuleType::SpecialRequirement,
        RuleType::Discount,
    ];

    /// Whether results in this category reduce the total instead of adding.
    #[must_use]
    pub const fn is_deduction(self) -> bool {
        matches!(self, RuleType::Discount)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleType::VatRate => "VatRate",
            RuleType::Threshold => "Threshold",
            RuleType::Complexity => "Complexity",
            RuleType::SpecialRequirement => "SpecialRequirement",
            RuleType::Discount => "Discount",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a rule parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterType {
    Integer,
    Decimal,
    Text,
    Boolean,
    DateTime,
}

/// Declares a named input a rule expects, with an optional textual default.
///
/// Parameter declarations are descriptive metadata for admin tooling; the
/// evaluator itself resolves variables directly against the caller-supplied
/// parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleParameter {
    name: String,
    data_type: ParameterType,
    #[cfg_attr(feature = "serde", serde(default))]
    default_value: Option<String>,
}

impl RuleParameter {
    #[must_use]
    pub fn new(name: &str, data_type: ParameterType) -> Self {
        RuleParameter {
            name: name.to_owned(),
            data_type,
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_owned());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn data_type(&self) -> ParameterType {
        self.data_type
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// Comparison operator usable in a rule condition.
///
/// Condition rows store the operator as free text; it is resolved against
/// this set, case-insensitively, when the condition is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    StartsWith,
    EndsWith,
}

impl ConditionOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notequals",
            ConditionOperator::GreaterThan => "greaterthan",
            ConditionOperator::LessThan => "lessthan",
            ConditionOperator::GreaterThanOrEqual => "greaterthanorequal",
            ConditionOperator::LessThanOrEqual => "lessthanorequal",
            ConditionOperator::Contains => "contains",
            ConditionOperator::StartsWith => "startswith",
            ConditionOperator::EndsWith => "endswith",
        }
    }
}

impl FromStr for ConditionOperator {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" => Ok(ConditionOperator::Equals),
            "notequals" => Ok(ConditionOperator::NotEquals),
            "greaterthan" => Ok(ConditionOperator::GreaterThan),
            "lessthan" => Ok(ConditionOperator::LessThan),
            "greaterthanorequal" => Ok(ConditionOperator::GreaterThanOrEqual),
            "lessthanorequal" => Ok(ConditionOperator::LessThanOrEqual),
            "contains" => Ok(ConditionOperator::Contains),
            "startswith" => Ok(ConditionOperator::StartsWith),
            "endswith" => Ok(ConditionOperator::EndsWith),
            _ => Err(EngineError::InvalidOperator {
                operator: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gate that must hold for a rule to contribute a result.
///
/// All three fields are stored as text, matching how condition rows are
/// persisted. The operator and the value coercion are resolved at check time,
/// so constructing a condition never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleCondition {
    parameter: String,
    operator: String,
    value: String,
}

impl RuleCondition {
    #[must_use]
    pub fn new(parameter: &str, operator: &str, value: &str) -> Self {
        RuleCondition {
            parameter: parameter.to_owned(),
            operator: operator.to_owned(),
            value: value.to_owned(),
        }
    }

    /// Name of the parameter this condition inspects.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Raw operator text, resolved via [`ConditionOperator`] at check time.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Comparison value as text, coerced at check time.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A single pricing rule: an arithmetic expression plus the metadata that
/// decides when it applies.
///
/// Rules are immutable snapshots once handed to a
/// [`RuleEngine`](crate::RuleEngine); administrative edits go through the
/// mutators on a separately owned instance and take effect when a new engine
/// is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    id: RuleId,
    country: CountryCode,
    rule_type: RuleType,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    description: String,
    expression: String,
    effective_from: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    effective_to: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default))]
    priority: i32,
    active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    parameters: Vec<RuleParameter>,
    #[cfg_attr(feature = "serde", serde(default))]
    conditions: Vec<RuleCondition>,
}

impl Rule {
    /// Start building a rule from its required fields.
    ///
    /// The rule starts active, with priority 0 and an open-ended effective
    /// window.
    #[must_use]
    pub fn builder(
        id: impl Into<RuleId>,
        country: CountryCode,
        rule_type: RuleType,
        name: &str,
        expression: &str,
        effective_from: NaiveDate,
    ) -> RuleBuilder {
        RuleBuilder {
            rule: Rule {
                id: id.into(),
                country,
                rule_type,
                name: name.to_owned(),
                description: String::new(),
                expression: expression.to_owned(),
                effective_from,
                effective_to: None,
                priority: 0,
                active: true,
                parameters: Vec::new(),
                conditions: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    #[must_use]
    pub const fn country(&self) -> CountryCode {
        self.country
    }

    #[must_use]
    pub const fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub const fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    #[must_use]
    pub const fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }

    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn parameters(&self) -> &[RuleParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn conditions(&self) -> &[RuleCondition] {
        &self.conditions
    }

    /// Whether the rule's effective window covers the given date.
    ///
    /// Both bounds are inclusive; a missing end date means open-ended.
    #[must_use]
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }

    /// Re-check the structural invariants of this rule.
    ///
    /// The builder runs this automatically; call it directly after
    /// deserializing rules from storage.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for an empty name, empty
    /// expression, or an inverted effective window, and
    /// [`EngineError::InvalidExpression`] when the expression does not parse.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("rule name must not be empty"));
        }
        if self.expression.trim().is_empty() {
            return Err(EngineError::validation(format!(
                "rule '{}' has an empty expression",
                self.id
            )));
        }
        crate::parse::validate(&self.expression)?;
        if let Some(to) = self.effective_to {
            if self.effective_from > to {
                return Err(EngineError::validation(format!(
                    "rule '{}' effective window is inverted: {} is after {}",
                    self.id, self.effective_from, to
                )));
            }
        }
        Ok(())
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Replace the effective window.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `from` is after `to`.
    pub fn set_effective(
        &mut self,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<(), EngineError> {
        if let Some(to) = to {
            if from > to {
                return Err(EngineError::validation(format!(
                    "rule '{}' effective window is inverted: {from} is after {to}",
                    self.id
                )));
            }
        }
        self.effective_from = from;
        self.effective_to = to;
        Ok(())
    }

    /// Replace the arithmetic expression, validating that it parses.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for an empty expression and
    /// [`EngineError::InvalidExpression`] when it does not parse.
    pub fn set_expression(&mut self, expression: &str) -> Result<(), EngineError> {
        if expression.trim().is_empty() {
            return Err(EngineError::validation(format!(
                "rule '{}' has an empty expression",
                self.id
            )));
        }
        crate::parse::validate(expression)?;
        self.expression = expression.to_owned();
        Ok(())
    }

    pub fn add_condition(&mut self, condition: RuleCondition) {
        self.conditions.push(condition);
    }

    pub fn add_parameter(&mut self, parameter: RuleParameter) {
        self.parameters.push(parameter);
    }
}

/// Builder returned by [`Rule::builder()`].
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.rule.description = description.to_owned();
        self
    }

    /// Lower priorities are evaluated first within a category.
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.rule.priority = priority;
        self
    }

    /// Close the effective window at the given date, inclusive.
    #[must_use]
    pub fn effective_to(mut self, date: NaiveDate) -> Self {
        self.rule.effective_to = Some(date);
        self
    }

    /// Build the rule in the deactivated state.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.rule.active = false;
        self
    }

    /// Attach a condition gating this rule.
    #[must_use]
    pub fn condition(mut self, parameter: &str, operator: &str, value: &str) -> Self {
        self.rule
            .conditions
            .push(RuleCondition::new(parameter, operator, value));
        self
    }

    /// Declare a named input for admin tooling.
    #[must_use]
    pub fn parameter(mut self, parameter: RuleParameter) -> Self {
        self.rule.parameters.push(parameter);
        self
    }

    /// Validate and produce the rule.
    ///
    /// # Errors
    ///
    /// Returns the first failure from [`Rule::validate()`].
    pub fn build(self) -> Result<Rule, EngineError> {
        self.rule.validate()?;
        Ok(self.rule)
    }
}
