use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::conditions::check_conditions;
use crate::error::EngineError;
use crate::types::{CountryCode, Currency, Money, Parameters, Rule, RuleId, RuleType};

/// An immutable snapshot of pricing rules plus the operations that select,
/// evaluate, and aggregate them.
///
/// The engine never mutates its rules and holds no other state, so a single
/// instance is thread-safe and designed to live behind `Arc`. Administrative
/// rule edits happen on separately owned [`Rule`] values; swapping in a new
/// engine publishes them.
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use vatcalc::{CountryCode, Parameters, Rule, RuleEngine, RuleType};
///
/// let de = CountryCode::new("DE")?;
/// let vat = Rule::builder(
///     "de-vat",
///     de,
///     RuleType::VatRate,
///     "Standard VAT",
///     "basePrice * 0.19",
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// )
/// .build()?;
///
/// let engine = RuleEngine::new(vec![vat]);
/// let params = Parameters::new().set("basePrice", 1000_i64);
/// let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
///
/// let cost = engine.calculate_country_cost(de, &params, as_of)?;
/// assert_eq!(cost.amount(), dec!(190));
/// assert_eq!(cost.currency().code(), "EUR");
/// # Ok::<(), vatcalc::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleEngine { rules }
    }

    /// All rules in the snapshot, in their supplied order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that are active, belong to `country`, and whose effective window
    /// covers `as_of`, sorted ascending by priority.
    ///
    /// The sort is stable, so rules sharing a priority keep their snapshot
    /// order. Selection is a linear scan; indexing is the persistence
    /// layer's concern.
    #[must_use]
    pub fn applicable_rules(&self, country: CountryCode, as_of: NaiveDate) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                rule.is_active() && rule.country() == country && rule.is_effective_on(as_of)
            })
            .collect();
        rules.sort_by_key(|rule| rule.priority());
        rules
    }

    /// [`applicable_rules()`](Self::applicable_rules) narrowed to one cost
    /// category.
    #[must_use]
    pub fn applicable_rules_by_type(
        &self,
        country: CountryCode,
        rule_type: RuleType,
        as_of: NaiveDate,
    ) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                rule.is_active()
                    && rule.country() == country
                    && rule.rule_type() == rule_type
                    && rule.is_effective_on(as_of)
            })
            .collect();
        rules.sort_by_key(|rule| rule.priority());
        rules
    }

    /// Evaluate a single rule's expression against the parameters.
    ///
    /// Conditions are not consulted here; use
    /// [`evaluate_rules()`](Self::evaluate_rules) for condition-gated
    /// evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for a rule with an empty
    /// expression, otherwise the failure modes of
    /// [`evaluate()`](crate::evaluate()).
    pub fn evaluate_rule(&self, rule: &Rule, params: &Parameters) -> Result<Decimal, EngineError> {
        if rule.expression().trim().is_empty() {
            return Err(EngineError::validation(format!(
                "rule '{}' has an empty expression",
                rule.id()
            )));
        }
        crate::evaluate::evaluate(rule.expression(), params)
    }

    /// Evaluate every rule whose conditions pass, keyed by rule id.
    ///
    /// Rules failing their conditions are silently omitted. The map is
    /// ordered by rule id, giving callers a stable per-rule breakdown for
    /// display.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation or condition error; a missing condition
    /// parameter is not an error (the rule is skipped).
    pub fn evaluate_rules<'a, I>(
        &self,
        rules: I,
        params: &Parameters,
    ) -> Result<BTreeMap<RuleId, Decimal>, EngineError>
    where
        I: IntoIterator<Item = &'a Rule>,
    {
        let mut results = BTreeMap::new();
        for rule in rules {
            if !check_conditions(rule, params)? {
                continue;
            }
            let value = self.evaluate_rule(rule, params)?;
            results.insert(rule.id().clone(), value);
        }
        Ok(results)
    }

    /// Compute the total filing cost for a country.
    ///
    /// Categories are folded in the fixed order
    /// [`RuleType::AGGREGATION_ORDER`]: VAT-rate amounts establish the base
    /// before thresholds and complexity surcharges, special requirements
    /// follow, and discounts are applied last, subtracting from the running
    /// total. A negative end result is floored to zero. The currency comes
    /// from the country, per [`Currency::for_country()`].
    ///
    /// # Errors
    ///
    /// Propagates the first condition or evaluation error from any
    /// applicable rule.
    pub fn calculate_country_cost(
        &self,
        country: CountryCode,
        params: &Parameters,
        as_of: NaiveDate,
    ) -> Result<Money, EngineError> {
        let mut total = Decimal::ZERO;
        for rule_type in RuleType::AGGREGATION_ORDER {
            total = self.process_rule_type(total, country, rule_type, params, as_of)?;
        }
        Ok(Money::new(
            total.max(Decimal::ZERO),
            Currency::for_country(country),
        ))
    }

    // Folds one category into the running total. The accumulator travels as
    // an explicit parameter; nothing is captured.
    fn process_rule_type(
        &self,
        total: Decimal,
        country: CountryCode,
        rule_type: RuleType,
        params: &Parameters,
        as_of: NaiveDate,
    ) -> Result<Decimal, EngineError> {
        let rules = self.applicable_rules_by_type(country, rule_type, as_of);
        let results = self.evaluate_rules(rules, params)?;

        let mut subtotal = Decimal::ZERO;
        for value in results.values() {
            subtotal = subtotal.checked_add(*value).ok_or_else(aggregation_overflow)?;
        }

        if rule_type.is_deduction() {
            total.checked_sub(subtotal).ok_or_else(aggregation_overflow)
        } else {
            total.checked_add(subtotal).ok_or_else(aggregation_overflow)
        }
    }

    /// Check an expression without evaluating it, for admin-side validation
    /// of rule edits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for blank input and
    /// [`EngineError::InvalidExpression`] describing the parse failure
    /// otherwise.
    pub fn validate_rule_expression(&self, expression: &str) -> Result<(), EngineError> {
        if expression.trim().is_empty() {
            return Err(EngineError::validation(
                "rule expression must not be empty",
            ));
        }
        crate::parse::validate(expression)?;
        Ok(())
    }
}

fn aggregation_overflow() -> EngineError {
    EngineError::invalid_expression("Numeric overflow while aggregating rule results")
}

impl fmt::Display for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleEngine({} rules)", self.rules.len())
    }
}
