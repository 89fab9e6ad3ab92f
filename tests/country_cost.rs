use chrono::NaiveDate;
use rust_decimal_macros::dec;
use vatcalc::{
    CountryCode, Currency, Parameters, Rule, RuleEngine, RuleId, RuleType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

/// A small but realistic rule set: German VAT with a volume surcharge and a
/// loyalty discount, a UK flat fee, and a retired 2023 German rate.
fn fixture_engine() -> RuleEngine {
    let de = country("DE");
    let gb = country("GB");

    let rules = vec![
        Rule::builder(
            "de-vat-2024",
            de,
            RuleType::VatRate,
            "Standard VAT 2024",
            "basePrice * 0.19",
            date(2024, 1, 1),
        )
        .build()
        .unwrap(),
        Rule::builder(
            "de-vat-2023",
            de,
            RuleType::VatRate,
            "Standard VAT 2023",
            "basePrice * 0.16",
            date(2023, 1, 1),
        )
        .effective_to(date(2023, 12, 31))
        .build()
        .unwrap(),
        Rule::builder(
            "de-volume",
            de,
            RuleType::Complexity,
            "High volume surcharge",
            "transactionCount * 0.1",
            date(2024, 1, 1),
        )
        .condition("transactionCount", "GreaterThan", "500")
        .build()
        .unwrap(),
        Rule::builder(
            "de-loyalty",
            de,
            RuleType::Discount,
            "Loyalty discount",
            "basePrice * 0.02",
            date(2024, 1, 1),
        )
        .condition("customerTier", "Equals", "gold")
        .build()
        .unwrap(),
        Rule::builder(
            "gb-flat",
            gb,
            RuleType::VatRate,
            "UK flat filing fee",
            "120",
            date(2024, 1, 1),
        )
        .build()
        .unwrap(),
    ];

    RuleEngine::new(rules)
}

#[test]
fn base_case_single_applicable_rule() {
    let engine = fixture_engine();
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 100_i64);

    let cost = engine
        .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(190));
    assert_eq!(cost.currency(), Currency::Eur);
}

#[test]
fn conditions_pull_in_surcharges_and_discounts() {
    let engine = fixture_engine();
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 800_i64)
        .set("customerTier", "gold");

    // 190 VAT + 80 surcharge - 20 discount
    let cost = engine
        .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(250));
}

#[test]
fn discount_subtracts_from_the_running_total() {
    let de = country("DE");
    let engine = RuleEngine::new(vec![
        Rule::builder("vat", de, RuleType::VatRate, "VAT", "basePrice * 0.20", date(2024, 1, 1))
            .build()
            .unwrap(),
        Rule::builder(
            "disc",
            de,
            RuleType::Discount,
            "Promo",
            "basePrice * 0.10",
            date(2024, 1, 1),
        )
        .build()
        .unwrap(),
    ]);

    let params = Parameters::new().set("basePrice", 1000_i64);
    let cost = engine
        .calculate_country_cost(de, &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(100));
}

#[test]
fn total_is_floored_at_zero() {
    let de = country("DE");
    let engine = RuleEngine::new(vec![
        Rule::builder("vat", de, RuleType::VatRate, "VAT", "10", date(2024, 1, 1))
            .build()
            .unwrap(),
        Rule::builder("disc", de, RuleType::Discount, "Promo", "500", date(2024, 1, 1))
            .build()
            .unwrap(),
    ]);

    let cost = engine
        .calculate_country_cost(de, &Parameters::new(), date(2024, 6, 1))
        .unwrap();
    assert!(cost.is_zero());
    assert_eq!(cost.amount(), dec!(0));
}

#[test]
fn effective_window_selects_the_period_rate() {
    let engine = fixture_engine();
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 0_i64);

    let in_2023 = engine
        .calculate_country_cost(country("DE"), &params, date(2023, 6, 1))
        .unwrap();
    assert_eq!(in_2023.amount(), dec!(160));

    let in_2024 = engine
        .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(in_2024.amount(), dec!(190));

    // Before either window opened: nothing applies.
    let in_2022 = engine
        .calculate_country_cost(country("DE"), &params, date(2022, 6, 1))
        .unwrap();
    assert!(in_2022.is_zero());
}

#[test]
fn countries_are_isolated() {
    let engine = fixture_engine();
    let params = Parameters::new().set("basePrice", 1000_i64);

    let gb = engine
        .calculate_country_cost(country("GB"), &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(gb.amount(), dec!(120));
    assert_eq!(gb.currency(), Currency::Gbp);

    let fr = engine
        .calculate_country_cost(country("FR"), &params, date(2024, 6, 1))
        .unwrap();
    assert!(fr.is_zero());
    assert_eq!(fr.currency(), Currency::Eur);
}

#[test]
fn inactive_rules_never_contribute() {
    let de = country("DE");
    let mut retired = Rule::builder(
        "vat-old",
        de,
        RuleType::VatRate,
        "Retired rate",
        "basePrice * 0.50",
        date(2024, 1, 1),
    )
    .build()
    .unwrap();
    retired.deactivate();

    let engine = RuleEngine::new(vec![
        retired,
        Rule::builder("vat", de, RuleType::VatRate, "VAT", "basePrice * 0.19", date(2024, 1, 1))
            .build()
            .unwrap(),
    ]);

    let params = Parameters::new().set("basePrice", 100_i64);
    let cost = engine
        .calculate_country_cost(de, &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(19));
}

#[test]
fn priority_orders_selection_ties_keep_insertion_order() {
    let de = country("DE");
    let engine = RuleEngine::new(vec![
        Rule::builder("late", de, RuleType::VatRate, "late", "1", date(2024, 1, 1))
            .priority(10)
            .build()
            .unwrap(),
        Rule::builder("early", de, RuleType::VatRate, "early", "1", date(2024, 1, 1))
            .priority(1)
            .build()
            .unwrap(),
        Rule::builder("tie-a", de, RuleType::VatRate, "tie-a", "1", date(2024, 1, 1))
            .priority(5)
            .build()
            .unwrap(),
        Rule::builder("tie-b", de, RuleType::VatRate, "tie-b", "1", date(2024, 1, 1))
            .priority(5)
            .build()
            .unwrap(),
    ]);

    let ids: Vec<&str> = engine
        .applicable_rules(de, date(2024, 6, 1))
        .iter()
        .map(|r| r.id().as_str())
        .collect();
    assert_eq!(ids, ["early", "tie-a", "tie-b", "late"]);
}

#[test]
fn missing_condition_parameter_skips_the_rule_without_error() {
    let engine = fixture_engine();
    // No transactionCount or customerTier at all: the gated rules simply
    // drop out instead of failing the whole calculation.
    let params = Parameters::new().set("basePrice", 1000_i64);

    let cost = engine
        .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(190));
}

#[test]
fn missing_expression_parameter_fails_the_calculation() {
    let engine = fixture_engine();
    let err = engine
        .calculate_country_cost(country("DE"), &Parameters::new(), date(2024, 6, 1))
        .unwrap_err();
    assert_eq!(err.to_string(), "Parameter not found: basePrice");
}

#[test]
fn calculation_is_idempotent() {
    let engine = fixture_engine();
    let params = Parameters::new()
        .set("basePrice", dec!(2499.99))
        .set("transactionCount", 750_i64)
        .set("customerTier", "gold");

    let first = engine
        .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
        .unwrap();
    for _ in 0..5 {
        let again = engine
            .calculate_country_cost(country("DE"), &params, date(2024, 6, 1))
            .unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn per_rule_breakdown_is_keyed_and_ordered_by_id() {
    let engine = fixture_engine();
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 800_i64)
        .set("customerTier", "gold");

    let applicable = engine.applicable_rules(country("DE"), date(2024, 6, 1));
    let breakdown = engine.evaluate_rules(applicable, &params).unwrap();

    let ids: Vec<&str> = breakdown.keys().map(RuleId::as_str).collect();
    assert_eq!(ids, ["de-loyalty", "de-vat-2024", "de-volume"]);
    assert_eq!(breakdown.get(&RuleId::from("de-volume")), Some(&dec!(80)));
}

#[test]
fn all_five_categories_fold_in_order() {
    let de = country("DE");
    let mk = |id: &str, rule_type, expr: &str| {
        Rule::builder(id, de, rule_type, id, expr, date(2024, 1, 1))
            .build()
            .unwrap()
    };
    let engine = RuleEngine::new(vec![
        mk("disc", RuleType::Discount, "40"),
        mk("vat", RuleType::VatRate, "100"),
        mk("req", RuleType::SpecialRequirement, "20"),
        mk("thr", RuleType::Threshold, "30"),
        mk("cpx", RuleType::Complexity, "15"),
    ]);

    // 100 + 30 + 15 + 20 - 40, regardless of insertion order.
    let cost = engine
        .calculate_country_cost(de, &Parameters::new(), date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(125));
}

#[test]
fn engine_snapshot_is_unaffected_by_later_rule_edits() {
    let de = country("DE");
    let mut rule = Rule::builder("vat", de, RuleType::VatRate, "VAT", "100", date(2024, 1, 1))
        .build()
        .unwrap();
    let engine = RuleEngine::new(vec![rule.clone()]);

    rule.set_expression("999").unwrap();
    rule.deactivate();

    let cost = engine
        .calculate_country_cost(de, &Parameters::new(), date(2024, 6, 1))
        .unwrap();
    assert_eq!(cost.amount(), dec!(100));
}
