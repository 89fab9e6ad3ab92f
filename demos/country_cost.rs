use chrono::NaiveDate;
use vatcalc::{CountryCode, Parameters, Rule, RuleEngine, RuleType};

fn main() {
    let de = CountryCode::new("DE").expect("valid country");
    let gb = CountryCode::new("GB").expect("valid country");
    let from = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    // A small rule set: VAT rates per country, a volume surcharge gated on
    // transaction count, and a loyalty discount.
    let engine = RuleEngine::new(vec![
        Rule::builder("de-vat", de, RuleType::VatRate, "German VAT", "basePrice * 0.19", from)
            .build()
            .expect("rule should validate"),
        Rule::builder("gb-vat", gb, RuleType::VatRate, "UK VAT", "basePrice * 0.20", from)
            .build()
            .expect("rule should validate"),
        Rule::builder(
            "de-volume",
            de,
            RuleType::Complexity,
            "High volume surcharge",
            "transactionCount * 0.1",
            from,
        )
        .condition("transactionCount", "GreaterThan", "500")
        .build()
        .expect("rule should validate"),
        Rule::builder(
            "de-loyalty",
            de,
            RuleType::Discount,
            "Loyalty discount",
            "basePrice * 0.02",
            from,
        )
        .condition("customerTier", "Equals", "gold")
        .build()
        .expect("rule should validate"),
    ]);

    let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");

    // Small filer: VAT only
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 120_i64);
    let cost = engine
        .calculate_country_cost(de, &params, as_of)
        .expect("calculation failed");
    println!("small German filer:  {cost}");

    // Large gold-tier filer: VAT + surcharge - discount
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("transactionCount", 800_i64)
        .set("customerTier", "gold");
    let cost = engine
        .calculate_country_cost(de, &params, as_of)
        .expect("calculation failed");
    println!("large German filer:  {cost}");

    // Same inputs, UK rules and currency
    let cost = engine
        .calculate_country_cost(gb, &params, as_of)
        .expect("calculation failed");
    println!("UK filer:            {cost}");

    // Per-rule breakdown for display
    let applicable = engine.applicable_rules(de, as_of);
    let breakdown = engine
        .evaluate_rules(applicable, &params)
        .expect("evaluation failed");
    println!("German breakdown:");
    for (id, amount) in &breakdown {
        println!("  {id}: {amount}");
    }
}
