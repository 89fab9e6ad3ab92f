use chrono::NaiveDate;
use vatcalc::{check_conditions, CountryCode, Parameters, Rule, RuleType};

fn main() {
    let de = CountryCode::new("DE").expect("valid country");
    let from = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    // A surcharge that only applies to large, unregistered filers
    let rule = Rule::builder(
        "de-manual-review",
        de,
        RuleType::SpecialRequirement,
        "Manual review fee",
        "85",
        from,
    )
    .condition("transactionCount", "GreaterThanOrEqual", "1000")
    .condition("isRegistered", "Equals", "false")
    .build()
    .expect("rule should validate");

    let scenarios = [
        ("large unregistered", 2500_i64, false),
        ("large registered", 2500, true),
        ("small unregistered", 40, false),
    ];

    for (label, count, registered) in scenarios {
        let params = Parameters::new()
            .set("transactionCount", count)
            .set("isRegistered", registered);
        let applies = check_conditions(&rule, &params).expect("operators are valid");
        println!("{label:20} -> applies: {applies}");
    }

    // A missing parameter is not an error; the rule simply does not apply
    let applies = check_conditions(&rule, &Parameters::new()).expect("operators are valid");
    println!("{:20} -> applies: {applies}", "no parameters");

    // String comparisons are case-insensitive
    let tiered = Rule::builder(
        "de-tiered",
        de,
        RuleType::Discount,
        "Tiered discount",
        "25",
        from,
    )
    .condition("customerTier", "StartsWith", "GOLD")
    .build()
    .expect("rule should validate");

    let params = Parameters::new().set("customerTier", "gold-plus");
    let applies = check_conditions(&tiered, &params).expect("operators are valid");
    println!("{:20} -> applies: {applies}", "gold-plus tier");
}
