use rust_decimal_macros::dec;
use vatcalc::{evaluate, parse, Parameters};

fn main() {
    // Parse once, inspect the postfix form
    let postfix = parse::parse("2 + 3 * 4").expect("expression should parse");
    let rendered: Vec<String> = postfix.iter().map(ToString::to_string).collect();
    println!("postfix: {}", rendered.join(" "));

    // Literal arithmetic
    let result = evaluate("(2 + 3) * 4 / 2", &Parameters::new()).expect("evaluation failed");
    println!("(2 + 3) * 4 / 2 = {result}");

    // Variables come from a parameter map
    let params = Parameters::new()
        .set("basePrice", 1000_i64)
        .set("vatRate", dec!(0.19));
    let vat = evaluate("basePrice * vatRate", &params).expect("evaluation failed");
    println!("basePrice * vatRate = {vat}");

    // Functions: banded surcharge picked with if()
    let params = Parameters::new()
        .set("basePrice", dec!(1200))
        .set("transactionCount", 240_i64);
    let cost = evaluate(
        "basePrice * 0.19 + if(transactionCount - 200, 50, 0)",
        &params,
    )
    .expect("evaluation failed");
    println!("banded filing cost = {cost}");

    // Errors are reported, not panicked
    match evaluate("basePrice / 0", &params) {
        Ok(v) => println!("unexpected: {v}"),
        Err(e) => println!("error: {e} (code {})", e.code()),
    }
}
