use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::country::CountryCode;
use crate::error::EngineError;

/// Settlement currencies for the countries the filing service covers.
///
/// The set is closed: every supported filing country maps onto one of these,
/// with euro-area countries (and any unrecognized code) defaulting to EUR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
    Chf,
    Pln,
    Sek,
    Dkk,
    Nok,
    Czk,
    Huf,
    Ron,
    Bgn,
}

impl Currency {
    /// ISO 4217 alphabetic code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Chf => "CHF",
            Currency::Pln => "PLN",
            Currency::Sek => "SEK",
            Currency::Dkk => "DKK",
            Currency::Nok => "NOK",
            Currency::Czk => "CZK",
            Currency::Huf => "HUF",
            Currency::Ron => "RON",
            Currency::Bgn => "BGN",
        }
    }

    /// The settlement currency for a filing country.
    ///
    /// Countries outside the explicit table settle in EUR.
    #[must_use]
    pub fn for_country(country: CountryCode) -> Currency {
        match country.as_str() {
            "GB" => Currency::Gbp,
            "US" => Currency::Usd,
            "CH" => Currency::Chf,
            "PL" => Currency::Pln,
            "SE" => Currency::Sek,
            "DK" => Currency::Dkk,
            "NO" => Currency::Nok,
            "CZ" => Currency::Czk,
            "HU" => Currency::Huf,
            "RO" => Currency::Ron,
            "BG" => Currency::Bgn,
            _ => Currency::Eur,
        }
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "USD" => Ok(Currency::Usd),
            "CHF" => Ok(Currency::Chf),
            "PLN" => Ok(Currency::Pln),
            "SEK" => Ok(Currency::Sek),
            "DKK" => Ok(Currency::Dkk),
            "NOK" => Ok(Currency::Nok),
            "CZK" => Ok(Currency::Czk),
            "HUF" => Ok(Currency::Huf),
            "RON" => Ok(Currency::Ron),
            "BGN" => Ok(Currency::Bgn),
            other => Err(EngineError::validation(format!(
                "unsupported currency code '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An exact amount in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Money { amount, currency }
    }

    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Money {
            amount: Decimal::ZERO,
            currency,
        }
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn country(code: &str) -> CountryCode {
        CountryCode::new(code).unwrap()
    }

    #[test]
    fn currency_for_mapped_countries() {
        assert_eq!(Currency::for_country(country("GB")), Currency::Gbp);
        assert_eq!(Currency::for_country(country("PL")), Currency::Pln);
        assert_eq!(Currency::for_country(country("SE")), Currency::Sek);
        assert_eq!(Currency::for_country(country("CH")), Currency::Chf);
    }

    #[test]
    fn euro_area_defaults_to_eur() {
        assert_eq!(Currency::for_country(country("DE")), Currency::Eur);
        assert_eq!(Currency::for_country(country("FR")), Currency::Eur);
        assert_eq!(Currency::for_country(country("NL")), Currency::Eur);
        // Unmapped non-euro countries still settle in EUR.
        assert_eq!(Currency::for_country(country("JP")), Currency::Eur);
    }

    #[test]
    fn currency_code_round_trip() {
        for currency in [Currency::Eur, Currency::Gbp, Currency::Huf] {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
    }

    #[test]
    fn currency_from_str_is_case_insensitive() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!(" gbp ".parse::<Currency>().unwrap(), Currency::Gbp);
    }

    #[test]
    fn currency_from_str_rejects_unknown() {
        assert!("XTS".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn money_accessors() {
        let money = Money::new(dec!(123.45), Currency::Eur);
        assert_eq!(money.amount(), dec!(123.45));
        assert_eq!(money.currency(), Currency::Eur);
        assert!(!money.is_zero());
    }

    #[test]
    fn money_zero() {
        let money = Money::zero(Currency::Gbp);
        assert!(money.is_zero());
        assert_eq!(money.amount(), Decimal::ZERO);
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::new(dec!(99.90), Currency::Pln).to_string(), "99.90 PLN");
    }

    #[test]
    fn money_equality_normalizes_scale() {
        assert_eq!(
            Money::new(dec!(200), Currency::Eur),
            Money::new(dec!(200.00), Currency::Eur)
        );
    }
}
