//! Parsing of rendered dollar amounts and the checkout totals cross-check

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\s*(\d+(?:\.\d+)?)").expect("amount pattern is valid")
});

/// Extract the first `$<number>` from a label such as `Item total: $29.99`
pub fn parse_amount(text: &str) -> E2eResult<f64> {
    AMOUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| E2eError::assertion("dollar amount", "$<number>", format!("{:?}", text)))
}

/// Amounts shown on the checkout overview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl CheckoutTotals {
    /// Total equals subtotal plus tax to two decimal places
    pub fn is_consistent(&self) -> bool {
        (self.total - (self.subtotal + self.tax)).abs() < 0.005
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Item total: $29.99", 29.99)]
    #[test_case("Tax: $2.40", 2.40)]
    #[test_case("Total: $32.39", 32.39)]
    #[test_case("$7.99", 7.99)]
    #[test_case("Total: $ 100", 100.0)]
    fn test_parse_amount(text: &str, expected: f64) {
        assert!((parse_amount(text).unwrap() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_amount_rejects_missing_dollar() {
        assert!(parse_amount("Total: free").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_consistency() {
        let ok = CheckoutTotals { subtotal: 29.99, tax: 2.40, total: 32.39 };
        assert!(ok.is_consistent());

        let off = CheckoutTotals { subtotal: 29.99, tax: 2.40, total: 32.49 };
        assert!(!off.is_consistent());
    }
}
