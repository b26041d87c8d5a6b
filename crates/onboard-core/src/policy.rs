/// Onboarding policy thresholds consumed by the rule battery.
///
/// A [`ValidationPolicy`] is passed to the engine at construction; no rule
/// reads a global constant. [`ValidationPolicy::default`] encodes the house
/// policy (18 years, 10-character PAN, ₹5,00,000 minimum ticket).
use serde::{Deserialize, Serialize};

/// Default minimum investment, in currency units.
pub const DEFAULT_MIN_INVESTMENT: f64 = 500_000.0;

/// Default required tax identifier length, in characters.
pub const DEFAULT_TAX_ID_LENGTH: usize = 10;

/// Default minimum client age, in whole years.
pub const DEFAULT_MIN_AGE: i32 = 18;

/// Default currency symbol used when echoing a failing amount.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// The literal that upstream systems write when a tax identifier was never collected.
pub const MISSING_TAX_ID_PLACEHOLDER: &str = "MISSING";

/// Error returned by [`ValidationPolicy::new`] for thresholds that cannot be enforced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// The minimum investment is negative, `NaN`, or infinite.
    #[error("minimum investment must be a finite, non-negative number, got {0}")]
    InvalidMinInvestment(f64),
    /// A tax identifier of zero characters can never be present.
    #[error("required tax identifier length must be at least 1")]
    ZeroTaxIdLength,
    /// Ages below zero are meaningless as a policy floor.
    #[error("minimum age must not be negative, got {0}")]
    NegativeMinAge(i32),
}

/// Thresholds for one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Inclusive lower bound on the investment amount.
    pub min_investment: f64,
    /// Exact number of characters a tax identifier must have.
    pub tax_id_length: usize,
    /// Inclusive lower bound on the derived age.
    pub min_age: i32,
    /// Symbol prefixed to the amount in `Below Min (..)` messages.
    pub currency_symbol: String,
}

impl ValidationPolicy {
    /// Builds a policy, rejecting thresholds no record could satisfy meaningfully.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when `min_investment` is negative or not finite,
    /// `tax_id_length` is zero, or `min_age` is negative.
    pub fn new(
        min_investment: f64,
        tax_id_length: usize,
        min_age: i32,
        currency_symbol: impl Into<String>,
    ) -> Result<Self, PolicyError> {
        if !min_investment.is_finite() || min_investment < 0.0 {
            return Err(PolicyError::InvalidMinInvestment(min_investment));
        }
        if tax_id_length == 0 {
            return Err(PolicyError::ZeroTaxIdLength);
        }
        if min_age < 0 {
            return Err(PolicyError::NegativeMinAge(min_age));
        }
        Ok(Self {
            min_investment,
            tax_id_length,
            min_age,
            currency_symbol: currency_symbol.into(),
        })
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_investment: DEFAULT_MIN_INVESTMENT,
            tax_id_length: DEFAULT_TAX_ID_LENGTH,
            min_age: DEFAULT_MIN_AGE,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn default_matches_house_policy() {
        let p = ValidationPolicy::default();
        assert_eq!(p.min_investment, 500_000.0);
        assert_eq!(p.tax_id_length, 10);
        assert_eq!(p.min_age, 18);
        assert_eq!(p.currency_symbol, "₹");
    }

    #[test]
    fn new_accepts_alternate_thresholds() {
        let p = ValidationPolicy::new(1_000.0, 12, 21, "$").expect("valid policy");
        assert_eq!(p.tax_id_length, 12);
        assert_eq!(p.min_age, 21);
    }

    #[test]
    fn new_rejects_negative_investment() {
        assert_eq!(
            ValidationPolicy::new(-1.0, 10, 18, "₹"),
            Err(PolicyError::InvalidMinInvestment(-1.0))
        );
    }

    #[test]
    fn new_rejects_nan_investment() {
        assert!(matches!(
            ValidationPolicy::new(f64::NAN, 10, 18, "₹"),
            Err(PolicyError::InvalidMinInvestment(_))
        ));
    }

    #[test]
    fn new_rejects_zero_tax_id_length() {
        assert_eq!(
            ValidationPolicy::new(0.0, 0, 18, "₹"),
            Err(PolicyError::ZeroTaxIdLength)
        );
    }

    #[test]
    fn new_rejects_negative_age() {
        assert_eq!(
            ValidationPolicy::new(0.0, 10, -1, "₹"),
            Err(PolicyError::NegativeMinAge(-1))
        );
    }

    #[test]
    fn error_messages_name_the_threshold() {
        let msg = PolicyError::ZeroTaxIdLength.to_string();
        assert!(msg.contains("tax identifier"), "{msg}");
    }
}
