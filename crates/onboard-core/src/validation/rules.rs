/// The four onboarding rules.
///
/// Each rule is a zero-sized struct implementing [`ValidationRule`]. Rules
/// normalize the raw fields they need themselves, so they share no state and
/// may run in any order; [`super::build_registry`] fixes the message order.
use crate::normalize::{Age, Amount, derive_age, is_valid_email};
use crate::policy::{MISSING_TAX_ID_PLACEHOLDER, ValidationPolicy};
use crate::record::ClientRecord;
use crate::validation::{RuleContext, RuleId, ValidationRule};

// ---------------------------------------------------------------------------
// Age / date of birth
// ---------------------------------------------------------------------------

/// Date of birth must parse and the derived age must reach the policy minimum.
///
/// An unparseable date yields only `Invalid DOB`; it is never also reported
/// as a minor.
pub struct AgeRule;

impl ValidationRule for AgeRule {
    fn id(&self) -> RuleId {
        RuleId::AgeDob
    }

    fn describe(&self, policy: &ValidationPolicy) -> String {
        format!(
            "date of birth is a YYYY-MM-DD date and age is at least {}",
            policy.min_age
        )
    }

    fn check(&self, record: &ClientRecord, ctx: &RuleContext<'_>) -> Option<String> {
        match derive_age(record.dob.as_deref(), ctx.as_of) {
            Age::InvalidDob => Some("Invalid DOB".to_owned()),
            Age::Years(age) if age < ctx.policy.min_age => Some(format!("Minor (Age: {age})")),
            Age::Years(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tax identifier
// ---------------------------------------------------------------------------

/// Tax identifier must be present, not the `MISSING` placeholder, and exactly
/// the policy length in characters.
///
/// Presence is decided before length: whitespace-only values are present and
/// therefore reported as `Invalid Tax ID`.
pub struct TaxIdRule;

impl ValidationRule for TaxIdRule {
    fn id(&self) -> RuleId {
        RuleId::TaxId
    }

    fn describe(&self, policy: &ValidationPolicy) -> String {
        format!(
            "tax identifier is present, not {MISSING_TAX_ID_PLACEHOLDER:?}, and exactly {} characters",
            policy.tax_id_length
        )
    }

    fn check(&self, record: &ClientRecord, ctx: &RuleContext<'_>) -> Option<String> {
        let Some(tax_id) = record.tax_id.as_deref() else {
            return Some("Missing Tax ID".to_owned());
        };
        if tax_id == MISSING_TAX_ID_PLACEHOLDER {
            return Some("Missing Tax ID".to_owned());
        }
        if tax_id.chars().count() != ctx.policy.tax_id_length {
            return Some("Invalid Tax ID".to_owned());
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// Email must be present and shaped like `local@domain.tld`.
pub struct EmailRule;

impl ValidationRule for EmailRule {
    fn id(&self) -> RuleId {
        RuleId::Email
    }

    fn describe(&self, _policy: &ValidationPolicy) -> String {
        "email is present and shaped like local@domain.tld".to_owned()
    }

    fn check(&self, record: &ClientRecord, _ctx: &RuleContext<'_>) -> Option<String> {
        if is_valid_email(record.email.as_deref()) {
            None
        } else {
            Some("Invalid Email".to_owned())
        }
    }
}

// ---------------------------------------------------------------------------
// Investment minimum
// ---------------------------------------------------------------------------

/// Investment amount must parse and be at least the policy minimum (inclusive).
///
/// A failing amount is echoed as the caller supplied it, so the reviewer sees
/// the value that was on the application rather than a re-formatted float.
pub struct InvestmentMinimumRule;

impl ValidationRule for InvestmentMinimumRule {
    fn id(&self) -> RuleId {
        RuleId::InvestmentMinimum
    }

    fn describe(&self, policy: &ValidationPolicy) -> String {
        format!(
            "investment amount is numeric and at least {}{}",
            policy.currency_symbol, policy.min_investment
        )
    }

    fn check(&self, record: &ClientRecord, ctx: &RuleContext<'_>) -> Option<String> {
        let raw = record.investment_amount.as_deref();
        match Amount::parse(raw) {
            Amount::Invalid => Some("Invalid Amount".to_owned()),
            Amount::Valid(amount) if amount < ctx.policy.min_investment => Some(format!(
                "Below Min ({}{})",
                ctx.policy.currency_symbol,
                raw.unwrap_or_default().trim()
            )),
            Amount::Valid(_) => None,
        }
    }
}
