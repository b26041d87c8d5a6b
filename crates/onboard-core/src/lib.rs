#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod batch;
pub mod normalize;
pub mod policy;
pub mod record;
pub mod validation;

pub use batch::{BatchSummary, evaluate_all, evaluate_batch};
pub use normalize::{Age, Amount, BirthDate, age_on, derive_age, is_valid_email};
pub use policy::{
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_MIN_AGE, DEFAULT_MIN_INVESTMENT, DEFAULT_TAX_ID_LENGTH,
    MISSING_TAX_ID_PLACEHOLDER, PolicyError, ValidationPolicy,
};
pub use record::{ClientRecord, Country, CountryTag, RiskProfile, RiskProfileTag};
pub use validation::{
    Finding, MESSAGE_SEPARATOR, RuleContext, RuleId, Status, VERIFIED_MESSAGE, ValidationOutcome,
    ValidationRule, Validator, build_registry, validate,
};

/// Returns the current version of the onboard-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
