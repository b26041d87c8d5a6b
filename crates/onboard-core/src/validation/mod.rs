/// Outcome types and rule dispatch for the onboarding validation engine.
///
/// This module defines [`Status`], [`RuleId`], [`Finding`], and
/// [`ValidationOutcome`], the [`ValidationRule`] trait every rule implements,
/// [`build_registry`] (the canonical rule battery), and [`Validator`], which
/// runs the battery over one record.
///
/// The engine never fails fast: every rule runs on every record, and the
/// outcome carries every finding in canonical battery order.
pub mod rules;

use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeStruct as _;
use serde::{Serialize, Serializer};

use crate::policy::ValidationPolicy;
use crate::record::ClientRecord;


/// The message rendered for a record with no findings.
pub const VERIFIED_MESSAGE: &str = "Verified";

/// Separator placed between findings in a rendered FAIL message.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Pass/fail verdict for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Every rule passed.
    Pass,
    /// At least one rule produced a finding.
    Fail,
}

impl Status {
    /// Returns the upper-case report label (`"PASS"` or `"FAIL"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable identifier for a rule in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    /// Date of birth parses and the client is of age.
    AgeDob,
    /// Tax identifier is present and has the required length.
    TaxId,
    /// Email is syntactically valid.
    Email,
    /// Investment amount parses and meets the minimum ticket.
    InvestmentMinimum,
}

impl RuleId {
    /// Returns the stable snake-case code used in JSON output.
    pub fn code(self) -> &'static str {
        match self {
            Self::AgeDob => "age_dob",
            Self::TaxId => "tax_id",
            Self::Email => "email",
            Self::InvestmentMinimum => "investment_minimum",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One rule's error description for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The rule that produced this finding.
    pub rule_id: RuleId,
    /// Human-readable description, e.g. `"Minor (Age: 10)"`.
    pub message: String,
}

impl Finding {
    /// Constructs a new [`Finding`].
    pub fn new(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The verdict for one record.
///
/// Status is derived from the findings rather than stored, so the two can
/// never disagree: [`Status::Fail`] exactly when `findings` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    findings: Vec<Finding>,
}

impl ValidationOutcome {
    /// Creates an outcome from findings already in canonical order.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// Returns the verdict.
    pub fn status(&self) -> Status {
        if self.findings.is_empty() {
            Status::Pass
        } else {
            Status::Fail
        }
    }

    /// Returns `true` if no rule produced a finding.
    pub fn is_pass(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns the findings in canonical battery order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Returns the report message: `"Verified"`, or the findings joined with `"; "`.
    pub fn message(&self) -> String {
        if self.findings.is_empty() {
            return VERIFIED_MESSAGE.to_owned();
        }
        self.findings
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationOutcome", 3)?;
        s.serialize_field("status", self.status().as_str())?;
        s.serialize_field("message", &self.message())?;
        s.serialize_field("findings", &self.findings)?;
        s.end()
    }
}

/// Inputs shared by every rule during one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Active thresholds.
    pub policy: &'a ValidationPolicy,
    /// The date ages are computed against.
    pub as_of: NaiveDate,
}

/// A single, stateless rule over one [`ClientRecord`].
///
/// A rule returns `None` when the record satisfies it and `Some(message)`
/// otherwise. Rules never observe each other's results, so each can be
/// tested in isolation.
///
/// The trait is object-safe; the registry stores rules as
/// `Vec<Box<dyn ValidationRule>>` and shares them across worker threads.
pub trait ValidationRule: Send + Sync {
    /// The unique identifier for this rule.
    fn id(&self) -> RuleId;

    /// One-line description of the PASS condition, shown by `onboard rules`.
    fn describe(&self, policy: &ValidationPolicy) -> String;

    /// Inspect `record` and return the error description, if any.
    fn check(&self, record: &ClientRecord, ctx: &RuleContext<'_>) -> Option<String>;
}

/// Builds the rule battery in canonical order.
///
/// The order here is the order findings appear in a FAIL message:
/// age/DOB, tax identifier, email, investment minimum.
pub fn build_registry() -> Vec<Box<dyn ValidationRule>> {
    use rules::{AgeRule, EmailRule, InvestmentMinimumRule, TaxIdRule};

    vec![
        Box::new(AgeRule),
        Box::new(TaxIdRule),
        Box::new(EmailRule),
        Box::new(InvestmentMinimumRule),
    ]
}

/// Runs the rule battery over records under a fixed policy.
pub struct Validator {
    policy: ValidationPolicy,
    registry: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Builds a validator with the canonical battery.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            registry: build_registry(),
        }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Returns the battery in canonical order.
    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.registry
    }

    /// Evaluates every rule against `record` as of `as_of`.
    ///
    /// Never short-circuits: a record with four problems yields four findings.
    pub fn evaluate(&self, record: &ClientRecord, as_of: NaiveDate) -> ValidationOutcome {
        let ctx = RuleContext {
            policy: &self.policy,
            as_of,
        };
        let findings = self
            .registry
            .iter()
            .filter_map(|rule| rule.check(record, &ctx).map(|m| Finding::new(rule.id(), m)))
            .collect();
        ValidationOutcome::from_findings(findings)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("policy", &self.policy)
            .field(
                "rules",
                &self.registry.iter().map(|r| r.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Evaluates one record under `policy`.
///
/// Convenience for callers that validate a single record; batch callers
/// should build a [`Validator`] once.
pub fn validate(
    record: &ClientRecord,
    policy: &ValidationPolicy,
    as_of: NaiveDate,
) -> ValidationOutcome {
    Validator::new(policy.clone()).evaluate(record, as_of)
}
