/// The client record model: one onboarding application, the unit of validation.
///
/// Raw fields that the rule battery normalizes (`dob`, `tax_id`, `email`,
/// `investment_amount`) are kept as the text the input source supplied, so
/// that malformed values survive intact into the report. `None` is the
/// explicit absent marker for an empty cell.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Risk appetite declared on the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    /// Aggressive growth mandate.
    High,
    /// Balanced mandate.
    Medium,
    /// Capital preservation mandate.
    Low,
}

/// The `Risk_Profile` column: either a known [`RiskProfile`] or the raw text.
///
/// Unrecognised values are preserved verbatim; no rule rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskProfileTag {
    /// A risk profile recognised by this crate.
    Known(RiskProfile),
    /// Any other value, kept as supplied.
    Other(String),
}

impl RiskProfileTag {
    /// Returns the display string for the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(RiskProfile::High) => "High",
            Self::Known(RiskProfile::Medium) => "Medium",
            Self::Known(RiskProfile::Low) => "Low",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for RiskProfileTag {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::Known(RiskProfile::High),
            "medium" => Self::Known(RiskProfile::Medium),
            "low" => Self::Known(RiskProfile::Low),
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl Default for RiskProfileTag {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// Country of tax residence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    /// India.
    India,
    /// United States of America.
    Usa,
    /// United Kingdom.
    Uk,
    /// Singapore.
    Singapore,
}

/// The `Country` column: either a known [`Country`] or the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CountryTag {
    /// A country recognised by this crate.
    Known(Country),
    /// Any other value, kept as supplied.
    Other(String),
}

impl CountryTag {
    /// Returns the display string for the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(Country::India) => "India",
            Self::Known(Country::Usa) => "USA",
            Self::Known(Country::Uk) => "UK",
            Self::Known(Country::Singapore) => "Singapore",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for CountryTag {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "india" => Self::Known(Country::India),
            "usa" => Self::Known(Country::Usa),
            "uk" => Self::Known(Country::Uk),
            "singapore" => Self::Known(Country::Singapore),
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl Default for CountryTag {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

macro_rules! string_tag_serde {
    ($tag:ident, $expecting:literal) => {
        impl fmt::Display for $tag {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $tag {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $tag {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct TagVisitor;

                impl de::Visitor<'_> for TagVisitor {
                    type Value = $tag;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str($expecting)
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        Ok($tag::from(v))
                    }
                }

                deserializer.deserialize_str(TagVisitor)
            }
        }
    };
}

string_tag_serde!(RiskProfileTag, "a string naming a risk profile");
string_tag_serde!(CountryTag, "a string naming a country");

/// One client's onboarding application.
///
/// Constructed once from an input row and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Dataset-unique client identifier.
    pub client_id: i64,
    /// Full legal name.
    pub full_name: String,
    /// Date of birth as supplied, expected in `YYYY-MM-DD` form.
    pub dob: Option<String>,
    /// Tax identifier (PAN) as supplied.
    pub tax_id: Option<String>,
    /// Contact email as supplied.
    pub email: Option<String>,
    /// Investment amount as supplied, expected to be numeric.
    pub investment_amount: Option<String>,
    /// Declared risk profile.
    pub risk_profile: RiskProfileTag,
    /// Country of tax residence.
    pub country: CountryTag,
}
