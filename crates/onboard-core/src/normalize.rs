/// Field normalizers: raw input text to semantic values or explicit invalid markers.
///
/// Each normalizer returns a sum type instead of failing, so one malformed
/// field never prevents the other rules from running on the same record.
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

// ---------------------------------------------------------------------------
// Compiled regex patterns
// ---------------------------------------------------------------------------

/// Strict calendar-date shape: four-digit year, one- or two-digit month and day.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").unwrap_or_else(|_| {
        Regex::new(r"[^\s\S]").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

/// `local-part@domain.tld` with an alphabetic TLD of at least two letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap_or_else(|_| {
        Regex::new(r"[^\s\S]").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

// ---------------------------------------------------------------------------
// Date of birth
// ---------------------------------------------------------------------------

/// Result of parsing a date-of-birth field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDate {
    /// The field held a real calendar date.
    Valid(NaiveDate),
    /// The field was absent, mis-shaped, or named a day that does not exist.
    Invalid,
}

impl BirthDate {
    /// Parses `raw` against the strict `YYYY-MM-DD` format.
    ///
    /// Surrounding whitespace is not tolerated. Month and day may omit their
    /// leading zero. `2023-02-29` and `2024-13-01` are [`BirthDate::Invalid`].
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Invalid;
        };
        let Some(caps) = DATE_RE.captures(raw) else {
            return Self::Invalid;
        };
        let year = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
        let month = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        let day = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
        match (year, month, day) {
            (Some(y), Some(m), Some(d)) => {
                NaiveDate::from_ymd_opt(y, m, d).map_or(Self::Invalid, Self::Valid)
            }
            _ => Self::Invalid,
        }
    }
}

/// A derived age, or the marker for an unusable date of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    /// Whole years elapsed. Negative when the birth date lies in the future.
    Years(i32),
    /// The date of birth could not be parsed.
    InvalidDob,
}

/// Whole years elapsed between `birth` and `as_of`.
///
/// One year is subtracted when the `as_of` month/day precedes the birth
/// month/day, so a birthday counts only once it has been reached.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let before_birthday = (as_of.month(), as_of.day()) < (birth.month(), birth.day());
    as_of.year() - birth.year() - i32::from(before_birthday)
}

/// Parses `raw` and derives the age on `as_of`.
pub fn derive_age(raw: Option<&str>, as_of: NaiveDate) -> Age {
    match BirthDate::parse(raw) {
        BirthDate::Valid(birth) => Age::Years(age_on(birth, as_of)),
        BirthDate::Invalid => Age::InvalidDob,
    }
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// Returns `true` if `raw` is present and has the shape `local@domain.tld`.
///
/// The whole value must match. A trailing newline, as a quoted CSV cell can
/// carry, makes the address invalid.
pub fn is_valid_email(raw: Option<&str>) -> bool {
    raw.is_some_and(|email| EMAIL_RE.is_match(email))
}

// ---------------------------------------------------------------------------
// Investment amount
// ---------------------------------------------------------------------------

/// Result of parsing an investment-amount field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    /// A finite number.
    Valid(f64),
    /// Absent, non-numeric, or non-finite (`NaN`, `inf`).
    Invalid,
}

impl Amount {
    /// Parses `raw` as a decimal or scientific-notation number.
    ///
    /// Surrounding whitespace is ignored. Underscores are accepted as digit
    /// separators when they sit between two digits (`1_000_000`). `NaN` and
    /// infinities are [`Amount::Invalid`], never a passing amount.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Invalid;
        };
        let Some(digits) = strip_digit_separators(raw.trim()) else {
            return Self::Invalid;
        };
        match digits.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Valid(v),
            Ok(_) | Err(_) => Self::Invalid,
        }
    }
}

/// Removes `_` separators, or returns `None` when one is not flanked by digits.
fn strip_digit_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return Some(text.to_owned());
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.char_indices() {
        if ch == '_' {
            let before = idx.checked_sub(1).and_then(|i| bytes.get(i));
            let after = bytes.get(idx + 1);
            let flanked = before.is_some_and(u8::is_ascii_digit)
                && after.is_some_and(u8::is_ascii_digit);
            if !flanked {
                return None;
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    // -- BirthDate -----------------------------------------------------------

    #[test]
    fn birth_date_parses_iso() {
        assert_eq!(
            BirthDate::parse(Some("1990-07-15")),
            BirthDate::Valid(date(1990, 7, 15))
        );
    }

    #[test]
    fn birth_date_accepts_unpadded_month_and_day() {
        assert_eq!(
            BirthDate::parse(Some("1990-7-5")),
            BirthDate::Valid(date(1990, 7, 5))
        );
    }

    #[test]
    fn birth_date_rejects_other_layouts() {
        for raw in ["15/07/1990", "1990/07/15", "19900715", "July 15 1990", ""] {
            assert_eq!(BirthDate::parse(Some(raw)), BirthDate::Invalid, "{raw}");
        }
    }

    #[test]
    fn birth_date_rejects_surrounding_whitespace() {
        assert_eq!(BirthDate::parse(Some(" 1990-07-15")), BirthDate::Invalid);
        assert_eq!(BirthDate::parse(Some("1990-07-15\n")), BirthDate::Invalid);
    }

    #[test]
    fn birth_date_rejects_impossible_days() {
        assert_eq!(BirthDate::parse(Some("2023-02-29")), BirthDate::Invalid);
        assert_eq!(BirthDate::parse(Some("2024-13-01")), BirthDate::Invalid);
        assert_eq!(BirthDate::parse(Some("2024-04-31")), BirthDate::Invalid);
    }

    #[test]
    fn birth_date_leap_day_is_valid_in_leap_year() {
        assert_eq!(
            BirthDate::parse(Some("2024-02-29")),
            BirthDate::Valid(date(2024, 2, 29))
        );
    }

    #[test]
    fn birth_date_absent_is_invalid() {
        assert_eq!(BirthDate::parse(None), BirthDate::Invalid);
    }

    // -- age_on --------------------------------------------------------------

    #[test]
    fn age_counts_birthday_on_the_day() {
        assert_eq!(age_on(date(2000, 3, 10), date(2018, 3, 10)), 18);
    }

    #[test]
    fn age_truncates_the_day_before_birthday() {
        assert_eq!(age_on(date(2000, 3, 10), date(2018, 3, 9)), 17);
    }

    #[test]
    fn age_compares_month_before_day() {
        assert_eq!(age_on(date(2000, 12, 1), date(2018, 11, 30)), 17);
        assert_eq!(age_on(date(2000, 1, 31), date(2018, 2, 1)), 18);
    }

    #[test]
    fn age_for_leap_day_birth_in_non_leap_year() {
        // Feb 28 precedes Feb 29, so the birthday is not yet reached.
        assert_eq!(age_on(date(2000, 2, 29), date(2019, 2, 28)), 18);
        assert_eq!(age_on(date(2000, 2, 29), date(2019, 3, 1)), 19);
    }

    #[test]
    fn age_is_negative_for_future_birth() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 6, 1)), -4);
    }

    #[test]
    fn derive_age_marks_unparseable_dob() {
        assert_eq!(
            derive_age(Some("not a date"), date(2026, 1, 1)),
            Age::InvalidDob
        );
        assert_eq!(
            derive_age(Some("1996-01-01"), date(2026, 1, 1)),
            Age::Years(30)
        );
    }

    // -- email ---------------------------------------------------------------

    #[test]
    fn email_accepts_common_shapes() {
        for raw in [
            "a@b.com",
            "priya.nair@gmail.com",
            "first_last+tag@mail.example.co.in",
            "x%y-z@sub-domain.org",
        ] {
            assert!(is_valid_email(Some(raw)), "{raw}");
        }
    }

    #[test]
    fn email_rejects_malformed_shapes() {
        for raw in [
            "bad-email",
            "Aarav.Sharma@",
            "aarav.sharma@bad-email",
            "@gmail.com",
            "a@b.c",
            "a@b.c0m",
            "a b@c.com",
            "",
        ] {
            assert!(!is_valid_email(Some(raw)), "{raw}");
        }
    }

    #[test]
    fn email_with_trailing_newline_is_invalid() {
        assert!(!is_valid_email(Some("a@b.com\n")));
        assert!(!is_valid_email(Some("a@b.com\r\n")));
        assert!(!is_valid_email(Some(" a@b.com")));
    }

    #[test]
    fn email_absent_is_invalid() {
        assert!(!is_valid_email(None));
    }

    // -- Amount --------------------------------------------------------------

    #[test]
    fn amount_parses_integers_and_decimals() {
        assert_eq!(Amount::parse(Some("500000")), Amount::Valid(500_000.0));
        assert_eq!(Amount::parse(Some("499999.5")), Amount::Valid(499_999.5));
        assert_eq!(Amount::parse(Some(" 600000 ")), Amount::Valid(600_000.0));
        assert_eq!(Amount::parse(Some("1e6")), Amount::Valid(1_000_000.0));
    }

    #[test]
    fn amount_rejects_non_numeric() {
        assert_eq!(Amount::parse(Some("not-a-number")), Amount::Invalid);
        assert_eq!(Amount::parse(Some("5,00,000")), Amount::Invalid);
        assert_eq!(Amount::parse(Some("")), Amount::Invalid);
        assert_eq!(Amount::parse(None), Amount::Invalid);
    }

    #[test]
    fn amount_rejects_non_finite() {
        assert_eq!(Amount::parse(Some("NaN")), Amount::Invalid);
        assert_eq!(Amount::parse(Some("inf")), Amount::Invalid);
        assert_eq!(Amount::parse(Some("-Infinity")), Amount::Invalid);
        assert_eq!(Amount::parse(Some("1e400")), Amount::Invalid);
    }

    #[test]
    fn amount_accepts_underscore_digit_groups() {
        assert_eq!(Amount::parse(Some("1_000_000")), Amount::Valid(1_000_000.0));
        assert_eq!(Amount::parse(Some("5_00_000.50")), Amount::Valid(500_000.5));
    }

    #[test]
    fn amount_rejects_stray_underscores() {
        for raw in ["_1000", "1000_", "1__000", "1_.5", "1e_6"] {
            assert_eq!(Amount::parse(Some(raw)), Amount::Invalid, "{raw}");
        }
    }
}
