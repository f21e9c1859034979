//! Frequency - Maintenance Frequency Interpretation
//!
//! Maintenance frequencies are free text written by people or extracted from
//! manuals ("monthly", "every 6 months", "30 days", "every 12 hours").
//! Unknown or empty text falls back to one day.

use chrono::{Days, Months, NaiveDate};

/// A recurrence step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Recurrence {
    /// Advance `base` by one step; month arithmetic clamps to the last day of month
    pub fn advance(self, base: NaiveDate) -> NaiveDate {
        let next = match self {
            Recurrence::Days(n) => base.checked_add_days(Days::new(u64::from(n))),
            Recurrence::Weeks(n) => base.checked_add_days(Days::new(u64::from(n) * 7)),
            Recurrence::Months(n) => base.checked_add_months(Months::new(n)),
            Recurrence::Years(n) => base.checked_add_months(Months::new(n.saturating_mul(12))),
        };
        next.unwrap_or(base)
    }
}

const KEYWORDS: [(&[&str], Recurrence); 7] = [
    (&["daily", "every day"], Recurrence::Days(1)),
    (&["weekly", "every week"], Recurrence::Weeks(1)),
    (&["monthly", "every month"], Recurrence::Months(1)),
    (&["quarterly", "every 3 months"], Recurrence::Months(3)),
    (&["semi-annual", "semiannual", "every 6 months"], Recurrence::Months(6)),
    (&["bi-annual", "biannual", "every 2 years"], Recurrence::Years(2)),
    (&["annual", "yearly", "every year"], Recurrence::Years(1)),
];

/// Interpret a frequency description
pub fn parse_frequency(text: &str) -> Option<Recurrence> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    for (patterns, recurrence) in KEYWORDS {
        if patterns.iter().any(|p| normalized.contains(p)) {
            return Some(recurrence);
        }
    }

    parse_numeric(&normalized)
}

/// `"<n> <unit>"` anywhere in the text, e.g. "every 30 days", "2weeks", "every 48 hours"
fn parse_numeric(text: &str) -> Option<Recurrence> {
    let mut rest = text;
    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let tail = &rest[start..];
        let digits_len = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        let count: u32 = tail[..digits_len].parse().ok()?;
        let unit = tail[digits_len..].trim_start();

        let recurrence = if unit.starts_with("day") {
            Some(Recurrence::Days(count))
        } else if unit.starts_with("week") {
            Some(Recurrence::Weeks(count))
        } else if unit.starts_with("month") {
            Some(Recurrence::Months(count))
        } else if unit.starts_with("year") {
            Some(Recurrence::Years(count))
        } else if unit.starts_with("hour") {
            Some(Recurrence::Days((count / 24).max(1)))
        } else {
            None
        };

        if recurrence.is_some() {
            return recurrence;
        }
        rest = &tail[digits_len..];
    }
    None
}

/// Next due day after `base` for a frequency text (one day when unknown)
pub fn next_due_after(frequency: Option<&str>, base: NaiveDate) -> NaiveDate {
    match frequency.and_then(parse_frequency) {
        Some(recurrence) => recurrence.advance(base),
        None => {
            tracing::debug!(?frequency, "Unrecognised maintenance frequency, assuming daily");
            Recurrence::Days(1).advance(base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_frequency("Daily inspection"), Some(Recurrence::Days(1)));
        assert_eq!(parse_frequency("WEEKLY"), Some(Recurrence::Weeks(1)));
        assert_eq!(parse_frequency("Quarterly"), Some(Recurrence::Months(3)));
        assert_eq!(parse_frequency("semi-annual check"), Some(Recurrence::Months(6)));
        assert_eq!(parse_frequency("bi-annual"), Some(Recurrence::Years(2)));
        assert_eq!(parse_frequency("annually"), Some(Recurrence::Years(1)));
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(parse_frequency("every 30 days"), Some(Recurrence::Days(30)));
        assert_eq!(parse_frequency("2weeks"), Some(Recurrence::Weeks(2)));
        assert_eq!(parse_frequency("every 6 months"), Some(Recurrence::Months(6)));
        assert_eq!(parse_frequency("every 48 hours"), Some(Recurrence::Days(2)));
        assert_eq!(parse_frequency("every 12 hours"), Some(Recurrence::Days(1)));
        assert_eq!(parse_frequency("model 3000 inspection"), None);
    }

    #[test]
    fn test_unknown_defaults_to_one_day() {
        let base = day(2025, 3, 14);
        assert_eq!(next_due_after(Some("whenever"), base), day(2025, 3, 15));
        assert_eq!(next_due_after(None, base), day(2025, 3, 15));
    }

    #[test]
    fn test_month_end_clamps() {
        assert_eq!(Recurrence::Months(1).advance(day(2025, 1, 31)), day(2025, 2, 28));
        assert_eq!(Recurrence::Years(1).advance(day(2024, 2, 29)), day(2025, 2, 28));
    }
}
