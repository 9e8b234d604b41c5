//! Validation and date helpers shared by callers of the repositories.
//!
//! Validation runs before anything reaches the store; the store itself
//! only enforces the NOT NULL columns.

use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

use crate::models::ApplicationStatus;

/// Calendar-date format used everywhere dates cross a text boundary.
pub const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Company is required")]
    MissingCompany,
    #[error("Role is required")]
    MissingRole,
}

/// Parse a calendar date; empty or unparseable input is None.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// Reject a draft whose required fields are blank after trimming.
pub fn validate_required(company: &str, role: &str) -> Result<(), ValidationError> {
    if company.trim().is_empty() {
        return Err(ValidationError::MissingCompany);
    }
    if role.trim().is_empty() {
        return Err(ValidationError::MissingRole);
    }
    Ok(())
}

/// Suggested follow-up date: applied date plus a number of calendar days.
pub fn default_followup(applied: NaiveDate, days: i64) -> NaiveDate {
    applied + Duration::days(days)
}

/// Whether a due date has passed. Terminal statuses are never overdue;
/// a missing or unparseable date is not overdue either.
pub fn compute_overdue(due_date: Option<&str>, status: &ApplicationStatus) -> bool {
    if status.is_terminal() {
        return false;
    }
    match due_date.and_then(|s| parse_date(s)) {
        Some(d) => d < Local::now().date_naive(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_handles_blank_and_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(
            parse_date(" 2024-03-01 "),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn format_parse_round_trip() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_date(&format_date(d)), Some(d));
    }

    #[test]
    fn validate_required_trims_whitespace() {
        assert_eq!(validate_required("Acme", "Engineer"), Ok(()));
        assert_eq!(
            validate_required("   ", "Engineer"),
            Err(ValidationError::MissingCompany)
        );
        assert_eq!(
            validate_required("Acme", ""),
            Err(ValidationError::MissingRole)
        );
    }

    #[test]
    fn default_followup_adds_calendar_days() {
        let applied = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        assert_eq!(
            default_followup(applied, 7),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn overdue_false_for_terminal_status_with_past_date() {
        assert!(!compute_overdue(
            Some("2000-01-01"),
            &ApplicationStatus::Rejected
        ));
        assert!(!compute_overdue(
            Some("2000-01-01"),
            &ApplicationStatus::Withdrawn
        ));
    }

    #[test]
    fn overdue_true_for_yesterday() {
        let yesterday = Local::now().date_naive() - Duration::days(1);
        assert!(compute_overdue(
            Some(&format_date(yesterday)),
            &ApplicationStatus::Applied
        ));
    }

    #[test]
    fn overdue_false_for_today_and_future() {
        let today = Local::now().date_naive();
        assert!(!compute_overdue(
            Some(&format_date(today)),
            &ApplicationStatus::Applied
        ));
        let tomorrow = today + Duration::days(1);
        assert!(!compute_overdue(
            Some(&format_date(tomorrow)),
            &ApplicationStatus::Applied
        ));
    }

    #[test]
    fn overdue_false_for_missing_or_invalid_date() {
        assert!(!compute_overdue(None, &ApplicationStatus::Applied));
        assert!(!compute_overdue(Some(""), &ApplicationStatus::Applied));
        assert!(!compute_overdue(Some("soonish"), &ApplicationStatus::Applied));
    }
}
