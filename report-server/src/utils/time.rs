//! Business-date helpers
//!
//! Reports are keyed by calendar day in `YYYY-MM-DD` form; every date
//! crossing the API boundary goes through these parsers.

use chrono::NaiveDate;

use crate::utils::AppError;

/// Parse a `YYYY-MM-DD` business date
pub fn parse_business_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Parse a business date and reject dates in the future
pub fn parse_not_future_date(date: &str) -> Result<NaiveDate, AppError> {
    let parsed = parse_business_date(date)?;
    let today = chrono::Utc::now().date_naive();
    if parsed > today {
        return Err(AppError::validation(format!(
            "Cannot file a report for a future date: {date}"
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_business_date("2024-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        assert!(parse_business_date("14-03-2024").is_err());
        assert!(parse_business_date("2024-13-01").is_err());
    }

    #[test]
    fn rejects_future_dates() {
        assert!(parse_not_future_date("2999-01-01").is_err());
        assert!(parse_not_future_date("2020-01-01").is_ok());
    }
}
