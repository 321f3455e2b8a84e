use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate};

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("empty date"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {trimmed}"))
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    // first of the month always exists
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{month_key, parse_date, previous_month};

    #[test]
    fn parses_iso_date() {
        let parsed = parse_date("2026-03-15").expect("parse date");
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date"));
    }

    #[test]
    fn rejects_non_iso_input() {
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn month_key_pads() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date");
        assert_eq!(month_key(date), "2026-03");
    }

    #[test]
    fn previous_month_crosses_year_boundary() {
        let january = NaiveDate::from_ymd_opt(2026, 1, 20).expect("valid date");
        assert_eq!(month_key(previous_month(january)), "2025-12");

        let july = NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date");
        assert_eq!(month_key(previous_month(july)), "2026-06");
    }
}
