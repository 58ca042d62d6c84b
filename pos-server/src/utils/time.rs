//! Business timezone helpers
//!
//! Date to timestamp conversion happens at the service edge; repositories
//! only see `i64` Unix millis and `[start, end)` windows.

use chrono::{NaiveDate, TimeZone, Timelike};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse `YYYY-MM-DD`
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}, expected YYYY-MM-DD")))
}

/// Today in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Local midnight of `date` as Unix millis
///
/// Falls back to UTC when local midnight does not exist (DST gap).
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Next day's local midnight, for `< end` comparisons
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Local hour (0-23) of a timestamp
pub fn local_hour(millis: i64, tz: Tz) -> Option<u32> {
    tz.timestamp_millis_opt(millis).single().map(|dt| dt.hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-04").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
        );
        assert!(parse_date("04/03/2025").is_err());
    }

    #[test]
    fn test_day_window_in_timezone() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let utc_start = day_start_millis(date, chrono_tz::UTC);
        assert_eq!(utc_start, 1_741_046_400_000);
        assert_eq!(day_end_millis(date, chrono_tz::UTC) - utc_start, 86_400_000);

        // Madrid is UTC+1 in March before DST
        let madrid = day_start_millis(date, chrono_tz::Europe::Madrid);
        assert_eq!(utc_start - madrid, 3_600_000);
    }

    #[test]
    fn test_local_hour() {
        // 2025-03-04 05:06:07 UTC
        let millis = 1_741_064_767_000;
        assert_eq!(local_hour(millis, chrono_tz::UTC), Some(5));
        assert_eq!(local_hour(millis, chrono_tz::Europe::Madrid), Some(6));
    }
}
