use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::data::models::{ApiError, LogFilter, LogQuery};

/// Length of the log listing window when no start date is given.
pub const DEFAULT_LOG_WINDOW_DAYS: u64 = 7;

/// Fills in the default window (the seven days ending `today`) and checks the
/// bounds.
pub fn resolve_log_filter(query: LogQuery, today: NaiveDate) -> Result<LogFilter, ApiError> {
    let end_date = query.end_date.unwrap_or(today);
    let start_date = match query.start_date {
        Some(start) => start,
        None => end_date
            .checked_sub_days(Days::new(DEFAULT_LOG_WINDOW_DAYS - 1))
            .unwrap_or(NaiveDate::MIN),
    };
    if start_date > end_date {
        return Err(ApiError::InvalidInput(format!(
            "start_date {} is after end_date {}",
            start_date, end_date
        )));
    }
    if query.skip < 0 || query.limit < 0 {
        return Err(ApiError::InvalidInput(
            "skip and limit must not be negative".into(),
        ));
    }

    Ok(LogFilter {
        student_id: query.student_id.filter(|s| !s.is_empty()),
        start_date,
        end_date,
        skip: query.skip,
        limit: query.limit,
    })
}

/// Half-open timestamp range `[start 00:00, end + 1 day 00:00)` covering both
/// dates inclusively.
pub fn day_bounds(start: NaiveDate, end: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let lower = start.and_time(NaiveTime::MIN);
    let upper = end
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN);
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> LogQuery {
        LogQuery {
            student_id: Some(String::new()),
            start_date: start,
            end_date: end,
            skip: 0,
            limit: 20,
        }
    }

    #[test]
    fn default_window_is_seven_days_ending_today() {
        let filter = resolve_log_filter(query(None, None), date(6, 10)).unwrap();
        assert_eq!(filter.start_date, date(6, 4));
        assert_eq!(filter.end_date, date(6, 10));
        assert_eq!(filter.student_id, None);
    }

    #[test]
    fn start_defaults_relative_to_given_end() {
        let filter = resolve_log_filter(query(None, Some(date(3, 2))), date(6, 10)).unwrap();
        assert_eq!(filter.start_date, date(2, 24));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let result = resolve_log_filter(query(Some(date(6, 11)), Some(date(6, 10))), date(6, 10));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn bounds_cover_the_whole_end_day() {
        let (lower, upper) = day_bounds(date(6, 4), date(6, 10));
        assert_eq!(lower, date(6, 4).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(upper, date(6, 11).and_hms_opt(0, 0, 0).unwrap());
    }
}
