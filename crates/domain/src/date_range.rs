use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use logreport_core::{AppError, AppResult};

/// Number of days the default search window reaches back.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 7;

/// Optional, inclusive alteration-date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl DateRangeFilter {
    /// Creates a filter, rejecting inverted ranges.
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> AppResult<Self> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(AppError::Validation(format!(
                "end date {end} must not precede start date {start}"
            )));
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Filter without any bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The search form default: the last week up to and including `today`.
    #[must_use]
    pub fn last_week(today: NaiveDate) -> Self {
        Self {
            start_date: today.checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS)),
            end_date: Some(today),
        }
    }

    /// Parses form input in `YYYY-MM-DD` form. Blank values mean "no bound".
    pub fn parse(start_date: Option<&str>, end_date: Option<&str>) -> AppResult<Self> {
        Self::new(
            parse_form_date("start_date", start_date)?,
            parse_form_date("end_date", end_date)?,
        )
    }

    /// Returns the first included day.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the last included day.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Lower timestamp bound, midnight of the start date.
    #[must_use]
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.start_date.map(|date| date.and_time(NaiveTime::MIN))
    }

    /// Upper timestamp bound, 23:59:59 of the end date.
    #[must_use]
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.end_date.and_then(|date| date.and_hms_opt(23, 59, 59))
    }

    /// Returns true when neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

fn parse_form_date(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|error| {
            AppError::Validation(format!(
                "{field} must be a YYYY-MM-DD date, got '{value}': {error}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use logreport_core::AppError;

    use super::DateRangeFilter;

    fn date(value: &str) -> NaiveDate {
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(error) => panic!("invalid test date {value}: {error}"),
        }
    }

    #[test]
    fn bounds_cover_whole_days() {
        let filter = DateRangeFilter::parse(Some("2024-01-01"), Some("2024-01-31"));
        let Ok(filter) = filter else {
            panic!("range should parse");
        };

        assert_eq!(
            filter.lower_bound().map(|value| value.to_string()),
            Some("2024-01-01 00:00:00".to_owned())
        );
        assert_eq!(
            filter.upper_bound().map(|value| value.to_string()),
            Some("2024-01-31 23:59:59".to_owned())
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let result = DateRangeFilter::parse(Some("2024-02-01"), Some("2024-01-31"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn single_day_range_is_allowed() {
        let result = DateRangeFilter::parse(Some("2024-02-01"), Some("2024-02-01"));
        assert!(result.is_ok());
    }

    #[test]
    fn blank_values_drop_the_bound() {
        let result = DateRangeFilter::parse(Some(""), Some("  "));
        assert!(result.is_ok_and(|filter| filter.is_unbounded()));
    }

    #[test]
    fn malformed_dates_are_validation_errors() {
        for value in ["2024/01/01", "01-02-2024", "2024-13-01", "yesterday"] {
            let result = DateRangeFilter::parse(Some(value), None);
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected rejection for {value}"
            );
        }
    }

    #[test]
    fn last_week_reaches_back_seven_days() {
        let filter = DateRangeFilter::last_week(date("2024-03-05"));
        assert_eq!(filter.start_date(), Some(date("2024-02-27")));
        assert_eq!(filter.end_date(), Some(date("2024-03-05")));
    }
}
