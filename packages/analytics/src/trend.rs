//! Percent change of cumulative cases over a trailing window.
//!
//! The reference point is the cumulative count exactly `window_days`
//! calendar days before `today`. Bulletins are not published every day, so
//! when that date has no entry the window widens one day at a time until a
//! date with an entry is found. The search only looks inside the last
//! `window_days + 1` entries of the series and stops once it walks past the
//! earliest of them.

use chrono::{Days, NaiveDate};
use usf_covid_analytics_models::{TrendDirection, TrendResult};
use usf_covid_case_models::CaseTable;

use crate::AnalyticsError;
use crate::aggregate::{cumulative_aggregate, daily_aggregate};

/// Default trailing window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Computes the percent change in cumulative cases between the reference
/// date and the most recent entry.
///
/// # Errors
///
/// * [`AnalyticsError::EmptySeries`] if the table has no rows.
/// * [`AnalyticsError::NoReferencePoint`] if no entry in the trailing
///   window matches a candidate reference date.
/// * [`AnalyticsError::DivisionByZero`] if the reference count is zero.
#[allow(clippy::cast_precision_loss)]
pub fn percent_change(
    table: &CaseTable,
    window_days: u32,
    today: NaiveDate,
) -> Result<TrendResult, AnalyticsError> {
    let cumulative = cumulative_aggregate(&daily_aggregate(table));
    let tail_len = usize::try_from(window_days)
        .unwrap_or(usize::MAX)
        .saturating_add(1);
    let tail = &cumulative.points[cumulative.len().saturating_sub(tail_len)..];

    let most_recent = tail.last().ok_or(AnalyticsError::EmptySeries)?.cases;
    let earliest = tail
        .iter()
        .map(|p| p.date)
        .min()
        .ok_or(AnalyticsError::EmptySeries)?;

    let no_reference = || AnalyticsError::NoReferencePoint { window_days, today };

    let mut days = window_days;
    let reference = loop {
        let day_limit = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(no_reference)?;

        if let Some(point) = tail.iter().find(|p| p.date == day_limit) {
            break point.cases;
        }
        if day_limit <= earliest {
            return Err(no_reference());
        }

        log::debug!("no entry on {day_limit}, widening window to {} days", days + 1);
        days += 1;
    };

    if reference == 0 {
        return Err(AnalyticsError::DivisionByZero);
    }

    let change = (most_recent as f64 - reference as f64) / reference as f64;
    let (percent_change, direction) = if change < 0.0 {
        (-change, TrendDirection::Decrease)
    } else {
        (change, TrendDirection::Increase)
    };

    Ok(TrendResult {
        percent_change,
        direction,
        most_recent_cumulative: most_recent,
        reference_cumulative: reference,
        window_days: days,
    })
}

#[cfg(test)]
mod tests {
    use usf_covid_case_models::{CaseRecord, Location, Occupation};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 10, 1).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn table(rows: &[(u64, u64)]) -> CaseTable {
        rows.iter()
            .map(|&(ago, cases)| {
                CaseRecord::new(days_ago(ago), Location::Tampa, Occupation::Student, cases)
            })
            .collect()
    }

    #[test]
    fn increase_over_exact_window() {
        let trend = percent_change(&table(&[(20, 4), (14, 4), (7, 1), (0, 1)]), 14, today()).unwrap();
        assert_eq!(trend.reference_cumulative, 8);
        assert_eq!(trend.most_recent_cumulative, 10);
        assert_eq!(trend.direction, TrendDirection::Increase);
        assert_eq!(trend.window_days, 14);
        assert!((trend.percent_change - 0.25).abs() < 1e-12);
    }

    #[test]
    fn widens_window_when_exact_day_is_missing() {
        let trend = percent_change(&table(&[(15, 5), (3, 2), (0, 3)]), 14, today()).unwrap();
        assert_eq!(trend.window_days, 15);
        assert_eq!(trend.reference_cumulative, 5);
        assert_eq!(trend.most_recent_cumulative, 10);
        assert!((trend.percent_change - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_change_is_an_increase_of_zero() {
        let trend = percent_change(&table(&[(14, 3), (0, 0)]), 14, today()).unwrap();
        assert_eq!(trend.direction, TrendDirection::Increase);
        assert!(trend.percent_change.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_reference_is_division_by_zero() {
        let result = percent_change(&table(&[(14, 0), (0, 4)]), 14, today());
        assert_eq!(result, Err(AnalyticsError::DivisionByZero));
    }

    #[test]
    fn fails_when_no_reference_exists() {
        // Only entries newer than the window: nothing to compare against.
        let result = percent_change(&table(&[(5, 1), (0, 2)]), 14, today());
        assert_eq!(
            result,
            Err(AnalyticsError::NoReferencePoint {
                window_days: 14,
                today: today(),
            })
        );
    }

    #[test]
    fn reference_comes_from_the_tail() {
        // With a 2-day window the tail is the last three entries, so the
        // widening search lands on the entry 4 days ago, never 10.
        let trend = percent_change(&table(&[(10, 1), (4, 1), (1, 1), (0, 1)]), 2, today()).unwrap();
        assert_eq!(trend.window_days, 4);
        assert_eq!(trend.reference_cumulative, 2);
        assert_eq!(trend.most_recent_cumulative, 4);
        assert!((trend.percent_change - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_table_is_empty_series() {
        assert_eq!(
            percent_change(&CaseTable::default(), 14, today()),
            Err(AnalyticsError::EmptySeries)
        );
    }
}
