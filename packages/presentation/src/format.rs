//! Card and sentence formatting.

use usf_covid_analytics_models::{AggregatedSeries, TrendResult};
use usf_covid_case_models::Location;

use crate::PresentationError;

/// Date format used on cards (e.g. `September 14 2020`).
pub const CARD_DATE_FORMAT: &str = "%B %-d %Y";

/// `"1 case"`, `"2 cases"`, `"0 cases"`.
#[must_use]
pub fn format_case_count(n: u64) -> String {
    if n == 1 {
        "1 case".to_string()
    } else {
        format!("{n} cases")
    }
}

/// Formats the latest entry of a daily series as `"3 cases (September 14 2020)"`.
///
/// # Errors
///
/// Returns [`PresentationError::EmptySeries`] if the series has no entries.
pub fn format_daily_cases_string(series: &AggregatedSeries) -> Result<String, PresentationError> {
    let last = series.last().ok_or(PresentationError::EmptySeries)?;
    Ok(format!(
        "{} ({})",
        format_case_count(last.cases),
        last.date.format(CARD_DATE_FORMAT)
    ))
}

/// Rounds to `digits` significant figures, dropping trailing zeros.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    let rounded = (value * factor).round() / factor;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = format!("{rounded:.decimals$}");

    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Compares average daily student cases to employee cases on a campus.
///
/// # Errors
///
/// Returns [`PresentationError::DivisionByZero`] if `employee_avg` is zero.
pub fn format_average_comparison(
    employee_avg: f64,
    student_avg: f64,
    campus: &str,
) -> Result<String, PresentationError> {
    if employee_avg == 0.0 {
        return Err(PresentationError::DivisionByZero);
    }

    let ratio = student_avg / employee_avg;

    if (ratio - 1.0).abs() < f64::EPSILON {
        Ok(format!(
            "On average per day, the same number of students are tested positive as USF {campus} employees."
        ))
    } else {
        Ok(format!(
            "On average per day, {} times the number of students are tested positive compared to USF {campus} employees.",
            round_significant(ratio, 2)
        ))
    }
}

/// Describes a trend for a campus tab, e.g. "The USF Tampa campus has seen
/// a 12.50% increase in cases in the last two weeks. ..."
#[must_use]
pub fn format_trend_sentence(trend: &TrendResult, location: Location) -> String {
    let subject = match location {
        Location::Health => "USF Health".to_string(),
        other => format!("The USF {other} campus"),
    };
    let period = if trend.window_days == 14 {
        "the last two weeks".to_string()
    } else {
        format!("the last {} days", trend.window_days)
    };

    format!(
        "{subject} has seen a {:.2}% {} in cases in {period}. The number of cases went from {} to {}.",
        trend.percent_change * 100.0,
        trend.direction,
        trend.reference_cumulative,
        trend.most_recent_cumulative,
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use usf_covid_analytics_models::{SeriesKind, SeriesPoint, TrendDirection};

    use super::*;

    fn series(cases: u64) -> AggregatedSeries {
        AggregatedSeries::new(
            SeriesKind::Daily,
            vec![
                SeriesPoint::new(NaiveDate::from_ymd_opt(2020, 9, 3).unwrap(), 9),
                SeriesPoint::new(NaiveDate::from_ymd_opt(2020, 9, 14).unwrap(), cases),
            ],
        )
    }

    #[test]
    fn pluralizes_case_counts() {
        assert_eq!(format_case_count(0), "0 cases");
        assert_eq!(format_case_count(1), "1 case");
        assert_eq!(format_case_count(2), "2 cases");
    }

    #[test]
    fn daily_string_uses_last_entry() {
        assert_eq!(
            format_daily_cases_string(&series(1)).unwrap(),
            "1 case (September 14 2020)"
        );
        assert_eq!(
            format_daily_cases_string(&series(2)).unwrap(),
            "2 cases (September 14 2020)"
        );
    }

    #[test]
    fn daily_string_of_empty_series_fails() {
        let empty = AggregatedSeries::new(SeriesKind::Daily, vec![]);
        assert_eq!(
            format_daily_cases_string(&empty),
            Err(PresentationError::EmptySeries)
        );
    }

    #[test]
    fn rounds_to_two_significant_figures() {
        assert_eq!(round_significant(1.5, 2), "1.5");
        assert_eq!(round_significant(2.333, 2), "2.3");
        assert_eq!(round_significant(2.0, 2), "2");
        assert_eq!(round_significant(0.4, 2), "0.4");
        assert_eq!(round_significant(0.123, 2), "0.12");
        assert_eq!(round_significant(123.0, 2), "120");
    }

    #[test]
    fn average_comparison_sentences() {
        assert_eq!(
            format_average_comparison(2.0, 3.0, "Tampa").unwrap(),
            "On average per day, 1.5 times the number of students are tested positive compared to USF Tampa employees."
        );
        assert_eq!(
            format_average_comparison(2.0, 2.0, "St Pete").unwrap(),
            "On average per day, the same number of students are tested positive as USF St Pete employees."
        );
        assert_eq!(
            format_average_comparison(0.0, 2.0, "Health"),
            Err(PresentationError::DivisionByZero)
        );
    }

    #[test]
    fn trend_sentences() {
        let trend = TrendResult {
            percent_change: 0.125,
            direction: TrendDirection::Increase,
            most_recent_cumulative: 9,
            reference_cumulative: 8,
            window_days: 14,
        };
        assert_eq!(
            format_trend_sentence(&trend, Location::Tampa),
            "The USF Tampa campus has seen a 12.50% increase in cases in the last two weeks. The number of cases went from 8 to 9."
        );

        let widened = TrendResult {
            direction: TrendDirection::Decrease,
            window_days: 16,
            ..trend
        };
        assert_eq!(
            format_trend_sentence(&widened, Location::Health),
            "USF Health has seen a 12.50% decrease in cases in the last 16 days. The number of cases went from 8 to 9."
        );
    }
}
