//! Filtering and group-by aggregation.

use std::collections::HashMap;

use chrono::NaiveDate;
use usf_covid_analytics_models::{
    AggregatedSeries, DistributionSummary, OccupationAverages, OccupationTotal, SeriesKind,
    SeriesPoint,
};
use usf_covid_case_models::{CaseTable, Location, Occupation};

use crate::AnalyticsError;

/// Splits a table into one table per location, preserving row order.
#[must_use]
pub fn filter_by_location(table: &CaseTable, locations: &[Location]) -> Vec<CaseTable> {
    locations
        .iter()
        .map(|location| table.filter(|r| r.location == *location))
        .collect()
}

/// Splits a table into one table per occupation, preserving row order.
#[must_use]
pub fn filter_by_occupation(table: &CaseTable, occupations: &[Occupation]) -> Vec<CaseTable> {
    occupations
        .iter()
        .map(|occupation| table.filter(|r| r.occupation == *occupation))
        .collect()
}

/// Sums cases per date.
///
/// Dates appear in the order they are first seen in the table; the output
/// is not re-sorted.
#[must_use]
pub fn daily_aggregate(table: &CaseTable) -> AggregatedSeries {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut points: Vec<SeriesPoint> = Vec::new();

    for record in table {
        if let Some(&i) = index.get(&record.date) {
            points[i].cases += record.cases;
        } else {
            index.insert(record.date, points.len());
            points.push(SeriesPoint::new(record.date, record.cases));
        }
    }

    AggregatedSeries::new(SeriesKind::Daily, points)
}

/// Running sum of a daily series, in series order.
#[must_use]
pub fn cumulative_aggregate(series: &AggregatedSeries) -> AggregatedSeries {
    if series.kind == SeriesKind::Cumulative {
        log::debug!("cumulative_aggregate called on an already cumulative series");
    }

    let points = series
        .points
        .iter()
        .scan(0u64, |running, point| {
            *running += point.cases;
            Some(SeriesPoint::new(point.date, *running))
        })
        .collect();

    AggregatedSeries::new(SeriesKind::Cumulative, points)
}

/// Total cases in the table.
#[must_use]
pub fn total_cases(table: &CaseTable) -> u64 {
    table.iter().map(|r| r.cases).sum()
}

/// Total cases per occupation, students first.
#[must_use]
pub fn occupation_totals(table: &CaseTable) -> Vec<OccupationTotal> {
    Occupation::ALL
        .iter()
        .map(|&occupation| OccupationTotal {
            occupation,
            cases: table
                .iter()
                .filter(|r| r.occupation == occupation)
                .map(|r| r.cases)
                .sum(),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean_cases(table: &CaseTable, occupation: Occupation) -> Result<f64, AnalyticsError> {
    let counts: Vec<u64> = table
        .iter()
        .filter(|r| r.occupation == occupation)
        .map(|r| r.cases)
        .collect();

    if counts.is_empty() {
        return Err(AnalyticsError::MissingOccupation { occupation });
    }

    Ok(counts.iter().sum::<u64>() as f64 / counts.len() as f64)
}

/// Mean cases per row for each occupation.
///
/// Intended for a single-location table, where each row is one day's count
/// for one occupation. Occupations are looked up by name, so row order does
/// not matter.
///
/// # Errors
///
/// Returns [`AnalyticsError::MissingOccupation`] if either occupation has
/// no rows.
pub fn daily_average_by_occupation(table: &CaseTable) -> Result<OccupationAverages, AnalyticsError> {
    Ok(OccupationAverages {
        employee: mean_cases(table, Occupation::Employee)?,
        student: mean_cases(table, Occupation::Student)?,
    })
}

#[allow(clippy::cast_precision_loss)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = rank - rank.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Box-plot statistics of a series' values.
///
/// Returns `None` for an empty series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distribution(series: &AggregatedSeries) -> Option<DistributionSummary> {
    if series.is_empty() {
        return None;
    }

    let mut values: Vec<f64> = series.points.iter().map(|p| p.cases as f64).collect();
    values.sort_by(f64::total_cmp);

    Some(DistributionSummary {
        min: values[0],
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max: values[values.len() - 1],
        mean: values.iter().sum::<f64>() / values.len() as f64,
    })
}
