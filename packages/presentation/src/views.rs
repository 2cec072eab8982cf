//! Per-view bundles: everything one dashboard view displays, computed from
//! the current case table in one call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use usf_covid_analytics::aggregate::{
    cumulative_aggregate, daily_aggregate, daily_average_by_occupation, distribution,
    filter_by_location, filter_by_occupation, occupation_totals, total_cases,
};
use usf_covid_analytics::trend::{DEFAULT_WINDOW_DAYS, percent_change};
use usf_covid_analytics_models::{
    AggregatedSeries, DistributionSummary, OccupationAverages, OccupationTotal, TrendResult,
};
use usf_covid_case_models::{CaseTable, Location, Occupation};

use crate::PresentationError;
use crate::format::{
    format_average_comparison, format_case_count, format_daily_cases_string,
    format_trend_sentence,
};

/// Headline card for one campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusCard {
    pub location: Location,
    pub total_cases: u64,
    /// e.g. `"37 cases"`.
    pub total_text: String,
    /// e.g. `"3 cases (September 14 2020)"`.
    pub latest_daily: String,
}

/// Daily and cumulative series for one occupation on one campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationSeries {
    pub occupation: Occupation,
    pub daily: AggregatedSeries,
    pub cumulative: AggregatedSeries,
    /// `None` when the occupation has no rows on this campus.
    pub distribution: Option<DistributionSummary>,
}

/// Everything a campus tab shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusTab {
    pub location: Location,
    pub latest_daily: String,
    pub occupations: Vec<OccupationSeries>,
    pub occupation_totals: Vec<OccupationTotal>,
    pub averages: OccupationAverages,
    pub average_comparison: String,
    pub trend: TrendResult,
    pub trend_sentence: String,
}

/// Daily and cumulative series for one campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSeries {
    pub location: Location,
    pub daily: AggregatedSeries,
    pub cumulative: AggregatedSeries,
}

/// Series for the overview graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralGraphs {
    pub locations: Vec<LocationSeries>,
}

/// Builds one card per dashboard campus.
///
/// # Errors
///
/// Returns [`PresentationError::EmptySeries`] if a dashboard campus has no
/// rows.
pub fn campus_cards(table: &CaseTable) -> Result<Vec<CampusCard>, PresentationError> {
    filter_by_location(table, Location::DASHBOARD)
        .iter()
        .zip(Location::DASHBOARD)
        .map(|(location_table, &location)| -> Result<CampusCard, PresentationError> {
            let total = total_cases(location_table);
            Ok(CampusCard {
                location,
                total_cases: total,
                total_text: format_case_count(total),
                latest_daily: format_daily_cases_string(&daily_aggregate(location_table))?,
            })
        })
        .collect()
}

/// Builds the tab for one campus, measuring the trend back from `today`.
///
/// # Errors
///
/// * [`PresentationError::EmptySeries`] if the campus has no rows.
/// * [`PresentationError::DivisionByZero`] if the campus has a zero
///   employee average.
/// * [`PresentationError::Analytics`] if the trend or averages cannot be
///   computed.
pub fn campus_tab(
    table: &CaseTable,
    location: Location,
    today: NaiveDate,
) -> Result<CampusTab, PresentationError> {
    let location_table = table.filter(|r| r.location == location);
    if location_table.is_empty() {
        return Err(PresentationError::EmptySeries);
    }

    let occupations = filter_by_occupation(&location_table, Occupation::ALL)
        .iter()
        .zip(Occupation::ALL)
        .map(|(occupation_table, &occupation)| {
            let daily = daily_aggregate(occupation_table);
            OccupationSeries {
                occupation,
                cumulative: cumulative_aggregate(&daily),
                distribution: distribution(&daily),
                daily,
            }
        })
        .collect();

    let averages = daily_average_by_occupation(&location_table)?;
    let trend = percent_change(&location_table, DEFAULT_WINDOW_DAYS, today)?;

    log::debug!("built {location} tab with trend {trend:?}");

    Ok(CampusTab {
        location,
        latest_daily: format_daily_cases_string(&daily_aggregate(&location_table))?,
        occupations,
        occupation_totals: occupation_totals(&location_table),
        average_comparison: format_average_comparison(
            averages.employee,
            averages.student,
            location.campus_label(),
        )?,
        averages,
        trend_sentence: format_trend_sentence(&trend, location),
        trend,
    })
}

/// Builds daily and cumulative series for every dashboard campus.
#[must_use]
pub fn general_graphs(table: &CaseTable) -> GeneralGraphs {
    GeneralGraphs {
        locations: filter_by_location(table, Location::DASHBOARD)
            .iter()
            .zip(Location::DASHBOARD)
            .map(|(location_table, &location)| {
                let daily = daily_aggregate(location_table);
                LocationSeries {
                    location,
                    cumulative: cumulative_aggregate(&daily),
                    daily,
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use usf_covid_analytics::AnalyticsError;
    use usf_covid_analytics_models::TrendDirection;
    use usf_covid_case_models::CaseRecord;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, d).unwrap()
    }

    fn record(d: u32, location: Location, occupation: Occupation, cases: u64) -> CaseRecord {
        CaseRecord::new(day(d), location, occupation, cases)
    }

    fn sample() -> CaseTable {
        CaseTable::new(vec![
            record(1, Location::Tampa, Occupation::Student, 4),
            record(1, Location::Tampa, Occupation::Employee, 2),
            record(1, Location::StPete, Occupation::Student, 1),
            record(1, Location::Health, Occupation::Employee, 1),
            record(15, Location::Tampa, Occupation::Student, 2),
            record(15, Location::Tampa, Occupation::Employee, 2),
            record(15, Location::StPete, Occupation::Employee, 2),
        ])
    }

    #[test]
    fn cards_cover_dashboard_campuses() {
        let cards = campus_cards(&sample()).unwrap();
        assert_eq!(cards.len(), 3);

        assert_eq!(cards[0].location, Location::Tampa);
        assert_eq!(cards[0].total_cases, 10);
        assert_eq!(cards[0].total_text, "10 cases");
        assert_eq!(cards[0].latest_daily, "4 cases (September 15 2020)");

        assert_eq!(cards[2].location, Location::Health);
        assert_eq!(cards[2].total_text, "1 case");
        assert_eq!(cards[2].latest_daily, "1 case (September 1 2020)");
    }

    #[test]
    fn cards_fail_when_a_campus_has_no_rows() {
        let table = sample().filter(|r| r.location != Location::Health);
        assert_eq!(campus_cards(&table), Err(PresentationError::EmptySeries));
    }

    #[test]
    fn tampa_tab() {
        let tab = campus_tab(&sample(), Location::Tampa, day(15)).unwrap();

        assert_eq!(tab.latest_daily, "4 cases (September 15 2020)");
        assert_eq!(tab.occupations.len(), 2);
        assert_eq!(tab.occupations[0].occupation, Occupation::Student);
        assert_eq!(tab.occupations[0].daily.values(), vec![4, 2]);
        assert_eq!(tab.occupations[0].cumulative.values(), vec![4, 6]);
        assert_eq!(tab.occupation_totals[1].cases, 4);

        assert!((tab.averages.student - 3.0).abs() < f64::EPSILON);
        assert!((tab.averages.employee - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            tab.average_comparison,
            "On average per day, 1.5 times the number of students are tested positive compared to USF Tampa employees."
        );

        assert_eq!(tab.trend.direction, TrendDirection::Increase);
        assert_eq!(tab.trend.reference_cumulative, 6);
        assert_eq!(tab.trend.most_recent_cumulative, 10);
        assert_eq!(
            tab.trend_sentence,
            "The USF Tampa campus has seen a 66.67% increase in cases in the last two weeks. The number of cases went from 6 to 10."
        );
    }

    #[test]
    fn tab_without_student_rows_fails() {
        assert_eq!(
            campus_tab(&sample(), Location::Health, day(15)),
            Err(PresentationError::Analytics(
                AnalyticsError::MissingOccupation {
                    occupation: Occupation::Student,
                }
            ))
        );
    }

    #[test]
    fn tab_for_campus_without_rows_fails() {
        assert_eq!(
            campus_tab(&sample(), Location::SarasotaManatee, day(15)),
            Err(PresentationError::EmptySeries)
        );
    }

    #[test]
    fn graphs_have_both_series_per_campus() {
        let graphs = general_graphs(&sample());
        assert_eq!(graphs.locations.len(), 3);
        assert_eq!(graphs.locations[1].location, Location::StPete);
        assert_eq!(graphs.locations[1].daily.values(), vec![1, 2]);
        assert_eq!(graphs.locations[1].cumulative.values(), vec![1, 3]);
    }
}
