//! Hand-off to and from the external forecasting model.
//!
//! The model wants a dense daily cumulative series with generic `ds`/`y`
//! column names and returns predicted `ds`/`yhat` pairs. Predictions for
//! each dashboard location are joined into one [`ForecastRow`] per date,
//! the shape the persisted forecast table uses.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use usf_covid_analytics_models::{
    AggregatedSeries, ForecastPoint, ForecastRow, PredictedPoint, SeriesPoint,
};
use usf_covid_case_models::{CaseTable, Location};

use crate::aggregate::{cumulative_aggregate, daily_aggregate, filter_by_location};

/// An external model that extrapolates a daily series into future dates.
pub trait Forecaster {
    /// Model failure type.
    type Error;

    /// Predicts future values from a dense daily history.
    ///
    /// # Errors
    ///
    /// Returns the model's error if prediction fails.
    fn predict(&self, history: &[ForecastPoint]) -> Result<Vec<PredictedPoint>, Self::Error>;
}

/// Reindexes a series onto every calendar day between its first and last
/// date, forward-filling missing days with the previous day's value.
///
/// Output is chronological. When the input repeats a date, the last value
/// for that date wins.
#[must_use]
pub fn reindex_for_forecast(series: &AggregatedSeries) -> AggregatedSeries {
    let by_date: BTreeMap<NaiveDate, u64> = series.points.iter().map(|p| (p.date, p.cases)).collect();

    let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
        return AggregatedSeries::new(series.kind, Vec::new());
    };

    let mut carried = 0;
    let points = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            if let Some(&cases) = by_date.get(&date) {
                carried = cases;
            }
            SeriesPoint::new(date, carried)
        })
        .collect();

    AggregatedSeries::new(series.kind, points)
}

/// Builds the dense cumulative `ds`/`y` history for one table.
#[must_use]
pub fn forecast_input(table: &CaseTable) -> Vec<ForecastPoint> {
    reindex_for_forecast(&cumulative_aggregate(&daily_aggregate(table)))
        .points
        .into_iter()
        .map(|p| ForecastPoint {
            ds: p.date,
            y: p.cases,
        })
        .collect()
}

/// Joins per-location predictions on `ds`, keeping only dates all three
/// locations predicted, in date order.
#[must_use]
pub fn merge_location_forecasts(
    tampa: &[PredictedPoint],
    st_pete: &[PredictedPoint],
    health: &[PredictedPoint],
) -> Vec<ForecastRow> {
    let index = |points: &[PredictedPoint]| -> BTreeMap<NaiveDate, f64> {
        points.iter().map(|p| (p.ds, p.yhat)).collect()
    };
    let st_pete = index(st_pete);
    let health = index(health);

    index(tampa)
        .into_iter()
        .filter_map(|(ds, yhat_tampa)| {
            Some(ForecastRow {
                ds,
                yhat_tampa,
                yhat_st_pete: *st_pete.get(&ds)?,
                yhat_health: *health.get(&ds)?,
            })
        })
        .collect()
}

/// Runs the forecaster for Tampa, St. Pete and Health and merges the
/// results into forecast-table rows.
///
/// # Errors
///
/// Returns the forecaster's error for the first location that fails.
pub fn forecast_locations<F: Forecaster>(
    table: &CaseTable,
    forecaster: &F,
) -> Result<Vec<ForecastRow>, F::Error> {
    let by_location = filter_by_location(table, &[Location::Tampa, Location::StPete, Location::Health]);

    let mut predictions = Vec::with_capacity(by_location.len());
    for location_table in &by_location {
        let history = forecast_input(location_table);
        log::debug!("forecasting from {} days of history", history.len());
        predictions.push(forecaster.predict(&history)?);
    }

    Ok(merge_location_forecasts(
        &predictions[0],
        &predictions[1],
        &predictions[2],
    ))
}
