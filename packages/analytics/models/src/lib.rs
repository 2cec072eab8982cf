#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for case-table aggregation.
//!
//! Everything here is derived from a [`usf_covid_case_models::CaseTable`]
//! and recomputed per query; none of it is stored on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use usf_covid_case_models::Occupation;

/// Whether a series holds per-day counts or running totals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SeriesKind {
    /// Cases reported on each date.
    Daily,
    /// Cases reported up to and including each date.
    Cumulative,
}

/// One (date, cases) pair in an [`AggregatedSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub cases: u64,
}

impl SeriesPoint {
    #[must_use]
    pub const fn new(date: NaiveDate, cases: u64) -> Self {
        Self { date, cases }
    }
}

/// A date-ordered sequence of case counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    /// Daily counts or running totals.
    pub kind: SeriesKind,
    /// Points in series order.
    pub points: Vec<SeriesPoint>,
}

impl AggregatedSeries {
    #[must_use]
    pub const fn new(kind: SeriesKind, points: Vec<SeriesPoint>) -> Self {
        Self { kind, points }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent point.
    #[must_use]
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// The case values alone, in series order.
    #[must_use]
    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.cases).collect()
    }
}

/// Direction of a [`TrendResult`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendDirection {
    Increase,
    Decrease,
}

/// Percent change of the cumulative case count over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    /// Magnitude of the change as a fraction (`0.25` = 25%), never negative.
    pub percent_change: f64,
    /// Whether the count went up or down.
    pub direction: TrendDirection,
    /// Cumulative count on the latest date.
    pub most_recent_cumulative: u64,
    /// Cumulative count on the reference date.
    pub reference_cumulative: u64,
    /// Window actually used, after widening past missing days.
    pub window_days: u32,
}

/// Mean daily cases per occupation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationAverages {
    pub employee: f64,
    pub student: f64,
}

/// Total cases for one occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationTotal {
    pub occupation: Occupation,
    pub cases: u64,
}

/// Five-number summary plus mean of a set of daily counts.
///
/// Quartiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

/// One observation handed to the forecasting model, using the model's
/// generic column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Date axis.
    pub ds: NaiveDate,
    /// Value axis (cumulative cases).
    pub y: u64,
}

/// One predicted value returned by the forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
}

/// One row of the persisted forecast table: one value column per location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ForecastRow {
    pub ds: NaiveDate,
    pub yhat_tampa: f64,
    pub yhat_st_pete: f64,
    pub yhat_health: f64,
}
