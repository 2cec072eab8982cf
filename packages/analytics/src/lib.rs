#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and trend statistics over case tables.
//!
//! Every function here is a pure function of a
//! [`usf_covid_case_models::CaseTable`] (plus filters, a window, or a
//! reference date) and returns the typed results from
//! [`usf_covid_analytics_models`].

pub mod aggregate;
pub mod forecast;
pub mod trend;

use chrono::NaiveDate;
use thiserror::Error;
use usf_covid_case_models::Occupation;

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// The reference cumulative count is zero.
    #[error("Reference cumulative count is zero; percent change is undefined")]
    DivisionByZero,

    /// No entry matched any candidate reference date.
    #[error("No reference point found within the series for a {window_days}-day window ending {today}")]
    NoReferencePoint {
        /// Requested window.
        window_days: u32,
        /// Date the window was measured back from.
        today: NaiveDate,
    },

    /// The table produced no data points.
    #[error("Series is empty")]
    EmptySeries,

    /// A required occupation has no rows.
    #[error("No {occupation} rows to average")]
    MissingOccupation {
        /// The missing occupation.
        occupation: Occupation,
    },
}
