#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns aggregates into what the dashboard displays.
//!
//! [`format`] builds the card and sentence strings, [`table`] flattens a
//! case table into data-table columns and rows, and [`views`] bundles
//! everything one dashboard view needs into a single serializable value.

pub mod format;
pub mod table;
pub mod views;

use usf_covid_analytics::AnalyticsError;

/// Errors that can occur while building display values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// There is no entry to display.
    #[error("Series is empty")]
    EmptySeries,

    /// A ratio's denominator is zero.
    #[error("Cannot compare against a zero average")]
    DivisionByZero,

    /// A record could not be turned into a table row.
    #[error("Failed to serialize row: {message}")]
    Serialization {
        /// Serializer error.
        message: String,
    },

    /// An underlying aggregation failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
