#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the USF COVID-19 dashboard server.
//!
//! View payloads are the presentation bundles themselves; the types here
//! cover what only the HTTP surface needs: health and error bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usf_covid_snapshot::Snapshot;

/// Summary of the snapshot currently being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnapshotStatus {
    /// When the source page was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Number of grouped case records.
    pub records: usize,
    /// Bulletin lines no rule matched.
    pub unclassified_lines: usize,
    /// Bulletin headings skipped for an unparseable date.
    pub skipped_headings: usize,
}

impl From<&Snapshot> for ApiSnapshotStatus {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            fetched_at: snapshot.fetched_at,
            records: snapshot.table.len(),
            unclassified_lines: snapshot.unclassified_lines,
            skipped_headings: snapshot.skipped_headings,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// `None` until the first successful ingest.
    pub snapshot: Option<ApiSnapshotStatus>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use usf_covid_case_models::CaseTable;

    use super::*;

    #[test]
    fn snapshot_status_serializes_camel_case() {
        let snapshot = Snapshot::new(
            CaseTable::default(),
            Utc.with_ymd_and_hms(2020, 9, 14, 12, 0, 0).unwrap(),
        )
        .with_diagnostics(2, 1);

        let json = serde_json::to_value(ApiSnapshotStatus::from(&snapshot)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fetchedAt": "2020-09-14T12:00:00Z",
                "records": 0,
                "unclassifiedLines": 2,
                "skippedHeadings": 1,
            })
        );
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_value(ApiError::new("No data yet")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "No data yet" }));
    }
}
