#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The currently served case table.
//!
//! A [`Snapshot`] is built completely before it is published and is never
//! mutated afterwards. Readers clone the [`Arc`] and keep computing from
//! the snapshot they got even if a newer one is published meanwhile.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usf_covid_case_models::CaseTable;

/// One successful ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Grouped case table.
    pub table: CaseTable,
    /// When the source page was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Bulletin lines no rule matched.
    pub unclassified_lines: usize,
    /// Headings whose date could not be parsed.
    pub skipped_headings: usize,
}

impl Snapshot {
    #[must_use]
    pub const fn new(table: CaseTable, fetched_at: DateTime<Utc>) -> Self {
        Self {
            table,
            fetched_at,
            unclassified_lines: 0,
            skipped_headings: 0,
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, unclassified_lines: usize, skipped_headings: usize) -> Self {
        self.unclassified_lines = unclassified_lines;
        self.skipped_headings = skipped_headings;
        self
    }
}

/// Holds the latest published [`Snapshot`], if any.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        log::info!(
            "Publishing snapshot with {} records fetched at {}",
            snapshot.table.len(),
            snapshot.fetched_at
        );
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    /// The latest published snapshot, or `None` before the first publish.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
