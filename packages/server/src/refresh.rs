//! Periodic re-ingest of the bulletin page.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use usf_covid_snapshot::{Snapshot, SnapshotStore};
use usf_covid_source::SourceError;
use usf_covid_source::bulletin::{IngestReport, fetch_case_table};
use usf_covid_source::source_def::SourceDefinition;

/// Environment variable overriding the refresh period, in seconds.
pub const REFRESH_INTERVAL_ENV: &str = "REFRESH_INTERVAL_SECS";

/// Default refresh period: one hour.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Reads [`REFRESH_INTERVAL_ENV`], falling back to the default for a
/// missing, unparseable or zero value.
#[must_use]
pub fn refresh_interval_secs() -> u64 {
    std::env::var(REFRESH_INTERVAL_ENV)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS)
}

/// Builds the snapshot for a successful ingest.
#[must_use]
pub fn snapshot_from_report(report: IngestReport) -> Snapshot {
    let unclassified = report.unclassified.len();
    let skipped = report.skipped_headings.len();

    Snapshot::new(report.table, Utc::now()).with_diagnostics(unclassified, skipped)
}

/// Fetches once and publishes on success.
///
/// # Errors
///
/// Returns the [`SourceError`] if the fetch failed. The store is left
/// unchanged in that case.
pub async fn refresh_once(def: &SourceDefinition, store: &SnapshotStore) -> Result<(), SourceError> {
    let report = fetch_case_table(def).await?;

    if report.table.is_empty() {
        log::warn!("{}: bulletin page produced no case rows", def.id);
    }

    store.publish(snapshot_from_report(report));
    Ok(())
}

/// Refreshes immediately, then every `period`, forever.
///
/// Failures are logged and the last published snapshot keeps being served.
pub async fn run(def: SourceDefinition, store: Arc<SnapshotStore>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if let Err(e) = refresh_once(&def, &store).await {
            if store.current().is_some() {
                log::error!("{}: refresh failed, keeping last snapshot: {e}", def.id);
            } else {
                log::error!("{}: refresh failed, no data to serve yet: {e}", def.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use usf_covid_case_models::{CaseRecord, CaseTable, Location, Occupation};
    use usf_covid_source::classify::UnclassifiedLine;
    use usf_covid_source::source_def::usf_source;

    use super::*;

    fn unreachable_source() -> SourceDefinition {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut def = usf_source().unwrap();
        def.url = format!("http://{addr}/");
        def.max_retries = 0;
        def.connect_timeout_secs = 2;
        def.timeout_secs = 5;
        def
    }

    #[actix_web::test]
    async fn failed_refresh_keeps_last_snapshot() {
        let store = SnapshotStore::new();
        store.publish(Snapshot::new(CaseTable::default(), Utc::now()));
        let before = store.current().unwrap();

        let err = refresh_once(&unreachable_source(), &store).await.unwrap_err();
        assert!(err.is_unavailable());

        let after = store.current().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[actix_web::test]
    async fn failed_first_refresh_publishes_nothing() {
        let store = SnapshotStore::new();
        assert!(refresh_once(&unreachable_source(), &store).await.is_err());
        assert!(store.current().is_none());
    }

    #[test]
    fn snapshot_carries_report_diagnostics() {
        let report = IngestReport {
            table: CaseTable::new(vec![CaseRecord::new(
                NaiveDate::from_ymd_opt(2020, 9, 14).unwrap(),
                Location::Tampa,
                Occupation::Student,
                3,
            )]),
            unclassified: vec![UnclassifiedLine {
                line: "two visitors".to_string(),
            }],
            skipped_headings: vec![],
        };

        let snapshot = snapshot_from_report(report);
        assert_eq!(snapshot.table.len(), 1);
        assert_eq!(snapshot.unclassified_lines, 1);
        assert_eq!(snapshot.skipped_headings, 0);
    }
}
