//! HTTP handler functions for the dashboard API.

use std::fmt::Display;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Serialize;
use usf_covid_analytics::forecast;
use usf_covid_case_models::Location;
use usf_covid_presentation::{table, views};
use usf_covid_server_models::{ApiError, ApiHealth, ApiSnapshotStatus};
use usf_covid_snapshot::Snapshot;

use crate::AppState;

fn unavailable(message: impl Display) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiError::new(message.to_string()))
}

fn current(state: &AppState) -> Result<Arc<Snapshot>, HttpResponse> {
    state
        .store
        .current()
        .ok_or_else(|| unavailable("No case data has been ingested yet"))
}

/// Computes a view from the current snapshot, answering `503` if there is
/// no snapshot or the view cannot be computed.
fn respond<T: Serialize, E: Display>(
    state: &AppState,
    view: &str,
    build: impl FnOnce(&Snapshot) -> Result<T, E>,
) -> HttpResponse {
    let snapshot = match current(state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    match build(&snapshot) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::error!("Failed to build {view}: {e}");
            unavailable(e)
        }
    }
}

fn parse_campus(slug: &str) -> Result<Location, HttpResponse> {
    Location::from_slug(slug)
        .ok_or_else(|| HttpResponse::NotFound().json(ApiError::new(format!("Unknown campus: {slug}"))))
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        snapshot: state
            .store
            .current()
            .map(|snapshot| ApiSnapshotStatus::from(snapshot.as_ref())),
    })
}

/// `GET /api/cases`
///
/// The full case table as data-table columns and rows.
pub async fn cases(state: web::Data<AppState>) -> HttpResponse {
    respond(&state, "case table", |snapshot| {
        table::to_table_rows(&snapshot.table)
    })
}

/// `GET /api/cards`
pub async fn cards(state: web::Data<AppState>) -> HttpResponse {
    respond(&state, "campus cards", |snapshot| {
        views::campus_cards(&snapshot.table)
    })
}

/// `GET /api/graphs`
pub async fn graphs(state: web::Data<AppState>) -> HttpResponse {
    respond(&state, "graphs", |snapshot| {
        Ok::<_, std::convert::Infallible>(views::general_graphs(&snapshot.table))
    })
}

/// `GET /api/campus/{campus}`
///
/// Campus tab bundle, with the trend measured back from today.
pub async fn campus(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let location = match parse_campus(&path) {
        Ok(location) => location,
        Err(response) => return response,
    };
    let today = Local::now().date_naive();

    respond(&state, "campus tab", |snapshot| {
        views::campus_tab(&snapshot.table, location, today)
    })
}

/// `GET /api/campus/{campus}/forecast-input`
///
/// Dense daily cumulative `{ds, y}` history for the forecasting model.
pub async fn forecast_input(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let location = match parse_campus(&path) {
        Ok(location) => location,
        Err(response) => return response,
    };

    respond(&state, "forecast input", |snapshot| {
        let history = forecast::forecast_input(&snapshot.table.filter(|r| r.location == location));
        if history.is_empty() {
            Err(format!("No case data for {location}"))
        } else {
            Ok(history)
        }
    })
}
