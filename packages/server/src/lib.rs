#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the USF COVID-19 dashboard.
//!
//! Every view is computed per request from the snapshot that is current
//! when the request arrives. A background task refetches the bulletin page
//! on an interval and publishes a new snapshot on success.

mod handlers;
pub mod refresh;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use usf_covid_snapshot::SnapshotStore;
use usf_covid_source::source_def;

/// Shared application state.
pub struct AppState {
    /// Latest published case table.
    pub store: Arc<SnapshotStore>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/cases", web::get().to(handlers::cases))
            .route("/cards", web::get().to(handlers::cards))
            .route("/graphs", web::get().to(handlers::graphs))
            .route("/campus/{campus}", web::get().to(handlers::campus))
            .route(
                "/campus/{campus}/forecast-input",
                web::get().to(handlers::forecast_input),
            ),
    );
}

/// Starts the dashboard API server and its refresh task.
///
/// Reads `BIND_ADDR` (default `127.0.0.1`), `PORT` (default `8080`) and
/// `REFRESH_INTERVAL_SECS`. This is a regular async function; the caller
/// provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the source definition is invalid,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let def = source_def::usf_source().map_err(std::io::Error::other)?;
    let store = Arc::new(SnapshotStore::new());
    let period = Duration::from_secs(refresh::refresh_interval_secs());

    log::info!(
        "Refreshing from {} every {}s",
        def.url,
        period.as_secs()
    );
    actix_rt::spawn(refresh::run(def, Arc::clone(&store), period));

    let state = web::Data::new(AppState { store });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
