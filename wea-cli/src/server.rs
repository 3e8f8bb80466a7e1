//! HTTP front end: routes, request handling and server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wea_core::{ErrorKind, SummaryService};

/// Generic message returned for failures whose detail stays in the logs.
pub const ERR_INTERNAL: &str = "internal server error";

pub const ERR_NO_CITY_NAME: &str = "required parameter 'name' isn't provided";

#[derive(Clone)]
struct AppState {
    summaries: Arc<dyn SummaryService>,
    shutdown: CancellationToken,
}

/// JSON body of a successful `/city-information` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInformationResponse {
    pub description: String,
    pub weather_situation: String,
    pub temperature: f64,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    name: Option<String>,
}

pub fn router(summaries: Arc<dyn SummaryService>, shutdown: CancellationToken) -> Router {
    Router::new()
        .route("/city-information", get(city_information))
        .with_state(AppState {
            summaries,
            shutdown,
        })
}

async fn city_information(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Response {
    let Some(city_name) = query.name.filter(|name| !name.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NO_CITY_NAME);
    };

    // Dropping this future (client went away) cancels both provider lookups.
    let cancel = state.shutdown.child_token();
    let guard = cancel.clone().drop_guard();
    let result = state.summaries.fetch_summary(&cancel, &city_name).await;
    guard.disarm();

    match result {
        Ok(summary) => Json(CityInformationResponse {
            description: summary.location_description,
            weather_situation: summary.weather_description,
            temperature: summary.temperature_celsius,
        })
        .into_response(),
        Err(err) => match err.kind() {
            ErrorKind::NotFound => error_response(StatusCode::NOT_FOUND, &err.to_string()),
            ErrorKind::Canceled => {
                // Nobody is waiting for a body; a disconnected client never receives this.
                tracing::debug!(city_name = %city_name, "request abandoned");
                StatusCode::SERVICE_UNAVAILABLE.into_response()
            }
            ErrorKind::Other => {
                let provider = err.provider();
                let err = anyhow::Error::from(err);
                tracing::error!(
                    city_name = %city_name,
                    %provider,
                    error = ?err,
                    "get city description with weather"
                );
                error_response(StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL)
            }
        },
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Serve until `shutdown` is cancelled; in-flight lookups are cancelled too.
pub async fn run(
    addr: &str,
    summaries: Arc<dyn SummaryService>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!(host = %local, "running");

    let app = router(summaries, shutdown.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}
