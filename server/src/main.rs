use std::{fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use local_ip_address::local_ip;
use love_map_data_management::{DataManager, DataManagerError, pin_store::PinFilter};
use love_map_lib::{location::Participant, pin::PinDraft};
use serde::Deserialize;
use server_state::ServerState;
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server_state;

#[tokio::main]
async fn main() {
    std::fs::create_dir_all("server/log").unwrap();
    let log_file = "server/log/server.log";

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .unwrap();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    let data_manager = DataManager::start().await.unwrap();

    let server_state = Arc::new(ServerState { data_manager });

    let app = Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .fallback_service(ServeFile::new("static/index.html"))
        .route("/pins", get(get_pins).post(add_pin))
        .route("/pins/export", get(export_pins))
        .route("/geocode/{query}", get(search_location))
        .route("/location/{who}", get(get_location).post(set_location))
        .route("/distance", get(get_distance))
        .with_state(server_state);

    let ip = local_ip().unwrap();
    let listener = tokio::net::TcpListener::bind(SocketAddr::from((ip, 8080)))
        .await
        .unwrap();
    tracing::info!("Listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

#[derive(Deserialize)]
struct PinsQuery {
    filter: Option<String>,
}

async fn get_pins(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PinsQuery>,
) -> Response {
    let filter = match query.filter.as_deref() {
        None => PinFilter::All,
        Some(raw) => match raw.parse::<PinFilter>() {
            Ok(filter) => filter,
            Err(_) => {
                return (StatusCode::BAD_REQUEST, format!("Unknown filter: {raw}"))
                    .into_response();
            }
        },
    };

    Json(state.data_manager.get_pins(filter).await).into_response()
}

async fn add_pin(State(state): State<Arc<ServerState>>, Json(draft): Json<PinDraft>) -> Response {
    match state.data_manager.add_pin(draft).await {
        Ok(pin) => (StatusCode::CREATED, Json(pin)).into_response(),
        Err(DataManagerError::Validation(message)) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        Err(err) => {
            tracing::error!("Failed to add pin: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn export_pins(State(state): State<Arc<ServerState>>) -> Response {
    match state.data_manager.export_pins().await {
        Ok(json) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"pins.json\"",
                ),
            ],
            json,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Failed to export pins: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn search_location(
    State(state): State<Arc<ServerState>>,
    Path(query): Path<String>,
) -> Response {
    match state.data_manager.search_location(&query).await {
        Ok(results) => Json(results).into_response(),
        Err(err) => {
            tracing::error!("Location search failed: {:?}", err);
            (StatusCode::BAD_GATEWAY, "Error searching").into_response()
        }
    }
}

async fn get_location(State(state): State<Arc<ServerState>>, Path(who): Path<String>) -> Response {
    let Ok(who) = who.parse::<Participant>() else {
        return (StatusCode::BAD_REQUEST, format!("Unknown participant: {who}")).into_response();
    };

    match state.data_manager.get_location(who).await {
        Some(location) => Json(location).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Deserialize)]
struct LocationUpdate {
    lat: f64,
    lng: f64,
}

async fn set_location(
    State(state): State<Arc<ServerState>>,
    Path(who): Path<String>,
    Json(update): Json<LocationUpdate>,
) -> Response {
    let Ok(who) = who.parse::<Participant>() else {
        return (StatusCode::BAD_REQUEST, format!("Unknown participant: {who}")).into_response();
    };

    match state
        .data_manager
        .set_location(who, update.lat, update.lng)
        .await
    {
        Ok(location) => Json(location).into_response(),
        Err(err) => {
            tracing::error!("Failed to save location for {}: {:?}", who.as_str(), err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_distance(State(state): State<Arc<ServerState>>) -> Response {
    match state.data_manager.distance_report().await {
        Some(report) => Json(report).into_response(),
        None => {
            let mut shared = None;
            for who in Participant::ALL {
                if state.data_manager.get_location(who).await.is_some() {
                    shared = Some(who);
                }
            }
            let message = match shared {
                Some(who) => format!(
                    "{}'s location saved! Waiting for {} to share theirs…",
                    who.display_name(),
                    who.other().display_name()
                ),
                None => "No locations shared yet".to_string(),
            };
            (StatusCode::NOT_FOUND, message).into_response()
        }
    }
}
