//! Axum implementation of the HidroSafe backend contract, backed by the
//! core `MockBackend`.
//!
//! Response shapes follow the backend as observed in the field: readings,
//! alerts, control state and command results are bare JSON; emergency stop,
//! reset and history are wrapped in `{ success, data }`. A simulated command
//! failure answers 500 with `{ success: false, message }`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use hidrosafe_core::client::{
    ALERTS_PATH, COMMAND_PATH, CONTROL_STATE_PATH, EMERGENCY_PATH, HISTORY_PATH, MONITORING_PATH,
    RESET_PATH,
};
use hidrosafe_core::{
    Alert, ControlCommand, Envelope, HistoryEvent, MockBackend, RawMonitoringReading,
    SystemControls,
};
use log::{debug, info};
use tokio::net::TcpListener;

pub type Backend = Arc<MockBackend>;

/// Router over an injected backend (seeded or with a custom failure rate).
pub fn app_with(backend: MockBackend) -> Router {
    let api = Router::new()
        .route(MONITORING_PATH, get(current_reading))
        .route(ALERTS_PATH, get(list_alerts))
        .route(CONTROL_STATE_PATH, get(control_state))
        .route(COMMAND_PATH, post(submit_command))
        .route(EMERGENCY_PATH, post(emergency_stop))
        .route(RESET_PATH, post(reset_system))
        .route(HISTORY_PATH, get(history_events));
    Router::new().nest("/api", api).with_state(Arc::new(backend))
}

pub async fn run_with(listener: TcpListener, backend: MockBackend) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("mock backend serving http://{addr}/api (failure rate {})", backend.failure_rate());
    }
    axum::serve(listener, app_with(backend)).await
}

async fn current_reading(State(backend): State<Backend>) -> Json<RawMonitoringReading> {
    Json(backend.raw_reading())
}

async fn list_alerts(State(backend): State<Backend>) -> Json<Vec<Alert>> {
    Json(backend.alerts())
}

async fn control_state(State(backend): State<Backend>) -> Json<SystemControls> {
    Json(backend.control_state())
}

async fn submit_command(
    State(backend): State<Backend>,
    Json(command): Json<ControlCommand>,
) -> Result<Json<bool>, (StatusCode, Json<Envelope<()>>)> {
    debug!("command {} -> {}", command.target, command.value);
    backend.submit_command(command).map(Json).map_err(|e| {
        let message = match e {
            hidrosafe_core::ApiError::CommandRejected(msg) => msg,
            other => other.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::failure(message)))
    })
}

async fn emergency_stop(State(backend): State<Backend>) -> Json<Envelope<SystemControls>> {
    posture_response(backend.emergency_stop().map(|_| backend.control_state()))
}

async fn reset_system(State(backend): State<Backend>) -> Json<Envelope<SystemControls>> {
    posture_response(backend.reset_system().map(|_| backend.control_state()))
}

fn posture_response(
    result: Result<SystemControls, hidrosafe_core::ApiError>,
) -> Json<Envelope<SystemControls>> {
    Json(match result {
        Ok(controls) => Envelope::ok(controls),
        Err(e) => Envelope::failure(e.to_string()),
    })
}

async fn history_events(State(backend): State<Backend>) -> Json<Envelope<Vec<HistoryEvent>>> {
    Json(Envelope::ok(backend.history()))
}
