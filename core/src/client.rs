//! Stateless HTTP request builder and response parser for the HidroSafe API.
//!
//! # Design
//! `HidroClient` holds only a `base_url` (including the `/api` prefix) and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the actual HTTP
//! round trip, keeping the core deterministic and free of I/O.
//!
//! Fetch endpoints fail with `NotFound` / `HttpError` on non-2xx and with
//! `FetchRejected` on a `success: false` envelope. Command
//! endpoints (command, emergency stop, reset) always fail with
//! `CommandRejected`, carrying the server's `message` when the error body has
//! one.

use crate::envelope::{decode, ResponseShape};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::normalize_reading;
use crate::types::{
    Alert, ControlCommand, Envelope, HistoryEvent, MonitoringReading, RawMonitoringReading,
    SystemControls,
};

pub const MONITORING_PATH: &str = "/monitoramento/dados-atuais";
pub const ALERTS_PATH: &str = "/alertas";
pub const CONTROL_STATE_PATH: &str = "/controles/estado";
pub const COMMAND_PATH: &str = "/controles/comando";
pub const EMERGENCY_PATH: &str = "/controles/emergencia";
pub const RESET_PATH: &str = "/controles/reinicializar";
pub const HISTORY_PATH: &str = "/historico/eventos";

/// Synchronous, stateless client for the HidroSafe API.
#[derive(Debug, Clone)]
pub struct HidroClient {
    base_url: String,
}

impl HidroClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post_empty(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_monitoring_reading(&self) -> HttpRequest {
        self.get(MONITORING_PATH)
    }

    pub fn build_alerts(&self) -> HttpRequest {
        self.get(ALERTS_PATH)
    }

    pub fn build_control_state(&self) -> HttpRequest {
        self.get(CONTROL_STATE_PATH)
    }

    pub fn build_submit_command(&self, command: &ControlCommand) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(command).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{COMMAND_PATH}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_emergency_stop(&self) -> HttpRequest {
        self.post_empty(EMERGENCY_PATH)
    }

    pub fn build_reset_system(&self) -> HttpRequest {
        self.post_empty(RESET_PATH)
    }

    pub fn build_history(&self) -> HttpRequest {
        self.get(HISTORY_PATH)
    }

    /// Parse and normalize the current reading. The risk tier is recomputed
    /// from the rounded level.
    pub fn parse_monitoring_reading(&self, response: HttpResponse) -> Result<MonitoringReading, ApiError> {
        check_status(&response)?;
        let raw: RawMonitoringReading =
            decode(&response.body, ResponseShape::Bare, ApiError::FetchRejected)?;
        Ok(normalize_reading(raw))
    }

    pub fn parse_alerts(&self, response: HttpResponse) -> Result<Vec<Alert>, ApiError> {
        check_status(&response)?;
        decode(&response.body, ResponseShape::Bare, ApiError::FetchRejected)
    }

    pub fn parse_control_state(&self, response: HttpResponse) -> Result<SystemControls, ApiError> {
        check_status(&response)?;
        decode(&response.body, ResponseShape::Bare, ApiError::FetchRejected)
    }

    /// Returns whether the backend accepted the command.
    pub fn parse_submit_command(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_command_status(&response)?;
        decode(&response.body, ResponseShape::Either, ApiError::CommandRejected)
    }

    pub fn parse_emergency_stop(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_command_status(&response)?;
        parse_ack(&response.body)
    }

    pub fn parse_reset_system(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_command_status(&response)?;
        parse_ack(&response.body)
    }

    /// Events come back in whatever order the backend keeps them.
    pub fn parse_history(&self, response: HttpResponse) -> Result<Vec<HistoryEvent>, ApiError> {
        check_status(&response)?;
        decode(&response.body, ResponseShape::Either, ApiError::FetchRejected)
    }
}

/// Map non-2xx status codes on fetch endpoints to the appropriate variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Non-2xx on command endpoints: prefer the `message` of a JSON error body,
/// fall back to a generic status message.
fn check_command_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("server returned HTTP {}", response.status));
    Err(ApiError::CommandRejected(message))
}

/// `{ success, data }` acknowledgement. Only `success` is consumed.
fn parse_ack(body: &str) -> Result<bool, ApiError> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if envelope.success {
        Ok(true)
    } else {
        Err(ApiError::CommandRejected(
            envelope
                .message
                .unwrap_or_else(|| "server reported failure".to_string()),
        ))
    }
}
