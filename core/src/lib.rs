//! Client core for the HidroSafe flood-monitoring API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round trip, so every mapping rule here (field renames,
//! rounding, risk recomputation, envelope handling, error classification) is
//! testable without a server.
//!
//! # Design
//! - `HidroClient` is stateless; it holds only the API base URL.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response).
//! - `MonitoringReading::risk` is always recomputed from the rounded level.
//! - The `mock` feature (on by default) adds `MockBackend`, the synthetic
//!   data source shared by the dashboard's mock mode and the mock server.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod normalize;
pub mod risk;
pub mod types;

pub use client::HidroClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "mock")]
pub use mock::{ControlStore, MockBackend};
pub use risk::RiskLevel;
pub use types::{
    Alert, AlertSeverity, ControlCommand, ControlTarget, Envelope, HistoryEvent, MonitoringReading,
    RawMonitoringReading, SystemControls,
};
