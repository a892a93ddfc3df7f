//! Domain DTOs for the HidroSafe API.
//!
//! # Design
//! Types that the backend sends as-is (`Alert`, `SystemControls`,
//! `HistoryEvent`, `ControlCommand`) carry the wire's Portuguese field names
//! through `#[serde(rename)]`, so one definition serves both the client and
//! the mock server. The monitoring reading is the exception: the backend
//! shape (`RawMonitoringReading`) and the canonical client shape
//! (`MonitoringReading`) differ in names, precision and the risk tier, and
//! `normalize` converts between them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::risk::RiskLevel;

// ---------------------------------------------------------------------------
// Monitoring
// ---------------------------------------------------------------------------

/// Sensor snapshot as the backend sends it.
///
/// Unknown fields (a server-side `risco`, for instance) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMonitoringReading {
    #[serde(rename = "nivelAgua")]
    pub water_level: f64,
    #[serde(rename = "vazao")]
    pub flow: f64,
    #[serde(rename = "pressao")]
    pub pressure: f64,
    #[serde(rename = "localizacao")]
    pub location: String,
    #[serde(rename = "sensorId", default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub timestamp: String,
}

/// Canonical sensor snapshot: level in meters (2 decimals), flow and
/// pressure with 1 decimal, and a risk tier recomputed from the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringReading {
    pub level: f64,
    pub flow: f64,
    pub pressure: f64,
    pub risk: RiskLevel,
    pub location: String,
    pub sensor_id: String,
    pub timestamp: String,
    pub record_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertSeverity {
    #[serde(rename = "critico", alias = "critical")]
    Critical,
    #[serde(rename = "aviso", alias = "warning")]
    Warning,
    #[serde(rename = "info")]
    Info,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 3] = [
        AlertSeverity::Critical,
        AlertSeverity::Warning,
        AlertSeverity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
        }
    }

    /// Parses the English or the Portuguese tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "critical" | "critico" => Some(AlertSeverity::Critical),
            "warning" | "aviso" => Some(AlertSeverity::Warning),
            "info" => Some(AlertSeverity::Info),
            _ => None,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "tipo")]
    pub severity: AlertSeverity,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "resolvido", default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Actuator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemControls {
    #[serde(rename = "bombasDrenagem")]
    pub pumps_on: bool,
    #[serde(rename = "comportasAbertas")]
    pub gates_open: bool,
    #[serde(rename = "alertasAtivos")]
    pub alerts_active: bool,
}

impl SystemControls {
    /// Safe containment posture: pumps draining, gates closed, alerting on.
    pub const EMERGENCY: SystemControls = SystemControls {
        pumps_on: true,
        gates_open: false,
        alerts_active: true,
    };

    /// Configuration restored by a system reset.
    pub const DEFAULT: SystemControls = SystemControls {
        pumps_on: false,
        gates_open: true,
        alerts_active: true,
    };

    /// Apply one command. Returns `false` for targets that are not a single
    /// actuator (`Emergency`), which callers handle as a posture change.
    pub fn apply(&mut self, target: ControlTarget, value: bool) -> bool {
        match target {
            ControlTarget::Pumps => self.pumps_on = value,
            ControlTarget::Gates => self.gates_open = value,
            ControlTarget::Alerts => self.alerts_active = value,
            ControlTarget::Emergency => return false,
        }
        true
    }

    pub fn get(&self, target: ControlTarget) -> Option<bool> {
        match target {
            ControlTarget::Pumps => Some(self.pumps_on),
            ControlTarget::Gates => Some(self.gates_open),
            ControlTarget::Alerts => Some(self.alerts_active),
            ControlTarget::Emergency => None,
        }
    }
}

impl Default for SystemControls {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlTarget {
    #[serde(rename = "bombas", alias = "pumps")]
    Pumps,
    #[serde(rename = "comportas", alias = "gates")]
    Gates,
    #[serde(rename = "alertas", alias = "alerts")]
    Alerts,
    #[serde(rename = "emergencia", alias = "emergency")]
    Emergency,
}

impl ControlTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlTarget::Pumps => "pumps",
            ControlTarget::Gates => "gates",
            ControlTarget::Alerts => "alerts",
            ControlTarget::Emergency => "emergency",
        }
    }
}

impl fmt::Display for ControlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload for `POST /controles/comando`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCommand {
    #[serde(rename = "tipo")]
    pub target: ControlTarget,
    #[serde(rename = "valor")]
    pub value: bool,
}

impl ControlCommand {
    pub fn new(target: ControlTarget, value: bool) -> Self {
        Self { target, value }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "tipo")]
    pub category: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl HistoryEvent {
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// `{ success, data, message }` wrapper used by some endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Identifiers show up as JSON strings on some backends and as numbers on
/// others; both are kept as their string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}
