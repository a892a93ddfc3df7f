//! Backend-to-canonical mapping for monitoring readings.

use crate::risk::RiskLevel;
use crate::types::{MonitoringReading, RawMonitoringReading};

/// Decimal places kept for the river level.
pub const LEVEL_DECIMALS: i32 = 2;
/// Decimal places kept for flow and pressure.
pub const FLOW_DECIMALS: i32 = 1;

/// Sensor identifier used when the backend does not send one.
pub const UNKNOWN_SENSOR: &str = "unknown";

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rename, round and re-derive the risk tier of a raw reading.
pub fn normalize_reading(raw: RawMonitoringReading) -> MonitoringReading {
    let level = round_to(raw.water_level, LEVEL_DECIMALS);
    MonitoringReading {
        level,
        flow: round_to(raw.flow, FLOW_DECIMALS),
        pressure: round_to(raw.pressure, FLOW_DECIMALS),
        risk: RiskLevel::from_level(level),
        location: raw.location,
        sensor_id: raw
            .sensor_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SENSOR.to_string()),
        timestamp: raw.timestamp,
        record_id: raw.id,
    }
}
