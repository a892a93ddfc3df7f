//! Per-screen snapshots and the logic that sits between the API and the
//! renderer.

pub mod alerts;
pub mod control;
pub mod history;
pub mod home;

use std::fmt;

use clap::ValueEnum;
use hidrosafe_core::{ApiError, MonitoringReading};

use crate::service::ApiService;

pub use alerts::{age_label, AlertCounts, AlertFilter};
pub use control::ControlPanel;
pub use history::sort_newest_first;
pub use home::HomeSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ScreenKind {
    Home,
    Monitoring,
    Alerts,
    Control,
    History,
}

impl ScreenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKind::Home => "home",
            ScreenKind::Monitoring => "monitoring",
            ScreenKind::Alerts => "alerts",
            ScreenKind::Control => "control",
            ScreenKind::History => "history",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub async fn load_monitoring(api: &ApiService) -> Result<MonitoringReading, ApiError> {
    api.fetch_monitoring_reading().await
}
