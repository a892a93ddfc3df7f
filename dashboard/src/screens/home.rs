use hidrosafe_core::{Alert, AlertSeverity, ApiError, MonitoringReading, SystemControls};

use crate::service::ApiService;

/// Everything the home screen shows at once.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSnapshot {
    pub reading: MonitoringReading,
    pub alerts: Vec<Alert>,
    pub controls: SystemControls,
}

impl HomeSnapshot {
    pub fn critical_alerts(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count()
    }
}

/// The three fetches run concurrently; the first failure fails the snapshot.
pub async fn load_home(api: &ApiService) -> Result<HomeSnapshot, ApiError> {
    let (reading, alerts, controls) = tokio::try_join!(
        api.fetch_monitoring_reading(),
        api.fetch_alerts(),
        api.fetch_control_state(),
    )?;
    Ok(HomeSnapshot {
        reading,
        alerts,
        controls,
    })
}
