//! The API client the screens talk to.
//!
//! # Design
//! `ApiService` exposes one async operation per resource and hides whether
//! the answer comes from the synthetic `MockBackend` or from a real HTTP
//! round trip. It is cheap to clone (an `Arc` or a pooled reqwest client),
//! so every mounted screen keeps its own handle and nothing is cached
//! between calls.

use std::sync::Arc;
use std::time::Duration;

use hidrosafe_core::{
    Alert, ApiError, ControlCommand, ControlStore, HistoryEvent, MockBackend, MonitoringReading,
    SystemControls,
};
use log::{info, warn};

use crate::config::ApiConfig;
use crate::transport::HttpTransport;

#[derive(Debug, Clone)]
enum Backend {
    Mock(Arc<MockBackend>),
    Http(HttpTransport),
}

#[derive(Debug, Clone)]
pub struct ApiService {
    backend: Backend,
}

impl ApiService {
    pub fn mock(backend: MockBackend) -> Self {
        Self {
            backend: Backend::Mock(Arc::new(backend)),
        }
    }

    pub fn http(transport: HttpTransport) -> Self {
        Self {
            backend: Backend::Http(transport),
        }
    }

    /// Build the service selected by `use_mock`. The mock store is created
    /// here, once per application instance.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.use_mock {
            info!("using mock data source (failure rate {})", config.mock_failure_rate);
            let backend =
                MockBackend::new(ControlStore::default()).with_failure_rate(config.mock_failure_rate);
            return Ok(Self::mock(backend));
        }
        info!("using HTTP backend at {}", config.base_url);
        let timeout = match config.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self::http(HttpTransport::new(&config.base_url, timeout)?))
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock(_))
    }

    pub async fn fetch_monitoring_reading(&self) -> Result<MonitoringReading, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => Ok(mock.monitoring_reading()),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_monitoring_reading()).await?;
                t.client().parse_monitoring_reading(response)
            }
        }
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => Ok(mock.alerts()),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_alerts()).await?;
                t.client().parse_alerts(response)
            }
        }
    }

    pub async fn fetch_control_state(&self) -> Result<SystemControls, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => Ok(mock.control_state()),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_control_state()).await?;
                t.client().parse_control_state(response)
            }
        }
    }

    pub async fn submit_control_command(&self, command: ControlCommand) -> Result<bool, ApiError> {
        let result = match &self.backend {
            Backend::Mock(mock) => mock.submit_command(command),
            Backend::Http(t) => submit_over_http(t, command).await,
        };
        if let Err(e) = &result {
            warn!("{} command failed: {e}", command.target);
        }
        result
    }

    pub async fn trigger_emergency_stop(&self) -> Result<bool, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => mock.emergency_stop(),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_emergency_stop()).await?;
                t.client().parse_emergency_stop(response)
            }
        }
    }

    pub async fn reset_system(&self) -> Result<bool, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => mock.reset_system(),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_reset_system()).await?;
                t.client().parse_reset_system(response)
            }
        }
    }

    /// Unordered; sorting belongs to the history screen.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEvent>, ApiError> {
        match &self.backend {
            Backend::Mock(mock) => Ok(mock.history()),
            Backend::Http(t) => {
                let response = t.execute(t.client().build_history()).await?;
                t.client().parse_history(response)
            }
        }
    }
}

async fn submit_over_http(t: &HttpTransport, command: ControlCommand) -> Result<bool, ApiError> {
    let request = t.client().build_submit_command(&command)?;
    let response = t.execute(request).await?;
    t.client().parse_submit_command(response)
}
