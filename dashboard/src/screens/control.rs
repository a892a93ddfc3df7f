//! Operator control panel with optimistic updates.

use hidrosafe_core::{ApiError, ControlCommand, ControlTarget, SystemControls};
use log::{info, warn};

use crate::service::ApiService;

/// Local copy of the actuator state the operator is looking at.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    api: ApiService,
    local: SystemControls,
}

impl ControlPanel {
    pub fn new(api: ApiService) -> Self {
        Self {
            api,
            local: SystemControls::DEFAULT,
        }
    }

    pub fn controls(&self) -> SystemControls {
        self.local
    }

    /// Replace the local copy with what the backend reports.
    pub async fn sync(&mut self) -> Result<SystemControls, ApiError> {
        self.local = self.api.fetch_control_state().await?;
        Ok(self.local)
    }

    /// Flip one actuator. The new value shows immediately and is rolled back
    /// if the backend does not accept it.
    pub async fn set(&mut self, target: ControlTarget, value: bool) -> Result<bool, ApiError> {
        let previous = self.local;
        if !self.local.apply(target, value) {
            return Err(ApiError::CommandRejected(format!(
                "{target} is not a switchable actuator"
            )));
        }
        match self
            .api
            .submit_control_command(ControlCommand::new(target, value))
            .await
        {
            Ok(true) => {
                info!("{target} set to {value}");
                Ok(true)
            }
            Ok(false) => {
                warn!("{target} command not accepted, reverting");
                self.local = previous;
                Ok(false)
            }
            Err(e) => {
                self.local = previous;
                Err(e)
            }
        }
    }

    pub async fn emergency_stop(&mut self) -> Result<bool, ApiError> {
        let accepted = self.api.trigger_emergency_stop().await?;
        if accepted {
            self.local = SystemControls::EMERGENCY;
        }
        Ok(accepted)
    }

    pub async fn reset(&mut self) -> Result<bool, ApiError> {
        let accepted = self.api.reset_system().await?;
        if accepted {
            self.local = SystemControls::DEFAULT;
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidrosafe_core::{ControlStore, MockBackend};

    fn panel(rate: f64) -> (ControlPanel, ControlStore) {
        let store = ControlStore::default();
        let backend = MockBackend::seeded(store.clone(), 9).with_failure_rate(rate);
        (ControlPanel::new(ApiService::mock(backend)), store)
    }

    #[tokio::test]
    async fn accepted_command_sticks() {
        let (mut panel, store) = panel(0.0);
        assert!(panel.set(ControlTarget::Pumps, true).await.unwrap());
        assert!(panel.controls().pumps_on);
        assert!(store.snapshot().pumps_on);
    }

    #[tokio::test]
    async fn rejected_command_reverts() {
        let (mut panel, store) = panel(1.0);
        let err = panel.set(ControlTarget::Gates, false).await.unwrap_err();
        assert!(matches!(err, ApiError::CommandRejected(_)));
        assert!(panel.controls().gates_open);
        assert_eq!(store.snapshot(), SystemControls::DEFAULT);
    }

    #[tokio::test]
    async fn emergency_target_is_refused_locally() {
        let (mut panel, store) = panel(0.0);
        assert!(panel.set(ControlTarget::Emergency, true).await.is_err());
        assert_eq!(panel.controls(), SystemControls::DEFAULT);
        assert_eq!(store.snapshot(), SystemControls::DEFAULT);
    }

    #[tokio::test]
    async fn postures_apply_locally() {
        let (mut panel, store) = panel(1.0);
        assert!(panel.emergency_stop().await.unwrap());
        assert_eq!(panel.controls(), SystemControls::EMERGENCY);
        assert!(panel.reset().await.unwrap());
        assert_eq!(panel.controls(), SystemControls::DEFAULT);
        assert_eq!(store.snapshot(), SystemControls::DEFAULT);
    }

    #[tokio::test]
    async fn sync_picks_up_remote_changes() {
        let (mut panel, store) = panel(0.0);
        store.replace(SystemControls::EMERGENCY);
        assert_eq!(panel.sync().await.unwrap(), SystemControls::EMERGENCY);
        assert_eq!(panel.controls(), SystemControls::EMERGENCY);
    }
}
