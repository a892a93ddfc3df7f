//! Synthetic data source used by the dashboard's mock mode and by the mock
//! server.
//!
//! # Design
//! The only mutable state is the actuator record, held by a `ControlStore`
//! handle that is created once per application instance and injected into
//! `MockBackend`. Clones of a store share the same record, so a dashboard and
//! a server started from the same store observe each other's writes; separate
//! stores never do, which keeps tests isolated.
//!
//! Readings, alerts and history are generated fresh on every call and are not
//! derived from the actuator record.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, SecondsFormat, Utc};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::ApiError;
use crate::normalize::normalize_reading;
use crate::types::{
    Alert, AlertSeverity, ControlCommand, HistoryEvent, MonitoringReading,
    RawMonitoringReading, SystemControls,
};

/// Probability that a mock command submission fails.
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

pub const LEVEL_RANGE_M: (f64, f64) = (1.0, 3.5);
pub const FLOW_RANGE_M3S: (f64, f64) = (5.0, 25.0);
pub const PRESSURE_RANGE_BAR: (f64, f64) = (0.8, 2.5);
pub const MAX_ALERTS: usize = 4;

const STATIONS: [(&str, &str); 3] = [
    ("HS-01", "Rio Tietê - Ponte das Bandeiras"),
    ("HS-02", "Córrego Pirajuçara - Estação 2"),
    ("HS-03", "Rio Pinheiros - Eusébio Matoso"),
];

struct AlertTemplate {
    severity: AlertSeverity,
    title: &'static str,
    description: &'static str,
    area: Option<&'static str>,
}

static ALERT_TEMPLATES: [AlertTemplate; 5] = [
    AlertTemplate {
        severity: AlertSeverity::Critical,
        title: "Nível crítico do rio",
        description: "Nível acima de 3,0 m na estação de monitoramento",
        area: Some("Centro"),
    },
    AlertTemplate {
        severity: AlertSeverity::Warning,
        title: "Chuva intensa prevista",
        description: "Previsão de 40 mm nas próximas 6 horas",
        area: Some("Zona Norte"),
    },
    AlertTemplate {
        severity: AlertSeverity::Warning,
        title: "Vazão elevada",
        description: "Vazão acima da média histórica para o período",
        area: Some("Zona Leste"),
    },
    AlertTemplate {
        severity: AlertSeverity::Info,
        title: "Manutenção programada",
        description: "Limpeza dos sensores agendada para amanhã",
        area: None,
    },
    AlertTemplate {
        severity: AlertSeverity::Info,
        title: "Teste de bombas",
        description: "Teste semanal das bombas de drenagem concluído",
        area: Some("Estação Sul"),
    },
];

/// (category, description, value)
const HISTORY_FIXTURE: [(&str, &str, Option<&str>); 5] = [
    ("Manutenção", "Limpeza dos sensores concluída", None),
    ("Medição", "Nível do rio", Some("1.84 m")),
    ("Sistema", "Bomba ligada automaticamente", None),
    ("Alerta", "Vazão alta detectada", Some("22.5 m³/s")),
    ("Medição", "Pressão na galeria", Some("1.9 bar")),
];

/// Shared, lock-protected actuator record.
#[derive(Debug, Clone, Default)]
pub struct ControlStore {
    inner: Arc<Mutex<SystemControls>>,
}

impl ControlStore {
    pub fn new(initial: SystemControls) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SystemControls> {
        // The record is plain data; a panicked writer cannot leave it half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SystemControls {
        *self.lock()
    }

    /// Set one actuator. `Emergency` with `true` applies the emergency
    /// posture, with `false` restores the defaults.
    pub fn apply(&self, command: ControlCommand) -> SystemControls {
        let mut controls = self.lock();
        if !controls.apply(command.target, command.value) {
            *controls = if command.value {
                SystemControls::EMERGENCY
            } else {
                SystemControls::DEFAULT
            };
        }
        *controls
    }

    pub fn replace(&self, controls: SystemControls) -> SystemControls {
        let mut guard = self.lock();
        *guard = controls;
        *guard
    }
}

/// Synthetic backend: random readings, alerts and history plus the injected
/// actuator store.
#[derive(Debug)]
pub struct MockBackend {
    store: ControlStore,
    rng: Mutex<StdRng>,
    failure_rate: f64,
    next_record_id: AtomicI64,
}

impl MockBackend {
    pub fn new(store: ControlStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Deterministic generator for tests.
    pub fn seeded(store: ControlStore, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: ControlStore, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
            failure_rate: DEFAULT_FAILURE_RATE,
            next_record_id: AtomicI64::new(1),
        }
    }

    /// Clamped to `0.0..=1.0`. NaN disables failures.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn store(&self) -> &ControlStore {
        &self.store
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reading in the backend's wire shape, unrounded.
    pub fn raw_reading(&self) -> RawMonitoringReading {
        let mut rng = self.rng();
        let (sensor, location) = STATIONS[rng.gen_range(0..STATIONS.len())];
        let raw = RawMonitoringReading {
            water_level: rng.gen_range(LEVEL_RANGE_M.0..=LEVEL_RANGE_M.1),
            flow: rng.gen_range(FLOW_RANGE_M3S.0..=FLOW_RANGE_M3S.1),
            pressure: rng.gen_range(PRESSURE_RANGE_BAR.0..=PRESSURE_RANGE_BAR.1),
            location: location.to_string(),
            sensor_id: Some(sensor.to_string()),
            id: Some(self.next_record_id.fetch_add(1, Ordering::Relaxed)),
            timestamp: now_rfc3339(),
        };
        debug!("mock reading {} at {:.3} m", sensor, raw.water_level);
        raw
    }

    pub fn monitoring_reading(&self) -> MonitoringReading {
        normalize_reading(self.raw_reading())
    }

    pub fn alerts(&self) -> Vec<Alert> {
        let mut rng = self.rng();
        let count = rng.gen_range(0..=MAX_ALERTS);
        let picked: Vec<&AlertTemplate> = ALERT_TEMPLATES.choose_multiple(&mut *rng, count).collect();
        picked
            .into_iter()
            .map(|t| {
                let minutes_ago = rng.gen_range(0..=180);
                Alert {
                    id: uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
                    severity: t.severity,
                    title: t.title.to_string(),
                    description: t.description.to_string(),
                    timestamp: rfc3339_minutes_ago(minutes_ago),
                    area: t.area.map(str::to_string),
                    resolved: Some(rng.gen_bool(0.2)),
                }
            })
            .collect()
    }

    pub fn control_state(&self) -> SystemControls {
        self.store.snapshot()
    }

    /// Fails with probability `failure_rate`, leaving the store untouched.
    pub fn submit_command(&self, command: ControlCommand) -> Result<bool, ApiError> {
        let fail = self.rng().gen_bool(self.failure_rate);
        if fail {
            warn!("mock: simulated failure for {} command", command.target);
            return Err(ApiError::CommandRejected(format!(
                "simulated failure while switching {}",
                command.target
            )));
        }
        let controls = self.store.apply(command);
        debug!("mock: {} set to {} -> {:?}", command.target, command.value, controls);
        Ok(true)
    }

    /// Never fails.
    pub fn emergency_stop(&self) -> Result<bool, ApiError> {
        self.store.replace(SystemControls::EMERGENCY);
        info!("mock: emergency posture applied");
        Ok(true)
    }

    /// Never fails.
    pub fn reset_system(&self) -> Result<bool, ApiError> {
        self.store.replace(SystemControls::DEFAULT);
        info!("mock: actuators reset to defaults");
        Ok(true)
    }

    /// Five events with ids 1..=5 (5 is the newest), in shuffled order.
    pub fn history(&self) -> Vec<HistoryEvent> {
        let mut events: Vec<HistoryEvent> = HISTORY_FIXTURE
            .iter()
            .enumerate()
            .map(|(i, (category, description, value))| {
                let id = i as i64 + 1;
                HistoryEvent {
                    id: id.to_string(),
                    timestamp: rfc3339_minutes_ago((HISTORY_FIXTURE.len() as i64 - id) * 5),
                    category: category.to_string(),
                    description: description.to_string(),
                    value: value.map(str::to_string),
                }
            })
            .collect();
        events.shuffle(&mut *self.rng());
        events
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn rfc3339_minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Secs, true)
}
