//! `dashboard.toml` schema and loader.
//!
//! Every section is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;

use crate::screens::ScreenKind;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root including the `/api` prefix.
    pub base_url: String,
    pub use_mock: bool,
    pub mock_failure_rate: f64,
    /// 0 disables the client-side timeout.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            use_mock: true,
            mock_failure_rate: hidrosafe_core::mock::DEFAULT_FAILURE_RATE,
            request_timeout_secs: 0,
        }
    }
}

/// Per-screen refresh intervals in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub home_secs: u64,
    pub monitoring_secs: u64,
    pub alerts_secs: u64,
    pub control_secs: u64,
    pub history_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            home_secs: 30,
            monitoring_secs: 5,
            alerts_secs: 10,
            control_secs: 10,
            history_secs: 30,
        }
    }
}

impl PollingConfig {
    /// Zero is bumped to one second so a typo cannot spin the loop.
    pub fn interval(&self, screen: ScreenKind) -> Duration {
        let secs = match screen {
            ScreenKind::Home => self.home_secs,
            ScreenKind::Monitoring => self.monitoring_secs,
            ScreenKind::Alerts => self.alerts_secs,
            ScreenKind::Control => self.control_secs,
            ScreenKind::History => self.history_secs,
        };
        Duration::from_secs(secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("failed to parse dashboard config")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// First readable file among the usual locations, else defaults.
    pub fn load_or_default() -> (Self, LoadReport) {
        Self::load_first(&[
            PathBuf::from("config").join("dashboard.toml"),
            PathBuf::from("dashboard.toml"),
        ])
    }

    /// First candidate that exists and parses. Files that exist but fail to
    /// load are recorded in the report and skipped.
    pub fn load_first(candidates: &[PathBuf]) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    report.source = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.skipped.push((path.clone(), format!("{e:#}"))),
            }
        }
        (Self::default(), report)
    }
}

/// Where the configuration came from. Loading happens before the logger
/// exists, so the outcome is kept here and logged once it does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// `None` means built-in defaults.
    pub source: Option<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

impl LoadReport {
    pub fn from_file(path: &Path) -> Self {
        Self {
            source: Some(path.to_path_buf()),
            skipped: Vec::new(),
        }
    }

    pub fn log(&self) {
        for (path, reason) in &self.skipped {
            warn!("ignoring {}: {reason}", path.display());
        }
        match &self.source {
            Some(path) => info!("loaded config from {}", path.display()),
            None => info!("no config file found, using defaults"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(DashboardConfig::parse("").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::parse(
            r#"
            [api]
            use_mock = false
            base_url = "http://10.0.0.5:8080/api"

            [polling]
            monitoring_secs = 2
            "#,
        )
        .unwrap();
        assert!(!config.api.use_mock);
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080/api");
        assert_eq!(config.api.mock_failure_rate, 0.1);
        assert_eq!(config.polling.interval(ScreenKind::Monitoring), Duration::from_secs(2));
        assert_eq!(config.polling.interval(ScreenKind::Alerts), Duration::from_secs(10));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn default_intervals_per_screen() {
        let polling = PollingConfig::default();
        assert_eq!(polling.interval(ScreenKind::Home), Duration::from_secs(30));
        assert_eq!(polling.interval(ScreenKind::Monitoring), Duration::from_secs(5));
        assert_eq!(polling.interval(ScreenKind::Alerts), Duration::from_secs(10));
        assert_eq!(polling.interval(ScreenKind::Control), Duration::from_secs(10));
        assert_eq!(polling.interval(ScreenKind::History), Duration::from_secs(30));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let polling = PollingConfig {
            history_secs: 0,
            ..PollingConfig::default()
        };
        assert_eq!(polling.interval(ScreenKind::History), Duration::from_secs(1));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let err = DashboardConfig::parse("[polling]\nhome_secs = \"soon\"").unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse dashboard config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(DashboardConfig::load("/nonexistent/dashboard.toml").is_err());
    }

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hidrosafe-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_candidate_is_reported_and_skipped() {
        let bad = scratch_file("bad.toml", "[polling]\nhome_secs = \"soon\"");
        let good = scratch_file("good.toml", "[polling]\nhome_secs = 60");

        let (config, report) = DashboardConfig::load_first(&[bad.clone(), good.clone()]);
        assert_eq!(config.polling.home_secs, 60);
        assert_eq!(report.source, Some(good));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, bad);
        assert!(report.skipped[0].1.contains("failed to parse dashboard config"));
    }

    #[test]
    fn no_usable_candidate_falls_back_to_defaults() {
        let bad = scratch_file("only-bad.toml", "[api]\nuse_mock = \"maybe\"");
        let missing = PathBuf::from("/nonexistent/dashboard.toml");

        let (config, report) = DashboardConfig::load_first(&[missing, bad.clone()]);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(report.source, None);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, bad);
    }
}
