use chrono::{DateTime, Utc};
use hidrosafe_core::{Alert, AlertSeverity, ApiError};

use crate::service::ApiService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertFilter {
    #[default]
    All,
    Only(AlertSeverity),
}

impl AlertFilter {
    /// `all` or a severity tag in either language.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("todos") {
            return Some(AlertFilter::All);
        }
        AlertSeverity::parse(value).map(AlertFilter::Only)
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Only(severity) => alert.severity == *severity,
        }
    }

    pub fn apply<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        alerts.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertCounts {
    pub fn tally(alerts: &[Alert]) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match alert.severity {
                AlertSeverity::Critical => counts.critical += 1,
                AlertSeverity::Warning => counts.warning += 1,
                AlertSeverity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }

    pub fn get(&self, severity: AlertSeverity) -> usize {
        match severity {
            AlertSeverity::Critical => self.critical,
            AlertSeverity::Warning => self.warning,
            AlertSeverity::Info => self.info,
        }
    }
}

/// Relative age of an RFC 3339 timestamp. Anything unparseable is shown
/// verbatim; timestamps in the future read as `now`.
pub fn age_label(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(at) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let minutes = (now - at.with_timezone(&Utc)).num_minutes();
    match minutes {
        m if m < 1 => "now".to_string(),
        m if m < 60 => format!("{m} min ago"),
        m if m < 60 * 24 => format!("{} h ago", m / 60),
        m => format!("{} d ago", m / (60 * 24)),
    }
}

pub async fn load_alerts(api: &ApiService) -> Result<Vec<Alert>, ApiError> {
    api.fetch_alerts().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert(id: &str, severity: AlertSeverity) -> Alert {
        Alert {
            id: id.to_string(),
            severity,
            title: String::new(),
            description: String::new(),
            timestamp: "2024-05-01T10:00:00Z".to_string(),
            area: None,
            resolved: None,
        }
    }

    fn sample() -> Vec<Alert> {
        vec![
            alert("1", AlertSeverity::Critical),
            alert("2", AlertSeverity::Info),
            alert("3", AlertSeverity::Warning),
            alert("4", AlertSeverity::Critical),
        ]
    }

    #[test]
    fn filter_parse() {
        assert_eq!(AlertFilter::parse("all"), Some(AlertFilter::All));
        assert_eq!(
            AlertFilter::parse("critico"),
            Some(AlertFilter::Only(AlertSeverity::Critical))
        );
        assert_eq!(
            AlertFilter::parse("warning"),
            Some(AlertFilter::Only(AlertSeverity::Warning))
        );
        assert_eq!(AlertFilter::parse("urgent"), None);
    }

    #[test]
    fn filter_keeps_order() {
        let alerts = sample();
        let critical = AlertFilter::Only(AlertSeverity::Critical).apply(&alerts);
        let ids: Vec<&str> = critical.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "4"]);
        assert_eq!(AlertFilter::All.apply(&alerts).len(), 4);
    }

    #[test]
    fn counts_per_severity() {
        let counts = AlertCounts::tally(&sample());
        assert_eq!(
            counts,
            AlertCounts {
                critical: 2,
                warning: 1,
                info: 1
            }
        );
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(AlertSeverity::Info), 1);
        assert_eq!(AlertCounts::tally(&[]).total(), 0);
    }

    #[test]
    fn age_labels() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(age_label("2024-05-01T11:59:30Z", now), "now");
        assert_eq!(age_label("2024-05-01T12:05:00Z", now), "now");
        assert_eq!(age_label("2024-05-01T11:45:00Z", now), "15 min ago");
        assert_eq!(age_label("2024-05-01T10:00:00Z", now), "2 h ago");
        assert_eq!(age_label("2024-05-01T09:00:00-03:00", now), "now");
        assert_eq!(age_label("2024-04-28T12:00:00Z", now), "3 d ago");
        assert_eq!(age_label("yesterday", now), "yesterday");
    }
}
