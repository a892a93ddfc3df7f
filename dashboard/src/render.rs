//! Plain-text rendering of screen state for the terminal.

use std::fmt::Write as _;
use std::future::Future;
use std::io;

use chrono::{DateTime, Utc};
use hidrosafe_core::{Alert, AlertSeverity, HistoryEvent, MonitoringReading, SystemControls};

use crate::presenter::{Phase, Presenter, ScreenState};
use crate::screens::{age_label, AlertCounts, AlertFilter, HomeSnapshot};

/// Frame a screen body with its loading and error lines.
pub fn frame<T>(title: &str, state: &ScreenState<T>, body: impl FnOnce(&T) -> String) -> String {
    let mut out = format!("== {title} ==\n");
    if state.is_loading() {
        out.push_str("loading...\n");
        return out;
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
    if state.phase == Phase::Refreshing {
        out.push_str("refreshing...\n");
    }
    if let Some(data) = &state.data {
        out.push_str(&body(data));
    }
    if let Some(at) = state.updated_at {
        let _ = writeln!(out, "updated {}", at.format("%H:%M:%S"));
    }
    out
}

/// Write a frame for the current state and for every change after it, until
/// `stop` resolves or the screen goes away. `stop` is polled first on each
/// pass. Returns the number of frames written.
pub async fn print_frames<T, W, S>(
    presenter: &Presenter<T>,
    title: &str,
    body: impl Fn(&T) -> String,
    stop: S,
    out: &mut W,
) -> io::Result<usize>
where
    W: io::Write,
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(stop);
    let mut rx = presenter.subscribe();
    let mut frames = 0;
    loop {
        {
            let state = rx.borrow_and_update();
            writeln!(out, "{}", frame(title, &*state, &body))?;
        }
        frames += 1;
        tokio::select! {
            biased;
            signal = &mut stop => {
                signal?;
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(frames)
}

pub fn reading(r: &MonitoringReading) -> String {
    format!(
        "{} ({})\n  level    {:.2} m  [{}] {}\n  flow     {:.1} m3/s\n  pressure {:.1} bar\n  at {}\n",
        r.location,
        r.sensor_id,
        r.level,
        r.risk.status_label(),
        r.risk.description(),
        r.flow,
        r.pressure,
        r.timestamp,
    )
}

pub fn controls(c: &SystemControls) -> String {
    fn switch(on: bool) -> &'static str {
        if on {
            "on"
        } else {
            "off"
        }
    }
    format!(
        "  drainage pumps  {}\n  flood gates     {}\n  public alerts   {}\n",
        switch(c.pumps_on),
        if c.gates_open { "open" } else { "closed" },
        switch(c.alerts_active),
    )
}

pub fn home(s: &HomeSnapshot) -> String {
    let mut out = reading(&s.reading);
    let _ = writeln!(
        out,
        "  alerts   {} active, {} critical",
        s.alerts.len(),
        s.critical_alerts()
    );
    out.push_str(&controls(&s.controls));
    out
}

pub fn alerts(list: &[Alert], filter: AlertFilter, now: DateTime<Utc>) -> String {
    let counts = AlertCounts::tally(list);
    let mut out = String::new();
    for severity in AlertSeverity::ALL {
        let _ = write!(out, "{}: {}  ", severity, counts.get(severity));
    }
    out.push('\n');

    let shown = filter.apply(list);
    if shown.is_empty() {
        out.push_str("  no alerts\n");
    }
    for alert in shown {
        let _ = writeln!(
            out,
            "  [{}] {} ({}){}\n      {}",
            alert.severity,
            alert.title,
            age_label(&alert.timestamp, now),
            alert.area.as_deref().map(|a| format!(" - {a}")).unwrap_or_default(),
            alert.description,
        );
    }
    out
}

pub fn history(events: &[HistoryEvent]) -> String {
    if events.is_empty() {
        return "  no events\n".to_string();
    }
    let mut out = String::new();
    for e in events {
        let _ = write!(out, "  #{} {} {}: {}", e.id, e.timestamp, e.category, e.description);
        if let Some(value) = &e.value {
            let _ = write!(out, " ({value})");
        }
        out.push('\n');
    }
    out
}
