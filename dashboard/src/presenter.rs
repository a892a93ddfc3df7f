//! Polling presenter shared by every screen.
//!
//! # Design
//! Mounting a screen spawns one task that owns the screen's interval timer.
//! The task fetches once on mount, then on every tick and on every manual
//! refresh request. Fetches inside one task run one at a time, so a screen
//! never sees its own responses out of order. The latest `ScreenState` is
//! published on a `watch` channel; renderers subscribe and redraw on change.
//!
//! Unmounting (or dropping the `Presenter`) aborts the task, which cancels
//! the timer together with any fetch still in flight.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hidrosafe_core::ApiError;
use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted, first fetch not started.
    Idle,
    /// First fetch in flight; nothing to show yet.
    Loading,
    Populated,
    /// Manual refresh in flight; previous data still shown.
    Refreshing,
    /// Last fetch failed. Data from an earlier success, if any, is kept.
    Errored,
}

#[derive(Debug, Clone)]
pub struct ScreenState<T> {
    pub phase: Phase,
    pub data: Option<T>,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for ScreenState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> ScreenState<T> {
    pub fn begin_load(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Loading;
        }
    }

    pub fn begin_refresh(&mut self) {
        if matches!(self.phase, Phase::Populated | Phase::Errored) {
            self.phase = Phase::Refreshing;
        }
    }

    /// Apply a fetch result. A failure keeps stale data visible.
    pub fn complete(&mut self, result: Result<T, ApiError>) {
        match result {
            Ok(data) => {
                self.phase = Phase::Populated;
                self.data = Some(data);
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(e) => {
                self.phase = Phase::Errored;
                self.error = Some(e.user_message());
            }
        }
    }

    /// True while a full-screen spinner is appropriate.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Loading) && self.data.is_none()
    }
}

/// Handle to a mounted screen.
pub struct Presenter<T> {
    name: &'static str,
    state: watch::Receiver<ScreenState<T>>,
    refresh_tx: mpsc::Sender<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Mount a screen: fetch now, then every `period` until unmounted.
pub fn mount<T, F, Fut>(name: &'static str, period: Duration, fetch: F) -> Presenter<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let (state_tx, state_rx) = watch::channel(ScreenState::default());
    let (refresh_tx, refresh_rx) = mpsc::channel(1);
    info!("{name}: mounted, polling every {}s", period.as_secs_f64());
    let task = tokio::spawn(poll_loop(name, period, fetch, state_tx, refresh_rx));
    Presenter {
        name,
        state: state_rx,
        refresh_tx,
        task,
    }
}

async fn poll_loop<T, F, Fut>(
    name: &'static str,
    period: Duration,
    fetch: F,
    state: watch::Sender<ScreenState<T>>,
    mut refresh_rx: mpsc::Receiver<oneshot::Sender<()>>,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    state.send_modify(ScreenState::begin_load);
    let result = fetch().await;
    publish(name, &state, result);

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("{name}: timer fetch");
                let result = fetch().await;
                publish(name, &state, result);
            }
            request = refresh_rx.recv() => {
                let Some(done) = request else { break };
                debug!("{name}: manual refresh");
                state.send_modify(ScreenState::begin_refresh);
                let result = fetch().await;
                publish(name, &state, result);
                let _ = done.send(());
            }
        }
    }
}

fn publish<T>(name: &str, state: &watch::Sender<ScreenState<T>>, result: Result<T, ApiError>) {
    if let Err(e) = &result {
        warn!("{name}: fetch failed: {e}");
    }
    state.send_modify(|s| s.complete(result));
}

impl<T> Presenter<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState<T>> {
        self.state.clone()
    }

    /// Apply `f` to the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ScreenState<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Pull-to-refresh. Resolves once the refetch has been applied; returns
    /// `false` if the screen is gone.
    pub async fn refresh(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if self.refresh_tx.send(done_tx).await.is_err() {
            return false;
        }
        done_rx.await.is_ok()
    }

    /// Stop polling. No fetch starts after this returns.
    pub fn unmount(self) {
        // Drop does the work.
    }
}

impl<T: Clone> Presenter<T> {
    pub fn state(&self) -> ScreenState<T> {
        self.state.borrow().clone()
    }
}

impl<T> Drop for Presenter<T> {
    fn drop(&mut self) {
        self.task.abort();
        info!("{}: unmounted", self.name);
    }
}
