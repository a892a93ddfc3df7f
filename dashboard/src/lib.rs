//! Terminal dashboard for the HidroSafe flood monitoring backend.
//!
//! # Design
//! `ApiService` answers every data request, either from the in-process mock
//! backend or over HTTP through `HttpTransport`. Each screen is mounted as a
//! `Presenter` that polls on its own interval and publishes `ScreenState`
//! updates; `render` turns those into text. Configuration comes from
//! `dashboard.toml` (see `config`).

pub mod config;
pub mod presenter;
pub mod render;
pub mod screens;
pub mod service;
pub mod transport;

pub use config::DashboardConfig;
pub use presenter::{mount, Phase, Presenter, ScreenState};
pub use screens::{ControlPanel, ScreenKind};
pub use service::ApiService;
pub use transport::HttpTransport;
