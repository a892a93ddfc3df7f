use anyhow::Context;
use hidrosafe_core::{ControlStore, MockBackend};
use log::warn;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let mut backend = MockBackend::new(ControlStore::default());
    if let Ok(value) = std::env::var("HIDROSAFE_FAILURE_RATE") {
        match value.parse::<f64>() {
            Ok(rate) => backend = backend.with_failure_rate(rate),
            Err(_) => warn!("ignoring HIDROSAFE_FAILURE_RATE={value:?}: not a number"),
        }
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    hidrosafe_mock_server::run_with(listener, backend)
        .await
        .context("server error")
}
