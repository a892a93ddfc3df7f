use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use hidrosafe_core::{Alert, ControlTarget, HistoryEvent};
use hidrosafe_dashboard::config::LoadReport;
use hidrosafe_dashboard::screens::{alerts, history, home, load_monitoring, AlertFilter};
use hidrosafe_dashboard::{
    mount, render, ApiService, ControlPanel, DashboardConfig, Presenter, ScreenKind,
};
use log::info;

#[derive(Parser)]
#[command(name = "hidrosafe-dashboard", version, about = "HidroSafe flood monitoring dashboard")]
struct Cli {
    /// Config file; defaults to config/dashboard.toml or ./dashboard.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the in-process mock backend.
    #[arg(long, global = true, conflicts_with = "base_url")]
    mock: bool,

    /// Talk to the HTTP backend at this API root.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll one screen until Ctrl-C.
    Watch {
        screen: ScreenKind,
        /// Alerts screen only: `all` or a severity.
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Switch one actuator.
    Set { target: Switch, state: OnOff },
    EmergencyStop,
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    Pumps,
    Gates,
    Alerts,
}

impl From<Switch> for ControlTarget {
    fn from(s: Switch) -> Self {
        match s {
            Switch::Pumps => ControlTarget::Pumps,
            Switch::Gates => ControlTarget::Gates,
            Switch::Alerts => ControlTarget::Alerts,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, report) = match &cli.config {
        Some(path) => (DashboardConfig::load(path)?, LoadReport::from_file(path)),
        None => DashboardConfig::load_or_default(),
    };
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
        config.api.use_mock = false;
    }
    if cli.mock {
        config.api.use_mock = true;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();
    report.log();

    let api = ApiService::from_config(&config.api).context("failed to set up API client")?;

    match cli.command {
        Command::Watch { screen, filter } => {
            let Some(filter) = AlertFilter::parse(&filter) else {
                bail!("unknown alert filter {filter:?}; use all, critical, warning or info");
            };
            watch_screen(&api, &config, screen, filter).await
        }
        Command::Set { target, state } => {
            let mut panel = ControlPanel::new(api);
            panel.sync().await.context("failed to read control state")?;
            let value = matches!(state, OnOff::On);
            let accepted = panel
                .set(target.into(), value)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if !accepted {
                bail!("backend did not accept the command");
            }
            print!("{}", render::controls(&panel.controls()));
            Ok(())
        }
        Command::EmergencyStop => {
            let mut panel = ControlPanel::new(api);
            panel.emergency_stop().await.context("emergency stop failed")?;
            println!("emergency posture applied");
            print!("{}", render::controls(&panel.controls()));
            Ok(())
        }
        Command::Reset => {
            let mut panel = ControlPanel::new(api);
            panel.reset().await.context("reset failed")?;
            println!("actuators reset");
            print!("{}", render::controls(&panel.controls()));
            Ok(())
        }
    }
}

async fn watch_screen(
    api: &ApiService,
    config: &DashboardConfig,
    screen: ScreenKind,
    filter: AlertFilter,
) -> anyhow::Result<()> {
    let period = config.polling.interval(screen);
    let api = api.clone();
    match screen {
        ScreenKind::Home => {
            let p = mount("home", period, move || {
                let api = api.clone();
                async move { home::load_home(&api).await }
            });
            print_until_interrupted(p, "Home", render::home).await
        }
        ScreenKind::Monitoring => {
            let p = mount("monitoring", period, move || {
                let api = api.clone();
                async move { load_monitoring(&api).await }
            });
            print_until_interrupted(p, "Monitoring", render::reading).await
        }
        ScreenKind::Alerts => {
            let p = mount("alerts", period, move || {
                let api = api.clone();
                async move { alerts::load_alerts(&api).await }
            });
            print_until_interrupted(p, "Alerts", move |list: &Vec<Alert>| {
                render::alerts(list, filter, Utc::now())
            })
            .await
        }
        ScreenKind::Control => {
            let p = mount("control", period, move || {
                let api = api.clone();
                async move { api.fetch_control_state().await }
            });
            print_until_interrupted(p, "Control", render::controls).await
        }
        ScreenKind::History => {
            let p = mount("history", period, move || {
                let api = api.clone();
                async move { history::load_history(&api).await }
            });
            print_until_interrupted(p, "History", |events: &Vec<HistoryEvent>| render::history(events)).await
        }
    }
}

async fn print_until_interrupted<T>(
    presenter: Presenter<T>,
    title: &str,
    body: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let frames = render::print_frames(&presenter, title, body, tokio::signal::ctrl_c(), &mut stdout)
        .await
        .context("watch stopped")?;
    info!("{}: stopped after {frames} frames", presenter.name());
    presenter.unmount();
    Ok(())
}
