use std::{fmt::Display, io::Write, sync::Arc};

use anyhow::{Context, bail};
use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use weatherboard_core::{
    Config, Dashboard,
    clock::{TICK, format_time, spawn_clock},
    provider::provider_from_config,
};

use crate::render::{PROMPT, render_board};

const QUIT: &str = ":q";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and timezone.
    Configure,

    /// Show the board for a city once and exit.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Live board: type a city and press Enter to search again.
    Watch {
        /// City shown first; defaults to the configured city.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => launch(city, false).await,
            Command::Watch { city } => launch(city, true).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Leave empty to keep the current key")
        .without_confirmation()
        .prompt()?;
    if !key.trim().is_empty() {
        cfg.api_key = Some(key.trim().to_string());
    }

    cfg.default_city = Text::new("Default city:").with_default(&cfg.default_city).prompt()?;

    let zone = Text::new("Timezone (IANA name, empty for system local):")
        .with_default(cfg.timezone.as_deref().unwrap_or(""))
        .prompt()?;
    cfg.timezone = Some(zone.trim().to_string()).filter(|z| !z.is_empty());
    cfg.zone()?;

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn launch(city: Option<String>, live: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let city = city.unwrap_or_else(|| cfg.default_city.clone());

    match cfg.zone()? {
        Some(zone) => drive(Dashboard::new(provider, zone), &city, live).await,
        None => drive(Dashboard::new(provider, Local), &city, live).await,
    }
}

async fn drive<Z>(dashboard: Dashboard<Z>, city: &str, live: bool) -> anyhow::Result<()>
where
    Z: TimeZone + Send + Sync + 'static,
    Z::Offset: Display + Send + Sync,
{
    if live {
        watch(Arc::new(dashboard), city).await
    } else {
        show(&dashboard, city).await
    }
}

async fn show<Z>(dashboard: &Dashboard<Z>, city: &str) -> anyhow::Result<()>
where
    Z: TimeZone + Send + Sync,
    Z::Offset: Display,
{
    if dashboard.search(city).await.is_none() {
        bail!("City name must not be empty");
    }

    let state = dashboard.snapshot();
    let now = Utc::now().with_timezone(dashboard.zone());
    print!("{}", render_board(&state, &now));

    if let Some(error) = state.error {
        bail!(error);
    }

    Ok(())
}

async fn watch<Z>(dashboard: Arc<Dashboard<Z>>, city: &str) -> anyhow::Result<()>
where
    Z: TimeZone + Send + Sync + 'static,
    Z::Offset: Display + Send + Sync,
{
    let mut board = dashboard.subscribe();
    let (mut clock, _ticker) = spawn_clock(dashboard.zone().clone(), TICK);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown_time = String::new();

    spawn_search(&dashboard, city.to_string());

    loop {
        tokio::select! {
            changed = board.changed() => {
                changed.context("dashboard state closed")?;
            }
            changed = clock.changed() => {
                changed.context("clock stopped")?;
                // The board only shows minutes.
                if format_time(&*clock.borrow()) == shown_time {
                    continue;
                }
            }
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) if line.trim() == QUIT => break,
                    Some(line) => spawn_search(&dashboard, line),
                    None => break,
                }
                continue;
            }
        }

        let now = clock.borrow().clone();
        shown_time = format_time(&now);
        let state = board.borrow_and_update().clone();

        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\x1b[2J\x1b[H{}\n{PROMPT}\n> ", render_board(&state, &now))?;
        stdout.flush()?;
    }

    info!("leaving watch mode");
    Ok(())
}

/// Searches run detached; newer searches make older results stale.
fn spawn_search<Z>(dashboard: &Arc<Dashboard<Z>>, city: String)
where
    Z: TimeZone + Send + Sync + 'static,
    Z::Offset: Display + Send + Sync,
{
    let dashboard = Arc::clone(dashboard);
    tokio::spawn(async move {
        dashboard.search(&city).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["weatherboard", "show", "Paris"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: Some(c) } if c == "Paris"));
    }

    #[test]
    fn watch_city_is_optional() {
        let cli = Cli::try_parse_from(["weatherboard", "watch"]).unwrap();
        assert!(matches!(cli.command, Command::Watch { city: None }));
    }

    #[test]
    fn configure_takes_no_arguments() {
        assert!(Cli::try_parse_from(["weatherboard", "configure", "extra"]).is_err());
    }
}
