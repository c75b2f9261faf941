//! weatherlog command line
//!
//! Meant to be run from cron: `continuous` every sample interval and `daily`
//! shortly after midnight.

mod mail;
mod render;
mod sensor;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use weatherlog_core::acquisition::Sensor;
use weatherlog_core::config::StationConfig;
use weatherlog_core::record::Quantity;
use weatherlog_core::station::{Station, StationError};
use weatherlog_core::store::StoreError;
use weatherlog_core::VERSION;

use crate::mail::SendmailMailer;
use crate::render::PlotRenderer;
use crate::sensor::{CommandSensor, DemoSensor};

#[derive(Parser, Debug)]
#[command(name = "weatherlog", version, about = "Weather station logger")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    stderr: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take one reading, store it and redraw the web charts
    Continuous {
        /// Use simulated readings instead of the sensor command
        #[arg(long)]
        demo: bool,
    },
    /// Summarise the last day, redraw the average charts and mail yesterday's charts
    Daily,
    /// Append one summary row without drawing or mailing
    Summary {
        #[arg(long, value_enum)]
        quantity: Option<QuantityOpt>,
    },
    /// Redraw the web charts from the stored logs
    Charts,
    /// Print the effective configuration
    Config {
        /// Write it to the configuration file instead
        #[arg(long)]
        write: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum QuantityOpt {
    Temperature,
    PressureRaw,
    PressureSeaLevel,
    HumidityRel,
    HumidityAbs,
}

impl From<QuantityOpt> for Quantity {
    fn from(value: QuantityOpt) -> Self {
        match value {
            QuantityOpt::Temperature => Quantity::Temperature,
            QuantityOpt::PressureRaw => Quantity::PressureRaw,
            QuantityOpt::PressureSeaLevel => Quantity::PressureSeaLevel,
            QuantityOpt::HumidityRel => Quantity::HumidityRel,
            QuantityOpt::HumidityAbs => Quantity::HumidityAbs,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = StationConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    init_logging(&cli, &config)?;
    info!("weatherlog {} {:?}", VERSION, cli.command);

    let result = run(cli.command, config, &config_path);
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weatherlog")
        .join("weatherlog.json")
}

fn init_logging(cli: &Cli, config: &StationConfig) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let writer = if cli.stderr {
        BoxMakeWriter::new(io::stderr)
    } else {
        let dir = &config.paths.log_dir;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(&config.files.app_log);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        BoxMakeWriter::new(Mutex::new(file))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(cli.stderr)
        .try_init();
    Ok(())
}

fn station(config: StationConfig) -> Station {
    let mailer = config
        .mail
        .is_enabled()
        .then(|| SendmailMailer::new(config.mail.sendmail.clone()));
    let station = Station::new(config, PlotRenderer::default());
    match mailer {
        Some(mailer) => station.with_mailer(mailer),
        None => station,
    }
}

fn run(command: Command, config: StationConfig, config_path: &Path) -> Result<()> {
    match command {
        Command::Continuous { demo } => {
            let mut sensor: Box<dyn Sensor> = if demo {
                Box::new(DemoSensor::new(config.altitude_m))
            } else {
                Box::new(CommandSensor::new(&config.sensor_command)?)
            };
            let record = station(config)
                .continuous(sensor.as_mut())
                .context("Continuous run failed")?;
            info!(
                "Recorded {} {:.1} °C",
                record.wall_clock(),
                record.values().temperature
            );
        }
        Command::Daily => {
            let report = station(config).daily().context("Daily run failed")?;
            info!(
                "Daily run for {}: {} charts, {} attachments, mailed: {}",
                report.date,
                report.charts,
                report.attachments.len(),
                report.mailed
            );
        }
        Command::Summary { quantity } => {
            let quantity = quantity
                .map(Quantity::from)
                .unwrap_or(config.charts.summary_quantity);
            let record = station(config).write_summary(quantity)?;
            info!("Summary of {}: {:?}", quantity.label(), record.values());
        }
        Command::Charts => {
            let station = station(config);
            let count = station.render_continuous_charts()?;
            info!("Drew {} raw data charts", count);
            match station.render_average_charts() {
                Ok(count) => info!("Drew {} average charts", count),
                Err(StationError::Store(
                    e @ (StoreError::MissingLog(_) | StoreError::EmptyWindow { .. }),
                )) => warn!("No average charts: {}", e),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Config { write } => {
            if write {
                config.save(config_path)?;
                info!("Wrote {}", config_path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summary_quantity() {
        let cli = Cli::parse_from([
            "weatherlog",
            "--stderr",
            "summary",
            "--quantity",
            "pressure-sea-level",
        ]);
        assert!(cli.stderr);
        match cli.command {
            Command::Summary {
                quantity: Some(quantity),
            } => assert_eq!(Quantity::from(quantity), Quantity::PressureSeaLevel),
            other => panic!("Unexpected command {:?}", other),
        }
    }
}
