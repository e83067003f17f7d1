use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select};

use forecast_core::{
    Config, ForecastService, GeoPoint,
    activity::ActivityFilter,
    grid::project,
    model::TemperatureUnit,
    slot::{provider_now, select_mid_issuance, select_slot},
};

use crate::render;

const AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Korean weather forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the service key, default location, display unit and timeout.
    Configure,

    /// Show current, hourly and weekly forecast with outfit and activity advice.
    Show {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Local (KST) time as "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long)]
        at: Option<String>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Which activity lists to show: all, indoor or outdoor.
        #[arg(long, default_value = "all")]
        activities: ActivityFilter,
    },

    /// Print the forecast grid cell for a coordinate.
    Grid {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Print the short-range and mid-range issuances that would be queried.
    Slot {
        /// Local (KST) time as "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long)]
        at: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { lat, lon, at, json, activities } => {
                let cfg = Config::load()?.with_env_overrides();
                let point = resolve_point(lat, lon, &cfg)?;
                let now = resolve_now(at.as_deref())?;
                tracing::debug!(
                    latitude = point.latitude,
                    longitude = point.longitude,
                    %now,
                    explicit_time = at.is_some(),
                    "resolved query"
                );

                let service = ForecastService::from_config(&cfg)?;
                let mut report = service.forecast(point, now, None).await?;
                report.advice.activities = report.advice.activities.filtered(activities);

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    let mut text = String::new();
                    render::report(&mut text, &report, cfg.unit())?;
                    print!("{text}");
                }
            }
            Command::Grid { lat, lon } => {
                let cell = project(GeoPoint::new(lat, lon));
                println!("{cell}");
            }
            Command::Slot { at } => {
                let now = resolve_now(at.as_deref())?;
                tracing::debug!(%now, "resolved issuance time");
                println!("short-range: {}", select_slot(now));
                println!("mid-range:   {}", select_mid_issuance(now));
            }
        }

        Ok(())
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("data.go.kr service key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        cfg.service_key = Some(key.trim().to_string());
    }

    let set_location = Confirm::new("Set a default location?")
        .with_default(cfg.default_location.is_none())
        .prompt()?;
    if set_location {
        let current = cfg.location();
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(current.latitude)
            .with_error_message("Please type a number, e.g. 37.5665")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(current.longitude)
            .with_error_message("Please type a number, e.g. 126.9780")
            .prompt()?;
        cfg.default_location = Some(GeoPoint::new(latitude, longitude));
    }

    let units = TemperatureUnit::all().to_vec();
    let starting = units.iter().position(|u| *u == cfg.unit()).unwrap_or(0);
    let unit = Select::new("Temperature unit:", units).with_starting_cursor(starting).prompt()?;
    cfg.unit = Some(unit);

    let timeout = CustomType::<u64>::new("HTTP timeout in seconds:")
        .with_default(cfg.timeout().as_secs())
        .prompt()?;
    cfg.timeout_secs = Some(timeout);

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn resolve_point(lat: Option<f64>, lon: Option<f64>, cfg: &Config) -> Result<GeoPoint> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
        (None, None) => Ok(cfg.location()),
        _ => bail!("--lat and --lon must be given together"),
    }
}

fn resolve_now(at: Option<&str>) -> Result<NaiveDateTime> {
    match at {
        Some(text) => NaiveDateTime::parse_from_str(text.trim(), AT_FORMAT)
            .with_context(|| format!("Invalid --at '{text}', expected \"YYYY-MM-DD HH:MM\"")),
        None => Ok(provider_now()),
    }
}
