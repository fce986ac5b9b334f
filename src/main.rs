use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use itinorm::classify::ExpansionState;
use itinorm::clock::{Clock, FixedClock, SystemClock};
use itinorm::config::Settings;
use itinorm::currency::{self, RateTable};
use itinorm::record::{DEFAULT_CURRENCY, DEFAULT_TIMEZONE, TripData};
use itinorm::source::{ContentSource, FileSource, SourceError};
use itinorm::view::{Tab, View};
use itinorm::{AccessGate, dashboard, logging, output, trip};

const SETUP_GUIDE: &str = "\
The trip source is not configured.

  1. Export the trip database query result to a JSON file.
  2. Point ITINORM_SOURCE_PATH (or [source] path in config/itinorm.toml) at it.
  3. Optionally set ITINORM_SOURCE_PRESET to notion, json or jsonl.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Trip export, overriding the configured source path
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    #[arg(short, long, global = true)]
    preset: Option<String>,

    /// Pin "now" to a wall-clock time in this machine's timezone
    /// (`YYYY-MM-DD` or `YYYY-MM-DD HH:mm`)
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one dashboard tab
    Show {
        #[arg(short, long, value_enum, default_value = "home")]
        tab: Tab,

        /// Custom projection (`all`, `hotel`, `transport`, `visit-group`, `only:<category>`)
        #[arg(long, conflicts_with = "tab")]
        view: Option<View>,

        #[arg(short, long, default_value = "stdout")]
        output: String,

        /// Keep records whose date could not be read
        #[arg(long)]
        include_undated: bool,

        /// Session cookie value from `login`
        #[arg(long, env = "ITINORM_SESSION")]
        session: Option<String>,
    },
    /// Check the trip password and issue a session cookie
    Login {
        password: String,
    },
    /// Convert an amount in the trip currency to the home currency
    Convert {
        amount: f64,

        /// Trip currency code; defaults to the trip's own
        #[arg(long)]
        currency: Option<String>,
    },
    /// Show the trip-local time
    Clock {
        /// Declared offset such as `GMT+9`; defaults to the trip's own
        #[arg(long)]
        timezone: Option<String>,
    },
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("expected YYYY-MM-DD or YYYY-MM-DD HH:mm, got {:?}", raw))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(path) = &args.source {
        settings.source.path = Some(path.clone());
    }
    if let Some(preset) = &args.preset {
        settings.source.preset = preset.clone();
    }

    // The clock is read once here and handed down as a value.
    let clock: Box<dyn Clock> = match args.now {
        Some(at) => Box::new(FixedClock::new(at)),
        None => Box::new(SystemClock),
    };

    let source = FileSource::new(settings.source.path.clone(), settings.source.preset.clone());

    match args.command {
        Command::Show {
            tab,
            view,
            output,
            include_undated,
            session,
        } => {
            let Some(trip) = load_trip(&source)? else {
                eprintln!("{}", SETUP_GUIDE);
                return Ok(ExitCode::from(2));
            };
            let gate = gate_for(&settings, &trip);
            if gate.is_configured() {
                let now_utc = clock.now_utc();
                let ok = session.as_deref().is_some_and(|s| gate.validate(s, now_utc));
                if !ok {
                    return Err(anyhow!("access denied: run `itinorm login <password>` first"));
                }
            }

            let now = clock.now_local();
            let view = view.or_else(|| tab.view());
            let mut expansion = ExpansionState::new();
            let dash = dashboard::render(&trip, view, now, &mut expansion, include_undated);

            let mut writer = output::create_writer(&output)?;
            writer.write_dashboard(&dash)?;
            writer.finish()?;
        }
        Command::Login { password } => {
            // The source may carry the password row; a missing source is fine
            // when the password comes from settings.
            let trip = match source.fetch() {
                Ok(trip) => trip,
                Err(SourceError::NotConfigured { .. }) => TripData::default(),
                Err(err) => return Err(err.into()),
            };
            let gate = gate_for(&settings, &trip);
            let session = gate.login(&password, clock.now_utc())?;
            println!("{}", session.value);
            eprintln!(
                "Set-Cookie: {}",
                session.cookie_header(settings.access.secure_cookie)
            );
        }
        Command::Convert { amount, currency } => {
            let code = match currency {
                Some(code) => code,
                None => trip_or_default(&source).metadata.currency,
            };
            let table = settings
                .currency
                .rates_path
                .as_deref()
                .and_then(|path| match RateTable::load(path) {
                    Ok(table) => Some(table),
                    Err(err) => {
                        tracing::warn!(error = %err, "rates file unusable");
                        None
                    }
                });
            let home = &settings.currency.home;
            let rate = currency::resolve_rate(&code, home, table.as_ref());
            let converted = currency::convert(amount, rate)?;
            println!(
                "{} {} ≈ {} {} (1 {} ≈ {} {})",
                amount, code, converted, home, code, rate.value, home
            );
        }
        Command::Clock { timezone } => {
            let declared = match timezone {
                Some(tz) => tz,
                None => trip_or_default(&source).metadata.timezone,
            };
            let local = trip::trip_local_time(clock.now_utc(), &declared)
                .with_context(|| format!("unrecognized timezone {:?}", declared))?;
            println!("{} ({})", local.format("%Y-%m-%d %H:%M"), declared);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// `None` when no source is configured.
fn load_trip(source: &dyn ContentSource) -> Result<Option<TripData>> {
    match source.fetch() {
        Ok(trip) => Ok(Some(trip)),
        Err(SourceError::NotConfigured { reason }) => {
            tracing::debug!(%reason, "no source");
            Ok(None)
        }
        Err(err) => Err(err).context("loading trip"),
    }
}

/// Trip metadata when available, defaults otherwise.
fn trip_or_default(source: &dyn ContentSource) -> TripData {
    source.fetch().unwrap_or_else(|err| {
        tracing::debug!(
            error = %err,
            currency = DEFAULT_CURRENCY,
            timezone = DEFAULT_TIMEZONE,
            "using default trip metadata"
        );
        TripData::default()
    })
}

/// Settings win over a password row in the source.
fn gate_for(settings: &Settings, trip: &TripData) -> AccessGate {
    AccessGate::new(
        settings
            .access
            .password
            .clone()
            .or_else(|| trip.password.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_none_not_error() {
        let source = FileSource::new(None, "notion");
        assert!(load_trip(&source).unwrap().is_none());
    }

    #[test]
    fn now_accepts_date_or_minute() {
        assert_eq!(parse_now("2026-01-02").unwrap().to_string(), "2026-01-02 00:00:00");
        assert_eq!(parse_now("2026-01-02 09:30").unwrap().to_string(), "2026-01-02 09:30:00");
        assert!(parse_now("tomorrow").is_err());
    }
}
