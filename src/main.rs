use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use loadwatch::config::AppConfig;
use loadwatch::logging::init_logging;
use loadwatch::report::{summarize_athlete, summarize_days, summarize_week, AthleteWeekSummary};
use loadwatch::week::parse_iso_date;
use loadwatch::{DataBundle, LoadwatchError, LogLevel, StrainZone, WeekWindow};

/// Loadwatch - Athlete Training Load & Wellness CLI
///
/// Weekly training load, monotony, strain and wellness alerts computed from
/// session RPE and daily wellness questionnaires.
#[derive(Parser)]
#[command(name = "loadwatch")]
#[command(author = "Loadwatch Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Athlete training load and wellness monitoring", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one athlete's week day by day
    Week {
        /// Data bundle (JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Athlete ID
        #[arg(short, long)]
        athlete: Option<String>,

        /// Any date inside the week (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Staff view: strain zone and alerts for every athlete
    Alerts {
        /// Data bundle (JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Any date inside the week (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration settings
    Config {
        /// List all configuration values
        #[arg(short, long)]
        list: bool,

        /// Set configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get configuration value
        #[arg(short, long)]
        get: Option<String>,

        /// Restore default alert thresholds
        #[arg(long)]
        reset_thresholds: bool,
    },
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Sessions")]
    sessions: usize,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Health")]
    health: u8,
    #[tabled(rename = "Sleep")]
    sleep: String,
    #[tabled(rename = "Alerts")]
    alerts: String,
}

#[derive(Tabled)]
struct AthleteRow {
    #[tabled(rename = "Athlete")]
    name: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Monotony")]
    monotony: String,
    #[tabled(rename = "Strain")]
    strain: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Health")]
    health: u8,
    #[tabled(rename = "Flags")]
    flags: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    // Set up logging based on config and verbosity
    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(cli.verbose, log_config.level);
    init_logging(&log_config)?;

    if cli.verbose > 0 {
        eprintln!(
            "{}",
            format!("Log level: {}", log_config.level.to_filter()).dimmed()
        );
    }

    match cli.command {
        Commands::Week {
            data,
            athlete,
            date,
            json,
        } => {
            let bundle = load_bundle(data, &config)?;
            let athlete = athlete
                .or_else(|| config.settings.default_athlete.clone())
                .ok_or_else(|| {
                    anyhow!("No athlete given: pass --athlete or set settings.default_athlete")
                })?;
            bundle.require_athlete(&athlete)?;

            let thresholds = bundle.effective_thresholds(&config.thresholds);
            let week = WeekWindow::containing(resolve_date(date.as_deref())?);
            let record = bundle.record(&athlete);
            let summary = summarize_athlete(
                &athlete,
                &bundle.display_name(&athlete),
                record,
                week,
                &thresholds,
            );
            let days = summarize_days(record, week, &summary.baseline, &thresholds);

            if json {
                let output = serde_json::json!({ "summary": summary, "days": days });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!(
                "{}",
                format!("{} · week {}", summary.name, summary.week)
                    .blue()
                    .bold()
            );

            let rows: Vec<DayRow> = days
                .iter()
                .map(|day| DayRow {
                    date: day.date.format("%a %Y-%m-%d").to_string(),
                    sessions: day.session_count,
                    load: format!("{:.0}", day.load),
                    health: day.health_score,
                    sleep: day
                        .wellness
                        .sleep_quality
                        .map(|v| format!("{:.0}", v))
                        .unwrap_or_else(|| "—".to_string()),
                    alerts: loadwatch::alerts::flag_summary(&day.alerts),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            print_week_metrics(&summary, thresholds.baseline_weeks);
        }

        Commands::Alerts { data, date, json } => {
            let bundle = load_bundle(data, &config)?;
            let thresholds = bundle.effective_thresholds(&config.thresholds);
            let anchor = resolve_date(date.as_deref())?;
            let summaries = summarize_week(&bundle, anchor, &thresholds);

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            println!(
                "{}",
                format!("Team alerts · week {}", WeekWindow::containing(anchor))
                    .cyan()
                    .bold()
            );

            if summaries.is_empty() {
                println!("No athletes in the data file.");
                return Ok(());
            }

            let rows: Vec<AthleteRow> = summaries
                .iter()
                .map(|s| AthleteRow {
                    name: s.name.clone(),
                    load: format!("{:.0}", s.metrics.total_load),
                    monotony: format!("{:.2}", s.metrics.monotony),
                    strain: format!("{:.0}", s.metrics.strain),
                    zone: s.alerts.zone.as_str().to_string(),
                    health: s.metrics.mean_health,
                    flags: s.alerts.summary(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            for zone in [StrainZone::Red, StrainZone::Amber] {
                let count = summaries.iter().filter(|s| s.alerts.zone == zone).count();
                if count > 0 {
                    println!(
                        "{}",
                        zone_colored(zone, &format!("{} athlete(s) in {} zone", count, zone))
                    );
                }
            }
            let flagged = summaries
                .iter()
                .filter(|s| !s.alerts.flags.is_empty())
                .count();
            if flagged > 0 {
                println!(
                    "{}",
                    format!("{} athlete(s) with wellness flags", flagged).yellow()
                );
            }
        }

        Commands::Config {
            list,
            set,
            get,
            reset_thresholds,
        } => {
            if list {
                println!("{}", "Configuration:".white().bold());
                println!("  {}", format!("file: {}", config_path.display()).dimmed());
                for key in AppConfig::keys() {
                    let value = config.get_value(&key)?;
                    println!("  {} = {}", key, value);
                }
            } else if let Some(key) = get {
                println!("{}", config.get_value(&key)?);
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", key_value))?;
                config.set_value(key.trim(), value)?;
                config.save_to_file(&config_path)?;
                println!(
                    "{}",
                    format!("✓ {} = {}", key.trim(), config.get_value(key.trim())?).green()
                );
            } else if reset_thresholds {
                config.reset_thresholds();
                config.save_to_file(&config_path)?;
                println!("{}", "✓ Thresholds restored to defaults".green());
            } else {
                bail!("Nothing to do: pass --list, --get KEY, --set KEY=VALUE or --reset-thresholds");
            }
        }
    }

    Ok(())
}

fn load_bundle(data: Option<PathBuf>, config: &AppConfig) -> Result<DataBundle> {
    let path = data
        .or_else(|| config.settings.default_data_file.clone())
        .ok_or_else(|| {
            anyhow!("No data file given: pass --data or set settings.default_data_file")
        })?;
    let bundle = DataBundle::load_from_file(&path)
        .with_context(|| format!("Failed to load data bundle {}", path.display()))?;
    Ok(bundle)
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(value) => Ok(parse_iso_date(value)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn print_week_metrics(summary: &AthleteWeekSummary, baseline_weeks: u32) {
    let metrics = &summary.metrics;
    let zone = summary.alerts.zone;

    println!("{}", "Week".bold());
    println!("  Total load:   {:.0}", metrics.total_load);
    println!("  Monotony:     {:.2}", metrics.monotony);
    println!(
        "  Strain:       {:.0} {}",
        metrics.strain,
        zone_colored(zone, &format!("[{}] {}", zone, zone.description()))
    );
    println!("  Mean health:  {}", metrics.mean_health);

    println!("{}", format!("Baseline (previous {} weeks)", baseline_weeks).bold());
    println!(
        "  Sleep quality:  {} (week {:.1})",
        optional(summary.baseline.sleep_quality),
        metrics.sleep_quality_mean
    );
    println!(
        "  Symptoms:       {} (week {:.1})",
        optional(summary.baseline.symptom_burden),
        metrics.symptom_burden_mean
    );
    println!(
        "  Sleep hours:    {} (week {:.1})",
        optional(summary.baseline.sleep_duration),
        metrics.sleep_duration_mean
    );

    if summary.alerts.flags.is_empty() {
        println!("{}", "✓ No wellness alerts".green());
    } else {
        println!("{} {}", "Alerts:".yellow().bold(), summary.alerts.summary());
    }
}

fn optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "—".to_string())
}

fn zone_colored(zone: StrainZone, text: &str) -> ColoredString {
    match zone {
        StrainZone::Green => text.green(),
        StrainZone::Amber => text.yellow(),
        StrainZone::Red => text.red().bold(),
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<LoadwatchError>() {
        Some(e) => {
            match e.severity().to_tracing_level() {
                tracing::Level::ERROR => tracing::error!(error = %e, "command failed"),
                _ => tracing::warn!(error = %e, "command failed"),
            }
            eprintln!("{} {}", "Error:".red().bold(), e.user_message());
        }
        None => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }
}
