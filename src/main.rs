//! Power forecast entry point: CLI wiring, history loading, and reporting.

use std::path::{Path, PathBuf};
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nb_power_forecast::config::ForecastConfig;
use nb_power_forecast::error::Result;
use nb_power_forecast::io::export::export_csv;
use nb_power_forecast::io::rates::load_rate_tables;
use nb_power_forecast::io::trend_csv::load_from_config;
use nb_power_forecast::model::{ModelBundle, build_model_bundle};
use nb_power_forecast::report::build_report;
use nb_power_forecast::synthetic::SyntheticHistory;
use nb_power_forecast::trend::TrendRepository;

/// Parsed CLI arguments.
struct CliArgs {
    year: Option<i32>,
    config_path: Option<String>,
    preset: Option<String>,
    data_dir: Option<PathBuf>,
    rates_dir: Option<PathBuf>,
    out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("nb-power-forecast: monthly power consumption forecast per zone");
    eprintln!();
    eprintln!("Usage: nb-power-forecast [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --year <i32>             Target year (default: report.target_year)");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ForecastConfig::PRESETS.join(", ")
    );
    eprintln!("  --data-dir <path>        Read NBTrend<year>.csv files from this directory");
    eprintln!("  --rates-dir <path>       Read penalty and plant rate tables from this directory");
    eprintln!("  --out <path>             Export the report to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after reporting");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without --data-dir, a seeded synthetic history is generated.");
    eprintln!("Set RUST_LOG to control log output (default: nb_power_forecast=info).");
}

/// Returns the value following flag `args[*i]`, advancing `i`.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {flag} requires {what}");
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        year: None,
        config_path: None,
        preset: None,
        data_dir: None,
        rates_dir: None,
        out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--year" => {
                let value = flag_value(&args, &mut i, "a year argument");
                if let Ok(y) = value.parse::<i32>() {
                    cli.year = Some(y);
                } else {
                    eprintln!("error: --year value \"{value}\" is not a valid year");
                    process::exit(1);
                }
            }
            "--config" => cli.config_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--data-dir" => {
                cli.data_dir = Some(PathBuf::from(flag_value(&args, &mut i, "a path argument")));
            }
            "--rates-dir" => {
                cli.rates_dir = Some(PathBuf::from(flag_value(&args, &mut i, "a path argument")));
            }
            "--out" => cli.out = Some(flag_value(&args, &mut i, "a path argument")),
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let value = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = value.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{value}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nb_power_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads history from CSV when a data directory is configured, otherwise
/// generates it, then attaches rate tables if a rates directory is set.
fn load_repository(config: &ForecastConfig) -> Result<TrendRepository> {
    let repository = if config.history.data_dir.is_some() {
        load_from_config(&config.history)?
    } else {
        info!(seed = config.synthetic.seed, "generating synthetic history");
        SyntheticHistory::new(config.synthetic.clone()).repository(&config.history)?
    };

    match config.rates.dir.as_deref() {
        Some(dir) => Ok(repository.with_rates(load_rate_tables(dir, &config.rates)?)),
        None => Ok(repository),
    }
}

fn build(config: &ForecastConfig) -> Result<ModelBundle> {
    let repository = load_repository(config)?;
    info!(
        baseline_year = repository.baseline_year(),
        years = repository.year_count(),
        zones = repository.zone_count(),
        rates = repository.rates().is_some(),
        "loaded history"
    );
    build_model_bundle(&repository, &config.model)
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then baseline default
    let mut config = if let Some(ref path) = cli.config_path {
        match ForecastConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ForecastConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ForecastConfig::baseline()
    };

    // Apply overrides
    if let Some(year) = cli.year {
        config.report.target_year = year;
    }
    if cli.data_dir.is_some() {
        config.history.data_dir = cli.data_dir;
    }
    if cli.rates_dir.is_some() {
        config.rates.dir = cli.rates_dir;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let bundle = match build(&config) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!(error = %e, "failed to build model");
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let report = match build_report(&bundle, config.report.target_year) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    println!("{report}");

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&report, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "report written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(nb_power_forecast::api::AppState::new(bundle));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(nb_power_forecast::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
