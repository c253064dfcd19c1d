//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::browser;
use crate::adapters::chart_svg::SvgChartAdapter;
use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::finnhub_adapter::FinnhubAdapter;
use crate::adapters::fmp_adapter::FmpAdapter;
use crate::adapters::html_report::{self, HtmlReportAdapter};
use crate::adapters::yahoo_history_adapter::YahooHistoryAdapter;
use crate::domain::config_validation::validate_scan_config;
use crate::domain::error::HhhlError;
use crate::domain::report::DEFAULT_REPORT_TITLE;
use crate::domain::scan::{self, ScanPorts};
use crate::domain::screen::{
    DEFAULT_EXCHANGE, DEFAULT_LISTING_WINDOW_YEARS, DEFAULT_MAX_PRICE, DEFAULT_SYMBOLS_LIMIT,
    ScreenCriteria,
};
use crate::domain::trend::{TREND_WINDOW, assess_trend};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

/// Library targets kept at `warn` unless `RUST_LOG` says otherwise.
pub const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

pub const DEFAULT_OUTPUT_DIR: &str = "result";

#[derive(Parser, Debug)]
#[command(
    name = "hhhl",
    version,
    about = "Find cheap, recently listed stocks making higher highs and higher lows"
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen an exchange, detect uptrends and write the HTML report
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Directory the report is written to
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not open the report in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// List the symbols traded on an exchange
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the trend assessment for one symbol
    Trend {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// An API key and where it may come from.
#[derive(Debug, Clone, Copy)]
pub struct Credential {
    pub provider: &'static str,
    pub key: &'static str,
    pub env_var: &'static str,
}

pub const FINNHUB_CREDENTIAL: Credential = Credential {
    provider: "Finnhub",
    key: "finnhub_api_key",
    env_var: "FINNHUB_API_KEY",
};

pub const FMP_CREDENTIAL: Credential = Credential {
    provider: "FMP",
    key: "fmp_api_key",
    env_var: "FMP_API_KEY",
};

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub open_browser: bool,
    pub title: String,
    pub template_path: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            limit,
            exchange,
            max_price,
            output,
            no_open,
        } => run_scan(
            config.as_ref(),
            limit.map(|l| l as usize),
            exchange.as_deref(),
            max_price,
            output.as_ref(),
            no_open,
        ),
        Command::ListSymbols {
            config,
            exchange,
            limit,
        } => run_list_symbols(config.as_ref(), exchange.as_deref(), limit),
        Command::Trend { symbol, config } => run_trend(&symbol, config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Directives used when `RUST_LOG` is unset.
pub fn default_log_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = format!("hhhl={level}");
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directives(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = HhhlError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Without a path every setting falls back to its default.
pub fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Config file first, then the environment. Blank values count as missing.
pub fn resolve_credential(
    config: &dyn ConfigPort,
    credential: &Credential,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, HhhlError> {
    config
        .get_string("api", credential.key)
        .or_else(|| env(credential.env_var).filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
        .ok_or_else(|| HhhlError::MissingCredential {
            provider: credential.provider.into(),
            key: credential.key.into(),
            env_var: credential.env_var.into(),
        })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub fn build_screen_criteria(config: &dyn ConfigPort, as_of: NaiveDate) -> ScreenCriteria {
    ScreenCriteria {
        exchange: config
            .get_string("screen", "exchange")
            .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
        limit: config
            .get_int("screen", "symbols_limit", DEFAULT_SYMBOLS_LIMIT as i64)
            .max(0) as usize,
        max_price: config.get_double("screen", "max_price", DEFAULT_MAX_PRICE),
        listing_window_years: config
            .get_int(
                "screen",
                "listing_window_years",
                DEFAULT_LISTING_WINDOW_YEARS as i64,
            )
            .clamp(0, u32::MAX as i64) as u32,
        excluded_sectors: config
            .get_list("screen", "excluded_sectors")
            .into_iter()
            .collect(),
        as_of,
    }
}

/// Command-line values win over the config file.
pub fn apply_overrides(
    mut criteria: ScreenCriteria,
    limit: Option<usize>,
    exchange: Option<&str>,
    max_price: Option<f64>,
) -> Result<ScreenCriteria, HhhlError> {
    if let Some(limit) = limit {
        criteria.limit = limit;
    }
    if let Some(exchange) = exchange {
        criteria.exchange = exchange.to_string();
    }
    if let Some(max_price) = max_price {
        if !(max_price.is_finite() && max_price > 0.0) {
            return Err(HhhlError::invalid(
                "screen",
                "max_price",
                format!("must be a positive number, got {max_price}"),
            ));
        }
        criteria.max_price = max_price;
    }
    Ok(criteria)
}

pub fn build_history_port(config: &dyn ConfigPort) -> Result<Box<dyn HistoryPort>, HhhlError> {
    let source = config
        .get_string("history", "source")
        .unwrap_or_else(|| "yahoo".to_string());
    match source.to_lowercase().as_str() {
        "yahoo" => Ok(Box::new(YahooHistoryAdapter::new(
            config.get_string("api", "yahoo_base_url"),
        )?)),
        "csv" => {
            let dir = config
                .get_string("history", "csv_dir")
                .ok_or_else(|| HhhlError::ConfigMissing {
                    section: "history".into(),
                    key: "csv_dir".into(),
                })?;
            Ok(Box::new(CsvHistoryAdapter::new(PathBuf::from(dir))))
        }
        other => Err(HhhlError::invalid(
            "history",
            "source",
            format!("unknown source '{other}'"),
        )),
    }
}

/// `result` next to the running executable.
pub fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_OUTPUT_DIR)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

pub fn build_report_settings(
    config: &dyn ConfigPort,
    output_override: Option<&PathBuf>,
    no_open: bool,
) -> ReportSettings {
    let output_dir = output_override
        .cloned()
        .or_else(|| config.get_string("report", "output_dir").map(PathBuf::from))
        .unwrap_or_else(default_output_dir);

    ReportSettings {
        output_dir,
        open_browser: !no_open && config.get_bool("report", "open_browser", true),
        title: config
            .get_string("report", "title")
            .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
        template_path: config.get_string("report", "template_path").map(PathBuf::from),
    }
}

fn run_scan(
    config_path: Option<&PathBuf>,
    limit: Option<usize>,
    exchange: Option<&str>,
    max_price: Option<f64>,
    output: Option<&PathBuf>,
    no_open: bool,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = validate_scan_config(&config)
        .and_then(|()| {
            let criteria = build_screen_criteria(&config, Local::now().date_naive());
            apply_overrides(criteria, limit, exchange, max_price)
        })
        .and_then(|criteria| {
            let finnhub_key = resolve_credential(&config, &FINNHUB_CREDENTIAL, env_var)?;
            let fmp_key = resolve_credential(&config, &FMP_CREDENTIAL, env_var)?;

            let market = FinnhubAdapter::new(finnhub_key, config.get_string("api", "finnhub_base_url"))?;
            let details = FmpAdapter::new(fmp_key, config.get_string("api", "fmp_base_url"))?;
            let history = build_history_port(&config)?;
            let chart = SvgChartAdapter::new();

            let ports = ScanPorts {
                market: &market,
                details: &details,
                history: history.as_ref(),
                chart: &chart,
            };
            let settings = build_report_settings(&config, output, no_open);
            run_scan_pipeline(&ports, &criteria, &settings, Local::now().naive_local())
        });

    match result {
        Ok(path) => {
            eprintln!("\nReport written to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Screens, collects uptrends and writes the report. Returns the report path.
pub fn run_scan_pipeline(
    ports: &ScanPorts,
    criteria: &ScreenCriteria,
    settings: &ReportSettings,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, HhhlError> {
    info!(
        exchange = %criteria.exchange,
        limit = criteria.limit,
        max_price = criteria.max_price,
        listed_after = %criteria.listing_cutoff(),
        "starting scan"
    );

    let summary = scan::run(ports, criteria, &settings.title, generated_at)?;

    eprintln!("\n=== Scan Summary ===");
    eprintln!("Examined:         {}", summary.outcome.examined);
    eprintln!("Passed screen:    {}", summary.outcome.accepted.len());
    eprintln!("Skipped:          {}", summary.outcome.skipped.len());
    eprintln!("In an uptrend:    {}", summary.report.len());
    for entry in summary.report.entries() {
        eprintln!("  {}:  {} ${}", entry.ticker, entry.exchange, entry.price);
    }

    let adapter = match &settings.template_path {
        Some(path) => HtmlReportAdapter::with_template_file(path)?,
        None => HtmlReportAdapter::new(),
    };
    let path = html_report::report_path(&settings.output_dir, &summary.report);
    adapter.write(&summary.report, &path)?;
    info!(path = %path.display(), entries = summary.report.len(), "report written");

    if settings.open_browser {
        if let Err(e) = browser::open_in_browser(&path) {
            warn!(path = %path.display(), "could not open report in browser: {e}");
        }
    }

    Ok(path)
}

fn run_list_symbols(
    config_path: Option<&PathBuf>,
    exchange: Option<&str>,
    limit: Option<usize>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let exchange = exchange
        .map(str::to_string)
        .or_else(|| config.get_string("screen", "exchange"))
        .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string());

    let result = resolve_credential(&config, &FINNHUB_CREDENTIAL, env_var)
        .and_then(|key| FinnhubAdapter::new(key, config.get_string("api", "finnhub_base_url")))
        .and_then(|market| market.list_symbols(&exchange));

    match result {
        Ok(symbols) => {
            let shown = limit.unwrap_or(symbols.len());
            for candidate in symbols.iter().take(shown) {
                println!("{}\t{}", candidate.symbol, candidate.description);
            }
            eprintln!(
                "{} of {} symbols on {}",
                shown.min(symbols.len()),
                symbols.len(),
                exchange
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_trend(symbol: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = build_history_port(&config).and_then(|history| history.fetch_history(symbol));
    let series = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if series.len() < TREND_WINDOW {
        let err = HhhlError::InsufficientData {
            symbol: symbol.to_string(),
            bars: series.len(),
            minimum: TREND_WINDOW,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    let trend = assess_trend(&series);
    println!("Symbol:        {}", series.symbol);
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        println!("History:       {} bars, {} to {}", series.len(), first, last);
    }
    println!("Window:        last {} bars", trend.window);
    println!("Higher highs:  {}", trend.higher_highs);
    println!("Higher lows:   {}", trend.higher_lows);
    println!(
        "Uptrend:       {}",
        if trend.is_uptrend { "yes" } else { "no" }
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&config) {
        eprintln!("  error: {e}");
        return (&e).into();
    }

    let criteria = build_screen_criteria(&config, Local::now().date_naive());
    eprintln!("\nScreen:");
    eprintln!("  Exchange:       {}", criteria.exchange);
    eprintln!("  Symbols limit:  {}", criteria.limit);
    eprintln!("  Max price:      {}", criteria.max_price);
    eprintln!(
        "  Listed after:   {} ({} years)",
        criteria.listing_cutoff(),
        criteria.listing_window_years
    );
    if !criteria.excluded_sectors.is_empty() {
        let sectors: Vec<&str> = criteria.excluded_sectors.iter().map(String::as_str).collect();
        eprintln!("  Excluded:       {}", sectors.join(", "));
    }

    for credential in [FINNHUB_CREDENTIAL, FMP_CREDENTIAL] {
        if let Err(e) = resolve_credential(&config, &credential, env_var) {
            eprintln!("  warning: {e}");
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
