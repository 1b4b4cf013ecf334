//! CLI definition and dispatch.
//!
//! Every command prints one JSON document: the result on success, or
//! `{"error": "..."}` with a non-zero exit code on failure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::analysis::{analyze, summarize};
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{
    build_data_path, build_indicator_spec, build_initial_capital, build_log_level, build_period,
    build_strategy, validate_config,
};
use crate::domain::error::StockerError;
use crate::domain::indicator::{compute_indicators, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::period::Period;
use crate::domain::risk::score_risk;
use crate::domain::strategy::{StrategyConfig, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{Report, ReportPort};

#[derive(Parser, Debug)]
#[command(
    name = "stocker",
    about = "Technical indicators, strategy backtests and risk scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every per-symbol command.
#[derive(Args, Debug, Clone)]
pub struct SymbolArgs {
    #[arg(long)]
    pub symbol: String,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory of <SYMBOL>.csv files (overrides [data] path)
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// 1mo, 3mo, 6mo, 1y, 2y, 5y or max (overrides [data] period)
    #[arg(long)]
    pub period: Option<String>,
    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Crossover,
    Threshold,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Latest indicator values for a symbol
    Indicators {
        #[command(flatten)]
        args: SymbolArgs,
    },
    /// Backtest a strategy over a symbol's history
    Backtest {
        #[command(flatten)]
        args: SymbolArgs,
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,
        #[arg(long)]
        short: Option<usize>,
        #[arg(long)]
        long: Option<usize>,
        #[arg(long)]
        oversold: Option<f64>,
        #[arg(long)]
        overbought: Option<f64>,
        #[arg(long)]
        capital: Option<f64>,
        /// Pick a strategy preset from a free-text description
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Rule-based risk score from the latest indicators
    Risk {
        #[command(flatten)]
        args: SymbolArgs,
    },
    /// Indicators, risk and a heuristic recommendation
    Analyze {
        #[command(flatten)]
        args: SymbolArgs,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Indicators { args }
            | Command::Backtest { args, .. }
            | Command::Risk { args }
            | Command::Analyze { args } => args.config.as_deref(),
            Command::ListSymbols { config, .. } => config.as_deref(),
            Command::Validate { config } => Some(config.as_path()),
        }
    }

    fn data_override(&self) -> Option<&Path> {
        match self {
            Command::Indicators { args }
            | Command::Backtest { args, .. }
            | Command::Risk { args }
            | Command::Analyze { args } => args.data.as_deref(),
            Command::ListSymbols { data, .. } => data.as_deref(),
            Command::Validate { .. } => None,
        }
    }

    fn output_path(&self) -> Option<&Path> {
        match self {
            Command::Indicators { args }
            | Command::Backtest { args, .. }
            | Command::Risk { args }
            | Command::Analyze { args } => args.output.as_deref(),
            Command::ListSymbols { .. } | Command::Validate { .. } => None,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let reporter = match cli.command.output_path() {
        Some(path) => JsonReportAdapter::to_file(path.to_path_buf()),
        None => JsonReportAdapter::stdout(),
    };

    let (report, code) = match execute(&cli.command) {
        Ok(report) => (report, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            (Report::from(&e), ExitCode::from(&e))
        }
    };

    if let Err(e) = reporter.write(&report) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }
    code
}

/// Load the INI file at `path`, or an empty configuration when absent.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, StockerError> {
    match path {
        Some(path) => FileConfigAdapter::from_file(path),
        None => FileConfigAdapter::from_string(""),
    }
}

/// Log level for the subscriber installed before any command runs.
///
/// Falls back to the default when the configuration failed to load or names
/// an unknown level, so that failure is still logged.
pub fn startup_log_level(config: Option<&dyn ConfigPort>) -> String {
    config
        .and_then(|c| build_log_level(c).ok())
        .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string())
}

/// Load configuration, start logging and run `command` against CSV data.
pub fn execute(command: &Command) -> Result<Report, StockerError> {
    let loaded = load_config(command.config_path());
    logging::init(&startup_log_level(
        loaded.as_ref().ok().map(|c| c as &dyn ConfigPort),
    ));
    let config = loaded?;

    if let Some(path) = command.config_path() {
        tracing::info!(config = %path.display(), "loaded configuration");
    }

    let data_path = command
        .data_override()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| build_data_path(&config));
    let data_port = CsvAdapter::new(data_path);

    dispatch(command, &config, &data_port)
}

/// Run `command` with explicit configuration and data sources.
pub fn dispatch(
    command: &Command,
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Report, StockerError> {
    validate_config(config)?;

    match command {
        Command::Indicators { args } => {
            let series = fetch_series(args, config, data_port)?;
            let spec = build_indicator_spec(config)?;
            Ok(Report::Indicators(summarize(&series, &spec)?))
        }
        Command::Backtest {
            args,
            strategy,
            short,
            long,
            oversold,
            overbought,
            capital,
            prompt,
        } => {
            let base = match prompt {
                Some(text) => StrategyConfig::from_prompt(text),
                None => build_strategy(config)?,
            };
            let strategy = resolve_strategy(
                base,
                *strategy,
                StrategyOverrides {
                    short: *short,
                    long: *long,
                    oversold: *oversold,
                    overbought: *overbought,
                },
            )?;
            let initial_capital = match capital {
                Some(c) => *c,
                None => build_initial_capital(config)?,
            };

            let series = fetch_series(args, config, data_port)?;
            tracing::info!(
                symbol = %series.symbol,
                strategy = %strategy.describe(),
                initial_capital,
                "running backtest"
            );
            let result = run_backtest(&series, &strategy, initial_capital)?;
            tracing::info!(
                trades = result.metrics.trade_count,
                final_balance = result.final_balance,
                return_pct = result.metrics.return_pct,
                "backtest finished"
            );
            Ok(Report::Backtest(Box::new(result)))
        }
        Command::Risk { args } => {
            let series = fetch_series(args, config, data_port)?;
            let spec = build_indicator_spec(config)?;
            let indicators = compute_indicators(&series, &spec)?;
            let assessment = score_risk(indicators.snapshot().as_ref());
            tracing::info!(symbol = %series.symbol, rating = %assessment.rating, "risk scored");
            Ok(Report::Risk(assessment))
        }
        Command::Analyze { args } => {
            let series = fetch_series(args, config, data_port)?;
            let spec = build_indicator_spec(config)?;
            let analysis = analyze(&series, &spec)?;
            tracing::info!(
                symbol = %series.symbol,
                recommendation = %analysis.recommendation,
                "analysis complete"
            );
            Ok(Report::Analysis(Box::new(analysis)))
        }
        Command::ListSymbols { .. } => {
            let symbols = data_port.list_symbols()?;
            tracing::info!(count = symbols.len(), "listed symbols");
            Ok(Report::Symbols { symbols })
        }
        Command::Validate { .. } => {
            let strategy = build_strategy(config)?;
            Ok(Report::Config {
                valid: true,
                description: strategy.describe(),
                strategy,
                indicators: build_indicator_spec(config)?,
                period: build_period(config)?.to_string(),
                initial_capital: build_initial_capital(config)?,
            })
        }
    }
}

/// Period from the command line, else from `[data] period`.
pub fn resolve_period(args: &SymbolArgs, config: &dyn ConfigPort) -> Result<Period, StockerError> {
    match &args.period {
        Some(raw) => raw.parse(),
        None => build_period(config),
    }
}

fn fetch_series(
    args: &SymbolArgs,
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<PriceSeries, StockerError> {
    let symbol = args.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(StockerError::invalid_input("symbol must not be empty"));
    }
    let period = resolve_period(args, config)?;
    tracing::info!(symbol = %symbol, period = %period, "fetching price series");
    data_port.fetch_series(&symbol, period)
}

/// Command-line parameter overrides for a strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyOverrides {
    pub short: Option<usize>,
    pub long: Option<usize>,
    pub oversold: Option<f64>,
    pub overbought: Option<f64>,
}

/// Apply `kind` and parameter overrides on top of `base`.
///
/// Switching kind starts from that kind's defaults. Parameters for the other
/// kind are rejected.
pub fn resolve_strategy(
    base: StrategyConfig,
    kind: Option<StrategyKind>,
    overrides: StrategyOverrides,
) -> Result<StrategyConfig, StockerError> {
    let kind = kind.unwrap_or(match base {
        StrategyConfig::Crossover { .. } => StrategyKind::Crossover,
        StrategyConfig::Threshold { .. } => StrategyKind::Threshold,
    });

    let strategy = match kind {
        StrategyKind::Crossover => {
            if overrides.oversold.is_some() || overrides.overbought.is_some() {
                return Err(StockerError::invalid_strategy(
                    "--oversold/--overbought only apply to the threshold strategy",
                ));
            }
            let (short, long) = match base {
                StrategyConfig::Crossover {
                    short_window,
                    long_window,
                } => (short_window, long_window),
                StrategyConfig::Threshold { .. } => (DEFAULT_SHORT_WINDOW, DEFAULT_LONG_WINDOW),
            };
            StrategyConfig::Crossover {
                short_window: overrides.short.unwrap_or(short),
                long_window: overrides.long.unwrap_or(long),
            }
        }
        StrategyKind::Threshold => {
            if overrides.short.is_some() || overrides.long.is_some() {
                return Err(StockerError::invalid_strategy(
                    "--short/--long only apply to the crossover strategy",
                ));
            }
            let (low, high) = match base {
                StrategyConfig::Threshold {
                    oversold,
                    overbought,
                } => (oversold, overbought),
                StrategyConfig::Crossover { .. } => (DEFAULT_OVERSOLD, DEFAULT_OVERBOUGHT),
            };
            StrategyConfig::Threshold {
                oversold: overrides.oversold.unwrap_or(low),
                overbought: overrides.overbought.unwrap_or(high),
            }
        }
    };

    strategy.validate()?;
    Ok(strategy)
}
