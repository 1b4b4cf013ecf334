//! Configuration validation and typed builders.
//!
//! Every key is optional; present keys must parse and be in range. Builders
//! fall back to the domain defaults for absent keys.

use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::backtest::DEFAULT_INITIAL_CAPITAL;
use crate::domain::error::StockerError;
use crate::domain::indicator::{IndicatorSpec, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::period::Period;
use crate::domain::strategy::{StrategyConfig, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_PATH: &str = "./data";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockerError> {
    build_period(config)?;
    build_initial_capital(config)?;
    build_strategy(config)?;
    build_indicator_spec(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StockerError {
    StockerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Parse `[section] key` when present; blank values count as absent.
fn parse_key<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, StockerError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("cannot parse '{}'", raw.trim()))),
        _ => Ok(None),
    }
}

pub fn build_data_path(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "path")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn build_period(config: &dyn ConfigPort) -> Result<Period, StockerError> {
    match config.get_string("data", "period") {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|e: StockerError| invalid("data", "period", e.to_string())),
        _ => Ok(Period::default()),
    }
}

pub fn build_initial_capital(config: &dyn ConfigPort) -> Result<f64, StockerError> {
    let value = parse_key::<f64>(config, "backtest", "initial_capital")?
        .unwrap_or(DEFAULT_INITIAL_CAPITAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(value)
}

pub fn build_strategy(config: &dyn ConfigPort) -> Result<StrategyConfig, StockerError> {
    let kind = config
        .get_string("strategy", "kind")
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| "crossover".to_string());

    let strategy = match kind.as_str() {
        "crossover" | "ma_crossover" => StrategyConfig::Crossover {
            short_window: parse_key(config, "strategy", "short_window")?
                .unwrap_or(DEFAULT_SHORT_WINDOW),
            long_window: parse_key(config, "strategy", "long_window")?
                .unwrap_or(DEFAULT_LONG_WINDOW),
        },
        "threshold" | "rsi" => StrategyConfig::Threshold {
            oversold: parse_key(config, "strategy", "oversold")?.unwrap_or(DEFAULT_OVERSOLD),
            overbought: parse_key(config, "strategy", "overbought")?.unwrap_or(DEFAULT_OVERBOUGHT),
        },
        other => {
            return Err(invalid(
                "strategy",
                "kind",
                format!("unknown strategy '{}' (expected crossover or threshold)", other),
            ))
        }
    };

    strategy
        .validate()
        .map_err(|e| invalid("strategy", "kind", e.to_string()))?;
    Ok(strategy)
}

pub fn build_indicator_spec(config: &dyn ConfigPort) -> Result<IndicatorSpec, StockerError> {
    let defaults = IndicatorSpec::default();
    let spec = IndicatorSpec {
        short_window: parse_key(config, "indicators", "short_window")?.unwrap_or(defaults.short_window),
        long_window: parse_key(config, "indicators", "long_window")?.unwrap_or(defaults.long_window),
        ema_span: parse_key(config, "indicators", "ema_span")?.unwrap_or(defaults.ema_span),
        rsi_period: parse_key(config, "indicators", "rsi_period")?.unwrap_or(defaults.rsi_period),
        ..defaults
    };
    spec.validate()
        .map_err(|e| invalid("indicators", "window", e.to_string()))?;
    Ok(spec)
}

pub fn build_log_level(config: &dyn ConfigPort) -> Result<String, StockerError> {
    validate_log_level(config)?;
    Ok(config
        .get_string("logging", "level")
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| crate::logging::DEFAULT_LEVEL.to_string()))
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), StockerError> {
    match config.get_string("logging", "level") {
        Some(level) if !level.trim().is_empty() => {
            let level = level.trim().to_lowercase();
            if LOG_LEVELS.contains(&level.as_str()) {
                Ok(())
            } else {
                Err(invalid(
                    "logging",
                    "level",
                    format!("unknown level '{}' (expected one of {})", level, LOG_LEVELS.join(", ")),
                ))
            }
        }
        _ => Ok(()),
    }
}
