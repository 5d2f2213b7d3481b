//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestEngine, BacktestResult};
use crate::domain::error::QuantbtError;
use crate::domain::indicator::TechnicalIndicators;
use crate::domain::metrics::RiskMetrics;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::sweep::{best_by_total_return, run_sweep, SweepGrid};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantbt", about = "Single-instrument indicator strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding <SYMBOL>.csv files; defaults to `[data] directory`
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the indicator table for a symbol
    Indicators {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value_t = crate::domain::backtest::DEFAULT_LENGTH)]
        length: usize,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Risk metrics over a symbol's price history
    Risk {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(long, default_value_t = crate::domain::backtest::DEFAULT_CONFIDENCE_LEVEL)]
        confidence: f64,
        #[arg(long, default_value_t = crate::domain::backtest::DEFAULT_RISK_FREE_RATE)]
        risk_free: f64,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a parameter sweep from the [sweep] section
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols available in a data directory
    Symbols {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            symbol,
            start,
            end,
            output,
        } => run_backtest(&config, data, &symbol, start, end, output.as_deref()),
        Command::Indicators {
            data,
            symbol,
            length,
            start,
            end,
            output,
        } => run_indicators(&data, &symbol, length, start, end, output.as_deref()),
        Command::Risk {
            data,
            symbol,
            confidence,
            risk_free,
            start,
            end,
            output,
        } => run_risk(
            &data,
            &symbol,
            confidence,
            risk_free,
            start,
            end,
            output.as_deref(),
        ),
        Command::Sweep {
            config,
            data,
            symbol,
            start,
            end,
            output,
        } => run_sweep_command(&config, data, &symbol, start, end, output.as_deref()),
        Command::Symbols { data } => run_symbols(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn read_double(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, QuantbtError> {
    Ok(adapter.get_double(section, key)?.unwrap_or(default))
}

/// Reads `[backtest]` and `[strategy]`, falling back to defaults for absent
/// keys, and validates the result.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, QuantbtError> {
    let defaults = BacktestConfig::default();

    let length = match adapter.get_int("backtest", "length")? {
        None => defaults.length,
        Some(n) => usize::try_from(n).map_err(|_| QuantbtError::ConfigInvalid {
            section: "backtest".into(),
            key: "length".into(),
            reason: format!("length must be non-negative, got {n}"),
        })?,
    };

    let config = BacktestConfig {
        length,
        initial_capital: read_double(
            adapter,
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        )?,
        risk_free_rate: read_double(
            adapter,
            "backtest",
            "risk_free_rate",
            defaults.risk_free_rate,
        )?,
        confidence_level: read_double(
            adapter,
            "backtest",
            "confidence_level",
            defaults.confidence_level,
        )?,
        position_size: read_double(adapter, "strategy", "position_size", defaults.position_size)?,
        stop_loss: read_double(adapter, "strategy", "stop_loss", defaults.stop_loss)?,
        take_profit: read_double(adapter, "strategy", "take_profit", defaults.take_profit)?,
        rsi_oversold: read_double(adapter, "strategy", "rsi_oversold", defaults.rsi_oversold)?,
        rsi_overbought: read_double(
            adapter,
            "strategy",
            "rsi_overbought",
            defaults.rsi_overbought,
        )?,
    };

    config.validate()?;
    Ok(config)
}

/// Reads the comma-separated candidate lists of `[sweep]`.
pub fn build_sweep_grid(adapter: &dyn ConfigPort) -> Result<SweepGrid, QuantbtError> {
    let list = |key: &str| -> Result<Vec<f64>, QuantbtError> {
        Ok(adapter.get_double_list("sweep", key)?.unwrap_or_default())
    };

    Ok(SweepGrid {
        stop_loss: list("stop_loss")?,
        take_profit: list("take_profit")?,
        position_size: list("position_size")?,
        rsi_oversold: list("rsi_oversold")?,
        rsi_overbought: list("rsi_overbought")?,
    })
}

/// The `--data` flag wins over `[data] directory`.
pub fn resolve_data_dir(
    flag: Option<PathBuf>,
    adapter: &dyn ConfigPort,
) -> Result<PathBuf, QuantbtError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    adapter
        .get_string("data", "directory")
        .map(PathBuf::from)
        .ok_or_else(|| QuantbtError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })
}

/// Fetches bars and turns an empty range into `NoData`.
pub fn load_bars(
    data_port: &dyn DataPort,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<OhlcvBar>, QuantbtError> {
    let bars = data_port.fetch_ohlcv(symbol, start, end)?;
    if bars.is_empty() {
        return Err(QuantbtError::NoData {
            context: format!("{symbol} has no bars in the requested range"),
        });
    }
    info!("loaded {} bars for {}", bars.len(), symbol);
    Ok(bars)
}

fn path_str(path: &Path) -> Result<&str, QuantbtError> {
    path.to_str().ok_or_else(|| QuantbtError::Report {
        reason: format!("output path {} is not valid UTF-8", path.display()),
    })
}

fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.4}")
    }
}

fn print_backtest_summary(symbol: &str, result: &BacktestResult) {
    println!("=== {symbol} ===");
    println!("Total Return:       {:.2}%", result.total_return * 100.0);
    println!("Final Equity:       {:.2}", result.final_equity);
    println!("Sharpe Ratio:       {}", format_ratio(result.sharpe_ratio));
    println!("Max Drawdown:       {}", format_ratio(result.max_drawdown));
    println!("VaR:                {}", format_ratio(result.var));
    println!("Expected Shortfall: {}", format_ratio(result.expected_shortfall));
    println!("Total Trades:       {}", result.total_trades);
    println!("Winning Trades:     {}", result.winning_trades);
    println!("Win Rate:           {:.1}%", result.win_rate * 100.0);
    println!("Profit Factor:      {}", format_ratio(result.profit_factor()));
    if let Some(open) = &result.open_position {
        println!(
            "Open Position:      {:.4} shares @ {:.4} since {}",
            open.shares, open.entry_price, open.entry_date
        );
    }
}

fn run_backtest(
    config_path: &Path,
    data_dir: Option<PathBuf>,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), QuantbtError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let config = build_backtest_config(&adapter)?;
    let engine = BacktestEngine::new(config)?;

    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter)?);
    let bars = load_bars(&data_port, symbol, start, end)?;
    let result = engine.run(&bars)?;

    print_backtest_summary(symbol, &result);

    if let Some(path) = output {
        let report = JsonReportAdapter::new();
        report.write_backtest(symbol, engine.config(), &result, path_str(path)?)?;
        println!("Report written to: {}", path.display());
    }
    Ok(())
}

fn run_indicators(
    data_dir: &Path,
    symbol: &str,
    length: usize,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), QuantbtError> {
    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    let bars = load_bars(&data_port, symbol, start, end)?;
    let indicators = TechnicalIndicators::new(&bars, length)?.compute_all();

    println!(
        "=== {symbol}: {} bars, length {} ===",
        indicators.len(),
        indicators.length
    );
    for (name, column) in indicators.columns() {
        let valid = column.iter().filter(|v| v.is_some()).count();
        let last = column.iter().rev().find_map(|v| *v);
        match last {
            Some(value) => println!("{name:<24} {valid:>6} valid, last {value:.4}"),
            None => println!("{name:<24} {valid:>6} valid"),
        }
    }

    if let Some(path) = output {
        JsonReportAdapter::new().write_indicators(symbol, &indicators, path_str(path)?)?;
        println!("Indicators written to: {}", path.display());
    }
    Ok(())
}

fn run_risk(
    data_dir: &Path,
    symbol: &str,
    confidence_level: f64,
    risk_free_rate: f64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), QuantbtError> {
    BacktestConfig {
        confidence_level,
        risk_free_rate,
        ..Default::default()
    }
    .validate()?;

    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    let bars = load_bars(&data_port, symbol, start, end)?;
    let metrics = RiskMetrics::compute(&bars, confidence_level, risk_free_rate);

    println!("=== {symbol}: {} returns ===", metrics.observations);
    println!("Std Deviation:      {}", format_ratio(metrics.standard_deviation));
    println!("VaR:                {}", format_ratio(metrics.value_at_risk));
    println!("Sharpe Ratio:       {}", format_ratio(metrics.sharpe_ratio));
    println!("Max Drawdown:       {}", format_ratio(metrics.max_drawdown));
    println!("Expected Shortfall: {}", format_ratio(metrics.expected_shortfall));

    if let Some(path) = output {
        JsonReportAdapter::new().write_risk(symbol, &metrics, path_str(path)?)?;
        println!("Risk report written to: {}", path.display());
    }
    Ok(())
}

fn run_sweep_command(
    config_path: &Path,
    data_dir: Option<PathBuf>,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), QuantbtError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let base = build_backtest_config(&adapter)?;
    let configs = build_sweep_grid(&adapter)?.expand(&base);

    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter)?);
    let bars = load_bars(&data_port, symbol, start, end)?;
    let outcomes = run_sweep(&bars, &configs);

    println!("=== {symbol}: {} runs ===", outcomes.len());
    println!(
        "{:>9} {:>9} {:>9} {:>9} {:>9} {:>10} {:>7}",
        "stop", "take", "size", "oversold", "overbght", "return%", "trades"
    );
    for outcome in &outcomes {
        let c = &outcome.config;
        match &outcome.result {
            Ok(r) => println!(
                "{:>9.4} {:>9.4} {:>9.4} {:>9.1} {:>9.1} {:>10.2} {:>7}",
                c.stop_loss,
                c.take_profit,
                c.position_size,
                c.rsi_oversold,
                c.rsi_overbought,
                r.total_return * 100.0,
                r.total_trades
            ),
            Err(e) => println!(
                "{:>9.4} {:>9.4} {:>9.4} {:>9.1} {:>9.1} error: {e}",
                c.stop_loss, c.take_profit, c.position_size, c.rsi_oversold, c.rsi_overbought
            ),
        }
    }

    if let Some(best) = best_by_total_return(&outcomes) {
        let c = &outcomes[best].config;
        println!(
            "Best: stop {:.4}, take {:.4}, size {:.4}",
            c.stop_loss, c.take_profit, c.position_size
        );
    }

    if let Some(path) = output {
        JsonReportAdapter::new().write_sweep(symbol, &outcomes, path_str(path)?)?;
        println!("Sweep written to: {}", path.display());
    }
    Ok(())
}

fn run_symbols(data_dir: &Path) -> Result<(), QuantbtError> {
    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        println!("No symbols found in {}", data_dir.display());
        return Ok(());
    }

    for symbol in &symbols {
        match data_port.get_data_range(symbol)? {
            Some((first, last, count)) => {
                println!("{symbol:<12} {first} to {last} ({count} bars)")
            }
            None => println!("{symbol:<12} (empty)"),
        }
    }
    Ok(())
}
