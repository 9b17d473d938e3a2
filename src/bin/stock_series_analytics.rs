use stock_series_analytics::config::{Config, DEFAULT_DATA_PATH};
use stock_series_analytics::loader::write_series_to_arrow;
use stock_series_analytics::models::stock::PriceField;
use stock_series_analytics::services::{AnalysisService, TextReport};

use anyhow::{anyhow, Context};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("StockSeriesAnalytics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Descriptive and technical statistics over a daily stock price history")
        .arg(
            Arg::with_name("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Price history to analyse (.csv, or .arrow/.ipc)")
                .takes_value(true)
                .global(true)
                .default_value(DEFAULT_DATA_PATH),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format (text, json)")
                .takes_value(true)
                .global(true)
                .possible_values(["text", "json"])
                .default_value("text"),
        );

    // 添加子命令
    let app = app
        .subcommand(SubCommand::with_name("report").about("All analyses in one report"))
        .subcommand(SubCommand::with_name("delta").about("Open/close delta analysis"))
        .subcommand(
            SubCommand::with_name("moving-average")
                .about("Moving averages and their crossovers")
                .arg(
                    Arg::with_name("short")
                        .long("short")
                        .value_name("BARS")
                        .help("Short moving average window")
                        .takes_value(true)
                        .default_value("7"),
                )
                .arg(
                    Arg::with_name("long")
                        .long("long")
                        .value_name("BARS")
                        .help("Long moving average window")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::with_name("field")
                        .long("field")
                        .value_name("FIELD")
                        .help("Price column (open, high, low, close, adj_close, volume)")
                        .takes_value(true)
                        .default_value("close"),
                ),
        )
        .subcommand(
            SubCommand::with_name("volatility")
                .about("Daily high-low range statistics")
                .arg(
                    Arg::with_name("threshold")
                        .long("threshold")
                        .value_name("AMOUNT")
                        .help("Count days whose range exceeds this amount")
                        .takes_value(true)
                        .default_value("5.0"),
                )
                .arg(
                    Arg::with_name("top")
                        .long("top")
                        .value_name("N")
                        .help("Number of most volatile days to list")
                        .takes_value(true)
                        .default_value("5"),
                ),
        )
        .subcommand(
            SubCommand::with_name("correlation")
                .about("Pearson and Spearman correlation between two columns")
                .arg(
                    Arg::with_name("x")
                        .long("x")
                        .value_name("FIELD")
                        .takes_value(true)
                        .default_value("volume"),
                )
                .arg(
                    Arg::with_name("y")
                        .long("y")
                        .value_name("FIELD")
                        .takes_value(true)
                        .default_value("close"),
                ),
        )
        .subcommand(
            SubCommand::with_name("seasonality")
                .about("Average price by calendar month")
                .arg(
                    Arg::with_name("field")
                        .long("field")
                        .value_name("FIELD")
                        .takes_value(true)
                        .default_value("adj_close"),
                )
                .arg(
                    Arg::with_name("top")
                        .long("top")
                        .value_name("N")
                        .help("Number of strongest/weakest months to list")
                        .takes_value(true)
                        .default_value("3"),
                ),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Write the loaded series to an Arrow IPC file")
                .arg(
                    Arg::with_name("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Destination .arrow file")
                        .takes_value(true)
                        .required(true),
                ),
        );

    let matches = app.get_matches();

    let Some((command, sub)) = matches.subcommand() else {
        info!("No command specified. Use --help for usage information.");
        return Ok(());
    };

    let file = global_value(&matches, sub, "file").unwrap_or(DEFAULT_DATA_PATH);
    let format = match global_value(&matches, sub, "format") {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    };

    let mut config = Config::new().with_data_path(file);

    match command {
        "moving-average" => {
            config = config
                .with_short_window(parse_arg(sub, "short")?)
                .with_long_window(parse_arg(sub, "long")?)
                .with_price_field(parse_arg(sub, "field")?);
        }
        "volatility" => {
            config = config
                .with_range_threshold(parse_arg(sub, "threshold")?)
                .with_top_n(parse_arg(sub, "top")?);
        }
        "correlation" => {
            config = config.with_correlation_fields(parse_arg(sub, "x")?, parse_arg(sub, "y")?);
        }
        "seasonality" => {
            config = config
                .with_seasonality_field(parse_arg::<PriceField>(sub, "field")?)
                .with_top_months(parse_arg(sub, "top")?);
        }
        _ => {}
    }

    let service = AnalysisService::new(config)?;
    info!("Using data file: {}", service.config().data_path.display());

    match command {
        "report" => emit(&service.full_report()?, format)?,
        "delta" => emit(&service.delta_report()?, format)?,
        "moving-average" => emit(&service.moving_average_report()?, format)?,
        "volatility" => emit(&service.volatility_report()?, format)?,
        "correlation" => emit(&service.volume_price_report()?, format)?,
        "seasonality" => emit(&service.seasonality_report()?, format)?,
        "export" => {
            let output = sub
                .value_of("output")
                .ok_or_else(|| anyhow!("--output is required"))?;
            let series = service.load_series()?;
            write_series_to_arrow(&series, Path::new(output))
                .with_context(|| format!("failed to export to {}", output))?;
            info!("Exported {} bars to {}", series.len(), output);
        }
        other => return Err(anyhow!("Unknown command: {}", other)),
    }

    Ok(())
}

// 全局参数可能出现在子命令之前或之后
fn global_value<'a>(top: &'a ArgMatches, sub: &'a ArgMatches, name: &str) -> Option<&'a str> {
    sub.value_of(name).or_else(|| top.value_of(name))
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = matches
        .value_of(name)
        .ok_or_else(|| anyhow!("missing value for --{}", name))?;
    raw.parse::<T>()
        .map_err(|e| anyhow!("invalid value '{}' for --{}: {}", raw, name, e))
}

fn emit<R: Serialize + TextReport>(report: &R, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
