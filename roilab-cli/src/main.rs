//! RoiLab CLI: signal evaluation, data download and order execution.
//!
//! Commands:
//! - `signals`: evaluate tickers and print the latest action per ticker
//! - `download`: fetch prices and save them as CSV for offline runs
//! - `execute`: evaluate, then send Buy/Sell orders to a paper or REST broker
//! - `config`: print the default run configuration as TOML

mod logging;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roilab_core::data::{
    write_series_csv, CircuitBreaker, CsvProvider, DataProvider, Interval, PriceField,
    SyntheticProvider, YahooProvider,
};
use roilab_core::execution::{ExecutionSink, PaperBroker, RestBroker};
use roilab_runner::{
    build_tickets, dispatch_reports, run, write_artifacts, DispatchMode, RunConfig, RunSummary,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

const ACCESS_TOKEN_ENV: &str = "ROILAB_ACCESS_TOKEN";
const ACCOUNT_ID_ENV: &str = "ROILAB_ACCOUNT_ID";

#[derive(Parser)]
#[command(
    name = "roilab",
    about = "RoiLab CLI: ROI mean-reversion signals"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate tickers and report signals and realized P&L.
    Signals {
        #[command(flatten)]
        run: RunArgs,

        /// Write signals.csv per ticker and summary.json here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Fetch prices and save one CSV per ticker.
    Download {
        /// Tickers to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Sampling interval: daily, weekly, monthly.
        #[arg(long, default_value = "daily")]
        interval: Interval,

        /// Price column: close or adj_close.
        #[arg(long, default_value = "adj_close")]
        price_field: PriceField,

        /// Where to fetch from.
        #[arg(long, value_enum, default_value_t = Source::Yahoo)]
        source: Source,

        /// Output directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Evaluate tickers, then submit orders for Buy/Sell actions.
    Execute {
        #[command(flatten)]
        run: RunArgs,

        /// Execution sink.
        #[arg(long, value_enum, default_value_t = Broker::Paper)]
        broker: Broker,

        /// Brokerage account id. Falls back to $ROILAB_ACCOUNT_ID, then the config.
        #[arg(long)]
        account: Option<String>,

        /// Shares per order.
        #[arg(long)]
        quantity: Option<u32>,

        /// Dispatch only the latest action, or every action in the series.
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Actually send orders to the REST broker (without this flag, only previews them).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Print the default run configuration as TOML.
    Config,
}

/// Inputs shared by every command that evaluates signals.
#[derive(Args)]
struct RunArgs {
    /// Tickers to evaluate; overrides the config file list.
    tickers: Vec<String>,

    /// Path to a TOML run config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<String>,

    /// Sampling interval: daily, weekly, monthly.
    #[arg(long)]
    interval: Option<Interval>,

    /// Price column: close or adj_close.
    #[arg(long)]
    price_field: Option<PriceField>,

    /// Rolling ROI window size.
    #[arg(long)]
    window: Option<usize>,

    /// Buy threshold percentile (0-100).
    #[arg(long)]
    buy_percentile: Option<f64>,

    /// Sell threshold percentile (0-100).
    #[arg(long)]
    sell_percentile: Option<f64>,

    /// Keep the final (possibly still-forming) bar.
    #[arg(long, default_value_t = false)]
    keep_last_bar: bool,

    /// Where prices come from.
    #[arg(long, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// CSV directory for `--source csv`. Defaults to ./data.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Clone, Copy, ValueEnum)]
enum Broker {
    Paper,
    Rest,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Latest,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Signals { run, output_dir } => run_signals(run, output_dir),
        Commands::Download {
            tickers,
            start,
            end,
            interval,
            price_field,
            source,
            data_dir,
        } => run_download(tickers, start, end, interval, price_field, source, data_dir),
        Commands::Execute {
            run,
            broker,
            account,
            quantity,
            mode,
            confirm,
        } => run_execute(run, broker, account, quantity, mode, confirm),
        Commands::Config => {
            print!("{}", RunConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

/// Config file (or defaults) with command-line overrides applied, validated.
fn build_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RunConfig::default(),
    };

    if !args.tickers.is_empty() {
        config.tickers = args.tickers.iter().map(|t| t.to_uppercase()).collect();
    }
    if let Some(start) = &args.start {
        config.start_date = parse_date(start)?;
    }
    if let Some(end) = &args.end {
        config.end_date = parse_date(end)?;
    }
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    if let Some(field) = args.price_field {
        config.price_field = field;
    }
    if let Some(window) = args.window {
        config.signal.rolling_window_size = window;
    }
    if let Some(p) = args.buy_percentile {
        config.signal.buy_percentile = p;
    }
    if let Some(p) = args.sell_percentile {
        config.signal.sell_percentile = p;
    }
    if args.keep_last_bar {
        config.drop_last_bar = false;
    }

    config.validate()?;
    Ok(config)
}

fn make_provider(
    source: Source,
    price_field: PriceField,
    data_dir: &std::path::Path,
) -> Result<Box<dyn DataProvider>> {
    Ok(match source {
        Source::Yahoo => {
            let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
            Box::new(YahooProvider::new(circuit_breaker, price_field)?)
        }
        Source::Csv => Box::new(CsvProvider::new(data_dir, price_field)),
        Source::Synthetic => Box::new(SyntheticProvider::default()),
    })
}

fn evaluate(args: &RunArgs) -> Result<(RunConfig, RunSummary, Vec<roilab_runner::TickerReport>)> {
    let config = build_config(args)?;
    let provider = make_provider(args.source, config.price_field, &args.data_dir)?;
    let (summary, reports) = run(provider.as_ref(), &config)?;

    for failure in &summary.failures {
        error!(ticker = %failure.ticker, error = %failure.error, "evaluation failed");
    }
    if reports.is_empty() {
        bail!("no ticker could be evaluated");
    }
    Ok((config, summary, reports))
}

fn run_signals(args: RunArgs, output_dir: Option<PathBuf>) -> Result<()> {
    let (_, summary, reports) = evaluate(&args)?;
    print_summary(&summary);

    if let Some(dir) = output_dir {
        write_artifacts(&dir, &summary, &reports)?;
        println!("Artifacts saved to: {}", dir.display());
    }
    Ok(())
}

fn run_download(
    tickers: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    interval: Interval,
    price_field: PriceField,
    source: Source,
    data_dir: PathBuf,
) -> Result<()> {
    let start_date = start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive() - chrono::Duration::days(365 * 10));
    let end_date = end
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    if start_date >= end_date {
        bail!("--start ({start_date}) must be before --end ({end_date})");
    }

    let provider = match source {
        Source::Csv => bail!("--source csv cannot be a download source"),
        other => make_provider(other, price_field, &data_dir)?,
    };
    let sink = CsvProvider::new(&data_dir, price_field);

    let mut failed = 0usize;
    for ticker in &tickers {
        let ticker = ticker.to_uppercase();
        match provider.fetch(&ticker, start_date, end_date, interval) {
            Ok(series) => {
                let path = sink.path_for(&ticker);
                write_series_csv(&path, &series, price_field)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(ticker = %ticker, bars = series.len(), path = %path.display(), "saved");
            }
            Err(e) => {
                eprintln!("Error for {ticker}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_execute(
    args: RunArgs,
    broker: Broker,
    account: Option<String>,
    quantity: Option<u32>,
    mode: Option<Mode>,
    confirm: bool,
) -> Result<()> {
    let (mut config, summary, reports) = evaluate(&args)?;
    print_summary(&summary);

    if let Some(q) = quantity {
        config.dispatch.quantity = q;
    }
    if let Some(m) = mode {
        config.dispatch.mode = match m {
            Mode::Latest => DispatchMode::Latest,
            Mode::All => DispatchMode::All,
        };
    }
    config.validate()?;

    let account = account.or_else(|| std::env::var(ACCOUNT_ID_ENV).ok());

    let sink: Box<dyn ExecutionSink> = match broker {
        Broker::Paper => Box::new(PaperBroker::new()),
        Broker::Rest => {
            if !confirm {
                let account_id = account
                    .as_deref()
                    .or(config.dispatch.account_id.as_deref())
                    .unwrap_or("<account>");
                println!("\nOrders (preview; pass --confirm to send):");
                for report in &reports {
                    for t in build_tickets(report, &config.dispatch, account_id) {
                        println!("  {} {} x{} @ {:.2}", t.side, t.ticker, t.quantity, t.price);
                    }
                }
                return Ok(());
            }
            let token = std::env::var(ACCESS_TOKEN_ENV)
                .map_err(|_| anyhow!("{ACCESS_TOKEN_ENV} must be set to use the REST broker"))?;
            Box::new(RestBroker::new(config.dispatch.base_url.clone(), token)?)
        }
    };

    let account = match (broker, account) {
        (_, Some(a)) => Some(a),
        // Paper orders need some account id to pass ticket validation.
        (Broker::Paper, None) => config.dispatch.account_id.clone().or(Some("paper".into())),
        (Broker::Rest, None) => None,
    };

    let confirmations = dispatch_reports(sink.as_ref(), &reports, &config.dispatch, account.as_deref())?;
    println!("\nSubmitted {} order(s) via {}", confirmations.len(), sink.name());
    for c in &confirmations {
        println!(
            "  order {} (HTTP {})",
            c.order_id.as_deref().unwrap_or("-"),
            c.status
        );
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== RoiLab run {} ===", &summary.run_id[..12]);
    println!(
        "Window: {}  Percentiles: {}/{}  Interval: {}",
        summary.config.signal.rolling_window_size,
        summary.config.signal.buy_percentile,
        summary.config.signal.sell_percentile,
        summary.config.interval,
    );
    println!(
        "\n{:<8} {:>6} {:>12} {:>8} {:>5} {:>5} {:>12} {:>8}",
        "Ticker", "Bars", "Last date", "Latest", "Buys", "Sells", "Realized", "Win"
    );
    for t in &summary.tickers {
        let win = t
            .win_rate
            .map(|w| format!("{:.1}%", w * 100.0))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<8} {:>6} {:>12} {:>8} {:>5} {:>5} {:>12.2} {:>8}",
            t.ticker,
            t.bars,
            t.last_date.to_string(),
            t.latest_action.to_string(),
            t.buys,
            t.sells,
            t.realized_pnl,
            win,
        );
    }
    for f in &summary.failures {
        println!("{:<8} failed: {}", f.ticker, f.error);
    }
}
