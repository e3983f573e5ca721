//! Generator → buffer → reducer pipeline from the command line.
//!
//! Run with: `cargo run -p bbuffer-rs --bin bbuffer -- random 1024 1000000 --buffer spin`

use anyhow::{Context, Result};
use bbuffer_rs::{
    run, BufferKind, ByteCountReducer, Config, Generator, MinMaxReducer, RandomGenerator,
    RunReport, TokenGenerator,
};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::info;

/// What feeds the buffer and what drains it.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// `nitems` random integers, reduced to min/max
    Random,
    /// Integers read from a file, reduced to min/max
    File,
    /// Words read from a file, reduced to their total byte count
    Count,
}

/// Bounded buffer producer/consumer benchmark
#[derive(Parser, Debug)]
#[command(name = "bbuffer")]
#[command(about = "Run a generator and a reducer through a bounded SPSC buffer")]
struct Args {
    /// Data source and reduction
    #[arg(value_enum)]
    mode: Mode,

    /// Number of ring slots (at least 2)
    capacity: usize,

    /// Item count for `random`, file name for `file` and `count`
    source: String,

    /// Buffer variant: seq, blocking or spin
    #[arg(long, default_value_t = BufferKind::Blocking)]
    buffer: BufferKind,

    /// Collect put/get/wait counters
    #[arg(long)]
    metrics: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new(args.capacity, args.metrics);
    config.validate()?;

    match args.mode {
        Mode::Random => {
            let nitems: u64 = args
                .source
                .parse()
                .with_context(|| format!("invalid item count `{}`", args.source))?;
            let mut generator = RandomGenerator::new(nitems);
            if generator.is_finished() {
                info!("source is empty, nothing to run");
                return Ok(());
            }
            let mut reducer = MinMaxReducer::new();
            let report = run(args.buffer, config, &mut generator, &mut reducer)?;
            print_min_max(&args, &report, &reducer)?;
        }
        Mode::File => {
            let mut generator = TokenGenerator::<_, i64>::open(&args.source);
            if generator.is_finished() {
                info!("source is empty, nothing to run");
                return Ok(());
            }
            let mut reducer = MinMaxReducer::new();
            let report = run(args.buffer, config, &mut generator, &mut reducer)?;
            print_min_max(&args, &report, &reducer)?;
        }
        Mode::Count => {
            let mut generator = TokenGenerator::<_, String>::open(&args.source);
            if generator.is_finished() {
                info!("source is empty, nothing to run");
                return Ok(());
            }
            let mut reducer = ByteCountReducer::new();
            let report = run(args.buffer, config, &mut generator, &mut reducer)?;
            if args.json {
                print_json(&args, &report, json!({ "count": reducer.count() }))?;
            } else {
                print_elapsed(&report);
                println!("Count: {}", reducer.count());
            }
        }
    }

    Ok(())
}

fn print_elapsed(report: &RunReport) {
    println!("Elapsed time: {}ns", report.elapsed.as_nanos());
}

fn print_min_max(args: &Args, report: &RunReport, reducer: &MinMaxReducer) -> Result<()> {
    if args.json {
        return print_json(
            args,
            report,
            json!({ "min": reducer.min(), "max": reducer.max() }),
        );
    }
    print_elapsed(report);
    println!("Min: {}", reducer.min());
    println!("Max: {}", reducer.max());
    Ok(())
}

fn print_json(args: &Args, report: &RunReport, result: serde_json::Value) -> Result<()> {
    let mut out = json!({
        "buffer": args.buffer.name(),
        "capacity": args.capacity,
        "elapsed_ns": report.elapsed.as_nanos() as u64,
        "produced": report.produced,
        "reduced": report.reduced,
        "result": result,
    });
    if args.metrics {
        out["metrics"] = serde_json::to_value(report.metrics)?;
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
