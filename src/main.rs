use std::io::{self, Write};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use rfsnap::harness::{ConsoleReporter, JsonReporter, Reporter, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Run the registered snapshot suites
#[derive(Debug, Parser)]
#[command(name = "rfsnap", version, about)]
struct Args {
    /// Only run cases whose full name contains PATTERN
    #[arg(long, value_name = "PATTERN")]
    filter: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print case names and exit
    #[arg(long)]
    list: bool,

    /// Let panics unwind instead of recording them as errors
    #[arg(long)]
    no_capture: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: Args, out: &mut dyn Write) -> anyhow::Result<i32> {
    let suite = rfsnap::demo::suites();

    if args.list {
        for name in suite.case_names() {
            writeln!(out, "{}", name).context("failed to write case list")?;
        }
        return Ok(0);
    }

    let config = RunConfig {
        filter: args.filter,
        catch_panics: !args.no_capture,
    };

    let mut reporter: Box<dyn Reporter + '_> = match args.format {
        Format::Text => Box::new(ConsoleReporter::new(out)),
        Format::Json => Box::new(JsonReporter::new(out)),
    };

    let summary = suite
        .run(&config, reporter.as_mut())
        .context("failed to run test suites")?;
    Ok(summary.exit_code())
}

/// 0 or 1 from the summary; 2 when the run itself could not complete
fn exit_status(result: &anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => *code,
        Err(_) => 2,
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(args, &mut out);
    out.flush().ok();
    if let Err(e) = &result {
        eprintln!("rfsnap failed: {:#}", e);
    }
    std::process::exit(exit_status(&result));
}
