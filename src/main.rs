//! Demo program: named logger, bound values, verbosity-gated output and
//! error records, flushed before exit.
//!
//! Run with: cargo run -- -v 4

use clap::Parser;
use rust_contextual_logger::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Parser)]
#[command(name = "rust_contextual_logger")]
#[command(about = "Structured, leveled logging demo", long_about = None)]
struct Cli {
    /// Verbosity threshold: `v(n)` records are shown when n <= this value
    #[arg(short = 'v', long = "verbosity", default_value_t = 3, allow_negative_numbers = true)]
    verbosity: i32,

    /// Output format: text, json or klog
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Disable ANSI colors in text output
    #[arg(long)]
    no_color: bool,

    /// Deliver records through a background worker with this queue size
    #[arg(long)]
    async_buffer: Option<usize>,
}

#[derive(Debug)]
struct DemoError {
    message: String,
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DemoError {}

fn main() {
    let cli = Cli::parse();

    let config = LoggerConfig {
        verbosity: cli.verbosity,
        format: cli.format,
        colors: !cli.no_color,
        async_buffer: cli.async_buffer.map(|size| size.max(1)),
        ..LoggerConfig::default()
    };
    let root = Logger::builder().config(&config).build();

    // Every record from `log` carries the name and the pod value
    let log = root
        .with_name("TestName")
        .with_values(kv!["pod" => "192.168.0.1"]);

    log.info("Hello,", KeyValues::from_flat(vec!["World"]));

    let log2 = log.with_values(kv!["container" => "4"]);

    let mut val2 = BTreeMap::new();
    val2.insert("k", 1);
    log.info(
        "hello",
        kv!["val1" => 1, "val2" => FieldValue::structured(&val2)],
    );

    // Verbosity 4 is debug output, hidden at the default threshold of 3
    log.v(4).info("nice to meet you", ());

    log.error(
        None,
        "uh oh",
        kv![
            "trouble" => true,
            "reasons" => FieldValue::structured(&[0.1, 0.11, 3.5]),
        ],
    );
    let err = DemoError {
        message: "an error occurred".to_string(),
    };
    log.error(Some(&err), "goodbye", kv!["code" => -1]);

    log2.v(3).info("New level log", ());
    log2.v(3).info(
        "Testing with keys values",
        kv!["some key" => "some value", "anotherkey" => "anothervalue"],
    );

    if let Err(e) = root.flush() {
        eprintln!("[LOGGER ERROR] Final flush failed: {}", e);
    }
}
