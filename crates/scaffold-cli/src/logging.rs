//! Tracing setup for the binary.
//!
//! The library crates only emit events; this is the one place a subscriber
//! is installed. Events go to stderr so stdout stays clean for results.
//!
//! `--quiet` shows errors, no flag shows warnings, and each `-v` steps
//! through info, debug and trace. A set `RUST_LOG` replaces all of that.

use std::io::{self, IsTerminal as _};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

const CRATES: [&str; 3] = ["scaffold", "scaffold_core", "scaffold_adapters"];

/// Install the global subscriber. Call once, first thing after parsing.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(filter_directives(derive_level(args))),
    };

    let layer = fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(!args.no_color && io::stderr().is_terminal())
        .with_writer(io::stderr);

    let subscriber = tracing_subscriber::registry().with(filter);
    let installed = match args.output_format {
        OutputFormat::Json => subscriber.with(layer.json()).try_init(),
        _ => subscriber.with(layer).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// `scaffold=<level>,scaffold_core=<level>,...`
fn filter_directives(level: &str) -> String {
    let directives: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
    directives.join(",")
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}
