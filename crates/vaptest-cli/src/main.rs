//! CLI entry point for vaptest.
//!
//! This module is intentionally thin: it handles argument parsing, logging
//! setup, output, and exit codes. All business logic lives in `vaptest-app`.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vaptest_app::{RunInput, outcome_exit_code, run_init, run_manifests};
use vaptest_cel::CelEngine;
use vaptest_settings::RunOptions;

#[derive(Parser, Debug)]
#[command(
    name = "vaptest",
    version,
    about = "Table-driven tests for ValidatingAdmissionPolicy manifests"
)]
struct Cli {
    /// Print decision details for passing test cases too.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Enable debug logging on stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a test directory next to a policy file.
    Init {
        /// Path to the ValidatingAdmissionPolicy file.
        policy_file: Utf8PathBuf,
    },

    /// Run one or more test manifests.
    Run {
        /// Paths to vaptest.yaml manifests.
        #[arg(required = true)]
        manifests: Vec<Utf8PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.debug);

    let code = match cli.cmd {
        Commands::Init { policy_file } => cmd_init(&policy_file),
        Commands::Run { manifests } => cmd_run(&manifests, RunOptions { verbose: cli.verbose }),
    };
    std::process::exit(code);
}

fn cmd_init(policy_file: &Utf8Path) -> i32 {
    match run_init(policy_file) {
        Ok(output) => {
            println!("{}", output.message);
            0
        }
        Err(err) => {
            eprintln!("vaptest error: {err:#}");
            1
        }
    }
}

fn cmd_run(manifests: &[Utf8PathBuf], options: RunOptions) -> i32 {
    let engine = CelEngine::new();
    let output = run_manifests(&engine, RunInput { manifests, options });
    print!("{}", output.text);
    outcome_exit_code(output.outcome())
}

/// Logs go to stderr; stdout carries the report. `RUST_LOG` wins when set.
fn initialize_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
