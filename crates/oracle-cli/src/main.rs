use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use oracle_core::catalogue::{self, Flavor};
use oracle_core::checker::{CheckerConfig, Status};
use oracle_core::report::{Report, Summary};
use oracle_core::runner::{self, RunSummary};
use oracle_core::HarnessError;
use std::io::IsTerminal;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Oracle: contract verification for the demo catalogue
///
/// Run operations against their human-authored contracts and generated
/// edge cases. Exit code 0 means every case passed, 1 means at least one
/// case failed or errored, 2 means the harness was misused.
#[derive(Parser)]
#[command(name = "oracle", version, about, long_about = None)]
struct Cli {
    /// Print nothing to stdout; report through the exit code only
    #[arg(long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one operation
    Run {
        /// Registered operation name (case-sensitive)
        operation: String,
        #[command(flatten)]
        options: RunOptions,
    },

    /// Verify every registered operation
    RunAll {
        #[command(flatten)]
        options: RunOptions,
    },

    /// List registered operations
    List,

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct RunOptions {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Check the corrected implementations instead of the seeded ones
    #[arg(long)]
    reference: bool,

    /// Only run the explicit cases
    #[arg(long)]
    no_edge_cases: bool,

    /// Per-case timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl RunOptions {
    fn flavor(&self) -> Flavor {
        if self.reference {
            Flavor::Reference
        } else {
            Flavor::Seeded
        }
    }

    fn config(&self) -> CheckerConfig {
        CheckerConfig {
            timeout_ms: self.timeout_ms,
            edge_cases: !self.no_edge_cases,
            ..CheckerConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Run { operation, options } => {
            tracing::info!(operation = %operation, ?options, "run");
            run_one(&operation, &options, cli.quiet)
        }
        Commands::RunAll { options } => {
            tracing::info!(?options, "run-all");
            run_all(&options, cli.quiet)
        }
        Commands::List => list(cli.quiet),
        Commands::Version => {
            if !cli.quiet {
                println!(
                    "oracle {} (oracle-core {})",
                    env!("CARGO_PKG_VERSION"),
                    oracle_core::VERSION
                );
            }
            0
        }
    };

    process::exit(exit_code);
}

fn run_one(operation: &str, options: &RunOptions, quiet: bool) -> i32 {
    let result = catalogue::registry(options.flavor()).and_then(|registry| {
        let suite = catalogue::suite_for(options.flavor());
        runner::verify_operation(&registry, &suite, operation, &options.config())
    });
    let report = match result {
        Ok(report) => report,
        Err(e) => return usage_error(&e),
    };

    let summary = report.summary();
    if !quiet {
        if options.json {
            let output = serde_json::json!({
                "passed": summary.all_passed(),
                "summary": summary,
                "report": report,
            });
            if let Err(code) = print_json(&output) {
                return code;
            }
        } else {
            print_report(&report);
        }
    }
    exit_code(&summary)
}

fn run_all(options: &RunOptions, quiet: bool) -> i32 {
    let result = catalogue::registry(options.flavor()).and_then(|registry| {
        let suite = catalogue::suite_for(options.flavor());
        runner::verify_all(&registry, &suite, &options.config())
    });
    let run = match result {
        Ok(run) => run,
        Err(e) => return usage_error(&e),
    };

    let totals = run.totals();
    if !quiet {
        if options.json {
            let output = serde_json::json!({
                "passed": totals.all_passed(),
                "summary": totals,
                "reports": run.reports,
            });
            if let Err(code) = print_json(&output) {
                return code;
            }
        } else {
            print_run(&run);
        }
    }
    exit_code(&totals)
}

fn list(quiet: bool) -> i32 {
    let registry = match catalogue::registry(Flavor::Seeded) {
        Ok(registry) => registry,
        Err(e) => return usage_error(&e),
    };
    if !quiet {
        for op in registry.operations() {
            println!(
                "{:<20} arity {}  {}",
                op.name().bold(),
                op.input_arity(),
                op.domain()
            );
        }
    }
    0
}

// ── Output ────────────────────────────────────────────────

fn exit_code(summary: &Summary) -> i32 {
    if summary.all_passed() {
        0
    } else {
        1
    }
}

fn usage_error(e: &HarnessError) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), e);
    2
}

fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} failed to serialize report: {}", "error:".red().bold(), e);
            Err(2)
        }
    }
}

fn print_report(report: &Report) {
    let summary = report.summary();
    let title = report.operation.as_deref().unwrap_or("run");
    let verdict = if summary.all_passed() {
        "ok".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("{} {}: {}", verdict, title.bold(), summary);

    for result in report.failures() {
        let status = match result.status {
            Status::Fail => "fail".red(),
            Status::Error => "error".yellow(),
            Status::Pass => "pass".green(),
        };
        let origin = if result.case.is_edge_case {
            " (edge)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", status, result.case.call_display(), origin);
        println!("    expected: {}", result.case.expected);
        println!("    actual:   {}", result.actual);
    }
    for case in report.pending() {
        println!(
            "  {} {} (needs a human-assigned expectation)",
            "pending".cyan(),
            case.call_display()
        );
    }
}

fn print_run(run: &RunSummary) {
    for report in &run.reports {
        print_report(report);
    }
    let totals = run.totals();
    let label = if totals.all_passed() {
        "total:".green().bold()
    } else {
        "total:".red().bold()
    };
    println!("{} {}", label, totals);
}
