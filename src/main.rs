use std::io::{BufRead, Write};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use spool_lite::config::{ExecutorConfig, GeneratorConfig, RunConfig};
use spool_lite::scheduler::{user_names, JobGenerator, JobQueue};
use spool_lite::shutdown::install_shutdown_handler;
use spool_lite::worker::{Event, EventLog};
use spool_lite::{RunReport, Runner, SpoolError, SyncMode};

#[derive(Parser, Debug)]
#[command(name = "spool-lite")]
#[command(version)]
#[command(about = "Print and scan jobs contending for shared devices under different synchronization strategies")]
struct Args {
    /// Synchronization mode: 1-4 or a name (none, mutex, semaphore, peterson).
    /// Prompted for on stdin when omitted.
    #[arg(long, short = 'm')]
    mode: Option<String>,

    /// Number of users producing jobs
    #[arg(long, default_value = "5")]
    users: usize,

    /// Jobs generated per user
    #[arg(long, default_value = "10")]
    jobs_per_user: usize,

    /// Concurrent worker contexts (default: one per user)
    #[arg(long)]
    workers: Option<usize>,

    /// Simulated time per page, in milliseconds
    #[arg(long, default_value = "1000")]
    page_ms: u64,

    /// RNG seed for a reproducible job set
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    report: &'a RunReport,
    events: Vec<Event>,
}

/// Show the numbered menu and read one line from stdin.
fn prompt_mode() -> std::io::Result<String> {
    println!("\nChoose execution mode:");
    for mode in SyncMode::ALL {
        println!("{}. {}", mode.number(), mode.description());
    }
    print!("Enter choice (1-4): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_summary(report: &RunReport) {
    println!();
    println!("Mode:              {}", report.mode);
    println!("Workers:           {}", report.workers);
    println!(
        "Jobs:              {} completed, {} cancelled, {} total",
        report.jobs_completed, report.jobs_cancelled, report.jobs_total
    );
    println!("Pages processed:   {}", report.pages_processed);
    println!(
        "Peak occupancy:    printer {}, scanner {}, jobs {}",
        report.occupancy.peak_printer, report.occupancy.peak_scanner, report.occupancy.peak_jobs
    );
    println!("Device conflicts:  {}", report.occupancy.device_conflicts);
    println!("Elapsed:           {} ms", report.elapsed_ms);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the job log
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let table = matches!(args.output, OutputFormat::Table);
    let config = RunConfig {
        generator: GeneratorConfig {
            users: args.users,
            jobs_per_user: args.jobs_per_user,
            seed: args.seed,
        },
        executor: ExecutorConfig {
            page_duration: Duration::from_millis(args.page_ms),
        },
        workers: args.workers,
        echo_events: table,
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let events = if config.echo_events {
        EventLog::echoing()
    } else {
        EventLog::new()
    };

    if table {
        println!("Generating Jobs...\n");
    }
    let mut queue = JobQueue::new();
    let mut generator = JobGenerator::new(config.generator.seed);
    generator.populate(
        &mut queue,
        &user_names(config.generator.users),
        config.generator.jobs_per_user,
        &events,
    );

    let selection = match args.mode {
        Some(mode) => mode,
        None => prompt_mode()?,
    };
    let runner = match Runner::select(&selection, &config, events.clone()) {
        Ok(runner) => runner.with_shutdown(install_shutdown_handler()),
        // Not fatal: report and exit without running anything
        Err(e @ SpoolError::Configuration(_)) => {
            eprintln!("Error: {}", e);
            return Ok(());
        }
        Err(e @ SpoolError::ContentionViolation { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!("Hint: use --workers 2 with the peterson mode");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if table {
        println!("\n{}...\n", runner.mode().description());
    }
    let report = runner.run_all(&queue).await?;

    match args.output {
        OutputFormat::Table => print_summary(&report),
        OutputFormat::Json => {
            let output = RunOutput {
                report: &report,
                events: events.snapshot(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
