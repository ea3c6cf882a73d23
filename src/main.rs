//! Sentiline - line-by-line text classification
//!
//! A CLI that splits text into lines, sends each non-blank line to a
//! remote analysis service, and reports the per-line results.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (empty input, save failure, bad config, unreadable file)
//!   2 - Some lines could not be analyzed and --strict was set

mod analysis;
mod cli;
mod client;
mod config;
mod interactive;
mod models;
mod progress;
mod report;
mod session;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use client::{Classifier, ClientConfig, HistoryStore, ServiceClient};
use config::{Config, CONFIG_FILE_NAME};
use session::Session;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Sentiline v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = run(args).await;
    if let Err(ref e) = result {
        error!("Run failed: {:#}", e);
        eprintln!("\n{}", e);
    }
    std::process::exit(exit_code(&result));
}

/// Map a run outcome onto the process exit code.
fn exit_code(result: &Result<i32>) -> i32 {
    match result {
        Ok(code) => *code,
        Err(_) => 1,
    }
}

/// Handle --init-config: generate a default .sentiline.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` wins over the flags when set. Logs go to stderr so reports on
/// stdout stay machine-readable.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// What a non-interactive invocation does with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OneShot {
    analyze: bool,
    save: bool,
    strict: bool,
    format: OutputFormat,
    hide_progress: bool,
}

impl OneShot {
    fn new(args: &Args, config: &Config) -> Self {
        let format = config.general.format;
        Self {
            analyze: args.has_input(),
            save: args.save || (args.has_input() && config.general.save_after_analyze),
            strict: args.strict,
            format,
            hide_progress: args.quiet || format == OutputFormat::Json,
        }
    }
}

/// Run the requested actions. Returns the exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let mut config = Config::resolve(args.config.as_deref(), Path::new("."))?;
    config.merge_with_args(&args);

    let client = ServiceClient::new(ClientConfig::from(&config.service))
        .context("Failed to create HTTP client")?;
    info!("Analysis service: {}", config.service.base_url);

    let mut session = Session::new(client.clone(), client);
    let _event_log = progress::log_events(session.subscribe());

    if args.history {
        let entries = session.history().await?;
        print!("{}", report::generate_history_text(&entries));
    }

    if let Some(ref text) = args.text {
        session.set_text(text.as_str());
    } else if let Some(ref file) = args.file {
        session.load_file(file).await?;
    }

    if args.interactive {
        interactive::run(&mut session, config.general.format, args.quiet).await?;
        return Ok(0);
    }

    run_one_shot(&mut session, OneShot::new(&args, &config)).await
}

/// Analyze the staged input and/or save, as planned.
async fn run_one_shot<C, P>(session: &mut Session<C, P>, plan: OneShot) -> Result<i32>
where
    C: Classifier,
    P: HistoryStore,
{
    let mut exit_code = 0;

    if plan.analyze {
        exit_code = analyze_once(session, plan).await?;
    }

    if plan.save {
        let message = session.save().await?;
        println!("{}", message);
    }

    Ok(exit_code)
}

/// Analyze the staged input once and print the report.
async fn analyze_once<C, P>(session: &mut Session<C, P>, plan: OneShot) -> Result<i32>
where
    C: Classifier,
    P: HistoryStore,
{
    let bar = progress::track_analysis(session.subscribe(), plan.hide_progress);

    let current = match session.analyze().await {
        Ok(current) => {
            let _ = bar.await;
            current
        }
        Err(e) => {
            bar.abort();
            return Err(e.into());
        }
    };

    print!("{}", report::render_report(&current, plan.format)?);

    if let Some(notice) = report::generate_failure_notice(&current) {
        warn!("{}", notice);
        if plan.strict {
            return Ok(2);
        }
    }

    Ok(0)
}
