//! CLI entry point for the dashboard engine.

use anyhow::{Context, Result, anyhow};
use autodash_engine::{
    DashboardSession, EngineConfig, FilterSet, Generation, RemoteOutcome, TabularParser, ViewSize,
};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

#[cfg(feature = "remote")]
use autodash_engine::remote::{HttpDashboardProvider, RemoteConfig, generate_with_timeout};
#[cfg(feature = "remote")]
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Schema-inference-driven dashboard generator",
    long_about = "Turns a CSV file into a dashboard of Vega-Lite views and KPIs.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  AUTODASH_BACKEND_URL    Base URL of the remote generation backend\n\n\
                  EXAMPLES:\n  \
                  # Inspect inferred column types\n  \
                  autodash profile -i sales.csv\n\n  \
                  # Generate with a chart selection and a filter\n  \
                  autodash generate -i sales.csv --chart \"Bar Chart\" --filter '{\"region\": [\"North\"]}'\n\n  \
                  # Ask the backend for a dashboard, keeping the local one on failure\n  \
                  autodash generate -i sales.csv --remote-intent \"revenue trend by month\" --json"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs so stdout holds only JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show inferred column types and profiles
    Profile {
        /// Path to the CSV file
        #[arg(short, long)]
        input: String,
    },

    /// Generate a dashboard
    Generate {
        /// Path to the CSV file
        #[arg(short, long)]
        input: String,

        /// Requested chart type (repeatable), e.g. "Bar Chart", "Scatter Plot"
        #[arg(short, long = "chart")]
        charts: Vec<String>,

        /// Filters as JSON: column -> [values] | {"min": .., "max": ..} | "text" | null
        #[arg(short, long)]
        filter: Option<String>,

        /// Resize a view by position, e.g. 0=large (repeatable)
        #[arg(long = "size", value_parser = parse_size_override)]
        sizes: Vec<(usize, ViewSize)>,

        /// Ask the remote backend for a dashboard matching this intent
        #[arg(long)]
        remote_intent: Option<String>,

        /// Remote backend base URL (overrides AUTODASH_BACKEND_URL)
        #[arg(long)]
        backend_url: Option<String>,

        /// Remote request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Dashboard title
        #[arg(long)]
        title: Option<String>,
    },

    /// Write the filtered rows as CSV
    Export {
        /// Path to the CSV file
        #[arg(short, long)]
        input: String,

        /// Filters as JSON
        #[arg(short, long)]
        filter: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_size_override(s: &str) -> std::result::Result<(usize, ViewSize), String> {
    let (index, size) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=SIZE, got '{}'", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid view index '{}': {}", index, e))?;
    Ok((index, size.parse()?))
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    match &args.command {
        Command::Profile { input } => run_profile(input, args.json),
        Command::Generate {
            input,
            charts,
            filter,
            sizes,
            remote_intent,
            backend_url,
            timeout_secs,
            title,
        } => {
            let mut config = EngineConfig::builder();
            if let Some(title) = title {
                config = config.dashboard_title(title);
            }
            let mut session = load_session(input, config.build()?)?;

            if !charts.is_empty() {
                session.set_selection(charts.iter().cloned())?;
            }
            if let Some(filter) = filter {
                session.set_filters(FilterSet::from_json(filter)?)?;
            }

            let remote = match remote_intent {
                Some(intent) => Some(run_remote(
                    &mut session,
                    intent,
                    backend_url.as_deref(),
                    *timeout_secs,
                )?),
                None => None,
            };

            for (index, size) in sizes {
                session
                    .resize_view(*index, *size)
                    .with_context(|| format!("Cannot resize view {}", index))?;
            }

            let generation = session
                .generation()
                .ok_or_else(|| anyhow!("No dashboard was generated"))?;
            print_generation(generation, remote.as_ref(), args.json)
        }
        Command::Export {
            input,
            filter,
            output,
        } => {
            let mut session = load_session(input, EngineConfig::default())?;
            if let Some(filter) = filter {
                session.set_filters(FilterSet::from_json(filter)?)?;
            }

            let filtered = session.filtered_raw();
            let csv = TabularParser::new().serialize(&filtered);
            match output {
                Some(path) => {
                    std::fs::write(path, csv)?;
                    info!("Wrote {} rows to {}", filtered.rows.len(), path);
                }
                None => print!("{}", csv),
            }
            Ok(())
        }
    }
}

fn load_session(input: &str, config: EngineConfig) -> Result<DashboardSession> {
    let path = Path::new(input);
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", input));
    }

    info!("Loading dataset from: {}", input);
    let mut session = DashboardSession::new(config);
    session.load_file(path)?;
    Ok(session)
}

#[cfg(feature = "remote")]
fn run_remote(
    session: &mut DashboardSession,
    intent: &str,
    backend_url: Option<&str>,
    timeout_secs: u64,
) -> Result<RemoteOutcome> {
    let base_url = backend_url
        .map(str::to_string)
        .or_else(|| std::env::var("AUTODASH_BACKEND_URL").ok())
        .unwrap_or_else(|| autodash_engine::remote::DEFAULT_BASE_URL.to_string());

    let config = RemoteConfig::builder()
        .base_url(base_url)
        .timeout_secs(timeout_secs)
        .build();
    info!("Requesting remote dashboard from {}", config.url());
    let provider = HttpDashboardProvider::with_config(config)?;

    let (ticket, request) = session.begin_remote(intent)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(generate_with_timeout(
        &provider,
        &request,
        Duration::from_secs(timeout_secs),
    ));

    Ok(session.apply_remote(ticket, result))
}

#[cfg(not(feature = "remote"))]
fn run_remote(
    _session: &mut DashboardSession,
    _intent: &str,
    _backend_url: Option<&str>,
    _timeout_secs: u64,
) -> Result<RemoteOutcome> {
    warn!("Built without the 'remote' feature; keeping the local dashboard");
    Ok(RemoteOutcome::Failed {
        warning: "remote generation is not available in this build".to_string(),
    })
}

fn run_profile(input: &str, json_output: bool) -> Result<()> {
    let session = load_session(input, EngineConfig::default())?;
    let profile = session
        .profile()
        .ok_or_else(|| anyhow!("Dataset has no columns"))?;

    if json_output {
        let out = json!({
            "profile": profile,
            "schema": session.schema().buckets(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DATASET PROFILE");
    println!("{}\n", "=".repeat(80));
    println!("  File: {}", input);
    println!("  Rows: {}", profile.row_count);
    println!("  Columns: {}", profile.columns.len());
    println!();

    println!(
        "{:<24} {:<12} {:<10} {:<8} {:<12} Samples",
        "Column", "Kind", "Missing", "Unique", "Categorical"
    );
    println!("{}", "-".repeat(80));
    for col in &profile.columns {
        println!(
            "{:<24} {:<12} {:<10.3} {:<8} {:<12} {}",
            truncate_str(&col.name, 23),
            col.kind.as_str(),
            col.missing_pct,
            col.unique_count,
            if col.likely_categorical { "yes" } else { "no" },
            col.samples.join(", ")
        );
    }
    println!();
    Ok(())
}

fn print_generation(
    generation: &Generation,
    remote: Option<&RemoteOutcome>,
    json_output: bool,
) -> Result<()> {
    if let Some(RemoteOutcome::Failed { warning }) = remote {
        warn!("Remote generation failed, keeping local dashboard: {}", warning);
    }

    if json_output {
        let out = json!({
            "dashboard": generation.dashboard,
            "kpis": generation.kpis,
            "remote": remote,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let dashboard = &generation.dashboard;
    let kpis = &generation.kpis;

    println!("\n{}", "=".repeat(80));
    println!("{}", dashboard.title.to_uppercase());
    println!("{}\n", "=".repeat(80));
    if !dashboard.description.is_empty() {
        println!("  {}", dashboard.description);
        println!();
    }

    println!("KPIS");
    println!("{}", "-".repeat(40));
    println!("  Rows: {}", kpis.row_count);
    print_metric(kpis.primary_label.as_deref(), kpis.primary_total, "Total");
    print_metric(kpis.secondary_label.as_deref(), kpis.secondary_total, "Total");
    print_metric(kpis.primary_label.as_deref(), kpis.avg_primary, "Average");
    if let (Some(label), Some(value)) = (&kpis.top_label, kpis.top_value) {
        println!("  Top: {} ({})", label, value);
    }
    println!();

    println!("VIEWS (layout: {} columns)", dashboard.layout.columns);
    println!("{}", "-".repeat(40));
    for (i, view) in dashboard.views.iter().enumerate() {
        println!(
            "  [{}] {:<16} {:<8} {}",
            i,
            view.id,
            format!("{:?}", view.size).to_lowercase(),
            view.title
        );
    }
    if dashboard.views.is_empty() {
        println!("  No chart could be built from the available columns");
    }

    match remote {
        Some(RemoteOutcome::Applied) => println!("\n  Remote dashboard applied"),
        Some(RemoteOutcome::Superseded) => println!("\n  Remote response was superseded"),
        Some(RemoteOutcome::Failed { warning }) => println!("\n  Remote warning: {}", warning),
        None => {}
    }
    println!();
    Ok(())
}

fn print_metric(label: Option<&str>, value: Option<f64>, kind: &str) {
    if let (Some(label), Some(value)) = (label, value) {
        println!("  {} {}: {}", kind, label, value);
    }
}

/// Truncate a string to max length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
