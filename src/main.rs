mod cli;
mod config;
mod decode;
mod evaluator;
mod llm;
mod registry;
mod review;
mod rule;
mod types;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Commands, InitArgs, ReviewArgs};
use config::Config;
use evaluator::LlmEvaluator;
use llm::OpenAiProvider;
use registry::Registry;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .init();

    let result = match &cli.command {
        Commands::Init(args) => run_init(args),
        Commands::Review(args) => run_review(args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn run_init(args: &InitArgs) -> anyhow::Result<()> {
    if Path::new(&args.config).exists() && !args.r#override {
        bail!(
            "config file {} already exists, pass --override to replace it",
            args.config
        );
    }

    let content = Config::default().to_toml()?;
    std::fs::write(&args.config, content)
        .with_context(|| format!("failed to write config file {}", args.config))?;
    info!("Config written to {}", args.config);
    Ok(())
}

async fn run_review(args: &ReviewArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;

    // Unreadable or non-UTF-8 input is the one failure class that aborts the
    // whole evaluation.
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read source file {}", args.file))?;
    info!("Analyzing file: {}", args.file);

    let provider = OpenAiProvider::new(
        &config.llm.base_url,
        &args.api_key,
        &config.llm.model,
        config.llm.temperature,
        config.llm.max_tokens,
    );
    let registry = Registry::with_evaluator(config.rules.clone(), Arc::new(LlmEvaluator::new(provider)));
    info!("Loaded {} rules", registry.len());

    // Ctrl+C sets the shutdown flag; the orchestrator turns it into an
    // all-or-nothing cancellation so no partial report is ever written.
    let shutdown = Arc::new(Mutex::new(false));
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        warn!("Received Ctrl+C, cancelling review...");
        *shutdown_clone.lock().await = true;
    });

    let analysis = review::orchestrator::evaluate_all(
        &registry,
        &source,
        config.worker.max_parallel_rules,
        Duration::from_secs(config.worker.evaluator_timeout_secs),
        shutdown,
    )
    .await?;

    let file_name = Path::new(&args.file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.clone());

    let report = review::report::build_report(&file_name, &analysis);
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| default_report_path(&args.file));
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write report {}", report_path))?;
    info!("JSON report saved to: {}", report_path);

    let annotated = review::annotate::annotate(&source, &analysis);
    let annotated_path = args
        .annotated
        .clone()
        .unwrap_or_else(|| default_annotated_path(&args.file));
    std::fs::write(&annotated_path, annotated)
        .with_context(|| format!("failed to write annotated file {}", annotated_path))?;
    info!("Annotated code saved to: {}", annotated_path);

    info!("Analysis complete");
    Ok(())
}

fn default_report_path(file: &str) -> String {
    sibling_path(file, "_report", Some("json"))
}

fn default_annotated_path(file: &str) -> String {
    sibling_path(file, "_annotated", None)
}

/// Build `<stem><suffix>.<ext>` next to the input file; `ext` overrides the
/// input's extension, `None` keeps it.
fn sibling_path(file: &str, suffix: &str, ext: Option<&str>) -> String {
    let path = Path::new(file);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    let ext = ext
        .map(|e| e.to_string())
        .or_else(|| path.extension().map(|e| e.to_string_lossy().into_owned()));
    let file_name = match ext {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name).to_string_lossy().into_owned()
}
