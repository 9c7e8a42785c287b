use clap::{Parser, Subcommand};

// Display order for API key option (placed at top of help text)
const API_KEY_DISPLAY_ORDER: usize = 0;
// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(name = "codewarden", version, about = "Reviews source files against a rule catalog and annotates violations", long_about = None)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: CODEWARDEN_LOG=] [default: info]
    #[arg(
        long,
        env = "CODEWARDEN_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a default codewarden.toml config file
    Init(InitArgs),
    /// Review a source file against the rule catalog
    Review(ReviewArgs),
}

/// Arguments for the init command
#[derive(Parser)]
pub struct InitArgs {
    /// Path to config file
    #[arg(long, default_value = "codewarden.toml")]
    pub config: String,

    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// Arguments for the review command
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Source file to analyze
    pub file: String,

    /// Path to config file (initialize with `codewarden init`)
    #[arg(long, default_value = "codewarden.toml")]
    pub config: String,

    /// LLM API key
    #[arg(long, env = "CODEWARDEN_LLM_API_KEY", display_order = API_KEY_DISPLAY_ORDER)]
    pub api_key: String,

    /// JSON report output path [default: <file stem>_report.json]
    #[arg(long)]
    pub report: Option<String>,

    /// Annotated copy output path [default: <file stem>_annotated.<ext>]
    #[arg(long)]
    pub annotated: Option<String>,
}
