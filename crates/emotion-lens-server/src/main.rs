//! emotion-lens
//!
//! Scores text over four target emotions (pride, nostalgia, love, hope)
//! plus an auxiliary sentiment label.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the configured address (default 127.0.0.1:5001)
//! emotion-lens serve
//!
//! # Serve with a custom config and port
//! emotion-lens --config /path/to/config.toml serve --port 8080
//!
//! # One-off analysis printed as JSON
//! emotion-lens analyze --text "So proud of where we came from"
//!
//! # Environment override (used if CLI not specified)
//! EMOTION_LENS__SERVER__PORT=8080 emotion-lens serve
//!
//! # Debug logging
//! RUST_LOG=debug emotion-lens serve
//! ```
//!
//! # Priority
//!
//! CLI arguments > Environment variables > Config file > Defaults

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use emotion_lens_classifiers::load_classifiers;
use emotion_lens_core::{Config, EmotionEngine, MAPPING_TABLE_VERSION};
use emotion_lens_server::logging::init_logging;
use emotion_lens_server::{create_router, validate_text, AppState};

/// emotion-lens - text to emotion scoring service
#[derive(Parser)]
#[command(name = "emotion-lens")]
#[command(version)]
#[command(about = "Score text over pride, nostalgia, love and hope")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML). Environment overrides still apply.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Analyze one text and print the result as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address override
    #[arg(long)]
    bind: Option<String>,

    /// Port override
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Text to analyze
    #[arg(long)]
    text: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Logging may not be up yet
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading configuration")?,
    };

    init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Serve(args) => {
            apply_serve_overrides(&mut config, &args);
            config.validate().context("validating configuration")?;
            serve(config).await?;
            Ok(0)
        }
        Commands::Analyze(args) => analyze_once(&config, &args.text).await,
    }
}

fn apply_serve_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(ref bind) = args.bind {
        info!("CLI override: bind_address = {}", bind);
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = args.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
}

async fn serve(config: Config) -> Result<()> {
    info!(
        mapping_table = MAPPING_TABLE_VERSION,
        emotion_backend = config.emotion.backend.as_str(),
        emotion_model = %config.emotion.model,
        sentiment_backend = config.sentiment.backend.as_str(),
        sentiment_model = %config.sentiment.model,
        "emotion-lens starting"
    );

    let handles = load_classifiers(&config).await;
    if !handles.emotion_available() {
        warn!("Emotion classifier unavailable: every /analyze call will fail until restart");
    }

    let engine = Arc::new(EmotionEngine::with_config(handles, config.engine_config()));
    let app = create_router(AppState::from_config(Arc::clone(&engine), &config));

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(
        address = %addr,
        emotion_model_loaded = engine.emotion_available(),
        sentiment_model_loaded = engine.sentiment_available(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    let stats = engine.stats();
    info!(
        analyses = stats.analyses,
        inference_errors = stats.inference_errors,
        unavailable = stats.unavailable,
        sentiment_failures = stats.sentiment_failures,
        "emotion-lens stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            // Keep serving; the process can still be killed
            std::future::pending::<()>().await;
        }
    }
}

/// Returns the process exit code: 0 on success, 1 on any failure.
async fn analyze_once(config: &Config, text: &str) -> Result<i32> {
    let text = match validate_text(text, config.limits.max_text_chars) {
        Ok(text) => text,
        Err(e) => {
            error!("{}", e);
            return Ok(1);
        }
    };

    let handles = load_classifiers(config).await;
    let engine = EmotionEngine::with_config(handles, config.engine_config());

    match engine.analyze(text).await {
        Ok(result) => {
            let json = serde_json::to_string_pretty(&result).context("serializing result")?;
            println!("{}", json);
            Ok(0)
        }
        Err(e) => {
            error!(error = %e, "Analysis failed");
            Ok(1)
        }
    }
}
