use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, normalize_service_url, GenerationClient};
use serde::Serialize;
use shared::{
    error::ServiceCallError,
    protocol::{AiMode, GenerationRequest, HealthStatus},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Diagnose the test generation service")]
struct Cli {
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Service banner from `GET /`.
    Info,
    /// Reachability and AI key state from `GET /health`.
    Health,
    /// Live AI backend check from `GET /ai-status`.
    AiStatus,
    /// Code quality analysis of a source file.
    AnalyzeCode { file: PathBuf },
    /// Coverage analysis of a test file.
    AnalyzeTests { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(service_url) = &cli.service_url {
        settings.service_url = normalize_service_url(service_url)?;
    }
    let client = GenerationClient::new(settings.service_url.clone());
    info!(service_url = %client.service_url(), "querying generation service");

    match cli.command {
        Command::Info => print_json(&client.service_info().await?)?,
        Command::Health => {
            let outcome = client.health().await;
            println!("{}", health_verdict(&outcome));
            print_json(&outcome?)?;
        }
        Command::AiStatus => print_json(&client.ai_status().await?)?,
        Command::AnalyzeCode { file } => {
            let request = analysis_request(&file, &settings)?;
            print_json(&client.analyze_code(&request).await?)?;
        }
        Command::AnalyzeTests { file } => {
            let request = analysis_request(&file, &settings)?;
            print_json(&client.analyze_tests(&request).await?)?;
        }
    }

    Ok(())
}

fn analysis_request(
    file: &Path,
    settings: &client_core::Settings,
) -> Result<GenerationRequest> {
    let code = fs::read_to_string(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| settings.file_name.clone());
    Ok(GenerationRequest::new(code)
        .with_file_name(file_name)
        .with_language(settings.language.clone()))
}

fn health_verdict(outcome: &Result<HealthStatus, ServiceCallError>) -> String {
    match outcome {
        Ok(health) => match health.ai_mode {
            AiMode::Connected => "reachable; AI backend connected".to_string(),
            AiMode::MissingKey => "reachable; AI key missing".to_string(),
            AiMode::Unknown => "reachable; AI backend state unknown".to_string(),
        },
        Err(err) if err.is_transport() => format!("unreachable: {err}"),
        Err(err) => format!("reachable; health check failed: {err}"),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
