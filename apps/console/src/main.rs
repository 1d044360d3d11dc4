use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, normalize_service_url, GenerationClient};
use crossbeam_channel::bounded;
use shared::protocol::GenerationRequest;
use tracing_subscriber::EnvFilter;

use crate::controller::reducer::Controller;
use crate::ui::{input::spawn_reader, Session};

const COMMAND_QUEUE_CAPACITY: usize = 16;
const UI_EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(
    name = "testgen",
    version,
    about = "Generate tests for Python code through the test generation service",
    after_help = "Exit status: 0 on success, 1 for empty input or a service error, 2 when the service is unreachable."
)]
struct Args {
    /// Source file to submit (`-` reads stdin). Starts an interactive session when omitted.
    file: Option<PathBuf>,
    /// Base URL of the generation service.
    #[arg(long)]
    service_url: Option<String>,
    /// File name reported to the service.
    #[arg(long)]
    file_name: Option<String>,
    #[arg(long)]
    language: Option<String>,
    /// Existing tests for the service to extend.
    #[arg(long)]
    existing_tests: Option<PathBuf>,
    /// Config file (defaults to ./testgen.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(service_url) = &args.service_url {
        settings.service_url = normalize_service_url(service_url)?;
    }
    if let Some(file_name) = args.file_name {
        settings.file_name = file_name;
    }
    if let Some(language) = args.language {
        settings.language = language;
    }
    let existing_tests = args
        .existing_tests
        .as_deref()
        .map(read_source)
        .transpose()?;

    let template = GenerationRequest::new(String::new())
        .with_file_name(settings.file_name)
        .with_language(settings.language)
        .with_existing_tests(existing_tests);
    let controller = Controller::new(settings.service_url.clone(), template);

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(UI_EVENT_QUEUE_CAPACITY);
    let service = Arc::new(GenerationClient::new(settings.service_url));
    backend_bridge::runtime::launch(service, cmd_rx, ui_tx.clone());

    let stdout = io::stdout();
    let snapshot = match args.file {
        Some(path) => {
            drop(ui_tx);
            let source_code = read_source(&path)?;
            Session::new(controller, cmd_tx, ui_rx, stdout.lock()).run_once(&source_code)?
        }
        None => {
            spawn_reader(io::BufReader::new(io::stdin()), ui_tx);
            Session::new(controller, cmd_tx, ui_rx, stdout.lock()).run_interactive()?
        }
    };

    Ok(ExitCode::from(snapshot.exit_status()))
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read source from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}
