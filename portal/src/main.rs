//! DDA Portal - command-line entry point
//!
//! Drives the portal backend: lists use cases, devices and components,
//! resolves component compatibility, creates and watches deployments, and
//! checks labeling manifests before training.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use colored::Colorize;
use ddaportal::app::options::AppOptions;
use ddaportal::app::run::{run, COMMANDS};
use ddaportal::errors::Alert;
use ddaportal::logs::init_logging;
use ddaportal::storage::layout::StorageLayout;
use ddaportal::storage::settings::Settings;
use ddaportal::utils::version_info;

use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut command: Option<String> = None;
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        } else if command.is_none() {
            command = Some(arg.clone());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to render version: {}", e),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match cli_args.get("config-dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };
    let settings_file = layout.settings_file();

    // Write a default settings file to edit
    if cli_args.contains_key("init-config") {
        if settings_file.exists().await {
            eprintln!("{} already exists", settings_file.path().display());
            return ExitCode::FAILURE;
        }
        if let Err(e) = settings_file.write_json(&Settings::default()).await {
            eprintln!("Unable to write {}: {}", settings_file.path().display(), e);
            return ExitCode::FAILURE;
        }
        println!("Wrote {}", settings_file.path().display());
        return ExitCode::SUCCESS;
    }

    let Some(command) = command else {
        eprintln!("Usage: ddaportal <command> [--key=value ...]");
        eprintln!("Commands: {}", COMMANDS.join(", "));
        return ExitCode::FAILURE;
    };

    // Retrieve the settings file
    let mut settings = match settings_file.read_json_or_default::<Settings>().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "Unable to read settings file {}: {}",
                settings_file.path().display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };
    settings.apply_env();
    if let Some(url) = cli_args.get("base-url") {
        settings.backend.base_url = url.clone();
    }

    let options = AppOptions::from_settings(&settings);
    if let Err(e) = init_logging(options.log.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }
    debug!("Loaded settings from {}", settings_file.path().display());

    match run(&options, &command, &cli_args, await_shutdown_signal()).await {
        Ok(output) => {
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to render output: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command '{}' failed: {}", command, e);
            let alert = Alert::from(&e);
            eprintln!("{} {}", "error:".red().bold(), alert.message);
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            error!("Unable to install signal handlers");
            std::future::pending::<()>().await;
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
        }
    }
}
