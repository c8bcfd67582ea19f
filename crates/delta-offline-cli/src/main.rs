//! delta-offline - command-line host for the DELTA Lighting offline cache manager.
//!
//! Each invocation restores the worker from the cache directory, delivers
//! one lifecycle event, and records the resulting state.

mod cli;
mod host;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use cli::{parse_language_arg, Cli, Command, PrefsCommand};
use delta_offline_core::{
    CacheStore, HttpNetwork, NotificationClick, OfflineCacheManager, Preferences, Registration,
    RegistrationStore, Request, Theme, WorkerConfig,
};
use host::ConsoleHost;

/// Sub-directory of the cache directory holding generation files
const GENERATIONS_DIR: &str = "generations";

type Manager = OfflineCacheManager<CacheStore, HttpNetwork, ConsoleHost>;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=delta_offline_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Command::Prefs { command } = &cli.command {
        return run_prefs(command.as_ref());
    }

    let config = load_config(&cli)?;
    let cache_dir = match &cli.cache_dir {
        Some(dir) => dir.clone(),
        None => WorkerConfig::default_cache_dir()?,
    };

    let registrations = RegistrationStore::new(cache_dir.clone());
    let state = registrations
        .load()?
        .map(|r| r.state_for(&config.cache_name))
        .unwrap_or_default();

    let store = CacheStore::persistent(cache_dir.join(GENERATIONS_DIR))
        .await
        .context("Failed to open cache store")?;
    let network = HttpNetwork::new()?.with_offline(cli.offline);
    let host = match &cli.command {
        Command::Click { windows, .. } => ConsoleHost::from_urls(windows)?,
        _ => ConsoleHost::new(Vec::new()),
    };

    let mut manager = OfflineCacheManager::new(config, store, network, host).with_state(state);
    info!(cache = %manager.config().cache_name, state = %state, "Worker restored");

    let result = run_command(&mut manager, &cli.command, &cache_dir).await;

    match cli.command {
        // A failed activation still moves the worker, so record the state either way
        Command::Install | Command::Activate => registrations.save(&Registration::new(
            manager.config().cache_name.clone(),
            manager.state(),
        ))?,
        Command::Reset if result.is_ok() => registrations.clear()?,
        _ => {}
    }

    result
}

fn load_config(cli: &Cli) -> Result<WorkerConfig> {
    let mut config = WorkerConfig::load()?;
    if let Some(ref origin) = cli.origin {
        config.origin =
            Url::parse(origin).with_context(|| format!("Invalid origin URL '{}'", origin))?;
    }
    if let Some(ref name) = cli.cache_name {
        config.cache_name = name.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(manager: &mut Manager, command: &Command, cache_dir: &Path) -> Result<()> {
    match command {
        Command::Install => {
            let report = manager.on_install().await?;
            print_json(&report)
        }
        Command::Activate => {
            let report = manager.on_activate().await?;
            print_json(&report)
        }
        Command::Fetch { path } => {
            let url = manager
                .config()
                .resolve(path)
                .with_context(|| format!("Invalid path '{}'", path))?;
            let response = manager.on_fetch(&Request::get(url)).await?;
            eprintln!("HTTP {}", response.status);
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.body)?;
            stdout.flush()?;
            Ok(())
        }
        Command::Status => print_status(manager, cache_dir).await,
        Command::Reset => {
            for name in manager.unregister().await? {
                println!("Deleted {}", name);
            }
            Ok(())
        }
        Command::Sync { tag } => {
            let outcome = manager.on_sync(tag).await;
            print_json(&outcome)
        }
        Command::Push { text } => {
            manager.on_push(text.as_deref()).await?;
            Ok(())
        }
        Command::Click { action, .. } => {
            let click = NotificationClick::new("cli", action.as_deref());
            let outcome = manager.on_notification_click(&click).await?;
            print_json(&outcome)
        }
        // Handled before the worker is restored
        Command::Prefs { .. } => Ok(()),
    }
}

async fn print_status(manager: &Manager, cache_dir: &Path) -> Result<()> {
    let config = manager.config();
    println!("Origin:     {}", config.origin);
    println!("Cache:      {}", config.cache_name);
    println!("State:      {}", manager.state());
    println!("Directory:  {}", cache_dir.display());

    let missing = manager.missing_precache().await?;
    println!(
        "Precached:  {}/{}",
        config.precache.len() - missing.len(),
        config.precache.len()
    );
    for path in &missing {
        println!("  missing {}", path);
    }

    let summaries = manager.cache().summaries().await;
    if summaries.is_empty() {
        println!("Generations: none");
        return Ok(());
    }
    println!("Generations:");
    for summary in summaries {
        let marker = if summary.name == config.cache_name { "*" } else { " " };
        println!(
            "  {} {} ({} entries, last write {})",
            marker,
            summary.name,
            summary.entries,
            summary.last_write.as_deref().unwrap_or("never")
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct PrefsView {
    language: &'static str,
    direction: &'static str,
    theme: &'static str,
    theme_source: &'static str,
}

impl PrefsView {
    fn new(prefs: &Preferences, system_dark: bool) -> Self {
        let theme = match prefs.effective_theme(system_dark) {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        Self {
            language: prefs.language.code(),
            direction: prefs.language.direction(),
            theme,
            theme_source: if prefs.theme.is_some() { "saved" } else { "system" },
        }
    }
}

fn run_prefs(command: Option<&PrefsCommand>) -> Result<()> {
    let mut prefs = Preferences::load()?;
    let system_dark = match command {
        None => false,
        Some(PrefsCommand::Show { system_dark }) => *system_dark,
        Some(PrefsCommand::Lang { code }) => {
            prefs.set_language(parse_language_arg(code)?);
            prefs.save()?;
            false
        }
        Some(PrefsCommand::Theme { system_dark }) => {
            prefs.toggle_theme(*system_dark);
            prefs.save()?;
            *system_dark
        }
    };
    print_json(&PrefsView::new(&prefs, system_dark))
}
