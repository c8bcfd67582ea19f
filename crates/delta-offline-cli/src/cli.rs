//! Command-line interface parsing for delta-offline.
//!
//! Each subcommand delivers one lifecycle event to the cache manager. State
//! lives in the cache directory, so `install`, `activate` and `fetch` can be
//! run as separate invocations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use delta_offline_core::Language;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid language: '{0}'. Valid languages: ar, en")]
    InvalidLanguage(String),
}

/// Drive the DELTA Lighting offline cache manager from the command line
#[derive(Parser, Debug)]
#[command(name = "delta-offline")]
#[command(about = "Offline cache manager for the DELTA Lighting Lab website")]
#[command(version)]
pub struct Cli {
    /// Site origin, e.g. https://delta-lighting.example/
    #[arg(long, global = true, env = "DELTA_OFFLINE_ORIGIN")]
    pub origin: Option<String>,

    /// Directory holding cache generations and the worker registration
    #[arg(long, global = true, env = "DELTA_OFFLINE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Cache generation to run as (overrides the configured version)
    #[arg(long, global = true)]
    pub cache_name: Option<String>,

    /// Fail every network fetch, as if the device were disconnected
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Precache the manifest into the current generation
    Install,
    /// Delete stale generations and start serving
    Activate,
    /// Answer a request the way the worker would
    Fetch {
        /// Path or URL relative to the origin
        path: String,
    },
    /// Show worker state and cache generations
    Status,
    /// Deliver a background sync event
    Sync {
        tag: String,
    },
    /// Deliver a push event
    Push {
        /// Push payload text; omitted uses the default message
        text: Option<String>,
    },
    /// Deliver a notification click
    Click {
        /// Action button pressed ("open", "close"); omitted means the body
        #[arg(long)]
        action: Option<String>,
        /// URL of an open window; may be repeated
        #[arg(long = "window", value_name = "URL")]
        windows: Vec<String>,
    },
    /// Delete every cache generation and forget the worker registration
    Reset,
    /// Show or change display preferences
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommand>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print the current language, direction and theme
    Show {
        /// Treat the system colour scheme as dark
        #[arg(long)]
        system_dark: bool,
    },
    /// Set the display language
    Lang { code: String },
    /// Flip between light and dark
    Theme {
        /// Treat the system colour scheme as dark
        #[arg(long)]
        system_dark: bool,
    },
}

pub fn parse_language_arg(code: &str) -> Result<Language, CliError> {
    Language::from_code(code).ok_or_else(|| CliError::InvalidLanguage(code.to_string()))
}
