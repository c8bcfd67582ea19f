//! Visitor display preferences: language and colour theme.
//!
//! Preferences are an explicit value loaded and saved at defined points,
//! stored at `~/.config/delta-offline/preferences.json`. An unset theme
//! follows the system colour scheme until the visitor picks one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

/// Preferences file name
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ar" => Some(Language::Ar),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    /// Text direction for the document root
    pub fn direction(self) -> &'static str {
        match self {
            Language::Ar => "rtl",
            Language::En => "ltr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    /// Explicit choice; `None` follows the system
    pub theme: Option<Theme>,
}

impl Preferences {
    /// Theme to render given whether the system prefers dark
    pub fn effective_theme(&self, system_prefers_dark: bool) -> Theme {
        match self.theme {
            Some(theme) => theme,
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    /// Flip the rendered theme and record it as an explicit choice
    pub fn toggle_theme(&mut self, system_prefers_dark: bool) -> Theme {
        let next = self.effective_theme(system_prefers_dark).opposite();
        self.theme = Some(next);
        next
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::preferences_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::preferences_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn preferences_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(PREFERENCES_FILE))
    }
}
