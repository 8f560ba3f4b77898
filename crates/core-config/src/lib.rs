//! Configuration loading (spec.md §4.10's Mode bundle, surfaced as a TOML
//! file): per-extension tokenizer selection, indent/case overrides per
//! language, and the tokenizer check-point interval.
//!
//! Grounded on the teacher's `core-config::lib.rs` for the *shape* of
//! config loading — `discover`/`load_from`, default-on-parse-error
//! resilience, `tracing::info!` on any value that gets clamped or falls
//! back — while replacing its scroll-margin/input-timeout fields (render
//! and input concerns with no counterpart in this spec) with the fields
//! spec.md §4.10 actually describes a Mode needing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs;

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use core_search::CaseHandling;
use core_state::{Mode, TokenizerKind};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseOverride {
    CaseSensitive,
    CaseInsensitive,
    UppercaseSticky,
    SmartCase,
}

impl CaseOverride {
    fn into_case_handling(self) -> CaseHandling {
        match self {
            CaseOverride::CaseSensitive => CaseHandling::CaseSensitive,
            CaseOverride::CaseInsensitive => CaseHandling::CaseInsensitive,
            CaseOverride::UppercaseSticky => CaseHandling::UppercaseSticky,
            CaseOverride::SmartCase => CaseHandling::SmartCase,
        }
    }
}

/// A `[languages.<name>]` table: any field left unset falls back to that
/// language's built-in `Mode` default rather than to a hardcoded value, so
/// adding a new override field here never has to also teach it a default.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LanguageConfig {
    #[serde(default)]
    pub indent_width: Option<u32>,
    #[serde(default)]
    pub tabs: Option<bool>,
    #[serde(default)]
    pub case: Option<CaseOverride>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenizerSection {
    #[serde(default = "TokenizerSection::default_check_point_interval")]
    pub check_point_interval: u64,
}

impl Default for TokenizerSection {
    fn default() -> Self {
        Self { check_point_interval: Self::default_check_point_interval() }
    }
}

impl TokenizerSection {
    const fn default_check_point_interval() -> u64 {
        1000
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub tokenizer: TokenizerSection,
    #[serde(default)]
    pub languages: HashMap<String, LanguageConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// Best-effort config path following platform conventions: a local
/// `editor.toml` takes precedence over the user's XDG/AppData config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("editor.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("editor").join("editor.toml");
    }
    PathBuf::from("editor.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config { raw: Some(content), file }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

fn tokenizer_kind_for_extension(path: &Path) -> TokenizerKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("cpp" | "cc" | "cxx" | "hpp" | "hh" | "h" | "c") => TokenizerKind::Cpp,
        Some("md" | "markdown") => TokenizerKind::Markdown,
        Some("sh" | "bash" | "zsh") => TokenizerKind::ShellScript,
        _ => TokenizerKind::PlainText,
    }
}

fn base_mode_for_kind(kind: TokenizerKind) -> Mode {
    match kind {
        TokenizerKind::PlainText => Mode::plaintext(),
        TokenizerKind::Cpp => Mode::cpp(),
        TokenizerKind::Markdown => Mode::markdown(),
        TokenizerKind::ShellScript => Mode::shell(),
        TokenizerKind::BufferName => Mode::buffer_name(),
    }
}

fn language_key(kind: TokenizerKind) -> &'static str {
    match kind {
        TokenizerKind::PlainText => "plaintext",
        TokenizerKind::Cpp => "cpp",
        TokenizerKind::Markdown => "markdown",
        TokenizerKind::ShellScript => "shell",
        TokenizerKind::BufferName => "buffer_name",
    }
}

impl Config {
    /// The tokenizer check-point interval (spec.md §4.5's `K`), clamped to
    /// at least 1 — a `0` in the file would make every position its own
    /// check-point, defeating its purpose.
    pub fn check_point_interval(&self) -> u64 {
        let raw = self.file.tokenizer.check_point_interval;
        if raw == 0 {
            warn!(target: "config", "check_point_interval_zero_clamped_to_one");
            1
        } else {
            raw
        }
    }

    /// Resolves a file path's extension to a base [`Mode`], then applies
    /// any matching `[languages.<name>]` override from this config.
    pub fn mode_for_path(&self, path: &Path) -> Mode {
        let kind = tokenizer_kind_for_extension(path);
        let mut mode = base_mode_for_kind(kind);

        if let Some(lang) = self.file.languages.get(language_key(kind)) {
            if let Some(width) = lang.indent_width {
                mode.indent.width = width;
            }
            if let Some(tabs) = lang.tabs {
                mode.indent.tabs = tabs;
            }
            if let Some(case) = lang.case {
                mode.default_case = case.into_case_handling();
            }
            info!(target: "config", language = language_key(kind), "language_override_applied");
        }

        mode
    }
}
