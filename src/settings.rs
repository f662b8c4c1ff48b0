//! Settings infrastructure for wslsp.
//!
//! This module provides support for loading and parsing `whitespaces.toml`
//! files and resolving them into the `Policy` that gates which documents are
//! inspected and which issue kinds run on display and on save.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::whitespace::IssueKind;

/// Name of the settings file looked up by [`discover_settings`].
pub const SETTINGS_FILE: &str = "whitespaces.toml";

/// Allowlist entry accepting every syntax.
const ANY_SYNTAX: &str = "*";

/// Root settings structure loaded from whitespaces.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Syntaxes eligible for automatic display and fix-on-save.
    /// Entries may be bare names or path-like identifiers; `"*"` allows all.
    pub limit_to_syntax: Option<Vec<String>>,

    /// Issue kinds scanned when a document is loaded or modified:
    /// any of "eof", "extra", "trailing".
    pub auto_display: Option<Vec<String>>,

    /// Issue kinds fixed right before a document is saved.
    pub fix_on_save: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse settings from TOML source.
pub fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a settings file.
pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content)
}

/// Load settings from a whitespaces.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Settings::default()
        }
        Err(e) => {
            warn!("{}", e);
            Settings::default()
        }
    }
}

/// Discover whitespaces.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found file. If not found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}

/// Resolved eligibility and auto-trigger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub limit_to_syntax: Vec<String>,
    pub auto_display: Vec<IssueKind>,
    pub fix_on_save: Vec<IssueKind>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            limit_to_syntax: vec![ANY_SYNTAX.to_string()],
            auto_display: IssueKind::ALL.to_vec(),
            fix_on_save: vec![IssueKind::Eof, IssueKind::Trailing],
        }
    }
}

impl Policy {
    /// Build a policy from settings, keeping defaults for missing keys.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        Self {
            limit_to_syntax: settings
                .limit_to_syntax
                .clone()
                .unwrap_or(defaults.limit_to_syntax),
            auto_display: settings
                .auto_display
                .as_deref()
                .map(|names| parse_kinds("auto_display", names))
                .unwrap_or(defaults.auto_display),
            fix_on_save: settings
                .fix_on_save
                .as_deref()
                .map(|names| parse_kinds("fix_on_save", names))
                .unwrap_or(defaults.fix_on_save),
        }
    }

    /// Whether a document with the given syntax identifier may be inspected
    /// without an explicit request.
    ///
    /// Identifiers are compared by base name, so `Packages/Python/Python.tmLanguage`
    /// matches an allowlist entry of either that path or `Python.tmLanguage`.
    /// A document without a syntax is never eligible.
    pub fn is_eligible(&self, syntax: Option<&str>) -> bool {
        let Some(syntax) = syntax.map(syntax_base_name).filter(|s| !s.is_empty()) else {
            return false;
        };

        self.limit_to_syntax
            .iter()
            .any(|allowed| allowed == ANY_SYNTAX || syntax_base_name(allowed) == syntax)
    }
}

/// Strip any path-like prefix from a syntax identifier.
pub fn syntax_base_name(syntax: &str) -> &str {
    syntax.rsplit(['/', '\\']).next().unwrap_or(syntax)
}

/// Convert kind names to kinds, dropping unknown names with a warning.
fn parse_kinds(key: &str, names: &[String]) -> Vec<IssueKind> {
    names
        .iter()
        .filter_map(|name| {
            let kind = IssueKind::from_name(name);
            if kind.is_none() {
                warn!("unknown issue kind '{}' in {}", name, key);
            }
            kind
        })
        .collect()
}
