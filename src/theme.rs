// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Theme generation.
//!
//! A __theme__ is just another palette file that lives next to the base
//! palette in `colors/`. New themes are derived from the base palette by
//! rewriting a small set of known marker lines:
//!
//! - `$current-theme = "..."` is set to the requested mode.
//! - The `# HyprNova Theme - Complete Color Definitions` title comment gets
//!   the theme's name spliced in.
//! - `$accent-primary` and `$accent-secondary` are replaced when new accent
//!   colors are given.
//!
//! Every other byte of the base palette is carried over untouched.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    str::FromStr,
    sync::LazyLock,
};
use tracing::{info, instrument};

static CURRENT_THEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\$current-theme = ".*""#).expect("valid regex"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"# HyprNova Theme - Complete Color Definitions").expect("valid regex")
});
static ACCENT_PRIMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\$accent-primary = .*$").expect("valid regex"));
static ACCENT_SECONDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\$accent-secondary = .*$").expect("valid regex"));

/// Light or dark flavor of a theme.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ThemeError::InvalidMode(other.to_string())),
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Dark => fmt.write_str("dark"),
            Self::Light => fmt.write_str("light"),
        }
    }
}

/// Description of a theme to derive from the base palette.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeSpec {
    /// Theme name, also the palette file stem.
    pub name: String,

    /// Light or dark flavor.
    #[serde(default)]
    pub mode: ThemeMode,

    /// Primary accent color, e.g., `rgb(129, 161, 193)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,

    /// Secondary accent color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl ThemeSpec {
    /// Construct new theme description without accent overrides.
    pub fn new(name: impl Into<String>, mode: ThemeMode) -> Self {
        Self {
            name: name.into(),
            mode,
            primary: None,
            secondary: None,
        }
    }

    /// Set primary accent color.
    pub fn with_primary(mut self, color: impl Into<String>) -> Self {
        self.primary = Some(color.into());
        self
    }

    /// Set secondary accent color.
    pub fn with_secondary(mut self, color: impl Into<String>) -> Self {
        self.secondary = Some(color.into());
        self
    }

    /// Derive theme content from base palette content.
    pub fn derive(&self, base: &str) -> String {
        let current = format!(r#"$current-theme = "{}""#, self.mode);
        let content = CURRENT_THEME.replace_all(base, NoExpand(&current));

        let title = format!(
            "# HyprNova {} Theme - Complete Color Definitions",
            title_case(&self.name)
        );
        let mut content = TITLE.replace_all(&content, NoExpand(&title)).into_owned();

        if let Some(primary) = &self.primary {
            let line = format!("$accent-primary = {primary}    # Primary accent");
            content = ACCENT_PRIMARY
                .replace_all(&content, NoExpand(&line))
                .into_owned();
        }

        if let Some(secondary) = &self.secondary {
            let line = format!("$accent-secondary = {secondary}   # Secondary accent");
            content = ACCENT_SECONDARY
                .replace_all(&content, NoExpand(&line))
                .into_owned();
        }

        content
    }
}

/// Generate theme palette file from base palette.
///
/// Writes the derived palette to `<out_dir>/<name>.conf`, overwriting any
/// previous version of it, and returns that path.
///
/// # Errors
///
/// - Return [`ThemeError::MissingName`] if theme has no name.
/// - Return [`ThemeError::MissingBase`] if base palette does not exist.
/// - Return [`ThemeError::Read`] if base palette cannot be read.
/// - Return [`ThemeError::Write`] if theme file cannot be written.
#[instrument(skip(base, out_dir, spec), fields(theme = %spec.name), level = "debug")]
pub fn generate_theme(
    base: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    spec: &ThemeSpec,
) -> Result<PathBuf> {
    let base = base.as_ref();
    if spec.name.trim().is_empty() {
        return Err(ThemeError::MissingName);
    }

    if !base.exists() {
        return Err(ThemeError::MissingBase(base.to_path_buf()));
    }

    let content = read_to_string(base).map_err(|err| ThemeError::Read {
        source: err,
        path: base.to_path_buf(),
    })?;

    let theme_file = out_dir.as_ref().join(format!("{}.conf", spec.name));
    write(&theme_file, spec.derive(&content)).map_err(|err| ThemeError::Write {
        source: err,
        path: theme_file.clone(),
    })?;
    info!("generated {} theme {:?}", spec.mode, theme_file.display());

    Ok(theme_file)
}

/// Example themes generated when nothing else is configured.
pub fn example_themes() -> Vec<ThemeSpec> {
    vec![
        ThemeSpec::new("nord", ThemeMode::Dark)
            .with_primary("rgb(129, 161, 193)")
            .with_secondary("rgb(136, 192, 208)"),
        ThemeSpec::new("dracula", ThemeMode::Dark)
            .with_primary("rgb(255, 121, 198)")
            .with_secondary("rgb(189, 147, 249)"),
        ThemeSpec::new("solarized", ThemeMode::Dark)
            .with_primary("rgb(38, 139, 210)")
            .with_secondary("rgb(42, 161, 152)"),
    ]
}

// "tokyo_night" -> "TokyoNight".
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Theme generation error types.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// Theme name is empty.
    #[error("theme name cannot be empty")]
    MissingName,

    /// Mode is neither "dark" nor "light".
    #[error("invalid theme mode {0:?}, expected \"dark\" or \"light\"")]
    InvalidMode(String),

    /// Base palette does not exist.
    #[error("base palette {:?} does not exist", .0.display())]
    MissingBase(PathBuf),

    /// Base palette cannot be read.
    #[error("failed to read base palette {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Theme file cannot be written.
    #[error("failed to write theme file {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ThemeError> = std::result::Result<T, E>;
