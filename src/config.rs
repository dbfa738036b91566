// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the optional `hyprnova.toml` file found at the top of
//! the source tree. Every field has a default, so a missing file, or a file
//! that only overrides a handful of values, is perfectly valid.
//!
//! # General Layout
//!
//! ```toml
//! [settings]
//! config_dir = "~/.config"
//! backup_dir = ".oops-pit"
//! default_theme = "default"
//!
//! [waybar.layout]
//! w_height = "40"
//!
//! [[theme]]
//! name = "nord"
//! mode = "dark"
//! primary = "rgb(129, 161, 193)"
//! secondary = "rgb(136, 192, 208)"
//! ```

use crate::theme::{example_themes, ThemeSpec};

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Name of installer configuration file at the top of the source tree.
pub const CONFIG_FILE: &str = "hyprnova.toml";

/// Installer configuration layout.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct InstallerConfig {
    /// General installer settings.
    #[serde(default)]
    pub settings: InstallerSettings,

    /// Waybar component settings.
    #[serde(default)]
    pub waybar: WaybarSettings,

    /// Example themes for the theme-generator component.
    #[serde(rename = "theme", default = "example_themes")]
    pub themes: Vec<ThemeSpec>,
}

impl InstallerConfig {
    /// Load installer configuration from source tree.
    ///
    /// Falls back to default configuration if the source tree does not carry
    /// a configuration file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file cannot be read.
    /// - Return [`ConfigError::Deserialize`] if configuration is malformed.
    /// - Return [`ConfigError::ShellExpansion`] if path settings cannot be
    ///   expanded.
    pub fn load(repo_root: impl AsRef<Path>) -> Result<Self> {
        let path = repo_root.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            debug!("no {CONFIG_FILE} in source tree, using defaults");
            return Ok(Self::default());
        }

        debug!("load installer configuration {:?}", path.display());
        read_to_string(&path)
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.clone(),
            })?
            .parse()
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            settings: InstallerSettings::default(),
            waybar: WaybarSettings::default(),
            themes: example_themes(),
        }
    }
}

impl FromStr for InstallerConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: InstallerConfig =
            toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on path settings.
        if let Some(config_dir) = config.settings.config_dir.take() {
            config.settings.config_dir = Some(expand(&config_dir)?);
        }
        if let Some(backup_dir) = config.settings.backup_dir.take() {
            config.settings.backup_dir = Some(expand(&backup_dir)?);
        }

        Ok(config)
    }
}

impl Display for InstallerConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// General installer settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct InstallerSettings {
    /// Destination root for tool configuration. Uses `$XDG_CONFIG_HOME` when
    /// not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,

    /// Root of backup directories. Relative paths resolve against the source
    /// tree. Uses `.oops-pit` when not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Palette to use when no theme is requested.
    #[serde(default = "default_theme")]
    pub default_theme: String,
}

impl InstallerSettings {
    /// Resolve backup root against source tree.
    pub fn backup_root(&self, repo_root: impl AsRef<Path>) -> PathBuf {
        match &self.backup_dir {
            Some(path) => repo_root.as_ref().join(path),
            None => repo_root.as_ref().join(".oops-pit"),
        }
    }
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            config_dir: None,
            backup_dir: None,
            default_theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    crate::path::DEFAULT_THEME.into()
}

/// Waybar component settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct WaybarSettings {
    /// Layout variables available to waybar templates.
    ///
    /// Entries given in configuration are merged over the defaults.
    #[serde(default = "default_layout", deserialize_with = "merge_layout")]
    pub layout: BTreeMap<String, String>,
}

impl Default for WaybarSettings {
    fn default() -> Self {
        Self {
            layout: default_layout(),
        }
    }
}

fn merge_layout<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut layout = default_layout();
    layout.extend(overrides);

    Ok(layout)
}

fn default_layout() -> BTreeMap<String, String> {
    let mut layout = [
        ("r_deg", "0"),
        ("w_output", r#""*""#),
        ("w_position", "top"),
        ("hv_pos", "height"),
        ("w_height", "32"),
        ("i_size", "16"),
        ("i_task", "16"),
        ("i_priv", "16"),
        ("i_theme", "Papirus-Dark"),
        ("font_name", "JetBrainsMono Nerd Font"),
        ("s_fontpx", "13"),
        ("x1", "top"),
        ("x2", "right"),
        ("x3", "bottom"),
        ("x4", "left"),
        ("g_paddin", "0"),
        ("w_margin", "5"),
        ("w_paddin", "5"),
        ("w_padact", "10"),
        ("e_margin", "0"),
        ("e_paddin", "0"),
        ("w_radius", "8"),
        ("t_radius", "8"),
        ("modules_ls", ""),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<BTreeMap<_, _>>();

    for edge in 1..=4 {
        layout.insert(format!("x{edge}g_margin"), "0".into());
        for corner in ["rb", "lb", "rc", "lc"] {
            layout.insert(format!("x{edge}{corner}_radius"), "8".into());
        }
    }

    layout
}

fn expand(path: &Path) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file cannot be read.
    #[error("failed to read configuration file {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
