// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine where HyprNova reads its source tree from, and where it places
//! configuration files for each tool it manages.
//!
//! # Source Tree Layout
//!
//! ```text
//! <repo>/
//! ├── hyprnova.toml         (optional installer configuration)
//! ├── colors/default.conf   (base palette, required)
//! ├── colors/<theme>.conf   (extra palettes)
//! ├── hypr/appearance.conf
//! └── waybar/{config.jsonc.template, style.css.template, modules/*.jsonc}
//! ```

use std::path::{Path, PathBuf};

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine default absolute path to user's configuration directory.
///
/// Uses XDG Base Directory path `$XDG_CONFIG_HOME`, falling back to
/// `~/.config` on platforms that do not provide one.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn default_config_dir() -> Result<PathBuf> {
    match dirs::config_dir() {
        Some(path) => Ok(path),
        None => home_dir().map(|home| home.join(".config")),
    }
}

/// Paths shared by every component during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root of the HyprNova source tree.
    pub repo_root: PathBuf,

    /// Directory holding palette files.
    pub colors_dir: PathBuf,

    /// Destination root, e.g., `~/.config`.
    pub config_dir: PathBuf,

    /// User's home directory. Backups mirror paths relative to it.
    pub home_dir: PathBuf,
}

impl Paths {
    /// Construct new path set rooted at a source tree.
    pub fn new(
        repo_root: impl Into<PathBuf>,
        config_dir: impl Into<PathBuf>,
        home_dir: impl Into<PathBuf>,
    ) -> Self {
        let repo_root = repo_root.into();
        Self {
            colors_dir: repo_root.join("colors"),
            repo_root,
            config_dir: config_dir.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Path to palette file of a named theme.
    pub fn palette_file(&self, theme: impl AsRef<str>) -> PathBuf {
        self.colors_dir.join(format!("{}.conf", theme.as_ref()))
    }

    /// Path to base palette that every theme derives from.
    pub fn default_palette_file(&self) -> PathBuf {
        self.palette_file(DEFAULT_THEME)
    }

    /// Path to a tool's source directory inside the source tree.
    pub fn source(&self, tool: impl AsRef<Path>) -> PathBuf {
        self.repo_root.join(tool)
    }

    /// Path to a tool's destination directory inside the configuration root.
    pub fn destination(&self, tool: impl AsRef<Path>) -> PathBuf {
        self.config_dir.join(tool)
    }
}

/// Resolve source tree root given on the command line.
///
/// Relative paths resolve against the current directory.
///
/// # Errors
///
/// - Return [`std::io::Error`] if current directory cannot be determined.
pub fn resolve_repo_root(path: Option<&Path>) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match path {
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

/// Name of the base palette.
pub const DEFAULT_THEME: &str = "default";

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
