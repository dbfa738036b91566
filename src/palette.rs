// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Color palette parsing.
//!
//! A __palette__ is the set of named color values that drive every templated
//! configuration file HyprNova produces. Palettes live in the source tree at
//! `colors/<theme>.conf`, with `colors/default.conf` acting as the base
//! palette that every other theme derives from.
//!
//! # Palette File Layout
//!
//! Palette files are line oriented. Blank lines and lines starting with `#`
//! are skipped. Every other line that contains `=` defines one variable:
//!
//! ```text
//! # HyprNova Theme - Complete Color Definitions
//! $current-theme = "dark"
//! $background = rgb(30, 30, 46)      # Base background
//! $accent-primary = rgb(137, 180, 250)    # Primary accent
//! ```
//!
//! The leading `$` is stripped from the name, and everything after the first
//! `#` in the value is treated as a trailing comment. Values are kept as raw
//! strings.

use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Palette of named color values.
///
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Palette {
    vars: BTreeMap<String, String>,
}

impl Palette {
    /// Construct new empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load palette from file.
    ///
    /// # Errors
    ///
    /// - Return [`PaletteError::Read`] if palette file cannot be read.
    #[instrument(skip(path), level = "debug")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("load palette {:?}", path.display());
        let content = read_to_string(path).map_err(|err| PaletteError::Read {
            source: err,
            path: path.to_path_buf(),
        })?;

        Ok(content.parse()?)
    }

    /// Lookup value of a variable by name, without the leading `$`.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.vars.get(name.as_ref()).map(String::as_str)
    }

    /// Iterate through all variables sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Amount of variables in palette.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Palette defines no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut vars = BTreeMap::new();
        for line in data.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((name, value)) = line.split_once('=') else {
                continue;
            };

            let name = name.trim().trim_start_matches('$');
            let value = match value.split_once('#') {
                Some((value, _comment)) => value,
                None => value,
            };

            vars.insert(name.to_string(), value.trim().to_string());
        }

        Ok(Self { vars })
    }
}

impl<K, V> FromIterator<(K, V)> for Palette
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Palette error types.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    /// Palette file cannot be read.
    #[error("failed to read palette file {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
type Result<T, E = PaletteError> = std::result::Result<T, E>;
