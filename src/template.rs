// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template variable substitution.
//!
//! Templates are plain text files containing `$name` placeholders that are
//! resolved against a set of variables, usually the palette plus a few
//! tool-specific layout variables. The braced `${name}` form is also
//! understood so that placeholders can sit directly next to other name
//! characters.
//!
//! Substitution is literal. Unknown placeholders are left verbatim, inserted
//! values are never scanned again, and there is no escape syntax. When more
//! than one variable name matches at the same position, the longest name
//! wins, so `$background-alt` is never rendered as `<background>-alt`.

use crate::palette::Palette;

use std::{
    collections::BTreeMap,
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Variables available to a template.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    /// Construct new empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct variable set from palette.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            vars: palette
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Insert a variable, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.vars.insert(name.into(), value.to_string());
    }

    /// Insert a listing of variables without overriding existing ones.
    ///
    /// Variables already present keep their value.
    pub fn extend_missing<K, V>(&mut self, vars: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: ToString,
    {
        for (name, value) in vars {
            self.vars
                .entry(name.into())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Lookup value of a variable.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.vars.get(name.as_ref()).map(String::as_str)
    }

    /// Render template text.
    ///
    /// Performs one left to right pass over `template`, replacing recognized
    /// placeholders of the given style.
    pub fn render(&self, template: &str, style: PlaceholderStyle) -> String {
        // Longest names first so the first hit at a position is the longest.
        let mut names = self.vars.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(index) = rest.find('$') {
            out.push_str(&rest[..index]);
            let candidate = &rest[index + 1..];
            match style.match_at(candidate, &names) {
                Some((name, consumed)) => {
                    out.push_str(&self.vars[name]);
                    rest = &candidate[consumed..];
                }
                None => {
                    out.push('$');
                    rest = candidate;
                }
            }
        }
        out.push_str(rest);

        out
    }

    /// Render template file into output file.
    ///
    /// Creates parent directories of `output` if needed. Overwrites `output`
    /// without a backup, so callers must back it up first.
    ///
    /// # Errors
    ///
    /// - Return [`TemplateError::MissingTemplate`] if template does not exist.
    /// - Return [`TemplateError::Read`] if template cannot be read.
    /// - Return [`TemplateError::Write`] if output cannot be written.
    #[instrument(skip(self, template, output), level = "debug")]
    pub fn render_file(
        &self,
        template: impl AsRef<Path>,
        output: impl AsRef<Path>,
        style: PlaceholderStyle,
    ) -> Result<()> {
        let (template, output) = (template.as_ref(), output.as_ref());
        if !template.exists() {
            return Err(TemplateError::MissingTemplate(template.to_path_buf()));
        }

        debug!(
            "render {:?} into {:?}",
            template.display(),
            output.display()
        );
        let content = read_to_string(template).map_err(|err| TemplateError::Read {
            source: err,
            path: template.to_path_buf(),
        })?;

        if let Some(parent) = output.parent() {
            mkdirp::mkdirp(parent).map_err(|err| TemplateError::Write {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        write(output, self.render(&content, style)).map_err(|err| TemplateError::Write {
            source: err,
            path: output.to_path_buf(),
        })?;

        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateVars
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

/// Placeholder syntax recognized while rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Placeholders of the form `$name`.
    #[default]
    Bare,

    /// Placeholders of the form `${name}`.
    Braced,
}

impl PlaceholderStyle {
    /// Match longest known name right after a `$`.
    ///
    /// Returns matched name and amount of bytes consumed after the `$`.
    fn match_at<'n>(&self, candidate: &str, names: &[&'n str]) -> Option<(&'n str, usize)> {
        match self {
            Self::Bare => names
                .iter()
                .find(|name| !name.is_empty() && candidate.starts_with(**name))
                .map(|name| (*name, name.len())),
            Self::Braced => {
                let inner = candidate.strip_prefix('{')?;
                let (name, _) = inner.split_once('}')?;
                names
                    .iter()
                    .find(|known| **known == name)
                    .map(|known| (*known, known.len() + 2))
            }
        }
    }
}

/// Template rendering error types.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template file does not exist.
    #[error("template {:?} does not exist", .0.display())]
    MissingTemplate(PathBuf),

    /// Template file cannot be read.
    #[error("failed to read template {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Rendered output cannot be written.
    #[error("failed to write rendered template to {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = TemplateError> = std::result::Result<T, E>;
