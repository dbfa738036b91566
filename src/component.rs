// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Component installers.
//!
//! A __component__ is an installer unit responsible for configuring exactly
//! one target tool, e.g., Hyprland or Waybar. Every component implements the
//! [`Component`] trait, and is made available to the installer driver by
//! registering it into a [`Registry`].
//!
//! # Component Contract
//!
//! Components receive a shared [`Context`] holding the paths, palette,
//! backup helper, and configuration of the current run. They must only touch
//! the file system through the data given to them, and must be idempotent:
//! re-running a component should never fail because of its own earlier
//! output, and should converge to the same final configuration. In practice
//! this means always backing up before overwriting, and always checking for
//! marker lines before appending to a user's file.
//!
//! Components log through `tracing`. The installer driver runs each
//! component inside its own span, so every event is tagged with the name of
//! the component that emitted it.

pub mod hypr;
pub mod theme_generator;
pub mod waybar;

use crate::{backup::Backup, config::InstallerConfig, palette::Palette, path::Paths};

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

/// Options of the current run, as requested by the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Theme requested by the user, if any.
    pub theme: Option<String>,

    /// Components requested by the user. Empty means all of them.
    pub components: Vec<String>,
}

/// Shared context handed to every component of a run.
///
/// Built once per run by the installer driver, and only ever borrowed by
/// components.
#[derive(Debug)]
pub struct Context {
    /// Source and destination paths.
    pub paths: Paths,

    /// Palette selected for this run.
    pub palette: Palette,

    /// Palette file that [`Context::palette`] was loaded from.
    pub palette_file: PathBuf,

    /// Backup and symlink helper scoped to this run.
    pub backup: Backup,

    /// Installer configuration from source tree.
    pub config: InstallerConfig,

    /// Options requested by the user.
    pub options: RunOptions,
}

impl Context {
    /// Shortcut for [`Backup::create_backup`].
    ///
    /// # Errors
    ///
    /// - Return [`ComponentError::Backup`] if backup fails.
    pub fn create_backup(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        Ok(self.backup.create_backup(path)?)
    }

    /// Shortcut for [`Backup::create_symlink`].
    ///
    /// # Errors
    ///
    /// - Return [`ComponentError::Backup`] if backup or symlinking fails.
    pub fn create_symlink(
        &self,
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
    ) -> Result<()> {
        Ok(self.backup.create_symlink(source, target)?)
    }

    /// Create directory and any missing parents.
    ///
    /// # Errors
    ///
    /// - Return [`ComponentError::Io`] if directory cannot be created.
    pub fn ensure_dir(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        mkdirp::mkdirp(path).map_err(|err| ComponentError::Io {
            source: err,
            path: path.to_path_buf(),
        })?;

        Ok(())
    }
}

/// Installer unit for one target tool.
pub trait Component {
    /// Unique name used to select component from the command line.
    fn name(&self) -> &str;

    /// One line summary of what component configures.
    fn description(&self) -> &str;

    /// Install configuration of target tool.
    ///
    /// # Errors
    ///
    /// - Return [`ComponentError`] if installation cannot be completed.
    fn install(&self, context: &Context) -> Result<()>;
}

/// Registry of available components.
///
/// Components keep the order they were registered in, which is also the
/// order they are installed in when the user does not pick any.
#[derive(Default)]
pub struct Registry {
    components: Vec<Box<dyn Component>>,
}

impl Registry {
    /// Construct new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct registry with every built-in component.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(hypr::Hypr);
        registry.register(waybar::Waybar);
        registry.register(theme_generator::ThemeGenerator);
        registry
    }

    /// Register component.
    ///
    /// A component registered under an existing name replaces the earlier
    /// one while keeping its position.
    pub fn register(&mut self, component: impl Component + 'static) {
        let component: Box<dyn Component> = Box::new(component);
        match self
            .components
            .iter_mut()
            .find(|entry| entry.name() == component.name())
        {
            Some(entry) => *entry = component,
            None => self.components.push(component),
        }
    }

    /// Lookup component by name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|component| component.name() == name.as_ref())
            .map(Box::as_ref)
    }

    /// Iterate through registered components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(Box::as_ref)
    }

    /// Names of registered components in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|component| component.name()).collect()
    }

    /// Amount of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// No components registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Debug for Registry {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.debug_list().entries(self.names()).finish()
    }
}

/// Component installation error types.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Backup or symlink helper fails.
    #[error(transparent)]
    Backup(#[from] crate::backup::BackupError),

    /// Template rendering fails.
    #[error(transparent)]
    Template(#[from] crate::template::TemplateError),

    /// Theme generation fails.
    #[error(transparent)]
    Theme(#[from] crate::theme::ThemeError),

    /// Merged JSON configuration cannot be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Required input is missing from source tree.
    #[error("required input {:?} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// File system operation fails.
    #[error("file system operation failed on {:?}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ComponentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Named(&'static str, &'static str);

    impl Component for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn install(&self, _context: &Context) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn builtins_register_in_install_order() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.names(), vec!["hypr", "waybar", "theme-generator"]);
    }

    #[test]
    fn register_replaces_component_with_same_name() {
        let mut registry = Registry::new();
        registry.register(Named("a", "first"));
        registry.register(Named("b", "second"));
        registry.register(Named("a", "third"));

        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get("a").map(|c| c.description()), Some("third"));
        assert!(registry.get("c").is_none());
    }
}
