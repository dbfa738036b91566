// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Installer driver.
//!
//! The driver ties everything together for one run:
//!
//! 1. Load palette of requested theme, or fall back to the base palette.
//! 2. Select components from the registry, either the ones the user asked
//!    for or all of them.
//! 3. Build one shared [`Context`] for the run.
//! 4. Install each selected component in turn.
//!
//! Components are isolated from each other. A component that fails is
//! recorded in the run's [`Summary`], and the remaining components still get
//! installed. A run only counts as successful when every selected component
//! succeeded.

use crate::{
    backup::Backup,
    component::{Component, ComponentError, Context, Registry, RunOptions},
    config::InstallerConfig,
    palette::Palette,
    path::{default_config_dir, home_dir, Paths},
};

use std::path::PathBuf;
use tracing::{error, info, info_span, instrument, warn};

/// Installer driver.
#[derive(Debug)]
pub struct Installer {
    paths: Paths,
    config: InstallerConfig,
    backup: Backup,
    registry: Registry,
}

impl Installer {
    /// Construct new installer.
    ///
    /// Backups of this installer go into a fresh run directory under the
    /// backup root of the configuration.
    pub fn new(paths: Paths, config: InstallerConfig, registry: Registry) -> Self {
        let backup = Backup::new(
            config.settings.backup_root(&paths.repo_root),
            paths.home_dir.clone(),
        );

        Self {
            paths,
            config,
            backup,
            registry,
        }
    }

    /// Construct new installer for source tree with built-in components.
    ///
    /// Reads installer configuration from source tree, and resolves the
    /// user's home and configuration directories.
    ///
    /// # Errors
    ///
    /// - Return [`InstallerError::Config`] if installer configuration is
    ///   malformed.
    /// - Return [`InstallerError::NoWayHome`] if home directory cannot be
    ///   determined.
    pub fn from_repo(repo_root: impl Into<PathBuf>) -> Result<Self> {
        let repo_root = repo_root.into();
        let config = InstallerConfig::load(&repo_root)?;
        let config_dir = match &config.settings.config_dir {
            Some(path) => path.clone(),
            None => default_config_dir()?,
        };
        let paths = Paths::new(repo_root, config_dir, home_dir()?);

        Ok(Self::new(paths, config, Registry::with_builtins()))
    }

    /// Replace backup helper.
    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = backup;
        self
    }

    /// Paths used by this installer.
    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Installer configuration.
    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Load palette for a theme.
    ///
    /// Uses configured default theme when no theme is given. Falls back to
    /// the base palette if the theme's palette file does not exist.
    ///
    /// # Errors
    ///
    /// - Return [`InstallerError::MissingPalette`] if base palette does not
    ///   exist either.
    /// - Return [`InstallerError::Palette`] if palette cannot be read.
    /// - Return [`InstallerError::EmptyPalette`] if palette defines nothing.
    #[instrument(skip(self), level = "debug")]
    pub fn load_palette(&self, theme: Option<&str>) -> Result<(Palette, PathBuf)> {
        let theme = theme.unwrap_or(self.config.settings.default_theme.as_str());
        let mut palette_file = self.paths.palette_file(theme);
        if palette_file.exists() {
            info!("using theme {theme}");
        } else {
            warn!("theme file not found: {:?}", palette_file.display());
            info!("falling back to default theme");
            palette_file = self.paths.default_palette_file();
            if !palette_file.exists() {
                return Err(InstallerError::MissingPalette(palette_file));
            }
        }

        let palette = Palette::load(&palette_file)?;
        if palette.is_empty() {
            return Err(InstallerError::EmptyPalette(palette_file));
        }

        Ok((palette, palette_file))
    }

    /// Select components to install.
    ///
    /// Selects all registered components if none are requested. Otherwise
    /// selects requested components in the given order, skipping unknown
    /// names with a warning, and duplicates silently.
    pub fn select(&self, requested: &[String]) -> Vec<&dyn Component> {
        if requested.is_empty() {
            return self.registry.iter().collect();
        }

        let mut selected: Vec<&dyn Component> = Vec::new();
        for name in requested {
            match self.registry.get(name) {
                Some(component) => {
                    if !selected.iter().any(|entry| entry.name() == component.name()) {
                        selected.push(component);
                    }
                }
                None => warn!("component not found: {name}"),
            }
        }

        selected
    }

    /// Run installer.
    ///
    /// # Errors
    ///
    /// - Return [`InstallerError::NoComponents`] if registry is empty.
    /// - Return [`InstallerError::NothingSelected`] if none of the requested
    ///   components exist.
    /// - Return palette errors from [`Installer::load_palette`].
    pub fn run(&self, options: RunOptions) -> Result<Summary> {
        let span = info_span!("run", backup = %self.backup.run_dir().display());
        let _enter = span.enter();

        if self.registry.is_empty() {
            return Err(InstallerError::NoComponents);
        }

        let (palette, palette_file) = self.load_palette(options.theme.as_deref())?;
        let selected = self.select(&options.components);
        if selected.is_empty() {
            return Err(InstallerError::NothingSelected);
        }

        let context = Context {
            paths: self.paths.clone(),
            palette,
            palette_file,
            backup: self.backup.clone(),
            config: self.config.clone(),
            options,
        };

        let mut summary = Summary::default();
        for component in selected {
            let name = component.name().to_string();
            let span = info_span!("component", name = %name);
            let outcome = span.in_scope(|| component.install(&context));

            match outcome {
                Ok(()) => {
                    info!("successfully installed component {name}");
                    summary.installed.push(name);
                }
                Err(err) => {
                    error!("error installing component {name}: {err}");
                    summary.failed.push((name, err));
                }
            }
        }

        info!(
            "Installation summary: {}/{} components installed successfully",
            summary.succeeded(),
            summary.total()
        );

        Ok(summary)
    }
}

/// Outcome of an installer run.
#[derive(Debug, Default)]
pub struct Summary {
    /// Components installed successfully, in install order.
    pub installed: Vec<String>,

    /// Components that failed with their error, in install order.
    pub failed: Vec<(String, ComponentError)>,
}

impl Summary {
    /// Amount of successfully installed components.
    pub fn succeeded(&self) -> usize {
        self.installed.len()
    }

    /// Amount of components that were attempted.
    pub fn total(&self) -> usize {
        self.installed.len() + self.failed.len()
    }

    /// Every attempted component succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Installer driver error types.
#[derive(Debug, thiserror::Error)]
pub enum InstallerError {
    /// No component installers are registered.
    #[error("no component installers found")]
    NoComponents,

    /// None of the requested components exist.
    #[error("no components to install")]
    NothingSelected,

    /// Base palette does not exist.
    #[error("default palette {:?} does not exist", .0.display())]
    MissingPalette(PathBuf),

    /// Palette defines no variables.
    #[error("palette {:?} defines no color variables", .0.display())]
    EmptyPalette(PathBuf),

    /// Palette cannot be loaded.
    #[error(transparent)]
    Palette(#[from] crate::palette::PaletteError),

    /// Installer configuration is malformed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Home directory cannot be determined.
    #[error(transparent)]
    NoWayHome(#[from] crate::path::NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = InstallerError> = std::result::Result<T, E>;
