// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Theme generator component.
//!
//! Derives the example themes listed in the installer configuration from the
//! base palette, and places them next to it in `colors/`.

use crate::{
    component::{Component, ComponentError, Context, Result},
    theme::generate_theme,
};

use tracing::{error, info, warn};

/// Example theme generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThemeGenerator;

impl Component for ThemeGenerator {
    fn name(&self) -> &str {
        "theme-generator"
    }

    fn description(&self) -> &str {
        "Example themes derived from the default palette"
    }

    fn install(&self, context: &Context) -> Result<()> {
        info!("installing theme generator component");
        let colors_dir = &context.paths.colors_dir;
        if !colors_dir.is_dir() {
            error!("colors directory not found at {:?}", colors_dir.display());
            return Err(ComponentError::MissingInput(colors_dir.clone()));
        }

        let base = context.paths.default_palette_file();
        if !base.exists() {
            error!("default colors file not found at {:?}", base.display());
            return Err(ComponentError::MissingInput(base));
        }

        for spec in &context.config.themes {
            match generate_theme(&base, colors_dir, spec) {
                Ok(theme_file) => info!("created example theme {:?}", theme_file.display()),
                Err(err) => warn!("failed to create example theme {:?}: {err}", spec.name),
            }
        }

        info!("theme generator component installed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backup::Backup,
        component::RunOptions,
        config::InstallerConfig,
        palette::Palette,
        path::Paths,
        theme::{ThemeMode, ThemeSpec},
    };
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{env::current_dir, fs, path::Path};

    fn context_in(root: &Path, config: InstallerConfig) -> Context {
        let paths = Paths::new(root.join("repo"), root.join("home/.config"), root.join("home"));
        Context {
            palette_file: paths.default_palette_file(),
            palette: Palette::new(),
            backup: Backup::with_run_name(root.join("repo/.oops-pit"), "run", root.join("home")),
            config,
            options: RunOptions::default(),
            paths,
        }
    }

    #[sealed_test]
    fn install_generates_configured_themes() -> anyhow::Result<()> {
        let mut config = InstallerConfig::default();
        config.themes = vec![
            ThemeSpec::new("nord", ThemeMode::Dark).with_primary("rgb(129, 161, 193)"),
            ThemeSpec::new("", ThemeMode::Light),
        ];
        let context = context_in(&current_dir()?, config);
        fs::create_dir_all(&context.paths.colors_dir)?;
        fs::write(
            context.paths.default_palette_file(),
            "$current-theme = \"light\"\n$accent-primary = rgb(1, 1, 1)    # Primary accent\n",
        )?;

        ThemeGenerator.install(&context)?;

        let nord = Palette::load(context.paths.palette_file("nord"))?;
        assert_eq!(nord.get("current-theme"), Some("\"dark\""));
        assert_eq!(nord.get("accent-primary"), Some("rgb(129, 161, 193)"));

        Ok(())
    }

    #[sealed_test]
    fn install_fails_without_base_palette() -> anyhow::Result<()> {
        let context = context_in(&current_dir()?, InstallerConfig::default());
        let result = ThemeGenerator.install(&context);
        assert!(matches!(result, Err(ComponentError::MissingInput(_))));

        fs::create_dir_all(&context.paths.colors_dir)?;
        let result = ThemeGenerator.install(&context);
        assert!(matches!(
            result,
            Err(ComponentError::MissingInput(path)) if path.ends_with("default.conf")
        ));

        Ok(())
    }
}
