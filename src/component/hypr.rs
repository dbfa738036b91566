// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Hyprland component.
//!
//! Links the selected palette and HyprNova's appearance settings into
//! `~/.config/hypr/`, then makes sure the user's `hyprland.conf` sources the
//! appearance settings. The user's own `hyprland.conf` is never replaced, only
//! appended to once.

use crate::component::{Component, ComponentError, Context, Result};

use std::{
    fs::{read_to_string, write, OpenOptions},
    io::Write,
};
use tracing::{info, warn};

/// Line that hooks HyprNova's appearance settings into `hyprland.conf`.
pub const SOURCE_LINE: &str = "source = ~/.config/hypr/appearance.conf";

/// Hyprland configuration installer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hypr;

impl Component for Hypr {
    fn name(&self) -> &str {
        "hypr"
    }

    fn description(&self) -> &str {
        "Hyprland colors and appearance settings"
    }

    fn install(&self, context: &Context) -> Result<()> {
        info!("installing Hyprland configuration");
        let hypr_dir = context.paths.destination("hypr");
        context.ensure_dir(&hypr_dir)?;

        context.create_symlink(&context.palette_file, hypr_dir.join("colors.conf"))?;

        let appearance = context.paths.source("hypr").join("appearance.conf");
        if appearance.exists() {
            context.create_symlink(&appearance, hypr_dir.join("appearance.conf"))?;
        } else {
            warn!(
                "Hyprland appearance config not found at {:?}",
                appearance.display()
            );
        }

        let hypr_conf = hypr_dir.join("hyprland.conf");
        if hypr_conf.exists() {
            let content = read_to_string(&hypr_conf).map_err(|err| ComponentError::Io {
                source: err,
                path: hypr_conf.clone(),
            })?;

            if content
                .lines()
                .any(|line| line.trim_start().starts_with(SOURCE_LINE))
            {
                info!("appearance.conf already sourced in hyprland.conf");
            } else {
                info!("adding appearance.conf source line to hyprland.conf");
                context.create_backup(&hypr_conf)?;
                OpenOptions::new()
                    .append(true)
                    .open(&hypr_conf)
                    .and_then(|mut file| {
                        write!(file, "\n# HyprNova theme configuration\n{SOURCE_LINE}\n")
                    })
                    .map_err(|err| ComponentError::Io {
                        source: err,
                        path: hypr_conf.clone(),
                    })?;
            }
        } else {
            warn!("hyprland.conf not found at {:?}", hypr_conf.display());
            info!("creating minimal hyprland.conf with theme configuration");
            write(
                &hypr_conf,
                format!("# HyprNova minimal Hyprland configuration\n{SOURCE_LINE}\n"),
            )
            .map_err(|err| ComponentError::Io {
                source: err,
                path: hypr_conf.clone(),
            })?;
        }

        info!("Hyprland configuration installed successfully");
        Ok(())
    }
}
