// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Waybar component.
//!
//! Renders Waybar's `config.jsonc` and `style.css` into `~/.config/waybar/`
//! from templates in the source tree. Templates see the palette plus a set of
//! layout variables (bar position, sizes, margins, radii, ...) that can be
//! tuned through `[waybar.layout]` in the installer configuration.
//!
//! # Fallbacks
//!
//! Without a `config.jsonc.template`, a configuration is assembled from the
//! module fragments in `waybar/modules/*.jsonc`. Each fragment holds the body
//! of a JSON object, e.g., `"clock": { "format": "{:%H:%M}" },`. Fragments
//! whose name ends in `##` are alternate versions and are skipped.
//!
//! Without a `style.css.template`, a basic built-in stylesheet is rendered
//! with the palette instead.

use crate::{
    component::{Component, ComponentError, Context, Result},
    template::{PlaceholderStyle, TemplateVars},
};

use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Map, Serializer, Value};
use std::{
    fs::{read_to_string, write},
    path::Path,
};
use tracing::{debug, error, info, warn};

/// Waybar configuration installer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Waybar;

impl Component for Waybar {
    fn name(&self) -> &str {
        "waybar"
    }

    fn description(&self) -> &str {
        "Waybar configuration and stylesheet"
    }

    fn install(&self, context: &Context) -> Result<()> {
        info!("installing Waybar configuration");
        let waybar_dir = context.paths.destination("waybar");
        context.ensure_dir(&waybar_dir)?;

        let source_dir = context.paths.source("waybar");
        let vars = template_vars(context);

        let config_template = source_dir.join("config.jsonc.template");
        let config_output = waybar_dir.join("config.jsonc");
        if config_template.exists() {
            info!(
                "processing Waybar config template {:?}",
                config_template.display()
            );
            context.create_backup(&config_output)?;
            vars.render_file(&config_template, &config_output, PlaceholderStyle::Bare)
                .inspect_err(|_| error!("failed to process Waybar config template"))?;
            info!("generated Waybar config {:?}", config_output.display());
        } else {
            warn!(
                "Waybar config template not found at {:?}",
                config_template.display()
            );
            let modules_dir = source_dir.join("modules");
            if modules_dir.is_dir() {
                info!("creating basic Waybar configuration from available modules");
                let config = merge_modules(&modules_dir)?;
                context.create_backup(&config_output)?;
                write_json(&config_output, &config)?;
                info!(
                    "created consolidated Waybar config {:?}",
                    config_output.display()
                );
            } else {
                warn!(
                    "Waybar modules directory not found at {:?}",
                    modules_dir.display()
                );
            }
        }

        let style_template = source_dir.join("style.css.template");
        let style_output = waybar_dir.join("style.css");
        if style_template.exists() {
            info!(
                "processing Waybar style template {:?}",
                style_template.display()
            );
            context.create_backup(&style_output)?;
            vars.render_file(&style_template, &style_output, PlaceholderStyle::Bare)
                .inspect_err(|_| error!("failed to process Waybar style template"))?;
            info!("generated Waybar style {:?}", style_output.display());
        } else {
            warn!(
                "Waybar style template not found at {:?}",
                style_template.display()
            );
            info!("creating basic Waybar style.css with color variables");
            let style = TemplateVars::from_palette(&context.palette)
                .render(BASIC_STYLE, PlaceholderStyle::Braced);
            context.create_backup(&style_output)?;
            write(&style_output, style).map_err(|err| ComponentError::Io {
                source: err,
                path: style_output.clone(),
            })?;
            info!("created basic Waybar style {:?}", style_output.display());
        }

        info!("Waybar configuration installed successfully");
        Ok(())
    }
}

// Palette first, layout variables only fill in what the palette lacks.
fn template_vars(context: &Context) -> TemplateVars {
    let mut vars = TemplateVars::from_palette(&context.palette);
    vars.extend_missing(context.config.waybar.layout.iter());
    vars
}

/// Merge module fragments into one Waybar configuration.
///
/// Fragments are visited in file name order. Fragments that cannot be read or
/// parsed are skipped with a warning.
///
/// # Errors
///
/// - Return [`ComponentError::Io`] if modules directory cannot be listed.
pub fn merge_modules(modules_dir: &Path) -> Result<Value> {
    let mut config = base_config();
    // INVARIANT: Escape the directory so glob metacharacters in it match literally.
    let pattern = format!(
        "{}/*.jsonc",
        glob::Pattern::escape(&modules_dir.to_string_lossy())
    );
    let fragments = glob::glob(&pattern).map_err(|err| ComponentError::Io {
        source: std::io::Error::other(err),
        path: modules_dir.to_path_buf(),
    })?;

    let mut fragments = fragments
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("cannot access module fragment: {err}");
                None
            }
        })
        .collect::<Vec<_>>();
    fragments.sort();

    for fragment in fragments {
        let Some(module_name) = fragment
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
        else {
            continue;
        };

        if module_name.ends_with("##") {
            debug!("skip alternate module fragment {module_name}");
            continue;
        }

        let module = match read_to_string(&fragment)
            .map_err(|err| err.to_string())
            .and_then(|content| parse_fragment(&content).map_err(|err| err.to_string()))
        {
            Ok(module) => module,
            Err(err) => {
                warn!("error processing module {:?}: {err}", fragment.display());
                continue;
            }
        };

        let Some(object) = config.as_object_mut() else {
            break;
        };
        object.extend(module);
        place_module(object, &module_name);
    }

    Ok(config)
}

fn base_config() -> Value {
    json!({
        "layer": "top",
        "position": "top",
        "height": 32,
        "modules-left": ["hyprland/workspaces"],
        "modules-center": ["clock"],
        "modules-right": ["tray"],
    })
}

fn parse_fragment(content: &str) -> serde_json::Result<Map<String, Value>> {
    let content = content.trim();
    let content = content.strip_suffix(',').unwrap_or(content);
    serde_json::from_str(&format!("{{{content}}}"))
}

fn place_module(config: &mut Map<String, Value>, module_name: &str) {
    let (section, front) = if ["battery", "backlight", "pulseaudio"]
        .iter()
        .any(|kind| module_name.contains(kind))
    {
        ("modules-right", true)
    } else if module_name.contains("workspaces") {
        ("modules-left", true)
    } else if module_name.contains("clock") {
        ("modules-center", true)
    } else {
        ("modules-right", false)
    };

    let Some(Value::Array(modules)) = config.get_mut(section) else {
        return;
    };

    let entry = Value::String(module_name.to_string());
    if modules.contains(&entry) {
        return;
    }

    if front {
        modules.insert(0, entry);
    } else {
        modules.push(entry);
    }
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;

    write(path, out).map_err(|err| ComponentError::Io {
        source: err,
        path: path.to_path_buf(),
    })
}

const BASIC_STYLE: &str = r#"
/* HyprNova Waybar Style
 * Auto-generated basic style with color variables
 */

:root {
    --background: ${background};
    --background-alt: ${background-alt};
    --foreground: ${foreground};
    --accent-primary: ${accent-primary};
    --accent-secondary: ${accent-secondary};
    --accent-warning: ${accent-warning};
    --accent-danger: ${accent-danger};
}

* {
    font-family: "JetBrainsMono Nerd Font", "Font Awesome 6 Free";
    font-size: 13px;
    border: none;
    border-radius: 0;
}

window#waybar {
    background-color: ${background-80};
    color: ${foreground};
}

#workspaces button {
    padding: 0 5px;
    background-color: transparent;
    color: ${foreground};
    transition: all 0.3s;
}

#workspaces button.active {
    background-color: ${accent-primary};
    color: ${background};
}

#workspaces button.urgent {
    background-color: ${accent-danger};
    color: ${background};
}

#clock,
#battery,
#cpu,
#memory,
#disk,
#temperature,
#network,
#pulseaudio,
#custom-media,
#custom-power,
#tray {
    padding: 0 10px;
    color: ${foreground};
    background-color: ${background-alt-80};
    border-radius: 8px;
    margin: 6px 3px;
}

#battery.warning {
    background-color: ${accent-warning};
    color: ${background};
}

#battery.critical {
    background-color: ${accent-danger};
    color: ${background};
}
"#;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{
        backup::Backup, component::RunOptions, config::InstallerConfig, palette::Palette,
        path::Paths,
    };
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{env::current_dir, fs};

    fn context_in(root: &Path) -> anyhow::Result<Context> {
        let paths = Paths::new(root.join("repo"), root.join("home/.config"), root.join("home"));
        fs::create_dir_all(paths.source("waybar"))?;
        let palette = Palette::from_iter([
            ("background", "rgb(30, 30, 46)"),
            ("background-alt", "rgb(49, 50, 68)"),
            ("foreground", "rgb(205, 214, 244)"),
            ("w_height", "48"),
        ]);

        Ok(Context {
            palette_file: paths.default_palette_file(),
            palette,
            backup: Backup::with_run_name(root.join("repo/.oops-pit"), "run", root.join("home")),
            config: InstallerConfig::default(),
            options: RunOptions::default(),
            paths,
        })
    }

    #[test]
    fn parse_fragment_tolerates_trailing_comma() -> anyhow::Result<()> {
        let result = parse_fragment(indoc! {r#"
            "clock": {
                "format": "{:%H:%M}"
            },
        "#})?;

        assert_eq!(result["clock"]["format"], "{:%H:%M}");

        Ok(())
    }

    #[test]
    fn place_module_by_kind() {
        let Value::Object(mut config) = base_config() else {
            unreachable!()
        };

        for name in ["battery", "custom-power", "clock", "hyprland-workspaces", "tray", "cpu"] {
            place_module(&mut config, name);
        }

        assert_eq!(config["modules-left"], json!(["hyprland-workspaces", "hyprland/workspaces"]));
        assert_eq!(config["modules-center"], json!(["clock"]));
        assert_eq!(
            config["modules-right"],
            json!(["battery", "tray", "custom-power", "cpu"])
        );
    }

    #[sealed_test]
    fn install_renders_templates_with_palette_over_layout() -> anyhow::Result<()> {
        let context = context_in(&current_dir()?)?;
        let source = context.paths.source("waybar");
        fs::write(
            source.join("config.jsonc.template"),
            r#"{ "position": "$w_position", "height": $w_height }"#,
        )?;
        fs::write(
            source.join("style.css.template"),
            "window#waybar { background: $background-alt; color: $unknown; }",
        )?;

        Waybar.install(&context)?;

        let waybar_dir = context.paths.destination("waybar");
        assert_eq!(
            read_to_string(waybar_dir.join("config.jsonc"))?,
            r#"{ "position": "top", "height": 48 }"#
        );
        assert_eq!(
            read_to_string(waybar_dir.join("style.css"))?,
            "window#waybar { background: rgb(49, 50, 68); color: $unknown; }"
        );

        Ok(())
    }

    #[sealed_test]
    fn merge_modules_in_directory_with_glob_characters() -> anyhow::Result<()> {
        let modules = current_dir()?.join("tree[1]/waybar/modules");
        fs::create_dir_all(&modules)?;
        fs::write(modules.join("cpu.jsonc"), r#""cpu": { "interval": 10 }"#)?;

        let config = merge_modules(&modules)?;

        assert_eq!(config["cpu"]["interval"], 10);
        assert_eq!(config["modules-right"], json!(["tray", "cpu"]));

        Ok(())
    }

    #[sealed_test]
    fn install_merges_module_fragments_without_template() -> anyhow::Result<()> {
        let context = context_in(&current_dir()?)?;
        let modules = context.paths.source("waybar").join("modules");
        fs::create_dir_all(&modules)?;
        fs::write(modules.join("battery.jsonc"), r#""battery": { "interval": 30 },"#)?;
        fs::write(modules.join("cpu.jsonc"), r#""cpu": { "interval": 10 }"#)?;
        fs::write(modules.join("cpu##.jsonc"), r#""cpu": { "interval": 99 }"#)?;
        fs::write(modules.join("broken.jsonc"), "not json at all")?;

        let waybar_dir = context.paths.destination("waybar");
        fs::create_dir_all(&waybar_dir)?;
        fs::write(waybar_dir.join("config.jsonc"), "old config")?;

        Waybar.install(&context)?;

        let config: Value =
            serde_json::from_str(&read_to_string(waybar_dir.join("config.jsonc"))?)?;
        assert_eq!(config["battery"]["interval"], 30);
        assert_eq!(config["cpu"]["interval"], 10);
        assert_eq!(config["modules-right"], json!(["battery", "tray", "cpu"]));
        assert!(config.get("broken").is_none());
        assert_eq!(
            read_to_string(context.backup.run_dir().join(".config/waybar/config.jsonc"))?,
            "old config"
        );

        let style = read_to_string(waybar_dir.join("style.css"))?;
        assert!(style.contains("--background-alt: rgb(49, 50, 68);"));
        assert!(style.contains("background-color: ${background-80};"));

        Ok(())
    }

    #[sealed_test]
    fn install_without_templates_or_modules_still_succeeds() -> anyhow::Result<()> {
        let context = context_in(&current_dir()?)?;
        Waybar.install(&context)?;

        let waybar_dir = context.paths.destination("waybar");
        assert!(!waybar_dir.join("config.jsonc").exists());
        assert!(waybar_dir.join("style.css").exists());

        Ok(())
    }
}
