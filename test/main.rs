// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use hyprnova::{
    backup::Backup,
    component::{Registry, RunOptions},
    config::InstallerConfig,
    installer::Installer,
    palette::Palette,
    path::Paths,
};

use anyhow::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    env::current_dir,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

const DEFAULT_PALETTE: &str = indoc! {r#"
    # HyprNova Theme - Complete Color Definitions
    $current-theme = "dark"

    $background = rgb(30, 30, 46)      # Base background
    $background-alt = rgb(49, 50, 68)      # Alternate background
    $foreground = rgb(205, 214, 244)    # Text
    $accent-primary = rgb(137, 180, 250)    # Primary accent
    $accent-secondary = rgb(203, 166, 247)   # Secondary accent
"#};

/// Source tree and home directory laid out inside a scratch directory.
pub(crate) struct SourceTreeFixture {
    root: PathBuf,
}

impl SourceTreeFixture {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("repo/colors"))?;
        fs::create_dir_all(root.join("home/.config"))?;
        fs::write(root.join("repo/colors/default.conf"), DEFAULT_PALETTE)?;

        Ok(Self { root })
    }

    pub(crate) fn write(&self, path: impl AsRef<Path>, contents: impl AsRef<str>) -> Result<()> {
        let path = self.root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents.as_ref())?;

        Ok(())
    }

    pub(crate) fn read(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(fs::read_to_string(self.root.join(path))?)
    }

    pub(crate) fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub(crate) fn installer(&self, run_name: &str) -> Result<Installer> {
        let paths = Paths::new(
            self.path("repo"),
            self.path("home/.config"),
            self.path("home"),
        );
        let config = InstallerConfig::load(&paths.repo_root)?;
        let backup =
            Backup::with_run_name(self.path("repo/.oops-pit"), run_name, self.path("home"));

        Ok(Installer::new(paths, config, Registry::with_builtins()).with_backup(backup))
    }
}

fn options(theme: Option<&str>, components: &[&str]) -> RunOptions {
    RunOptions {
        theme: theme.map(Into::into),
        components: components.iter().map(|name| name.to_string()).collect(),
    }
}

#[sealed_test]
fn full_install_configures_every_tool() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    fixture.write("repo/hypr/appearance.conf", "decoration { rounding = 8 }\n")?;
    fixture.write(
        "repo/waybar/config.jsonc.template",
        r#"{ "position": "$w_position", "height": $w_height }"#,
    )?;
    fixture.write(
        "repo/waybar/style.css.template",
        "window#waybar { background: $background; color: $foreground; }\n",
    )?;

    let summary = fixture.installer("run1")?.run(options(None, &[]))?;

    assert_eq!(summary.installed, vec!["hypr", "waybar", "theme-generator"]);
    assert_eq!(summary.exit_code(), 0);

    assert_eq!(
        fs::read_link(fixture.path("home/.config/hypr/colors.conf"))?,
        fixture.path("repo/colors/default.conf")
    );
    assert_eq!(
        fixture.read("home/.config/waybar/config.jsonc")?,
        r#"{ "position": "top", "height": 32 }"#
    );
    assert_eq!(
        fixture.read("home/.config/waybar/style.css")?,
        "window#waybar { background: rgb(30, 30, 46); color: rgb(205, 214, 244); }\n"
    );

    let nord = Palette::load(fixture.path("repo/colors/nord.conf"))?;
    assert_eq!(nord.get("accent-primary"), Some("rgb(129, 161, 193)"));
    assert!(fixture
        .read("repo/colors/dracula.conf")?
        .starts_with("# HyprNova Dracula Theme - Complete Color Definitions\n"));

    // Nothing pre-existed, so nothing got backed up.
    assert!(!fixture.path("repo/.oops-pit/run1").exists());

    Ok(())
}

#[sealed_test]
fn rerun_converges_and_backs_up_replaced_files() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    fixture.write("repo/hypr/appearance.conf", "decoration {}\n")?;
    fixture.write("home/.config/hypr/hyprland.conf", "monitor = ,preferred,auto,1\n")?;

    let first = fixture.installer("run1")?.run(options(None, &["hypr"]))?;
    let hyprland = fixture.read("home/.config/hypr/hyprland.conf")?;
    let second = fixture.installer("run2")?.run(options(None, &["hypr"]))?;

    assert_eq!((first.exit_code(), second.exit_code()), (0, 0));
    assert_eq!(fixture.read("home/.config/hypr/hyprland.conf")?, hyprland);
    assert_eq!(
        fixture.read("repo/.oops-pit/run1/.config/hypr/hyprland.conf")?,
        "monitor = ,preferred,auto,1\n"
    );

    // Second run replaced our own symlinks, and kept them as symlinks.
    assert_eq!(
        fs::read_link(fixture.path("repo/.oops-pit/run2/.config/hypr/appearance.conf"))?,
        fixture.path("repo/hypr/appearance.conf")
    );
    assert_eq!(
        fixture.read("home/.config/hypr/appearance.conf")?,
        "decoration {}\n"
    );

    Ok(())
}

#[sealed_test]
fn requested_theme_drives_templates() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    fixture.write("repo/colors/nord.conf", "$background = rgb(46, 52, 64)\n")?;
    fixture.write("repo/waybar/style.css.template", "bg: $background\n")?;

    let summary = fixture
        .installer("run1")?
        .run(options(Some("nord"), &["waybar", "unknown", "hypr"]))?;

    assert_eq!(summary.installed, vec!["waybar", "hypr"]);
    assert_eq!(
        fixture.read("home/.config/waybar/style.css")?,
        "bg: rgb(46, 52, 64)\n"
    );
    assert_eq!(
        fs::read_link(fixture.path("home/.config/hypr/colors.conf"))?,
        fixture.path("repo/colors/nord.conf")
    );

    Ok(())
}

#[sealed_test]
fn failing_component_does_not_stop_others() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    // A file where the waybar directory should be makes waybar fail.
    fixture.write("home/.config/waybar", "not a directory")?;

    let summary = fixture.installer("run1")?.run(options(None, &[]))?;

    assert_eq!(summary.installed, vec!["hypr", "theme-generator"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "waybar");
    assert_eq!((summary.succeeded(), summary.total()), (2, 3));
    assert_eq!(summary.exit_code(), 1);

    Ok(())
}

#[sealed_test]
fn installer_configuration_overrides_layout() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    fixture.write(
        "repo/hyprnova.toml",
        indoc! {r#"
            [waybar.layout]
            w_position = "bottom"

            [[theme]]
            name = "gruvbox"
            mode = "light"
        "#},
    )?;
    fixture.write("repo/waybar/config.jsonc.template", "$w_position/$w_height")?;

    let summary = fixture
        .installer("run1")?
        .run(options(None, &["waybar", "theme-generator"]))?;

    assert_eq!(summary.exit_code(), 0);
    assert_eq!(fixture.read("home/.config/waybar/config.jsonc")?, "bottom/32");
    assert!(fixture
        .read("repo/colors/gruvbox.conf")?
        .contains("$current-theme = \"light\"\n"));
    assert!(!fixture.path("repo/colors/nord.conf").exists());

    Ok(())
}

#[sealed_test]
fn list_ignores_malformed_configuration() -> Result<()> {
    let fixture = SourceTreeFixture::new(current_dir()?)?;
    fixture.write("repo/hyprnova.toml", "[settings\nthis is not toml")?;

    let output = Command::new(env!("CARGO_BIN_EXE_hyprnova"))
        .args(["--list", "--repo"])
        .arg(fixture.path("repo"))
        .env_remove("HOME")
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    assert!(output.status.success());
    for name in ["hypr", "waybar", "theme-generator"] {
        assert!(stdout.contains(&format!("  - {name}")));
    }

    Ok(())
}
