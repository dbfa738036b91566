// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use hyprnova::{
    component::{Registry, RunOptions},
    installer::Installer,
    path::resolve_repo_root,
    theme::{generate_theme, ThemeMode, ThemeSpec},
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about = "HyprNova theme installer",
    override_usage = "\n  hyprnova [options]\n  hyprnova [options] generate <theme_name> [options]",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Theme to install (default: default).
    #[arg(short, long, value_name = "theme_name")]
    pub theme: Option<String>,

    /// Specific components to install.
    #[arg(short, long, num_args = 1.., value_name = "component")]
    pub components: Vec<String>,

    /// List available components.
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to HyprNova source tree (default: current directory).
    #[arg(short, long, global = true, value_name = "path")]
    pub repo: Option<PathBuf>,
}

impl Cli {
    fn run(self) -> Result<i32> {
        if self.command.is_none() && self.list {
            return run_list();
        }

        let repo_root = resolve_repo_root(self.repo.as_deref())?;
        match self.command {
            Some(Command::Generate(opts)) => run_generate(repo_root, opts),
            None => run_install(
                repo_root,
                RunOptions {
                    theme: self.theme,
                    components: self.components,
                },
            ),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Generate new theme from default palette.
    #[command(override_usage = "hyprnova generate [options] <theme_name>")]
    Generate(GenerateOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct GenerateOptions {
    /// Name of theme to generate.
    #[arg(required = true, value_name = "theme_name")]
    pub name: String,

    /// Theme mode, either "dark" or "light".
    #[arg(short, long, default_value = "dark", value_name = "mode")]
    pub mode: String,

    /// Primary accent color.
    #[arg(short, long, value_name = "color")]
    pub primary: Option<String>,

    /// Secondary accent color.
    #[arg(short, long, value_name = "color")]
    pub secondary: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    match cli.run() {
        Ok(code) => exit(code),
        Err(error) => {
            error!("{error:?}");
            exit(1);
        }
    }
}

fn run_install(repo_root: PathBuf, options: RunOptions) -> Result<i32> {
    let installer = Installer::from_repo(repo_root)?;
    let summary = installer.run(options)?;

    Ok(summary.exit_code())
}

fn run_list() -> Result<i32> {
    println!("Available components:");
    for component in Registry::with_builtins().iter() {
        println!("  - {:<16} {}", component.name(), component.description());
    }

    Ok(0)
}

fn run_generate(repo_root: PathBuf, opts: GenerateOptions) -> Result<i32> {
    let installer = Installer::from_repo(repo_root)?;
    let mode: ThemeMode = opts.mode.parse()?;
    let mut spec = ThemeSpec::new(opts.name, mode);
    spec.primary = opts.primary;
    spec.secondary = opts.secondary;

    info!("generating theme {}", spec.name);
    let paths = installer.paths();
    let theme_file = generate_theme(paths.default_palette_file(), &paths.colors_dir, &spec)?;
    info!("theme generated successfully: {:?}", theme_file.display());

    Ok(0)
}
