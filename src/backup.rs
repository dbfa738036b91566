// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Backup and symlink helpers.
//!
//! HyprNova never clobbers a user's file without keeping a copy of it first.
//! Every run gets its own __backup directory__ named after the time the run
//! started, e.g., `.oops-pit/20250101_120000/`. Anything that is about to be
//! overwritten or replaced is copied into that directory at the same path it
//! had relative to the user's home directory. So a backup of
//! `~/.config/hypr/hyprland.conf` lands at
//! `.oops-pit/20250101_120000/.config/hypr/hyprland.conf`.
//!
//! The backup directory is only created once something actually needs to be
//! backed up. Backups are never pruned or restored automatically.

use chrono::Local;
use std::{
    fs,
    path::{Component as PathComponent, Path, PathBuf},
};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// Timestamp layout used to name each run's backup directory.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Run-scoped backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    run_dir: PathBuf,
    home_dir: PathBuf,
}

impl Backup {
    /// Construct new backup helper for current run.
    ///
    /// Captures the current local time to name the run's backup directory
    /// under `backup_root`. Nothing is created on disk yet.
    pub fn new(backup_root: impl AsRef<Path>, home_dir: impl Into<PathBuf>) -> Self {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::with_run_name(backup_root, stamp, home_dir)
    }

    /// Construct new backup helper with explicit run directory name.
    pub fn with_run_name(
        backup_root: impl AsRef<Path>,
        run_name: impl AsRef<str>,
        home_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            run_dir: backup_root.as_ref().join(run_name.as_ref()),
            home_dir: home_dir.into(),
        }
    }

    /// Path to this run's backup directory.
    ///
    /// May not exist if nothing has been backed up yet.
    pub fn run_dir(&self) -> &Path {
        self.run_dir.as_path()
    }

    /// Location a path would be backed up to.
    ///
    /// Paths inside the home directory keep their path relative to home.
    /// Paths outside of it keep their full path with the root stripped.
    pub fn location_of(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match path.strip_prefix(&self.home_dir) {
            Ok(relative) => self.run_dir.join(relative),
            Err(_) => self.run_dir.join(
                path.components()
                    .filter(|part| matches!(part, PathComponent::Normal(_)))
                    .collect::<PathBuf>(),
            ),
        }
    }

    /// Backup file, directory tree, or symlink.
    ///
    /// Returns `None` if nothing exists at `path`. Symlinks are backed up as
    /// symlinks, even dangling ones. If this run already holds a backup at
    /// the same location, the earlier backup is kept as-is and its location
    /// is returned.
    ///
    /// # Errors
    ///
    /// - Return [`BackupError::CreateDir`] if backup directories cannot be
    ///   created.
    /// - Return [`BackupError::Copy`] if content cannot be copied.
    #[instrument(skip(self, path), level = "debug")]
    pub fn create_backup(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let Ok(metadata) = fs::symlink_metadata(path) else {
            debug!("nothing to backup at {:?}", path.display());
            return Ok(None);
        };

        let backup_path = self.location_of(path);
        if fs::symlink_metadata(&backup_path).is_ok() {
            debug!(
                "keep earlier backup of {:?} at {:?}",
                path.display(),
                backup_path.display()
            );
            return Ok(Some(backup_path));
        }

        if let Some(parent) = backup_path.parent() {
            mkdirp::mkdirp(parent).map_err(|err| BackupError::CreateDir {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            copy_link(path, &backup_path)?;
        } else if file_type.is_dir() {
            copy_tree(path, &backup_path)?;
        } else {
            fs::copy(path, &backup_path).map_err(|err| BackupError::Copy {
                source: err,
                path: path.to_path_buf(),
            })?;
        }

        info!(
            "created backup of {:?} at {:?}",
            path.display(),
            backup_path.display()
        );

        Ok(Some(backup_path))
    }

    /// Place symlink at `target` pointing to `source`.
    ///
    /// Anything already at `target`, be it a file, directory, or dangling
    /// symlink, is backed up and removed first. Parent directories of
    /// `target` are created as needed.
    ///
    /// # Errors
    ///
    /// - Return [`BackupError`] variants from [`Backup::create_backup`].
    /// - Return [`BackupError::Remove`] if old target cannot be removed.
    /// - Return [`BackupError::CreateDir`] if parent directories cannot be
    ///   created.
    /// - Return [`BackupError::Symlink`] if symlink cannot be created.
    #[instrument(skip(self, source, target), level = "debug")]
    pub fn create_symlink(
        &self,
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
    ) -> Result<()> {
        let (source, target) = (source.as_ref(), target.as_ref());
        if let Ok(metadata) = fs::symlink_metadata(target) {
            self.create_backup(target)?;

            let removal = if metadata.file_type().is_dir() {
                fs::remove_dir_all(target)
            } else {
                fs::remove_file(target)
            };
            removal.map_err(|err| BackupError::Remove {
                source: err,
                path: target.to_path_buf(),
            })?;
        }

        if let Some(parent) = target.parent() {
            mkdirp::mkdirp(parent).map_err(|err| BackupError::CreateDir {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        symlink(source, target).map_err(|err| BackupError::Symlink {
            source: err,
            link: target.to_path_buf(),
            original: source.to_path_buf(),
        })?;

        info!(
            "created symlink from {:?} to {:?}",
            source.display(),
            target.display()
        );

        Ok(())
    }
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|err| BackupError::Copy {
            path: err.path().unwrap_or(from).to_path_buf(),
            source: err.into(),
        })?;
        let src = entry.path();
        let dst = match src.strip_prefix(from) {
            Ok(relative) if relative.as_os_str().is_empty() => to.to_path_buf(),
            Ok(relative) => to.join(relative),
            Err(_) => continue,
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            copy_link(src, &dst)?;
        } else if file_type.is_dir() {
            mkdirp::mkdirp(&dst).map_err(|err| BackupError::CreateDir {
                source: err,
                path: dst.clone(),
            })?;
        } else {
            fs::copy(src, &dst).map_err(|err| BackupError::Copy {
                source: err,
                path: src.to_path_buf(),
            })?;
        }
    }

    Ok(())
}

fn copy_link(from: &Path, to: &Path) -> Result<()> {
    let original = fs::read_link(from).map_err(|err| BackupError::Copy {
        source: err,
        path: from.to_path_buf(),
    })?;

    symlink(&original, to).map_err(|err| BackupError::Symlink {
        source: err,
        link: to.to_path_buf(),
        original,
    })
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

/// Backup and symlink error types.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Content cannot be copied into backup directory.
    #[error("failed to backup {:?}", path.display())]
    Copy {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Existing target cannot be removed.
    #[error("failed to remove {:?}", path.display())]
    Remove {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Symlink cannot be created.
    #[error("failed to symlink {:?} to {:?}", link.display(), original.display())]
    Symlink {
        #[source]
        source: std::io::Error,
        link: PathBuf,
        original: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = BackupError> = std::result::Result<T, E>;
