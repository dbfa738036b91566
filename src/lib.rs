// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Theme installer for Hyprland and its companion tools.
//!
//! HyprNova places configuration for each supported tool into the user's
//! configuration directory. Configuration is driven by a single color
//! __palette__ that gets substituted into templates, or linked directly
//! into place. Nothing is ever overwritten without a backup first.
//!
//! - [`installer`] runs a set of [`component`]s against one palette.
//! - [`palette`] and [`template`] turn palettes into configuration text.
//! - [`backup`] keeps copies of whatever gets replaced.
//! - [`theme`] derives new palettes from the base palette.

pub mod backup;
pub mod component;
pub mod config;
pub mod installer;
pub mod palette;
pub mod path;
pub mod template;
pub mod theme;
