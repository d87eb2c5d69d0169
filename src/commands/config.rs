// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Show and edit the persisted configuration

use crate::config;
use anyhow::Result;
use std::path::Path;

/// Get or set one configuration key
pub fn run(path: Option<&Path>, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(value) => {
            let file = path.map_or_else(config::default_path, Path::to_path_buf);
            config::set(&file, key, &value)?;
            println!("{key} = {value}");
            tracing::debug!("Wrote {}", file.display());
        }
        None => {
            let current = config::load(path)?;
            println!("{}", current.get(key)?);
        }
    }
    Ok(())
}
