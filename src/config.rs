// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Built-in defaults, then the TOML file, then `INVENTARIO_*` environment
//! variables. Command-line flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Service used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Keys accepted by `inventario config`
pub const KEYS: [&str; 3] = ["api_url", "dark_mode", "log_level"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the inventory service
    pub api_url: String,
    /// Start the TUI with the dark theme
    pub dark_mode: bool,
    /// Log level when no `-v` flag is given (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            dark_mode: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read a key as text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api_url.clone()),
            "dark_mode" => Ok(self.dark_mode.to_string()),
            "log_level" => Ok(self.log_level.clone()),
            other => anyhow::bail!("Clave desconocida: {}. Válidas: {}", other, KEYS.join(", ")),
        }
    }
}

/// Default location of the config file
#[must_use]
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "hyperpolymath", "inventario")
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".inventario.toml"))
}

/// Load configuration, layering file and environment over the defaults
///
/// An explicitly given file must exist; the default one is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();
    let (file, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_path(), false),
    };

    let settings = config::Config::builder()
        .set_default("api_url", defaults.api_url)?
        .set_default("dark_mode", defaults.dark_mode)?
        .set_default("log_level", defaults.log_level)?
        .add_source(
            config::File::from(file.as_path())
                .format(config::FileFormat::Toml)
                .required(required),
        )
        .add_source(config::Environment::with_prefix("INVENTARIO").try_parsing(true))
        .build()
        .with_context(|| format!("No se pudo cargar la configuración desde {}", file.display()))?;

    settings
        .try_deserialize()
        .context("Invalid configuration")
}

/// Write one key into the TOML file, keeping the others
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("No se pudo interpretar {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let value = match key {
        "api_url" => {
            url::Url::parse(value).with_context(|| format!("Invalid URL: {value}"))?;
            toml::Value::String(value.trim_end_matches('/').to_string())
        }
        "dark_mode" => {
            let flag = value
                .parse::<bool>()
                .with_context(|| format!("Se esperaba true o false, se recibió {value}"))?;
            toml::Value::Boolean(flag)
        }
        "log_level" => {
            value
                .parse::<tracing::Level>()
                .map_err(|_| anyhow::anyhow!("Nivel de log desconocido: {}", value))?;
            toml::Value::String(value.to_lowercase())
        }
        other => anyhow::bail!("Clave desconocida: {}. Válidas: {}", other, KEYS.join(", ")),
    };
    table.insert(key.to_string(), value);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("No se pudo crear el directorio {}", parent.display()))?;
        }
    }
    let content = toml::to_string_pretty(&table).context("No se pudo serializar la configuración")?;
    fs::write(path, content).with_context(|| format!("No se pudo escribir {}", path.display()))?;

    Ok(())
}
