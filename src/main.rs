// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Inventario CLI - stations, bodegas, racks and products from the terminal

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use inventario::commands::{
    self, bodega::BodegaArgs, estacion::EstacionArgs, producto::ProductoArgs,
    productos::ProductosArgs, rack::RackArgs, Session,
};
use inventario::config;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inventario")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "INVENTARIO_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Inventory service base URL
    #[arg(long, env = "INVENTARIO_API_URL", global = true)]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stations
    Estacion {
        /// Action: list, show, create, update, delete
        action: String,

        /// Station id or name
        id: Option<String>,

        #[command(flatten)]
        args: EstacionArgs,
    },

    /// Manage bodegas
    Bodega {
        /// Action: list, show, create, update, delete
        action: String,

        /// Bodega id or name
        id: Option<String>,

        #[command(flatten)]
        args: BodegaArgs,
    },

    /// Manage racks
    Rack {
        /// Action: list, show, create, update, delete
        action: String,

        /// Rack id or name
        id: Option<String>,

        #[command(flatten)]
        args: RackArgs,
    },

    /// Manage products
    Producto {
        /// Action: list, show, create, update, delete
        action: String,

        /// Product id (name also accepted by delete)
        id: Option<String>,

        #[command(flatten)]
        args: ProductoArgs,
    },

    /// List products through the cascading filter
    Productos {
        #[command(flatten)]
        args: ProductosArgs,
    },

    /// Show the station → bodega → rack → product tree
    Inventario {
        /// Only this station (id or name)
        #[arg(long)]
        estacion: Option<String>,

        /// Open every node
        #[arg(long)]
        expand_all: bool,

        /// Open these nodes (id or name, repeatable)
        #[arg(long = "open")]
        open: Vec<String>,
    },

    /// Show the category vocabularies
    Categorias {
        /// Vocabulary: productos, racks (both if omitted)
        kind: Option<String>,
    },

    /// Launch interactive TUI
    View {
        /// Open the product view from a shared link
        #[arg(long)]
        link: Option<String>,

        /// Start with the dark theme
        #[arg(long)]
        dark: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (api_url, dark_mode, log_level)
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that never touch the service or the config file
    match &cli.command {
        Commands::Completions { shell } => {
            return commands::completions::run(*shell, &mut Cli::command());
        }
        Commands::Config { key, value } => {
            return commands::config::run(cli.config.as_deref(), key, value.clone());
        }
        _ => {}
    }

    let settings = config::load(cli.config.as_deref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => settings.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let in_tui = matches!(cli.command, Commands::View { .. });
    init_logging(&log_level, in_tui);

    let api_url = cli.api_url.clone().unwrap_or_else(|| settings.api_url.clone());
    let session = Session::new(&api_url, cli.json, !cli.no_color)?;
    tracing::debug!("Using inventory service at {}", session.client.base_url());

    let runtime = tokio::runtime::Runtime::new().context("No se pudo iniciar el runtime async")?;

    // Execute command
    match cli.command {
        Commands::Estacion { action, id, args } => {
            runtime.block_on(commands::estacion::run(&session, &action, id, args))
        }
        Commands::Bodega { action, id, args } => {
            runtime.block_on(commands::bodega::run(&session, &action, id, args))
        }
        Commands::Rack { action, id, args } => {
            runtime.block_on(commands::rack::run(&session, &action, id, args))
        }
        Commands::Producto { action, id, args } => {
            runtime.block_on(commands::producto::run(&session, &action, id, args))
        }
        Commands::Productos { args } => {
            runtime.block_on(commands::productos::run(&session, args))
        }
        Commands::Inventario { estacion, expand_all, open } => {
            runtime.block_on(commands::inventario::run(&session, estacion, expand_all, open))
        }
        Commands::Categorias { kind } => {
            commands::categorias::run(&session, kind.as_deref())
        }
        Commands::View { link, dark } => {
            commands::view::run(&session, &runtime, dark || settings.dark_mode, link)
        }
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_logging(level: &str, in_tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = if in_tui {
        match open_log_file() {
            Some(file) => BoxMakeWriter::new(Mutex::new(file)),
            None => BoxMakeWriter::new(std::io::sink),
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!in_tui)
        .with_writer(writer)
        .init();
}

fn open_log_file() -> Option<std::fs::File> {
    let dirs = directories::ProjectDirs::from("com", "hyperpolymath", "inventario")?;
    let dir = dirs.cache_dir();
    std::fs::create_dir_all(dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("inventario.log"))
        .ok()
}
