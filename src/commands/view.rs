// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Launch the TUI, optionally from a product link

use super::Session;
use crate::filter::ProductFilter;
use crate::tui::{self, LaunchOptions};
use anyhow::Result;

/// Launch the TUI, optionally on a filtered product view
pub fn run(
    session: &Session,
    runtime: &tokio::runtime::Runtime,
    dark_mode: bool,
    link: Option<String>,
) -> Result<()> {
    tracing::info!("Launching TUI...");
    let options = LaunchOptions {
        dark_mode,
        filter: link.as_deref().map(ProductFilter::from_query),
    };
    tui::run(session.client.clone(), runtime.handle().clone(), options)
}
