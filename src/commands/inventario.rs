// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Inventory tree - stations, bodegas, racks and products

use super::{resolve, Session};
use crate::hierarchy::{ExpandedState, Hierarchy, Level, TreeRow};
use crate::inventory::Snapshot;
use anyhow::{Context, Result};

/// Run inventario command
///
/// `open` names nodes to expand (ids or names, any level).
pub async fn run(
    session: &Session,
    estacion: Option<String>,
    expand_all: bool,
    open: Vec<String>,
) -> Result<()> {
    let snapshot = Snapshot::load(&session.client)
        .await
        .context("Error al cargar los datos")?;

    let estacion_filter = match &estacion {
        Some(e) => resolve(&snapshot.estaciones, e)?.id.clone(),
        None => String::new(),
    };

    let mut expanded = ExpandedState::new();
    if expand_all {
        expanded.expand_all(&snapshot);
    }
    for node in &open {
        let (level, id) = locate(&snapshot, node)?;
        if !expanded.is_expanded(level, &id) {
            expanded.toggle(level, &id);
        }
    }

    let rows = Hierarchy::new(&snapshot).rows(&expanded, &estacion_filter);

    if session.json {
        return session.print_json(&rows);
    }
    if rows.is_empty() {
        println!("No hay estaciones registradas");
        return Ok(());
    }

    session.heading("Inventario");
    for row in &rows {
        println!("{}", render_row(session, row));
    }
    Ok(())
}

/// Find which level a node id or name lives at
fn locate(snapshot: &Snapshot, node: &str) -> Result<(Level, String)> {
    if let Ok(e) = resolve(&snapshot.estaciones, node) {
        return Ok((Level::Estaciones, e.id.clone()));
    }
    if let Ok(b) = resolve(&snapshot.bodegas, node) {
        return Ok((Level::Bodegas, b.id.clone()));
    }
    if let Ok(r) = resolve(&snapshot.racks, node) {
        return Ok((Level::Racks, r.id.clone()));
    }
    anyhow::bail!("Nodo no encontrado: {}", node)
}

fn render_row(session: &Session, row: &TreeRow) -> String {
    let marker = match (row.expandable, row.expanded) {
        (true, true) => "▾",
        (true, false) => "▸",
        (false, _) => "·",
    };
    let indent = "  ".repeat(row.depth + 1);
    if row.detail.is_empty() {
        format!("{indent}{marker} {}", row.label)
    } else {
        format!("{indent}{marker} {}  {}", row.label, session.dim(&row.detail))
    }
}
