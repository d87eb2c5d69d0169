// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Station → bodega → rack → product tree over a loaded snapshot

use crate::inventory::Snapshot;
use crate::types::{Bodega, Producto, Rack};
use serde::Serialize;
use std::collections::HashSet;

/// Expandable tree level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Station nodes
    Estaciones,
    /// Bodega nodes
    Bodegas,
    /// Rack nodes
    Racks,
    /// Product leaves (never expandable)
    Productos,
}

/// Which nodes are open, one independent set per level
///
/// Siblings may be open at the same time. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedState {
    estaciones: HashSet<String>,
    bodegas: HashSet<String>,
    racks: HashSet<String>,
}

impl ExpandedState {
    /// Create with everything collapsed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, level: Level) -> Option<&HashSet<String>> {
        match level {
            Level::Estaciones => Some(&self.estaciones),
            Level::Bodegas => Some(&self.bodegas),
            Level::Racks => Some(&self.racks),
            Level::Productos => None,
        }
    }

    fn set_mut(&mut self, level: Level) -> Option<&mut HashSet<String>> {
        match level {
            Level::Estaciones => Some(&mut self.estaciones),
            Level::Bodegas => Some(&mut self.bodegas),
            Level::Racks => Some(&mut self.racks),
            Level::Productos => None,
        }
    }

    /// Open the node if closed, close it if open
    pub fn toggle(&mut self, level: Level, id: &str) {
        if let Some(set) = self.set_mut(level) {
            if !set.remove(id) {
                set.insert(id.to_string());
            }
        }
    }

    /// Check if a node is open
    #[must_use]
    pub fn is_expanded(&self, level: Level, id: &str) -> bool {
        self.set(level).is_some_and(|set| set.contains(id))
    }

    /// Open every node that has children
    pub fn expand_all(&mut self, snapshot: &Snapshot) {
        let tree = Hierarchy::new(snapshot);
        for estacion in &snapshot.estaciones {
            if !tree.bodegas_de_estacion(&estacion.id).is_empty() {
                self.estaciones.insert(estacion.id.clone());
            }
        }
        for bodega in &snapshot.bodegas {
            if !tree.racks_de_bodega(&bodega.id).is_empty() {
                self.bodegas.insert(bodega.id.clone());
            }
        }
        for rack in &snapshot.racks {
            if !tree.productos_de_rack(&rack.id).is_empty() {
                self.racks.insert(rack.id.clone());
            }
        }
    }

    /// Close everything
    pub fn collapse_all(&mut self) {
        self.estaciones.clear();
        self.bodegas.clear();
        self.racks.clear();
    }
}

/// One visible line of the flattened tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRow {
    /// Nesting depth, 0 for stations
    pub depth: usize,
    /// Level of the node
    pub level: Level,
    /// Node id
    pub id: String,
    /// Display text
    pub label: String,
    /// Secondary text (location, quantity...)
    pub detail: String,
    /// Whether the node shows an expand affordance
    pub expandable: bool,
    /// Whether the node is currently open
    pub expanded: bool,
}

/// Read-only tree view over a snapshot
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Hierarchy<'a> {
    /// Wrap a snapshot
    #[must_use]
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Bodegas whose owning station is `estacion_id`
    #[must_use]
    pub fn bodegas_de_estacion(&self, estacion_id: &str) -> Vec<&'a Bodega> {
        self.snapshot
            .bodegas
            .iter()
            .filter(|b| b.estacion.id == estacion_id)
            .collect()
    }

    /// Racks whose owning bodega is `bodega_id`
    #[must_use]
    pub fn racks_de_bodega(&self, bodega_id: &str) -> Vec<&'a Rack> {
        self.snapshot
            .racks
            .iter()
            .filter(|r| r.bodega == bodega_id)
            .collect()
    }

    /// Products sitting on `rack_id`
    #[must_use]
    pub fn productos_de_rack(&self, rack_id: &str) -> Vec<&'a Producto> {
        self.snapshot
            .productos
            .iter()
            .filter(|p| p.rack.id == rack_id)
            .collect()
    }

    /// `"<bodega> (<Central|Secundaria>), <rack>"`, or `""` if any lookup fails
    ///
    /// The label comes from the bodega's station as currently loaded.
    #[must_use]
    pub fn ubicacion_completa(&self, rack_id: &str, bodega_id: &str) -> String {
        let Some(rack) = self.snapshot.rack(rack_id) else {
            return String::new();
        };
        let Some(bodega) = self.snapshot.bodega(bodega_id) else {
            return String::new();
        };
        let Some(estacion) = self.snapshot.estacion(&bodega.estacion.id) else {
            return String::new();
        };

        format!("{} ({}), {}", bodega.nombre, estacion.tipo.label(), rack.nombre)
    }

    /// Flatten the visible part of the tree
    ///
    /// `estacion_filter` restricts the roots to one station when non-empty.
    /// Children appear only under open parents; a node without children
    /// never reports itself as expandable.
    #[must_use]
    pub fn rows(&self, expanded: &ExpandedState, estacion_filter: &str) -> Vec<TreeRow> {
        let mut rows = Vec::new();

        let estaciones = self
            .snapshot
            .estaciones
            .iter()
            .filter(|e| estacion_filter.is_empty() || e.id == estacion_filter);

        for estacion in estaciones {
            let bodegas = self.bodegas_de_estacion(&estacion.id);
            let open = !bodegas.is_empty() && expanded.is_expanded(Level::Estaciones, &estacion.id);
            rows.push(TreeRow {
                depth: 0,
                level: Level::Estaciones,
                id: estacion.id.clone(),
                label: estacion.nombre.clone(),
                detail: format!("{} · {}", estacion.tipo.label(), estacion.ubicacion),
                expandable: !bodegas.is_empty(),
                expanded: open,
            });
            if !open {
                continue;
            }

            for bodega in bodegas {
                let racks = self.racks_de_bodega(&bodega.id);
                let open = !racks.is_empty() && expanded.is_expanded(Level::Bodegas, &bodega.id);
                rows.push(TreeRow {
                    depth: 1,
                    level: Level::Bodegas,
                    id: bodega.id.clone(),
                    label: bodega.nombre.clone(),
                    detail: bodega.descripcion.clone(),
                    expandable: !racks.is_empty(),
                    expanded: open,
                });
                if !open {
                    continue;
                }

                for rack in racks {
                    self.push_rack(&mut rows, rack, expanded);
                }
            }
        }

        rows
    }

    fn push_rack(&self, rows: &mut Vec<TreeRow>, rack: &Rack, expanded: &ExpandedState) {
        let productos = self.productos_de_rack(&rack.id);
        let open = !productos.is_empty() && expanded.is_expanded(Level::Racks, &rack.id);
        rows.push(TreeRow {
            depth: 2,
            level: Level::Racks,
            id: rack.id.clone(),
            label: rack.nombre.clone(),
            detail: rack.ubicacion.clone(),
            expandable: !productos.is_empty(),
            expanded: open,
        });
        if !open {
            return;
        }

        for producto in productos {
            rows.push(TreeRow {
                depth: 3,
                level: Level::Productos,
                id: producto.id.clone(),
                label: producto.nombre.clone(),
                detail: self.ubicacion_completa(&producto.rack.id, &producto.bodega.id),
                expandable: false,
                expanded: false,
            });
        }
    }
}
