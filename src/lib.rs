// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Inventario library - station, warehouse, rack and product inventory
//!
//! This crate provides a typed client for the inventory REST service plus the
//! browsing state behind the CLI and TUI: the cascading product filter, the
//! station → bodega → rack → product hierarchy, delete confirmation and forms.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod filter;
pub mod format;
pub mod forms;
pub mod hierarchy;
pub mod inventory;
pub mod notice;
pub mod tui;

/// Core data types as exchanged with the inventory service
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::fmt;

    // =========================================================================
    // Category Vocabularies
    // =========================================================================

    /// Categories a product may be filed under
    pub const PRODUCT_CATEGORIES: [&str; 8] = [
        "Limpieza",
        "Herramientas",
        "Papelería",
        "Electrónica",
        "Mobiliario",
        "Seguridad",
        "Mantenimiento",
        "Otros",
    ];

    /// Tags a rack may carry
    pub const RACK_CATEGORIES: [&str; 8] = [
        "Almacenamiento General",
        "Alta Rotación",
        "Productos Frágiles",
        "Productos Pesados",
        "Productos Químicos",
        "Herramientas",
        "Documentos",
        "Otros",
    ];

    // =========================================================================
    // Entity Kinds
    // =========================================================================

    /// The four kinds of record the service manages
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EntityKind {
        /// Top-level site
        Estacion,
        /// Warehouse inside a station
        Bodega,
        /// Shelving unit inside a warehouse
        Rack,
        /// Inventory item on a rack
        Producto,
    }

    impl EntityKind {
        /// Capitalised name used at the start of messages
        #[must_use]
        pub fn title(&self) -> &'static str {
            match self {
                Self::Estacion => "Estación",
                Self::Bodega => "Bodega",
                Self::Rack => "Rack",
                Self::Producto => "Producto",
            }
        }

        /// Name with its article, used inside messages ("la bodega")
        #[must_use]
        pub fn with_article(&self) -> &'static str {
            match self {
                Self::Estacion => "la estación",
                Self::Bodega => "la bodega",
                Self::Rack => "el rack",
                Self::Producto => "el producto",
            }
        }

        /// Whether the Spanish noun is feminine (drives participle agreement)
        #[must_use]
        pub fn is_feminine(&self) -> bool {
            matches!(self, Self::Estacion | Self::Bodega)
        }

        /// Past participle agreeing with the noun ("eliminada", "creado")
        #[must_use]
        pub fn participle(&self, stem: &str) -> String {
            if self.is_feminine() {
                format!("{stem}a")
            } else {
                format!("{stem}o")
            }
        }
    }

    impl fmt::Display for EntityKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.title())
        }
    }

    // =========================================================================
    // Estación (root of the hierarchy)
    // =========================================================================

    /// Station classification
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TipoEstacion {
        /// Central station
        Central,
        /// Secondary station
        #[default]
        Subestacion,
    }

    impl TipoEstacion {
        /// Label shown next to a bodega in a full location path
        #[must_use]
        pub fn label(&self) -> &'static str {
            match self {
                Self::Central => "Central",
                Self::Subestacion => "Secundaria",
            }
        }

        /// Parse the wire code (case-insensitive)
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_uppercase().as_str() {
                "CENTRAL" => Some(Self::Central),
                "SUBESTACION" | "SUBESTACIÓN" => Some(Self::Subestacion),
                _ => None,
            }
        }
    }

    /// Station operating state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EstadoEstacion {
        /// In service
        #[default]
        Activa,
        /// Out of service
        Inactiva,
    }

    impl EstadoEstacion {
        /// Wire code
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Activa => "activa",
                Self::Inactiva => "inactiva",
            }
        }

        /// Parse the wire code (case-insensitive)
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "activa" => Some(Self::Activa),
                "inactiva" => Some(Self::Inactiva),
                _ => None,
            }
        }
    }

    /// A station
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Estacion {
        /// Service-assigned identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Display name
        pub nombre: String,
        /// Physical location
        #[serde(default)]
        pub ubicacion: String,
        /// Free-form description
        #[serde(default)]
        pub descripcion: String,
        /// Central or secondary
        #[serde(default)]
        pub tipo: TipoEstacion,
        /// Active or inactive
        #[serde(default)]
        pub estado: EstadoEstacion,
        /// Creation time
        #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        /// Last update time
        #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Body for creating or updating a station
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EstacionInput {
        /// Display name
        pub nombre: String,
        /// Physical location
        pub ubicacion: String,
        /// Free-form description
        pub descripcion: String,
        /// Central or secondary
        pub tipo: TipoEstacion,
        /// Active or inactive
        pub estado: EstadoEstacion,
    }

    /// Denormalized station reference carried by bodegas and products
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct EstacionRef {
        /// Station identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Station name at the time of writing
        #[serde(default)]
        pub nombre: String,
        /// Station location at the time of writing
        #[serde(default)]
        pub ubicacion: String,
    }

    /// Denormalized reference to a bodega or rack
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct NamedRef {
        /// Referenced identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Referenced name at the time of writing
        #[serde(default)]
        pub nombre: String,
    }

    // =========================================================================
    // Bodega
    // =========================================================================

    /// A warehouse inside a station
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Bodega {
        /// Service-assigned identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Display name
        pub nombre: String,
        /// Free-form description
        #[serde(default)]
        pub descripcion: String,
        /// Owning station
        pub estacion: EstacionRef,
        /// Rack ids the bodega claims to contain
        #[serde(default)]
        pub racks: Vec<String>,
        /// Creation time
        #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        /// Last update time
        #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Body for creating or updating a bodega
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BodegaInput {
        /// Display name
        pub nombre: String,
        /// Free-form description
        pub descripcion: String,
        /// Owning station id
        pub estacion: String,
    }

    // =========================================================================
    // Rack
    // =========================================================================

    /// A shelving unit inside a bodega
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Rack {
        /// Service-assigned identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Display name
        pub nombre: String,
        /// Free-form description
        #[serde(default)]
        pub descripcion: String,
        /// Position inside the bodega
        #[serde(default)]
        pub ubicacion: String,
        /// Tags from [`RACK_CATEGORIES`]
        #[serde(default)]
        pub categorias: Vec<String>,
        /// Owning bodega id
        pub bodega: String,
        /// Creation time
        #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        /// Last update time
        #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Body for creating or updating a rack
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RackInput {
        /// Display name
        pub nombre: String,
        /// Free-form description
        pub descripcion: String,
        /// Position inside the bodega
        pub ubicacion: String,
        /// Tags from [`RACK_CATEGORIES`]
        pub categorias: Vec<String>,
        /// Owning bodega id
        pub bodega: String,
    }

    // =========================================================================
    // Producto
    // =========================================================================

    /// An inventory item located on one rack
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Producto {
        /// Service-assigned identifier
        #[serde(rename = "_id")]
        pub id: String,
        /// Display name
        pub nombre: String,
        /// Free-form description
        #[serde(default)]
        pub descripcion: String,
        /// Units in stock
        #[serde(default)]
        pub cantidad: u32,
        /// Unit price in CLP
        #[serde(default)]
        pub precio: f64,
        /// Category from [`PRODUCT_CATEGORIES`]
        #[serde(default)]
        pub categoria: String,
        /// Owning station (denormalized)
        pub estacion: EstacionRef,
        /// Owning bodega (denormalized)
        pub bodega: NamedRef,
        /// Rack holding the product
        pub rack: NamedRef,
        /// Creation time
        #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        /// Last update time
        #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Body for creating or updating a product
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ProductoInput {
        /// Display name
        pub nombre: String,
        /// Free-form description
        pub descripcion: String,
        /// Units in stock
        pub cantidad: u32,
        /// Unit price in CLP
        pub precio: f64,
        /// Category from [`PRODUCT_CATEGORIES`]
        pub categoria: String,
        /// Owning station id
        pub estacion: String,
        /// Owning bodega id
        pub bodega: String,
        /// Rack id
        pub rack: String,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::api::{ApiClient, ApiError, Entity, EntityApi, InventoryApi};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
