// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cascading product filter
//!
//! The filter narrows a flat product list by station, bodega, rack and text.
//! Selecting a higher level always clears the levels below it. The rack,
//! category and search fields round-trip through a view link so a filtered
//! listing can be shared and reopened.

use crate::types::{Bodega, Producto, Rack};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Link query key for the rack id
pub const QUERY_RACK: &str = "rack";
/// Link query key for the category text
pub const QUERY_CATEGORIA: &str = "categoria";
/// Link query key for the free-text search
pub const QUERY_BUSQUEDA: &str = "busqueda";

/// Active product filter; an empty field places no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Station id
    pub estacion: String,
    /// Bodega id
    pub bodega: String,
    /// Rack id
    pub rack: String,
    /// Category text (case-insensitive substring)
    pub categoria: String,
    /// Search text matched against name or category
    pub nombre: String,
}

/// A single edit to the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Select a station; clears bodega and rack
    SetEstacion(String),
    /// Select a bodega; clears rack
    SetBodega(String),
    /// Select a rack
    SetRack(String),
    /// Set the category text
    SetCategoria(String),
    /// Set the search text
    SetNombre(String),
    /// Reset every field
    Clear,
}

impl ProductFilter {
    /// Create an empty filter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one edit, enforcing the parent-clears-children rule
    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::SetEstacion(id) => {
                self.estacion = id;
                self.bodega.clear();
                self.rack.clear();
            }
            FilterAction::SetBodega(id) => {
                self.bodega = id;
                self.rack.clear();
            }
            FilterAction::SetRack(id) => self.rack = id,
            FilterAction::SetCategoria(text) => self.categoria = text,
            FilterAction::SetNombre(text) => self.nombre = text,
            FilterAction::Clear => *self = Self::default(),
        }
    }

    /// Builder-style [`ProductFilter::apply`]
    #[must_use]
    pub fn with(mut self, action: FilterAction) -> Self {
        self.apply(action);
        self
    }

    /// Check if no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a product passes every non-empty field
    #[must_use]
    pub fn matches(&self, producto: &Producto) -> bool {
        if !self.estacion.is_empty() && producto.estacion.id != self.estacion {
            return false;
        }
        if !self.bodega.is_empty() && producto.bodega.id != self.bodega {
            return false;
        }
        if !self.rack.is_empty() && producto.rack.id != self.rack {
            return false;
        }
        if !self.categoria.is_empty() && !contains_ci(&producto.categoria, &self.categoria) {
            return false;
        }
        if !self.nombre.is_empty()
            && !contains_ci(&producto.nombre, &self.nombre)
            && !contains_ci(&producto.categoria, &self.nombre)
        {
            return false;
        }
        true
    }

    /// Products passing the filter, in their original order
    #[must_use]
    pub fn filter_products<'a>(&self, productos: &'a [Producto]) -> Vec<&'a Producto> {
        productos.iter().filter(|p| self.matches(p)).collect()
    }

    /// Bodega options under the selected station (all when none selected)
    #[must_use]
    pub fn bodegas_filtradas<'a>(&self, bodegas: &'a [Bodega]) -> Vec<&'a Bodega> {
        bodegas_de(bodegas, &self.estacion)
    }

    /// Rack options under the selected bodega (all when none selected)
    #[must_use]
    pub fn racks_filtrados<'a>(&self, racks: &'a [Rack]) -> Vec<&'a Rack> {
        racks_de(racks, &self.bodega)
    }

    /// Encode the link-persisted fields as a query string
    ///
    /// Empty fields are omitted, so an empty filter encodes to `""`.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            (QUERY_RACK, &self.rack),
            (QUERY_CATEGORIA, &self.categoria),
            (QUERY_BUSQUEDA, &self.nombre),
        ] {
            if !value.is_empty() {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Restore a filter from a link or bare query string
    ///
    /// Accepts `rack=..`, `?rack=..` or `productos?rack=..`. Keys that are
    /// absent stay empty; unknown keys are ignored.
    #[must_use]
    pub fn from_query(link: &str) -> Self {
        let query = match link.split_once('?') {
            Some((_, q)) => q,
            None if link.contains('=') => link,
            None => "",
        };

        let mut filter = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_RACK => filter.rack = value.into_owned(),
                QUERY_CATEGORIA => filter.categoria = value.into_owned(),
                QUERY_BUSQUEDA => filter.nombre = value.into_owned(),
                _ => {}
            }
        }
        filter
    }

    /// Shareable view link for the product listing
    #[must_use]
    pub fn to_link(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "productos".to_string()
        } else {
            format!("productos?{query}")
        }
    }
}

/// Bodegas belonging to `estacion` (all when empty)
#[must_use]
pub fn bodegas_de<'a>(bodegas: &'a [Bodega], estacion: &str) -> Vec<&'a Bodega> {
    bodegas
        .iter()
        .filter(|b| estacion.is_empty() || b.estacion.id == estacion)
        .collect()
}

/// Racks belonging to `bodega` (all when empty)
#[must_use]
pub fn racks_de<'a>(racks: &'a [Rack], bodega: &str) -> Vec<&'a Rack> {
    racks
        .iter()
        .filter(|r| bodega.is_empty() || r.bodega == bodega)
        .collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EstacionRef, NamedRef};

    fn producto(nombre: &str, categoria: &str, rack: &str) -> Producto {
        Producto {
            id: format!("p-{nombre}"),
            nombre: nombre.into(),
            descripcion: String::new(),
            cantidad: 1,
            precio: 1000.0,
            categoria: categoria.into(),
            estacion: EstacionRef { id: "E1".into(), ..Default::default() },
            bodega: NamedRef { id: "B1".into(), nombre: "Bodega 1".into() },
            rack: NamedRef { id: rack.into(), nombre: rack.into() },
            created_at: None,
            updated_at: None,
        }
    }

    fn catalogo() -> Vec<Producto> {
        vec![
            producto("Martillo", "Herramientas", "R1"),
            producto("Guantes", "Seguridad", "R2"),
        ]
    }

    fn nombres(list: &[&Producto]) -> Vec<String> {
        list.iter().map(|p| p.nombre.clone()).collect()
    }

    #[test]
    fn test_filter_by_rack() {
        let productos = catalogo();
        let filter = ProductFilter::new().with(FilterAction::SetRack("R1".into()));
        assert_eq!(nombres(&filter.filter_products(&productos)), vec!["Martillo"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let productos = catalogo();
        let filter = ProductFilter::new().with(FilterAction::SetNombre("guante".into()));
        assert_eq!(nombres(&filter.filter_products(&productos)), vec!["Guantes"]);
    }

    #[test]
    fn test_search_also_matches_category() {
        let productos = catalogo();
        let filter = ProductFilter::new().with(FilterAction::SetNombre("HERRAMIENTA".into()));
        assert_eq!(nombres(&filter.filter_products(&productos)), vec!["Martillo"]);
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let productos = catalogo();
        assert_eq!(ProductFilter::new().filter_products(&productos).len(), 2);
    }

    #[test]
    fn test_set_estacion_clears_descendants() {
        let mut filter = ProductFilter::new()
            .with(FilterAction::SetBodega("B1".into()))
            .with(FilterAction::SetRack("R1".into()))
            .with(FilterAction::SetNombre("x".into()));

        filter.apply(FilterAction::SetEstacion("E2".into()));

        assert_eq!(filter.estacion, "E2");
        assert!(filter.bodega.is_empty());
        assert!(filter.rack.is_empty());
        assert_eq!(filter.nombre, "x");
    }

    #[test]
    fn test_set_bodega_clears_rack_only() {
        let mut filter = ProductFilter::new()
            .with(FilterAction::SetEstacion("E1".into()))
            .with(FilterAction::SetRack("R1".into()));

        filter.apply(FilterAction::SetBodega("B2".into()));

        assert_eq!(filter.estacion, "E1");
        assert_eq!(filter.bodega, "B2");
        assert!(filter.rack.is_empty());
    }

    #[test]
    fn test_query_round_trip() {
        let filter = ProductFilter {
            rack: "r1".into(),
            categoria: "c1".into(),
            nombre: "x".into(),
            ..Default::default()
        };

        let query = filter.to_query();
        assert_eq!(query, "rack=r1&categoria=c1&busqueda=x");
        assert_eq!(ProductFilter::from_query(&query), filter);
        assert_eq!(ProductFilter::from_query(&filter.to_link()), filter);
    }

    #[test]
    fn test_query_missing_keys_default_to_empty() {
        let filter = ProductFilter::from_query("?busqueda=Papeler%C3%ADa+azul&otro=1");
        assert_eq!(filter.nombre, "Papelería azul");
        assert!(filter.rack.is_empty());
        assert!(filter.categoria.is_empty());
        assert_eq!(ProductFilter::from_query("productos"), ProductFilter::default());
    }

    #[test]
    fn test_station_and_bodega_are_not_linked() {
        let filter = ProductFilter::new().with(FilterAction::SetEstacion("E1".into()));
        assert_eq!(filter.to_link(), "productos");
    }
}
