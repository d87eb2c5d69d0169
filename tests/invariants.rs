// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for filtering and the inventory tree
//!
//! These tests verify:
//! 1. Cascade - choosing a parent level always clears the levels below it
//! 2. Filtering - results are exactly the products that match, in order
//! 3. Links - rack, category and search text survive a view link
//! 4. Tree - only nodes with children open, and children sit one level down

use inventario::filter::{bodegas_de, racks_de, FilterAction, ProductFilter};
use inventario::hierarchy::{ExpandedState, Hierarchy, Level};
use inventario::inventory::Snapshot;
use inventario::types::{
    Bodega, Estacion, EstacionRef, EstadoEstacion, NamedRef, Producto, Rack, TipoEstacion,
    PRODUCT_CATEGORIES,
};
use proptest::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

/// Small id space so generated filters actually hit products
fn id(prefix: &str, n: u8) -> String {
    format!("{prefix}{}", n % 3)
}

fn make_producto(n: u8, estacion: u8, bodega: u8, rack: u8, categoria: usize, nombre: &str) -> Producto {
    Producto {
        id: format!("P{n}"),
        nombre: nombre.to_string(),
        descripcion: String::new(),
        cantidad: u32::from(n),
        precio: f64::from(n) * 100.0,
        categoria: PRODUCT_CATEGORIES[categoria % PRODUCT_CATEGORIES.len()].to_string(),
        estacion: EstacionRef { id: id("E", estacion), ..Default::default() },
        bodega: NamedRef { id: id("B", bodega), nombre: String::new() },
        rack: NamedRef { id: id("R", rack), nombre: String::new() },
        created_at: None,
        updated_at: None,
    }
}

fn producto_strategy() -> impl Strategy<Value = Producto> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>(), any::<usize>(), "[a-zA-Z ]{0,12}")
        .prop_map(|(n, e, b, r, c, nombre)| make_producto(n, e, b, r, c, &nombre))
}

fn action_strategy() -> impl Strategy<Value = FilterAction> {
    prop_oneof![
        (0u8..4).prop_map(|n| FilterAction::SetEstacion(if n == 3 { String::new() } else { id("E", n) })),
        (0u8..4).prop_map(|n| FilterAction::SetBodega(if n == 3 { String::new() } else { id("B", n) })),
        (0u8..4).prop_map(|n| FilterAction::SetRack(if n == 3 { String::new() } else { id("R", n) })),
        "[a-zA-Zé]{0,6}".prop_map(FilterAction::SetCategoria),
        "[a-zA-Z ]{0,6}".prop_map(FilterAction::SetNombre),
        Just(FilterAction::Clear),
    ]
}

/// Three stations, each with bodegas and racks, some left empty
fn make_snapshot(productos: Vec<Producto>) -> Snapshot {
    let estaciones = (0..3)
        .map(|n| Estacion {
            id: id("E", n),
            nombre: format!("Estación {n}"),
            ubicacion: String::new(),
            descripcion: String::new(),
            tipo: if n == 0 { TipoEstacion::Central } else { TipoEstacion::Subestacion },
            estado: EstadoEstacion::Activa,
            created_at: None,
            updated_at: None,
        })
        .collect();
    let bodegas = (0..2)
        .map(|n| Bodega {
            id: id("B", n),
            nombre: format!("Bodega {n}"),
            descripcion: String::new(),
            estacion: EstacionRef { id: id("E", n), ..Default::default() },
            racks: vec![],
            created_at: None,
            updated_at: None,
        })
        .collect();
    let racks = (0..3)
        .map(|n| Rack {
            id: id("R", n),
            nombre: format!("Rack {n}"),
            descripcion: String::new(),
            ubicacion: String::new(),
            categorias: vec![],
            bodega: id("B", n % 2),
            created_at: None,
            updated_at: None,
        })
        .collect();

    Snapshot {
        estaciones,
        bodegas,
        racks,
        productos,
    }
}

// =============================================================================
// Invariant 1: Cascade
// =============================================================================

proptest! {
    #[test]
    fn test_estacion_change_clears_children(
        actions in prop::collection::vec(action_strategy(), 0..12),
        estacion in 0u8..3,
    ) {
        let mut filter = ProductFilter::new();
        for action in actions {
            filter.apply(action);
        }
        filter.apply(FilterAction::SetEstacion(id("E", estacion)));
        prop_assert!(filter.bodega.is_empty());
        prop_assert!(filter.rack.is_empty());
    }

    #[test]
    fn test_bodega_change_clears_rack_only(
        actions in prop::collection::vec(action_strategy(), 0..12),
        bodega in 0u8..3,
    ) {
        let mut filter = ProductFilter::new();
        for action in actions {
            filter.apply(action);
        }
        let estacion = filter.estacion.clone();
        let categoria = filter.categoria.clone();
        filter.apply(FilterAction::SetBodega(id("B", bodega)));
        prop_assert!(filter.rack.is_empty());
        prop_assert_eq!(filter.estacion, estacion);
        prop_assert_eq!(filter.categoria, categoria);
    }
}

// =============================================================================
// Invariant 2: Filtering
// =============================================================================

proptest! {
    #[test]
    fn test_filter_keeps_exactly_matching_products(
        productos in prop::collection::vec(producto_strategy(), 0..40),
        actions in prop::collection::vec(action_strategy(), 0..8),
    ) {
        let mut filter = ProductFilter::new();
        for action in actions {
            filter.apply(action);
        }

        let kept = filter.filter_products(&productos);
        let expected: Vec<&Producto> = productos.iter().filter(|p| filter.matches(p)).collect();
        prop_assert_eq!(&kept, &expected);

        for p in kept {
            if !filter.rack.is_empty() {
                prop_assert_eq!(&p.rack.id, &filter.rack);
            }
            if !filter.estacion.is_empty() {
                prop_assert_eq!(&p.estacion.id, &filter.estacion);
            }
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything(
        productos in prop::collection::vec(producto_strategy(), 0..40),
    ) {
        let filter = ProductFilter::new();
        prop_assert_eq!(filter.filter_products(&productos).len(), productos.len());
    }

    #[test]
    fn test_option_lists_follow_parent(estacion in 0u8..3, bodega in 0u8..3) {
        let snapshot = make_snapshot(vec![]);
        let e = id("E", estacion);
        let b = id("B", bodega);

        prop_assert!(bodegas_de(&snapshot.bodegas, &e).iter().all(|x| x.estacion.id == e));
        prop_assert!(racks_de(&snapshot.racks, &b).iter().all(|x| x.bodega == b));
        prop_assert_eq!(bodegas_de(&snapshot.bodegas, "").len(), snapshot.bodegas.len());
    }
}

// =============================================================================
// Invariant 3: Links
// =============================================================================

proptest! {
    #[test]
    fn test_link_round_trip(
        rack in "[a-zA-Z0-9]{0,8}",
        categoria in "[a-zA-Zéñ &=?]{0,10}",
        nombre in "[a-zA-Z0-9 &%+]{0,10}",
    ) {
        let filter = ProductFilter::new()
            .with(FilterAction::SetRack(rack.clone()))
            .with(FilterAction::SetCategoria(categoria.clone()))
            .with(FilterAction::SetNombre(nombre.clone()));

        let restored = ProductFilter::from_query(&filter.to_link());
        prop_assert_eq!(restored.rack, rack);
        prop_assert_eq!(restored.categoria, categoria);
        prop_assert_eq!(restored.nombre, nombre);
        prop_assert!(restored.estacion.is_empty());
        prop_assert!(restored.bodega.is_empty());
    }
}

// =============================================================================
// Invariant 4: Tree
// =============================================================================

proptest! {
    #[test]
    fn test_tree_rows_are_well_formed(
        productos in prop::collection::vec(producto_strategy(), 0..30),
        toggles in prop::collection::vec((0usize..3, 0u8..3), 0..10),
        expand_all in any::<bool>(),
    ) {
        let snapshot = make_snapshot(productos);
        let mut expanded = ExpandedState::new();
        if expand_all {
            expanded.expand_all(&snapshot);
        }
        for (level, n) in toggles {
            let (level, prefix) = match level {
                0 => (Level::Estaciones, "E"),
                1 => (Level::Bodegas, "B"),
                _ => (Level::Racks, "R"),
            };
            expanded.toggle(level, &id(prefix, n));
        }

        let rows = Hierarchy::new(&snapshot).rows(&expanded, "");
        prop_assert_eq!(rows.iter().filter(|r| r.depth == 0).count(), snapshot.estaciones.len());

        for (i, row) in rows.iter().enumerate() {
            if row.expanded {
                prop_assert!(row.expandable);
                let next = rows.get(i + 1);
                prop_assert!(next.is_some_and(|n| n.depth == row.depth + 1));
            }
            if row.level == Level::Productos {
                prop_assert!(!row.expandable);
            }
            if let Some(next) = rows.get(i + 1) {
                prop_assert!(next.depth <= row.depth + 1);
                if next.depth > row.depth {
                    prop_assert!(row.expanded);
                }
            }
        }
    }

    #[test]
    fn test_station_selector_limits_roots(estacion in 0u8..3) {
        let snapshot = make_snapshot(vec![]);
        let mut expanded = ExpandedState::new();
        expanded.expand_all(&snapshot);

        let e = id("E", estacion);
        let rows = Hierarchy::new(&snapshot).rows(&expanded, &e);
        let roots: Vec<_> = rows.iter().filter(|r| r.depth == 0).collect();
        prop_assert_eq!(roots.len(), 1);
        prop_assert_eq!(&roots[0].id, &e);
    }
}

#[test]
fn test_ubicacion_completa_uses_station_type() {
    let snapshot = make_snapshot(vec![]);
    let tree = Hierarchy::new(&snapshot);

    assert_eq!(tree.ubicacion_completa("R0", "B0"), "Bodega 0 (Central), Rack 0");
    assert_eq!(tree.ubicacion_completa("R1", "B1"), "Bodega 1 (Secundaria), Rack 1");
    assert_eq!(tree.ubicacion_completa("R9", "B0"), "");
    assert_eq!(tree.ubicacion_completa("R0", "B9"), "");
}

#[test]
fn test_martillo_guantes_scenario() {
    let snapshot = make_snapshot(vec![
        make_producto(1, 0, 0, 0, 1, "Martillo"),
        make_producto(2, 0, 0, 0, 5, "Guantes"),
    ]);

    let filter = ProductFilter::new().with(FilterAction::SetNombre("segur".into()));
    let kept: Vec<&str> = filter
        .filter_products(&snapshot.productos)
        .iter()
        .map(|p| p.nombre.as_str())
        .collect();
    assert_eq!(kept, vec!["Guantes"]);
}
