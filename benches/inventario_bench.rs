// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Filtering and tree flattening over a large in-memory inventory

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use inventario::filter::{FilterAction, ProductFilter};
use inventario::hierarchy::{ExpandedState, Hierarchy};
use inventario::inventory::Snapshot;
use inventario::types::{
    Bodega, Estacion, EstacionRef, EstadoEstacion, NamedRef, Producto, Rack, TipoEstacion,
    PRODUCT_CATEGORIES,
};

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

/// 10 stations, 5 bodegas each, 8 racks per bodega, products spread evenly
fn synthetic_snapshot(productos: usize) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for e in 0..10 {
        snapshot.estaciones.push(Estacion {
            id: format!("E{e}"),
            nombre: format!("Estación {e}"),
            ubicacion: format!("Zona {e}"),
            descripcion: String::new(),
            tipo: if e == 0 { TipoEstacion::Central } else { TipoEstacion::Subestacion },
            estado: EstadoEstacion::Activa,
            created_at: None,
            updated_at: None,
        });
        for b in 0..5 {
            let bodega_id = format!("B{e}-{b}");
            snapshot.bodegas.push(Bodega {
                id: bodega_id.clone(),
                nombre: format!("Bodega {e}-{b}"),
                descripcion: String::new(),
                estacion: EstacionRef { id: format!("E{e}"), ..Default::default() },
                racks: vec![],
                created_at: None,
                updated_at: None,
            });
            for r in 0..8 {
                snapshot.racks.push(Rack {
                    id: format!("R{e}-{b}-{r}"),
                    nombre: format!("Rack {r}"),
                    descripcion: String::new(),
                    ubicacion: format!("Pasillo {r}"),
                    categorias: vec![],
                    bodega: bodega_id.clone(),
                    created_at: None,
                    updated_at: None,
                });
            }
        }
    }

    let rack_count = snapshot.racks.len();
    for i in 0..productos {
        let rack = &snapshot.racks[i % rack_count];
        let bodega = rack.bodega.clone();
        let estacion = bodega
            .trim_start_matches('B')
            .split('-')
            .next()
            .map(|e| format!("E{e}"))
            .unwrap_or_default();
        let producto = Producto {
            id: format!("P{i}"),
            nombre: format!("Producto {i}"),
            descripcion: String::new(),
            cantidad: (i % 500) as u32,
            precio: (i % 100) as f64 * 990.0,
            categoria: PRODUCT_CATEGORIES[i % PRODUCT_CATEGORIES.len()].to_string(),
            estacion: EstacionRef { id: estacion, ..Default::default() },
            bodega: NamedRef { id: bodega, nombre: String::new() },
            rack: NamedRef { id: rack.id.clone(), nombre: rack.nombre.clone() },
            created_at: None,
            updated_at: None,
        };
        snapshot.productos.push(producto);
    }

    snapshot
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_products");

    let filters = [
        ("empty", ProductFilter::new()),
        (
            "estacion",
            ProductFilter::new().with(FilterAction::SetEstacion("E3".into())),
        ),
        (
            "busqueda",
            ProductFilter::new().with(FilterAction::SetNombre("segur".into())),
        ),
        (
            "cascada",
            ProductFilter::new()
                .with(FilterAction::SetEstacion("E3".into()))
                .with(FilterAction::SetBodega("B3-1".into()))
                .with(FilterAction::SetCategoria("herramientas".into())),
        ),
    ];

    for size in SIZES {
        let snapshot = synthetic_snapshot(size);
        group.throughput(Throughput::Elements(size as u64));

        for (name, filter) in &filters {
            group.bench_with_input(BenchmarkId::new(*name, size), &snapshot, |b, snapshot| {
                b.iter(|| filter.filter_products(black_box(&snapshot.productos)).len())
            });
        }
    }

    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_rows");

    for size in SIZES {
        let snapshot = synthetic_snapshot(size);
        let collapsed = ExpandedState::new();
        let mut expanded = ExpandedState::new();
        expanded.expand_all(&snapshot);

        group.bench_with_input(BenchmarkId::new("collapsed", size), &snapshot, |b, snapshot| {
            b.iter(|| Hierarchy::new(snapshot).rows(black_box(&collapsed), "").len())
        });
        group.bench_with_input(BenchmarkId::new("expand_all", size), &snapshot, |b, snapshot| {
            b.iter(|| Hierarchy::new(snapshot).rows(black_box(&expanded), "").len())
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_filter, bench_tree
);

criterion_main!(benches);
