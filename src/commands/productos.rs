// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Filtered product listing with a shareable view link

use super::{resolve, Session};
use crate::filter::{FilterAction, ProductFilter};
use crate::format::{clp, or_dash};
use crate::hierarchy::Hierarchy;
use crate::inventory::Snapshot;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

/// Filter flags for `productos`
#[derive(Debug, Default, Clone, Args)]
pub struct ProductosArgs {
    /// Restore a filter from a view link (`productos?rack=..&categoria=..`)
    #[arg(long)]
    pub link: Option<String>,

    /// Station (id or name); clears bodega and rack
    #[arg(long)]
    pub estacion: Option<String>,

    /// Bodega (id or name); clears rack
    #[arg(long)]
    pub bodega: Option<String>,

    /// Rack (id or name)
    #[arg(long)]
    pub rack: Option<String>,

    /// Category text, case-insensitive
    #[arg(long)]
    pub categoria: Option<String>,

    /// Search text matched against name or category
    #[arg(long)]
    pub busqueda: Option<String>,
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    producto: &'a crate::types::Producto,
    ubicacion_completa: String,
}

/// Run productos command
pub async fn run(session: &Session, args: ProductosArgs) -> Result<()> {
    let snapshot = Snapshot::load(&session.client)
        .await
        .context("Error al cargar los datos")?;
    let filter = build_filter(&snapshot, &args)?;
    let tree = Hierarchy::new(&snapshot);
    let productos = filter.filter_products(&snapshot.productos);

    if session.json {
        let rows: Vec<Row<'_>> = productos
            .iter()
            .map(|p| Row {
                producto: p,
                ubicacion_completa: tree.ubicacion_completa(&p.rack.id, &p.bodega.id),
            })
            .collect();
        return session.print_json(&serde_json::json!({
            "filtro": filter,
            "link": filter.to_link(),
            "productos": rows,
        }));
    }

    if productos.is_empty() {
        println!("No se encontraron productos");
    } else {
        session.heading(&format!(
            "Productos ({} de {})",
            productos.len(),
            snapshot.productos.len()
        ));
        for p in &productos {
            println!(
                "  {:<24} {:>6}  {:>12}  {:<14} {}",
                p.nombre,
                p.cantidad,
                clp(p.precio),
                or_dash(&p.categoria),
                or_dash(&tree.ubicacion_completa(&p.rack.id, &p.bodega.id))
            );
        }
    }

    println!();
    println!("Link: {}", session.dim(&filter.to_link()));
    Ok(())
}

/// Link first, then each flag in hierarchy order
fn build_filter(snapshot: &Snapshot, args: &ProductosArgs) -> Result<ProductFilter> {
    let mut filter = args
        .link
        .as_deref()
        .map(ProductFilter::from_query)
        .unwrap_or_default();

    if let Some(e) = &args.estacion {
        let id = resolve(&snapshot.estaciones, e)?.id.clone();
        filter.apply(FilterAction::SetEstacion(id));
    }
    if let Some(b) = &args.bodega {
        let id = resolve(&snapshot.bodegas, b)?.id.clone();
        filter.apply(FilterAction::SetBodega(id));
    }
    if let Some(r) = &args.rack {
        let id = resolve(&snapshot.racks, r)?.id.clone();
        filter.apply(FilterAction::SetRack(id));
    }
    if let Some(c) = &args.categoria {
        filter.apply(FilterAction::SetCategoria(c.clone()));
    }
    if let Some(q) = &args.busqueda {
        filter.apply(FilterAction::SetNombre(q.clone()));
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_restored() {
        let args = ProductosArgs {
            link: Some("productos?rack=R1&categoria=Herramientas&busqueda=mar".into()),
            ..Default::default()
        };
        let filter = build_filter(&Snapshot::default(), &args).unwrap();
        assert_eq!(filter.rack, "R1");
        assert_eq!(filter.categoria, "Herramientas");
        assert_eq!(filter.nombre, "mar");
    }

    #[test]
    fn test_flags_override_link() {
        let args = ProductosArgs {
            link: Some("categoria=Limpieza".into()),
            categoria: Some("Seguridad".into()),
            ..Default::default()
        };
        let filter = build_filter(&Snapshot::default(), &args).unwrap();
        assert_eq!(filter.categoria, "Seguridad");
    }

    #[test]
    fn test_unknown_station_is_an_error() {
        let args = ProductosArgs {
            estacion: Some("E9".into()),
            ..Default::default()
        };
        assert!(build_filter(&Snapshot::default(), &args).is_err());
    }
}
