// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Product commands

use super::{
    delete_with_confirmation, list_all, missing_id, resolve, save, unknown_action, Session,
};
use crate::api::{ApiError, EntityApi};
use crate::format::{clp, or_dash};
use crate::forms::{open_for_edit, ProductoForm};
use crate::hierarchy::Hierarchy;
use crate::inventory::Snapshot;
use crate::types::{Producto, PRODUCT_CATEGORIES};
use anyhow::{Context, Result};
use clap::Args;

/// Fields accepted by `producto create|update`
#[derive(Debug, Default, Clone, Args)]
pub struct ProductoArgs {
    /// Product name
    #[arg(long)]
    pub nombre: Option<String>,

    /// Description
    #[arg(long)]
    pub descripcion: Option<String>,

    /// Units in stock (digits only)
    #[arg(long)]
    pub cantidad: Option<String>,

    /// Unit price in whole pesos (digits only)
    #[arg(long)]
    pub precio: Option<String>,

    /// Category
    #[arg(long)]
    pub categoria: Option<String>,

    /// Station (id or name)
    #[arg(long)]
    pub estacion: Option<String>,

    /// Bodega (id or name); defaults to the rack's bodega
    #[arg(long)]
    pub bodega: Option<String>,

    /// Rack (id or name)
    #[arg(long)]
    pub rack: Option<String>,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run producto command
pub async fn run(
    session: &Session,
    action: &str,
    id: Option<String>,
    args: ProductoArgs,
) -> Result<()> {
    match action {
        "list" | "ls" => {
            let productos = list_all::<Producto>(session).await?;
            if session.json {
                return session.print_json(&productos);
            }
            if productos.is_empty() {
                println!("No hay productos registrados");
                return Ok(());
            }

            session.heading(&format!("Productos ({})", productos.len()));
            for p in &productos {
                println!(
                    "  {:<24} {:>6}  {:>12}  {:<14} {}",
                    p.nombre,
                    p.cantidad,
                    clp(p.precio),
                    or_dash(&p.categoria),
                    session.dim(&p.id)
                );
            }
        }

        "show" | "get" => {
            let id = id.ok_or_else(missing_id::<Producto>)?;
            let producto = fetch(session, &id).await?;
            if session.json {
                return session.print_json(&producto);
            }

            session.heading(&producto.nombre);
            println!("  ID:          {}", producto.id);
            println!("  Categoría:   {}", or_dash(&producto.categoria));
            println!("  Cantidad:    {}", producto.cantidad);
            println!("  Precio:      {}", clp(producto.precio));
            println!("  Estación:    {}", or_dash(&producto.estacion.nombre));
            println!("  Bodega:      {}", or_dash(&producto.bodega.nombre));
            println!("  Rack:        {}", or_dash(&producto.rack.nombre));
            println!("  Descripción: {}", or_dash(&producto.descripcion));
        }

        "create" | "add" => {
            let snapshot = load_snapshot(session).await?;
            let mut form = ProductoForm::default();
            fill(&snapshot, &mut form, &args)?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            } else {
                let tree = Hierarchy::new(&snapshot);
                let ubicacion = tree.ubicacion_completa(&saved.rack.id, &saved.bodega.id);
                if !ubicacion.is_empty() {
                    println!("  {ubicacion}");
                }
            }
        }

        "update" | "edit" => {
            let id = id.ok_or_else(missing_id::<Producto>)?;
            let mut form: ProductoForm = open_for_edit(&session.client, &id)
                .await
                .map_err(|e| not_found_or(e, &id))?;
            let snapshot = load_snapshot(session).await?;
            fill(&snapshot, &mut form, &args)?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "delete" | "rm" => {
            let id = id.ok_or_else(missing_id::<Producto>)?;
            let productos = list_all::<Producto>(session).await?;
            let target = resolve(&productos, &id)?.id.clone();
            delete_with_confirmation::<Producto>(session, &target, args.yes).await?;
        }

        other => return Err(unknown_action(other)),
    }

    Ok(())
}

async fn fetch(session: &Session, id: &str) -> Result<Producto> {
    EntityApi::<Producto>::get(&session.client, id)
        .await
        .map_err(|e| not_found_or(e, id))
}

fn not_found_or(e: ApiError, id: &str) -> anyhow::Error {
    if e.is_not_found() {
        anyhow::anyhow!("Producto no encontrado: {}", id)
    } else {
        anyhow::Error::new(e).context("Error al cargar el producto")
    }
}

async fn load_snapshot(session: &Session) -> Result<Snapshot> {
    Snapshot::load(&session.client)
        .await
        .context("Error al cargar los datos")
}

/// Copy flags over the form, walking station → bodega → rack
///
/// Naming only a rack fills in its bodega and station. A bodega or rack
/// outside the chosen parent is rejected.
fn fill(snapshot: &Snapshot, form: &mut ProductoForm, args: &ProductoArgs) -> Result<()> {
    if let Some(nombre) = &args.nombre {
        form.nombre.clone_from(nombre);
    }
    if let Some(descripcion) = &args.descripcion {
        form.descripcion.clone_from(descripcion);
    }
    if let Some(cantidad) = &args.cantidad {
        form.cantidad.set_text(cantidad);
    }
    if let Some(precio) = &args.precio {
        form.precio.set_text(precio);
    }
    if let Some(categoria) = &args.categoria {
        form.categoria = PRODUCT_CATEGORIES
            .iter()
            .find(|c| c.to_lowercase() == categoria.to_lowercase())
            .map_or_else(|| categoria.clone(), |c| (*c).to_string());
    }

    let rack = args
        .rack
        .as_deref()
        .map(|r| resolve(&snapshot.racks, r))
        .transpose()?;
    let bodega = match (&args.bodega, rack) {
        (Some(b), _) => Some(resolve(&snapshot.bodegas, b)?),
        (None, Some(r)) => snapshot.bodega(&r.bodega),
        (None, None) => None,
    };
    let estacion = match (&args.estacion, bodega) {
        (Some(e), _) => Some(resolve(&snapshot.estaciones, e)?.id.clone()),
        (None, Some(b)) => Some(b.estacion.id.clone()),
        (None, None) => None,
    };

    if let Some(estacion) = estacion {
        if estacion != form.estacion {
            form.select_estacion(&estacion);
        }
    }
    if let Some(bodega) = bodega {
        if !form.bodega_options(&snapshot.bodegas).iter().any(|b| b.id == bodega.id) {
            anyhow::bail!("La bodega {} no pertenece a la estación seleccionada", bodega.nombre);
        }
        if bodega.id != form.bodega {
            form.select_bodega(&bodega.id);
        }
    }
    if let Some(rack) = rack {
        if !form.rack_options(&snapshot.racks).iter().any(|r| r.id == rack.id) {
            anyhow::bail!("El rack {} no pertenece a la bodega seleccionada", rack.nombre);
        }
        form.select_rack(&rack.id);
    }

    Ok(())
}
