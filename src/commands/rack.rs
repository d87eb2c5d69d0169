// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Rack commands, including the single-rack view with its products

use super::{
    delete_with_confirmation, list_all, missing_id, resolve, save, split_list, unknown_action, Session,
};
use crate::format::{clp, list_or, or_dash};
use crate::forms::{EntityForm, RackForm};
use crate::hierarchy::Hierarchy;
use crate::inventory::Snapshot;
use crate::types::{Bodega, Rack, RACK_CATEGORIES};
use anyhow::{Context, Result};
use clap::Args;

/// Fields accepted by `rack create|update`
#[derive(Debug, Default, Clone, Args)]
pub struct RackArgs {
    /// Rack name
    #[arg(long)]
    pub nombre: Option<String>,

    /// Description
    #[arg(long)]
    pub descripcion: Option<String>,

    /// Position inside the bodega
    #[arg(long)]
    pub ubicacion: Option<String>,

    /// Category tags, comma separated (replaces the current set)
    #[arg(long)]
    pub categorias: Option<String>,

    /// Owning bodega (id or name); filters `list`
    #[arg(long)]
    pub bodega: Option<String>,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run rack command
pub async fn run(session: &Session, action: &str, id: Option<String>, args: RackArgs) -> Result<()> {
    match action {
        "list" | "ls" => {
            let racks = list_all::<Rack>(session).await?;
            let bodegas = list_all::<Bodega>(session).await?;
            let bodega = match &args.bodega {
                Some(b) => resolve(&bodegas, b)?.id.clone(),
                None => String::new(),
            };
            let visibles: Vec<&Rack> = racks
                .iter()
                .filter(|r| bodega.is_empty() || r.bodega == bodega)
                .collect();

            if session.json {
                return session.print_json(&visibles);
            }
            if visibles.is_empty() {
                println!("No hay racks registrados");
                return Ok(());
            }

            session.heading(&format!("Racks ({})", visibles.len()));
            for r in visibles {
                let bodega = bodegas
                    .iter()
                    .find(|b| b.id == r.bodega)
                    .map_or("-", |b| b.nombre.as_str());
                println!(
                    "  {:<20} {:<20} {:<16} {}",
                    r.nombre,
                    bodega,
                    or_dash(&r.ubicacion),
                    session.dim(&r.id)
                );
            }
        }

        "show" | "get" => {
            let id = id.ok_or_else(missing_id::<Rack>)?;
            let snapshot = Snapshot::load(&session.client)
                .await
                .context("Error al cargar los datos")?;
            let rack = resolve(&snapshot.racks, &id)?;
            let tree = Hierarchy::new(&snapshot);
            let productos = tree.productos_de_rack(&rack.id);

            if session.json {
                return session.print_json(&serde_json::json!({
                    "rack": rack,
                    "productos": productos,
                }));
            }

            let bodega = snapshot.bodega(&rack.bodega);
            session.heading(&rack.nombre);
            println!("  ID:          {}", rack.id);
            println!("  Bodega:      {}", bodega.map_or("-", |b| b.nombre.as_str()));
            println!("  Ubicación:   {}", or_dash(&rack.ubicacion));
            println!("  Categorías:  {}", list_or(&rack.categorias, "Sin categorías"));
            println!("  Descripción: {}", or_dash(&rack.descripcion));
            println!();
            if productos.is_empty() {
                println!("  No hay productos en este rack");
            } else {
                println!("  Productos ({}):", productos.len());
                for p in productos {
                    println!(
                        "    {:<24} {:>6}  {:>12}  {}",
                        p.nombre,
                        p.cantidad,
                        clp(p.precio),
                        or_dash(&p.categoria)
                    );
                }
            }
        }

        "create" | "add" => {
            let mut form = RackForm::default();
            fill(session, &mut form, &args).await?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "update" | "edit" => {
            let id = id.ok_or_else(missing_id::<Rack>)?;
            let racks = list_all::<Rack>(session).await?;
            let mut form = RackForm::edit(resolve(&racks, &id)?);
            fill(session, &mut form, &args).await?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "delete" | "rm" => {
            let id = id.ok_or_else(missing_id::<Rack>)?;
            let racks = list_all::<Rack>(session).await?;
            let target = resolve(&racks, &id)?.id.clone();
            delete_with_confirmation::<Rack>(session, &target, args.yes).await?;
        }

        other => return Err(unknown_action(other)),
    }

    Ok(())
}

async fn fill(session: &Session, form: &mut RackForm, args: &RackArgs) -> Result<()> {
    if let Some(nombre) = &args.nombre {
        form.nombre.clone_from(nombre);
    }
    if let Some(descripcion) = &args.descripcion {
        form.descripcion.clone_from(descripcion);
    }
    if let Some(ubicacion) = &args.ubicacion {
        form.ubicacion.clone_from(ubicacion);
    }
    if let Some(categorias) = &args.categorias {
        form.categorias = parse_categorias(categorias)?;
    }
    if let Some(bodega) = &args.bodega {
        let bodegas = list_all::<Bodega>(session).await?;
        form.bodega = resolve(&bodegas, bodega)?.id.clone();
    }
    Ok(())
}

/// Parse a comma-separated tag list, matching the vocabulary case-insensitively
fn parse_categorias(value: &str) -> Result<Vec<String>> {
    let mut form = RackForm::default();
    for item in split_list(value) {
        let known = RACK_CATEGORIES
            .iter()
            .find(|c| c.to_lowercase() == item.to_lowercase())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Categoría de rack desconocida: {}. Válidas: {}",
                    item,
                    RACK_CATEGORIES.join(", ")
                )
            })?;
        if !form.categorias.iter().any(|c| c == known) {
            form.toggle_categoria(known);
        }
    }
    Ok(form.categorias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categorias() {
        let tags = parse_categorias("documentos, Otros,DOCUMENTOS").unwrap();
        assert_eq!(tags, vec!["Documentos".to_string(), "Otros".to_string()]);
    }

    #[test]
    fn test_parse_categorias_rejects_unknown() {
        assert!(parse_categorias("Congelados").is_err());
    }
}
