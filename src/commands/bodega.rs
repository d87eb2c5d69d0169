// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bodega commands

use super::{
    delete_with_confirmation, list_all, missing_id, resolve, save, unknown_action, Session,
};
use crate::filter::{bodegas_de, racks_de};
use crate::format::{list_or, or_dash};
use crate::forms::{BodegaForm, EntityForm};
use crate::types::{Bodega, Estacion, Rack};
use anyhow::Result;
use clap::Args;

/// Fields accepted by `bodega create|update`
#[derive(Debug, Default, Clone, Args)]
pub struct BodegaArgs {
    /// Bodega name
    #[arg(long)]
    pub nombre: Option<String>,

    /// Description
    #[arg(long)]
    pub descripcion: Option<String>,

    /// Owning station (id or name); filters `list`
    #[arg(long)]
    pub estacion: Option<String>,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run bodega command
pub async fn run(session: &Session, action: &str, id: Option<String>, args: BodegaArgs) -> Result<()> {
    match action {
        "list" | "ls" => {
            let bodegas = list_all::<Bodega>(session).await?;
            let estacion = match &args.estacion {
                Some(e) => {
                    let estaciones = list_all::<Estacion>(session).await?;
                    resolve(&estaciones, e)?.id.clone()
                }
                None => String::new(),
            };
            let visibles = bodegas_de(&bodegas, &estacion);

            if session.json {
                return session.print_json(&visibles);
            }
            if visibles.is_empty() {
                println!("No hay bodegas registradas");
                return Ok(());
            }

            session.heading(&format!("Bodegas ({})", visibles.len()));
            for b in visibles {
                println!(
                    "  {:<24} {:<20} {}",
                    b.nombre,
                    or_dash(&b.estacion.nombre),
                    session.dim(&b.id)
                );
            }
        }

        "show" | "get" => {
            let id = id.ok_or_else(missing_id::<Bodega>)?;
            let bodegas = list_all::<Bodega>(session).await?;
            let bodega = resolve(&bodegas, &id)?;
            let racks = list_all::<Rack>(session).await?;
            let propios = racks_de(&racks, &bodega.id);

            if session.json {
                return session.print_json(&serde_json::json!({
                    "bodega": bodega,
                    "racks": propios,
                }));
            }

            session.heading(&bodega.nombre);
            println!("  ID:          {}", bodega.id);
            println!("  Estación:    {}", or_dash(&bodega.estacion.nombre));
            println!("  Descripción: {}", or_dash(&bodega.descripcion));
            println!();
            if propios.is_empty() {
                println!("  No hay racks en esta bodega");
            } else {
                println!("  Racks ({}):", propios.len());
                for r in propios {
                    println!(
                        "    {:<20} {:<16} {}  {}",
                        r.nombre,
                        or_dash(&r.ubicacion),
                        list_or(&r.categorias, "Sin categorías"),
                        session.dim(&r.id)
                    );
                }
            }
        }

        "create" | "add" => {
            let mut form = BodegaForm::default();
            fill(session, &mut form, &args).await?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "update" | "edit" => {
            let id = id.ok_or_else(missing_id::<Bodega>)?;
            let bodegas = list_all::<Bodega>(session).await?;
            let mut form = BodegaForm::edit(resolve(&bodegas, &id)?);
            fill(session, &mut form, &args).await?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "delete" | "rm" => {
            let id = id.ok_or_else(missing_id::<Bodega>)?;
            let bodegas = list_all::<Bodega>(session).await?;
            let target = resolve(&bodegas, &id)?.id.clone();
            delete_with_confirmation::<Bodega>(session, &target, args.yes).await?;
        }

        other => return Err(unknown_action(other)),
    }

    Ok(())
}

async fn fill(session: &Session, form: &mut BodegaForm, args: &BodegaArgs) -> Result<()> {
    if let Some(nombre) = &args.nombre {
        form.nombre.clone_from(nombre);
    }
    if let Some(descripcion) = &args.descripcion {
        form.descripcion.clone_from(descripcion);
    }
    if let Some(estacion) = &args.estacion {
        let estaciones = list_all::<Estacion>(session).await?;
        form.estacion = resolve(&estaciones, estacion)?.id.clone();
    }
    Ok(())
}
