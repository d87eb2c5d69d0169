// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Station commands - list, show, create, update, delete

use super::{
    delete_with_confirmation, list_all, missing_id, resolve, save, unknown_action, Session,
};
use crate::filter::bodegas_de;
use crate::format::or_dash;
use crate::forms::{EntityForm, EstacionForm};
use crate::types::{Bodega, Estacion, EstadoEstacion, TipoEstacion};
use anyhow::Result;
use clap::Args;

/// Fields accepted by `estacion create|update`
#[derive(Debug, Default, Clone, Args)]
pub struct EstacionArgs {
    /// Station name
    #[arg(long)]
    pub nombre: Option<String>,

    /// Physical location
    #[arg(long)]
    pub ubicacion: Option<String>,

    /// Description
    #[arg(long)]
    pub descripcion: Option<String>,

    /// Type: central, subestacion
    #[arg(long)]
    pub tipo: Option<String>,

    /// State: activa, inactiva
    #[arg(long)]
    pub estado: Option<String>,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run estacion command
pub async fn run(
    session: &Session,
    action: &str,
    id: Option<String>,
    args: EstacionArgs,
) -> Result<()> {
    match action {
        "list" | "ls" => {
            let estaciones = list_all::<Estacion>(session).await?;
            if session.json {
                return session.print_json(&estaciones);
            }
            if estaciones.is_empty() {
                println!("No hay estaciones registradas");
                return Ok(());
            }

            session.heading(&format!("Estaciones ({})", estaciones.len()));
            for e in &estaciones {
                println!(
                    "  {:<24} {:<10} {:<8} {}  {}",
                    e.nombre,
                    e.tipo.label(),
                    e.estado.code(),
                    or_dash(&e.ubicacion),
                    session.dim(&e.id)
                );
            }
        }

        "show" | "get" => {
            let id = id.ok_or_else(missing_id::<Estacion>)?;
            let estaciones = list_all::<Estacion>(session).await?;
            let estacion = resolve(&estaciones, &id)?;
            let bodegas = list_all::<Bodega>(session).await?;
            let propias = bodegas_de(&bodegas, &estacion.id);

            if session.json {
                return session.print_json(&serde_json::json!({
                    "estacion": estacion,
                    "bodegas": propias,
                }));
            }

            session.heading(&estacion.nombre);
            println!("  ID:          {}", estacion.id);
            println!("  Tipo:        {}", estacion.tipo.label());
            println!("  Estado:      {}", estacion.estado.code());
            println!("  Ubicación:   {}", or_dash(&estacion.ubicacion));
            println!("  Descripción: {}", or_dash(&estacion.descripcion));
            println!();
            if propias.is_empty() {
                println!("  No hay bodegas en esta estación");
            } else {
                println!("  Bodegas ({}):", propias.len());
                for b in propias {
                    println!("    {:<24} {} racks  {}", b.nombre, b.racks.len(), session.dim(&b.id));
                }
            }
        }

        "create" | "add" => {
            let mut form = EstacionForm::default();
            fill(&mut form, &args)?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "update" | "edit" => {
            let id = id.ok_or_else(missing_id::<Estacion>)?;
            let estaciones = list_all::<Estacion>(session).await?;
            let mut form = EstacionForm::edit(resolve(&estaciones, &id)?);
            fill(&mut form, &args)?;
            let saved = save(session, &mut form).await?;
            if session.json {
                session.print_json(&saved)?;
            }
        }

        "delete" | "rm" => {
            let id = id.ok_or_else(missing_id::<Estacion>)?;
            let estaciones = list_all::<Estacion>(session).await?;
            let target = resolve(&estaciones, &id)?.id.clone();
            delete_with_confirmation::<Estacion>(session, &target, args.yes).await?;
        }

        other => return Err(unknown_action(other)),
    }

    Ok(())
}

/// Copy the given flags over the form
fn fill(form: &mut EstacionForm, args: &EstacionArgs) -> Result<()> {
    if let Some(nombre) = &args.nombre {
        form.nombre.clone_from(nombre);
    }
    if let Some(ubicacion) = &args.ubicacion {
        form.ubicacion.clone_from(ubicacion);
    }
    if let Some(descripcion) = &args.descripcion {
        form.descripcion.clone_from(descripcion);
    }
    if let Some(tipo) = &args.tipo {
        form.tipo = TipoEstacion::parse(tipo).ok_or_else(|| {
            anyhow::anyhow!("Tipo de estación desconocido: {}. Válidos: central, subestacion", tipo)
        })?;
    }
    if let Some(estado) = &args.estado {
        form.estado = EstadoEstacion::parse(estado).ok_or_else(|| {
            anyhow::anyhow!("Estado de estación desconocido: {}. Válidos: activa, inactiva", estado)
        })?;
    }
    Ok(())
}
