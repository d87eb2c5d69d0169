// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod bodega;
pub mod categorias;
pub mod completions;
pub mod config;
pub mod estacion;
pub mod inventario;
pub mod producto;
pub mod productos;
pub mod rack;
pub mod view;

use crate::api::{ApiClient, Entity, EntityApi};
use crate::confirm::DeleteConfirmation;
use crate::forms::{submit_form, EntityForm};
use crate::notice::Notice;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, BufRead, Write};

/// What every command needs: the client and output preferences
#[derive(Debug, Clone)]
pub struct Session {
    /// Client for the inventory service
    pub client: ApiClient,
    /// Print JSON instead of text
    pub json: bool,
    /// Use ANSI colors
    pub color: bool,
}

impl Session {
    /// Build a session against `api_url`
    pub fn new(api_url: &str, json: bool, color: bool) -> Result<Self> {
        let client = ApiClient::new(api_url)
            .with_context(|| format!("URL de API no válida: {api_url}"))?;
        Ok(Self { client, json, color })
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("No se pudo serializar la salida")?;
        println!("{json}");
        Ok(())
    }

    /// Print a notice; errors go to stderr and become the command's error
    pub fn report(&self, notice: &Notice) -> Result<()> {
        if notice.is_error() {
            anyhow::bail!("{}", notice.text);
        }
        if self.color {
            println!("{}", notice.text.green());
        } else {
            println!("{}", notice.text);
        }
        Ok(())
    }

    /// Section heading
    pub fn heading(&self, text: &str) {
        if self.color {
            println!("{}", text.bold());
        } else {
            println!("{text}");
        }
    }

    /// De-emphasised text, such as ids
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Fetch a full collection
pub async fn list_all<E: Entity>(session: &Session) -> Result<Vec<E>> {
    EntityApi::<E>::list(&session.client)
        .await
        .with_context(|| format!("Error al cargar {}", E::KIND.with_article()))
}

/// Find a record by id, or by exact name when unambiguous
pub fn resolve<'a, E: Entity>(items: &'a [E], id_or_name: &str) -> Result<&'a E> {
    if let Some(found) = items.iter().find(|e| e.id() == id_or_name) {
        return Ok(found);
    }

    let matches: Vec<&E> = items.iter().filter(|e| e.nombre() == id_or_name).collect();
    match matches.len() {
        0 => anyhow::bail!(
            "{} no {}: {}",
            E::KIND.title(),
            E::KIND.participle("encontrad"),
            id_or_name
        ),
        1 => Ok(matches[0]),
        _ => {
            eprintln!("Hay {} registros con el nombre '{}':", matches.len(), id_or_name);
            for e in &matches {
                eprintln!("  {} ({})", e.nombre(), e.id());
            }
            anyhow::bail!("Nombre ambiguo, usa el id");
        }
    }
}

/// Error for an action that needs an id or name and got none
pub fn missing_id<E: Entity>() -> anyhow::Error {
    anyhow::anyhow!("{}: falta el id o nombre", E::KIND.title())
}

/// Error for an action word the command does not know
pub fn unknown_action(action: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Acción desconocida: {}. Válidas: list, show, create, update, delete",
        action
    )
}

/// Submit a form and print the resulting notice
pub async fn save<F: EntityForm>(session: &Session, form: &mut F) -> Result<F::Entity> {
    let outcome = submit_form(&session.client, form).await;
    session.report(&outcome.notice)?;
    outcome
        .saved
        .ok_or_else(|| anyhow::anyhow!("{}", outcome.notice.text))
}

/// Ask, then delete and re-fetch
///
/// `assume_yes` skips the prompt. Declining leaves everything untouched.
pub async fn delete_with_confirmation<E: Entity>(
    session: &Session,
    id: &str,
    assume_yes: bool,
) -> Result<()> {
    let mut dialog = DeleteConfirmation::<E>::new();
    dialog.request(id);

    let question = format!(
        "¿Estás seguro de que deseas eliminar {} {}?",
        E::KIND.with_article(),
        id
    );
    if !assume_yes && !prompt_yes_no(&question)? {
        dialog.cancel();
        println!("Cancelado");
        return Ok(());
    }

    let Some(outcome) = dialog.confirm(&session.client).await else {
        return Ok(());
    };

    if let Some(remaining) = &outcome.refreshed {
        tracing::info!("{} registros restantes: {}", E::KIND, remaining.len());
    }
    session.report(&outcome.notice)
}

/// Read a yes/no answer from stdin; anything but s/si/y/yes is no
pub fn prompt_yes_no(question: &str) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{question} [s/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    ))
}

/// Split a comma-separated flag value into trimmed, non-empty items
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bodega, Estacion, Rack, RACK_CATEGORIES};

    fn rack(id: &str, nombre: &str) -> Rack {
        Rack {
            id: id.into(),
            nombre: nombre.into(),
            descripcion: String::new(),
            ubicacion: String::new(),
            categorias: vec![],
            bodega: "B1".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let racks = vec![rack("R1", "Norte"), rack("R2", "Sur"), rack("R3", "Sur")];
        assert_eq!(resolve(&racks, "R2").unwrap().id, "R2");
        assert_eq!(resolve(&racks, "Norte").unwrap().id, "R1");
        assert!(resolve(&racks, "Sur").is_err());
        assert!(resolve(&racks, "Este").is_err());
    }

    #[test]
    fn test_user_errors_are_spanish() {
        let racks = vec![rack("R1", "Norte"), rack("R2", "Sur"), rack("R3", "Sur")];
        let missing = resolve(&racks, "Este").unwrap_err().to_string();
        assert_eq!(missing, "Rack no encontrado: Este");
        let ambiguous = resolve(&racks, "Sur").unwrap_err().to_string();
        assert_eq!(ambiguous, "Nombre ambiguo, usa el id");

        let estaciones: Vec<Estacion> = vec![];
        let missing = resolve(&estaciones, "E9").unwrap_err().to_string();
        assert_eq!(missing, "Estación no encontrada: E9");

        assert_eq!(missing_id::<Bodega>().to_string(), "Bodega: falta el id o nombre");
        assert!(unknown_action("explode").to_string().starts_with("Acción desconocida: explode."));
    }

    #[test]
    fn test_split_list() {
        let joined = format!("{} , ,{}", RACK_CATEGORIES[0], RACK_CATEGORIES[6]);
        assert_eq!(split_list(&joined), vec![RACK_CATEGORIES[0].to_string(), RACK_CATEGORIES[6].to_string()]);
    }
}
