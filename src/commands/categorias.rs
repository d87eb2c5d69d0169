// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Category vocabularies for racks and products

use super::Session;
use crate::types::{PRODUCT_CATEGORIES, RACK_CATEGORIES};
use anyhow::Result;

/// Print the category vocabularies; `kind` is productos, racks or both
pub fn run(session: &Session, kind: Option<&str>) -> Result<()> {
    let (productos, racks) = match kind {
        None => (true, true),
        Some("productos" | "producto") => (true, false),
        Some("racks" | "rack") => (false, true),
        Some(other) => anyhow::bail!("Vocabulario desconocido: {}. Válidos: productos, racks", other),
    };

    if session.json {
        let mut out = serde_json::Map::new();
        if productos {
            out.insert("productos".into(), PRODUCT_CATEGORIES.to_vec().into());
        }
        if racks {
            out.insert("racks".into(), RACK_CATEGORIES.to_vec().into());
        }
        return session.print_json(&out);
    }

    if productos {
        session.heading("Categorías de productos");
        for c in PRODUCT_CATEGORIES {
            println!("  {c}");
        }
    }
    if productos && racks {
        println!();
    }
    if racks {
        session.heading("Categorías de racks");
        for c in RACK_CATEGORIES {
            println!("  {c}");
        }
    }
    Ok(())
}
