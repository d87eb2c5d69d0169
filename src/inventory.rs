// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Loaded inventory collections and the stale-response guard

use crate::api::{ApiError, EntityApi, InventoryApi};
use crate::types::{Bodega, Estacion, Producto, Rack};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, error};

/// Generic message shown when a batch load fails
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar los datos";

/// A batch load failed; the whole batch is discarded
#[derive(Debug, Error)]
#[error("Error al cargar los datos")]
pub struct LoadError {
    /// The first call that failed
    #[source]
    pub cause: ApiError,
}

/// In-memory copy of the four collections, as last fetched
///
/// Not authoritative: it is replaced wholesale after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All stations
    #[serde(default)]
    pub estaciones: Vec<Estacion>,
    /// All bodegas
    #[serde(default)]
    pub bodegas: Vec<Bodega>,
    /// All racks
    #[serde(default)]
    pub racks: Vec<Rack>,
    /// All products
    #[serde(default)]
    pub productos: Vec<Producto>,
}

impl Snapshot {
    /// Fetch all four collections concurrently
    ///
    /// Any single failure aborts the batch; there is no partial result.
    pub async fn load<A: InventoryApi + ?Sized>(api: &A) -> Result<Self, LoadError> {
        let result = tokio::try_join!(
            EntityApi::<Estacion>::list(api),
            EntityApi::<Bodega>::list(api),
            EntityApi::<Rack>::list(api),
            EntityApi::<Producto>::list(api),
        );

        match result {
            Ok((estaciones, bodegas, racks, productos)) => {
                debug!(
                    estaciones = estaciones.len(),
                    bodegas = bodegas.len(),
                    racks = racks.len(),
                    productos = productos.len(),
                    "Inventario cargado"
                );
                Ok(Self {
                    estaciones,
                    bodegas,
                    racks,
                    productos,
                })
            }
            Err(cause) => {
                error!("Error al cargar los datos: {}", cause);
                Err(LoadError { cause })
            }
        }
    }

    /// Get a station by id
    #[must_use]
    pub fn estacion(&self, id: &str) -> Option<&Estacion> {
        self.estaciones.iter().find(|e| e.id == id)
    }

    /// Get a bodega by id
    #[must_use]
    pub fn bodega(&self, id: &str) -> Option<&Bodega> {
        self.bodegas.iter().find(|b| b.id == id)
    }

    /// Get a rack by id
    #[must_use]
    pub fn rack(&self, id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == id)
    }

    /// Get a product by id
    #[must_use]
    pub fn producto(&self, id: &str) -> Option<&Producto> {
        self.productos.iter().find(|p| p.id == id)
    }

    /// Check if nothing was loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estaciones.is_empty()
            && self.bodegas.is_empty()
            && self.racks.is_empty()
            && self.productos.is_empty()
    }
}

/// Identifies one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Generation counter that lets late responses be recognised and dropped
///
/// Each fetch takes a ticket with [`FetchGeneration::begin`]. Leaving a view
/// calls [`FetchGeneration::invalidate`], so anything still in flight comes
/// back with an outdated ticket.
#[derive(Debug, Default)]
pub struct FetchGeneration {
    current: AtomicU64,
}

impl FetchGeneration {
    /// Create a counter at generation zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch; supersedes every earlier ticket
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Ticket of the latest fetch, without starting a new one
    ///
    /// Work that does not own the generation uses this to notice that a
    /// fetch began after it was dispatched.
    #[must_use]
    pub fn current(&self) -> FetchTicket {
        FetchTicket(self.current.load(Ordering::SeqCst))
    }

    /// Discard everything in flight without starting a new fetch
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether a response for `ticket` may still be applied
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }

    /// Return the payload only if its ticket is still current
    pub fn accept<T>(&self, ticket: FetchTicket, payload: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(payload)
        } else {
            debug!(ticket = ticket.0, "Descartando respuesta obsoleta");
            None
        }
    }
}
