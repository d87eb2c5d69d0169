// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Delete confirmation flow
//!
//! `Idle → ConfirmPending(id) → Idle`. Cancelling has no side effect.
//! Confirming deletes, raises a notice and always re-fetches the collection,
//! whether or not the delete went through.

use crate::api::{Entity, EntityApi};
use crate::notice::Notice;
use std::marker::PhantomData;
use tracing::{error, info, warn};

/// Where the dialog is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfirmState {
    /// No dialog open
    #[default]
    Idle,
    /// Waiting for the user to confirm deleting this id
    ConfirmPending(String),
}

/// What a confirmed delete produced
#[derive(Debug)]
pub struct DeleteOutcome<E> {
    /// Notice to show for three seconds
    pub notice: Notice,
    /// Whether the service accepted the delete
    pub deleted: bool,
    /// Fresh collection, `None` if the refetch itself failed
    pub refreshed: Option<Vec<E>>,
}

/// Confirmation dialog for one entity kind
#[derive(Debug)]
pub struct DeleteConfirmation<E: Entity> {
    state: ConfirmState,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for DeleteConfirmation<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> DeleteConfirmation<E> {
    /// Create a closed dialog
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ConfirmState::Idle,
            _kind: PhantomData,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// Id awaiting confirmation, if any
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        match &self.state {
            ConfirmState::ConfirmPending(id) => Some(id),
            ConfirmState::Idle => None,
        }
    }

    /// Check if the dialog is closed
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == ConfirmState::Idle
    }

    /// Open the dialog for `id`; replaces any earlier target
    pub fn request(&mut self, id: impl Into<String>) {
        self.state = ConfirmState::ConfirmPending(id.into());
    }

    /// Close the dialog without deleting
    pub fn cancel(&mut self) {
        self.state = ConfirmState::Idle;
    }

    /// Delete the pending id, then re-fetch the collection
    ///
    /// Returns `None` when nothing was pending. The dialog is `Idle`
    /// afterwards in every case.
    pub async fn confirm<A>(&mut self, api: &A) -> Option<DeleteOutcome<E>>
    where
        A: EntityApi<E> + ?Sized,
    {
        let ConfirmState::ConfirmPending(id) = std::mem::take(&mut self.state) else {
            return None;
        };

        let kind = E::KIND;
        let (notice, deleted) = match EntityApi::<E>::delete(api, &id).await {
            Ok(()) => {
                info!(kind = %kind, id = %id, "Registro eliminado");
                (Notice::deleted(kind), true)
            }
            Err(e) => {
                error!(kind = %kind, id = %id, error = %e, "Error al eliminar");
                (Notice::delete_failed(kind), false)
            }
        };

        let refreshed = match EntityApi::<E>::list(api).await {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(kind = %kind, error = %e, "No se pudo recargar la lista");
                None
            }
        };

        Some(DeleteOutcome {
            notice,
            deleted,
            refreshed,
        })
    }
}
