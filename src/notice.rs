// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Transient success/error messages

use crate::types::EntityKind;
use std::time::{Duration, Instant};

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Success or failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation went through
    Success,
    /// Operation failed
    Error,
}

/// A short message that dismisses itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or failure
    pub kind: NoticeKind,
    /// User-facing text
    pub text: String,
    /// When it was raised
    pub shown_at: Instant,
}

impl Notice {
    /// Raise a success notice now
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    /// Raise an error notice now
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    /// "Bodega eliminada correctamente"
    #[must_use]
    pub fn deleted(kind: EntityKind) -> Self {
        Self::success(format!("{} {} correctamente", kind.title(), kind.participle("eliminad")))
    }

    /// "Error al eliminar la bodega"
    #[must_use]
    pub fn delete_failed(kind: EntityKind) -> Self {
        Self::error(format!("Error al eliminar {}", kind.with_article()))
    }

    /// "Rack creado correctamente" / "Rack actualizado correctamente"
    #[must_use]
    pub fn saved(kind: EntityKind, created: bool) -> Self {
        let stem = if created { "cread" } else { "actualizad" };
        Self::success(format!("{} {} correctamente", kind.title(), kind.participle(stem)))
    }

    /// "Error al guardar el rack"
    #[must_use]
    pub fn save_failed(kind: EntityKind) -> Self {
        Self::error(format!("Error al guardar {}", kind.with_article()))
    }

    /// Whether the notice should be gone by `now`
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }

    /// Check if this is an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
