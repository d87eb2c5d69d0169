// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Display formatting

/// Format a price in Chilean pesos: `$1.234.567`
///
/// CLP has no minor unit, so the amount is rounded to whole pesos.
/// Negative amounts keep their sign in front of the symbol.
#[must_use]
pub fn clp(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pesos = amount.abs().round() as u64;
    let digits = pesos.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if amount < 0.0 && pesos > 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Comma-separated list, or a placeholder when empty
#[must_use]
pub fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

/// `"-"` for empty text
#[must_use]
pub fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}
