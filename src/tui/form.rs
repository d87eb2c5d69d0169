// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Form modal: field layout and key editing for each entity form

use super::cycle_option;
use crate::forms::{BodegaForm, EntityForm, EstacionForm, FormMode, ProductoForm, RackForm};
use crate::inventory::Snapshot;
use crate::types::{EntityKind, EstadoEstacion, TipoEstacion, PRODUCT_CATEGORIES, RACK_CATEGORIES};

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Digits only
    Numeric,
    /// Left/Right cycles through options
    Select,
    /// Left/Right moves a cursor, Space ticks
    Tags,
}

/// One line of the rendered form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Field label
    pub label: &'static str,
    /// Current value as text
    pub value: String,
    /// Edit behaviour
    pub kind: FieldKind,
}

impl FieldView {
    fn new(label: &'static str, value: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label,
            value: value.into(),
            kind,
        }
    }
}

/// An open form, one variant per entity kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Product form
    Producto(ProductoForm),
    /// Rack form with the tag cursor position
    Rack(RackForm, usize),
    /// Bodega form
    Bodega(BodegaForm),
    /// Station form
    Estacion(EstacionForm),
}

const UNSET: &str = "(seleccionar)";

impl FormState {
    /// Blank create form for `kind`
    #[must_use]
    pub fn create(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Producto => Self::Producto(ProductoForm::default()),
            EntityKind::Rack => Self::Rack(RackForm::default(), 0),
            EntityKind::Bodega => Self::Bodega(BodegaForm::default()),
            EntityKind::Estacion => Self::Estacion(EstacionForm::default()),
        }
    }

    /// Edit form seeded from the loaded collections
    #[must_use]
    pub fn edit(kind: EntityKind, id: &str, snapshot: &Snapshot) -> Option<Self> {
        match kind {
            EntityKind::Producto => snapshot.producto(id).map(|p| Self::Producto(ProductoForm::edit(p))),
            EntityKind::Rack => snapshot.rack(id).map(|r| Self::Rack(RackForm::edit(r), 0)),
            EntityKind::Bodega => snapshot.bodega(id).map(|b| Self::Bodega(BodegaForm::edit(b))),
            EntityKind::Estacion => snapshot
                .estacion(id)
                .map(|e| Self::Estacion(EstacionForm::edit(e))),
        }
    }

    /// Entity kind this form writes
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Producto(_) => EntityKind::Producto,
            Self::Rack(..) => EntityKind::Rack,
            Self::Bodega(_) => EntityKind::Bodega,
            Self::Estacion(_) => EntityKind::Estacion,
        }
    }

    fn mode(&self) -> &FormMode {
        match self {
            Self::Producto(f) => f.mode(),
            Self::Rack(f, _) => f.mode(),
            Self::Bodega(f) => f.mode(),
            Self::Estacion(f) => f.mode(),
        }
    }

    /// Modal title
    #[must_use]
    pub fn title(&self) -> String {
        let kind = self.kind();
        match self.mode() {
            FormMode::Create if kind.is_feminine() => format!("Nueva {}", kind.title().to_lowercase()),
            FormMode::Create => format!("Nuevo {}", kind.title().to_lowercase()),
            FormMode::Edit(_) => format!("Editar {}", kind.title().to_lowercase()),
        }
    }

    /// Fields in display order
    #[must_use]
    pub fn fields(&self, snapshot: &Snapshot) -> Vec<FieldView> {
        use FieldKind::{Numeric, Select, Tags, Text};

        match self {
            Self::Producto(f) => vec![
                FieldView::new("Nombre", f.nombre.clone(), Text),
                FieldView::new("Descripción", f.descripcion.clone(), Text),
                FieldView::new("Cantidad", f.cantidad.text(), Numeric),
                FieldView::new("Precio", f.precio.text(), Numeric),
                FieldView::new("Categoría", or_unset(&f.categoria), Select),
                FieldView::new(
                    "Estación",
                    snapshot.estacion(&f.estacion).map_or(UNSET, |e| e.nombre.as_str()),
                    Select,
                ),
                FieldView::new(
                    "Bodega",
                    snapshot.bodega(&f.bodega).map_or(UNSET, |b| b.nombre.as_str()),
                    Select,
                ),
                FieldView::new(
                    "Rack",
                    snapshot.rack(&f.rack).map_or(UNSET, |r| r.nombre.as_str()),
                    Select,
                ),
            ],
            Self::Rack(f, cursor) => vec![
                FieldView::new("Nombre", f.nombre.clone(), Text),
                FieldView::new("Descripción", f.descripcion.clone(), Text),
                FieldView::new("Ubicación", f.ubicacion.clone(), Text),
                FieldView::new("Categorías", tag_line(&f.categorias, *cursor), Tags),
                FieldView::new(
                    "Bodega",
                    snapshot.bodega(&f.bodega).map_or(UNSET, |b| b.nombre.as_str()),
                    Select,
                ),
            ],
            Self::Bodega(f) => vec![
                FieldView::new("Nombre", f.nombre.clone(), Text),
                FieldView::new("Descripción", f.descripcion.clone(), Text),
                FieldView::new(
                    "Estación",
                    snapshot.estacion(&f.estacion).map_or(UNSET, |e| e.nombre.as_str()),
                    Select,
                ),
            ],
            Self::Estacion(f) => vec![
                FieldView::new("Nombre", f.nombre.clone(), Text),
                FieldView::new("Ubicación", f.ubicacion.clone(), Text),
                FieldView::new("Descripción", f.descripcion.clone(), Text),
                FieldView::new("Tipo", f.tipo.label(), Select),
                FieldView::new("Estado", f.estado.code(), Select),
            ],
        }
    }

    /// Type a character into a text or numeric field
    pub fn type_char(&mut self, field: usize, c: char) {
        match self {
            Self::Producto(f) => match field {
                0 => f.nombre.push(c),
                1 => f.descripcion.push(c),
                2 => f.cantidad.push_char(c),
                3 => f.precio.push_char(c),
                _ => {}
            },
            Self::Rack(f, _) => match field {
                0 => f.nombre.push(c),
                1 => f.descripcion.push(c),
                2 => f.ubicacion.push(c),
                _ => {}
            },
            Self::Bodega(f) => match field {
                0 => f.nombre.push(c),
                1 => f.descripcion.push(c),
                _ => {}
            },
            Self::Estacion(f) => match field {
                0 => f.nombre.push(c),
                1 => f.ubicacion.push(c),
                2 => f.descripcion.push(c),
                _ => {}
            },
        }
    }

    /// Delete the last character of a text or numeric field
    pub fn backspace(&mut self, field: usize) {
        match self {
            Self::Producto(f) => match field {
                0 => {
                    f.nombre.pop();
                }
                1 => {
                    f.descripcion.pop();
                }
                2 => f.cantidad.backspace(),
                3 => f.precio.backspace(),
                _ => {}
            },
            Self::Rack(f, _) => {
                let text = match field {
                    0 => &mut f.nombre,
                    1 => &mut f.descripcion,
                    2 => &mut f.ubicacion,
                    _ => return,
                };
                text.pop();
            }
            Self::Bodega(f) => {
                let text = match field {
                    0 => &mut f.nombre,
                    1 => &mut f.descripcion,
                    _ => return,
                };
                text.pop();
            }
            Self::Estacion(f) => {
                let text = match field {
                    0 => &mut f.nombre,
                    1 => &mut f.ubicacion,
                    2 => &mut f.descripcion,
                    _ => return,
                };
                text.pop();
            }
        }
    }

    /// Step a select field, or move the tag cursor
    ///
    /// Station, bodega and rack selects only offer children of the current
    /// parent; changing a parent clears its children.
    pub fn cycle(&mut self, field: usize, snapshot: &Snapshot, step: isize) {
        match self {
            Self::Producto(f) => match field {
                4 => {
                    let options: Vec<&str> = std::iter::once("").chain(PRODUCT_CATEGORIES).collect();
                    f.categoria = cycle_option(&options, &f.categoria, step).to_string();
                }
                5 => {
                    let options = ids(snapshot.estaciones.iter().map(|e| e.id.as_str()));
                    let next = cycle_option(&options, &f.estacion, step).to_string();
                    f.select_estacion(&next);
                }
                6 => {
                    let options = ids(f.bodega_options(&snapshot.bodegas).into_iter().map(|b| b.id.as_str()));
                    let next = cycle_option(&options, &f.bodega, step).to_string();
                    f.select_bodega(&next);
                }
                7 => {
                    let options = ids(f.rack_options(&snapshot.racks).into_iter().map(|r| r.id.as_str()));
                    let next = cycle_option(&options, &f.rack, step).to_string();
                    f.select_rack(&next);
                }
                _ => {}
            },
            Self::Rack(f, cursor) => match field {
                3 => {
                    let len = RACK_CATEGORIES.len();
                    *cursor = step_index(*cursor, len, step);
                }
                4 => {
                    let options = ids(snapshot.bodegas.iter().map(|b| b.id.as_str()));
                    f.bodega = cycle_option(&options, &f.bodega, step).to_string();
                }
                _ => {}
            },
            Self::Bodega(f) => {
                if field == 2 {
                    let options = ids(snapshot.estaciones.iter().map(|e| e.id.as_str()));
                    f.estacion = cycle_option(&options, &f.estacion, step).to_string();
                }
            }
            Self::Estacion(f) => match field {
                3 => {
                    f.tipo = match f.tipo {
                        TipoEstacion::Central => TipoEstacion::Subestacion,
                        TipoEstacion::Subestacion => TipoEstacion::Central,
                    };
                }
                4 => {
                    f.estado = match f.estado {
                        EstadoEstacion::Activa => EstadoEstacion::Inactiva,
                        EstadoEstacion::Inactiva => EstadoEstacion::Activa,
                    };
                }
                _ => {}
            },
        }
    }

    /// Tick or untick the rack tag under the cursor
    pub fn toggle(&mut self, field: usize) {
        if let Self::Rack(f, cursor) = self {
            if field == 3 {
                if let Some(tag) = RACK_CATEGORIES.get(*cursor) {
                    f.toggle_categoria(tag);
                }
            }
        }
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

/// Option list with the empty choice first
fn ids<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    std::iter::once("").chain(items).collect()
}

fn step_index(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let next = (current as isize + step).rem_euclid(len as isize) as usize;
    next
}

/// `[x] Documentos  >[ ] Otros ...`
fn tag_line(selected: &[String], cursor: usize) -> String {
    RACK_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let mark = if selected.iter().any(|s| s == tag) { "x" } else { " " };
            let pointer = if i == cursor { ">" } else { "" };
            format!("{pointer}[{mark}] {tag}")
        })
        .collect::<Vec<_>>()
        .join("  ")
}
