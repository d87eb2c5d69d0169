// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Entity forms
//!
//! Each form holds the editable fields of one entity kind. In edit mode it
//! is seeded from the stored record; after a successful create it resets to
//! blank defaults, after an update it keeps its contents.

use crate::api::{ApiError, Entity, EntityApi};
use crate::filter::{bodegas_de, racks_de};
use crate::notice::Notice;
use crate::types::{
    Bodega, BodegaInput, Estacion, EstacionInput, EstadoEstacion, Producto, ProductoInput, Rack,
    RackInput, TipoEstacion, PRODUCT_CATEGORIES,
};
use thiserror::Error;
use tracing::{error, info, warn};

/// Client-side validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is blank
    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),
    /// A numeric field does not fit its type
    #[error("El campo {0} está fuera de rango")]
    OutOfRange(&'static str),
}

// =============================================================================
// Numeric input
// =============================================================================

/// Raw text of a digits-only field
///
/// Non-digit keystrokes are dropped rather than rejected, so `"12a3"`
/// becomes `"123"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericBuffer {
    text: String,
}

impl NumericBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with a value
    #[must_use]
    pub fn from_value(value: u64) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    /// Type one character; anything but an ASCII digit is ignored
    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.text.push(c);
        }
    }

    /// Delete the last character
    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Replace the contents, keeping only the digits
    pub fn set_text(&mut self, raw: &str) {
        self.text = raw.chars().filter(char::is_ascii_digit).collect();
    }

    /// Text as displayed
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed value; blank counts as zero
    pub fn value(&self, field: &'static str) -> Result<u64, FormError> {
        if self.text.is_empty() {
            return Ok(0);
        }
        self.text.parse().map_err(|_| FormError::OutOfRange(field))
    }
}

// =============================================================================
// Form plumbing
// =============================================================================

/// Whether the form creates a record or edits an existing one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    /// New record
    #[default]
    Create,
    /// Existing record with this id
    Edit(String),
}

/// Behaviour shared by every entity form
pub trait EntityForm: Default {
    /// Record kind the form writes
    type Entity: Entity;

    /// Create or edit
    fn mode(&self) -> &FormMode;

    /// Switch to editing `entity`, copying every field
    fn seed(&mut self, entity: &Self::Entity);

    /// Validate and build the request body
    fn submit(&self) -> Result<<Self::Entity as Entity>::Input, FormError>;

    /// Form pre-filled from an existing record
    fn edit(entity: &Self::Entity) -> Self {
        let mut form = Self::default();
        form.seed(entity);
        form
    }

    /// Reset after a successful save; only the create flow clears itself
    fn after_submit(&mut self) {
        if *self.mode() == FormMode::Create {
            *self = Self::default();
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Fetch a record and open an edit form on it
pub async fn open_for_edit<F, A>(api: &A, id: &str) -> Result<F, ApiError>
where
    F: EntityForm,
    A: EntityApi<F::Entity> + ?Sized,
{
    let entity = EntityApi::<F::Entity>::get(api, id).await?;
    Ok(F::edit(&entity))
}

/// Result of submitting a form
#[derive(Debug)]
pub struct SubmitOutcome<E> {
    /// Notice to show
    pub notice: Notice,
    /// Stored record, when the save went through
    pub saved: Option<E>,
}

/// Validate, then create or update through the client
///
/// Failures become a generic notice; the detail is only logged.
pub async fn submit_form<F, A>(api: &A, form: &mut F) -> SubmitOutcome<F::Entity>
where
    F: EntityForm,
    A: EntityApi<F::Entity> + ?Sized,
{
    let kind = <F::Entity as Entity>::KIND;

    let input = match form.submit() {
        Ok(input) => input,
        Err(e) => {
            warn!(kind = %kind, error = %e, "Formulario inválido");
            return SubmitOutcome {
                notice: Notice::error(e.to_string()),
                saved: None,
            };
        }
    };

    let mode = form.mode().clone();
    let result = match &mode {
        FormMode::Create => EntityApi::<F::Entity>::create(api, &input).await,
        FormMode::Edit(id) => EntityApi::<F::Entity>::update(api, id, &input).await,
    };

    match result {
        Ok(saved) => {
            info!(kind = %kind, id = %saved.id(), "Registro guardado");
            form.after_submit();
            SubmitOutcome {
                notice: Notice::saved(kind, mode == FormMode::Create),
                saved: Some(saved),
            }
        }
        Err(e) => {
            error!(kind = %kind, error = %e, "Error al guardar");
            SubmitOutcome {
                notice: Notice::save_failed(kind),
                saved: None,
            }
        }
    }
}

// =============================================================================
// Producto
// =============================================================================

/// Product form with cascading station → bodega → rack selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductoForm {
    /// Create or edit
    pub mode: FormMode,
    /// Name
    pub nombre: String,
    /// Description
    pub descripcion: String,
    /// Quantity as typed
    pub cantidad: NumericBuffer,
    /// Price as typed, whole pesos
    pub precio: NumericBuffer,
    /// Category
    pub categoria: String,
    /// Selected station id
    pub estacion: String,
    /// Selected bodega id
    pub bodega: String,
    /// Selected rack id
    pub rack: String,
}

impl ProductoForm {
    /// Pick a station; clears bodega and rack
    pub fn select_estacion(&mut self, id: &str) {
        self.estacion = id.to_string();
        self.bodega.clear();
        self.rack.clear();
    }

    /// Pick a bodega; clears rack
    pub fn select_bodega(&mut self, id: &str) {
        self.bodega = id.to_string();
        self.rack.clear();
    }

    /// Pick a rack
    pub fn select_rack(&mut self, id: &str) {
        self.rack = id.to_string();
    }

    /// Bodegas selectable under the chosen station
    #[must_use]
    pub fn bodega_options<'a>(&self, bodegas: &'a [Bodega]) -> Vec<&'a Bodega> {
        bodegas_de(bodegas, &self.estacion)
    }

    /// Racks selectable under the chosen bodega
    #[must_use]
    pub fn rack_options<'a>(&self, racks: &'a [Rack]) -> Vec<&'a Rack> {
        racks_de(racks, &self.bodega)
    }
}

impl EntityForm for ProductoForm {
    type Entity = Producto;

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn seed(&mut self, producto: &Producto) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let precio = producto.precio.max(0.0).round() as u64;
        *self = Self {
            mode: FormMode::Edit(producto.id.clone()),
            nombre: producto.nombre.clone(),
            descripcion: producto.descripcion.clone(),
            cantidad: NumericBuffer::from_value(u64::from(producto.cantidad)),
            precio: NumericBuffer::from_value(precio),
            categoria: producto.categoria.clone(),
            estacion: producto.estacion.id.clone(),
            bodega: producto.bodega.id.clone(),
            rack: producto.rack.id.clone(),
        };
    }

    fn submit(&self) -> Result<ProductoInput, FormError> {
        let nombre = required(&self.nombre, "nombre")?;
        let categoria = required(&self.categoria, "categoría")?;
        let estacion = required(&self.estacion, "estación")?;
        let bodega = required(&self.bodega, "bodega")?;
        let rack = required(&self.rack, "rack")?;

        let cantidad = u32::try_from(self.cantidad.value("cantidad")?)
            .map_err(|_| FormError::OutOfRange("cantidad"))?;
        #[allow(clippy::cast_precision_loss)]
        let precio = self.precio.value("precio")? as f64;

        if !PRODUCT_CATEGORIES.contains(&categoria.as_str()) {
            warn!(categoria = %categoria, "Categoría fuera del vocabulario conocido");
        }

        Ok(ProductoInput {
            nombre,
            descripcion: self.descripcion.trim().to_string(),
            cantidad,
            precio,
            categoria,
            estacion,
            bodega,
            rack,
        })
    }
}

// =============================================================================
// Rack
// =============================================================================

/// Rack form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RackForm {
    /// Create or edit
    pub mode: FormMode,
    /// Name
    pub nombre: String,
    /// Description
    pub descripcion: String,
    /// Position inside the bodega
    pub ubicacion: String,
    /// Selected category tags, in selection order
    pub categorias: Vec<String>,
    /// Owning bodega id
    pub bodega: String,
}

impl RackForm {
    /// Tick or untick a category tag
    pub fn toggle_categoria(&mut self, categoria: &str) {
        if let Some(pos) = self.categorias.iter().position(|c| c == categoria) {
            self.categorias.remove(pos);
        } else {
            self.categorias.push(categoria.to_string());
        }
    }
}

impl EntityForm for RackForm {
    type Entity = Rack;

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn seed(&mut self, rack: &Rack) {
        *self = Self {
            mode: FormMode::Edit(rack.id.clone()),
            nombre: rack.nombre.clone(),
            descripcion: rack.descripcion.clone(),
            ubicacion: rack.ubicacion.clone(),
            categorias: rack.categorias.clone(),
            bodega: rack.bodega.clone(),
        };
    }

    fn submit(&self) -> Result<RackInput, FormError> {
        Ok(RackInput {
            nombre: required(&self.nombre, "nombre")?,
            descripcion: self.descripcion.trim().to_string(),
            ubicacion: required(&self.ubicacion, "ubicación")?,
            categorias: self.categorias.clone(),
            bodega: required(&self.bodega, "bodega")?,
        })
    }
}

// =============================================================================
// Bodega
// =============================================================================

/// Bodega form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodegaForm {
    /// Create or edit
    pub mode: FormMode,
    /// Name
    pub nombre: String,
    /// Description
    pub descripcion: String,
    /// Owning station id
    pub estacion: String,
}

impl EntityForm for BodegaForm {
    type Entity = Bodega;

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn seed(&mut self, bodega: &Bodega) {
        *self = Self {
            mode: FormMode::Edit(bodega.id.clone()),
            nombre: bodega.nombre.clone(),
            descripcion: bodega.descripcion.clone(),
            estacion: bodega.estacion.id.clone(),
        };
    }

    fn submit(&self) -> Result<BodegaInput, FormError> {
        Ok(BodegaInput {
            nombre: required(&self.nombre, "nombre")?,
            descripcion: self.descripcion.trim().to_string(),
            estacion: required(&self.estacion, "estación")?,
        })
    }
}

// =============================================================================
// Estación
// =============================================================================

/// Station form; new stations default to an active substation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstacionForm {
    /// Create or edit
    pub mode: FormMode,
    /// Name
    pub nombre: String,
    /// Location
    pub ubicacion: String,
    /// Description
    pub descripcion: String,
    /// Central or secondary
    pub tipo: TipoEstacion,
    /// Active or inactive
    pub estado: EstadoEstacion,
}

impl EntityForm for EstacionForm {
    type Entity = Estacion;

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn seed(&mut self, estacion: &Estacion) {
        *self = Self {
            mode: FormMode::Edit(estacion.id.clone()),
            nombre: estacion.nombre.clone(),
            ubicacion: estacion.ubicacion.clone(),
            descripcion: estacion.descripcion.clone(),
            tipo: estacion.tipo,
            estado: estacion.estado,
        };
    }

    fn submit(&self) -> Result<EstacionInput, FormError> {
        Ok(EstacionInput {
            nombre: required(&self.nombre, "nombre")?,
            ubicacion: required(&self.ubicacion, "ubicación")?,
            descripcion: self.descripcion.trim().to_string(),
            tipo: self.tipo,
            estado: self.estado,
        })
    }
}
