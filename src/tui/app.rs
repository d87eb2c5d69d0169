// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! TUI application state and key handling
//!
//! Key handling only mutates state and returns [`Effect`]s; the event loop
//! turns effects into tasks on the runtime.

use super::form::{FieldKind, FormState};
use super::{cycle_option, Message};
use crate::confirm::DeleteConfirmation;
use crate::filter::{FilterAction, ProductFilter};
use crate::hierarchy::{ExpandedState, Hierarchy, Level, TreeRow};
use crate::inventory::{FetchGeneration, FetchTicket, Snapshot, LOAD_ERROR_MESSAGE};
use crate::notice::Notice;
use crate::types::{Bodega, EntityKind, Estacion, Producto, Rack, PRODUCT_CATEGORIES};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Station → bodega → rack → product tree
    Inventario,
    /// Filtered product table
    Productos,
    /// Rack list
    Racks,
    /// Bodega list
    Bodegas,
    /// Station list
    Estaciones,
}

impl View {
    /// All views in tab order
    pub const ALL: [View; 5] = [
        View::Inventario,
        View::Productos,
        View::Racks,
        View::Bodegas,
        View::Estaciones,
    ];

    /// Tab label
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Inventario => "Inventario",
            Self::Productos => "Productos",
            Self::Racks => "Racks",
            Self::Bodegas => "Bodegas",
            Self::Estaciones => "Estaciones",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

/// A delete waiting for y/n, typed by entity kind
#[derive(Debug)]
pub enum DeleteDialog {
    /// Station delete
    Estacion(DeleteConfirmation<Estacion>),
    /// Bodega delete
    Bodega(DeleteConfirmation<Bodega>),
    /// Rack delete
    Rack(DeleteConfirmation<Rack>),
    /// Product delete
    Producto(DeleteConfirmation<Producto>),
}

impl DeleteDialog {
    fn open(kind: EntityKind, id: &str) -> Self {
        match kind {
            EntityKind::Estacion => {
                let mut d = DeleteConfirmation::new();
                d.request(id);
                Self::Estacion(d)
            }
            EntityKind::Bodega => {
                let mut d = DeleteConfirmation::new();
                d.request(id);
                Self::Bodega(d)
            }
            EntityKind::Rack => {
                let mut d = DeleteConfirmation::new();
                d.request(id);
                Self::Rack(d)
            }
            EntityKind::Producto => {
                let mut d = DeleteConfirmation::new();
                d.request(id);
                Self::Producto(d)
            }
        }
    }

    /// Kind being deleted
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Estacion(_) => EntityKind::Estacion,
            Self::Bodega(_) => EntityKind::Bodega,
            Self::Rack(_) => EntityKind::Rack,
            Self::Producto(_) => EntityKind::Producto,
        }
    }

    /// Id awaiting confirmation
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        match self {
            Self::Estacion(d) => d.pending(),
            Self::Bodega(d) => d.pending(),
            Self::Rack(d) => d.pending(),
            Self::Producto(d) => d.pending(),
        }
    }
}

/// Work the event loop must start
#[derive(Debug)]
pub enum Effect {
    /// Fetch all four collections
    Reload,
    /// Run a confirmed delete, stamped with the batch load it was issued under
    Delete(FetchTicket, DeleteDialog),
    /// Save a form
    Submit(FormState),
    /// Fetch a product and open it for editing
    OpenProducto(FetchTicket, String),
}

/// Everything the TUI shows
#[derive(Debug)]
pub struct App {
    /// Active screen
    pub view: View,
    /// Dark theme
    pub dark_mode: bool,
    /// Last loaded collections
    pub snapshot: Snapshot,
    /// A batch load is in flight
    pub loading: bool,
    /// Stale-response guard for batch loads
    pub generation: FetchGeneration,
    /// Stale-response guard for product fetches opening the edit form
    pub form_generation: FetchGeneration,
    /// Open tree nodes
    pub expanded: ExpandedState,
    /// Station restricting the tree roots, empty for all
    pub estacion_selector: String,
    /// Product filter
    pub filter: ProductFilter,
    /// Typing into the search box
    pub searching: bool,
    /// Selected row in the active view
    pub selected: usize,
    /// Open delete dialog
    pub dialog: Option<DeleteDialog>,
    /// Open form and its focused field
    pub form: Option<(FormState, usize)>,
    /// A save is in flight
    pub saving: bool,
    /// Transient message
    pub notice: Option<Notice>,
    /// Toggle help overlay
    pub show_help: bool,
    /// Leave the event loop
    pub should_quit: bool,
}

impl App {
    /// Fresh state; the caller issues the first [`Effect::Reload`]
    #[must_use]
    pub fn new(dark_mode: bool, filter: Option<ProductFilter>) -> Self {
        let view = if filter.is_some() {
            View::Productos
        } else {
            View::Inventario
        };
        Self {
            view,
            dark_mode,
            snapshot: Snapshot::default(),
            loading: false,
            generation: FetchGeneration::new(),
            form_generation: FetchGeneration::new(),
            expanded: ExpandedState::new(),
            estacion_selector: String::new(),
            filter: filter.unwrap_or_default(),
            searching: false,
            selected: 0,
            dialog: None,
            form: None,
            saving: false,
            notice: None,
            show_help: false,
            should_quit: false,
        }
    }

    // =========================================================================
    // Derived rows
    // =========================================================================

    /// Visible tree rows
    #[must_use]
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        Hierarchy::new(&self.snapshot).rows(&self.expanded, &self.estacion_selector)
    }

    /// Products passing the filter
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Producto> {
        self.filter.filter_products(&self.snapshot.productos)
    }

    fn row_count(&self) -> usize {
        match self.view {
            View::Inventario => self.tree_rows().len(),
            View::Productos => self.filtered_products().len(),
            View::Racks => self.snapshot.racks.len(),
            View::Bodegas => self.snapshot.bodegas.len(),
            View::Estaciones => self.snapshot.estaciones.len(),
        }
    }

    /// Kind and id under the cursor
    #[must_use]
    pub fn selection(&self) -> Option<(EntityKind, String)> {
        let i = self.selected;
        match self.view {
            View::Inventario => self.tree_rows().get(i).map(|row| {
                let kind = match row.level {
                    Level::Estaciones => EntityKind::Estacion,
                    Level::Bodegas => EntityKind::Bodega,
                    Level::Racks => EntityKind::Rack,
                    Level::Productos => EntityKind::Producto,
                };
                (kind, row.id.clone())
            }),
            View::Productos => self
                .filtered_products()
                .get(i)
                .map(|p| (EntityKind::Producto, p.id.clone())),
            View::Racks => self.snapshot.racks.get(i).map(|r| (EntityKind::Rack, r.id.clone())),
            View::Bodegas => self
                .snapshot
                .bodegas
                .get(i)
                .map(|b| (EntityKind::Bodega, b.id.clone())),
            View::Estaciones => self
                .snapshot
                .estaciones
                .get(i)
                .map(|e| (EntityKind::Estacion, e.id.clone())),
        }
    }

    fn kind_for_new(&self) -> EntityKind {
        match self.view {
            View::Inventario => self
                .selection()
                .map_or(EntityKind::Estacion, |(kind, _)| kind),
            View::Productos => EntityKind::Producto,
            View::Racks => EntityKind::Rack,
            View::Bodegas => EntityKind::Bodega,
            View::Estaciones => EntityKind::Estacion,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn switch_view(&mut self, view: View) {
        if view != self.view {
            self.view = view;
            self.selected = 0;
            self.searching = false;
            self.form_generation.invalidate();
        }
    }

    /// Drop the notice once it has been up long enough
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    // =========================================================================
    // Messages from background tasks
    // =========================================================================

    /// Apply a finished background task
    pub fn handle_message(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Loaded(ticket, result) => {
                let Some(result) = self.generation.accept(ticket, result) else {
                    return vec![];
                };
                self.loading = false;
                match result {
                    Ok(snapshot) => {
                        self.snapshot = snapshot;
                        self.clamp_selection();
                    }
                    Err(e) => {
                        tracing::error!("{}: {}", LOAD_ERROR_MESSAGE, e.cause);
                        self.notice = Some(Notice::error(LOAD_ERROR_MESSAGE));
                    }
                }
                vec![]
            }
            Message::Deleted(stamp, notice, refreshed) => {
                self.notice = Some(notice);
                if !self.generation.is_current(stamp) {
                    tracing::debug!("Descartando recarga de eliminación superada");
                    return vec![Effect::Reload];
                }
                if let Some(collection) = refreshed {
                    collection.apply(&mut self.snapshot);
                    self.clamp_selection();
                }
                if self.loading {
                    vec![Effect::Reload]
                } else {
                    vec![]
                }
            }
            Message::Saved(notice, ok) => {
                self.saving = false;
                self.notice = Some(notice);
                if ok {
                    self.form = None;
                    vec![Effect::Reload]
                } else {
                    vec![]
                }
            }
            Message::FormOpened(ticket, result) => {
                let Some(result) = self.form_generation.accept(ticket, result) else {
                    return vec![];
                };
                if self.form.is_some() {
                    return vec![];
                }
                match result {
                    Ok(form) => self.form = Some((form, 0)),
                    Err(notice) => self.notice = Some(notice),
                }
                vec![]
            }
        }
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return vec![];
        }

        if self.dialog.is_some() {
            return self.handle_dialog_key(key);
        }
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        if self.searching {
            self.handle_search_key(key);
            return vec![];
        }
        if self.show_help {
            self.show_help = false;
            return vec![];
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('t') => self.dark_mode = !self.dark_mode,
            KeyCode::Char('R') | KeyCode::F(5) => return vec![Effect::Reload],

            KeyCode::Tab => {
                let next = View::ALL[(self.view.index() + 1) % View::ALL.len()];
                self.switch_view(next);
            }
            KeyCode::BackTab => {
                let len = View::ALL.len();
                let prev = View::ALL[(self.view.index() + len - 1) % len];
                self.switch_view(prev);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = (c as usize) - ('1' as usize);
                self.switch_view(View::ALL[index]);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.row_count();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.row_count().saturating_sub(1);
            }

            KeyCode::Char('a') => {
                self.form_generation.invalidate();
                self.form = Some((FormState::create(self.kind_for_new()), 0));
            }
            KeyCode::Char('u') => return self.open_edit(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some((kind, id)) = self.selection() {
                    self.dialog = Some(DeleteDialog::open(kind, &id));
                }
            }

            _ => match self.view {
                View::Inventario => self.handle_tree_key(key),
                View::Productos => self.handle_filter_key(key),
                _ => {}
            },
        }

        vec![]
    }

    fn open_edit(&mut self) -> Vec<Effect> {
        let Some((kind, id)) = self.selection() else {
            return vec![];
        };
        if kind == EntityKind::Producto {
            return vec![Effect::OpenProducto(self.form_generation.begin(), id)];
        }
        self.form_generation.invalidate();
        match FormState::edit(kind, &id, &self.snapshot) {
            Some(form) => self.form = Some((form, 0)),
            None => self.notice = Some(Notice::error(LOAD_ERROR_MESSAGE)),
        }
        vec![]
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Left => {
                let rows = self.tree_rows();
                let Some(row) = rows.get(self.selected) else {
                    return;
                };
                let toggle = match key.code {
                    KeyCode::Right => !row.expanded,
                    KeyCode::Left => row.expanded,
                    _ => true,
                };
                if row.expandable && toggle {
                    self.expanded.toggle(row.level, &row.id);
                }
            }
            KeyCode::Char('E') => self.expanded.expand_all(&self.snapshot),
            KeyCode::Char('C') => {
                self.expanded.collapse_all();
                self.clamp_selection();
            }
            KeyCode::Char('s') => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(self.snapshot.estaciones.iter().map(|e| e.id.as_str()))
                    .collect();
                self.estacion_selector = cycle_option(&options, &self.estacion_selector, 1).to_string();
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { -1 } else { 1 };
        let action = match key.code {
            KeyCode::Char('e' | 'E') => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(self.snapshot.estaciones.iter().map(|e| e.id.as_str()))
                    .collect();
                FilterAction::SetEstacion(cycle_option(&options, &self.filter.estacion, step).to_string())
            }
            KeyCode::Char('b' | 'B') => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(
                        self.filter
                            .bodegas_filtradas(&self.snapshot.bodegas)
                            .into_iter()
                            .map(|b| b.id.as_str()),
                    )
                    .collect();
                FilterAction::SetBodega(cycle_option(&options, &self.filter.bodega, step).to_string())
            }
            KeyCode::Char('r') => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(
                        self.filter
                            .racks_filtrados(&self.snapshot.racks)
                            .into_iter()
                            .map(|r| r.id.as_str()),
                    )
                    .collect();
                FilterAction::SetRack(cycle_option(&options, &self.filter.rack, step).to_string())
            }
            KeyCode::Char('c') => {
                let options: Vec<&str> = std::iter::once("").chain(PRODUCT_CATEGORIES).collect();
                FilterAction::SetCategoria(cycle_option(&options, &self.filter.categoria, step).to_string())
            }
            KeyCode::Char('/') => {
                self.searching = true;
                return;
            }
            KeyCode::Char('x') => FilterAction::Clear,
            _ => return,
        };
        self.filter.apply(action);
        self.clamp_selection();
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut text = self.filter.nombre.clone();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.searching = false;
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        self.filter.apply(FilterAction::SetNombre(text));
        self.clamp_selection();
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('y' | 's' | 'Y' | 'S') | KeyCode::Enter => {
                match self.dialog.take() {
                    Some(dialog) => vec![Effect::Delete(self.generation.current(), dialog)],
                    None => vec![],
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.dialog = None;
                vec![]
            }
            _ => vec![],
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.saving {
            return vec![];
        }
        let Some((form, field)) = self.form.as_mut() else {
            return vec![];
        };
        let count = form.fields(&self.snapshot).len();
        let kind = form
            .fields(&self.snapshot)
            .get(*field)
            .map_or(FieldKind::Text, |f| f.kind);

        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.form_generation.invalidate();
            }
            KeyCode::Enter => {
                self.saving = true;
                return vec![Effect::Submit(form.clone())];
            }
            KeyCode::Down | KeyCode::Tab => *field = (*field + 1) % count.max(1),
            KeyCode::Up | KeyCode::BackTab => *field = (*field + count.max(1) - 1) % count.max(1),
            KeyCode::Left => form.cycle(*field, &self.snapshot, -1),
            KeyCode::Right => form.cycle(*field, &self.snapshot, 1),
            KeyCode::Char(' ') if kind == FieldKind::Tags => form.toggle(*field),
            KeyCode::Char(' ') if kind == FieldKind::Select => form.cycle(*field, &self.snapshot, 1),
            KeyCode::Backspace => form.backspace(*field),
            KeyCode::Char(c) if matches!(kind, FieldKind::Text | FieldKind::Numeric) => {
                form.type_char(*field, c);
            }
            _ => {}
        }
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::forms::{EntityForm, FormMode, ProductoForm};
    use crate::inventory::LoadError;
    use crate::tui::Collection;
    use crate::types::{EstacionRef, EstadoEstacion, NamedRef, TipoEstacion};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            estaciones: vec![Estacion {
                id: "E1".into(),
                nombre: "Central".into(),
                ubicacion: "Santiago".into(),
                descripcion: String::new(),
                tipo: TipoEstacion::Central,
                estado: EstadoEstacion::Activa,
                created_at: None,
                updated_at: None,
            }],
            bodegas: vec![Bodega {
                id: "B1".into(),
                nombre: "Bodega Norte".into(),
                descripcion: String::new(),
                estacion: EstacionRef { id: "E1".into(), ..Default::default() },
                racks: vec!["R1".into()],
                created_at: None,
                updated_at: None,
            }],
            racks: vec![Rack {
                id: "R1".into(),
                nombre: "Rack A".into(),
                descripcion: String::new(),
                ubicacion: "Pasillo 1".into(),
                categorias: vec![],
                bodega: "B1".into(),
                created_at: None,
                updated_at: None,
            }],
            productos: vec![Producto {
                id: "P1".into(),
                nombre: "Martillo".into(),
                descripcion: String::new(),
                cantidad: 5,
                precio: 9990.0,
                categoria: "Herramientas".into(),
                estacion: EstacionRef { id: "E1".into(), ..Default::default() },
                bodega: NamedRef { id: "B1".into(), nombre: "Bodega Norte".into() },
                rack: NamedRef { id: "R1".into(), nombre: "Rack A".into() },
                created_at: None,
                updated_at: None,
            }],
        }
    }

    fn loaded() -> App {
        let mut app = App::new(false, None);
        let ticket = app.generation.begin();
        app.loading = true;
        app.handle_message(Message::Loaded(ticket, Ok(snapshot())));
        app
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut app = App::new(false, None);
        let old = app.generation.begin();
        let new = app.generation.begin();

        app.handle_message(Message::Loaded(old, Ok(snapshot())));
        assert!(app.snapshot.is_empty());

        app.handle_message(Message::Loaded(new, Ok(Snapshot::default())));
        assert!(app.snapshot.is_empty());
        assert!(!app.loading);
    }

    #[test]
    fn test_failed_load_raises_generic_notice() {
        let mut app = App::new(false, None);
        let ticket = app.generation.begin();
        let err = LoadError {
            cause: ApiError::Status { status: 500, message: "boom".into() },
        };
        app.handle_message(Message::Loaded(ticket, Err(err)));
        let notice = app.notice.expect("notice");
        assert!(notice.is_error());
        assert_eq!(notice.text, LOAD_ERROR_MESSAGE);
    }

    #[test]
    fn test_tree_expand_with_enter() {
        let mut app = loaded();
        assert_eq!(app.tree_rows().len(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.tree_rows().len(), 2);

        app.handle_key(key(KeyCode::Char('E')));
        assert_eq!(app.tree_rows().len(), 4);

        app.handle_key(key(KeyCode::Char('C')));
        assert_eq!(app.tree_rows().len(), 1);
    }

    #[test]
    fn test_filter_cascade_from_keys() {
        let mut app = loaded();
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.view, View::Productos);

        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Char('b')));
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.filter.rack, "R1");

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.filter.estacion, "");
        assert_eq!(app.filter.bodega, "");
        assert_eq!(app.filter.rack, "");
    }

    #[test]
    fn test_search_box() {
        let mut app = loaded();
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('/')));
        for c in "guantes".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.filtered_products().is_empty());
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.searching);
        assert_eq!(app.filter.to_query(), "busqueda=guantes");
    }

    #[test]
    fn test_delete_dialog_cancel_and_confirm() {
        let mut app = loaded();
        app.handle_key(key(KeyCode::Char('2')));

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.dialog.as_ref().and_then(DeleteDialog::pending), Some("P1"));
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.dialog.is_none());

        app.handle_key(key(KeyCode::Char('d')));
        let effects = app.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(effects.as_slice(), [Effect::Delete(_, DeleteDialog::Producto(_))]));
        assert!(app.dialog.is_none());
    }

    fn confirm_delete(app: &mut App) -> FetchTicket {
        app.handle_key(key(KeyCode::Char('d')));
        match app.handle_key(key(KeyCode::Char('y'))).as_slice() {
            [Effect::Delete(stamp, _)] => *stamp,
            other => panic!("expected a delete, got {other:?}"),
        }
    }

    #[test]
    fn test_deleted_message_replaces_collection() {
        let mut app = loaded();
        app.handle_key(key(KeyCode::Char('2')));
        let stamp = confirm_delete(&mut app);

        let effects = app.handle_message(Message::Deleted(
            stamp,
            Notice::deleted(EntityKind::Producto),
            Some(Collection::Productos(vec![])),
        ));
        assert!(effects.is_empty());
        assert!(app.snapshot.productos.is_empty());
        assert_eq!(app.snapshot.racks.len(), 1);
        assert!(!app.notice.expect("notice").is_error());
    }

    #[test]
    fn test_deleted_refetch_overtaken_by_reload_is_dropped() {
        let mut app = loaded();
        app.handle_key(key(KeyCode::Char('3')));
        let stamp = confirm_delete(&mut app);

        let ticket = app.generation.begin();
        app.loading = true;
        app.handle_message(Message::Loaded(ticket, Ok(snapshot())));

        let effects = app.handle_message(Message::Deleted(
            stamp,
            Notice::deleted(EntityKind::Rack),
            Some(Collection::Racks(vec![])),
        ));
        assert_eq!(app.snapshot.racks.len(), 1);
        assert!(matches!(effects.as_slice(), [Effect::Reload]));
        assert!(app.notice.is_some());
    }

    fn open_product_edit(app: &mut App) -> FetchTicket {
        app.handle_key(key(KeyCode::Char('2')));
        match app.handle_key(key(KeyCode::Char('u'))).as_slice() {
            [Effect::OpenProducto(ticket, id)] if id == "P1" => *ticket,
            other => panic!("expected a product fetch, got {other:?}"),
        }
    }

    fn fetched_martillo() -> Result<FormState, Notice> {
        let snapshot = snapshot();
        Ok(FormState::Producto(ProductoForm::edit(&snapshot.productos[0])))
    }

    #[test]
    fn test_edit_product_fetches_first() {
        let mut app = loaded();
        let ticket = open_product_edit(&mut app);
        assert!(app.form.is_none());

        app.handle_message(Message::FormOpened(ticket, fetched_martillo()));
        assert!(matches!(
            &app.form,
            Some((FormState::Producto(f), 0)) if f.mode == FormMode::Edit("P1".into())
        ));
    }

    #[test]
    fn test_late_product_fetch_keeps_other_form() {
        let mut app = loaded();
        let ticket = open_product_edit(&mut app);

        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_message(Message::FormOpened(ticket, fetched_martillo()));

        assert!(matches!(
            &app.form,
            Some((FormState::Rack(f, _), _)) if f.mode == FormMode::Create
        ));
    }

    #[test]
    fn test_late_product_fetch_after_leaving_view() {
        let mut app = loaded();
        let ticket = open_product_edit(&mut app);
        app.handle_key(key(KeyCode::Char('1')));

        app.handle_message(Message::FormOpened(ticket, fetched_martillo()));
        assert!(app.form.is_none());
        assert_eq!(app.view, View::Inventario);
    }

    #[test]
    fn test_product_fetch_superseded_by_newer_one() {
        let mut app = loaded();
        let first = open_product_edit(&mut app);
        let second = match app.handle_key(key(KeyCode::Char('u'))).as_slice() {
            [Effect::OpenProducto(ticket, _)] => *ticket,
            other => panic!("expected a product fetch, got {other:?}"),
        };

        app.handle_message(Message::FormOpened(first, Err(Notice::error("Error al cargar el producto"))));
        assert!(app.notice.is_none());

        app.handle_message(Message::FormOpened(second, fetched_martillo()));
        assert!(app.form.is_some());
    }

    #[test]
    fn test_theme_toggle() {
        let mut app = App::new(true, None);
        app.handle_key(key(KeyCode::Char('t')));
        assert!(!app.dark_mode);
    }

    #[test]
    fn test_link_opens_product_view() {
        let app = App::new(false, Some(ProductFilter::from_query("rack=R1")));
        assert_eq!(app.view, View::Productos);
        assert_eq!(app.filter.rack, "R1");
    }
}
