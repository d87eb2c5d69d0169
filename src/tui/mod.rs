// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Terminal user interface
//!
//! The draw/input loop runs on the calling thread. Network calls are spawned
//! on the tokio runtime and report back over a channel; loads, product
//! fetches and deletes carry a [`FetchTicket`] so responses that were
//! overtaken are dropped.

pub mod app;
pub mod form;
mod ui;

use crate::api::{ApiClient, Entity};
use crate::confirm::DeleteConfirmation;
use crate::filter::ProductFilter;
use crate::forms::{open_for_edit, submit_form, ProductoForm};
use crate::inventory::{FetchTicket, LoadError, Snapshot};
use crate::notice::Notice;
use crate::types::{Bodega, Estacion, Producto, Rack};
use anyhow::{Context, Result};
use app::{App, DeleteDialog, Effect};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use form::FormState;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

const TICK: Duration = Duration::from_millis(200);

/// How the TUI starts
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Start with the dark theme
    pub dark_mode: bool,
    /// Open the product view with this filter
    pub filter: Option<ProductFilter>,
}

/// A freshly fetched collection, as returned after a delete
#[derive(Debug)]
pub enum Collection {
    /// Stations
    Estaciones(Vec<Estacion>),
    /// Bodegas
    Bodegas(Vec<Bodega>),
    /// Racks
    Racks(Vec<Rack>),
    /// Products
    Productos(Vec<Producto>),
}

impl Collection {
    /// Replace the matching collection in `snapshot`
    pub fn apply(self, snapshot: &mut Snapshot) {
        match self {
            Self::Estaciones(list) => snapshot.estaciones = list,
            Self::Bodegas(list) => snapshot.bodegas = list,
            Self::Racks(list) => snapshot.racks = list,
            Self::Productos(list) => snapshot.productos = list,
        }
    }
}

/// Result of a background task
#[derive(Debug)]
pub enum Message {
    /// Batch load finished
    Loaded(FetchTicket, Result<Snapshot, LoadError>),
    /// Delete finished; the collection is `None` if the refetch failed
    Deleted(FetchTicket, Notice, Option<Collection>),
    /// Save finished; `true` when it went through
    Saved(Notice, bool),
    /// Product fetched for editing
    FormOpened(FetchTicket, Result<FormState, Notice>),
}

/// Step through `options` from `current`, wrapping at both ends
///
/// An unknown `current` counts as the first option.
#[must_use]
pub fn cycle_option<'a>(options: &[&'a str], current: &str, step: isize) -> &'a str {
    if options.is_empty() {
        return "";
    }
    let len = options.len();
    let pos = options.iter().position(|o| *o == current).unwrap_or(0);
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let next = (pos as isize + step).rem_euclid(len as isize) as usize;
    options[next]
}

/// Run the TUI until the user quits
pub fn run(client: ApiClient, handle: Handle, options: LaunchOptions) -> Result<()> {
    enable_raw_mode().context("No se pudo activar el modo raw")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("No se pudo abrir la pantalla alternativa")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options.dark_mode, options.filter);
    let result = event_loop(&mut terminal, &mut app, &Runner::new(client, handle));

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runner: &Runner,
) -> Result<()> {
    runner.spawn(app, Effect::Reload);

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    for effect in app.handle_key(key) {
                        runner.spawn(app, effect);
                    }
                }
            }
        }

        while let Ok(message) = runner.inbox.try_recv() {
            for effect in app.handle_message(message) {
                runner.spawn(app, effect);
            }
        }

        app.expire_notice(Instant::now());

        if app.should_quit {
            app.generation.invalidate();
            app.form_generation.invalidate();
            return Ok(());
        }
    }
}

/// Spawns effects on the runtime and collects their results
struct Runner {
    client: ApiClient,
    handle: Handle,
    outbox: Sender<Message>,
    inbox: Receiver<Message>,
}

impl Runner {
    fn new(client: ApiClient, handle: Handle) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            client,
            handle,
            outbox,
            inbox,
        }
    }

    fn spawn(&self, app: &mut App, effect: Effect) {
        let client = self.client.clone();
        let tx = self.outbox.clone();

        match effect {
            Effect::Reload => {
                let ticket = app.generation.begin();
                app.loading = true;
                self.handle.spawn(async move {
                    let result = Snapshot::load(&client).await;
                    let _ = tx.send(Message::Loaded(ticket, result));
                });
            }
            Effect::Delete(stamp, dialog) => match dialog {
                DeleteDialog::Estacion(d) => self.delete(stamp, d, Collection::Estaciones),
                DeleteDialog::Bodega(d) => self.delete(stamp, d, Collection::Bodegas),
                DeleteDialog::Rack(d) => self.delete(stamp, d, Collection::Racks),
                DeleteDialog::Producto(d) => self.delete(stamp, d, Collection::Productos),
            },
            Effect::Submit(form) => {
                self.handle.spawn(async move {
                    let (notice, ok) = match form {
                        FormState::Producto(mut f) => {
                            let out = submit_form(&client, &mut f).await;
                            (out.notice, out.saved.is_some())
                        }
                        FormState::Rack(mut f, _) => {
                            let out = submit_form(&client, &mut f).await;
                            (out.notice, out.saved.is_some())
                        }
                        FormState::Bodega(mut f) => {
                            let out = submit_form(&client, &mut f).await;
                            (out.notice, out.saved.is_some())
                        }
                        FormState::Estacion(mut f) => {
                            let out = submit_form(&client, &mut f).await;
                            (out.notice, out.saved.is_some())
                        }
                    };
                    let _ = tx.send(Message::Saved(notice, ok));
                });
            }
            Effect::OpenProducto(ticket, id) => {
                self.handle.spawn(async move {
                    let result = open_for_edit::<ProductoForm, _>(&client, &id)
                        .await
                        .map(FormState::Producto)
                        .map_err(|e| {
                            tracing::error!(id = %id, error = %e, "Error al cargar el producto");
                            Notice::error("Error al cargar el producto")
                        });
                    let _ = tx.send(Message::FormOpened(ticket, result));
                });
            }
        }
    }

    fn delete<E: Entity>(
        &self,
        stamp: FetchTicket,
        mut dialog: DeleteConfirmation<E>,
        wrap: fn(Vec<E>) -> Collection,
    ) {
        let client = self.client.clone();
        let tx = self.outbox.clone();
        self.handle.spawn(async move {
            if let Some(outcome) = dialog.confirm(&client).await {
                let refreshed = outcome.refreshed.map(wrap);
                let _ = tx.send(Message::Deleted(stamp, outcome.notice, refreshed));
            }
        });
    }
}
