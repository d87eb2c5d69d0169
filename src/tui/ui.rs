// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Rendering

use super::app::{App, View};
use super::form::FieldKind;
use crate::format::{clp, list_or, or_dash};
use crate::hierarchy::Hierarchy;
use crate::notice::NoticeKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

/// Colors for one theme
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    highlight: Style,
    success: Color,
    error: Color,
}

impl Palette {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
                success: Color::Green,
                error: Color::LightRed,
            }
        } else {
            Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                highlight: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
                success: Color::Green,
                error: Color::Red,
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.dark_mode);
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status
        ])
        .split(area);

    draw_tabs(frame, chunks[0], app, &palette);
    match app.view {
        View::Inventario => draw_tree(frame, chunks[1], app, &palette),
        View::Productos => draw_products(frame, chunks[1], app, &palette),
        View::Racks => draw_racks(frame, chunks[1], app, &palette),
        View::Bodegas => draw_bodegas(frame, chunks[1], app, &palette),
        View::Estaciones => draw_estaciones(frame, chunks[1], app, &palette),
    }
    draw_status(frame, chunks[2], app, &palette);

    if app.show_help {
        draw_help(frame, area, &palette);
    }
    if app.form.is_some() {
        draw_form(frame, area, app, &palette);
    }
    if app.dialog.is_some() {
        draw_dialog(frame, area, app, &palette);
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.title())))
        .collect();
    let selected = View::ALL.iter().position(|v| *v == app.view).unwrap_or(0);

    let title = if app.loading {
        " Inventario · cargando… "
    } else {
        " Inventario "
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(palette.base())
        .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(title),
        );
    frame.render_widget(tabs, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = match &app.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Success => palette.success,
                NoticeKind::Error => palette.error,
            };
            Line::from(Span::styled(
                notice.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            "q salir · Tab vistas · a nuevo · u editar · d eliminar · R recargar · t tema · ? ayuda",
            Style::default().fg(palette.muted),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn bordered<'a>(title: String, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(title)
}

fn empty_state(frame: &mut Frame, area: Rect, title: String, text: &str, palette: &Palette) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center)
        .block(bordered(title, palette));
    frame.render_widget(paragraph, area);
}

fn draw_tree(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let estacion = app
        .snapshot
        .estacion(&app.estacion_selector)
        .map_or("Todas", |e| e.nombre.as_str());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Estación: ", Style::default().fg(palette.muted)),
            Span::styled(estacion.to_string(), Style::default().fg(palette.accent)),
            Span::styled("  [s] cambiar  [E] expandir todo  [C] contraer", Style::default().fg(palette.muted)),
        ])),
        chunks[0],
    );

    let rows = app.tree_rows();
    if rows.is_empty() {
        empty_state(frame, chunks[1], " Jerarquía ".into(), "No hay estaciones registradas", palette);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let marker = match (row.expandable, row.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            let mut spans = vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(marker, Style::default().fg(palette.accent)),
                Span::raw(row.label.clone()),
            ];
            if !row.detail.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", row.detail),
                    Style::default().fg(palette.muted),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(bordered(format!(" Jerarquía ({}) ", rows.len()), palette))
        .highlight_style(palette.highlight);
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_products(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let snapshot = &app.snapshot;
    let filter = &app.filter;
    let name = |found: Option<&str>| found.unwrap_or("Todas").to_string();
    let search = if app.searching {
        format!("{}▏", filter.nombre)
    } else {
        or_dash(&filter.nombre).to_string()
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(palette.muted));
    let value = |text: String| Span::styled(text, Style::default().fg(palette.accent));
    let filters = vec![
        Line::from(vec![
            label(" [e] Estación: "),
            value(name(snapshot.estacion(&filter.estacion).map(|e| e.nombre.as_str()))),
            label("  [b] Bodega: "),
            value(name(snapshot.bodega(&filter.bodega).map(|b| b.nombre.as_str()))),
            label("  [r] Rack: "),
            value(name(snapshot.rack(&filter.rack).map(|r| r.nombre.as_str()))),
        ]),
        Line::from(vec![
            label(" [c] Categoría: "),
            value(if filter.categoria.is_empty() { "Todas".into() } else { filter.categoria.clone() }),
            label("  [/] Búsqueda: "),
            value(search),
            label("  [x] limpiar"),
        ]),
        Line::from(vec![label(" Link: "), Span::raw(filter.to_link())]),
    ];
    frame.render_widget(Paragraph::new(filters), chunks[0]);

    let productos = app.filtered_products();
    let title = format!(" Productos ({} de {}) ", productos.len(), snapshot.productos.len());
    if productos.is_empty() {
        empty_state(frame, chunks[1], title, "No se encontraron productos", palette);
        return;
    }

    let tree = Hierarchy::new(snapshot);
    let rows: Vec<Row> = productos
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.nombre.clone()),
                Cell::from(or_dash(&p.categoria).to_string()),
                Cell::from(p.cantidad.to_string()),
                Cell::from(clp(p.precio)),
                Cell::from(tree.ubicacion_completa(&p.rack.id, &p.bodega.id)),
            ])
        })
        .collect();

    draw_table(
        frame,
        chunks[1],
        app,
        palette,
        title,
        rows,
        ["Nombre", "Categoría", "Cantidad", "Precio", "Ubicación"],
        [
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(10),
            Constraint::Percentage(12),
            Constraint::Percentage(38),
        ],
    );
}

fn draw_racks(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let racks = &app.snapshot.racks;
    let title = format!(" Racks ({}) ", racks.len());
    if racks.is_empty() {
        empty_state(frame, area, title, "No hay racks registrados", palette);
        return;
    }

    let rows: Vec<Row> = racks
        .iter()
        .map(|r| {
            let bodega = app.snapshot.bodega(&r.bodega).map_or("-", |b| b.nombre.as_str());
            Row::new(vec![
                Cell::from(r.nombre.clone()),
                Cell::from(bodega.to_string()),
                Cell::from(or_dash(&r.ubicacion).to_string()),
                Cell::from(list_or(&r.categorias, "Sin categorías")),
            ])
        })
        .collect();

    draw_table(
        frame,
        area,
        app,
        palette,
        title,
        rows,
        ["Nombre", "Bodega", "Ubicación", "Categorías"],
        [
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(40),
        ],
    );
}

fn draw_bodegas(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let bodegas = &app.snapshot.bodegas;
    let title = format!(" Bodegas ({}) ", bodegas.len());
    if bodegas.is_empty() {
        empty_state(frame, area, title, "No hay bodegas registradas", palette);
        return;
    }

    let tree = Hierarchy::new(&app.snapshot);
    let rows: Vec<Row> = bodegas
        .iter()
        .map(|b| {
            let estacion = app
                .snapshot
                .estacion(&b.estacion.id)
                .map_or(or_dash(&b.estacion.nombre), |e| e.nombre.as_str());
            Row::new(vec![
                Cell::from(b.nombre.clone()),
                Cell::from(estacion.to_string()),
                Cell::from(tree.racks_de_bodega(&b.id).len().to_string()),
                Cell::from(or_dash(&b.descripcion).to_string()),
            ])
        })
        .collect();

    draw_table(
        frame,
        area,
        app,
        palette,
        title,
        rows,
        ["Nombre", "Estación", "Racks", "Descripción"],
        [
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(10),
            Constraint::Percentage(40),
        ],
    );
}

fn draw_estaciones(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let estaciones = &app.snapshot.estaciones;
    let title = format!(" Estaciones ({}) ", estaciones.len());
    if estaciones.is_empty() {
        empty_state(frame, area, title, "No hay estaciones registradas", palette);
        return;
    }

    let tree = Hierarchy::new(&app.snapshot);
    let rows: Vec<Row> = estaciones
        .iter()
        .map(|e| {
            let bodegas: Vec<String> = tree
                .bodegas_de_estacion(&e.id)
                .iter()
                .map(|b| b.nombre.clone())
                .collect();
            Row::new(vec![
                Cell::from(e.nombre.clone()),
                Cell::from(e.tipo.label()),
                Cell::from(e.estado.code()),
                Cell::from(or_dash(&e.ubicacion).to_string()),
                Cell::from(list_or(&bodegas, "Sin bodegas")),
            ])
        })
        .collect();

    draw_table(
        frame,
        area,
        app,
        palette,
        title,
        rows,
        ["Nombre", "Tipo", "Estado", "Ubicación", "Bodegas"],
        [
            Constraint::Percentage(20),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(20),
            Constraint::Percentage(38),
        ],
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_table<const N: usize>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    title: String,
    rows: Vec<Row>,
    header: [&'static str; N],
    widths: [Constraint; N],
) {
    let header = Row::new(header.map(Cell::from))
        .style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, palette))
        .row_highlight_style(palette.highlight);
    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_dialog(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    let kind = dialog.kind();
    let id = dialog.pending().unwrap_or_default();
    let name = match kind {
        crate::types::EntityKind::Estacion => app.snapshot.estacion(id).map(|e| e.nombre.clone()),
        crate::types::EntityKind::Bodega => app.snapshot.bodega(id).map(|b| b.nombre.clone()),
        crate::types::EntityKind::Rack => app.snapshot.rack(id).map(|r| r.nombre.clone()),
        crate::types::EntityKind::Producto => app.snapshot.producto(id).map(|p| p.nombre.clone()),
    }
    .unwrap_or_else(|| id.to_string());

    let popup = centered(area, 50, 7);
    let text = vec![
        Line::from(format!("¿Estás seguro de que deseas eliminar {}?", kind.with_article())),
        Line::from(Span::styled(name, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("[s] Eliminar   [n] Cancelar", Style::default().fg(palette.muted))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error))
                .title(" Confirmar eliminación "),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some((form, focused)) = &app.form else {
        return;
    };
    let fields = form.fields(&app.snapshot);

    let mut lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let hint = match field.kind {
                FieldKind::Select => " ◂▸",
                FieldKind::Tags => " ◂▸ espacio",
                FieldKind::Text | FieldKind::Numeric => "",
            };
            let style = if i == *focused {
                palette.highlight
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<13}", field.label), Style::default().fg(palette.muted)),
                Span::styled(field.value.clone(), style),
                Span::styled(hint, Style::default().fg(palette.muted)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    let footer = if app.saving {
        "Guardando…"
    } else {
        "Enter guardar · Esc cancelar · ↑↓ campo"
    };
    lines.push(Line::from(Span::styled(footer, Style::default().fg(palette.muted))));

    #[allow(clippy::cast_possible_truncation)]
    let height = (lines.len() as u16) + 2;
    let popup = centered(area, 70, height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(format!(" {} ", form.title())),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn draw_help(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help = [
        ("1-5 / Tab", "cambiar de vista"),
        ("↑↓ j k", "mover selección"),
        ("Enter ← →", "expandir / contraer (Inventario)"),
        ("s", "filtrar jerarquía por estación"),
        ("e b r c", "filtros de productos (Shift retrocede)"),
        ("/", "buscar por nombre o categoría"),
        ("x", "limpiar filtros"),
        ("a u d", "nuevo / editar / eliminar"),
        ("R", "recargar datos"),
        ("t", "tema claro / oscuro"),
        ("q", "salir"),
    ];
    let lines: Vec<Line> = help
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<12}"), Style::default().fg(palette.accent)),
                Span::raw(*what),
            ])
        })
        .collect();

    #[allow(clippy::cast_possible_truncation)]
    let popup = centered(area, 60, help.len() as u16 + 2);
    let paragraph = Paragraph::new(lines)
        .style(palette.base())
        .block(bordered(" Ayuda ".into(), palette));
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// Rect of `percent_x` width and `height` rows centred in `area`
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
