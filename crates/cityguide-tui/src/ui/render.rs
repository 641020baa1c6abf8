use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cityguide_core::City;

use crate::app::{App, AppState, View};

use super::styles;

/// Shown when the load settled with no document at all
pub const UNAVAILABLE_MESSAGE: &str = "Data unavailable.";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  City Guide";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 2)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.document().is_none() {
        if app.load.loading() {
            render_message(frame, area, "Loading city data...", styles::muted_style());
        } else {
            render_message(frame, area, UNAVAILABLE_MESSAGE, styles::error_style());
        }
        return;
    }

    match app.view {
        View::Cities => render_city_list(frame, app, area),
        View::Places => render_place_list(frame, app, area),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, style: ratatui::style::Style) {
    let top = area.height / 3;
    let mut lines = vec![Line::from(""); top as usize];
    lines.push(Line::from(Span::styled(message.to_string(), style)).centered());
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_city_list(frame: &mut Frame, app: &App, area: Rect) {
    let cities = app.cities();

    let items: Vec<ListItem> = cities
        .iter()
        .enumerate()
        .map(|(i, city)| {
            let style = if i == app.city_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let mut lines = vec![Line::from(vec![
                Span::styled(city.name.clone(), styles::card_title_style()),
                Span::styled(format!("  ({})", city.display_place_count()), styles::muted_style()),
            ])];
            if !city.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", city.description),
                    styles::muted_style(),
                )));
            }
            lines.push(Line::from(""));

            ListItem::new(lines).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Cities ({}) ", cities.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style());

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !cities.is_empty() {
        state.select(Some(app.city_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_place_list(frame: &mut Frame, app: &App, area: Rect) {
    let Some(city) = app.selected_city() else {
        render_message(frame, area, "Select a city from the list", styles::muted_style());
        return;
    };

    let lines = place_lines(city);

    let block = Block::default()
        .title(format!(" {} ", city.name))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.place_scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Lines of the place view for `city`, before wrapping.
pub fn place_lines(city: &City) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("← Back to cities [Esc]", styles::link_style())),
        Line::from(""),
    ];

    for place in &city.places {
        lines.push(Line::from(Span::styled(
            place.name.clone(),
            styles::card_title_style(),
        )));
        if !place.description.is_empty() {
            lines.push(Line::from(Span::styled(
                place.description.clone(),
                styles::list_item_style(),
            )));
        }
        lines.push(Line::from(""));
    }

    if city.places.is_empty() {
        lines.push(Line::from(Span::styled(
            "No places listed for this city",
            styles::muted_style(),
        )));
    }

    lines
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = format!(" {} ", app.freshness());
    let right_text = match app.view {
        View::Cities => " [Enter] open | [q]uit ",
        View::Places => " [Esc] back | [q]uit ",
    };

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 14, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(" City Guide", styles::title_style())),
        Line::from(Span::styled(
            format!(" version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        help_line("↑/↓ j/k", "Move selection / scroll"),
        help_line("PgUp/PgDn", "Page up / down"),
        help_line("Enter →", "Show places of city"),
        help_line("Esc ←", "Back to cities"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::link_style());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
