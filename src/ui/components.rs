//! Shared UI components (status bar, filter modal, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::filterconf::FilterField;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, FilterForm, InputMode};

/// Render the bottom status bar with mode, counts and key hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::FilterForm => "FILTER",
    };
    let refreshing = if app.queries.users.is_fetching() || app.queries.stats.is_fetching() {
        "  refreshing…"
    } else {
        ""
    };
    let filters = if app.view.is_filtering() {
        format!("  filters:[{}]", app.view.criteria().summary())
    } else {
        String::new()
    };
    let hint = |action: KeyAction, what: &str| {
        app.keymap
            .key_for(action)
            .map(|k| format!("{k}: {what}"))
            .unwrap_or_default()
    };
    let hints = [
        hint(KeyAction::OpenFilter, "filter"),
        hint(KeyAction::ResetFilters, "reset"),
        hint(KeyAction::Refresh, "refresh"),
        hint(KeyAction::Quit, "quit"),
    ]
    .into_iter()
    .filter(|h| !h.is_empty())
    .collect::<Vec<_>>()
    .join("; ");
    let msg = format!(
        "mode: {mode}  users:{}/{}{filters}{refreshing}  {hints}",
        app.view.filtered_len(),
        app.view.users().len(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Filter form modal: one row per criterion, then Reset / Filter buttons.
pub fn render_filter_form(f: &mut Frame, area: Rect, app: &AppState, form: &FilterForm) {
    let rect = centered_rect(56, (FilterForm::ROWS + 4) as u16, area);
    let mut lines: Vec<Line> = Vec::with_capacity(FilterForm::ROWS + 1);
    for (idx, field) in FilterField::ALL.iter().enumerate() {
        let marker = if idx == form.selected { "▶ " } else { "  " };
        let raw = form.draft.get(*field);
        let shown = match (raw.is_empty(), field.is_select()) {
            (true, true) => "‹ Select ›".to_string(),
            (true, false) => placeholder(*field).to_string(),
            (false, true) => format!("‹ {raw} ›"),
            (false, false) => raw.to_string(),
        };
        let value_style = if raw.is_empty() {
            Style::default().fg(app.theme.muted)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<14}", field.label()), Style::default().fg(app.theme.title)),
            Span::styled(shown, value_style),
        ]));
    }
    lines.push(Line::from(""));
    let button = |row: usize, text: &str| {
        if row == form.selected {
            Span::styled(format!("[{text}]"), Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(format!(" {text} "))
        }
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        button(FilterForm::RESET_ROW, "Reset"),
        Span::raw("    "),
        button(FilterForm::SUBMIT_ROW, "Filter"),
    ]));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Filter users  (←/→ select, Enter apply, Esc close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn placeholder(field: FilterField) -> &'static str {
    match field {
        FilterField::Username => "User",
        FilterField::Email => "Email",
        FilterField::Date => "YYYY-MM-DD",
        FilterField::PhoneNumber => "Phone Number",
        FilterField::Organization | FilterField::Status => "",
    }
}

/// Compute a centered rectangle of the given size within `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect { x, y, width: w, height: h }
}
