use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::model::status_class;

pub fn render_users_screen(f: &mut Frame, area: Rect, app: &AppState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(area);

    render_stats_cards(f, parts[0], app);

    let users = &app.queries.users;
    if users.is_loading() {
        render_notice(f, parts[1], app, "Loading users...", false);
        return;
    }
    // A failed refetch hides the previous rows too.
    if users.is_error() {
        render_notice(
            f,
            parts[1],
            app,
            "Something went wrong\nWe couldn't load the users data. Press r to try again.",
            true,
        );
        return;
    }

    render_users_table(f, parts[1], app);
    render_pagination(f, parts[2], app);
}

fn render_notice(f: &mut Frame, area: Rect, app: &AppState, text: &str, is_error: bool) {
    let color = if is_error { app.theme.error } else { app.theme.muted };
    let p = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(Block::default().title("Users").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
    f.render_widget(p, area);
}

pub fn render_stats_cards(f: &mut Frame, area: Rect, app: &AppState) {
    let stats = &app.queries.stats;
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border));

    if stats.is_loading() {
        f.render_widget(Paragraph::new("Loading stats...").style(Style::default().fg(app.theme.muted)).block(block), area);
        return;
    }
    let Some(values) = stats.data().filter(|_| !stats.is_error()) else {
        f.render_widget(
            Paragraph::new("Unable to load statistics").style(Style::default().fg(app.theme.error)).block(block),
            area,
        );
        return;
    };

    let cards = [
        ("USERS", values.total_users),
        ("ACTIVE USERS", values.active_users),
        ("USERS WITH LOANS", values.loan_users),
        ("USERS WITH SAVINGS", values.savings_users),
    ];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);
    for ((label, value), col) in cards.iter().zip(cols.iter()) {
        let text = vec![
            Line::from(Span::styled(*label, Style::default().fg(app.theme.muted))),
            Line::from(Span::styled(value.to_string(), Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD))),
        ];
        let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
        f.render_widget(p, *col);
    }
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let page = app.view.current_page();
    let block = Block::default().title("Users").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border));

    if page.is_empty() {
        let msg = if app.view.is_filtering() {
            "No users found\nTry adjusting your filters, or press x to reset them."
        } else {
            "No users found"
        };
        let p = Paragraph::new(msg).alignment(Alignment::Center).style(Style::default().fg(app.theme.muted)).block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = page.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.organization.clone()),
            Cell::from(u.username().to_string()),
            Cell::from(u.email().to_string()),
            Cell::from(u.phone_number().to_string()),
            Cell::from(u.date_joined.clone()),
            Cell::from(Span::styled(status_class(u.status), Style::default().fg(app.theme.status_color(u.status)))),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(16),
        Constraint::Percentage(16),
        Constraint::Percentage(26),
        Constraint::Percentage(16),
        Constraint::Percentage(12),
        Constraint::Percentage(14),
    ];
    let header = Row::new(vec!["ORGANIZATION", "USERNAME", "EMAIL", "PHONE NUMBER", "DATE JOINED", "STATUS"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let pages = app.view.page_count();
    let page = app.view.page();
    let current = if pages == 0 { 0 } else { page.index + 1 };
    let shown = app.view.current_page().len();
    let range = if shown == 0 {
        "0".to_string()
    } else {
        format!("{}-{}", page.offset() + 1, page.offset() + shown)
    };
    let msg = format!(
        " Page {current}/{pages}  showing {range} out of {}  (total {})",
        app.view.filtered_len(),
        app.view.users().len()
    );
    f.render_widget(Paragraph::new(msg).style(Style::default().fg(app.theme.muted)), area);
}
