pub mod components;
pub mod details;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, Screen};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let screen = match app.screen {
        Screen::Users => "[Users]  Details",
        Screen::Details => "Users  [Details]",
    };
    let filters = if app.view.is_filtering() { "  (filtered)" } else { "" };
    let header = Paragraph::new(format!(" {screen}{filters}"))
        .block(
            Block::default()
                .title("lendadmin")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match app.screen {
        Screen::Users => users::render_users_screen(f, root[1], app),
        Screen::Details => details::render_user_details(f, root[1], app),
    }

    components::render_status_bar(f, root[2], app);

    if app.view.is_filter_panel_open() {
        let area = f.area();
        if let Some(form) = app.filter_form.as_ref() {
            components::render_filter_form(f, area, app, form);
        }
    }
}
