use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::api::UserService;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, FilterForm, InputMode, Screen};
use crate::query::{self, FetchEvent};
use crate::ui;

/// What the event loop should do after a key was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Refresh,
}

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    service: Arc<dyn UserService>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchEvent>();
    refresh(&mut app, &service, &tx);

    loop {
        while let Ok(fetched) = rx.try_recv() {
            app.apply_fetch(fetched);
        }

        terminal.draw(|f| {
            ui::render(f, &app);
        })?;

        let ready = tokio::task::block_in_place(|| event::poll(Duration::from_millis(100)))?;
        if !ready {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match handle_key(&mut app, key) {
                    Command::Quit => break,
                    Command::Refresh => refresh(&mut app, &service, &tx),
                    Command::None => {}
                }
            }
        }
    }

    info!(uptime_secs = app.started_at.elapsed().as_secs(), "leaving dashboard");
    Ok(())
}

fn refresh(app: &mut AppState, service: &Arc<dyn UserService>, tx: &mpsc::UnboundedSender<FetchEvent>) {
    query::spawn_users_fetch(&mut app.queries.users, service, tx);
    query::spawn_stats_fetch(&mut app.queries.stats, service, tx);
}

/// Apply one key press to the state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Command {
    match app.input_mode {
        InputMode::FilterForm => {
            handle_filter_form_key(app, key.code);
            Command::None
        }
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return Command::None;
            };
            match (app.screen, action) {
                (_, KeyAction::Quit) => return Command::Quit,
                (_, KeyAction::Refresh) => return Command::Refresh,
                (Screen::Details, KeyAction::Back) => app.back_to_users(),
                (Screen::Details, _) => {}
                (Screen::Users, KeyAction::OpenFilter) => app.open_filter_form(),
                (Screen::Users, KeyAction::ResetFilters) => app.reset_filters(),
                (Screen::Users, KeyAction::OpenDetails) => app.open_details(),
                (Screen::Users, KeyAction::MoveUp) => {
                    app.selected_row = app.selected_row.saturating_sub(1);
                }
                (Screen::Users, KeyAction::MoveDown) => {
                    if app.selected_row + 1 < app.view.current_page().len() {
                        app.selected_row += 1;
                    }
                }
                (Screen::Users, KeyAction::PrevPage) => {
                    app.view.prev_page();
                    app.selected_row = 0;
                }
                (Screen::Users, KeyAction::NextPage) => {
                    app.view.next_page();
                    app.selected_row = 0;
                }
                (Screen::Users, KeyAction::FirstPage) => app.change_page(0),
                (Screen::Users, KeyAction::LastPage) => {
                    let last = app.view.page_count().saturating_sub(1);
                    app.change_page(last);
                }
                (Screen::Users, KeyAction::Back | KeyAction::Ignore) => {}
            }
            Command::None
        }
    }
}

fn handle_filter_form_key(app: &mut AppState, code: KeyCode) {
    let Some(form) = app.filter_form.as_mut() else {
        app.close_filter_form();
        return;
    };
    match code {
        KeyCode::Esc => app.close_filter_form(),
        KeyCode::Up | KeyCode::BackTab => form.move_up(),
        KeyCode::Down | KeyCode::Tab => form.move_down(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Enter => match form.selected {
            FilterForm::RESET_ROW => app.reset_filters(),
            FilterForm::SUBMIT_ROW => app.submit_filter_form(),
            _ => form.move_down(),
        },
        KeyCode::Char(' ') if form.field().is_some_and(|f| f.is_select()) => form.cycle(true),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}
