//! Application state types and entry glue.
//!
//! Defines the dashboard state owned by the event loop, the filter form
//! modal state, and the color theme. The loop itself lives in [`update`] and
//! is re-exported as `run`.
//!
pub mod filterconf;
pub mod keymap;
pub mod pager;
pub mod selection;
pub mod update;
pub mod view;

use ratatui::style::Color;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::model::{UserRecord, UserStatus};
use crate::query::{DashboardQueries, FetchEvent};
use crate::store::KeyValueStore;
use filterconf::{FilterCriteria, FilterField};
use keymap::Keymap;
use view::UsersView;

/// Which screen is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Users,
    Details,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    FilterForm,
}

/// Color palette for the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub error: Color,
}

impl Theme {
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0x39, 0xcd, 0xcc),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }

    /// Foreground for a status token.
    pub fn status_color(&self, status: UserStatus) -> Color {
        match status {
            UserStatus::Active => Color::Rgb(0x39, 0xcd, 0x62),
            UserStatus::Inactive => self.muted,
            UserStatus::Pending => Color::Rgb(0xe9, 0xb2, 0x00),
            UserStatus::Blacklisted => Color::Rgb(0xe4, 0x03, 0x3b),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Draft criteria edited in the filter modal before submit.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterForm {
    pub draft: FilterCriteria,
    /// Row under the cursor: one per field, then Reset, then Filter.
    pub selected: usize,
    pub organizations: Vec<String>,
}

impl FilterForm {
    pub const RESET_ROW: usize = FilterField::ALL.len();
    pub const SUBMIT_ROW: usize = FilterField::ALL.len() + 1;
    pub const ROWS: usize = FilterField::ALL.len() + 2;

    pub fn new(current: &FilterCriteria, organizations: Vec<String>) -> Self {
        Self {
            draft: current.clone(),
            selected: 0,
            organizations,
        }
    }

    pub fn field(&self) -> Option<FilterField> {
        FilterField::ALL.get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(Self::ROWS - 1);
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % Self::ROWS;
    }

    /// Step a select field through "" followed by its options.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.field().filter(|f| f.is_select()) else {
            return;
        };
        let mut options: Vec<String> = vec![String::new()];
        match field {
            FilterField::Organization => options.extend(self.organizations.iter().cloned()),
            _ => options.extend(UserStatus::ALL.iter().map(|s| s.as_str().to_string())),
        }
        let current = options
            .iter()
            .position(|o| o == self.draft.get(field))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            current.checked_sub(1).unwrap_or(options.len() - 1)
        };
        self.draft.set(field, options[next].clone());
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.field().filter(|f| !f.is_select()) {
            self.draft.get_mut(field).push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.field() {
            if field.is_select() {
                self.draft.set(field, "");
            } else {
                self.draft.get_mut(field).pop();
            }
        }
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub view: UsersView,
    pub queries: DashboardQueries,
    /// Highlighted row within the current page.
    pub selected_row: usize,
    /// User shown on the details screen, read back from the store.
    pub detail: Option<UserRecord>,
    pub filter_form: Option<FilterForm>,
    pub store: Arc<dyn KeyValueStore>,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            screen: Screen::Users,
            input_mode: InputMode::Normal,
            view: UsersView::new(Arc::clone(&store)),
            queries: DashboardQueries::new(),
            selected_row: 0,
            detail: None,
            filter_form: None,
            store,
            theme: Theme::default(),
            keymap,
        }
    }

    /// Fold a finished fetch into the queries and refresh the view when the
    /// user list changed.
    pub fn apply_fetch(&mut self, event: FetchEvent) {
        let is_users = matches!(event, FetchEvent::Users(..));
        if !self.queries.apply(event) {
            return;
        }
        if is_users {
            if let Some(users) = self.queries.users.data() {
                info!(count = users.len(), "users loaded");
                self.view.set_users(users.clone());
            }
            self.clamp_selection();
        }
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.view.current_page().get(self.selected_row).copied()
    }

    pub fn clamp_selection(&mut self) {
        let rows = self.view.current_page().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    pub fn open_filter_form(&mut self) {
        self.view.open_filter_panel();
        self.filter_form = Some(FilterForm::new(self.view.criteria(), self.view.organizations()));
        self.input_mode = InputMode::FilterForm;
    }

    pub fn close_filter_form(&mut self) {
        self.view.close_filter_panel();
        self.filter_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_filter_form(&mut self) {
        if let Some(form) = self.filter_form.take() {
            self.view.submit_filter(form.draft);
        }
        self.input_mode = InputMode::Normal;
        self.selected_row = 0;
    }

    pub fn reset_filters(&mut self) {
        self.view.reset_filter();
        self.filter_form = None;
        self.input_mode = InputMode::Normal;
        self.selected_row = 0;
    }

    pub fn change_page(&mut self, index: usize) {
        self.view.change_page(index);
        self.selected_row = 0;
    }

    /// Hand the highlighted user to the details screen through the store.
    pub fn open_details(&mut self) {
        let Some(user) = self.selected_user().cloned() else {
            return;
        };
        debug!(user_id = user.id, "opening user details");
        // A failed write must not surface a previously stored user.
        self.detail = if selection::select_user(self.store.as_ref(), &user) {
            selection::load_selected(self.store.as_ref())
        } else {
            Some(user)
        };
        self.screen = Screen::Details;
    }

    pub fn back_to_users(&mut self) {
        self.screen = Screen::Users;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
