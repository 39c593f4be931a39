//! The users list engine: source collection + criteria → filtered view → page.
//!
//! [`UsersView`] is the only writer of its state. Every mutator that changes
//! the collection or the criteria re-derives the filtered view before
//! returning, so readers never observe a stale view. Any change of criteria
//! also moves back to the first page.

use std::sync::Arc;
use tracing::debug;

use super::filterconf::{FilterCriteria, FilterField};
use super::pager::{self, PageState};
use crate::model::UserRecord;
use crate::search;
use crate::store::KeyValueStore;

pub struct UsersView {
    users: Vec<UserRecord>,
    criteria: FilterCriteria,
    /// Indices into `users` passing `criteria`.
    filtered: Vec<usize>,
    page: PageState,
    filter_panel_open: bool,
    store: Arc<dyn KeyValueStore>,
}

impl UsersView {
    /// Empty view whose criteria are rehydrated from `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let criteria = FilterCriteria::load(store.as_ref());
        if criteria.is_active() {
            debug!(filters = %criteria.summary(), "restored saved filters");
        }
        Self {
            users: Vec::new(),
            criteria,
            filtered: Vec::new(),
            page: PageState::default(),
            filter_panel_open: false,
            store,
        }
    }

    /// Replace the source collection (fresh fetch or re-fetch).
    pub fn set_users(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.derive();
    }

    /// Replace the criteria wholesale and close the filter panel.
    pub fn submit_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.criteria.save(self.store.as_ref());
        self.filter_panel_open = false;
        self.page = PageState::default();
        self.derive();
    }

    pub fn set_filter_field(&mut self, field: FilterField, value: impl Into<String>) {
        self.criteria.set(field, value);
        self.criteria.save(self.store.as_ref());
        self.page = PageState::default();
        self.derive();
    }

    /// Clear every field, forget the saved criteria and show everyone.
    pub fn reset_filter(&mut self) {
        self.criteria = FilterCriteria::default();
        FilterCriteria::clear(self.store.as_ref());
        self.filter_panel_open = false;
        self.page = PageState::default();
        self.derive();
    }

    /// No bounds check: an index past the end shows an empty page.
    pub fn change_page(&mut self, index: usize) {
        self.page.index = index;
    }

    pub fn next_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        self.page.index = (self.page.index + 1).min(last);
    }

    pub fn prev_page(&mut self) {
        self.page.index = self.page.index.saturating_sub(1);
    }

    pub fn open_filter_panel(&mut self) {
        self.filter_panel_open = true;
    }

    pub fn close_filter_panel(&mut self) {
        self.filter_panel_open = false;
    }

    pub fn toggle_filter_panel(&mut self) {
        self.filter_panel_open = !self.filter_panel_open;
    }

    pub fn is_filter_panel_open(&self) -> bool {
        self.filter_panel_open
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_filtering(&self) -> bool {
        self.criteria.is_active()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered(&self) -> Vec<&UserRecord> {
        self.filtered.iter().map(|&i| &self.users[i]).collect()
    }

    /// Records on the current page.
    pub fn current_page(&self) -> Vec<&UserRecord> {
        pager::page_window(&self.filtered, self.page.index)
            .iter()
            .map(|&i| &self.users[i])
            .collect()
    }

    pub fn page_count(&self) -> usize {
        pager::page_count(self.filtered.len())
    }

    pub fn organizations(&self) -> Vec<String> {
        search::organizations(&self.users)
    }

    fn derive(&mut self) {
        self.filtered = search::filter_indices(&self.users, &self.criteria);
        debug!(
            total = self.users.len(),
            shown = self.filtered.len(),
            filters = %self.criteria.summary(),
            "derived filtered view"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filterconf::FILTERS_KEY;
    use crate::model::{PersonalInformation, UserStatus};
    use crate::store::MemoryStore;
    use serde_json::Map;

    fn mk_user(id: u64, org: &str) -> UserRecord {
        UserRecord {
            id,
            organization: org.to_string(),
            date_joined: "2022-01-01".into(),
            status: UserStatus::Active,
            personal_information: PersonalInformation {
                username: format!("user{id}"),
                email: format!("user{id}@mail.com"),
                phone_number: format!("0800{id:04}"),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    fn view_with(n: u64) -> (UsersView, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut view = UsersView::new(store.clone());
        view.set_users((0..n).map(|i| mk_user(i, if i % 2 == 0 { "Even" } else { "Odd" })).collect());
        (view, store)
    }

    #[test]
    fn criteria_change_returns_to_first_page() {
        let (mut view, _) = view_with(40);
        view.change_page(3);
        view.set_filter_field(FilterField::Organization, "Even");
        assert_eq!(view.page().index, 0);
        assert_eq!(view.filtered_len(), 20);
        assert_eq!(view.page_count(), 2);
    }

    #[test]
    fn submit_closes_panel_and_persists() {
        let (mut view, store) = view_with(5);
        view.open_filter_panel();
        view.submit_filter(FilterCriteria { organization: "Odd".into(), ..Default::default() });
        assert!(!view.is_filter_panel_open());
        assert!(store.contains(FILTERS_KEY));
        assert_eq!(view.filtered().iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn next_and_prev_page_saturate() {
        let (mut view, _) = view_with(25);
        view.prev_page();
        assert_eq!(view.page().index, 0);
        for _ in 0..10 {
            view.next_page();
        }
        assert_eq!(view.page().index, 2);
        assert_eq!(view.current_page().len(), 5);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let (mut view, _) = view_with(12);
        view.change_page(9);
        assert!(view.current_page().is_empty());
    }

    #[test]
    fn toggle_flips_panel_without_touching_criteria() {
        let (mut view, _) = view_with(3);
        view.toggle_filter_panel();
        assert!(view.is_filter_panel_open());
        view.toggle_filter_panel();
        assert!(!view.is_filter_panel_open());
        assert!(!view.is_filtering());
    }
}
