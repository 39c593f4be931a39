// Integration tests for lendadmin

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lendadmin::api::{ApiError, UserService};
use lendadmin::app::filterconf::{FILTERS_KEY, FilterCriteria, FilterField};
use lendadmin::app::keymap::Keymap;
use lendadmin::app::selection::{SELECTED_USER_KEY, load_selected, select_user};
use lendadmin::app::update::{Command, handle_key};
use lendadmin::app::view::UsersView;
use lendadmin::app::{AppState, InputMode, Screen};
use lendadmin::model::{PersonalInformation, Stats, UserRecord, UserStatus};
use lendadmin::query::{DashboardQueries, FetchEvent};
use lendadmin::store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
use serde_json::{Map, json};

fn user(id: u64, org: &str, name: &str, status: UserStatus) -> UserRecord {
    UserRecord {
        id,
        organization: org.to_string(),
        date_joined: "2021-03-14".to_string(),
        status,
        personal_information: PersonalInformation {
            username: name.to_string(),
            email: format!("{name}@mail.com"),
            phone_number: format!("080{id:08}"),
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

fn many(n: u64) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| {
            let org = if i % 2 == 0 { "Lendsqr" } else { "Irorun" };
            user(i, org, &format!("user{i}"), UserStatus::ALL[(i % 4) as usize])
        })
        .collect()
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn temp_dir(tag: &str) -> std::path::PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("lendadmin_{tag}_{}_{nonce}", std::process::id()))
}

/// Store whose every operation fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("disk gone".into()))
    }
    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("disk gone".into()))
    }
    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("disk gone".into()))
    }
}

/// Users resolve, stats reject.
struct HalfBrokenService {
    users: Vec<UserRecord>,
}

#[async_trait::async_trait]
impl UserService for HalfBrokenService {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        Ok(self.users.clone())
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        Err(ApiError::new("Request failed with status code 503", Some(503)))
    }
}

// 1) Empty criteria show the whole collection, including an empty one
#[test]
fn empty_criteria_show_everything() {
    let mut view = UsersView::new(Arc::new(MemoryStore::new()));
    assert_eq!(view.filtered_len(), 0);
    assert!(view.current_page().is_empty());

    let users = many(7);
    view.set_users(users.clone());
    let shown: Vec<u64> = view.filtered().iter().map(|u| u.id).collect();
    assert_eq!(shown, users.iter().map(|u| u.id).collect::<Vec<_>>());
}

// 2) Single-field criteria keep exactly the matching records
#[test]
fn single_field_filters_follow_match_rules() {
    let mut view = UsersView::new(Arc::new(MemoryStore::new()));
    view.set_users(many(30));

    view.set_filter_field(FilterField::Username, "user1");
    assert!(view.filtered().iter().all(|u| u.username().contains("user1")));
    // user1, user10..user19
    assert_eq!(view.filtered_len(), 11);

    view.reset_filter();
    view.set_filter_field(FilterField::Status, "Active");
    assert!(view.filtered().iter().all(|u| u.status == UserStatus::Active));
    assert_eq!(view.filtered_len(), 7);

    view.set_filter_field(FilterField::Status, "Activ");
    assert_eq!(view.filtered_len(), 0);
}

// 3) Page windows never exceed ten rows and run dry past the end
#[test]
fn pages_are_bounded_and_reset_on_filter_change() {
    let mut view = UsersView::new(Arc::new(MemoryStore::new()));
    view.set_users(many(25));
    assert_eq!(view.page_count(), 3);

    view.change_page(2);
    assert_eq!(view.current_page().len(), 5);
    view.change_page(3);
    assert!(view.current_page().is_empty());
    view.change_page(40);
    assert!(view.current_page().is_empty());

    view.set_filter_field(FilterField::Organization, "Lendsqr");
    assert_eq!(view.page().index, 0);
    assert_eq!(view.current_page().len(), 10);
    assert_eq!(view.filtered_len(), 12);

    view.next_page();
    view.next_page();
    view.next_page();
    assert_eq!(view.page().index, 1);
    assert_eq!(view.current_page().len(), 2);
}

// 4) Reset clears criteria and the persisted key
#[test]
fn reset_forgets_saved_criteria() {
    let store = Arc::new(MemoryStore::new());
    let mut view = UsersView::new(store.clone());
    view.set_users(many(5));
    view.submit_filter(FilterCriteria {
        email: "user3".into(),
        ..Default::default()
    });
    assert!(store.contains(FILTERS_KEY));

    view.reset_filter();
    assert_eq!(view.criteria(), &FilterCriteria::default());
    assert!(!store.contains(FILTERS_KEY));
    assert_eq!(view.filtered_len(), 5);
}

// 5) Criteria survive a restart through the file store
#[test]
fn criteria_rehydrate_across_sessions() {
    let dir = temp_dir("filters");
    let criteria = FilterCriteria {
        organization: "Irorun".into(),
        username: "user".into(),
        email: String::new(),
        date: "2021-03-14".into(),
        phone_number: "080".into(),
        status: "Pending".into(),
    };
    {
        let mut view = UsersView::new(Arc::new(FileStore::new(&dir)));
        view.submit_filter(criteria.clone());
    }
    let view = UsersView::new(Arc::new(FileStore::new(&dir)));
    assert_eq!(view.criteria(), &criteria);
    assert!(view.is_filtering());

    let _ = std::fs::remove_dir_all(&dir);
}

// 6) Username filter narrows a two-record collection to one
#[test]
fn username_filter_picks_single_record() {
    let first = user(1, "Org1", "alpha", UserStatus::Active);
    let second = user(2, "Org2", "bravo", UserStatus::Inactive);
    let mut view = UsersView::new(Arc::new(MemoryStore::new()));
    view.set_users(vec![first, second.clone()]);

    view.set_filter_field(FilterField::Username, second.username());
    let hits = view.filtered();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], &second);
}

// 7) A failing stats read leaves the users read untouched
#[tokio::test]
async fn stats_failure_is_isolated_from_users() {
    let users = many(3);
    let service = HalfBrokenService { users: users.clone() };
    let mut queries = DashboardQueries::new();
    queries.fetch_all(&service).await;

    assert!(!queries.users.is_error());
    assert_eq!(queries.users.data(), Some(&users));
    assert!(!queries.users.is_loading());
    assert!(queries.stats.is_error());
    assert!(queries.stats.data().is_none());
    assert_eq!(queries.stats.last_error().and_then(|e| e.status), Some(503));
}

// 8) Malformed selection payload reads back as nothing
#[test]
fn malformed_selection_reads_as_none() {
    let store = MemoryStore::new();
    store.set(SELECTED_USER_KEY, "{\"id\": 3, \"organization\":").unwrap();
    assert!(load_selected(&store).is_none());

    store.remove(SELECTED_USER_KEY).unwrap();
    assert!(load_selected(&store).is_none());
}

// 9) Selection hand-off keeps fields the dashboard never looks at
#[test]
fn selection_round_trip_keeps_opaque_blocks() {
    let mut chosen = user(9, "Lendstar", "grace", UserStatus::Blacklisted);
    chosen
        .extra
        .insert("guarantor".into(), json!({ "fullName": "Debby Ogana", "relationship": "Sister" }));
    let store = MemoryStore::new();
    assert!(select_user(&store, &chosen));
    let back = load_selected(&store).unwrap();
    assert_eq!(back, chosen);
    assert_eq!(back.block("guarantor").and_then(|g| g.get("relationship")), Some(&json!("Sister")));
}

// 10) Stale tickets never overwrite a newer outcome
#[test]
fn stale_fetch_is_dropped() {
    let mut queries = DashboardQueries::new();
    let old = queries.users.begin();
    let new = queries.users.begin();

    assert!(queries.apply(FetchEvent::Users(new, Ok(many(2)))));
    assert!(!queries.apply(FetchEvent::Users(old, Err(ApiError::new("late", None)))));
    assert!(!queries.users.is_error());
    assert_eq!(queries.users.data().map(Vec::len), Some(2));

    // A later refetch failure keeps the previous data but flags the error.
    let again = queries.users.begin();
    assert!(queries.users.is_fetching());
    assert!(!queries.users.is_loading());
    queries.apply(FetchEvent::Users(again, Err(ApiError::new("", None))));
    assert!(queries.users.is_error());
    assert_eq!(queries.users.data().map(Vec::len), Some(2));
}

// 11) A broken store degrades to defaults instead of failing
#[test]
fn broken_store_never_panics() {
    let store: Arc<dyn KeyValueStore> = Arc::new(BrokenStore);
    let mut view = UsersView::new(store.clone());
    assert_eq!(view.criteria(), &FilterCriteria::default());

    view.set_users(many(4));
    view.set_filter_field(FilterField::Organization, "Irorun");
    assert_eq!(view.filtered_len(), 2);
    view.reset_filter();
    assert_eq!(view.filtered_len(), 4);

    assert!(!select_user(store.as_ref(), &view.users()[0]));
    assert!(load_selected(store.as_ref()).is_none());
}

fn loaded_app(store: Arc<dyn KeyValueStore>, users: Vec<UserRecord>) -> AppState {
    let mut app = AppState::new(store, Keymap::new_defaults());
    let ticket = app.queries.users.begin();
    app.apply_fetch(FetchEvent::Users(ticket, Ok(users)));
    app
}

// 12) Filter form: pick an organization, submit, then reset from the list
#[test]
fn filter_form_submit_and_reset_flow() {
    let store = Arc::new(MemoryStore::new());
    let mut app = loaded_app(store.clone(), many(12));
    assert_eq!(app.view.filtered_len(), 12);

    assert_eq!(handle_key(&mut app, press(KeyCode::Char('f'))), Command::None);
    assert_eq!(app.input_mode, InputMode::FilterForm);
    assert!(app.view.is_filter_panel_open());

    // Organization selector: "" -> first seen organization ("Irorun").
    handle_key(&mut app, press(KeyCode::Right));
    // Wrap upwards from the first row onto the Filter button.
    handle_key(&mut app, press(KeyCode::Up));
    handle_key(&mut app, press(KeyCode::Enter));

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(!app.view.is_filter_panel_open());
    assert_eq!(app.view.criteria().organization, "Irorun");
    assert_eq!(app.view.filtered_len(), 6);
    assert!(store.contains(FILTERS_KEY));

    handle_key(&mut app, press(KeyCode::Char('x')));
    assert!(!app.view.is_filtering());
    assert_eq!(app.view.filtered_len(), 12);
    assert!(!store.contains(FILTERS_KEY));
}

// 13) Typing into a text field and closing with Esc discards the draft
#[test]
fn escape_discards_filter_draft() {
    let mut app = loaded_app(Arc::new(MemoryStore::new()), many(5));
    handle_key(&mut app, press(KeyCode::Char('f')));
    handle_key(&mut app, press(KeyCode::Down));
    for c in "user2".chars() {
        handle_key(&mut app, press(KeyCode::Char(c)));
    }
    assert_eq!(
        app.filter_form.as_ref().map(|f| f.draft.username.as_str()),
        Some("user2")
    );
    handle_key(&mut app, press(KeyCode::Esc));
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.filter_form.is_none());
    assert_eq!(app.view.criteria(), &FilterCriteria::default());
}

// 14) Enter hands the highlighted user to the details screen through the store
#[test]
fn open_details_goes_through_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut app = loaded_app(store.clone(), many(3));

    handle_key(&mut app, press(KeyCode::Down));
    handle_key(&mut app, press(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Details);
    assert!(store.contains(SELECTED_USER_KEY));
    assert_eq!(app.detail.as_ref().map(|u| u.id), Some(2));

    handle_key(&mut app, press(KeyCode::Esc));
    assert_eq!(app.screen, Screen::Users);
    assert_eq!(handle_key(&mut app, press(KeyCode::Char('r'))), Command::Refresh);
    assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), Command::Quit);
}

// 15) Paging keys move through the filtered view
#[test]
fn paging_keys_walk_pages() {
    let mut app = loaded_app(Arc::new(MemoryStore::new()), many(35));
    handle_key(&mut app, press(KeyCode::End));
    assert_eq!(app.view.page().index, 3);
    assert_eq!(app.view.current_page().len(), 5);
    handle_key(&mut app, press(KeyCode::Left));
    assert_eq!(app.view.page().index, 2);
    handle_key(&mut app, press(KeyCode::Home));
    assert_eq!(app.view.page().index, 0);
}

fn render_to_text(app: &AppState) -> String {
    use ratatui::{Terminal, backend::TestBackend};
    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal.draw(|f| lendadmin::ui::render(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let symbols: Vec<&str> = buffer.content().iter().map(|c| c.symbol()).collect();
    symbols
        .chunks(width)
        .map(|row| row.concat())
        .collect::<Vec<_>>()
        .join("\n")
}

// 16) A failed refetch replaces the table with the error state
#[test]
fn failed_refetch_hides_previous_rows() {
    let mut app = loaded_app(
        Arc::new(MemoryStore::new()),
        vec![user(1, "Org1", "alpha", UserStatus::Active)],
    );
    let before = render_to_text(&app);
    assert!(before.contains("Org1"));
    assert!(!before.contains("Something went wrong"));

    let ticket = app.queries.users.begin();
    app.apply_fetch(FetchEvent::Users(
        ticket,
        Err(ApiError::new("Request failed with status code 500", Some(500))),
    ));
    assert!(app.queries.users.data().is_some());

    let after = render_to_text(&app);
    assert!(after.contains("Something went wrong"));
    assert!(!after.contains("Org1"));

    // A successful retry brings the table back.
    let ticket = app.queries.users.begin();
    app.apply_fetch(FetchEvent::Users(ticket, Ok(vec![user(2, "Org2", "bravo", UserStatus::Pending)])));
    let retried = render_to_text(&app);
    assert!(retried.contains("Org2"));
    assert!(!retried.contains("Something went wrong"));
}

// 17) Saved criteria apply to a collection that arrives later
#[test]
fn saved_criteria_filter_late_collection() {
    let store = Arc::new(MemoryStore::new());
    store.set(FILTERS_KEY, r#"{"organization":"Org2"}"#).unwrap();

    let mut app = AppState::new(store, Keymap::new_defaults());
    assert_eq!(app.view.criteria().organization, "Org2");
    assert_eq!(app.view.filtered_len(), 0);

    let ticket = app.queries.users.begin();
    app.apply_fetch(FetchEvent::Users(
        ticket,
        Ok(vec![
            user(1, "Org1", "alpha", UserStatus::Active),
            user(2, "Org2", "bravo", UserStatus::Inactive),
            user(3, "Org2", "charlie", UserStatus::Pending),
        ]),
    ));

    assert_eq!(app.view.page().index, 0);
    assert_eq!(app.view.filtered_len(), 2);
    assert!(app.view.current_page().iter().all(|u| u.organization == "Org2"));
    assert_eq!(app.view.users().len(), 3);
}

// 18) Pagination footer reports the window of the current page
#[test]
fn footer_shows_page_window() {
    let mut app = loaded_app(Arc::new(MemoryStore::new()), many(25));
    app.change_page(1);
    let text = render_to_text(&app);
    assert!(text.contains("Page 2/3"));
    assert!(text.contains("showing 11-20 out of 25"));
}

// 19) Details screen lists the opaque blocks of the handed-off user
#[test]
fn details_show_guarantors_and_socials() {
    let mut chosen = user(5, "Lendsqr", "grace", UserStatus::Active);
    chosen.extra.insert("socials".into(), json!({ "twitter": "@grace_effiom" }));
    chosen.extra.insert(
        "guarantor".into(),
        json!({ "fullName": "Debby Ogana", "phoneNumber": "07060780922", "relationship": "Sister" }),
    );
    chosen.extra.insert(
        "educationAndEmployment".into(),
        json!({ "levelOfEducation": "B.Sc", "monthlyIncome": ["200000", "400000"] }),
    );
    let mut app = loaded_app(Arc::new(MemoryStore::new()), vec![chosen]);
    handle_key(&mut app, press(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Details);

    let text = render_to_text(&app);
    assert!(text.contains("Guarantor"));
    assert!(text.contains("Debby Ogana"));
    assert!(text.contains("@grace_effiom"));
    assert!(text.contains("200000 - 400000"));
    assert!(!text.contains("Second Guarantor"));

    app.detail = None;
    let empty = render_to_text(&app);
    assert!(empty.contains("User Details"));
    assert!(!empty.contains("Username"));
}
