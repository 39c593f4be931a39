//! Hand-off of the chosen user from the list to the details screen.

use crate::model::UserRecord;
use crate::store::{self, KeyValueStore};

/// Store key holding the user opened in the details screen.
pub const SELECTED_USER_KEY: &str = "selectedUser";

/// Persist `user` for the details screen. Returns whether it was stored.
pub fn select_user(store: &dyn KeyValueStore, user: &UserRecord) -> bool {
    store::save_json(store, SELECTED_USER_KEY, user)
}

/// The last selected user, or `None` if nothing (valid) was stored.
pub fn load_selected(store: &dyn KeyValueStore) -> Option<UserRecord> {
    store::load_json(store, SELECTED_USER_KEY)
}
