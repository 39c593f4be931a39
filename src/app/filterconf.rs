//! Filter criteria: the six-field form state and its persistence.
//!
//! Criteria are stored as JSON under [`FILTERS_KEY`] in the injected
//! [`KeyValueStore`]. Loading never fails: a missing, unreadable or malformed
//! entry yields the all-empty default, and a stored object lacking some keys
//! gets those keys back as empty strings.

use serde::{Deserialize, Serialize};

use crate::store::{self, KeyValueStore};

/// Store key holding the active criteria.
pub const FILTERS_KEY: &str = "userFilters";

/// Criteria set applied to the user list. An empty field means "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub organization: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub date: String,
    pub status: String,
}

/// One field of [`FilterCriteria`], in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
    Organization,
    Username,
    Email,
    Date,
    PhoneNumber,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Organization,
        FilterField::Username,
        FilterField::Email,
        FilterField::Date,
        FilterField::PhoneNumber,
        FilterField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Organization => "Organization",
            FilterField::Username => "Username",
            FilterField::Email => "Email",
            FilterField::Date => "Date",
            FilterField::PhoneNumber => "Phone Number",
            FilterField::Status => "Status",
        }
    }

    /// Fields chosen from a list rather than typed.
    pub fn is_select(self) -> bool {
        matches!(self, FilterField::Organization | FilterField::Status)
    }
}

impl FilterCriteria {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Organization => &self.organization,
            FilterField::Username => &self.username,
            FilterField::Email => &self.email,
            FilterField::Date => &self.date,
            FilterField::PhoneNumber => &self.phone_number,
            FilterField::Status => &self.status,
        }
    }

    pub fn get_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Organization => &mut self.organization,
            FilterField::Username => &mut self.username,
            FilterField::Email => &mut self.email,
            FilterField::Date => &mut self.date,
            FilterField::PhoneNumber => &mut self.phone_number,
            FilterField::Status => &mut self.status,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// True when at least one field constrains the list.
    pub fn is_active(&self) -> bool {
        FilterField::ALL.iter().any(|f| !self.get(*f).is_empty())
    }

    /// Short `field=value` summary of the non-empty fields.
    pub fn summary(&self) -> String {
        FilterField::ALL
            .iter()
            .filter(|f| !self.get(**f).is_empty())
            .map(|f| format!("{}={}", f.label().to_ascii_lowercase(), self.get(*f)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Rehydrate from the store, falling back to all-empty.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store::load_json(store, FILTERS_KEY).unwrap_or_default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> bool {
        store::save_json(store, FILTERS_KEY, self)
    }

    pub fn clear(store: &dyn KeyValueStore) {
        store::remove_key(store, FILTERS_KEY);
    }
}
