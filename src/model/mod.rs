//! Wire types for the lending backend.
//!
//! Only the fields the dashboard filters on are typed; every other block of a
//! user payload (employment, socials, guarantors, account details, tier, ...)
//! is carried through verbatim in `extra`.
//!
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Account status of a platform user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
    Blacklisted,
}

impl UserStatus {
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Blacklisted,
    ];

    /// Name as sent by the backend and as matched by the status filter.
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
            UserStatus::Blacklisted => "Blacklisted",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase display token for a status.
pub fn status_class(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "active",
        UserStatus::Inactive => "inactive",
        UserStatus::Pending => "pending",
        UserStatus::Blacklisted => "blacklisted",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInformation {
    pub username: String,
    pub email: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub organization: String,
    pub date_joined: String,
    pub status: UserStatus,
    pub personal_information: PersonalInformation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn username(&self) -> &str {
        &self.personal_information.username
    }

    pub fn email(&self) -> &str {
        &self.personal_information.email
    }

    pub fn phone_number(&self) -> &str {
        &self.personal_information.phone_number
    }

    /// Full name from the opaque personal block, if the backend sent one.
    pub fn full_name(&self) -> Option<&str> {
        self.personal_information
            .extra
            .get("fullName")
            .and_then(Value::as_str)
    }

    pub fn tier(&self) -> Option<u64> {
        match self.extra.get("tier")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// A nested opaque block such as `accountDetails` or `guarantor`.
    pub fn block(&self, name: &str) -> Option<&Map<String, Value>> {
        self.extra.get(name).and_then(Value::as_object)
    }
}

/// Aggregate counters shown on the dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: u64,
    pub active_users: u64,
    pub loan_users: u64,
    pub savings_users: u64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
