use crate::app::filterconf::FilterCriteria;
use crate::model::UserRecord;

/// Whether `user` passes every non-empty clause of `criteria`.
///
/// Organization, username, email and phone number match as case-sensitive
/// substrings; date and status must be equal.
pub fn matches(user: &UserRecord, criteria: &FilterCriteria) -> bool {
    contains(&user.organization, &criteria.organization)
        && contains(user.username(), &criteria.username)
        && contains(user.email(), &criteria.email)
        && contains(user.phone_number(), &criteria.phone_number)
        && equals(&user.date_joined, &criteria.date)
        && equals(user.status.as_str(), &criteria.status)
}

fn contains(value: &str, needle: &str) -> bool {
    needle.is_empty() || value.contains(needle)
}

fn equals(value: &str, wanted: &str) -> bool {
    wanted.is_empty() || value == wanted
}

/// Indices of the users passing `criteria`, in source order.
pub fn filter_indices(users: &[UserRecord], criteria: &FilterCriteria) -> Vec<usize> {
    if !criteria.is_active() {
        return (0..users.len()).collect();
    }
    users
        .iter()
        .enumerate()
        .filter(|(_, u)| matches(u, criteria))
        .map(|(i, _)| i)
        .collect()
}

/// Distinct organizations in first-seen order.
pub fn organizations(users: &[UserRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    users
        .iter()
        .filter(|u| seen.insert(u.organization.as_str()))
        .map(|u| u.organization.clone())
        .collect()
}
