//! Backend routes, relative to the configured base URL.

pub const API_VERSION: &str = "v3";

pub const USERS_RESOURCE: &str = "2acd43e6-bf0c-49c7-b8fa-1a0e0ce7f321";
pub const STATS_RESOURCE: &str = "714f087e-a917-4771-aa50-6746cfac0e5c";

pub fn route(resource: &str) -> String {
    format!("{API_VERSION}/{resource}")
}

pub fn users() -> String {
    route(USERS_RESOURCE)
}

pub fn stats() -> String {
    route(STATS_RESOURCE)
}
