//! Request/response state for the two dashboard reads.
//!
//! Each read gets its own [`QueryState`]; a failure in one never touches the
//! other. Attempts are ticketed: `begin` hands out a ticket and `settle`
//! ignores results carrying an older one, so a slow response can't overwrite
//! a newer one.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{ApiError, UserService};
use crate::model::{Stats, UserRecord};

pub type Ticket = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct QueryState<T> {
    data: Option<T>,
    loading: bool,
    fetching: bool,
    error: bool,
    last_error: Option<ApiError>,
    latest: Ticket,
    settled_once: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            fetching: false,
            error: false,
            last_error: None,
            latest: 0,
            settled_once: false,
        }
    }
}

impl<T> QueryState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an attempt. `loading` only covers the period before the first
    /// settle; later attempts show up through `fetching`.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.fetching = true;
        if !self.settled_once {
            self.loading = true;
        }
        self.latest
    }

    /// Apply an attempt's outcome. Returns `false` when the ticket is stale
    /// and the outcome was dropped.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        if ticket != self.latest {
            debug!(ticket, latest = self.latest, "dropping stale query result");
            return false;
        }
        self.fetching = false;
        self.loading = false;
        self.settled_once = true;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = false;
                self.last_error = None;
            }
            Err(err) => {
                self.error = true;
                self.last_error = Some(err);
            }
        }
        true
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }
}

/// Outcome of a background fetch, sent back to the event loop.
#[derive(Debug)]
pub enum FetchEvent {
    Users(Ticket, Result<Vec<UserRecord>, ApiError>),
    Stats(Ticket, Result<Stats, ApiError>),
}

#[derive(Clone, Debug, Default)]
pub struct DashboardQueries {
    pub users: QueryState<Vec<UserRecord>>,
    pub stats: QueryState<Stats>,
}

impl DashboardQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire both reads concurrently and settle each on its own.
    pub async fn fetch_all(&mut self, service: &dyn UserService) {
        let users_ticket = self.users.begin();
        let stats_ticket = self.stats.begin();
        let (users, stats) = tokio::join!(service.list_users(), service.stats());
        self.apply(FetchEvent::Users(users_ticket, users));
        self.apply(FetchEvent::Stats(stats_ticket, stats));
    }

    pub async fn refetch_users(&mut self, service: &dyn UserService) {
        let ticket = self.users.begin();
        let users = service.list_users().await;
        self.apply(FetchEvent::Users(ticket, users));
    }

    pub async fn refetch_stats(&mut self, service: &dyn UserService) {
        let ticket = self.stats.begin();
        let stats = service.stats().await;
        self.apply(FetchEvent::Stats(ticket, stats));
    }

    /// Returns whether the event changed state.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        match event {
            FetchEvent::Users(ticket, result) => {
                if let Err(e) = &result {
                    warn!(error = %e, status = ?e.status, "users query failed");
                }
                self.users.settle(ticket, result)
            }
            FetchEvent::Stats(ticket, result) => {
                if let Err(e) = &result {
                    warn!(error = %e, status = ?e.status, "stats query failed");
                }
                self.stats.settle(ticket, result)
            }
        }
    }
}

/// Spawn the users read on the runtime; the outcome arrives on `tx`.
pub fn spawn_users_fetch(
    state: &mut QueryState<Vec<UserRecord>>,
    service: &Arc<dyn UserService>,
    tx: &tokio::sync::mpsc::UnboundedSender<FetchEvent>,
) {
    let ticket = state.begin();
    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.list_users().await;
        let _ = tx.send(FetchEvent::Users(ticket, result));
    });
}

/// Spawn the stats read on the runtime; the outcome arrives on `tx`.
pub fn spawn_stats_fetch(
    state: &mut QueryState<Stats>,
    service: &Arc<dyn UserService>,
    tx: &tokio::sync::mpsc::UnboundedSender<FetchEvent>,
) {
    let ticket = state.begin();
    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.stats().await;
        let _ = tx.send(FetchEvent::Stats(ticket, result));
    });
}
