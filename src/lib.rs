//! Library crate for lendadmin.
//!
//! This crate exposes the building blocks of the dashboard:
//! - HTTP client wrapper and user service (`api`)
//! - Application state, filter engine state and update loop (`app`)
//! - Command line configuration (`config`)
//! - Error and result types (`error`)
//! - Wire records for users and statistics (`model`)
//! - Fetch state with loading and error flags (`query`)
//! - Criteria matching over user records (`search`)
//! - Injected key-value persistence (`store`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `lendadmin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod search;
pub mod store;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
