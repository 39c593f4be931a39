//! Command line and environment configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, simple_error};

pub const DEFAULT_API_URL: &str = "https://run.mocky.io/";
const APP_DIR: &str = "lendadmin";

/// Lending platform admin dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "lendadmin")]
#[command(about = "Browse, filter and inspect lending platform users")]
#[command(version)]
pub struct Args {
    /// Base URL of the platform API
    #[arg(long, env = "LENDADMIN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token sent with authenticated requests
    #[arg(long, env = "LENDADMIN_API_TOKEN")]
    pub api_token: Option<String>,

    /// Directory holding saved filters, the selected user and logs
    #[arg(long, env = "LENDADMIN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Log filter, e.g. `info` or `lendadmin=debug`
    #[arg(long, env = "LENDADMIN_LOG", default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to `<data-dir>/lendadmin.log`)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Reject settings the dashboard cannot start with.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(simple_error(format!("api url must be http(s): {url:?}")));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("lendadmin.log"))
    }

    pub fn keybinds_path(&self) -> PathBuf {
        self.data_dir().join("keybinds.conf")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Empty tokens count as no token.
    pub fn token(&self) -> Option<String> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}
