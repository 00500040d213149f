//! Account data-access core for simplebank.
//! Owns the `accounts` schema and every statement issued against it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::account::{
    Account, AccountId, CreateAccountParams, ListAccountsParams, ParamsValidationError,
    UpdateAccountParams,
};
pub use repo::account_repo::{AccountError, AccountResult, AccountStore, SqliteAccountStore};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
