//! Account record and store parameter objects.
//!
//! # Responsibility
//! - Define the canonical account shape returned by every store read.
//! - Define one parameter value object per write/list operation.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - `owner` and `currency` are write-once; only `balance` is updatable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned account identifier. Positive once created.
pub type AccountId = i64;

/// Persisted bank account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    /// Amount in currency minor units.
    pub balance: i64,
    /// Three-letter uppercase currency code, checked by the store.
    pub currency: String,
    /// Unix epoch milliseconds, assigned at insert.
    pub created_at: i64,
}

/// Input for creating one account.
///
/// Values are passed to the store as-is; range and format checks are left to
/// table constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountParams {
    pub owner: String,
    pub balance: i64,
    pub currency: String,
}

impl CreateAccountParams {
    pub fn new(owner: impl Into<String>, balance: i64, currency: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            balance,
            currency: currency.into(),
        }
    }
}

/// Input for replacing the balance of one existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountParams {
    pub id: AccountId,
    pub balance: i64,
}

/// Pagination window for listing accounts in id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsParams {
    /// Maximum rows to return. Must be greater than zero.
    pub limit: u32,
    /// Number of leading rows to skip.
    pub offset: u32,
}

impl ListAccountsParams {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Checks pagination bounds before any SQL is issued.
    pub fn validate(&self) -> Result<(), ParamsValidationError> {
        if self.limit == 0 {
            return Err(ParamsValidationError::ZeroLimit);
        }
        Ok(())
    }
}

/// Parameter object rejected before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsValidationError {
    ZeroLimit,
}

impl Display for ParamsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "list limit must be greater than zero"),
        }
    }
}

impl Error for ParamsValidationError {}
