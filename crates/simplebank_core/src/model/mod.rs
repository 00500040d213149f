//! Account domain model.
//!
//! # Responsibility
//! - Define the persisted account record and the parameter objects that
//!   drive each store operation.
//!
//! # Invariants
//! - Every account is identified by a store-assigned `AccountId`.
//! - Deletion removes the row; there is no tombstone state.

pub mod account;
