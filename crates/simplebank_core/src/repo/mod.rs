//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for account records.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`,
//!   `ConstraintViolation`) in addition to DB transport errors.

pub mod account_repo;
