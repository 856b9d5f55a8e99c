//! Persistence layer abstractions and SQLite implementation.
//!
//! # Responsibility
//! - Define the storage contract for the full member collection.
//! - Isolate SQL details from reconciliation and session orchestration.
//!
//! # Invariants
//! - Writes validate every record before touching SQL.
//! - The stored collection round-trips in order; `children` are derived
//!   data and are rebuilt on load.

pub mod member_repo;
