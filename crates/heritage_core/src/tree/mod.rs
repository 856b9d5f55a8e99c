//! Family graph maintenance and rendering order.
//!
//! # Responsibility
//! - Keep spouse and parent/child links mutually consistent after edits.
//! - Compute a deterministic, duplicate-free render order for the tree.
//!
//! # Invariants
//! - Both operations are total: dangling references never produce errors.
//! - Both operations take the collection as a snapshot and return new data;
//!   nothing here mutates shared state.

pub mod layout;
pub mod reconcile;
