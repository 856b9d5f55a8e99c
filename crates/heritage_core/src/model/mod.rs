//! Domain model for the family-tree core.
//!
//! # Responsibility
//! - Define the canonical family member record and its link fields.
//! - Keep one entity shape shared by reconciliation, rendering and storage.
//!
//! # Invariants
//! - Every member is identified by a stable `MemberId`.
//! - Reciprocal link consistency is re-established by `tree::reconcile`,
//!   never assumed from raw input.

pub mod member;
pub mod seed;
