//! Use-case orchestration for editing sessions.
//!
//! # Responsibility
//! - Own the current in-memory collection and coordinate reconcile,
//!   persistence and localization around member saves.
//! - Keep callers decoupled from storage details.

pub mod family_service;
