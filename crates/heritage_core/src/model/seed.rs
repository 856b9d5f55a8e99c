//! Embedded starter family data.
//!
//! # Responsibility
//! - Ship the default family collection used when storage is empty.
//! - Normalize the embedded records before handing them to callers.

use crate::model::member::{rebuild_children, FamilyMember};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SEED_JSON: &str = include_str!("seed.json");

/// Errors from decoding the embedded seed collection.
#[derive(Debug)]
pub enum SeedError {
    /// Embedded JSON does not decode into member records.
    Parse(serde_json::Error),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid embedded seed data: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}

/// Returns the embedded starter collection.
///
/// `children` fields are rebuilt from `parents` before returning, so the
/// result satisfies parent/child symmetry even if the embedded file drifts.
pub fn initial_members() -> Result<Vec<FamilyMember>, SeedError> {
    let mut members: Vec<FamilyMember> =
        serde_json::from_str(SEED_JSON).map_err(SeedError::Parse)?;
    rebuild_children(&mut members);
    Ok(members)
}
