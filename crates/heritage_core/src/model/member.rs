//! Family member domain model.
//!
//! # Responsibility
//! - Define the single record type every other module operates on.
//! - Provide constructors that mint stable ids and validation for the
//!   persistence boundary.
//!
//! # Invariants
//! - `id` is stable and never reused for another member.
//! - `parents` holds at most two distinct ids.
//! - `children` is derived data: it mirrors the `parents` field of other
//!   records and can always be rebuilt from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable opaque identifier for one family member.
///
/// Kept as a type alias: ids from legacy data are short numeric strings,
/// freshly minted ids are v4 UUIDs, and both must round-trip unchanged.
pub type MemberId = String;

/// Upper bound on the `parents` field.
pub const MAX_PARENTS: usize = 2;

/// Per-field edit markers for the translatable text fields.
///
/// A flag is set when the user edits the field directly, so localized
/// display text is never confused with a deliberate edit. This replaces
/// inference by string comparison against the active catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverrides {
    /// `name` was edited by the user.
    #[serde(default)]
    pub name: bool,
    /// `birthplace` was edited by the user.
    #[serde(default)]
    pub birthplace: bool,
    /// `bio` was edited by the user.
    #[serde(default)]
    pub bio: bool,
}

impl TextOverrides {
    /// Returns whether no field is flagged.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// One person record in the family tree.
///
/// Link fields reference other members by id. References to ids absent from
/// the current collection (dangling references) are legal input everywhere
/// and are tolerated silently by reconciliation and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    /// Stable opaque id, immutable once created.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Calendar birth date, required.
    pub birth_date: NaiveDate,
    /// Calendar death date. Should not precede `birth_date` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Free-text birthplace.
    pub birthplace: String,
    /// Free-text biography.
    pub bio: String,
    /// Presentation metadata, opaque to core logic.
    pub photo_url: String,
    /// Presentation metadata, opaque to core logic.
    pub photo_hint: String,
    /// Up to two parent ids, ordered.
    #[serde(default)]
    pub parents: Vec<MemberId>,
    /// At most one spouse id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<MemberId>,
    /// Ids of members whose `parents` include this member. Insertion order
    /// carries no meaning.
    #[serde(default)]
    pub children: Vec<MemberId>,
    /// Edit markers for the translatable text fields.
    #[serde(default, skip_serializing_if = "TextOverrides::is_unset")]
    pub overrides: TextOverrides,
}

/// Validation failures for member records.
///
/// Enforced at the persistence boundary; the reconciler and materializer
/// stay total and accept any record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// `name` is blank after trim.
    BlankName,
    /// More than [`MAX_PARENTS`] parent ids.
    TooManyParents(usize),
    /// The same parent id appears twice.
    DuplicateParent(MemberId),
    /// Member listed as its own parent.
    SelfParent(MemberId),
    /// Member listed as its own spouse.
    SelfSpouse(MemberId),
    /// `death_date` precedes `birth_date`.
    DeathBeforeBirth {
        birth_date: NaiveDate,
        death_date: NaiveDate,
    },
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "member name must not be blank"),
            Self::TooManyParents(count) => {
                write!(f, "member has {count} parents, at most {MAX_PARENTS} allowed")
            }
            Self::DuplicateParent(id) => write!(f, "duplicate parent id: {id}"),
            Self::SelfParent(id) => write!(f, "member cannot be its own parent: {id}"),
            Self::SelfSpouse(id) => write!(f, "member cannot be its own spouse: {id}"),
            Self::DeathBeforeBirth {
                birth_date,
                death_date,
            } => write!(
                f,
                "death date {death_date} precedes birth date {birth_date}"
            ),
        }
    }
}

impl Error for MemberValidationError {}

impl FamilyMember {
    /// Creates a member with a freshly minted stable id.
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        birthplace: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, birth_date, birthplace)
    }

    /// Creates a member with a caller-provided stable id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        birth_date: NaiveDate,
        birthplace: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date,
            death_date: None,
            birthplace: birthplace.into(),
            bio: String::new(),
            photo_url: String::new(),
            photo_hint: String::new(),
            parents: Vec::new(),
            spouse: None,
            children: Vec::new(),
            overrides: TextOverrides::default(),
        }
    }

    /// Validates record-local invariants.
    ///
    /// # Contract
    /// - Called by repository write paths before any SQL mutation.
    /// - Does not inspect other records; cross-record consistency is the
    ///   reconciler's job.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::BlankName);
        }
        if self.parents.len() > MAX_PARENTS {
            return Err(MemberValidationError::TooManyParents(self.parents.len()));
        }
        for (index, parent_id) in self.parents.iter().enumerate() {
            if *parent_id == self.id {
                return Err(MemberValidationError::SelfParent(self.id.clone()));
            }
            if self.parents[..index].contains(parent_id) {
                return Err(MemberValidationError::DuplicateParent(parent_id.clone()));
            }
        }
        if self.spouse.as_deref() == Some(self.id.as_str()) {
            return Err(MemberValidationError::SelfSpouse(self.id.clone()));
        }
        if let Some(death_date) = self.death_date {
            if death_date < self.birth_date {
                return Err(MemberValidationError::DeathBeforeBirth {
                    birth_date: self.birth_date,
                    death_date,
                });
            }
        }
        Ok(())
    }
}

/// Recomputes every `children` field from the `parents` fields.
///
/// `children` is derived data; any stored or imported collection is
/// normalized through this before use so parent/child symmetry holds
/// regardless of what was persisted. Child ordering follows collection
/// order of the children.
pub fn rebuild_children(members: &mut [FamilyMember]) {
    let child_ids: Vec<MemberId> = members.iter().map(|member| member.id.clone()).collect();
    let mut children_of: HashMap<MemberId, Vec<MemberId>> = HashMap::new();
    for (index, child_id) in child_ids.iter().enumerate() {
        for parent_id in &members[index].parents {
            children_of
                .entry(parent_id.clone())
                .or_default()
                .push(child_id.clone());
        }
    }
    for member in members.iter_mut() {
        member.children = children_of.remove(&member.id).unwrap_or_default();
    }
}
