//! Family editing session service.
//!
//! # Responsibility
//! - Hold the single authoritative in-memory collection for one session.
//! - Run every save through validate, reconcile, persist, in that order.
//!
//! # Invariants
//! - The in-memory collection only changes after storage confirms a write.
//! - Saves require `&mut self`, so writes within one session cannot
//!   interleave.
//! - Storage is a downstream mirror; `reload` is the only path that adopts
//!   stored state wholesale.

use crate::i18n::{canonicalize_member, MessageCatalog};
use crate::model::member::{FamilyMember, MemberValidationError};
use crate::repo::member_repo::{MemberRepoError, MemberRepository};
use crate::tree::layout::{materialize, TreeLayout};
use crate::tree::reconcile::reconcile;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from editing-session operations.
#[derive(Debug)]
pub enum FamilyServiceError {
    /// The submitted record failed validation.
    Validation(MemberValidationError),
    /// Persistence failed; the in-memory collection was left untouched.
    Repo(MemberRepoError),
}

impl Display for FamilyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FamilyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<MemberValidationError> for FamilyServiceError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MemberRepoError> for FamilyServiceError {
    fn from(value: MemberRepoError) -> Self {
        Self::Repo(value)
    }
}

/// One editing session over the family collection.
///
/// Replaces module-level mutable state with an explicit store object passed
/// to callers; the session owns the only mutable view of the collection.
pub struct FamilyService<R: MemberRepository> {
    repo: R,
    members: Vec<FamilyMember>,
}

impl<R: MemberRepository> FamilyService<R> {
    /// Builds a session from stored state.
    pub fn load(repo: R) -> Result<Self, FamilyServiceError> {
        let members = repo.load_all()?;
        Ok(Self { repo, members })
    }

    /// Installs starter data when storage is empty.
    ///
    /// Returns whether seeding happened.
    pub fn seed_if_empty(
        &mut self,
        seed: Vec<FamilyMember>,
    ) -> Result<bool, FamilyServiceError> {
        if !self.members.is_empty() {
            return Ok(false);
        }
        self.repo.replace_all(&seed)?;
        self.members = seed;
        info!(
            "event=collection_seed module=service status=ok members={}",
            self.members.len()
        );
        Ok(true)
    }

    /// Current collection snapshot.
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    /// Looks up one member by id.
    pub fn get_member(&self, id: &str) -> Option<&FamilyMember> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Computes the render layout for the current collection.
    pub fn tree(&self) -> TreeLayout {
        materialize(&self.members)
    }

    /// Saves one added/edited member.
    ///
    /// Validates the record, reconciles reciprocal links across the
    /// collection, persists the result, and only then swaps the in-memory
    /// state. On persistence failure the session keeps showing the previous
    /// consistent collection.
    pub fn save_member(
        &mut self,
        updated: FamilyMember,
    ) -> Result<FamilyMember, FamilyServiceError> {
        updated.validate()?;

        let next = reconcile(&self.members, updated.clone());
        self.repo.replace_all(&next)?;
        self.members = next;

        info!(
            "event=member_save module=service status=ok member_id={} members={}",
            updated.id,
            self.members.len()
        );
        Ok(updated)
    }

    /// Saves a member edited through a localized view.
    ///
    /// Fields the user did not touch are restored to canonical text before
    /// persisting, so displayed translations never leak into stored data.
    /// `canonical` should be the default-locale catalog.
    pub fn save_translated_member(
        &mut self,
        canonical: &MessageCatalog,
        updated: FamilyMember,
    ) -> Result<FamilyMember, FamilyServiceError> {
        self.save_member(canonicalize_member(canonical, updated))
    }

    /// Discards in-memory state and re-adopts stored state.
    pub fn reload(&mut self) -> Result<(), FamilyServiceError> {
        self.members = self.repo.load_all()?;
        info!(
            "event=collection_reload module=service status=ok members={}",
            self.members.len()
        );
        Ok(())
    }
}
