//! Core domain logic for the Heritage family-tree application.
//! This crate is the single source of truth for relationship invariants.

pub mod db;
pub mod i18n;
pub mod insight;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use i18n::{
    canonicalize_member, localize_member, CatalogError, MessageCatalog, Translation,
    DEFAULT_LOCALE, SUPPORTED_LOCALES,
};
pub use insight::{
    build_prompt, historical_context_with_fallback, HistoricalInsight, InsightError,
    InsightProvider, InsightRequest, UnconfiguredProvider,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{
    rebuild_children, FamilyMember, MemberId, MemberValidationError, TextOverrides, MAX_PARENTS,
};
pub use model::seed::{initial_members, SeedError};
pub use repo::member_repo::{
    MemberRepoError, MemberRepoResult, MemberRepository, SqliteMemberRepository,
};
pub use service::family_service::{FamilyService, FamilyServiceError};
pub use tree::layout::{materialize, TreeLayout, TreeNode};
pub use tree::reconcile::reconcile;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
