//! Deterministic render-order computation for the family tree.
//!
//! # Responsibility
//! - Detect root members and produce one nested render tree per root.
//! - Guarantee every member at most one placement (primary placement).
//!
//! # Invariants
//! - Roots keep the collection's relative order.
//! - Traversal per node visits the spouse first, then the couple's children
//!   in member order; one visited set is shared across all roots.
//! - Dangling child/spouse references are skipped, never an error.

use crate::model::member::{FamilyMember, MemberId};
use std::collections::{HashMap, HashSet};

/// One rendered placement: a member, an optionally co-located spouse, and
/// nested child placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Member rendered at this position.
    pub member_id: MemberId,
    /// Spouse drawn beside the member, when present in the collection and
    /// not already placed elsewhere.
    pub spouse_id: Option<MemberId>,
    /// Generation depth below the root. Drives render staggering only; it
    /// has no effect on logical structure.
    pub depth: u32,
    /// Nested placements for the couple's children: this member's, then any
    /// of the co-located spouse's not already placed.
    pub children: Vec<TreeNode>,
}

/// Render-ready ordering for a member collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLayout {
    /// Collection has no members; callers show an explicit empty state
    /// instead of silently rendering nothing.
    Empty,
    /// One render tree per disconnected root, in collection order.
    Forest(Vec<TreeNode>),
}

impl TreeLayout {
    /// Returns the forest nodes, empty for [`TreeLayout::Empty`].
    pub fn trees(&self) -> &[TreeNode] {
        match self {
            Self::Empty => &[],
            Self::Forest(trees) => trees,
        }
    }
}

/// Computes the render order for a flat member collection.
///
/// A member is a root when it has no parents or when none of its parent ids
/// resolve within the collection. Each root not already placed under an
/// earlier root starts a new tree; the shared visited set keeps every member
/// at exactly one placement even when subtrees are reachable from several
/// roots or via spouse links. The visited set also bounds traversal on
/// cyclic input, which is unsupported but must not hang rendering.
pub fn materialize(members: &[FamilyMember]) -> TreeLayout {
    if members.is_empty() {
        return TreeLayout::Empty;
    }

    let by_id: HashMap<&str, &FamilyMember> = members
        .iter()
        .map(|member| (member.id.as_str(), member))
        .collect();

    let mut visited: HashSet<MemberId> = HashSet::new();
    let mut trees = Vec::new();
    for root in members.iter().filter(|member| is_root(member, &by_id)) {
        if let Some(node) = place(root.id.as_str(), 0, &by_id, &mut visited) {
            trees.push(node);
        }
    }
    TreeLayout::Forest(trees)
}

fn is_root(member: &FamilyMember, by_id: &HashMap<&str, &FamilyMember>) -> bool {
    member
        .parents
        .iter()
        .all(|parent_id| !by_id.contains_key(parent_id.as_str()))
}

fn place(
    id: &str,
    depth: u32,
    by_id: &HashMap<&str, &FamilyMember>,
    visited: &mut HashSet<MemberId>,
) -> Option<TreeNode> {
    if visited.contains(id) {
        return None;
    }
    let member = by_id.get(id)?;
    visited.insert(member.id.clone());

    let spouse_id = member
        .spouse
        .as_ref()
        .filter(|spouse_id| by_id.contains_key(spouse_id.as_str()))
        .filter(|spouse_id| !visited.contains(spouse_id.as_str()))
        .cloned();
    if let Some(spouse_id) = &spouse_id {
        visited.insert(spouse_id.clone());
    }

    let mut children = Vec::new();
    for child_id in &member.children {
        if let Some(child) = place(child_id, depth + 1, by_id, visited) {
            children.push(child);
        }
    }
    // The co-located spouse never gets a placement of their own, so their
    // children belong to this couple node. Shared children were already
    // placed above; only children unique to the spouse (stepchildren) are
    // added here.
    if let Some(spouse_id) = &spouse_id {
        if let Some(spouse) = by_id.get(spouse_id.as_str()) {
            for child_id in &spouse.children {
                if let Some(child) = place(child_id, depth + 1, by_id, visited) {
                    children.push(child);
                }
            }
        }
    }

    Some(TreeNode {
        member_id: member.id.clone(),
        spouse_id,
        depth,
        children,
    })
}
