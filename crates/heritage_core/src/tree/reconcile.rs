//! Relationship reconciliation after a member edit.
//!
//! # Responsibility
//! - Propagate one added/edited record into the reciprocal fields of every
//!   affected record.
//!
//! # Invariants
//! - Spouse links stay symmetric and monogamous.
//! - For every existing parent id in `C.parents`, that parent's `children`
//!   contains `C.id`, and nothing else referencing `C` is touched.
//! - Records not affected by the edit are returned unchanged.

use crate::model::member::{FamilyMember, MemberId};

/// Applies one member edit to the collection and restores link consistency.
///
/// The updated record replaces its predecessor in place; a record with an
/// unknown id is appended. Spouse clearing happens before spouse assignment,
/// so a three-way reassignment (A leaves B for C, who was married to D)
/// leaves both B and D spouseless and C married to A.
///
/// Ids that resolve to no record in the collection are tolerated silently;
/// the link simply stays one-sided. The operation never fails.
pub fn reconcile(members: &[FamilyMember], updated: FamilyMember) -> Vec<FamilyMember> {
    let mut next: Vec<FamilyMember> = members.to_vec();
    let old = members.iter().find(|member| member.id == updated.id);
    let old_spouse = old.and_then(|member| member.spouse.clone());
    let old_parents: Vec<MemberId> = old.map(|member| member.parents.clone()).unwrap_or_default();

    match next.iter().position(|member| member.id == updated.id) {
        Some(index) => next[index] = updated.clone(),
        None => next.push(updated.clone()),
    }

    reconcile_spouse(&mut next, &updated, old_spouse);
    reconcile_parents(&mut next, &updated, &old_parents);
    next
}

fn reconcile_spouse(
    next: &mut [FamilyMember],
    updated: &FamilyMember,
    old_spouse: Option<MemberId>,
) {
    // Clear the former partner's reciprocal link, but only when it still
    // points back at the edited member.
    if let Some(old_spouse_id) = old_spouse {
        if updated.spouse.as_ref() != Some(&old_spouse_id) {
            if let Some(former) = find_mut(next, &old_spouse_id) {
                if former.spouse.as_deref() == Some(updated.id.as_str()) {
                    former.spouse = None;
                }
            }
        }
    }

    let Some(new_spouse_id) = updated.spouse.clone() else {
        return;
    };
    let Some(current_partner) = next
        .iter()
        .find(|member| member.id == new_spouse_id)
        .map(|member| member.spouse.clone())
    else {
        // Dangling spouse id: leave the one-sided link as-is.
        return;
    };

    // Monogamy: the new spouse's previous partner loses their link first.
    if let Some(partner_id) = current_partner.filter(|id| *id != updated.id) {
        if let Some(partner) = find_mut(next, &partner_id) {
            partner.spouse = None;
        }
    }
    if let Some(spouse) = find_mut(next, &new_spouse_id) {
        spouse.spouse = Some(updated.id.clone());
    }
}

fn reconcile_parents(next: &mut [FamilyMember], updated: &FamilyMember, old_parents: &[MemberId]) {
    let added = updated
        .parents
        .iter()
        .filter(|id| !old_parents.contains(id));
    for parent_id in added {
        if let Some(parent) = find_mut(next, parent_id) {
            if !parent.children.contains(&updated.id) {
                parent.children.push(updated.id.clone());
            }
        }
    }

    let removed = old_parents
        .iter()
        .filter(|id| !updated.parents.contains(id));
    for parent_id in removed {
        if let Some(parent) = find_mut(next, parent_id) {
            parent.children.retain(|child_id| *child_id != updated.id);
        }
    }
}

fn find_mut<'a>(members: &'a mut [FamilyMember], id: &str) -> Option<&'a mut FamilyMember> {
    members.iter_mut().find(|member| member.id == id)
}
