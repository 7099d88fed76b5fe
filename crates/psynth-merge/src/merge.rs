//! Merge Engine.
//!
//! The delta is every candidate whose structural key has no match in the
//! class snapshot. Bodies never take part, so a member the user rewrote
//! beyond recognition still counts as implemented, and a rerun after applying
//! a delta always finds nothing to add.
//!
//! Existing members are never touched: the delta only ever adds, at the end
//! of the class body, in candidate order.

use psynth_common::{ClassSnapshot, MemberKey, SynthesisMode, TypeReference};
use psynth_synth::{CandidateMember, CandidateSet, Declaration, DeclarationRole};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, trace};

/// Where the delta goes in the class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// The class had no members; the delta is the whole body.
    BodyStart,
    /// After the last existing member.
    BodyEnd,
}

/// Declarations to add to one class, in insertion order.
#[derive(Debug, Clone)]
pub struct MergeDelta {
    pub class_name: String,
    pub interface: TypeReference,
    pub mode: SynthesisMode,
    pub placement: Placement,
    pub members: Vec<CandidateMember>,
}

impl MergeDelta {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().map(|member| &member.declaration)
    }

    pub fn count(&self, predicate: impl Fn(DeclarationRole) -> bool) -> usize {
        self.members.iter().filter(|member| predicate(member.role)).count()
    }

    /// Whether the delta holds a member declared as `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.declarations().any(|declaration| declaration.name() == name)
    }
}

/// Candidates from `candidates` that `snapshot` does not already satisfy.
pub fn compute_delta(candidates: &CandidateSet, snapshot: &ClassSnapshot) -> MergeDelta {
    // Explicit qualifiers the candidate set itself needs, per key. A class
    // member carrying one of these implements that explicit candidate, not
    // the implicit one.
    let claimed: FxHashSet<(MemberKey, TypeReference)> = candidates
        .members
        .iter()
        .filter_map(|candidate| {
            candidate
                .explicit_interface()
                .map(|interface| (candidate.key(), interface.clone()))
        })
        .collect();

    let mut seen: FxHashSet<(MemberKey, Option<TypeReference>)> = FxHashSet::default();
    let mut members = Vec::new();

    for candidate in &candidates.members {
        let key = candidate.key();
        let explicit = candidate.explicit_interface().cloned();
        if is_satisfied(snapshot, &key, explicit.as_ref(), &claimed) {
            trace!(key = %key, "already present, skipped");
            continue;
        }
        if !seen.insert((key.clone(), explicit)) {
            trace!(key = %key, "duplicate candidate, skipped");
            continue;
        }
        trace!(key = %key, role = ?candidate.role, "added to delta");
        members.push(candidate.clone());
    }

    let placement = if snapshot.is_empty() {
        Placement::BodyStart
    } else {
        Placement::BodyEnd
    };
    debug!(
        class = snapshot.name(),
        interface = %candidates.interface,
        candidates = candidates.members.len(),
        added = members.len(),
        "delta computed"
    );
    MergeDelta {
        class_name: snapshot.name().to_string(),
        interface: candidates.interface.clone(),
        mode: candidates.mode,
        placement,
        members,
    }
}

/// An explicit candidate needs a member qualified with the same interface.
/// An implicit candidate accepts an implicit member, or an explicit one whose
/// qualifier no explicit candidate of the same key claims.
pub(crate) fn is_satisfied(
    snapshot: &ClassSnapshot,
    key: &MemberKey,
    explicit: Option<&TypeReference>,
    claimed: &FxHashSet<(MemberKey, TypeReference)>,
) -> bool {
    if explicit.is_some() {
        return snapshot.satisfies(key, explicit);
    }
    snapshot
        .members_with_key(key)
        .any(|member| match &member.explicit_interface {
            None => true,
            Some(interface) => !claimed.contains(&(key.clone(), interface.clone())),
        })
}

#[cfg(test)]
#[path = "../tests/merge_tests.rs"]
mod merge_tests;
