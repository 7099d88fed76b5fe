//! Missing-member detection.
//!
//! The hook an editor uses to decide whether to offer synthesis at all: which
//! interface members the class does not implement yet.

use crate::merge::is_satisfied;
use psynth_common::diagnostics::diagnostic_messages;
use psynth_common::{
    ClassSnapshot, Diagnostic, InterfaceDescriptor, MemberDescriptor, MemberKey, TypeReference,
};
use rustc_hash::FxHashSet;

pub fn missing_members<'d>(
    descriptor: &'d InterfaceDescriptor,
    snapshot: &ClassSnapshot,
) -> Vec<&'d MemberDescriptor> {
    let claimed: FxHashSet<(MemberKey, TypeReference)> = descriptor
        .members
        .iter()
        .filter_map(|member| {
            member
                .explicit_interface()
                .map(|interface| (MemberKey::Member(member.signature()), interface.clone()))
        })
        .collect();
    descriptor
        .members
        .iter()
        .filter(|member| {
            let key = MemberKey::Member(member.signature());
            !is_satisfied(snapshot, &key, member.explicit_interface(), &claimed)
        })
        .collect()
}

/// `None` when nothing is missing.
pub fn missing_members_diagnostic(
    descriptor: &InterfaceDescriptor,
    snapshot: &ClassSnapshot,
) -> Option<Diagnostic> {
    let missing = missing_members(descriptor, snapshot);
    if missing.is_empty() {
        return None;
    }
    let interface = descriptor.interface.to_string();
    Some(Diagnostic::from_message(
        diagnostic_messages::CLASS_MISSING_INTERFACE_MEMBERS,
        snapshot.name(),
        &[snapshot.name(), &missing.len().to_string(), &interface],
    ))
}

#[cfg(test)]
#[path = "../tests/missing_tests.rs"]
mod missing_tests;
