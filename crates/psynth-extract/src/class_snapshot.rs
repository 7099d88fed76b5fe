//! Class snapshotting.
//!
//! Turns a class declaration into the signature-keyed member set the merge
//! engine diffs against. Member bodies are dropped here and never looked at
//! again.

use crate::declarations::{ClassDeclaration, RawMemberKind};
use psynth_common::{
    ClassSnapshot, MemberKey, Parameter, Signature, SignatureKind, SnapshotMember, TypeReference,
    TypeScope,
};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Snapshot `class`, resolving its member types against `scope`.
pub fn snapshot_class(class: &ClassDeclaration, scope: &TypeScope) -> ClassSnapshot {
    let class_names = class.type_parameter_names();
    let mut snapshot = ClassSnapshot::new(&class.name)
        .with_type_parameters(class.type_parameters.iter().map(|p| p.name.clone()));

    let resolve = |ty: &TypeReference, names: &FxHashSet<String>| scope.qualify(&ty.bind_type_parameters(names));
    let resolve_parameters = |parameters: &[Parameter], names: &FxHashSet<String>| -> Vec<Parameter> {
        parameters
            .iter()
            .map(|param| Parameter {
                ty: resolve(&param.ty, names),
                ..param.clone()
            })
            .collect()
    };

    for raw in &class.members {
        let key = match raw.kind {
            RawMemberKind::Field => {
                let Some(ty) = &raw.ty else {
                    continue;
                };
                MemberKey::field(resolve(ty, &class_names))
            }
            RawMemberKind::Constructor => {
                MemberKey::constructor(&resolve_parameters(&raw.parameters, &class_names))
            }
            RawMemberKind::Method | RawMemberKind::Operator | RawMemberKind::Conversion => {
                let names: FxHashSet<String> = class_names
                    .iter()
                    .cloned()
                    .chain(raw.type_parameters.iter().map(|p| p.name.clone()))
                    .collect();
                MemberKey::Member(Signature::method(
                    &raw.name,
                    &raw.type_parameters,
                    &resolve_parameters(&raw.parameters, &names),
                ))
            }
            RawMemberKind::Property => MemberKey::Member(Signature::property(&raw.name)),
            RawMemberKind::Indexer => MemberKey::Member(Signature::indexer(&resolve_parameters(
                &raw.parameters,
                &class_names,
            ))),
            RawMemberKind::Event => MemberKey::Member(Signature::event(&raw.name)),
            RawMemberKind::Unknown => MemberKey::Member(Signature {
                kind: SignatureKind::Method,
                name: raw.name.clone(),
                generic_arity: 0,
                parameters: Vec::new(),
            }),
        };
        trace!(class = %class.name, key = %key, "snapshot member");
        snapshot.push(SnapshotMember {
            key,
            name: if raw.kind == RawMemberKind::Constructor {
                class.name.clone()
            } else {
                raw.name.clone()
            },
            explicit_interface: raw
                .explicit_interface
                .as_ref()
                .map(|interface| resolve(interface, &class_names)),
        });
    }
    snapshot
}

#[cfg(test)]
#[path = "../tests/class_snapshot_tests.rs"]
mod class_snapshot_tests;
