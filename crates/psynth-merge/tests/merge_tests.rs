use super::*;
use crate::apply::apply_delta;
use psynth_common::{
    GenericConstraint, GenericParameter, InterfaceDescriptor, MemberDescriptor, MethodDescriptor,
    Parameter, Signature, SnapshotMember, SynthesisOptions,
};
use psynth_synth::{DecoratorSynthesizer, FieldBindings, HelperKind};

fn ty(text: &str) -> TypeReference {
    TypeReference::parse(text).expect("valid type")
}

fn based_t() -> GenericParameter {
    GenericParameter::new("T").with_constraint(GenericConstraint::Type(ty("Acme.Base")))
}

fn scenario() -> InterfaceDescriptor {
    let t = TypeReference::type_parameter("T");
    InterfaceDescriptor::new(ty("Acme.IFoo"))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M1", TypeReference::task(Some(t.clone())))
                .with_type_parameter(GenericParameter::new("T"))
                .with_parameter(Parameter::new("s", ty("string"))),
        ))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M2", TypeReference::task(Some(t)))
                .with_type_parameter(based_t())
                .with_parameter(Parameter::new("s", ty("string")))
                .with_parameter(Parameter::new("n", ty("int"))),
        ))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M3", TypeReference::Void).with_type_parameter(based_t()),
        ))
}

fn delta_for(descriptor: &InterfaceDescriptor, snapshot: &ClassSnapshot, mode: SynthesisMode) -> MergeDelta {
    let options = SynthesisOptions::default().with_mode(mode);
    let bindings = FieldBindings::resolve(descriptor, snapshot, &options);
    let candidates = DecoratorSynthesizer::new(&options).synthesize(descriptor, &bindings);
    compute_delta(&candidates, snapshot)
}

fn member(key: MemberKey, name: &str) -> SnapshotMember {
    SnapshotMember {
        key,
        name: name.to_string(),
        explicit_interface: None,
    }
}

fn m3_key() -> MemberKey {
    MemberKey::Member(Signature::method("M3", &[based_t()], &[]))
}

#[test]
fn test_empty_class_gets_everything() {
    let delta = delta_for(&scenario(), &ClassSnapshot::new("FooDecorator"), SynthesisMode::Elided);
    assert_eq!(delta.len(), 9);
    assert_eq!(delta.placement, Placement::BodyStart);
    assert_eq!(delta.count(|role| role == DeclarationRole::Forwarding), 3);
    assert_eq!(delta.count(|role| matches!(role, DeclarationRole::Helper(_))), 3);
    assert_eq!(delta.class_name, "FooDecorator");
}

#[test]
fn test_rerun_after_apply_is_empty() {
    for mode in [SynthesisMode::Elided, SynthesisMode::Explicit] {
        let snapshot = ClassSnapshot::new("FooDecorator");
        let first = delta_for(&scenario(), &snapshot, mode);
        let applied = apply_delta(&snapshot, &first);
        let second = delta_for(&scenario(), &applied, mode);
        assert!(second.is_empty(), "rerun in {mode:?} added {:?}", second.members);
    }
}

#[test]
fn test_switching_modes_after_apply_adds_nothing() {
    let snapshot = ClassSnapshot::new("FooDecorator");
    let elided = delta_for(&scenario(), &snapshot, SynthesisMode::Elided);
    let applied = apply_delta(&snapshot, &elided);
    assert!(delta_for(&scenario(), &applied, SynthesisMode::Explicit).is_empty());
}

#[test]
fn test_existing_member_is_never_regenerated() {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    // A hand-edited M3 whose type parameter was renamed; the body is irrelevant.
    snapshot.push(member(
        MemberKey::Member(Signature::method("M3", &[GenericParameter::new("TItem")], &[])),
        "M3",
    ));

    let delta = delta_for(&scenario(), &snapshot, SynthesisMode::Elided);
    assert!(!delta.contains_name("M3"));
    assert!(delta.contains_name("M1"));
    assert!(delta.contains_name("M2"));
    assert_eq!(delta.count(|role| role == DeclarationRole::Forwarding), 2);
    assert_eq!(delta.placement, Placement::BodyEnd);
}

#[test]
fn test_partial_snapshot_skips_present_plumbing() {
    let descriptor = scenario();
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    snapshot.add_field("_inner", ty("Acme.IFoo"));
    snapshot.add_field("_policy", ty("Polly.Policy"));
    snapshot.push(member(
        MemberKey::constructor(&[
            Parameter::new("inner", ty("Acme.IFoo")),
            Parameter::new("policy", ty("Polly.Policy")),
        ]),
        "FooDecorator",
    ));
    snapshot.push(member(m3_key(), "M3"));
    snapshot.push(member(
        MemberKey::Member(Signature::method("Execute", &[], &[Parameter::new("action", TypeReference::action())])),
        "Execute",
    ));

    let delta = delta_for(&descriptor, &snapshot, SynthesisMode::Elided);
    let roles: Vec<DeclarationRole> = delta.members.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            DeclarationRole::Forwarding,
            DeclarationRole::Forwarding,
            DeclarationRole::Helper(HelperKind::Value),
            DeclarationRole::Helper(HelperKind::Async),
        ]
    );
    assert!(!delta.contains_name("M3"));
}

#[test]
fn test_constructor_with_other_parameters_gets_a_sibling() {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    snapshot.push(member(
        MemberKey::constructor(&[Parameter::new("inner", ty("Acme.IFoo"))]),
        "FooDecorator",
    ));
    let delta = delta_for(&scenario(), &snapshot, SynthesisMode::Elided);
    assert_eq!(delta.count(|role| role == DeclarationRole::Constructor), 1);
}

#[test]
fn test_same_name_different_signature_is_added_alongside() {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    // M1(int) is an unrelated overload, not the interface's M1<T>(string).
    snapshot.push(member(
        MemberKey::Member(Signature::method("M1", &[], &[Parameter::new("count", ty("int"))])),
        "M1",
    ));

    let delta = delta_for(&scenario(), &snapshot, SynthesisMode::Elided);
    assert!(delta.contains_name("M1"));
    let applied = apply_delta(&snapshot, &delta);
    let m1_count = applied.members().filter(|(_, m)| m.name == "M1").count();
    assert_eq!(m1_count, 2);
    assert!(delta_for(&scenario(), &applied, SynthesisMode::Elided).is_empty());
}

#[test]
fn test_generic_arity_distinguishes_overloads() {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    snapshot.push(member(MemberKey::Member(Signature::method("M3", &[], &[])), "M3"));
    let delta = delta_for(&scenario(), &snapshot, SynthesisMode::Elided);
    assert!(delta.contains_name("M3"));
}

#[test]
fn test_explicit_candidate_needs_matching_qualifier() {
    let enumerable = ty("System.Collections.IEnumerable");
    let generic = MethodDescriptor::new(
        "GetEnumerator",
        ty("System.Collections.Generic.IEnumerator<int>"),
    );
    let mut plain = MethodDescriptor::new("GetEnumerator", ty("System.Collections.IEnumerator"));
    plain.explicit_interface = Some(enumerable.clone());
    let descriptor = InterfaceDescriptor::new(ty("Acme.INumbers"))
        .with_member(MemberDescriptor::Method(generic))
        .with_member(MemberDescriptor::Method(plain));

    let key = MemberKey::Member(Signature::method("GetEnumerator", &[], &[]));
    let mut snapshot = ClassSnapshot::new("Numbers");
    snapshot.push(SnapshotMember {
        key: key.clone(),
        name: "GetEnumerator".to_string(),
        explicit_interface: Some(enumerable),
    });

    // The explicit one exists; only the implicit generic one is missing.
    let delta = delta_for(&descriptor, &snapshot, SynthesisMode::Elided);
    let forwarding: Vec<_> = delta
        .members
        .iter()
        .filter(|m| m.role == DeclarationRole::Forwarding)
        .collect();
    assert_eq!(forwarding.len(), 1);
    assert!(forwarding[0].explicit_interface().is_none());

    // An implicit member alone leaves the explicit one missing.
    let mut implicit_only = ClassSnapshot::new("Numbers");
    implicit_only.push(member(key, "GetEnumerator"));
    let delta = delta_for(&descriptor, &implicit_only, SynthesisMode::Elided);
    let forwarding: Vec<_> = delta
        .members
        .iter()
        .filter(|m| m.role == DeclarationRole::Forwarding)
        .collect();
    assert_eq!(forwarding.len(), 1);
    assert!(forwarding[0].explicit_interface().is_some());
}

#[test]
fn test_delta_never_contains_present_keys() {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    snapshot.push(member(m3_key(), "M3"));
    snapshot.add_field("_foo", ty("Acme.IFoo"));
    let delta = delta_for(&scenario(), &snapshot, SynthesisMode::Explicit);
    for candidate in &delta.members {
        assert!(
            !snapshot.contains_key(&candidate.key()),
            "{} was already present",
            candidate.key()
        );
    }
}
