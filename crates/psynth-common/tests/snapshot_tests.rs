use super::*;
use crate::members::Parameter;
use crate::signature::Signature;

fn ty(text: &str) -> TypeReference {
    TypeReference::parse(text).expect("valid type")
}

#[test]
fn test_fields_are_keyed_by_type() {
    let mut snapshot = ClassSnapshot::new("Decorator");
    snapshot.add_field("_inner", ty("Acme.IFoo"));

    assert!(snapshot.contains_key(&MemberKey::field(ty("Acme.IFoo"))));
    assert!(!snapshot.contains_key(&MemberKey::field(ty("Acme.IBar"))));
    assert_eq!(snapshot.field_of_type(&ty("Acme.IFoo")), Some("_inner"));
}

#[test]
fn test_explicit_member_satisfies_implicit_candidate() {
    let mut snapshot = ClassSnapshot::new("Decorator");
    let key = MemberKey::Member(Signature::method("Run", &[], &[]));
    snapshot.push(SnapshotMember {
        key: key.clone(),
        name: "Run".to_string(),
        explicit_interface: Some(ty("Acme.IFoo")),
    });

    assert!(snapshot.satisfies(&key, None));
    assert!(snapshot.satisfies(&key, Some(&ty("Acme.IFoo"))));
    assert!(!snapshot.satisfies(&key, Some(&ty("Acme.IBar"))));
}

#[test]
fn test_implicit_member_does_not_satisfy_explicit_candidate() {
    let mut snapshot = ClassSnapshot::new("Decorator");
    let key = MemberKey::Member(Signature::method("GetEnumerator", &[], &[]));
    snapshot.push(SnapshotMember {
        key: key.clone(),
        name: "GetEnumerator".to_string(),
        explicit_interface: None,
    });

    assert!(snapshot.satisfies(&key, None));
    assert!(!snapshot.satisfies(&key, Some(&ty("System.Collections.IEnumerable"))));
}

#[test]
fn test_member_ids_follow_insertion_order() {
    let mut snapshot = ClassSnapshot::new("Decorator");
    let first = snapshot.add_field("_a", ty("int"));
    let second = snapshot.push(SnapshotMember {
        key: MemberKey::constructor(&[Parameter::new("a", ty("int"))]),
        name: "Decorator".to_string(),
        explicit_interface: None,
    });

    assert!(first < second);
    assert_eq!(snapshot.len(), 2);
    let names: Vec<&str> = snapshot.members().map(|(_, m)| m.name.as_str()).collect();
    assert_eq!(names, vec!["_a", "Decorator"]);
    assert!(snapshot.member_names().contains("_a"));
}
