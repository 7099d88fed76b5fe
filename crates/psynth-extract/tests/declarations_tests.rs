use super::*;

const WORKSPACE: &str = r#"{
    "interfaces": [
        {
            "namespace": "Acme.Services",
            "name": "IOrderService",
            "imports": ["System.Threading.Tasks"],
            "members": [
                {
                    "kind": "method",
                    "name": "GetAsync",
                    "parameters": [{ "name": "id", "type": "int" }],
                    "type": "Task<Acme.Models.Order>"
                },
                { "kind": "operator", "name": "op_Equality", "isStatic": true }
            ]
        },
        { "namespace": "Acme.Legacy", "name": "IOrderService" },
        { "namespace": "Acme.Data", "name": "IRepository", "typeParameters": [{ "name": "T" }] }
    ],
    "classes": [
        {
            "namespace": "Acme.Web",
            "name": "OrderServiceDecorator",
            "implements": ["Acme.Services.IOrderService"],
            "bodyEnd": { "line": 12, "offset": 1 }
        }
    ]
}"#;

fn workspace() -> Workspace {
    Workspace::from_json(WORKSPACE).expect("valid workspace")
}

#[test]
fn test_workspace_deserializes() {
    let ws = workspace();
    assert_eq!(ws.interfaces.len(), 3);
    let member = &ws.interfaces[0].members[0];
    assert_eq!(member.kind, RawMemberKind::Method);
    assert_eq!(member.parameters[0].ty, TypeReference::parse("int").expect("valid"));
    assert_eq!(ws.interfaces[0].members[1].kind, RawMemberKind::Operator);
    assert!(ws.interfaces[0].members[1].is_static);
    assert_eq!(ws.classes[0].body_end, Some(Position::new(12, 1)));
}

#[test]
fn test_unknown_member_kind_deserializes_as_unknown() {
    let raw: RawMember =
        serde_json::from_str(r#"{ "kind": "destructor", "name": "Finalize" }"#).expect("valid");
    assert_eq!(raw.kind, RawMemberKind::Unknown);
}

#[test]
fn test_find_interface_by_qualified_name() {
    let ws = workspace();
    let reference = TypeReference::parse("Acme.Services.IOrderService").expect("valid");
    let found = ws.find_interface(&reference).expect("resolves");
    assert_eq!(found.qualified_name(), "Acme.Services.IOrderService");
}

#[test]
fn test_find_interface_by_bare_name_is_ambiguous() {
    let ws = workspace();
    let reference = TypeReference::parse("IOrderService").expect("valid");
    match ws.find_interface(&reference) {
        Err(SynthesisError::AmbiguousInterface { candidates, .. }) => {
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn test_find_interface_checks_generic_arity() {
    let ws = workspace();
    let closed = TypeReference::parse("Acme.Data.IRepository<int>").expect("valid");
    assert!(ws.find_interface(&closed).is_ok());
    let wrong_arity = TypeReference::parse("Acme.Data.IRepository").expect("valid");
    assert!(matches!(
        ws.find_interface(&wrong_arity),
        Err(SynthesisError::UnresolvedInterface { .. })
    ));
}

#[test]
fn test_find_class() {
    let ws = workspace();
    assert!(ws.find_class("Acme.Web.OrderServiceDecorator").is_ok());
    assert!(ws.find_class("OrderServiceDecorator").is_ok());
    assert!(matches!(
        ws.find_class("Missing"),
        Err(SynthesisError::UnknownClass { .. })
    ));
}

#[test]
fn test_catalog_includes_declared_and_mentioned_types() {
    let catalog = workspace().catalog();
    assert!(catalog.contains("Acme.Services", "IOrderService", 0));
    assert!(catalog.contains("Acme.Data", "IRepository", 1));
    assert!(catalog.contains("Acme.Models", "Order", 0));
    assert!(catalog.contains("System.Threading.Tasks", "Task", 1));
}

#[test]
fn test_implemented_interfaces_are_qualified_in_class_scope() {
    let mut ws = workspace();
    ws.classes[0].implements = vec![TypeReference::parse("IRepository<int>").expect("valid")];
    ws.classes[0].imports = vec!["Acme.Data".to_string()];
    let class = &ws.classes[0];
    let scope = class.scope(ws.catalog()).expect("valid imports");
    assert_eq!(
        class.implemented_interfaces(&scope),
        vec![TypeReference::parse("Acme.Data.IRepository<int>").expect("valid")]
    );
}

const MIXED_MEMBERS: &str = r#"{
    "interfaces": [
        {
            "namespace": "Acme",
            "name": "IPairs",
            "imports": ["System.Threading.Tasks"],
            "members": [
                { "kind": "method", "name": "Ok", "type": "void" },
                { "kind": "method", "name": "Pair", "type": "Task<(int Count, string)>" },
                { "kind": "method", "name": "Broken", "type": "Task<" },
                { "kind": "method", "name": "Copy", "type": "void",
                  "parameters": [{ "name": "source", "type": "byte*" }] }
            ]
        }
    ]
}"#;

#[test]
fn test_tuple_and_pointer_members_load() {
    let ws = Workspace::from_json(MIXED_MEMBERS).expect("one bad member does not fail the workspace");
    let members = &ws.interfaces[0].members;
    assert_eq!(members.len(), 4);
    assert_eq!(
        members[1].ty,
        Some(TypeReference::parse("Task<(int, string)>").expect("valid"))
    );
    assert_eq!(
        members[3].parameters[0].ty,
        TypeReference::parse("byte*").expect("valid")
    );
    assert!(members.iter().enumerate().all(|(i, m)| m.is_readable() == (i != 2)));
}

#[test]
fn test_unreadable_member_keeps_name_and_error() {
    let ws = Workspace::from_json(MIXED_MEMBERS).expect("valid workspace");
    let broken = &ws.interfaces[0].members[2];
    assert_eq!(broken.name, "Broken");
    assert_eq!(broken.kind, RawMemberKind::Unknown);
    assert!(broken.read_error.as_deref().is_some_and(|error| !error.is_empty()));
}

#[test]
fn test_malformed_workspace_shape_still_fails() {
    assert!(Workspace::from_json(r#"{ "interfaces": [{ "name": 3 }] }"#).is_err());
    assert!(Workspace::from_json(r#"{ "interfaces": [{ "name": "IFoo", "members": {} }] }"#).is_err());
}
