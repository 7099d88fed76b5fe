use super::*;
use crate::classify::HelperKind;
use psynth_common::{
    AccessorSet, ClassSnapshot, EventDescriptor, GenericConstraint, IndexerDescriptor,
    MethodDescriptor, ParameterModifier, PropertyDescriptor,
};

fn ty(text: &str) -> TypeReference {
    TypeReference::parse(text).expect("valid type")
}

fn t() -> TypeReference {
    TypeReference::type_parameter("T")
}

fn based_t() -> GenericParameter {
    GenericParameter::new("T").with_constraint(GenericConstraint::Type(ty("Acme.Base")))
}

/// `Task<T> M1<T>(string s)`, `Task<T> M2<T>(string s, int n) where T : Base`,
/// `void M3<T>() where T : Base`.
fn scenario() -> InterfaceDescriptor {
    InterfaceDescriptor::new(ty("Acme.IFoo"))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M1", TypeReference::task(Some(t())))
                .with_type_parameter(GenericParameter::new("T"))
                .with_parameter(Parameter::new("s", ty("string"))),
        ))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M2", TypeReference::task(Some(t())))
                .with_type_parameter(based_t())
                .with_parameter(Parameter::new("s", ty("string")))
                .with_parameter(Parameter::new("n", ty("int"))),
        ))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M3", TypeReference::Void).with_type_parameter(based_t()),
        ))
}

fn synthesize(descriptor: &InterfaceDescriptor, mode: SynthesisMode) -> CandidateSet {
    let options = SynthesisOptions::default().with_mode(mode);
    let bindings = FieldBindings::resolve(descriptor, &ClassSnapshot::new("FooDecorator"), &options);
    DecoratorSynthesizer::new(&options).synthesize(descriptor, &bindings)
}

fn method<'a>(set: &'a CandidateSet, name: &str) -> &'a MethodDeclaration {
    set.members
        .iter()
        .find_map(|member| match &member.declaration {
            Declaration::Method(method) if method.name == name && member.role == DeclarationRole::Forwarding => {
                Some(method)
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("no forwarding method {name}"))
}

/// The helper call inside a single-statement body, with any `await` removed.
fn helper_call(body: &[Statement]) -> &Expr {
    let [statement] = body else {
        panic!("forwarding bodies hold exactly one statement");
    };
    let expr = match statement {
        Statement::Return(expr) | Statement::Expression(expr) => expr,
    };
    match expr {
        Expr::Await(inner) => inner,
        other => other,
    }
}

fn helper_name(call: &Expr) -> &str {
    match call {
        Expr::Invocation { callee, .. } => match callee.as_ref() {
            Expr::Identifier(name) => name,
            other => panic!("unexpected callee {other:?}"),
        },
        other => panic!("expected an invocation, got {other:?}"),
    }
}

#[test]
fn test_scenario_completeness() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    assert!(set.diagnostics.is_empty());
    assert_eq!(set.count(|role| matches!(role, DeclarationRole::ImplementationField | DeclarationRole::PolicyField)), 2);
    assert_eq!(set.count(|role| role == DeclarationRole::Constructor), 1);
    assert_eq!(set.count(|role| matches!(role, DeclarationRole::Helper(_))), 3);
    assert_eq!(set.forwarding().count(), 3);
    assert_eq!(set.members.len(), 9);
}

#[test]
fn test_candidate_order() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    let roles: Vec<DeclarationRole> = set.members.iter().map(|member| member.role).collect();
    assert_eq!(
        roles,
        vec![
            DeclarationRole::ImplementationField,
            DeclarationRole::PolicyField,
            DeclarationRole::Constructor,
            DeclarationRole::Forwarding,
            DeclarationRole::Forwarding,
            DeclarationRole::Forwarding,
            DeclarationRole::Helper(HelperKind::Void),
            DeclarationRole::Helper(HelperKind::Value),
            DeclarationRole::Helper(HelperKind::Async),
        ]
    );
}

#[test]
fn test_scenario_routing() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    assert_eq!(helper_name(helper_call(&method(&set, "M1").body)), "ExecuteAsync");
    assert_eq!(helper_name(helper_call(&method(&set, "M2").body)), "ExecuteAsync");
    assert_eq!(helper_name(helper_call(&method(&set, "M3").body)), "Execute");
}

#[test]
fn test_constraints_are_preserved() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    assert_eq!(method(&set, "M1").type_parameters, vec![GenericParameter::new("T")]);
    assert_eq!(method(&set, "M2").type_parameters, vec![based_t()]);
    assert_eq!(method(&set, "M3").type_parameters, vec![based_t()]);
}

#[test]
fn test_forwarding_call_passes_arguments_and_type_arguments() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    let expected = Expr::identifier("ExecuteAsync").call(
        vec![t()],
        vec![Expr::lambda(
            Expr::identifier("_foo")
                .member("M2")
                .call(vec![t()], vec![Expr::identifier("s"), Expr::identifier("n")]),
        )],
    );
    assert_eq!(method(&set, "M2").body, vec![Statement::Return(expected)]);

    let m3 = Expr::identifier("Execute").call(
        Vec::new(),
        vec![Expr::lambda(Expr::identifier("_foo").member("M3").call(vec![t()], Vec::new()))],
    );
    assert_eq!(method(&set, "M3").body, vec![Statement::Expression(m3)]);
}

#[test]
fn test_modes_differ_only_in_async_markers() {
    let elided = synthesize(&scenario(), SynthesisMode::Elided);
    let explicit = synthesize(&scenario(), SynthesisMode::Explicit);

    for name in ["M1", "M2"] {
        let a = method(&elided, name);
        let b = method(&explicit, name);
        assert!(!a.is_async);
        assert!(b.is_async);
        assert_eq!(helper_call(&a.body), helper_call(&b.body));
        assert!(matches!(&b.body[0], Statement::Return(Expr::Await(_))));
    }
    assert!(!method(&explicit, "M3").is_async);
    assert_eq!(method(&elided, "M3"), method(&explicit, "M3"));
}

#[test]
fn test_explicit_mode_helpers_await() {
    let set = synthesize(&scenario(), SynthesisMode::Explicit);
    let Some(Declaration::Method(helper)) = set
        .members
        .iter()
        .find(|member| member.role == DeclarationRole::Helper(HelperKind::Async))
        .map(|member| &member.declaration)
    else {
        panic!("async helper missing");
    };
    assert!(helper.is_async);
    assert!(matches!(&helper.body[0], Statement::Return(Expr::Await(_))));
    assert_eq!(helper.return_type, TypeReference::task(Some(TypeReference::type_parameter("TResult"))));
}

#[test]
fn test_helper_keys_match_their_shapes() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    let keys: Vec<String> = set
        .members
        .iter()
        .filter(|member| member.is_helper())
        .map(|member| member.key().to_string())
        .collect();
    assert_eq!(
        keys,
        vec![
            "Execute(System.Action)",
            "Execute`1(System.Func<!!0>)",
            "ExecuteAsync`1(System.Func<System.Threading.Tasks.Task<!!0>>)",
        ]
    );
}

#[test]
fn test_non_generic_task_adds_void_async_helper() {
    let descriptor = InterfaceDescriptor::new(ty("Acme.IJob")).with_member(MemberDescriptor::Method(
        MethodDescriptor::new("RunAsync", TypeReference::task(None)),
    ));
    let elided = synthesize(&descriptor, SynthesisMode::Elided);
    assert_eq!(elided.count(|role| matches!(role, DeclarationRole::Helper(_))), 4);
    assert!(matches!(&method(&elided, "RunAsync").body[0], Statement::Return(_)));

    let explicit = synthesize(&descriptor, SynthesisMode::Explicit);
    let run = method(&explicit, "RunAsync");
    assert!(run.is_async);
    assert!(matches!(&run.body[0], Statement::Expression(Expr::Await(_))));
}

#[test]
fn test_constructor_wires_both_fields() {
    let set = synthesize(&scenario(), SynthesisMode::Elided);
    let Declaration::Constructor(ctor) = &set.members[2].declaration else {
        panic!("third candidate is the constructor");
    };
    assert_eq!(ctor.class_name, "FooDecorator");
    assert_eq!(
        ctor.parameters,
        vec![
            Parameter::new("foo", ty("Acme.IFoo")),
            Parameter::new("policy", ty("Polly.Policy")),
        ]
    );
    assert_eq!(
        ctor.body[0],
        Statement::Expression(Expr::identifier("_foo").assign(Expr::identifier("foo")))
    );
}

#[test]
fn test_constructor_uses_this_when_names_match() {
    let descriptor = scenario();
    let options = SynthesisOptions {
        implementation_field: Some("inner".to_string()),
        implementation_parameter: Some("inner".to_string()),
        ..SynthesisOptions::default()
    };
    let bindings = FieldBindings::resolve(&descriptor, &ClassSnapshot::new("FooDecorator"), &options);
    let set = DecoratorSynthesizer::new(&options).synthesize(&descriptor, &bindings);
    let Declaration::Constructor(ctor) = &set.members[2].declaration else {
        panic!("third candidate is the constructor");
    };
    assert_eq!(
        ctor.body[0],
        Statement::Expression(Expr::This.member("inner").assign(Expr::identifier("inner")))
    );
}

#[test]
fn test_properties_indexers_and_events() {
    let descriptor = InterfaceDescriptor::new(ty("Acme.IStore"))
        .with_member(MemberDescriptor::Property(PropertyDescriptor {
            name: "Name".to_string(),
            ty: ty("string"),
            accessors: AccessorSet::GET_SET,
            explicit_interface: None,
        }))
        .with_member(MemberDescriptor::Indexer(IndexerDescriptor {
            parameters: vec![Parameter::new("key", ty("string"))],
            ty: ty("int"),
            accessors: AccessorSet::GET,
            explicit_interface: None,
        }))
        .with_member(MemberDescriptor::Event(EventDescriptor {
            name: "Changed".to_string(),
            ty: ty("System.EventHandler"),
            explicit_interface: None,
        }));
    let set = synthesize(&descriptor, SynthesisMode::Elided);
    let forwarding: Vec<&Declaration> = set.forwarding().map(|member| &member.declaration).collect();

    let Declaration::Property(name) = forwarding[0] else {
        panic!("Name is a property");
    };
    let access = Expr::identifier("_store").member("Name");
    assert_eq!(
        name.getter,
        Some(vec![Statement::Return(Expr::identifier("Execute").call(
            vec![ty("string")],
            vec![Expr::lambda(access.clone())],
        ))])
    );
    assert_eq!(
        name.setter,
        Some(vec![Statement::Expression(Expr::identifier("Execute").call(
            Vec::new(),
            vec![Expr::lambda(access.assign(Expr::identifier("value")))],
        ))])
    );

    let Declaration::Property(indexer) = forwarding[1] else {
        panic!("indexer is a property declaration");
    };
    assert_eq!(indexer.name, PropertyName::Indexer(vec![Parameter::new("key", ty("string"))]));
    assert!(indexer.setter.is_none());

    let Declaration::Event(changed) = forwarding[2] else {
        panic!("Changed is an event");
    };
    assert_eq!(
        changed.add,
        vec![Statement::Expression(
            Expr::identifier("_store")
                .member("Changed")
                .compound_assign("+=", Expr::identifier("value"))
        )]
    );
}

#[test]
fn test_explicit_members_forward_through_a_cast() {
    let mut enumerator = MethodDescriptor::new("GetEnumerator", ty("System.Collections.IEnumerator"));
    enumerator.explicit_interface = Some(ty("System.Collections.IEnumerable"));
    let descriptor = InterfaceDescriptor::new(ty("Acme.IBag")).with_member(MemberDescriptor::Method(enumerator));

    let set = synthesize(&descriptor, SynthesisMode::Elided);
    let forwarded = method(&set, "GetEnumerator");
    assert_eq!(forwarded.accessibility, Accessibility::None);
    let expected = Expr::identifier("_bag")
        .cast(ty("System.Collections.IEnumerable"))
        .member("GetEnumerator")
        .call(Vec::new(), Vec::new());
    let Expr::Invocation { arguments, .. } = helper_call(&forwarded.body) else {
        panic!("helper invocation expected");
    };
    assert_eq!(arguments, &vec![Expr::lambda(expected)]);
}

#[test]
fn test_unforwardable_members_are_reported() {
    let mut output = Parameter::new("value", ty("int"));
    output.modifier = ParameterModifier::Out;
    let descriptor = scenario().with_member(MemberDescriptor::Method(
        MethodDescriptor::new("TryRead", ty("bool")).with_parameter(output),
    ));
    let set = synthesize(&descriptor, SynthesisMode::Elided);
    assert_eq!(set.forwarding().count(), 3);
    assert_eq!(set.diagnostics.len(), 1);
}
