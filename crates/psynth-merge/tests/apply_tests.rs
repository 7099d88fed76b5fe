use super::*;
use crate::merge::compute_delta;
use psynth_common::{
    GenericConstraint, GenericParameter, InterfaceDescriptor, MemberDescriptor, MemberKey,
    MethodDescriptor, NewLineKind, Parameter, Signature, SynthesisMode, TypeCatalog, TypeReference,
};
use psynth_synth::{DecoratorSynthesizer, FieldBindings};

fn ty(text: &str) -> TypeReference {
    TypeReference::parse(text).expect("valid type")
}

fn scope() -> TypeScope {
    let mut catalog = TypeCatalog::with_well_known();
    catalog.insert("Acme", "IFoo", 0);
    catalog.insert("Acme", "Base", 0);
    TypeScope::new(Some("Acme"), catalog)
        .with_imports(["System", "System.Threading.Tasks", "Polly"])
        .expect("valid imports")
}

fn based_t() -> GenericParameter {
    GenericParameter::new("T").with_constraint(GenericConstraint::Type(ty("Acme.Base")))
}

fn scenario() -> InterfaceDescriptor {
    InterfaceDescriptor::new(ty("Acme.IFoo"))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M1", TypeReference::task(Some(TypeReference::type_parameter("T"))))
                .with_type_parameter(GenericParameter::new("T"))
                .with_parameter(Parameter::new("s", ty("string"))),
        ))
        .with_member(MemberDescriptor::Method(
            MethodDescriptor::new("M3", TypeReference::Void).with_type_parameter(based_t()),
        ))
}

fn delta_for(snapshot: &ClassSnapshot, options: &SynthesisOptions) -> MergeDelta {
    let descriptor = scenario();
    let bindings = FieldBindings::resolve(&descriptor, snapshot, options);
    let candidates = DecoratorSynthesizer::new(options).synthesize(&descriptor, &bindings);
    compute_delta(&candidates, snapshot)
}

fn populated() -> ClassSnapshot {
    let mut snapshot = ClassSnapshot::new("FooDecorator");
    snapshot.add_field("_foo", ty("Acme.IFoo"));
    snapshot.add_field("_policy", ty("Polly.Policy"));
    snapshot.push(SnapshotMember {
        key: MemberKey::constructor(&[
            Parameter::new("foo", ty("Acme.IFoo")),
            Parameter::new("policy", ty("Polly.Policy")),
        ]),
        name: "FooDecorator".to_string(),
        explicit_interface: None,
    });
    snapshot.push(SnapshotMember {
        key: MemberKey::Member(Signature::method("M1", &[GenericParameter::new("T")], &[Parameter::new("s", ty("string"))])),
        name: "M1".to_string(),
        explicit_interface: None,
    });
    snapshot
}

#[test]
fn test_apply_records_every_added_member() {
    let options = SynthesisOptions::default();
    let snapshot = ClassSnapshot::new("FooDecorator");
    let delta = delta_for(&snapshot, &options);
    let applied = apply_delta(&snapshot, &delta);

    assert_eq!(applied.len(), delta.len());
    assert!(applied.contains_key(&MemberKey::field(ty("Acme.IFoo"))));
    assert!(applied.contains_key(&MemberKey::field(ty("Polly.Policy"))));
    assert!(applied.member_names().contains("M3"));
    // The original is left alone.
    assert!(snapshot.is_empty());
}

#[test]
fn test_apply_keeps_existing_members_first() {
    let options = SynthesisOptions::default();
    let snapshot = populated();
    let delta = delta_for(&snapshot, &options);
    let applied = apply_delta(&snapshot, &delta);

    let names: Vec<&str> = applied.members().map(|(_, member)| member.name.as_str()).collect();
    assert_eq!(&names[..4], ["_foo", "_policy", "FooDecorator", "M1"]);
    assert_eq!(&names[4..], ["M3", "Execute", "Execute", "ExecuteAsync"]);
}

#[test]
fn test_renders_appended_members() {
    let options = SynthesisOptions::default();
    let snapshot = populated();
    let delta = delta_for(&snapshot, &options);
    assert_eq!(delta.placement, Placement::BodyEnd);

    let text = render_delta(&delta, &scope(), &[], 1, &options);
    let expected = "
    public void M3<T>() where T : Base
    {
        Execute(() => _foo.M3<T>());
    }

    private void Execute(Action action)
    {
        _policy.Execute(action);
    }

    private TResult Execute<TResult>(Func<TResult> func)
    {
        return _policy.Execute(func);
    }

    private Task<TResult> ExecuteAsync<TResult>(Func<Task<TResult>> func)
    {
        return _policy.ExecuteAsync(func);
    }
";
    assert_eq!(text, expected);
}

#[test]
fn test_renders_whole_body_without_leading_blank_line() {
    let options = SynthesisOptions::default();
    let delta = delta_for(&ClassSnapshot::new("FooDecorator"), &options);
    let text = render_delta(&delta, &scope(), &[], 1, &options);
    assert!(text.starts_with("    private readonly IFoo _foo;\n    private readonly Policy _policy;\n\n"));
    assert!(text.contains("    public FooDecorator(IFoo foo, Policy policy)\n"));
}

#[test]
fn test_empty_delta_renders_nothing() {
    let options = SynthesisOptions::default();
    let snapshot = populated();
    let applied = apply_delta(&snapshot, &delta_for(&snapshot, &options));
    let delta = delta_for(&applied, &options);
    assert!(delta.is_empty());
    assert_eq!(render_delta(&delta, &scope(), &[], 1, &options), "");
}

#[test]
fn test_render_honors_new_line_and_indent() {
    let mut options = SynthesisOptions::default().with_mode(SynthesisMode::Explicit);
    options.new_line = NewLineKind::CrLf;
    options.indent_width = 2;
    let delta = delta_for(&populated(), &options);
    let text = render_delta(&delta, &scope(), &[], 2, &options);
    assert!(text.starts_with("\r\n    public void M3<T>() where T : Base\r\n    {\r\n"));
    assert!(!text.contains("\n\n"));
}

#[test]
fn test_class_type_parameters_are_not_qualified() {
    let descriptor = InterfaceDescriptor::new(ty("Acme.IFoo")).with_member(MemberDescriptor::Method(
        MethodDescriptor::new("Get", TypeReference::type_parameter("TKey")),
    ));
    let options = SynthesisOptions::default();
    let snapshot = ClassSnapshot::new("FooDecorator").with_type_parameters(["TKey".to_string()]);
    let bindings = FieldBindings::resolve(&descriptor, &snapshot, &options);
    let candidates = DecoratorSynthesizer::new(&options).synthesize(&descriptor, &bindings);
    let delta = compute_delta(&candidates, &snapshot);
    let text = render_delta(&delta, &scope(), snapshot.type_parameters(), 1, &options);
    assert!(text.contains("    public TKey Get()\n"));
    assert!(text.contains("return Execute<TKey>(() => _foo.Get());"));
}
