use super::*;

fn parse(text: &str) -> TypeReference {
    TypeReference::parse(text).expect("valid type syntax")
}

#[test]
fn test_keyword_and_system_name_are_equal() {
    assert_eq!(parse("int"), parse("System.Int32"));
    assert_eq!(parse("string"), parse("global::System.String"));
    assert_eq!(parse("System.Int32").to_string(), "int");
}

#[test]
fn test_parse_generic_task() {
    let ty = parse("System.Threading.Tasks.Task<System.Collections.Generic.List<T>>");
    let named = ty.as_named().expect("named");
    assert_eq!(named.namespace.as_deref(), Some("System.Threading.Tasks"));
    assert_eq!(named.name, "Task");
    assert_eq!(named.arity(), 1);
    assert_eq!(
        ty.to_string(),
        "System.Threading.Tasks.Task<System.Collections.Generic.List<T>>"
    );
}

#[test]
fn test_parse_arrays_and_nullable() {
    assert_eq!(
        parse("int[,]"),
        TypeReference::Array {
            element: Box::new(parse("int")),
            rank: 2,
        }
    );
    assert_eq!(parse("Acme.Order?").to_string(), "Acme.Order?");
    assert_eq!(parse("string[]?").to_string(), "string[]?");
}

#[test]
fn test_parse_void() {
    assert!(parse("void").is_void());
}

#[test]
fn test_parse_errors_report_position() {
    let err = TypeReference::parse("Task<int").expect_err("unterminated argument list");
    assert_eq!(err.position, 8);
    assert!(TypeReference::parse("List<int>>").is_err());
    assert!(TypeReference::parse("").is_err());
    assert!(TypeReference::parse("1Foo").is_err());
}

#[test]
fn test_async_shape() {
    assert_eq!(
        parse("System.Threading.Tasks.Task").async_shape(),
        Some(AsyncShape::Void)
    );
    let generic = parse("System.Threading.Tasks.Task<T>");
    assert_eq!(
        generic.async_shape(),
        Some(AsyncShape::Value(&TypeReference::Named(NamedType {
            namespace: None,
            name: "T".to_string(),
            arguments: Vec::new(),
        })))
    );
    assert_eq!(
        parse("System.Threading.Tasks.ValueTask<int>").async_shape(),
        Some(AsyncShape::Value(&parse("int")))
    );
    // Unqualified names are not resolved here.
    assert_eq!(parse("Task<int>").async_shape(), None);
}

#[test]
fn test_nullable_task_is_awaitable() {
    let ty = parse("System.Threading.Tasks.Task<string>?");
    assert_eq!(ty.task_wrapper(), Some(TaskWrapper::Task));
    assert_eq!(ty.async_shape(), Some(AsyncShape::Value(&parse("string"))));
    assert_eq!(
        parse("System.Threading.Tasks.Task?").async_shape(),
        Some(AsyncShape::Void)
    );
}

#[test]
fn test_nullable_value_task_is_a_plain_value() {
    let ty = parse("System.Threading.Tasks.ValueTask<int>?");
    assert_eq!(ty.task_wrapper(), None);
    assert_eq!(ty.async_shape(), None);
    assert_eq!(
        parse("System.Threading.Tasks.ValueTask").task_wrapper(),
        Some(TaskWrapper::ValueTask)
    );
}

#[test]
fn test_parse_tuples() {
    let ty = parse("(int Count, System.String)");
    assert_eq!(
        ty,
        TypeReference::Tuple(vec![
            TupleElement::named(parse("int"), "Count"),
            TupleElement::new(parse("string")),
        ])
    );
    assert_eq!(ty.to_string(), "(int Count, string)");

    let task = parse("System.Threading.Tasks.Task<(int, string)>");
    assert_eq!(task.async_shape(), Some(AsyncShape::Value(&parse("(int, string)"))));
    assert_eq!(parse("(int, (string, bool))[]").to_string(), "(int, (string, bool))[]");
}

#[test]
fn test_tuple_element_names_do_not_affect_identity() {
    assert_eq!(parse("(int a, string b)"), parse("(int, string)"));
    assert_ne!(parse("(int, string)"), parse("(string, int)"));
}

#[test]
fn test_tuple_parse_errors() {
    assert!(TypeReference::parse("(int)").is_err());
    assert!(TypeReference::parse("(int, string").is_err());
    assert!(TypeReference::parse("()").is_err());
}

#[test]
fn test_parse_pointers() {
    assert_eq!(parse("byte*"), TypeReference::Pointer(Box::new(parse("byte"))));
    assert_eq!(parse("int**").to_string(), "int**");
    assert_eq!(parse("System.Int32*[]").to_string(), "int*[]");
}

#[test]
fn test_visit_walks_every_nested_type() {
    let ty = parse("System.Collections.Generic.List<(Acme.Order, int*)>?");
    let mut seen = Vec::new();
    ty.visit(&mut |node| seen.push(node.to_string()));
    assert_eq!(
        seen,
        vec![
            "System.Collections.Generic.List<(Acme.Order, int*)>?",
            "System.Collections.Generic.List<(Acme.Order, int*)>",
            "(Acme.Order, int*)",
            "Acme.Order",
            "int*",
            "int",
        ]
    );
}

#[test]
fn test_type_parameters_are_bound_inside_tuples() {
    let names: FxHashSet<String> = ["T".to_string()].into_iter().collect();
    let bound = parse("(T Item, int*)").bind_type_parameters(&names);
    assert!(bound.mentions_type_parameter("T"));
    assert_eq!(bound.to_string(), "(T Item, int*)");
}

#[test]
fn test_bind_and_substitute_type_parameters() {
    let names: FxHashSet<String> = ["T".to_string()].into_iter().collect();
    let bound = parse("System.Collections.Generic.IDictionary<string, T[]>").bind_type_parameters(&names);
    assert!(bound.mentions_type_parameter("T"));

    let mut map = FxHashMap::default();
    map.insert("T".to_string(), parse("Acme.Order"));
    assert_eq!(
        bound.substitute(&map),
        parse("System.Collections.Generic.IDictionary<string, Acme.Order[]>")
    );
}

#[test]
fn test_bind_ignores_qualified_and_generic_names() {
    let names: FxHashSet<String> = ["T".to_string()].into_iter().collect();
    assert_eq!(parse("Acme.T").bind_type_parameters(&names), parse("Acme.T"));
    assert_eq!(parse("T<int>").bind_type_parameters(&names), parse("T<int>"));
}

#[test]
fn test_short_form() {
    assert_eq!(
        parse("System.Func<System.Threading.Tasks.Task<Acme.Order>>").short_form(),
        Some("Func<Task<Order>>".to_string())
    );
    assert_eq!(parse("int").short_form(), None);
}

#[test]
fn test_serde_uses_source_syntax() {
    let ty: TypeReference = serde_json::from_str("\"System.Threading.Tasks.Task<int>\"").expect("parse");
    assert_eq!(ty, TypeReference::task(Some(parse("int"))));
    assert_eq!(
        serde_json::to_string(&ty).expect("serialize"),
        "\"System.Threading.Tasks.Task<int>\""
    );
    assert!(serde_json::from_str::<TypeReference>("\"Task<\"").is_err());
}
