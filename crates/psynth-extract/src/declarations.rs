//! Serialized declarations of interfaces and classes.
//!
//! The model mirrors what an editor host can read off its syntax tree without
//! binding: names, namespaces, `using` directives, generic parameters and raw
//! members. Types are C# type syntax strings and are qualified later, against
//! the scope of the declaration that mentions them.
//!
//! Members are read one at a time. A member whose JSON does not describe a
//! readable member (a malformed type, a missing field) is kept as an
//! `Unknown` placeholder carrying the error, so the rest of the declaration
//! and the rest of the workspace still load.

use psynth_common::{
    AccessorSet, GenericParameter, Parameter, Position, SynthesisError, TypeCatalog,
    TypeParseError, TypeReference, TypeScope,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawMemberKind {
    Method,
    Property,
    Indexer,
    Event,
    Field,
    Constructor,
    Operator,
    Conversion,
    #[serde(other)]
    Unknown,
}

impl RawMemberKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Indexer => "indexer",
            Self::Event => "event",
            Self::Field => "field",
            Self::Constructor => "constructor",
            Self::Operator => "operator",
            Self::Conversion => "conversion operator",
            Self::Unknown => "unknown member",
        }
    }
}

/// A member as declared, before any scope resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub kind: RawMemberKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<GenericParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Return type of a method, value type of a property, indexer, event or field.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessors: Option<AccessorSet>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<TypeReference>,
    /// Body text. Never inspected for class members; on an interface member it
    /// marks a default implementation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Why the member could not be read, for placeholders.
    #[serde(skip)]
    pub read_error: Option<String>,
}

impl RawMember {
    pub fn new(kind: RawMemberKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            ty: None,
            accessors: None,
            is_static: false,
            explicit_interface: None,
            body: None,
            read_error: None,
        }
    }

    /// Read one member, falling back to an `Unknown` placeholder that keeps
    /// the member's name and the reason it could not be read.
    pub fn from_value(value: serde_json::Value) -> Self {
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        match serde_json::from_value::<Self>(value) {
            Ok(member) => member,
            Err(err) => {
                warn!(member = %name, error = %err, "unreadable member");
                let mut placeholder = Self::new(RawMemberKind::Unknown, &name);
                placeholder.read_error = Some(err.to_string());
                placeholder
            }
        }
    }

    pub const fn is_readable(&self) -> bool {
        self.read_error.is_none()
    }

    pub fn with_type(mut self, ty: TypeReference) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_type_parameter(mut self, parameter: GenericParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<GenericParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<TypeReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, deserialize_with = "read_members")]
    pub members: Vec<RawMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<GenericParameter>,
    /// Interfaces in the base list, as written.
    #[serde(default)]
    pub implements: Vec<TypeReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, deserialize_with = "read_members")]
    pub members: Vec<RawMember>,
    /// Source file holding the declaration, for editor edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Position of the closing brace of the class body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_end: Option<Position>,
    /// Indentation level of the class's members. Derived from the namespace
    /// nesting when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_indent: Option<u32>,
}

fn read_members<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawMember>, D::Error> {
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(RawMember::from_value).collect())
}

/// Shared by interface and class declarations.
trait ScopedDeclaration {
    fn namespace(&self) -> Option<&str>;
    fn imports(&self) -> &[String];

    fn build_scope(&self, catalog: TypeCatalog) -> Result<TypeScope, TypeParseError> {
        TypeScope::new(self.namespace(), catalog).with_imports(self.imports().iter().map(String::as_str))
    }
}

impl ScopedDeclaration for InterfaceDeclaration {
    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn imports(&self) -> &[String] {
        &self.imports
    }
}

impl ScopedDeclaration for ClassDeclaration {
    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn imports(&self) -> &[String] {
        &self.imports
    }
}

fn qualified_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) if !namespace.is_empty() => format!("{namespace}.{name}"),
        _ => name.to_string(),
    }
}

impl InterfaceDeclaration {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()).filter(|ns| !ns.is_empty()),
            name: name.to_string(),
            type_parameters: Vec::new(),
            bases: Vec::new(),
            imports: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.namespace.as_deref(), &self.name)
    }

    /// Resolution scope for types written inside this interface.
    pub fn scope(&self, catalog: TypeCatalog) -> Result<TypeScope, TypeParseError> {
        self.build_scope(catalog)
    }

    /// Whether `reference` names this declaration (same arity; namespace
    /// compared only when the reference carries one).
    pub fn matches(&self, reference: &TypeReference) -> bool {
        let Some(named) = reference.as_named() else {
            return false;
        };
        named.name == self.name
            && named.arguments.len() == self.type_parameters.len()
            && (named.namespace.is_none() || named.namespace == self.namespace)
    }
}

impl ClassDeclaration {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()).filter(|ns| !ns.is_empty()),
            name: name.to_string(),
            type_parameters: Vec::new(),
            implements: Vec::new(),
            imports: Vec::new(),
            members: Vec::new(),
            file_name: None,
            body_end: None,
            member_indent: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.namespace.as_deref(), &self.name)
    }

    pub fn scope(&self, catalog: TypeCatalog) -> Result<TypeScope, TypeParseError> {
        self.build_scope(catalog)
    }

    /// Two levels inside a block-scoped namespace, one otherwise.
    pub fn member_indent(&self) -> u32 {
        self.member_indent
            .unwrap_or(if self.namespace.is_some() { 2 } else { 1 })
    }

    pub fn type_parameter_names(&self) -> rustc_hash::FxHashSet<String> {
        self.type_parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// The implemented interface list, qualified against the class's scope.
    pub fn implemented_interfaces(&self, scope: &TypeScope) -> Vec<TypeReference> {
        let names = self.type_parameter_names();
        self.implements
            .iter()
            .map(|reference| scope.qualify(&reference.bind_type_parameters(&names)))
            .collect()
    }
}

/// Lookup contract the synthesis pipeline needs from its host.
pub trait DeclarationSource {
    fn interfaces(&self) -> &[InterfaceDeclaration];
    fn classes(&self) -> &[ClassDeclaration];

    /// The single interface declaration `reference` names.
    fn find_interface(
        &self,
        reference: &TypeReference,
    ) -> Result<&InterfaceDeclaration, SynthesisError> {
        let mut matches = self.interfaces().iter().filter(|decl| decl.matches(reference));
        let Some(found) = matches.next() else {
            return Err(SynthesisError::unresolved(reference.to_string()));
        };
        let rest: Vec<String> = matches.map(InterfaceDeclaration::qualified_name).collect();
        if rest.is_empty() {
            Ok(found)
        } else {
            let mut candidates = vec![found.qualified_name()];
            candidates.extend(rest);
            Err(SynthesisError::AmbiguousInterface {
                name: reference.to_string(),
                candidates,
            })
        }
    }

    /// A class by qualified (`Acme.Foo`) or simple (`Foo`) name.
    fn find_class(&self, name: &str) -> Result<&ClassDeclaration, SynthesisError> {
        self.classes()
            .iter()
            .find(|decl| decl.qualified_name() == name)
            .or_else(|| self.classes().iter().find(|decl| decl.name == name))
            .ok_or_else(|| SynthesisError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// Well-known types plus everything the declarations declare or mention.
    fn catalog(&self) -> TypeCatalog {
        let mut catalog = TypeCatalog::with_well_known();
        let namespace_of = |ns: &Option<String>| ns.clone().unwrap_or_default();
        for decl in self.interfaces() {
            catalog.insert(&namespace_of(&decl.namespace), &decl.name, decl.type_parameters.len());
            for reference in decl.bases.iter().chain(decl.members.iter().filter_map(|m| m.ty.as_ref())) {
                catalog.insert_reference(reference);
            }
        }
        for decl in self.classes() {
            catalog.insert(&namespace_of(&decl.namespace), &decl.name, decl.type_parameters.len());
            for member in &decl.members {
                if let Some(ty) = &member.ty {
                    catalog.insert_reference(ty);
                }
            }
        }
        catalog
    }
}

/// The serialized workspace file: every declaration the host exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub interfaces: Vec<InterfaceDeclaration>,
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

impl Workspace {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl DeclarationSource for Workspace {
    fn interfaces(&self) -> &[InterfaceDeclaration] {
        &self.interfaces
    }

    fn classes(&self) -> &[ClassDeclaration] {
        &self.classes
    }
}

#[cfg(test)]
#[path = "../tests/declarations_tests.rs"]
mod declarations_tests;
