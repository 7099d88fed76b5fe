//! Normalized interface member descriptors.
//!
//! Member shapes form a closed set: every stage that consumes a
//! `MemberDescriptor` matches it exhaustively, so a new shape cannot slip past
//! classification or synthesis unnoticed.

use crate::signature::Signature;
use crate::type_ref::{AsyncShape, TypeParseError, TypeReference};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterModifier {
    #[default]
    None,
    Ref,
    Out,
    In,
    Params,
}

impl ParameterModifier {
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Ref => Some("ref"),
            Self::Out => Some("out"),
            Self::In => Some("in"),
            Self::Params => Some("params"),
        }
    }

    /// By-reference parameters cannot be captured by a closure.
    pub const fn is_by_reference(self) -> bool {
        matches!(self, Self::Ref | Self::Out | Self::In)
    }

    /// The part of the modifier that distinguishes overloads. `params` does not.
    pub const fn signature_part(self) -> Self {
        match self {
            Self::Params => Self::None,
            other => other,
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    #[serde(default, skip_serializing_if = "ParameterModifier::is_none")]
    pub modifier: ParameterModifier,
    /// Default value expression, copied verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: &str, ty: TypeReference) -> Self {
        Self {
            name: name.to_string(),
            ty,
            modifier: ParameterModifier::None,
            default_value: None,
        }
    }
}

/// A single `where T : ...` clause entry.
///
/// A base-class constraint and an interface constraint are both `Type`; the
/// distinction does not change how the constraint is carried or printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GenericConstraint {
    Class,
    Struct,
    Unmanaged,
    NotNull,
    /// `new()`
    New,
    Type(TypeReference),
}

impl fmt::Display for GenericConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Struct => f.write_str("struct"),
            Self::Unmanaged => f.write_str("unmanaged"),
            Self::NotNull => f.write_str("notnull"),
            Self::New => f.write_str("new()"),
            Self::Type(ty) => write!(f, "{ty}"),
        }
    }
}

impl TryFrom<String> for GenericConstraint {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(match value.trim() {
            "class" => Self::Class,
            "struct" => Self::Struct,
            "unmanaged" => Self::Unmanaged,
            "notnull" => Self::NotNull,
            "new()" => Self::New,
            other => Self::Type(TypeReference::parse(other)?),
        })
    }
}

impl From<GenericConstraint> for String {
    fn from(value: GenericConstraint) -> Self {
        value.to_string()
    }
}

impl GenericConstraint {
    pub fn map_type(&self, f: impl FnOnce(&TypeReference) -> TypeReference) -> Self {
        match self {
            Self::Type(ty) => Self::Type(f(ty)),
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<GenericConstraint>,
}

impl GenericParameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: GenericConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// What a member's return type looks like to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReturnKind {
    Void,
    Value,
    /// A task-like wrapper; `result` is the wrapped value type, if any.
    Async { result: Option<TypeReference> },
}

impl ReturnKind {
    pub fn of(ty: &TypeReference) -> Self {
        if ty.is_void() {
            return Self::Void;
        }
        match ty.async_shape() {
            Some(AsyncShape::Void) => Self::Async { result: None },
            Some(AsyncShape::Value(result)) => Self::Async {
                result: Some(result.clone()),
            },
            None => Self::Value,
        }
    }

    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessorSet {
    #[serde(default)]
    pub get: bool,
    #[serde(default)]
    pub set: bool,
}

impl AccessorSet {
    pub const GET_SET: Self = Self {
        get: true,
        set: true,
    };
    pub const GET: Self = Self {
        get: true,
        set: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub type_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeReference,
    pub returns: ReturnKind,
    /// Set when the member must be implemented explicitly (`IFoo.M`).
    pub explicit_interface: Option<TypeReference>,
}

impl MethodDescriptor {
    pub fn new(name: &str, return_type: TypeReference) -> Self {
        let returns = ReturnKind::of(&return_type);
        Self {
            name: name.to_string(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            returns,
            explicit_interface: None,
        }
    }

    pub fn with_type_parameter(mut self, parameter: GenericParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    pub accessors: AccessorSet,
    pub explicit_interface: Option<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerDescriptor {
    pub parameters: Vec<Parameter>,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    pub accessors: AccessorSet,
    pub explicit_interface: Option<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    pub explicit_interface: Option<TypeReference>,
}

/// One member the implementing class must expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberDescriptor {
    Method(MethodDescriptor),
    Property(PropertyDescriptor),
    Indexer(IndexerDescriptor),
    Event(EventDescriptor),
}

impl MemberDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Method(method) => &method.name,
            Self::Property(property) => &property.name,
            Self::Indexer(_) => "this",
            Self::Event(event) => &event.name,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Method(method) => {
                Signature::method(&method.name, &method.type_parameters, &method.parameters)
            }
            Self::Property(property) => Signature::property(&property.name),
            Self::Indexer(indexer) => Signature::indexer(&indexer.parameters),
            Self::Event(event) => Signature::event(&event.name),
        }
    }

    /// Return type for methods, value type for properties, indexers and events.
    pub fn value_type(&self) -> &TypeReference {
        match self {
            Self::Method(method) => &method.return_type,
            Self::Property(property) => &property.ty,
            Self::Indexer(indexer) => &indexer.ty,
            Self::Event(event) => &event.ty,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        match self {
            Self::Method(method) => &method.parameters,
            Self::Indexer(indexer) => &indexer.parameters,
            Self::Property(_) | Self::Event(_) => &[],
        }
    }

    pub fn explicit_interface(&self) -> Option<&TypeReference> {
        match self {
            Self::Method(method) => method.explicit_interface.as_ref(),
            Self::Property(property) => property.explicit_interface.as_ref(),
            Self::Indexer(indexer) => indexer.explicit_interface.as_ref(),
            Self::Event(event) => event.explicit_interface.as_ref(),
        }
    }

    pub fn set_explicit_interface(&mut self, interface: TypeReference) {
        let slot = match self {
            Self::Method(method) => &mut method.explicit_interface,
            Self::Property(property) => &mut property.explicit_interface,
            Self::Indexer(indexer) => &mut indexer.explicit_interface,
            Self::Event(event) => &mut event.explicit_interface,
        };
        *slot = Some(interface);
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Property(_) => "property",
            Self::Indexer(_) => "indexer",
            Self::Event(_) => "event",
        }
    }
}

/// The flattened member set of one (instantiated) interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescriptor {
    pub interface: TypeReference,
    pub members: Vec<MemberDescriptor>,
}

impl InterfaceDescriptor {
    pub fn new(interface: TypeReference) -> Self {
        Self {
            interface,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.interface {
            TypeReference::Named(named) => &named.name,
            _ => "",
        }
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }
}
