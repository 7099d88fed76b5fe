//! Declaration IR for synthesized members.
//!
//! The synthesizer builds these trees instead of strings; the printer walks
//! them to produce C#. Keeping declarations structured lets the merge engine
//! compute each candidate's `MemberKey` from the same value that is printed,
//! so what gets compared and what gets inserted cannot drift apart.
//!
//! Only the constructs a decorator needs are modeled: fields, one
//! constructor, methods, properties/indexers and events, with bodies made of
//! single-call statements.

use psynth_common::{GenericParameter, MemberKey, Parameter, Signature, TypeReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Private,
    /// Explicit interface implementations carry no modifier.
    None,
}

impl Accessibility {
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Public => Some("public"),
            Self::Private => Some("private"),
            Self::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `name`
    Identifier(String),
    /// `this`
    This,
    /// `target.name`
    MemberAccess { target: Box<Self>, name: String },
    /// `target[arguments]`
    ElementAccess {
        target: Box<Self>,
        arguments: Vec<Self>,
    },
    /// `callee<type_arguments>(arguments)`
    Invocation {
        callee: Box<Self>,
        type_arguments: Vec<TypeReference>,
        arguments: Vec<Self>,
    },
    /// `() => body`
    Lambda { body: Box<Self> },
    /// `target = value`
    Assign { target: Box<Self>, value: Box<Self> },
    /// `target += value`, `target -= value`
    CompoundAssign {
        target: Box<Self>,
        operator: &'static str,
        value: Box<Self>,
    },
    /// `await expr`
    Await(Box<Self>),
    /// `((ty)expr)`
    Cast { ty: TypeReference, expr: Box<Self> },
    /// `new ty(arguments)`
    New {
        ty: TypeReference,
        arguments: Vec<Self>,
    },
}

impl Expr {
    pub fn identifier(name: &str) -> Self {
        Self::Identifier(name.to_string())
    }

    pub fn member(self, name: &str) -> Self {
        Self::MemberAccess {
            target: Box::new(self),
            name: name.to_string(),
        }
    }

    pub fn call(self, type_arguments: Vec<TypeReference>, arguments: Vec<Self>) -> Self {
        Self::Invocation {
            callee: Box::new(self),
            type_arguments,
            arguments,
        }
    }

    pub fn index(self, arguments: Vec<Self>) -> Self {
        Self::ElementAccess {
            target: Box::new(self),
            arguments,
        }
    }

    pub fn lambda(body: Self) -> Self {
        Self::Lambda {
            body: Box::new(body),
        }
    }

    pub fn assign(self, value: Self) -> Self {
        Self::Assign {
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    pub fn compound_assign(self, operator: &'static str, value: Self) -> Self {
        Self::CompoundAssign {
            target: Box::new(self),
            operator,
            value: Box::new(value),
        }
    }

    pub fn awaited(self) -> Self {
        Self::Await(Box::new(self))
    }

    pub fn cast(self, ty: TypeReference) -> Self {
        Self::Cast {
            ty,
            expr: Box::new(self),
        }
    }

    pub fn construct(ty: TypeReference, arguments: Vec<Self>) -> Self {
        Self::New { ty, arguments }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Return(Expr),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub ty: TypeReference,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDeclaration {
    pub class_name: String,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub accessibility: Accessibility,
    pub is_async: bool,
    pub return_type: TypeReference,
    pub explicit_interface: Option<TypeReference>,
    pub name: String,
    pub type_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Named(String),
    /// `this[parameters]`
    Indexer(Vec<Parameter>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub accessibility: Accessibility,
    pub ty: TypeReference,
    pub explicit_interface: Option<TypeReference>,
    pub name: PropertyName,
    pub getter: Option<Vec<Statement>>,
    pub setter: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDeclaration {
    pub accessibility: Accessibility,
    pub ty: TypeReference,
    pub explicit_interface: Option<TypeReference>,
    pub name: String,
    pub add: Vec<Statement>,
    pub remove: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Field(FieldDeclaration),
    Constructor(ConstructorDeclaration),
    Method(MethodDeclaration),
    Property(PropertyDeclaration),
    Event(EventDeclaration),
}

impl Declaration {
    /// Structural key used for presence tests. Bodies, accessibility and
    /// `async` never take part.
    pub fn key(&self) -> MemberKey {
        match self {
            Self::Field(field) => MemberKey::field(field.ty.clone()),
            Self::Constructor(ctor) => MemberKey::constructor(&ctor.parameters),
            Self::Method(method) => MemberKey::Member(Signature::method(
                &method.name,
                &method.type_parameters,
                &method.parameters,
            )),
            Self::Property(property) => match &property.name {
                PropertyName::Named(name) => MemberKey::Member(Signature::property(name)),
                PropertyName::Indexer(parameters) => MemberKey::Member(Signature::indexer(parameters)),
            },
            Self::Event(event) => MemberKey::Member(Signature::event(&event.name)),
        }
    }

    /// Declared name; `this` for indexers, the class name for constructors.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(field) => &field.name,
            Self::Constructor(ctor) => &ctor.class_name,
            Self::Method(method) => &method.name,
            Self::Property(property) => match &property.name {
                PropertyName::Named(name) => name,
                PropertyName::Indexer(_) => "this",
            },
            Self::Event(event) => &event.name,
        }
    }

    pub fn explicit_interface(&self) -> Option<&TypeReference> {
        match self {
            Self::Method(method) => method.explicit_interface.as_ref(),
            Self::Property(property) => property.explicit_interface.as_ref(),
            Self::Event(event) => event.explicit_interface.as_ref(),
            Self::Field(_) | Self::Constructor(_) => None,
        }
    }

    pub const fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}
