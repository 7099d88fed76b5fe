//! Structural type references.
//!
//! A `TypeReference` is the resolved shape of a type as it appears in a member
//! declaration. Equality is structural (namespace + name + generic arguments),
//! never textual: `int` and `System.Int32` parse to the same value.
//!
//! References are written in C# type syntax wherever they cross a serialization
//! boundary, so the workspace model can spell `System.Threading.Tasks.Task<T>`
//! instead of a nested object.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace of the task-like asynchronous result wrappers.
pub const TASKS_NAMESPACE: &str = "System.Threading.Tasks";

pub const SYSTEM_NAMESPACE: &str = "System";

/// C# keyword aliases for `System` types, as (keyword, type name).
const KEYWORD_TYPES: &[(&str, &str)] = &[
    ("bool", "Boolean"),
    ("byte", "Byte"),
    ("sbyte", "SByte"),
    ("char", "Char"),
    ("decimal", "Decimal"),
    ("double", "Double"),
    ("float", "Single"),
    ("int", "Int32"),
    ("uint", "UInt32"),
    ("long", "Int64"),
    ("ulong", "UInt64"),
    ("short", "Int16"),
    ("ushort", "UInt16"),
    ("object", "Object"),
    ("string", "String"),
    ("nint", "IntPtr"),
    ("nuint", "UIntPtr"),
];

/// A resolved reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeReference {
    /// `void`
    Void,
    /// A namespace-qualified (or, when unresolvable, bare) named type.
    Named(NamedType),
    /// A generic type parameter in scope at the use site.
    TypeParameter(String),
    /// `T[]`, `T[,]`
    Array {
        element: Box<TypeReference>,
        rank: u32,
    },
    /// `T?`
    Nullable(Box<TypeReference>),
    /// `(int, string name)`
    Tuple(Vec<TupleElement>),
    /// `T*`
    Pointer(Box<TypeReference>),
}

/// One element of a tuple type. Element names are kept for printing but do
/// not take part in equality: `(int a, int b)` and `(int, int)` are the same
/// type.
#[derive(Debug, Clone)]
pub struct TupleElement {
    pub ty: TypeReference,
    pub name: Option<String>,
}

impl TupleElement {
    pub fn new(ty: TypeReference) -> Self {
        Self { ty, name: None }
    }

    pub fn named(ty: TypeReference, name: &str) -> Self {
        Self {
            ty,
            name: Some(name.to_string()),
        }
    }
}

impl PartialEq for TupleElement {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TupleElement {}

impl Hash for TupleElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    /// `None` when the name could not be qualified against any scope.
    pub namespace: Option<String>,
    pub name: String,
    pub arguments: Vec<TypeReference>,
}

/// The awaitable type a task-like reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskWrapper {
    /// `Task`, `Task<T>`
    Task,
    /// `ValueTask`, `ValueTask<T>`
    ValueTask,
}

/// How a task-like return type wraps its eventual value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncShape<'a> {
    /// `Task`
    Void,
    /// `Task<T>`
    Value(&'a TypeReference),
}

impl NamedType {
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Whether this names `ns.name` with any generic arity.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }
}

impl TypeReference {
    pub fn named(namespace: &str, name: &str, arguments: Vec<TypeReference>) -> Self {
        Self::Named(NamedType {
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            name: name.to_string(),
            arguments,
        })
    }

    pub fn type_parameter(name: &str) -> Self {
        Self::TypeParameter(name.to_string())
    }

    /// `System.Threading.Tasks.Task` or `Task<result>`.
    pub fn task(result: Option<TypeReference>) -> Self {
        Self::named(TASKS_NAMESPACE, "Task", result.into_iter().collect())
    }

    /// `System.Action`
    pub fn action() -> Self {
        Self::named(SYSTEM_NAMESPACE, "Action", Vec::new())
    }

    /// `System.Func<result>`
    pub fn func(result: TypeReference) -> Self {
        Self::named(SYSTEM_NAMESPACE, "Func", vec![result])
    }

    /// Parse C# type syntax.
    pub fn parse(text: &str) -> Result<Self, TypeParseError> {
        let mut parser = TypeParser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos < text.len() {
            return Err(parser.error("unexpected trailing characters"));
        }
        Ok(ty)
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// The C# keyword for this type, if it is one of the predefined `System` types.
    pub fn keyword(&self) -> Option<&'static str> {
        let named = self.as_named()?;
        if named.namespace.as_deref() != Some(SYSTEM_NAMESPACE) || !named.arguments.is_empty() {
            return None;
        }
        KEYWORD_TYPES
            .iter()
            .find(|(_, type_name)| *type_name == named.name)
            .map(|(keyword, _)| *keyword)
    }

    /// The awaitable wrapper this reference names, if any.
    ///
    /// A nullable-annotated `Task?` is still a task. `ValueTask?` is
    /// `Nullable<ValueTask>`, which cannot be awaited, so it is not.
    pub fn task_wrapper(&self) -> Option<TaskWrapper> {
        match self {
            Self::Nullable(inner) => match inner.task_wrapper()? {
                TaskWrapper::Task => Some(TaskWrapper::Task),
                TaskWrapper::ValueTask => None,
            },
            Self::Named(named) if named.arguments.len() <= 1 => {
                if named.is(TASKS_NAMESPACE, "Task") {
                    Some(TaskWrapper::Task)
                } else if named.is(TASKS_NAMESPACE, "ValueTask") {
                    Some(TaskWrapper::ValueTask)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Classify a task-like asynchronous result wrapper.
    ///
    /// `Task`, `Task<T>`, `ValueTask` and `ValueTask<T>` count, as does a
    /// nullable-annotated `Task`. Custom awaitables are plain values.
    pub fn async_shape(&self) -> Option<AsyncShape<'_>> {
        self.task_wrapper()?;
        let named = match self {
            Self::Nullable(inner) => inner.as_named()?,
            other => other.as_named()?,
        };
        match named.arguments.as_slice() {
            [] => Some(AsyncShape::Void),
            [result] => Some(AsyncShape::Value(result)),
            _ => None,
        }
    }

    /// The fully-qualified source form (keyword types print as keywords).
    pub fn fully_qualified(&self) -> String {
        self.to_string()
    }

    /// The form with every namespace dropped, or `None` when it would be
    /// identical to the fully-qualified form.
    ///
    /// Whether the short form is actually valid at a use site is decided by the
    /// shortening policy, not here.
    pub fn short_form(&self) -> Option<String> {
        let mut short = String::new();
        self.write_with(&mut short, &|_| true);
        let full = self.fully_qualified();
        if short == full { None } else { Some(short) }
    }

    /// Rebuild the reference bottom-up, handing every rebuilt node to `f`.
    pub fn transform(&self, f: &mut dyn FnMut(TypeReference) -> TypeReference) -> TypeReference {
        let rebuilt = match self {
            Self::Named(named) => {
                let mut arguments = Vec::with_capacity(named.arguments.len());
                for argument in &named.arguments {
                    arguments.push(argument.transform(f));
                }
                Self::Named(NamedType {
                    namespace: named.namespace.clone(),
                    name: named.name.clone(),
                    arguments,
                })
            }
            Self::Array { element, rank } => Self::Array {
                element: Box::new(element.transform(f)),
                rank: *rank,
            },
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.transform(f))),
            Self::Tuple(elements) => Self::Tuple(
                elements
                    .iter()
                    .map(|element| TupleElement {
                        ty: element.ty.transform(f),
                        name: element.name.clone(),
                    })
                    .collect(),
            ),
            Self::Pointer(pointee) => Self::Pointer(Box::new(pointee.transform(f))),
            Self::Void | Self::TypeParameter(_) => self.clone(),
        };
        f(rebuilt)
    }

    /// Walk the reference pre-order, handing every node to `f`.
    pub fn visit(&self, f: &mut dyn FnMut(&TypeReference)) {
        f(self);
        match self {
            Self::Named(named) => {
                for argument in &named.arguments {
                    argument.visit(f);
                }
            }
            Self::Array { element, .. } => element.visit(f),
            Self::Nullable(inner) | Self::Pointer(inner) => inner.visit(f),
            Self::Tuple(elements) => {
                for element in elements {
                    element.ty.visit(f);
                }
            }
            Self::Void | Self::TypeParameter(_) => {}
        }
    }

    /// Replace type parameters by the mapped references.
    pub fn substitute(&self, map: &FxHashMap<String, TypeReference>) -> TypeReference {
        if map.is_empty() {
            return self.clone();
        }
        self.transform(&mut |ty| match ty {
            Self::TypeParameter(name) => match map.get(&name) {
                Some(replacement) => replacement.clone(),
                None => Self::TypeParameter(name),
            },
            other => other,
        })
    }

    /// Turn bare, argument-less names that match an in-scope type parameter
    /// into `TypeParameter` references.
    pub fn bind_type_parameters(&self, names: &FxHashSet<String>) -> TypeReference {
        if names.is_empty() {
            return self.clone();
        }
        self.transform(&mut |ty| match ty {
            Self::Named(ref named)
                if named.namespace.is_none()
                    && named.arguments.is_empty()
                    && names.contains(&named.name) =>
            {
                Self::TypeParameter(named.name.clone())
            }
            other => other,
        })
    }

    /// Whether the type parameter `name` appears anywhere in the reference.
    pub fn mentions_type_parameter(&self, name: &str) -> bool {
        let mut found = false;
        self.visit(&mut |node| {
            if matches!(node, Self::TypeParameter(param) if param == name) {
                found = true;
            }
        });
        found
    }

    /// Render with a caller-chosen decision per named type: `shorten(named)`
    /// returning true drops the namespace of that node.
    pub fn write_with(&self, out: &mut String, shorten: &dyn Fn(&NamedType) -> bool) {
        match self {
            Self::Void => out.push_str("void"),
            Self::TypeParameter(name) => out.push_str(name),
            Self::Named(named) => {
                if let Some(keyword) = self.keyword() {
                    out.push_str(keyword);
                    return;
                }
                if let Some(namespace) = &named.namespace
                    && !shorten(named)
                {
                    out.push_str(namespace);
                    out.push('.');
                }
                out.push_str(&named.name);
                if !named.arguments.is_empty() {
                    out.push('<');
                    for (i, argument) in named.arguments.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        argument.write_with(out, shorten);
                    }
                    out.push('>');
                }
            }
            Self::Array { element, rank } => {
                element.write_with(out, shorten);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            Self::Nullable(inner) => {
                inner.write_with(out, shorten);
                out.push('?');
            }
            Self::Tuple(elements) => {
                out.push('(');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    element.ty.write_with(out, shorten);
                    if let Some(name) = &element.name {
                        out.push(' ');
                        out.push_str(name);
                    }
                }
                out.push(')');
            }
            Self::Pointer(pointee) => {
                pointee.write_with(out, shorten);
                out.push('*');
            }
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_with(&mut out, &|_| false);
        f.write_str(&out)
    }
}

impl TryFrom<String> for TypeReference {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeReference> for String {
    fn from(value: TypeReference) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type reference `{text}` at offset {position}: {message}")]
pub struct TypeParseError {
    pub text: String,
    pub position: usize,
    pub message: &'static str,
}

/// Recursive-descent parser over C# type syntax.
struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, message: &'static str) -> TypeParseError {
        TypeParseError {
            text: self.text.to_string(),
            position: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeReference, TypeParseError> {
        let mut ty = self.parse_base()?;
        loop {
            if self.eat('?') {
                ty = TypeReference::Nullable(Box::new(ty));
            } else if self.eat('*') {
                ty = TypeReference::Pointer(Box::new(ty));
            } else if self.eat('[') {
                let mut rank = 1;
                loop {
                    if self.eat(',') {
                        rank += 1;
                    } else if self.eat(']') {
                        break;
                    } else {
                        return Err(self.error("expected `,` or `]` in array rank"));
                    }
                }
                ty = TypeReference::Array {
                    element: Box::new(ty),
                    rank,
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_base(&mut self) -> Result<TypeReference, TypeParseError> {
        if self.eat('(') {
            return self.parse_tuple();
        }
        self.skip_whitespace();
        if self.text[self.pos..].starts_with("global::") {
            self.pos += "global::".len();
        }

        let mut path = vec![self.parse_identifier()?];
        while self.eat('.') {
            path.push(self.parse_identifier()?);
        }

        let mut arguments = Vec::new();
        if self.eat('<') {
            loop {
                arguments.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>` in type argument list"));
            }
        }

        if path.len() == 1 && arguments.is_empty() {
            if path[0] == "void" {
                return Ok(TypeReference::Void);
            }
            if let Some((_, type_name)) = KEYWORD_TYPES.iter().find(|(kw, _)| *kw == path[0]) {
                return Ok(TypeReference::named(SYSTEM_NAMESPACE, type_name, Vec::new()));
            }
        }

        let name = path.pop().unwrap_or_default();
        Ok(TypeReference::Named(NamedType {
            namespace: if path.is_empty() {
                None
            } else {
                Some(path.join("."))
            },
            name,
            arguments,
        }))
    }

    /// Elements after the opening parenthesis, each an optionally named type.
    fn parse_tuple(&mut self) -> Result<TypeReference, TypeParseError> {
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            self.skip_whitespace();
            let name = match self.peek() {
                Some(ch) if ch.is_alphabetic() || ch == '_' || ch == '@' => {
                    Some(self.parse_identifier()?)
                }
                _ => None,
            };
            elements.push(TupleElement { ty, name });
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                break;
            }
            return Err(self.error("expected `,` or `)` in tuple type"));
        }
        if elements.len() < 2 {
            return Err(self.error("a tuple type needs at least two elements"));
        }
        Ok(TypeReference::Tuple(elements))
    }

    fn parse_identifier(&mut self) -> Result<String, TypeParseError> {
        self.skip_whitespace();
        let start = self.pos;
        if self.peek() == Some('@') {
            self.pos += 1;
        }
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        let ident = &self.text[start..self.pos];
        let ident = ident.strip_prefix('@').unwrap_or(ident);
        match ident.chars().next() {
            Some(first) if !first.is_ascii_digit() => Ok(ident.to_string()),
            _ => Err(self.error("expected identifier")),
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_ref_tests.rs"]
mod type_ref_tests;
