//! Type-Name Shortening Policy.
//!
//! Decides, per named type and per emission context, whether synthesized code
//! may spell a type by its simple name. The decision is a pure lookup against
//! the target class's `TypeScope`: the short form is used only when the
//! compiler would bind it to the very same type at that point. Anything else
//! (an ambiguous import, a shadowing type parameter, a type the scope cannot
//! see) falls back to the fully-qualified form.

use psynth_common::{GenericConstraint, NamedType, Resolution, TypeReference, TypeScope};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Names visible at one emission point that are not types from the scope:
/// the class's and the current member's generic parameters.
#[derive(Debug, Clone, Default)]
pub struct EmissionContext {
    type_parameters: FxHashSet<String>,
}

impl EmissionContext {
    pub fn new<'a>(type_parameters: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            type_parameters: type_parameters.into_iter().map(str::to_string).collect(),
        }
    }

    /// The context inside a member that declares `type_parameters` of its own.
    pub fn nested<'a>(&self, type_parameters: impl IntoIterator<Item = &'a str>) -> Self {
        let mut nested = self.clone();
        nested
            .type_parameters
            .extend(type_parameters.into_iter().map(str::to_string));
        nested
    }

    pub fn shadows(&self, name: &str) -> bool {
        self.type_parameters.contains(name)
    }
}

/// How one named type is spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortName {
    /// A `using X = ...` alias names exactly this type.
    Alias(String),
    /// The simple name binds to this type here.
    Short,
    /// The simple name is not usable; spell the namespace out.
    Qualified(QualifyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualifyReason {
    /// Several visible namespaces provide the simple name.
    Ambiguous(Vec<String>),
    /// A generic parameter of the same name hides the type.
    Shadowed,
    /// The simple name binds to a different type, or to nothing.
    NotInScope,
}

#[derive(Debug, Clone, Copy)]
pub struct ShorteningPolicy<'s> {
    scope: &'s TypeScope,
}

impl<'s> ShorteningPolicy<'s> {
    pub const fn new(scope: &'s TypeScope) -> Self {
        Self { scope }
    }

    pub const fn scope(&self) -> &'s TypeScope {
        self.scope
    }

    /// Decide the spelling of the named type `ty` (its arguments are decided
    /// separately when rendering).
    pub fn decide(&self, ty: &TypeReference, context: &EmissionContext) -> ShortName {
        let Some(named) = ty.as_named() else {
            return ShortName::Short;
        };
        if let Some(alias) = self.scope.alias_for(ty)
            && !context.shadows(alias)
        {
            return ShortName::Alias(alias.to_string());
        }
        let Some(namespace) = named.namespace.as_deref() else {
            return ShortName::Short;
        };
        if named.arguments.is_empty() && context.shadows(&named.name) {
            return ShortName::Qualified(QualifyReason::Shadowed);
        }
        match self.scope.resolve(&named.name, named.arity()) {
            Resolution::Namespace(found) if found == namespace => ShortName::Short,
            Resolution::Ambiguous(candidates) => {
                debug!(
                    ty = %ty,
                    candidates = ?candidates,
                    "ambiguous short name, using the fully-qualified form"
                );
                ShortName::Qualified(QualifyReason::Ambiguous(candidates))
            }
            Resolution::Namespace(_) | Resolution::Alias(_) | Resolution::NotFound => {
                ShortName::Qualified(QualifyReason::NotInScope)
            }
        }
    }

    /// Render `ty` as C# source at an emission point.
    pub fn render(&self, ty: &TypeReference, context: &EmissionContext) -> String {
        let mut out = String::new();
        self.write(&mut out, ty, context);
        out
    }

    pub fn render_constraint(&self, constraint: &GenericConstraint, context: &EmissionContext) -> String {
        match constraint {
            GenericConstraint::Type(ty) => self.render(ty, context),
            other => other.to_string(),
        }
    }

    fn write(&self, out: &mut String, ty: &TypeReference, context: &EmissionContext) {
        match ty {
            TypeReference::Named(named) => {
                if let Some(keyword) = ty.keyword() {
                    out.push_str(keyword);
                    return;
                }
                match self.decide(ty, context) {
                    ShortName::Alias(alias) => out.push_str(&alias),
                    ShortName::Short => self.write_named(out, named, false, context),
                    ShortName::Qualified(_) => self.write_named(out, named, true, context),
                }
            }
            TypeReference::Array { element, rank } => {
                self.write(out, element, context);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            TypeReference::Nullable(inner) => {
                self.write(out, inner, context);
                out.push('?');
            }
            TypeReference::Tuple(elements) => {
                out.push('(');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, &element.ty, context);
                    if let Some(name) = &element.name {
                        out.push(' ');
                        out.push_str(name);
                    }
                }
                out.push(')');
            }
            TypeReference::Pointer(pointee) => {
                self.write(out, pointee, context);
                out.push('*');
            }
            TypeReference::Void | TypeReference::TypeParameter(_) => {
                out.push_str(&ty.to_string());
            }
        }
    }

    fn write_named(
        &self,
        out: &mut String,
        named: &NamedType,
        qualified: bool,
        context: &EmissionContext,
    ) {
        if qualified && let Some(namespace) = &named.namespace {
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
                self.write(out, argument, context);
            }
            out.push('>');
        }
    }
}

#[cfg(test)]
#[path = "../tests/shorten_tests.rs"]
mod shorten_tests;
