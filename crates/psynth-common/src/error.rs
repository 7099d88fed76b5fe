//! Fatal synthesis errors.
//!
//! Anything here aborts the whole request and produces no delta. Problems
//! confined to a single member are `Diagnostic`s instead.

use crate::type_ref::TypeParseError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("interface `{name}` could not be resolved")]
    UnresolvedInterface { name: String },

    #[error("interface reference `{name}` matches more than one declaration: {}", candidates.join(", "))]
    AmbiguousInterface {
        name: String,
        candidates: Vec<String>,
    },

    #[error("class `{name}` could not be found")]
    UnknownClass { name: String },

    #[error("class `{class}` does not declare that it implements `{interface}`")]
    ClassDoesNotImplement { class: String, interface: String },

    #[error(transparent)]
    InvalidTypeReference(#[from] TypeParseError),
}

impl SynthesisError {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedInterface { name: name.into() }
    }
}
