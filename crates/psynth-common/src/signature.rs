//! Structural member signatures.
//!
//! Presence of a member in a class is decided by signature equality alone:
//! kind + name + generic arity + parameter (modifier, type) list. Bodies,
//! parameter names and return types never participate.
//!
//! Method type parameters are canonicalized by position, so `M<T>(T x)` and
//! `M<U>(U y)` are the same signature.

use crate::members::{GenericParameter, Parameter, ParameterModifier};
use crate::type_ref::TypeReference;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureKind {
    Method,
    Property,
    Indexer,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SignatureParameter {
    pub modifier: ParameterModifier,
    #[serde(rename = "type")]
    pub ty: TypeReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub kind: SignatureKind,
    pub name: String,
    pub generic_arity: usize,
    pub parameters: Vec<SignatureParameter>,
}

/// Identity of anything the merge engine can add to a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberKey {
    /// Fields are keyed by type, not by name.
    Field {
        #[serde(rename = "type")]
        ty: TypeReference,
    },
    Constructor {
        parameters: Vec<SignatureParameter>,
    },
    Member(Signature),
}

/// Placeholder name for the method type parameter at `index`.
fn canonical_type_parameter(index: usize) -> TypeReference {
    TypeReference::TypeParameter(format!("!!{index}"))
}

/// Parameter list with method type parameters replaced by positional placeholders.
pub fn canonical_parameters(
    type_parameters: &[GenericParameter],
    parameters: &[Parameter],
) -> Vec<SignatureParameter> {
    let map: FxHashMap<String, TypeReference> = type_parameters
        .iter()
        .enumerate()
        .map(|(i, param)| (param.name.clone(), canonical_type_parameter(i)))
        .collect();
    parameters
        .iter()
        .map(|param| SignatureParameter {
            modifier: param.modifier.signature_part(),
            ty: param.ty.substitute(&map),
        })
        .collect()
}

impl Signature {
    pub fn method(
        name: &str,
        type_parameters: &[GenericParameter],
        parameters: &[Parameter],
    ) -> Self {
        Self {
            kind: SignatureKind::Method,
            name: name.to_string(),
            generic_arity: type_parameters.len(),
            parameters: canonical_parameters(type_parameters, parameters),
        }
    }

    pub fn property(name: &str) -> Self {
        Self {
            kind: SignatureKind::Property,
            name: name.to_string(),
            generic_arity: 0,
            parameters: Vec::new(),
        }
    }

    pub fn indexer(parameters: &[Parameter]) -> Self {
        Self {
            kind: SignatureKind::Indexer,
            name: "this".to_string(),
            generic_arity: 0,
            parameters: canonical_parameters(&[], parameters),
        }
    }

    pub fn event(name: &str) -> Self {
        Self {
            kind: SignatureKind::Event,
            name: name.to_string(),
            generic_arity: 0,
            parameters: Vec::new(),
        }
    }
}

impl MemberKey {
    pub fn field(ty: TypeReference) -> Self {
        Self::Field { ty }
    }

    pub fn constructor(parameters: &[Parameter]) -> Self {
        Self::Constructor {
            parameters: canonical_parameters(&[], parameters),
        }
    }
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &[SignatureParameter]) -> fmt::Result {
    for (i, param) in parameters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Some(keyword) = param.modifier.keyword() {
            write!(f, "{keyword} ")?;
        }
        write!(f, "{}", param.ty)?;
    }
    Ok(())
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.generic_arity > 0 {
            write!(f, "`{}", self.generic_arity)?;
        }
        match self.kind {
            SignatureKind::Method => {
                f.write_str("(")?;
                write_parameters(f, &self.parameters)?;
                f.write_str(")")
            }
            SignatureKind::Indexer => {
                f.write_str("[")?;
                write_parameters(f, &self.parameters)?;
                f.write_str("]")
            }
            SignatureKind::Property | SignatureKind::Event => Ok(()),
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { ty } => write!(f, "field of type {ty}"),
            Self::Constructor { parameters } => {
                f.write_str(".ctor(")?;
                write_parameters(f, parameters)?;
                f.write_str(")")
            }
            Self::Member(signature) => write!(f, "{signature}"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod signature_tests;
