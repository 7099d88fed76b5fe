//! Common types for the psynth decorator synthesizer.
//!
//! This crate provides the data model shared by every stage of synthesis:
//! - Structural type references (`TypeReference`, `NamedType`) and their parser
//! - Interface member descriptors (`MemberDescriptor` and its variants)
//! - Structural signatures used for merge presence tests (`Signature`, `MemberKey`)
//! - The target class snapshot (`ClassSnapshot`)
//! - Type scopes and the known-type catalog (`TypeScope`, `TypeCatalog`)
//! - Diagnostics, fatal errors, options and limits

// Structural type references and the C# type syntax parser
pub mod type_ref;
pub use type_ref::{AsyncShape, NamedType, TaskWrapper, TupleElement, TypeParseError, TypeReference};

// Interface member descriptors
pub mod members;
pub use members::{
    AccessorSet, EventDescriptor, GenericConstraint, GenericParameter, IndexerDescriptor,
    InterfaceDescriptor, MemberDescriptor, MethodDescriptor, Parameter, ParameterModifier,
    PropertyDescriptor, ReturnKind,
};

// Structural member signatures
pub mod signature;
pub use signature::{MemberKey, Signature, SignatureKind, SignatureParameter};

// Existing class members, keyed by signature
pub mod snapshot;
pub use snapshot::{ClassSnapshot, MemberId, SnapshotMember};

// Namespace scopes and the known-type catalog
pub mod scope;
pub use scope::{Resolution, TypeCatalog, TypeScope};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

pub mod error;
pub use error::SynthesisError;

pub mod options;
pub use options::{NewLineKind, SynthesisMode, SynthesisOptions};

pub mod limits;

pub mod position;
pub use position::Position;
