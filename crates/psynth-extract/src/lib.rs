//! Declaration model and interface member extraction.
//!
//! This crate implements the input side of synthesis:
//! - The serde declaration model of interfaces and classes (`Workspace`)
//! - The `DeclarationSource` lookup contract an editor host implements
//! - Interface flattening into an `InterfaceDescriptor` (`InterfaceExtractor`)
//! - Class snapshotting into a signature-keyed `ClassSnapshot`

pub mod declarations;
pub use declarations::{
    ClassDeclaration, DeclarationSource, InterfaceDeclaration, RawMember, RawMemberKind, Workspace,
};

pub mod extractor;
pub use extractor::{Extraction, InterfaceExtractor};

pub mod class_snapshot;
pub use class_snapshot::snapshot_class;
