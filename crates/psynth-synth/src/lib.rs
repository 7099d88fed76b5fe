//! Decorator synthesis for psynth.
//!
//! This crate turns an extracted `InterfaceDescriptor` into the candidate
//! member set of a Polly decorator:
//! - Member classification into forwarding strategies (`MemberClassifier`)
//! - The type-name shortening policy used at emission time
//! - A small declaration IR for the members a decorator consists of
//! - Field and helper naming (`FieldBindings`)
//! - The synthesizer producing the candidate set (`DecoratorSynthesizer`)
//! - A printer rendering declarations as C# source

pub mod classify;
pub use classify::{ForwardingStrategy, HelperKind, MemberClassifier, PlanShape, SynthesisPlan};

pub mod shorten;
pub use shorten::{EmissionContext, QualifyReason, ShortName, ShorteningPolicy};

pub mod ir;
pub use ir::{
    Accessibility, ConstructorDeclaration, Declaration, EventDeclaration, Expr,
    FieldDeclaration, MethodDeclaration, PropertyDeclaration, PropertyName, Statement,
};

pub mod naming;
pub use naming::FieldBindings;

pub mod synthesizer;
pub use synthesizer::{CandidateMember, CandidateSet, DeclarationRole, DecoratorSynthesizer};

pub mod printer;
pub use printer::DeclarationPrinter;
