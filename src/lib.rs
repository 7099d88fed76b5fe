//! psynth: Polly resilience decorators for C# interfaces.
//!
//! Given an interface and a class that declares it, psynth computes the
//! members the class needs to become a decorator that routes every call
//! through a resilience policy, and nothing it already has.
//!
//! The stages live in workspace crates, re-exported here:
//! - [`common`]: type references, member descriptors, signatures, snapshots
//! - [`extract`]: the declaration model and interface extraction
//! - [`synth`]: classification, naming, the declaration IR and printer
//! - [`merge`]: delta computation, application and rendering
//!
//! This crate adds the request pipeline, the editor code actions and the CLI.

pub use psynth_common as common;
pub use psynth_extract as extract;
pub use psynth_merge as merge;
pub use psynth_synth as synth;

pub use psynth_common::{
    ClassSnapshot, Diagnostic, InterfaceDescriptor, SynthesisError, SynthesisMode,
    SynthesisOptions,
};
pub use psynth_merge::MergeDelta;

// Synthesis requests, from descriptors or from a declaration source
pub mod pipeline;
pub use pipeline::{
    ClassSynthesis, Synthesis, SynthesisOutcome, SynthesisRequest, check_class, synthesize,
    synthesize_class,
};

// Editor code fixes
pub mod code_actions;
pub use code_actions::{CodeFixInfo, code_actions_for_class};

pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;
