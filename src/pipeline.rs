//! End-to-end synthesis requests.
//!
//! [`synthesize`] is the pure core: an interface shape, a class shape and a
//! mode in, a delta out. [`synthesize_class`] and [`check_class`] run the
//! whole pipeline against a [`DeclarationSource`]:
//!
//! ```text
//! find class -> scope -> snapshot -> implemented interfaces
//!   -> describe interface -> bind fields -> synthesize -> merge -> render
//! ```

use psynth_common::diagnostics::diagnostic_messages;
use psynth_common::{
    ClassSnapshot, Diagnostic, InterfaceDescriptor, Position, SynthesisError, SynthesisMode,
    SynthesisOptions, TypeReference, TypeScope,
};
use psynth_extract::{
    ClassDeclaration, DeclarationSource, Extraction, InterfaceExtractor, snapshot_class,
};
use psynth_merge::{MergeDelta, Placement, apply_delta, compute_delta, missing_members_diagnostic, render_delta};
use psynth_synth::{DecoratorSynthesizer, FieldBindings};
use serde::Serialize;
use tracing::{debug, debug_span, warn};

/// A delta together with the members that were left out of it.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub delta: MergeDelta,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compute what `snapshot` needs to become a Polly decorator of `descriptor`.
pub fn synthesize(
    descriptor: &InterfaceDescriptor,
    snapshot: &ClassSnapshot,
    mode: SynthesisMode,
    options: &SynthesisOptions,
) -> Synthesis {
    let bindings = FieldBindings::resolve(descriptor, snapshot, options);
    let candidates = DecoratorSynthesizer::new(options)
        .with_mode(mode)
        .synthesize(descriptor, &bindings);
    let delta = compute_delta(&candidates, snapshot);
    for diagnostic in &candidates.diagnostics {
        warn!(code = diagnostic.code, "{}", diagnostic.message_text);
    }
    Synthesis {
        delta,
        diagnostics: candidates.diagnostics,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// Qualified or simple class name.
    pub class: &'a str,
    /// One interface from the class's base list; all of them when `None`.
    pub interface: Option<&'a str>,
    pub mode: SynthesisMode,
}

/// The edit for one interface of one class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisOutcome {
    pub class_name: String,
    pub interface: TypeReference,
    pub mode: SynthesisMode,
    pub placement: Placement,
    /// Structural keys of the added members, in insertion order.
    pub added: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Text to insert before the closing brace of the class body.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_end: Option<Position>,
    #[serde(skip)]
    pub delta: MergeDelta,
}

impl SynthesisOutcome {
    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }
}

/// Every edit for one class, plus the interfaces that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct ClassSynthesis {
    pub outcomes: Vec<SynthesisOutcome>,
    /// Problems with the class's base list as a whole, such as an
    /// implemented interface the source does not describe.
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolved inputs shared by every interface of one class.
pub(crate) struct ClassContext<'s> {
    pub class: &'s ClassDeclaration,
    pub scope: TypeScope,
    pub snapshot: ClassSnapshot,
}

impl<'s> ClassContext<'s> {
    pub fn load<S: DeclarationSource + ?Sized>(
        source: &'s S,
        extractor: &InterfaceExtractor<'_, S>,
        class_name: &str,
    ) -> Result<Self, SynthesisError> {
        let class = source.find_class(class_name)?;
        let scope = class.scope(extractor.catalog().clone())?;
        let snapshot = snapshot_class(class, &scope);
        debug!(
            class = %class.qualified_name(),
            members = snapshot.len(),
            "class snapshot taken"
        );
        Ok(Self {
            class,
            scope,
            snapshot,
        })
    }

    /// The requested interface, or every implemented one.
    pub fn interfaces(&self, requested: Option<&str>) -> Result<Vec<TypeReference>, SynthesisError> {
        let implemented = self.class.implemented_interfaces(&self.scope);
        let Some(requested) = requested else {
            return Ok(implemented);
        };
        let wanted = self
            .scope
            .qualify(&TypeReference::parse(requested)?.bind_type_parameters(&self.class.type_parameter_names()));
        implemented
            .into_iter()
            .find(|interface| *interface == wanted || same_unqualified(interface, &wanted))
            .map(|interface| vec![interface])
            .ok_or_else(|| SynthesisError::ClassDoesNotImplement {
                class: self.class.qualified_name(),
                interface: requested.to_string(),
            })
    }

    /// Describe an interface from the class's base list. One the source
    /// cannot resolve (typically a framework interface) is skipped with a
    /// warning pushed to `skipped`.
    pub fn describe_implemented<S: DeclarationSource + ?Sized>(
        &self,
        extractor: &InterfaceExtractor<'_, S>,
        interface: &TypeReference,
        skipped: &mut Vec<Diagnostic>,
    ) -> Result<Option<Extraction>, SynthesisError> {
        match extractor.describe(interface) {
            Ok(extraction) => Ok(Some(extraction)),
            Err(SynthesisError::UnresolvedInterface { name }) => {
                warn!(class = %self.class.name, interface = %name, "unresolved interface skipped");
                skipped.push(Diagnostic::from_message(
                    diagnostic_messages::UNRESOLVED_INTERFACE,
                    &self.class.name,
                    &[&name, &self.class.qualified_name()],
                ));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn render(&self, delta: &MergeDelta, snapshot: &ClassSnapshot, options: &SynthesisOptions) -> String {
        render_delta(
            delta,
            &self.scope,
            snapshot.type_parameters(),
            self.class.member_indent(),
            options,
        )
    }
}

/// `wanted` was written without a namespace the scope could resolve; match on
/// name and arity alone.
fn same_unqualified(interface: &TypeReference, wanted: &TypeReference) -> bool {
    match (interface.as_named(), wanted.as_named()) {
        (Some(interface), Some(wanted)) => {
            wanted.namespace.is_none()
                && interface.name == wanted.name
                && interface.arguments == wanted.arguments
        }
        _ => false,
    }
}

/// Synthesize the decorator members `request` asks for.
///
/// Interfaces are processed in base-list order, each against the class as it
/// looks after the previous interfaces' deltas, so shared members (the policy
/// field, the helpers) are added once.
///
/// An interface named in the request must resolve. When every implemented
/// interface is requested, the ones the source cannot resolve are skipped and
/// reported in [`ClassSynthesis::diagnostics`].
pub fn synthesize_class<S: DeclarationSource + ?Sized>(
    source: &S,
    request: &SynthesisRequest<'_>,
    options: &SynthesisOptions,
) -> Result<ClassSynthesis, SynthesisError> {
    let span = debug_span!("synthesize_class", class = request.class, mode = ?request.mode);
    let _enter = span.enter();

    let extractor = InterfaceExtractor::new(source);
    let context = ClassContext::load(source, &extractor, request.class)?;
    let interfaces = context.interfaces(request.interface)?;

    let mut snapshot = context.snapshot.clone();
    let mut result = ClassSynthesis {
        outcomes: Vec::with_capacity(interfaces.len()),
        diagnostics: Vec::new(),
    };
    for interface in interfaces {
        let extraction = if request.interface.is_some() {
            extractor.describe(&interface)?
        } else {
            match context.describe_implemented(&extractor, &interface, &mut result.diagnostics)? {
                Some(extraction) => extraction,
                None => continue,
            }
        };
        let synthesis = synthesize(&extraction.descriptor, &snapshot, request.mode, options);
        let text = context.render(&synthesis.delta, &snapshot, options);
        snapshot = apply_delta(&snapshot, &synthesis.delta);

        let mut diagnostics = extraction.diagnostics;
        diagnostics.extend(synthesis.diagnostics);
        result.outcomes.push(SynthesisOutcome {
            class_name: context.class.name.clone(),
            interface: extraction.descriptor.interface,
            mode: request.mode,
            placement: synthesis.delta.placement,
            added: synthesis
                .delta
                .members
                .iter()
                .map(|member| member.key().to_string())
                .collect(),
            diagnostics,
            text,
            file_name: context.class.file_name.clone(),
            body_end: context.class.body_end,
            delta: synthesis.delta,
        });
    }
    Ok(result)
}

/// Report the interface members `class_name` does not implement, plus any
/// extraction problems, per implemented interface. Interfaces the source
/// cannot resolve are reported and skipped.
pub fn check_class<S: DeclarationSource + ?Sized>(
    source: &S,
    class_name: &str,
) -> Result<Vec<Diagnostic>, SynthesisError> {
    let extractor = InterfaceExtractor::new(source);
    let context = ClassContext::load(source, &extractor, class_name)?;

    let mut diagnostics = Vec::new();
    for interface in context.interfaces(None)? {
        let Some(extraction) = context.describe_implemented(&extractor, &interface, &mut diagnostics)?
        else {
            continue;
        };
        diagnostics.extend(extraction.diagnostics);
        diagnostics.extend(missing_members_diagnostic(&extraction.descriptor, &context.snapshot));
    }
    Ok(diagnostics)
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;
