//! Delta application and rendering.

use crate::merge::{MergeDelta, Placement};
use psynth_common::{ClassSnapshot, SnapshotMember, SynthesisOptions, TypeScope};
use psynth_synth::{DeclarationPrinter, EmissionContext, ShorteningPolicy};

/// The snapshot of the class once `delta` has been inserted.
pub fn apply_delta(snapshot: &ClassSnapshot, delta: &MergeDelta) -> ClassSnapshot {
    let mut updated = snapshot.clone();
    for member in &delta.members {
        updated.push(SnapshotMember {
            key: member.key(),
            name: member.declaration.name().to_string(),
            explicit_interface: member.explicit_interface().cloned(),
        });
    }
    updated
}

/// Print `delta` as the text to insert at the class body's closing brace.
///
/// `indent_level` is the indentation of the class members (1 for a class in
/// a file-scoped namespace). Appended text starts with a blank line so it is
/// separated from the last existing member.
pub fn render_delta(
    delta: &MergeDelta,
    scope: &TypeScope,
    class_type_parameters: &[String],
    indent_level: u32,
    options: &SynthesisOptions,
) -> String {
    if delta.is_empty() {
        return String::new();
    }
    let context = EmissionContext::new(class_type_parameters.iter().map(String::as_str));
    let mut printer = DeclarationPrinter::new(ShorteningPolicy::new(scope), context, options)
        .with_indent_level(indent_level);
    printer.print_all(delta.declarations());

    let body = printer.take_output();
    match delta.placement {
        Placement::BodyStart => body,
        Placement::BodyEnd => format!("{}{body}", options.new_line.as_str()),
    }
}

#[cfg(test)]
#[path = "../tests/apply_tests.rs"]
mod apply_tests;
