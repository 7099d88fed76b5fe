//! Editor code actions.
//!
//! For each interface a class declares but does not fully implement, two
//! fixes are offered, one per synthesis mode. Each is a single insertion at
//! the closing brace of the class body, in the tsserver code-fix shape.

use crate::pipeline::{ClassContext, synthesize};
use psynth_common::{Position, SynthesisError, SynthesisMode, SynthesisOptions};
use psynth_extract::{DeclarationSource, InterfaceExtractor};
use psynth_merge::missing_members;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFixInfo {
    /// Stable action identifier, e.g. `implementInterfaceWithPolly`.
    pub fix_name: String,
    pub description: String,
    /// Interface the fix implements.
    pub interface: String,
    pub changes: Vec<CodeFixFileChange>,
    pub commands: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFixFileChange {
    pub file_name: String,
    pub text_changes: Vec<CodeFixTextChange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFixTextChange {
    pub start: Position,
    pub end: Position,
    pub new_text: String,
}

impl CodeFixTextChange {
    pub fn insertion(at: Position, new_text: String) -> Self {
        Self {
            start: at,
            end: at,
            new_text,
        }
    }
}

/// Modes in the order their actions are offered.
pub const OFFERED_MODES: [SynthesisMode; 2] = [SynthesisMode::Elided, SynthesisMode::Explicit];

/// Code fixes for `class_name`.
///
/// Interfaces that cannot be resolved (typically framework interfaces the
/// declaration source does not describe) are skipped rather than failing the
/// whole request. Without a known file name and body position a fix carries
/// no changes; the host can still request a preview through the pipeline.
pub fn code_actions_for_class<S: DeclarationSource + ?Sized>(
    source: &S,
    class_name: &str,
    options: &SynthesisOptions,
) -> Result<Vec<CodeFixInfo>, SynthesisError> {
    let extractor = InterfaceExtractor::new(source);
    let context = ClassContext::load(source, &extractor, class_name)?;

    let mut fixes = Vec::new();
    for interface in context.interfaces(None)? {
        let extraction = match extractor.describe(&interface) {
            Ok(extraction) => extraction,
            Err(err) => {
                debug!(interface = %interface, error = %err, "no actions for unresolved interface");
                continue;
            }
        };
        let descriptor = &extraction.descriptor;
        if missing_members(descriptor, &context.snapshot).is_empty() {
            continue;
        }

        for mode in OFFERED_MODES {
            let synthesis = synthesize(descriptor, &context.snapshot, mode, options);
            let text = context.render(&synthesis.delta, &context.snapshot, options);
            let changes = match (&context.class.file_name, context.class.body_end) {
                (Some(file_name), Some(body_end)) => vec![CodeFixFileChange {
                    file_name: file_name.clone(),
                    text_changes: vec![CodeFixTextChange::insertion(body_end, text)],
                }],
                _ => {
                    warn!(class = class_name, "class has no source location; fix carries no edit");
                    Vec::new()
                }
            };
            fixes.push(CodeFixInfo {
                fix_name: mode.action_id().to_string(),
                description: mode.action_title().to_string(),
                interface: descriptor.interface.to_string(),
                changes,
                commands: Vec::new(),
            });
        }
    }
    Ok(fixes)
}

#[cfg(test)]
#[path = "tests/code_actions_tests.rs"]
mod code_actions_tests;
