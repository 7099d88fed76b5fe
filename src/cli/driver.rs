//! Command execution.
//!
//! Commands never print. They return what should go to stdout, the notes
//! meant for stderr and the exit status, and the binary does the writing.

use anyhow::{Context, Result};
use psynth_common::diagnostics::diagnostic_codes;
use psynth_common::{Diagnostic, SynthesisOptions};
use psynth_extract::Workspace;
use std::path::Path;
use tracing::debug;

use crate::cli::args::{ClassArgs, CliArgs, Command, OutputFormat, SynthesizeArgs};
use crate::cli::config::{apply_overrides, load_options};
use crate::code_actions::code_actions_for_class;
use crate::pipeline::{SynthesisRequest, check_class, synthesize_class};

pub const EXIT_SUCCESS: i32 = 0;
/// `check` found members to implement.
pub const EXIT_MEMBERS_MISSING: i32 = 1;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverResult {
    pub stdout: String,
    /// Warnings and notes for stderr.
    pub notes: Vec<String>,
    pub exit_code: i32,
}

pub fn run(args: &CliArgs) -> Result<DriverResult> {
    match &args.command {
        Command::Synthesize(args) => run_synthesize(args),
        Command::Check(args) => run_check(args),
        Command::Actions(args) => run_actions(args),
    }
}

pub fn load_workspace(path: &Path) -> Result<Workspace> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model: {}", path.display()))?;
    Workspace::from_json(&source).with_context(|| format!("failed to parse model: {}", path.display()))
}

fn load(args: &ClassArgs) -> Result<(Workspace, SynthesisOptions)> {
    let workspace = load_workspace(&args.source.model)?;
    let options = load_options(args.source.config.as_deref(), &args.source.model)?;
    debug!(
        interfaces = workspace.interfaces.len(),
        classes = workspace.classes.len(),
        "model loaded"
    );
    Ok((workspace, options))
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let category = serde_json::to_value(diagnostic.category)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();
    format!(
        "{}: {category} PS{}: {}",
        diagnostic.subject, diagnostic.code, diagnostic.message_text
    )
}

fn run_synthesize(args: &SynthesizeArgs) -> Result<DriverResult> {
    let (workspace, options) = load(&args.target)?;
    let options = apply_overrides(options, args)?;
    let request = SynthesisRequest {
        class: &args.target.class,
        interface: args.interface.as_deref(),
        mode: options.mode,
    };
    let synthesis = synthesize_class(&workspace, &request, &options)?;
    let outcomes = &synthesis.outcomes;

    let mut result = DriverResult::default();
    result.notes.extend(
        synthesis
            .diagnostics
            .iter()
            .chain(outcomes.iter().flat_map(|outcome| &outcome.diagnostics))
            .map(format_diagnostic),
    );
    match args.target.source.format {
        OutputFormat::Json => {
            result.stdout = serde_json::to_string_pretty(outcomes)?;
            result.stdout.push('\n');
        }
        OutputFormat::Csharp => {
            for outcome in outcomes {
                if outcome.is_empty() {
                    result.notes.push(format!(
                        "{} already implements {}; nothing to add",
                        outcome.class_name, outcome.interface
                    ));
                }
                result.stdout.push_str(&outcome.text);
            }
        }
    }
    Ok(result)
}

fn run_check(args: &ClassArgs) -> Result<DriverResult> {
    let (workspace, _) = load(args)?;
    let diagnostics = check_class(&workspace, &args.class)?;
    let missing = diagnostics
        .iter()
        .any(|diagnostic| diagnostic.code == diagnostic_codes::CLASS_MISSING_INTERFACE_MEMBERS);

    let stdout = match args.source.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&diagnostics)?),
        OutputFormat::Csharp => diagnostics
            .iter()
            .map(|diagnostic| format!("{}\n", format_diagnostic(diagnostic)))
            .collect(),
    };
    Ok(DriverResult {
        stdout,
        notes: Vec::new(),
        exit_code: if missing { EXIT_MEMBERS_MISSING } else { EXIT_SUCCESS },
    })
}

fn run_actions(args: &ClassArgs) -> Result<DriverResult> {
    let (workspace, options) = load(args)?;
    let fixes = code_actions_for_class(&workspace, &args.class, &options)?;

    let stdout = match args.source.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&fixes)?),
        OutputFormat::Csharp => fixes
            .iter()
            .map(|fix| format!("{}\t{} ({})\n", fix.fix_name, fix.description, fix.interface))
            .collect(),
    };
    Ok(DriverResult {
        stdout,
        notes: Vec::new(),
        exit_code: EXIT_SUCCESS,
    })
}
