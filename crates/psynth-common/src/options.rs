//! Synthesis options.
//!
//! Every field has a default, so an empty `psynth.json` (or none at all)
//! produces the stock Polly decorator shape.

use crate::type_ref::TypeReference;
use serde::{Deserialize, Serialize};

/// How asynchronous forwarding members are emitted.
///
/// Both modes forward through the same helper with the same closure; only the
/// `async` marker and the `await` in front of the helper call differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    /// Return the helper's task directly, no `async` state machine.
    #[default]
    Elided,
    /// Mark forwarding members and helpers `async` and await the inner call.
    Explicit,
}

impl SynthesisMode {
    pub const fn marks_async(self) -> bool {
        matches!(self, Self::Explicit)
    }

    /// Title of the editor action that requests this mode.
    pub const fn action_title(self) -> &'static str {
        match self {
            Self::Elided => "Implement Interface with Polly",
            Self::Explicit => "Implement Interface with Polly including async await",
        }
    }

    /// Stable identifier of the editor action.
    pub const fn action_id(self) -> &'static str {
        match self {
            Self::Elided => "implementInterfaceWithPolly",
            Self::Explicit => "implementInterfaceWithPollyAsyncAwait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLineKind {
    #[default]
    Lf,
    CrLf,
}

impl NewLineKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisOptions {
    /// Type of the policy-holder field. It must expose `Execute(Action)`,
    /// `Execute<T>(Func<T>)` and the matching `ExecuteAsync` overloads.
    pub policy_type: TypeReference,
    pub policy_field: String,
    pub policy_parameter: String,
    /// Implementation field name; derived from the interface name when unset.
    pub implementation_field: Option<String>,
    /// Constructor parameter for the implementation; derived when unset.
    pub implementation_parameter: Option<String>,
    pub execute_helper: String,
    pub execute_async_helper: String,
    /// Policy-holder methods the helpers delegate to.
    pub policy_execute_method: String,
    pub policy_execute_async_method: String,
    /// Name of the generic parameter on the value and async helpers.
    pub helper_type_parameter: String,
    pub readonly_fields: bool,
    pub mode: SynthesisMode,
    pub indent_width: usize,
    pub new_line: NewLineKind,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            policy_type: TypeReference::named("Polly", "Policy", Vec::new()),
            policy_field: "_policy".to_string(),
            policy_parameter: "policy".to_string(),
            implementation_field: None,
            implementation_parameter: None,
            execute_helper: "Execute".to_string(),
            execute_async_helper: "ExecuteAsync".to_string(),
            policy_execute_method: "Execute".to_string(),
            policy_execute_async_method: "ExecuteAsync".to_string(),
            helper_type_parameter: "TResult".to_string(),
            readonly_fields: true,
            mode: SynthesisMode::Elided,
            indent_width: 4,
            new_line: NewLineKind::Lf,
        }
    }
}

impl SynthesisOptions {
    pub fn with_mode(mut self, mode: SynthesisMode) -> Self {
        self.mode = mode;
        self
    }
}
