//! Recoverable synthesis diagnostics.
//!
//! A diagnostic never aborts a request: it accompanies a (possibly partial)
//! delta and explains which members were left out and why.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNSUPPORTED_MEMBER_KIND: u32 = 9001;
    pub const UNFORWARDABLE_PARAMETER: u32 = 9002;
    pub const UNRESOLVED_BASE_INTERFACE: u32 = 9003;
    pub const INTERFACE_INHERITANCE_TOO_DEEP: u32 = 9004;
    pub const CLASS_MISSING_INTERFACE_MEMBERS: u32 = 9005;
    pub const UNREADABLE_MEMBER: u32 = 9006;
    pub const UNRESOLVED_INTERFACE: u32 = 9007;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const UNSUPPORTED_MEMBER_KIND: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_MEMBER_KIND,
        category: DiagnosticCategory::Warning,
        message: "Member '{0}' of interface '{1}' has unsupported kind '{2}' and was not implemented.",
    };
    pub const UNFORWARDABLE_PARAMETER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNFORWARDABLE_PARAMETER,
        category: DiagnosticCategory::Warning,
        message: "Member '{0}' takes '{1}' parameter '{2}', which a forwarding closure cannot capture; it was not implemented.",
    };
    pub const UNRESOLVED_BASE_INTERFACE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_BASE_INTERFACE,
        category: DiagnosticCategory::Warning,
        message: "Base interface '{0}' of '{1}' could not be resolved; its members were not implemented.",
    };
    pub const INTERFACE_INHERITANCE_TOO_DEEP: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INTERFACE_INHERITANCE_TOO_DEEP,
        category: DiagnosticCategory::Warning,
        message: "Interface inheritance below '{0}' is deeper than {1} levels; deeper members were not implemented.",
    };
    pub const CLASS_MISSING_INTERFACE_MEMBERS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CLASS_MISSING_INTERFACE_MEMBERS,
        category: DiagnosticCategory::Suggestion,
        message: "Class '{0}' does not implement {1} member(s) of interface '{2}'.",
    };
    pub const UNREADABLE_MEMBER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNREADABLE_MEMBER,
        category: DiagnosticCategory::Warning,
        message: "Member '{0}' of interface '{1}' could not be read and was not implemented: {2}",
    };
    pub const UNRESOLVED_INTERFACE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_INTERFACE,
        category: DiagnosticCategory::Warning,
        message: "Interface '{0}' implemented by '{1}' could not be resolved and was skipped.",
    };

    pub const ALL: &[DiagnosticMessage] = &[
        UNSUPPORTED_MEMBER_KIND,
        UNFORWARDABLE_PARAMETER,
        UNRESOLVED_BASE_INTERFACE,
        INTERFACE_INHERITANCE_TOO_DEEP,
        CLASS_MISSING_INTERFACE_MEMBERS,
        UNREADABLE_MEMBER,
        UNRESOLVED_INTERFACE,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// The member (or interface) the diagnostic is about.
    pub subject: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn from_message(message: DiagnosticMessage, subject: &str, args: &[&str]) -> Self {
        Self {
            category: message.category,
            code: message.code,
            subject: subject.to_string(),
            message_text: format_message(message.message, args),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    diagnostic_messages::ALL
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
