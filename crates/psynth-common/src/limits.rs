//! Centralized limits for interface extraction.

/// Maximum depth of base-interface traversal.
///
/// Interface hierarchies are acyclic in valid code, and the extractor also
/// tracks visited interfaces, so this only bounds pathological inputs such as
/// a generated chain of thousands of single-member interfaces. Members below
/// the limit are excluded with a warning.
pub const MAX_INTERFACE_DEPTH: usize = 64;

/// Upper bound on numeric suffixes tried when a synthesized field or
/// parameter name collides with an existing member.
pub const MAX_NAME_SUFFIX: usize = 1000;
