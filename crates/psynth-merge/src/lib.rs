//! Merge engine for psynth.
//!
//! Reconciles a synthesized candidate set with the target class:
//! - `compute_delta` keeps only the candidates whose key the class lacks
//! - `apply_delta` produces the class snapshot after the edit
//! - `render_delta` prints the delta as the single text insertion
//! - `missing_members` is the "interface not implemented" detection hook

pub mod merge;
pub use merge::{MergeDelta, Placement, compute_delta};

pub mod apply;
pub use apply::{apply_delta, render_delta};

pub mod missing;
pub use missing::{missing_members, missing_members_diagnostic};
