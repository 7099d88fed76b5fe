//! Editor positions.

use serde::{Deserialize, Serialize};

/// A position in the tsserver protocol shape (1-based line and offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub offset: u32,
}

impl Position {
    pub const fn new(line: u32, offset: u32) -> Self {
        Self { line, offset }
    }
}
