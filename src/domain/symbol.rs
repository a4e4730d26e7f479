//! Source Symbol Model
//!
//! Positions, ranges and symbol descriptors as reported by the host's
//! outline provider. Lines and columns are 0-based, editor style.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span of source text. Containment is inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub range: SourceRange,
}

/// Symbol classification, the subset of the host's outline kinds that can
/// appear on a containment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Module,
    Struct,
    Trait,
    Function,
    Method,
    Constructor,
}

impl SymbolKind {
    /// Kinds that terminate a containment path: something calls can target.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor
        )
    }
}

/// One level of a containment chain: a named symbol with its source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub location: SourceLocation,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            kind,
            location,
        }
    }
}
