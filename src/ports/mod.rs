// Boundary contracts toward the host environment, plus the renderers that
// consume the registry.

use std::path::Path;

use crate::domain::symbol::{Position, SourceLocation, SymbolInfo};
use crate::error::Result;

pub mod dot;
pub mod outline;
pub mod tree_view;

/// The host's symbol/outline provider: the containment chain from the
/// outermost symbol down to the innermost function, method or constructor
/// enclosing `position`. Empty when the position is not inside one.
pub trait SymbolProvider {
    fn function_path_at(&self, file: &Path, position: Position) -> Result<Vec<SymbolInfo>>;
}

/// Raw text access for a source range, the way the host editor hands out
/// buffer contents.
pub trait DocumentSource {
    fn text_in_range(&self, location: &SourceLocation) -> Result<String>;
}
