//! Application Use Cases
//!
//! Wires the host-boundary ports to the graph engine. Every lookup a use
//! case needs happens before the registry is touched, so a failed lookup
//! leaves the graph exactly as it was.

use std::path::Path;

use tracing::warn;

use crate::domain::language::Language;
use crate::domain::node::FunctionNode;
use crate::domain::symbol::Position;
use crate::domain::tracker::{CallEdgeResolver, FunctionTracker};
use crate::error::{Result, TrackError};
use crate::infrastructure::FunctionIndex;
use crate::ports::{DocumentSource, SymbolProvider};

pub struct TrackUsecase<'a> {
    pub symbols: &'a dyn SymbolProvider,
    pub documents: &'a dyn DocumentSource,
    pub resolver: &'a dyn CallEdgeResolver,
}

impl TrackUsecase<'_> {
    /// Track the function enclosing `position`. Returns the display name of
    /// the tracked function.
    pub fn track_at(
        &self,
        tracker: &mut FunctionTracker,
        file: &Path,
        position: Position,
    ) -> Result<String> {
        let path = self.symbols.function_path_at(file, position)?;
        let Some(symbol) = path.last() else {
            return Err(TrackError::Lookup(format!(
                "no function encloses {}:{}:{}",
                file.display(),
                position.line,
                position.column
            )));
        };
        if !symbol.kind.is_callable() {
            return Err(TrackError::Lookup(format!(
                "`{}` is not a function, method or constructor",
                symbol.name
            )));
        }

        let content = self.documents.text_in_range(&symbol.location)?;
        let call_site_name = match Language::from_path(file) {
            Some(language) => language.call_site_name(&path),
            None => symbol.name.clone(),
        };

        let node = FunctionNode::new(path, content, call_site_name);
        let name = node.display_name();
        tracker.add(node, self.resolver);
        Ok(name)
    }

    /// Track a function picked from the workspace name index. With several
    /// definitions of the same name the first in (path, line) order wins.
    pub fn track_by_name(
        &self,
        tracker: &mut FunctionTracker,
        index: &FunctionIndex,
        name: &str,
    ) -> Result<String> {
        let found = index.find(name);
        let Some(definition) = found.first() else {
            return Err(TrackError::Lookup(format!(
                "no definition of `{name}` in the workspace"
            )));
        };
        if found.len() > 1 {
            warn!(
                "`{name}` has {} definitions, tracking {}",
                found.len(),
                definition.location.file.display()
            );
        }

        self.track_at(
            tracker,
            &definition.location.file,
            definition.location.range.start,
        )
    }
}

/// Stop tracking by display name, or the most recently tracked function
/// when no name is given. Returns whether anything was removed.
pub fn untrack(tracker: &mut FunctionTracker, name: Option<&str>) -> bool {
    match name {
        Some(name) => tracker.remove(name),
        None => tracker.remove_last(),
    }
}
