//! Function-Name Index
//!
//! Parallel scan of the workspace sources into a name → definition map, so
//! the CLI can track a function by name instead of a file position. Built
//! once per invocation, before any registry mutation begins; the graph
//! engine itself stays single-threaded.

use dashmap::DashMap;
use proc_macro2::Span;
use rayon::prelude::*;
use syn::spanned::Spanned;
use tracing::warn;

use crate::domain::symbol::{Position, SourceLocation, SourceRange, SymbolKind};
use crate::infrastructure::project_loader::SourceFile;

/// One indexed function definition.
#[derive(Debug, Clone)]
pub struct IndexedFunction {
    pub name: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub location: SourceLocation,
    pub crate_name: String,
}

/// Thread-safe index from bare function name to its definitions.
pub struct FunctionIndex {
    functions: DashMap<String, Vec<IndexedFunction>>,
}

impl Default for FunctionIndex {
    fn default() -> Self {
        Self {
            functions: DashMap::new(),
        }
    }
}

impl FunctionIndex {
    /// Build the index from source files in parallel. Unparsable files are
    /// skipped with a warning; one broken file must not hide the rest of
    /// the workspace.
    pub fn build(sources: &[SourceFile]) -> Self {
        let index = FunctionIndex::default();

        sources.par_iter().for_each(|source| match syn::parse_file(&source.content) {
            Ok(ast) => index.index_items(source, &source.crate_name, &ast.items),
            Err(err) => {
                warn!("failed to parse {}: {err}", source.path.display());
            }
        });

        index
    }

    /// All definitions for a bare name, in deterministic (path, line) order.
    pub fn find(&self, name: &str) -> Vec<IndexedFunction> {
        let mut found = self
            .functions
            .get(name)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        found.sort_by(|a, b| {
            (&a.location.file, a.location.range.start.line)
                .cmp(&(&b.location.file, b.location.range.start.line))
        });
        found
    }

    pub fn len(&self) -> usize {
        self.functions.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn index_items(&self, source: &SourceFile, prefix: &str, items: &[syn::Item]) {
        for item in items {
            match item {
                syn::Item::Fn(func) => {
                    let name = func.sig.ident.to_string();
                    self.insert(source, prefix, name, SymbolKind::Function, func.span());
                }
                syn::Item::Impl(imp) => {
                    let type_name = match &*imp.self_ty {
                        syn::Type::Path(type_path) => type_path
                            .path
                            .segments
                            .last()
                            .map(|segment| segment.ident.to_string()),
                        _ => None,
                    };
                    let Some(type_name) = type_name else { continue };
                    let type_prefix = format!("{prefix}::{type_name}");

                    for impl_item in &imp.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            let name = method.sig.ident.to_string();
                            let kind = if name == "new" {
                                SymbolKind::Constructor
                            } else {
                                SymbolKind::Method
                            };
                            self.insert(source, &type_prefix, name, kind, method.span());
                        }
                    }
                }
                syn::Item::Mod(module) => {
                    if let Some((_, content)) = &module.content {
                        let module_prefix = format!("{prefix}::{}", module.ident);
                        self.index_items(source, &module_prefix, content);
                    }
                }
                _ => {}
            }
        }
    }

    fn insert(&self, source: &SourceFile, prefix: &str, name: String, kind: SymbolKind, span: Span) {
        let start = span.start();
        let end = span.end();
        let location = SourceLocation {
            file: source.path.clone(),
            range: SourceRange::new(
                Position::new(start.line.saturating_sub(1), start.column),
                Position::new(end.line.saturating_sub(1), end.column),
            ),
        };

        let indexed = IndexedFunction {
            qualified_name: format!("{prefix}::{name}"),
            name: name.clone(),
            kind,
            location,
            crate_name: source.crate_name.clone(),
        };
        self.functions.entry(name).or_default().push(indexed);
    }
}
