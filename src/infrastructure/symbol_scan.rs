//! Syn-Backed Outline Provider
//!
//! Resolves "what function encloses this position" by parsing the file
//! with syn and walking the item tree. This is host tooling, not part of
//! the graph engine: the engine itself never parses anything.

use std::path::Path;

use proc_macro2::Span;
use syn::spanned::Spanned;

use crate::domain::symbol::{Position, SourceLocation, SourceRange, SymbolInfo, SymbolKind};
use crate::error::{Result, TrackError};
use crate::ports::SymbolProvider;

pub struct SynOutlineProvider;

impl SymbolProvider for SynOutlineProvider {
    fn function_path_at(&self, file: &Path, position: Position) -> Result<Vec<SymbolInfo>> {
        let source = std::fs::read_to_string(file)
            .map_err(|err| TrackError::Lookup(format!("cannot read {}: {err}", file.display())))?;
        let ast = syn::parse_file(&source)
            .map_err(|err| TrackError::Lookup(format!("cannot parse {}: {err}", file.display())))?;

        let mut path = Vec::new();
        find_in_items(file, &ast.items, position, &mut path);
        Ok(path)
    }
}

/// Spans report 1-based lines; positions are 0-based, editor style.
fn range_of(span: Span) -> SourceRange {
    let start = span.start();
    let end = span.end();
    SourceRange::new(
        Position::new(start.line.saturating_sub(1), start.column),
        Position::new(end.line.saturating_sub(1), end.column),
    )
}

fn location_of(file: &Path, span: Span) -> SourceLocation {
    SourceLocation {
        file: file.to_path_buf(),
        range: range_of(span),
    }
}

/// Depth-first walk pushing each containing level onto `path`. Returns true
/// once the innermost callable is found; containment levels that turn out
/// not to hold a function are popped again, so a miss leaves `path` empty.
fn find_in_items(
    file: &Path,
    items: &[syn::Item],
    position: Position,
    path: &mut Vec<SymbolInfo>,
) -> bool {
    for item in items {
        match item {
            syn::Item::Fn(func) => {
                let span = func.span();
                if range_of(span).contains(position) {
                    path.push(SymbolInfo::new(
                        func.sig.ident.to_string(),
                        SymbolKind::Function,
                        location_of(file, span),
                    ));
                    return true;
                }
            }
            syn::Item::Mod(module) => {
                let Some((_, content)) = &module.content else {
                    continue;
                };
                let span = module.span();
                if range_of(span).contains(position) {
                    path.push(SymbolInfo::new(
                        module.ident.to_string(),
                        SymbolKind::Module,
                        location_of(file, span),
                    ));
                    if find_in_items(file, content, position, path) {
                        return true;
                    }
                    path.pop();
                }
            }
            syn::Item::Impl(imp) => {
                let span = imp.span();
                if range_of(span).contains(position) {
                    path.push(SymbolInfo::new(
                        type_name_of(&imp.self_ty),
                        SymbolKind::Struct,
                        location_of(file, span),
                    ));
                    for impl_item in &imp.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            let method_span = method.span();
                            if range_of(method_span).contains(position) {
                                let name = method.sig.ident.to_string();
                                let kind = if name == "new" {
                                    SymbolKind::Constructor
                                } else {
                                    SymbolKind::Method
                                };
                                path.push(SymbolInfo::new(name, kind, location_of(file, method_span)));
                                return true;
                            }
                        }
                    }
                    path.pop();
                }
            }
            syn::Item::Trait(trait_item) => {
                let span = trait_item.span();
                if range_of(span).contains(position) {
                    path.push(SymbolInfo::new(
                        trait_item.ident.to_string(),
                        SymbolKind::Trait,
                        location_of(file, span),
                    ));
                    for member in &trait_item.items {
                        if let syn::TraitItem::Fn(method) = member {
                            // Only default bodies have content to track.
                            if method.default.is_none() {
                                continue;
                            }
                            let method_span = method.span();
                            if range_of(method_span).contains(position) {
                                path.push(SymbolInfo::new(
                                    method.sig.ident.to_string(),
                                    SymbolKind::Method,
                                    location_of(file, method_span),
                                ));
                                return true;
                            }
                        }
                    }
                    path.pop();
                }
            }
            _ => {}
        }
    }
    false
}

fn type_name_of(ty: &syn::Type) -> String {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident.to_string();
        }
    }
    "impl".to_string()
}
