/// Language Domain Module
///
/// Defines the source languages Calltrail recognizes and their call-site
/// naming rules.
use std::path::Path;

use crate::domain::symbol::{SymbolInfo, SymbolKind};

/// Languages with dedicated call-site naming rules. Anything else falls
/// back to the bare identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    C,
    Cpp,
    TypeScript,
    JavaScript,
}

impl Language {
    /// Infer language from file extension.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext.to_lowercase().as_str() {
            "rs" => Some(Language::Rust),
            "c" | "h" => Some(Language::C),
            "cpp" | "cxx" | "cc" | "hpp" => Some(Language::Cpp),
            "ts" | "tsx" => Some(Language::TypeScript),
            "js" | "jsx" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Infer language from a file path.
    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Derive the identifier that appears at call sites of the function at
    /// the end of `path`.
    ///
    /// C and C++ outline symbols carry a parameter-list suffix
    /// (`name(type1, type2)`), while the call site uses only `name`, so the
    /// suffix is stripped. Rust `new` constructors are invoked qualified
    /// (`Type::new`), and TypeScript/JavaScript `constructor`s are invoked
    /// through the class name (`new Type`).
    pub fn call_site_name(&self, path: &[SymbolInfo]) -> String {
        let Some(symbol) = path.last() else {
            return String::new();
        };

        match self {
            Language::C | Language::Cpp => symbol
                .name
                .split('(')
                .next()
                .unwrap_or(&symbol.name)
                .trim_end()
                .to_string(),
            Language::Rust => {
                if symbol.kind == SymbolKind::Constructor && path.len() > 1 {
                    format!("{}::{}", path[path.len() - 2].name, symbol.name)
                } else {
                    symbol.name.clone()
                }
            }
            Language::TypeScript | Language::JavaScript => {
                if symbol.name == "constructor" && path.len() > 1 {
                    path[path.len() - 2].name.clone()
                } else {
                    symbol.name.clone()
                }
            }
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Rust
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
