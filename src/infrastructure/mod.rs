// Infrastructure implementations for Calltrail.

pub mod concurrency;
pub mod config;
pub mod document_source;
pub mod function_index;
pub mod project_loader;
pub mod substring_resolver;
pub mod symbol_scan;

pub use concurrency::init_scan_pool;
pub use config::Config;
pub use document_source::FileDocumentSource;
pub use function_index::{FunctionIndex, IndexedFunction};
pub use project_loader::{ProjectLoader, SourceFile};
pub use substring_resolver::SubstringEdgeResolver;
pub use symbol_scan::SynOutlineProvider;
