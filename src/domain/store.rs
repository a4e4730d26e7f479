//! Registry Persistence
//!
//! Storage backends for the tracked-function snapshot. The registry is
//! serialized as one JSON array of minimal reconstruction records under a
//! single well-known key; an absent key reads back as an empty registry.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::node::PersistedFunction;
use crate::error::Result;

/// The well-known key the registry snapshot lives under.
pub const STATE_KEY: &str = "tracked_functions";

/// Storage backend for the registry snapshot.
pub trait StateStore {
    /// Load the persisted snapshot; an absent key is an empty registry.
    fn load(&self) -> Result<Vec<PersistedFunction>>;

    /// Replace the persisted snapshot with `functions`.
    fn save(&self, functions: &[PersistedFunction]) -> Result<()>;

    /// Drop the persisted snapshot.
    fn clear(&self) -> Result<()>;
}

// ============================================================================
// MemoryStateStore - ephemeral storage for tests and --no-persist runs
// ============================================================================

/// In-memory store. Clones share the same backing map, so a test can hand
/// the tracker one handle and inspect or reload through another.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Vec<PersistedFunction>> {
        match self.entries.get(STATE_KEY) {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, functions: &[PersistedFunction]) -> Result<()> {
        let bytes = serde_json::to_vec(functions)?;
        self.entries.insert(STATE_KEY.to_string(), bytes);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.remove(STATE_KEY);
        Ok(())
    }
}

// ============================================================================
// SledStateStore - workspace-scoped durable storage
// ============================================================================

/// Durable store backed by a sled database under the workspace's state
/// directory.
pub struct SledStateStore {
    // The Db handle keeps the database open for the tree's lifetime.
    _db: sled::Db,
    tree: sled::Tree,
}

impl SledStateStore {
    pub fn open(state_dir: &Path) -> Result<Self> {
        let db = sled::open(state_dir)?;
        let tree = db.open_tree("tracker")?;
        Ok(Self { _db: db, tree })
    }
}

impl StateStore for SledStateStore {
    fn load(&self) -> Result<Vec<PersistedFunction>> {
        match self.tree.get(STATE_KEY.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, functions: &[PersistedFunction]) -> Result<()> {
        let bytes = serde_json::to_vec(functions)?;
        self.tree.insert(STATE_KEY.as_bytes(), bytes)?;
        self.tree.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.tree.remove(STATE_KEY.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
