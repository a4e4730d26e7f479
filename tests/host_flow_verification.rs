/// Host Flow Verification Tests
///
/// Drives the whole tracking flow against real files on disk: syn outline
/// lookup, text retrieval, edge resolution, sled persistence and restore.

use std::fs;

use tempfile::tempdir;

use calltrail::application::{untrack, TrackUsecase};
use calltrail::domain::store::{SledStateStore, StateStore};
use calltrail::domain::symbol::Position;
use calltrail::domain::tracker::FunctionTracker;
use calltrail::infrastructure::{
    FileDocumentSource, FunctionIndex, ProjectLoader, SubstringEdgeResolver, SynOutlineProvider,
};
use calltrail::ports::tree_view::render_tree;

fn store_in(dir: &std::path::Path) -> SledStateStore {
    SledStateStore::open(&dir.join(".state")).unwrap()
}

const MAIN_RS: &str = r#"fn dispatch() {
    handle_request();
    log_event();
}

fn handle_request() {
    log_event();
}

fn log_event() {
    let _line = 1;
}
"#;

const CODEC_RS: &str = r#"pub struct Codec;

impl Codec {
    pub fn new() -> Self {
        Codec
    }

    pub fn decode(&self) {
        let _frame = 0;
    }
}
"#;

struct Host {
    symbols: SynOutlineProvider,
    documents: FileDocumentSource,
    resolver: SubstringEdgeResolver,
}

impl Host {
    fn new() -> Self {
        Self {
            symbols: SynOutlineProvider,
            documents: FileDocumentSource::new(),
            resolver: SubstringEdgeResolver,
        }
    }

    fn usecase(&self) -> TrackUsecase<'_> {
        TrackUsecase {
            symbols: &self.symbols,
            documents: &self.documents,
            resolver: &self.resolver,
        }
    }
}

#[test]
fn test_track_at_positions_builds_the_call_graph() {
    let dir = tempdir().unwrap();
    let main_rs = dir.path().join("main.rs");
    fs::write(&main_rs, MAIN_RS).unwrap();

    let host = Host::new();
    let usecase = host.usecase();
    let store = store_in(dir.path());
    let mut tracker = FunctionTracker::new(Box::new(store));

    usecase
        .track_at(&mut tracker, &main_rs, Position::new(1, 4))
        .unwrap();
    usecase
        .track_at(&mut tracker, &main_rs, Position::new(6, 4))
        .unwrap();
    usecase
        .track_at(&mut tracker, &main_rs, Position::new(9, 4))
        .unwrap();

    let dispatch = &tracker.nodes()[tracker.find("dispatch").unwrap()];
    assert_eq!(
        dispatch.outgoing,
        vec!["handle_request".to_string(), "log_event".to_string()]
    );

    let log_event = &tracker.nodes()[tracker.find("log_event").unwrap()];
    let mut callers = log_event.incoming.clone();
    callers.sort();
    assert_eq!(callers, vec!["dispatch".to_string(), "handle_request".to_string()]);

    let tree = render_tree(&mut tracker);
    assert!(tree.starts_with("dispatch\n"), "dispatch is the root: {tree}");
}

#[test]
fn test_registry_survives_a_store_reopen() {
    let dir = tempdir().unwrap();
    let main_rs = dir.path().join("main.rs");
    fs::write(&main_rs, MAIN_RS).unwrap();
    let state_dir = dir.path().join(".calltrail");

    let host = Host::new();

    {
        let usecase = host.usecase();
        let store = SledStateStore::open(&state_dir).unwrap();
        let mut tracker = FunctionTracker::new(Box::new(store));
        usecase
            .track_at(&mut tracker, &main_rs, Position::new(1, 4))
            .unwrap();
        usecase
            .track_at(&mut tracker, &main_rs, Position::new(6, 4))
            .unwrap();
    }

    let store = SledStateStore::open(&state_dir).unwrap();
    let mut tracker = FunctionTracker::restore(Box::new(store), &host.resolver);

    // Insertion order and edges are rebuilt from the snapshot.
    assert_eq!(tracker.len(), 2);
    let dispatch = &tracker.nodes()[tracker.find("dispatch").unwrap()];
    assert_eq!(dispatch.outgoing, vec!["handle_request".to_string()]);
    assert!(tracker.nodes().iter().all(|n| !n.highlight));

    // Untrack persists too: a second reopen no longer sees the function.
    assert!(untrack(&mut tracker, Some("handle_request")));
    drop(tracker);

    let store = SledStateStore::open(&state_dir).unwrap();
    let tracker = FunctionTracker::restore(Box::new(store), &host.resolver);
    assert_eq!(tracker.len(), 1);
    assert!(tracker.find("handle_request").is_none());
}

#[test]
fn test_track_by_name_through_the_workspace_index() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), MAIN_RS).unwrap();
    fs::write(dir.path().join("codec.rs"), CODEC_RS).unwrap();

    let sources = ProjectLoader::load_folder(dir.path()).unwrap();
    let index = FunctionIndex::build(&sources);

    let host = Host::new();
    let usecase = host.usecase();
    let store = store_in(dir.path());
    let mut tracker = FunctionTracker::new(Box::new(store));

    let name = usecase
        .track_by_name(&mut tracker, &index, "decode")
        .unwrap();
    assert_eq!(name, "Codec::decode");

    // Constructors are tracked under their qualified call-site name.
    usecase.track_by_name(&mut tracker, &index, "new").unwrap();
    let ctor = &tracker.nodes()[tracker.find("Codec::new").unwrap()];
    assert_eq!(ctor.call_site_name, "Codec::new");
}

#[test]
fn test_clear_wipes_the_persisted_snapshot() {
    let dir = tempdir().unwrap();
    let main_rs = dir.path().join("main.rs");
    fs::write(&main_rs, MAIN_RS).unwrap();
    let state_dir = dir.path().join(".calltrail");

    let host = Host::new();
    {
        let usecase = host.usecase();
        let store = SledStateStore::open(&state_dir).unwrap();
        let mut tracker = FunctionTracker::new(Box::new(store));
        usecase
            .track_at(&mut tracker, &main_rs, Position::new(1, 4))
            .unwrap();
        tracker.clear();
    }

    let store = SledStateStore::open(&state_dir).unwrap();
    assert!(store.load().unwrap().is_empty());
}

