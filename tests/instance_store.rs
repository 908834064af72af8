//! Instance store round trips against a scratch directory.

use qubo_coloring::GraphInstanceStore;
use qubo_core::QuboError;
use std::fs;
use tempfile::TempDir;

#[test]
fn generate_then_load() {
    let dir = TempDir::new().unwrap();
    let mut store = GraphInstanceStore::open(dir.path(), 0.5, 7).unwrap();
    assert!(!store.is_populated());

    // n=3: c in 2..=3, n=4: c in 2..=4 -> 5 pairs, 2 instances each
    let written = store.generate_and_store(3..=4, None, 2).unwrap();
    assert_eq!(written, 10);
    assert!(store.is_populated());
    assert!(store.instance_path(4, 4, 1).exists());

    let instance = store.load(4, 3, 1).unwrap();
    assert_eq!(instance.n, 4);
    assert_eq!(instance.c, 3);
    let graph = instance.to_graph().unwrap();
    assert_eq!(graph.num_vertices(), 4);
    assert!(graph.num_edges() <= 6);
}

#[test]
fn explicit_color_range() {
    let dir = TempDir::new().unwrap();
    let mut store = GraphInstanceStore::open(dir.path(), 1.0, 1).unwrap();

    let written = store.generate_and_store(5..=5, Some(3..=3), 1).unwrap();
    assert_eq!(written, 1);
    assert!(!store.instance_path(5, 2, 0).exists());

    let graph = store.load(5, 3, 0).unwrap().to_graph().unwrap();
    assert_eq!(graph.num_edges(), 10);
}

#[test]
fn missing_instance_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = GraphInstanceStore::open(dir.path(), 0.5, 0).unwrap();

    let err = store.load(10, 5, 1).unwrap_err();
    assert!(err.is_recoverable());
    match err {
        QuboError::InstanceNotFound { n, c, instance, path } => {
            assert_eq!((n, c, instance), (10, 5, 1));
            assert!(path.ends_with("n_10_c_5_1.json"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn corrupt_instance_is_invalid() {
    let dir = TempDir::new().unwrap();
    let store = GraphInstanceStore::open(dir.path(), 0.5, 0).unwrap();

    let path = store.instance_path(4, 2, 0);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json").unwrap();

    let err = store.load(4, 2, 0).unwrap_err();
    assert!(matches!(err, QuboError::InvalidInstance(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn mismatched_instance_is_invalid() {
    let dir = TempDir::new().unwrap();
    let store = GraphInstanceStore::open(dir.path(), 0.5, 0).unwrap();

    let path = store.instance_path(4, 2, 0);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"n": 5, "c": 2, "edges": []}"#).unwrap();

    assert!(matches!(
        store.load(4, 2, 0),
        Err(QuboError::InvalidInstance(_))
    ));
}

#[test]
fn load_many_skips_missing() {
    let dir = TempDir::new().unwrap();
    let mut store = GraphInstanceStore::open(dir.path(), 0.5, 3).unwrap();
    store.generate_and_store(3..=3, None, 1).unwrap();

    // only (3, 2, 0) and (3, 3, 0) exist
    let loaded = store.load_many(&[3, 4], &[2, 3], &[0, 1]).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|i| i.n == 3));
}
