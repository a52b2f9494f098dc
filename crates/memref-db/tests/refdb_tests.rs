//! End-to-end tests driving the in-memory backend through the host adapter.

use std::collections::HashSet;

use memref_db::{
    status_of, ErrorCode, MemoryRefdb, ObjectFormat, ObjectId, RefdbBackend, RefdbConfig, Refdb,
    Reference, ReferenceKind, ReferenceTarget, HEAD,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn oid(byte: u8) -> ObjectId {
    ObjectId::from([byte; 20])
}

// ═══════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn rename_branch_under_head() {
    init_tracing();
    let mut db = Refdb::in_memory();
    db.create(&Reference::direct("refs/heads/main", oid(0xAA))).unwrap();
    db.create(&Reference::symbolic(HEAD, "refs/heads/main")).unwrap();

    db.rename("refs/heads/main", "refs/heads/trunk", false).unwrap();

    let head = db.lookup(HEAD).unwrap();
    assert_eq!(head.kind(), ReferenceKind::Symbolic);
    assert_eq!(head.symbolic_target(), Some("refs/heads/main"));

    let trunk = db.lookup("refs/heads/trunk").unwrap();
    assert_eq!(trunk.kind(), ReferenceKind::Direct);
    assert_eq!(trunk.target(), Some(&oid(0xAA)));

    let err = db.lookup("refs/heads/main").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    // HEAD now dangles until the host rewrites it.
    assert!(db.resolve(HEAD).is_err());
    db.set_head("refs/heads/trunk").unwrap();
    assert_eq!(db.resolve_id(HEAD).unwrap(), oid(0xAA));
}

#[test]
fn optimistic_update_cycle() {
    init_tracing();
    let mut db = Refdb::in_memory();
    db.create(&Reference::direct("refs/heads/main", oid(1))).unwrap();

    // Two writers read the same value; the second one loses.
    let seen = db.lookup("refs/heads/main").unwrap().value().clone();
    db.write(&Reference::direct("refs/heads/main", oid(2)), true, Some(&seen))
        .unwrap();
    let lost = db.write(&Reference::direct("refs/heads/main", oid(3)), true, Some(&seen));
    assert_eq!(status_of(&lost), ErrorCode::Modified);
    assert_eq!(db.resolve_id("refs/heads/main").unwrap(), oid(2));

    let stale_delete = db.delete("refs/heads/main", Some(&seen));
    assert_eq!(status_of(&stale_delete), ErrorCode::Modified);

    let fresh = ReferenceTarget::Direct(oid(2));
    db.delete("refs/heads/main", Some(&fresh)).unwrap();
    assert!(!db.exists("refs/heads/main").unwrap());
}

#[test]
fn sha256_ids_are_stored_verbatim() {
    let mut db = Refdb::in_memory();
    let id = ObjectId::from_hex(&"ab".repeat(32)).unwrap();
    db.create(&Reference::direct("refs/heads/main", id)).unwrap();
    let read = db.lookup("refs/heads/main").unwrap();
    assert_eq!(read.target().map(ObjectId::format), Some(ObjectFormat::Sha256));
    assert_eq!(read.target(), Some(&id));
}

#[test]
fn config_from_toml_drives_validation() {
    let config = RefdbConfig::from_toml_str("validate_names = false").unwrap();
    let mut db = Refdb::in_memory_with(config);
    db.create(&Reference::direct("refs/heads/has space", oid(1))).unwrap();
    assert_eq!(db.list_names(None).unwrap(), vec!["refs/heads/has space"]);

    let mut strict = Refdb::in_memory();
    let err = strict
        .create(&Reference::direct("refs/heads/has space", oid(1)))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[test]
fn boxed_backend_reflog_and_compress() {
    let mut db = Refdb::new(Box::new(MemoryRefdb::new()));
    db.create(&Reference::direct("refs/heads/main", oid(1))).unwrap();
    assert!(!db.has_log("refs/heads/main"));
    assert!(db.reflog_read("refs/heads/main").is_err());
    db.compress().unwrap();
    assert_eq!(db.list(None).unwrap().len(), 1);
}

#[test]
fn glob_listing_by_namespace() {
    let mut db = Refdb::in_memory();
    for name in [
        "refs/heads/main",
        "refs/heads/dev",
        "refs/tags/v1.0",
        "refs/tags/v2.0",
        "refs/remotes/origin/main",
    ] {
        db.create(&Reference::direct(name, oid(9))).unwrap();
    }
    db.set_head("refs/heads/main").unwrap();

    assert_eq!(
        db.list_names(Some("refs/tags/v[0-9]*")).unwrap(),
        vec!["refs/tags/v1.0", "refs/tags/v2.0"]
    );
    assert_eq!(
        db.list_names(Some("refs/*/main")).unwrap(),
        vec!["refs/heads/main", "refs/remotes/origin/main"]
    );
    assert_eq!(db.list_names(None).unwrap().len(), 6);
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

fn ref_name() -> impl Strategy<Value = String> {
    "refs/(heads|tags)/[a-z][a-z0-9]{0,12}(/[a-z0-9]{1,6})?"
}

proptest! {
    #[test]
    fn iteration_yields_each_name_once(names in proptest::collection::hash_set(ref_name(), 0..200)) {
        let mut db = MemoryRefdb::with_config(RefdbConfig { stats_buckets: 7, ..Default::default() });
        for (i, name) in names.iter().enumerate() {
            db.write(&Reference::direct(name.as_str(), oid(i as u8 | 1)), false, None).unwrap();
        }

        let seen: Vec<&str> = db.iter().names().collect();
        prop_assert_eq!(seen.len(), names.len());
        let unique: HashSet<&str> = seen.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());
        for name in &names {
            prop_assert!(unique.contains(name.as_str()));
        }

        // Seven buckets force chains once there are more than seven names.
        let stats = db.stats();
        prop_assert_eq!(stats.references, names.len());
        prop_assert!(stats.longest_chain * 7 >= names.len());
        prop_assert!(stats.longest_chain <= names.len());
    }

    #[test]
    fn deleted_names_never_reappear(
        names in proptest::collection::hash_set(ref_name(), 1..100),
        keep_every in 2usize..5,
    ) {
        let mut db = MemoryRefdb::new();
        let names: Vec<String> = names.into_iter().collect();
        for name in &names {
            db.write(&Reference::direct(name.as_str(), oid(1)), false, None).unwrap();
        }
        let mut kept = HashSet::new();
        for (i, name) in names.iter().enumerate() {
            if i % keep_every == 0 {
                kept.insert(name.as_str());
            } else {
                db.delete(name, None).unwrap();
            }
        }

        let seen: HashSet<&str> = db.iter().names().collect();
        prop_assert_eq!(seen, kept);
    }

    #[test]
    fn write_then_lookup_returns_what_was_written(name in ref_name(), byte in 1u8..=255) {
        let mut db = MemoryRefdb::new();
        db.write(&Reference::direct(name.as_str(), oid(byte)), false, None).unwrap();
        let read = db.lookup(&name).unwrap();
        prop_assert_eq!(read.name(), name.as_str());
        prop_assert_eq!(read.target(), Some(&oid(byte)));
    }
}
