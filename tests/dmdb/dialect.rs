#[macro_use]
mod common;

use std::sync::Arc;
use std::thread;

use ormx::dmdb::{self, DmdbDialect};
use ormx::{
    Capability, Dialect, DialectSupports, QueryGenerator, QueryInterface, Session, SessionOptions,
};

#[test]
fn it_exposes_identity_metadata() {
    let (_session, dialect) = common::dialect("+00:00");

    assert_eq!(dialect.name(), "dmdb");
    assert_eq!(dialect.tick_char_left(), "");
    assert_eq!(dialect.tick_char_right(), "");
    assert_eq!(dialect.default_version(), "");
    assert_eq!(dialect.type_registry().dialect(), "dmdb");
}

#[test]
fn it_does_not_quote_identifiers() {
    let (_session, dialect) = common::dialect("+00:00");

    assert_eq!(dialect.quote_identifier("ORDERS"), "ORDERS");
    assert_eq!(
        dialect.query_generator().quote_identifier("ORDERS"),
        "ORDERS"
    );
}

#[test]
fn it_wires_collaborators_once() {
    let (session, dialect) = common::dialect("+00:00");

    assert_eq!(session.refresh_count(), 1);
    assert!(Arc::ptr_eq(
        dialect.query_interface().query_generator(),
        dialect.query_generator()
    ));
}

#[test]
fn it_keeps_a_weak_reference_to_the_session() {
    common::setup_if_needed();

    let session: Arc<dyn Session> = common::TestSession::new(SessionOptions::new());
    let dialect = DmdbDialect::new(&session);

    assert!(dialect.session().is_some());
    drop(session);
    assert!(dialect.session().is_none());

    // the dialect stays usable on its own
    assert!(dialect.supports().lock);
}

#[test]
fn it_declares_dmdb_capabilities() {
    let (_session, dialect) = common::dialect("+00:00");
    let supports = dialect.supports();

    let expected = [
        ("VALUES ()", Capability::Bool(true)),
        ("LIMIT ON UPDATE", Capability::Bool(true)),
        ("lock", Capability::Bool(true)),
        ("forShare", Capability::Str("LOCK IN SHARE MODE")),
        ("settingIsolationLevelDuringTransaction", Capability::Bool(false)),
        ("inserts.ignoreDuplicates", Capability::Str(" IGNORE")),
        ("inserts.updateOnDuplicate", Capability::Str(" ON DUPLICATE KEY UPDATE")),
        ("index.collate", Capability::Bool(false)),
        ("index.length", Capability::Bool(true)),
        ("index.parser", Capability::Bool(true)),
        ("index.type", Capability::Bool(true)),
        ("index.using", Capability::Int(1)),
        ("constraints.dropConstraint", Capability::Bool(false)),
        ("constraints.check", Capability::Bool(false)),
        ("indexViaAlter", Capability::Bool(true)),
        ("indexHints", Capability::Bool(true)),
        ("NUMERIC", Capability::Bool(true)),
        ("GEOMETRY", Capability::Bool(true)),
        ("JSON", Capability::Bool(true)),
        ("REGEXP", Capability::Bool(true)),
    ];

    for (key, capability) in expected {
        assert_eq!(supports.get(key), Some(capability), "{key}");
    }
}

#[test]
fn it_keeps_baseline_capabilities_it_does_not_override() {
    let supports = dmdb::supports();
    let baseline = DialectSupports::default();

    for key in ["DEFAULT", "UNION ALL", "transactions", "constraints.unique", "index.operator"] {
        assert_eq!(supports.get(key), baseline.get(key), "{key}");
    }
}

#[test]
fn it_answers_capability_lookups_stably() {
    let (_session, dialect) = common::dialect("+00:00");

    let first: Vec<_> = dialect.supports().iter().collect();
    let second: Vec<_> = dialect.supports().iter().collect();

    assert_eq!(first.len(), DialectSupports::KEYS.len());
    assert_eq!(first, second);
    assert_eq!(dialect.supports().get("no such flag"), None);
}

#[test]
fn it_is_shareable_between_threads() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("Asia/Shanghai");
    let dialect = Arc::new(dialect);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dialect = Arc::clone(&dialect);
            thread::spawn(move || dialect.declare(&ormx::DataType::Uuid))
        })
        .collect();

    for handle in handles {
        let ddl = handle.join().map_err(|_| anyhow::anyhow!("thread panicked"))??;
        assert_eq!(ddl, "CHAR(36) BINARY");
    }

    Ok(())
}

#[test]
fn it_reads_session_options_from_a_query_string() -> anyhow::Result<()> {
    common::setup_if_needed();

    let options: SessionOptions = "timezone=asia/shanghai&version=8.1".parse()?;

    let session: Arc<dyn Session> = common::TestSession::new(options);
    let dialect = DmdbDialect::new(&session);

    assert_eq!(dialect.options().get_timezone(), "asia/shanghai");
    assert_eq!(dialect.options().get_database_version(), Some("8.1"));

    // a lower-cased zone name is still a named zone on both paths
    let instant = ormx::Value::DateTime(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2024, 3, 1, 4, 0, 0).unwrap(),
    );
    let wire = dialect.serialize(&ormx::DataType::date(), &instant, ormx::Operation::Insert)?;
    assert_eq!(wire, ormx::WireValue::Text("2024-03-01 12:00:00".into()));
    assert_eq!(
        dialect.parse(&ormx::RawValueRef::text("DATETIME", "2024-03-01 12:00:00"))?,
        instant
    );

    Ok(())
}
