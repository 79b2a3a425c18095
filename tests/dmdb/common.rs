#![allow(dead_code, unused_macros)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ormx::dmdb::DmdbDialect;
use ormx::{
    escape_string, ConnectionManager, DialectContext, Escape, QueryGenerator, QueryInterface,
    Session, SessionOptions, TypeRegistry,
};

pub fn setup_if_needed() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A session whose collaborators only record what the dialect asks of them.
pub struct TestSession {
    pub options: SessionOptions,
    pub refreshed: Arc<AtomicUsize>,
}

impl TestSession {
    pub fn new(options: SessionOptions) -> Arc<Self> {
        Arc::new(Self {
            options,
            refreshed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct TestConnectionManager {
    refreshed: Arc<AtomicUsize>,
}

impl ConnectionManager for TestConnectionManager {
    fn refresh_type_parser(&self, registry: &TypeRegistry) {
        assert_eq!(registry.dialect(), "dmdb");
        self.refreshed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct TestQueryGenerator;

impl Escape for TestQueryGenerator {
    fn escape(&self, value: &str) -> String {
        escape_string(value)
    }
}

impl QueryGenerator for TestQueryGenerator {
    fn quote_identifier(&self, identifier: &str) -> String {
        identifier.to_owned()
    }
}

#[derive(Debug)]
pub struct TestQueryInterface {
    query_generator: Arc<dyn QueryGenerator>,
}

impl QueryInterface for TestQueryInterface {
    fn query_generator(&self) -> &Arc<dyn QueryGenerator> {
        &self.query_generator
    }
}

impl Session for TestSession {
    fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn connection_manager(&self, _: DialectContext<'_>) -> Arc<dyn ConnectionManager> {
        Arc::new(TestConnectionManager {
            refreshed: Arc::clone(&self.refreshed),
        })
    }

    fn query_generator(&self, _: DialectContext<'_>) -> Arc<dyn QueryGenerator> {
        Arc::new(TestQueryGenerator)
    }

    fn query_interface(
        &self,
        _: DialectContext<'_>,
        query_generator: Arc<dyn QueryGenerator>,
    ) -> Arc<dyn QueryInterface> {
        Arc::new(TestQueryInterface { query_generator })
    }
}

/// Constructs a DMDB dialect for a session with the given timezone.
pub fn dialect(timezone: &str) -> (Arc<TestSession>, DmdbDialect) {
    setup_if_needed();

    let session = TestSession::new(SessionOptions::new().timezone(timezone));
    let handle: Arc<dyn Session> = session.clone();
    let dialect = DmdbDialect::new(&handle);

    (session, dialect)
}

/// Asserts the column declarations a DMDB dialect renders.
macro_rules! test_declare {
    ($name:ident($($data_type:expr => $ddl:literal),+ $(,)?)) => {
        #[test]
        fn $name() -> anyhow::Result<()> {
            let (_session, dialect) = $crate::common::dialect("+00:00");

            $(
                let data_type = $data_type;
                assert_eq!(dialect.declare(&data_type)?, $ddl);
                // declaring is idempotent
                assert_eq!(dialect.declare(&data_type)?, dialect.declare(&data_type)?);
            )+

            Ok(())
        }
    };
}

/// Asserts how text protocol values of a raw type tag parse.
macro_rules! test_parse {
    ($name:ident($tag:literal, $($text:literal == $value:expr),+ $(,)?)) => {
        #[test]
        fn $name() -> anyhow::Result<()> {
            let (_session, dialect) = $crate::common::dialect("+00:00");

            $(
                assert_eq!(
                    dialect.parse(&ormx::RawValueRef::text($tag, $text))?,
                    $value,
                    "parsing {:?} as {}",
                    $text,
                    $tag,
                );
            )+

            Ok(())
        }
    };
}
