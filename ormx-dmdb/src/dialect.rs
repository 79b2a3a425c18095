use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Weak};

use ormx_core::{
    ColumnType, ConnectionManager, ConstraintSupports, DataType, Dialect, DialectContext,
    DialectSupports, Escape, IndexSupports, IndexUsing, InsertSupports, Operation,
    QueryGenerator, QueryInterface, RawValueRef, Session, SessionOptions, TypeKey, TypeRegistry,
    Value, WireValue,
};

use crate::error::Error;
use crate::types;

/// The dialect name.
pub const NAME: &str = "dmdb";

/// DMDB identifiers are not quoted.
pub const TICK_CHAR: &str = "";

pub const DEFAULT_VERSION: &str = "";

/// The capabilities of a DMDB server.
pub fn supports() -> DialectSupports {
    DialectSupports {
        values_empty: true,
        limit_on_update: true,
        lock: true,
        for_share: Some("LOCK IN SHARE MODE"),
        setting_isolation_level_during_transaction: false,
        inserts: InsertSupports {
            ignore_duplicates: Some(" IGNORE"),
            update_on_duplicate: Some(" ON DUPLICATE KEY UPDATE"),
            ..InsertSupports::default()
        },
        index: IndexSupports {
            collate: false,
            length: true,
            parser: true,
            type_: true,
            using: IndexUsing::AfterName,
            ..IndexSupports::default()
        },
        constraints: ConstraintSupports {
            drop_constraint: false,
            check: false,
            ..ConstraintSupports::default()
        },
        index_via_alter: true,
        index_hints: true,
        numeric: true,
        geometry: true,
        json: true,
        regexp: true,
        ..DialectSupports::default()
    }
}

/// The DMDB dialect descriptor.
///
/// Constructed once per session. Everything it exposes is fixed at construction,
/// so it can be shared between threads behind an `Arc`.
pub struct DmdbDialect {
    session: Weak<dyn Session>,
    options: SessionOptions,
    supports: DialectSupports,
    types: TypeRegistry,
    connection_manager: Arc<dyn ConnectionManager>,
    query_generator: Arc<dyn QueryGenerator>,
    query_interface: Arc<dyn QueryInterface>,
}

impl DmdbDialect {
    pub fn new(session: &Arc<dyn Session>) -> Self {
        let supports = supports();
        let types = types::registry();

        let context = DialectContext {
            name: NAME,
            supports: &supports,
            types: &types,
        };

        let connection_manager = session.connection_manager(context);
        let query_generator = session.query_generator(context);
        let query_interface = session.query_interface(context, Arc::clone(&query_generator));

        connection_manager.refresh_type_parser(&types);

        let options = session.options().clone();

        tracing::debug!(
            dialect = NAME,
            default_version = DEFAULT_VERSION,
            timezone = options.get_timezone(),
            "constructed dialect"
        );

        Self {
            session: Arc::downgrade(session),
            options,
            supports,
            types,
            connection_manager,
            query_generator,
            query_interface,
        }
    }

    /// The session options this dialect was constructed with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Constructs a column type, checking its modifiers.
    pub fn construct<'a>(&'a self, data_type: &'a DataType) -> Result<ColumnType<'a>, Error> {
        self.types.construct(data_type)
    }

    /// Renders the column type declaration, escaping enum values through the
    /// query generator.
    pub fn declare(&self, data_type: &DataType) -> Result<String, Error> {
        let generator = &self.query_generator;
        let escape = |value: &str| generator.escape(value);

        self.types.declare(data_type, &escape)
    }

    pub fn serialize(
        &self,
        data_type: &DataType,
        value: &Value,
        operation: Operation,
    ) -> Result<WireValue, Error> {
        self.types
            .serialize(data_type, value, &self.options.serialize_options(operation))
    }

    /// Parses a value by its raw type tag.
    pub fn parse(&self, raw: &RawValueRef<'_>) -> Result<Value, Error> {
        self.types.parse(raw, &self.options.parse_options())
    }

    /// Parses a value as a known logical type.
    pub fn parse_as(&self, key: TypeKey, raw: &RawValueRef<'_>) -> Result<Value, Error> {
        self.types.parse_as(key, raw, &self.options.parse_options())
    }
}

impl Dialect for DmdbDialect {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self) -> &DialectSupports {
        &self.supports
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    fn tick_char_left(&self) -> &'static str {
        TICK_CHAR
    }

    fn tick_char_right(&self) -> &'static str {
        TICK_CHAR
    }

    fn default_version(&self) -> &'static str {
        DEFAULT_VERSION
    }

    fn connection_manager(&self) -> &Arc<dyn ConnectionManager> {
        &self.connection_manager
    }

    fn query_generator(&self) -> &Arc<dyn QueryGenerator> {
        &self.query_generator
    }

    fn query_interface(&self) -> &Arc<dyn QueryInterface> {
        &self.query_interface
    }

    fn session(&self) -> Option<Arc<dyn Session>> {
        self.session.upgrade()
    }
}

impl Debug for DmdbDialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmdbDialect")
            .field("name", &NAME)
            .field("options", &self.options)
            .field("supports", &self.supports)
            .field("types", &self.types)
            .field("connection_manager", &self.connection_manager)
            .field("query_generator", &self.query_generator)
            .field("query_interface", &self.query_interface)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormx_core::Capability;

    #[test]
    fn it_overrides_the_baseline_capabilities() {
        let supports = supports();

        assert_eq!(supports.get("VALUES ()"), Some(Capability::Bool(true)));
        assert_eq!(
            supports.get("forShare"),
            Some(Capability::Str("LOCK IN SHARE MODE"))
        );
        assert_eq!(
            supports.get("inserts.updateOnDuplicate"),
            Some(Capability::Str(" ON DUPLICATE KEY UPDATE"))
        );
        assert_eq!(supports.get("index.using"), Some(Capability::Int(1)));
        assert_eq!(supports.get("constraints.check"), Some(Capability::Bool(false)));
        assert_eq!(
            supports.get("settingIsolationLevelDuringTransaction"),
            Some(Capability::Bool(false))
        );
    }

    #[test]
    fn it_keeps_the_baseline_where_not_overridden() {
        let supports = supports();
        let baseline = DialectSupports::default();

        assert_eq!(supports.auto_increment, baseline.auto_increment);
        assert_eq!(supports.inserts.on_conflict_do_nothing, None);
        assert!(supports.constraints.unique);
        assert!(!supports.index.concurrently);
        assert!(supports.transactions);
    }
}
