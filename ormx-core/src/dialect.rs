//! The dialect descriptor and the collaborators it is wired to.
//!
//! The ORM session owns the connection manager, the query generator and the
//! query interface. A dialect only asks the session to construct them, through
//! [`Session`], and keeps shared handles to what it gets back.

use std::fmt::Debug;
use std::sync::Arc;

use crate::escape::Escape;
use crate::options::SessionOptions;
use crate::registry::TypeRegistry;
use crate::supports::DialectSupports;

/// Opens connections for a dialect.
pub trait ConnectionManager: Debug + Send + Sync {
    /// Installs the dialect's type registry as the parser for values the driver
    /// returns. Called once, while the dialect is constructed.
    fn refresh_type_parser(&self, registry: &TypeRegistry);
}

/// Builds SQL strings for a dialect.
///
/// The [`Escape`] implementation quotes string literals. It is what enum
/// declarations render their values through.
pub trait QueryGenerator: Escape + Debug + Send + Sync {
    /// Quotes an identifier (table, column, index name).
    fn quote_identifier(&self, identifier: &str) -> String;
}

/// Runs schema and data operations on top of a [`QueryGenerator`].
pub trait QueryInterface: Debug + Send + Sync {
    fn query_generator(&self) -> &Arc<dyn QueryGenerator>;
}

/// What a collaborator gets to see of the dialect it is constructed for.
#[derive(Debug, Clone, Copy)]
pub struct DialectContext<'a> {
    pub name: &'static str,
    pub supports: &'a DialectSupports,
    pub types: &'a TypeRegistry,
}

/// The ORM session a dialect is constructed for.
pub trait Session: Send + Sync {
    fn options(&self) -> &SessionOptions;

    fn connection_manager(&self, dialect: DialectContext<'_>) -> Arc<dyn ConnectionManager>;

    fn query_generator(&self, dialect: DialectContext<'_>) -> Arc<dyn QueryGenerator>;

    fn query_interface(
        &self,
        dialect: DialectContext<'_>,
        query_generator: Arc<dyn QueryGenerator>,
    ) -> Arc<dyn QueryInterface>;
}

/// A database dialect: identity, capabilities, types and collaborators.
///
/// A dialect is constructed once when the application selects a database and is
/// read-only afterwards.
pub trait Dialect: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self) -> &DialectSupports;

    fn type_registry(&self) -> &TypeRegistry;

    /// Opening identifier quote. May be empty, in which case identifiers are
    /// emitted unquoted.
    fn tick_char_left(&self) -> &'static str;

    fn tick_char_right(&self) -> &'static str;

    fn default_version(&self) -> &'static str;

    fn connection_manager(&self) -> &Arc<dyn ConnectionManager>;

    fn query_generator(&self) -> &Arc<dyn QueryGenerator>;

    fn query_interface(&self) -> &Arc<dyn QueryInterface>;

    /// The session this dialect was constructed for, if it is still alive.
    fn session(&self) -> Option<Arc<dyn Session>>;

    /// Wraps `identifier` in the dialect's tick characters.
    fn quote_identifier(&self, identifier: &str) -> String {
        format!(
            "{}{identifier}{}",
            self.tick_char_left(),
            self.tick_char_right()
        )
    }
}
