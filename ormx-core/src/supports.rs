//! The capability table a dialect exposes to the query generator.
//!
//! [`DialectSupports::default()`] is the baseline every dialect starts from. A
//! dialect overrides the fields its database differs on, using struct update
//! syntax:
//!
//! ```rust
//! use ormx_core::{DialectSupports, IndexSupports};
//!
//! let supports = DialectSupports {
//!     lock: true,
//!     index: IndexSupports {
//!         collate: false,
//!         ..IndexSupports::default()
//!     },
//!     ..DialectSupports::default()
//! };
//!
//! assert!(supports.lock);
//! assert!(supports.index.using.is_supported());
//! ```
//!
//! The query generator may also look capabilities up by name, with
//! [`DialectSupports::get`], using the same dotted names the ORM core uses
//! (`"forShare"`, `"inserts.updateOnDuplicate"`, `"index.using"`).

use std::fmt::{self, Display, Formatter};

/// The value of one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Bool(bool),
    /// A SQL fragment the generator emits when the feature is used.
    Str(&'static str),
    Int(u8),
}

impl Capability {
    /// Whether the feature is available at all.
    pub fn is_enabled(&self) -> bool {
        match self {
            Capability::Bool(v) => *v,
            Capability::Str(v) => !v.is_empty(),
            Capability::Int(v) => *v != 0,
        }
    }

    fn from_fragment(fragment: Option<&'static str>) -> Self {
        fragment.map_or(Capability::Bool(false), Capability::Str)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Bool(v) => write!(f, "{v}"),
            Capability::Str(v) => write!(f, "{v:?}"),
            Capability::Int(v) => write!(f, "{v}"),
        }
    }
}

/// Where an index's `USING` clause may appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexUsing {
    Unsupported,
    /// Supported, at the generator's default position.
    #[default]
    Supported,
    /// `CREATE INDEX name USING method ON table (...)`.
    AfterName,
    /// `CREATE INDEX name ON table USING method (...)`.
    AfterTable,
}

impl IndexUsing {
    pub fn is_supported(&self) -> bool {
        !matches!(self, IndexUsing::Unsupported)
    }

    fn capability(self) -> Capability {
        match self {
            IndexUsing::Unsupported => Capability::Bool(false),
            IndexUsing::Supported => Capability::Bool(true),
            IndexUsing::AfterName => Capability::Int(1),
            IndexUsing::AfterTable => Capability::Int(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrementSupports {
    pub identity_insert: bool,
    pub default_value: bool,
    pub update: bool,
}

impl Default for AutoIncrementSupports {
    fn default() -> Self {
        Self {
            identity_insert: false,
            default_value: true,
            update: true,
        }
    }
}

/// Clauses the generator can append to an `INSERT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSupports {
    pub ignore_duplicates: Option<&'static str>,
    pub update_on_duplicate: Option<&'static str>,
    pub on_conflict_do_nothing: Option<&'static str>,
    pub conflict_fields: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSupports {
    pub restrict: bool,
    pub add_constraint: bool,
    pub drop_constraint: bool,
    pub unique: bool,
    pub default: bool,
    pub check: bool,
    pub foreign_key: bool,
    pub primary_key: bool,
}

impl Default for ConstraintSupports {
    fn default() -> Self {
        Self {
            restrict: true,
            add_constraint: true,
            drop_constraint: true,
            unique: true,
            default: false,
            check: true,
            foreign_key: true,
            primary_key: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSupports {
    pub collate: bool,
    pub length: bool,
    pub parser: bool,
    pub concurrently: bool,
    pub type_: bool,
    pub using: IndexUsing,
    pub function_based: bool,
    pub operator: bool,
}

impl Default for IndexSupports {
    fn default() -> Self {
        Self {
            collate: true,
            length: false,
            parser: false,
            concurrently: false,
            type_: false,
            using: IndexUsing::Supported,
            function_based: false,
            operator: false,
        }
    }
}

/// Which SQL constructs a dialect's database accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectSupports {
    pub default: bool,
    pub default_values: bool,
    pub values_empty: bool,
    pub limit_on_update: bool,
    pub on_duplicate_key: bool,
    pub order_nulls: bool,
    pub union: bool,
    pub union_all: bool,
    pub right_join: bool,
    pub return_values: bool,
    pub auto_increment: AutoIncrementSupports,
    pub bulk_default: bool,
    pub schemas: bool,
    pub transactions: bool,
    pub setting_isolation_level_during_transaction: bool,
    pub transaction_options_type: bool,
    pub migrations: bool,
    pub upserts: bool,
    pub inserts: InsertSupports,
    pub constraints: ConstraintSupports,
    pub index: IndexSupports,
    pub grouped_limit: bool,
    pub index_via_alter: bool,
    pub index_hints: bool,
    pub deferrable_constraints: bool,
    pub lock: bool,
    /// The clause a shared row lock lowers to, if the database has one.
    pub for_share: Option<&'static str>,
    pub numeric: bool,
    pub geometry: bool,
    pub json: bool,
    pub regexp: bool,
}

impl Default for DialectSupports {
    fn default() -> Self {
        Self {
            default: true,
            default_values: false,
            values_empty: false,
            limit_on_update: false,
            on_duplicate_key: true,
            order_nulls: false,
            union: true,
            union_all: true,
            right_join: true,
            return_values: false,
            auto_increment: AutoIncrementSupports::default(),
            bulk_default: false,
            schemas: false,
            transactions: true,
            setting_isolation_level_during_transaction: true,
            transaction_options_type: false,
            migrations: true,
            upserts: true,
            inserts: InsertSupports::default(),
            constraints: ConstraintSupports::default(),
            index: IndexSupports::default(),
            grouped_limit: true,
            index_via_alter: false,
            index_hints: false,
            deferrable_constraints: false,
            lock: false,
            for_share: None,
            numeric: false,
            geometry: false,
            json: false,
            regexp: false,
        }
    }
}

impl DialectSupports {
    /// Every name [`get`](Self::get) answers for.
    pub const KEYS: &'static [&'static str] = &[
        "DEFAULT",
        "DEFAULT VALUES",
        "VALUES ()",
        "LIMIT ON UPDATE",
        "ON DUPLICATE KEY",
        "ORDER NULLS",
        "UNION",
        "UNION ALL",
        "RIGHT JOIN",
        "returnValues",
        "autoIncrement.identityInsert",
        "autoIncrement.defaultValue",
        "autoIncrement.update",
        "bulkDefault",
        "schemas",
        "transactions",
        "settingIsolationLevelDuringTransaction",
        "transactionOptions.type",
        "migrations",
        "upserts",
        "inserts.ignoreDuplicates",
        "inserts.updateOnDuplicate",
        "inserts.onConflictDoNothing",
        "inserts.conflictFields",
        "constraints.restrict",
        "constraints.addConstraint",
        "constraints.dropConstraint",
        "constraints.unique",
        "constraints.default",
        "constraints.check",
        "constraints.foreignKey",
        "constraints.primaryKey",
        "index.collate",
        "index.length",
        "index.parser",
        "index.concurrently",
        "index.type",
        "index.using",
        "index.functionBased",
        "index.operator",
        "groupedLimit",
        "indexViaAlter",
        "indexHints",
        "deferrableConstraints",
        "lock",
        "forShare",
        "NUMERIC",
        "GEOMETRY",
        "JSON",
        "REGEXP",
    ];

    /// Looks a capability up by name. Returns `None` for names not in [`KEYS`](Self::KEYS).
    pub fn get(&self, key: &str) -> Option<Capability> {
        use Capability::Bool;

        Some(match key {
            "DEFAULT" => Bool(self.default),
            "DEFAULT VALUES" => Bool(self.default_values),
            "VALUES ()" => Bool(self.values_empty),
            "LIMIT ON UPDATE" => Bool(self.limit_on_update),
            "ON DUPLICATE KEY" => Bool(self.on_duplicate_key),
            "ORDER NULLS" => Bool(self.order_nulls),
            "UNION" => Bool(self.union),
            "UNION ALL" => Bool(self.union_all),
            "RIGHT JOIN" => Bool(self.right_join),
            "returnValues" => Bool(self.return_values),
            "autoIncrement.identityInsert" => Bool(self.auto_increment.identity_insert),
            "autoIncrement.defaultValue" => Bool(self.auto_increment.default_value),
            "autoIncrement.update" => Bool(self.auto_increment.update),
            "bulkDefault" => Bool(self.bulk_default),
            "schemas" => Bool(self.schemas),
            "transactions" => Bool(self.transactions),
            "settingIsolationLevelDuringTransaction" => {
                Bool(self.setting_isolation_level_during_transaction)
            }
            "transactionOptions.type" => Bool(self.transaction_options_type),
            "migrations" => Bool(self.migrations),
            "upserts" => Bool(self.upserts),
            "inserts.ignoreDuplicates" => Capability::from_fragment(self.inserts.ignore_duplicates),
            "inserts.updateOnDuplicate" => {
                Capability::from_fragment(self.inserts.update_on_duplicate)
            }
            "inserts.onConflictDoNothing" => {
                Capability::from_fragment(self.inserts.on_conflict_do_nothing)
            }
            "inserts.conflictFields" => Bool(self.inserts.conflict_fields),
            "constraints.restrict" => Bool(self.constraints.restrict),
            "constraints.addConstraint" => Bool(self.constraints.add_constraint),
            "constraints.dropConstraint" => Bool(self.constraints.drop_constraint),
            "constraints.unique" => Bool(self.constraints.unique),
            "constraints.default" => Bool(self.constraints.default),
            "constraints.check" => Bool(self.constraints.check),
            "constraints.foreignKey" => Bool(self.constraints.foreign_key),
            "constraints.primaryKey" => Bool(self.constraints.primary_key),
            "index.collate" => Bool(self.index.collate),
            "index.length" => Bool(self.index.length),
            "index.parser" => Bool(self.index.parser),
            "index.concurrently" => Bool(self.index.concurrently),
            "index.type" => Bool(self.index.type_),
            "index.using" => self.index.using.capability(),
            "index.functionBased" => Bool(self.index.function_based),
            "index.operator" => Bool(self.index.operator),
            "groupedLimit" => Bool(self.grouped_limit),
            "indexViaAlter" => Bool(self.index_via_alter),
            "indexHints" => Bool(self.index_hints),
            "deferrableConstraints" => Bool(self.deferrable_constraints),
            "lock" => Bool(self.lock),
            "forShare" => Capability::from_fragment(self.for_share),
            "NUMERIC" => Bool(self.numeric),
            "GEOMETRY" => Bool(self.geometry),
            "JSON" => Bool(self.json),
            "REGEXP" => Bool(self.regexp),
            _ => return None,
        })
    }

    /// Shorthand for `get(key)` that treats unknown names as unsupported.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|c| c.is_enabled())
    }

    /// Every capability, in [`KEYS`](Self::KEYS) order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Capability)> + '_ {
        Self::KEYS
            .iter()
            .filter_map(move |key| self.get(key).map(|c| (*key, c)))
    }
}
