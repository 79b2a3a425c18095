//! The per-dialect type registry.
//!
//! A [`TypeRegistry`] maps every [`TypeKey`] a dialect supports to a
//! [`TypeBinding`]: the raw driver tags the type is read back as, and the plain
//! functions that declare, validate, serialize and parse it. A registry is built
//! once per dialect and never mutated afterwards, so it can be shared freely
//! between threads.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};

use crate::error::Error;
use crate::escape::Escape;
use crate::options::{ParseOptions, SerializeOptions};
use crate::types::{base, DataType, TypeKey};
use crate::value::{RawValueRef, Value, WireValue};

/// Renders the SQL type declaration for a column.
pub type DeclareFn = fn(&DataType, &dyn Escape) -> String;

/// Checks the modifiers of a type when it is constructed.
pub type ValidateFn = fn(&DataType) -> Result<(), Error>;

/// Converts a native value into its wire representation.
pub type SerializeFn = fn(&DataType, &Value, &SerializeOptions) -> Result<WireValue, Error>;

/// Converts a non-NULL raw driver value into a native value.
pub type ParseFn = fn(TypeKey, &RawValueRef<'_>, &ParseOptions) -> Result<Value, Error>;

/// The driver type tags a logical type corresponds to when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTypes {
    Supported(&'static [&'static str]),
    /// The type has no durable driver representation in this dialect.
    ///
    /// It can still be declared (the dialect synthesizes a column type for it)
    /// but values cannot be parsed back through it.
    Unsupported,
}

impl RawTypes {
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            RawTypes::Supported(tags) => tags,
            RawTypes::Unsupported => &[],
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, RawTypes::Supported(_))
    }
}

/// Everything a dialect knows about one logical type.
#[derive(Clone, Copy)]
pub struct TypeBinding {
    pub key: TypeKey,
    pub raw_types: RawTypes,
    pub declare: DeclareFn,
    pub validate: Option<ValidateFn>,
    pub serialize: Option<SerializeFn>,
    pub parse: Option<ParseFn>,
}

impl TypeBinding {
    /// A binding that declares, serializes and parses `key` the base way.
    pub const fn new(key: TypeKey, raw_types: RawTypes) -> Self {
        Self {
            key,
            raw_types,
            declare: base::declare,
            validate: None,
            serialize: None,
            parse: None,
        }
    }

    pub const fn with_declare(mut self, declare: DeclareFn) -> Self {
        self.declare = declare;
        self
    }

    pub const fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    pub const fn with_serialize(mut self, serialize: SerializeFn) -> Self {
        self.serialize = Some(serialize);
        self
    }

    pub const fn with_parse(mut self, parse: ParseFn) -> Self {
        self.parse = Some(parse);
        self
    }
}

impl Debug for TypeBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeBinding")
            .field("key", &self.key)
            .field("raw_types", &self.raw_types)
            .field("validate", &self.validate.is_some())
            .field("serialize", &self.serialize.is_some())
            .field("parse", &self.parse.is_some())
            .finish()
    }
}

/// A constructed column type: a [`DataType`] that passed its dialect's validation.
#[derive(Debug, Clone, Copy)]
pub struct ColumnType<'a> {
    data_type: &'a DataType,
    binding: &'a TypeBinding,
}

impl ColumnType<'_> {
    pub fn data_type(&self) -> &DataType {
        self.data_type
    }

    pub fn raw_types(&self) -> RawTypes {
        self.binding.raw_types
    }

    /// Renders the SQL fragment used in a column definition.
    pub fn to_sql(&self, escape: &dyn Escape) -> String {
        (self.binding.declare)(self.data_type, escape)
    }
}

/// Builds a [`TypeRegistry`].
///
/// Binding a key that is already bound replaces the earlier binding, which is
/// how a dialect overrides the base behaviour of a type.
#[derive(Debug)]
pub struct TypeRegistryBuilder {
    dialect: &'static str,
    bindings: Vec<TypeBinding>,
}

impl TypeRegistryBuilder {
    pub fn bind(mut self, binding: TypeBinding) -> Self {
        match self.bindings.iter_mut().find(|b| b.key == binding.key) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
        self
    }

    pub fn build(self) -> TypeRegistry {
        let mut by_tag: HashMap<String, Vec<TypeKey>> = HashMap::new();

        for binding in &self.bindings {
            for tag in binding.raw_types.tags() {
                by_tag
                    .entry(tag.to_ascii_uppercase())
                    .or_default()
                    .push(binding.key);
            }
        }

        for (tag, keys) in &by_tag {
            if keys.len() > 1 {
                tracing::debug!(
                    dialect = self.dialect,
                    tag = %tag,
                    ?keys,
                    "raw type tag is shared; the first registered type parses it"
                );
            }
        }

        tracing::debug!(
            dialect = self.dialect,
            bindings = self.bindings.len(),
            "built type registry"
        );

        TypeRegistry {
            dialect: self.dialect,
            bindings: self.bindings.into_iter().map(|b| (b.key, b)).collect(),
            by_tag,
        }
    }
}

/// An immutable mapping from logical type to [`TypeBinding`] for one dialect.
pub struct TypeRegistry {
    dialect: &'static str,
    bindings: BTreeMap<TypeKey, TypeBinding>,
    // registration order is preserved per tag
    by_tag: HashMap<String, Vec<TypeKey>>,
}

impl TypeRegistry {
    pub fn builder(dialect: &'static str) -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            dialect,
            bindings: Vec::new(),
        }
    }

    /// The dialect this registry belongs to.
    pub fn dialect(&self) -> &'static str {
        self.dialect
    }

    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.bindings.keys().copied()
    }

    pub fn binding(&self, key: TypeKey) -> Result<&TypeBinding, Error> {
        self.bindings.get(&key).ok_or(Error::UnsupportedType {
            key,
            dialect: self.dialect,
        })
    }

    /// The raw tags `key` is read back as. Unbound keys are [`RawTypes::Unsupported`].
    pub fn raw_types(&self, key: TypeKey) -> RawTypes {
        self.bindings
            .get(&key)
            .map_or(RawTypes::Unsupported, |b| b.raw_types)
    }

    /// All logical types that list `tag`, in registration order.
    pub fn bindings_for_tag(&self, tag: &str) -> &[TypeKey] {
        self.by_tag
            .get(&tag.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Raw tags claimed by more than one logical type, sorted by tag.
    pub fn overlapping_tags(&self) -> Vec<(&str, &[TypeKey])> {
        let mut overlapping: Vec<_> = self
            .by_tag
            .iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(tag, keys)| (tag.as_str(), keys.as_slice()))
            .collect();
        overlapping.sort_by_key(|(tag, _)| *tag);
        overlapping
    }

    /// Constructs a column type, running the dialect's validation of its modifiers.
    pub fn construct<'a>(&'a self, data_type: &'a DataType) -> Result<ColumnType<'a>, Error> {
        let binding = self.binding(data_type.key())?;

        if let Some(validate) = binding.validate {
            validate(data_type)?;
        }

        Ok(ColumnType { data_type, binding })
    }

    /// Renders the SQL type declaration for `data_type`.
    pub fn declare(&self, data_type: &DataType, escape: &dyn Escape) -> Result<String, Error> {
        Ok(self.construct(data_type)?.to_sql(escape))
    }

    /// Serializes a native value for transmission as a `data_type` parameter.
    pub fn serialize(
        &self,
        data_type: &DataType,
        value: &Value,
        options: &SerializeOptions,
    ) -> Result<WireValue, Error> {
        let binding = self.binding(data_type.key())?;

        tracing::trace!(
            dialect = self.dialect,
            key = %binding.key,
            operation = ?options.operation,
            "serializing value"
        );

        if value.is_null() {
            return Ok(WireValue::Null);
        }

        match binding.serialize {
            Some(serialize) => serialize(data_type, value, options),
            None => base::serialize(data_type, value, options),
        }
    }

    /// Parses a raw driver value, resolving its logical type from the type tag.
    ///
    /// A tag listed by several types parses as the first registered one. Tags no
    /// binding lists are rejected.
    pub fn parse(&self, raw: &RawValueRef<'_>, options: &ParseOptions) -> Result<Value, Error> {
        let key = self
            .bindings_for_tag(raw.type_tag())
            .first()
            .copied()
            .ok_or_else(|| {
                Error::parse(
                    raw.type_tag(),
                    format!("unrecognized type tag for the {} dialect", self.dialect),
                )
            })?;

        tracing::trace!(dialect = self.dialect, tag = raw.type_tag(), %key, "parsing value");

        self.parse_as(key, raw, options)
    }

    /// Parses a raw driver value as the given logical type.
    ///
    /// The value's tag must be one the binding lists.
    pub fn parse_as(
        &self,
        key: TypeKey,
        raw: &RawValueRef<'_>,
        options: &ParseOptions,
    ) -> Result<Value, Error> {
        let binding = self.binding(key)?;

        match binding.raw_types {
            RawTypes::Unsupported => {
                return Err(Error::UnsupportedType {
                    key,
                    dialect: self.dialect,
                })
            }
            types if !types.contains(raw.type_tag()) => {
                return Err(Error::parse(
                    raw.type_tag(),
                    format!("{key} values are not read as this type tag"),
                ))
            }
            _ => {}
        }

        if raw.is_null() {
            return Ok(Value::Null);
        }

        match binding.parse {
            Some(parse) => parse(key, raw, options),
            None => base::parse(key, raw, options),
        }
    }
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("dialect", &self.dialect)
            .field("bindings", &self.bindings.values().collect::<Vec<_>>())
            .finish()
    }
}
