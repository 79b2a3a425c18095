//! Options passed from the ORM session down to the dialect.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::Error;
use crate::timezone::Timezone;

/// Session-wide options the dialect reads when serializing and parsing values.
///
/// Options can also be read from a query string, as found at the end of a
/// connection URL. Keys other than the ones below are ignored.
///
/// |Parameter|Default|Description|
/// |---------|-------|-----------|
/// | `timezone` | `+00:00` | Timezone date/time values are stored in. A zone name (`Asia/Shanghai`) or a UTC offset (`+08:00`). |
/// | `version` | (none) | The server version, if known ahead of connecting. |
///
/// ```rust
/// use ormx_core::SessionOptions;
///
/// let options = SessionOptions::new()
///     .timezone("Asia/Shanghai")
///     .database_version("8.1.3");
///
/// assert_eq!(options.get_timezone(), "Asia/Shanghai");
///
/// let parsed: SessionOptions = "timezone=Asia%2FShanghai&version=8.1.3".parse()?;
/// assert_eq!(parsed, options);
/// # Ok::<(), ormx_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub(crate) timezone: String,
    pub(crate) database_version: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionOptions {
    /// The default timezone, applied when none is configured.
    pub const DEFAULT_TIMEZONE: &'static str = "+00:00";

    pub fn new() -> Self {
        Self {
            timezone: Self::DEFAULT_TIMEZONE.to_owned(),
            database_version: None,
        }
    }

    /// Sets the timezone used for date/time values.
    ///
    /// Either a zone name (`"Europe/Paris"`, `"UTC"`) or a UTC offset (`"+08:00"`).
    pub fn timezone(mut self, timezone: &str) -> Self {
        timezone.clone_into(&mut self.timezone);
        self
    }

    /// Sets the server version, if known ahead of connecting.
    pub fn database_version(mut self, version: &str) -> Self {
        self.database_version = Some(version.to_owned());
        self
    }

    pub fn get_timezone(&self) -> &str {
        &self.timezone
    }

    pub fn get_database_version(&self) -> Option<&str> {
        self.database_version.as_deref()
    }

    pub fn serialize_options(&self, operation: Operation) -> SerializeOptions {
        SerializeOptions {
            timezone: self.timezone.clone(),
            operation,
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            timezone: self.timezone.clone(),
        }
    }
}

impl SessionOptions {
    /// Reads options from a `key=value&...` query string. A leading `?` is
    /// skipped.
    ///
    /// Fails with [`Error::Configuration`] when `timezone` is neither a zone
    /// name nor a UTC offset.
    pub fn from_query(query: &str) -> Result<Self, Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut options = Self::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "timezone" | "time_zone" => {
                    // reject what the value codecs could not use later
                    Timezone::resolve(&value)?;
                    options = options.timezone(&value);
                }

                "version" => {
                    options = options.database_version(&value);
                }

                _ => {
                    tracing::debug!(key = %key, "ignoring unknown session option");
                }
            }
        }

        Ok(options)
    }

    /// Renders these options as a query string [`from_query`](Self::from_query)
    /// reads back.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("timezone", &self.timezone);

        if let Some(version) = &self.database_version {
            query.append_pair("version", version);
        }

        query.finish()
    }
}

impl FromStr for SessionOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_query(s)
    }
}

impl Display for SessionOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// The statement a serialized value is bound into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operation {
    #[default]
    Insert,
    Update,
    /// A comparison in a `WHERE` clause.
    Where,
}

/// Context for [`TypeRegistry::serialize`](crate::TypeRegistry::serialize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    pub timezone: String,
    pub operation: Operation,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SessionOptions::new().serialize_options(Operation::default())
    }
}

impl SerializeOptions {
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }
}

/// Context for [`TypeRegistry::parse`](crate::TypeRegistry::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub timezone: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        SessionOptions::new().parse_options()
    }
}

impl ParseOptions {
    pub fn new(timezone: &str) -> Self {
        Self {
            timezone: timezone.to_owned(),
        }
    }
}

#[test]
fn it_parses_timezone_and_version() {
    let opts = SessionOptions::from_query("timezone=Asia/Shanghai&version=8.1.3").unwrap();

    assert_eq!(opts.get_timezone(), "Asia/Shanghai");
    assert_eq!(opts.get_database_version(), Some("8.1.3"));
}

#[test]
fn it_defaults_missing_options() {
    let opts = SessionOptions::from_query("").unwrap();

    assert_eq!(opts, SessionOptions::new());
    assert_eq!(opts.get_timezone(), "+00:00");
}

#[test]
fn it_skips_the_question_mark_and_unknown_keys() {
    let opts = SessionOptions::from_query("?time_zone=%2B08%3A00&pool=4").unwrap();

    assert_eq!(opts.get_timezone(), "+08:00");
    assert_eq!(opts.get_database_version(), None);
}

#[test]
fn it_rejects_invalid_timezone() {
    let err = SessionOptions::from_query("timezone=Atlantis/Capital").unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn it_roundtrips_options_in_query() {
    let opts = SessionOptions::new()
        .timezone("Europe/Paris")
        .database_version("8.4");

    let parsed: SessionOptions = opts.to_string().parse().unwrap();
    assert_eq!(parsed, opts);
}
