//! Semantic column types and their PostgreSQL store types
//!
//! A [`SemanticType`] is what the application thinks a column holds. The store type is
//! the SQL type name written into DDL; it is derived from the semantic type (plus length
//! facets) whenever a column does not spell one out.

use std::borrow::Cow;

use crate::ident::delimit_qualified;

/// Longest `varchar(n)` PostgreSQL accepts; beyond it the column maps to `text`.
pub const MAX_VARCHAR_LENGTH: u32 = 10_485_760;

/// Application-level type of a column or literal.
///
/// See: <https://www.postgresql.org/docs/current/datatype.html>
///
/// # Examples
///
/// ```
/// use pgschema_types::postgres::SemanticType;
///
/// assert_eq!(SemanticType::Integer.store_type(), "integer");
/// assert_eq!(SemanticType::Text.resolve_store_type(Some(30), false), "character varying(30)");
/// assert_eq!(
///     SemanticType::array(SemanticType::SmallInt).store_type(),
///     "smallint[]"
/// );
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SemanticType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    Numeric,
    #[default]
    Text,
    Json,
    Jsonb,
    Bytea,
    Uuid,

    /// See: <https://www.postgresql.org/docs/current/datatype-datetime.html>
    Date,
    Timestamp,
    Timestamptz,
    Time,
    Timetz,
    Interval,

    /// See: <https://www.postgresql.org/docs/current/datatype-net-types.html>
    MacAddr,
    MacAddr8,
    Inet,
    Cidr,

    /// See: <https://www.postgresql.org/docs/current/datatype-geometric.html>
    Point,
    Line,
    LineSegment,
    Box,
    Path,
    Polygon,
    Circle,

    /// Fixed-length bit string, `bit(n)`
    Bit,
    /// Variable-length bit string, `bit varying(n)`
    VarBit,

    /// `hstore` extension key/value map
    Hstore,
    /// Physical row locator
    Tid,

    /// Full-text search query, held in its normalized text form (`'a' & 'b'`)
    ///
    /// See: <https://www.postgresql.org/docs/current/datatype-textsearch.html>
    TsQuery,
    /// Full-text search document, held in its normalized text form (`'a' 'b'`)
    TsVector,

    /// A user-declared enum type
    Enum {
        schema: Option<Cow<'static, str>>,
        name: Cow<'static, str>,
    },

    /// A range type over `subtype`
    Range {
        schema: Option<Cow<'static, str>>,
        name: Cow<'static, str>,
        subtype: std::boxed::Box<SemanticType>,
    },

    /// One-dimensional array of the element type
    Array(std::boxed::Box<SemanticType>),
}

impl SemanticType {
    #[must_use]
    pub fn array(element: SemanticType) -> Self {
        Self::Array(std::boxed::Box::new(element))
    }

    #[must_use]
    pub fn enumeration(schema: Option<&str>, name: impl Into<Cow<'static, str>>) -> Self {
        Self::Enum {
            schema: schema.map(|s| Cow::Owned(s.to_string())),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn range(name: impl Into<Cow<'static, str>>, subtype: SemanticType) -> Self {
        Self::Range {
            schema: None,
            name: name.into(),
            subtype: std::boxed::Box::new(subtype),
        }
    }

    /// Built-in `int4range`
    #[must_use]
    pub fn int4range() -> Self {
        Self::range("int4range", Self::Integer)
    }

    /// Built-in `int8range`
    #[must_use]
    pub fn int8range() -> Self {
        Self::range("int8range", Self::BigInt)
    }

    /// Built-in `numrange`
    #[must_use]
    pub fn numrange() -> Self {
        Self::range("numrange", Self::Numeric)
    }

    /// Built-in `daterange`
    #[must_use]
    pub fn daterange() -> Self {
        Self::range("daterange", Self::Date)
    }

    /// Built-in `tsrange`
    #[must_use]
    pub fn tsrange() -> Self {
        Self::range("tsrange", Self::Timestamp)
    }

    /// Built-in `tstzrange`
    #[must_use]
    pub fn tstzrange() -> Self {
        Self::range("tstzrange", Self::Timestamptz)
    }

    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::SmallInt | Self::Integer | Self::BigInt)
    }

    /// Store type with no length facets.
    #[must_use]
    pub fn store_type(&self) -> Cow<'static, str> {
        let name = match self {
            Self::Boolean => "boolean",
            Self::SmallInt => "smallint",
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::Real => "real",
            Self::DoublePrecision => "double precision",
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Bytea => "bytea",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Timestamp => "timestamp without time zone",
            Self::Timestamptz => "timestamp with time zone",
            Self::Time => "time without time zone",
            Self::Timetz => "time with time zone",
            Self::Interval => "interval",
            Self::MacAddr => "macaddr",
            Self::MacAddr8 => "macaddr8",
            Self::Inet => "inet",
            Self::Cidr => "cidr",
            Self::Point => "point",
            Self::Line => "line",
            Self::LineSegment => "lseg",
            Self::Box => "box",
            Self::Path => "path",
            Self::Polygon => "polygon",
            Self::Circle => "circle",
            Self::Bit => "bit",
            Self::VarBit => "bit varying",
            Self::Hstore => "hstore",
            Self::Tid => "tid",
            Self::TsQuery => "tsquery",
            Self::TsVector => "tsvector",
            Self::Enum { schema, name } | Self::Range { schema, name, .. } => {
                return Cow::Owned(delimit_qualified(name, schema.as_deref()));
            }
            Self::Array(element) => return Cow::Owned(format!("{}[]", element.store_type())),
        };
        Cow::Borrowed(name)
    }

    /// Store type including length facets, as written into a column definition.
    ///
    /// Strings with a maximum length become `character varying(n)` (or `character(n)`
    /// when fixed-length), falling back to `text` above [`MAX_VARCHAR_LENGTH`].
    /// Bit strings carry their length the same way.
    #[must_use]
    pub fn resolve_store_type(&self, max_length: Option<u32>, fixed_length: bool) -> Cow<'static, str> {
        match (self, max_length) {
            (Self::Text, Some(n)) if n > MAX_VARCHAR_LENGTH => Cow::Borrowed("text"),
            (Self::Text, Some(n)) if fixed_length => Cow::Owned(format!("character({n})")),
            (Self::Text, Some(n)) => Cow::Owned(format!("character varying({n})")),
            (Self::Bit, Some(n)) => Cow::Owned(format!("bit({n})")),
            (Self::VarBit, Some(n)) if fixed_length => Cow::Owned(format!("bit({n})")),
            (Self::VarBit, Some(n)) => Cow::Owned(format!("bit varying({n})")),
            _ => self.store_type(),
        }
    }
}

impl core::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.store_type())
    }
}

/// Returns `true` for the integer store type spellings a serial column can be built on.
#[must_use]
pub fn is_integer_store_type(store_type: &str) -> bool {
    matches!(
        store_type,
        "integer" | "int" | "int4" | "bigint" | "int8" | "smallint" | "int2"
    )
}

/// Serial pseudo-type for an integer store type, if it has one.
#[must_use]
pub fn serial_store_type(store_type: &str) -> Option<&'static str> {
    match store_type {
        "int" | "int4" | "integer" => Some("serial"),
        "bigint" | "int8" => Some("bigserial"),
        "smallint" | "int2" => Some("smallserial"),
        _ => None,
    }
}
