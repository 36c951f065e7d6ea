//! Firebird field type codes to portable schema types.
//!
//! `RDB$FIELDS.RDB$FIELD_TYPE` holds a numeric code per column domain.
//! The default table covers the character, integer and floating point
//! codes; every other code (dates, BLOBs, booleans, decimals stored as
//! scaled integers, ...) is advertised as `string`, which matches how
//! every value is rendered in records anyway.
//!
//! The table is a value, not a global: configuration can extend or
//! override entries for newer server versions.

use crate::models::PortableType;
use std::collections::HashMap;

/// Known `RDB$FIELD_TYPE` codes.
pub mod field_type {
    /// SMALLINT
    pub const SHORT: i16 = 7;
    /// INTEGER
    pub const LONG: i16 = 8;
    /// FLOAT
    pub const FLOAT: i16 = 10;
    /// CHAR(n)
    pub const TEXT: i16 = 14;
    /// BIGINT
    pub const INT64: i16 = 16;
    /// DOUBLE PRECISION
    pub const DOUBLE: i16 = 27;
    /// VARCHAR(n)
    pub const VARYING: i16 = 37;
    /// DATE
    pub const DATE: i16 = 12;
    /// TIME
    pub const TIME: i16 = 13;
    /// DECFLOAT(16)
    pub const DEC16: i16 = 24;
    /// DECFLOAT(34)
    pub const DEC34: i16 = 25;
    /// INT128
    pub const INT128: i16 = 26;
    /// TIME WITH TIME ZONE
    pub const TIME_TZ: i16 = 28;
    /// TIMESTAMP WITH TIME ZONE
    pub const TIMESTAMP_TZ: i16 = 29;
    /// TIMESTAMP
    pub const TIMESTAMP: i16 = 35;
    /// BLOB of any sub type
    pub const BLOB: i16 = 261;
}

/// Mapping from vendor type code to portable type.
///
/// Lookups are total: codes absent from the table map to
/// [`PortableType::String`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    entries: HashMap<i16, PortableType>,
}

impl Default for TypeMapping {
    fn default() -> Self {
        Self {
            entries: HashMap::from([
                (field_type::TEXT, PortableType::String),
                (field_type::VARYING, PortableType::String),
                (field_type::LONG, PortableType::Integer),
                (field_type::SHORT, PortableType::Integer),
                (field_type::INT64, PortableType::Integer),
                (field_type::DOUBLE, PortableType::Number),
                (field_type::FLOAT, PortableType::Number),
            ]),
        }
    }
}

impl TypeMapping {
    /// An empty table; every code maps to `string`.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces entries, keeping the rest of the table.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (i16, PortableType)>,
    {
        self.entries.extend(overrides);
        self
    }

    /// Maps a vendor type code, defaulting to `string` for unknown codes.
    pub fn map_type(&self, vendor_type_code: i16) -> PortableType {
        self.entries
            .get(&vendor_type_code)
            .copied()
            .unwrap_or(PortableType::String)
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps a Firebird field type code with the default table.
///
/// # Example
/// ```rust
/// use source_firebird_core::adapters::firebird::map_firebird_type;
/// use source_firebird_core::models::PortableType;
///
/// assert_eq!(map_firebird_type(8), PortableType::Integer);
/// assert_eq!(map_firebird_type(261), PortableType::String);
/// ```
pub fn map_firebird_type(vendor_type_code: i16) -> PortableType {
    TypeMapping::default().map_type(vendor_type_code)
}
