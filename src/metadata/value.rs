use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A string-keyed image-properties mapping, possibly containing nested groups.
pub type Properties = BTreeMap<String, MetadataValue>;

/// A single value in the decoded image-properties tree.
///
/// Sub-dictionaries such as `{Exif}` or `{TIFF}` are represented as
/// [`MetadataValue::Dictionary`]; everything else is a scalar or an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Array(Vec<MetadataValue>),
    Dictionary(Properties),
}

/// The shape a lookup expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    IntegerArray,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::IntegerArray => "[integer]",
        };
        f.write_str(name)
    }
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Integers read as-is; floats only when finite and integral (`26.0` → `26`).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(v) => Some(*v),
            MetadataValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                let limit = i64::MAX as f64;
                if v.abs() < limit { Some(*v as i64) } else { None }
            }
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MetadataValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MetadataValue]> {
        match self {
            MetadataValue::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Properties> {
        match self {
            MetadataValue::Dictionary(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(v) => f.write_str(v),
            MetadataValue::Integer(v) => write!(f, "{v}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            MetadataValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            MetadataValue::Dictionary(map) => write!(f, "{{{} entries}}", map.len()),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<Properties> for MetadataValue {
    fn from(value: Properties) -> Self {
        MetadataValue::Dictionary(value)
    }
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(value: Vec<T>) -> Self {
        MetadataValue::Array(value.into_iter().map(Into::into).collect())
    }
}

/// Typed interpretation of a [`MetadataValue`].
///
/// Implementations never coerce across kinds: a string is never read as a
/// number and a number is never read as a string. A mismatch yields `None`.
pub trait FromMetadataValue: Sized {
    const KIND: ValueKind;

    fn from_metadata_value(value: &MetadataValue) -> Option<Self>;
}

impl FromMetadataValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_metadata_value(value: &MetadataValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromMetadataValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_metadata_value(value: &MetadataValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromMetadataValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_metadata_value(value: &MetadataValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromMetadataValue for Vec<i64> {
    const KIND: ValueKind = ValueKind::IntegerArray;

    // Every element must be an integer; one stray element fails the whole array.
    fn from_metadata_value(value: &MetadataValue) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(MetadataValue::as_integer)
            .collect()
    }
}
