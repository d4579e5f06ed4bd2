//! Value kinds and conversions for tursodao
//!
//! Three layers live here:
//!
//! - [`ValueKind`] - the closed set of attribute kinds an entity descriptor can declare
//! - [`AttrValue`] - a tagged attribute value as produced by getters and consumed by setters
//! - [`IntoValue`] / [`FromValue`] - conversions to and from the driver's [`Value`]

use std::fmt;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
pub use turso::Value;

use crate::error::Error;
use crate::error::Result;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIMESTAMP_FORMAT_ISO: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Kind of an entity attribute
///
/// Row extraction understands every kind except [`ValueKind::Bytes`] and
/// [`ValueKind::Other`]; those fail with a mapping error when a row is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValueKind {
    /// 64-bit signed integer
    BigInt,
    /// Boolean, stored as INTEGER 0/1
    Bool,
    /// Calendar date, stored as `YYYY-MM-DD` text
    Date,
    /// 32-bit signed integer
    Int,
    /// Time of day, stored as `HH:MM:SS[.fff]` text
    Time,
    /// Date and time without zone, stored as `YYYY-MM-DD HH:MM:SS[.fff]` text
    Timestamp,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 text
    Text,
    /// Raw byte sequence
    Bytes,
    /// Any other type, named for diagnostics
    Other(&'static str),
}

impl ValueKind {
    /// Whether the default row mapper can extract a column of this kind
    pub fn is_extractable(&self) -> bool {
        !matches!(self, ValueKind::Bytes | ValueKind::Other(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Other(name) => write!(f, "Other({})", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A tagged attribute value
///
/// Getters return one of these and setters accept one. The variant is the
/// runtime type the parameter binder dispatches on.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Absent value of the given kind
    Null(ValueKind),
    BigInt(i64),
    Bool(bool),
    Date(NaiveDate),
    Int(i32),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Float(f32),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Driver value for kinds outside the closed set
    Raw(Value),
}

impl AttrValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::Null(kind) => *kind,
            AttrValue::BigInt(_) => ValueKind::BigInt,
            AttrValue::Bool(_) => ValueKind::Bool,
            AttrValue::Date(_) => ValueKind::Date,
            AttrValue::Int(_) => ValueKind::Int,
            AttrValue::Time(_) => ValueKind::Time,
            AttrValue::Timestamp(_) => ValueKind::Timestamp,
            AttrValue::Float(_) => ValueKind::Float,
            AttrValue::Double(_) => ValueKind::Double,
            AttrValue::Text(_) => ValueKind::Text,
            AttrValue::Bytes(_) => ValueKind::Bytes,
            AttrValue::Raw(_) => ValueKind::Other("Value"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null(_) | AttrValue::Raw(Value::Null))
    }
}

/// Rust types that can be entity attributes
///
/// The derive macro reads [`AttrType::KIND`] to describe a field and uses the
/// conversions to build its getter and setter. Implement it for a custom type
/// with `KIND = ValueKind::Other(..)` and [`AttrValue::Raw`] values to store it
/// through the generic binding path.
pub trait AttrType: Sized {
    const KIND: ValueKind;

    fn into_attr(self) -> AttrValue;

    fn from_attr(value: AttrValue) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: AttrValue) -> Result<T> {
    match value {
        AttrValue::Null(_) | AttrValue::Raw(Value::Null) => Err(Error::UnexpectedNull),
        other => Err(Error::TypeConversion { expected, actual: format!("{:?}", other) }),
    }
}

impl AttrType for i64 {
    const KIND: ValueKind = ValueKind::BigInt;

    fn into_attr(self) -> AttrValue {
        AttrValue::BigInt(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::BigInt(v) => Ok(v),
            AttrValue::Int(v) => Ok(v as i64),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => i64::from_value(v),
            other => mismatch("BigInt", other),
        }
    }
}

impl AttrType for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_attr(self) -> AttrValue {
        AttrValue::Int(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Int(v) => Ok(v),
            AttrValue::BigInt(v) => {
                i32::try_from(v).map_err(|_| Error::TypeConversion { expected: "Int", actual: v.to_string() })
            }
            AttrValue::Raw(v) if !matches!(v, Value::Null) => i32::from_value(v),
            other => mismatch("Int", other),
        }
    }
}

impl AttrType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_attr(self) -> AttrValue {
        AttrValue::Bool(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Bool(v) => Ok(v),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => bool::from_value(v),
            other => mismatch("Bool", other),
        }
    }
}

impl AttrType for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn into_attr(self) -> AttrValue {
        AttrValue::Double(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Double(v) => Ok(v),
            AttrValue::Float(v) => Ok(v as f64),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => f64::from_value(v),
            other => mismatch("Double", other),
        }
    }
}

impl AttrType for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_attr(self) -> AttrValue {
        AttrValue::Float(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Float(v) => Ok(v),
            AttrValue::Double(v) => Ok(v as f32),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => f32::from_value(v),
            other => mismatch("Float", other),
        }
    }
}

impl AttrType for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_attr(self) -> AttrValue {
        AttrValue::Text(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Text(v) => Ok(v),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => String::from_value(v),
            other => mismatch("Text", other),
        }
    }
}

impl AttrType for Vec<u8> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn into_attr(self) -> AttrValue {
        AttrValue::Bytes(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Bytes(v) => Ok(v),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => Vec::<u8>::from_value(v),
            other => mismatch("Bytes", other),
        }
    }
}

impl AttrType for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn into_attr(self) -> AttrValue {
        AttrValue::Date(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Date(v) => Ok(v),
            AttrValue::Timestamp(v) => Ok(v.date()),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => NaiveDate::from_value(v),
            other => mismatch("Date", other),
        }
    }
}

impl AttrType for NaiveTime {
    const KIND: ValueKind = ValueKind::Time;

    fn into_attr(self) -> AttrValue {
        AttrValue::Time(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Time(v) => Ok(v),
            AttrValue::Timestamp(v) => Ok(v.time()),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => NaiveTime::from_value(v),
            other => mismatch("Time", other),
        }
    }
}

impl AttrType for NaiveDateTime {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn into_attr(self) -> AttrValue {
        AttrValue::Timestamp(self)
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        match value {
            AttrValue::Timestamp(v) => Ok(v),
            AttrValue::Raw(v) if !matches!(v, Value::Null) => NaiveDateTime::from_value(v),
            other => mismatch("Timestamp", other),
        }
    }
}

impl<T: AttrType> AttrType for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn into_attr(self) -> AttrValue {
        match self {
            Some(v) => v.into_attr(),
            None => AttrValue::Null(T::KIND),
        }
    }

    fn from_attr(value: AttrValue) -> Result<Self> {
        if value.is_null() { Ok(None) } else { T::from_attr(value).map(Some) }
    }
}

macro_rules! attr_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrType::into_attr(value)
                }
            }
        )*
    };
}

attr_value_from!(
    i64,
    i32,
    bool,
    f64,
    f32,
    String,
    Vec<u8>,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    Option<i64>,
    Option<i32>,
    Option<bool>,
    Option<String>,
);

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Raw(value)
    }
}

/// Trait for converting Rust types into database values
pub trait IntoValue {
    /// Convert this value into a database [`Value`]
    fn into_value(self) -> Value;
}

/// Trait for converting database values into Rust types
pub trait FromValue: Sized {
    /// Convert a database [`Value`] into this type
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to this type,
    /// or if the value is null and this type is not nullable.
    fn from_value(value: Value) -> Result<Self>;
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Integer(self as i64)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Real(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Real(self as f64)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Integer(if self { 1 } else { 0 })
    }
}

impl IntoValue for NaiveDate {
    fn into_value(self) -> Value {
        Value::Text(self.format(DATE_FORMAT).to_string())
    }
}

impl IntoValue for NaiveTime {
    fn into_value(self) -> Value {
        Value::Text(self.format(TIME_FORMAT).to_string())
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Text(self.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for AttrValue {
    fn into_value(self) -> Value {
        match self {
            AttrValue::Null(_) => Value::Null,
            AttrValue::BigInt(v) => v.into_value(),
            AttrValue::Bool(v) => v.into_value(),
            AttrValue::Date(v) => v.into_value(),
            AttrValue::Int(v) => v.into_value(),
            AttrValue::Time(v) => v.into_value(),
            AttrValue::Timestamp(v) => v.into_value(),
            AttrValue::Float(v) => v.into_value(),
            AttrValue::Double(v) => v.into_value(),
            AttrValue::Text(v) => v.into_value(),
            AttrValue::Bytes(v) => v.into_value(),
            AttrValue::Raw(v) => v,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(v),
            Value::Real(v) => Ok(v as i64),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Integer", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| Error::TypeConversion { expected: "Integer (32-bit)", actual: wide.to_string() })
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Real", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Text", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Blob", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(v != 0),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Integer (boolean)", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => {
                // A timestamp column read as a date keeps its date part.
                let date_part = s.get(..10).unwrap_or(&s);
                NaiveDate::parse_from_str(date_part, DATE_FORMAT)
                    .map_err(|_| Error::TypeConversion { expected: "NaiveDate", actual: s.clone() })
            }
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Text (date)", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => NaiveTime::parse_from_str(&s, TIME_FORMAT)
                .map_err(|_| Error::TypeConversion { expected: "NaiveTime", actual: s }),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Text (time)", actual: format!("{:?}", other) }),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT_ISO))
                .map_err(|_| Error::TypeConversion { expected: "NaiveDateTime", actual: s }),
            Value::Null => Err(Error::UnexpectedNull),
            other => Err(Error::TypeConversion { expected: "Text (datetime)", actual: format!("{:?}", other) }),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

// Optional UUID support, stored through the generic binding path
#[cfg(feature = "with-uuid")]
mod uuid_impl {
    use uuid::Uuid;

    use super::*;

    impl IntoValue for Uuid {
        fn into_value(self) -> Value {
            Value::Text(self.to_string())
        }
    }

    impl FromValue for Uuid {
        fn from_value(value: Value) -> Result<Self> {
            match value {
                Value::Text(s) => {
                    Uuid::parse_str(&s).map_err(|_| Error::TypeConversion { expected: "UUID", actual: s })
                }
                Value::Blob(b) => Uuid::from_slice(&b)
                    .map_err(|_| Error::TypeConversion { expected: "UUID", actual: format!("{:?}", b) }),
                Value::Null => Err(Error::UnexpectedNull),
                other => {
                    Err(Error::TypeConversion { expected: "Text or Blob (UUID)", actual: format!("{:?}", other) })
                }
            }
        }
    }

    impl AttrType for Uuid {
        const KIND: ValueKind = ValueKind::Other("Uuid");

        fn into_attr(self) -> AttrValue {
            AttrValue::Raw(self.into_value())
        }

        fn from_attr(value: AttrValue) -> Result<Self> {
            match value {
                AttrValue::Raw(v) => Uuid::from_value(v),
                AttrValue::Text(s) => Uuid::from_value(Value::Text(s)),
                other => mismatch("Uuid", other),
            }
        }
    }
}

// Optional JSON support, stored through the generic binding path
#[cfg(feature = "with-json")]
pub use json_impl::Json;

#[cfg(feature = "with-json")]
mod json_impl {
    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use super::*;

    /// Wrapper type for attributes stored as JSON text
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Json<T>(pub T);

    impl<T: Serialize + DeserializeOwned> AttrType for Json<T> {
        const KIND: ValueKind = ValueKind::Other("Json");

        /// A value that cannot be serialized is stored as NULL
        fn into_attr(self) -> AttrValue {
            match serde_json::to_string(&self.0) {
                Ok(s) => AttrValue::Raw(Value::Text(s)),
                Err(e) => {
                    tracing::warn!("Failed to serialize JSON attribute, storing NULL: {}", e);
                    AttrValue::Null(Self::KIND)
                }
            }
        }

        fn from_attr(value: AttrValue) -> Result<Self> {
            match value {
                AttrValue::Raw(Value::Text(s)) | AttrValue::Text(s) => Ok(Json(serde_json::from_str(&s)?)),
                other => mismatch("Json", other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_extractable() {
        assert!(ValueKind::BigInt.is_extractable());
        assert!(ValueKind::Timestamp.is_extractable());
        assert!(ValueKind::Text.is_extractable());
        assert!(!ValueKind::Bytes.is_extractable());
        assert!(!ValueKind::Other("Money").is_extractable());
    }

    #[test]
    fn test_value_kind_display() {
        assert_eq!(ValueKind::BigInt.to_string(), "BigInt");
        assert_eq!(ValueKind::Other("Money").to_string(), "Other(Money)");
    }

    #[test]
    fn test_attr_type_kinds() {
        assert_eq!(<i64 as AttrType>::KIND, ValueKind::BigInt);
        assert_eq!(<i32 as AttrType>::KIND, ValueKind::Int);
        assert_eq!(<bool as AttrType>::KIND, ValueKind::Bool);
        assert_eq!(<Option<String> as AttrType>::KIND, ValueKind::Text);
        assert_eq!(<NaiveDateTime as AttrType>::KIND, ValueKind::Timestamp);
    }

    #[test]
    fn test_option_none_is_typed_null() {
        let value = None::<i64>.into_attr();
        assert_eq!(value, AttrValue::Null(ValueKind::BigInt));
        assert!(value.is_null());
        assert_eq!(value.kind(), ValueKind::BigInt);
    }

    #[test]
    fn test_option_from_null() {
        assert_eq!(Option::<String>::from_attr(AttrValue::Null(ValueKind::Text)).unwrap(), None);
        assert_eq!(Option::<String>::from_attr(AttrValue::Raw(Value::Null)).unwrap(), None);
        assert_eq!(Option::<i32>::from_attr(AttrValue::Int(7)).unwrap(), Some(7));
    }

    #[test]
    fn test_non_nullable_from_null() {
        assert!(matches!(i64::from_attr(AttrValue::Null(ValueKind::BigInt)), Err(Error::UnexpectedNull)));
        assert!(matches!(String::from_attr(AttrValue::Null(ValueKind::Text)), Err(Error::UnexpectedNull)));
    }

    #[test]
    fn test_widening_and_narrowing() {
        assert_eq!(i64::from_attr(AttrValue::Int(42)).unwrap(), 42);
        assert_eq!(i32::from_attr(AttrValue::BigInt(42)).unwrap(), 42);
        assert!(i32::from_attr(AttrValue::BigInt(i64::MAX)).is_err());
        assert!((f64::from_attr(AttrValue::Float(1.5)).unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_mismatch() {
        let err = i64::from_attr(AttrValue::Text("x".to_string())).unwrap_err();
        assert!(matches!(err, Error::TypeConversion { expected: "BigInt", .. }));
    }

    #[test]
    fn test_attr_value_into_value() {
        assert_eq!(AttrValue::Bool(true).into_value(), Value::Integer(1));
        assert_eq!(AttrValue::Null(ValueKind::Text).into_value(), Value::Null);
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(AttrValue::Date(date).into_value(), Value::Text("2024-02-29".to_string()));
    }

    #[test]
    fn test_timestamp_text_round_trip() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_milli_opt(13, 45, 10, 250).unwrap();
        let stored = ts.into_value();
        assert_eq!(NaiveDateTime::from_value(stored).unwrap(), ts);
    }

    #[test]
    fn test_timestamp_accepts_iso_separator() {
        let parsed = NaiveDateTime::from_value(Value::Text("2024-05-01T13:45:10".to_string())).unwrap();
        assert_eq!(parsed.to_string(), "2024-05-01 13:45:10");
    }

    #[test]
    fn test_time_round_trip_without_fraction() {
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let stored = time.into_value();
        assert_eq!(stored, Value::Text("08:30:00".to_string()));
        assert_eq!(NaiveTime::from_value(stored).unwrap(), time);
    }

    #[test]
    fn test_date_from_timestamp_text() {
        let date = NaiveDate::from_value(Value::Text("2024-05-01 13:45:10".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_i64_from_real_value() {
        assert_eq!(i64::from_value(Value::Real(42.7)).unwrap(), 42);
    }

    #[test]
    fn test_i32_from_value_overflow() {
        assert!(i32::from_value(Value::Integer(i64::MAX)).is_err());
    }

    #[test]
    fn test_bool_from_value() {
        assert!(bool::from_value(Value::Integer(1)).unwrap());
        assert!(!bool::from_value(Value::Integer(0)).unwrap());
        assert!(bool::from_value(Value::Null).is_err());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(AttrValue::from(5i64), AttrValue::BigInt(5));
        assert_eq!(AttrValue::from("a"), AttrValue::Text("a".to_string()));
        assert_eq!(AttrValue::from(None::<i32>), AttrValue::Null(ValueKind::Int));
        assert_eq!(AttrValue::from(Value::Integer(1)), AttrValue::Raw(Value::Integer(1)));
    }

    #[cfg(feature = "with-json")]
    #[test]
    fn test_unserializable_json_is_null() {
        use std::collections::HashMap;

        let value = Json(HashMap::from([((1, 2), 3)])).into_attr();
        assert_eq!(value, AttrValue::Null(ValueKind::Other("Json")));
    }
}
