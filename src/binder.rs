//! Positional parameter binding
//!
//! [`bind`] checks the value count against the statement's placeholder count
//! and then dispatches each value, by position starting at 1, to the typed
//! operation for its runtime kind. Kinds without a dedicated operation go
//! through [`Bind::bind_generic`].

use chrono::NaiveDate;
use chrono::NaiveDateTime;

use crate::error::Error;
use crate::error::Result;
use crate::value::AttrValue;
use crate::value::IntoValue;
use crate::value::Value;
use crate::value::ValueKind;

/// Typed binding operations of a prepared statement
///
/// Indices are 1-based.
pub trait Bind {
    fn parameter_count(&self) -> usize;

    fn bind_null(&mut self, index: usize, kind: ValueKind) -> Result<()>;

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()>;

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()>;

    fn bind_date(&mut self, index: usize, value: NaiveDate) -> Result<()>;

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()>;

    fn bind_timestamp(&mut self, index: usize, value: NaiveDateTime) -> Result<()>;

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()>;

    fn bind_bytes(&mut self, index: usize, value: Vec<u8>) -> Result<()>;

    fn bind_generic(&mut self, index: usize, value: Value) -> Result<()>;
}

/// Binds `values` to the statement's placeholders in order
pub fn bind<S: Bind + ?Sized>(statement: &mut S, values: Vec<AttrValue>) -> Result<()> {
    let expected = statement.parameter_count();
    if expected != values.len() {
        return Err(Error::Binding { expected, actual: values.len() });
    }

    for (offset, value) in values.into_iter().enumerate() {
        let index = offset + 1;
        match value {
            AttrValue::Null(kind) => statement.bind_null(index, kind)?,
            AttrValue::BigInt(v) => statement.bind_i64(index, v)?,
            AttrValue::Bool(v) => statement.bind_bool(index, v)?,
            AttrValue::Date(v) => statement.bind_date(index, v)?,
            AttrValue::Int(v) => statement.bind_i32(index, v)?,
            AttrValue::Timestamp(v) => statement.bind_timestamp(index, v)?,
            AttrValue::Float(v) => statement.bind_f32(index, v)?,
            AttrValue::Bytes(v) => statement.bind_bytes(index, v)?,
            generic @ (AttrValue::Double(_) | AttrValue::Text(_) | AttrValue::Time(_) | AttrValue::Raw(_)) => {
                statement.bind_generic(index, generic.into_value())?
            }
        }
    }

    Ok(())
}

/// Positional parameter list filled through [`Bind`]
///
/// Statement implementations that take their parameters as one list at
/// execution time collect bindings here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamBuffer {
    values: Vec<Value>,
}

impl ParamBuffer {
    pub fn new(parameter_count: usize) -> Self {
        Self { values: vec![Value::Null; parameter_count] }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let count = self.values.len();
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.values.get_mut(i))
            .ok_or(Error::Binding { expected: count, actual: index })?;
        *slot = value;
        Ok(())
    }
}

impl Bind for ParamBuffer {
    fn parameter_count(&self) -> usize {
        self.values.len()
    }

    fn bind_null(&mut self, index: usize, _kind: ValueKind) -> Result<()> {
        self.set(index, Value::Null)
    }

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_date(&mut self, index: usize, value: NaiveDate) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_timestamp(&mut self, index: usize, value: NaiveDateTime) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_bytes(&mut self, index: usize, value: Vec<u8>) -> Result<()> {
        self.set(index, value.into_value())
    }

    fn bind_generic(&mut self, index: usize, value: Value) -> Result<()> {
        self.set(index, value)
    }
}
