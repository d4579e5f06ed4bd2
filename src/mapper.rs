//! Row-to-entity conversion
//!
//! Three strategies, in order of precedence:
//!
//! 1. a closure installed on the DAO with [`Dao::set_mapper`](crate::Dao::set_mapper)
//! 2. the entity's own row-mapping operation, when it marks exactly one
//! 3. the synthesized mapper: construct with the zero-argument constructor,
//!    then for each storable attribute read its column and call the setter

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;

use crate::entity::EntityDescriptor;
use crate::entity::Method;
use crate::entity::MethodBody;
use crate::entity::Receiver;
use crate::entity::TypeTag;
use crate::error::Error;
use crate::error::MetadataError;
use crate::error::Result;
use crate::row::Row;
use crate::schema::Profile;
use crate::value::AttrValue;
use crate::value::FromValue;
use crate::value::Value;
use crate::value::ValueKind;

/// Caller-supplied conversion
pub type MapFn<E> = Arc<dyn Fn(&Row) -> Result<E> + Send + Sync>;

struct ColumnRule<E> {
    column: String,
    kind:   ValueKind,
    set:    fn(&mut E, AttrValue) -> Result<()>,
}

enum Strategy<E> {
    Synthesized { constructor: fn() -> E, columns: Vec<ColumnRule<E>> },
    Declared { method: String, decode: fn(&Row) -> Result<E> },
    Custom(MapFn<E>),
}

pub struct RowMapper<E> {
    entity:   &'static str,
    strategy: Strategy<E>,
}

impl<E> RowMapper<E> {
    /// Picks the declared row mapper if there is one, otherwise synthesizes
    pub fn build(descriptor: &EntityDescriptor<E>, profile: &Profile<E>) -> std::result::Result<Self, MetadataError> {
        let entity = descriptor.type_name;
        let marked: Vec<_> = descriptor.methods.iter().filter(|m| m.row_mapper).collect();

        let strategy = match marked.as_slice() {
            [] => {
                let constructor = descriptor.constructor.ok_or(MetadataError::MissingConstructor { entity })?;
                let columns = profile
                    .attributes()
                    .iter()
                    .map(|a| ColumnRule {
                        column: a.column().to_string(),
                        kind:   a.accessors.setter_kind,
                        set:    a.accessors.set,
                    })
                    .collect();
                Strategy::Synthesized { constructor, columns }
            }
            [method] => {
                let decode = validate(entity, method)?;
                Strategy::Declared { method: method.name.clone(), decode }
            }
            _ => return Err(MetadataError::AmbiguousRowMapper { entity, count: marked.len() }),
        };

        Ok(Self { entity, strategy })
    }

    pub fn custom<F>(entity: &'static str, f: F) -> Self
    where F: Fn(&Row) -> Result<E> + Send + Sync + 'static {
        Self { entity, strategy: Strategy::Custom(Arc::new(f)) }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.strategy, Strategy::Synthesized { .. })
    }

    /// Name of the entity's own row-mapping operation, when it is in use
    pub fn declared_method(&self) -> Option<&str> {
        match &self.strategy {
            Strategy::Declared { method, .. } => Some(method),
            _ => None,
        }
    }

    pub fn map(&self, row: &Row) -> Result<E> {
        let mapped = match &self.strategy {
            Strategy::Synthesized { constructor, columns } => self.synthesize(*constructor, columns, row),
            Strategy::Declared { decode, .. } => decode(row),
            Strategy::Custom(f) => f(row),
        };

        if let Err(e) = &mapped {
            #[cfg(feature = "serde")]
            tracing::warn!("Failed to map {} row: {}", self.entity, row.to_json());

            #[cfg(not(feature = "serde"))]
            tracing::warn!("Failed to map {} row: {:?}", self.entity, row);

            tracing::warn!("{}", e.to_string());
        }

        mapped
    }

    fn synthesize(&self, constructor: fn() -> E, columns: &[ColumnRule<E>], row: &Row) -> Result<E> {
        let mut entity = constructor();
        for rule in columns {
            let idx = row.index_of(&rule.column).ok_or_else(|| Error::ColumnNotFound(rule.column.clone()))?;
            let value = extract(self.entity, &rule.column, rule.kind, row.get_value(idx)?)?;
            (rule.set)(&mut entity, value)?;
        }
        Ok(entity)
    }
}

impl<E> fmt::Debug for RowMapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match &self.strategy {
            Strategy::Synthesized { .. } => "Synthesized",
            Strategy::Declared { .. } => "Declared",
            Strategy::Custom(_) => "Custom",
        };
        f.debug_struct("RowMapper").field("entity", &self.entity).field("strategy", &strategy).finish()
    }
}

/// Checks that a marked operation is `fn(row: &Row) -> Result<Self>`
fn validate<E>(entity: &'static str, method: &Method<E>) -> std::result::Result<fn(&Row) -> Result<E>, MetadataError> {
    let invalid = |reason: String| MetadataError::InvalidRowMapper { entity, method: method.name.clone(), reason };

    if method.returns != TypeTag::Entity {
        return Err(invalid(format!("returns {}, expected {}", method.returns, entity)));
    }
    if method.params.len() != 1 {
        return Err(invalid(format!("takes {} parameters, expected exactly one", method.params.len())));
    }
    if method.params[0] != TypeTag::Row {
        return Err(invalid(format!("parameter is {}, expected Row", method.params[0])));
    }
    if method.receiver != Receiver::Static {
        return Err(invalid("must not take a receiver".to_string()));
    }
    match method.body {
        MethodBody::Decode(f) => Ok(f),
        _ => Err(invalid("has no row-decoding body".to_string())),
    }
}

/// Reads one column value as the given kind; SQL NULL becomes a typed null
fn extract(entity: &'static str, column: &str, kind: ValueKind, value: Value) -> Result<AttrValue> {
    if !kind.is_extractable() {
        return Err(Error::Mapping { entity, column: column.to_string(), kind });
    }
    if matches!(value, Value::Null) {
        return Ok(AttrValue::Null(kind));
    }

    Ok(match kind {
        ValueKind::BigInt => AttrValue::BigInt(i64::from_value(value)?),
        ValueKind::Bool => AttrValue::Bool(bool::from_value(value)?),
        ValueKind::Date => AttrValue::Date(NaiveDate::from_value(value)?),
        ValueKind::Int => AttrValue::Int(i32::from_value(value)?),
        ValueKind::Time => AttrValue::Time(NaiveTime::from_value(value)?),
        ValueKind::Timestamp => AttrValue::Timestamp(NaiveDateTime::from_value(value)?),
        ValueKind::Float => AttrValue::Float(f32::from_value(value)?),
        ValueKind::Double => AttrValue::Double(f64::from_value(value)?),
        ValueKind::Text => AttrValue::Text(String::from_value(value)?),
        ValueKind::Bytes | ValueKind::Other(_) => return Err(Error::Mapping { entity, column: column.to_string(), kind }),
    })
}
