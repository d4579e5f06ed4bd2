//! Entity declarations for tursodao
//!
//! An entity type describes itself through an [`EntityDescriptor`]: the
//! type-level metadata (table name, case sensitivity, SQL overrides), one
//! [`AttrDescriptor`] per attribute, and a method table listing the getters,
//! setters and row-mapping operations the type exposes.
//!
//! Descriptors are normally produced by `#[derive(Entity)]`, but can be built
//! by hand with the builder methods below:
//!
//! ```ignore
//! use tursodao::prelude::*;
//!
//! #[derive(Default)]
//! struct Item {
//!     id:   i64,
//!     name: String,
//! }
//!
//! impl Entity for Item {
//!     fn descriptor() -> EntityDescriptor<Self> {
//!         EntityDescriptor::<Self>::new("Item")
//!             .table_name("items")
//!             .insert_sql("INSERT INTO %s (id, name) VALUES (?,?)")
//!             .attribute(AttrDescriptor::new("id", ValueKind::BigInt).id())
//!             .attribute(AttrDescriptor::new("name", ValueKind::Text))
//!             .accessors("id", ValueKind::BigInt, |e| e.id.into_attr(), |e, v| {
//!                 e.id = i64::from_attr(v)?;
//!                 Ok(())
//!             })
//!             .accessors("name", ValueKind::Text, |e| e.name.clone().into_attr(), |e, v| {
//!                 e.name = String::from_attr(v)?;
//!                 Ok(())
//!             })
//!             .constructor(Item::default)
//!     }
//! }
//! ```

use std::fmt;

use crate::error::Result;
use crate::row::Row;
use crate::schema::accessor;
use crate::value::AttrValue;
use crate::value::ValueKind;

/// A type persisted by a [`Dao`](crate::Dao)
pub trait Entity: Sized + Send + Sync + 'static {
    /// Declaration the profile and row mapper are resolved from
    ///
    /// Called once per process; the result is cached by the registry.
    fn descriptor() -> EntityDescriptor<Self>;
}

/// Declaration of one entity attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrDescriptor {
    pub(crate) name:        &'static str,
    pub(crate) kind:        ValueKind,
    pub(crate) column_name: Option<String>,
    pub(crate) id:          bool,
    pub(crate) transient:   bool,
    pub(crate) immutable:   bool,
}

impl AttrDescriptor {
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind, column_name: None, id: false, transient: false, immutable: false }
    }

    /// Marks the attribute as the identifier
    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    /// Overrides the column name; an empty name falls back to the attribute name
    pub fn column_name(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// Excludes the attribute from persistence entirely
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Excludes the attribute from persistence; it is never written back
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_id(&self) -> bool {
        self.id
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Whether the attribute takes part in persistence
    pub fn is_storable(&self) -> bool {
        !self.transient && !self.immutable
    }

    /// Declared column name, attribute name when none (or an empty one) is set
    pub fn column(&self) -> &str {
        match self.column_name.as_deref() {
            Some(column) if !column.is_empty() => column,
            _ => self.name,
        }
    }
}

/// How an operation is invoked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// Type-level operation with no instance
    Static,
    /// Shared borrow of an instance
    Ref,
    /// Exclusive borrow of an instance
    Mut,
}

/// Type of an operation parameter or result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Value(ValueKind),
    /// The entity type itself
    Entity,
    /// A result row
    Row,
    Unit,
    Other(&'static str),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Value(kind) => write!(f, "{}", kind),
            TypeTag::Entity => write!(f, "Self"),
            TypeTag::Row => write!(f, "Row"),
            TypeTag::Unit => write!(f, "()"),
            TypeTag::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Callable part of an operation
pub enum MethodBody<E> {
    Getter(fn(&E) -> AttrValue),
    Setter(fn(&mut E, AttrValue) -> Result<()>),
    Decode(fn(&Row) -> Result<E>),
    /// Listed for discovery only
    Opaque,
}

impl<E> Clone for MethodBody<E> {
    fn clone(&self) -> Self {
        match self {
            MethodBody::Getter(f) => MethodBody::Getter(*f),
            MethodBody::Setter(f) => MethodBody::Setter(*f),
            MethodBody::Decode(f) => MethodBody::Decode(*f),
            MethodBody::Opaque => MethodBody::Opaque,
        }
    }
}

impl<E> fmt::Debug for MethodBody<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodBody::Getter(_) => write!(f, "Getter"),
            MethodBody::Setter(_) => write!(f, "Setter"),
            MethodBody::Decode(_) => write!(f, "Decode"),
            MethodBody::Opaque => write!(f, "Opaque"),
        }
    }
}

/// One entry of an entity's method table
///
/// Accessor discovery and row-mapper validation match on the signature
/// (`receiver`, `params`, `returns`) as well as on the body, so an entry whose
/// shape disagrees with its body is never picked up.
#[derive(Clone, Debug)]
pub struct Method<E> {
    pub name:       String,
    pub receiver:   Receiver,
    pub params:     Vec<TypeTag>,
    pub returns:    TypeTag,
    /// Marked as the entity's row-mapping operation
    pub row_mapper: bool,
    pub body:       MethodBody<E>,
}

impl<E> Method<E> {
    /// `fn name(&self) -> kind`
    pub fn getter(name: impl Into<String>, kind: ValueKind, f: fn(&E) -> AttrValue) -> Self {
        Self {
            name:       name.into(),
            receiver:   Receiver::Ref,
            params:     Vec::new(),
            returns:    TypeTag::Value(kind),
            row_mapper: false,
            body:       MethodBody::Getter(f),
        }
    }

    /// `fn name(&mut self, kind)`
    pub fn setter(name: impl Into<String>, kind: ValueKind, f: fn(&mut E, AttrValue) -> Result<()>) -> Self {
        Self {
            name:       name.into(),
            receiver:   Receiver::Mut,
            params:     vec![TypeTag::Value(kind)],
            returns:    TypeTag::Unit,
            row_mapper: false,
            body:       MethodBody::Setter(f),
        }
    }

    /// `fn name(row: &Row) -> Result<Self>`, marked as row mapper
    pub fn row_mapper(name: impl Into<String>, f: fn(&Row) -> Result<E>) -> Self {
        Self {
            name:       name.into(),
            receiver:   Receiver::Static,
            params:     vec![TypeTag::Row],
            returns:    TypeTag::Entity,
            row_mapper: true,
            body:       MethodBody::Decode(f),
        }
    }
}

/// Everything the toolkit knows about an entity type
pub struct EntityDescriptor<E> {
    pub(crate) type_name:        &'static str,
    pub(crate) table_name:       Option<String>,
    pub(crate) table_options:    Option<String>,
    pub(crate) case_sensitive:   bool,
    pub(crate) insert_sql:       Option<String>,
    pub(crate) update_sql:       Option<String>,
    pub(crate) create_table_sql: Option<String>,
    pub(crate) attributes:       Vec<AttrDescriptor>,
    pub(crate) methods:          Vec<Method<E>>,
    pub(crate) constructor:      Option<fn() -> E>,
}

impl<E> EntityDescriptor<E> {
    /// Empty descriptor; `type_name` is the default table name
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            table_name: None,
            table_options: None,
            case_sensitive: false,
            insert_sql: None,
            update_sql: None,
            create_table_sql: None,
            attributes: Vec::new(),
            methods: Vec::new(),
            constructor: None,
        }
    }

    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Fallback table-creation text, used when no create-table SQL is set
    pub fn table_options(mut self, options: impl Into<String>) -> Self {
        self.table_options = Some(options.into());
        self
    }

    /// Quote table and column names in synthesized SQL
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn insert_sql(mut self, sql: impl Into<String>) -> Self {
        self.insert_sql = Some(sql.into());
        self
    }

    pub fn update_sql(mut self, sql: impl Into<String>) -> Self {
        self.update_sql = Some(sql.into());
        self
    }

    pub fn create_table_sql(mut self, sql: impl Into<String>) -> Self {
        self.create_table_sql = Some(sql.into());
        self
    }

    /// Appends an attribute; declaration order is binding order
    pub fn attribute(mut self, attribute: AttrDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn method(mut self, method: Method<E>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn getter(self, name: impl Into<String>, kind: ValueKind, f: fn(&E) -> AttrValue) -> Self {
        self.method(Method::getter(name, kind, f))
    }

    pub fn setter(self, name: impl Into<String>, kind: ValueKind, f: fn(&mut E, AttrValue) -> Result<()>) -> Self {
        self.method(Method::setter(name, kind, f))
    }

    /// Registers a getter and setter under the conventional names for `attribute`
    pub fn accessors(
        self,
        attribute: &str,
        kind: ValueKind,
        get: fn(&E) -> AttrValue,
        set: fn(&mut E, AttrValue) -> Result<()>,
    ) -> Self {
        self.getter(accessor::getter_name(attribute, kind), kind, get)
            .setter(accessor::setter_name(attribute), kind, set)
    }

    pub fn row_mapper(self, name: impl Into<String>, f: fn(&Row) -> Result<E>) -> Self {
        self.method(Method::row_mapper(name, f))
    }

    /// Zero-argument constructor used by the default row mapper
    pub fn constructor(mut self, f: fn() -> E) -> Self {
        self.constructor = Some(f);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn attributes(&self) -> &[AttrDescriptor] {
        &self.attributes
    }

    pub fn methods(&self) -> &[Method<E>] {
        &self.methods
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }
}

impl<E> fmt::Debug for EntityDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("type_name", &self.type_name)
            .field("table_name", &self.table_name)
            .field("case_sensitive", &self.case_sensitive)
            .field("attributes", &self.attributes)
            .field("methods", &self.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>())
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}
