//! # tursodao
//!
//! Generic data access objects for [Turso](https://turso.tech), driven by
//! per-entity metadata instead of hand-written SQL plumbing.
//!
//! ## Features
//!
//! - Derive macro describing an entity: table name, identifier, column names,
//!   excluded attributes, SQL overrides
//! - Accessors discovered by naming convention (`get_x` / `is_x` / `set_x`)
//! - Synthesized read, delete and drop statements; declared insert, update and
//!   create-table statements with `%s` standing for the table name
//! - Default row mapping through the setters, or an entity-provided mapper
//! - Typed positional parameter binding
//! - Join-table DAO with column names chosen at run time
//!
//! ## Quick Start
//!
//! ```ignore
//! use tursodao::prelude::*;
//!
//! #[derive(Clone, Debug, Default, Entity)]
//! #[tursodao(
//!     table_name = "items",
//!     insert_sql = "INSERT INTO %s (RecID, name) VALUES (?,?)",
//!     update_sql = "UPDATE %s SET name=?",
//!     create_table_sql = "CREATE TABLE %s (RecID INTEGER PRIMARY KEY, name TEXT)"
//! )]
//! pub struct Item {
//!     #[tursodao(id, column_name = "RecID")]
//!     pub id:   i64,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let db = Builder::new_local("items.db").build().await?;
//!     let items = Dao::<Item, _>::new(db)?;
//!
//!     items.create_table().await?;
//!     items.insert(&Item { id: 1, name: "widget".to_string() }).await?;
//!
//!     let widget = items.get_by_id(1i64).await?;
//!     let mut all = items.get_all().await?;
//!     while let Some(item) = all.next().await? {
//!         println!("{:?}", item);
//!     }
//!
//!     items.delete(1i64).await?;
//!     items.drop_table().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Entity Attributes
//!
//! On the struct, `#[tursodao(...)]` supports:
//!
//! - `table_name = "..."` - table name (default: the struct name)
//! - `case_sensitive` - quote table and column names in generated SQL
//! - `insert_sql`, `update_sql`, `create_table_sql` - statement text, `%s` is the table name
//! - `table_options = "..."` - create-table text used when `create_table_sql` is absent
//! - `row_mapper = "path"` - a `fn(&Row) -> Result<Self>` used instead of the default mapper
//! - `constructor = "path"` - a `fn() -> Self` for the default mapper (default: `Default::default`)
//!
//! On fields:
//!
//! - `id` (or `primary_key`) - the identifier attribute
//! - `column_name = "..."` - column name (default: the field name)
//! - `transient` / `immutable` - excluded from persistence

extern crate self as tursodao;

pub mod binder;
pub mod connection;
pub mod dao;
pub mod entity;
pub mod error;
pub mod mapper;
pub mod prelude;
pub mod row;
pub mod schema;
pub mod sql;
pub mod value;
// Re-export main types at crate root
pub use binder::Bind;
pub use connection::Builder;
pub use connection::Connection;
pub use connection::ConnectionProvider;
pub use connection::Database;
pub use dao::Cursor;
pub use dao::Dao;
pub use dao::JoinDao;
pub use dao::JoinRecord;
pub use entity::AttrDescriptor;
pub use entity::Entity;
pub use entity::EntityDescriptor;
pub use entity::Method;
pub use entity::MethodBody;
pub use entity::Receiver;
pub use entity::TypeTag;
pub use error::Error;
pub use error::MetadataError;
pub use error::Result;
pub use mapper::RowMapper;
pub use row::Row;
pub use schema::Profile;
// Re-export the derive macro
pub use tursodao_macros::Entity;
pub use value::AttrType;
pub use value::AttrValue;
pub use value::FromValue;
pub use value::IntoValue;
// Re-export optional types
#[cfg(feature = "with-json")]
pub use value::Json;
pub use value::Value;
pub use value::ValueKind;
