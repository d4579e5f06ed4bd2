//! Prelude module for tursodao
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use tursodao::prelude::*;
//! ```

// Re-export the derive macro
pub use turso::EncryptionOpts;
pub use tursodao_macros::Entity;

pub use crate::connection::Builder;
pub use crate::connection::Connection;
pub use crate::connection::ConnectionProvider;
pub use crate::connection::Database;
pub use crate::dao::Cursor;
pub use crate::dao::Dao;
pub use crate::dao::JoinDao;
pub use crate::dao::JoinRecord;
pub use crate::entity::AttrDescriptor;
pub use crate::entity::Entity;
pub use crate::entity::EntityDescriptor;
pub use crate::error::Error;
pub use crate::error::MetadataError;
pub use crate::error::Result;
pub use crate::row::Row;
pub use crate::value::AttrType;
pub use crate::value::AttrValue;
pub use crate::value::FromValue;
pub use crate::value::IntoValue;
// Re-export optional types
#[cfg(feature = "with-json")]
pub use crate::value::Json;
pub use crate::value::Value;
pub use crate::value::ValueKind;
