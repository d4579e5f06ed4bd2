//! Connection boundary
//!
//! The DAO talks to storage only through these traits. [`Database`] is the
//! turso-backed provider; tests and embedders can supply their own.

pub(crate) mod builder;
pub(crate) mod database;
pub(crate) mod opts;
pub(crate) mod session;

use async_trait::async_trait;

pub use self::builder::Builder;
pub use self::database::Database;
pub use self::session::TursoConnection;
pub use self::session::TursoRows;
pub use self::session::TursoStatement;
use crate::binder::Bind;
use crate::error::Result;
use crate::row::Row;

pub mod prelude {
    pub use super::Builder;
    pub use super::Connection;
    pub use super::ConnectionProvider;
    pub use super::Database;
}

/// Source of connections, one per DAO operation
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Connection: Connection;

    async fn acquire(&self) -> Result<Self::Connection>;
}

/// An open connection
#[async_trait]
pub trait Connection: Send + Sync + Sized {
    type Statement: Statement;

    async fn prepare(&self, sql: &str) -> Result<Self::Statement>;

    /// Row id generated by the most recent insert on this connection
    fn last_insert_id(&self) -> i64;

    async fn close(self) -> Result<()>;
}

/// A prepared statement
#[async_trait]
pub trait Statement: Bind + Send {
    type Rows: Rows;

    async fn execute_query(&mut self) -> Result<Self::Rows>;

    /// Number of affected rows
    async fn execute_update(&mut self) -> Result<u64>;
}

/// Forward-only result rows
#[async_trait]
pub trait Rows: Send {
    async fn next(&mut self) -> Result<Option<Row>>;
}

/// Closes `conn` and passes `outcome` through
///
/// A close failure after a successful operation is returned. After a failed
/// operation the original error wins and the close failure is logged.
pub(crate) async fn release<C: Connection, T>(conn: C, outcome: Result<T>) -> Result<T> {
    let closed = conn.close().await;
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!("Failed to release connection after error: {}", close_err);
            Err(e)
        }
    }
}
