use async_trait::async_trait;

use super::ConnectionProvider;
use super::opts::DatabaseOpts;
use super::session::TursoConnection;
use crate::error::Result;

/// Turso database handing out one fresh connection per acquire
#[derive(Clone)]
pub struct Database {
    db:   turso::Database,
    opts: DatabaseOpts,
}

impl Database {
    pub(super) fn new(db: turso::Database, opts: DatabaseOpts) -> Self {
        Self { db, opts }
    }

    pub fn path(&self) -> &str {
        self.opts.path.as_str()
    }

    pub fn is_mvcc_enabled(&self) -> bool {
        self.opts.enable_mvcc
    }

    pub fn is_encryption_enabled(&self) -> bool {
        self.opts.enable_encryption
    }

    pub fn connect(&self) -> Result<TursoConnection> {
        let conn = self.db.connect()?;
        if let Some(timeout) = self.opts.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        Ok(TursoConnection::new(conn))
    }
}

#[async_trait]
impl ConnectionProvider for Database {
    type Connection = TursoConnection;

    async fn acquire(&self) -> Result<TursoConnection> {
        let conn = self.connect()?;
        tracing::trace!("Acquired connection to {}", self.opts.path);
        Ok(conn)
    }
}
