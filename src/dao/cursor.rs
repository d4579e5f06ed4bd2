use std::sync::Arc;

use crate::connection::Connection;
use crate::connection::Rows;
use crate::connection::Statement;
use crate::error::Result;
use crate::mapper::RowMapper;

type RowsOf<C> = <<C as Connection>::Statement as Statement>::Rows;

/// Lazy sequence of entities backed by an open connection
///
/// The connection is released exactly once: when the rows run out, when a
/// read or mapping fails, or when [`Cursor::close`] is called. After that
/// [`Cursor::next`] keeps returning `Ok(None)`.
pub struct Cursor<E, C: Connection> {
    conn:      Option<C>,
    statement: Option<C::Statement>,
    rows:      Option<RowsOf<C>>,
    mapper:    Arc<RowMapper<E>>,
    fetched:   usize,
}

impl<E, C: Connection> Cursor<E, C> {
    pub(crate) fn new(conn: C, statement: C::Statement, rows: RowsOf<C>, mapper: Arc<RowMapper<E>>) -> Self {
        Self { conn: Some(conn), statement: Some(statement), rows: Some(rows), mapper, fetched: 0 }
    }

    pub async fn next(&mut self) -> Result<Option<E>> {
        let Some(rows) = self.rows.as_mut() else {
            return Ok(None);
        };

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => {
                tracing::trace!("Cursor exhausted after {} rows", self.fetched);
                self.finish().await?;
                return Ok(None);
            }
            Err(e) => return self.abort(e).await,
        };

        match self.mapper.map(&row) {
            Ok(entity) => {
                self.fetched += 1;
                Ok(Some(entity))
            }
            Err(e) => self.abort(e).await,
        }
    }

    /// Drains the remaining rows
    pub async fn collect(mut self) -> Result<Vec<E>> {
        let mut entities = Vec::new();
        while let Some(entity) = self.next().await? {
            entities.push(entity);
        }
        Ok(entities)
    }

    /// Abandons the remaining rows and releases the connection
    pub async fn close(mut self) -> Result<()> {
        self.finish().await
    }

    /// Whether the connection has been released
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Entities produced so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    async fn finish(&mut self) -> Result<()> {
        self.rows = None;
        self.statement = None;
        match self.conn.take() {
            Some(conn) => conn.close().await,
            None => Ok(()),
        }
    }

    async fn abort<T>(&mut self, error: crate::Error) -> Result<T> {
        if let Err(close_err) = self.finish().await {
            tracing::warn!("Failed to release connection after error: {}", close_err);
        }
        Err(error)
    }
}

impl<E, C: Connection> Drop for Cursor<E, C> {
    fn drop(&mut self) {
        if self.conn.is_some() {
            tracing::debug!("Cursor dropped while open; connection dropped without close");
        }
    }
}
