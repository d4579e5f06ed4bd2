use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

use super::Connection;
use super::Rows;
use super::Statement;
use crate::binder::Bind;
use crate::binder::ParamBuffer;
use crate::error::Result;
use crate::row::Row;
use crate::sql;
use crate::value::Value;
use crate::value::ValueKind;

#[derive(Debug, Clone)]
pub struct TursoConnection {
    inner: turso::Connection,
}

impl TursoConnection {
    pub(super) fn new(inner: turso::Connection) -> Self {
        Self { inner }
    }

    /// Runs statements that take no parameters, e.g. schema scripts
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        Ok(self.inner.execute_batch(sql).await?)
    }

    pub fn is_autocommit(&self) -> Result<bool> {
        Ok(self.inner.is_autocommit()?)
    }
}

#[async_trait]
impl Connection for TursoConnection {
    type Statement = TursoStatement;

    async fn prepare(&self, sql: &str) -> Result<TursoStatement> {
        tracing::trace!("SQL: {}", sql);
        let inner = self.inner.prepare(sql).await?;
        Ok(TursoStatement { inner, params: ParamBuffer::new(sql::placeholder_count(sql)) })
    }

    fn last_insert_id(&self) -> i64 {
        self.inner.last_insert_rowid()
    }

    async fn close(self) -> Result<()> {
        // turso releases the connection on drop
        drop(self.inner);
        Ok(())
    }
}

/// Prepared turso statement collecting its parameters until execution
pub struct TursoStatement {
    inner:  turso::Statement,
    params: ParamBuffer,
}

impl TursoStatement {
    fn take_params(&mut self) -> Vec<Value> {
        let count = self.params.parameter_count();
        std::mem::replace(&mut self.params, ParamBuffer::new(count)).into_values()
    }
}

impl Bind for TursoStatement {
    fn parameter_count(&self) -> usize {
        self.params.parameter_count()
    }

    fn bind_null(&mut self, index: usize, kind: ValueKind) -> Result<()> {
        self.params.bind_null(index, kind)
    }

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()> {
        self.params.bind_i64(index, value)
    }

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.params.bind_bool(index, value)
    }

    fn bind_date(&mut self, index: usize, value: NaiveDate) -> Result<()> {
        self.params.bind_date(index, value)
    }

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.params.bind_i32(index, value)
    }

    fn bind_timestamp(&mut self, index: usize, value: NaiveDateTime) -> Result<()> {
        self.params.bind_timestamp(index, value)
    }

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.params.bind_f32(index, value)
    }

    fn bind_bytes(&mut self, index: usize, value: Vec<u8>) -> Result<()> {
        self.params.bind_bytes(index, value)
    }

    fn bind_generic(&mut self, index: usize, value: Value) -> Result<()> {
        self.params.bind_generic(index, value)
    }
}

#[async_trait]
impl Statement for TursoStatement {
    type Rows = TursoRows;

    async fn execute_query(&mut self) -> Result<TursoRows> {
        let params = self.take_params();
        tracing::trace!("Params: {:?}", params);

        let columns: Arc<[String]> = self.inner.columns().iter().map(|c| c.name().to_string()).collect::<Vec<_>>().into();
        let rows = self.inner.query(params).await?;
        Ok(TursoRows { rows, columns })
    }

    async fn execute_update(&mut self) -> Result<u64> {
        let params = self.take_params();
        tracing::trace!("Params: {:?}", params);

        Ok(self.inner.execute(params).await?)
    }
}

pub struct TursoRows {
    rows:    turso::Rows,
    columns: Arc<[String]>,
}

#[async_trait]
impl Rows for TursoRows {
    async fn next(&mut self) -> Result<Option<Row>> {
        let Some(row) = self.rows.next().await? else {
            return Ok(None);
        };

        let values = (0..row.column_count()).map(|idx| row.get_value(idx)).collect::<turso::Result<Vec<_>>>()?;
        tracing::trace!("Row: {:?}", values);

        Ok(Some(Row::new(self.columns.clone(), values)))
    }
}
