//! Data access objects
//!
//! A [`Dao`] couples an entity's resolved profile and row mapper with a
//! [`ConnectionProvider`]. Every operation acquires one connection, runs one
//! statement and releases the connection on every path, including failures.
//! Operations whose statement text was never declared fail before a
//! connection is acquired.

mod cursor;
mod join;

use std::sync::Arc;

pub use cursor::Cursor;
pub use join::JoinDao;
pub use join::JoinRecord;

use crate::binder;
use crate::connection;
use crate::connection::Connection;
use crate::connection::ConnectionProvider;
use crate::connection::Rows;
use crate::connection::Statement;
use crate::entity::Entity;
use crate::entity::EntityDescriptor;
use crate::error::Result;
use crate::mapper::RowMapper;
use crate::row::Row;
use crate::schema::Profile;
use crate::schema::Registration;
use crate::schema::registry;
use crate::value::AttrValue;

/// Persistence operations for one entity type
pub struct Dao<E, P> {
    provider: P,
    profile:  Arc<Profile<E>>,
    mapper:   Arc<RowMapper<E>>,
}

impl<E: Entity, P: ConnectionProvider> Dao<E, P> {
    /// DAO over the cached registration of `E`
    ///
    /// Metadata problems are reported here, before any storage access.
    pub fn new(provider: P) -> Result<Self> {
        let registration = registry::lookup::<E>()?;
        Ok(Self::from_registration(provider, &registration))
    }
}

impl<E: Send + Sync + 'static, P: ConnectionProvider> Dao<E, P> {
    /// DAO over a descriptor resolved on the spot, bypassing the registry
    pub fn from_descriptor(provider: P, descriptor: &EntityDescriptor<E>) -> Result<Self> {
        let registration = Registration::build(descriptor)?;
        Ok(Self::from_registration(provider, &registration))
    }

    fn from_registration(provider: P, registration: &Registration<E>) -> Self {
        Self { provider, profile: registration.profile.clone(), mapper: registration.mapper.clone() }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn profile(&self) -> &Profile<E> {
        &self.profile
    }

    /// Rendered table name
    pub fn table_name(&self) -> &str {
        self.profile.table_name()
    }

    /// Replaces the row mapper for this DAO only
    pub fn set_mapper<F>(&mut self, f: F)
    where F: Fn(&Row) -> Result<E> + Send + Sync + 'static {
        self.mapper = Arc::new(RowMapper::custom(self.profile.entity(), f));
    }

    /// Inserts one entity, returning the affected row count
    pub async fn insert(&self, entity: &E) -> Result<u64> {
        let sql = self.profile.statements().insert()?;
        tracing::debug!("Insert {}: {}", self.profile.entity(), sql);
        self.execute(sql, self.profile.insert_values(entity)).await
    }

    /// Inserts one entity, returning the row id generated for it
    pub async fn create(&self, entity: &E) -> Result<i64> {
        let sql = self.profile.statements().insert()?;
        tracing::debug!("Create {}: {}", self.profile.entity(), sql);

        let values = self.profile.insert_values(entity);
        let conn = self.provider.acquire().await?;
        let outcome = match run_update(&conn, sql, values).await {
            Ok(_) => Ok(conn.last_insert_id()),
            Err(e) => Err(e),
        };
        connection::release(conn, outcome).await
    }

    /// Writes every non-identifier attribute, matched on the identifier
    pub async fn update(&self, entity: &E) -> Result<u64> {
        let sql = self.profile.statements().update()?;
        tracing::debug!("Update {}: {}", self.profile.entity(), sql);
        self.execute(sql, self.profile.update_values(entity)).await
    }

    pub async fn get_by_id(&self, id: impl Into<AttrValue>) -> Result<Option<E>> {
        let sql = self.profile.statements().select_by_id();
        let conn = self.provider.acquire().await?;
        let outcome = self.fetch_first(&conn, sql, vec![id.into()]).await;
        connection::release(conn, outcome).await
    }

    /// Every row of the table, mapped lazily
    pub async fn get_all(&self) -> Result<Cursor<E, P::Connection>> {
        self.open_cursor(self.profile.statements().select_all(), Vec::new()).await
    }

    pub async fn delete(&self, id: impl Into<AttrValue>) -> Result<u64> {
        let sql = self.profile.statements().delete_by_id();
        tracing::debug!("Delete {}: {}", self.profile.entity(), sql);
        self.execute(sql, vec![id.into()]).await
    }

    /// Rows matching `where_clause`, with `args` bound to its placeholders
    pub async fn find(&self, where_clause: &str, args: Vec<AttrValue>) -> Result<Vec<E>> {
        let sql = self.profile.statements().select_where(where_clause)?;
        self.query(&sql, args).await
    }

    /// Rows of an arbitrary query, mapped with this DAO's row mapper
    pub async fn query(&self, sql: &str, args: Vec<AttrValue>) -> Result<Vec<E>> {
        self.open_cursor(sql, args).await?.collect().await
    }

    /// Runs the declared table-creation statement
    pub async fn create_table(&self) -> Result<()> {
        let sql = self.profile.statements().create_table()?;
        self.create_table_with(sql).await
    }

    /// Runs caller-supplied table-creation text, `%s` standing for the table name
    pub async fn create_table_with(&self, ddl: &str) -> Result<()> {
        let sql = crate::sql::substitute_table(ddl, self.profile.table_name());
        tracing::debug!("Create table {}: {}", self.profile.entity(), sql);
        self.execute(&sql, Vec::new()).await.map(|_| ())
    }

    pub async fn drop_table(&self) -> Result<()> {
        let sql = self.profile.statements().drop_table();
        tracing::debug!("Drop table {}: {}", self.profile.entity(), sql);
        self.execute(sql, Vec::new()).await.map(|_| ())
    }

    async fn execute(&self, sql: &str, values: Vec<AttrValue>) -> Result<u64> {
        let conn = self.provider.acquire().await?;
        let outcome = run_update(&conn, sql, values).await;
        connection::release(conn, outcome).await
    }

    async fn fetch_first(&self, conn: &P::Connection, sql: &str, values: Vec<AttrValue>) -> Result<Option<E>> {
        let mut statement = conn.prepare(sql).await?;
        binder::bind(&mut statement, values)?;
        let mut rows = statement.execute_query().await?;
        match rows.next().await? {
            Some(row) => self.mapper.map(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn open_cursor(&self, sql: &str, values: Vec<AttrValue>) -> Result<Cursor<E, P::Connection>> {
        let conn = self.provider.acquire().await?;
        match start_query(&conn, sql, values).await {
            Ok((statement, rows)) => Ok(Cursor::new(conn, statement, rows, self.mapper.clone())),
            Err(e) => connection::release(conn, Err(e)).await,
        }
    }
}

async fn run_update<C: Connection>(conn: &C, sql: &str, values: Vec<AttrValue>) -> Result<u64> {
    let mut statement = conn.prepare(sql).await?;
    binder::bind(&mut statement, values)?;
    statement.execute_update().await
}

async fn start_query<C: Connection>(
    conn: &C,
    sql: &str,
    values: Vec<AttrValue>,
) -> Result<(C::Statement, <C::Statement as Statement>::Rows)> {
    let mut statement = conn.prepare(sql).await?;
    binder::bind(&mut statement, values)?;
    let rows = statement.execute_query().await?;
    Ok((statement, rows))
}

impl<E, P> std::fmt::Debug for Dao<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dao").field("profile", &self.profile).field("mapper", &self.mapper).finish()
    }
}
