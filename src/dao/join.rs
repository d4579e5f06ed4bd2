use crate::connection::ConnectionProvider;
use crate::dao::Cursor;
use crate::dao::Dao;
use crate::entity::AttrDescriptor;
use crate::entity::EntityDescriptor;
use crate::error::Result;
use crate::value::AttrType;

/// One row of a join table: identifier, join side, inverse side
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinRecord<Id, J, I> {
    pub id:      Id,
    pub join:    J,
    pub inverse: I,
}

impl<Id, J, I> JoinRecord<Id, J, I> {
    pub fn new(id: Id, join: J, inverse: I) -> Self {
        Self { id, join, inverse }
    }
}

/// DAO over a three-column join table whose names are chosen at run time
///
/// ```ignore
/// let members = JoinDao::<i64, i64, i64, _>::new(db, "group_members", "id", "group_id", "user_id")?;
/// members.create_table_with("CREATE TABLE %s (id INTEGER PRIMARY KEY, group_id INTEGER, user_id INTEGER)").await?;
/// members.insert(1, 10, 100).await?;
/// let users = members.inverse_ids(10).await?;
/// ```
pub struct JoinDao<Id, J, I, P> {
    dao:            Dao<JoinRecord<Id, J, I>, P>,
    join_column:    String,
    inverse_column: String,
}

impl<Id, J, I, P> JoinDao<Id, J, I, P>
where
    Id: AttrType + Clone + Default + Send + Sync + 'static,
    J: AttrType + Clone + Default + Send + Sync + 'static,
    I: AttrType + Clone + Default + Send + Sync + 'static,
    P: ConnectionProvider,
{
    pub fn new(provider: P, table_name: &str, id_column: &str, join_column: &str, inverse_column: &str) -> Result<Self> {
        let descriptor = EntityDescriptor::<JoinRecord<Id, J, I>>::new("JoinRecord")
            .table_name(table_name)
            .insert_sql(format!("INSERT INTO %s ({}, {}, {}) VALUES (?,?,?)", id_column, join_column, inverse_column))
            .update_sql(format!("UPDATE %s SET {}=?, {}=?", join_column, inverse_column))
            .attribute(AttrDescriptor::new("id", Id::KIND).id().column_name(id_column))
            .attribute(AttrDescriptor::new("join", J::KIND).column_name(join_column))
            .attribute(AttrDescriptor::new("inverse", I::KIND).column_name(inverse_column))
            .accessors("id", Id::KIND, |r| r.id.clone().into_attr(), |r, v| {
                r.id = Id::from_attr(v)?;
                Ok(())
            })
            .accessors("join", J::KIND, |r| r.join.clone().into_attr(), |r, v| {
                r.join = J::from_attr(v)?;
                Ok(())
            })
            .accessors("inverse", I::KIND, |r| r.inverse.clone().into_attr(), |r, v| {
                r.inverse = I::from_attr(v)?;
                Ok(())
            })
            .constructor(JoinRecord::default);

        Ok(Self {
            dao:            Dao::from_descriptor(provider, &descriptor)?,
            join_column:    join_column.to_string(),
            inverse_column: inverse_column.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        self.dao.table_name()
    }

    pub async fn insert(&self, id: Id, join: J, inverse: I) -> Result<u64> {
        self.dao.insert(&JoinRecord::new(id, join, inverse)).await
    }

    pub async fn get_by_id(&self, id: Id) -> Result<Option<JoinRecord<Id, J, I>>> {
        self.dao.get_by_id(id.into_attr()).await
    }

    pub async fn get_all(&self) -> Result<Cursor<JoinRecord<Id, J, I>, P::Connection>> {
        self.dao.get_all().await
    }

    pub async fn update(&self, record: &JoinRecord<Id, J, I>) -> Result<u64> {
        self.dao.update(record).await
    }

    pub async fn delete(&self, id: Id) -> Result<u64> {
        self.dao.delete(id.into_attr()).await
    }

    /// Inverse-side values paired with `join`
    pub async fn inverse_ids(&self, join: J) -> Result<Vec<I>> {
        let records = self.dao.find(&format!("{}=?", self.join_column), vec![join.into_attr()]).await?;
        Ok(records.into_iter().map(|r| r.inverse).collect())
    }

    /// Join-side values paired with `inverse`
    pub async fn join_ids(&self, inverse: I) -> Result<Vec<J>> {
        let records = self.dao.find(&format!("{}=?", self.inverse_column), vec![inverse.into_attr()]).await?;
        Ok(records.into_iter().map(|r| r.join).collect())
    }

    pub async fn create_table_with(&self, ddl: &str) -> Result<()> {
        self.dao.create_table_with(ddl).await
    }

    pub async fn drop_table(&self) -> Result<()> {
        self.dao.drop_table().await
    }
}
