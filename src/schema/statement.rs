//! Statement synthesis
//!
//! Read, delete and drop statements are generated from the rendered names.
//! Insert, update and create-table text comes from the entity's declaration,
//! with `%s` replaced by the table name; a missing declaration surfaces as
//! [`Error::Statement`] only when the operation is invoked.

use crate::entity::EntityDescriptor;
use crate::error::Error;
use crate::error::MetadataError;
use crate::error::Result;
use crate::sql;

/// The fixed statement set of one entity type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statements {
    entity:       &'static str,
    table_name:   String,
    select_by_id: String,
    delete_by_id: String,
    drop_table:   String,
    select_all:   String,
    insert:       String,
    update:       String,
    create_table: String,
}

impl Statements {
    pub(crate) fn synthesize<E>(
        entity: &'static str,
        table_name: &str,
        id_column: &str,
        rendered_id_column: &str,
        descriptor: &EntityDescriptor<E>,
    ) -> std::result::Result<Self, MetadataError> {
        let declared = |text: &Option<String>| text.as_deref().map(|t| sql::substitute_table(t, table_name));

        let insert = declared(&descriptor.insert_sql).unwrap_or_default();

        let create_table = match declared(&descriptor.create_table_sql) {
            Some(text) if !text.trim().is_empty() => text,
            _ => declared(&descriptor.table_options).unwrap_or_default(),
        };

        let update = match declared(&descriptor.update_sql) {
            Some(text) if !text.trim().is_empty() => {
                with_id_predicate(entity, &text, id_column, rendered_id_column)?
            }
            _ => String::new(),
        };

        Ok(Self {
            entity,
            table_name: table_name.to_string(),
            select_by_id: format!("SELECT * FROM {} WHERE {}=?", table_name, rendered_id_column),
            delete_by_id: format!("DELETE FROM {} WHERE {}=?", table_name, rendered_id_column),
            drop_table: format!("DROP TABLE IF EXISTS {}", table_name),
            select_all: format!("SELECT * FROM {}", table_name),
            insert,
            update,
            create_table,
        })
    }

    pub fn select_by_id(&self) -> &str {
        &self.select_by_id
    }

    pub fn delete_by_id(&self) -> &str {
        &self.delete_by_id
    }

    pub fn drop_table(&self) -> &str {
        &self.drop_table
    }

    pub fn select_all(&self) -> &str {
        &self.select_all
    }

    /// `SELECT * FROM <table> WHERE <clause>`
    pub fn select_where(&self, clause: &str) -> Result<String> {
        if clause.trim().is_empty() {
            return Err(Error::Statement {
                entity:    self.entity,
                operation: "find",
                hint:      "pass a non-empty WHERE clause or use get_all",
            });
        }
        Ok(format!("SELECT * FROM {} WHERE {}", self.table_name, clause))
    }

    pub fn insert(&self) -> Result<&str> {
        self.declared(&self.insert, "insert", "declare insert_sql")
    }

    pub fn update(&self) -> Result<&str> {
        self.declared(&self.update, "update", "declare update_sql")
    }

    pub fn create_table(&self) -> Result<&str> {
        self.declared(&self.create_table, "create table", "declare create_table_sql or table_options")
    }

    fn declared<'a>(&self, text: &'a str, operation: &'static str, hint: &'static str) -> Result<&'a str> {
        if text.trim().is_empty() {
            return Err(Error::Statement { entity: self.entity, operation, hint });
        }
        Ok(text)
    }
}

/// Appends ` WHERE <id>=?` unless the statement itself filters; a WHERE
/// nested in a subquery does not count, and an outer filter has to name the
/// identifier column as a whole token
fn with_id_predicate(
    entity: &'static str,
    text: &str,
    id_column: &str,
    rendered_id_column: &str,
) -> std::result::Result<String, MetadataError> {
    let Some(at) = sql::find_top_level_keyword(text, "where") else {
        let base = text.trim_end().trim_end_matches(';').trim_end();
        return Ok(format!("{} WHERE {}=?", base, rendered_id_column));
    };

    let quoted = (rendered_id_column != id_column).then_some(rendered_id_column);
    if !sql::mentions_identifier(&text[at..], id_column, quoted) {
        return Err(MetadataError::UpdatePredicate { entity, id_column: id_column.to_string() });
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item;

    fn synthesize(descriptor: EntityDescriptor<Item>) -> std::result::Result<Statements, MetadataError> {
        Statements::synthesize("Item", "items", "RecID", "RecID", &descriptor)
    }

    #[test]
    fn test_generated_statements() {
        let statements = synthesize(EntityDescriptor::new("Item")).unwrap();
        assert_eq!(statements.select_by_id(), "SELECT * FROM items WHERE RecID=?");
        assert_eq!(statements.delete_by_id(), "DELETE FROM items WHERE RecID=?");
        assert_eq!(statements.drop_table(), "DROP TABLE IF EXISTS items");
        assert_eq!(statements.select_all(), "SELECT * FROM items");
        assert_eq!(statements.select_where("name=?").unwrap(), "SELECT * FROM items WHERE name=?");
    }

    #[test]
    fn test_quoted_names_flow_into_statements() {
        let statements =
            Statements::synthesize("Item", "\"Items\"", "RecID", "\"RecID\"", &EntityDescriptor::<Item>::new("Item"))
                .unwrap();
        assert_eq!(statements.select_by_id(), "SELECT * FROM \"Items\" WHERE \"RecID\"=?");
        assert_eq!(statements.drop_table(), "DROP TABLE IF EXISTS \"Items\"");
    }

    #[test]
    fn test_table_marker_substitution() {
        let statements = synthesize(
            EntityDescriptor::new("Item")
                .insert_sql("INSERT INTO %s (RecID, name) VALUES (?,?)")
                .create_table_sql("CREATE TABLE %s (RecID INTEGER PRIMARY KEY, name TEXT)"),
        )
        .unwrap();
        assert_eq!(statements.insert().unwrap(), "INSERT INTO items (RecID, name) VALUES (?,?)");
        assert_eq!(statements.create_table().unwrap(), "CREATE TABLE items (RecID INTEGER PRIMARY KEY, name TEXT)");
    }

    #[test]
    fn test_text_without_marker_is_verbatim() {
        let statements = synthesize(EntityDescriptor::new("Item").insert_sql("INSERT INTO other (a) VALUES (?)")).unwrap();
        assert_eq!(statements.insert().unwrap(), "INSERT INTO other (a) VALUES (?)");
    }

    #[test]
    fn test_update_gets_identifier_predicate() {
        let statements = synthesize(EntityDescriptor::new("Item").update_sql("UPDATE %s SET name=?")).unwrap();
        assert_eq!(statements.update().unwrap(), "UPDATE items SET name=? WHERE RecID=?");
    }

    #[test]
    fn test_update_with_identifier_predicate_is_kept() {
        let statements =
            synthesize(EntityDescriptor::new("Item").update_sql("UPDATE %s SET name=? WHERE recid=?")).unwrap();
        assert_eq!(statements.update().unwrap(), "UPDATE items SET name=? WHERE recid=?");
    }

    #[test]
    fn test_update_with_foreign_predicate_is_rejected() {
        let err = synthesize(EntityDescriptor::new("Item").update_sql("UPDATE %s SET name=? WHERE name=?")).err();
        assert_eq!(err, Some(MetadataError::UpdatePredicate { entity: "Item", id_column: "RecID".to_string() }));
    }

    #[test]
    fn test_update_predicate_must_name_identifier_as_token() {
        let err = Statements::synthesize(
            "Item",
            "items",
            "id",
            "id",
            &EntityDescriptor::<Item>::new("Item").update_sql("UPDATE %s SET name=? WHERE valid=?"),
        )
        .err();
        assert_eq!(err, Some(MetadataError::UpdatePredicate { entity: "Item", id_column: "id".to_string() }));
    }

    #[test]
    fn test_update_predicate_with_quoted_identifier() {
        let descriptor = EntityDescriptor::<Item>::new("Item").update_sql("UPDATE %s SET name=? WHERE \"RecID\"=?");
        let statements = Statements::synthesize("Item", "\"Items\"", "RecID", "\"RecID\"", &descriptor).unwrap();
        assert_eq!(statements.update().unwrap(), "UPDATE \"Items\" SET name=? WHERE \"RecID\"=?");

        let descriptor = EntityDescriptor::<Item>::new("Item").update_sql("UPDATE %s SET name=? WHERE \"RecIDs\"=?");
        let err = Statements::synthesize("Item", "\"Items\"", "RecID", "\"RecID\"", &descriptor).err();
        assert_eq!(err, Some(MetadataError::UpdatePredicate { entity: "Item", id_column: "RecID".to_string() }));
    }

    #[test]
    fn test_update_with_subquery_still_gets_identifier_predicate() {
        let statements = synthesize(
            EntityDescriptor::new("Item").update_sql("UPDATE %s SET name=(SELECT label FROM labels WHERE labels.item=RecID)"),
        )
        .unwrap();
        assert_eq!(
            statements.update().unwrap(),
            "UPDATE items SET name=(SELECT label FROM labels WHERE labels.item=RecID) WHERE RecID=?"
        );
    }

    #[test]
    fn test_create_table_falls_back_to_table_options() {
        let statements =
            synthesize(EntityDescriptor::new("Item").table_options("CREATE TABLE %s (RecID INTEGER)")).unwrap();
        assert_eq!(statements.create_table().unwrap(), "CREATE TABLE items (RecID INTEGER)");
    }

    #[test]
    fn test_missing_declarations_fail_on_use() {
        let statements = synthesize(EntityDescriptor::new("Item")).unwrap();
        assert!(matches!(statements.insert(), Err(Error::Statement { operation: "insert", .. })));
        assert!(matches!(statements.update(), Err(Error::Statement { operation: "update", .. })));
        assert!(matches!(statements.create_table(), Err(Error::Statement { operation: "create table", .. })));
        assert!(matches!(statements.select_where("  "), Err(Error::Statement { operation: "find", .. })));
    }
}
