//! Persistence profile of an entity type
//!
//! A [`Profile`] is resolved once per entity type from its descriptor and
//! holds everything the DAO needs at run time: rendered table and identifier
//! column names, the ordered storable attributes with their accessors, and
//! the synthesized statement set.

use crate::entity::EntityDescriptor;
use crate::error::MetadataError;
use crate::schema::accessor;
use crate::schema::accessor::Accessors;
use crate::schema::statement::Statements;
use crate::sql;
use crate::value::AttrValue;
use crate::value::ValueKind;

/// A storable attribute with its column and accessors
pub struct ProfileAttribute<E> {
    pub(crate) name:      &'static str,
    pub(crate) kind:      ValueKind,
    pub(crate) column:    String,
    pub(crate) rendered:  String,
    pub(crate) id:        bool,
    pub(crate) accessors: Accessors<E>,
}

impl<E> ProfileAttribute<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Column name as declared, used to look the column up in result rows
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Column name as written into SQL, quoted for case-sensitive entities
    pub fn rendered_column(&self) -> &str {
        &self.rendered
    }

    pub fn is_id(&self) -> bool {
        self.id
    }

    pub fn read(&self, entity: &E) -> AttrValue {
        (self.accessors.get)(entity)
    }
}

pub struct Profile<E> {
    entity:         &'static str,
    case_sensitive: bool,
    table_name:     String,
    attributes:     Vec<ProfileAttribute<E>>,
    id_index:       usize,
    statements:     Statements,
}

impl<E> Profile<E> {
    /// Resolves the profile for a descriptor
    ///
    /// Fails when the number of storable identifier attributes is not exactly
    /// one, when an accessor is missing, or when a declared update statement
    /// filters on something other than the identifier.
    pub fn resolve(descriptor: &EntityDescriptor<E>) -> std::result::Result<Self, MetadataError> {
        let entity = descriptor.type_name;
        let case_sensitive = descriptor.case_sensitive;
        let render = |name: &str| if case_sensitive { sql::quote_identifier(name) } else { name.to_string() };

        let raw_table = match descriptor.table_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => entity,
        };
        let table_name = render(raw_table);

        let storable: Vec<_> = descriptor.attributes.iter().filter(|a| a.is_storable()).collect();

        let id_count = storable.iter().filter(|a| a.id).count();
        if id_count == 0 {
            return Err(MetadataError::MissingIdentifier { entity });
        }
        if id_count > 1 {
            return Err(MetadataError::DuplicateIdentifier { entity, count: id_count });
        }

        let mut attributes = Vec::with_capacity(storable.len());
        for attribute in storable {
            let accessors = accessor::resolve(descriptor, attribute)?;
            let column = attribute.column().to_string();
            attributes.push(ProfileAttribute {
                name: attribute.name,
                kind: attribute.kind,
                rendered: render(&column),
                column,
                id: attribute.id,
                accessors,
            });
        }

        let id_index = attributes.iter().position(|a| a.id).ok_or(MetadataError::MissingIdentifier { entity })?;

        let statements = Statements::synthesize(
            entity,
            &table_name,
            &attributes[id_index].column,
            &attributes[id_index].rendered,
            descriptor,
        )?;

        tracing::debug!(
            "Resolved profile for {}: table {}, {} storable attributes",
            entity,
            table_name,
            attributes.len()
        );

        Ok(Self { entity, case_sensitive, table_name, attributes, id_index, statements })
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Rendered table name
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Rendered identifier column name
    pub fn id_column_name(&self) -> &str {
        &self.attributes[self.id_index].rendered
    }

    pub fn id_attribute(&self) -> &ProfileAttribute<E> {
        &self.attributes[self.id_index]
    }

    /// Storable attributes in declaration order
    pub fn attributes(&self) -> &[ProfileAttribute<E>] {
        &self.attributes
    }

    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    /// Values for the insert statement: every storable attribute in order
    pub fn insert_values(&self, entity: &E) -> Vec<AttrValue> {
        self.attributes.iter().map(|a| a.read(entity)).collect()
    }

    /// Values for the update statement: non-identifier attributes in order,
    /// then the identifier
    pub fn update_values(&self, entity: &E) -> Vec<AttrValue> {
        let mut values: Vec<_> = self.attributes.iter().filter(|a| !a.id).map(|a| a.read(entity)).collect();
        values.push(self.id_value(entity));
        values
    }

    pub fn id_value(&self, entity: &E) -> AttrValue {
        self.attributes[self.id_index].read(entity)
    }
}

impl<E> std::fmt::Debug for Profile<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("id_column_name", &self.id_column_name())
            .field("columns", &self.attributes.iter().map(|a| a.column.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AttrDescriptor;
    use crate::value::AttrType;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Item {
        id:      i64,
        name:    String,
        enabled: bool,
        cache:   String,
        created: String,
    }

    fn item() -> EntityDescriptor<Item> {
        EntityDescriptor::<Item>::new("Item")
            .attribute(AttrDescriptor::new("id", ValueKind::BigInt).id().column_name("RecID"))
            .attribute(AttrDescriptor::new("name", ValueKind::Text))
            .attribute(AttrDescriptor::new("enabled", ValueKind::Bool))
            .attribute(AttrDescriptor::new("cache", ValueKind::Text).transient())
            .attribute(AttrDescriptor::new("created", ValueKind::Text).immutable())
            .accessors(
                "id",
                ValueKind::BigInt,
                |e| e.id.into_attr(),
                |e, v| {
                    e.id = i64::from_attr(v)?;
                    Ok(())
                },
            )
            .accessors(
                "name",
                ValueKind::Text,
                |e| e.name.clone().into_attr(),
                |e, v| {
                    e.name = String::from_attr(v)?;
                    Ok(())
                },
            )
            .accessors(
                "enabled",
                ValueKind::Bool,
                |e| e.enabled.into_attr(),
                |e, v| {
                    e.enabled = bool::from_attr(v)?;
                    Ok(())
                },
            )
            .constructor(Item::default)
    }

    fn sample() -> Item {
        Item { id: 3, name: "three".to_string(), enabled: true, cache: "c".to_string(), created: "x".to_string() }
    }

    #[test]
    fn test_defaults() {
        let profile = Profile::resolve(&item()).unwrap();
        assert_eq!(profile.entity(), "Item");
        assert_eq!(profile.table_name(), "Item");
        assert_eq!(profile.id_column_name(), "RecID");
        assert!(!profile.is_case_sensitive());
    }

    #[test]
    fn test_excluded_attributes_need_no_accessors() {
        let profile = Profile::resolve(&item()).unwrap();
        let names: Vec<_> = profile.attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["id", "name", "enabled"]);
    }

    #[test]
    fn test_case_sensitive_names_are_quoted() {
        let profile = Profile::resolve(&item().table_name("Items").case_sensitive(true)).unwrap();
        assert_eq!(profile.table_name(), "\"Items\"");
        assert_eq!(profile.id_column_name(), "\"RecID\"");
        assert_eq!(profile.attributes()[1].rendered_column(), "\"name\"");
        assert_eq!(profile.attributes()[1].column(), "name");
    }

    #[test]
    fn test_empty_table_name_falls_back_to_type_name() {
        let profile = Profile::resolve(&item().table_name("")).unwrap();
        assert_eq!(profile.table_name(), "Item");
    }

    #[test]
    fn test_missing_identifier() {
        let descriptor = EntityDescriptor::<Item>::new("Item").attribute(AttrDescriptor::new("name", ValueKind::Text));
        assert_eq!(Profile::resolve(&descriptor).err(), Some(MetadataError::MissingIdentifier { entity: "Item" }));
    }

    #[test]
    fn test_transient_identifier_does_not_count() {
        let descriptor =
            EntityDescriptor::<Item>::new("Item").attribute(AttrDescriptor::new("id", ValueKind::BigInt).id().transient());
        assert_eq!(Profile::resolve(&descriptor).err(), Some(MetadataError::MissingIdentifier { entity: "Item" }));
    }

    #[test]
    fn test_duplicate_identifier() {
        let descriptor = item().attribute(AttrDescriptor::new("other", ValueKind::BigInt).id());
        assert_eq!(
            Profile::resolve(&descriptor).err(),
            Some(MetadataError::DuplicateIdentifier { entity: "Item", count: 2 })
        );
    }

    #[test]
    fn test_missing_accessor() {
        let descriptor = item().attribute(AttrDescriptor::new("price", ValueKind::Double));
        let err = Profile::resolve(&descriptor).err().unwrap();
        assert!(matches!(err, MetadataError::AccessorNotFound { accessor, .. } if accessor == "get_price"));
    }

    #[test]
    fn test_insert_values_in_declaration_order() {
        let profile = Profile::resolve(&item()).unwrap();
        assert_eq!(profile.insert_values(&sample()), vec![
            AttrValue::BigInt(3),
            AttrValue::Text("three".to_string()),
            AttrValue::Bool(true),
        ]);
    }

    #[test]
    fn test_update_values_put_identifier_last() {
        let profile = Profile::resolve(&item()).unwrap();
        assert_eq!(profile.update_values(&sample()), vec![
            AttrValue::Text("three".to_string()),
            AttrValue::Bool(true),
            AttrValue::BigInt(3),
        ]);
        assert_eq!(profile.id_value(&sample()), AttrValue::BigInt(3));
    }
}
