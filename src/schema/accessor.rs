//! Accessor discovery by naming convention
//!
//! For an attribute `name` of kind `K` the getter is `get_name` (or `is_name`
//! when `K` is [`ValueKind::Bool`]), taking `&self` and returning `K`. The
//! setter is `set_name`, taking `&mut self` and one `K`, returning `()`.
//! Name, receiver, parameter list and result type must all match.

use crate::entity::AttrDescriptor;
use crate::entity::EntityDescriptor;
use crate::entity::Method;
use crate::entity::MethodBody;
use crate::entity::Receiver;
use crate::entity::TypeTag;
use crate::error::MetadataError;
use crate::error::Result;
use crate::value::AttrValue;
use crate::value::ValueKind;

pub fn getter_name(attribute: &str, kind: ValueKind) -> String {
    match kind {
        ValueKind::Bool => format!("is_{}", attribute),
        _ => format!("get_{}", attribute),
    }
}

pub fn setter_name(attribute: &str) -> String {
    format!("set_{}", attribute)
}

/// Getter and setter resolved for one attribute
pub struct Accessors<E> {
    pub(crate) get:         fn(&E) -> AttrValue,
    pub(crate) set:         fn(&mut E, AttrValue) -> Result<()>,
    /// Parameter kind of the setter, drives row extraction
    pub(crate) setter_kind: ValueKind,
}

impl<E> Clone for Accessors<E> {
    fn clone(&self) -> Self {
        Self { get: self.get, set: self.set, setter_kind: self.setter_kind }
    }
}

fn is_getter<E>(method: &Method<E>, name: &str, kind: ValueKind) -> Option<fn(&E) -> AttrValue> {
    let shape_matches = method.name == name
        && method.receiver == Receiver::Ref
        && method.params.is_empty()
        && method.returns == TypeTag::Value(kind);

    match (&method.body, shape_matches) {
        (MethodBody::Getter(f), true) => Some(*f),
        _ => None,
    }
}

fn is_setter<E>(method: &Method<E>, name: &str, kind: ValueKind) -> Option<fn(&mut E, AttrValue) -> Result<()>> {
    let shape_matches = method.name == name
        && method.receiver == Receiver::Mut
        && method.params == [TypeTag::Value(kind)]
        && method.returns == TypeTag::Unit;

    match (&method.body, shape_matches) {
        (MethodBody::Setter(f), true) => Some(*f),
        _ => None,
    }
}

/// Finds the getter and setter for `attribute` in the descriptor's method table
pub fn resolve<E>(
    descriptor: &EntityDescriptor<E>,
    attribute: &AttrDescriptor,
) -> std::result::Result<Accessors<E>, MetadataError> {
    let kind = attribute.kind;

    let getter = getter_name(attribute.name, kind);
    let get = descriptor
        .methods
        .iter()
        .find_map(|m| is_getter(m, &getter, kind))
        .ok_or_else(|| MetadataError::AccessorNotFound {
            entity:    descriptor.type_name,
            attribute: attribute.name.to_string(),
            accessor:  getter,
        })?;

    // Setter parameter must have the getter's result kind
    let setter = setter_name(attribute.name);
    let set = descriptor
        .methods
        .iter()
        .find_map(|m| is_setter(m, &setter, kind))
        .ok_or_else(|| MetadataError::AccessorNotFound {
            entity:    descriptor.type_name,
            attribute: attribute.name.to_string(),
            accessor:  setter,
        })?;

    Ok(Accessors { get, set, setter_kind: kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AttrType;

    #[derive(Default)]
    struct Account {
        balance: i64,
        active:  bool,
    }

    fn get_balance(e: &Account) -> AttrValue {
        e.balance.into_attr()
    }

    fn set_balance(e: &mut Account, v: AttrValue) -> Result<()> {
        e.balance = i64::from_attr(v)?;
        Ok(())
    }

    fn balance() -> AttrDescriptor {
        AttrDescriptor::new("balance", ValueKind::BigInt)
    }

    #[test]
    fn test_accessor_names() {
        assert_eq!(getter_name("balance", ValueKind::BigInt), "get_balance");
        assert_eq!(getter_name("active", ValueKind::Bool), "is_active");
        assert_eq!(setter_name("active"), "set_active");
    }

    #[test]
    fn test_resolve_both_accessors() {
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .getter("get_balance", ValueKind::BigInt, get_balance)
            .setter("set_balance", ValueKind::BigInt, set_balance);

        let accessors = resolve(&descriptor, &balance()).unwrap();
        let mut account = Account::default();
        (accessors.set)(&mut account, AttrValue::BigInt(42)).unwrap();
        assert_eq!((accessors.get)(&account), AttrValue::BigInt(42));
        assert_eq!(accessors.setter_kind, ValueKind::BigInt);
    }

    #[test]
    fn test_bool_getter_uses_is_prefix() {
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .getter("get_active", ValueKind::Bool, |e| e.active.into_attr())
            .setter("set_active", ValueKind::Bool, |e, v| {
                e.active = bool::from_attr(v)?;
                Ok(())
            });

        let err = resolve(&descriptor, &AttrDescriptor::new("active", ValueKind::Bool)).err().unwrap();
        assert_eq!(err, MetadataError::AccessorNotFound {
            entity:    "Account",
            attribute: "active".to_string(),
            accessor:  "is_active".to_string(),
        });
    }

    #[test]
    fn test_missing_setter() {
        let descriptor = EntityDescriptor::<Account>::new("Account").getter("get_balance", ValueKind::BigInt, get_balance);

        let err = resolve(&descriptor, &balance()).err().unwrap();
        assert!(matches!(err, MetadataError::AccessorNotFound { accessor, .. } if accessor == "set_balance"));
    }

    #[test]
    fn test_getter_with_wrong_result_kind_is_ignored() {
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .getter("get_balance", ValueKind::Int, get_balance)
            .setter("set_balance", ValueKind::BigInt, set_balance);

        assert!(resolve(&descriptor, &balance()).is_err());
    }

    #[test]
    fn test_setter_with_mismatched_parameter_is_ignored() {
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .getter("get_balance", ValueKind::BigInt, get_balance)
            .setter("set_balance", ValueKind::Text, set_balance);

        let err = resolve(&descriptor, &balance()).err().unwrap();
        assert!(matches!(err, MetadataError::AccessorNotFound { accessor, .. } if accessor == "set_balance"));
    }

    #[test]
    fn test_getter_with_parameters_is_ignored() {
        let mut getter = Method::getter("get_balance", ValueKind::BigInt, get_balance);
        getter.params.push(TypeTag::Value(ValueKind::Int));
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .method(getter)
            .setter("set_balance", ValueKind::BigInt, set_balance);

        assert!(resolve(&descriptor, &balance()).is_err());
    }

    #[test]
    fn test_static_getter_is_ignored() {
        let mut getter = Method::getter("get_balance", ValueKind::BigInt, get_balance);
        getter.receiver = Receiver::Static;
        let descriptor = EntityDescriptor::<Account>::new("Account")
            .method(getter)
            .setter("set_balance", ValueKind::BigInt, set_balance);

        assert!(resolve(&descriptor, &balance()).is_err());
    }
}
