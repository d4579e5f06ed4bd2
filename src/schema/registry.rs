//! Process-wide cache of resolved entity metadata
//!
//! Resolution runs at most once per entity type on success. Failures are not
//! cached; they are deterministic and are reported again on the next attempt.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::entity::Entity;
use crate::entity::EntityDescriptor;
use crate::error::MetadataError;
use crate::mapper::RowMapper;
use crate::schema::profile::Profile;

type Cache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static REGISTRY: Lazy<Cache> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Profile and row mapper of one entity type
pub struct Registration<E> {
    pub(crate) profile: Arc<Profile<E>>,
    pub(crate) mapper:  Arc<RowMapper<E>>,
}

impl<E: Send + Sync + 'static> Registration<E> {
    /// Resolves a descriptor without touching the cache
    pub fn build(descriptor: &EntityDescriptor<E>) -> std::result::Result<Self, MetadataError> {
        let profile = Profile::resolve(descriptor)?;
        let mapper = RowMapper::build(descriptor, &profile)?;
        Ok(Self { profile: Arc::new(profile), mapper: Arc::new(mapper) })
    }

    pub fn profile(&self) -> &Arc<Profile<E>> {
        &self.profile
    }

    pub fn mapper(&self) -> &Arc<RowMapper<E>> {
        &self.mapper
    }
}

fn cached<E: Entity>() -> Option<Arc<Registration<E>>> {
    let cache = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    cache.get(&TypeId::of::<E>()).cloned().and_then(|entry| entry.downcast::<Registration<E>>().ok())
}

/// Registration for `E`, resolved on first use
pub fn lookup<E: Entity>() -> std::result::Result<Arc<Registration<E>>, MetadataError> {
    if let Some(registration) = cached::<E>() {
        return Ok(registration);
    }

    let registration = Arc::new(Registration::build(&E::descriptor())?);

    let mut cache = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    // A concurrent first use may have won; keep its entry
    let entry = cache.entry(TypeId::of::<E>()).or_insert_with(|| registration.clone() as Arc<dyn Any + Send + Sync>);
    Ok(entry.clone().downcast::<Registration<E>>().unwrap_or(registration))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::entity::AttrDescriptor;
    use crate::value::AttrType;
    use crate::value::ValueKind;

    static RESOLUTIONS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counted {
        id: i64,
    }

    impl Entity for Counted {
        fn descriptor() -> EntityDescriptor<Self> {
            RESOLUTIONS.fetch_add(1, Ordering::SeqCst);
            EntityDescriptor::<Self>::new("Counted")
                .attribute(AttrDescriptor::new("id", ValueKind::BigInt).id())
                .accessors(
                    "id",
                    ValueKind::BigInt,
                    |e| e.id.into_attr(),
                    |e, v| {
                        e.id = i64::from_attr(v)?;
                        Ok(())
                    },
                )
                .constructor(Counted::default)
        }
    }

    struct Broken;

    impl Entity for Broken {
        fn descriptor() -> EntityDescriptor<Self> {
            EntityDescriptor::new("Broken")
        }
    }

    #[test]
    fn test_resolved_once_and_shared() {
        let first = lookup::<Counted>().unwrap();
        let second = lookup::<Counted>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(first.profile(), second.profile()));
        assert_eq!(RESOLUTIONS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failures_are_reported_each_time() {
        let expected = MetadataError::MissingIdentifier { entity: "Broken" };
        assert_eq!(lookup::<Broken>().err(), Some(expected.clone()));
        assert_eq!(lookup::<Broken>().err(), Some(expected));
    }
}
