use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use crate::properties::Properties;
use crate::registry::Shared;
use crate::registry_trait::{ServiceReference, ServiceRegistration};

/// Internal record binding a service instance to its capability type and properties.
///
/// Whether the entry is live is decided solely by its presence in the owning
/// registry's storage, compared by pointer identity.
pub(crate) struct Entry {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    /// Always an `Arc<T>` for the `T` behind `type_id`.
    service: Box<dyn Any + Send + Sync>,
    pub(crate) properties: Properties,
    pub(crate) ranking: i32,
    owner: Weak<Shared>,
}

impl Entry {
    pub(crate) fn new<T: ?Sized + Send + Sync + 'static>(
        service: Arc<T>,
        properties: Properties,
        owner: Weak<Shared>,
    ) -> Self {
        let ranking = properties.ranking();
        Entry {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            service: Box::new(service),
            properties,
            ranking,
            owner,
        }
    }

    pub(crate) fn service<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.service.downcast_ref::<Arc<T>>().cloned()
    }
}

/// Handle on a registered service of capability type `T`.
///
/// The same handle is both the [`ServiceReference`] clients query and the
/// [`ServiceRegistration`] the publisher unregisters with. Cloning it is cheap and
/// every clone points at the same entry. Two handles are equal when they point at
/// the same registration.
pub struct ServiceEntry<T: ?Sized> {
    pub(crate) entry: Arc<Entry>,
    _type: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> ServiceEntry<T> {
    pub(crate) fn new(entry: Arc<Entry>) -> Self {
        ServiceEntry {
            entry,
            _type: PhantomData,
        }
    }
}

impl<T: ?Sized> ServiceReference for ServiceEntry<T> {
    fn property(&self, name: &str) -> Option<&str> {
        self.entry.properties.get(name)
    }

    fn properties(&self) -> &Properties {
        &self.entry.properties
    }

    fn ranking(&self) -> i32 {
        self.entry.ranking
    }

    fn type_name(&self) -> &'static str {
        self.entry.type_name
    }
}

impl<T: ?Sized> ServiceRegistration for ServiceEntry<T> {
    type Reference = ServiceEntry<T>;

    fn reference(&self) -> ServiceEntry<T> {
        self.clone()
    }

    /// No-op once the owning registry has been dropped.
    fn unregister(&self) -> bool {
        self.entry
            .owner
            .upgrade()
            .is_some_and(|shared| shared.remove(&self.entry))
    }
}

impl<T: ?Sized> Clone for ServiceEntry<T> {
    fn clone(&self) -> Self {
        ServiceEntry::new(Arc::clone(&self.entry))
    }
}

impl<T: ?Sized> PartialEq for ServiceEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }
}

impl<T: ?Sized> Eq for ServiceEntry<T> {}

impl<T: ?Sized> Hash for ServiceEntry<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.entry).hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for ServiceEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_name", &self.entry.type_name)
            .field("ranking", &self.entry.ranking)
            .field("properties", &self.entry.properties)
            .finish()
    }
}

impl<T: ?Sized> fmt::Display for ServiceEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "service {}, properties: {}",
            self.entry.type_name, self.entry.properties
        )
    }
}
