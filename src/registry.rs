//! The service registry engine.
//!
//! Services are filed under their capability type (`TypeId`), each with an immutable
//! property snapshot and a ranking. Lookups return references ordered by descending
//! ranking, optionally narrowed by `name=value` filters, and a reference only
//! resolves to its service while the registration is still present in storage.
//!
//! # Examples
//!
//! ```
//! use service_registry::{ServiceRegistry, ServiceRegistration};
//! use std::sync::Arc;
//!
//! let registry = ServiceRegistry::new();
//!
//! registry.register_service("default".to_string(), ["service.ranking=10"]).unwrap();
//! let preferred = registry
//!     .register_service("preferred".to_string(), ["service.ranking=1000"])
//!     .unwrap();
//!
//! let best: Arc<String> = registry.get_default_service().unwrap();
//! assert_eq!(&*best, "preferred");
//!
//! preferred.unregister();
//! let best: Arc<String> = registry.get_default_service().unwrap();
//! assert_eq!(&*best, "default");
//! ```

use std::{
    any::TypeId,
    cmp::Reverse,
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, trace, warn};

use crate::config::{RegistryConfig, ServiceRegistryBuilder};
use crate::entry::{Entry, ServiceEntry};
use crate::filter::{match_all, Filter};
use crate::properties::Properties;
use crate::registry_error::RegistryError;
use crate::registry_event::RegistryEvent;

type Storage = HashMap<TypeId, Vec<Arc<Entry>>>;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because the registry can be shared
/// across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// State shared by a registry, its clones, and the weak back-links held by entries.
pub(crate) struct Shared {
    storage: Mutex<Storage>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
    config: RegistryConfig,
}

impl Shared {
    /// Locks storage, recovering from poisoning.
    ///
    /// Every mutation is a single push or retain, so a panic elsewhere never leaves
    /// the map half-updated.
    fn storage(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Invokes the current trace callback, if any, without holding any lock.
    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn is_live(&self, entry: &Arc<Entry>) -> bool {
        self.storage()
            .get(&entry.type_id)
            .is_some_and(|bucket| bucket.iter().any(|e| Arc::ptr_eq(e, entry)))
    }

    /// Removes `entry` from its bucket. Returns false if it was already gone.
    pub(crate) fn remove(&self, entry: &Arc<Entry>) -> bool {
        let removed = {
            let mut storage = self.storage();
            match storage.get_mut(&entry.type_id) {
                Some(bucket) => {
                    let before = bucket.len();
                    bucket.retain(|e| !Arc::ptr_eq(e, entry));
                    let removed = bucket.len() < before;
                    if bucket.is_empty() {
                        storage.remove(&entry.type_id);
                    }
                    removed
                }
                None => false,
            }
        };

        if removed {
            debug!(type_name = entry.type_name, "service unregistered");
        }

        self.emit_event(&RegistryEvent::Unregister {
            type_name: entry.type_name,
            removed,
        });

        removed
    }
}

/// In-process service registry.
///
/// Each call to [`ServiceRegistry::new`] creates a fresh, isolated registry; there is
/// no global instance. Cloning is cheap and the clones share the same services,
/// which is how a host hands the registry to its collaborators.
#[derive(Clone)]
pub struct ServiceRegistry {
    shared: Arc<Shared>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = self.shared.storage();
        f.debug_struct("ServiceRegistry")
            .field("types", &storage.len())
            .field("services", &storage.values().map(Vec::len).sum::<usize>())
            .field("config", &self.shared.config)
            .finish()
    }
}

impl ServiceRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(RegistryConfig::default(), None)
    }

    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::new()
    }

    pub(crate) fn from_parts(config: RegistryConfig, trace: Option<Arc<TraceCallback>>) -> Self {
        ServiceRegistry {
            shared: Arc::new(Shared {
                storage: Mutex::new(HashMap::new()),
                trace: Mutex::new(trace),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.shared.config
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry interaction.
    ///
    /// The callback runs after the registry has released its storage lock, so it may
    /// look services up. It must not set or clear the callback itself.
    ///
    /// # Example
    /// ```rust
    /// use service_registry::ServiceRegistry;
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {:?}", event));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Registers `service` under its own type with no properties besides the default
    /// ranking.
    pub fn register<T: Send + Sync + 'static>(&self, service: T) -> ServiceEntry<T> {
        self.register_arc(Arc::new(service))
    }

    /// Registers an `Arc`-wrapped service with no properties besides the default
    /// ranking.
    ///
    /// `T` may be unsized, so a trait object can be its own capability type:
    ///
    /// ```
    /// use service_registry::ServiceRegistry;
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".into()
    ///     }
    /// }
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register_arc::<dyn Greeter>(Arc::new(English));
    ///
    /// let greeter = registry.get_default_service::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn register_arc<T: ?Sized + Send + Sync + 'static>(&self, service: Arc<T>) -> ServiceEntry<T> {
        self.insert(service, Properties::default())
    }

    /// Registers `service` with `name=value` properties.
    ///
    /// Only the first `=` separates name from value. Properties are copied; later
    /// changes to the caller's strings have no effect. If no
    /// [`SERVICE_RANKING`](crate::SERVICE_RANKING) is given, a ranking of `0` is added.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Syntax`] listing every malformed property. Nothing is
    /// registered in that case.
    pub fn register_service<T, I, S>(
        &self,
        service: T,
        properties: I,
    ) -> Result<ServiceEntry<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register_service_arc(Arc::new(service), properties)
    }

    /// Like [`register_service`](Self::register_service) for an `Arc`-wrapped,
    /// possibly unsized, service.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Syntax`] listing every malformed property.
    pub fn register_service_arc<T, I, S>(
        &self,
        service: Arc<T>,
        properties: I,
    ) -> Result<ServiceEntry<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let properties = Properties::parse(properties).inspect_err(|err| {
            debug!(type_name = std::any::type_name::<T>(), %err, "registration rejected");
        })?;
        Ok(self.insert(service, properties))
    }

    /// Registers `service` with properties given as `(name, value)` pairs, e.g. a
    /// `HashMap<String, String>`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Syntax`] listing every malformed pair as `name=value`.
    pub fn register_service_with<T, I, K, V>(
        &self,
        service: Arc<T>,
        properties: I,
    ) -> Result<ServiceEntry<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let properties = Properties::from_pairs(properties).inspect_err(|err| {
            debug!(type_name = std::any::type_name::<T>(), %err, "registration rejected");
        })?;
        Ok(self.insert(service, properties))
    }

    fn insert<T: ?Sized + Send + Sync + 'static>(
        &self,
        service: Arc<T>,
        properties: Properties,
    ) -> ServiceEntry<T> {
        let entry = Arc::new(Entry::new(service, properties, Arc::downgrade(&self.shared)));

        let count = {
            let mut storage = self.shared.storage();
            let bucket = storage.entry(entry.type_id).or_default();
            bucket.push(Arc::clone(&entry));
            bucket.len()
        };

        debug!(
            type_name = entry.type_name,
            ranking = entry.ranking,
            properties = entry.properties.len(),
            "service registered"
        );

        if let Some(threshold) = self.shared.config.warn_threshold {
            if count > threshold {
                warn!(
                    type_name = entry.type_name,
                    count,
                    threshold,
                    "capability type holds more services than the configured threshold"
                );
            }
        }

        self.shared.emit_event(&RegistryEvent::Register {
            type_name: entry.type_name,
            ranking: entry.ranking,
        });

        ServiceEntry::new(entry)
    }

    /// Removes a registration from this registry.
    ///
    /// Returns `true` if this call removed it; unregistering twice, or a registration
    /// from another registry, is a no-op returning `false`.
    pub fn unregister<T: ?Sized>(&self, registration: &ServiceEntry<T>) -> bool {
        self.shared.remove(&registration.entry)
    }

    /// Removes every service. Outstanding references stop resolving.
    pub fn clear(&self) {
        self.shared.emit_event(&RegistryEvent::Clear {});
        self.shared.storage().clear();
        debug!("registry cleared");
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Highest ranked reference registered under `T`, or `None`.
    pub fn get_service_reference<T: ?Sized + 'static>(&self) -> Option<ServiceEntry<T>> {
        self.lookup::<T>(&[]).into_iter().next()
    }

    /// Every reference registered under `T`, highest ranking first.
    ///
    /// Services with equal ranking keep their registration order.
    pub fn get_service_references<T: ?Sized + 'static>(&self) -> Vec<ServiceEntry<T>> {
        self.lookup::<T>(&[])
    }

    /// Highest ranked reference under `T` whose properties satisfy every filter.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Syntax`] listing every filter not on the form `name=value`,
    /// even when no service of type `T` exists.
    pub fn get_service_reference_filtered<T, I, S>(
        &self,
        filters: I,
    ) -> Result<Option<ServiceEntry<T>>, RegistryError>
    where
        T: ?Sized + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self
            .get_service_references_filtered::<T, I, S>(filters)?
            .into_iter()
            .next())
    }

    /// References under `T` whose properties satisfy every filter, highest ranking
    /// first. An empty filter list matches every service.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Syntax`] listing every filter not on the form `name=value`.
    pub fn get_service_references_filtered<T, I, S>(
        &self,
        filters: I,
    ) -> Result<Vec<ServiceEntry<T>>, RegistryError>
    where
        T: ?Sized + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = Filter::parse_all(filters).inspect_err(|err| {
            debug!(type_name = std::any::type_name::<T>(), %err, "lookup rejected");
        })?;
        Ok(self.lookup::<T>(&filters))
    }

    /// Like [`get_service_references_filtered`](Self::get_service_references_filtered)
    /// with filters parsed up front.
    pub fn get_service_references_matching<T: ?Sized + 'static>(
        &self,
        filters: &[Filter],
    ) -> Vec<ServiceEntry<T>> {
        self.lookup::<T>(filters)
    }

    fn lookup<T: ?Sized + 'static>(&self, filters: &[Filter]) -> Vec<ServiceEntry<T>> {
        let type_name = std::any::type_name::<T>();

        let mut entries = self
            .shared
            .storage()
            .get(&TypeId::of::<T>())
            .cloned()
            .unwrap_or_default();

        entries.retain(|entry| match_all(filters, &entry.properties));
        entries.sort_by_key(|entry| Reverse(entry.ranking));

        trace!(
            type_name,
            filters = filters.len(),
            found = entries.len(),
            "service lookup"
        );

        self.shared.emit_event(&RegistryEvent::Lookup {
            type_name,
            filters: filters.len(),
            found: entries.len(),
        });

        entries.into_iter().map(ServiceEntry::new).collect()
    }

    /// Resolves a reference to its service, or `None` once it has been unregistered
    /// (or if it belongs to a different registry).
    pub fn get_service<T: ?Sized + Send + Sync + 'static>(
        &self,
        reference: &ServiceEntry<T>,
    ) -> Option<Arc<T>> {
        let service = if self.shared.is_live(&reference.entry) {
            reference.entry.service::<T>()
        } else {
            None
        };

        trace!(
            type_name = reference.entry.type_name,
            found = service.is_some(),
            "service dereference"
        );

        self.shared.emit_event(&RegistryEvent::GetService {
            type_name: reference.entry.type_name,
            found: service.is_some(),
        });

        service
    }

    /// The highest ranked service registered under `T`, if any.
    pub fn get_default_service<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get_service_reference::<T>()
            .and_then(|reference| self.get_service(&reference))
    }

    /// Checks whether any service is registered under `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let found = self
            .shared
            .storage()
            .get(&TypeId::of::<T>())
            .is_some_and(|bucket| !bucket.is_empty());

        self.shared.emit_event(&RegistryEvent::Contains {
            type_name: std::any::type_name::<T>(),
            found,
        });

        found
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
