//! Registry configuration and builder.

use std::sync::Arc;

use crate::registry::{ServiceRegistry, TraceCallback};
use crate::registry_event::RegistryEvent;

/// Tunables for a [`ServiceRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Log a warning once a capability type holds more services than this.
    ///
    /// Purely diagnostic: services are never dropped or evicted.
    pub warn_threshold: Option<usize>,
}

/// Builds a [`ServiceRegistry`] with a non-default configuration.
///
/// # Examples
///
/// ```rust
/// use service_registry::ServiceRegistry;
///
/// let registry = ServiceRegistry::builder()
///     .warn_threshold(64)
///     .trace_callback(|event| println!("[registry-trace] {event}"))
///     .build();
///
/// registry.register(42u32);
/// ```
#[derive(Default)]
pub struct ServiceRegistryBuilder {
    config: RegistryConfig,
    trace: Option<Arc<TraceCallback>>,
}

impl ServiceRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn warn_threshold(mut self, threshold: usize) -> Self {
        self.config.warn_threshold = Some(threshold);
        self
    }

    /// Installs a trace callback from the start.
    pub fn trace_callback(
        mut self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> Self {
        self.trace = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry::from_parts(self.config, self.trace)
    }
}
