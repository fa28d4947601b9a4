//! # Service Registry
//!
//! An in-process service registry: a meeting point where components publish
//! implementations of a capability type, tagged with `name=value` properties, and
//! other components discover the best matching implementation by type and filters.
//!
//! Think of it as a `HashMap<TypeId, Vec<T>>` with properties, ranking and
//! unregistration on top.
//!
//! ## Quick Start
//!
//! ```rust
//! use service_registry::{ServiceRegistry, ServiceReference, ServiceRegistration};
//! use std::sync::Arc;
//!
//! let registry = ServiceRegistry::new();
//!
//! // Publish two implementations of the same capability type
//! registry.register_service("/tmp".to_string(), ["dir=tmp"]).unwrap();
//! let current = registry
//!     .register_service(".".to_string(), ["dir=current", "service.ranking=10"])
//!     .unwrap();
//!
//! // The highest ranked one is the default
//! let path: Arc<String> = registry.get_default_service().unwrap();
//! assert_eq!(&*path, ".");
//!
//! // Narrow the lookup with filters
//! let tmp = registry
//!     .get_service_reference_filtered::<String, _, _>(["dir=tmp"])
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(tmp.property("dir"), Some("tmp"));
//!
//! // Withdraw a service; its references stop resolving
//! current.unregister();
//! assert!(registry.get_service(&current).is_none());
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: a registry can be cloned and shared across threads
//! - **Ranked**: `service.ranking` orders competing implementations, highest first
//! - **Filtered lookups**: every `name=value` filter must match (AND)
//! - **Tracing support**: `tracing` log events plus an optional callback for registry events
//!
//! ## Main Types
//!
//! - [`ServiceRegistry`] - register, unregister, look up and dereference services
//! - [`ServiceEntry`] - handle that is both a [`ServiceReference`] and a [`ServiceRegistration`]
//! - [`Properties`] / [`Filter`] - `name=value` parsing
//! - [`RegistryError`] - the single syntax error kind

mod config;
mod constants;
mod entry;
mod filter;
mod properties;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

// Re-export the main public API
pub use config::{RegistryConfig, ServiceRegistryBuilder};
pub use constants::{DEFAULT_RANKING, SERVICE_RANKING};
pub use entry::ServiceEntry;
pub use filter::Filter;
pub use properties::{Properties, Property};
pub use registry::{ServiceRegistry, TraceCallback};
pub use registry_error::{RegistryError, SyntaxKind};
pub use registry_event::RegistryEvent;
pub use registry_trait::{ServiceReference, ServiceRegistration};
