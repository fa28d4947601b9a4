//! Capability traits for registered services.
//!
//! A registered service is handed out as a single handle that plays two roles:
//!
//! - [`ServiceReference`]: the read view clients hold to inspect properties and
//!   dereference through [`ServiceRegistry::get_service`](crate::ServiceRegistry::get_service).
//! - [`ServiceRegistration`]: the write view the publisher keeps to withdraw the service.
//!
//! Both are implemented by [`ServiceEntry`](crate::ServiceEntry). A reference stays
//! inspectable after unregistration, but the registry no longer acknowledges it.

use crate::properties::Properties;

/// Indirect, non-owning pointer to a registered service.
pub trait ServiceReference {
    /// Value of the named property, or `None` if the service doesn't have it.
    fn property(&self, name: &str) -> Option<&str>;

    /// The full property snapshot taken at registration.
    fn properties(&self) -> &Properties;

    /// Ranking resolved from [`SERVICE_RANKING`](crate::SERVICE_RANKING).
    fn ranking(&self) -> i32 {
        self.properties().ranking()
    }

    /// Name of the capability type the service is registered under.
    fn type_name(&self) -> &'static str;
}

/// A publisher's handle on the service it registered.
///
/// Private to the publisher; it should not be shared with clients.
pub trait ServiceRegistration {
    type Reference: ServiceReference;

    /// Indirect reference to the service.
    fn reference(&self) -> Self::Reference;

    /// Removes the service from the registry.
    ///
    /// Once this returns, the registry no longer hands out or resolves references
    /// to the service. Clients still holding the service instance from earlier
    /// lookups should stop using it. Calling it again is a no-op.
    ///
    /// Returns `true` if this call removed the service.
    fn unregister(&self) -> bool;
}
