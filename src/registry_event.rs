/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`ServiceRegistry::set_trace_callback`](crate::ServiceRegistry::set_trace_callback).
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use service_registry::RegistryEvent;
///
/// let event = RegistryEvent::Register { type_name: "i32", ranking: 0 };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A service was registered.
    Register {
        /// The capability type name (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
        /// Ranking resolved from the service's properties
        ranking: i32,
    },

    /// A service was unregistered.
    Unregister {
        type_name: &'static str,
        /// False when the service had already been removed
        removed: bool,
    },

    /// References were looked up for a capability type.
    Lookup {
        type_name: &'static str,
        /// Number of filters applied
        filters: usize,
        /// Number of references returned before any single-result truncation
        found: usize,
    },

    /// A reference was dereferenced to its service.
    GetService {
        type_name: &'static str,
        /// Whether the reference was still live
        found: bool,
    },

    /// A capability type existence check was performed.
    Contains {
        type_name: &'static str,
        found: bool,
    },

    /// Every service was removed from the registry.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { type_name, ranking } => {
                write!(f, "register {{ type_name: {type_name}, ranking: {ranking} }}")
            }
            RegistryEvent::Unregister { type_name, removed } => {
                write!(f, "unregister {{ type_name: {type_name}, removed: {removed} }}")
            }
            RegistryEvent::Lookup {
                type_name,
                filters,
                found,
            } => write!(
                f,
                "lookup {{ type_name: {type_name}, filters: {filters}, found: {found} }}"
            ),
            RegistryEvent::GetService { type_name, found } => {
                write!(f, "get_service {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
