//! Well-known property names shared by every capability type.

/// Property holding a service's ranking.
///
/// May be passed to [`ServiceRegistry::register_service`](crate::ServiceRegistry::register_service)
/// like any other property, e.g. `"service.ranking=100"`. The value must be a base-10
/// integer (`i32`); anything else is treated as [`DEFAULT_RANKING`].
///
/// Ranking decides the natural order of services registered under the same type:
/// the highest ranked one is returned by
/// [`get_service_reference`](crate::ServiceRegistry::get_service_reference).
/// A service ranked `i32::MAX` is very likely to be the default, one ranked
/// `i32::MIN` very unlikely.
pub const SERVICE_RANKING: &str = "service.ranking";

/// Ranking injected for services registered without [`SERVICE_RANKING`].
pub const DEFAULT_RANKING: i32 = 0;
