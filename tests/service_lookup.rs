//! Integration tests for registering, looking up and unregistering services.

use service_registry::{
    RegistryError, ServiceReference, ServiceRegistration, ServiceRegistry, SERVICE_RANKING,
};
use std::path::PathBuf;
use std::sync::Arc;

fn ranking(ranking: i32) -> String {
    format!("{SERVICE_RANKING}={ranking}")
}

#[test]
fn test_same_instance_is_returned() {
    let registry = ServiceRegistry::new();
    let expected = Arc::new("I AM MYSELF".to_string());

    let registration = registry.register_arc(expected.clone());

    let service = registry.get_service(&registration.reference()).unwrap();
    assert!(Arc::ptr_eq(&service, &expected));
}

#[test]
fn test_unregistered_service_is_gone() {
    let registry = ServiceRegistry::new();
    registry.register("I WAS HERE BUT NO MORE".to_string()).unregister();

    assert!(registry.get_default_service::<String>().is_none());
}

#[test]
fn test_nothing_found_for_unknown_type() {
    let registry = ServiceRegistry::new();

    assert!(registry.get_service_reference::<PathBuf>().is_none());
    assert!(registry.get_service_references::<PathBuf>().is_empty());
}

#[test]
fn test_nothing_found_when_no_service_matches_filter() -> Result<(), RegistryError> {
    let registry = ServiceRegistry::new();
    registry.register_service("I AM VALUE".to_string(), ["key=value"])?;

    let reference = registry.get_service_reference_filtered::<String, _, _>(["key=othervalue"])?;
    assert!(reference.is_none());
    Ok(())
}

#[test]
fn test_highest_ranked_service_is_default() -> Result<(), RegistryError> {
    let registry = ServiceRegistry::new();
    let expected = "BY THE POWER OF GREYSKULL, I AM THE DEFAULT!";

    registry.register_service("I AM NO DEFAULT :(".to_string(), [ranking(10)])?;
    registry.register_service(expected.to_string(), [ranking(1000)])?;

    let default: Arc<String> = registry.get_default_service().unwrap();
    assert_eq!(&**default, expected);
    Ok(())
}

#[test]
fn test_ranking_beats_registration_order() -> Result<(), RegistryError> {
    let registry = ServiceRegistry::new();
    registry.register("unranked".to_string());
    registry.register_service("ten".to_string(), [ranking(10)])?;
    registry.register_service("negative".to_string(), [ranking(-1)])?;
    registry.register_service("thousand".to_string(), [ranking(1000)])?;

    let names: Vec<String> = registry
        .get_service_references::<String>()
        .iter()
        .filter_map(|reference| registry.get_service(reference))
        .map(|service| (*service).clone())
        .collect();

    assert_eq!(names, ["thousand", "ten", "unranked", "negative"]);
    Ok(())
}

#[test]
fn test_all_services_of_type_returned() {
    let registry = ServiceRegistry::new();
    registry.register("1".to_string());
    registry.register("2".to_string());

    assert_eq!(registry.get_service_references::<String>().len(), 2);
}

#[test]
fn test_same_service_registered_twice_gives_two_entries() {
    let registry = ServiceRegistry::new();
    let service = Arc::new(7u32);

    let first = registry.register_arc(service.clone());
    let second = registry.register_arc(service.clone());

    assert_ne!(first, second);
    assert_eq!(registry.get_service_references::<u32>().len(), 2);

    first.unregister();
    assert_eq!(registry.get_service_references::<u32>(), vec![second]);
}

#[test]
fn test_unregister_excludes_from_every_lookup() -> Result<(), RegistryError> {
    let registry = ServiceRegistry::new();
    let keep = registry.register_service(1u8, ["role=keep"])?;
    let gone = registry.register_service(2u8, ["role=gone", "service.ranking=5"])?;

    let earlier = registry.get_service_reference::<u8>().unwrap();
    assert_eq!(earlier, gone);

    assert!(registry.unregister(&gone));

    assert_eq!(registry.get_service_reference::<u8>(), Some(keep.clone()));
    assert_eq!(registry.get_service_references::<u8>(), vec![keep]);
    assert!(registry
        .get_service_references_filtered::<u8, _, _>(["role=gone"])?
        .is_empty());
    assert!(registry.get_service(&earlier).is_none());

    // The handle itself still answers property reads
    assert_eq!(earlier.property("role"), Some("gone"));
    Ok(())
}

#[test]
fn test_get_service_tracks_liveness_not_handle() {
    let registry = ServiceRegistry::new();
    let registration = registry.register(3i64);
    let reference = registration.reference();

    assert_eq!(registry.get_service(&reference).as_deref(), Some(&3));
    registration.unregister();
    assert_eq!(registry.get_service(&reference), None);
}

#[test]
fn test_reference_display() -> Result<(), RegistryError> {
    let registry = ServiceRegistry::new();
    let registration = registry.register_service(1u8, ["a=b"])?;

    assert_eq!(
        registration.to_string(),
        "service u8, properties: {a=b, service.ranking=0}"
    );
    Ok(())
}
