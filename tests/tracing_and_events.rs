//! Integration tests for tracing and event monitoring.
//!
//! The trace callback observes registry operations, which is useful for debugging
//! and logging.

use service_registry::{RegistryEvent, ServiceRegistration, ServiceRegistry};
use std::sync::{Arc, Mutex};

fn recording(registry: &ServiceRegistry) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });
    events
}

#[test]
fn test_basic_tracing() {
    let registry = ServiceRegistry::new();
    let events = recording(&registry);

    let registration = registry.register(42i32);
    let _ = registry.get_service(&registration);
    let _ = registry.contains::<i32>();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert!(captured[0].contains("register"));
    assert!(captured[1].contains("get_service"));
    assert!(captured[2].contains("contains"));
}

#[test]
fn test_trace_register_event() {
    let registry = ServiceRegistry::new();
    let events = recording(&registry);

    registry
        .register_service(999u32, ["service.ranking=12"])
        .unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(*captured, ["register { type_name: u32, ranking: 12 }"]);
}

#[test]
fn test_trace_lookup_counts_hits() {
    let registry = ServiceRegistry::new();
    registry.register_service(1u8, ["a=b"]).unwrap();
    registry.register_service(2u8, ["a=c"]).unwrap();
    let events = recording(&registry);

    let _ = registry.get_service_references::<u8>();
    let _ = registry.get_service_reference_filtered::<u8, _, _>(["a=b"]);
    let _ = registry.get_service_reference::<u16>();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        [
            "lookup { type_name: u8, filters: 0, found: 2 }",
            "lookup { type_name: u8, filters: 1, found: 1 }",
            "lookup { type_name: u16, filters: 0, found: 0 }",
        ]
    );
}

#[test]
fn test_invalid_filter_emits_no_lookup() {
    let registry = ServiceRegistry::new();
    let events = recording(&registry);

    let result = registry.get_service_references_filtered::<u8, _, _>(["nope"]);

    assert!(result.is_err());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_trace_get_service_found_and_not_found() {
    let registry = ServiceRegistry::new();
    let events = recording(&registry);

    let registration = registry.register(123i64);
    let _ = registry.get_service(&registration);
    registration.unregister();
    let _ = registry.get_service(&registration);

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 4);
    assert_eq!(captured[1], "get_service { type_name: i64, found: true }");
    assert_eq!(captured[2], "unregister { type_name: i64, removed: true }");
    assert_eq!(captured[3], "get_service { type_name: i64, found: false }");
}

#[test]
fn test_trace_repeated_unregister() {
    let registry = ServiceRegistry::new();
    let registration = registry.register(1u8);
    let events = recording(&registry);

    registration.unregister();
    registration.unregister();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        [
            "unregister { type_name: u8, removed: true }",
            "unregister { type_name: u8, removed: false }",
        ]
    );
}

#[test]
fn test_trace_clear_event() {
    let registry = ServiceRegistry::new();
    registry.register(1u8);
    let events = recording(&registry);

    registry.clear();

    assert_eq!(*events.lock().unwrap(), ["Clearing the Registry"]);
    assert!(!registry.contains::<u8>());
}

#[test]
fn test_clear_trace_callback() {
    let registry = ServiceRegistry::new();
    let events = recording(&registry);

    registry.register(1u8);
    registry.clear_trace_callback();

    registry.register(2u8);
    let _ = registry.get_service_reference::<u8>();

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_trace_callback_with_custom_logic() {
    let registry = ServiceRegistry::new();

    let registers = Arc::new(Mutex::new(0));
    let lookups = Arc::new(Mutex::new(0));
    let reg_clone = registers.clone();
    let look_clone = lookups.clone();

    registry.set_trace_callback(move |event| match event {
        RegistryEvent::Register { .. } => *reg_clone.lock().unwrap() += 1,
        RegistryEvent::Lookup { .. } => *look_clone.lock().unwrap() += 1,
        _ => {}
    });

    registry.register(10i16);
    registry.register(20i16);
    let _ = registry.get_service_references::<i16>();
    let _ = registry.get_default_service::<i16>();
    let _ = registry.contains::<i16>();

    assert_eq!(*registers.lock().unwrap(), 2);
    assert_eq!(*lookups.lock().unwrap(), 2);
}

#[test]
fn test_trace_callback_replacement() {
    let registry = ServiceRegistry::new();
    let events1 = recording(&registry);
    registry.register(100usize);

    let events2 = recording(&registry);
    registry.register(200usize);

    assert_eq!(events1.lock().unwrap().len(), 1);
    assert_eq!(events2.lock().unwrap().len(), 1);
}

#[test]
fn test_callback_can_use_different_registry() {
    let main_registry = ServiceRegistry::new();
    let log_registry = ServiceRegistry::new();
    let log_handle = log_registry.clone();

    main_registry.set_trace_callback(move |event| {
        log_handle.register(format!("event: {}", event));
    });

    main_registry.register(42i32);
    let _ = main_registry.get_default_service::<i32>();

    let logged: Vec<String> = log_registry
        .get_service_references::<String>()
        .iter()
        .filter_map(|reference| log_registry.get_service(reference))
        .map(|line| (*line).clone())
        .collect();

    assert_eq!(
        logged,
        [
            "event: register { type_name: i32, ranking: 0 }",
            "event: lookup { type_name: i32, filters: 0, found: 1 }",
            "event: get_service { type_name: i32, found: true }",
        ]
    );
}

#[test]
fn test_registry_logs_through_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let registry = ServiceRegistry::builder().warn_threshold(1).build();
        registry.register(1u8);
        registry.register(2u8);
        let _ = registry.get_service_references_filtered::<u8, _, _>(["bad"]);
        assert_eq!(registry.get_service_references::<u8>().len(), 2);
    });
}
