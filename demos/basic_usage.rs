//! Basic usage example for service-registry.
//!
//! Demonstrates:
//! - Publishing several implementations of one capability type
//! - Picking the default by ranking and narrowing lookups with filters
//! - Unregistering and the effect on outstanding references
//! - Watching registry events and `tracing` output
//!
//! Run with: `RUST_LOG=service_registry=debug cargo run --example basic_usage`

use service_registry::{
    RegistryError, ServiceReference, ServiceRegistration, ServiceRegistry, SERVICE_RANKING,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

trait Storage: Send + Sync {
    fn describe(&self) -> String;
}

struct DiskStorage {
    root: String,
}

impl Storage for DiskStorage {
    fn describe(&self) -> String {
        format!("disk at {}", self.root)
    }
}

struct MemoryStorage;

impl Storage for MemoryStorage {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== service-registry: Basic Usage ===\n");

    let registry = ServiceRegistry::builder().warn_threshold(16).build();
    registry.set_trace_callback(|event| println!("   [registry-trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Publish implementations
    // -------------------------------------------------------------------------
    println!("1. Publishing storage implementations...");

    registry.register_service_arc::<dyn Storage, _, _>(
        Arc::new(MemoryStorage),
        ["kind=memory"],
    )?;
    let disk_ranking = format!("{SERVICE_RANKING}=100");
    let disk = registry.register_service_arc::<dyn Storage, _, _>(
        Arc::new(DiskStorage {
            root: "/var/lib/app".to_string(),
        }),
        ["kind=disk", disk_ranking.as_str()],
    )?;

    // -------------------------------------------------------------------------
    // 2. Default service by ranking
    // -------------------------------------------------------------------------
    println!("\n2. Looking up the default storage...");

    if let Some(storage) = registry.get_default_service::<dyn Storage>() {
        println!("   default: {}", storage.describe());
    }

    // -------------------------------------------------------------------------
    // 3. Filtered lookup
    // -------------------------------------------------------------------------
    println!("\n3. Looking up storage with kind=memory...");

    if let Some(reference) = registry.get_service_reference_filtered::<dyn Storage, _, _>(["kind=memory"])? {
        println!("   ranking: {}", reference.ranking());
        if let Some(storage) = registry.get_service(&reference) {
            println!("   found:   {}", storage.describe());
        }
    }

    // -------------------------------------------------------------------------
    // 4. Invalid filters are reported together
    // -------------------------------------------------------------------------
    println!("\n4. Passing malformed filters...");

    if let Err(e) = registry.get_service_references_filtered::<dyn Storage, _, _>(["kind", "=disk"]) {
        println!("   Error (expected): {e}");
    }

    // -------------------------------------------------------------------------
    // 5. Unregister
    // -------------------------------------------------------------------------
    println!("\n5. Unregistering the disk storage...");

    disk.unregister();
    println!("   disk reference resolves: {}", registry.get_service(&disk).is_some());
    println!("   disk properties still readable: {}", disk.properties());

    if let Some(storage) = registry.get_default_service::<dyn Storage>() {
        println!("   new default: {}", storage.describe());
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("{registry:?}");
    Ok(())
}
