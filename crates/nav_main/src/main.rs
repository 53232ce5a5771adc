//! postview - navigation and prefetch coordinator demo host
//!
//! Wires the navigation core to an in-memory store, a simulated remote
//! source and logging collaborators, then replays a paging session.

mod session;
mod sinks;
mod store;

use anyhow::Result;
use nav_core::{
    input_channel, Collaborators, ItemId, SpawnedDataSource, TokioScheduler, Viewer, ViewerConfig,
    ViewerRuntime,
};
use sinks::{ChannelBus, LogRenderer, LogWarmer};
use std::time::Duration;
use store::{Catalog, MemoryStore, SimulatedFetcher};

/// Posts on the simulated server
const CATALOG_SIZE: u64 = 40;
/// Posts already known from the listing page
const LISTED_UP_TO: u64 = 20;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match ViewerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring configuration: {}", e.user_message());
            ViewerConfig::default()
        }
    };

    let _log_guard = nav_log::init(&config.log)?;

    if let Err(e) = nav_log::cleanup_old_logs(&config.log.resolved_dir(), config.log.retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("postview starting...");

    let catalog = Catalog::generate(CATALOG_SIZE);
    let store = MemoryStore::default();
    store.seed(
        catalog
            .ids()
            .take_while(|id| id.0 <= LISTED_UP_TO)
            .filter_map(|id| catalog.get(id)),
    );
    tracing::info!(listed = store.len(), "Listing page loaded");

    let (inputs, inputs_rx) = input_channel();
    let (bus, events_rx) = ChannelBus::new();

    let collaborators = Collaborators {
        registry: Box::new(store.clone()),
        source: Box::new(SpawnedDataSource::new(
            SimulatedFetcher::new(catalog.clone(), Duration::from_millis(250)),
            inputs.clone(),
        )),
        renderer: Box::new(LogRenderer::new(inputs.clone(), Duration::from_millis(80))),
        events: Box::new(bus),
        scheduler: Box::new(TokioScheduler::new(inputs.clone())),
        warmer: Box::new(LogWarmer::default()),
    };
    let viewer = Viewer::new(config.clone(), collaborators);

    let observers = tokio::spawn(session::observe(
        events_rx,
        inputs.clone(),
        catalog.clone(),
        config.preload.max_items,
    ));
    let script = tokio::spawn(session::run_script(inputs, session::demo_script()));

    let viewer = ViewerRuntime::new(viewer, inputs_rx).run().await;

    script.await??;
    observers.abort();

    tracing::info!(
        snapshot = %serde_json::to_string(&viewer.snapshot())?,
        fetched_31 = store.contains(ItemId(31)),
        "Session finished"
    );
    Ok(())
}
