//! postview navigation core
//!
//! Coordinates navigation between posts in a single-item viewer:
//! - Wanted/displayed navigation state
//! - Debounced navigation intents
//! - Display controller (registry lookup and content swap)
//! - Single-flight fetch coordination
//! - Preload generations for predicted next items
//! - tokio runtime adapter

pub mod collaborators;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod fetch;
pub mod prefetch;
pub mod runtime;
pub mod state;
pub mod types;
pub mod viewer;

#[cfg(test)]
mod test_support;

pub use collaborators::{Collaborators, DataSource, EventSink, ItemRegistry, Renderer, Scheduler, Warmer};
pub use config::{DebounceConfig, PreloadConfig, ViewerConfig};
pub use debounce::DebounceWindow;
pub use error::{NavError, Notice};
pub use fetch::{FetchCoordinator, FetchStats};
pub use prefetch::{PrefetchManager, PreloadGeneration, WarmDecision};
pub use runtime::{input_channel, InputSender, ItemFetcher, SpawnedDataSource, TokioScheduler, ViewerRuntime};
pub use state::{DisplayPhase, NavigationState};
pub use types::{
    FetchOutcome, Input, Item, ItemId, ItemPayload, Presentation, TimerHandle, TransportFailure,
    ViewerEvent, WarmHandle,
};
pub use viewer::{Viewer, ViewerSnapshot};
