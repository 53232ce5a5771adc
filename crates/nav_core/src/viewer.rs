//! The owning navigation component
//!
//! `Viewer` holds every piece of mutable navigation state and the
//! collaborators. The debounce, display and fetch controllers are
//! implemented as `impl Viewer` blocks in their own modules.

use crate::collaborators::{Collaborators, DataSource, EventSink, ItemRegistry, Renderer, Scheduler, Warmer};
use crate::config::ViewerConfig;
use crate::debounce::DebounceWindow;
use crate::fetch::{FetchCoordinator, FetchStats};
use crate::prefetch::{PrefetchManager, WarmDecision};
use crate::state::NavigationState;
use crate::types::{Input, ItemId};
use serde::Serialize;
use std::ops::ControlFlow;

/// Point-in-time view of the navigation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSnapshot {
    pub wanted: Option<ItemId>,
    pub displayed: Option<ItemId>,
    pub fetch_outstanding: bool,
    pub debounce_armed: bool,
    pub preload_active: bool,
    pub preload_generation: u64,
    pub fetch_stats: FetchStats,
}

pub struct Viewer {
    pub(crate) config: ViewerConfig,
    pub(crate) nav: NavigationState,
    pub(crate) debounce: DebounceWindow,
    pub(crate) fetch: FetchCoordinator,
    pub(crate) prefetch: PrefetchManager,

    pub(crate) registry: Box<dyn ItemRegistry>,
    pub(crate) source: Box<dyn DataSource>,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) events: Box<dyn EventSink>,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) warmer: Box<dyn Warmer>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            registry,
            source,
            renderer,
            events,
            scheduler,
            warmer,
        } = collaborators;

        Self {
            prefetch: PrefetchManager::new(config.preload.clone()),
            config,
            nav: NavigationState::new(),
            debounce: DebounceWindow::default(),
            fetch: FetchCoordinator::default(),
            registry,
            source,
            renderer,
            events,
            scheduler,
            warmer,
        }
    }

    /// Dispatch one command. Returns `Break` once the viewer has shut down.
    pub fn handle(&mut self, input: Input) -> ControlFlow<()> {
        match input {
            Input::Navigate(id) => self.request_navigation(id),
            Input::SetWanted(id) => self.set_wanted_item(id),
            Input::Warm(ids) => {
                self.warm(&ids);
            }
            Input::CancelNavigation => self.cancel_pending(),
            Input::TimerFired(handle) => self.on_timer_fired(handle),
            Input::FetchCompleted(outcome) => self.on_fetch_complete(outcome),
            Input::ImageLoaded(id) => self.on_image_loaded(id),
            Input::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Hand a predicted list of upcoming items to the prefetch manager
    pub fn warm(&mut self, ids: &[ItemId]) -> WarmDecision {
        self.prefetch.warm(
            ids,
            self.nav.wanted(),
            self.registry.as_ref(),
            self.warmer.as_mut(),
        )
    }

    pub fn is_warming(&self, id: ItemId) -> bool {
        self.prefetch.is_warming(id)
    }

    /// Cancel pending navigation and release the preload set
    pub fn shutdown(&mut self) {
        self.cancel_pending();
        self.prefetch.clear(self.warmer.as_mut());
        tracing::info!(displayed = ?self.nav.displayed(), "Viewer shut down");
    }

    pub fn state(&self) -> &NavigationState {
        &self.nav
    }

    pub fn debounce(&self) -> &DebounceWindow {
        &self.debounce
    }

    pub fn prefetch(&self) -> &PrefetchManager {
        &self.prefetch
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            wanted: self.nav.wanted(),
            displayed: self.nav.displayed(),
            fetch_outstanding: self.fetch.is_outstanding(),
            debounce_armed: self.debounce.armed().is_some(),
            preload_active: self.prefetch.is_active(),
            preload_generation: self.prefetch.generation(),
            fetch_stats: self.fetch.stats(),
        }
    }
}
