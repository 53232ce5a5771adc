//! Preload set lifecycle
//!
//! Each accepted `warm` call builds a new [`PreloadGeneration`] in full,
//! carrying over the handles of ids it shares with the current one, and
//! only then releases what is left of the old generation. A download that
//! both lists want is therefore never interrupted and restarted.

use crate::collaborators::{ItemRegistry, Warmer};
use crate::config::PreloadConfig;
use crate::types::{ItemId, WarmHandle};
use serde::Serialize;

/// One generation of warmed resources
#[derive(Debug, Default)]
pub struct PreloadGeneration {
    generation: u64,
    entries: Vec<(ItemId, WarmHandle)>,
}

impl PreloadGeneration {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            entries: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Move the handle for `id` out of this generation
    fn take(&mut self, id: ItemId) -> Option<WarmHandle> {
        let pos = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(pos).1)
    }

    fn push(&mut self, id: ItemId, handle: WarmHandle) {
        self.entries.push((id, handle));
    }

    /// Release every resource still owned by this generation
    fn destroy(self, warmer: &mut dyn Warmer) -> usize {
        let released = self.entries.len();
        for (_, handle) in self.entries {
            warmer.release(handle);
        }
        released
    }
}

/// Result of a `warm` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarmDecision {
    /// A new generation replaced the previous one
    Warmed {
        generation: u64,
        started: usize,
        reused: usize,
        released: usize,
    },
    /// Same list as the active generation
    Unchanged,
    /// The previous list did not contain the wanted item
    Ineligible,
    Disabled,
}

/// Maintains the rolling set of warmed items
#[derive(Debug)]
pub struct PrefetchManager {
    config: PreloadConfig,
    /// Most recent list passed to `warm`, acted on or not
    last_requested: Vec<ItemId>,
    /// Whether `last_requested` was acted on
    active: bool,
    current: PreloadGeneration,
    generations: u64,
}

impl PrefetchManager {
    pub fn new(config: PreloadConfig) -> Self {
        Self {
            config,
            last_requested: Vec::new(),
            active: false,
            current: PreloadGeneration::default(),
            generations: 0,
        }
    }

    /// Accept a predicted list of upcoming items.
    ///
    /// Work is only done when the previous list contained `wanted`, i.e.
    /// the user is moving through the sequence that was predicted.
    pub fn warm(
        &mut self,
        ids: &[ItemId],
        wanted: Option<ItemId>,
        registry: &dyn ItemRegistry,
        warmer: &mut dyn Warmer,
    ) -> WarmDecision {
        let mut requested: Vec<ItemId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !requested.contains(&id) {
                requested.push(id);
            }
        }
        requested.truncate(self.config.max_items);

        let eligible = wanted.is_some_and(|id| self.last_requested.contains(&id));
        let same_list = self.active && requested == self.last_requested;
        self.last_requested = requested;

        if !self.config.enabled {
            self.active = false;
            return WarmDecision::Disabled;
        }
        if !eligible {
            tracing::debug!(?wanted, "Preload list recorded, wanted item was not predicted");
            self.active = false;
            return WarmDecision::Ineligible;
        }
        // Ids skipped earlier may have been registered since
        let unchanged = same_list
            && self
                .last_requested
                .iter()
                .all(|&id| self.current.contains(id) || registry.lookup(id).is_none());
        if unchanged {
            return WarmDecision::Unchanged;
        }

        self.generations += 1;
        let mut next = PreloadGeneration::new(self.generations);
        let (mut started, mut reused) = (0, 0);

        for &id in &self.last_requested {
            if let Some(handle) = self.current.take(id) {
                next.push(id, handle);
                reused += 1;
                continue;
            }
            match registry.lookup(id) {
                Some(item) => {
                    next.push(id, warmer.warm(&item));
                    started += 1;
                }
                None => tracing::trace!(%id, "Skipping preload, item not registered"),
            }
        }

        let previous = std::mem::replace(&mut self.current, next);
        let released = previous.destroy(warmer);
        self.active = true;

        tracing::debug!(
            generation = self.generations,
            started,
            reused,
            released,
            "Preload generation replaced"
        );

        WarmDecision::Warmed {
            generation: self.generations,
            started,
            reused,
            released,
        }
    }

    /// Is `id` part of the list currently being acted on?
    pub fn is_warming(&self, id: ItemId) -> bool {
        self.active && self.last_requested.contains(&id)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_requested(&self) -> &[ItemId] {
        &self.last_requested
    }

    pub fn generation(&self) -> u64 {
        self.current.generation()
    }

    pub fn warmed_ids(&self) -> Vec<ItemId> {
        self.current.ids().collect()
    }

    /// Release the whole preload set
    pub fn clear(&mut self, warmer: &mut dyn Warmer) {
        let released = std::mem::take(&mut self.current).destroy(warmer);
        self.active = false;
        self.last_requested.clear();
        tracing::debug!(released, "Preload set cleared");
    }
}
