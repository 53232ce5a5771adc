//! Debounce controller ("lazy load")
//!
//! Navigation intents are held back for a short or long delay before they
//! are committed as the wanted item. A new intent always replaces the
//! pending one, so a key-repeat storm only ever commits its final target.

use crate::types::{ItemId, TimerHandle};
use crate::viewer::Viewer;

/// At most one armed timer and the target it will commit
#[derive(Debug, Default)]
pub struct DebounceWindow {
    timer: Option<TimerHandle>,
    pending_target: Option<ItemId>,
}

impl DebounceWindow {
    pub fn armed(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn pending_target(&self) -> Option<ItemId> {
        self.pending_target
    }

    fn arm(&mut self, handle: TimerHandle, target: ItemId) {
        self.timer = Some(handle);
        self.pending_target = Some(target);
    }

    fn disarm(&mut self) -> Option<TimerHandle> {
        self.pending_target = None;
        self.timer.take()
    }

    /// Consume the window if `handle` is the armed timer
    fn fire(&mut self, handle: TimerHandle) -> Option<ItemId> {
        if self.timer != Some(handle) {
            return None;
        }
        self.timer = None;
        self.pending_target.take()
    }
}

impl Viewer {
    /// Debounced navigation intent
    pub fn request_navigation(&mut self, target: ItemId) {
        self.cancel_pending();

        // Only the current display and the final target may ever be shown
        self.nav.freeze_to_displayed();

        let warming = self.prefetch.is_warming(target);
        let delay = if warming {
            self.config.debounce.short_delay()
        } else {
            self.config.debounce.long_delay()
        };

        let handle = self.scheduler.schedule(delay);
        self.debounce.arm(handle, target);
        tracing::debug!(%target, warming, delay_ms = delay.as_millis() as u64, "Navigation debounced");
    }

    /// Drop the pending navigation, if any
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.debounce.disarm() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn on_timer_fired(&mut self, handle: TimerHandle) {
        match self.debounce.fire(handle) {
            Some(target) => self.set_wanted_item(target),
            None => tracing::trace!(?handle, "Ignoring stale debounce timer"),
        }
    }
}
