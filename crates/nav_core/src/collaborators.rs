//! External collaborators the core calls into
//!
//! All of them are driven from the single thread that owns the
//! [`Viewer`](crate::Viewer); asynchronous completions come back as
//! [`Input`](crate::Input) commands.

use crate::error::Notice;
use crate::types::{Item, ItemId, Presentation, TimerHandle, ViewerEvent, WarmHandle};
use std::time::Duration;

/// Item store, queried by id
pub trait ItemRegistry {
    fn lookup(&self, id: ItemId) -> Option<Item>;
    fn register(&mut self, item: Item);
}

/// Asynchronous data source.
///
/// `fetch` only starts the request; completion is reported through
/// [`Viewer::on_fetch_complete`](crate::Viewer::on_fetch_complete).
pub trait DataSource {
    fn fetch(&mut self, id: ItemId);
}

/// Render/init collaborator for the displayed item
pub trait Renderer {
    /// Remove the previously shown content
    fn clear(&mut self);
    /// Place the image, apply dimensions, initialize text and scripts
    fn present(&mut self, presentation: &Presentation);
    /// Show a transient, non-blocking notice
    fn show_notice(&mut self, notice: &Notice);
}

/// Publish-only notification bus
pub trait EventSink {
    fn emit(&mut self, event: ViewerEvent);
}

/// Cancellable one-shot timers.
///
/// Firing is reported through
/// [`Viewer::on_timer_fired`](crate::Viewer::on_timer_fired).
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Resource warmer (image preloading)
pub trait Warmer {
    /// Start warming the resource of `item`
    fn warm(&mut self, item: &Item) -> WarmHandle;
    /// Drop a warmed resource
    fn release(&mut self, handle: WarmHandle);
}

/// Collaborators handed to [`Viewer::new`](crate::Viewer::new)
pub struct Collaborators {
    pub registry: Box<dyn ItemRegistry>,
    pub source: Box<dyn DataSource>,
    pub renderer: Box<dyn Renderer>,
    pub events: Box<dyn EventSink>,
    pub scheduler: Box<dyn Scheduler>,
    pub warmer: Box<dyn Warmer>,
}
