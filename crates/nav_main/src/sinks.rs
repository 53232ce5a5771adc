//! Renderer, notification bus and warmer used by the demo host

use nav_core::{
    EventSink, Input, InputSender, Item, Notice, Presentation, Renderer, ViewerEvent, WarmHandle,
    Warmer,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// Logs presentations and simulates the image finishing to load
pub struct LogRenderer {
    inputs: InputSender,
    image_delay: Duration,
    shown: Option<Presentation>,
}

impl LogRenderer {
    pub fn new(inputs: InputSender, image_delay: Duration) -> Self {
        Self {
            inputs,
            image_delay,
            shown: None,
        }
    }
}

impl Renderer for LogRenderer {
    fn clear(&mut self) {
        if let Some(previous) = self.shown.take() {
            tracing::trace!(id = %previous.id, "Cleared content");
        }
    }

    fn present(&mut self, presentation: &Presentation) {
        tracing::info!(
            id = %presentation.id,
            width = presentation.width,
            height = presentation.height,
            aspect = ?presentation.aspect_ratio(),
            url = %presentation.resource_url,
            "Presenting"
        );

        let id = presentation.id;
        let inputs = self.inputs.clone();
        let delay = self.image_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if inputs.send(Input::ImageLoaded(id)).is_err() {
                tracing::trace!(%id, "Viewer gone before image loaded");
            }
        });

        self.shown = Some(presentation.clone());
    }

    fn show_notice(&mut self, notice: &Notice) {
        tracing::warn!("[notice] {}", notice.message());
    }
}

/// Bus that forwards every event to the host's observers
pub struct ChannelBus {
    tx: mpsc::UnboundedSender<ViewerEvent>,
}

impl ChannelBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ViewerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelBus {
    fn emit(&mut self, event: ViewerEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(event = event.name(), "No observers left");
        }
    }
}

/// Warmer that tracks live preload handles
#[derive(Debug, Default)]
pub struct LogWarmer {
    next: u64,
    live: HashMap<WarmHandle, String>,
    started: u64,
}

impl Warmer for LogWarmer {
    fn warm(&mut self, item: &Item) -> WarmHandle {
        self.next += 1;
        self.started += 1;
        let handle = WarmHandle(self.next);
        tracing::debug!(id = %item.id, url = %item.payload.resource_url, "Preloading");
        self.live.insert(handle, item.payload.resource_url.clone());
        handle
    }

    fn release(&mut self, handle: WarmHandle) {
        if let Some(url) = self.live.remove(&handle) {
            tracing::debug!(%url, "Released preload");
        }
    }
}

impl Drop for LogWarmer {
    fn drop(&mut self) {
        tracing::debug!(started = self.started, leaked = self.live.len(), "Warmer dropped");
    }
}
