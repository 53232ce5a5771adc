//! Item, presentation, event and command types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque post identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Externally owned payload of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub width: u32,
    pub height: u32,
    pub resource_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A post as held by the item registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub payload: ItemPayload,
}

impl Item {
    pub fn new(id: ItemId, payload: ItemPayload) -> Self {
        Self { id, payload }
    }
}

/// Presentation attributes handed to the renderer on a swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub id: ItemId,
    pub width: u32,
    pub height: u32,
    pub resource_url: String,
    pub title: Option<String>,
}

impl Presentation {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id,
            width: item.payload.width,
            height: item.payload.height,
            resource_url: item.payload.resource_url.clone(),
            title: item.payload.title.clone(),
        }
    }

    /// Width / height, or `None` for a degenerate payload
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

/// Notifications published on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ViewerEvent {
    DisplayedItemChanged { id: ItemId },
    ImageReady { id: ItemId },
}

impl ViewerEvent {
    pub const DISPLAYED_ITEM_CHANGED: &'static str = "displayed-item-changed";
    pub const IMAGE_READY: &'static str = "image-ready";

    /// Bus name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::DisplayedItemChanged { .. } => Self::DISPLAYED_ITEM_CHANGED,
            ViewerEvent::ImageReady { .. } => Self::IMAGE_READY,
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            ViewerEvent::DisplayedItemChanged { id } | ViewerEvent::ImageReady { id } => *id,
        }
    }
}

/// Handle of an armed one-shot timer, minted by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Handle of a warmed resource, minted by the warmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarmHandle(pub u64);

/// Transport-level failure reported by the data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Transport status code (HTTP status for web sources)
    pub status: u16,
    pub reason: String,
}

impl TransportFailure {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

/// Completion of a data request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Id the request was issued for
    pub requested: ItemId,
    pub result: Result<Item, TransportFailure>,
}

impl FetchOutcome {
    pub fn success(item: Item) -> Self {
        Self {
            requested: item.id,
            result: Ok(item),
        }
    }

    pub fn failure(requested: ItemId, failure: TransportFailure) -> Self {
        Self {
            requested,
            result: Err(failure),
        }
    }
}

/// Typed commands accepted by [`crate::Viewer::handle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// User-driven navigation intent (debounced)
    Navigate(ItemId),
    /// Commit a wanted item immediately
    SetWanted(ItemId),
    /// Predictor supplied a new list of likely next items
    Warm(Vec<ItemId>),
    /// Drop any pending navigation
    CancelNavigation,
    TimerFired(TimerHandle),
    FetchCompleted(FetchOutcome),
    /// The renderer finished loading the image of an item
    ImageLoaded(ItemId),
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(width: u32, height: u32) -> ItemPayload {
        ItemPayload {
            width,
            height,
            resource_url: "https://example.test/1.jpg".into(),
            title: Some("one".into()),
            tags: vec!["tag".into()],
        }
    }

    #[test]
    fn test_presentation_from_item() {
        let item = Item::new(ItemId(1), payload(1600, 800));
        let p = Presentation::from_item(&item);

        assert_eq!(p.id, ItemId(1));
        assert_eq!((p.width, p.height), (1600, 800));
        assert_eq!(p.resource_url, "https://example.test/1.jpg");
        assert_eq!(p.title.as_deref(), Some("one"));
        assert_eq!(p.aspect_ratio(), Some(2.0));
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        let item = Item::new(ItemId(1), payload(100, 0));
        assert_eq!(Presentation::from_item(&item).aspect_ratio(), None);
    }

    #[test]
    fn test_event_names() {
        let changed = ViewerEvent::DisplayedItemChanged { id: ItemId(4) };
        let ready = ViewerEvent::ImageReady { id: ItemId(4) };

        assert_eq!(changed.name(), "displayed-item-changed");
        assert_eq!(ready.name(), "image-ready");
        assert_eq!(ready.id(), ItemId(4));
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(ViewerEvent::DisplayedItemChanged { id: ItemId(7) }).unwrap();
        assert_eq!(json["event"], "displayed-item-changed");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId(42).to_string(), "#42");
    }
}
