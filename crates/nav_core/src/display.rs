//! Display controller
//!
//! Resolves the wanted item against the registry: a hit swaps the
//! displayed content, a miss hands over to the fetch coordinator.

use crate::types::{Item, ItemId, Presentation, ViewerEvent};
use crate::viewer::Viewer;

impl Viewer {
    /// Commit `id` as the wanted item and resolve it right away
    pub fn set_wanted_item(&mut self, id: ItemId) {
        self.cancel_pending();
        self.nav.set_wanted(Some(id));
        self.resolve(id);
    }

    pub fn resolve(&mut self, id: ItemId) {
        if self.nav.is_displayed(id) {
            return;
        }

        match self.registry.lookup(id) {
            Some(item) => self.swap(item),
            None => {
                tracing::debug!(%id, "Item not registered yet");
                self.ensure_fetched(id);
            }
        }
    }

    /// The only place `displayed` changes
    fn swap(&mut self, item: Item) {
        let previous = self.nav.commit_display(item.id);

        self.renderer.clear();
        let presentation = Presentation::from_item(&item);
        self.renderer.present(&presentation);
        self.events.emit(ViewerEvent::DisplayedItemChanged { id: item.id });

        tracing::info!(id = %item.id, ?previous, "Displayed item changed");
    }

    /// The renderer finished loading the image of `id`
    pub fn on_image_loaded(&mut self, id: ItemId) {
        if self.nav.is_displayed(id) {
            self.events.emit(ViewerEvent::ImageReady { id });
        } else {
            tracing::debug!(%id, "Dropping image-ready for an item no longer displayed");
        }
    }
}
