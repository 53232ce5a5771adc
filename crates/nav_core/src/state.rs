//! Wanted/displayed navigation state

use crate::types::ItemId;
use serde::Serialize;

/// Display phase derived from the displayed id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayPhase {
    Idle,
    Displaying(ItemId),
}

/// What the user wants to see and what is actually shown.
///
/// `wanted` may change freely; `displayed` only moves through
/// [`NavigationState::commit_display`], which the swap alone calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    wanted: Option<ItemId>,
    displayed: Option<ItemId>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wanted(&self) -> Option<ItemId> {
        self.wanted
    }

    pub fn displayed(&self) -> Option<ItemId> {
        self.displayed
    }

    pub fn phase(&self) -> DisplayPhase {
        match self.displayed {
            Some(id) => DisplayPhase::Displaying(id),
            None => DisplayPhase::Idle,
        }
    }

    pub fn is_displayed(&self, id: ItemId) -> bool {
        self.displayed == Some(id)
    }

    pub(crate) fn set_wanted(&mut self, id: Option<ItemId>) {
        self.wanted = id;
    }

    /// Pin `wanted` to whatever is on screen
    pub(crate) fn freeze_to_displayed(&mut self) {
        self.wanted = self.displayed;
    }

    pub(crate) fn commit_display(&mut self, id: ItemId) -> Option<ItemId> {
        self.displayed.replace(id)
    }
}
