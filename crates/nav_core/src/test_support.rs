//! Recording collaborators shared by the unit tests.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::collaborators::{Collaborators, DataSource, EventSink, ItemRegistry, Renderer, Scheduler, Warmer};
use crate::config::ViewerConfig;
use crate::error::Notice;
use crate::types::{Item, ItemId, ItemPayload, Presentation, TimerHandle, ViewerEvent, WarmHandle};
use crate::viewer::Viewer;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Every collaborator call, in the order the core made it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(ItemId),
    Register(ItemId),
    Fetch(ItemId),
    Clear,
    Present(ItemId),
    Notice(Notice),
    Emit(ViewerEvent),
    Schedule(TimerHandle, Duration),
    Cancel(TimerHandle),
    Warm(ItemId, WarmHandle),
    Release(WarmHandle),
}

type CallLog = Rc<RefCell<Vec<Call>>>;
type Store = Rc<RefCell<HashMap<ItemId, Item>>>;

pub fn item(id: u64) -> Item {
    Item::new(
        ItemId(id),
        ItemPayload {
            width: 800,
            height: 600,
            resource_url: format!("https://example.test/{}.jpg", id),
            title: None,
            tags: Vec::new(),
        },
    )
}

struct MockRegistry {
    store: Store,
    log: CallLog,
}

impl ItemRegistry for MockRegistry {
    fn lookup(&self, id: ItemId) -> Option<Item> {
        self.log.borrow_mut().push(Call::Lookup(id));
        self.store.borrow().get(&id).cloned()
    }

    fn register(&mut self, item: Item) {
        self.log.borrow_mut().push(Call::Register(item.id));
        self.store.borrow_mut().insert(item.id, item);
    }
}

struct MockSource {
    log: CallLog,
}

impl DataSource for MockSource {
    fn fetch(&mut self, id: ItemId) {
        self.log.borrow_mut().push(Call::Fetch(id));
    }
}

struct MockRenderer {
    log: CallLog,
}

impl Renderer for MockRenderer {
    fn clear(&mut self) {
        self.log.borrow_mut().push(Call::Clear);
    }

    fn present(&mut self, presentation: &Presentation) {
        self.log.borrow_mut().push(Call::Present(presentation.id));
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.log.borrow_mut().push(Call::Notice(notice.clone()));
    }
}

struct MockEvents {
    log: CallLog,
}

impl EventSink for MockEvents {
    fn emit(&mut self, event: ViewerEvent) {
        self.log.borrow_mut().push(Call::Emit(event));
    }
}

struct MockScheduler {
    next: u64,
    log: CallLog,
}

impl Scheduler for MockScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.log.borrow_mut().push(Call::Schedule(handle, delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.log.borrow_mut().push(Call::Cancel(handle));
    }
}

pub struct MockWarmer {
    next: u64,
    log: CallLog,
}

impl Warmer for MockWarmer {
    fn warm(&mut self, item: &Item) -> WarmHandle {
        self.next += 1;
        let handle = WarmHandle(self.next);
        self.log.borrow_mut().push(Call::Warm(item.id, handle));
        handle
    }

    fn release(&mut self, handle: WarmHandle) {
        self.log.borrow_mut().push(Call::Release(handle));
    }
}

/// Shared view of what the mocks saw
#[derive(Clone, Default)]
pub struct Harness {
    log: CallLog,
    store: Store,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness with items already present in the registry
    pub fn with_items(ids: &[u64]) -> Self {
        let harness = Self::new();
        for &id in ids {
            harness.insert(id);
        }
        harness
    }

    pub fn insert(&self, id: u64) {
        let item = item(id);
        self.store.borrow_mut().insert(item.id, item);
    }

    pub fn registry(&self) -> Box<dyn ItemRegistry> {
        Box::new(MockRegistry {
            store: self.store.clone(),
            log: self.log.clone(),
        })
    }

    pub fn warmer(&self) -> MockWarmer {
        MockWarmer {
            next: 0,
            log: self.log.clone(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            registry: self.registry(),
            source: Box::new(MockSource { log: self.log.clone() }),
            renderer: Box::new(MockRenderer { log: self.log.clone() }),
            events: Box::new(MockEvents { log: self.log.clone() }),
            scheduler: Box::new(MockScheduler {
                next: 0,
                log: self.log.clone(),
            }),
            warmer: Box::new(self.warmer()),
        }
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::new(ViewerConfig::default(), self.collaborators())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn reset(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn fetches(&self) -> Vec<ItemId> {
        self.filter(|c| match c {
            Call::Fetch(id) => Some(*id),
            _ => None,
        })
    }

    pub fn presented(&self) -> Vec<ItemId> {
        self.filter(|c| match c {
            Call::Present(id) => Some(*id),
            _ => None,
        })
    }

    pub fn emitted(&self) -> Vec<ViewerEvent> {
        self.filter(|c| match c {
            Call::Emit(event) => Some(*event),
            _ => None,
        })
    }

    pub fn warmed(&self) -> Vec<ItemId> {
        self.filter(|c| match c {
            Call::Warm(id, _) => Some(*id),
            _ => None,
        })
    }

    pub fn released(&self) -> Vec<WarmHandle> {
        self.filter(|c| match c {
            Call::Release(handle) => Some(*handle),
            _ => None,
        })
    }

    /// Delays of every armed timer, by handle
    pub fn scheduled(&self) -> Vec<(TimerHandle, Duration)> {
        self.filter(|c| match c {
            Call::Schedule(handle, delay) => Some((*handle, *delay)),
            _ => None,
        })
    }

    fn filter<T>(&self, f: impl Fn(&Call) -> Option<T>) -> Vec<T> {
        self.log.borrow().iter().filter_map(f).collect()
    }
}
