//! In-memory item store and simulated remote source

use async_trait::async_trait;
use nav_core::{Item, ItemFetcher, ItemId, ItemPayload, ItemRegistry, TransportFailure};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Posts known to the simulated server
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Arc<BTreeMap<ItemId, Item>>,
}

impl Catalog {
    /// Posts `1..=count`; every 13th id is missing upstream
    pub fn generate(count: u64) -> Self {
        let posts = (1..=count)
            .filter(|id| id % 13 != 0)
            .map(|id| {
                let payload = ItemPayload {
                    width: 800 + (id as u32 % 5) * 160,
                    height: 600 + (id as u32 % 3) * 200,
                    resource_url: format!("https://posts.example/data/{:06}.jpg", id),
                    title: Some(format!("Post {}", id)),
                    tags: vec![format!("page_{}", id / 10)],
                };
                (ItemId(id), Item::new(ItemId(id), payload))
            })
            .collect();

        Self {
            posts: Arc::new(posts),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.posts.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.posts.keys().copied()
    }

    /// Up to `count` catalog ids following `id`
    pub fn following(&self, id: ItemId, count: usize) -> Vec<ItemId> {
        self.posts
            .range(ItemId(id.0 + 1)..)
            .map(|(id, _)| *id)
            .take(count)
            .collect()
    }
}

/// Thread-safe registry shared between the viewer and listing loaders
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<ItemId, Item>>>,
}

impl MemoryStore {
    /// Register a batch, as a listing page would
    pub fn seed<'a>(&self, items: impl IntoIterator<Item = &'a Item>) {
        let mut map = self.items.write();
        for item in items {
            map.insert(item.id, item.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.read().contains_key(&id)
    }
}

impl ItemRegistry for MemoryStore {
    fn lookup(&self, id: ItemId) -> Option<Item> {
        self.items.read().get(&id).cloned()
    }

    fn register(&mut self, item: Item) {
        tracing::debug!(id = %item.id, "Registered item");
        self.items.write().insert(item.id, item);
    }
}

/// Remote source with fixed latency
pub struct SimulatedFetcher {
    catalog: Catalog,
    latency: Duration,
}

impl SimulatedFetcher {
    pub fn new(catalog: Catalog, latency: Duration) -> Self {
        Self { catalog, latency }
    }
}

#[async_trait]
impl ItemFetcher for SimulatedFetcher {
    async fn fetch(&self, id: ItemId) -> Result<Item, TransportFailure> {
        tracing::debug!(%id, latency_ms = self.latency.as_millis() as u64, "GET post");
        tokio::time::sleep(self.latency).await;

        self.catalog
            .get(id)
            .cloned()
            .ok_or_else(|| TransportFailure::new(404, "Not Found"))
    }
}
