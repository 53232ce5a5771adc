//! tokio adapter
//!
//! Timers and fetches run as tokio tasks that post their completion back
//! as an [`Input`] on an unbounded channel. [`ViewerRuntime`] drains that
//! channel on one task, so the viewer itself is never touched concurrently.

use crate::collaborators::{DataSource, Scheduler};
use crate::error::{NavError, Result};
use crate::types::{FetchOutcome, Input, Item, ItemId, TimerHandle, TransportFailure};
use crate::viewer::Viewer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of the viewer's input channel
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: mpsc::UnboundedSender<Input>,
}

impl InputSender {
    pub fn send(&self, input: Input) -> Result<()> {
        self.tx
            .send(input)
            .map_err(|_| NavError::ChannelClosed("viewer input channel closed".into()))
    }
}

/// Create the input channel shared by the runtime and its collaborators
pub fn input_channel() -> (InputSender, mpsc::UnboundedReceiver<Input>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InputSender { tx }, rx)
}

/// One-shot timers backed by `tokio::time::sleep`
pub struct TokioScheduler {
    inputs: InputSender,
    next: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(inputs: InputSender) -> Self {
        Self {
            inputs,
            next: 0,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next += 1;
        let handle = TimerHandle(self.next);
        let inputs = self.inputs.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if inputs.send(Input::TimerFired(handle)).is_err() {
                tracing::trace!(?handle, "Viewer gone before timer fired");
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

/// Asynchronous item fetch (HTTP client, database, ...)
#[async_trait]
pub trait ItemFetcher: Send + Sync + 'static {
    async fn fetch(&self, id: ItemId) -> std::result::Result<Item, TransportFailure>;
}

/// [`DataSource`] that runs each fetch as a tokio task
pub struct SpawnedDataSource<F> {
    fetcher: Arc<F>,
    inputs: InputSender,
}

impl<F: ItemFetcher> SpawnedDataSource<F> {
    pub fn new(fetcher: F, inputs: InputSender) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            inputs,
        }
    }
}

impl<F: ItemFetcher> DataSource for SpawnedDataSource<F> {
    fn fetch(&mut self, id: ItemId) {
        let fetcher = Arc::clone(&self.fetcher);
        let inputs = self.inputs.clone();

        tokio::spawn(async move {
            let result = fetcher.fetch(id).await;
            let outcome = FetchOutcome { requested: id, result };
            if inputs.send(Input::FetchCompleted(outcome)).is_err() {
                tracing::debug!(%id, "Viewer gone before fetch completed");
            }
        });
    }
}

/// Drives a [`Viewer`] from its input channel
pub struct ViewerRuntime {
    viewer: Viewer,
    inputs: mpsc::UnboundedReceiver<Input>,
}

impl ViewerRuntime {
    pub fn new(viewer: Viewer, inputs: mpsc::UnboundedReceiver<Input>) -> Self {
        Self { viewer, inputs }
    }

    /// Process inputs until `Shutdown` or until every sender is gone
    pub async fn run(mut self) -> Viewer {
        tracing::info!("Viewer runtime started");

        while let Some(input) = self.inputs.recv().await {
            tracing::trace!(?input, "Viewer input");
            if self.viewer.handle(input).is_break() {
                return self.viewer;
            }
        }

        self.viewer.shutdown();
        self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use crate::config::ViewerConfig;
    use crate::test_support::{item, Harness};
    use crate::types::ViewerEvent;

    type Requests = Arc<std::sync::Mutex<Vec<ItemId>>>;

    /// Serves every id after 100ms, except 13
    struct SlowFetcher {
        requests: Requests,
    }

    #[async_trait]
    impl ItemFetcher for SlowFetcher {
        async fn fetch(&self, id: ItemId) -> std::result::Result<Item, TransportFailure> {
            self.requests.lock().unwrap().push(id);
            tokio::time::sleep(Duration::from_millis(100)).await;
            if id == ItemId(13) {
                Err(TransportFailure::new(404, "Not Found"))
            } else {
                Ok(item(id.0))
            }
        }
    }

    fn runtime(harness: &Harness) -> (InputSender, ViewerRuntime, Requests) {
        let (tx, rx) = input_channel();
        let requests = Requests::default();
        let fetcher = SlowFetcher {
            requests: requests.clone(),
        };
        let collaborators = Collaborators {
            scheduler: Box::new(TokioScheduler::new(tx.clone())),
            source: Box::new(SpawnedDataSource::new(fetcher, tx.clone())),
            ..harness.collaborators()
        };
        let viewer = Viewer::new(ViewerConfig::default(), collaborators);
        (tx, ViewerRuntime::new(viewer, rx), requests)
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_repeat_storm_commits_final_target() {
        let harness = Harness::with_items(&[1]);
        let (tx, runtime, requests) = runtime(&harness);

        let driver = tokio::spawn(async move {
            tx.send(Input::SetWanted(ItemId(1))).unwrap();
            for id in 2..=6 {
                tx.send(Input::Navigate(ItemId(id))).unwrap();
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
            tx.send(Input::Shutdown).unwrap();
        });

        let viewer = runtime.run().await;
        driver.await.unwrap();

        assert_eq!(*requests.lock().unwrap(), vec![ItemId(6)]);
        assert_eq!(harness.presented(), vec![ItemId(1), ItemId(6)]);
        assert_eq!(viewer.state().displayed(), Some(ItemId(6)));
        assert_eq!(
            harness.emitted().last(),
            Some(&ViewerEvent::DisplayedItemChanged { id: ItemId(6) })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_during_fetch_reuses_completion() {
        let harness = Harness::new();
        let (tx, runtime, requests) = runtime(&harness);

        let driver = tokio::spawn(async move {
            tx.send(Input::SetWanted(ItemId(7))).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(Input::SetWanted(ItemId(8))).unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            tx.send(Input::Shutdown).unwrap();
        });

        let viewer = runtime.run().await;
        driver.await.unwrap();

        // 8 is fetched only after 7 completed, then displayed
        assert_eq!(*requests.lock().unwrap(), vec![ItemId(7), ItemId(8)]);
        assert_eq!(harness.presented(), vec![ItemId(8)]);
        assert_eq!(viewer.snapshot().fetch_stats.coalesced, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_surfaces_notice() {
        let harness = Harness::new();
        let (tx, runtime, requests) = runtime(&harness);

        let driver = tokio::spawn(async move {
            tx.send(Input::SetWanted(ItemId(13))).unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            tx.send(Input::Shutdown).unwrap();
        });

        let viewer = runtime.run().await;
        driver.await.unwrap();

        assert_eq!(*requests.lock().unwrap(), vec![ItemId(13)]);
        assert_eq!(viewer.state().displayed(), None);
        assert_eq!(viewer.snapshot().fetch_stats.failed, 1);
        assert!(!viewer.snapshot().fetch_outstanding);
    }

    #[tokio::test]
    async fn test_send_after_close_errors() {
        let (tx, rx) = input_channel();
        drop(rx);
        assert!(matches!(tx.send(Input::Shutdown), Err(NavError::ChannelClosed(_))));
    }
}
