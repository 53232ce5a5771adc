//! Single-flight fetch coordinator
//!
//! At most one data request is outstanding for the whole viewer. Demand
//! arriving meanwhile is not queued: the next completion re-resolves
//! whatever is wanted at that moment.

use crate::error::{NavError, Notice};
use crate::types::{FetchOutcome, ItemId};
use crate::viewer::Viewer;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    /// Requests actually sent to the data source
    pub issued: u64,
    /// Requests suppressed because one was outstanding
    pub coalesced: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
pub struct FetchCoordinator {
    /// Id the outstanding request was issued for
    outstanding: Option<ItemId>,
    stats: FetchStats,
}

impl FetchCoordinator {
    pub fn is_outstanding(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn outstanding(&self) -> Option<ItemId> {
        self.outstanding
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    fn try_begin(&mut self, id: ItemId) -> bool {
        if self.outstanding.is_some() {
            self.stats.coalesced += 1;
            return false;
        }
        self.outstanding = Some(id);
        self.stats.issued += 1;
        true
    }

    fn finish(&mut self) -> Option<ItemId> {
        self.outstanding.take()
    }
}

impl Viewer {
    pub fn ensure_fetched(&mut self, id: ItemId) {
        if self.fetch.try_begin(id) {
            tracing::debug!(%id, "Fetching item");
            self.source.fetch(id);
        } else {
            tracing::debug!(%id, outstanding = ?self.fetch.outstanding(), "Fetch coalesced");
        }
    }

    pub fn on_fetch_complete(&mut self, outcome: FetchOutcome) {
        let Some(requested) = self.fetch.finish() else {
            tracing::warn!(requested = %outcome.requested, "Fetch completion without an outstanding request");
            return;
        };
        if requested != outcome.requested {
            tracing::warn!(%requested, reported = %outcome.requested, "Fetch completion for an unexpected id");
        }

        match outcome.result {
            Ok(item) => self.registry.register(item),
            Err(failure) => {
                self.fetch.stats.failed += 1;
                if self.nav.wanted() == Some(requested) {
                    let err = NavError::transport(requested, &failure);
                    tracing::warn!(reason = %failure.reason, "{}", err);
                    self.renderer.show_notice(&Notice::FetchFailed {
                        id: requested,
                        status: failure.status,
                    });
                    return;
                }
                tracing::debug!(%requested, status = failure.status, "Failed fetch superseded by navigation");
            }
        }

        // Always the live target, never the id that was requested
        if let Some(wanted) = self.nav.wanted() {
            self.resolve(wanted);
        }
    }
}
