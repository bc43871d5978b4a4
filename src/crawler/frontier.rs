//! Crawl frontier: pending queue, dedup sets and the termination detector
//!
//! The frontier owns every piece of mutable crawl bookkeeping for one run:
//! - `seen`: every URL ever admitted (dedup)
//! - `done`: lowercase URLs whose fetch completed
//! - `todo`: FIFO of URLs waiting for a worker
//! - `total` / `limit`: the hard ceiling on enqueued work
//!
//! All four live behind one mutex that is never held across an await.
//! Workers park in [`Frontier::take_next`] while the queue is empty, and the
//! orchestrator parks in [`Frontier::join`] until the queue is empty *and*
//! every dequeued item has been acknowledged.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// URLs longer than this many characters are never enqueued
pub const MAX_URL_LENGTH: usize = 256;

/// Length of `url` in characters once percent-decoded
///
/// Admitted URLs arrive in their encoded form, where one non-ASCII
/// character takes up to twelve bytes; the ceiling applies to the link as
/// written on the page.
fn url_length(url: &str) -> usize {
    String::from_utf8_lossy(&urlencoding::decode_binary(url.as_bytes()))
        .chars()
        .count()
}

#[derive(Debug, Default)]
struct FrontierState {
    seen: HashSet<String>,
    done: HashSet<String>,
    todo: VecDeque<String>,
    total: usize,
    /// Pushed but not yet acknowledged
    unfinished: usize,
    /// New URLs refused because `total` reached `limit`
    dropped: usize,
}

/// Point-in-time counters of a frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    pub seen: usize,
    pub done: usize,
    pub pending: usize,
    pub total: usize,
    pub unfinished: usize,
    pub dropped: usize,
}

/// Bounded, deduplicating work queue shared by all workers of one crawl
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    limit: usize,
    item_ready: Notify,
    drained: Notify,
}

impl Frontier {
    /// Creates an empty frontier that will enqueue at most `limit` URLs
    pub fn new(limit: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            limit,
            item_ready: Notify::new(),
            drained: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // Counters stay consistent even if a holder panicked mid-update
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Proposes URLs for crawling
    ///
    /// Each URL not already in `seen` is recorded there; it is enqueued only
    /// if it is at most [`MAX_URL_LENGTH`] characters once percent-decoded,
    /// contains no whitespace and
    /// the ceiling has not been reached. Anything else is dropped for good,
    /// since the URL is already marked as seen.
    ///
    /// Returns the number of URLs enqueued by this call.
    pub fn admit<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut enqueued = 0;
        {
            let mut state = self.lock();
            for url in urls {
                let url = url.into();
                if state.seen.contains(&url) {
                    continue;
                }
                state.seen.insert(url.clone());

                if url_length(&url) > MAX_URL_LENGTH || url.chars().any(char::is_whitespace) {
                    tracing::trace!("Dropping unusable URL: {}", url);
                    continue;
                }

                if state.total >= self.limit {
                    state.dropped += 1;
                    tracing::trace!("Admission ceiling reached, dropping {}", url);
                    continue;
                }

                state.total += 1;
                state.unfinished += 1;
                state.todo.push_back(url);
                enqueued += 1;
            }
        }

        for _ in 0..enqueued {
            self.item_ready.notify_one();
        }

        enqueued
    }

    /// Removes and returns the head of the queue, waiting while it is empty
    ///
    /// This is the only point where a worker waits on the frontier, and the
    /// only point where cancelling a worker is safe.
    pub async fn take_next(&self) -> String {
        loop {
            let notified = self.item_ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(url) = self.lock().todo.pop_front() {
                return url;
            }

            notified.await;
        }
    }

    /// Removes the head of the queue without waiting
    pub fn try_take_next(&self) -> Option<String> {
        self.lock().todo.pop_front()
    }

    /// Records that the fetch of `url` completed
    pub fn mark_done(&self, url: &str) {
        self.lock().done.insert(url.to_lowercase());
    }

    /// Acknowledges that processing of one dequeued item finished
    ///
    /// Must be called exactly once per dequeue, whatever the outcome.
    pub fn ack_item(&self) {
        let finished = {
            let mut state = self.lock();
            if state.unfinished == 0 {
                tracing::warn!("ack_item called with no outstanding items");
                return;
            }
            state.unfinished -= 1;
            state.unfinished == 0
        };

        if finished {
            self.drained.notify_waiters();
        }
    }

    /// Waits until the queue is empty and every dequeued item was acknowledged
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lock().unfinished == 0 {
                return;
            }

            notified.await;
        }
    }

    /// Whether `url` was ever admitted
    pub fn is_seen(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    /// Whether `url` completed, compared case-insensitively
    pub fn is_done(&self, url: &str) -> bool {
        self.lock().done.contains(&url.to_lowercase())
    }

    /// Every admitted URL in lexicographic order
    pub fn seen_sorted(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().seen.iter().cloned().collect();
        urls.sort();
        urls
    }

    pub fn stats(&self) -> FrontierStats {
        let state = self.lock();
        FrontierStats {
            seen: state.seen.len(),
            done: state.done.len(),
            pending: state.todo.len(),
            total: state.total,
            unfinished: state.unfinished,
            dropped: state.dropped,
        }
    }
}
