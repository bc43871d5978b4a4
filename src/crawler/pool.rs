//! Worker pool: N concurrent fetch loops sharing one frontier
//!
//! Each worker repeatedly takes a URL, waits the politeness delay, fetches
//! the page, feeds the discovered links back into the frontier and
//! acknowledges the item. Failures are caught per item, panics included:
//! they are logged and counted, the item is still acknowledged and the
//! worker moves on, so a bad page can never keep [`Frontier::join`] from
//! returning.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::url::UrlFilter;
use crate::HarvestError;
use futures::FutureExt;
use reqwest::Client;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Completed items between two progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// Worker pool settings
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub workers: usize,
    pub politeness_delay: Duration,
}

/// Outcome counters shared by every worker of a pool
#[derive(Debug, Default)]
pub struct PoolCounters {
    processed: AtomicUsize,
    errors: AtomicUsize,
    panics: AtomicUsize,
}

impl PoolCounters {
    /// Items taken and acknowledged, successful or not
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Items whose fetch or extraction failed, panicked items included
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn panics(&self) -> usize {
        self.panics.load(Ordering::Relaxed)
    }
}

/// Final tallies of a pool after shutdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub processed: usize,
    pub errors: usize,
    /// Items that panicked, plus workers that died outside an item
    pub panicked: usize,
}

/// Acknowledges one dequeued item when dropped
///
/// Tying the ack to a guard keeps the one-ack-per-dequeue pairing intact on
/// every exit path of an iteration.
struct AckGuard<'a> {
    frontier: &'a Frontier,
    counters: &'a PoolCounters,
}

impl Drop for AckGuard<'_> {
    fn drop(&mut self) {
        self.counters.processed.fetch_add(1, Ordering::Relaxed);
        self.frontier.ack_item();
    }
}

/// How one dequeued item ended
enum ItemOutcome {
    Crawled(usize),
    Failed(HarvestError),
    Panicked(String),
}

/// Running set of fetch loops
pub struct WorkerPool {
    tasks: JoinSet<()>,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Spawns `config.workers` fetch loops on the current runtime
    ///
    /// Workers start pulling immediately, so the seed(s) should already be
    /// admitted to `frontier`.
    pub fn start(
        frontier: Arc<Frontier>,
        filter: Arc<UrlFilter>,
        client: Client,
        config: PoolConfig,
    ) -> Self {
        let links_to = frontier.clone();
        Self::with_handler(frontier, config, move |url: String| {
            let frontier = links_to.clone();
            let filter = filter.clone();
            let client = client.clone();
            async move { crawl_page(&client, &filter, &frontier, &url).await }
        })
    }

    /// Spawns workers that run `handler` on every dequeued URL
    ///
    /// The handler returns how many URLs it enqueued.
    fn with_handler<H, Fut>(frontier: Arc<Frontier>, config: PoolConfig, handler: H) -> Self
    where
        H: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, HarvestError>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let counters = Arc::new(PoolCounters::default());
        let handler = Arc::new(handler);
        let mut tasks = JoinSet::new();

        for id in 0..config.workers {
            tasks.spawn(worker_loop(
                id,
                frontier.clone(),
                handler.clone(),
                config.politeness_delay,
                cancel.clone(),
                counters.clone(),
            ));
        }

        tracing::debug!("Started {} workers", config.workers);

        Self {
            tasks,
            cancel,
            counters,
        }
    }

    pub fn counters(&self) -> &PoolCounters {
        &self.counters
    }

    /// Cancels every worker and waits for all of them to exit
    ///
    /// Call this only after [`Frontier::join`] has returned: at that point
    /// every worker is parked in `take_next`, the only place where workers
    /// observe cancellation.
    pub async fn shutdown(mut self) -> PoolSummary {
        self.cancel.cancel();

        let mut panicked = 0;
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!("Worker panicked: {}", e);
                    panicked += 1;
                }
            }
        }

        PoolSummary {
            processed: self.counters.processed(),
            errors: self.counters.errors(),
            panicked: panicked + self.counters.panics(),
        }
    }
}

async fn worker_loop<H, Fut>(
    id: usize,
    frontier: Arc<Frontier>,
    handler: Arc<H>,
    delay: Duration,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
) where
    H: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<usize, HarvestError>> + Send + 'static,
{
    loop {
        let url = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            url = frontier.take_next() => url,
        };

        let _ack = AckGuard {
            frontier: &frontier,
            counters: &counters,
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match run_item(handler(url.clone())).await {
            ItemOutcome::Crawled(enqueued) => {
                tracing::debug!("[worker {}] {} -> {} new URLs", id, url, enqueued);
            }
            ItemOutcome::Failed(e) => {
                counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("[worker {}] Failed to crawl {}: {}", id, url, e);
            }
            ItemOutcome::Panicked(message) => {
                counters.errors.fetch_add(1, Ordering::Relaxed);
                counters.panics.fetch_add(1, Ordering::Relaxed);
                tracing::error!("[worker {}] Panicked while crawling {}: {}", id, url, message);
            }
        }

        // +1 accounts for this item, acknowledged when `_ack` drops
        let processed = counters.processed() + 1;
        if processed % PROGRESS_INTERVAL == 0 {
            let stats = frontier.stats();
            tracing::info!(
                "Progress: {} processed, {} pending, {} seen, {} errors",
                processed,
                stats.pending,
                stats.seen,
                counters.errors()
            );
        }
    }

    tracing::trace!("[worker {}] cancelled", id);
}

/// Drives one item to completion, turning a panic into an outcome
async fn run_item<F>(item: F) -> ItemOutcome
where
    F: Future<Output = Result<usize, HarvestError>>,
{
    match AssertUnwindSafe(item).catch_unwind().await {
        Ok(Ok(enqueued)) => ItemOutcome::Crawled(enqueued),
        Ok(Err(e)) => ItemOutcome::Failed(e),
        Err(payload) => ItemOutcome::Panicked(panic_message(payload.as_ref()).to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Fetches one page and admits the links it references
///
/// Returns how many of the discovered links were newly enqueued.
async fn crawl_page(
    client: &Client,
    filter: &UrlFilter,
    frontier: &Frontier,
    url: &str,
) -> Result<usize, HarvestError> {
    let page = fetch_page(client, url).await?;
    let base = Url::parse(&page.final_url)?;

    let links = extract_links(&page.body, &base, |base, href| filter.filter(base, href));
    let enqueued = frontier.admit(links);
    frontier.mark_done(url);

    Ok(enqueued)
}
