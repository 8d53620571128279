pub mod sync;
mod workers;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::RacerConfig;
use crate::error::{RaceError, Result};
use crate::wiki::{Direction, WikiClient};
use sync::{DoneLatch, Frontier, MeetingPoint, PredecessorMap};

/// A `Racer` performs one wikipedia race from a start title to an end title.
pub struct Racer {
    start_title: String,
    end_title: String,
    time_limit: Duration,
    config: RacerConfig,
}

/// Shared state of a running race. Each worker holds an `Arc` to it; the
/// context is discarded once the race returns.
pub(crate) struct RaceContext {
    pub(crate) start_title: String,
    pub(crate) end_title: String,
    pub(crate) config: RacerConfig,
    pub(crate) client: WikiClient,
    /// child -> parent edges discovered by the forward search.
    pub(crate) path_from_start: PredecessorMap,
    /// child -> parent edges discovered by the backward search.
    pub(crate) path_from_end: PredecessorMap,
    pub(crate) forward_links: Frontier,
    pub(crate) backward_links: Frontier,
    pub(crate) meeting_point: MeetingPoint,
    pub(crate) done: DoneLatch,
    /// First fatal error, captured by whichever worker closes the latch.
    pub(crate) error: Mutex<Option<RaceError>>,
    pub(crate) rng: Mutex<StdRng>,
}

impl RaceContext {
    fn new(racer: &Racer) -> Self {
        let rng = match racer.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            start_title: racer.start_title.clone(),
            end_title: racer.end_title.clone(),
            client: WikiClient::new(racer.config.api_url.clone()),
            config: racer.config.clone(),
            path_from_start: PredecessorMap::new(),
            path_from_end: PredecessorMap::new(),
            forward_links: Frontier::new(),
            backward_links: Frontier::new(),
            meeting_point: MeetingPoint::new(),
            done: DoneLatch::new(),
            error: Mutex::new(None),
            rng: Mutex::new(rng),
        }
    }

    /// Walks both predecessor maps through the meeting point to produce
    /// start -> ... -> meeting -> ... -> end.
    fn reconstruct_path(&self, meeting: &str) -> Vec<String> {
        let mut path = Vec::new();

        let mut current = meeting.to_string();
        loop {
            path.push(current.clone());
            match self.path_from_start.get(&current) {
                Some(parent) if !parent.is_empty() => current = parent,
                _ => break,
            }
        }
        path.reverse();
        // The meeting point opens the walk below; drop the duplicate.
        path.pop();

        let mut current = meeting.to_string();
        loop {
            path.push(current.clone());
            match self.path_from_end.get(&current) {
                Some(parent) if !parent.is_empty() => current = parent,
                _ => break,
            }
        }
        path
    }
}

impl Racer {
    pub fn new(
        start_title: impl Into<String>,
        end_title: impl Into<String>,
        time_limit: Duration,
        config: RacerConfig,
    ) -> Self {
        Self {
            start_title: start_title.into(),
            end_title: end_title.into(),
            time_limit,
            config,
        }
    }

    /// Runs the race. Returns the discovered path, `None` if the deadline
    /// expired before the fronts met, or the first fatal worker error.
    pub async fn run(&self) -> Result<Option<Vec<String>>> {
        let ctx = Arc::new(RaceContext::new(self));

        ctx.path_from_start.put(&self.start_title, "");
        ctx.path_from_end.put(&self.end_title, "");
        ctx.forward_links.push(self.start_title.clone());
        ctx.backward_links.push(self.end_title.clone());

        for _ in 0..self.config.num_forward_workers {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.link_worker(Direction::Forward).await });
        }
        for _ in 0..self.config.num_backward_workers {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.link_worker(Direction::Backward).await });
        }

        let watcher = Arc::clone(&ctx);
        let time_limit = self.time_limit;
        tokio::spawn(async move {
            tokio::select! {
                _ = watcher.done.closed() => {}
                _ = tokio::time::sleep(time_limit) => {
                    watcher.done.close();
                }
            }
        });

        ctx.done.closed().await;

        // Workers may still be mid-fetch; anything they find from here on
        // cannot win the write-once meeting point or error slot.
        if let Some(err) = ctx.error.lock().take() {
            return Err(err);
        }
        let Some(meeting) = ctx.meeting_point.get() else {
            debug!(
                explored_from_start = ctx.path_from_start.len(),
                explored_from_end = ctx.path_from_end.len(),
                "deadline expired before the fronts met"
            );
            return Ok(None);
        };
        Ok(Some(ctx.reconstruct_path(&meeting)))
    }
}
