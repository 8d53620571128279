use std::sync::Arc;

use rand::Rng;
use tracing::{debug, error};

use crate::error::{RaceError, Result};
use crate::race::sync::{Frontier, PredecessorMap};
use crate::race::RaceContext;
use crate::wiki::{Direction, Page};

impl RaceContext {
    fn frontier(&self, direction: Direction) -> &Frontier {
        match direction {
            Direction::Forward => &self.forward_links,
            Direction::Backward => &self.backward_links,
        }
    }

    /// The map owned by this direction and the opposing one.
    fn maps(&self, direction: Direction) -> (&PredecessorMap, &PredecessorMap) {
        match direction {
            Direction::Forward => (&self.path_from_start, &self.path_from_end),
            Direction::Backward => (&self.path_from_end, &self.path_from_start),
        }
    }

    /// Worker loop shared by both directions: pull a title off the frontier,
    /// expand its neighbors, repeat until the done latch closes.
    pub(crate) async fn link_worker(self: Arc<Self>, direction: Direction) {
        loop {
            let Some(title) = self.frontier(direction).pop(&self.done).await else {
                return;
            };
            if let Err(err) = self.expand_title(direction, &title).await {
                self.handle_worker_err(err);
                return;
            }
            if self.done.is_closed() {
                return;
            }
        }
    }

    /// Fetches every page of neighbors for `title` and feeds them through
    /// `scan_page`. Pagination stops after the first page unless
    /// `explore_all_links` is set.
    async fn expand_title(&self, direction: Direction, title: &str) -> Result<()> {
        // Half the time, walk a page's links in reverse-alphabetical order.
        // The API has no equivalent knob for linkshere.
        let descending = direction == Direction::Forward && self.rng.lock().gen_bool(0.5);
        let mut continuation: Option<(String, String)> = None;

        loop {
            let cursors = continuation
                .as_ref()
                .map(|(token, cursor)| (token.as_str(), cursor.as_str()));
            let response = self
                .client
                .fetch_neighbors(
                    direction,
                    title,
                    descending,
                    self.config.explore_only_articles,
                    cursors,
                )
                .await?;

            // The fetch is the one wait the latch cannot interrupt, so
            // re-check before doing anything with the result.
            if self.done.is_closed() {
                return Ok(());
            }

            for page in response.pages() {
                self.scan_page(direction, page)?;
                if self.done.is_closed() {
                    return Ok(());
                }
            }

            let Some(next) = response.continuation else {
                break;
            };
            if !self.config.explore_all_links {
                break;
            }
            let token = next.token.ok_or(RaceError::MissingCursor("continue"))?;
            let cursor = match direction {
                Direction::Forward => next
                    .plcontinue
                    .ok_or(RaceError::MissingCursor("plcontinue"))?,
                Direction::Backward => next
                    .lhcontinue
                    .ok_or(RaceError::MissingCursor("lhcontinue"))?,
            };
            continuation = Some((token, cursor));
        }
        Ok(())
    }

    /// Records the neighbors of one page entry: either a neighbor is already
    /// known to the opposing front (the race is won) or it joins this
    /// front's map and frontier.
    fn scan_page(&self, direction: Direction, page: &Page) -> Result<()> {
        let parent = page.title.as_deref().ok_or(RaceError::MissingTitle)?;
        if page.missing {
            if parent == self.start_title || parent == self.end_title {
                return Err(RaceError::MissingPage(parent.to_string()));
            }
            // MediaWiki sometimes pads responses with placeholder entries.
            return Ok(());
        }
        // A page with no neighbors in this direction simply omits the key.
        let Some(neighbors) = page.neighbors(direction) else {
            return Ok(());
        };

        let (own_map, other_map) = self.maps(direction);
        for neighbor in neighbors {
            let child = neighbor.title.as_str();
            if other_map.contains(child) {
                debug!("found intersection at {child} in {direction:?} worker");
                // The opposing front may have written this key first; the
                // write-once map keeps whichever edge won.
                own_map.put(child, parent);
                self.meeting_point.set(child);
                self.done.close();
                return Ok(());
            }
            if child != parent && own_map.put(child, parent) {
                self.frontier(direction).push(child.to_string());
            }
        }
        Ok(())
    }

    /// Captures the first fatal error and closes the latch. Errors that lose
    /// the close race are logged and dropped.
    fn handle_worker_err(&self, err: RaceError) {
        error!("error occurred in worker: {err}");
        let mut captured = self.error.lock();
        if self.done.close() {
            *captured = Some(err);
        }
    }
}
