use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Thread-safe title -> predecessor-title map. Keys are never overwritten;
/// the first writer wins.
#[derive(Default)]
pub struct PredecessorMap {
    inner: RwLock<FxHashMap<String, String>>,
}

impl PredecessorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `child -> parent` if `child` is absent. Returns whether the
    /// insertion happened.
    pub fn put(&self, child: &str, parent: &str) -> bool {
        let mut map = self.inner.write();
        if map.contains_key(child) {
            return false;
        }
        map.insert(child.to_string(), parent.to_string());
        true
    }

    pub fn get(&self, title: &str) -> Option<String> {
        self.inner.read().get(title).cloned()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.inner.read().contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Unbounded queue of titles awaiting expansion in one direction. Any
/// worker of the direction may push or pop; the receiver is shared behind
/// an async mutex.
pub struct Frontier {
    tx: mpsc::UnboundedSender<String>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
}

impl Frontier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    pub fn push(&self, title: String) {
        // The receiver lives as long as this struct, so the send cannot fail.
        let _ = self.tx.send(title);
    }

    /// Waits for the next title, or returns `None` once the latch closes.
    pub async fn pop(&self, done: &DoneLatch) -> Option<String> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            _ = done.closed() => None,
            title = rx.recv() => title,
        }
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

/// Write-once slot for the title where the two search fronts met.
#[derive(Default)]
pub struct MeetingPoint {
    slot: Mutex<Option<String>>,
}

impl MeetingPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// First writer wins; later calls are no-ops.
    pub fn set(&self, title: &str) -> bool {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(title.to_string());
        true
    }

    pub fn get(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

/// Broadcast one-shot signal instructing every worker to exit. Exactly one
/// caller observes `close()` returning true, no matter how many race to it.
pub struct DoneLatch {
    token: CancellationToken,
    closed: AtomicBool,
}

impl DoneLatch {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Closes the latch. Returns true for the single caller that performed
    /// the transition.
    pub fn close(&self) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.token.cancel();
            return true;
        }
        false
    }

    pub async fn closed(&self) {
        self.token.cancelled().await;
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for DoneLatch {
    fn default() -> Self {
        Self::new()
    }
}
