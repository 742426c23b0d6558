//! Fetch-join primitive
//!
//! A counter of in-flight operations. Entering hands out a [`GroupTicket`]
//! and the ticket leaves the group when dropped, so an entry can never go
//! unmatched even on early returns or task panics.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

struct Inner {
    pending: Mutex<usize>,
    drained: Notify,
}

/// Group of pending fetches
#[derive(Clone)]
pub struct FetchGroup {
    inner: Arc<Inner>,
}

/// Proof of one pending entry; leaves the group on drop
#[must_use = "dropping the ticket leaves the group immediately"]
pub struct GroupTicket {
    inner: Arc<Inner>,
}

impl FetchGroup {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(0),
                drained: Notify::new(),
            }),
        }
    }

    /// Register one pending operation
    pub fn enter(&self) -> GroupTicket {
        *self.inner.pending.lock() += 1;
        GroupTicket {
            inner: self.inner.clone(),
        }
    }

    /// Number of entries not yet matched by a leave
    pub fn pending(&self) -> usize {
        *self.inner.pending.lock()
    }

    /// Resolve once every ticket has left; immediate when none are out
    pub async fn wait(&self) {
        loop {
            let drained = self.inner.drained.notified();
            tokio::pin!(drained);
            // Register before checking so a leave in between is not missed
            drained.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Run `f` on a new task after the group drains
    pub fn notify<F>(&self, f: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let group = self.clone();
        tokio::spawn(async move {
            group.wait().await;
            f();
        })
    }
}

impl Default for FetchGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTicket {
    /// Leave explicitly
    pub fn leave(self) {}
}

impl Drop for GroupTicket {
    fn drop(&mut self) {
        let mut pending = self.inner.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.inner.drained.notify_waiters();
        }
    }
}
