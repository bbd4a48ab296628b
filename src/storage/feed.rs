use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Identity of one storage context.
pub type ContextId = Uuid;

/// A value under `key` was changed by `origin`.
///
/// `origin` is the nil id when the writer is outside this process and
/// cannot be identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub origin: ContextId,
}

/// Receiving end of a subscription.
///
/// Dropping the feed unsubscribes; the publisher prunes it on its next write.
pub struct ChangeFeed {
    rx: UnboundedReceiver<StorageChange>,
}

impl ChangeFeed {
    /// Wait for the next external change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<StorageChange> {
        self.rx.recv().await
    }

    /// Non-blocking poll, for tests and synchronous callers.
    pub fn try_changed(&mut self) -> Option<StorageChange> {
        self.rx.try_recv().ok()
    }
}

struct Subscriber {
    key: String,
    context: ContextId,
    tx: UnboundedSender<StorageChange>,
}

/// Fan-out of change notifications to subscribed contexts.
#[derive(Default)]
pub(crate) struct Subscribers {
    inner: Mutex<Vec<Subscriber>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self, key: &str, context: ContextId) -> ChangeFeed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().push(Subscriber {
            key: key.to_string(),
            context,
            tx,
        });
        ChangeFeed { rx }
    }

    /// Deliver `change` to every subscriber of its key except its origin.
    pub(crate) fn publish(&self, change: &StorageChange) {
        let mut subscribers = self.inner.lock();
        subscribers.retain(|sub| {
            if sub.key != change.key || sub.context == change.origin {
                return !sub.tx.is_closed();
            }
            sub.tx.send(change.clone()).is_ok()
        });
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}
