//! Observable state container shared by every controller.

use std::future::Future;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{PgeError, PgeResult};

/// State container over a `watch` channel.
///
/// Readers get immutable snapshots or subscribe for change notifications;
/// only the owning controller mutates the state, through [`Store::update`].
#[derive(Debug)]
pub struct Store<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every update.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Mutate the state in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(f);
    }

    /// Read a projection of the state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Run `fut` until it finishes or `cancel` fires, whichever comes first.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> PgeResult<T>
where
    F: Future<Output = PgeResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PgeError::Cancelled),
        result = fut => result,
    }
}
