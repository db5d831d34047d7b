//! Observable fetch state for front ends.
//!
//! A session owns one [`StateCell`] per thing it shows. Starting a fetch
//! resets the cell to `Loading`, spawns a task that publishes the stream's
//! states, and aborts whatever fetch the cell was running before. A
//! superseded fetch can never overwrite a newer one: every publish is
//! checked against the cell's generation under the watch lock.

pub mod detail;
pub mod map;
pub mod search;

use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::fetch::FetchState;

pub use detail::DetailSession;
pub use map::MapSession;
pub use search::SearchSession;

/// Latest-value holder for one fetch.
pub struct StateCell<T> {
    tx: watch::Sender<FetchState<T>>,
    generation: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> StateCell<T> {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(FetchState::Loading);
        Arc::new(Self {
            tx,
            generation: AtomicU64::new(0),
            task: Mutex::new(None),
        })
    }

    /// Observe the current state and its changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> FetchState<T>
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().is_loading()
    }

    /// Start a fetch, superseding the current one.
    pub fn run<S>(self: &Arc<Self>, states: S)
    where
        S: Stream<Item = FetchState<T>> + Send + 'static,
    {
        let generation = self.begin();
        let cell = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut states = pin!(states);
            while let Some(state) = states.next().await {
                let terminal = state.is_terminal();
                if !cell.publish(generation, state) {
                    debug!(generation, "Dropping result of superseded fetch");
                    return;
                }
                if terminal {
                    return;
                }
            }
        });

        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Abort any fetch and go back to `Loading`.
    pub fn reset(&self) {
        self.cancel();
        self.begin();
    }

    /// Abort any fetch, keeping the current state.
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Bump the generation and publish `Loading` in one step.
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading;
        });
        generation
    }

    /// Publish if `generation` is still current.
    fn publish(&self, generation: u64, next: FetchState<T>) -> bool {
        self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Wait until the observed fetch reaches `Success` or `Error`.
///
/// Returns the last seen state if the cell is dropped first.
pub async fn settled<T: Clone>(rx: &mut watch::Receiver<FetchState<T>>) -> FetchState<T> {
    if let Ok(state) = rx.wait_for(FetchState::is_terminal).await {
        return (*state).clone();
    }
    let state = rx.borrow().clone();
    state
}
