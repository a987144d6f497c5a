use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::sync::OnceCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightState {
    Empty,
    InFlight,
    Resolved,
}

/// Memoized asynchronous value shared by concurrent callers.
///
/// At most one initializer runs at a time; callers arriving while it runs wait
/// for it and then observe the very same `Arc<T>`. A failed (or dropped)
/// initializer leaves the cell empty so the next caller starts over.
pub struct SingleFlight<T> {
    cell: OnceCell<Arc<T>>,
    in_flight: AtomicBool,
}

impl<T> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// A cell that is already resolved; no initializer will ever run.
    pub fn resolved(value: T) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(value))),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    pub fn state(&self) -> FlightState {
        if self.cell.initialized() {
            FlightState::Resolved
        } else if self.in_flight.load(Ordering::Acquire) {
            FlightState::InFlight
        } else {
            FlightState::Empty
        }
    }

    pub async fn get_or_try_init<E, F, Fut>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(Arc::clone(value));
        }

        let value = self
            .cell
            .get_or_try_init(move || async move {
                let _flight = InFlight::enter(&self.in_flight);
                init().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(value))
    }
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("state", &self.state())
            .finish()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
