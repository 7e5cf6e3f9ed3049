//! Superseded-action guard.
//!
//! Each user action takes a [`Ticket`]. Starting a newer action invalidates
//! every older ticket, so a slow response for a stale action can be dropped
//! instead of overwriting newer state. The request itself is not aborted.
//!
//! Meant for interactive front ends that keep several requests in flight.
//! A one-shot caller such as the `reservas` CLI awaits each call in turn and
//! has nothing to supersede.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ActionSlot {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl ActionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new action, superseding all earlier ones.
    pub fn begin(&self) -> Ticket {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            id,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Run `fut` as a new action. Returns `None` when a newer action started
    /// before it completed.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.begin();
        let output = fut.await;
        ticket.is_current().then_some(output)
    }
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let slot = ActionSlot::new();
        let first = slot.begin();
        assert!(first.is_current());
        let second = slot.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[tokio::test]
    async fn stale_result_is_discarded() {
        let slot = ActionSlot::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<&str>();

        let stale = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.run(async { rx.await.unwrap() }).await })
        };
        while slot.generation.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let fresh = slot.run(async { "second card" }).await;
        tx.send("first card").unwrap();

        assert_eq!(fresh, Some("second card"));
        assert_eq!(stale.await.unwrap(), None);
    }
}
