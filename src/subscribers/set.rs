//! # SubscriberSet: fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers
//! **without awaiting** their processing: it only waits for queue space.
//!
//! ## What it guarantees
//! - Every event reaches every live subscriber; a full queue applies backpressure.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and published as `SubscriberPanicked`.
//! - `shutdown()` drains every queue before returning.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No delivery to a subscriber whose worker is gone; `emit` reports the miss.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};

use super::Subscribe;

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        tracing::warn!(subscriber = sub.name(), %info, "subscriber panicked");
                        worker_bus.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one event to all subscribers, waiting while a queue is full.
    ///
    /// Returns how many subscribers missed the event. A subscriber misses it
    /// only when its queue is **closed**; a `SubscriberOverflow` is published
    /// then (never for overflow events themselves).
    pub async fn emit(&self, event: &Event) -> usize {
        let ev = Arc::new(event.clone());
        let is_overflow_evt = matches!(event.kind, EventKind::SubscriberOverflow);
        let mut missed = 0;

        for channel in &self.channels {
            if channel.sender.send(Arc::clone(&ev)).await.is_ok() {
                continue;
            }
            missed += 1;
            tracing::warn!(subscriber = channel.name, seq = event.seq, "subscriber dropped event");
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, "closed"));
            }
        }
        missed
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.seq);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn shutdown_drains_queues_in_order() {
        let bus = Bus::new(16);
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe>], bus);

        let a = Event::new(EventKind::RoundStarted);
        let b = Event::new(EventKind::MusicStopped);
        assert_eq!(set.emit(&a).await, 0);
        assert_eq!(set.emit(&b).await, 0);
        set.shutdown().await;

        assert_eq!(*rec.seen.lock().unwrap(), vec![a.seq, b.seq]);
    }

    #[tokio::test]
    async fn panics_are_reported_on_the_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Exploder) as Arc<dyn Subscribe>], bus);

        set.emit(&Event::new(EventKind::MusicStopped)).await;
        set.shutdown().await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert!(ev.reason.as_deref().unwrap().contains("boom"));
    }

    struct Slow {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Slow {
        async fn on_event(&self, ev: &Event) {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            self.seen.lock().unwrap().push(ev.seq);
        }

        fn name(&self) -> &'static str {
            "slow"
        }

        fn queue_capacity(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn full_queues_apply_backpressure_instead_of_dropping() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let slow = Arc::new(Slow {
            seen: Mutex::new(Vec::new()),
        });
        let set = SubscriberSet::new(vec![slow.clone() as Arc<dyn Subscribe>], bus);

        let mut sent = Vec::new();
        for _ in 0..20 {
            let ev = Event::new(EventKind::ChairSecured).with_player(1);
            assert_eq!(set.emit(&ev).await, 0);
            sent.push(ev.seq);
        }
        set.shutdown().await;

        assert_eq!(*slow.seen.lock().unwrap(), sent);
        assert!(rx.try_recv().is_err());
    }
}
