//! # Delivery progress of the event listener.
//!
//! The bus never blocks its publishers, so a producer that emits faster than
//! the listener drains would overrun the ring buffer. [`Delivered`] lets the
//! listener record how far it got; a producer holding the matching
//! [`Backlog`] waits on it before publishing the next burst.
//!
//! ```text
//! listener:     recv(ev) ─► SubscriberSet::emit(&ev) ─► Delivered::mark(ev.seq)
//! coordinator:  Backlog::drained_through(seq) ─► next round
//! ```

use tokio::sync::watch;

/// Listener side: highest sequence number handed to the subscribers.
#[derive(Debug)]
pub struct Delivered {
    tx: watch::Sender<u64>,
}

/// Producer side: waits until the listener caught up.
#[derive(Clone, Debug)]
pub struct Backlog {
    rx: watch::Receiver<u64>,
}

impl Backlog {
    /// Creates a connected pair, nothing delivered yet.
    pub fn channel() -> (Delivered, Backlog) {
        let (tx, rx) = watch::channel(0);
        (Delivered { tx }, Backlog { rx })
    }

    /// Resolves once every event up to `seq` was delivered.
    ///
    /// Also resolves when the listener is gone: there is nobody left to wait for.
    pub async fn drained_through(&mut self, seq: u64) {
        let _ = self.rx.wait_for(|last| *last >= seq).await;
    }

    /// Highest sequence number delivered so far.
    pub fn delivered(&self) -> u64 {
        *self.rx.borrow()
    }
}

impl Delivered {
    /// Records that the event `seq` reached the subscribers.
    pub fn mark(&self, seq: u64) {
        self.tx.send_if_modified(|last| {
            if seq > *last {
                *last = seq;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn waits_until_the_listener_catches_up() {
        let (delivered, mut backlog) = Backlog::channel();
        let waiter = tokio::spawn(async move {
            backlog.drained_through(7).await;
            backlog.delivered()
        });

        delivered.mark(3);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        delivered.mark(9);
        assert_eq!(waiter.await.unwrap(), 9);
    }

    #[test]
    fn progress_never_goes_back() {
        let (delivered, backlog) = Backlog::channel();
        delivered.mark(5);
        delivered.mark(2);
        assert_eq!(backlog.delivered(), 5);
    }

    #[tokio::test]
    async fn a_gone_listener_releases_waiters() {
        let (delivered, mut backlog) = Backlog::channel();
        drop(delivered);
        backlog.drained_through(u64::MAX).await;
        assert_eq!(backlog.delivered(), 0);
    }
}
