//! Single-slot hand-off from the perception loop to a display consumer.
//!
//! The producer never waits for the consumer: a put into a full slot evicts
//! the unread item. The consumer either gets the newest item or nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

struct Slot<T> {
    item: Mutex<Option<T>>,
    evicted: AtomicU64,
}

/// Create a connected sender/receiver pair around an empty slot.
pub fn frame_channel<T>() -> (FrameSender<T>, FrameReceiver<T>) {
    let slot = Arc::new(Slot {
        item: Mutex::new(None),
        evicted: AtomicU64::new(0),
    });
    (
        FrameSender { slot: slot.clone() },
        FrameReceiver { slot },
    )
}

pub struct FrameSender<T> {
    slot: Arc<Slot<T>>,
}

impl<T> FrameSender<T> {
    /// Store `item`, replacing anything unread. Returns true when an unread
    /// item was evicted.
    pub fn put(&self, item: T) -> bool {
        let evicted = self.slot.item.lock().replace(item).is_some();
        if evicted {
            self.slot.evicted.fetch_add(1, Ordering::Relaxed);
        }
        evicted
    }
}

pub struct FrameReceiver<T> {
    slot: Arc<Slot<T>>,
}

impl<T> FrameReceiver<T> {
    /// Take the newest item, leaving the slot empty.
    pub fn try_take(&self) -> Option<T> {
        self.slot.item.lock().take()
    }

    /// Items overwritten before anyone read them.
    pub fn evicted(&self) -> u64 {
        self.slot.evicted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_yields_nothing() {
        let (_tx, rx) = frame_channel::<u32>();
        assert_eq!(rx.try_take(), None);
    }

    #[test]
    fn test_fast_pushes_leave_only_the_last() {
        let (tx, rx) = frame_channel();
        for i in 0..10u32 {
            tx.put(i);
        }
        assert_eq!(rx.try_take(), Some(9));
        assert_eq!(rx.try_take(), None);
        assert_eq!(rx.evicted(), 9);
    }

    #[test]
    fn test_put_reports_eviction() {
        let (tx, rx) = frame_channel();
        assert!(!tx.put("a"));
        assert!(tx.put("b"));
        assert_eq!(rx.try_take(), Some("b"));
        assert!(!tx.put("c"));
    }

    #[test]
    fn test_consumer_sees_increasing_items_under_contention() {
        let (tx, rx) = frame_channel::<u64>();
        let producer = std::thread::spawn(move || {
            for i in 1..=50_000u64 {
                tx.put(i);
            }
        });
        let mut last = 0;
        let mut seen = 0u64;
        while !producer.is_finished() || seen == 0 {
            if let Some(v) = rx.try_take() {
                assert!(v > last, "went backwards: {v} after {last}");
                last = v;
                seen += 1;
            }
        }
        producer.join().unwrap();
        if let Some(v) = rx.try_take() {
            assert!(v > last);
            last = v;
        }
        assert_eq!(last, 50_000);
    }
}
