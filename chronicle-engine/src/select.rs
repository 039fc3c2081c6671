//! Single source of truth for the active index, plus host notification.

use chronicle_core::DerivedTimelineItem;
use tokio::sync::watch;

/// Index of the single active item; `None` for an empty list.
pub fn active_index(items: &[DerivedTimelineItem]) -> Option<usize> {
    items.iter().position(|item| item.active)
}

/// Owns the active-index notification channel and applies selection requests
/// against the derived list. Every effective change is published exactly once;
/// out-of-range and already-active requests publish nothing.
pub struct ActiveSelectionController {
    tx: watch::Sender<Option<usize>>,
}

impl ActiveSelectionController {
    pub fn new(initial: Option<usize>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Hand the host a receiver for selection-change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<usize> {
        *self.tx.borrow()
    }

    /// Make `index` the single active item. Returns whether anything changed.
    pub fn select(&self, items: &mut [DerivedTimelineItem], index: usize) -> bool {
        if index >= items.len() || items[index].active {
            return false;
        }
        for (position, item) in items.iter_mut().enumerate() {
            item.active = position == index;
        }
        self.publish(items);
        true
    }

    /// Republish the active index read from `items`, notifying only on an
    /// effective change. Called after reconciliation and scheduler ticks,
    /// which move the flags without going through [`Self::select`].
    pub fn publish(&self, items: &[DerivedTimelineItem]) {
        let index = active_index(items);
        self.tx.send_if_modified(|current| {
            if *current == index {
                false
            } else {
                *current = index;
                true
            }
        });
    }
}
