//! Composition root wiring derivation, reconciliation, scheduling and
//! selection behind one externally facing handle.

use std::sync::Arc;
use std::time::Duration;

use chronicle_core::{derive_items, DerivedTimelineItem, TimelineConfig, TimelineItem};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use crate::reconcile::{reconcile, ItemEquivalence, ReconcileOutcome, SignatureEquivalence};
use crate::scheduler::{reveal_next, SlideshowScheduler, SlideshowState};
use crate::select::{active_index, ActiveSelectionController};

struct Inner {
    items: Vec<DerivedTimelineItem>,
    config: TimelineConfig,
    scheduler: SlideshowScheduler,
    selection: ActiveSelectionController,
    equivalence: Box<dyn ItemEquivalence + Send + Sync>,
    timer: Option<JoinHandle<()>>,
}

/// Orchestrates a timeline's derived item state. All mutation goes through
/// this handle; the render layer receives cloned snapshots from [`Self::items`]
/// and routes user interaction back via [`Self::on_user_select`].
///
/// The slideshow timer runs as a Tokio task, so [`Self::start`] must be called
/// from within a runtime. Dropping the orchestrator stops the timer.
pub struct TimelineOrchestrator {
    inner: Arc<Mutex<Inner>>,
}

impl TimelineOrchestrator {
    pub fn new(items: Vec<TimelineItem>, config: TimelineConfig) -> Self {
        Self::with_equivalence(items, config, Box::new(SignatureEquivalence))
    }

    /// Construct with a caller-supplied reconciliation comparator.
    pub fn with_equivalence(
        items: Vec<TimelineItem>,
        config: TimelineConfig,
        equivalence: Box<dyn ItemEquivalence + Send + Sync>,
    ) -> Self {
        let derived = derive_items(&items, &config);
        let selection = ActiveSelectionController::new(active_index(&derived));
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: derived,
                config,
                scheduler: SlideshowScheduler::default(),
                selection,
                equivalence,
                timer: None,
            })),
        }
    }

    /// Read-only snapshot of the derived list.
    pub fn items(&self) -> Vec<DerivedTimelineItem> {
        self.inner.lock().items.clone()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.inner.lock().selection.current()
    }

    pub fn slideshow_state(&self) -> SlideshowState {
        self.inner.lock().scheduler.state()
    }

    /// Current configuration, for the render layer to read mode and
    /// title position from.
    pub fn config(&self) -> TimelineConfig {
        self.inner.lock().config.clone()
    }

    /// Subscribe to active-index change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.inner.lock().selection.subscribe()
    }

    /// Entry point for a new caller-supplied item list, plain or
    /// children-derived (any iterable works).
    pub fn on_external_items_changed<I>(&self, incoming: I)
    where
        I: IntoIterator<Item = TimelineItem>,
    {
        let incoming: Vec<TimelineItem> = incoming.into_iter().collect();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let (next, outcome) = reconcile(
            &inner.items,
            &incoming,
            &inner.config,
            inner.equivalence.as_ref(),
        );
        match outcome {
            ReconcileOutcome::Unchanged => {
                trace!("item update was a no-op");
                return;
            }
            ReconcileOutcome::Replaced => {
                debug!(items = next.len(), "structural replace, timer cleared");
                if let Some(handle) = inner.timer.take() {
                    handle.abort();
                }
                inner.scheduler.disarm();
                inner.items = next;
            }
            ReconcileOutcome::Updated => {
                debug!(items = next.len(), "items reconciled in place");
                inner.items = next;
            }
        }
        inner.selection.publish(&inner.items);
    }

    /// User-driven selection forwarded from the render layer. Out-of-range
    /// indices are silently ignored.
    pub fn on_user_select(&self, index: usize) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.selection.select(&mut inner.items, index) {
            trace!(index, "user selection applied");
        }
    }

    /// Externally controlled active index. Same no-op contract as
    /// [`Self::on_user_select`]; a later user selection supersedes it.
    pub fn set_active_index_from_prop(&self, index: usize) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.selection.select(&mut inner.items, index);
    }

    /// Toggle slideshow mode. Disabling mid-run clears the timer and reveals
    /// every item, since outside slideshow everything is visible.
    pub fn set_slide_show(&self, enabled: bool) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.config.slide_show = enabled;
        if !enabled {
            if let Some(handle) = inner.timer.take() {
                handle.abort();
            }
            inner.scheduler.disarm();
            for item in &mut inner.items {
                item.visible = true;
            }
        }
    }

    /// Arm the slideshow timer. Idempotent: a second call while running is a
    /// no-op. Refuses when slideshow is disabled or the list is empty.
    pub fn start(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if !inner.config.slide_show {
            debug!("start ignored, slideshow disabled");
            return;
        }
        if inner.items.is_empty() {
            debug!("start ignored, no items");
            return;
        }
        if inner.scheduler.is_running() && inner.timer.is_some() {
            return;
        }
        if let Some(handle) = inner.timer.take() {
            handle.abort();
        }
        inner.scheduler.arm();
        let period = Duration::from_millis(inner.config.slide_item_duration_ms.max(1));
        inner.timer = Some(tokio::spawn(run_slideshow(
            Arc::clone(&self.inner),
            period,
        )));
    }

    /// Disarm the slideshow timer. Idempotent.
    pub fn stop(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if let Some(handle) = inner.timer.take() {
            handle.abort();
            inner.scheduler.disarm();
            debug!("slideshow timer stopped");
        }
    }
}

impl Drop for TimelineOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_slideshow(shared: Arc<Mutex<Inner>>, period: Duration) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // An interval fires immediately once; the first reveal waits a full period.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        // The guard must not live across an await; keep the tick synchronous.
        let keep_going = {
            let mut guard = shared.lock();
            let inner = &mut *guard;
            if !inner.scheduler.is_running() {
                false
            } else {
                // Read the list as it is now; a reconciliation may have
                // swapped it between ticks.
                match reveal_next(&mut inner.items) {
                    Some(index) => {
                        trace!(index, "slideshow revealed item");
                        inner.selection.publish(&inner.items);
                        true
                    }
                    None => {
                        debug!("slideshow exhausted, timer cleared");
                        inner.scheduler.exhaust();
                        inner.timer = None;
                        false
                    }
                }
            }
        };
        if !keep_going {
            break;
        }
    }
}
