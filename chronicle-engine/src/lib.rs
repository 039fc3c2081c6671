//! Orchestration engine over `chronicle-core`: list reconciliation, slideshow
//! scheduling and active-item selection, composed by [`TimelineOrchestrator`].

pub mod orchestrator;
pub mod reconcile;
pub mod scheduler;
pub mod select;

pub use orchestrator::TimelineOrchestrator;
pub use reconcile::{reconcile, ItemEquivalence, ReconcileOutcome, SignatureEquivalence};
pub use scheduler::{reveal_next, SlideshowScheduler, SlideshowState};
pub use select::{active_index, ActiveSelectionController};
