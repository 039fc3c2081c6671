//! Slideshow state machine and the per-tick reveal rule.

use chronicle_core::DerivedTimelineItem;

/// Lifecycle of the slideshow timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideshowState {
    /// No timer armed.
    #[default]
    Idle,
    /// Timer armed, items are still being revealed.
    Running,
    /// Terminal: every item has been revealed and the timer was cleared.
    Exhausted,
}

/// Tracks which slideshow state the owning orchestrator is in. The timer task
/// itself is owned by the orchestrator; this struct only guards transitions.
#[derive(Debug, Default)]
pub struct SlideshowScheduler {
    state: SlideshowState,
}

impl SlideshowScheduler {
    pub fn state(&self) -> SlideshowState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SlideshowState::Running
    }

    pub fn arm(&mut self) {
        self.state = SlideshowState::Running;
    }

    pub fn disarm(&mut self) {
        self.state = SlideshowState::Idle;
    }

    pub fn exhaust(&mut self) {
        self.state = SlideshowState::Exhausted;
    }
}

/// Reveal the first hidden item and make it the single active one.
///
/// Returns the activated index, or `None` when every item is already revealed
/// and the caller should clear the timer.
pub fn reveal_next(items: &mut [DerivedTimelineItem]) -> Option<usize> {
    let next = items.iter().position(|item| !item.visible)?;
    for (index, item) in items.iter_mut().enumerate() {
        if index == next {
            item.visible = true;
        }
        item.active = index == next;
    }
    Some(next)
}
