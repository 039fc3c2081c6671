//! Maps a newly supplied raw item list onto existing derived state.

use std::collections::HashMap;

use chronicle_core::{derive_items, new_item_id, DerivedTimelineItem, TimelineConfig, TimelineItem};
use tracing::debug;

/// Classification of a reconciliation pass, used by the orchestrator to decide
/// whether to skip the update or tear down the slideshow timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The incoming list is element-wise equal to the current one.
    Unchanged,
    /// At least one entry matched; state was carried over in place.
    Updated,
    /// No entry matched and the item count changed; prior state was discarded.
    Replaced,
}

/// Equivalence test between a previously derived item and a raw candidate at
/// the same ordinal position. Pluggable so callers with richer content can
/// widen or narrow the signature.
pub trait ItemEquivalence {
    fn matches(&self, previous: &TimelineItem, candidate: &TimelineItem) -> bool;
}

/// Default signature: title plus card title.
#[derive(Debug, Default)]
pub struct SignatureEquivalence;

impl ItemEquivalence for SignatureEquivalence {
    fn matches(&self, previous: &TimelineItem, candidate: &TimelineItem) -> bool {
        previous.title == candidate.title && previous.card_title == candidate.card_title
    }
}

/// Reconcile `incoming` against `previous`, preserving `id`/`visible`/`active`
/// for equivalent entries and assigning fresh derived fields to the rest.
///
/// Matching rules, in order:
/// - an explicit external `key` matches by key alone, regardless of position;
/// - otherwise an item matches the entry at the same ordinal position when the
///   equivalence signature holds and neither side carries a key.
/// Each previous entry is consumed at most once, so duplicate keys cannot
/// clone an identity.
pub fn reconcile(
    previous: &[DerivedTimelineItem],
    incoming: &[TimelineItem],
    config: &TimelineConfig,
    equivalence: &dyn ItemEquivalence,
) -> (Vec<DerivedTimelineItem>, ReconcileOutcome) {
    if previous.len() == incoming.len()
        && previous
            .iter()
            .zip(incoming)
            .all(|(old, new)| old.item == *new)
    {
        return (previous.to_vec(), ReconcileOutcome::Unchanged);
    }

    let mut by_key: HashMap<&str, usize> = HashMap::new();
    for (index, derived) in previous.iter().enumerate() {
        if let Some(key) = derived.item.key.as_deref() {
            by_key.entry(key).or_insert(index);
        }
    }

    let mut consumed = vec![false; previous.len()];
    let mut matched = 0usize;
    let mut next: Vec<DerivedTimelineItem> = Vec::with_capacity(incoming.len());

    for (position, candidate) in incoming.iter().enumerate() {
        let slot = match candidate.key.as_deref() {
            Some(key) => by_key.get(key).copied().filter(|&index| !consumed[index]),
            None => previous
                .get(position)
                .filter(|old| {
                    !consumed[position]
                        && old.item.key.is_none()
                        && equivalence.matches(&old.item, candidate)
                })
                .map(|_| position),
        };

        match slot {
            Some(index) => {
                consumed[index] = true;
                matched += 1;
                let old = &previous[index];
                next.push(DerivedTimelineItem {
                    id: old.id.clone(),
                    position: config.title_position,
                    visible: old.visible,
                    active: old.active,
                    item: candidate.clone(),
                });
            }
            None => next.push(DerivedTimelineItem {
                id: new_item_id(),
                position: config.title_position,
                visible: !config.slide_show,
                active: false,
                item: candidate.clone(),
            }),
        }
    }

    if matched == 0 && incoming.len() != previous.len() {
        debug!(
            previous = previous.len(),
            incoming = incoming.len(),
            "no usable match signal, deriving fresh"
        );
        return (derive_items(incoming, config), ReconcileOutcome::Replaced);
    }

    // The previously active entry may have been dropped; repair the invariant.
    if !next.is_empty() && !next.iter().any(|item| item.active) {
        next[0].active = true;
    }

    (next, ReconcileOutcome::Updated)
}
