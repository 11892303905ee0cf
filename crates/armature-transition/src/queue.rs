//! Ordered queue of in-flight crossfades.
//!
//! Entries are kept in request order (index 0 is the oldest). The queue is
//! bounded; pushing into a full queue evicts the oldest entry first.

use armature_core::types::ArmId;

// ---------------------------------------------------------------------------
// TransitionPhase
// ---------------------------------------------------------------------------

/// Lifecycle stage of a queued crossfade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Barely started; dropped if another transition is requested.
    Pending,
    /// Contributing to the blend and kept on new requests.
    Active,
    /// Reached full weight; promoted on the tick that completed it.
    Complete,
}

// ---------------------------------------------------------------------------
// TransitionEntry
// ---------------------------------------------------------------------------

/// A crossfade towards one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionEntry {
    target: ArmId,
    progress: f32,
}

impl TransitionEntry {
    pub const fn new(target: ArmId) -> Self {
        Self {
            target,
            progress: 0.0,
        }
    }

    pub const fn target(&self) -> ArmId {
        self.target
    }

    /// Blend weight in `[0, 1]`.
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn phase(&self, drop_threshold: f32) -> TransitionPhase {
        if self.is_complete() {
            TransitionPhase::Complete
        } else if self.progress < drop_threshold {
            TransitionPhase::Pending
        } else {
            TransitionPhase::Active
        }
    }

    /// Ease progress towards 1 by `step` (clamped to `[0, 1]`), snapping to
    /// exactly 1 once it reaches `snap`. Returns `true` when complete.
    pub fn advance(&mut self, step: f32, snap: f32) -> bool {
        let step = step.clamp(0.0, 1.0);
        self.progress += (1.0 - self.progress) * step;
        if self.progress >= snap {
            self.progress = 1.0;
        }
        self.is_complete()
    }
}

// ---------------------------------------------------------------------------
// TransitionQueue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionQueue {
    entries: Vec<TransitionEntry>,
    capacity: usize,
}

impl TransitionQueue {
    /// Queue holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Entries oldest first.
    pub fn entries(&self) -> &[TransitionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransitionEntry> {
        self.entries.iter()
    }

    /// Remove every entry whose progress is below `threshold`.
    /// Returns how many were dropped.
    pub fn drop_below(&mut self, threshold: f32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.progress >= threshold);
        before - self.entries.len()
    }

    pub fn evict_oldest(&mut self) -> Option<TransitionEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Append an entry, evicting the oldest first if the queue is full.
    /// Returns the evicted entry.
    pub fn push(&mut self, entry: TransitionEntry) -> Option<TransitionEntry> {
        let evicted = if self.is_full() {
            self.evict_oldest()
        } else {
            None
        };
        self.entries.push(entry);
        evicted
    }

    /// Remove entries `0..=index` in one range removal.
    pub fn remove_through(&mut self, index: usize) -> Vec<TransitionEntry> {
        let end = (index + 1).min(self.entries.len());
        self.entries.drain(..end).collect()
    }

    /// Advance entries newest to oldest and stop at the first one that
    /// completes. Returns its index; older entries are left untouched.
    pub fn advance(&mut self, step: f32, snap: f32) -> Option<usize> {
        for (index, entry) in self.entries.iter_mut().enumerate().rev() {
            if entry.advance(step, snap) {
                return Some(index);
            }
        }
        None
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
