//! Fixed-capacity circular history shared by every line.
//!
//! The cache is storage plus index math. All validation logic lives in the
//! transition handlers, which are the only code that mutates it.

use super::slot::SequenceSlot;
use crate::sequence::SequenceNumber;

/// Sentinel for a line that has not reported yet, and for an unset head.
pub(crate) const UNSET: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct HistoryCache<S> {
    /// Each line's index into `history`.
    pub(crate) positions: Box<[usize]>,
    pub(crate) history: Box<[SequenceSlot<S>]>,
    /// The line holding the furthest-advanced position.
    pub(crate) head: usize,
    lines: usize,
}

impl<S: SequenceNumber> HistoryCache<S> {
    pub fn new(lines: usize, depth: usize) -> Self {
        Self {
            positions: vec![UNSET; lines].into_boxed_slice(),
            history: vec![SequenceSlot::seeded(lines); depth].into_boxed_slice(),
            head: UNSET,
            lines,
        }
    }

    pub fn reset(&mut self) {
        self.head = UNSET;
        self.positions.fill(UNSET);
        self.history.fill(SequenceSlot::seeded(self.lines));
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn head(&self) -> Option<usize> {
        (self.head != UNSET).then_some(self.head)
    }

    /// `line`'s ring index, or `None` before it has reported.
    pub fn position(&self, line: usize) -> Option<usize> {
        let position = self.positions[line];
        (position != UNSET).then_some(position)
    }

    pub fn slot(&self, index: usize) -> &SequenceSlot<S> {
        &self.history[index]
    }

    /// Sequence recorded at `line`'s position.
    #[inline]
    pub(crate) fn current(&self, line: usize) -> S {
        self.history[self.positions[line]].sequence()
    }

    #[inline]
    pub fn next_position(&self, line: usize) -> usize {
        self.wrap_forward(self.positions[line], 1)
    }

    #[inline]
    pub(crate) fn wrap_forward(&self, index: usize, by: usize) -> usize {
        (index + by % self.depth()) % self.depth()
    }

    #[inline]
    pub(crate) fn wrap_back(&self, index: usize, by: usize) -> usize {
        let depth = self.depth();
        (index + depth - by % depth) % depth
    }

    /// Place a line that has never reported at the head's position.
    pub(crate) fn enrol(&mut self, line: usize) {
        if self.positions[line] == UNSET && self.head != UNSET {
            self.positions[line] = self.positions[self.head];
        }
    }

    /// Find the ring index holding `sequence`, counting from `from`.
    ///
    /// Returns `None` when the distance reaches past the window or the slot at
    /// the computed index records a different sequence.
    pub(crate) fn locate(&self, from: usize, sequence: S) -> Option<usize> {
        let anchor = self.history[from].sequence();
        let index = if sequence >= anchor {
            let ahead = sequence.distance(anchor).as_index();
            if ahead >= self.depth() {
                return None;
            }
            self.wrap_forward(from, ahead)
        } else {
            let behind = anchor.distance(sequence).as_index();
            if behind >= self.depth() {
                return None;
            }
            self.wrap_back(from, behind)
        };
        (self.history[index].sequence() == sequence).then_some(index)
    }

    /// [`locate`](Self::locate) from `line`'s position, then from the head's.
    ///
    /// Unrecoverable gaps skip sequence numbers without consuming slots, so a
    /// line parked before a skip can only reach newer slots through the head.
    pub(crate) fn locate_for(&self, line: usize, sequence: S) -> Option<usize> {
        self.locate(self.positions[line], sequence).or_else(|| {
            let head_position = self.positions[self.head];
            if head_position == self.positions[line] {
                None
            } else {
                self.locate(head_position, sequence)
            }
        })
    }
}
