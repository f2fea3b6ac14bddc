use super::line_set::LineSet;
use crate::sequence::SequenceNumber;

/// One history entry: a sequence number and the lines that reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSlot<S> {
    sequence: S,
    reporters: LineSet,
}

impl<S: SequenceNumber> SequenceSlot<S> {
    /// Seeded slot written at cache initialization. Its reporters are full so
    /// evicting it never raises a loss.
    pub fn seeded(lines: usize) -> Self {
        Self {
            sequence: S::default(),
            reporters: LineSet::full(lines),
        }
    }

    /// Placeholder for a sequence expected but not yet seen on any line.
    pub fn gap(lines: usize, sequence: S) -> Self {
        Self {
            sequence,
            reporters: LineSet::new(lines),
        }
    }

    /// Slot for `sequence` as first reported by `line`.
    pub fn filled(lines: usize, line: usize, sequence: S) -> Self {
        let mut slot = Self::gap(lines, sequence);
        slot.insert(line);
        slot
    }

    #[inline]
    pub fn sequence(&self) -> S {
        self.sequence
    }

    #[inline]
    pub fn reporters(&self) -> &LineSet {
        &self.reporters
    }

    /// Returns `false` if `line` had already reported this slot.
    #[inline]
    pub fn insert(&mut self, line: usize) -> bool {
        self.reporters.insert(line)
    }

    #[inline]
    pub fn has(&self, line: usize) -> bool {
        self.reporters.has(line)
    }

    #[inline]
    pub fn complete(&self) -> bool {
        self.reporters.complete()
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.reporters.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_slot_is_complete() {
        let slot = SequenceSlot::<u64>::seeded(1);
        assert!(slot.complete());
        assert_eq!(slot.sequence(), 0);

        let slot = SequenceSlot::<u64>::seeded(3);
        assert!(slot.complete());
        assert!(!slot.empty());
    }

    #[test]
    fn test_gap_slot_is_empty() {
        let slot = SequenceSlot::<u64>::gap(2, 9);
        assert!(slot.empty());
        assert!(!slot.complete());
        assert_eq!(slot.sequence(), 9);
    }

    #[test]
    fn test_filled_single_line_is_complete() {
        let slot = SequenceSlot::<u32>::filled(1, 0, 0);
        assert!(slot.complete());
        assert!(slot.has(0));
    }

    #[test]
    fn test_filled_multi_line() {
        let mut slot = SequenceSlot::<u32>::filled(3, 1, 42);
        assert!(!slot.complete());
        assert!(slot.has(1));
        assert!(!slot.has(0));
        assert_eq!(slot.reporters().missing().collect::<Vec<_>>(), vec![0, 2]);

        assert!(slot.insert(0));
        assert!(!slot.insert(1));
        assert!(slot.insert(2));
        assert!(slot.complete());
    }
}
