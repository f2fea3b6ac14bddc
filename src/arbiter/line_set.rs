/// Largest number of lines a [`LineSet`] can track.
pub const MAX_LINES: usize = u64::BITS as usize;

/// Fixed-size bit set over line indices `[0, lines)`.
///
/// Records which lines have reported a given sequence number. Indices outside
/// the configured range are a caller bug and panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSet {
    bits: u64,
    lines: u8,
}

impl LineSet {
    /// An empty set over `lines` lines.
    ///
    /// # Panics
    /// Panics if `lines` is zero or exceeds [`MAX_LINES`].
    pub fn new(lines: usize) -> Self {
        assert!(
            lines > 0 && lines <= MAX_LINES,
            "line count {lines} outside 1..={MAX_LINES}"
        );
        Self {
            bits: 0,
            lines: lines as u8,
        }
    }

    /// A set with every line present.
    pub fn full(lines: usize) -> Self {
        let mut set = Self::new(lines);
        set.fill();
        set
    }

    /// Returns `false` if `line` was already in the set.
    #[inline]
    pub fn insert(&mut self, line: usize) -> bool {
        let bit = self.bit(line);
        let inserted = self.bits & bit == 0;
        self.bits |= bit;
        inserted
    }

    #[inline]
    pub fn has(&self, line: usize) -> bool {
        self.bits & self.bit(line) != 0
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn complete(&self) -> bool {
        self.bits == self.full_mask()
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.bits == 0
    }

    pub fn fill(&mut self) {
        self.bits = self.full_mask();
    }

    pub fn capacity(&self) -> usize {
        self.lines as usize
    }

    /// Lines that have not reported, in ascending order.
    pub fn missing(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.capacity()).filter(move |&line| !self.has(line))
    }

    #[inline]
    fn full_mask(&self) -> u64 {
        if self.capacity() == MAX_LINES {
            u64::MAX
        } else {
            (1u64 << self.lines) - 1
        }
    }

    #[inline]
    fn bit(&self, line: usize) -> u64 {
        assert!(
            line < self.capacity(),
            "line index {line} out of range for {} lines",
            self.lines
        );
        1u64 << line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion() {
        let mut set = LineSet::new(1);
        assert!(!set.has(0));

        set.insert(0);
        assert!(set.has(0));
    }

    #[test]
    fn test_duplicate_insert_reported() {
        let mut set = LineSet::new(1);
        assert!(set.insert(0));
        assert!(!set.insert(0));
    }

    #[test]
    fn test_count_and_complete() {
        let mut set = LineSet::new(2);
        assert_eq!(set.count(), 0);
        assert!(set.empty());
        assert!(!set.complete());

        set.insert(0);
        assert_eq!(set.count(), 1);
        assert!(!set.complete());
        assert!(!set.empty());

        set.insert(1);
        assert_eq!(set.count(), 2);
        assert!(set.complete());
    }

    #[test]
    fn test_missing() {
        let mut set = LineSet::new(4);
        set.insert(1);
        set.insert(3);
        assert_eq!(set.missing().collect::<Vec<_>>(), vec![0, 2]);

        set.fill();
        assert_eq!(set.missing().count(), 0);
    }

    #[test]
    fn test_full_width() {
        let set = LineSet::full(MAX_LINES);
        assert!(set.complete());
        assert_eq!(set.count(), MAX_LINES);
        assert!(set.has(MAX_LINES - 1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_line_panics() {
        let mut set = LineSet::new(2);
        set.insert(2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_zero_lines_panics() {
        LineSet::new(0);
    }
}
