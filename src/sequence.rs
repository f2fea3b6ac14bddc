//! Numeric abstraction over the sequence-number type carried by a stream.
//!
//! Feeds differ in how wide their sequence numbers are, so the arbiter is
//! generic over any unsigned integer implementing [`SequenceNumber`]. Arithmetic
//! wraps, matching how exchange feeds roll their counters.

use std::fmt;
use std::hash::Hash;

/// An unsigned sequence number.
///
/// `Default` must be the zero value; it is the sequence stored in seeded
/// history slots.
pub trait SequenceNumber:
    Copy + Ord + Eq + Hash + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// `self + 1`, wrapping.
    fn successor(self) -> Self;

    /// `self + by`, wrapping.
    fn offset(self, by: Self) -> Self;

    /// `self - earlier`, wrapping.
    fn distance(self, earlier: Self) -> Self;

    /// Interpret a distance as a ring offset, saturating at `usize::MAX`.
    fn as_index(self) -> usize;

    /// Checked narrowing from the configuration representation.
    fn from_u64(value: u64) -> Option<Self>;

    fn to_u64(self) -> u64;
}

macro_rules! impl_sequence_number {
    ($($ty:ty),*) => {
        $(
            impl SequenceNumber for $ty {
                #[inline]
                fn successor(self) -> Self {
                    self.wrapping_add(1)
                }

                #[inline]
                fn offset(self, by: Self) -> Self {
                    self.wrapping_add(by)
                }

                #[inline]
                fn distance(self, earlier: Self) -> Self {
                    self.wrapping_sub(earlier)
                }

                #[inline]
                fn as_index(self) -> usize {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    u64::try_from(self).unwrap_or(u64::MAX)
                }
            }
        )*
    };
}

impl_sequence_number!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_wraps() {
        assert_eq!(7u32.successor(), 8);
        assert_eq!(u16::MAX.successor(), 0);
    }

    #[test]
    fn test_distance_and_offset() {
        assert_eq!(10u64.distance(4), 6);
        assert_eq!(4u64.offset(6), 10);
        assert_eq!(0u16.distance(u16::MAX), 1);
    }

    #[test]
    fn test_from_u64_narrowing() {
        assert_eq!(u16::from_u64(65_535), Some(u16::MAX));
        assert_eq!(u16::from_u64(65_536), None);
        assert_eq!(u64::from_u64(u64::MAX), Some(u64::MAX));
    }

    #[test]
    fn test_as_index() {
        assert_eq!(12u32.as_index(), 12);
        assert_eq!(u64::MAX.to_u64(), u64::MAX);
    }
}
