use super::cache::HistoryCache;
use crate::sequence::SequenceNumber;
use crate::Error;

/// The six ways an incoming `(line, sequence)` can move the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AdvancerState {
    /// First call since construction or reset.
    InitialState = 0,
    /// Head advances by one.
    AdvanceHead = 1,
    /// Non-head advances by one.
    AdvanceLine = 2,
    /// Backwards report, any line.
    GapFill = 3,
    /// Head jumps forward.
    HeadForwardGapFill = 4,
    /// Non-head jumps forward.
    LineForwardGapFill = 5,
}

impl TryFrom<u8> for AdvancerState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::InitialState),
            1 => Ok(Self::AdvanceHead),
            2 => Ok(Self::AdvanceLine),
            3 => Ok(Self::GapFill),
            4 => Ok(Self::HeadForwardGapFill),
            5 => Ok(Self::LineForwardGapFill),
            other => Err(Error::StateOutOfRange(other)),
        }
    }
}

/// Decide which transition applies to `sequence` arriving on `line`.
///
/// `line` must already be enrolled unless this is the first call.
pub fn classify<S: SequenceNumber>(
    cache: &HistoryCache<S>,
    first_call: bool,
    line: usize,
    sequence: S,
) -> AdvancerState {
    if first_call {
        return AdvancerState::InitialState;
    }

    let position = cache.positions[line];
    let current = cache.current(line);

    if sequence == current.successor() {
        // catching up to (or already at) head promotes this line
        if line == cache.head || position == cache.positions[cache.head] {
            return AdvancerState::AdvanceHead;
        }
        return AdvancerState::AdvanceLine;
    }

    if sequence <= current {
        return AdvancerState::GapFill;
    }

    if line == cache.head {
        AdvancerState::HeadForwardGapFill
    } else {
        AdvancerState::LineForwardGapFill
    }
}
