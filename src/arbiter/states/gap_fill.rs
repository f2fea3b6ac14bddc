use super::{confirm, AdvanceContext};
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// A line reports a sequence at or behind its own last-known point.
///
/// Fills a placeholder when the slot is still retained; a slot that has been
/// evicted or recycled is a stale duplicate and is discarded silently. The
/// line's position does not move.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    match ctx.cache.locate_for(line, sequence) {
        Some(index) => confirm(ctx, line, index, sequence),
        None => false,
    }
}
