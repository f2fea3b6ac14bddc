use super::{advance_head, confirm, head_forward_gap_fill, AdvanceContext};
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// A trailing line jumps forward.
///
/// If the jump carries it past the head it takes over as head and continues
/// as a head advance. Otherwise it confirms a slot the head already created.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let cache = &*ctx.cache;
    let position = cache.positions[line];
    let head_position = cache.positions[cache.head];
    let head_sequence = cache.slot(head_position).sequence();

    // not wrapped yet, so passing head across the ring boundary is visible
    let target = position.saturating_add(sequence.distance(cache.current(line)).as_index());

    if overruns_head(head_position, position, target, cache.depth()) && sequence > head_sequence {
        return take_over_head(ctx, line, sequence);
    }

    let Some(index) = ctx.cache.locate_for(line, sequence) else {
        return false;
    };
    ctx.cache.positions[line] = index;
    confirm(ctx, line, index, sequence)
}

/// `target` is the line's prospective index before wrapping modulo `depth`.
/// Landing exactly on the head's index does not pass it.
#[inline]
fn overruns_head(head_position: usize, line_position: usize, target: usize, depth: usize) -> bool {
    if line_position <= head_position {
        target > head_position
    } else {
        target > depth + head_position
    }
}

fn take_over_head<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let head_position = ctx.cache.positions[ctx.cache.head];
    ctx.cache.positions[line] = head_position;
    ctx.cache.head = line;

    if sequence == ctx.cache.slot(head_position).sequence().successor() {
        advance_head::advance(ctx, line, sequence)
    } else {
        head_forward_gap_fill::advance(ctx, line, sequence)
    }
}
