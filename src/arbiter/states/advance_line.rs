use super::{confirm, AdvanceContext};
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// A trailing line's one-step advance into a slot an earlier line created.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let Some(index) = ctx.cache.locate_for(line, sequence) else {
        return false;
    };
    ctx.cache.positions[line] = index;
    confirm(ctx, line, index, sequence)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::arbiter::slot::SequenceSlot;
    use crate::policy::ArbiterEvent;

    fn trailing() -> Harness {
        // line 0 is head at index 3, line 1 trails at index 0
        let mut harness = Harness::seeded_head(2, 6, 0, 0);
        harness.cache.history[0].insert(1);
        harness.cache.history[1] = SequenceSlot::filled(2, 0, 1);
        harness.cache.history[2] = SequenceSlot::gap(2, 2);
        harness.cache.history[3] = SequenceSlot::filled(2, 0, 3);
        harness.cache.positions[0] = 3;
        harness.cache.positions[1] = 0;
        harness
    }

    #[test]
    fn test_redundant_copy_is_discarded() {
        let mut harness = trailing();
        assert!(!harness.run(advance, 1, 1));

        assert_eq!(harness.cache.position(1), Some(1));
        assert!(harness.cache.slot(1).complete());
        assert!(harness.policy.events().is_empty());
    }

    #[test]
    fn test_first_confirmation_of_placeholder_accepts() {
        let mut harness = trailing();
        harness.run(advance, 1, 1);
        assert!(harness.run(advance, 1, 2));

        assert_eq!(harness.policy.events(), &[ArbiterEvent::GapFill { sequence: 2, length: 1 }]);
        assert_eq!(harness.cache.position(1), Some(2));
    }

    #[test]
    fn test_repeat_on_same_line_is_duplicate() {
        let mut harness = trailing();
        harness.cache.history[1].insert(1);
        assert!(!harness.run(advance, 1, 1));

        assert_eq!(
            harness.policy.events(),
            &[ArbiterEvent::DuplicateOnLine { line: 1, sequence: 1 }]
        );
    }

    #[test]
    fn test_mismatched_slot_discards_without_moving() {
        let mut harness = trailing();
        harness.cache.history[1] = SequenceSlot::filled(2, 0, 9);
        assert!(!harness.run(advance, 1, 1));

        assert_eq!(harness.cache.position(1), Some(0));
        assert!(!harness.cache.slot(1).has(1));
    }
}
