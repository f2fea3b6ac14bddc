//! Sequence arbiter for redundant line feeds.
//!
//! The same logical stream arrives on several independent lines. For every
//! `(line, sequence)` report the arbiter decides whether the message at that
//! sequence is being observed for the first time (accept) or is a redundant
//! copy (discard), using a fixed-depth circular history shared by all lines.
//!
//! If one line laps another by wrapping all the way around the history, the
//! lagging line is reported as overrun and moved forward. Evicting slots that
//! some line never confirmed is reported as an unrecoverable gap.

mod advancer;
mod cache;
mod line_set;
mod slot;
mod state;
mod states;

pub use advancer::Advancer;
pub use cache::HistoryCache;
pub use line_set::{LineSet, MAX_LINES};
pub use slot::SequenceSlot;
pub use state::{classify, AdvancerState};

use crate::config::ArbiterConfig;
use crate::policy::{ErrorReportingPolicy, NullErrorReportingPolicy};
use crate::sequence::SequenceNumber;
use crate::Result;

/// Accept/discard arbiter over one logical stream.
///
/// Calls must be serialized; one arbiter serves one stream (typically one per
/// partition or symbol, owned by that partition's thread).
#[derive(Debug, Clone)]
pub struct SequenceArbiter<S, P = NullErrorReportingPolicy> {
    config: ArbiterConfig,
    cache: HistoryCache<S>,
    advancer: Advancer<S>,
    policy: P,
}

impl<S: SequenceNumber> SequenceArbiter<S> {
    /// Arbiter that discards every diagnostic.
    pub fn with_config(config: ArbiterConfig) -> Result<Self> {
        Self::new(config, NullErrorReportingPolicy)
    }
}

impl<S, P> SequenceArbiter<S, P>
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    pub fn new(config: ArbiterConfig, policy: P) -> Result<Self> {
        let limits = config.limits::<S>()?;
        let cache = HistoryCache::new(config.number_of_lines, config.history_depth);
        Ok(Self {
            config,
            cache,
            advancer: Advancer::new(limits),
            policy,
        })
    }

    /// Returns `true` to pass the message downstream, `false` to discard it.
    ///
    /// # Panics
    /// Panics if `line` is not below the configured number of lines.
    #[inline]
    pub fn validate(&mut self, line: usize, sequence: S) -> bool {
        self.advancer
            .advance(&mut self.cache, &mut self.policy, line, sequence)
    }

    /// Return to the state before the first message.
    pub fn reset(&mut self) {
        log::debug!("resetting arbiter ({} lines)", self.config.number_of_lines);
        self.cache.reset();
        self.advancer.reset();
    }

    /// True until the first message has been accepted.
    pub fn awaiting_first_message(&self) -> bool {
        self.advancer.is_first_call()
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn cache(&self) -> &HistoryCache<S> {
        &self.cache
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn into_policy(self) -> P {
        self.policy
    }
}
