//! Arbiter configuration.
//!
//! Defines the construction-time limits of an arbiter instance: how many
//! redundant lines feed it, how deep the lookback window is, the first
//! sequence number the stream is expected to start from and the largest
//! forward gap that is still considered recoverable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arbiter::MAX_LINES;
use crate::sequence::SequenceNumber;
use crate::{Error, Result};

/// Configuration for a [`SequenceArbiter`](crate::SequenceArbiter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Number of redundant lines carrying the stream.
    /// Default: 2 (A/B feed)
    pub number_of_lines: usize,

    /// Capacity of the circular history, in slots.
    /// Default: 1024
    pub history_depth: usize,

    /// Sequence number the first message of the stream must carry.
    /// Default: 1
    pub first_expected_sequence: u64,

    /// Largest forward gap that still creates fillable placeholders.
    /// Must be smaller than `history_depth`.
    /// Default: 512
    pub largest_recoverable_gap: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            number_of_lines: 2,
            history_depth: 1024,
            first_expected_sequence: 1,
            largest_recoverable_gap: 512,
        }
    }
}

/// Limits resolved into the stream's sequence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits<S> {
    pub first_expected: S,
    pub largest_recoverable_gap: S,
}

impl ArbiterConfig {
    pub fn new(
        number_of_lines: usize,
        history_depth: usize,
        first_expected_sequence: u64,
        largest_recoverable_gap: u64,
    ) -> Self {
        Self {
            number_of_lines,
            history_depth,
            first_expected_sequence,
            largest_recoverable_gap,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_lines == 0 {
            return Err(Error::InvalidConfig(
                "number_of_lines must be at least 1".to_string(),
            ));
        }
        if self.number_of_lines > MAX_LINES {
            return Err(Error::InvalidConfig(format!(
                "number_of_lines {} exceeds the maximum of {MAX_LINES}",
                self.number_of_lines
            )));
        }
        if self.history_depth < 2 {
            return Err(Error::InvalidConfig(
                "history_depth must be at least 2".to_string(),
            ));
        }
        let depth = self.history_depth as u64;
        if self.largest_recoverable_gap >= depth {
            return Err(Error::InvalidConfig(format!(
                "largest_recoverable_gap {} must be smaller than history_depth {}",
                self.largest_recoverable_gap, self.history_depth
            )));
        }
        Ok(())
    }

    /// Validate and narrow the sequence limits into `S`.
    pub fn limits<S: SequenceNumber>(&self) -> Result<Limits<S>> {
        self.validate()?;
        let first_expected = S::from_u64(self.first_expected_sequence).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "first_expected_sequence {} does not fit the sequence type",
                self.first_expected_sequence
            ))
        })?;
        let largest_recoverable_gap =
            S::from_u64(self.largest_recoverable_gap).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "largest_recoverable_gap {} does not fit the sequence type",
                    self.largest_recoverable_gap
                ))
            })?;
        Ok(Limits {
            first_expected,
            largest_recoverable_gap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ArbiterConfig::default();
        assert_eq!(config.number_of_lines, 2);
        assert_eq!(config.history_depth, 1024);
        assert_eq!(config.first_expected_sequence, 1);
        assert_eq!(config.largest_recoverable_gap, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = ArbiterConfig::from_json_str(r#"{"number_of_lines": 3}"#).unwrap();
        assert_eq!(config.number_of_lines, 3);
        assert_eq!(config.history_depth, 1024);
    }

    #[test]
    fn test_config_serialization() {
        let config = ArbiterConfig::new(4, 64, 0, 16);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ArbiterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_rejects_zero_lines() {
        let err = ArbiterConfig::new(0, 10, 0, 5).validate().unwrap_err();
        assert!(err.to_string().contains("number_of_lines"));
    }

    #[test]
    fn test_rejects_too_many_lines() {
        assert!(ArbiterConfig::new(MAX_LINES + 1, 10, 0, 5).validate().is_err());
        assert!(ArbiterConfig::new(MAX_LINES, 10, 0, 5).validate().is_ok());
    }

    #[test]
    fn test_rejects_shallow_history() {
        assert!(ArbiterConfig::new(1, 1, 0, 0).validate().is_err());
    }

    #[test]
    fn test_rejects_gap_bound_not_below_depth() {
        assert!(ArbiterConfig::new(1, 10, 0, 10).validate().is_err());
        assert!(ArbiterConfig::new(1, 10, 0, 9).validate().is_ok());
    }

    #[test]
    fn test_limits_narrowing() {
        let config = ArbiterConfig::new(1, 10, 70_000, 5);
        assert!(config.limits::<u16>().is_err());

        let limits = config.limits::<u32>().unwrap();
        assert_eq!(limits.first_expected, 70_000);
        assert_eq!(limits.largest_recoverable_gap, 5);
    }

    #[test]
    fn test_malformed_json() {
        let err = ArbiterConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
