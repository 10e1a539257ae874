use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::deserialize_duration;
use crate::proximity::ProximityState;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("threshold table is empty")]
    Empty,
    #[error("{0} cannot be selected by time to pass")]
    ReservedState(ProximityState),
    #[error("{0} appears more than once")]
    Duplicate(ProximityState),
    #[error("bands must be listed farthest first: {state} starts at {min}s, not below {previous}s")]
    NotDescending {
        state: ProximityState,
        min: i64,
        previous: i64,
    },
    #[error("closest band must start at 0s, got {0}s")]
    Uncovered(i64),
    #[error("{0} has a zero poll interval")]
    ZeroInterval(ProximityState),
}

/// One row of the threshold table: entered once time to pass reaches `min`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Band {
    pub state: ProximityState,
    pub min: i64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Band {
    const fn new(state: ProximityState, min: i64, interval_secs: u64) -> Self {
        Self {
            state,
            min,
            interval: Duration::from_secs(interval_secs),
        }
    }
}

/// Maps a time to pass onto a proximity state and a poll interval.
///
/// Bands are held farthest first and partition `[0, inf)`; each band is
/// inclusive on its lower bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    bands: Vec<Band>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            bands: vec![
                Band::new(ProximityState::Receding, 2701, 120),
                Band::new(ProximityState::Approaching, 901, 60),
                Band::new(ProximityState::Closing, 301, 30),
                Band::new(ProximityState::Incoming, 61, 15),
                Band::new(ProximityState::Imminent, 0, 5),
            ],
        }
    }
}

impl ThresholdTable {
    pub fn new(bands: Vec<Band>) -> Result<Self, ThresholdError> {
        let last = bands.last().ok_or(ThresholdError::Empty)?;
        if last.min != 0 {
            return Err(ThresholdError::Uncovered(last.min));
        }

        for (i, band) in bands.iter().enumerate() {
            if matches!(band.state, ProximityState::Overhead | ProximityState::Test) {
                return Err(ThresholdError::ReservedState(band.state));
            }
            if band.interval.is_zero() {
                return Err(ThresholdError::ZeroInterval(band.state));
            }
            if bands[..i].iter().any(|b| b.state == band.state) {
                return Err(ThresholdError::Duplicate(band.state));
            }
            if i > 0 && band.min >= bands[i - 1].min {
                return Err(ThresholdError::NotDescending {
                    state: band.state,
                    min: band.min,
                    previous: bands[i - 1].min,
                });
            }
        }

        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Classify a non-negative time to pass. Negative values are the caller's
    /// concern (the pass has started) and land in the closest band.
    pub fn classify(&self, time_to_pass: i64) -> (ProximityState, Duration) {
        let band = self
            .bands
            .iter()
            .find(|b| time_to_pass >= b.min)
            .unwrap_or(&self.bands[self.bands.len() - 1]);
        (band.state, band.interval)
    }
}
