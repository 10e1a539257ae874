mod state;
mod thresholds;

pub use state::ProximityState;
pub use thresholds::{Band, ThresholdError, ThresholdTable};
