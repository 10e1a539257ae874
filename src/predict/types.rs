use serde::Deserialize;

/// A predicted pass over the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pass {
    /// Epoch seconds at which the satellite rises above the horizon
    #[serde(rename = "risetime")]
    pub rise_time: i64,
    /// Seconds the satellite stays above the horizon
    pub duration: u64,
}

impl Pass {
    pub fn time_to_pass(&self, now: i64) -> i64 {
        self.rise_time - now
    }
}

/// Where passes are predicted for
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_altitude")]
    pub altitude_m: i64,
}

fn default_altitude() -> i64 {
    1
}
