use serde::Deserialize;
use strum_macros::{Display, IntoStaticStr};

/// How close the next pass is, as shown on the notification device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum ProximityState {
    Receding,
    Approaching,
    Closing,
    Incoming,
    Imminent,
    Overhead,
    Test,
}

impl ProximityState {
    /// Every state, in device code order.
    pub const ALL: [ProximityState; 7] = [
        ProximityState::Receding,
        ProximityState::Approaching,
        ProximityState::Closing,
        ProximityState::Incoming,
        ProximityState::Imminent,
        ProximityState::Overhead,
        ProximityState::Test,
    ];

    /// Byte the device firmware understands for this state.
    pub fn code(self) -> u8 {
        match self {
            ProximityState::Receding => b'A',
            ProximityState::Approaching => b'B',
            ProximityState::Closing => b'C',
            ProximityState::Incoming => b'D',
            ProximityState::Imminent => b'E',
            ProximityState::Overhead => b'F',
            ProximityState::Test => b'Z',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_firmware_table() {
        let codes: Vec<u8> = ProximityState::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x5A]);
    }

    #[test]
    fn display_uses_upper_case_names() {
        assert_eq!(ProximityState::Approaching.to_string(), "APPROACHING");
        let name: &'static str = ProximityState::Overhead.into();
        assert_eq!(name, "OVERHEAD");
    }
}
