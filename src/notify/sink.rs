use crate::notify::SinkError;
use crate::proximity::ProximityState;

/// Marks the start of a command ('$').
pub const FRAME_BEGIN: u8 = 0x24;
/// Marks the end of a command ('!').
pub const FRAME_END: u8 = 0x21;

/// Wire form of a state: `$`, state code, `!`.
pub fn frame(state: ProximityState) -> [u8; 3] {
    [FRAME_BEGIN, state.code(), FRAME_END]
}

/// Physical output for proximity states
pub trait NotificationSink {
    fn send(&mut self, state: ProximityState) -> Result<(), SinkError>;

    /// Release the underlying device. Safe to call more than once.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_state_between_markers() {
        assert_eq!(frame(ProximityState::Closing), *b"$C!");
        assert_eq!(frame(ProximityState::Test), [0x24, 0x5A, 0x21]);
    }
}
