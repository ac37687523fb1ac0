//! Room configuration.

use std::time::Duration;

/// Tunables for a room's round engine.
///
/// Every room spawned by one registry shares the same config. Tests
/// shorten `round_delay` so they don't sit through real five-second
/// waits.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Delay between a winning answer and the automatic start of the
    /// next round.
    pub round_delay: Duration,

    /// Points awarded for the first correct answer of a round.
    pub answer_points: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            round_delay: Duration::from_secs(5),
            answer_points: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.round_delay, Duration::from_secs(5));
        assert_eq!(config.answer_points, 100);
    }
}
