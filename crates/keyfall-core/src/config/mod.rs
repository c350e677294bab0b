//! Game configuration and tuning constants.
//!
//! This module contains:
//! - Timing, chart, layout, input and auth constants
//! - `GameConfig` - per-session settings with validation via `GameConfigBuilder`

mod game;

pub use game::*;

/// Simulation timing.
pub mod timing {
    use std::time::Duration;

    /// Default clock rate in ticks per second.
    pub const TICKS_PER_SECOND: u32 = 8;

    /// Row a note must reach before it can be hit.
    pub const TARGET_ROW: u32 = 9;

    /// Ticks between a note's spawn and the tick on which it can be hit.
    pub const HIT_WINDOW_TICKS: u64 = 8;

    /// Duration of one tick at the given rate.
    pub fn tick_interval(ticks_per_second: u32) -> Duration {
        Duration::from_secs(1) / ticks_per_second.max(1)
    }
}

/// Chart generation defaults.
pub mod chart {
    /// Number of notes generated for a session.
    pub const DEFAULT_LENGTH: usize = 1000;

    /// Smallest gap (in ticks) between consecutive notes.
    pub const MIN_GAP: u64 = 1;

    /// Largest gap (in ticks) between consecutive notes.
    pub const MAX_GAP: u64 = 5;
}

/// Screen layout.
pub mod layout {
    /// Horizontal spacing between default lanes.
    pub const LANE_SPACING: u16 = 4;

    /// Columns between the rightmost lane and the score overlay.
    pub const SCORE_MARGIN: u16 = 4;

    /// Row of the score overlay.
    pub const SCORE_ROW: u16 = 0;

    /// Glyph drawn when a lane key is pressed.
    pub const FEEDBACK_GLYPH: char = '*';
}

/// Input polling.
pub mod input {
    use std::time::Duration;

    /// How long the dispatcher waits for an event before re-checking shutdown.
    pub const POLL_TIMEOUT: Duration = Duration::from_millis(20);
}

/// Music service authentication.
pub mod auth {
    /// Redirect URI registered with the music service application.
    pub const REDIRECT_URI: &str = "http://localhost:8080/callback";

    /// Local address the callback listener binds to.
    pub const CALLBACK_ADDR: &str = "127.0.0.1:8080";

    /// Opaque state value echoed by the authorization server.
    pub const STATE: &str = "spotify_auth_state";

    /// Default credential cache file.
    pub const TOKEN_FILE: &str = "spotify_token.json";

    /// Scopes needed to look up the user and start playback.
    pub const SCOPES: &[&str] = &["user-read-private", "user-modify-playback-state"];

    /// Credentials closer than this to expiry are treated as expired.
    pub const EXPIRY_LEEWAY_SECS: i64 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_constants() {
        assert_eq!(timing::TICKS_PER_SECOND, 8);
        assert_eq!(timing::TARGET_ROW, 9);
        assert_eq!(timing::HIT_WINDOW_TICKS, 8);
        assert_eq!(timing::tick_interval(8).as_millis(), 125);
    }

    #[test]
    fn test_tick_interval_zero_rate() {
        assert_eq!(timing::tick_interval(0).as_secs(), 1);
    }

    #[test]
    fn test_chart_constants() {
        assert_eq!(chart::DEFAULT_LENGTH, 1000);
        assert!(chart::MIN_GAP >= 1);
        assert!(chart::MAX_GAP >= chart::MIN_GAP);
    }

    #[test]
    fn test_auth_constants() {
        assert!(auth::REDIRECT_URI.ends_with("/callback"));
        assert_eq!(auth::SCOPES.len(), 2);
    }
}
