pub mod chart;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod lane;
pub mod music;
pub mod render;
pub mod report;
pub mod session;
pub mod shutdown;
pub mod tracker;

pub use chart::{Chart, ChartGenerator, Note};
pub use clock::{ClockHandle, GameClock, IntervalClock, ManualClock};
pub use config::{GameConfig, GameConfigBuilder};
pub use error::{Error, Result};
pub use input::{ChannelEventSource, EventSource, InputDispatcher, InputEvent};
pub use lane::{Color, Lane, LaneRegistry};
pub use music::{
    Authenticator, ClientCredentials, Credential, MusicService, SpotifyAuthenticator,
    SpotifyClient, Track, start_playback,
};
pub use render::RenderSink;
pub use session::{RenderLoop, Session, SessionReport, SessionState};
pub use shutdown::ShutdownSignal;
pub use tracker::{NoteMove, NoteTracker};
