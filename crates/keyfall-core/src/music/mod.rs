//! Music service integration.
//!
//! Authenticates against Spotify, finds the top track for a query and starts
//! remote playback before the game begins.

mod auth;
mod callback;
mod client;
mod credential;

pub use auth::{Authenticator, ClientCredentials, SpotifyAuthenticator, authorize_url};
pub use callback::{CallbackListener, CallbackOutcome, parse_request_line};
pub use client::{MusicService, SpotifyClient, Track};
pub use credential::{Credential, TokenResponse};

use std::time::Duration;

use tracing::info;

use crate::error::Result;

pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const API_BASE: &str = "https://api.spotify.com/v1";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn http_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .build();
    config.into()
}

/// Find the top match for `query` and start playing it.
pub fn start_playback<M: MusicService + ?Sized>(service: &M, query: &str) -> Result<Track> {
    let track = service.search(query)?;
    info!("Found {} by {} ({})", track.title, track.artist, track.uri);
    service.play(&track)?;
    Ok(track)
}
