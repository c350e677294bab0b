use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::credential::Credential;
use super::{API_BASE, http_agent};

/// A track picked from a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub title: String,
    pub artist: String,
}

/// Remote music playback.
pub trait MusicService {
    /// Top match for a free-text query.
    fn search(&self, query: &str) -> Result<Track>;

    /// Start playback of a track on the user's active device.
    fn play(&self, track: &Track) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

impl From<TrackItem> for Track {
    fn from(item: TrackItem) -> Self {
        let artist = item
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        Self {
            id: item.id,
            uri: item.uri,
            title: item.name,
            artist,
        }
    }
}

/// Pick the first track from a search response body.
fn top_track(body: SearchResponse, query: &str) -> Result<Track> {
    body.tracks
        .items
        .into_iter()
        .next()
        .map(Track::from)
        .ok_or_else(|| Error::NoResults(query.to_string()))
}

fn map_api_error(e: ureq::Error) -> Error {
    match e {
        ureq::Error::StatusCode(401) => {
            Error::AuthenticationFailed("credential rejected (HTTP 401)".to_string())
        }
        ureq::Error::StatusCode(404) => {
            Error::Http("No active playback device (HTTP 404)".to_string())
        }
        other => Error::from(other),
    }
}

/// Spotify Web API client.
pub struct SpotifyClient {
    agent: ureq::Agent,
    credential: Credential,
    api_base: String,
}

impl SpotifyClient {
    pub fn new(credential: Credential) -> Self {
        Self::with_base(credential, API_BASE)
    }

    pub fn with_base(credential: Credential, api_base: &str) -> Self {
        Self {
            agent: http_agent(),
            credential,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

impl MusicService for SpotifyClient {
    fn search(&self, query: &str) -> Result<Track> {
        debug!("Searching for {:?}", query);
        let body: SearchResponse = self
            .agent
            .get(&self.url("search"))
            .query("q", query)
            .query("type", "track")
            .query("limit", "1")
            .header("Authorization", &self.credential.authorization_header())
            .call()
            .map_err(map_api_error)?
            .into_body()
            .read_json()?;
        top_track(body, query)
    }

    fn play(&self, track: &Track) -> Result<()> {
        let response = self
            .agent
            .put(&self.url("me/player/play"))
            .header("Authorization", &self.credential.authorization_header())
            .send_json(json!({ "uris": [track.uri] }))
            .map_err(map_api_error)?;
        info!("Playback started ({})", response.status());
        Ok(())
    }
}
