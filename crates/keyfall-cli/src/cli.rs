//! CLI argument definitions for keyfall.

use std::path::PathBuf;

use clap::Parser;
use keyfall_core::config::auth;

pub const DEFAULT_QUERY: &str = "Metallica Enter Sandman";

#[derive(Parser, Debug)]
#[command(name = "keyfall")]
#[command(about = "Terminal rhythm game that plays along to a Spotify track", version)]
pub struct Args {
    /// Search query for the track to play
    #[arg(short, long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Spotify application client ID
    #[arg(long, env = "SPOTIFY_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Credential cache file
    #[arg(long, value_name = "FILE", default_value = auth::TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Seed for chart generation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play without contacting the music service
    #[arg(long)]
    pub offline: bool,
}
