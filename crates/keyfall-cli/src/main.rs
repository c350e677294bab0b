mod cli;
mod input;
mod logging;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use input::TerminalEvents;
use keyfall_core::report::{format_now_playing, format_report};
use keyfall_core::{
    Authenticator, ClientCredentials, GameConfig, IntervalClock, Session, SessionState,
    SpotifyAuthenticator, SpotifyClient, Track, start_playback,
};
use terminal::TerminalSink;
use tracing::{info, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    let logs = logging::init_logging();

    if args.offline {
        info!("Offline mode, skipping playback");
    } else {
        let track = start_music(&args)?;
        println!("{}", format_now_playing(&track));
    }

    let mut builder = GameConfig::builder();
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build().context("Invalid game configuration")?;
    let ticks_per_second = config.ticks_per_second;
    let session = Session::new(config).context("Failed to create game session")?;
    setup_shutdown_handler(session.state())?;

    let held = logs.hold();
    let result = session.run(
        TerminalSink::new(),
        IntervalClock::new(ticks_per_second),
        TerminalEvents,
    );
    drop(held);
    let report = result.context("Game session failed")?;

    println!("{}", format_report(&report));
    Ok(())
}

/// End the session cleanly on SIGINT, SIGTERM or SIGHUP.
fn setup_shutdown_handler(state: Arc<SessionState>) -> Result<()> {
    ctrlc::set_handler(move || {
        warn!("Termination signal received");
        state.request_shutdown();
    })
    .context("Failed to install signal handler")
}

/// Authenticate, find the track and start playback.
fn start_music(args: &Args) -> Result<Track> {
    let client_id = args
        .client_id
        .clone()
        .context("Missing client id: pass --client-id or set SPOTIFY_ID")?;
    let client_secret = args
        .client_secret
        .clone()
        .context("Missing client secret: pass --client-secret or set SPOTIFY_SECRET")?;
    let client = ClientCredentials::new(client_id, client_secret)?;

    let credential = SpotifyAuthenticator::new(client, &args.token_file)
        .acquire_credential()
        .context("Failed to authenticate with Spotify")?;
    let service = SpotifyClient::new(credential);

    start_playback(&service, &args.query)
        .with_context(|| format!("Could not start playback for {:?}", args.query))
}
