use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::auth;
use crate::error::{Error, Result};

use super::callback::CallbackListener;
use super::credential::{Credential, TokenResponse};
use super::{AUTHORIZE_URL, TOKEN_URL, http_agent};

/// Produces a usable credential, blocking until one is available.
pub trait Authenticator {
    fn acquire_credential(&self) -> Result<Credential>;
}

/// Application credentials registered with the music service.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(Error::AuthenticationFailed(
                "client id and client secret are required".to_string(),
            ));
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

/// Build the URL the user visits to grant access.
pub fn authorize_url(
    client_id: &str,
    redirect_uri: &str,
    scopes: &[&str],
    state: &str,
) -> String {
    format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
        AUTHORIZE_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scopes.join(" ")),
        urlencoding::encode(state),
    )
}

/// Authorization-code flow with a cached, refreshable credential.
pub struct SpotifyAuthenticator {
    client: ClientCredentials,
    token_file: PathBuf,
    agent: ureq::Agent,
}

impl SpotifyAuthenticator {
    pub fn new(client: ClientCredentials, token_file: impl Into<PathBuf>) -> Self {
        Self {
            client,
            token_file: token_file.into(),
            agent: http_agent(),
        }
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    fn cached(&self) -> Option<Credential> {
        if !self.token_file.exists() {
            return None;
        }
        match Credential::load(&self.token_file) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!("Ignoring unreadable credential cache: {}", e);
                None
            }
        }
    }

    fn store(&self, credential: &Credential) {
        match credential.save(&self.token_file) {
            Ok(()) => debug!("Saved credential to {}", self.token_file.display()),
            Err(e) => warn!("Failed to save credential: {}", e),
        }
    }

    fn request_token(&self, form: &[(&str, &str)], previous_refresh: &str) -> Result<Credential> {
        let response: TokenResponse = self
            .agent
            .post(TOKEN_URL)
            .send_form(form.iter().copied())
            .map_err(|e| Error::AuthenticationFailed(Error::from(e).to_string()))?
            .into_body()
            .read_json()?;
        Ok(Credential::from_response(response, Utc::now(), previous_refresh))
    }

    fn refresh(&self, credential: &Credential) -> Result<Credential> {
        info!("Refreshing expired credential");
        self.request_token(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", &credential.refresh_token),
                ("client_id", &self.client.client_id),
                ("client_secret", &self.client.client_secret),
            ],
            &credential.refresh_token,
        )
    }

    fn authorize(&self) -> Result<Credential> {
        let listener = CallbackListener::bind(auth::CALLBACK_ADDR)?;
        let url = authorize_url(
            &self.client.client_id,
            auth::REDIRECT_URI,
            auth::SCOPES,
            auth::STATE,
        );

        println!("Please log in by visiting the following page in your browser:\n{}", url);
        if let Err(e) = open::that(&url) {
            debug!("Could not open browser: {}", e);
        }

        let code = listener.wait_for_code(auth::STATE)?;
        debug!("Received authorization code");
        self.request_token(
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("redirect_uri", auth::REDIRECT_URI),
                ("client_id", &self.client.client_id),
                ("client_secret", &self.client.client_secret),
            ],
            "",
        )
    }
}

impl Authenticator for SpotifyAuthenticator {
    fn acquire_credential(&self) -> Result<Credential> {
        if let Some(credential) = self.cached() {
            if !credential.is_expired() {
                debug!("Using cached credential");
                return Ok(credential);
            }
            if credential.can_refresh() {
                match self.refresh(&credential) {
                    Ok(fresh) => {
                        self.store(&fresh);
                        return Ok(fresh);
                    }
                    Err(e) => warn!("Refresh failed, logging in again: {}", e),
                }
            }
        }

        let credential = self.authorize()?;
        self.store(&credential);
        info!("Logged in");
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_authorize_url_encoding() {
        let url = authorize_url(
            "my id",
            "http://localhost:8080/callback",
            &["user-read-private", "user-modify-playback-state"],
            "st",
        );
        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=my%20id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
        assert!(url.contains("scope=user-read-private%20user-modify-playback-state"));
        assert!(url.contains("response_type=code"));
        assert!(url.ends_with("state=st"));
    }

    #[test]
    fn test_client_credentials_required() {
        assert!(ClientCredentials::new("", "secret").is_err());
        assert!(ClientCredentials::new("id", "  ").is_err());
        assert!(ClientCredentials::new("id", "secret").is_ok());
    }

    #[test]
    fn test_valid_cache_is_used_without_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        let credential = Credential {
            access_token: "cached".into(),
            token_type: "Bearer".into(),
            refresh_token: String::new(),
            expiry: Utc::now() + Duration::hours(1),
        };
        credential.save(&path).unwrap();

        let client = ClientCredentials::new("id", "secret").unwrap();
        let auth = SpotifyAuthenticator::new(client, &path);
        assert_eq!(auth.acquire_credential().unwrap(), credential);
    }

    #[test]
    fn test_unreadable_cache_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let client = ClientCredentials::new("id", "secret").unwrap();
        let auth = SpotifyAuthenticator::new(client, &path);
        assert!(auth.cached().is_none());
        assert_eq!(auth.token_file(), path.as_path());
    }
}
