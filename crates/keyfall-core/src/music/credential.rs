use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::auth;
use crate::error::{Error, Result};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Cached OAuth credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Empty when the server issued none.
    #[serde(default)]
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
}

/// Token endpoint response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Credential {
    /// Build a credential from a token response received at `now`.
    ///
    /// Refresh responses may omit the refresh token; the previous one is kept.
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        previous_refresh: &str,
    ) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response
                .refresh_token
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| previous_refresh.to_string()),
            expiry: now + Duration::seconds(response.expires_in),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Credential(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Credential(format!("{}: {}", path.display(), e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::Credential(format!("{}: {}", path.display(), e)))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry - Duration::seconds(auth::EXPIRY_LEEWAY_SECS) <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn credential() -> Credential {
        Credential {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            refresh_token: "refresh".into(),
            expiry: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");

        credential().save(&path).unwrap();
        assert_eq!(Credential::load(&path).unwrap(), credential());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Credential::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Credential(_))));
    }

    #[test]
    fn test_load_foreign_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(
            &path,
            r#"{"access_token":"abc","token_type":"Bearer","refresh_token":"def","expiry":"2026-03-01T09:30:00.123456+09:00"}"#,
        )
        .unwrap();

        let loaded = Credential::load(&path).unwrap();
        assert_eq!(loaded.access_token, "abc");
        assert_eq!(
            loaded.expiry,
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 30, 0).unwrap()
                + Duration::microseconds(123456)
        );
    }

    #[test]
    fn test_load_without_refresh_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, r#"{"access_token":"abc","expiry":"2026-03-01T00:00:00Z"}"#).unwrap();

        let loaded = Credential::load(&path).unwrap();
        assert!(!loaded.can_refresh());
        assert_eq!(loaded.token_type, "Bearer");
    }

    #[test]
    fn test_expiry_with_leeway() {
        let cred = credential();
        assert!(!cred.is_expired_at(cred.expiry - Duration::seconds(60)));
        assert!(cred.is_expired_at(cred.expiry - Duration::seconds(5)));
        assert!(cred.is_expired_at(cred.expiry + Duration::seconds(1)));
    }

    #[test]
    fn test_from_response_keeps_previous_refresh_token() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"new","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();

        let cred = Credential::from_response(response, now, "old-refresh");
        assert_eq!(cred.access_token, "new");
        assert_eq!(cred.refresh_token, "old-refresh");
        assert_eq!(cred.expiry, now + Duration::hours(1));
        assert_eq!(cred.authorization_header(), "Bearer new");
    }

    #[test]
    fn test_from_response_with_new_refresh_token() {
        let now = Utc::now();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","expires_in":60,"refresh_token":"fresh"}"#,
        )
        .unwrap();
        let cred = Credential::from_response(response, now, "");
        assert_eq!(cred.refresh_token, "fresh");
    }
}
