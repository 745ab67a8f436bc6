//! Credential material for the realtime database REST API.
//!
//! The credentials file is JSON holding exactly one usable token:
//!
//! ```json
//! { "access_token": "ya29...." }
//! { "id_token": "eyJhbGciOi..." }
//! { "database_secret": "legacy-secret" }
//! ```
//!
//! A Google service-account key file is recognized and rejected, since it
//! cannot be sent to the REST API directly.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Token used to authorize realtime database requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth2 bearer token, sent as `access_token=`.
    AccessToken(String),
    /// Firebase ID token, sent as `auth=`.
    IdToken(String),
    /// Legacy database secret, sent as `auth=`.
    DatabaseSecret(String),
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    access_token: Option<String>,
    id_token: Option<String>,
    database_secret: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Credentials {
    /// Load credentials from `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::Credentials(format!(
                "{} not found; create it with an access_token, id_token or database_secret",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse the credentials file contents.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let file: CredentialsFile = serde_json::from_str(content)
            .map_err(|e| ConfigError::Credentials(format!("malformed credentials file: {e}")))?;

        let pick = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(token) = pick(file.access_token) {
            return Ok(Self::AccessToken(token));
        }
        if let Some(token) = pick(file.id_token) {
            return Ok(Self::IdToken(token));
        }
        if let Some(secret) = pick(file.database_secret) {
            return Ok(Self::DatabaseSecret(secret));
        }

        if file.kind.as_deref() == Some("service_account") {
            return Err(ConfigError::Credentials(
                "service account key files are not supported directly; mint an OAuth2 token \
                 (e.g. `gcloud auth print-access-token`) and store it as access_token"
                    .to_string(),
            ));
        }

        Err(ConfigError::Credentials(
            "credentials file has no access_token, id_token or database_secret".to_string(),
        ))
    }

    /// Query parameter (name, value) carrying the token.
    pub fn query_param(&self) -> (&'static str, &str) {
        match self {
            Self::AccessToken(token) => ("access_token", token),
            Self::IdToken(token) => ("auth", token),
            Self::DatabaseSecret(secret) => ("auth", secret),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessToken(_) => "access_token",
            Self::IdToken(_) => "id_token",
            Self::DatabaseSecret(_) => "database_secret",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({}, <redacted>)", self.kind())
    }
}
