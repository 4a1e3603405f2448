use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use serde::{Deserialize, Serialize};

use super::SheetsError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const TOKEN_LIFETIME_SECS: i64 = 3600;
// Refresh this long before the server-side expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account JSON key that are used here.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<ServiceAccountKey, SheetsError> {
        let content = fs::read_to_string(path)
            .map_err(|err| SheetsError::Credentials(format!("{}: {}", path.display(), err)))?;
        serde_json::from_str(&content).map_err(|err| SheetsError::Credentials(format!("{}: {}", path.display(), err)))
    }
}

#[derive(Debug, Serialize)]
pub struct Claims<'a> {
    pub iss: &'a str,
    pub scope: &'a str,
    pub aud: &'a str,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Issues bearer tokens for a service account through the JWT bearer grant.
pub struct TokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    token: Option<AccessToken>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey) -> Result<TokenSource, SheetsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|err| SheetsError::Credentials(format!("invalid private key: {}", err)))?;

        Ok(TokenSource {
            key,
            encoding_key,
            token: None,
        })
    }

    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };

        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?)
    }

    /// A valid access token, fetching a new one when the cached one is about
    /// to expire.
    pub fn token(&mut self, http: &reqwest::blocking::Client) -> Result<String, SheetsError> {
        let now = Utc::now();
        if let Some(token) = &self.token {
            if token.expires_at > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.assertion(now)?;
        let response = http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let response: TokenResponse = response.json()?;
        debug!("fetched access token for {}", self.key.client_email);

        let token = AccessToken {
            value: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in - EXPIRY_MARGIN_SECS),
        };
        let value = token.value.clone();
        self.token = Some(token);

        Ok(value)
    }
}
