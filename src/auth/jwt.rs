use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::token::{AccessToken, parse_token_response};
use crate::error::ExtractError;

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion. Salesforce rejects anything longer.
pub const ASSERTION_LIFETIME_SECS: i64 = 300;

/// Claims carried by the bearer assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Connected app consumer key.
    pub iss: String,
    /// Username of the API user.
    pub sub: String,
    /// Login host, e.g. `https://login.salesforce.com`.
    pub aud: String,
    /// Expiry as a UNIX timestamp.
    pub exp: i64,
}

pub fn build_claims(
    consumer_key: &str,
    username: &str,
    audience: &str,
    now: DateTime<Utc>,
) -> AssertionClaims {
    AssertionClaims {
        iss: consumer_key.to_string(),
        sub: username.to_string(),
        aud: audience.to_string(),
        exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
    }
}

/// Sign the claims with an RSA private key in PEM form (RS256).
pub fn sign_assertion(
    claims: &AssertionClaims,
    private_key_pem: &[u8],
) -> Result<String, ExtractError> {
    let key = EncodingKey::from_rsa_pem(private_key_pem)?;
    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        claims,
        &key,
    )?)
}

pub async fn fetch_jwt_bearer_token(
    token_url: &str,
    consumer_key: &str,
    username: &str,
    audience: &str,
    private_key_path: &Path,
) -> Result<AccessToken, ExtractError> {
    let pem = fs::read(private_key_path).map_err(|e| ExtractError::io(private_key_path, e))?;
    let claims = build_claims(consumer_key, username, audience, Utc::now());
    let assertion = sign_assertion(&claims, &pem)?;

    log::info!("Exchanging JWT assertion at {}", token_url);

    let client = Client::new();
    let params = [
        ("grant_type", JWT_BEARER_GRANT_TYPE),
        ("assertion", assertion.as_str()),
    ];

    let resp = client.post(token_url).form(&params).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        log::error!("JWT bearer exchange failed ({}): {}", status, body);
        return Err(ExtractError::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    let json: Value = resp.json().await?;
    let token = parse_token_response(&json)?;

    log::info!(
        "Successfully obtained access token. Instance URL: {}",
        token.instance_url
    );
    Ok(token)
}
