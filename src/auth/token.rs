use std::path::PathBuf;

use serde_json::Value;

use crate::auth::credentials::fetch_password_token;
use crate::auth::jwt::fetch_jwt_bearer_token;
use crate::config::Credentials;
use crate::error::ExtractError;

/// Bearer token and the instance it is valid against.
///
/// Lives for a single run; nothing here refreshes or caches it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub instance_url: String,
}

/// Which OAuth grant to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Password,
    JwtBearer,
}

#[derive(Clone, Debug)]
pub enum AuthConfig {
    Password {
        token_url: String,
        credentials: Credentials,
    },
    JwtBearer {
        token_url: String,
        consumer_key: String,
        username: String,
        audience: String,
        private_key_path: PathBuf,
    },
}

pub async fn fetch_token(auth: &AuthConfig) -> Result<AccessToken, ExtractError> {
    match auth {
        AuthConfig::Password {
            token_url,
            credentials,
        } => fetch_password_token(token_url, credentials).await,
        AuthConfig::JwtBearer {
            token_url,
            consumer_key,
            username,
            audience,
            private_key_path,
        } => {
            fetch_jwt_bearer_token(
                token_url,
                consumer_key,
                username,
                audience,
                private_key_path,
            )
            .await
        }
    }
}

/// Pull the access token and instance URL out of a token endpoint response.
pub(crate) fn parse_token_response(json: &Value) -> Result<AccessToken, ExtractError> {
    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::InvalidResponse("No access_token in response".into()))?;
    let instance_url = json
        .get("instance_url")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::InvalidResponse("No instance_url in response".into()))?;

    if access_token.trim().is_empty() {
        return Err(ExtractError::InvalidResponse(
            "Access token was empty".to_string(),
        ));
    }

    Ok(AccessToken {
        access_token: access_token.to_string(),
        instance_url: instance_url.trim_end_matches('/').to_string(),
    })
}
