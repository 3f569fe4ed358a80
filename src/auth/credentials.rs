use std::collections::HashMap;

use reqwest::Client;
use serde_json::Value;

use crate::auth::token::{AccessToken, parse_token_response};
use crate::config::Credentials;
use crate::error::ExtractError;

/// Hints logged when the token endpoint rejects a password grant.
pub const REMEDIATION_STEPS: [&str; 4] = [
    "Verify your client_id and client_secret are correct",
    "Make sure your Connected App in Salesforce is properly configured",
    "Check if your user has API access enabled",
    "Try using 'https://test.salesforce.com/services/oauth2/token' for sandboxes",
];

/// Form body for the password grant. Absent credentials are left out and
/// rejected by the endpoint.
pub(crate) fn password_grant_params(credentials: &Credentials) -> HashMap<&'static str, &str> {
    let mut params = HashMap::new();
    params.insert("grant_type", "password");

    let fields = [
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
        ("username", &credentials.username),
        ("password", &credentials.password),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            params.insert(name, value.as_str());
        }
    }

    params
}

pub async fn fetch_password_token(
    token_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken, ExtractError> {
    let client = Client::new();
    let params = password_grant_params(credentials);

    log::info!("Authenticating with Salesforce...");
    log::info!("Using auth URL: {}", token_url);

    let resp = client.post(token_url).form(&params).send().await?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        let body = resp.text().await.unwrap_or_default();
        log::error!("Authentication failed with status code {}", status.as_u16());
        log::error!("Response: {}", body);
        log::error!("Troubleshooting steps:");
        for (i, step) in REMEDIATION_STEPS.iter().enumerate() {
            log::error!("{}. {}", i + 1, step);
        }
        return Err(ExtractError::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    let json: Value = resp.json().await?;
    let token = parse_token_response(&json)?;

    log::info!(
        "Authentication successful. Instance URL: {}",
        token.instance_url
    );
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedServer, capture_logs, logged};

    fn credentials() -> Credentials {
        Credentials {
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            username: Some("user@example.com".into()),
            password: Some("pw".into()),
        }
    }

    #[test]
    fn password_grant_includes_all_present_credentials() {
        let credentials = credentials();

        let params = password_grant_params(&credentials);

        assert_eq!(params.get("grant_type"), Some(&"password"));
        assert_eq!(params.get("client_id"), Some(&"id"));
        assert_eq!(params.get("client_secret"), Some(&"secret"));
        assert_eq!(params.get("username"), Some(&"user@example.com"));
        assert_eq!(params.get("password"), Some(&"pw"));
    }

    #[test]
    fn absent_credentials_are_omitted() {
        let credentials = Credentials {
            username: Some("user@example.com".into()),
            ..Credentials::default()
        };

        let params = password_grant_params(&credentials);

        assert_eq!(params.len(), 2);
        assert!(!params.contains_key("client_id"));
        assert!(!params.contains_key("password"));
    }

    #[tokio::test]
    async fn rejected_password_grant_is_an_authentication_error() {
        capture_logs();
        let server = CannedServer::bind().await;
        let token_url = format!("{}/services/oauth2/token", server.base_url);
        let body = r#"{"error":"invalid_grant","error_description":"authentication failure"}"#;
        let handle = server.respond(vec![(401, body.to_string())]);

        let err = fetch_password_token(&token_url, &credentials())
            .await
            .unwrap_err();

        match err {
            ExtractError::Authentication { status, body: got } => {
                assert_eq!(status, 401);
                assert_eq!(got, body);
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
        assert!(logged("Make sure your Connected App in Salesforce is properly configured"));
        assert!(logged("Check if your user has API access enabled"));

        let requests = handle.await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("POST /services/oauth2/token "));
        assert!(requests[0].contains("grant_type=password"));
        assert!(requests[0].contains("username=user%40example.com"));
    }

    #[tokio::test]
    async fn accepted_password_grant_returns_token() {
        let server = CannedServer::bind().await;
        let token_url = format!("{}/services/oauth2/token", server.base_url);
        let body = r#"{"access_token":"00Dxx!token","instance_url":"https://acme.my.salesforce.com","token_type":"Bearer"}"#;
        let handle = server.respond(vec![(200, body.to_string())]);

        let token = fetch_password_token(&token_url, &credentials()).await.unwrap();

        assert_eq!(token.access_token, "00Dxx!token");
        assert_eq!(token.instance_url, "https://acme.my.salesforce.com");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn password_grant_requires_exactly_200() {
        let server = CannedServer::bind().await;
        let token_url = format!("{}/services/oauth2/token", server.base_url);
        let handle = server.respond(vec![(202, "{}".to_string())]);

        let err = fetch_password_token(&token_url, &credentials())
            .await
            .unwrap_err();

        assert!(
            matches!(err, ExtractError::Authentication { status: 202, .. }),
            "got {err:?}"
        );
        handle.await.unwrap();
    }
}
