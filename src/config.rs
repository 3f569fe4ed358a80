use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::token::{AuthConfig, AuthMethod};
use crate::error::ExtractError;
use crate::{DEFAULT_API_VERSION, DEFAULT_REPORT_ID};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "sf_config.json";

pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

const TOKEN_PATH: &str = "/services/oauth2/token";
const USER_CONFIG_DIR: &str = "customer-references";

/// On-disk shape of the JSON config file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    client_id: Option<String>,
    client_secret: Option<String>,
    username: Option<String>,
    password: Option<String>,
    report_id: Option<String>,
    token_url: Option<String>,
    login_url: Option<String>,
    consumer_key: Option<String>,
    private_key_path: Option<PathBuf>,
    api_version: Option<String>,
}

/// Connected app and user credentials for the password grant.
///
/// Values are carried as found; absence is left for the token endpoint to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Where the configuration for this run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

/// Everything one extraction run needs to know before it talks to Salesforce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub credentials: Credentials,
    pub report_id: String,
    pub api_version: String,
    pub login_url: String,
    pub token_url: Option<String>,
    pub consumer_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl ExtractConfig {
    /// Token endpoint: the explicit override, else derived from the login URL.
    pub fn token_url(&self) -> String {
        match &self.token_url {
            Some(url) => url.clone(),
            None => format!("{}{}", self.login_url.trim_end_matches('/'), TOKEN_PATH),
        }
    }

    /// Point the login host at the sandbox domain. An explicit token URL still wins.
    pub fn use_sandbox(&mut self) {
        self.login_url = SANDBOX_LOGIN_URL.to_string();
    }

    /// Build the token exchange settings for the requested grant.
    pub fn auth_config(&self, method: AuthMethod) -> Result<AuthConfig, ExtractError> {
        let token_url = self.token_url();
        match method {
            AuthMethod::Password => Ok(AuthConfig::Password {
                token_url,
                credentials: self.credentials.clone(),
            }),
            AuthMethod::JwtBearer => {
                let private_key_path = self.private_key_path.clone().ok_or_else(|| {
                    ExtractError::Config(
                        "JWT bearer flow requires private_key_path (or SF_PRIVATE_KEY_PATH)"
                            .to_string(),
                    )
                })?;
                let consumer_key = self
                    .consumer_key
                    .clone()
                    .or_else(|| self.credentials.client_id.clone())
                    .unwrap_or_default();

                Ok(AuthConfig::JwtBearer {
                    token_url,
                    consumer_key,
                    username: self.credentials.username.clone().unwrap_or_default(),
                    audience: self.login_url.clone(),
                    private_key_path,
                })
            }
        }
    }
}

/// Find the config file to use.
///
/// An explicit path is returned only if it exists. Without one, the working
/// directory and then the per-user config directory are searched for
/// `sf_config.json`.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?
        .join(USER_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE);
    user.exists().then_some(user)
}

/// Resolve configuration from the config file if one is found, else from
/// the process environment.
pub fn resolve(config_path: Option<&Path>) -> Result<ExtractConfig, ExtractError> {
    resolve_with(config_path, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with<F>(config_path: Option<&Path>, env: F) -> Result<ExtractConfig, ExtractError>
where
    F: Fn(&str) -> Option<String>,
{
    match locate_config_file(config_path) {
        Some(path) => {
            log::debug!("Reading credentials from {}", path.display());
            let file = read_config_file(&path)?;
            Ok(from_file(file, path))
        }
        None => {
            log::debug!("No config file found; reading credentials from environment");
            Ok(from_env(env))
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ExtractError> {
    let contents = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| {
        ExtractError::Config(format!("invalid config file {}: {e}", path.display()))
    })
}

fn from_file(file: ConfigFile, path: PathBuf) -> ExtractConfig {
    ExtractConfig {
        credentials: Credentials {
            client_id: file.client_id,
            client_secret: file.client_secret,
            username: file.username,
            password: file.password,
        },
        report_id: report_id_or_default(file.report_id),
        api_version: file
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        login_url: file
            .login_url
            .unwrap_or_else(|| PRODUCTION_LOGIN_URL.to_string()),
        token_url: file.token_url,
        consumer_key: file.consumer_key,
        private_key_path: file.private_key_path,
        source: ConfigSource::File(path),
    }
}

fn from_env<F>(env: F) -> ExtractConfig
where
    F: Fn(&str) -> Option<String>,
{
    ExtractConfig {
        credentials: Credentials {
            client_id: env("SF_CLIENT_ID"),
            client_secret: env("SF_CLIENT_SECRET"),
            username: env("SF_USERNAME"),
            password: env("SF_PASSWORD"),
        },
        report_id: report_id_or_default(env("SF_REPORT_ID")),
        api_version: env("SF_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        login_url: env("SF_LOGIN_URL").unwrap_or_else(|| PRODUCTION_LOGIN_URL.to_string()),
        token_url: env("SF_TOKEN_URL"),
        consumer_key: env("SF_CONSUMER_KEY"),
        private_key_path: env("SF_PRIVATE_KEY_PATH").map(PathBuf::from),
        source: ConfigSource::Environment,
    }
}

fn report_id_or_default(report_id: Option<String>) -> String {
    report_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_ID.to_string())
}
