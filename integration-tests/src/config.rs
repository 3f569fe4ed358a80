use std::path::PathBuf;

use customer_reference_extract::config::{self, ConfigSource, ExtractConfig};

/// Config file read from the integration-tests directory.
const SECRETS_FILE: &str = "sf_config.json";

/// Load credentials for live tests.
///
/// Returns `None` when neither `sf_config.json` nor `SF_USERNAME` is
/// available, so the live tests can skip on machines without an org.
pub fn load_live_config() -> Result<Option<ExtractConfig>, String> {
    let mut path = std::env::current_dir().map_err(|e| e.to_string())?;
    path.push(SECRETS_FILE);

    let config = config::resolve(Some(&path)).map_err(|e| e.to_string())?;
    let configured = match &config.source {
        ConfigSource::File(_) => true,
        ConfigSource::Environment => config.credentials.username.is_some(),
    };

    Ok(configured.then_some(config))
}

pub fn secrets_path() -> PathBuf {
    PathBuf::from(SECRETS_FILE)
}
