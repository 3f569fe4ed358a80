/// Token exchange for the password and JWT-bearer grants.
pub mod auth;
/// Credential and endpoint resolution from a config file or the environment.
pub mod config;
/// Error type shared by every stage of an extraction run.
pub mod error;
/// Single-pass pipeline: authenticate, fetch, map.
pub mod extract;
/// JSON writer for the extracted references.
pub mod output;
/// The canonical customer reference record and the mappers that produce it.
pub mod reference;
/// Salesforce-specific HTTP client, parsing and report helpers.
pub mod salesforce;

#[cfg(test)]
mod test_support;

/// Report fetched when neither the config file nor the environment names one.
pub const DEFAULT_REPORT_ID: &str = "00OVP000002IlDp2AK";

/// REST API version used for report and query endpoints.
pub const DEFAULT_API_VERSION: &str = "v63.0";

/// Logging verbosity for an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Emit verbose debug output (URLs, SOQL, column counts).
    Debug,
    /// Emit standard informational output.
    Information,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Information => log::LevelFilter::Info,
        }
    }
}
