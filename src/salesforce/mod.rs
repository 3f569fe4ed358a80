/// Response parsing and nested field access.
pub mod parse;
/// Analytics report flattening.
pub mod report;
/// HTTP client for the report and query endpoints.
pub mod serviceclient;
/// SOQL statement construction.
pub mod soql;
