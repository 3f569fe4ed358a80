use serde_json::Value;

use crate::auth::token::{AuthMethod, fetch_token};
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::reference::{
    APPROVAL_FIELD, CustomerReference, REFERENCE_OBJECT, fields, map_query_records,
    map_report_rows,
};
use crate::salesforce::parse::Record;
use crate::salesforce::report::{ReportShape, flatten_report};
use crate::salesforce::serviceclient::ServiceClient;
use crate::salesforce::soql::build_select;

/// Which endpoint to pull references from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A pre-built analytics report.
    Report { report_id: String },
    /// A SOQL query against the reference object.
    Query,
}

/// SOQL selecting every mapped field of approved references.
pub fn reference_query() -> String {
    let predicate = format!("{} = true", APPROVAL_FIELD);
    build_select(&fields::ALL, REFERENCE_OBJECT, Some(&predicate))
}

/// Flatten and map a report response. A payload without `reportMetadata` is
/// warned about up front; an empty result is logged with the payload's layout
/// and is not an error.
pub fn references_from_report(report: &Value) -> Vec<CustomerReference> {
    let shape = ReportShape::describe(report);
    if !shape.has_metadata {
        log::warn!("Expected report structure not found (no reportMetadata)");
    }

    let rows = flatten_report(report);
    if rows.is_empty() {
        log::warn!("No data found using standard processing. Examining report structure...");
        shape.log();
        return vec![];
    }
    map_report_rows(&rows)
}

pub fn references_from_records(records: &[Record]) -> Vec<CustomerReference> {
    let references = map_query_records(records);
    if references.is_empty() {
        log::warn!(
            "Query returned {} record(s), none approved for public use",
            records.len()
        );
    }
    references
}

/// Authenticate, fetch from `source`, and map to output records.
///
/// Any failure ends the run; no partial result is returned.
pub async fn extract(
    config: &ExtractConfig,
    method: AuthMethod,
    source: &Source,
) -> Result<Vec<CustomerReference>, ExtractError> {
    let auth = config.auth_config(method)?;
    let token = fetch_token(&auth).await?;
    let client = ServiceClient::from_token(&token).with_api_version(&config.api_version);

    match source {
        Source::Report { report_id } => {
            let report = client.fetch_report(report_id).await?;
            Ok(references_from_report(&report))
        }
        Source::Query => {
            let records = client.query(&reference_query()).await?;
            log::debug!("Query returned {} record(s)", records.len());
            Ok(references_from_records(&records))
        }
    }
}
