use serde::{Deserialize, Serialize};

use crate::salesforce::parse::{Record, lookup_path, value_as_text};
use crate::salesforce::report::ReportRow;

/// Custom object holding customer references.
pub const REFERENCE_OBJECT: &str = "Customer_Reference__c";

/// Approval flag on the reference object.
pub const APPROVAL_FIELD: &str = "Approved_for_Public_Use__c";

/// Report column labels, one per output field.
pub mod labels {
    pub const CUSTOMER_NAME: &str = "Customer Reference: Customer Reference Name";
    pub const ACCOUNT_NAME: &str = "Account: Account Name";
    pub const REFERENCE_TYPE: &str = "Type of Reference";
    pub const APPROVED_FOR_PUBLIC_USE: &str = "Approved for Public Use";
    pub const USE_CASE: &str = "Use Case";
    pub const CAPABILITY: &str = "Capability/Feature";
    pub const CASE_STUDY_LINK: &str = "Case Study Link";
    pub const CRM: &str = "CRM";
    pub const CUSTOMER_CONTACT: &str = "Customer Contact";
    pub const REFERENCE_DETAIL: &str = "Reference Detail";
    pub const REFERENCE_SLIDE_LINK: &str = "Reference Slide Link";
    pub const INDUSTRY: &str = "Account: Industry";
    pub const MARKET_SEGMENT: &str = "Account: Market Segment";
    pub const VERIFIED: &str = "Account: Verified CRM";
}

/// Query field paths, one per output field. `__r` paths are one
/// relationship level deep.
pub mod fields {
    pub const CUSTOMER_NAME: &str = "Name";
    pub const ACCOUNT_NAME: &str = "Account__r.Name";
    pub const REFERENCE_TYPE: &str = "Type_of_Reference__c";
    pub const APPROVED_FOR_PUBLIC_USE: &str = super::APPROVAL_FIELD;
    pub const USE_CASE: &str = "Use_Case__c";
    pub const CAPABILITY: &str = "Capability_Feature__c";
    pub const CASE_STUDY_LINK: &str = "Case_Study_Link__c";
    pub const CRM: &str = "CRM__c";
    pub const CUSTOMER_CONTACT: &str = "Customer_Contact__c";
    pub const REFERENCE_DETAIL: &str = "Reference_Detail__c";
    pub const REFERENCE_SLIDE_LINK: &str = "Reference_Slide_Link__c";
    pub const INDUSTRY: &str = "Account__r.Industry";
    pub const MARKET_SEGMENT: &str = "Account__r.Market_Segment__c";
    pub const VERIFIED: &str = "Account__r.Verified_CRM__c";

    /// Every field selected by the reference query, in output order.
    pub const ALL: [&str; 14] = [
        CUSTOMER_NAME,
        ACCOUNT_NAME,
        REFERENCE_TYPE,
        APPROVED_FOR_PUBLIC_USE,
        USE_CASE,
        CAPABILITY,
        CASE_STUDY_LINK,
        CRM,
        CUSTOMER_CONTACT,
        REFERENCE_DETAIL,
        REFERENCE_SLIDE_LINK,
        INDUSTRY,
        MARKET_SEGMENT,
        VERIFIED,
    ];
}

/// Customer reference as written to the output file.
///
/// Both fetch paths produce exactly this shape, so their files are
/// interchangeable. Text fields are never null; missing values are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReference {
    pub customer_name: String,
    pub account_name: String,
    pub reference_type: String,
    pub approved_for_public_use: bool,
    pub use_case: String,
    pub capability: String,
    pub case_study_link: String,
    pub crm: String,
    pub customer_contact: String,
    pub reference_detail: String,
    pub reference_slide_link: String,
    pub industry: String,
    pub market_segment: String,
    pub verified: String,
}

impl CustomerReference {
    /// Map a flattened report row by column label.
    ///
    /// The report renders the approval checkbox as `"1"`; any other text,
    /// including `"true"`, is not approved.
    pub fn from_report_row(row: &ReportRow) -> Self {
        let text = |label: &str| row.get(label).cloned().unwrap_or_default();

        Self {
            customer_name: text(labels::CUSTOMER_NAME),
            account_name: text(labels::ACCOUNT_NAME),
            reference_type: text(labels::REFERENCE_TYPE),
            approved_for_public_use: row
                .get(labels::APPROVED_FOR_PUBLIC_USE)
                .is_some_and(|v| v == "1"),
            use_case: text(labels::USE_CASE),
            capability: text(labels::CAPABILITY),
            case_study_link: text(labels::CASE_STUDY_LINK),
            crm: text(labels::CRM),
            customer_contact: text(labels::CUSTOMER_CONTACT),
            reference_detail: text(labels::REFERENCE_DETAIL),
            reference_slide_link: text(labels::REFERENCE_SLIDE_LINK),
            industry: text(labels::INDUSTRY),
            market_segment: text(labels::MARKET_SEGMENT),
            verified: text(labels::VERIFIED),
        }
    }

    /// Map a query record by field path.
    ///
    /// The approval flag is read as a JSON boolean; anything else is `false`.
    pub fn from_query_record(record: &Record) -> Self {
        let text = |path: &str| value_as_text(lookup_path(record, path));

        Self {
            customer_name: text(fields::CUSTOMER_NAME),
            account_name: text(fields::ACCOUNT_NAME),
            reference_type: text(fields::REFERENCE_TYPE),
            approved_for_public_use: is_approved(record),
            use_case: text(fields::USE_CASE),
            capability: text(fields::CAPABILITY),
            case_study_link: text(fields::CASE_STUDY_LINK),
            crm: text(fields::CRM),
            customer_contact: text(fields::CUSTOMER_CONTACT),
            reference_detail: text(fields::REFERENCE_DETAIL),
            reference_slide_link: text(fields::REFERENCE_SLIDE_LINK),
            industry: text(fields::INDUSTRY),
            market_segment: text(fields::MARKET_SEGMENT),
            verified: text(fields::VERIFIED),
        }
    }
}

fn is_approved(record: &Record) -> bool {
    lookup_path(record, fields::APPROVED_FOR_PUBLIC_USE)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Map every report row. Unapproved rows are kept with the flag false.
pub fn map_report_rows(rows: &[ReportRow]) -> Vec<CustomerReference> {
    rows.iter().map(CustomerReference::from_report_row).collect()
}

/// Map query records, dropping any that are not approved for public use.
///
/// The query already filters on the flag; this holds even if that
/// predicate is loosened.
pub fn map_query_records(records: &[Record]) -> Vec<CustomerReference> {
    records
        .iter()
        .filter(|record| is_approved(record))
        .map(CustomerReference::from_query_record)
        .collect()
}
