//! Flattening of analytics report responses.
//!
//! A report response carries its detail rows in `factMap`, keyed by grouping.
//! Each row is a list of `dataCells` whose position lines up with
//! `reportMetadata.detailColumns`; `reportExtendedMetadata.detailColumnInfo`
//! maps each column key to its display label. Grouping keys ending in `!T`
//! hold aggregate totals rather than detail rows.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::salesforce::parse::value_as_text;

/// Suffix marking a totals entry in the fact map.
pub const TOTALS_SUFFIX: &str = "!T";

/// One detail row keyed by column label.
pub type ReportRow = HashMap<String, String>;

/// Ordered column keys from `reportMetadata.detailColumns`, empty if absent.
pub fn detail_columns(report: &Value) -> Vec<String> {
    report
        .pointer("/reportMetadata/detailColumns")
        .and_then(Value::as_array)
        .map(|columns| columns.iter().map(|c| value_as_text(Some(c))).collect())
        .unwrap_or_default()
}

fn detail_column_info(report: &Value) -> Option<&Map<String, Value>> {
    report
        .pointer("/reportExtendedMetadata/detailColumnInfo")
        .and_then(Value::as_object)
}

/// Display label for a column key, falling back to the key itself.
pub fn column_label<'a>(info: Option<&'a Map<String, Value>>, column: &'a str) -> &'a str {
    info.and_then(|info| info.get(column))
        .and_then(|entry| entry.get("label"))
        .and_then(Value::as_str)
        .unwrap_or(column)
}

/// Flatten every non-total row of the report into label → value maps.
///
/// Groups are visited in the order received and rows keep their order within
/// a group. Cells beyond the known columns are ignored; a later cell with the
/// same label overwrites an earlier one.
pub fn flatten_report(report: &Value) -> Vec<ReportRow> {
    let columns = detail_columns(report);
    let info = detail_column_info(report);

    log::debug!("Found {} columns in the report", columns.len());

    let Some(fact_map) = report.get("factMap").and_then(Value::as_object) else {
        return vec![];
    };

    let mut rows = vec![];
    for (key, group) in fact_map {
        if key.ends_with(TOTALS_SUFFIX) {
            continue;
        }

        let group_rows = group
            .get("rows")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for row in group_rows {
            rows.push(flatten_row(row, &columns, info));
        }
    }

    rows
}

fn flatten_row(row: &Value, columns: &[String], info: Option<&Map<String, Value>>) -> ReportRow {
    let cells = row
        .get("dataCells")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut flattened = ReportRow::new();
    for (column, cell) in columns.iter().zip(cells) {
        let label = column_label(info, column);
        flattened.insert(label.to_string(), value_as_text(cell.get("label")));
    }
    flattened
}

/// Summary of a report payload's layout, logged when nothing was extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportShape {
    pub has_metadata: bool,
    pub top_level_keys: Vec<String>,
    pub fact_map_keys: Option<Vec<String>>,
}

impl ReportShape {
    pub fn describe(report: &Value) -> Self {
        let object = report.as_object();
        Self {
            has_metadata: object.is_some_and(|o| o.contains_key("reportMetadata")),
            top_level_keys: object
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default(),
            fact_map_keys: report
                .get("factMap")
                .and_then(Value::as_object)
                .map(|fm| fm.keys().cloned().collect()),
        }
    }

    pub fn log(&self) {
        match &self.fact_map_keys {
            Some(keys) => log::warn!("FactMap keys: {:?}", keys),
            None => log::warn!("No factMap found in the response"),
        }
        log::warn!("Top-level keys: {:?}", self.top_level_keys);
    }
}
