use serde_json::{Map, Value};

use crate::error::ExtractError;

/// One record from a query response, with related objects nested by
/// relationship name (e.g. `Account__r`).
pub type Record = Map<String, Value>;

/// Parse the `records` array from a query response.
pub(crate) fn parse_records_from_response(json: &Value) -> Result<Vec<Record>, ExtractError> {
    let response_object = json
        .as_object()
        .ok_or_else(|| ExtractError::InvalidResponse("query response is not an object".into()))?;

    let response_array = response_object
        .get("records")
        .ok_or_else(|| ExtractError::InvalidResponse("query response has no records".into()))?
        .as_array()
        .ok_or_else(|| ExtractError::InvalidResponse("query records is not an array".into()))?;

    let mut records: Vec<Record> = vec![];

    for record_value in response_array {
        let record = record_value
            .as_object()
            .ok_or_else(|| ExtractError::InvalidResponse("query record is not an object".into()))?;
        records.push(record.clone());
    }

    Ok(records)
}

/// Resolve a dotted field path such as `Account__r.Name`.
///
/// Each dot descends one object level. A missing or null value anywhere
/// along the path resolves to `None`.
pub fn lookup_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = record.get(first)?;

    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    (!current.is_null()).then_some(current)
}

/// Render a JSON value as the display text used in output records.
///
/// Strings pass through, null and absent values become `""`, other scalars
/// use their JSON text.
pub fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
