/// Build a `SELECT ... FROM ... [WHERE ...]` statement.
pub fn build_select(fields: &[&str], object: &str, predicate: Option<&str>) -> String {
    let mut soql = String::new();
    soql.push_str("SELECT ");
    soql.push_str(&fields.join(", "));
    soql.push_str(" FROM ");
    soql.push_str(object);
    if let Some(predicate) = predicate.map(str::trim).filter(|p| !p.is_empty()) {
        soql.push_str(" WHERE ");
        soql.push_str(predicate);
    }
    soql
}

/// Query string component for the REST query endpoint.
pub(crate) fn encode_query(soql: &str) -> String {
    format!("?q={}", urlencoding::encode(soql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filtered_select() {
        let soql = build_select(
            &["Name", "Account__r.Name"],
            "Customer_Reference__c",
            Some("Approved_for_Public_Use__c = true"),
        );

        assert_eq!(
            soql,
            "SELECT Name, Account__r.Name FROM Customer_Reference__c WHERE Approved_for_Public_Use__c = true"
        );
    }

    #[test]
    fn blank_predicate_is_dropped() {
        assert_eq!(
            build_select(&["Id"], "Account", Some("  ")),
            "SELECT Id FROM Account"
        );
        assert_eq!(build_select(&["Id"], "Account", None), "SELECT Id FROM Account");
    }

    #[test]
    fn query_is_url_encoded() {
        assert_eq!(
            encode_query("SELECT Id FROM Account WHERE Flag__c = true"),
            "?q=SELECT%20Id%20FROM%20Account%20WHERE%20Flag__c%20%3D%20true"
        );
    }
}
