//! Name conversions between JSON properties, SQL columns and service names.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a lowercase letter followed by a run of uppercase letters.
static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z]+)").expect("valid regex"));

/// Suffix appended to a domain name to obtain its service name.
const SERVICE_SUFFIX: &str = "Service";

/// Convert a camelCase property name into its snake_case SQL column name.
///
/// ```
/// use cytomine_core::naming::field_name_to_sql;
/// assert_eq!(field_name_to_sql("blindMode"), "blind_mode");
/// assert_eq!(field_name_to_sql("name"), "name");
/// ```
pub fn field_name_to_sql(field: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(field, "${1}_${2}")
        .to_lowercase()
}

/// Service name registered for a domain (`Project` -> `ProjectService`).
pub fn service_name(domain: &str) -> String {
    format!("{domain}{SERVICE_SUFFIX}")
}

/// Service name for a lower-camel domain parameter as sent by clients
/// (`uploadedFile` -> `UploadedFileService`). Returns `None` for empty input.
pub fn service_name_from_param(domain: &str) -> Option<String> {
    let mut chars = domain.chars();
    let first = chars.next()?;
    Some(service_name(&format!(
        "{}{}",
        first.to_uppercase(),
        chars.as_str()
    )))
}

/// Domain name of a registered service (`ProjectService` -> `Project`).
pub fn domain_from_service(service_name: &str) -> &str {
    service_name
        .strip_suffix(SERVICE_SUFFIX)
        .unwrap_or(service_name)
}

/// Key under which a domain object is placed in response payloads
/// (`Project` -> `project`).
pub fn response_key(domain: &str) -> String {
    domain.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_single_boundary() {
        assert_eq!(field_name_to_sql("blindMode"), "blind_mode");
    }

    #[test]
    fn snake_case_multiple_boundaries() {
        assert_eq!(
            field_name_to_sql("numberOfAnnotations"),
            "number_of_annotations"
        );
    }

    #[test]
    fn snake_case_uppercase_run_stays_together() {
        assert_eq!(field_name_to_sql("baseURL"), "base_url");
    }

    #[test]
    fn snake_case_passthrough() {
        assert_eq!(field_name_to_sql("name"), "name");
        assert_eq!(field_name_to_sql("already_snake"), "already_snake");
    }

    #[test]
    fn service_names() {
        assert_eq!(service_name("Project"), "ProjectService");
        assert_eq!(
            service_name_from_param("uploadedFile").as_deref(),
            Some("UploadedFileService")
        );
        assert_eq!(service_name_from_param(""), None);
        assert_eq!(domain_from_service("OntologyService"), "Ontology");
    }

    #[test]
    fn response_keys() {
        assert_eq!(response_key("Ontology"), "ontology");
    }
}
