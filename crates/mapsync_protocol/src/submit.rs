//! Incident submission formatting and response decoding.

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::Incident;
use serde_json::Value;

/// URL-parameter template for incident submission.
///
/// Placeholders are substituted in fixed order: title, description, date
/// (`MM/dd/yyyy`), hour (`HH`), minute (`mm`), lowercase am/pm marker,
/// category remote id, latitude, longitude, location name.
pub const SUBMIT_TEMPLATE: &str = "task=report&incident_title={}&incident_description={}\
&incident_date={}&incident_hour={}&incident_minute={}&incident_ampm={}\
&incident_category={}&latitude={}&longitude={}&location_name={}";

/// Outcome of an incident submission as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The service accepted the incident.
    Accepted,
    /// The service rejected the incident, or the response was unreadable.
    Rejected,
}

/// Formats the submission form body for one incident.
///
/// Substitutes the incident's fields into the template's positional `{}`
/// placeholders, percent-encoding every value. The incident must carry a
/// category and a timestamp.
pub fn format_submit_body(template: &str, incident: &Incident) -> ProtocolResult<String> {
    let category = incident
        .category
        .as_ref()
        .ok_or(ProtocolError::MissingCategory)?;
    let occurred_at = incident.occurred_at.ok_or(ProtocolError::MissingTimestamp)?;

    let values = [
        incident.title.clone(),
        incident.description.clone(),
        occurred_at.format("%m/%d/%Y").to_string(),
        occurred_at.format("%H").to_string(),
        occurred_at.format("%M").to_string(),
        occurred_at.format("%P").to_string(),
        category.remote_id.to_string(),
        incident.location.latitude.to_string(),
        incident.location.longitude.to_string(),
        incident.location.name.clone(),
    ];

    let parts: Vec<&str> = template.split("{}").collect();
    let found = parts.len() - 1;
    if found != values.len() {
        return Err(ProtocolError::TemplateMismatch {
            expected: values.len(),
            found,
        });
    }

    let mut body = String::with_capacity(template.len() + 64);
    for (part, value) in parts.iter().zip(values.iter()) {
        body.push_str(part);
        body.push_str(&urlencoding::encode(value));
    }
    body.push_str(parts[values.len()]);

    Ok(body)
}

/// Decodes the response body of an incident submission.
///
/// A body with no `{` is a rejection (error page, plain text). Otherwise
/// the body is parsed as JSON and `error.code` is read as a string: `"0"`
/// (case-insensitive) means accepted; anything else, including a missing
/// or non-string field or a parse failure, means rejected.
pub fn decode_submit_response(body: &str) -> SubmitStatus {
    if !body.contains('{') {
        return SubmitStatus::Rejected;
    }

    let Ok(root) = serde_json::from_str::<Value>(body) else {
        return SubmitStatus::Rejected;
    };

    let code = root
        .get("error")
        .and_then(|error| error.get("code"))
        .and_then(Value::as_str);

    match code {
        Some(code) if code.eq_ignore_ascii_case("0") => SubmitStatus::Accepted,
        _ => SubmitStatus::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, Location};
    use chrono::NaiveDateTime;
    use std::collections::HashMap;

    fn sample_incident() -> Incident {
        let date = NaiveDateTime::parse_from_str("2024-03-01 13:45:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        Incident::new(
            7,
            "Warehouse fire",
            "Large fire near the docks",
            Location::new(3, "Market Square", -1.2833, 36.8167),
        )
        .with_category(Category::new(5, "Fire", "Fires and explosions"))
        .with_occurred_at(date)
    }

    /// Splits a form body back into decoded key/value pairs.
    fn decode_pairs(body: &str) -> HashMap<String, String> {
        body.split('&')
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (
                    key.to_string(),
                    urlencoding::decode(value).unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn formats_all_fields_in_order() {
        let body = format_submit_body(SUBMIT_TEMPLATE, &sample_incident()).unwrap();
        let pairs = decode_pairs(&body);

        assert_eq!(pairs["task"], "report");
        assert_eq!(pairs["incident_title"], "Warehouse fire");
        assert_eq!(pairs["incident_description"], "Large fire near the docks");
        assert_eq!(pairs["incident_date"], "03/01/2024");
        assert_eq!(pairs["incident_hour"], "13");
        assert_eq!(pairs["incident_minute"], "45");
        assert_eq!(pairs["incident_ampm"], "pm");
        assert_eq!(pairs["incident_category"], "5");
        assert_eq!(pairs["latitude"], "-1.2833");
        assert_eq!(pairs["longitude"], "36.8167");
        assert_eq!(pairs["location_name"], "Market Square");
    }

    #[test]
    fn morning_incident_gets_am_marker() {
        let date = NaiveDateTime::parse_from_str("2024-03-01 09:05:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let mut incident = sample_incident();
        incident.occurred_at = Some(date);

        let body = format_submit_body(SUBMIT_TEMPLATE, &incident).unwrap();
        let pairs = decode_pairs(&body);
        assert_eq!(pairs["incident_hour"], "09");
        assert_eq!(pairs["incident_ampm"], "am");
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let mut incident = sample_incident();
        incident.title = "fire & flood = chaos?".to_string();

        let body = format_submit_body(SUBMIT_TEMPLATE, &incident).unwrap();
        assert!(body.contains("incident_title=fire%20%26%20flood%20%3D%20chaos%3F"));

        let pairs = decode_pairs(&body);
        assert_eq!(pairs["incident_title"], "fire & flood = chaos?");
    }

    #[test]
    fn missing_category_is_rejected() {
        let mut incident = sample_incident();
        incident.category = None;

        let err = format_submit_body(SUBMIT_TEMPLATE, &incident).unwrap_err();
        assert_eq!(err, ProtocolError::MissingCategory);
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        let mut incident = sample_incident();
        incident.occurred_at = None;

        let err = format_submit_body(SUBMIT_TEMPLATE, &incident).unwrap_err();
        assert_eq!(err, ProtocolError::MissingTimestamp);
    }

    #[test]
    fn short_template_is_rejected() {
        let err = format_submit_body("title={}&description={}", &sample_incident()).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::TemplateMismatch {
                expected: 10,
                found: 2
            }
        );
    }

    #[test]
    fn accepted_on_zero_code() {
        let status = decode_submit_response(r#"{"error":{"code":"0"}}"#);
        assert_eq!(status, SubmitStatus::Accepted);
    }

    #[test]
    fn rejected_on_nonzero_code() {
        let status = decode_submit_response(r#"{"error":{"code":"003","message":"bad"}}"#);
        assert_eq!(status, SubmitStatus::Rejected);
    }

    #[test]
    fn rejected_on_numeric_code() {
        // The wire contract is a string compare; a bare number is not "0".
        let status = decode_submit_response(r#"{"error":{"code":0}}"#);
        assert_eq!(status, SubmitStatus::Rejected);
    }

    #[test]
    fn rejected_on_plain_text() {
        let status = decode_submit_response("Service temporarily unavailable");
        assert_eq!(status, SubmitStatus::Rejected);
    }

    #[test]
    fn rejected_on_malformed_json() {
        let status = decode_submit_response("oops {not json");
        assert_eq!(status, SubmitStatus::Rejected);
    }

    mod roundtrip {
        use super::*;
        use chrono::DateTime;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn submit_body_preserves_fields(
                title in "[a-zA-Z0-9 &=?/+%]{0,40}",
                description in "[a-zA-Z0-9 &=?/+%]{0,40}",
                name in "[a-zA-Z0-9 &=?/+%]{0,40}",
                category_id in any::<i64>(),
                latitude in -90.0f64..90.0,
                longitude in -180.0f64..180.0,
                timestamp in 0i64..2_000_000_000,
            ) {
                let occurred_at = DateTime::from_timestamp(timestamp, 0)
                    .unwrap()
                    .naive_utc();
                let incident = Incident::new(
                    1,
                    title.clone(),
                    description.clone(),
                    Location::new(3, name.clone(), latitude, longitude),
                )
                .with_category(Category::new(category_id, "c", ""))
                .with_occurred_at(occurred_at);

                let body = format_submit_body(SUBMIT_TEMPLATE, &incident).unwrap();
                let pairs = decode_pairs(&body);

                prop_assert_eq!(&pairs["incident_title"], &title);
                prop_assert_eq!(&pairs["incident_description"], &description);
                prop_assert_eq!(&pairs["location_name"], &name);
                prop_assert_eq!(
                    &pairs["incident_date"],
                    &occurred_at.format("%m/%d/%Y").to_string()
                );
                prop_assert_eq!(
                    &pairs["incident_hour"],
                    &occurred_at.format("%H").to_string()
                );
                prop_assert_eq!(
                    &pairs["incident_minute"],
                    &occurred_at.format("%M").to_string()
                );
                prop_assert_eq!(pairs["incident_category"].parse::<i64>().unwrap(), category_id);
                prop_assert_eq!(pairs["latitude"].parse::<f64>().unwrap(), latitude);
                prop_assert_eq!(pairs["longitude"].parse::<f64>().unwrap(), longitude);
            }
        }
    }
}
