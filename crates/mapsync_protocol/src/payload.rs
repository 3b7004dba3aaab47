//! Pull payload decoding.
//!
//! Pull responses wrap everything in a `payload` object, keyed by the
//! task name, with each array element holding a single nested item
//! object:
//!
//! ```json
//! {"payload": {"categories": [{"category": {"id": 5, "title": "..."}}]}}
//! ```

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::{Category, Incident, Location};
use crate::task::Resource;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use tracing::debug;

/// Key wrapping the whole pull response body.
const PAYLOAD_KEY: &str = "payload";

/// Wire format for incident timestamps.
const WIRE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Records decoded from one pull response.
#[derive(Debug, Clone, PartialEq)]
pub enum PullRecords {
    /// Decoded categories.
    Categories(Vec<Category>),
    /// Decoded incidents.
    Incidents(Vec<Incident>),
    /// Decoded locations.
    Locations(Vec<Location>),
}

impl PullRecords {
    /// Number of records decoded.
    pub fn len(&self) -> usize {
        match self {
            PullRecords::Categories(records) => records.len(),
            PullRecords::Incidents(records) => records.len(),
            PullRecords::Locations(records) => records.len(),
        }
    }

    /// Returns true if no records were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decodes a pull response body into domain records.
///
/// Any structural error (missing key, wrong type) aborts the whole call:
/// either every record in the body decodes or none do. An unparseable
/// incident timestamp is not structural; the incident is kept with
/// `occurred_at` unset.
pub fn decode_pull_payload(resource: Resource, body: &str) -> ProtocolResult<PullRecords> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| ProtocolError::payload(format!("invalid json: {e}")))?;

    let payload = object_field(
        root.as_object()
            .ok_or_else(|| ProtocolError::payload("response is not an object"))?,
        PAYLOAD_KEY,
    )?;

    let items = payload
        .get(resource.task_name())
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProtocolError::payload(format!("missing {} array", resource.task_name()))
        })?;

    match resource {
        Resource::Categories => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                records.push(decode_category(unwrap_item(item, resource)?)?);
            }
            Ok(PullRecords::Categories(records))
        }
        Resource::Incidents => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                records.push(decode_incident(unwrap_item(item, resource)?)?);
            }
            Ok(PullRecords::Incidents(records))
        }
        Resource::Locations => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                records.push(decode_location(unwrap_item(item, resource)?)?);
            }
            Ok(PullRecords::Locations(records))
        }
    }
}

/// Unwraps the single nested object stored under the resource's item key.
fn unwrap_item<'a>(item: &'a Value, resource: Resource) -> ProtocolResult<&'a Map<String, Value>> {
    item.as_object()
        .and_then(|wrapper| wrapper.get(resource.item_key()))
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ProtocolError::payload(format!("missing {} item object", resource.item_key()))
        })
}

fn decode_category(item: &Map<String, Value>) -> ProtocolResult<Category> {
    Ok(Category {
        remote_id: int_field(item, "id")?,
        title: text_field(item, "title")?,
        description: text_field(item, "description")?,
    })
}

fn decode_incident(item: &Map<String, Value>) -> ProtocolResult<Incident> {
    let location = Location {
        remote_id: int_field(item, "locationid")?,
        name: text_field(item, "locationname")?,
        latitude: float_field(item, "locationlatitude")?,
        longitude: float_field(item, "locationlongitude")?,
    };

    let date_str = text_field(item, "incidentdate")?;
    let occurred_at = match NaiveDateTime::parse_from_str(&date_str, WIRE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("unparseable incident date {date_str:?}: {e}");
            None
        }
    };

    Ok(Incident {
        remote_id: int_field(item, "incidentid")?,
        title: text_field(item, "incidenttitle")?,
        description: text_field(item, "incidentdescription")?,
        location,
        category: None,
        occurred_at,
        posted: false,
    })
}

fn decode_location(item: &Map<String, Value>) -> ProtocolResult<Location> {
    Ok(Location {
        remote_id: int_field(item, "id")?,
        name: text_field(item, "name")?,
        latitude: float_field(item, "latitude")?,
        longitude: float_field(item, "longitude")?,
    })
}

fn object_field<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> ProtocolResult<&'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| ProtocolError::payload(format!("missing {key} object")))
}

fn text_field(item: &Map<String, Value>, key: &str) -> ProtocolResult<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProtocolError::payload(format!("missing {key} string")))
}

/// Reads an integer field, accepting a JSON number or a numeric string.
fn int_field(item: &Map<String, Value>, key: &str) -> ProtocolResult<i64> {
    let value = item
        .get(key)
        .ok_or_else(|| ProtocolError::payload(format!("missing {key} field")))?;

    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ProtocolError::payload(format!("{key} is not an integer")))
}

/// Reads a float field, accepting a JSON number or a numeric string.
fn float_field(item: &Map<String, Value>, key: &str) -> ProtocolResult<f64> {
    let value = item
        .get(key)
        .ok_or_else(|| ProtocolError::payload(format!("missing {key} field")))?;

    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ProtocolError::payload(format!("{key} is not a number")))
}
