//! Domain records exchanged with the remote mapping service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An incident category as defined by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier assigned by the remote service.
    pub remote_id: i64,
    /// Category title.
    pub title: String,
    /// Category description.
    pub description: String,
}

impl Category {
    /// Creates a new category.
    pub fn new(remote_id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            remote_id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A geographic location known to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Identifier assigned by the remote service.
    pub remote_id: i64,
    /// Location name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Creates a new location.
    pub fn new(remote_id: i64, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            remote_id,
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// A mapped incident report.
///
/// Incidents pulled from the remote service carry no category and may lack
/// a timestamp when the wire date fails to decode. Both are required when
/// submitting an incident back to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Identifier assigned by the remote service.
    pub remote_id: i64,
    /// Incident title.
    pub title: String,
    /// Incident description.
    pub description: String,
    /// Where the incident occurred.
    pub location: Location,
    /// Associated category, required for submission.
    pub category: Option<Category>,
    /// When the incident occurred, if known.
    pub occurred_at: Option<NaiveDateTime>,
    /// Whether the incident has already been pushed to the remote service.
    pub posted: bool,
}

impl Incident {
    /// Creates a new unposted incident.
    pub fn new(
        remote_id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            remote_id,
            title: title.into(),
            description: description.into(),
            location,
            category: None,
            occurred_at: None,
            posted: false,
        }
    }

    /// Sets the associated category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the occurrence timestamp.
    pub fn with_occurred_at(mut self, occurred_at: NaiveDateTime) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}
