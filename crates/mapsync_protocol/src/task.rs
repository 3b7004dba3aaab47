//! Synchronization task descriptions.

use serde::{Deserialize, Serialize};

/// Wire task name for incident submission.
const SUBMIT_TASK_NAME: &str = "report";

/// A remote resource that can be pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Incident categories.
    Categories,
    /// Incident reports.
    Incidents,
    /// Geographic locations.
    Locations,
}

impl Resource {
    /// The wire task name, which is also the payload array key.
    pub fn task_name(&self) -> &'static str {
        match self {
            Resource::Categories => "categories",
            Resource::Incidents => "incidents",
            Resource::Locations => "locations",
        }
    }

    /// The key wrapping each item object inside the payload array.
    pub fn item_key(&self) -> &'static str {
        match self {
            Resource::Categories => "category",
            Resource::Incidents => "incident",
            Resource::Locations => "location",
        }
    }
}

/// What a task does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Fetch remote records and ingest them locally.
    Pull(Resource),
    /// Submit pending local incidents to the remote service.
    Push,
}

/// One unit of synchronization work.
///
/// Tasks are immutable once constructed. A pull task with a non-empty
/// value list is a fan-out pull: one request is issued per value, each
/// value appended as a transient extra URL parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTask {
    kind: TaskKind,
    request_fragment: Option<String>,
    values: Vec<String>,
}

impl SyncTask {
    /// Creates a pull task for a single request against `resource`.
    pub fn pull(resource: Resource) -> Self {
        Self {
            kind: TaskKind::Pull(resource),
            request_fragment: None,
            values: Vec::new(),
        }
    }

    /// Creates a fan-out pull task: one request per value, in order.
    pub fn pull_each(resource: Resource, values: Vec<String>) -> Self {
        Self {
            kind: TaskKind::Pull(resource),
            request_fragment: None,
            values,
        }
    }

    /// Creates a push task submitting all pending incidents.
    pub fn push() -> Self {
        Self {
            kind: TaskKind::Push,
            request_fragment: None,
            values: Vec::new(),
        }
    }

    /// Sets the request fragment appended to the task name in the URL.
    pub fn with_request_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.request_fragment = Some(fragment.into());
        self
    }

    /// The task kind.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// The wire task name.
    pub fn task_name(&self) -> &'static str {
        match self.kind {
            TaskKind::Pull(resource) => resource.task_name(),
            TaskKind::Push => SUBMIT_TASK_NAME,
        }
    }

    /// The request fragment, if any.
    pub fn request_fragment(&self) -> Option<&str> {
        self.request_fragment.as_deref()
    }

    /// Fan-out values for pull tasks. Empty means a single request.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The task name with the request fragment appended.
    pub fn cumulative_fragment(&self) -> String {
        let mut fragment = String::from(self.task_name());
        if let Some(extra) = &self.request_fragment {
            fragment.push_str(extra);
        }
        fragment
    }
}
