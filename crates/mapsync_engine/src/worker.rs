//! The synchronization worker.

use crate::config::SyncConfig;
use crate::coordinator::SyncCoordinator;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, ReqwestClient};
use crate::queue::TaskQueue;
use mapsync_protocol::{
    decode_pull_payload, decode_submit_response, format_submit_body, Incident, PullRecords,
    Resource, SubmitStatus, SyncTask, TaskKind, SUBMIT_TEMPLATE,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Counters describing a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Tasks taken off the queue and finished.
    pub tasks_completed: u64,
    /// Records decoded and forwarded to the coordinator.
    pub records_pulled: u64,
    /// Incidents accepted by the remote service.
    pub incidents_posted: u64,
    /// Incidents rejected or failed in transit.
    pub incidents_failed: u64,
    /// Last per-call error message, if any.
    pub last_error: Option<String>,
}

/// The single-worker synchronization engine.
///
/// The worker owns a bounded FIFO of [`SyncTask`]s and drains it one task
/// at a time: pull tasks fetch remote records and forward them to the
/// coordinator, push tasks submit pending incidents one by one. Per-call
/// failures are logged and absorbed; only queue exhaustion ends a run.
pub struct SyncWorker<H: HttpClient, C: SyncCoordinator> {
    config: SyncConfig,
    client: H,
    coordinator: C,
    queue: TaskQueue,
    stats: RwLock<SyncStats>,
}

impl<C: SyncCoordinator> SyncWorker<ReqwestClient, C> {
    /// Creates a worker with a reqwest-backed client using the configured
    /// timeout.
    pub fn with_reqwest(config: SyncConfig, coordinator: C) -> SyncResult<Self> {
        let client = ReqwestClient::new(config.timeout)?;
        Ok(Self::new(config, client, coordinator))
    }
}

impl<H: HttpClient, C: SyncCoordinator> SyncWorker<H, C> {
    /// Creates a worker around the given client and coordinator.
    pub fn new(config: SyncConfig, client: H, coordinator: C) -> Self {
        Self {
            config,
            client,
            coordinator,
            queue: TaskQueue::new(),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// The coordinator this worker reports to.
    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    /// The HTTP client this worker issues requests through.
    pub fn client(&self) -> &H {
        &self.client
    }

    /// Adds a task to the queue.
    ///
    /// Returns [`SyncError::QueueFull`] when 10 tasks are already pending.
    pub fn enqueue(&self, task: SyncTask) -> SyncResult<()> {
        self.queue.enqueue(task)
    }

    /// Number of tasks currently pending.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// A snapshot of the run counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Drains the queue, processing tasks in FIFO order, and returns once
    /// it is empty.
    ///
    /// The worker is not a daemon: tasks enqueued after the drain loop
    /// observes an empty queue require a new run.
    pub fn run(&self) {
        while let Some(task) = self.queue.try_dequeue() {
            self.execute(&task);
            self.coordinator.task_completed();
            self.stats.write().tasks_completed += 1;
        }
    }

    /// Runs the drain loop on a dedicated thread.
    pub fn spawn(self: Arc<Self>) -> std::thread::JoinHandle<()>
    where
        H: 'static,
        C: 'static,
    {
        std::thread::spawn(move || self.run())
    }

    fn execute(&self, task: &SyncTask) {
        let fragment = task.cumulative_fragment();
        match task.kind() {
            TaskKind::Pull(resource) => {
                if task.values().is_empty() {
                    self.pull_once(resource, &fragment, None);
                } else {
                    // The extra parameter lives only in this loop; nothing
                    // leaks past the task.
                    for value in task.values() {
                        self.pull_once(resource, &fragment, Some(value));
                    }
                }
            }
            TaskKind::Push => self.push_pending(),
        }
    }

    /// One independent pull attempt; failures are absorbed here.
    fn pull_once(&self, resource: Resource, fragment: &str, extra: Option<&str>) {
        match self.try_pull(resource, fragment, extra) {
            Ok(count) => {
                self.stats.write().records_pulled += count as u64;
            }
            Err(e) => {
                warn!("pull {fragment} failed: {e}");
                self.stats.write().last_error = Some(e.to_string());
            }
        }
    }

    fn try_pull(&self, resource: Resource, fragment: &str, extra: Option<&str>) -> SyncResult<usize> {
        let url = self.pull_url(fragment, extra)?;
        debug!("pulling {url}");

        let body = self.client.get(&url).map_err(SyncError::Network)?;
        let records = decode_pull_payload(resource, &body)?;
        Ok(self.ingest(records))
    }

    /// Forwards decoded records to the coordinator, exactly once each.
    fn ingest(&self, records: PullRecords) -> usize {
        let count = records.len();
        match records {
            PullRecords::Categories(categories) => {
                for category in categories {
                    self.coordinator.add_category(category);
                }
            }
            PullRecords::Incidents(incidents) => {
                for incident in incidents {
                    self.coordinator.add_incident(incident);
                }
            }
            PullRecords::Locations(locations) => {
                for location in locations {
                    self.coordinator.add_location(location);
                }
            }
        }
        count
    }

    /// Posts every pending incident independently, in coordinator order.
    fn push_pending(&self) {
        for incident in self.coordinator.pending_incidents() {
            self.post_incident(&incident);
        }
    }

    /// Posts one incident. Exactly one of posted/failed fires per call.
    fn post_incident(&self, incident: &Incident) {
        match self.try_post(incident) {
            Ok(SubmitStatus::Accepted) => {
                debug!("incident {} accepted", incident.remote_id);
                self.coordinator.update_posted(incident);
                self.stats.write().incidents_posted += 1;
            }
            Ok(SubmitStatus::Rejected) => {
                warn!("incident {} rejected by service", incident.remote_id);
                self.coordinator.update_failed(incident);
                self.stats.write().incidents_failed += 1;
            }
            Err(e) => {
                warn!("incident {} submission failed: {e}", incident.remote_id);
                self.coordinator.update_failed(incident);

                let mut stats = self.stats.write();
                stats.incidents_failed += 1;
                stats.last_error = Some(e.to_string());
            }
        }
    }

    fn try_post(&self, incident: &Incident) -> SyncResult<SubmitStatus> {
        let body = format_submit_body(SUBMIT_TEMPLATE, incident)?;
        let url = self.submit_url()?;
        debug!("posting incident {} to {url}", incident.remote_id);

        let response = self.client.post_form(&url, &body).map_err(SyncError::Network)?;
        Ok(decode_submit_response(&response))
    }

    /// Builds a pull URL: base, slash if the base lacks one, the request
    /// prefix, the cumulative fragment, and the extra fan-out parameter.
    fn pull_url(&self, fragment: &str, extra: Option<&str>) -> SyncResult<String> {
        let base = &self.config.base_url;
        let sep = if base.ends_with('/') { "" } else { "/" };

        let mut raw = format!("{base}{sep}{}{fragment}", self.config.request_prefix);
        if let Some(extra) = extra {
            raw.push_str(extra);
        }

        self.validate_url(raw)
    }

    /// Builds the submission URL: the base URL plus a trailing slash only.
    /// Incident submission targets a distinct endpoint with no prefix or
    /// fragment.
    fn submit_url(&self) -> SyncResult<String> {
        let base = &self.config.base_url;
        let sep = if base.ends_with('/') { "" } else { "/" };
        self.validate_url(format!("{base}{sep}"))
    }

    fn validate_url(&self, raw: String) -> SyncResult<String> {
        Url::parse(&raw)
            .map_err(|e| SyncError::MalformedUrl(format!("{raw}: {e}")))?;
        Ok(raw)
    }
}
