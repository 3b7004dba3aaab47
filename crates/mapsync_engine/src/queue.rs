//! Bounded FIFO queue of pending sync tasks.

use crate::error::{SyncError, SyncResult};
use mapsync_protocol::SyncTask;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Fixed queue capacity.
pub const QUEUE_CAPACITY: usize = 10;

/// A bounded FIFO of pending tasks, safe for concurrent producers and a
/// single consumer.
///
/// Enqueueing onto a full queue is rejected with [`SyncError::QueueFull`]
/// rather than blocking, so producers observe backpressure explicitly.
pub struct TaskQueue {
    pending: Mutex<VecDeque<SyncTask>>,
    available: Condvar,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(QUEUE_CAPACITY)),
            available: Condvar::new(),
        }
    }

    /// Adds a task to the tail of the queue.
    ///
    /// Returns [`SyncError::QueueFull`] when the queue already holds
    /// [`QUEUE_CAPACITY`] tasks.
    pub fn enqueue(&self, task: SyncTask) -> SyncResult<()> {
        let mut pending = self.pending.lock();
        if pending.len() >= QUEUE_CAPACITY {
            return Err(SyncError::QueueFull {
                capacity: QUEUE_CAPACITY,
            });
        }
        pending.push_back(task);
        drop(pending);

        self.available.notify_one();
        Ok(())
    }

    /// Removes and returns the head of the queue, blocking until a task
    /// is available.
    pub fn dequeue(&self) -> SyncTask {
        let mut pending = self.pending.lock();
        loop {
            if let Some(task) = pending.pop_front() {
                return task;
            }
            self.available.wait(&mut pending);
        }
    }

    /// Removes and returns the head of the queue if one is available.
    pub fn try_dequeue(&self) -> Option<SyncTask> {
        self.pending.lock().pop_front()
    }

    /// Number of tasks currently pending.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsync_protocol::Resource;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let queue = TaskQueue::new();
        queue.enqueue(SyncTask::pull(Resource::Categories)).unwrap();
        queue.enqueue(SyncTask::pull(Resource::Locations)).unwrap();
        queue.enqueue(SyncTask::push()).unwrap();

        assert_eq!(
            queue.try_dequeue().unwrap(),
            SyncTask::pull(Resource::Categories)
        );
        assert_eq!(
            queue.try_dequeue().unwrap(),
            SyncTask::pull(Resource::Locations)
        );
        assert_eq!(queue.try_dequeue().unwrap(), SyncTask::push());
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn eleventh_enqueue_is_rejected() {
        let queue = TaskQueue::new();
        for _ in 0..QUEUE_CAPACITY {
            queue.enqueue(SyncTask::pull(Resource::Categories)).unwrap();
        }
        assert_eq!(queue.len(), QUEUE_CAPACITY);

        let err = queue.enqueue(SyncTask::push()).unwrap_err();
        assert!(matches!(err, SyncError::QueueFull { capacity: 10 }));
        assert_eq!(queue.len(), QUEUE_CAPACITY);
    }

    #[test]
    fn space_frees_after_dequeue() {
        let queue = TaskQueue::new();
        for _ in 0..QUEUE_CAPACITY {
            queue.enqueue(SyncTask::pull(Resource::Categories)).unwrap();
        }
        queue.try_dequeue().unwrap();
        queue.enqueue(SyncTask::push()).unwrap();
        assert_eq!(queue.len(), QUEUE_CAPACITY);
    }

    #[test]
    fn dequeue_blocks_until_enqueue() {
        let queue = Arc::new(TaskQueue::new());

        let producer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                queue.enqueue(SyncTask::push()).unwrap();
            })
        };

        let task = queue.dequeue();
        assert_eq!(task, SyncTask::push());
        producer.join().unwrap();
    }
}
