//! Active job tracking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::config::Codec;
use crate::resource::Resource;

/// Identifier of one scheduled job.
pub type JobId = Uuid;

/// Completion state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One in-flight rip.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub resource: Resource,
    pub codec: Codec,
    pub force: bool,
    /// Address of the bound device.
    pub device: String,
    pub status: JobStatus,
    pub started_at: DateTime<Local>,
}

impl Job {
    pub fn new(resource: Resource, codec: Codec, force: bool, device: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource,
            codec,
            force,
            device,
            status: JobStatus::Pending,
            started_at: Local::now(),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    jobs: Mutex<HashMap<JobId, Job>>,
    idle: Notify,
}

/// Registry of in-flight jobs. Cloning shares the same registry.
///
/// Entries are added through [`JobRegistry::track`] and removed only when the
/// returned [`JobGuard`] is dropped, so each job leaves exactly once.
#[derive(Clone, Default)]
pub struct JobRegistry {
    inner: Arc<RegistryInner>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job and return the guard that will remove it.
    pub fn track(&self, job: Job) -> JobGuard {
        let id = job.id;
        self.inner.jobs.lock().insert(id, job);
        JobGuard {
            registry: self.clone(),
            id,
            finished: false,
        }
    }

    /// Number of jobs in flight.
    pub fn len(&self) -> usize {
        self.inner.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.inner.jobs.lock().contains_key(id)
    }

    /// Copy of all jobs in flight, oldest first.
    pub fn snapshot(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.inner.jobs.lock().values().cloned().collect();
        jobs.sort_by_key(|job| job.started_at);
        jobs
    }

    /// Wait until no job is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_empty() {
                return;
            }
            notified.await;
        }
    }

    fn remove(&self, id: &JobId, status: JobStatus) -> Option<Job> {
        let mut jobs = self.inner.jobs.lock();
        let mut job = jobs.remove(id)?;
        job.status = status;
        let now_idle = jobs.is_empty();
        drop(jobs);

        if now_idle {
            self.inner.idle.notify_waiters();
        }
        Some(job)
    }
}

/// Removes its job from the registry when finished or dropped.
///
/// Dropping without [`JobGuard::finish`] (panic or task abort) records the
/// job as failed.
pub struct JobGuard {
    registry: JobRegistry,
    id: JobId,
    finished: bool,
}

impl JobGuard {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Record the outcome, remove the job and return its final record.
    pub fn finish(mut self, success: bool) -> Option<Job> {
        let status = if success {
            JobStatus::Done
        } else {
            JobStatus::Failed
        };
        self.finished = true;

        let job = self.registry.remove(&self.id, status)?;
        tracing::info!("Job {} ({}) {}", job.id, job.resource, job.status);
        Some(job)
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(job) = self.registry.remove(&self.id, JobStatus::Failed) {
            tracing::warn!("Job {} ({}) ended without finishing", job.id, job.resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;

    fn job() -> Job {
        let resource = Resource::new(ResourceKind::Song, "1", "us", "").unwrap();
        Job::new(resource, Codec::Alac, false, "127.0.0.1:5555".into())
    }

    #[test]
    fn test_guard_removes_once() {
        let registry = JobRegistry::new();
        let guard = registry.track(job());
        let id = guard.id();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&id));

        let finished = guard.finish(true).unwrap();
        assert_eq!(finished.id, id);
        assert_eq!(finished.status, JobStatus::Done);
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains(&id));
    }

    #[test]
    fn test_finish_records_failure() {
        let registry = JobRegistry::new();
        let guard = registry.track(job());

        let finished = guard.finish(false).unwrap();
        assert_eq!(finished.status, JobStatus::Failed);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropped_guard_removes() {
        let registry = JobRegistry::new();
        let a = registry.track(job());
        let b = registry.track(job());
        assert_eq!(registry.len(), 2);

        drop(a);
        assert_eq!(registry.len(), 1);
        b.finish(false).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_guard_removal_after_panic() {
        let registry = JobRegistry::new();
        let guard = registry.track(job());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = guard;
            panic!("rip exploded");
        }));

        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_oldest_first() {
        let registry = JobRegistry::new();
        let first = registry.track(job());
        let second = registry.track(job());

        let ids: Vec<JobId> = registry.snapshot().iter().map(|j| j.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.id()) && ids.contains(&second.id()));
        assert!(registry.snapshot().iter().all(|j| j.status == JobStatus::Pending));
    }

    #[tokio::test]
    async fn test_wait_idle_returns_when_empty() {
        let registry = JobRegistry::new();
        registry.wait_idle().await;

        let guard = registry.track(job());
        let waiter = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.wait_idle().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        guard.finish(true);
        waiter.await.unwrap();
    }
}
