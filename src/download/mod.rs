//! Download module for rip scheduling.
//!
//! This module provides:
//! - The registry of in-flight jobs
//! - The rip pipeline contract and its external-program implementation
//! - The scheduler that binds a resource, codec and device into a job

pub mod job;
pub mod rip;
pub mod scheduler;

pub use job::{Job, JobGuard, JobId, JobRegistry, JobStatus};
pub use rip::{ExternalRipper, RipOptions, RipPipeline, RipRequest};
pub use scheduler::{JobRequest, Scheduler};
