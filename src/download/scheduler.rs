//! Job scheduling.

use std::sync::Arc;

use crate::api::GlobalAuthParams;
use crate::config::{Codec, Config};
use crate::device::Device;
use crate::download::job::{Job, JobId, JobRegistry};
use crate::download::rip::{RipOptions, RipPipeline, RipRequest};
use crate::resource::{Resource, ResourceKind};

/// What to rip.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub resource: Resource,
    pub codec: Codec,
    pub force: bool,
    pub options: RipOptions,
}

impl JobRequest {
    pub fn new(resource: Resource, codec: Codec, force: bool) -> Self {
        Self {
            resource,
            codec,
            force,
            options: RipOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RipOptions) -> Self {
        self.options = options;
        self
    }
}

/// Spawns rip jobs and keeps the registry of the ones in flight.
pub struct Scheduler {
    registry: JobRegistry,
    ripper: Arc<dyn RipPipeline>,
    config: Arc<Config>,
    access_token: String,
}

impl Scheduler {
    /// `access_token` is the process-wide anonymous token.
    pub fn new(ripper: Arc<dyn RipPipeline>, config: Arc<Config>, access_token: String) -> Self {
        Self {
            registry: JobRegistry::new(),
            ripper,
            config,
            access_token,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Start a rip on `device` and return without waiting for it.
    ///
    /// The job is in the registry when this returns and leaves it once the
    /// rip ends, whatever the outcome.
    pub fn schedule(&self, request: JobRequest, device: Arc<Device>) -> JobId {
        let auth = GlobalAuthParams::from_auth_params_and_token(
            device.auth_params(),
            &self.access_token,
        );

        let guard = self.registry.track(Job::new(
            request.resource.clone(),
            request.codec,
            request.force,
            device.address(),
        ));
        let id = guard.id();

        tracing::info!(
            "Scheduled {} as {} on device {}",
            request.resource,
            request.codec,
            device.address()
        );

        let rip = RipRequest {
            resource: request.resource,
            auth,
            codec: request.codec,
            config: Arc::clone(&self.config),
            device,
            force: request.force,
            options: request.options,
        };
        let ripper = Arc::clone(&self.ripper);

        tokio::spawn(async move {
            let label = rip.resource.to_string();
            let result = match rip.resource.kind() {
                ResourceKind::Song => ripper.rip_song(rip).await,
                ResourceKind::Album => ripper.rip_album(rip).await,
                ResourceKind::Artist => ripper.rip_artist(rip).await,
                ResourceKind::Playlist => ripper.rip_playlist(rip).await,
            };

            if let Err(e) = &result {
                tracing::error!("Rip of {} failed: {}", label, e);
            }
            guard.finish(result.is_ok());
        });

        id
    }
}
