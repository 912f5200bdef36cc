//! Entry points behind the shell commands.
//!
//! Each operation resolves its input, picks a device for the resource's
//! storefront and hands off to the scheduler or the quality negotiator.
//! Errors end only the operation that raised them.

use std::path::Path;
use std::pin::pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::api::{CatalogApi, GlobalAuthParams, SongQualities};
use crate::config::{Codec, Config};
use crate::device::{Device, DevicePool};
use crate::download::{JobId, JobRegistry, JobRequest, RipOptions, RipPipeline, Scheduler};
use crate::error::{Error, Result};
use crate::quality::QualityNegotiator;
use crate::resource::{Resolver, ResourceKind};

/// Lines of a batch resolved at once. Results are consumed in line order.
const MAX_CONCURRENT_RESOLVES: usize = 8;

/// Outcome of a batch download.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Jobs started, in line order.
    pub scheduled: Vec<JobId>,
    /// Lines that could not be scheduled.
    pub failed: usize,
}

/// Result of a quality query.
#[derive(Debug)]
pub enum QualityListing {
    Song(SongQualities),
    Album(Vec<SongQualities>),
}

/// Owns the device pool, resolver, scheduler and negotiator.
pub struct Orchestrator {
    config: Arc<Config>,
    pool: Arc<DevicePool>,
    resolver: Resolver,
    scheduler: Scheduler,
    negotiator: QualityNegotiator,
    access_token: String,
}

impl Orchestrator {
    /// Assemble the orchestrator. `access_token` is the anonymous token
    /// fetched once at startup.
    pub fn new(
        config: Arc<Config>,
        pool: DevicePool,
        catalog: Arc<dyn CatalogApi>,
        ripper: Arc<dyn RipPipeline>,
        access_token: String,
    ) -> Self {
        Self {
            resolver: Resolver::new(
                Arc::clone(&catalog),
                config.region.default_storefront.clone(),
            ),
            scheduler: Scheduler::new(ripper, Arc::clone(&config), access_token.clone()),
            negotiator: QualityNegotiator::new(catalog),
            pool: Arc::new(pool),
            config,
            access_token,
        }
    }

    /// Fetch the anonymous token, then assemble.
    pub async fn connect(
        config: Arc<Config>,
        pool: DevicePool,
        catalog: Arc<dyn CatalogApi>,
        ripper: Arc<dyn RipPipeline>,
    ) -> Result<Self> {
        let token = catalog.fetch_token().await?;
        tracing::debug!("Fetched anonymous access token");
        Ok(Self::new(config, pool, catalog, ripper, token))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &DevicePool {
        &self.pool
    }

    /// Registry of in-flight jobs.
    pub fn jobs(&self) -> &JobRegistry {
        self.scheduler.registry()
    }

    /// Resolve one URL and schedule its rip.
    pub async fn download(
        &self,
        raw_url: &str,
        codec: Codec,
        force: bool,
        include_participate_songs: bool,
    ) -> Result<JobId> {
        let resource = self.resolver.resolve(raw_url).await?;
        let device = self.pool.select(resource.storefront())?;

        let request = JobRequest::new(resource, codec, force).with_options(RipOptions {
            include_participate_songs,
            ..Default::default()
        });
        Ok(self.scheduler.schedule(request, device))
    }

    /// Schedule one job per non-empty line of a file.
    pub async fn download_from_file(
        &self,
        path: &Path,
        codec: Codec,
        force: bool,
    ) -> Result<BatchReport> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(self.schedule_batch(content.lines(), codec, force).await)
    }

    /// Resolve and schedule each line on its own; a bad line is logged and
    /// skipped. Jobs start in line order.
    pub async fn schedule_batch<I, S>(&self, lines: I, codec: Codec, force: bool) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<(usize, String)> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.as_ref().trim().to_string()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let mut resolved = pin!(stream::iter(lines.iter())
            .map(|(number, line)| async move { (*number, line, self.resolver.resolve(line).await) })
            .buffered(MAX_CONCURRENT_RESOLVES));

        let mut report = BatchReport::default();
        while let Some((number, line, resource)) = resolved.next().await {
            let scheduled = resource.and_then(|resource| {
                let device = self.pool.select(resource.storefront())?;
                Ok(self
                    .scheduler
                    .schedule(JobRequest::new(resource, codec, force), device))
            });

            match scheduled {
                Ok(id) => report.scheduled.push(id),
                Err(e) => {
                    tracing::warn!("Line {} ({}) skipped: {}", number, line, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Schedule a song rip straight from a streaming manifest.
    pub fn download_manifest(
        &self,
        manifest_url: &str,
        codec: Codec,
        force: bool,
        quality: Option<String>,
    ) -> Result<JobId> {
        let resource = self.resolver.resolve_from_manifest(manifest_url)?;
        let device = self.pool.select(&self.config.region.default_storefront)?;

        let request = JobRequest::new(resource, codec, force).with_options(RipOptions {
            manifest_url: Some(manifest_url.trim().to_string()),
            quality: quality.filter(|q| !q.is_empty()),
            ..Default::default()
        });
        Ok(self.scheduler.schedule(request, device))
    }

    /// List the encodings of a song, or of every track of an album.
    pub async fn quality(&self, raw_url: &str) -> Result<QualityListing> {
        let resource = self.resolver.resolve(raw_url).await?;
        tracing::info!("Getting data for {} id {}", resource.kind(), resource.id());

        let device = self.pool.select(resource.storefront())?;
        let auth = self.auth_for(&device);

        match resource.kind() {
            ResourceKind::Song => self
                .negotiator
                .list_song_qualities(&resource, &auth, &device)
                .await
                .map(QualityListing::Song),
            ResourceKind::Album => self
                .negotiator
                .list_album_qualities(&resource, &auth)
                .await
                .map(QualityListing::Album),
            kind @ (ResourceKind::Artist | ResourceKind::Playlist) => Err(
                Error::UnsupportedResourceType(format!("quality listing of {}", kind)),
            ),
        }
    }

    fn auth_for(&self, device: &Device) -> GlobalAuthParams {
        GlobalAuthParams::from_auth_params_and_token(device.auth_params(), &self.access_token)
    }
}
