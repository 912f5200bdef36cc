//! Mock catalog, device transport and rip pipeline shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use music_downloader::api::{
    AlbumInfo, AudioQuality, AuthParams, CatalogApi, GlobalAuthParams, SongMetadata,
    SongQualities,
};
use music_downloader::config::Config;
use music_downloader::device::{DecryptMode, Device, DevicePool, DeviceTransport};
use music_downloader::download::{RipOptions, RipPipeline, RipRequest};
use music_downloader::error::{Error, Result};
use music_downloader::orchestrator::Orchestrator;
use music_downloader::resource::{Resource, ResourceKind};

pub fn quality(codec_id: &str, bitrate: u64) -> AudioQuality {
    AudioQuality {
        codec_id: codec_id.to_string(),
        codec: "alac".to_string(),
        bitrate,
        average_bitrate: bitrate,
        channels: "2".to_string(),
        sample_rate: 44100,
        bit_depth: 16,
    }
}

pub fn song(id: &str, qualities: Vec<AudioQuality>) -> SongQualities {
    SongQualities {
        song: SongMetadata {
            id: id.to_string(),
            title: format!("Title {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
        },
        qualities,
    }
}

/// Catalog answering from fixed data and counting short-link expansions.
#[derive(Default)]
pub struct MockCatalog {
    pub short_links: HashMap<String, String>,
    pub song: Option<SongQualities>,
    pub album: AlbumInfo,
    pub expansions: AtomicUsize,
    /// Song queries never answer.
    pub stall: bool,
}

impl MockCatalog {
    pub fn expansions(&self) -> usize {
        self.expansions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn fetch_token(&self) -> Result<String> {
        Ok("anonymous-token".to_string())
    }

    async fn fetch_real_url(&self, short_link: &str) -> Result<String> {
        self.expansions.fetch_add(1, Ordering::SeqCst);
        self.short_links
            .get(short_link)
            .cloned()
            .ok_or_else(|| Error::Api(format!("no redirect for {}", short_link)))
    }

    async fn fetch_song_qualities(
        &self,
        song: &Resource,
        _auth: &GlobalAuthParams,
        _device: &Device,
    ) -> Result<SongQualities> {
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.song
            .clone()
            .ok_or_else(|| Error::CodecNotFound(song.id().to_string()))
    }

    async fn fetch_album_info(
        &self,
        _album: &Resource,
        _auth: &GlobalAuthParams,
    ) -> Result<AlbumInfo> {
        Ok(self.album.clone())
    }
}

/// Transport of a device that is always up.
pub struct MockTransport {
    pub storefront: String,
}

#[async_trait]
impl DeviceTransport for MockTransport {
    async fn connect(&self, _host: &str, _port: u16) -> Result<()> {
        Ok(())
    }

    async fn auth_params(&self) -> Result<AuthParams> {
        Ok(auth(&self.storefront))
    }

    async fn activate_fast_decrypt(&self, _ports: &[u16]) -> Result<()> {
        Ok(())
    }

    async fn activate_agent_decrypt(&self, _port: u16) -> Result<()> {
        Ok(())
    }
}

pub fn auth(storefront: &str) -> AuthParams {
    AuthParams {
        dsid: "1000".to_string(),
        storefront: storefront.to_string(),
        account_token: "account-token".to_string(),
    }
}

pub fn device(host: &str, storefront: &str) -> Arc<Device> {
    Arc::new(Device::new(
        host,
        5555,
        auth(storefront),
        DecryptMode::Agent { port: 10020 },
    ))
}

/// Pool of `(host, storefront)` devices.
pub fn pool(devices: &[(&str, &str)]) -> DevicePool {
    let mut pool = DevicePool::new();
    for (host, storefront) in devices {
        pool.register(device(host, storefront));
    }
    pool
}

/// One call seen by the recording ripper.
#[derive(Debug, Clone)]
pub struct RipCall {
    pub kind: ResourceKind,
    pub id: String,
    pub storefront: String,
    pub device: String,
    pub force: bool,
    pub options: RipOptions,
}

/// Ripper that records each request and optionally holds it until the
/// test releases a permit.
#[derive(Default)]
pub struct RecordingRipper {
    pub calls: Mutex<Vec<RipCall>>,
    pub gate: Option<Arc<Semaphore>>,
    pub fail: bool,
}

impl RecordingRipper {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Self {
                gate: Some(Arc::clone(&gate)),
                ..Default::default()
            },
            gate,
        )
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RipCall> {
        self.calls.lock().clone()
    }

    async fn record(&self, kind: ResourceKind, request: RipRequest) -> Result<()> {
        self.calls.lock().push(RipCall {
            kind,
            id: request.resource.id().to_string(),
            storefront: request.resource.storefront().to_string(),
            device: request.device.address(),
            force: request.force,
            options: request.options.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| Error::Rip("gate closed".into()))?
                .forget();
        }

        if self.fail {
            Err(Error::Rip("boom".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RipPipeline for RecordingRipper {
    async fn rip_song(&self, request: RipRequest) -> Result<()> {
        self.record(ResourceKind::Song, request).await
    }

    async fn rip_album(&self, request: RipRequest) -> Result<()> {
        self.record(ResourceKind::Album, request).await
    }

    async fn rip_artist(&self, request: RipRequest) -> Result<()> {
        self.record(ResourceKind::Artist, request).await
    }

    async fn rip_playlist(&self, request: RipRequest) -> Result<()> {
        self.record(ResourceKind::Playlist, request).await
    }
}

pub fn orchestrator(
    pool: DevicePool,
    catalog: Arc<MockCatalog>,
    ripper: Arc<RecordingRipper>,
) -> Orchestrator {
    Orchestrator::new(
        Arc::new(Config::default()),
        pool,
        catalog,
        ripper,
        "anonymous-token".to_string(),
    )
}
