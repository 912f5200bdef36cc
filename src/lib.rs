//! Music Downloader - interactive rip scheduling across decryption devices
//!
//! This library resolves catalog URLs, picks a decryption device for each
//! resource's storefront and runs rips as concurrent background jobs.
//!
//! # Features
//!
//! - Storefront-indexed device pool with random spread and `us` fallback
//! - Structural URL parsing with single short-link expansion
//! - Job registry that drops each job exactly once, even on panic
//! - Batch downloads from a file of URLs
//! - Song and album quality listings from HLS master playlists
//! - Interactive shell with `download`, `download-from-file`, `m3u8`,
//!   `quality`, `jobs` and `exit`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use music_downloader::{
//!     bootstrap_devices, AdbTransport, Codec, Config, ExternalRipper, HttpCatalog, Orchestrator,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::load(Path::new("config.toml"))?);
//!     let catalog = Arc::new(HttpCatalog::new(&config)?);
//!     let pool = bootstrap_devices(&config.devices, |device| {
//!         Arc::new(AdbTransport::new(device)) as _
//!     })
//!     .await;
//!
//!     let orchestrator =
//!         Orchestrator::connect(config, pool, catalog, Arc::new(ExternalRipper::new())).await?;
//!     orchestrator
//!         .download("https://music.apple.com/us/album/1440857781", Codec::Alac, false, false)
//!         .await?;
//!     orchestrator.jobs().wait_idle().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod deps;
pub mod device;
pub mod download;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod quality;
pub mod resource;
pub mod shell;

// Re-exports for convenience
pub use api::{CatalogApi, HttpCatalog};
pub use config::{Codec, Config};
pub use device::{bootstrap_devices, AdbTransport, Device, DevicePool, DeviceTransport};
pub use download::{ExternalRipper, JobId, JobRegistry, RipPipeline};
pub use error::{Error, Result};
pub use orchestrator::{BatchReport, Orchestrator, QualityListing};
pub use resource::{Resource, ResourceKind};
pub use shell::Shell;
