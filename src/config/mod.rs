//! Configuration module for the music-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Codec selection
//! - Configuration validation

pub mod codec;
pub mod loader;
pub mod validation;

pub use codec::Codec;
pub use loader::{Config, DeviceConfig, DownloadConfig, RegionConfig};
pub use validation::{validate_config, validate_storefront};
