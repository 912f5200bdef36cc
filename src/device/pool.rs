//! Storefront-indexed device pool.

use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::device::handle::Device;
use crate::error::{Error, Result};

/// Storefront used when no device serves the requested one.
pub const FALLBACK_STOREFRONT: &str = "us";

/// All connected devices, bucketed by their own storefront.
///
/// Filled during bootstrap and read-only afterwards, so it can be shared
/// behind an `Arc` and selected from concurrently.
#[derive(Debug, Default)]
pub struct DevicePool {
    buckets: HashMap<String, Vec<Arc<Device>>>,
}

impl DevicePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connected device under its own storefront.
    pub fn register(&mut self, device: Arc<Device>) {
        self.buckets
            .entry(device.storefront().to_string())
            .or_default()
            .push(device);
    }

    /// Pick a device for `storefront`.
    ///
    /// Falls back to [`FALLBACK_STOREFRONT`] when no device serves the
    /// requested storefront; the choice inside a bucket is uniformly random.
    pub fn select(&self, storefront: &str) -> Result<Arc<Device>> {
        let requested = storefront.trim().to_lowercase();

        let bucket = match self.bucket(&requested) {
            Some(bucket) => bucket,
            None => {
                if requested != FALLBACK_STOREFRONT {
                    tracing::warn!(
                        "No device for storefront '{}', falling back to '{}'",
                        requested,
                        FALLBACK_STOREFRONT
                    );
                }
                self.bucket(FALLBACK_STOREFRONT)
                    .ok_or_else(|| Error::NoDeviceAvailable(requested.clone()))?
            }
        };

        bucket
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(Error::NoDeviceAvailable(requested))
    }

    fn bucket(&self, storefront: &str) -> Option<&[Arc<Device>]> {
        self.buckets
            .get(storefront)
            .map(Vec::as_slice)
            .filter(|b| !b.is_empty())
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storefronts with at least one device, sorted.
    pub fn storefronts(&self) -> Vec<&str> {
        let mut storefronts: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        storefronts.sort_unstable();
        storefronts
    }
}
