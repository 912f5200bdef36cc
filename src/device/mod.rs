//! Device module.
//!
//! This module provides:
//! - Device handles and their decryption modes
//! - The device transport contract and its ADB implementation
//! - The storefront-indexed device pool
//! - Startup bootstrap of configured devices

pub mod bootstrap;
pub mod handle;
pub mod pool;
pub mod transport;

pub use bootstrap::{bootstrap_devices, connect_device};
pub use handle::{DecryptMode, Device};
pub use pool::{DevicePool, FALLBACK_STOREFRONT};
pub use transport::{AdbTransport, DeviceTransport};
