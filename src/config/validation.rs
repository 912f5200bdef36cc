//! Configuration validation logic.

use crate::config::loader::{Config, DeviceConfig};
use crate::error::{Error, Result};
use regex::Regex;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_storefront(&config.region.default_storefront)?;
    validate_parallel_num(config.download.parallel_num)?;
    validate_rip_command(&config.download.rip_command)?;

    for device in &config.devices {
        validate_device(device)?;
    }

    Ok(())
}

/// Validate a storefront code (two ASCII letters, any case).
pub fn validate_storefront(storefront: &str) -> Result<()> {
    if storefront.is_empty() {
        return Err(Error::MissingConfig("region.default_storefront".to_string()));
    }

    let pattern = Regex::new(r"^[a-zA-Z]{2}$").map_err(|e| Error::Config(e.to_string()))?;
    if !pattern.is_match(storefront) {
        return Err(Error::ConfigValidation {
            field: "region.default_storefront".to_string(),
            message: format!(
                "Storefront '{}' must be a two-letter region code such as 'us'",
                storefront
            ),
        });
    }

    Ok(())
}

/// Validate the catalog request concurrency.
pub fn validate_parallel_num(parallel_num: usize) -> Result<()> {
    if parallel_num == 0 {
        return Err(Error::ConfigValidation {
            field: "download.parallel_num".to_string(),
            message: "Must allow at least 1 request in flight".to_string(),
        });
    }

    Ok(())
}

/// Validate the rip program setting.
pub fn validate_rip_command(rip_command: &str) -> Result<()> {
    if rip_command.trim().is_empty() {
        return Err(Error::MissingConfig("download.rip_command".to_string()));
    }

    Ok(())
}

/// Validate one device entry.
pub fn validate_device(device: &DeviceConfig) -> Result<()> {
    let host = device.host.trim();
    if host.is_empty() {
        return Err(Error::MissingConfig("devices.host".to_string()));
    }

    let lower = host.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_device") {
        return Err(Error::ConfigValidation {
            field: "devices.host".to_string(),
            message: format!("Host '{}' appears to be a placeholder", host),
        });
    }

    if device.port == 0 {
        return Err(Error::ConfigValidation {
            field: "devices.port".to_string(),
            message: format!("Device {} has port 0", host),
        });
    }

    if device.hyper_decrypt {
        if device.hyper_decrypt_num == 0 {
            return Err(Error::ConfigValidation {
                field: "devices.hyper_decrypt_num".to_string(),
                message: format!("Device {} enables hyper decrypt with 0 workers", host),
            });
        }

        if device
            .agent_port
            .checked_add(device.hyper_decrypt_num - 1)
            .is_none()
        {
            return Err(Error::ConfigValidation {
                field: "devices.agent_port".to_string(),
                message: format!(
                    "Port range {}+{} of device {} exceeds 65535",
                    device.agent_port, device.hyper_decrypt_num, host
                ),
            });
        }
    }

    Ok(())
}
