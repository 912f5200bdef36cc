//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    /// Decryption devices, one connection per entry.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Catalog region configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Storefront used when a request carries none (manifest references).
    #[serde(default = "default_storefront")]
    pub default_storefront: String,

    /// Language requested from the catalog.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            default_storefront: default_storefront(),
            language: default_language(),
        }
    }
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Proxy URL for catalog requests.
    #[serde(default)]
    pub proxy: Option<String>,

    /// Maximum number of catalog requests in flight at once.
    #[serde(default = "default_parallel_num")]
    pub parallel_num: usize,

    /// External program that performs the actual rip.
    #[serde(default = "default_rip_command")]
    pub rip_command: String,

    /// Base directory for downloaded files.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            parallel_num: default_parallel_num(),
            rip_command: default_rip_command(),
            output_dir: None,
        }
    }
}

/// One decryption device entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// ADB host of the device.
    pub host: String,

    /// ADB port of the device.
    pub port: u16,

    /// First local port used by the decryption agent.
    pub agent_port: u16,

    /// Command used to gain root on the device.
    #[serde(default = "default_su_method")]
    pub su_method: String,

    /// Use the built-in fast decryption mode instead of the injected agent.
    #[serde(default)]
    pub hyper_decrypt: bool,

    /// Number of fast decryption workers, one port each.
    #[serde(default = "default_hyper_decrypt_num")]
    pub hyper_decrypt_num: u16,

    /// Device-side path of the auth bundle.
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
}

impl DeviceConfig {
    /// Address of the device as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Local ports claimed by the decryption agent(s) of this device.
    pub fn agent_ports(&self) -> Vec<u16> {
        if self.hyper_decrypt {
            (0..self.hyper_decrypt_num)
                .filter_map(|offset| self.agent_port.checked_add(offset))
                .collect()
        } else {
            vec![self.agent_port]
        }
    }
}

fn default_storefront() -> String {
    "us".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_parallel_num() -> usize {
    1
}

fn default_rip_command() -> String {
    "ripper".to_string()
}

fn default_su_method() -> String {
    "su".to_string()
}

fn default_hyper_decrypt_num() -> u16 {
    2
}

fn default_auth_path() -> String {
    "/data/local/tmp/auth.json".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path`, falling back to the platform config directory when
    /// `path` does not exist.
    pub fn load_with_fallback(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        match Self::platform_config_path() {
            Some(fallback) if fallback.exists() => {
                tracing::info!("Using configuration from {}", fallback.display());
                Self::load(&fallback)
            }
            _ => Self::load(path),
        }
    }

    /// `config.toml` inside the platform configuration directory.
    pub fn platform_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "music-downloader")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the effective download directory.
    pub fn output_directory(&self) -> PathBuf {
        self.download
            .output_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
