//! Error types for the music-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Orchestration errors
    #[error("Illegal URL: {0}")]
    UnresolvableUrl(String),

    #[error("No device available for storefront '{0}'")]
    NoDeviceAvailable(String),

    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    #[error("No usable codec found for {0}")]
    CodecNotFound(String),

    #[error("Device {host}:{port} failed to bootstrap: {message}")]
    DeviceBootstrap {
        host: String,
        port: u16,
        message: String,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Shell errors
    #[error("Unknown command: {0}")]
    Command(String),

    #[error("Dependency {0} was not installed")]
    MissingDependency(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("M3U8 processing error: {0}")]
    M3U8(String),

    // Rip pipeline errors
    #[error("Rip failed: {0}")]
    Rip(String),

    // Device transport errors
    #[error("Device error: {0}")]
    Device(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 3;
    pub const API_ERROR: i32 = 2;
    pub const DEPENDENCY_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
