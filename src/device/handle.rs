//! Connected device handle.

use std::fmt;

use crate::api::AuthParams;
use crate::config::DeviceConfig;

/// How a device decrypts samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptMode {
    /// Built-in fast decryption, one worker per port.
    Fast { ports: Vec<u16> },
    /// Injected agent listening on one port.
    Agent { port: u16 },
}

impl DecryptMode {
    /// Pick the mode a device entry asks for.
    pub fn from_config(config: &DeviceConfig) -> Self {
        if config.hyper_decrypt {
            DecryptMode::Fast {
                ports: config.agent_ports(),
            }
        } else {
            DecryptMode::Agent {
                port: config.agent_port,
            }
        }
    }

    /// Local ports the decryption endpoints listen on.
    pub fn ports(&self) -> &[u16] {
        match self {
            DecryptMode::Fast { ports } => ports,
            DecryptMode::Agent { port } => std::slice::from_ref(port),
        }
    }
}

/// One authenticated, decryption-capable device.
///
/// Built once the device is connected; identity and auth never change
/// afterwards.
pub struct Device {
    host: String,
    port: u16,
    storefront: String,
    auth: AuthParams,
    decrypt: DecryptMode,
}

impl Device {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        auth: AuthParams,
        decrypt: DecryptMode,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            storefront: auth.storefront.trim().to_lowercase(),
            auth,
            decrypt,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` of the device.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Lowercase storefront of the signed-in account.
    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    pub fn auth_params(&self) -> &AuthParams {
        &self.auth
    }

    pub fn decrypt_mode(&self) -> &DecryptMode {
        &self.decrypt
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storefront", &self.storefront)
            .field("decrypt", &self.decrypt)
            .finish()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} [{}]", self.host, self.port, self.storefront)
    }
}
