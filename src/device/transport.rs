//! Device transport contract and the ADB implementation.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::api::AuthParams;
use crate::config::DeviceConfig;
use crate::error::{Error, Result};

/// Fast decryption binary pushed to the device.
const FAST_DECRYPT_BIN: &str = "/data/local/tmp/hyper-decrypt";

/// Agent launcher pushed to the device.
const AGENT_BIN: &str = "/data/local/tmp/decrypt-agent";

/// Connection to one decryption device.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Establish the connection.
    async fn connect(&self, host: &str, port: u16) -> Result<()>;

    /// Read the auth bundle of the signed-in account.
    async fn auth_params(&self) -> Result<AuthParams>;

    /// Start fast decryption workers, one per port.
    async fn activate_fast_decrypt(&self, ports: &[u16]) -> Result<()>;

    /// Start the injected agent on one port.
    async fn activate_agent_decrypt(&self, port: u16) -> Result<()>;
}

/// Device reached through `adb`.
pub struct AdbTransport {
    serial: String,
    su_method: String,
    auth_path: String,
}

impl AdbTransport {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            serial: config.address(),
            su_method: config.su_method.clone(),
            auth_path: config.auth_path.clone(),
        }
    }

    /// Shell command wrapped in the configured root method.
    fn root_command(&self, command: &str) -> String {
        format!("{} -c '{}'", self.su_method, command)
    }

    /// Run `adb` and return its stdout.
    async fn adb(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("adb {}", args.join(" "));

        let output = Command::new("adb")
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::MissingDependency("adb".to_string())
                } else {
                    Error::Device(format!("Failed to run adb: {}", e))
                }
            })?;

        if !output.status.success() {
            return Err(Error::Device(format!(
                "adb {} exited with {}: {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Start a long-running root command on the device without waiting for it.
    fn spawn_root(&self, command: &str) -> Result<()> {
        Command::new("adb")
            .args(["-s", &self.serial, "shell", &self.root_command(command)])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Device(format!("Failed to start '{}': {}", command, e)))?;
        Ok(())
    }

    async fn forward(&self, port: u16) -> Result<()> {
        let spec = format!("tcp:{}", port);
        self.adb(&["-s", &self.serial, "forward", &spec, &spec])
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl DeviceTransport for AdbTransport {
    async fn connect(&self, host: &str, port: u16) -> Result<()> {
        let target = format!("{}:{}", host, port);
        let out = self.adb(&["connect", &target]).await?;

        if out.contains("connected to") {
            Ok(())
        } else {
            Err(Error::Device(format!(
                "Could not connect to {}: {}",
                target,
                out.trim()
            )))
        }
    }

    async fn auth_params(&self) -> Result<AuthParams> {
        let cat = self.root_command(&format!("cat {}", self.auth_path));
        let out = self.adb(&["-s", &self.serial, "shell", &cat]).await?;
        let auth: AuthParams = serde_json::from_str(out.trim())?;
        Ok(auth)
    }

    async fn activate_fast_decrypt(&self, ports: &[u16]) -> Result<()> {
        for port in ports {
            self.forward(*port).await?;
            self.spawn_root(&format!("{} -H 127.0.0.1 -D {}", FAST_DECRYPT_BIN, port))?;
        }
        Ok(())
    }

    async fn activate_agent_decrypt(&self, port: u16) -> Result<()> {
        self.forward(port).await?;
        self.spawn_root(&format!("{} --port {}", AGENT_BIN, port))
    }
}
