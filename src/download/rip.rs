//! Rip pipeline contract and the external-program implementation.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::api::GlobalAuthParams;
use crate::config::{Codec, Config};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::resource::{Resource, ResourceKind};

/// Per-request options beyond codec and force.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RipOptions {
    /// Artist rips also take songs the artist only participates in.
    pub include_participate_songs: bool,
    /// Manifest to rip from instead of looking the song up.
    pub manifest_url: Option<String>,
    /// Quality hint passed along with a manifest.
    pub quality: Option<String>,
}

/// Everything a rip operation needs.
#[derive(Debug, Clone)]
pub struct RipRequest {
    pub resource: Resource,
    pub auth: GlobalAuthParams,
    pub codec: Codec,
    pub config: Arc<Config>,
    pub device: Arc<Device>,
    pub force: bool,
    pub options: RipOptions,
}

/// The four rip operations, one per resource kind.
///
/// Failures are reported to the caller only as a failed result; the
/// pipeline logs its own details.
#[async_trait]
pub trait RipPipeline: Send + Sync {
    async fn rip_song(&self, request: RipRequest) -> Result<()>;

    async fn rip_album(&self, request: RipRequest) -> Result<()>;

    async fn rip_artist(&self, request: RipRequest) -> Result<()>;

    async fn rip_playlist(&self, request: RipRequest) -> Result<()>;
}

/// Runs `download.rip_command` once per rip.
///
/// Tokens go through the environment so they never show up in process
/// listings.
#[derive(Debug, Default)]
pub struct ExternalRipper;

impl ExternalRipper {
    pub fn new() -> Self {
        Self
    }

    /// Arguments for one rip, without the program name.
    pub fn build_args(request: &RipRequest) -> Vec<String> {
        let resource = &request.resource;
        let ports: Vec<String> = request
            .device
            .decrypt_mode()
            .ports()
            .iter()
            .map(u16::to_string)
            .collect();

        let mut args = vec![
            resource.kind().to_string(),
            resource.id().to_string(),
            "--storefront".to_string(),
            resource.storefront().to_string(),
            "--codec".to_string(),
            request.codec.to_string(),
            "--device".to_string(),
            request.device.address(),
            "--agent-ports".to_string(),
            ports.join(","),
            "--output".to_string(),
            request.config.output_directory().display().to_string(),
            "--language".to_string(),
            request.config.region.language.clone(),
        ];

        if request.force {
            args.push("--force".to_string());
        }
        if resource.kind() == ResourceKind::Artist && request.options.include_participate_songs {
            args.push("--include-participate-songs".to_string());
        }
        if let Some(manifest) = &request.options.manifest_url {
            args.push("--m3u8".to_string());
            args.push(manifest.clone());
        }
        if let Some(quality) = request.options.quality.as_deref().filter(|q| !q.is_empty()) {
            args.push("--quality".to_string());
            args.push(quality.to_string());
        }

        args
    }

    async fn run(&self, request: RipRequest) -> Result<()> {
        let program = request.config.download.rip_command.clone();
        let args = Self::build_args(&request);
        tracing::debug!("{} {}", program, args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .env("RIP_DSID", &request.auth.dsid)
            .env("RIP_ACCOUNT_TOKEN", &request.auth.account_token)
            .env("RIP_ACCESS_TOKEN", &request.auth.anonymous_access_token)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::MissingDependency(program.clone())
                } else {
                    Error::Rip(format!("Failed to run {}: {}", program, e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().last().unwrap_or_default();
            return Err(Error::Rip(format!(
                "{} exited with {}: {}",
                program, output.status, last_line
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RipPipeline for ExternalRipper {
    async fn rip_song(&self, request: RipRequest) -> Result<()> {
        self.run(request).await
    }

    async fn rip_album(&self, request: RipRequest) -> Result<()> {
        self.run(request).await
    }

    async fn rip_artist(&self, request: RipRequest) -> Result<()> {
        self.run(request).await
    }

    async fn rip_playlist(&self, request: RipRequest) -> Result<()> {
        self.run(request).await
    }
}
