//! Startup connection of configured devices.

use std::sync::Arc;

use crate::config::DeviceConfig;
use crate::device::handle::{DecryptMode, Device};
use crate::device::pool::DevicePool;
use crate::device::transport::DeviceTransport;
use crate::error::{Error, Result};

/// Connect every configured device and collect the ones that came up.
///
/// A device that fails is logged and left out; the pool may end up empty.
pub async fn bootstrap_devices<F>(configs: &[DeviceConfig], make_transport: F) -> DevicePool
where
    F: Fn(&DeviceConfig) -> Arc<dyn DeviceTransport>,
{
    let mut pool = DevicePool::new();

    for config in configs {
        match connect_device(config, make_transport(config)).await {
            Ok(device) => {
                tracing::info!(
                    "Device {} serves storefront '{}'",
                    device.address(),
                    device.storefront()
                );
                pool.register(Arc::new(device));
            }
            Err(e) => tracing::error!("{}", e),
        }
    }

    if pool.is_empty() {
        tracing::warn!("No device connected; downloads will fail until one is configured");
    }

    pool
}

/// Connect one device, read its auth and start its decryption mode.
pub async fn connect_device(
    config: &DeviceConfig,
    transport: Arc<dyn DeviceTransport>,
) -> Result<Device> {
    let failed = |e: Error| Error::DeviceBootstrap {
        host: config.host.clone(),
        port: config.port,
        message: e.to_string(),
    };

    transport
        .connect(&config.host, config.port)
        .await
        .map_err(failed)?;
    tracing::info!("Device {} has connected", config.address());

    let auth = transport.auth_params().await.map_err(failed)?;

    let mode = DecryptMode::from_config(config);
    let activated = match &mode {
        DecryptMode::Fast { ports } => transport.activate_fast_decrypt(ports).await,
        DecryptMode::Agent { port } => transport.activate_agent_decrypt(*port).await,
    };
    activated.map_err(failed)?;

    Ok(Device::new(
        config.host.clone(),
        config.port,
        auth,
        mode,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AuthParams;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Transport recording which activation was used.
    #[derive(Default)]
    struct Recording {
        storefront: String,
        fail_connect: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DeviceTransport for Recording {
        async fn connect(&self, host: &str, port: u16) -> Result<()> {
            self.calls.lock().push(format!("connect {}:{}", host, port));
            if self.fail_connect {
                return Err(Error::Device("refused".into()));
            }
            Ok(())
        }
        async fn auth_params(&self) -> Result<AuthParams> {
            self.calls.lock().push("auth".into());
            Ok(AuthParams {
                dsid: "1".into(),
                storefront: self.storefront.clone(),
                account_token: "t".into(),
            })
        }
        async fn activate_fast_decrypt(&self, ports: &[u16]) -> Result<()> {
            self.calls.lock().push(format!("fast {:?}", ports));
            Ok(())
        }
        async fn activate_agent_decrypt(&self, port: u16) -> Result<()> {
            self.calls.lock().push(format!("agent {}", port));
            Ok(())
        }
    }

    fn config(host: &str, hyper: bool) -> DeviceConfig {
        DeviceConfig {
            host: host.into(),
            port: 5555,
            agent_port: 10020,
            su_method: "su".into(),
            hyper_decrypt: hyper,
            hyper_decrypt_num: 2,
            auth_path: "/data/local/tmp/auth.json".into(),
        }
    }

    #[tokio::test]
    async fn test_connect_device_fast_mode() {
        let transport = Arc::new(Recording {
            storefront: "JP".into(),
            ..Default::default()
        });
        let device = connect_device(&config("a", true), transport.clone())
            .await
            .unwrap();

        assert_eq!(device.storefront(), "jp");
        assert_eq!(device.decrypt_mode().ports(), &[10020, 10021]);
        assert_eq!(
            *transport.calls.lock(),
            vec!["connect a:5555", "auth", "fast [10020, 10021]"]
        );
    }

    #[tokio::test]
    async fn test_connect_device_agent_mode() {
        let transport = Arc::new(Recording {
            storefront: "us".into(),
            ..Default::default()
        });
        connect_device(&config("a", false), transport.clone())
            .await
            .unwrap();
        assert_eq!(transport.calls.lock().last().unwrap(), "agent 10020");
    }

    #[tokio::test]
    async fn test_failed_device_is_skipped() {
        let configs = vec![config("bad", false), config("good", true)];
        let pool = bootstrap_devices(&configs, |c| {
            Arc::new(Recording {
                storefront: "us".into(),
                fail_connect: c.host == "bad",
                ..Default::default()
            }) as Arc<dyn DeviceTransport>
        })
        .await;

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.select("us").unwrap().host(), "good");
    }

    #[tokio::test]
    async fn test_bootstrap_failure_names_device() {
        let transport = Arc::new(Recording {
            fail_connect: true,
            ..Default::default()
        });
        let err = connect_device(&config("bad", false), transport)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeviceBootstrap { ref host, port: 5555, .. } if host == "bad"));
    }

    #[tokio::test]
    async fn test_no_devices_gives_empty_pool() {
        let pool = bootstrap_devices(&[], |_| -> Arc<dyn DeviceTransport> {
            Arc::new(Recording::default())
        })
        .await;
        assert!(pool.is_empty());
    }
}
