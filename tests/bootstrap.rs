mod common;

use std::sync::Arc;

use async_trait::async_trait;

use music_downloader::api::AuthParams;
use music_downloader::config::DeviceConfig;
use music_downloader::device::{bootstrap_devices, DeviceTransport};
use music_downloader::error::{Error, Result};

use common::MockTransport;

/// Transport whose device never answers.
struct Unreachable;

#[async_trait]
impl DeviceTransport for Unreachable {
    async fn connect(&self, host: &str, port: u16) -> Result<()> {
        Err(Error::Device(format!("{}:{} refused", host, port)))
    }

    async fn auth_params(&self) -> Result<AuthParams> {
        unreachable!("auth read after failed connect")
    }

    async fn activate_fast_decrypt(&self, _ports: &[u16]) -> Result<()> {
        unreachable!("activation after failed connect")
    }

    async fn activate_agent_decrypt(&self, _port: u16) -> Result<()> {
        unreachable!("activation after failed connect")
    }
}

fn config(host: &str) -> DeviceConfig {
    DeviceConfig {
        host: host.to_string(),
        port: 5555,
        agent_port: 10020,
        su_method: "su".to_string(),
        hyper_decrypt: false,
        hyper_decrypt_num: 2,
        auth_path: "/data/local/tmp/auth.json".to_string(),
    }
}

#[tokio::test]
async fn test_failed_device_left_out_of_pool() {
    let configs = vec![config("us-box"), config("down-box"), config("jp-box")];

    let pool = bootstrap_devices(&configs, |device| -> Arc<dyn DeviceTransport> {
        match device.host.split('-').next() {
            Some("down") => Arc::new(Unreachable),
            Some(storefront) => Arc::new(MockTransport {
                storefront: storefront.to_uppercase(),
            }),
            None => Arc::new(Unreachable),
        }
    })
    .await;

    assert_eq!(pool.len(), 2);
    assert_eq!(pool.storefronts(), vec!["jp", "us"]);
    assert_eq!(pool.select("jp").unwrap().host(), "jp-box");
    assert_eq!(pool.select("de").unwrap().host(), "us-box");
}

#[tokio::test]
async fn test_no_reachable_device() {
    let pool = bootstrap_devices(&[config("down-box")], |_| {
        Arc::new(Unreachable) as Arc<dyn DeviceTransport>
    })
    .await;

    assert!(pool.is_empty());
    assert!(matches!(
        pool.select("us"),
        Err(Error::NoDeviceAvailable(_))
    ));
}
