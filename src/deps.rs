//! Startup check for external programs.

use std::process::Stdio;

use tokio::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// Make sure `adb` and the configured rip program can be launched.
pub async fn check_dependencies(config: &Config) -> Result<()> {
    probe("adb", &["version"]).await?;
    probe(&config.download.rip_command, &["--version"]).await?;
    Ok(())
}

/// Launch `program` once. Only a missing binary is an error; its exit
/// status is not inspected.
async fn probe(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) => {
            tracing::debug!("{} found ({})", program, status);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::MissingDependency(program.to_string()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program() {
        let result = probe("definitely-not-a-real-program-7f3a", &[]).await;
        match result {
            Err(Error::MissingDependency(name)) => {
                assert_eq!(name, "definitely-not-a-real-program-7f3a")
            }
            other => panic!("expected MissingDependency, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rip_command_checked() {
        let mut config = Config::default();
        config.download.rip_command = "definitely-not-a-real-ripper-7f3a".into();
        // adb may or may not be installed; either way the ripper is missing.
        assert!(matches!(
            check_dependencies(&config).await,
            Err(Error::MissingDependency(_))
        ));
    }
}
