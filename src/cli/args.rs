//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Interactive music downloader shell.
#[derive(Parser, Debug)]
#[command(
    name = "music-downloader",
    version,
    about = "Schedule music rips across a pool of decryption devices",
    long_about = "An interactive shell that resolves catalog URLs, picks a decryption device \
                  for each resource's storefront and runs rips concurrently.\n\n\
                  Words after the options are run as the first shell command, e.g.\n  \
                  music-downloader dl https://music.apple.com/us/album/1440857781"
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml", env = "MUSIC_DOWNLOADER_CONFIG")]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Shell command to run before the prompt starts.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Args {
    /// The trailing words as one shell line, if any were given.
    pub fn initial_command(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
