//! Interactive shell command definitions.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::config::Codec;
use crate::error::{Error, Result};

/// One shell line.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "shell", disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands understood by the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Download a song, album, artist or playlist.
    #[command(visible_alias = "dl")]
    Download {
        url: String,

        #[arg(short, long, value_enum, default_value_t = Codec::Alac)]
        codec: Codec,

        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,

        /// Also take songs the artist only participates in.
        #[arg(long = "include-participate-songs")]
        include: bool,
    },

    /// Download every URL listed in a file, one per line.
    #[command(visible_alias = "dlf")]
    DownloadFromFile {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Codec::Alac)]
        codec: Codec,

        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Download a song from its streaming manifest URL.
    M3u8 {
        url: String,

        #[arg(short, long, value_enum, default_value_t = Codec::Alac)]
        codec: Codec,

        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,

        /// Preferred quality.
        #[arg(short, long, default_value = "")]
        quality: String,
    },

    /// List the encodings available for a song or album.
    Quality { url: String },

    /// List jobs in flight.
    Jobs,

    /// Leave the shell.
    Exit,
}

/// What a shell line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Command(ShellCommand),
    /// Help text requested with `help` or `-h`.
    Help(String),
}

/// Parse one shell line.
///
/// Fails with [`Error::Command`] when the line is not a valid command.
pub fn parse_command(line: &str) -> Result<Input> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Input::Empty);
    }

    match CommandLine::try_parse_from(words) {
        Ok(parsed) => Ok(Input::Command(parsed.command)),
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            Ok(Input::Help(e.render().to_string()))
        }
        Err(e) => {
            let reason = e
                .render()
                .to_string()
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            Err(Error::Command(format!("{} ({})", line.trim(), reason)))
        }
    }
}
