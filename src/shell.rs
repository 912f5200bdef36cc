//! Interactive command loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::{parse_command, Input, ShellCommand};
use crate::error::Result;
use crate::orchestrator::{Orchestrator, QualityListing};
use crate::output::{
    create_spinner, jobs_table, print_error, print_info, print_prompt, print_song_qualities,
    print_success, print_warning,
};

/// Whether the loop keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Reads commands and hands each one to the orchestrator.
pub struct Shell {
    orchestrator: Orchestrator,
}

impl Shell {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Run `initial` first if given, then read stdin until `exit`, EOF or Ctrl-C.
    pub async fn run(&self, initial: Option<String>) -> Result<usize> {
        self.run_with(BufReader::new(tokio::io::stdin()), initial).await
    }

    /// Run the session over `input`.
    ///
    /// Ctrl-C ends the session at any point, also while a command is running.
    /// Returns the number of jobs still running, which are abandoned.
    pub async fn run_with<R>(&self, input: R, initial: Option<String>) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut lines = input.lines();
        let mut pending = initial;

        loop {
            let line = match pending.take() {
                Some(line) => line,
                None => {
                    print_prompt();
                    tokio::select! {
                        line = lines.next_line() => match line? {
                            Some(line) => line,
                            None => break,
                        },
                        _ = &mut ctrl_c => {
                            println!();
                            break;
                        }
                    }
                }
            };

            tokio::select! {
                flow = self.execute(&line) => {
                    if flow == Flow::Exit {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    println!();
                    break;
                }
            }
        }

        let running = self.orchestrator.jobs().len();
        if running > 0 {
            print_warning(&format!("Exiting with {} job(s) still running", running));
        }
        Ok(running)
    }

    /// Execute one line. Failures are reported and never end the session.
    pub async fn execute(&self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(Input::Empty) => return Flow::Continue,
            Ok(Input::Help(text)) => {
                println!("{}", text);
                return Flow::Continue;
            }
            Ok(Input::Command(command)) => command,
            Err(e) => {
                print_warning(&e.to_string());
                return Flow::Continue;
            }
        };

        match command {
            ShellCommand::Download {
                url,
                codec,
                force,
                include,
            } => match self.orchestrator.download(&url, codec, force, include).await {
                Ok(id) => print_info(&format!("Scheduled job {}", id)),
                Err(e) => print_error(&e.to_string()),
            },

            ShellCommand::DownloadFromFile { file, codec, force } => {
                match self
                    .orchestrator
                    .download_from_file(&file, codec, force)
                    .await
                {
                    Ok(report) if report.failed == 0 => print_success(&format!(
                        "Scheduled {} job(s) from {}",
                        report.scheduled.len(),
                        file.display()
                    )),
                    Ok(report) => print_warning(&format!(
                        "Scheduled {} job(s) from {}, {} line(s) skipped",
                        report.scheduled.len(),
                        file.display(),
                        report.failed
                    )),
                    Err(e) => print_error(&format!("{}: {}", file.display(), e)),
                }
            }

            ShellCommand::M3u8 {
                url,
                codec,
                force,
                quality,
            } => match self
                .orchestrator
                .download_manifest(&url, codec, force, Some(quality))
            {
                Ok(id) => print_info(&format!("Scheduled job {}", id)),
                Err(e) => print_error(&e.to_string()),
            },

            ShellCommand::Quality { url } => self.show_qualities(&url).await,

            ShellCommand::Jobs => {
                let jobs = self.orchestrator.jobs().snapshot();
                if jobs.is_empty() {
                    print_info("No jobs running");
                } else {
                    println!("{}", jobs_table(&jobs));
                }
            }

            ShellCommand::Exit => return Flow::Exit,
        }

        Flow::Continue
    }

    async fn show_qualities(&self, url: &str) {
        let spinner = create_spinner("Querying catalog...");
        let result = self.orchestrator.quality(url).await;
        spinner.finish_and_clear();

        match result {
            Ok(QualityListing::Song(listing)) => print_song_qualities(&listing),
            Ok(QualityListing::Album(tracks)) => {
                if tracks.is_empty() {
                    print_warning("No track of this album has a usable codec");
                }
                for listing in &tracks {
                    print_song_qualities(listing);
                }
            }
            Err(e) => print_error(&e.to_string()),
        }
    }
}
