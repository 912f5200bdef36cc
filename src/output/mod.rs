//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Spinners for catalog queries
//! - Quality and job tables

pub mod console;
pub mod progress;
pub mod tables;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_prompt, print_success,
    print_warning,
};
pub use progress::create_spinner;
pub use tables::{jobs_table, print_song_qualities, quality_table};
