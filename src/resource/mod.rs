//! Resource module for catalog resource handling.
//!
//! This module provides:
//! - Resource descriptors (song, album, artist, playlist)
//! - Structural URL and manifest parsing
//! - Resolution with short-link expansion

pub mod item;
pub mod parser;
pub mod resolver;

pub use item::{Resource, ResourceKind};
pub use parser::{parse_url, song_id_from_manifest};
pub use resolver::Resolver;
