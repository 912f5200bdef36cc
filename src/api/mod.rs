//! Catalog API module.
//!
//! This module provides:
//! - The `CatalogApi` contract and its HTTP implementation
//! - Device and job authentication bundles
//! - Encoding discovery from HLS master playlists
//! - API response types

pub mod auth;
pub mod client;
pub mod playlist;
pub mod types;

pub use auth::{AuthParams, GlobalAuthParams};
pub use client::{CatalogApi, HttpCatalog};
pub use types::*;
