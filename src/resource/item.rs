//! Resource descriptor representation.

use std::fmt;

use crate::error::{Error, Result};

/// Kind of catalog resource the shell can rip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Song,
    Album,
    Artist,
    Playlist,
}

impl ResourceKind {
    /// Path segment naming this kind in catalog URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Song => "song",
            ResourceKind::Album => "album",
            ResourceKind::Artist => "artist",
            ResourceKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, typed catalog resource.
///
/// Fields are private so the kind, id and storefront stay as they were at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: ResourceKind,
    id: String,
    storefront: String,
    url: String,
}

impl Resource {
    /// Create a descriptor. `id` and `storefront` must be non-empty; the
    /// storefront is stored lowercase.
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        storefront: impl AsRef<str>,
        url: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let storefront = storefront.as_ref().trim().to_lowercase();
        let url = url.into();

        if id.trim().is_empty() {
            return Err(Error::UnresolvableUrl(format!("{} without id: {}", kind, url)));
        }
        if storefront.is_empty() {
            return Err(Error::UnresolvableUrl(format!(
                "{} {} without storefront",
                kind, id
            )));
        }

        Ok(Self {
            kind,
            id,
            storefront,
            url,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    /// Canonical URL. Empty for descriptors built from a manifest.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.id, self.storefront)
    }
}
