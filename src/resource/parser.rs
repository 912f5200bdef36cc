//! Structural parsing of catalog URLs and manifest references.

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::resource::item::{Resource, ResourceKind};

/// Path kinds that exist in the catalog but cannot be ripped.
const UNSUPPORTED_KINDS: &[&str] = &[
    "music-video",
    "station",
    "curator",
    "apple-curator",
    "room",
    "post",
    "radio",
];

/// Parse a catalog URL into a resource descriptor.
///
/// Accepted shapes (host is not checked):
/// - `/{sf}/song/[{slug}/]{id}`
/// - `/{sf}/album/[{slug}/]{id}` (with `?i={song}` it names a song)
/// - `/{sf}/artist/[{slug}/]{id}`
/// - `/{sf}/playlist/[{slug}/]pl.{id}`
///
/// Returns `UnresolvableUrl` when the input has none of these shapes and
/// `UnsupportedResourceType` when it is a catalog URL of another kind.
pub fn parse_url(raw: &str) -> Result<Resource> {
    let raw = raw.trim();
    let unresolvable = || Error::UnresolvableUrl(raw.to_string());

    let url = Url::parse(raw).map_err(|_| unresolvable())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(unresolvable());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    // storefront, kind, optional slug, id
    if segments.len() < 3 || segments.len() > 4 {
        return Err(unresolvable());
    }

    let storefront = segments[0];
    if !is_storefront(storefront) {
        return Err(unresolvable());
    }

    let kind = segments[1];
    let id = segments[segments.len() - 1];

    let resource_kind = match kind {
        "song" => ResourceKind::Song,
        "album" => ResourceKind::Album,
        "artist" => ResourceKind::Artist,
        "playlist" => ResourceKind::Playlist,
        other if UNSUPPORTED_KINDS.contains(&other) => {
            return Err(Error::UnsupportedResourceType(format!("{} ({})", other, raw)));
        }
        _ => return Err(unresolvable()),
    };

    match resource_kind {
        ResourceKind::Playlist => {
            if !is_playlist_id(id) {
                return Err(unresolvable());
            }
        }
        _ => {
            if !is_numeric_id(id) {
                return Err(unresolvable());
            }
        }
    }

    // A track inside an album page.
    if resource_kind == ResourceKind::Album {
        if let Some((_, song_id)) = url.query_pairs().find(|(k, _)| k == "i") {
            if !is_numeric_id(&song_id) {
                return Err(unresolvable());
            }
            return Resource::new(ResourceKind::Song, song_id.into_owned(), storefront, raw);
        }
    }

    Resource::new(resource_kind, id, storefront, raw)
}

/// Extract the song id embedded in a streaming manifest URL.
///
/// Manifest file names carry the adam id as `_A{digits}_`.
pub fn song_id_from_manifest(manifest_url: &str) -> Result<String> {
    let pattern =
        Regex::new(r"_A(\d+)_").map_err(|e| Error::M3U8(format!("Bad id pattern: {}", e)))?;

    pattern
        .captures(manifest_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::UnresolvableUrl(manifest_url.trim().to_string()))
}

fn is_storefront(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_playlist_id(s: &str) -> bool {
    s.len() > 3
        && s.starts_with("pl.")
        && s[3..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
