//! Turning user input into resource descriptors.

use std::sync::Arc;

use crate::api::CatalogApi;
use crate::error::{Error, Result};
use crate::resource::item::{Resource, ResourceKind};
use crate::resource::parser::{parse_url, song_id_from_manifest};

/// Resolves URLs, short links and manifest references.
pub struct Resolver {
    catalog: Arc<dyn CatalogApi>,
    default_storefront: String,
}

impl Resolver {
    /// `default_storefront` is used for manifest references, which carry none.
    pub fn new(catalog: Arc<dyn CatalogApi>, default_storefront: impl Into<String>) -> Self {
        Self {
            catalog,
            default_storefront: default_storefront.into(),
        }
    }

    /// Resolve a catalog URL, expanding it once as a short link if it does
    /// not parse directly.
    pub async fn resolve(&self, raw: &str) -> Result<Resource> {
        let raw = raw.trim();

        match parse_url(raw) {
            Err(Error::UnresolvableUrl(_)) => {}
            parsed => return parsed,
        }

        // Only web links can be short links.
        if !is_web_link(raw) {
            return Err(Error::UnresolvableUrl(raw.to_string()));
        }

        let real_url = self.catalog.fetch_real_url(raw).await.map_err(|e| {
            tracing::debug!("Expanding {} failed: {}", raw, e);
            Error::UnresolvableUrl(raw.to_string())
        })?;

        parse_url(&real_url).map_err(|e| match e {
            Error::UnresolvableUrl(_) => Error::UnresolvableUrl(raw.to_string()),
            other => other,
        })
    }

    /// Build a song descriptor from a streaming manifest URL. No network call.
    pub fn resolve_from_manifest(&self, manifest_url: &str) -> Result<Resource> {
        let song_id = song_id_from_manifest(manifest_url)?;
        Resource::new(ResourceKind::Song, song_id, &self.default_storefront, "")
    }
}

fn is_web_link(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| (u.scheme() == "http" || u.scheme() == "https") && u.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AlbumInfo, GlobalAuthParams, SongQualities};
    use crate::device::Device;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Catalog that only knows short links.
    #[derive(Default)]
    struct ShortLinks {
        links: HashMap<String, String>,
        expansions: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogApi for ShortLinks {
        async fn fetch_token(&self) -> Result<String> {
            Ok("anon".into())
        }
        async fn fetch_real_url(&self, short_link: &str) -> Result<String> {
            self.expansions.lock().push(short_link.to_string());
            self.links
                .get(short_link)
                .cloned()
                .ok_or_else(|| Error::Api("HTTP 404".into()))
        }
        async fn fetch_song_qualities(
            &self,
            song: &Resource,
            _auth: &GlobalAuthParams,
            _device: &Device,
        ) -> Result<SongQualities> {
            Err(Error::CodecNotFound(song.id().to_string()))
        }
        async fn fetch_album_info(
            &self,
            _album: &Resource,
            _auth: &GlobalAuthParams,
        ) -> Result<AlbumInfo> {
            Ok(AlbumInfo::default())
        }
    }

    fn resolver(links: &[(&str, &str)]) -> (Arc<ShortLinks>, Resolver) {
        let catalog = Arc::new(ShortLinks {
            links: links
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        });
        let resolver = Resolver::new(catalog.clone(), "jp");
        (catalog, resolver)
    }

    #[tokio::test]
    async fn test_direct_url_makes_no_network_call() {
        let (catalog, resolver) = resolver(&[]);
        let r = resolver.resolve("https://music.example/us/album/123").await.unwrap();
        assert_eq!(r.kind(), ResourceKind::Album);
        assert_eq!(r.id(), "123");
        assert!(catalog.expansions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_short_link_expanded_once() {
        let (catalog, resolver) = resolver(&[(
            "https://apple.co/abc",
            "https://music.apple.com/us/playlist/mix/pl.u-abc",
        )]);
        let r = resolver.resolve(" https://apple.co/abc\n").await.unwrap();
        assert_eq!(r.kind(), ResourceKind::Playlist);
        assert_eq!(r.id(), "pl.u-abc");
        assert_eq!(*catalog.expansions.lock(), vec!["https://apple.co/abc"]);
    }

    #[tokio::test]
    async fn test_unparseable_expansion_is_not_expanded_again() {
        let (catalog, resolver) = resolver(&[
            ("https://apple.co/a", "https://apple.co/b"),
            ("https://apple.co/b", "https://music.apple.com/us/album/1"),
        ]);
        let err = resolver.resolve("https://apple.co/a").await.unwrap_err();
        assert!(matches!(err, Error::UnresolvableUrl(ref raw) if raw == "https://apple.co/a"));
        assert_eq!(catalog.expansions.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_expansion_is_unresolvable() {
        let (_, resolver) = resolver(&[]);
        let err = resolver.resolve("https://apple.co/missing").await.unwrap_err();
        assert!(matches!(err, Error::UnresolvableUrl(_)));
    }

    #[tokio::test]
    async fn test_garbage_is_not_expanded() {
        let (catalog, resolver) = resolver(&[]);
        assert!(resolver.resolve("hello world").await.is_err());
        assert!(catalog.expansions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_kind_is_reported() {
        let (catalog, resolver) = resolver(&[]);
        let err = resolver
            .resolve("https://music.example/us/music-video/x/1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedResourceType(_)));
        assert!(catalog.expansions.lock().is_empty());
    }

    #[test]
    fn test_manifest_uses_default_storefront() {
        let (_, resolver) = resolver(&[]);
        let r = resolver
            .resolve_from_manifest("https://aod.example/P1_A1616270546_audio_en_gr256.m3u8")
            .unwrap();
        assert_eq!(r.kind(), ResourceKind::Song);
        assert_eq!(r.id(), "1616270546");
        assert_eq!(r.storefront(), "jp");
        assert_eq!(r.url(), "");
    }
}
