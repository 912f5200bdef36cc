//! Catalog API client.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::api::auth::GlobalAuthParams;
use crate::api::playlist::parse_qualities;
use crate::api::types::*;
use crate::config::Config;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::resource::Resource;

/// Web player origin, also the page the anonymous token is scraped from.
const WEB_BASE: &str = "https://music.apple.com";

/// Catalog API base URL.
const API_BASE: &str = "https://amp-api.music.apple.com";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

/// Operations the shell needs from the catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the anonymous access token of the web player.
    async fn fetch_token(&self) -> Result<String>;

    /// Expand a short link into its canonical URL.
    async fn fetch_real_url(&self, short_link: &str) -> Result<String>;

    /// Encodings available for one song, in catalog order.
    ///
    /// Fails with `CodecNotFound` when the song has no usable encoding.
    async fn fetch_song_qualities(
        &self,
        song: &Resource,
        auth: &GlobalAuthParams,
        device: &Device,
    ) -> Result<SongQualities>;

    /// Album tracks with their encodings, in catalog order.
    async fn fetch_album_info(&self, album: &Resource, auth: &GlobalAuthParams)
        -> Result<AlbumInfo>;
}

/// HTTP implementation of [`CatalogApi`].
pub struct HttpCatalog {
    client: Client,
    language: String,
    permits: Arc<Semaphore>,
}

impl HttpCatalog {
    /// Build the client from the download and region settings.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        match config.download.proxy.as_deref().filter(|p| !p.is_empty()) {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy)
                    .map_err(|e| Error::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }

        let client = builder
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            language: config.region.language.clone(),
            permits: Arc::new(Semaphore::new(config.download.parallel_num.max(1))),
        })
    }

    /// GET under the shared request limit. The permit must be held until the
    /// body has been read.
    async fn get(
        &self,
        url: &str,
        auth: Option<&GlobalAuthParams>,
    ) -> Result<(Response, SemaphorePermit<'_>)> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::Api("Request limiter closed".into()))?;

        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(auth) = auth {
            request = request
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", auth.anonymous_access_token),
                )
                .header(header::ORIGIN, WEB_BASE)
                .header("media-user-token", &auth.account_token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == 401 || status == 403 {
            return Err(Error::Api(format!("HTTP {}: token rejected", status)));
        }
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for {}", status, url)));
        }

        Ok((response, permit))
    }

    async fn get_text(&self, url: &str, auth: Option<&GlobalAuthParams>) -> Result<String> {
        let (response, _permit) = self.get(url, auth).await?;
        Ok(response.text().await?)
    }

    async fn get_bytes(&self, url: &str, auth: Option<&GlobalAuthParams>) -> Result<Vec<u8>> {
        let (response, _permit) = self.get(url, auth).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, auth: &GlobalAuthParams) -> Result<T> {
        let text = self.get_text(url, Some(auth)).await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse catalog response: {} - Response: {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Download and parse the master playlist of one song.
    async fn qualities_of(&self, song: &SongData) -> Result<Vec<AudioQuality>> {
        let master_url = song
            .enhanced_hls()
            .ok_or_else(|| Error::CodecNotFound(format!("song {}", song.id)))?;

        let bytes = self.get_bytes(master_url, None).await?;
        let qualities = parse_qualities(&bytes)?;
        if qualities.is_empty() {
            return Err(Error::CodecNotFound(format!("song {}", song.id)));
        }

        Ok(qualities)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn fetch_token(&self) -> Result<String> {
        let page = self
            .get_text(&format!("{}/us/browse", WEB_BASE), None)
            .await?;

        let script = find_first(r#"/assets/index[~-][^"/]*\.js"#, &page)
            .ok_or_else(|| Error::Api("Web player script not found".into()))?;

        let js = self
            .get_text(&format!("{}{}", WEB_BASE, script), None)
            .await?;

        find_first(r#"eyJh[^"]*"#, &js)
            .ok_or_else(|| Error::Api("Anonymous access token not found".into()))
    }

    async fn fetch_real_url(&self, short_link: &str) -> Result<String> {
        let (response, _permit) = self.get(short_link, None).await?;
        let real = response.url().to_string();
        tracing::debug!("Expanded {} to {}", short_link, real);
        Ok(real)
    }

    async fn fetch_song_qualities(
        &self,
        song: &Resource,
        auth: &GlobalAuthParams,
        device: &Device,
    ) -> Result<SongQualities> {
        tracing::debug!("Querying {} through device {}", song, device.address());

        let url = format!(
            "{}/v1/catalog/{}/songs/{}?extend=extendedAssetUrls&l={}",
            API_BASE,
            song.storefront(),
            song.id(),
            self.language
        );
        let response: CatalogResponse<SongData> = self.get_json(&url, auth).await?;
        let data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Api(format!("Song {} not found", song.id())))?;

        Ok(SongQualities {
            song: data.metadata(),
            qualities: self.qualities_of(&data).await?,
        })
    }

    async fn fetch_album_info(
        &self,
        album: &Resource,
        auth: &GlobalAuthParams,
    ) -> Result<AlbumInfo> {
        let url = format!(
            "{}/v1/catalog/{}/albums/{}?include=tracks&extend=extendedAssetUrls&l={}",
            API_BASE,
            album.storefront(),
            album.id(),
            self.language
        );
        let response: CatalogResponse<AlbumData> = self.get_json(&url, auth).await?;
        let data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Api(format!("Album {} not found", album.id())))?;

        let songs = data
            .relationships
            .and_then(|r| r.tracks)
            .map(|t| t.data)
            .unwrap_or_default();

        let mut tracks = Vec::with_capacity(songs.len());
        for song in &songs {
            match self.qualities_of(song).await {
                Ok(qualities) => tracks.push(SongQualities {
                    song: song.metadata(),
                    qualities,
                }),
                Err(Error::CodecNotFound(what)) => {
                    tracing::warn!("Skipping {}: no usable codec", what);
                }
                Err(e) => return Err(e),
            }
        }

        let attrs = data.attributes;
        Ok(AlbumInfo {
            id: data.id,
            title: attrs.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            artist: attrs.map(|a| a.artist_name).unwrap_or_default(),
            tracks,
        })
    }
}

fn find_first(pattern: &str, haystack: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .find(haystack)
        .map(|m| m.as_str().to_string())
}
