//! Catalog API types.

use serde::Deserialize;

/// One encoding offered for a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioQuality {
    /// Audio group id from the master playlist, e.g. `audio-alac-stereo-44100-24`.
    pub codec_id: String,
    pub codec: String,
    pub bitrate: u64,
    pub average_bitrate: u64,
    pub channels: String,
    pub sample_rate: u32,
    pub bit_depth: u32,
}

/// Display metadata of one song.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SongMetadata {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// A song together with the encodings the catalog offers for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQualities {
    pub song: SongMetadata,
    pub qualities: Vec<AudioQuality>,
}

/// Album with per-track encodings. Tracks without a usable encoding are left out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlbumInfo {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub tracks: Vec<SongQualities>,
}

/// Generic catalog response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Song resource.
#[derive(Debug, Clone, Deserialize)]
pub struct SongData {
    pub id: String,
    pub attributes: Option<SongAttributes>,
}

/// Song attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_name: String,
    pub extended_asset_urls: Option<ExtendedAssetUrls>,
}

/// Stream locations of a song.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAssetUrls {
    pub enhanced_hls: Option<String>,
}

/// Album resource.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumData {
    pub id: String,
    pub attributes: Option<AlbumAttributes>,
    pub relationships: Option<AlbumRelationships>,
}

/// Album attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
}

/// Album relationships.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRelationships {
    pub tracks: Option<CatalogResponse<SongData>>,
}

impl SongData {
    /// Display metadata, with empty strings for missing attributes.
    pub fn metadata(&self) -> SongMetadata {
        let attrs = self.attributes.as_ref();
        SongMetadata {
            id: self.id.clone(),
            title: attrs.map(|a| a.name.clone()).unwrap_or_default(),
            artist: attrs.map(|a| a.artist_name.clone()).unwrap_or_default(),
            album: attrs.map(|a| a.album_name.clone()).unwrap_or_default(),
        }
    }

    /// Enhanced HLS master playlist URL, if the catalog exposes one.
    pub fn enhanced_hls(&self) -> Option<&str> {
        self.attributes
            .as_ref()?
            .extended_asset_urls
            .as_ref()?
            .enhanced_hls
            .as_deref()
    }
}
