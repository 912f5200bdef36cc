//! Quality negotiation: available encodings, ranked for display.

use std::sync::Arc;

use crate::api::{AudioQuality, CatalogApi, GlobalAuthParams, SongQualities};
use crate::device::Device;
use crate::error::Result;
use crate::resource::Resource;

/// Queries the catalog for encodings and ranks them.
pub struct QualityNegotiator {
    catalog: Arc<dyn CatalogApi>,
}

impl QualityNegotiator {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    /// Encodings of one song, highest bitrate first.
    pub async fn list_song_qualities(
        &self,
        song: &Resource,
        auth: &GlobalAuthParams,
        device: &Device,
    ) -> Result<SongQualities> {
        let mut listing = self.catalog.fetch_song_qualities(song, auth, device).await?;
        rank_qualities(&mut listing.qualities);
        Ok(listing)
    }

    /// Encodings of every usable track of an album, each ranked like a song.
    pub async fn list_album_qualities(
        &self,
        album: &Resource,
        auth: &GlobalAuthParams,
    ) -> Result<Vec<SongQualities>> {
        let info = self.catalog.fetch_album_info(album, auth).await?;

        Ok(info
            .tracks
            .into_iter()
            .map(|mut track| {
                rank_qualities(&mut track.qualities);
                track
            })
            .collect())
    }
}

/// Sort by bitrate, descending. Equal bitrates keep catalog order.
pub fn rank_qualities(qualities: &mut [AudioQuality]) {
    qualities.sort_by(|a, b| b.bitrate.cmp(&a.bitrate));
}
