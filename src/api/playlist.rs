//! Reading encodings out of an enhanced HLS master playlist.

use std::collections::HashSet;

use m3u8_rs::{AlternativeMedia, MasterPlaylist, Playlist};

use crate::api::types::AudioQuality;
use crate::error::{Error, Result};

/// Parse a master playlist and return one quality per audio group, in
/// playlist order.
pub fn parse_qualities(content: &[u8]) -> Result<Vec<AudioQuality>> {
    let playlist = m3u8_rs::parse_playlist_res(content)
        .map_err(|e| Error::M3U8(format!("Failed to parse playlist: {:?}", e)))?;

    match playlist {
        Playlist::MasterPlaylist(master) => Ok(qualities_from_master(&master)),
        Playlist::MediaPlaylist(_) => Err(Error::M3U8("Expected master playlist".into())),
    }
}

fn qualities_from_master(master: &MasterPlaylist) -> Vec<AudioQuality> {
    let mut seen = HashSet::new();
    let mut qualities = Vec::new();

    for variant in master.variants.iter().filter(|v| !v.is_i_frame) {
        let Some(group) = variant.audio.as_deref() else {
            continue;
        };
        if !seen.insert(group.to_string()) {
            continue;
        }

        let (sample_rate, bit_depth) = parse_group_format(group);
        qualities.push(AudioQuality {
            codec_id: group.to_string(),
            codec: variant.codecs.clone().unwrap_or_default(),
            bitrate: variant.bandwidth,
            average_bitrate: variant.average_bandwidth.unwrap_or(variant.bandwidth),
            channels: find_channels(&master.alternatives, group),
            sample_rate,
            bit_depth,
        });
    }

    qualities
}

fn find_channels(alternatives: &[AlternativeMedia], group: &str) -> String {
    alternatives
        .iter()
        .find(|alt| alt.group_id == group)
        .and_then(|alt| alt.channels.clone())
        .unwrap_or_default()
}

/// `audio-alac-stereo-44100-24` carries sample rate and bit depth as its
/// last two fields. Lossy groups carry neither.
fn parse_group_format(group: &str) -> (u32, u32) {
    let numbers: Vec<u32> = group
        .rsplit('-')
        .take(2)
        .map_while(|part| part.parse().ok())
        .collect();

    match numbers.as_slice() {
        [bit_depth, sample_rate] if *sample_rate >= 8000 => (*sample_rate, *bit_depth),
        _ => (0, 0),
    }
}
