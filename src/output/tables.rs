//! Tabular listings for qualities and jobs.

use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::api::{AudioQuality, SongQualities};
use crate::download::Job;

#[derive(Tabled)]
pub struct QualityRow {
    #[tabled(rename = "Codec ID")]
    pub codec_id: String,
    #[tabled(rename = "Codec")]
    pub codec: String,
    #[tabled(rename = "Bitrate")]
    pub bitrate: u64,
    #[tabled(rename = "Average Bitrate")]
    pub average_bitrate: u64,
    #[tabled(rename = "Channels")]
    pub channels: String,
    #[tabled(rename = "Sample Rate")]
    pub sample_rate: u32,
    #[tabled(rename = "Bit Depth")]
    pub bit_depth: u32,
}

impl From<&AudioQuality> for QualityRow {
    fn from(q: &AudioQuality) -> Self {
        Self {
            codec_id: q.codec_id.clone(),
            codec: q.codec.clone(),
            bitrate: q.bitrate,
            average_bitrate: q.average_bitrate,
            channels: q.channels.clone(),
            sample_rate: q.sample_rate,
            bit_depth: q.bit_depth,
        }
    }
}

#[derive(Tabled)]
pub struct JobRow {
    #[tabled(rename = "Job")]
    pub id: String,
    #[tabled(rename = "Resource")]
    pub resource: String,
    #[tabled(rename = "Codec")]
    pub codec: String,
    #[tabled(rename = "Device")]
    pub device: String,
    #[tabled(rename = "Started")]
    pub started: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.to_string(),
            resource: job.resource.to_string(),
            codec: job.codec.to_string(),
            device: job.device.clone(),
            started: job.started_at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Render a song's encodings as a table.
pub fn quality_table(qualities: &[AudioQuality]) -> String {
    let rows: Vec<QualityRow> = qualities.iter().map(QualityRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print the header line and table for one song.
pub fn print_song_qualities(listing: &SongQualities) {
    println!(
        "{} {} - {}:",
        style("Available audio qualities for song:").bold(),
        listing.song.artist,
        listing.song.title
    );
    println!("{}", quality_table(&listing.qualities));
}

/// Render in-flight jobs as a table.
pub fn jobs_table(jobs: &[Job]) -> String {
    let rows: Vec<JobRow> = jobs.iter().map(JobRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_table_headers_and_values() {
        let table = quality_table(&[AudioQuality {
            codec_id: "audio-alac-stereo-96000-24".into(),
            codec: "alac".into(),
            bitrate: 4608,
            average_bitrate: 2800,
            channels: "2".into(),
            sample_rate: 96000,
            bit_depth: 24,
        }]);

        for header in [
            "Codec ID",
            "Codec",
            "Bitrate",
            "Average Bitrate",
            "Channels",
            "Sample Rate",
            "Bit Depth",
        ] {
            assert!(table.contains(header), "missing {}", header);
        }
        assert!(table.contains("audio-alac-stereo-96000-24"));
        assert!(table.contains("96000"));
    }
}
