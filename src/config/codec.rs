//! Codec definitions.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio encoding requested for a rip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Codec {
    /// Apple Lossless (default).
    #[default]
    Alac,
    /// Dolby Digital Plus / Atmos.
    Ec3,
    /// AAC stereo.
    Aac,
    /// AAC binaural.
    AacBinaural,
    /// AAC downmix.
    AacDownmix,
    /// Dolby Digital.
    Ac3,
}

impl Codec {
    /// Name used on the command line and passed to the rip program.
    pub fn as_str(&self) -> &'static str {
        match self {
            Codec::Alac => "alac",
            Codec::Ec3 => "ec3",
            Codec::Aac => "aac",
            Codec::AacBinaural => "aac-binaural",
            Codec::AacDownmix => "aac-downmix",
            Codec::Ac3 => "ac3",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_names_match_value_enum() {
        for codec in Codec::value_variants() {
            let name = codec.to_possible_value().unwrap();
            assert_eq!(name.get_name(), codec.as_str());
            assert_eq!(
                <Codec as ValueEnum>::from_str(codec.as_str(), true).unwrap(),
                *codec
            );
        }
    }

    #[test]
    fn test_unknown_codec() {
        assert!(<Codec as ValueEnum>::from_str("flac", true).is_err());
        assert_eq!(
            <Codec as ValueEnum>::from_str("AAC-Binaural", true).unwrap(),
            Codec::AacBinaural
        );
    }
}
