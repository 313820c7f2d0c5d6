//! JSON chart documents.
//!
//! ```json
//! { "resolution": 480, "tempos": [{ "tick": 0, "bpm": 120.0 }],
//!   "drums": [{ "pad": "red", "tick": 480 }] }
//! ```
//!
//! A document holds exactly one of `drums` or `vocals`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use beatcore::{Chart, DrumNote, InstrumentKind, SyncTrack, TempoChange, VocalPhrase};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartFile {
    pub resolution: u32,
    #[serde(default)]
    pub tempos: Vec<TempoChange>,
    #[serde(default)]
    pub drums: Option<Vec<DrumNote>>,
    #[serde(default)]
    pub vocals: Option<Vec<VocalPhrase>>,
}

/// A loaded chart with its tempo map
pub enum LoadedChart {
    Drums(Chart<DrumNote>, SyncTrack),
    Vocals(Chart<VocalPhrase>, SyncTrack),
}

impl LoadedChart {
    pub fn instrument(&self) -> InstrumentKind {
        match self {
            Self::Drums(..) => InstrumentKind::Drums,
            Self::Vocals(..) => InstrumentKind::Vocals,
        }
    }
}

impl ChartFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the sync track and chart for the instrument present in the file
    pub fn into_chart(self) -> Result<LoadedChart> {
        let sync_track = SyncTrack::new(self.resolution, self.tempos)?;

        match (self.drums, self.vocals) {
            (Some(notes), None) => {
                let chart = Chart::new(notes, &sync_track)?;
                Ok(LoadedChart::Drums(chart, sync_track))
            }
            (None, Some(phrases)) => {
                let chart = Chart::new(phrases, &sync_track)?;
                Ok(LoadedChart::Vocals(chart, sync_track))
            }
            (Some(_), Some(_)) => bail!("chart has both drums and vocals"),
            (None, None) => bail!("chart has neither drums nor vocals"),
        }
    }
}

pub fn load_chart(path: &Path) -> Result<LoadedChart> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart {}", path.display()))?;
    ChartFile::parse(&content)
        .and_then(ChartFile::into_chart)
        .with_context(|| format!("Invalid chart {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drum_chart() {
        let json = r#"{
            "resolution": 480,
            "tempos": [{ "tick": 0, "bpm": 120.0 }],
            "drums": [
                { "pad": "red", "tick": 480 },
                { "pad": "yellow_cymbal", "tick": 960, "star_power": true, "star_power_end": true }
            ]
        }"#;

        let loaded = ChartFile::parse(json).unwrap().into_chart().unwrap();
        assert_eq!(loaded.instrument(), InstrumentKind::Drums);
        let LoadedChart::Drums(chart, sync_track) = loaded else {
            panic!("expected drums");
        };
        assert_eq!(chart.len(), 2);
        assert!(chart.notes()[1].star_power_end);
        assert!((sync_track.tick_to_time(960) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_vocal_chart_without_tempos() {
        let json = r#"{
            "resolution": 480,
            "vocals": [{
                "tick": 0,
                "tick_end": 480,
                "notes": [{ "tick": 0, "tick_length": 480, "pitch": 60.0 }]
            }]
        }"#;

        let loaded = ChartFile::parse(json).unwrap().into_chart().unwrap();
        assert_eq!(loaded.instrument(), InstrumentKind::Vocals);
    }

    #[test]
    fn test_chart_needs_one_instrument() {
        let neither = ChartFile::parse(r#"{ "resolution": 480 }"#).unwrap();
        assert!(neither.into_chart().is_err());

        let both = ChartFile::parse(r#"{ "resolution": 480, "drums": [], "vocals": [] }"#).unwrap();
        assert!(both.into_chart().is_err());
    }

    #[test]
    fn test_unordered_notes_rejected() {
        let json = r#"{
            "resolution": 480,
            "drums": [{ "pad": "red", "tick": 960 }, { "pad": "red", "tick": 480 }]
        }"#;
        assert!(ChartFile::parse(json).unwrap().into_chart().is_err());
    }
}
