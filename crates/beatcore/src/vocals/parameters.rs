use serde::{Deserialize, Serialize};

use crate::engine::codec::{BinaryReader, BinaryWriter};
use crate::engine::{BaseEngineParameters, EngineParameters};
use crate::error::{Error, Result};

/// Vocals engine configuration
///
/// The base hit window is measured in semitones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalsEngineParameters {
    #[serde(flatten)]
    pub base: BaseEngineParameters,
    /// Share of a phrase's ticks that must be sung for full credit, `0.0..=1.0`
    pub phrase_hit_percent: f64,
    /// Pitch samples per second the bot produces
    pub approximate_vocal_fps: f64,
    /// Singing where no note is charted activates star power
    #[serde(default)]
    pub sing_to_activate_star_power: bool,
}

impl Default for VocalsEngineParameters {
    fn default() -> Self {
        Self {
            base: BaseEngineParameters::new(1.0, 4, vec![1, 2, 3]),
            phrase_hit_percent: 0.8,
            approximate_vocal_fps: 60.0,
            sing_to_activate_star_power: true,
        }
    }
}

impl VocalsEngineParameters {
    pub fn builder() -> VocalsEngineParametersBuilder {
        VocalsEngineParametersBuilder::default()
    }
}

impl EngineParameters for VocalsEngineParameters {
    fn base(&self) -> &BaseEngineParameters {
        &self.base
    }

    fn validate(&self) -> Result<()> {
        self.base.validate()?;

        if !(0.0..=1.0).contains(&self.phrase_hit_percent) {
            return Err(Error::InvalidParameters(format!(
                "phrase hit percent must be within [0, 1], got {}",
                self.phrase_hit_percent
            )));
        }

        if !self.approximate_vocal_fps.is_finite() || self.approximate_vocal_fps <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "vocal sample rate must be positive, got {}",
                self.approximate_vocal_fps
            )));
        }

        Ok(())
    }

    fn write_fields(&self, writer: &mut BinaryWriter) {
        writer.write_f64(self.phrase_hit_percent);
        writer.write_f64(self.approximate_vocal_fps);
        writer.write_bool(self.sing_to_activate_star_power);
    }

    fn read_fields(
        base: BaseEngineParameters,
        reader: &mut BinaryReader,
        version: u32,
    ) -> Result<Self> {
        let phrase_hit_percent = reader.read_f64()?;
        let approximate_vocal_fps = reader.read_f64()?;
        // version 1 records predate sing-to-activate
        let sing_to_activate_star_power = if version >= 2 {
            reader.read_bool()?
        } else {
            false
        };

        Ok(Self {
            base,
            phrase_hit_percent,
            approximate_vocal_fps,
            sing_to_activate_star_power,
        })
    }
}

/// Builder for VocalsEngineParameters
#[derive(Debug, Clone, Default)]
pub struct VocalsEngineParametersBuilder {
    hit_window: Option<f64>,
    max_multiplier: Option<i32>,
    multiplier_thresholds: Option<Vec<u32>>,
    phrase_hit_percent: Option<f64>,
    approximate_vocal_fps: Option<f64>,
    sing_to_activate_star_power: Option<bool>,
}

impl VocalsEngineParametersBuilder {
    /// Set the pitch tolerance in semitones
    pub fn hit_window(mut self, semitones: f64) -> Self {
        self.hit_window = Some(semitones);
        self
    }

    pub fn max_multiplier(mut self, max: i32) -> Self {
        self.max_multiplier = Some(max);
        self
    }

    pub fn multiplier_thresholds(mut self, thresholds: Vec<u32>) -> Self {
        self.multiplier_thresholds = Some(thresholds);
        self
    }

    pub fn phrase_hit_percent(mut self, percent: f64) -> Self {
        self.phrase_hit_percent = Some(percent);
        self
    }

    pub fn approximate_vocal_fps(mut self, fps: f64) -> Self {
        self.approximate_vocal_fps = Some(fps);
        self
    }

    pub fn sing_to_activate_star_power(mut self, enabled: bool) -> Self {
        self.sing_to_activate_star_power = Some(enabled);
        self
    }

    /// Build and validate the parameters
    pub fn build(self) -> Result<VocalsEngineParameters> {
        let default = VocalsEngineParameters::default();
        let params = VocalsEngineParameters {
            base: BaseEngineParameters {
                hit_window: self.hit_window.unwrap_or(default.base.hit_window),
                max_multiplier: self.max_multiplier.unwrap_or(default.base.max_multiplier),
                multiplier_thresholds: self
                    .multiplier_thresholds
                    .unwrap_or(default.base.multiplier_thresholds),
            },
            phrase_hit_percent: self
                .phrase_hit_percent
                .unwrap_or(default.phrase_hit_percent),
            approximate_vocal_fps: self
                .approximate_vocal_fps
                .unwrap_or(default.approximate_vocal_fps),
            sing_to_activate_star_power: self
                .sing_to_activate_star_power
                .unwrap_or(default.sing_to_activate_star_power),
        };
        params.validate()?;
        Ok(params)
    }
}
