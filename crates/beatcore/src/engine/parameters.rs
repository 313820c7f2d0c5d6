//! Engine parameters and their versioned binary record.
//!
//! Layout (little-endian):
//!
//! ```text
//! u32  version
//! f64  hit_window
//! i32  max_multiplier
//! i32  threshold count, then u32 per threshold
//! ...  instrument fields
//! ```

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::codec::{BinaryReader, BinaryWriter};
use crate::error::{Error, Result};

/// Version written by [`encode_parameters`]
pub const PARAMETERS_VERSION: u32 = 2;

/// Oldest version [`decode_parameters`] still reads
pub const MIN_PARAMETERS_VERSION: u32 = 1;

/// Parameters shared by every instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEngineParameters {
    /// Hit tolerance: seconds for timed instruments, semitones for vocals
    pub hit_window: f64,
    pub max_multiplier: i32,
    /// Combo counts at which the multiplier steps up, strictly ascending
    pub multiplier_thresholds: Vec<u32>,
}

impl BaseEngineParameters {
    pub fn new(hit_window: f64, max_multiplier: i32, multiplier_thresholds: Vec<u32>) -> Self {
        Self {
            hit_window,
            max_multiplier,
            multiplier_thresholds,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.hit_window.is_finite() || self.hit_window < 0.0 {
            return Err(Error::InvalidParameters(format!(
                "hit window must be a non-negative number, got {}",
                self.hit_window
            )));
        }

        if self.max_multiplier < 1 {
            return Err(Error::InvalidParameters(format!(
                "max multiplier must be at least 1, got {}",
                self.max_multiplier
            )));
        }

        if self.multiplier_thresholds.is_empty() {
            return Err(Error::InvalidParameters(
                "multiplier thresholds must not be empty".to_string(),
            ));
        }

        if let Some(pair) = self
            .multiplier_thresholds
            .windows(2)
            .find(|pair| pair[1] <= pair[0])
        {
            return Err(Error::InvalidParameters(format!(
                "multiplier thresholds must be strictly ascending ({} then {})",
                pair[0], pair[1]
            )));
        }

        Ok(())
    }

    fn write(&self, writer: &mut BinaryWriter) {
        writer.write_f64(self.hit_window);
        writer.write_i32(self.max_multiplier);
        writer.write_i32(self.multiplier_thresholds.len() as i32);
        for threshold in &self.multiplier_thresholds {
            writer.write_u32(*threshold);
        }
    }

    fn read(reader: &mut BinaryReader) -> Result<Self> {
        let hit_window = reader.read_f64()?;
        let max_multiplier = reader.read_i32()?;

        let count = reader.read_i32()?;
        let count = usize::try_from(count).map_err(|_| {
            Error::InvalidParameters(format!("negative threshold count {}", count))
        })?;
        if count * 4 > reader.remaining() {
            return Err(Error::UnexpectedEof {
                offset: reader.offset(),
                needed: count * 4,
            });
        }

        let multiplier_thresholds = (0..count)
            .map(|_| reader.read_u32())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            hit_window,
            max_multiplier,
            multiplier_thresholds,
        })
    }
}

/// Per-instrument parameter set
pub trait EngineParameters: Clone + Debug + Serialize + DeserializeOwned {
    fn base(&self) -> &BaseEngineParameters;

    /// Check the whole parameter set; engines refuse to start on failure
    fn validate(&self) -> Result<()> {
        self.base().validate()
    }

    /// Write the instrument fields that follow the base block
    fn write_fields(&self, writer: &mut BinaryWriter);

    /// Read the instrument fields for a record of the given version
    fn read_fields(
        base: BaseEngineParameters,
        reader: &mut BinaryReader,
        version: u32,
    ) -> Result<Self>;
}

/// Serialize parameters to the current binary record version
pub fn encode_parameters<P: EngineParameters>(params: &P) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.write_u32(PARAMETERS_VERSION);
    params.base().write(&mut writer);
    params.write_fields(&mut writer);
    writer.into_bytes()
}

/// Deserialize and validate a binary parameter record.
///
/// Older record versions are accepted; fields they lack take their defaults.
pub fn decode_parameters<P: EngineParameters>(data: &[u8]) -> Result<P> {
    let mut reader = BinaryReader::new(data);

    let version = reader.read_u32()?;
    if !(MIN_PARAMETERS_VERSION..=PARAMETERS_VERSION).contains(&version) {
        return Err(Error::UnsupportedVersion {
            version,
            current: PARAMETERS_VERSION,
        });
    }
    if version < PARAMETERS_VERSION {
        warn!(
            "Reading parameters from version {} record, missing fields use defaults",
            version
        );
    }

    let base = BaseEngineParameters::read(&mut reader)?;
    let params = P::read_fields(base, &mut reader, version)?;
    reader.finish()?;

    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseEngineParameters {
        BaseEngineParameters::new(0.07, 4, vec![10, 20, 30])
    }

    #[test]
    fn test_valid_base() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let mut params = base();
        params.multiplier_thresholds = vec![10, 10, 30];
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));

        params.multiplier_thresholds.clear();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_window_and_multiplier() {
        let mut params = base();
        params.hit_window = -0.01;
        assert!(params.validate().is_err());

        params.hit_window = f64::NAN;
        assert!(params.validate().is_err());

        let mut params = base();
        params.max_multiplier = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_base_block_layout() {
        let mut writer = BinaryWriter::new();
        base().write(&mut writer);
        let bytes = writer.into_bytes();
        // f64 + i32 + i32 + 3 * u32
        assert_eq!(bytes.len(), 8 + 4 + 4 + 12);
        assert_eq!(&bytes[12..16], &3i32.to_le_bytes());

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(BaseEngineParameters::read(&mut reader).unwrap(), base());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_oversized_threshold_count() {
        let mut writer = BinaryWriter::new();
        writer.write_f64(0.07);
        writer.write_i32(4);
        writer.write_i32(1_000_000);
        let bytes = writer.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            BaseEngineParameters::read(&mut reader),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
