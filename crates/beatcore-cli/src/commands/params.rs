//! Params command: TOML <-> binary parameter records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use beatcore::{
    DrumsEngineParameters, EngineParameters, InstrumentKind, VocalsEngineParameters,
    decode_parameters, encode_parameters,
};

use crate::params_file::{load_params, params_to_toml};

pub fn encode(instrument: InstrumentKind, input: &Path, output: &Path) -> Result<()> {
    let data = match instrument {
        InstrumentKind::Drums => {
            encode_parameters(&load_params::<DrumsEngineParameters>(Some(input))?)
        }
        InstrumentKind::Vocals => {
            encode_parameters(&load_params::<VocalsEngineParameters>(Some(input))?)
        }
    };

    fs::write(output, &data).with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!(
        "Encoded {} parameters ({} bytes) to: {}",
        instrument,
        data.len(),
        output.display()
    );
    Ok(())
}

pub fn decode(instrument: InstrumentKind, input: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let content = match instrument {
        InstrumentKind::Drums => decode_to_toml::<DrumsEngineParameters>(&data),
        InstrumentKind::Vocals => decode_to_toml::<VocalsEngineParameters>(&data),
    }
    .with_context(|| format!("Invalid {} parameters {}", instrument, input.display()))?;

    if let Some(output_path) = output {
        fs::write(output_path, &content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Decoded to: {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn decode_to_toml<P: EngineParameters>(data: &[u8]) -> Result<String> {
    let params: P = decode_parameters(data)?;
    params_to_toml(&params)
}
