//! TOML engine parameter files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use beatcore::EngineParameters;
use tracing::debug;

/// Load parameters from a TOML file, or the instrument defaults when no file is given
pub fn load_params<P>(path: Option<&Path>) -> Result<P>
where
    P: EngineParameters + Default,
{
    let Some(path) = path else {
        debug!("No parameter file, using defaults");
        return Ok(P::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters {}", path.display()))?;
    parse_params(&content).with_context(|| format!("Invalid parameters {}", path.display()))
}

pub fn parse_params<P: EngineParameters>(content: &str) -> Result<P> {
    let params: P = toml::from_str(content)?;
    params.validate()?;
    Ok(params)
}

pub fn params_to_toml<P: EngineParameters>(params: &P) -> Result<String> {
    Ok(toml::to_string_pretty(params)?)
}
