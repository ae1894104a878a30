use thiserror::Error;

use crate::{
    history::{HistoryError, Truncation, buffer::TruncationError},
    link::{MSG_BASELINE, MSG_INIT_AMBIGUITIES},
    parameters::{self, ParameterMap},
    utils::{
        capacity::Capacity,
        time::{TowUnit, TowUnitError},
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Bad parameter")]
    Parameters(#[from] parameters::Error),

    #[error("Bad history capacity")]
    Capacity(#[from] HistoryError),

    #[error("Bad truncation policy")]
    Truncation(#[from] TruncationError),

    #[error("Bad time of week unit")]
    TowUnit(#[from] TowUnitError),

    #[error("Parameter '{path}' is not a valid message id: {value}")]
    MessageId { path: String, value: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub capacity: Capacity,
    pub truncation: Truncation,
    pub tow_unit: TowUnit,
    pub baseline_msg_id: u16,
    pub init_ambiguities_msg_id: u16,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            capacity: Capacity::default(),
            truncation: Truncation::default(),
            tow_unit: TowUnit::default(),
            baseline_msg_id: MSG_BASELINE,
            init_ambiguities_msg_id: MSG_INIT_AMBIGUITIES,
        }
    }
}

impl IngestConfig {
    /// Reads the `history`, `link` and `time` sections. Missing parameters
    /// keep their default value.
    pub fn from_parameters(params: &ParameterMap) -> Result<Self, ConfigError> {
        let mut config = IngestConfig::default();

        if let Some(p) = params.find_param("history.capacity")? {
            config.capacity = Capacity::try_from(p.value_int()?)?;
        }

        if let Some(p) = params.find_param("history.truncation")? {
            config.truncation = p.value_string()?.parse()?;
        }

        if let Some(p) = params.find_param("time.tow_unit")? {
            config.tow_unit = p.value_string()?.parse()?;
        }

        if let Some(id) = message_id(params, "link.baseline_msg_id")? {
            config.baseline_msg_id = id;
        }

        if let Some(id) = message_id(params, "link.init_ambiguities_msg_id")? {
            config.init_ambiguities_msg_id = id;
        }

        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::from_parameters(&parameters::parameters::parse_string(toml_str)?)
    }
}

fn message_id(params: &ParameterMap, path: &str) -> Result<Option<u16>, ConfigError> {
    let Some(p) = params.find_param(path)? else {
        return Ok(None);
    };

    let value = p.value_int()?;
    u16::try_from(value)
        .map(Some)
        .map_err(|_| ConfigError::MessageId {
            path: path.to_string(),
            value,
        })
}
