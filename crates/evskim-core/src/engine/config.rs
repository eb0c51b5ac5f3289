use super::selection::{DimuonCuts, Selection};
use super::tally::TallyMode;
use crate::core::io::compression::CompressionSettings;
use crate::core::io::format::ContainerHeader;
use crate::core::io::source::SchemaRequirements;
use crate::core::io::writer::DEFAULT_BASKET_SIZE;
use crate::core::models::era::Era;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputConfig {
    pub compression: CompressionSettings,
    pub basket_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compression: CompressionSettings::default(),
            basket_size: DEFAULT_BASKET_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkimConfig {
    pub simulated: bool,
    pub extra_weights: bool,
    pub era: Option<Era>,
    pub selection: Selection,
    pub output: OutputConfig,
}

impl SkimConfig {
    pub fn tally_mode(&self) -> TallyMode {
        TallyMode::for_run(self.simulated, self.extra_weights)
    }

    /// What every input of the run must provide.
    pub fn schema_requirements(&self) -> SchemaRequirements {
        SchemaRequirements {
            simulated: self.simulated,
            extra_weights: self.tally_mode() == TallyMode::Counting,
            era: self.era,
        }
    }

    /// Header stamped on every output container of the run.
    pub fn output_header(&self) -> ContainerHeader {
        ContainerHeader::new(
            self.simulated,
            self.tally_mode() == TallyMode::Counting,
            self.era,
        )
        .with_compression(self.output.compression)
    }
}

#[derive(Default)]
pub struct SkimConfigBuilder {
    simulated: bool,
    extra_weights: bool,
    era: Option<Era>,
    selection: Option<Selection>,
    compression: Option<CompressionSettings>,
    basket_size: Option<usize>,
}

impl SkimConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }
    pub fn extra_weights(mut self, extra_weights: bool) -> Self {
        self.extra_weights = extra_weights;
        self
    }
    pub fn era(mut self, era: Option<Era>) -> Self {
        self.era = era;
        self
    }
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn compression(mut self, compression: CompressionSettings) -> Self {
        self.compression = Some(compression);
        self
    }
    pub fn basket_size(mut self, size: usize) -> Self {
        self.basket_size = Some(size);
        self
    }

    pub fn build(self) -> Result<SkimConfig, ConfigError> {
        let selection = self
            .selection
            .ok_or(ConfigError::MissingParameter("selection"))?;
        if let Selection::Dimuon(cuts) = &selection {
            validate_cuts(cuts)?;
        }

        let basket_size = self.basket_size.unwrap_or(DEFAULT_BASKET_SIZE);
        if basket_size == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "basket_size",
                reason: "must be at least one byte".into(),
            });
        }

        Ok(SkimConfig {
            simulated: self.simulated,
            extra_weights: self.extra_weights,
            era: self.era,
            selection,
            output: OutputConfig {
                compression: self.compression.unwrap_or_default(),
                basket_size,
            },
        })
    }
}

fn validate_cuts(cuts: &DimuonCuts) -> Result<(), ConfigError> {
    for (parameter, value) in [
        ("lead_pt_min", cuts.lead_pt_min),
        ("sub_pt_min", cuts.sub_pt_min),
        ("eta_max", cuts.eta_max),
        ("mass_max", cuts.mass_max),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter,
                reason: format!("expected a finite, non-negative number, got {}", value),
            });
        }
    }
    if cuts.sub_pt_min > cuts.lead_pt_min {
        return Err(ConfigError::InvalidValue {
            parameter: "sub_pt_min",
            reason: format!(
                "subleading threshold {} exceeds leading threshold {}",
                cuts.sub_pt_min, cuts.lead_pt_min
            ),
        });
    }
    Ok(())
}
