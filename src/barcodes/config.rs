use config::{Config, ConfigError};

use crate::barcodes::constants;
use crate::barcodes::error::{BarcodeError, PipelineError};

/// Settings for the anchor boundary detector.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorConfig {
    /// Maximum base frequency a column must reach to count as anchor.
    pub cutoff: f64,
    /// Number of leading reads the frequency table is computed from; all reads when `None`.
    pub sample_size: Option<usize>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            cutoff: constants::DEFAULT_ANCHOR_CUTOFF,
            sample_size: None,
        }
    }
}

impl AnchorConfig {
    pub fn validate(&self) -> Result<(), BarcodeError> {
        if !(self.cutoff > 0.0 && self.cutoff <= 1.0) {
            return Err(BarcodeError::InvalidConfig(format!(
                "anchor cutoff must be in (0, 1], got {}",
                self.cutoff
            )));
        }
        if self.sample_size == Some(0) {
            return Err(BarcodeError::InvalidConfig(
                "anchor sample size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one analysis run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeConfig {
    pub anchor: AnchorConfig,
    /// Expected number of true barcodes; selects the rank of the degree threshold.
    pub cells: usize,
    /// Candidates per worker partition in the neighbor graph builder.
    pub chunk_size: usize,
    pub max_reads: Option<usize>,
    pub threads: Option<usize>,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        BarcodeConfig {
            anchor: AnchorConfig::default(),
            cells: constants::DEFAULT_CELLS,
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            max_reads: None,
            threads: None,
        }
    }
}

impl BarcodeConfig {
    pub fn validate(&self) -> Result<(), BarcodeError> {
        self.anchor.validate()?;
        if self.cells == 0 {
            return Err(BarcodeError::InvalidConfig(
                "cells must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(BarcodeError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(BarcodeError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads a validated configuration out of layered settings.
    pub fn from_settings(settings: &Config) -> Result<Self, PipelineError> {
        let config = BarcodeConfig {
            anchor: AnchorConfig {
                cutoff: settings.get("anchor_cutoff")?,
                sample_size: optional(settings, "anchor_sample_size")?,
            },
            cells: settings.get("cells")?,
            chunk_size: settings.get("chunk_size")?,
            max_reads: optional(settings, "max_reads")?,
            threads: optional(settings, "threads")?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn optional(settings: &Config, key: &str) -> Result<Option<usize>, ConfigError> {
    match settings.get::<usize>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BarcodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.anchor.cutoff, 0.8);
    }

    #[test]
    fn test_rejects_out_of_range_cutoff() {
        for cutoff in [0.0, -0.1, 1.5, f64::NAN] {
            let anchor = AnchorConfig {
                cutoff,
                sample_size: None,
            };
            assert!(matches!(
                anchor.validate(),
                Err(BarcodeError::InvalidConfig(_))
            ));
        }
        let anchor = AnchorConfig {
            cutoff: 1.0,
            sample_size: None,
        };
        assert!(anchor.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cells_and_chunks() {
        let config = BarcodeConfig {
            cells: 0,
            ..BarcodeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BarcodeConfig {
            chunk_size: 0,
            ..BarcodeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_settings_reads_optional_keys() {
        let settings = Config::builder()
            .set_default("anchor_cutoff", 0.7)
            .unwrap()
            .set_default("cells", 12)
            .unwrap()
            .set_default("chunk_size", 100)
            .unwrap()
            .set_override("max_reads", 500)
            .unwrap()
            .build()
            .unwrap();

        let config = BarcodeConfig::from_settings(&settings).unwrap();
        assert_eq!(config.anchor.cutoff, 0.7);
        assert_eq!(config.anchor.sample_size, None);
        assert_eq!(config.cells, 12);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.max_reads, Some(500));
        assert_eq!(config.threads, None);
    }
}
