use serde::{Deserialize, Serialize};

use crate::error::{LottieError, LottieResult};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JsonConfig {
    pub pretty: bool,
    pub indent: usize,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StripConfig {
    pub enabled: bool,
    /// Decimal places kept when rounding floats.
    pub float_precision: u32,
    pub remove_attributes: Vec<String>,
    /// Drop transform properties that hold their default value.
    pub transform_defaults: bool,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            float_precision: 3,
            remove_attributes: Vec::new(),
            transform_defaults: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TgsConfig {
    pub sanitize: bool,
    pub validate: bool,
    pub compression_level: u32,
    /// Add a top level `"tgs": 1` to the payload.
    pub marker: bool,
}

impl Default for TgsConfig {
    fn default() -> Self {
        Self {
            sanitize: false,
            validate: false,
            compression_level: 9,
            marker: false,
        }
    }
}

/// Export settings, usually read from a `lottie.toml`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub json: JsonConfig,
    #[serde(default)]
    pub strip: StripConfig,
    #[serde(default)]
    pub tgs: TgsConfig,
}

impl ExportConfig {
    pub fn from_toml_str(contents: &str) -> LottieResult<Self> {
        toml::from_str(contents).map_err(|e| LottieError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &std::path::Path) -> LottieResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded export config");
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> LottieResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| LottieError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
