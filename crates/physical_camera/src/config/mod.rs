//! Configuration system
//!
//! Camera-level settings that are not part of any single lens prescription:
//! where the prescription catalogue lives, how the visible spectrum is
//! sampled, and the default anti-reflection coating applied to new systems.
//! Files are TOML or RON, chosen by extension.

use std::path::Path;

use ron::extensions::Extensions;
use ron::ser::PrettyConfig;

pub use serde::{Serialize, Deserialize};

/// Text document formats understood by the configuration and prescription loaders
///
/// RON documents may write optional values bare (`2.0` rather than `Some(2.0)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl DocumentFormat {
    /// Detect the format from a file extension, case-insensitively
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }

    /// File extension written for this format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Ron => "ron",
        }
    }

    /// Deserialize a value from text in this format
    pub fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, String> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Self::Ron => ron::Options::default()
                .with_default_extension(Extensions::IMPLICIT_SOME)
                .from_str(contents)
                .map_err(|e| e.to_string()),
        }
    }

    /// Serialize a value into pretty-printed text in this format
    pub fn to_string_pretty<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Ron => {
                let pretty = PrettyConfig::default().extensions(Extensions::IMPLICIT_SOME);
                ron::ser::to_string_pretty(value, pretty).map_err(|e| e.to_string())
            }
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let contents = std::fs::read_to_string(path)?;
        format.parse(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let contents = format.to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but make no physical sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Spectral Sampling Settings
///
/// Visible range sampled for per-channel dispersion and the largest channel
/// count a wavelength table is built for. Wavelengths are in nanometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralSettings {
    /// Shortest sampled wavelength (nm)
    pub min_wavelength: f32,
    /// Longest sampled wavelength (nm)
    pub max_wavelength: f32,
    /// Largest channel count a wavelength table is built for
    pub max_num_wavelengths: usize,
}

impl Default for SpectralSettings {
    fn default() -> Self {
        Self {
            min_wavelength: 400.0,
            max_wavelength: 700.0,
            max_num_wavelengths: 16,
        }
    }
}

impl SpectralSettings {
    /// Validate the sampling range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_wavelength > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_wavelength must be positive, got {}",
                self.min_wavelength
            )));
        }
        if self.max_wavelength < self.min_wavelength {
            return Err(ConfigError::Invalid(format!(
                "max_wavelength {} is below min_wavelength {}",
                self.max_wavelength, self.min_wavelength
            )));
        }
        if self.max_num_wavelengths == 0 {
            return Err(ConfigError::Invalid("max_num_wavelengths must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// # Coating Defaults
///
/// System-wide anti-reflection coating design applied to newly loaded
/// systems. Magnesium fluoride at mid-green is the usual single-layer choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoatingDefaults {
    /// Design wavelength of the quarter-wave layer (nm)
    pub wavelength: f32,
    /// Refractive index of the coating material
    pub refraction: f32,
}

impl Default for CoatingDefaults {
    fn default() -> Self {
        Self {
            wavelength: 550.0,
            refraction: 1.38,
        }
    }
}

/// # Camera Configuration
///
/// Top-level settings for the physical camera module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory scanned for lens prescriptions
    pub prescription_directory: String,
    /// Log filter used when the host initialises logging through us
    pub log_level: String,
    /// Spectral sampling
    pub spectral: SpectralSettings,
    /// Default anti-reflection coating
    pub coating: CoatingDefaults,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            prescription_directory: "resources/lenses".to_string(),
            log_level: "info".to_string(),
            spectral: SpectralSettings::default(),
            coating: CoatingDefaults::default(),
        }
    }
}

impl Config for CameraConfig {}

impl CameraConfig {
    /// Set the prescription directory
    pub fn with_prescription_directory(mut self, directory: impl Into<String>) -> Self {
        self.prescription_directory = directory.into();
        self
    }

    /// Set the spectral sampling
    pub fn with_spectral(mut self, spectral: SpectralSettings) -> Self {
        self.spectral = spectral;
        self
    }

    /// Set the default coating
    pub fn with_coating(mut self, coating: CoatingDefaults) -> Self {
        self.coating = coating;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spectral.validate()?;
        if !(self.coating.wavelength > 0.0) || !(self.coating.refraction >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "coating defaults out of range: wavelength {}, refraction {}",
                self.coating.wavelength, self.coating.refraction
            )));
        }
        Ok(())
    }
}
