//! # Lens Prescriptions
//!
//! Reading and writing named optical systems as text documents, and the
//! catalogue of systems loaded from a directory.
//!
//! ```toml
//! name = "dgauss50"
//! fnumber = 2.0
//! effectiveFocalLength = 50.0
//! fieldOfView = 46.8
//! filmWidth = 36.0
//! filmHeight = 24.0
//!
//! [[elements]]
//! type = "lensSpherical"
//! height = 25.2
//! thickness = 7.7
//! radius = 58.95
//! refractiveIndex = 1.67
//! abbeNumber = 47.1
//! coatingLambda = 550.0
//! coatingIor = 1.38
//! ```

use thiserror::Error;

pub mod catalogue;
pub mod document;
pub mod loader;

pub use catalogue::PrescriptionCatalogue;
pub use document::{ElementDocument, ElementType, PrescriptionDocument};
pub use loader::{
    load_prescription, load_prescription_file, parse_prescription, save_prescription,
    save_prescription_file, serialize_prescription,
};

/// Prescription loading and saving errors
#[derive(Error, Debug)]
pub enum PrescriptionError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not a well-formed document or lacks a required field
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// No prescription with this name
    #[error("Prescription not found: {0}")]
    NotFound(String),

    /// Unsupported file format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but does not describe a valid lens system
    #[error("Malformed prescription '{name}': {reason}")]
    Malformed {
        /// Prescription name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

impl PrescriptionError {
    /// Whether the prescription content itself is at fault (as opposed to IO)
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Malformed { .. })
    }
}
