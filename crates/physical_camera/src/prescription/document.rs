//! Prescription document schema
//!
//! Field names here are the on-disk contract; element order is front to back.

use serde::{Deserialize, Serialize};

/// Role of one element entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    /// Spherical refracting surface
    LensSpherical,
    /// Aperture stop
    ApertureStop,
    /// Image sensor (always last)
    Sensor,
}

/// One element entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDocument {
    /// Element role
    #[serde(rename = "type")]
    pub kind: ElementType,
    /// Clear radius (for the stop: full stop diameter)
    pub height: f32,
    /// Axial distance to the next element
    pub thickness: f32,
    /// Radius of curvature (`0.0` for the stop)
    pub radius: f32,
    /// d-line refractive index of the following medium
    pub refractive_index: f32,
    /// Abbe number of the following medium
    pub abbe_number: f32,
    /// Coating design wavelength (nm)
    pub coating_lambda: f32,
    /// Coating refractive index
    pub coating_ior: f32,
    /// Aperture shape texture override (stop only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Aperture Fourier-transform texture override (stop only)
    #[serde(default, rename = "maskFT", skip_serializing_if = "Option::is_none")]
    pub mask_ft: Option<String>,
}

/// A complete prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "opticalSystem", rename_all = "camelCase")]
pub struct PrescriptionDocument {
    /// System name
    pub name: String,
    /// Relative aperture
    #[serde(rename = "fnumber")]
    pub f_number: f32,
    /// Effective focal length
    pub effective_focal_length: f32,
    /// Field of view (degrees)
    pub field_of_view: f32,
    /// Sensor width
    pub film_width: f32,
    /// Sensor height
    pub film_height: f32,
    /// Uniform scale applied to element heights on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_multiplier: Option<f32>,
    /// Elements, front to back
    pub elements: Vec<ElementDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentFormat;

    #[test]
    fn test_wire_names() {
        let toml_text = r#"
name = "wire"
fnumber = 2.8
effectiveFocalLength = 35.0
fieldOfView = 63.0
filmWidth = 36.0
filmHeight = 24.0

[[elements]]
type = "apertureStop"
height = 10.0
thickness = 4.0
radius = 0.0
refractiveIndex = 1.0
abbeNumber = 0.0
coatingLambda = 550.0
coatingIor = 1.38
mask = "hexagon"
maskFT = "hexagon_fft"

[[elements]]
type = "sensor"
height = 0.0
thickness = 0.0
radius = 0.0
refractiveIndex = 1.0
abbeNumber = 0.0
coatingLambda = 550.0
coatingIor = 1.38
"#;
        let document: PrescriptionDocument = DocumentFormat::Toml.parse(toml_text).unwrap();
        assert_eq!(document.f_number, 2.8);
        assert_eq!(document.height_multiplier, None);
        assert_eq!(document.elements.len(), 2);
        assert_eq!(document.elements[0].kind, ElementType::ApertureStop);
        assert_eq!(document.elements[0].mask.as_deref(), Some("hexagon"));
        assert_eq!(document.elements[0].mask_ft.as_deref(), Some("hexagon_fft"));
        assert_eq!(document.elements[1].kind, ElementType::Sensor);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let toml_text = "name = \"broken\"\nfnumber = 2.8\n";
        let result: Result<PrescriptionDocument, String> = DocumentFormat::Toml.parse(toml_text);
        assert!(result.is_err());
    }
}
