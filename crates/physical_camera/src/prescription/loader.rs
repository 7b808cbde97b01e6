//! Conversion between prescription documents and optical systems

use std::path::Path;

use log::debug;

use super::document::{ElementDocument, ElementType, PrescriptionDocument};
use super::PrescriptionError;
use crate::config::{CameraConfig, DocumentFormat};
use crate::foundation::math::Vec2;
use crate::optics::{LensElement, OpticalSystem, SurfaceKind};

fn malformed(document: &PrescriptionDocument, reason: impl Into<String>) -> PrescriptionError {
    PrescriptionError::Malformed {
        name: document.name.clone(),
        reason: reason.into(),
    }
}

/// Check the element list describes a usable lens stack
fn validate(document: &PrescriptionDocument) -> Result<(), PrescriptionError> {
    let Some(last) = document.elements.last() else {
        return Err(malformed(document, "no elements"));
    };
    if last.kind != ElementType::Sensor {
        return Err(malformed(document, "last element is not a sensor"));
    }

    let sensors = document.elements.iter().filter(|e| e.kind == ElementType::Sensor).count();
    if sensors != 1 {
        return Err(malformed(document, format!("expected one sensor, found {}", sensors)));
    }

    let stops = document.elements.iter().filter(|e| e.kind == ElementType::ApertureStop).count();
    if stops != 1 {
        return Err(malformed(document, format!("expected one aperture stop, found {}", stops)));
    }

    Ok(())
}

fn element_from_document(element: &ElementDocument) -> LensElement {
    let (height, surface) = match element.kind {
        ElementType::ApertureStop => (element.height * 0.5, SurfaceKind::ApertureStop),
        ElementType::LensSpherical | ElementType::Sensor => (
            element.height,
            SurfaceKind::Refractive { radius: element.radius },
        ),
    };
    LensElement {
        height,
        thickness: element.thickness,
        surface,
        refraction: element.refractive_index,
        abbe_number: element.abbe_number,
        coating_wavelength: element.coating_lambda,
        coating_refraction: element.coating_ior,
    }
}

/// Build an optical system from a parsed prescription
///
/// Spectral sampling and system coating defaults come from `config`.
pub fn load_prescription(
    document: &PrescriptionDocument,
    config: &CameraConfig,
) -> Result<OpticalSystem, PrescriptionError> {
    validate(document)?;

    let elements = document.elements.iter().map(element_from_document).collect();
    let film_size = Vec2::new(document.film_width, document.film_height);
    let mut system = OpticalSystem::new(document.name.clone(), film_size, elements)
        .with_f_number(document.f_number)
        .with_focal_distance(document.effective_focal_length)
        .with_field_of_view(document.field_of_view)
        .with_spectral(config.spectral)
        .with_coating_defaults(config.coating);

    if let Some(stop) = document.elements.iter().find(|e| e.kind == ElementType::ApertureStop) {
        system.aperture_texture = stop.mask.clone().unwrap_or_default();
        system.aperture_fft = stop.mask_ft.clone().unwrap_or_default();
    }

    system.set_height_multiplier(document.height_multiplier.unwrap_or(1.0));

    debug!(
        "Loaded prescription '{}': {} elements, f/{} at {} mm",
        system.name,
        system.lenses().len(),
        system.f_number,
        system.focal_distance
    );
    Ok(system)
}

/// Describe an optical system as a prescription document
///
/// Heights are written as they currently are, so the document's height
/// multiplier is always `1.0`.
pub fn save_prescription(system: &OpticalSystem) -> PrescriptionDocument {
    let last = system.last_index();
    let optional = |key: &str| (!key.is_empty()).then(|| key.to_string());

    let elements = system
        .lenses()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, lens)| {
            let kind = if lens.is_aperture_stop() {
                ElementType::ApertureStop
            } else if index == last {
                ElementType::Sensor
            } else {
                ElementType::LensSpherical
            };
            let is_stop = kind == ElementType::ApertureStop;
            ElementDocument {
                kind,
                height: if is_stop { lens.height * 2.0 } else { lens.height },
                thickness: lens.thickness,
                radius: lens.radius(),
                refractive_index: lens.refraction,
                abbe_number: lens.abbe_number,
                coating_lambda: lens.coating_wavelength,
                coating_ior: lens.coating_refraction,
                mask: if is_stop { optional(system.aperture_texture.as_str()) } else { None },
                mask_ft: if is_stop { optional(system.aperture_fft.as_str()) } else { None },
            }
        })
        .collect();

    let film_size = system.film_size();
    PrescriptionDocument {
        name: system.name.clone(),
        f_number: system.f_number,
        effective_focal_length: system.focal_distance,
        field_of_view: system.field_of_view,
        film_width: film_size.x,
        film_height: film_size.y,
        height_multiplier: Some(1.0),
        elements,
    }
}

/// Parse prescription text and build the optical system
pub fn parse_prescription(
    contents: &str,
    format: DocumentFormat,
    config: &CameraConfig,
) -> Result<OpticalSystem, PrescriptionError> {
    let document: PrescriptionDocument = format.parse(contents).map_err(PrescriptionError::Parse)?;
    load_prescription(&document, config)
}

/// Serialize an optical system to prescription text
pub fn serialize_prescription(
    system: &OpticalSystem,
    format: DocumentFormat,
) -> Result<String, PrescriptionError> {
    format
        .to_string_pretty(&save_prescription(system))
        .map_err(PrescriptionError::Serialize)
}

fn format_of(path: &Path) -> Result<DocumentFormat, PrescriptionError> {
    DocumentFormat::from_path(path)
        .ok_or_else(|| PrescriptionError::UnsupportedFormat(path.display().to_string()))
}

/// Load a prescription file, format chosen by extension
pub fn load_prescription_file(
    path: impl AsRef<Path>,
    config: &CameraConfig,
) -> Result<OpticalSystem, PrescriptionError> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let contents = std::fs::read_to_string(path)?;
    parse_prescription(&contents, format, config)
}

/// Write a prescription file, format chosen by extension
pub fn save_prescription_file(
    system: &OpticalSystem,
    path: impl AsRef<Path>,
) -> Result<(), PrescriptionError> {
    let path = path.as_ref();
    let contents = serialize_prescription(system, format_of(path)?)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoatingDefaults;
    use approx::assert_relative_eq;

    fn element(kind: ElementType, height: f32, thickness: f32, radius: f32, n: f32, abbe: f32) -> ElementDocument {
        ElementDocument {
            kind,
            height,
            thickness,
            radius,
            refractive_index: n,
            abbe_number: abbe,
            coating_lambda: 550.0,
            coating_ior: 1.38,
            mask: None,
            mask_ft: None,
        }
    }

    fn single_lens_document() -> PrescriptionDocument {
        PrescriptionDocument {
            name: "single".to_string(),
            f_number: 2.0,
            effective_focal_length: 50.0,
            field_of_view: 40.0,
            film_width: 36.0,
            film_height: 24.0,
            height_multiplier: None,
            elements: vec![
                element(ElementType::LensSpherical, 10.0, 2.0, 20.0, 1.5, 50.0),
                element(ElementType::ApertureStop, 10.0, 1.0, 0.0, 1.0, 0.0),
                element(ElementType::Sensor, 0.0, 0.0, 0.0, 1.0, 0.0),
            ],
        }
    }

    #[test]
    fn test_load_builds_invariants() {
        let system = load_prescription(&single_lens_document(), &CameraConfig::default()).unwrap();
        let lenses = system.lenses();

        assert_eq!(lenses.len(), 4);
        assert_eq!(lenses[0].height, 10.0);
        assert_eq!(lenses[0].abbe_number, 89.3);
        assert!(lenses[2].is_aperture_stop());
        assert_eq!(lenses[2].height, 5.0);
        assert_eq!(lenses[3].height, 36.0);
        assert_eq!(system.aperture_index(), Some(2));
        assert_eq!(system.f_number, 2.0);
        assert_eq!(system.focal_distance, 50.0);
        assert_eq!(system.wavelength_table().len(), 16);
    }

    #[test]
    fn test_load_applies_height_multiplier() {
        let mut document = single_lens_document();
        document.height_multiplier = Some(2.0);
        let system = load_prescription(&document, &CameraConfig::default()).unwrap();

        assert_eq!(system.height_multiplier(), 2.0);
        assert_eq!(system.lenses()[0].height, 20.0);
        assert_eq!(system.lenses()[1].height, 20.0);
        assert_eq!(system.lenses()[2].height, 10.0);
        assert_eq!(system.lenses()[3].height, 36.0);
    }

    #[test]
    fn test_load_reads_aperture_masks() {
        let mut document = single_lens_document();
        document.elements[1].mask = Some("blades6".to_string());
        let system = load_prescription(&document, &CameraConfig::default()).unwrap();
        assert_eq!(system.aperture_texture, "blades6");
        assert_eq!(system.aperture_fft, "");

        let saved = save_prescription(&system);
        assert_eq!(saved.elements[1].mask.as_deref(), Some("blades6"));
        assert_eq!(saved.elements[1].mask_ft, None);
        assert_eq!(saved.elements[0].mask, None);
    }

    #[test]
    fn test_malformed_prescriptions() {
        let config = CameraConfig::default();

        let mut empty = single_lens_document();
        empty.elements.clear();

        let mut no_sensor = single_lens_document();
        no_sensor.elements.pop();

        let mut no_stop = single_lens_document();
        no_stop.elements.remove(1);

        let mut two_stops = single_lens_document();
        two_stops.elements.insert(0, element(ElementType::ApertureStop, 4.0, 1.0, 0.0, 1.0, 0.0));

        let mut early_sensor = single_lens_document();
        early_sensor.elements[0].kind = ElementType::Sensor;

        for document in [empty, no_sensor, no_stop, two_stops, early_sensor] {
            let error = load_prescription(&document, &config).unwrap_err();
            assert!(error.is_malformed(), "{error}");
        }
    }

    #[test]
    fn test_save_infers_element_types() {
        let system = load_prescription(&single_lens_document(), &CameraConfig::default()).unwrap();
        let saved = save_prescription(&system);

        let kinds: Vec<ElementType> = saved.elements.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ElementType::LensSpherical, ElementType::ApertureStop, ElementType::Sensor]);
        assert_eq!(saved.elements[1].radius, 0.0);
        assert_eq!(saved.elements[1].height, 10.0);
        assert_eq!(saved.height_multiplier, Some(1.0));
    }

    #[test]
    fn test_save_normalises_height_multiplier() {
        let mut system = load_prescription(&single_lens_document(), &CameraConfig::default()).unwrap();
        system.set_height_multiplier(1.5);

        let reloaded = load_prescription(&save_prescription(&system), &CameraConfig::default()).unwrap();
        assert_eq!(reloaded.height_multiplier(), 1.0);
        for (a, b) in reloaded.lenses().iter().zip(system.lenses()) {
            assert_relative_eq!(a.height, b.height, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_text_round_trip() {
        let config = CameraConfig::default();
        let original = load_prescription(&single_lens_document(), &config).unwrap();
        for format in [DocumentFormat::Toml, DocumentFormat::Ron] {
            let text = serialize_prescription(&original, format).unwrap();
            let reloaded = parse_prescription(&text, format, &config).unwrap();
            assert_eq!(reloaded, original, "{format:?}:\n{text}");
        }
    }

    #[test]
    fn test_ron_accepts_bare_optional_values() {
        let text = r#"(
            name: "bare",
            fnumber: 2.0,
            effectiveFocalLength: 50.0,
            fieldOfView: 40.0,
            filmWidth: 36.0,
            filmHeight: 24.0,
            heightMultiplier: 2.0,
            elements: [
                (type: lensSpherical, height: 10.0, thickness: 2.0, radius: 20.0,
                 refractiveIndex: 1.5, abbeNumber: 50.0, coatingLambda: 550.0, coatingIor: 1.38),
                (type: apertureStop, height: 10.0, thickness: 1.0, radius: 0.0,
                 refractiveIndex: 1.0, abbeNumber: 0.0, coatingLambda: 550.0, coatingIor: 1.38,
                 mask: "hex"),
                (type: sensor, height: 0.0, thickness: 0.0, radius: 0.0,
                 refractiveIndex: 1.0, abbeNumber: 0.0, coatingLambda: 550.0, coatingIor: 1.38),
            ],
        )"#;
        let system = parse_prescription(text, DocumentFormat::Ron, &CameraConfig::default()).unwrap();
        assert_eq!(system.height_multiplier(), 2.0);
        assert_eq!(system.aperture_texture, "hex");
        assert_eq!(system.lenses()[1].height, 20.0);

        let saved = serialize_prescription(&system, DocumentFormat::Ron).unwrap();
        assert!(!saved.contains("Some("), "{saved}");
        assert!(saved.contains("mask: \"hex\""), "{saved}");
    }

    #[test]
    fn test_load_applies_config_coating_to_front_element() {
        let config = CameraConfig::default().with_coating(CoatingDefaults { wavelength: 500.0, refraction: 1.45 });
        let system = load_prescription(&single_lens_document(), &config).unwrap();
        let front = &system.lenses()[0];
        assert_eq!(front.coating_wavelength, 500.0);
        assert_eq!(front.coating_refraction, 1.45);
        assert_eq!(system.lenses()[1].coating_wavelength, 550.0);
    }

    #[test]
    fn test_parse_error_is_malformed() {
        let error = parse_prescription("name = \"x\"\n", DocumentFormat::Toml, &CameraConfig::default()).unwrap_err();
        assert!(matches!(error, PrescriptionError::Parse(_)));
        assert!(error.is_malformed());
    }

    #[test]
    fn test_unsupported_extension() {
        let error = load_prescription_file("lens.xml", &CameraConfig::default()).unwrap_err();
        assert!(matches!(error, PrescriptionError::UnsupportedFormat(_)));
    }
}
