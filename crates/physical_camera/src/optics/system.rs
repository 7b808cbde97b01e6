//! Optical system (lens patent) model

use log::{debug, warn};

use super::lens::{LensElement, SurfaceKind, FRONT_ELEMENT_ABBE_NUMBER};
use crate::config::{CoatingDefaults, SpectralSettings};
use crate::foundation::math::{utils, Vec2};

/// A complete lens assembly
///
/// `lenses` always starts with a synthetic zero-thickness front element in
/// air and ends with the sensor. The front element's height follows the
/// first real surface and the sensor's height is the larger film dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSystem {
    /// Catalogue key
    pub name: String,
    /// Relative aperture (focal length / entrance pupil diameter)
    pub f_number: f32,
    /// Effective focal length
    pub focal_distance: f32,
    /// Field of view (degrees)
    pub field_of_view: f32,
    /// System-wide coating index, see [`Self::propagate_coating_defaults`]
    pub coating_refraction: f32,
    /// System-wide coating design wavelength (nm)
    pub coating_wavelength: f32,
    /// Aperture shape texture key, passed through to the renderer
    pub aperture_texture: String,
    /// Aperture Fourier-transform texture key, passed through to the renderer
    pub aperture_fft: String,

    film_size: Vec2,
    height_multiplier: f32,
    spectral: SpectralSettings,
    lenses: Vec<LensElement>,
    wavelengths: Vec<Vec<f32>>,
}

impl OpticalSystem {
    /// Create a system from its surfaces, front to back
    ///
    /// `elements` must end with the sensor surface. The front element is
    /// added here; callers never supply it.
    pub fn new(name: impl Into<String>, film_size: Vec2, elements: Vec<LensElement>) -> Self {
        let coating = CoatingDefaults::default();
        let mut lenses = Vec::with_capacity(elements.len() + 1);
        lenses.push(LensElement {
            height: 0.0,
            thickness: 0.0,
            surface: SurfaceKind::Refractive { radius: 0.0 },
            refraction: 1.0,
            abbe_number: FRONT_ELEMENT_ABBE_NUMBER,
            coating_wavelength: coating.wavelength,
            coating_refraction: coating.refraction,
        });
        lenses.extend(elements);

        let mut system = Self {
            name: name.into(),
            f_number: 2.8,
            focal_distance: 50.0,
            field_of_view: 40.0,
            coating_refraction: coating.refraction,
            coating_wavelength: coating.wavelength,
            aperture_texture: String::new(),
            aperture_fft: String::new(),
            film_size,
            height_multiplier: 1.0,
            spectral: SpectralSettings::default(),
            lenses,
            wavelengths: Vec::new(),
        };
        system.refresh_synthetic_elements();
        system.compute_wavelength_table();
        system
    }

    /// Set the f-number
    pub fn with_f_number(mut self, f_number: f32) -> Self {
        self.f_number = f_number;
        self
    }

    /// Set the effective focal length
    pub fn with_focal_distance(mut self, focal_distance: f32) -> Self {
        self.focal_distance = focal_distance;
        self
    }

    /// Set the field of view
    pub fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Set the spectral sampling and rebuild the wavelength table
    pub fn with_spectral(mut self, spectral: SpectralSettings) -> Self {
        self.spectral = spectral;
        self.compute_wavelength_table();
        self
    }

    /// Set the system coating defaults
    ///
    /// Only the synthetic front element takes them over; real surfaces keep
    /// their own coatings until [`Self::propagate_coating_defaults`].
    pub fn with_coating_defaults(mut self, coating: CoatingDefaults) -> Self {
        self.coating_wavelength = coating.wavelength;
        self.coating_refraction = coating.refraction;
        let front = &mut self.lenses[0];
        front.coating_wavelength = coating.wavelength;
        front.coating_refraction = coating.refraction;
        self
    }

    /// Copy this system as the starting point of a new one
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// All surfaces, front element first, sensor last
    pub fn lenses(&self) -> &[LensElement] {
        &self.lenses
    }

    /// Mutable access to one surface, e.g. to edit its curvature
    ///
    /// Call [`Self::refresh_synthetic_elements`] after changing the first
    /// real surface's height.
    pub fn lens_mut(&mut self, index: usize) -> Option<&mut LensElement> {
        self.lenses.get_mut(index)
    }

    /// Index of the last element (the sensor)
    pub fn last_index(&self) -> usize {
        self.lenses.len() - 1
    }

    /// Index of the aperture stop, scanning from the first real surface
    pub fn aperture_index(&self) -> Option<usize> {
        self.lenses
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, lens)| lens.is_aperture_stop())
            .map(|(index, _)| index)
    }

    /// Sensor size (width, height)
    pub const fn film_size(&self) -> Vec2 {
        self.film_size
    }

    /// Change the sensor size; the sensor element's height follows
    pub fn set_film_size(&mut self, film_size: Vec2) {
        self.film_size = film_size;
        self.refresh_synthetic_elements();
    }

    /// Current height multiplier
    pub const fn height_multiplier(&self) -> f32 {
        self.height_multiplier
    }

    /// Rescale every element except the sensor to a new height multiplier
    ///
    /// Non-positive values are ignored and the current multiplier is kept.
    pub fn set_height_multiplier(&mut self, multiplier: f32) {
        if !(multiplier > 0.0) {
            warn!(
                "Ignoring height multiplier {} for '{}', keeping {}",
                multiplier, self.name, self.height_multiplier
            );
            return;
        }
        let ratio = multiplier / self.height_multiplier;
        let sensor = self.last_index();
        for lens in &mut self.lenses[..sensor] {
            lens.height *= ratio;
        }
        self.height_multiplier = multiplier;
    }

    /// Re-derive the synthetic front element and sensor heights
    pub fn refresh_synthetic_elements(&mut self) {
        if let Some(first) = self.lenses.get(1).map(|lens| lens.height) {
            self.lenses[0].height = first;
        }
        let sensor_height = utils::max_extent(self.film_size);
        if let Some(sensor) = self.lenses.last_mut() {
            sensor.height = sensor_height;
        }
    }

    /// Overwrite every element's coating with the system defaults
    pub fn propagate_coating_defaults(&mut self) {
        for lens in &mut self.lenses {
            lens.coating_refraction = self.coating_refraction;
            lens.coating_wavelength = self.coating_wavelength;
        }
    }

    /// Spectral sampling in use
    pub const fn spectral(&self) -> SpectralSettings {
        self.spectral
    }

    /// Shortest sampled wavelength (nm)
    pub const fn min_wavelength(&self) -> f32 {
        self.spectral.min_wavelength
    }

    /// Longest sampled wavelength (nm)
    pub const fn max_wavelength(&self) -> f32 {
        self.spectral.max_wavelength
    }

    /// Largest channel count with a wavelength table entry
    pub const fn max_num_wavelengths(&self) -> usize {
        self.spectral.max_num_wavelengths
    }

    /// Change the sampled wavelength range and rebuild the table
    pub fn set_spectral_range(&mut self, min_wavelength: f32, max_wavelength: f32) {
        self.spectral.min_wavelength = min_wavelength;
        self.spectral.max_wavelength = max_wavelength;
        self.compute_wavelength_table();
    }

    /// Change the maximum channel count and rebuild the table
    pub fn set_max_num_wavelengths(&mut self, max_num_wavelengths: usize) {
        self.spectral.max_num_wavelengths = max_num_wavelengths;
        self.compute_wavelength_table();
    }

    /// Rebuild the per-channel-count wavelength table
    ///
    /// Entry `n - 1` holds `n` wavelengths spread evenly over the sampled
    /// range; the single-channel entry is the shortest wavelength.
    pub fn compute_wavelength_table(&mut self) {
        let SpectralSettings {
            min_wavelength,
            max_wavelength,
            max_num_wavelengths,
        } = self.spectral;
        self.wavelengths = (1..=max_num_wavelengths)
            .map(|count| utils::linspace(min_wavelength, max_wavelength, count))
            .collect();
        debug!(
            "Wavelength table for '{}': {} channel counts over [{}, {}] nm",
            self.name, max_num_wavelengths, min_wavelength, max_wavelength
        );
    }

    /// Wavelength table, entry `n - 1` for `n` channels
    pub fn wavelength_table(&self) -> &[Vec<f32>] {
        &self.wavelengths
    }

    /// Wavelength of channel `channel_id` when sampling `channel_count` channels
    pub fn channel_wavelength(&self, channel_count: usize, channel_id: usize) -> Option<f32> {
        self.wavelengths
            .get(channel_count.checked_sub(1)?)?
            .get(channel_id)
            .copied()
    }

    /// Refractive index of the medium after `element` at `wavelength` (nm)
    pub fn refraction_index(&self, element: usize, wavelength: f32) -> Option<f32> {
        self.lenses.get(element).map(|lens| lens.refraction_at(wavelength))
    }

    /// Refractive index of the medium after `element` for one spectral channel
    pub fn channel_refraction_index(
        &self,
        element: usize,
        channel_count: usize,
        channel_id: usize,
    ) -> Option<f32> {
        let wavelength = self.channel_wavelength(channel_count, channel_id)?;
        self.refraction_index(element, wavelength)
    }
}
