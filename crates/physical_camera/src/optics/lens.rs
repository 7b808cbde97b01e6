//! Lens elements
//!
//! One [`LensElement`] is one optical surface of the stack together with the
//! medium that follows it up to the next surface.

use super::coating;
use super::dispersion::cauchy_dispersion;

/// Abbe number given to the synthetic front element (air, never dispersive)
pub const FRONT_ELEMENT_ABBE_NUMBER: f32 = 89.3;

/// Curvature radii at or below this magnitude are treated as flat
pub const FLAT_RADIUS_EPSILON: f32 = 1e-4;

/// Shape of an optical surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    /// Spherical refracting surface.
    ///
    /// Positive radius puts the centre of curvature downstream of the
    /// surface. A radius near zero is a flat interface.
    Refractive {
        /// Radius of curvature
        radius: f32,
    },
    /// The aperture stop: flat, no optical power, limits the bundle width
    ApertureStop,
}

/// One surface of a lens system
#[derive(Debug, Clone, PartialEq)]
pub struct LensElement {
    /// Clear radius of the surface
    pub height: f32,
    /// Axial distance to the next surface
    pub thickness: f32,
    /// Surface shape
    pub surface: SurfaceKind,
    /// Refractive index (d-line) of the medium following this surface
    pub refraction: f32,
    /// Abbe number of the medium following this surface
    pub abbe_number: f32,
    /// Anti-reflection coating design wavelength (nm)
    pub coating_wavelength: f32,
    /// Anti-reflection coating refractive index
    pub coating_refraction: f32,
}

impl LensElement {
    /// Create a spherical refracting surface
    pub fn spherical(height: f32, thickness: f32, radius: f32, refraction: f32, abbe_number: f32) -> Self {
        Self {
            height,
            thickness,
            surface: SurfaceKind::Refractive { radius },
            refraction,
            abbe_number,
            coating_wavelength: 0.0,
            coating_refraction: 1.0,
        }
    }

    /// Create the aperture stop surface
    pub fn aperture_stop(height: f32, thickness: f32) -> Self {
        Self {
            height,
            thickness,
            surface: SurfaceKind::ApertureStop,
            refraction: 1.0,
            abbe_number: 0.0,
            coating_wavelength: 0.0,
            coating_refraction: 1.0,
        }
    }

    /// Set the anti-reflection coating
    pub fn with_coating(mut self, wavelength: f32, refraction: f32) -> Self {
        self.coating_wavelength = wavelength;
        self.coating_refraction = refraction;
        self
    }

    /// Whether this surface is the aperture stop
    pub const fn is_aperture_stop(&self) -> bool {
        matches!(self.surface, SurfaceKind::ApertureStop)
    }

    /// Radius of curvature; the aperture stop reports `0.0` (flat)
    pub const fn radius(&self) -> f32 {
        match self.surface {
            SurfaceKind::Refractive { radius } => radius,
            SurfaceKind::ApertureStop => 0.0,
        }
    }

    /// Whether the surface carries no optical power
    pub fn is_flat(&self) -> bool {
        self.radius().abs() <= FLAT_RADIUS_EPSILON
    }

    /// Change the curvature of a refracting surface; ignored on the stop
    pub fn set_radius(&mut self, radius: f32) {
        if let SurfaceKind::Refractive { radius: current } = &mut self.surface {
            *current = radius;
        }
    }

    /// Refractive index of the following medium at `wavelength` (nm)
    pub fn refraction_at(&self, wavelength: f32) -> f32 {
        cauchy_dispersion(wavelength, self.refraction, self.abbe_number)
    }

    /// Quarter-wave thickness of this surface's coating between media `n0` and `n2`
    pub fn coating_thickness(&self, n0: f32, n2: f32) -> f32 {
        coating::coating_thickness(self.coating_wavelength, n0, self.coating_refraction, n2)
    }

    /// Reflectance of this surface's coated interface
    pub fn coating_reflectance(&self, wavelength: f32, incidence_angle: f32, n0: f32, n2: f32) -> f32 {
        coating::anti_reflection_coating_reflectance(
            wavelength,
            self.coating_wavelength,
            incidence_angle,
            n0,
            self.coating_refraction,
            n2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aperture_stop_is_flat() {
        let stop = LensElement::aperture_stop(5.0, 1.0);
        assert!(stop.is_aperture_stop());
        assert!(stop.is_flat());
        assert_eq!(stop.radius(), 0.0);
    }

    #[test]
    fn test_set_radius_ignores_stop() {
        let mut stop = LensElement::aperture_stop(5.0, 1.0);
        stop.set_radius(12.0);
        assert!(stop.is_aperture_stop());

        let mut lens = LensElement::spherical(10.0, 2.0, 20.0, 1.5, 50.0);
        lens.set_radius(-35.0);
        assert_eq!(lens.radius(), -35.0);
        assert!(!lens.is_flat());
    }

    #[test]
    fn test_refraction_at_uses_cauchy() {
        let lens = LensElement::spherical(10.0, 2.0, 20.0, 1.5168, 64.17);
        assert_relative_eq!(lens.refraction_at(550.0), cauchy_dispersion(550.0, 1.5168, 64.17));
        assert!(lens.refraction_at(450.0) > lens.refraction_at(650.0));
    }

    #[test]
    fn test_coating_helpers_use_element_parameters() {
        let lens = LensElement::spherical(10.0, 2.0, 20.0, 1.5, 50.0).with_coating(550.0, 1.38);
        assert_relative_eq!(
            lens.coating_thickness(1.0, 1.5),
            coating::coating_thickness(550.0, 1.0, 1.38, 1.5)
        );
        let r = lens.coating_reflectance(550.0, 0.0, 1.0, 1.5);
        assert!((0.0..=1.0).contains(&r));
    }
}
