//! Anti-reflection coatings
//!
//! Single quarter-wave layer between two media. The layer index is pushed up
//! to the ideal `sqrt(n0 * n2)` when the nominal coating material is lower,
//! and the thickness is fixed at the coating's own design wavelength, so
//! reflectance is smallest there and grows away from it.

use std::f32::consts::PI;

/// Layer index actually used: the better of the nominal material and the ideal match
pub fn optimal_coating_refraction(n0: f32, n1: f32, n2: f32) -> f32 {
    (n0 * n2).sqrt().max(n1)
}

/// Quarter-wave layer thickness (nm) for a coating designed at `coating_wavelength`
pub fn coating_thickness(coating_wavelength: f32, n0: f32, n1: f32, n2: f32) -> f32 {
    coating_wavelength / (4.0 * optimal_coating_refraction(n0, n1, n2))
}

/// Fresnel amplitude reflection coefficient, s-polarised
fn fresnel_rs(n_i: f32, cos_i: f32, n_t: f32, cos_t: f32) -> f32 {
    (n_i * cos_i - n_t * cos_t) / (n_i * cos_i + n_t * cos_t)
}

/// Fresnel amplitude reflection coefficient, p-polarised
fn fresnel_rp(n_i: f32, cos_i: f32, n_t: f32, cos_t: f32) -> f32 {
    (n_t * cos_i - n_i * cos_t) / (n_t * cos_i + n_i * cos_t)
}

/// Intensity reflectance of a single film from its two interface amplitudes
fn thin_film_reflectance(r01: f32, r12: f32, cos_2beta: f32) -> f32 {
    let interference = 2.0 * r01 * r12 * cos_2beta;
    (r01 * r01 + r12 * r12 + interference) / (1.0 + r01 * r01 * r12 * r12 + interference)
}

/// Unpolarised reflectance of a coated interface
///
/// * `wavelength` - query wavelength (nm)
/// * `coating_wavelength` - design wavelength of the layer (nm)
/// * `incidence_angle` - angle of incidence in medium `n0` (radians)
/// * `n0`, `n2` - media on either side of the coating
/// * `n1` - nominal coating index
///
/// Returns a value in `[0, 1]`; total internal reflection in either layer
/// reflects everything.
pub fn anti_reflection_coating_reflectance(
    wavelength: f32,
    coating_wavelength: f32,
    incidence_angle: f32,
    n0: f32,
    n1: f32,
    n2: f32,
) -> f32 {
    let n1 = optimal_coating_refraction(n0, n1, n2);
    let d = coating_wavelength / (4.0 * n1);

    let sin0 = incidence_angle.sin();
    let sin1 = n0 * sin0 / n1;
    let sin2 = n0 * sin0 / n2;
    if sin1.abs() > 1.0 || sin2.abs() > 1.0 {
        return 1.0;
    }

    let cos0 = incidence_angle.cos();
    let cos1 = (1.0 - sin1 * sin1).sqrt();
    let cos2 = (1.0 - sin2 * sin2).sqrt();

    let beta = (2.0 * PI / wavelength) * n1 * d * cos1;
    let cos_2beta = (2.0 * beta).cos();

    let rs = thin_film_reflectance(
        fresnel_rs(n0, cos0, n1, cos1),
        fresnel_rs(n1, cos1, n2, cos2),
        cos_2beta,
    );
    let rp = thin_film_reflectance(
        fresnel_rp(n0, cos0, n1, cos1),
        fresnel_rp(n1, cos1, n2, cos2),
        cos_2beta,
    );

    (0.5 * (rs + rp)).clamp(0.0, 1.0)
}
