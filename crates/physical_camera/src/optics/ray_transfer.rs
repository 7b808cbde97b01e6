//! Paraxial ray-transfer engine
//!
//! Matrices act on `(height, angle)` column vectors and compose right to
//! left: a surface followed by the gap after it is `translation * refraction`.

use super::ghosts::GhostIndices;
use super::lens::{LensElement, FLAT_RADIUS_EPSILON};
use super::system::OpticalSystem;
use super::OpticsError;
use crate::foundation::math::{AbcdExt, Mat2};

/// Free propagation over an axial distance
pub fn translation(distance: f32) -> Mat2 {
    Mat2::new(
        1.0, distance,
        0.0, 1.0,
    )
}

/// Reflection off a spherical mirror surface; flat surfaces have no power
pub fn reflection(radius: f32) -> Mat2 {
    let power = if radius.abs() > FLAT_RADIUS_EPSILON { 2.0 / radius } else { 0.0 };
    Mat2::new(
        1.0, 0.0,
        power, 1.0,
    )
}

/// Refraction at a spherical interface from index `n1` into `n2`
pub fn refraction(n1: f32, n2: f32, radius: f32) -> Mat2 {
    let power = if radius.abs() > FLAT_RADIUS_EPSILON {
        (n1 - n2) / (n2 * radius)
    } else {
        0.0
    };
    Mat2::new(
        1.0, 0.0,
        power, n1 / n2,
    )
}

/// Index of the medium after `lens`, dispersed when a wavelength is given
fn medium_index(lens: &LensElement, wavelength: Option<f32>) -> f32 {
    wavelength.map_or(lens.refraction, |wavelength| lens.refraction_at(wavelength))
}

/// Surface `index` followed by the gap to the next surface
fn surface_step(lenses: &[LensElement], index: usize, wavelength: Option<f32>) -> Mat2 {
    let lens = &lenses[index];
    let n1 = medium_index(&lenses[index - 1], wavelength);
    let n2 = medium_index(lens, wavelength);
    translation(lens.thickness) * refraction(n1, n2, lens.radius())
}

/// Ray-transfer matrices of the two halves of a lens system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemMatrices {
    /// Front surface up to the aperture stop
    pub before_aperture: Mat2,
    /// Aperture stop up to the sensor
    pub after_aperture: Mat2,
}

/// Compose the system's surfaces into before/after-aperture matrices
///
/// Surfaces `1..last` are visited in order. The stop and everything behind
/// it accumulate into `after_aperture`. With `wavelength` set the media are
/// dispersed, otherwise their d-line indices are used.
pub fn system_matrices(system: &OpticalSystem, wavelength: Option<f32>) -> SystemMatrices {
    let lenses = system.lenses();
    let mut before_aperture = Mat2::identity();
    let mut after_aperture = Mat2::identity();
    let mut past_aperture = false;

    for index in 1..system.last_index() {
        past_aperture |= lenses[index].is_aperture_stop();
        let step = surface_step(lenses, index, wavelength);
        if past_aperture {
            after_aperture = step * after_aperture;
        } else {
            before_aperture = step * before_aperture;
        }
    }

    SystemMatrices {
        before_aperture,
        after_aperture,
    }
}

/// Entrance pupil half-diameter from the thin-lens f-number relation
pub fn effective_aperture_height(focal_length: f32, f_number: f32) -> f32 {
    (focal_length / f_number) / 2.0
}

/// Physical half-size of the aperture stop for a target f-number
///
/// Traces the paraxial system from the front surface to the stop at
/// `wavelength` and scales the entrance pupil by the accumulated height
/// magnification.
pub fn physical_aperture_height(
    system: &OpticalSystem,
    focal_length: f32,
    f_number: f32,
    wavelength: f32,
) -> Result<f32, OpticsError> {
    let lenses = system.lenses();
    let mut accumulated = Mat2::identity();

    for index in 1..lenses.len() {
        if lenses[index].is_aperture_stop() {
            return Ok(effective_aperture_height(focal_length, f_number) * accumulated.a());
        }
        accumulated = surface_step(lenses, index, Some(wavelength)) * accumulated;
    }

    Err(OpticsError::MissingApertureStop(system.name.clone()))
}

/// Axial length from the front element to the sensor
pub fn sensor_distance(system: &OpticalSystem) -> f32 {
    system.lenses().iter().map(|lens| lens.thickness).sum()
}

/// Paraxial matrix of the light path that forms a ghost
///
/// The path is unfolded: it runs forward to `ghost.second`, reflects,
/// travels back to `ghost.first` crossing the surfaces in between in
/// reverse, reflects again and continues forward to the sensor. Every gap
/// is traversed with a positive distance; seen from behind a surface's
/// curvature flips sign.
pub fn ghost_transfer_matrix(
    system: &OpticalSystem,
    ghost: GhostIndices,
    wavelength: f32,
) -> Result<Mat2, OpticsError> {
    let lenses = system.lenses();
    let last = system.last_index();
    let GhostIndices { first, second } = ghost;
    if first == 0 || first >= second || second >= last {
        return Err(OpticsError::InvalidGhost {
            first,
            second,
            elements: lenses.len(),
        });
    }

    let index = |element: usize| lenses[element].refraction_at(wavelength);
    let mut path = Mat2::identity();

    for element in 1..second {
        path = surface_step(lenses, element, Some(wavelength)) * path;
    }

    path = translation(lenses[second - 1].thickness) * reflection(lenses[second].radius()) * path;
    for element in (first + 1..second).rev() {
        let back = refraction(index(element), index(element - 1), -lenses[element].radius());
        path = translation(lenses[element - 1].thickness) * back * path;
    }

    path = translation(lenses[first].thickness) * reflection(-lenses[first].radius()) * path;
    for element in first + 1..last {
        path = surface_step(lenses, element, Some(wavelength)) * path;
    }

    Ok(path)
}
