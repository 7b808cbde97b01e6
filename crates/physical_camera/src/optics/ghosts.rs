//! Flare ghost enumeration
//!
//! A ghost is light reflected twice inside the lens, once off each of two
//! surfaces. Only pairs on the same side of the aperture stop are modelled;
//! the sensor never takes part.

use super::system::OpticalSystem;
use super::OpticsError;

/// Pair of reflecting surfaces forming one ghost, `first < second`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostIndices {
    /// Surface nearer the front
    pub first: usize,
    /// Surface nearer the sensor
    pub second: usize,
}

impl GhostIndices {
    /// Create a ghost between two surfaces
    pub const fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }
}

fn push_pairs(ghosts: &mut Vec<GhostIndices>, surfaces: std::ops::Range<usize>) {
    for first in surfaces.clone() {
        for second in first + 1..surfaces.end {
            ghosts.push(GhostIndices::new(first, second));
        }
    }
}

/// All ghosts of a system, front group first, each group in ascending order
pub fn enumerate_ghosts(system: &OpticalSystem) -> Result<Vec<GhostIndices>, OpticsError> {
    let aperture = system
        .aperture_index()
        .ok_or_else(|| OpticsError::MissingApertureStop(system.name.clone()))?;
    let last = system.last_index();

    let mut ghosts = Vec::new();
    push_pairs(&mut ghosts, 1..aperture);
    push_pairs(&mut ghosts, aperture + 1..last);
    Ok(ghosts)
}

/// Number of ghosts [`enumerate_ghosts`] yields
pub fn ghost_count(system: &OpticalSystem) -> Result<usize, OpticsError> {
    enumerate_ghosts(system).map(|ghosts| ghosts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::optics::lens::LensElement;
    use crate::optics::system::tests::{double_gauss_system, four_element_system};

    #[test]
    fn test_single_lens_has_no_ghosts() {
        let system = four_element_system();
        assert!(enumerate_ghosts(&system).unwrap().is_empty());
        assert_eq!(ghost_count(&system), Ok(0));
    }

    #[test]
    fn test_double_gauss_ghosts() {
        let system = double_gauss_system();
        let ghosts = enumerate_ghosts(&system).unwrap();

        // Four surfaces ahead of the stop at 5, three behind it before the sensor at 9
        let expected: Vec<GhostIndices> = [
            (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4),
            (6, 7), (6, 8), (7, 8),
        ]
        .iter()
        .map(|&(first, second)| GhostIndices::new(first, second))
        .collect();
        assert_eq!(ghosts, expected);
        assert_eq!(ghost_count(&system), Ok(9));
    }

    #[test]
    fn test_ghosts_never_touch_or_straddle_stop() {
        let system = double_gauss_system();
        let aperture = system.aperture_index().unwrap();
        let sensor = system.last_index();
        for ghost in enumerate_ghosts(&system).unwrap() {
            assert!(ghost.first >= 1);
            assert!(ghost.first < ghost.second);
            assert_ne!(ghost.first, aperture);
            assert_ne!(ghost.second, aperture);
            assert_ne!(ghost.second, sensor);
            assert!(!(ghost.first < aperture && aperture < ghost.second));
        }
    }

    #[test]
    fn test_missing_stop() {
        let system = OpticalSystem::new(
            "no-stop",
            Vec2::new(36.0, 24.0),
            vec![LensElement::spherical(10.0, 2.0, 20.0, 1.5, 50.0), LensElement::spherical(0.0, 0.0, 0.0, 1.0, 0.0)],
        );
        assert_eq!(
            enumerate_ghosts(&system),
            Err(OpticsError::MissingApertureStop("no-stop".to_string()))
        );
    }
}
