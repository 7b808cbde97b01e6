//! # Optical System Model
//!
//! Paraxial model of a multi-element camera lens used to parameterise
//! lens-flare rendering:
//!
//! - [`lens`]: surfaces and the media between them
//! - [`system`]: the full lens assembly and its invariants
//! - [`ray_transfer`]: ABCD matrices, aperture sizes, sensor distance
//! - [`dispersion`]: Cauchy refractive index per wavelength
//! - [`coating`]: quarter-wave anti-reflection coating response
//! - [`ghosts`]: surface pairs that produce flare ghosts
//!
//! Everything here is plain computation over an [`OpticalSystem`] snapshot.
//! Systems are mutated only through their setters.

use thiserror::Error;

pub mod coating;
pub mod dispersion;
pub mod ghosts;
pub mod lens;
pub mod ray_transfer;
pub mod system;

pub use coating::{anti_reflection_coating_reflectance, coating_thickness};
pub use dispersion::cauchy_dispersion;
pub use ghosts::{enumerate_ghosts, ghost_count, GhostIndices};
pub use lens::{LensElement, SurfaceKind};
pub use ray_transfer::{
    effective_aperture_height, ghost_transfer_matrix, physical_aperture_height, reflection,
    refraction, sensor_distance, system_matrices, translation, SystemMatrices,
};
pub use system::OpticalSystem;

/// Errors from geometric queries on an optical system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpticsError {
    /// The system has no aperture stop, so stop-relative quantities are undefined
    #[error("Optical system '{0}' has no aperture stop")]
    MissingApertureStop(String),

    /// A ghost names surfaces that cannot form a double reflection in this system
    #[error("Invalid ghost ({first}, {second}) for a system of {elements} elements")]
    InvalidGhost {
        /// First reflecting surface
        first: usize,
        /// Second reflecting surface
        second: usize,
        /// Element count of the system
        elements: usize,
    },
}
