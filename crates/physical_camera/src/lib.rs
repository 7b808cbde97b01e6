//! # Physical Camera
//!
//! Physically-based camera lens model for the lens-flare renderer.
//!
//! ## Features
//!
//! - **Lens Prescriptions**: Named multi-element lens systems loaded from TOML or RON
//! - **Paraxial Optics**: Ray-transfer (ABCD) matrices, entrance pupil and stop sizes
//! - **Dispersion**: Per-wavelength refractive index via the Cauchy approximation
//! - **Coatings**: Quarter-wave anti-reflection coating reflectance
//! - **Flare Ghosts**: Enumeration of double-reflection surface pairs and their matrices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use physical_camera::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CameraConfig::default();
//!     let catalogue = PrescriptionCatalogue::load_directory(&config.prescription_directory, &config);
//!
//!     for (name, system) in catalogue.iter() {
//!         let stop = physical_aperture_height(system, system.focal_distance, system.f_number, 550.0)?;
//!         let ghosts = enumerate_ghosts(system)?;
//!         println!("{name}: stop {stop:.2} mm, {} ghosts", ghosts.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod optics;
pub mod prescription;

/// Common imports for camera users
pub mod prelude {
    pub use crate::{
        config::{CameraConfig, CoatingDefaults, Config, ConfigError, DocumentFormat, SpectralSettings},
        foundation::math::{AbcdExt, Mat2, Vec2},
        optics::{
            anti_reflection_coating_reflectance, cauchy_dispersion, coating_thickness,
            effective_aperture_height, enumerate_ghosts, ghost_count, ghost_transfer_matrix,
            physical_aperture_height, reflection, refraction, sensor_distance, system_matrices,
            translation, GhostIndices, LensElement, OpticalSystem, OpticsError, SurfaceKind,
            SystemMatrices,
        },
        prescription::{PrescriptionCatalogue, PrescriptionDocument, PrescriptionError},
    };
}
