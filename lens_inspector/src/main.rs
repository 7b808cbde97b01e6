//! Lens inspector
//!
//! Loads the prescription catalogue named by a camera configuration and
//! prints what the flare renderer would bind for each lens: pupil and stop
//! sizes, system matrices, per-channel dispersion, coating response and
//! ghost count.
//!
//! Usage: `lens_inspector [camera.toml | camera.ron]`

use physical_camera::foundation::logging;
use physical_camera::prelude::*;
use thiserror::Error;

/// Channels reported per element
const REPORT_CHANNELS: usize = 3;

#[derive(Error, Debug)]
enum InspectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Optics error: {0}")]
    Optics(#[from] OpticsError),
}

fn load_config() -> Result<CameraConfig, InspectorError> {
    let config = match std::env::args().nth(1) {
        Some(path) => CameraConfig::load_from_file(&path)?,
        None => CameraConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn format_matrix(m: &Mat2) -> String {
    format!("[{:9.4} {:9.4}; {:9.4} {:9.4}]", m.a(), m.b(), m.c(), m.d())
}

fn report(system: &OpticalSystem) -> Result<(), InspectorError> {
    let design_wavelength = system.coating_wavelength;
    let pupil = effective_aperture_height(system.focal_distance, system.f_number);
    let stop = physical_aperture_height(system, system.focal_distance, system.f_number, design_wavelength)?;
    let ghosts = enumerate_ghosts(system)?;
    let matrices = system_matrices(system, Some(design_wavelength));

    println!("== {} ==", system.name);
    println!(
        "  f/{:.1}  efl {:.1} mm  fov {:.1} deg  film {}x{}",
        system.f_number,
        system.focal_distance,
        system.field_of_view,
        system.film_size().x,
        system.film_size().y
    );
    println!("  entrance pupil half-height {:.3}  stop half-height {:.3}", pupil, stop);
    println!("  sensor distance {:.3}", sensor_distance(system));
    println!("  before aperture {}", format_matrix(&matrices.before_aperture));
    println!("  after aperture  {}", format_matrix(&matrices.after_aperture));
    if !system.aperture_texture.is_empty() {
        println!("  aperture mask '{}' / '{}'", system.aperture_texture, system.aperture_fft);
    }

    let lenses = system.lenses();
    for index in 1..system.last_index() {
        let lens = &lenses[index];
        if lens.is_aperture_stop() {
            println!("  [{index:2}] stop  height {:.3}", lens.height);
            continue;
        }
        let n0 = lenses[index - 1].refraction;
        let channels: Vec<String> = (0..REPORT_CHANNELS)
            .filter_map(|channel| system.channel_refraction_index(index, REPORT_CHANNELS, channel))
            .map(|n| format!("{n:.4}"))
            .collect();
        println!(
            "  [{index:2}] r {:9.3}  n {}  coating {:.1} nm  R {:.4}",
            lens.radius(),
            channels.join("/"),
            lens.coating_thickness(n0, lens.refraction),
            lens.coating_reflectance(design_wavelength, 0.0, n0, lens.refraction),
        );
    }

    println!("  {} ghosts", ghosts.len());
    for ghost in ghosts.iter().take(5) {
        let matrix = ghost_transfer_matrix(system, *ghost, design_wavelength)?;
        println!("    ({:2}, {:2}) {}", ghost.first, ghost.second, format_matrix(&matrix));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);
    log::info!("Reading prescriptions from {}", config.prescription_directory);

    let catalogue = PrescriptionCatalogue::load_directory(&config.prescription_directory, &config);
    if catalogue.is_empty() {
        log::warn!("No prescriptions found in {}", config.prescription_directory);
    }

    for (name, system) in catalogue.iter() {
        if let Err(e) = report(system) {
            log::error!("Cannot inspect '{}': {}", name, e);
        }
    }
    Ok(())
}
