//! Chromatic dispersion
//!
//! Two-term Cauchy approximation `n(λ) = A + B / λ²` calibrated from a
//! glass's d-line index and Abbe number.

/// Scale from `(nd - 1) / Vd` to the Cauchy `B` coefficient (µm²)
const CAUCHY_B_SCALE: f32 = 0.52345;

/// Inverse-square d-line wavelength term used to recover `A` (µm⁻²)
const CAUCHY_A_OFFSET: f32 = 2.897;

/// Refractive index at `wavelength` (nm) for a medium with d-line index `nd`
///
/// A non-positive Abbe number describes a medium without dispersion and
/// returns `nd` unchanged.
pub fn cauchy_dispersion(wavelength: f32, nd: f32, abbe_number: f32) -> f32 {
    if abbe_number <= 0.0 {
        return nd;
    }
    let b = ((nd - 1.0) / abbe_number) * CAUCHY_B_SCALE;
    let a = nd - b * CAUCHY_A_OFFSET;
    let lambda_um = wavelength * 1e-3;
    a + b / (lambda_um * lambda_um)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_d_line_reproduces_nd() {
        // 1 / 0.5876² ≈ 2.896, so the d-line lands back on nd
        let n = cauchy_dispersion(587.56, 1.5168, 64.17);
        assert_relative_eq!(n, 1.5168, epsilon = 1e-4);
    }

    #[test]
    fn test_index_decreases_with_wavelength() {
        for &(nd, vd) in &[(1.5168, 64.17), (1.7847, 25.72), (1.62, 36.4)] {
            let mut previous = cauchy_dispersion(400.0, nd, vd);
            for step in 1..=30 {
                let wavelength = 400.0 + step as f32 * 10.0;
                let n = cauchy_dispersion(wavelength, nd, vd);
                assert!(n < previous, "n({wavelength}) = {n} not below {previous}");
                previous = n;
            }
        }
    }

    #[test]
    fn test_air_is_constant() {
        assert_eq!(cauchy_dispersion(450.0, 1.0, 89.3), 1.0);
        assert_eq!(cauchy_dispersion(650.0, 1.0, 89.3), 1.0);
    }

    #[test]
    fn test_zero_abbe_number_is_non_dispersive() {
        assert_eq!(cauchy_dispersion(450.0, 1.5, 0.0), 1.5);
        assert_eq!(cauchy_dispersion(650.0, 1.5, -1.0), 1.5);
    }
}
