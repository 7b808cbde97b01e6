//! Math utilities and types
//!
//! Provides the small linear-algebra vocabulary the paraxial optics code is
//! written in. Ray-transfer matrices act on column vectors `(y, θ)ᵗ`, so a
//! ray leaving an element is `M * ray_in`.

pub use nalgebra::{Matrix2, Vector2};

/// 2D vector type (film sizes, paraxial rays)
pub type Vec2 = Vector2<f32>;

/// 2x2 matrix type (ray-transfer / ABCD matrices)
pub type Mat2 = Matrix2<f32>;

/// Paraxial ray as a `(height, angle)` column vector
pub type ParaxialRay = Vec2;

/// Extension methods for reading ray-transfer matrices by their optics names
pub trait AbcdExt {
    /// Height-to-height term (`A`)
    fn a(&self) -> f32;
    /// Angle-to-height term (`B`)
    fn b(&self) -> f32;
    /// Height-to-angle term (`C`), the optical power
    fn c(&self) -> f32;
    /// Angle-to-angle term (`D`)
    fn d(&self) -> f32;
}

impl AbcdExt for Mat2 {
    fn a(&self) -> f32 {
        self[(0, 0)]
    }

    fn b(&self) -> f32 {
        self[(0, 1)]
    }

    fn c(&self) -> f32 {
        self[(1, 0)]
    }

    fn d(&self) -> f32 {
        self[(1, 1)]
    }
}

/// Math utility functions
pub mod utils {
    /// Largest component of a 2D extent
    pub fn max_extent(size: super::Vec2) -> f32 {
        size.x.max(size.y)
    }

    /// Evenly spaced samples over `[min, max]`; a single sample sits at `min`
    pub fn linspace(min: f32, max: f32, count: usize) -> Vec<f32> {
        match count {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let step = (max - min) / (count - 1) as f32;
                (0..count).map(|i| min + step * i as f32).collect()
            }
        }
    }
}
