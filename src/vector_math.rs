//! Vector helpers shared by the steering code and the projectors.
//! Axis-aligned boxes, safe normalisation and facing rotations.
use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its two corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower corner.
    pub min: Vec3,
    /// Upper corner.
    pub max: Vec3,
}

impl Bounds {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from corner arrays, as stored in the tuning constants.
    #[must_use]
    pub const fn from_arrays(min: [f32; 3], max: [f32; 3]) -> Self {
        Self::new(
            Vec3::new(min[0], min[1], min[2]),
            Vec3::new(max[0], max[1], max[2]),
        )
    }

    /// Returns `true` when every component of `min` is strictly below `max`
    /// and both corners are finite.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmplt(self.max).all()
    }

    /// Clamps `point` into the box component-wise.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use pond::vector_math::Bounds;
    /// let bounds = Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    /// assert_eq!(bounds.clamp(Vec3::new(3.0, 0.5, -7.0)), Vec3::new(1.0, 0.5, -1.0));
    /// ```
    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Returns `true` when `point` lies inside the box, boundary included.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Draws a point uniformly from the half-open box `[min, max)`.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        let unit = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
        self.min + (self.max - self.min) * unit
    }
}

/// Returns the unit vector along `vector`, or `Vec3::ZERO` when the input is
/// zero-length or not finite.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use pond::vector_math::normalize_or_zero;
/// assert_eq!(normalize_or_zero(Vec3::new(0.0, 0.0, 4.0)), Vec3::Z);
/// assert_eq!(normalize_or_zero(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::ZERO);
/// ```
#[must_use]
pub fn normalize_or_zero(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Rotation whose local `-Z` axis points along `forward`, keeping `+Y` as
/// close to `up` as possible.
///
/// Returns `None` when `forward` has no usable direction. When `forward` is
/// parallel to `up` an arbitrary orthogonal up axis is chosen.
#[must_use]
pub fn facing_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let back = -forward.try_normalize()?;
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| up.any_orthonormal_vector());
    let true_up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, back)))
}
