//! Renderer-free pointer projection.
//!
//! [`PerspectiveProjector`] rebuilds the pick ray of a perspective camera from
//! its eye, look-at point and vertical field of view, then intersects it with
//! a [`DropPlane`]. The headless runner and the tests use it in place of a
//! real camera.
use glam::{Quat, Vec2, Vec3};

use crate::config::{DropPlane, PondConfig};
use crate::host::PointerProjector;
use crate::vector_math::facing_rotation;

const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line from `origin` along the unit vector `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Where the ray crosses `plane`, if it does so in front of the origin.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use pond::config::DropPlane;
    /// use pond::projection::Ray;
    /// let ray = Ray { origin: Vec3::new(1.0, 5.0, 2.0), direction: Vec3::NEG_Y };
    /// assert_eq!(ray.intersect(&DropPlane::default()), Some(Vec3::new(1.0, 0.0, 2.0)));
    /// let away = Ray { direction: Vec3::Y, ..ray };
    /// assert_eq!(away.intersect(&DropPlane::default()), None);
    /// ```
    #[must_use]
    pub fn intersect(&self, plane: &DropPlane) -> Option<Vec3> {
        let normal = plane.unit_normal()?;
        let denom = normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (plane.origin() - self.origin).dot(normal) / denom;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// Perspective camera model used to project clicks without a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveProjector {
    eye: Vec3,
    rotation: Quat,
    tan_half_fov: f32,
    viewport: Vec2,
    plane: DropPlane,
}

impl PerspectiveProjector {
    /// Builds a projector for a camera at `eye` looking at `look_at`.
    ///
    /// Returns `None` when the eye and look-at point coincide, the field of
    /// view is outside `(0, 180)` degrees or the viewport is empty.
    #[must_use]
    pub fn new(
        eye: Vec3,
        look_at: Vec3,
        fov_degrees: f32,
        viewport: Vec2,
        plane: DropPlane,
    ) -> Option<Self> {
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) || viewport.min_element() <= 0.0 {
            return None;
        }
        let rotation = facing_rotation(look_at - eye, Vec3::Y)?;
        Some(Self {
            eye,
            rotation,
            tan_half_fov: (fov_degrees.to_radians() * 0.5).tan(),
            viewport,
            plane,
        })
    }

    /// Builds a projector from the scene's camera and drop plane settings.
    #[must_use]
    pub fn from_config(config: &PondConfig, viewport: Vec2) -> Option<Self> {
        Self::new(
            config.camera.eye,
            config.camera.look_at,
            config.camera.fov_degrees,
            viewport,
            config.food.drop_plane,
        )
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Pick ray through the pixel `screen` (origin top-left).
    #[must_use]
    pub fn ray(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
        );
        let aspect = self.viewport.x / self.viewport.y;
        let local = Vec3::new(
            ndc.x * self.tan_half_fov * aspect,
            ndc.y * self.tan_half_fov,
            -1.0,
        );
        Ray {
            origin: self.eye,
            direction: (self.rotation * local).normalize(),
        }
    }
}

impl PointerProjector for PerspectiveProjector {
    fn project(&self, screen: Vec2) -> Option<Vec3> {
        self.ray(screen).intersect(&self.plane)
    }
}
