//! Seams between the scene and whatever hosts it.
//!
//! A host supplies a [`PointerProjector`] to turn clicks into world points and
//! a [`FrameRenderer`] to draw snapshots. The Bevy front-end and the headless
//! runner each provide their own implementations.
use glam::{Vec2, Vec3};
use log::debug;

use crate::pond::{FrameReport, FrameSnapshot, Pond};

/// Maps screen coordinates onto the drop plane.
pub trait PointerProjector {
    /// Projects `screen` (pixels, origin top-left) onto the drop plane.
    ///
    /// Returns `None` when the pick ray misses the plane.
    fn project(&self, screen: Vec2) -> Option<Vec3>;
}

/// Draws scene snapshots.
pub trait FrameRenderer {
    /// Draws one frame.
    fn render(&mut self, snapshot: &FrameSnapshot);
}

/// Drops food where `screen` projects onto the drop plane.
///
/// Returns the number of pellets spawned, or `None` when the click missed the
/// plane and nothing was dropped.
pub fn pointer_click(
    pond: &mut Pond,
    projector: &impl PointerProjector,
    screen: Vec2,
) -> Option<usize> {
    let Some(point) = projector.project(screen) else {
        debug!("click at {screen:?} missed the drop plane");
        return None;
    };
    Some(pond.drop_food(point))
}

/// Steps the scene by `dt` seconds and renders the result.
pub fn run_frame(pond: &mut Pond, dt: f32, renderer: &mut impl FrameRenderer) -> FrameReport {
    let report = pond.step(dt);
    renderer.render(&pond.snapshot());
    report
}
