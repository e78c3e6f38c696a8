//! Host doubles for the projector and renderer seams.

use glam::{Vec2, Vec3};
use pond::{FrameRenderer, FrameSnapshot, PointerProjector};

/// Renderer that keeps every snapshot it is handed.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Snapshots in render order.
    pub frames: Vec<FrameSnapshot>,
}

impl RecordingRenderer {
    /// The most recent snapshot, if any frame was rendered.
    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }
}

impl FrameRenderer for RecordingRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        self.frames.push(snapshot.clone());
    }
}

/// Projector that ignores the screen position and returns a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedProjector(pub Option<Vec3>);

impl PointerProjector for FixedProjector {
    fn project(&self, _screen: Vec2) -> Option<Vec3> {
        self.0
    }
}
