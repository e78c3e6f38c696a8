//! Utility helpers for tests.
//!
//! Seeded scene fixtures, recording host doubles and vector assertions shared
//! by the integration tests.
pub mod hosts;
pub mod scene;

pub use hosts::{FixedProjector, RecordingRenderer};
pub use scene::{seeded_config, seeded_pond, step_frames};

use glam::Vec3;

/// Assert that two vectors agree component-wise within `epsilon`.
///
/// # Panics
/// Panics with both vectors in the message if any component differs by more
/// than `epsilon`.
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, epsilon: f32) {
    assert!(
        (actual - expected).abs().max_element() <= epsilon,
        "expected {expected:?}, got {actual:?} (epsilon {epsilon})"
    );
}
