//! Seeded scene fixtures.

use pond::{FrameReport, Pond, PondConfig};

/// Default configuration with a fixed seed.
///
/// # Examples
/// ```
/// use test_utils::seeded_config;
/// assert_eq!(seeded_config(4).seed, Some(4));
/// ```
pub fn seeded_config(seed: u64) -> PondConfig {
    PondConfig {
        seed: Some(seed),
        ..PondConfig::default()
    }
}

/// A scene built from [`seeded_config`].
///
/// # Panics
/// Panics if the default configuration fails validation.
pub fn seeded_pond(seed: u64) -> Pond {
    Pond::new(seeded_config(seed)).expect("default configuration should validate")
}

/// Steps `pond` `frames` times by `dt` and returns every report.
pub fn step_frames(pond: &mut Pond, frames: usize, dt: f32) -> Vec<FrameReport> {
    (0..frames).map(|_| pond.step(dt)).collect()
}
