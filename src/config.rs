//! Scene configuration.
//!
//! [`PondConfig`] gathers every tuning value the simulation reads. Defaults
//! come from [`crate::constants`]; a TOML file may override any subset of
//! fields. Values are validated once, up front, so the per-frame code never
//! has to guard against nonsensical tuning.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ARRIVAL_RADIUS, BOB_AMPLITUDE, BOB_FREQUENCY, BOUNDS_MAX, BOUNDS_MIN, CAMERA_EYE,
    CAMERA_FOV_DEGREES, EAT_RADIUS, FACING_EPSILON, FOOD_BATCH_SIZE, FOOD_DECAY_RATE, FOOD_FLOOR,
    FOOD_JITTER, FOOD_SINK_RATE, FRAME_UNITS_PER_SECOND, INITIAL_WANDER_FRAMES, MAX_FRAME_DELTA,
    MAX_SPEED, MAX_WANDER_FRAMES, MIN_WANDER_FRAMES, SEARCH_RADIUS, STEERING_GAIN,
    VELOCITY_DAMPING, WANDER_MAX, WANDER_MIN,
};
use crate::vector_math::Bounds;

/// Errors raised while loading or validating a [`PondConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value that must be strictly positive was zero, negative or NaN.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A value that must not be negative was negative or NaN.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A value that must be a finite number was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Damping must retain some velocity and never amplify it.
    #[error("steering.damping must lie in (0, 1], got {0}")]
    DampingOutOfRange(f32),
    /// A box had a corner that was not strictly below the other.
    #[error("{field} must have min < max on every axis, got {min:?}..{max:?}")]
    MalformedBox {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Configured lower corner.
        min: Vec3,
        /// Configured upper corner.
        max: Vec3,
    },
    /// The wander duration range was empty.
    #[error("wander.min_frames ({min}) must be below wander.max_frames ({max})")]
    EmptyWanderRange {
        /// Configured lower bound.
        min: f32,
        /// Configured exclusive upper bound.
        max: f32,
    },
    /// A click must spawn at least one pellet.
    #[error("food.batch_size must be at least 1")]
    EmptyBatch,
    /// The drop plane normal had no direction.
    #[error("food.drop_plane.normal must be a finite, non-zero vector")]
    DegeneratePlane,
    /// The camera eye and look-at point give no viewing direction.
    #[error("camera.eye {eye:?} and camera.look_at {look_at:?} must be distinct finite points")]
    DegenerateCamera {
        /// Configured camera position.
        eye: Vec3,
        /// Configured look-at point.
        look_at: Vec3,
    },
    /// The camera field of view was outside `(0, 180)` degrees.
    #[error("camera.fov_degrees must lie in (0, 180), got {0}")]
    FieldOfView(f32),
}

/// Plane that pointer clicks are projected onto: all points `p` with
/// `normal · p == offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropPlane {
    /// Plane normal; need not be unit length.
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along `normal`.
    pub offset: f32,
}

impl Default for DropPlane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }
}

impl DropPlane {
    /// Unit normal of the plane, or `None` for a degenerate normal.
    #[must_use]
    pub fn unit_normal(&self) -> Option<Vec3> {
        if self.normal.is_finite() {
            self.normal.try_normalize()
        } else {
            None
        }
    }

    /// The point of the plane closest to the origin.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.unit_normal()
            .map_or(Vec3::ZERO, |normal| normal * self.offset / self.normal.length())
    }
}

/// Fish steering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SteeringConfig {
    /// Radius within which food is noticed.
    pub search_radius: f32,
    /// Velocity gained per frame-unit toward the target.
    pub gain: f32,
    /// Fraction of velocity retained per frame-unit.
    pub damping: f32,
    /// Maximum speed.
    pub max_speed: f32,
    /// Distance below which the fish stops accelerating.
    pub arrival_radius: f32,
    /// Minimum speed for turning to face the velocity.
    pub facing_epsilon: f32,
    /// Box the fish is clamped into.
    pub bounds: Bounds,
    /// Angular frequency of the idle bob.
    pub bob_frequency: f32,
    /// Vertical speed amplitude of the idle bob.
    pub bob_amplitude: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            search_radius: SEARCH_RADIUS,
            gain: STEERING_GAIN,
            damping: VELOCITY_DAMPING,
            max_speed: MAX_SPEED,
            arrival_radius: ARRIVAL_RADIUS,
            facing_epsilon: FACING_EPSILON,
            bounds: Bounds::from_arrays(BOUNDS_MIN, BOUNDS_MAX),
            bob_frequency: BOB_FREQUENCY,
            bob_amplitude: BOB_AMPLITUDE,
        }
    }
}

/// Wander behaviour used when no food is in range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WanderConfig {
    /// Duration of the first wander leg, in frame-units.
    pub initial_frames: f32,
    /// Shortest randomised duration, in frame-units.
    pub min_frames: f32,
    /// Exclusive upper bound on randomised durations, in frame-units.
    pub max_frames: f32,
    /// Volume wander points are drawn from.
    pub volume: Bounds,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            initial_frames: INITIAL_WANDER_FRAMES,
            min_frames: MIN_WANDER_FRAMES,
            max_frames: MAX_WANDER_FRAMES,
            volume: Bounds::from_arrays(WANDER_MIN, WANDER_MAX),
        }
    }
}

/// Food pellet lifecycle parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoodConfig {
    /// Pellets spawned per click.
    pub batch_size: usize,
    /// Half-extent of the per-axis spawn jitter.
    pub jitter: f32,
    /// Vertical sink speed.
    pub sink_rate: f32,
    /// Life lost per second.
    pub decay_rate: f32,
    /// Height below which pellets are removed.
    pub floor: f32,
    /// Distance at which the fish eats a pellet.
    pub eat_radius: f32,
    /// Plane clicks are projected onto.
    pub drop_plane: DropPlane,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            batch_size: FOOD_BATCH_SIZE,
            jitter: FOOD_JITTER,
            sink_rate: FOOD_SINK_RATE,
            decay_rate: FOOD_DECAY_RATE,
            floor: FOOD_FLOOR,
            eat_radius: EAT_RADIUS,
            drop_plane: DropPlane::default(),
        }
    }
}

/// Camera placement shared by the rendered front-end and the headless
/// projector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Camera position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::from_array(CAMERA_EYE),
            look_at: Vec3::ZERO,
            fov_degrees: CAMERA_FOV_DEGREES,
        }
    }
}

/// Complete scene configuration.
///
/// # Examples
///
/// ```
/// use pond::PondConfig;
/// let config = PondConfig::from_toml_str("seed = 9\n[food]\nbatch_size = 3\n").unwrap();
/// assert_eq!(config.seed, Some(9));
/// assert_eq!(config.food.batch_size, 3);
/// assert_eq!(config.steering, PondConfig::default().steering);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PondConfig {
    /// Seed for the scene's random source; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Frame-units per second of scene time.
    pub frame_units_per_second: f32,
    /// Largest frame delta applied in one step, in seconds.
    pub max_frame_delta: f32,
    /// Steering parameters.
    pub steering: SteeringConfig,
    /// Wander parameters.
    pub wander: WanderConfig,
    /// Food parameters.
    pub food: FoodConfig,
    /// Camera parameters.
    pub camera: CameraConfig,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_units_per_second: FRAME_UNITS_PER_SECOND,
            max_frame_delta: MAX_FRAME_DELTA,
            steering: SteeringConfig::default(),
            wander: WanderConfig::default(),
            food: FoodConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn require_box(field: &'static str, bounds: &Bounds) -> Result<(), ConfigError> {
    if bounds.is_well_formed() {
        Ok(())
    } else {
        Err(ConfigError::MalformedBox {
            field,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

impl PondConfig {
    /// Parses and validates a TOML document. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields, and
    /// any validation error from [`PondConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`PondConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the configuration a binary runs with: the file at `path` when
    /// one is given, otherwise the defaults, with `seed` overriding the
    /// configured seed when present.
    ///
    /// # Errors
    /// Returns the errors of [`PondConfig::load`].
    pub fn resolve(path: Option<&Path>, seed: Option<u64>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if seed.is_some() {
            config.seed = seed;
        }
        Ok(config)
    }

    /// Checks every tuning value.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("frame_units_per_second", self.frame_units_per_second)?;
        require_positive("max_frame_delta", self.max_frame_delta)?;
        self.validate_steering()?;
        self.validate_wander()?;
        self.validate_food()?;
        self.validate_camera()
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        let CameraConfig {
            eye,
            look_at,
            fov_degrees,
        } = self.camera;
        if (look_at - eye).try_normalize().is_none() {
            return Err(ConfigError::DegenerateCamera { eye, look_at });
        }
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(fov_degrees));
        }
        Ok(())
    }

    fn validate_steering(&self) -> Result<(), ConfigError> {
        let steering = &self.steering;
        require_positive("steering.search_radius", steering.search_radius)?;
        require_positive("steering.gain", steering.gain)?;
        require_positive("steering.max_speed", steering.max_speed)?;
        require_non_negative("steering.arrival_radius", steering.arrival_radius)?;
        require_non_negative("steering.facing_epsilon", steering.facing_epsilon)?;
        require_non_negative("steering.bob_frequency", steering.bob_frequency)?;
        require_non_negative("steering.bob_amplitude", steering.bob_amplitude)?;
        if !(steering.damping > 0.0 && steering.damping <= 1.0) {
            return Err(ConfigError::DampingOutOfRange(steering.damping));
        }
        require_box("steering.bounds", &steering.bounds)
    }

    fn validate_wander(&self) -> Result<(), ConfigError> {
        let wander = &self.wander;
        require_non_negative("wander.initial_frames", wander.initial_frames)?;
        require_non_negative("wander.min_frames", wander.min_frames)?;
        if !(wander.min_frames < wander.max_frames) || !wander.max_frames.is_finite() {
            return Err(ConfigError::EmptyWanderRange {
                min: wander.min_frames,
                max: wander.max_frames,
            });
        }
        require_box("wander.volume", &wander.volume)
    }

    fn validate_food(&self) -> Result<(), ConfigError> {
        let food = &self.food;
        if food.batch_size == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        require_non_negative("food.jitter", food.jitter)?;
        require_non_negative("food.sink_rate", food.sink_rate)?;
        require_non_negative("food.decay_rate", food.decay_rate)?;
        require_non_negative("food.eat_radius", food.eat_radius)?;
        require_finite("food.floor", food.floor)?;
        require_finite("food.drop_plane.offset", food.drop_plane.offset)?;
        if food.drop_plane.unit_normal().is_none() {
            return Err(ConfigError::DegeneratePlane);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        PondConfig::default()
            .validate()
            .expect("default config should validate");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = PondConfig::from_toml_str("").expect("empty TOML is valid");
        assert_eq!(config, PondConfig::default());
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let config = PondConfig::from_toml_str(
            "[steering]\nmax_speed = 5.0\n\n[wander]\nvolume = { min = [-1.0, -1.0, -1.0], max = [1.0, 1.0, 1.0] }\n",
        )
        .expect("overrides should parse");
        assert!((config.steering.max_speed - 5.0).abs() < f32::EPSILON);
        assert!((config.steering.gain - STEERING_GAIN).abs() < f32::EPSILON);
        assert_eq!(config.wander.volume.max, Vec3::ONE);
        assert!((config.wander.min_frames - MIN_WANDER_FRAMES).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = PondConfig::from_toml_str("[food]\nbatch = 3\n").expect_err("typo should fail");
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[rstest]
    #[case::zero_radius("[steering]\nsearch_radius = 0.0\n")]
    #[case::negative_speed("[steering]\nmax_speed = -1.0\n")]
    #[case::amplifying_damping("[steering]\ndamping = 1.5\n")]
    #[case::inverted_bounds("[steering]\nbounds = { min = [1.0, 1.0, 1.0], max = [0.0, 0.0, 0.0] }\n")]
    #[case::empty_wander("[wander]\nmin_frames = 500.0\nmax_frames = 200.0\n")]
    #[case::zero_batch("[food]\nbatch_size = 0\n")]
    #[case::flat_normal("[food.drop_plane]\nnormal = [0.0, 0.0, 0.0]\n")]
    #[case::negative_decay("[food]\ndecay_rate = -0.1\n")]
    #[case::wide_fov("[camera]\nfov_degrees = 180.0\n")]
    #[case::zero_frame_cap("max_frame_delta = 0.0\n")]
    fn invalid_values_are_rejected(#[case] text: &str) {
        assert!(PondConfig::from_toml_str(text).is_err(), "{text} should fail");
    }

    #[rstest]
    #[case::nan_floor("[food]\nfloor = nan\n", "food.floor")]
    #[case::infinite_floor("[food]\nfloor = -inf\n", "food.floor")]
    #[case::infinite_offset("[food.drop_plane]\noffset = inf\n", "food.drop_plane.offset")]
    fn non_finite_food_heights_name_their_field(#[case] text: &str, #[case] expected: &str) {
        let err = PondConfig::from_toml_str(text).expect_err("non-finite height should fail");
        assert!(
            matches!(err, ConfigError::NonFinite { field, .. } if field == expected),
            "got {err:?}"
        );
    }

    #[rstest]
    #[case::coincident("[camera]\neye = [1.0, 2.0, 3.0]\nlook_at = [1.0, 2.0, 3.0]\n")]
    #[case::nan_eye("[camera]\neye = [nan, 30.0, 0.0]\n")]
    fn camera_without_a_view_direction_is_rejected(#[case] text: &str) {
        let err = PondConfig::from_toml_str(text).expect_err("camera has no direction");
        assert!(matches!(err, ConfigError::DegenerateCamera { .. }), "got {err:?}");
    }

    #[test]
    fn plane_origin_accounts_for_unnormalised_normal() {
        let plane = DropPlane {
            normal: Vec3::new(0.0, 2.0, 0.0),
            offset: 4.0,
        };
        // 2y = 4 -> y = 2
        assert_eq!(plane.origin(), Vec3::new(0.0, 2.0, 0.0));
    }
}
