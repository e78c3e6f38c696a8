//! Scene tuning constants used as configuration defaults.
//!
//! Distances are in world units and rates are per second unless a name says
//! otherwise. "Frame-units" are 1/60 s ticks of scene time; the steering gain,
//! damping and wander durations are expressed in them.

/// Frame-units per second of scene time.
pub const FRAME_UNITS_PER_SECOND: f32 = 60.0;
/// Longest frame delta fed to the simulation, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Radius within which the fish notices food.
pub const SEARCH_RADIUS: f32 = 15.0;
/// Velocity gained per frame-unit along the direction to the target.
pub const STEERING_GAIN: f32 = 0.15;
/// Velocity retained per frame-unit.
pub const VELOCITY_DAMPING: f32 = 0.92;
/// Upper bound on the fish's speed.
pub const MAX_SPEED: f32 = 3.0;
/// Distance at which the fish stops accelerating toward its target.
pub const ARRIVAL_RADIUS: f32 = 0.5;
/// Minimum speed at which the fish turns to face its velocity.
pub const FACING_EPSILON: f32 = 0.01;

/// Wander duration before the first re-target.
pub const INITIAL_WANDER_FRAMES: f32 = 300.0;
/// Shortest randomised wander duration.
pub const MIN_WANDER_FRAMES: f32 = 200.0;
/// Exclusive upper bound on randomised wander durations.
pub const MAX_WANDER_FRAMES: f32 = 500.0;
/// Lower corner of the volume wander points are drawn from.
pub const WANDER_MIN: [f32; 3] = [-10.0, -5.0, -5.0];
/// Upper corner of the volume wander points are drawn from.
pub const WANDER_MAX: [f32; 3] = [10.0, 5.0, 5.0];

/// Lower corner of the box the fish is clamped into.
pub const BOUNDS_MIN: [f32; 3] = [-15.0, -10.0, -10.0];
/// Upper corner of the box the fish is clamped into.
pub const BOUNDS_MAX: [f32; 3] = [15.0, 10.0, 10.0];

/// Angular frequency of the idle bob, in radians per second.
pub const BOB_FREQUENCY: f32 = 2.0;
/// Vertical bob speed amplitude.
pub const BOB_AMPLITUDE: f32 = 0.005;

/// Pellets spawned per click.
pub const FOOD_BATCH_SIZE: usize = 5;
/// Half-extent of the per-axis spawn jitter.
pub const FOOD_JITTER: f32 = 1.0;
/// Vertical sink speed of a pellet.
pub const FOOD_SINK_RATE: f32 = 0.05;
/// Life lost per second.
pub const FOOD_DECAY_RATE: f32 = 0.005;
/// Pellets below this height have sunk out of the scene.
pub const FOOD_FLOOR: f32 = -10.0;
/// Distance at which the fish eats a pellet.
pub const EAT_RADIUS: f32 = 1.0;

/// Default camera position.
pub const CAMERA_EYE: [f32; 3] = [0.0, 30.0, 0.1];
/// Default camera vertical field of view, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 50.0;
