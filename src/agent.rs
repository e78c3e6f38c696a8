//! The fish and its steering behaviour.
//!
//! Each frame the fish picks a target (the nearest pellet in range, or a
//! wander point that is re-drawn when its timer runs out), accelerates toward
//! it and is then clamped into the scene box.
use glam::{Quat, Vec3};
use log::{debug, trace};
use rand::Rng;
use serde::Serialize;

use crate::config::{SteeringConfig, WanderConfig};
use crate::food::FoodParticle;
use crate::vector_math::{facing_rotation, normalize_or_zero};

/// Steering state of the fish.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// World position.
    pub position: Vec3,
    /// Current velocity in units per second.
    pub velocity: Vec3,
    /// Point the fish is accelerating toward.
    pub target: Vec3,
    /// Facing; local `-Z` points along the last significant velocity.
    pub orientation: Quat,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Wander timer, counted in frame-units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WanderClock {
    /// Frame-units since the target last changed.
    pub timer: f32,
    /// Frame-units the current wander leg lasts.
    pub duration: f32,
}

impl WanderClock {
    /// Starts a clock whose first leg lasts `duration` frame-units.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self {
            timer: 0.0,
            duration,
        }
    }

    /// Draws a fresh leg duration from `[min_frames, max_frames)` and resets
    /// the timer.
    pub fn restart(&mut self, config: &WanderConfig, rng: &mut impl Rng) {
        self.duration =
            config.min_frames + (config.max_frames - config.min_frames) * rng.gen::<f32>();
        self.timer = 0.0;
    }

    const fn expired(&self) -> bool {
        self.timer > self.duration
    }
}

/// How the steering target moved during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TargetChange {
    /// The target stayed where it was.
    #[default]
    Unchanged,
    /// The target was set to a pellet.
    Food,
    /// A new wander point was drawn.
    Wander,
}

/// Returns the pellet closest to `position` that lies strictly within
/// `radius`. Ties keep the pellet seen first.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use pond::{agent::nearest_food, FoodParticle};
/// let food = [
///     FoodParticle::new(Vec3::new(3.0, 0.0, 0.0)),
///     FoodParticle::new(Vec3::new(-3.0, 0.0, 0.0)),
///     FoodParticle::new(Vec3::new(20.0, 0.0, 0.0)),
/// ];
/// let nearest = nearest_food(Vec3::ZERO, &food, 15.0).unwrap();
/// assert_eq!(nearest.position.x, 3.0);
/// assert!(nearest_food(Vec3::ZERO, &food[2..], 15.0).is_none());
/// ```
#[must_use]
pub fn nearest_food(
    position: Vec3,
    food: &[FoodParticle],
    radius: f32,
) -> Option<&FoodParticle> {
    let mut best = None;
    let mut best_distance = radius;
    for pellet in food {
        let distance = position.distance(pellet.position);
        if distance < best_distance {
            best = Some(pellet);
            best_distance = distance;
        }
    }
    best
}

/// Inputs shared by every steering step.
#[derive(Clone, Copy, Debug)]
pub struct SteeringContext<'a> {
    /// Steering tuning.
    pub steering: &'a SteeringConfig,
    /// Wander tuning.
    pub wander: &'a WanderConfig,
    /// Frame-units per second of scene time.
    pub frame_units_per_second: f32,
}

impl Agent {
    /// Creates a resting fish at `position` targeting its own location.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            target: position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advances the fish by `dt` seconds.
    ///
    /// `elapsed` is the scene time at the end of this frame and drives the
    /// idle bob. The position is clamped into the configured box as the last
    /// step, so it never leaves the box.
    pub fn steer(
        &mut self,
        clock: &mut WanderClock,
        food: &[FoodParticle],
        ctx: SteeringContext<'_>,
        elapsed: f32,
        dt: f32,
        rng: &mut impl Rng,
    ) -> TargetChange {
        let frames = dt * ctx.frame_units_per_second;
        clock.timer += frames;

        let change = self.retarget(clock, food, ctx, rng);
        self.accelerate(ctx.steering, frames, dt);

        self.position.y += (elapsed * ctx.steering.bob_frequency).sin()
            * ctx.steering.bob_amplitude
            * dt;
        self.position = ctx.steering.bounds.clamp(self.position);
        trace!(
            "fish at {:?} moving {:?} toward {:?}",
            self.position,
            self.velocity,
            self.target
        );
        change
    }

    fn retarget(
        &mut self,
        clock: &mut WanderClock,
        food: &[FoodParticle],
        ctx: SteeringContext<'_>,
        rng: &mut impl Rng,
    ) -> TargetChange {
        if let Some(pellet) = nearest_food(self.position, food, ctx.steering.search_radius) {
            self.target = pellet.position;
            clock.timer = 0.0;
            return TargetChange::Food;
        }
        if clock.expired() {
            self.target = ctx.wander.volume.sample(rng);
            clock.restart(ctx.wander, rng);
            debug!(
                "new wander target {:?} for {:.0} frame-units",
                self.target, clock.duration
            );
            return TargetChange::Wander;
        }
        TargetChange::Unchanged
    }

    fn accelerate(&mut self, steering: &SteeringConfig, frames: f32, dt: f32) {
        let offset = self.target - self.position;
        if offset.length() <= steering.arrival_radius {
            return;
        }
        let direction = normalize_or_zero(offset);
        self.velocity = damped_velocity(self.velocity, direction, steering, frames)
            .clamp_length_max(steering.max_speed);
        self.position += self.velocity * dt;

        if self.velocity.length() > steering.facing_epsilon {
            if let Some(rotation) = facing_rotation(self.velocity, Vec3::Y) {
                self.orientation = rotation;
            }
        }
    }
}

/// Velocity after `frames` repetitions of "add `direction * gain`, then
/// multiply by `damping`", evaluated in closed form so fractional and large
/// frame counts agree with stepping one frame at a time.
fn damped_velocity(
    velocity: Vec3,
    direction: Vec3,
    steering: &SteeringConfig,
    frames: f32,
) -> Vec3 {
    let damping = steering.damping;
    let retained = damping.powf(frames);
    let push = if (1.0 - damping).abs() <= f32::EPSILON {
        steering.gain * frames
    } else {
        steering.gain * damping * (1.0 - retained) / (1.0 - damping)
    };
    velocity * retained + direction * push
}
