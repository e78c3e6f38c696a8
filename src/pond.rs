//! The simulation context.
//!
//! [`Pond`] owns everything the scene mutates: the fish, the pellets, the
//! wander clock, the scene clock, the seeded random source and the running
//! statistics. Hosts drive it with [`Pond::drop_food`] and [`Pond::step`] and
//! read it back through [`Pond::snapshot`].
use glam::{Quat, Vec3};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::agent::{Agent, SteeringContext, TargetChange, WanderClock};
use crate::config::{ConfigError, PondConfig};
use crate::food::{spawn_batch, update_food, FateTally, FoodParticle};

/// What happened during one call to [`Pond::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Delta actually applied after sanitising and capping, in seconds.
    pub dt: f32,
    /// Pellets removed this frame.
    pub removed: FateTally,
    /// How the fish's target moved.
    pub target_change: TargetChange,
}

/// Running totals over the life of a [`Pond`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PondStats {
    /// Frames that advanced the scene.
    pub frames: u64,
    /// Pellets spawned.
    pub pellets_dropped: u64,
    /// Pellets removed, by fate.
    pub removed: FateTally,
    /// Frames in which the fish picked a new wander point.
    pub wander_retargets: u64,
}

/// Position and facing of the fish for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgentPose {
    /// World position.
    pub position: Vec3,
    /// Facing rotation.
    pub orientation: Quat,
}

/// A pellet as the renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FoodSprite {
    /// World position.
    pub position: Vec3,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// The fish.
    pub agent: AgentPose,
    /// Live pellets in insertion order.
    pub food: Vec<FoodSprite>,
    /// Successful drops so far.
    pub feed_count: u64,
}

/// The fish-feeding scene.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use pond::{Pond, PondConfig};
/// let mut pond = Pond::new(PondConfig { seed: Some(1), ..PondConfig::default() }).unwrap();
/// assert_eq!(pond.drop_food(Vec3::new(3.0, 0.0, 0.0)), 5);
/// let report = pond.step(1.0 / 60.0);
/// assert_eq!(report.removed.total(), 0);
/// assert_eq!(pond.snapshot().food.len(), 5);
/// assert_eq!(pond.feed_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Pond {
    config: PondConfig,
    rng: ChaCha8Rng,
    agent: Agent,
    clock: WanderClock,
    food: Vec<FoodParticle>,
    elapsed: f32,
    feed_count: u64,
    stats: PondStats,
}

impl Pond {
    /// Builds a scene with a resting fish at the origin.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] raised by [`PondConfig::validate`].
    pub fn new(config: PondConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        info!("pond created (seed: {:?})", config.seed);
        Ok(Self {
            clock: WanderClock::new(config.wander.initial_frames),
            config,
            rng,
            agent: Agent::default(),
            food: Vec::new(),
            elapsed: 0.0,
            feed_count: 0,
            stats: PondStats::default(),
        })
    }

    /// Spawns a batch of pellets around `point` and returns how many were
    /// added. A non-finite point is ignored.
    pub fn drop_food(&mut self, point: Vec3) -> usize {
        if !point.is_finite() {
            warn!("ignoring food drop at non-finite point {point:?}");
            return 0;
        }
        let batch = spawn_batch(point, &self.config.food, &mut self.rng);
        let added = batch.len();
        self.food.extend(batch);
        self.feed_count += 1;
        self.stats.pellets_dropped += added as u64;
        debug!("dropped {added} pellets at {point:?}; {} live", self.food.len());
        added
    }

    /// Advances the scene by `dt` seconds: the fish steers first, then the
    /// pellets age and are culled against the fish's new position.
    ///
    /// Negative or non-finite deltas count as zero and deltas above
    /// `max_frame_delta` are capped. A zero delta changes nothing.
    pub fn step(&mut self, dt: f32) -> FrameReport {
        let dt = self.sanitise_dt(dt);
        if dt <= 0.0 {
            return FrameReport::default();
        }
        self.elapsed += dt;

        let ctx = SteeringContext {
            steering: &self.config.steering,
            wander: &self.config.wander,
            frame_units_per_second: self.config.frame_units_per_second,
        };
        let target_change = self.agent.steer(
            &mut self.clock,
            &self.food,
            ctx,
            self.elapsed,
            dt,
            &mut self.rng,
        );
        let removed = update_food(&mut self.food, self.agent.position, dt, &self.config.food);

        self.stats.frames += 1;
        self.stats.removed.absorb(removed);
        if target_change == TargetChange::Wander {
            self.stats.wander_retargets += 1;
        }
        if removed.total() > 0 {
            debug!(
                "removed pellets: {} eaten, {} sunk, {} expired; {} live",
                removed.eaten,
                removed.sunk,
                removed.expired,
                self.food.len()
            );
        }
        FrameReport {
            dt,
            removed,
            target_change,
        }
    }

    fn sanitise_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            warn!("treating invalid frame delta {dt} as zero");
            return 0.0;
        }
        dt.min(self.config.max_frame_delta)
    }

    /// Renderer-facing view of the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            agent: AgentPose {
                position: self.agent.position,
                orientation: self.agent.orientation,
            },
            food: self
                .food
                .iter()
                .map(|pellet| FoodSprite {
                    position: pellet.position,
                    opacity: pellet.opacity(),
                })
                .collect(),
            feed_count: self.feed_count,
        }
    }

    /// The fish.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Mutable access to the fish, for hosts that place it directly.
    pub const fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    /// The wander clock.
    #[must_use]
    pub const fn wander_clock(&self) -> &WanderClock {
        &self.clock
    }

    /// Live pellets in insertion order.
    #[must_use]
    pub fn food(&self) -> &[FoodParticle] {
        &self.food
    }

    /// Successful drops so far.
    #[must_use]
    pub const fn feed_count(&self) -> u64 {
        self.feed_count
    }

    /// Running statistics.
    #[must_use]
    pub const fn stats(&self) -> &PondStats {
        &self.stats
    }

    /// Scene time in seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &PondConfig {
        &self.config
    }
}
