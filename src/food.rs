//! Food pellet lifecycle: spawn, age and cull.
//!
//! Pellets are spawned in batches around a dropped point, sink and fade every
//! frame, and leave the scene when they expire, sink through the floor or are
//! eaten by the fish. Removal is decided after the frame's sink and decay
//! have been applied.
use glam::Vec3;
use rand::Rng;
use serde::Serialize;

use crate::config::FoodConfig;

/// A single food pellet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodParticle {
    /// World position.
    pub position: Vec3,
    /// Remaining life in `[0, 1]`; starts at `1.0`.
    pub life: f32,
}

/// Why a pellet left the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FoodFate {
    /// Life reached zero.
    Expired,
    /// Sank below the floor.
    Sunk,
    /// Came within the fish's eating radius.
    Eaten,
}

impl FoodParticle {
    /// Creates a fresh pellet with full life.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self {
            position,
            life: 1.0,
        }
    }

    /// Sinks the pellet and decays its life by `dt` seconds.
    pub fn age(&mut self, dt: f32, config: &FoodConfig) {
        self.position.y -= config.sink_rate * dt;
        self.life -= config.decay_rate * dt;
    }

    /// Returns the pellet's fate if it should be removed this frame.
    ///
    /// Expiry is checked first, then sinking, then being eaten.
    #[must_use]
    pub fn fate(&self, agent_position: Vec3, config: &FoodConfig) -> Option<FoodFate> {
        if self.life <= 0.0 {
            Some(FoodFate::Expired)
        } else if self.position.y < config.floor {
            Some(FoodFate::Sunk)
        } else if self.position.distance(agent_position) < config.eat_radius {
            Some(FoodFate::Eaten)
        } else {
            None
        }
    }

    /// Render opacity derived from the remaining life.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use pond::FoodParticle;
    /// let mut pellet = FoodParticle::new(Vec3::ZERO);
    /// assert_eq!(pellet.opacity(), 1.0);
    /// pellet.life = -0.2;
    /// assert_eq!(pellet.opacity(), 0.0);
    /// ```
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

/// Counts of pellets removed, by fate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FateTally {
    /// Pellets that expired.
    pub expired: u64,
    /// Pellets that sank out of the scene.
    pub sunk: u64,
    /// Pellets the fish ate.
    pub eaten: u64,
}

impl FateTally {
    /// Records one removal.
    pub const fn record(&mut self, fate: FoodFate) {
        match fate {
            FoodFate::Expired => self.expired += 1,
            FoodFate::Sunk => self.sunk += 1,
            FoodFate::Eaten => self.eaten += 1,
        }
    }

    /// Total removals.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.expired + self.sunk + self.eaten
    }

    /// Adds another tally into this one.
    pub const fn absorb(&mut self, other: Self) {
        self.expired += other.expired;
        self.sunk += other.sunk;
        self.eaten += other.eaten;
    }
}

/// Builds `config.batch_size` pellets around `point`, each axis jittered
/// uniformly within `[-jitter, jitter)`.
pub fn spawn_batch(point: Vec3, config: &FoodConfig, rng: &mut impl Rng) -> Vec<FoodParticle> {
    (0..config.batch_size)
        .map(|_| {
            let offset = Vec3::new(
                jitter(rng, config.jitter),
                jitter(rng, config.jitter),
                jitter(rng, config.jitter),
            );
            FoodParticle::new(point + offset)
        })
        .collect()
}

fn jitter(rng: &mut impl Rng, half_extent: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half_extent
}

/// Ages every pellet by `dt` and removes those whose fate is decided,
/// preserving the order of survivors.
pub fn update_food(
    food: &mut Vec<FoodParticle>,
    agent_position: Vec3,
    dt: f32,
    config: &FoodConfig,
) -> FateTally {
    let mut tally = FateTally::default();
    food.retain_mut(|pellet| {
        pellet.age(dt, config);
        match pellet.fate(agent_position, config) {
            Some(fate) => {
                tally.record(fate);
                false
            }
            None => true,
        }
    });
    tally
}
