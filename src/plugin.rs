//! Bevy plugin that owns the scene and steps it every frame.
//!
//! [`PondPlugin`] needs nothing beyond Bevy's time plugin, so it runs under
//! `MinimalPlugins` in tests and the headless binary. Rendering and input live
//! in the optional presentation layer.

use std::ops::{Deref, DerefMut};

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, error};
use thiserror::Error;

use crate::config::PondConfig;
use crate::pond::{FrameReport, Pond};

/// Context carried by [`PondError`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PondErrorContext {
    /// Failure surfaced while building the plugin.
    Init,
}

/// Event raised when the scene cannot be set up.
///
/// An observer logs these through the `log` facade.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct PondError {
    /// Where the failure occurred.
    pub context: PondErrorContext,
    /// Description of the underlying error.
    pub detail: String,
}

impl PondError {
    /// Convenience constructor used by the plugin to emit error events.
    #[must_use]
    pub fn new(context: PondErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

/// Requests a food drop at a world-space point.
///
/// ```ignore
/// commands.trigger(DropFood { point: Vec3::new(2.0, 0.0, -1.0) });
/// ```
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DropFood {
    /// Centre of the batch.
    pub point: Vec3,
}

/// The scene, stored as a Bevy resource.
#[derive(Resource, Debug)]
pub struct PondState(pub Pond);

impl Deref for PondState {
    type Target = Pond;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PondState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Report of the most recent step, for systems that react to removals.
///
/// [`log_removals_system`] reads it after [`PondSystems::Step`].
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LastFrame(pub FrameReport);

/// Ordering labels for the scene's systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PondSystems {
    /// Advances the simulation.
    Step,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_pond_error(event: On<PondError>) {
    let PondError { context, detail } = event.event();
    error!("pond error during {context:?}: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn apply_drop_food(event: On<DropFood>, mut pond: ResMut<PondState>) {
    pond.drop_food(event.event().point);
}

/// Steps the scene by the frame's delta time.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn step_pond_system(
    time: Res<Time>,
    mut pond: ResMut<PondState>,
    mut last: ResMut<LastFrame>,
) {
    last.0 = pond.step(time.delta_secs());
}

/// Logs the pellets removed by the latest step, by fate.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn log_removals_system(last: Res<LastFrame>) {
    let removed = last.0.removed;
    if removed.eaten > 0 {
        debug!("fish ate {} pellet(s)", removed.eaten);
    }
    if removed.expired + removed.sunk > 0 {
        debug!(
            "{} pellet(s) expired, {} sank below the floor",
            removed.expired, removed.sunk
        );
    }
}

/// Plugin inserting [`PondState`] and stepping it in `Update`.
///
/// A configuration that fails validation is reported as a [`PondError`] and
/// the plugin installs nothing else.
#[derive(Debug, Default, Clone)]
pub struct PondPlugin {
    /// Scene configuration.
    pub config: PondConfig,
}

impl PondPlugin {
    /// Creates the plugin for `config`.
    #[must_use]
    pub const fn new(config: PondConfig) -> Self {
        Self { config }
    }
}

impl Plugin for PondPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_pond_error);

        let pond = match Pond::new(self.config.clone()) {
            Ok(pond) => pond,
            Err(e) => {
                app.world_mut()
                    .trigger(PondError::new(PondErrorContext::Init, e.to_string()));
                return;
            }
        };

        app.insert_resource(PondState(pond));
        app.init_resource::<LastFrame>();
        app.add_observer(apply_drop_food);
        app.add_systems(
            Update,
            (
                step_pond_system.in_set(PondSystems::Step),
                log_removals_system.after(PondSystems::Step),
            ),
        );
    }
}
