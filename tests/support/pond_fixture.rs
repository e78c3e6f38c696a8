#![cfg(feature = "test-support")]
//! Shared fixture infrastructure for pond plugin behavioural tests.
//!
//! The rspec suites tick a headless Bevy `App` from rspec's closures, so the
//! fixture keeps the app behind a mutex, finalises its plugins on the first
//! tick and drives `Time` by a fixed step so the scene moves
//! deterministically.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use pond::{FrameReport, LastFrame, PondConfig, PondPlugin, PondState};
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};

/// Simulated frame length used by every tick.
pub const TICK: Duration = Duration::from_millis(16);

#[derive(Resource, Debug, Default)]
struct PluginsFinalized;

/// Headless app that rspec may move between threads.
#[derive(Debug)]
pub struct PondApp(App);

// SAFETY: `run_scenarios` disables rspec's parallelism and every access goes
// through the mutex held by `PondFixtureBase`.
unsafe impl Send for PondApp {}
unsafe impl Sync for PondApp {}

impl Deref for PondApp {
    type Target = App;

    fn deref(&self) -> &App {
        &self.0
    }
}

impl DerefMut for PondApp {
    fn deref_mut(&mut self) -> &mut App {
        &mut self.0
    }
}

/// Runs an rspec suite on the calling thread, reporting every failure.
pub fn run_scenarios<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let configuration = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("invalid rspec configuration: {e}"));
    let stdout_logger = Arc::new(Logger::new(std::io::stdout()));
    Runner::new(configuration, vec![stdout_logger]).run(suite);
}

/// A shared base fixture that owns a headless app running [`PondPlugin`].
#[derive(Debug, Clone)]
pub struct PondFixtureBase {
    app: Arc<Mutex<PondApp>>,
}

impl PondFixtureBase {
    /// Builds an app with `MinimalPlugins`, a manual clock and the pond plugin.
    #[must_use]
    pub fn new(config: PondConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
        app.add_plugins(PondPlugin::new(config));
        Self {
            app: Arc::new(Mutex::new(PondApp(app))),
        }
    }

    /// Locks the underlying `App`. A poisoned lock is recovered so one failed
    /// assertion does not hide the rest of the suite.
    pub fn app_guard(&self) -> MutexGuard<'_, PondApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances the application by a single tick.
    ///
    /// The first tick finalizes plugins and performs cleanup so schedules can
    /// run deterministically.
    pub fn tick(&self) {
        let mut app = self.app_guard();
        if app.world().get_resource::<PluginsFinalized>().is_none() {
            app.finish();
            app.cleanup();
            app.insert_resource(PluginsFinalized);
        }
        app.update();
    }

    /// Runs `read` against the scene resource.
    ///
    /// # Panics
    /// Panics if the plugin did not insert [`PondState`].
    pub fn with_pond<R>(&self, read: impl FnOnce(&PondState) -> R) -> R {
        let app = self.app_guard();
        let pond = app
            .world()
            .get_resource::<PondState>()
            .expect("PondPlugin should insert PondState");
        read(pond)
    }

    /// Report of the most recent step.
    ///
    /// # Panics
    /// Panics if the plugin did not insert [`LastFrame`].
    pub fn last_frame(&self) -> FrameReport {
        self.app_guard()
            .world()
            .get_resource::<LastFrame>()
            .expect("PondPlugin should insert LastFrame")
            .0
    }
}
