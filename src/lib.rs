#![cfg_attr(docsrs, feature(doc_cfg))]
//! An interactive fish-feeding pond.
//!
//! A single fish steers toward food pellets dropped by clicking, or wanders
//! between random points when nothing is in reach. [`Pond`] holds the whole
//! simulation and knows nothing about rendering; hosts plug in through the
//! [`PointerProjector`] and [`FrameRenderer`] traits. [`PondPlugin`] runs the
//! scene inside a Bevy app, and the `render` and `text` features add a 3D
//! front-end and a text overlay.
pub mod agent;
pub mod config;
pub mod constants;
pub mod food;
pub mod host;
#[cfg(feature = "text")]
#[cfg_attr(docsrs, doc(cfg(feature = "text")))]
pub mod hud;
pub mod logging;
pub mod plugin;
pub mod pond;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod projection;
pub mod vector_math;

pub use agent::{nearest_food, Agent, TargetChange, WanderClock};
pub use config::{ConfigError, DropPlane, PondConfig};
pub use food::{FateTally, FoodFate, FoodParticle};
pub use host::{pointer_click, run_frame, FrameRenderer, PointerProjector};
#[cfg(feature = "text")]
#[cfg_attr(docsrs, doc(cfg(feature = "text")))]
pub use hud::HudPlugin;
pub use logging::init as init_logging;
pub use plugin::{DropFood, LastFrame, PondError, PondPlugin, PondState, PondSystems};
pub use pond::{AgentPose, FoodSprite, FrameReport, FrameSnapshot, Pond, PondStats};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use projection::PerspectiveProjector;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use pond::prelude::*;
    //! ```

    pub use crate::{
        pointer_click, run_frame, DropFood, FoodParticle, FrameRenderer, FrameSnapshot,
        PerspectiveProjector, PointerProjector, Pond, PondConfig, PondPlugin,
    };
}
