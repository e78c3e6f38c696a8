//! Presentation layer: camera, lighting, scene meshes and pointer input.
//!
//! `PresentationPlugin` only reads [`PondState`] to draw it and writes to it
//! through food drops. The simulation stays the sole source of truth for
//! where the fish and the pellets are.

use std::f32::consts::FRAC_PI_2;

use bevy::color::Alpha;
use bevy::ecs::system::SystemParam;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use log::{info, warn};

use crate::config::{CameraConfig, DropPlane};
use crate::host::{pointer_click, FrameRenderer, PointerProjector};
use crate::plugin::{PondState, PondSystems};
use crate::pond::FrameSnapshot;
use crate::projection::Ray;

const WATER_COLOUR: Color = Color::srgb(0.02, 0.18, 0.32);
const FOG_DENSITY: f32 = 0.02;
const FISH_COLOUR: Color = Color::srgb(1.0, 0.55, 0.1);
const FOOD_COLOUR: Color = Color::srgb(0.55, 0.35, 0.15);
const FOOD_RADIUS: f32 = 0.15;
const MIN_POLAR: f32 = 1e-3;
const MAX_POLAR: f32 = FRAC_PI_2 - 0.05;

/// Marker component for the scene camera.
///
/// The orbit system and the click projector query for this marker.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PondCamera;

/// Root entity of the fish model.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FishVisual;

/// A pooled pellet mesh; `slot` indexes the snapshot's food list.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodVisual {
    /// Index into [`FrameSnapshot::food`].
    pub slot: usize,
}

/// Runtime configuration for the orbiting camera.
///
/// # Examples
///
/// ```ignore
/// app.insert_resource(CameraSettings {
///     orbit_speed: 2.0,
///     max_delta_seconds: 0.1,
/// });
/// ```
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CameraSettings {
    /// Orbit speed in radians per second.
    pub orbit_speed: f32,

    /// Maximum delta time to use for orbit calculations.
    ///
    /// Clamps large frame hitches so the camera does not jump.
    pub max_delta_seconds: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_speed: 1.2,
            max_delta_seconds: 0.1,
        }
    }
}

/// Shared mesh for every pellet. Each pellet gets its own material so its
/// opacity can follow its life.
#[derive(Resource, Debug, Clone)]
pub struct FoodAssets {
    /// Pellet mesh.
    pub mesh: Handle<Mesh>,
}

/// Directional key states for orbiting the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the pressed state of exactly four directional keys."
)]
pub struct OrbitInput {
    /// Whether an "up" key (W or `ArrowUp`) is pressed.
    pub up: bool,
    /// Whether a "down" key (S or `ArrowDown`) is pressed.
    pub down: bool,
    /// Whether a "left" key (A or `ArrowLeft`) is pressed.
    pub left: bool,
    /// Whether a "right" key (D or `ArrowRight`) is pressed.
    pub right: bool,
}

/// Computes a normalized orbit direction from the given key states.
///
/// `x` turns the camera around the vertical axis and `y` tilts it. Opposing
/// keys cancel and diagonals are normalized.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec2;
/// use pond::presentation::{compute_orbit_direction, OrbitInput};
///
/// let input = OrbitInput { up: true, right: true, ..Default::default() };
/// let diag = compute_orbit_direction(input);
/// assert!((diag.length() - 1.0).abs() < 0.001);
/// ```
#[must_use]
pub fn compute_orbit_direction(input: OrbitInput) -> Vec2 {
    const fn axis(neg: bool, pos: bool) -> f32 {
        match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    Vec2::new(axis(input.left, input.right), axis(input.down, input.up)).normalize_or_zero()
}

/// Rotates the camera offset from its focus by `delta` radians.
///
/// `delta.x` changes the azimuth around `+Y`; `delta.y` tilts the camera
/// toward the horizon. The tilt stays between straight down and just above
/// the horizon, and the distance to the focus is preserved.
#[must_use]
pub fn orbit_offset(offset: Vec3, delta: Vec2) -> Vec3 {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return offset;
    }
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z) + delta.x;
    let polar = (polar + delta.y).clamp(MIN_POLAR, MAX_POLAR);
    radius
        * Vec3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        )
}

/// Orbits the camera around the scene focus with WASD or the arrow keys.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn camera_orbit_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    settings: Res<CameraSettings>,
    pond: Res<PondState>,
    mut camera_query: Query<&mut Transform, With<PondCamera>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let input = OrbitInput {
        up: keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp),
        down: keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown),
        left: keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight),
    };
    let direction = compute_orbit_direction(input);
    if direction == Vec2::ZERO {
        return;
    }

    let clamped_max = settings.max_delta_seconds.max(f32::EPSILON);
    let delta = time.delta_secs().min(clamped_max);
    let focus = pond.config().camera.look_at;
    let offset = orbit_offset(
        transform.translation - focus,
        direction * settings.orbit_speed * delta,
    );
    *transform = Transform::from_translation(focus + offset).looking_at(focus, Vec3::Y);
}

/// Projects the cursor through a Bevy camera onto the drop plane.
#[derive(Debug, Clone, Copy)]
pub struct CameraProjector<'a> {
    /// Camera used for the pick ray.
    pub camera: &'a Camera,
    /// The camera's world transform.
    pub transform: &'a GlobalTransform,
    /// Plane clicks land on.
    pub plane: DropPlane,
}

impl PointerProjector for CameraProjector<'_> {
    fn project(&self, screen: Vec2) -> Option<Vec3> {
        let ray = self.camera.viewport_to_world(self.transform, screen).ok()?;
        Ray {
            origin: ray.origin,
            direction: *ray.direction,
        }
        .intersect(&self.plane)
    }
}

/// Drops food where the left mouse button is clicked.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn drop_food_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<PondCamera>>,
    mut pond: ResMut<PondState>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, transform)) = cameras.single() else {
        return;
    };

    let projector = CameraProjector {
        camera,
        transform,
        plane: pond.config().food.drop_plane,
    };
    if let Some(added) = pointer_click(&mut pond.0, &projector, cursor) {
        info!("fed the fish {added} pellets (feed #{})", pond.feed_count());
    }
}

/// Writes snapshots into the scene's transforms and materials.
#[derive(SystemParam)]
pub struct SceneWriter<'w, 's> {
    commands: Commands<'w, 's>,
    assets: Res<'w, FoodAssets>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    fish: Query<'w, 's, &'static mut Transform, (With<FishVisual>, Without<FoodVisual>)>,
    food: Query<
        'w,
        's,
        (
            Entity,
            &'static FoodVisual,
            &'static mut Transform,
            &'static MeshMaterial3d<StandardMaterial>,
        ),
        Without<FishVisual>,
    >,
}

impl SceneWriter<'_, '_> {
    fn food_material(&mut self, opacity: f32) -> Handle<StandardMaterial> {
        self.materials.add(StandardMaterial {
            base_color: FOOD_COLOUR.with_alpha(opacity),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.9,
            ..default()
        })
    }
}

impl FrameRenderer for SceneWriter<'_, '_> {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        for mut transform in &mut self.fish {
            transform.translation = snapshot.agent.position;
            transform.rotation = snapshot.agent.orientation;
        }

        let mut pooled = 0;
        for (entity, visual, mut transform, material) in &mut self.food {
            let Some(sprite) = snapshot.food.get(visual.slot) else {
                self.commands.entity(entity).despawn();
                continue;
            };
            pooled += 1;
            transform.translation = sprite.position;
            if let Some(mut asset) = self.materials.get_mut(&material.0) {
                asset.base_color.set_alpha(sprite.opacity);
            }
        }

        for (slot, sprite) in snapshot.food.iter().enumerate().skip(pooled) {
            let material = self.food_material(sprite.opacity);
            self.commands.spawn((
                FoodVisual { slot },
                Mesh3d(self.assets.mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(sprite.position),
            ));
        }
    }
}

/// Draws the current scene.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn render_pond_system(pond: Res<PondState>, mut writer: SceneWriter) {
    writer.render(&pond.snapshot());
}

fn camera_transform(camera: &CameraConfig) -> Transform {
    Transform::from_translation(camera.eye).looking_at(camera.look_at, Vec3::Y)
}

/// Spawns the camera, lights, fish and shared pellet assets.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pond: Option<Res<PondState>>,
) {
    let Some(pond) = pond else {
        warn!("no pond state; presentation left empty");
        return;
    };
    let camera = &pond.config().camera;

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            ..default()
        }),
        camera_transform(camera),
        DistanceFog {
            color: WATER_COLOUR,
            falloff: FogFalloff::ExponentialSquared {
                density: FOG_DENSITY,
            },
            ..default()
        },
        PondCamera,
        Name::new("PondCamera"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 200_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(0.0, 8.0, 0.0),
    ));

    let fish_material = materials.add(StandardMaterial {
        base_color: FISH_COLOUR,
        perceptual_roughness: 0.5,
        ..default()
    });
    let body = meshes.add(Sphere::new(0.5));
    let tail = meshes.add(Cuboid::new(0.05, 0.5, 0.4));
    commands
        .spawn((
            FishVisual,
            Transform::default(),
            Visibility::default(),
            Name::new("Fish"),
        ))
        .with_children(|fish| {
            fish.spawn((
                Mesh3d(body),
                MeshMaterial3d(fish_material.clone()),
                Transform::from_scale(Vec3::new(0.5, 0.6, 1.2)),
            ));
            fish.spawn((
                Mesh3d(tail),
                MeshMaterial3d(fish_material),
                Transform::from_xyz(0.0, 0.0, 0.75),
            ));
        });

    commands.insert_resource(FoodAssets {
        mesh: meshes.add(Sphere::new(FOOD_RADIUS)),
    });
}

/// Plugin owning the camera, scene meshes and pointer input.
///
/// Requires [`crate::PondPlugin`]; without a [`PondState`] it spawns nothing
/// and its systems never run.
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PondCamera>();
        app.init_resource::<CameraSettings>();
        app.insert_resource(ClearColor(WATER_COLOUR));
        app.add_systems(Startup, setup_scene);
        app.add_systems(
            Update,
            (
                drop_food_on_click.before(PondSystems::Step),
                render_pond_system
                    .after(PondSystems::Step)
                    .run_if(resource_exists::<FoodAssets>),
                camera_orbit_system,
            )
                .run_if(resource_exists::<PondState>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn camera_settings_default_values_are_sensible() {
        let settings = CameraSettings::default();
        assert!(settings.orbit_speed > 0.0);
        assert!(settings.max_delta_seconds > 0.0);
        assert!(settings.max_delta_seconds <= 0.5);
    }

    #[rstest]
    #[case::no_keys(OrbitInput::default(), Vec2::ZERO)]
    #[case::up_only(OrbitInput { up: true, ..Default::default() }, Vec2::new(0.0, 1.0))]
    #[case::left_only(OrbitInput { left: true, ..Default::default() }, Vec2::new(-1.0, 0.0))]
    #[case::opposing(OrbitInput { left: true, right: true, ..Default::default() }, Vec2::ZERO)]
    fn orbit_direction_cases(#[case] input: OrbitInput, #[case] expected: Vec2) {
        let actual = compute_orbit_direction(input);
        assert!(
            (actual - expected).length() < 0.001,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[rstest]
    #[case::yaw(Vec2::new(0.7, 0.0))]
    #[case::tilt(Vec2::new(0.0, 0.4))]
    #[case::both(Vec2::new(-1.3, 0.2))]
    fn orbit_preserves_distance(#[case] delta: Vec2) {
        let offset = Vec3::new(3.0, 20.0, 4.0);
        let moved = orbit_offset(offset, delta);
        assert_relative_eq!(moved.length(), offset.length(), epsilon = 1e-3);
    }

    #[test]
    fn tilt_stops_above_horizon() {
        let moved = orbit_offset(Vec3::new(0.0, 30.0, 0.1), Vec2::new(0.0, 10.0));
        assert!(moved.y > 0.0, "camera dipped below the focus: {moved:?}");
    }
}
