//! On-screen text: the scene title, the usage hint and the feed counter.

use bevy::prelude::*;

use crate::plugin::PondState;

const TITLE: &str = "Pond View";
const HINT: &str = "Click to drop food";
const ORBIT_HINT: &str = "WASD or arrow keys to orbit the view";

/// Marker for the text node showing the feed counter.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedCounter;

/// Label shown by the feed counter.
///
/// ```
/// assert_eq!(pond::hud::feed_label(3), "Times fed: 3");
/// ```
#[must_use]
pub fn feed_label(count: u64) -> String {
    format!("Times fed: {count}")
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            Name::new("Hud"),
        ))
        .with_children(|hud| {
            hud.spawn((
                Text::new(TITLE),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            hud.spawn((
                Text::new(HINT),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            ));
            hud.spawn((
                Text::new(ORBIT_HINT),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            ));
            hud.spawn((
                Text::new(feed_label(0)),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                FeedCounter,
            ));
        });
}

/// Keeps the feed counter text in step with the scene.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn update_feed_counter(
    pond: Res<PondState>,
    mut counters: Query<&mut Text, With<FeedCounter>>,
) {
    let label = feed_label(pond.feed_count());
    for mut text in &mut counters {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}

/// Plugin adding the text overlay.
#[derive(Debug)]
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud);
        app.add_systems(
            Update,
            update_feed_counter.run_if(resource_exists::<PondState>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hud_lists_controls_and_counter() {
        let mut app = App::new();
        app.add_systems(Startup, spawn_hud);
        app.update();

        let world = app.world_mut();
        let lines: Vec<String> = world
            .query::<&Text>()
            .iter(world)
            .map(|text| text.0.clone())
            .collect();
        for expected in [TITLE, HINT, ORBIT_HINT, "Times fed: 0"] {
            assert!(
                lines.iter().any(|line| line == expected),
                "{expected} missing from {lines:?}"
            );
        }
        let counters = world
            .query_filtered::<&Text, With<FeedCounter>>()
            .iter(world)
            .count();
        assert_eq!(counters, 1);
    }
}
