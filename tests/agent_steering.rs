//! Steering behaviour of the fish as seen through the scene.
use glam::Vec3;
use approx::assert_relative_eq;
use pond::{nearest_food, FoodParticle, Pond, TargetChange};
use rstest::rstest;
use test_utils::{assert_vec3_near, seeded_config, seeded_pond, step_frames};

#[rstest]
#[case::single(&[Vec3::new(1.0, 2.0, 3.0)], Some(0))]
#[case::closest_wins(&[Vec3::new(8.0, 0.0, 0.0), Vec3::new(0.0, -2.0, 0.0)], Some(1))]
#[case::tie_keeps_first(&[Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -3.0)], Some(0))]
#[case::radius_is_exclusive(&[Vec3::new(15.0, 0.0, 0.0)], None)]
#[case::empty(&[], None)]
fn nearest_food_cases(#[case] positions: &[Vec3], #[case] expected: Option<usize>) {
    let food: Vec<FoodParticle> = positions.iter().copied().map(FoodParticle::new).collect();
    let found = nearest_food(Vec3::ZERO, &food, 15.0)
        .and_then(|hit| food.iter().position(|pellet| std::ptr::eq(pellet, hit)));
    assert_eq!(found, expected);
}

#[test]
fn fish_heads_for_dropped_food() {
    let mut pond = seeded_pond(1);
    pond.drop_food(Vec3::new(6.0, 0.0, 0.0));
    let start = pond.agent().position;

    let report = pond.step(1.0 / 60.0);

    assert_eq!(report.target_change, TargetChange::Food);
    assert!(pond.agent().position.x > start.x);
    assert!(pond.wander_clock().timer.abs() <= f32::EPSILON);
}

#[test]
fn fish_settles_on_reached_target() {
    let mut pond = seeded_pond(1);
    pond.agent_mut().target = Vec3::new(2.0, 0.0, 0.0);
    for _ in 0..240 {
        pond.step(1.0 / 60.0);
    }
    assert_vec3_near(pond.agent().position, Vec3::new(2.0, 0.0, 0.0), 0.6);
}

#[test]
fn fish_faces_where_it_swims() {
    let mut pond = seeded_pond(1);
    pond.agent_mut().target = Vec3::new(-8.0, 0.0, 0.0);
    for _ in 0..30 {
        pond.step(1.0 / 60.0);
    }
    let agent = pond.agent();
    let facing = agent.orientation * Vec3::NEG_Z;
    assert_vec3_near(facing, agent.velocity.normalize(), 1e-4);
}

fn speed_after_two_seconds(fps: u8) -> f32 {
    let mut pond = seeded_pond(1);
    pond.agent_mut().target = Vec3::new(14.0, 0.0, 0.0);
    step_frames(&mut pond, 2 * usize::from(fps), 1.0 / f32::from(fps));
    pond.agent().speed()
}

#[rstest]
#[case::thirty(30)]
#[case::twenty(20)]
#[case::ten(10)]
fn cruising_speed_ignores_frame_rate(#[case] fps: u8) {
    let reference = speed_after_two_seconds(60);
    assert_relative_eq!(speed_after_two_seconds(fps), reference, max_relative = 1e-3);
}

#[test]
fn long_frame_still_swims_toward_target() {
    let mut config = seeded_config(1);
    config.max_frame_delta = 100.0;
    config.wander.initial_frames = 1_000.0;
    let mut pond = Pond::new(config).expect("config should validate");
    pond.agent_mut().target = Vec3::new(10.0, 0.0, 0.0);

    pond.step(5.0);

    let agent = pond.agent();
    assert!(agent.position.x > 5.0, "fish only reached {:?}", agent.position);
    assert!(agent.velocity.x > 1.0, "fish stalled at {:?}", agent.velocity);
}
