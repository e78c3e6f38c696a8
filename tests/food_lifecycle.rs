//! Pellet lifecycle through the public scene API.
use glam::Vec3;
use pond::config::FoodConfig;
use pond::{FoodFate, Pond, PondConfig};
use rstest::{fixture, rstest};
use test_utils::{assert_vec3_near, seeded_config, seeded_pond};

/// Far outside the fish's search radius, so it never chases the pellet.
const REMOTE: Vec3 = Vec3::new(14.0, 0.0, 9.0);

fn single_pellet_pond(food: FoodConfig) -> Pond {
    Pond::new(PondConfig {
        food: FoodConfig {
            batch_size: 1,
            jitter: 0.0,
            ..food
        },
        ..seeded_config(17)
    })
    .expect("config is valid")
}

#[fixture]
fn food() -> FoodConfig {
    FoodConfig::default()
}

#[rstest]
fn batch_lands_within_jitter(#[values(0, 1, 2, 3, 4, 5)] seed: u64) {
    let mut pond = seeded_pond(seed);
    let point = Vec3::new(-3.0, 2.0, 1.5);
    assert_eq!(pond.drop_food(point), 5);
    let jitter = pond.config().food.jitter;
    for pellet in pond.food() {
        assert_vec3_near(pellet.position, point, jitter);
        assert!((pellet.life - 1.0).abs() <= f32::EPSILON);
    }
}

#[rstest]
fn life_never_increases(#[values(0, 7)] seed: u64) {
    let mut pond = seeded_pond(seed);
    pond.drop_food(REMOTE);
    let mut previous = 1.0_f32;
    for _ in 0..500 {
        pond.step(0.1);
        let Some(highest) = pond.food().iter().map(|pellet| pellet.life).reduce(f32::max) else {
            break;
        };
        assert!(highest <= previous, "life rose from {previous} to {highest}");
        previous = highest;
    }
}

#[rstest]
fn sinking_pellet_leaves_on_first_frame_below_floor(food: FoodConfig) {
    let mut pond = single_pellet_pond(FoodConfig {
        sink_rate: 1.0,
        ..food
    });
    pond.drop_food(Vec3::new(REMOTE.x, -9.75, REMOTE.z));

    for frame in 1..=2 {
        let report = pond.step(0.1);
        assert_eq!(report.removed.total(), 0, "removed early on frame {frame}");
        assert_eq!(pond.food().len(), 1);
    }
    let report = pond.step(0.1);
    assert_eq!(report.removed.sunk, 1);
    assert!(pond.food().is_empty());
}

#[rstest]
fn spent_pellet_expires_on_first_frame_without_life(food: FoodConfig) {
    let mut pond = single_pellet_pond(FoodConfig {
        decay_rate: 4.0,
        ..food
    });
    pond.drop_food(REMOTE);

    assert_eq!(pond.step(0.1).removed.total(), 0);
    assert_eq!(pond.step(0.1).removed.total(), 0);
    let report = pond.step(0.1);
    assert_eq!(report.removed.expired, 1);
    assert_eq!(report.removed.total(), 1);
}

#[rstest]
fn pellet_is_eaten_on_first_frame_within_reach(food: FoodConfig) {
    let mut pond = single_pellet_pond(food);
    pond.drop_food(Vec3::new(4.0, 1.0, -2.0));
    let eat_radius = pond.config().food.eat_radius;
    let sink = pond.config().food.sink_rate;
    let dt = 1.0 / 60.0;

    for frame in 0..1_200 {
        let Some(pellet) = pond.food().first().copied() else {
            panic!("pellet vanished before frame {frame}");
        };
        let report = pond.step(dt);
        let sunk_to = pellet.position - Vec3::Y * sink * dt;
        let distance = pond.agent().position.distance(sunk_to);
        if report.removed.eaten == 1 {
            assert!(distance < eat_radius + 1e-4, "eaten from {distance} away");
            return;
        }
        assert!(
            distance >= eat_radius - 1e-4,
            "frame {frame}: within reach ({distance}) but not eaten"
        );
    }
    panic!("the fish never reached the pellet");
}

#[test]
fn expiry_is_reported_before_other_fates() {
    let config = FoodConfig::default();
    let pellet = pond::FoodParticle {
        position: Vec3::new(0.0, -20.0, 0.0),
        life: 0.0,
    };
    assert_eq!(pellet.fate(pellet.position, &config), Some(FoodFate::Expired));
}

#[test]
fn opacity_follows_life() {
    let mut pond = seeded_pond(4);
    pond.drop_food(REMOTE);
    pond.step(0.1);
    let snapshot = pond.snapshot();
    for (sprite, pellet) in snapshot.food.iter().zip(pond.food()) {
        assert!((sprite.opacity - pellet.life.clamp(0.0, 1.0)).abs() <= f32::EPSILON);
        assert!(sprite.opacity < 1.0);
    }
}
