//! Ball spawning, per-ball shot classification state, and lifetime cleanup.
//!
//! Each ball is its own entity, and its classification lives in a
//! [`ShotPhase`] component keyed by that entity. Classification is therefore
//! immune to two balls being in flight at once: the classifier advances each
//! ball's own component, never a shared tag.
//!
//! Balls are launched with a single impulse at spawn time (an instantaneous
//! velocity change, not a sustained force) and are never touched again by
//! game logic until a sensor reports them or their lifetime expires.

use crate::config::GameConfig;
use crate::hoop::SensorKind;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for launched balls.
#[derive(Component)]
pub struct Ball;

/// Seconds this ball has been alive.
#[derive(Component)]
pub struct BallAge(pub f32);

/// Classification of a ball's trajectory through the two sensor planes.
///
/// Strictly forward-only: `Unclassified → PassedUpper → Scored`, with a
/// divert to `Invalid` when the lower sensor fires first. `Scored` and
/// `Invalid` are terminal; later contacts never change them.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShotPhase {
    /// Fresh ball; has touched neither sensor.
    #[default]
    Unclassified,
    /// Crossed the upper sensor; a lower contact from here scores.
    PassedUpper,
    /// Made shot. Terminal.
    Scored,
    /// Reached the lower sensor without crossing the upper one first.
    /// Terminal.
    Invalid,
}

impl ShotPhase {
    /// The phase this ball moves to after touching `sensor`.
    ///
    /// Terminal phases absorb every further contact, so re-contacting a
    /// sensor after the shot is decided has no effect.
    pub fn after_contact(self, sensor: SensorKind) -> Self {
        match (self, sensor) {
            (Self::Unclassified, SensorKind::Upper) => Self::PassedUpper,
            (Self::Unclassified, SensorKind::Lower) => Self::Invalid,
            (Self::PassedUpper, SensorKind::Upper) => Self::PassedUpper,
            (Self::PassedUpper, SensorKind::Lower) => Self::Scored,
            (Self::Scored, _) => Self::Scored,
            (Self::Invalid, _) => Self::Invalid,
        }
    }

    /// Whether this phase can never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Scored | Self::Invalid)
    }
}

// ── Launch maths ──────────────────────────────────────────────────────────────

/// The launch impulse for a ball thrown from `pose`: the pose's forward
/// axis (local −Z in world space) scaled by `power`.
pub fn launch_impulse(pose: &Transform, power: f32) -> Vec3 {
    pose.forward() * power
}

// ── Spawn helper ──────────────────────────────────────────────────────────────

/// Spawn a ball at the camera pose captured with the tap and launch it.
///
/// The ball shares the camera's full transform (position and orientation) at
/// spawn time; the impulse is applied once via [`ExternalImpulse`]. A small
/// random torque makes the ball tumble in flight.
pub fn spawn_ball(commands: &mut Commands, config: &GameConfig, pose: Transform) -> Entity {
    let mut rng = rand::thread_rng();
    let jitter = config.ball_spin_jitter;
    let spin = Vec3::new(
        rng.gen_range(-jitter..=jitter),
        rng.gen_range(-jitter..=jitter),
        rng.gen_range(-jitter..=jitter),
    );

    commands
        .spawn((
            Ball,
            ShotPhase::default(),
            BallAge(0.0),
            Transform::from_translation(pose.translation).with_rotation(pose.rotation),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::ball(config.ball_radius),
            ColliderMassProperties::Mass(config.ball_mass),
            Restitution::coefficient(config.ball_restitution),
            // Fast ball vs. thin sensor planes: without CCD a hard throw can
            // step straight over the lower sensor.
            Ccd::enabled(),
            CollisionGroups::new(Group::GROUP_3, Group::ALL),
            ActiveEvents::COLLISION_EVENTS,
            ExternalImpulse {
                impulse: launch_impulse(&pose, config.launch_power),
                torque_impulse: spin,
            },
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Tick ball age and despawn balls that have out-lived their welcome or
/// fallen out of the play volume.
pub fn ball_lifetime_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut BallAge, &Transform), With<Ball>>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (entity, mut age, transform) in query.iter_mut() {
        age.0 += dt;
        if age.0 >= config.ball_lifetime_secs || transform.translation.y < config.cull_floor_y {
            commands.entity(entity).despawn();
        }
    }
}
