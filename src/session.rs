//! Session control: the scouting/playing state machine and tap dispatch.
//!
//! The session moves through exactly two phases and never back:
//!
//! * `Scouting` — no hoop yet; taps try to place one via a hit-test.
//! * `Playing` — the hoop is up; every tap throws a ball.
//!
//! [`SessionPlugin`] wires the whole core together: plane tracking, tap
//! dispatch, ball lifetime, and shot classification. It has no rendering
//! systems and no input reading of its own, which is what lets the entire
//! session run headlessly in tests on hand-written messages.

use crate::ball;
use crate::config::GameConfig;
use crate::hoop::{self, HoopRig};
use crate::scoring::{self, ShotStats};
use crate::tracking::{self, TrackedPlane};
use bevy::prelude::*;

// ── State ─────────────────────────────────────────────────────────────────────

/// Session phase. The `Scouting → Playing` transition fires exactly once,
/// when the hoop is placed, and is never reversed.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    /// Watching planes come in; waiting for a placement tap.
    #[default]
    Scouting,
    /// Hoop is up; taps throw balls.
    Playing,
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// The input backend reports a screen tap, already lifted into world space.
///
/// `ray` is the pick ray through the tapped point; `camera_pose` is the
/// device pose at tap time. Taps with no resolvable ray or pose (no camera
/// frame yet) are simply never reported.
#[derive(Message, Debug, Clone, Copy)]
pub struct TapDetected {
    pub ray: Ray3d,
    pub camera_pose: Transform,
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Dispatch taps according to the session phase.
///
/// While `Scouting`, a tap hit-tests the tracked planes; a miss is a no-op,
/// a hit spawns the hoop there and requests the phase change. While
/// `Playing`, a tap throws a ball from the camera pose; the tapped screen
/// point is irrelevant. If the hoop rig failed validation there is nothing
/// to place, so placement taps fall through harmlessly.
pub fn tap_system(
    mut commands: Commands,
    mut taps: MessageReader<TapDetected>,
    phase: Res<State<SessionPhase>>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
    rig: Option<Res<HoopRig>>,
    config: Res<GameConfig>,
    q_planes: Query<(&GlobalTransform, &TrackedPlane)>,
) {
    // Only one hoop per session: extra taps on the placement frame are
    // dropped rather than racing the state transition.
    let mut placed = false;

    for tap in taps.read() {
        match phase.get() {
            SessionPhase::Playing => {
                ball::spawn_ball(&mut commands, &config, tap.camera_pose);
            }
            SessionPhase::Scouting => {
                if placed {
                    continue;
                }
                let Some(rig) = rig.as_deref() else {
                    continue;
                };
                let Some(pose) = tracking::hit_test(tap.ray, q_planes.iter()) else {
                    continue;
                };
                hoop::spawn_hoop(&mut commands, rig, &config, pose);
                next_phase.set(SessionPhase::Playing);
                placed = true;
            }
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// The backend-agnostic game core: session state, tap dispatch, surface
/// markers, ball lifetime, and shot classification.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SessionPhase>()
            .init_resource::<ShotStats>()
            .add_message::<tracking::PlaneDetected>()
            .add_message::<TapDetected>()
            // Registered by the physics plugin too; doing it here keeps the
            // core runnable headless (idempotent either way).
            .add_message::<bevy_rapier3d::prelude::CollisionEvent>()
            .add_systems(Startup, hoop::init_hoop_rig)
            .add_systems(
                Update,
                (
                    tracking::surface_marker_system.run_if(in_state(SessionPhase::Scouting)),
                    tap_system,
                    ball::ball_lifetime_system,
                ),
            )
            .add_systems(
                OnEnter(SessionPhase::Playing),
                tracking::clear_surface_markers,
            )
            .add_systems(
                // Collision messages are written by the physics step; read
                // them after it, alongside the other contact consumers.
                PostUpdate,
                (
                    scoring::shot_classification_system,
                    scoring::scoreboard_sync_system,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::{Ball, ShotPhase};
    use crate::hoop::{Hoop, HoopAssetSpec, ScoreBoard};
    use crate::tracking::SurfaceMarker;
    use bevy::state::app::StatesPlugin;
    use bevy_rapier3d::prelude::ExternalImpulse;

    fn session_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<SessionPhase>();
        app.add_message::<TapDetected>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(HoopRig::from_asset(&HoopAssetSpec::builtin()).unwrap());
        app.add_systems(Update, tap_system);
        app.add_systems(
            OnEnter(SessionPhase::Playing),
            crate::tracking::clear_surface_markers,
        );
        app
    }

    fn spawn_wall(app: &mut App) -> Entity {
        // Wall at z = 0 facing +Z, 4 × 3 units.
        app.world_mut()
            .spawn((
                GlobalTransform::from(Transform::IDENTITY),
                TrackedPlane {
                    extent: Vec2::new(4.0, 3.0),
                },
            ))
            .id()
    }

    fn tap(app: &mut App, ray: Ray3d, camera_pose: Transform) {
        app.world_mut().write_message(TapDetected { ray, camera_pose });
        app.update();
        // One extra frame so the requested state transition applies.
        app.update();
    }

    fn tap_at_wall(app: &mut App) {
        tap(
            app,
            Ray3d::new(Vec3::new(0.0, 0.0, 3.0), Dir3::NEG_Z),
            Transform::from_xyz(0.0, 0.0, 3.0),
        );
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<C>>()
            .iter(app.world())
            .count()
    }

    fn current_phase(app: &App) -> SessionPhase {
        *app.world().resource::<State<SessionPhase>>().get()
    }

    #[test]
    fn tap_with_no_planes_is_a_no_op() {
        let mut app = session_test_app();
        tap_at_wall(&mut app);

        assert_eq!(count::<Hoop>(&mut app), 0);
        assert_eq!(count::<Ball>(&mut app), 0);
        assert_eq!(current_phase(&app), SessionPhase::Scouting);
    }

    #[test]
    fn tap_missing_every_plane_is_a_no_op() {
        let mut app = session_test_app();
        spawn_wall(&mut app);
        // Aim away from the wall.
        tap(
            &mut app,
            Ray3d::new(Vec3::new(0.0, 0.0, 3.0), Dir3::Z),
            Transform::from_xyz(0.0, 0.0, 3.0),
        );

        assert_eq!(count::<Hoop>(&mut app), 0);
        assert_eq!(current_phase(&app), SessionPhase::Scouting);
    }

    #[test]
    fn placement_tap_spawns_hoop_and_enters_playing() {
        let mut app = session_test_app();
        spawn_wall(&mut app);
        tap_at_wall(&mut app);

        assert_eq!(count::<Hoop>(&mut app), 1);
        assert_eq!(count::<ScoreBoard>(&mut app), 1);
        assert_eq!(current_phase(&app), SessionPhase::Playing);
    }

    #[test]
    fn markers_vanish_when_hoop_is_placed() {
        let mut app = session_test_app();
        let wall = spawn_wall(&mut app);
        app.world_mut().spawn((
            SurfaceMarker { plane: wall },
            Transform::IDENTITY,
            Visibility::default(),
        ));

        tap_at_wall(&mut app);
        assert_eq!(count::<SurfaceMarker>(&mut app), 0);
    }

    #[test]
    fn second_tap_throws_a_ball_from_the_camera_pose() {
        let mut app = session_test_app();
        spawn_wall(&mut app);
        tap_at_wall(&mut app);

        let camera_pose =
            Transform::from_xyz(0.5, 1.6, 2.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        tap(
            &mut app,
            Ray3d::new(camera_pose.translation, camera_pose.forward()),
            camera_pose,
        );

        assert_eq!(count::<Hoop>(&mut app), 1, "still exactly one hoop");
        assert_eq!(count::<Ball>(&mut app), 1);

        let mut balls = app
            .world_mut()
            .query_filtered::<(&Transform, &ExternalImpulse, &ShotPhase), With<Ball>>();
        let (transform, impulse, phase) = balls.single(app.world()).unwrap();
        assert!((transform.translation - camera_pose.translation).length() < 1e-6);
        let expected = camera_pose.forward() * GameConfig::default().launch_power;
        assert!((impulse.impulse - expected).length() < 1e-4);
        assert_eq!(*phase, ShotPhase::Unclassified);
    }

    #[test]
    fn session_never_returns_to_scouting() {
        let mut app = session_test_app();
        spawn_wall(&mut app);
        tap_at_wall(&mut app);
        assert_eq!(current_phase(&app), SessionPhase::Playing);

        for _ in 0..5 {
            tap_at_wall(&mut app);
        }
        assert_eq!(current_phase(&app), SessionPhase::Playing);
        assert_eq!(count::<Hoop>(&mut app), 1);
        // Every extra tap threw a ball instead.
        assert_eq!(count::<Ball>(&mut app), 5);
    }

    #[test]
    fn placement_tap_without_a_validated_rig_is_dropped() {
        let mut app = session_test_app();
        app.world_mut().remove_resource::<HoopRig>();
        spawn_wall(&mut app);
        tap_at_wall(&mut app);

        assert_eq!(count::<Hoop>(&mut app), 0);
        assert_eq!(current_phase(&app), SessionPhase::Scouting);
    }
}
