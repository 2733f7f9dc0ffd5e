//! Shot classification: turns raw physics contact reports into made-shot
//! counts and scoreboard text.
//!
//! ## Flow
//!
//! 1. The physics step emits `CollisionEvent::Started` for every sensor/ball
//!    overlap (sensors are contact-reporting only, so nothing is deflected).
//! 2. [`shot_classification_system`] pairs each event up as (sensor, ball)
//!    in either order, advances that ball's [`ShotPhase`], and bumps
//!    [`ShotStats`] when a ball lands in a terminal phase.
//! 3. [`scoreboard_sync_system`] pushes the made-shot count, as text, onto
//!    every [`ScoreBoard`] whenever the stats change.
//!
//! Any event involving a non-sensor or non-ball entity is ignored; so are
//! `Stopped` events. Re-contacts against a ball already in a terminal phase
//! are absorbed by the [`ShotPhase`] transition table, which is what makes
//! double-triggering a sensor harmless.

use crate::ball::{Ball, ShotPhase};
use crate::hoop::{ScoreBoard, SensorPlane};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Session-wide shot counters. Monotonically non-decreasing.
///
/// `invalid` is tracked for completeness but only `made` is surfaced on the
/// scoreboard and HUD.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct ShotStats {
    pub made: u32,
    pub invalid: u32,
}

/// Consume contact-begin reports and advance per-ball classification.
///
/// Runs in `PostUpdate`, after the physics step has written the frame's
/// collision messages.
pub fn shot_classification_system(
    mut collision_events: MessageReader<CollisionEvent>,
    q_sensors: Query<&SensorPlane>,
    mut q_balls: Query<&mut ShotPhase, With<Ball>>,
    mut stats: ResMut<ShotStats>,
) {
    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        // The physics engine makes no ordering promise for the pair.
        let (sensor_entity, ball_entity) = if q_sensors.contains(e1) && q_balls.contains(e2) {
            (e1, e2)
        } else if q_sensors.contains(e2) && q_balls.contains(e1) {
            (e2, e1)
        } else {
            continue;
        };

        let Ok(sensor) = q_sensors.get(sensor_entity) else {
            continue;
        };
        let Ok(mut phase) = q_balls.get_mut(ball_entity) else {
            continue;
        };

        let next = phase.after_contact(sensor.kind);
        if next == *phase {
            continue;
        }
        match next {
            ShotPhase::Scored => {
                stats.made += 1;
                info!("Shot made ({} total)", stats.made);
            }
            ShotPhase::Invalid => {
                stats.invalid += 1;
            }
            _ => {}
        }
        *phase = next;
    }
}

/// Push the made-shot count onto every scoreboard as text.
///
/// Only re-runs when [`ShotStats`] actually changed.
pub fn scoreboard_sync_system(stats: Res<ShotStats>, mut q_boards: Query<&mut ScoreBoard>) {
    if !stats.is_changed() {
        return;
    }
    for mut board in q_boards.iter_mut() {
        board.value = stats.made.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hoop::SensorKind;
    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

    fn scoring_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.insert_resource(ShotStats::default());
        app.add_systems(
            PostUpdate,
            (shot_classification_system, scoreboard_sync_system).chain(),
        );
        app
    }

    fn spawn_sensor(app: &mut App, kind: SensorKind) -> Entity {
        app.world_mut().spawn(SensorPlane { kind }).id()
    }

    fn spawn_ball(app: &mut App) -> Entity {
        app.world_mut().spawn((Ball, ShotPhase::default())).id()
    }

    fn contact(app: &mut App, a: Entity, b: Entity) {
        app.world_mut()
            .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::SENSOR));
        app.update();
    }

    fn phase(app: &App, ball: Entity) -> ShotPhase {
        *app.world().get::<ShotPhase>(ball).unwrap()
    }

    fn made(app: &App) -> u32 {
        app.world().resource::<ShotStats>().made
    }

    #[test]
    fn upper_then_lower_scores_exactly_once() {
        let mut app = scoring_test_app();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);
        let ball = spawn_ball(&mut app);

        contact(&mut app, upper, ball);
        assert_eq!(phase(&app, ball), ShotPhase::PassedUpper);
        assert_eq!(made(&app), 0);

        contact(&mut app, lower, ball);
        assert_eq!(phase(&app, ball), ShotPhase::Scored);
        assert_eq!(made(&app), 1);
    }

    #[test]
    fn pair_order_does_not_matter() {
        let mut app = scoring_test_app();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);
        let ball = spawn_ball(&mut app);

        // Ball listed first in both events.
        contact(&mut app, ball, upper);
        contact(&mut app, ball, lower);
        assert_eq!(phase(&app, ball), ShotPhase::Scored);
        assert_eq!(made(&app), 1);
    }

    #[test]
    fn lower_only_is_invalid_and_does_not_score() {
        let mut app = scoring_test_app();
        let _upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);
        let ball = spawn_ball(&mut app);

        contact(&mut app, lower, ball);
        assert_eq!(phase(&app, ball), ShotPhase::Invalid);
        assert_eq!(made(&app), 0);
        assert_eq!(app.world().resource::<ShotStats>().invalid, 1);
    }

    #[test]
    fn double_lower_never_double_counts() {
        let mut app = scoring_test_app();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);

        // A made shot re-touching the lower sensor stays at one point.
        let scored = spawn_ball(&mut app);
        contact(&mut app, upper, scored);
        contact(&mut app, lower, scored);
        contact(&mut app, lower, scored);
        assert_eq!(made(&app), 1);

        // An invalid ball bouncing on the lower sensor stays invalid.
        let invalid = spawn_ball(&mut app);
        contact(&mut app, lower, invalid);
        contact(&mut app, lower, invalid);
        assert_eq!(phase(&app, invalid), ShotPhase::Invalid);
        assert_eq!(made(&app), 1);
        assert_eq!(app.world().resource::<ShotStats>().invalid, 1);
    }

    #[test]
    fn balls_classify_independently() {
        let mut app = scoring_test_app();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);
        let first = spawn_ball(&mut app);
        let second = spawn_ball(&mut app);

        // First ball crosses the upper sensor; second ball then hits the
        // lower sensor. Only the second ball may be classified by that.
        contact(&mut app, upper, first);
        contact(&mut app, lower, second);

        assert_eq!(phase(&app, first), ShotPhase::PassedUpper);
        assert_eq!(phase(&app, second), ShotPhase::Invalid);
        assert_eq!(made(&app), 0);

        contact(&mut app, lower, first);
        assert_eq!(phase(&app, first), ShotPhase::Scored);
        assert_eq!(made(&app), 1);
    }

    #[test]
    fn unrelated_pairs_and_stopped_events_are_ignored() {
        let mut app = scoring_test_app();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);
        let ball = spawn_ball(&mut app);
        let bystander = app.world_mut().spawn_empty().id();

        contact(&mut app, bystander, ball);
        contact(&mut app, upper, bystander);
        contact(&mut app, upper, lower);
        app.world_mut().write_message(CollisionEvent::Stopped(
            lower,
            ball,
            CollisionEventFlags::SENSOR,
        ));
        app.update();

        assert_eq!(phase(&app, ball), ShotPhase::Unclassified);
        assert_eq!(made(&app), 0);
    }

    #[test]
    fn scoreboard_shows_made_count_as_text() {
        let mut app = scoring_test_app();
        let board = app
            .world_mut()
            .spawn(ScoreBoard {
                value: "0".to_string(),
            })
            .id();
        let upper = spawn_sensor(&mut app, SensorKind::Upper);
        let lower = spawn_sensor(&mut app, SensorKind::Lower);

        let ball = spawn_ball(&mut app);
        contact(&mut app, upper, ball);
        contact(&mut app, lower, ball);
        assert_eq!(app.world().get::<ScoreBoard>(board).unwrap().value, "1");

        // An invalid second ball leaves the display untouched.
        let second = spawn_ball(&mut app);
        contact(&mut app, lower, second);
        assert_eq!(app.world().get::<ScoreBoard>(board).unwrap().value, "1");
    }
}
