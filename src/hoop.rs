//! Hoop rig: asset validation and procedural construction of the hoop
//! assembly (backboard, rim, net, sensor planes, scoreboard).
//!
//! ## Placement frame
//!
//! A hit-test against a tracked vertical plane yields a pose whose local +Z
//! is the plane's outward normal and whose local +Y runs up along the plane.
//! The rig itself is authored in a frame reached by rotating that pose −90°
//! about local X (the asset authoring convention): after placement,
//! hoop-local +Z points at the world ceiling, hoop-local −Y points out of
//! the wall into the room, and hoop-local X runs along the wall.
//!
//! The two sensor planes hang off the rim centre at fixed offsets along
//! hoop-local +Z (world up). They are [`Sensor`] colliders: they report
//! contact with balls but never deflect them.
//!
//! ## Collision layers
//!
//! | Body        | Memberships | Filter      |
//! |-------------|-------------|-------------|
//! | Hoop parts  | `0b1111`    | everything  |
//! | Sensors     | `GROUP_4`   | `GROUP_3`   |
//! | Balls       | `GROUP_3`   | everything  |
//!
//! Sensors occupy their own layer and test only against the ball layer, so
//! a sensor never reports the hoop structure or the room geometry.

use crate::config::GameConfig;
use crate::constants::*;
use crate::error::{GameError, GameResult};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::f32::consts::FRAC_PI_2;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for the hoop root entity. At most one exists per session.
#[derive(Component)]
pub struct Hoop;

/// Marker for the backboard child.
#[derive(Component)]
pub struct Backboard;

/// Marker for the rim ring child (carries the compound ring collider).
#[derive(Component)]
pub struct RimRing;

/// Purely visual net hanging from the rim. Shape parameters are carried on
/// the component so the render side can build the mesh without reaching back
/// into the rig.
#[derive(Component, Clone, Copy, Debug)]
pub struct Net {
    pub top_radius: f32,
    pub bottom_radius: f32,
    pub depth: f32,
}

/// Which of the two invisible sensor planes this entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorKind {
    /// Hovers just above the rim; first checkpoint of a made shot.
    Upper,
    /// Sits at the bottom of the net; second checkpoint.
    Lower,
}

/// An invisible contact-reporting plane attached to the hoop.
#[derive(Component, Clone, Copy, Debug)]
pub struct SensorPlane {
    pub kind: SensorKind,
}

/// The score display hanging above the rim. `value` holds the rendered
/// digits; the classifier pushes the made-shot count here as text.
#[derive(Component, Clone, Debug)]
pub struct ScoreBoard {
    pub value: String,
}

// ── Asset description ─────────────────────────────────────────────────────────

/// One named sub-part of the hoop asset, with its hoop-local transform.
#[derive(Clone, Debug)]
pub struct HoopPart {
    pub name: &'static str,
    pub transform: Transform,
}

/// Data description of the hoop asset: a flat list of named parts.
///
/// Stands in for the authored scene file of the original asset pipeline; the
/// built-in spec is the single source of truth for part placement.
#[derive(Clone, Debug, Default)]
pub struct HoopAssetSpec {
    pub parts: Vec<HoopPart>,
}

impl HoopAssetSpec {
    /// The built-in hoop asset.
    ///
    /// The rim pivot hangs below the board centre and stands off the wall by
    /// a little more than the ring radius, so the ring clears the board.
    pub fn builtin() -> Self {
        let rim_pivot = Vec3::new(
            0.0,
            -(BOARD_STANDOFF + 2.0 * BOARD_HALF_T + RIM_RADIUS + 0.05),
            -0.15,
        );
        Self {
            parts: vec![
                HoopPart {
                    name: "board",
                    transform: Transform::from_xyz(0.0, -(BOARD_STANDOFF + BOARD_HALF_T), 0.0),
                },
                HoopPart {
                    name: "rim",
                    transform: Transform::from_translation(rim_pivot),
                },
                HoopPart {
                    name: "net",
                    transform: Transform::from_translation(rim_pivot),
                },
            ],
        }
    }

    fn find(&self, name: &str) -> Option<&HoopPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// Validated hoop rig, ready to spawn. Built once at startup from the asset
/// spec and kept as a resource for the placement tap.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct HoopRig {
    /// Hoop-local centre of the rim ring.
    pub rim_pivot: Vec3,
    /// Hoop-local transform of the backboard.
    pub board: Transform,
    /// Net is optional: a rig without one still plays, it just looks bare.
    pub net: Option<Transform>,
}

impl HoopRig {
    /// Validate `spec` and extract the parts the game needs.
    ///
    /// Fails with [`GameError::MissingHoopPart`] when a required named part
    /// is absent; this is a malformed-asset error and is surfaced at startup
    /// rather than swallowed at placement time.
    pub fn from_asset(spec: &HoopAssetSpec) -> GameResult<Self> {
        let rim = spec
            .find("rim")
            .ok_or(GameError::MissingHoopPart { part: "rim" })?;
        let board = spec
            .find("board")
            .ok_or(GameError::MissingHoopPart { part: "board" })?;
        Ok(Self {
            rim_pivot: rim.transform.translation,
            board: board.transform,
            net: spec.find("net").map(|p| p.transform),
        })
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Validate the built-in hoop asset and publish the rig as a resource.
///
/// A malformed asset aborts the app with a diagnostic: there is no point
/// running a session whose hoop can never be placed.
pub fn init_hoop_rig(mut commands: Commands, mut exit: MessageWriter<bevy::app::AppExit>) {
    match HoopRig::from_asset(&HoopAssetSpec::builtin()) {
        Ok(rig) => {
            commands.insert_resource(rig);
            eprintln!("[SETUP] Hoop rig validated");
        }
        Err(e) => {
            eprintln!("✗ Hoop asset validation failed: {e}");
            exit.write(bevy::app::AppExit::error());
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Collision groups for the hoop structure: member of all four structure
/// bits, collides with everything.
fn structure_groups() -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(0b1111), Group::ALL)
}

/// Build the compound capsule-segment collider approximating the rim ring.
///
/// Authored in the rim entity's local frame, where the ring circles the
/// local Y axis (matching the torus visual). Each segment is a capsule laid
/// tangent to the ring; the caps overlap neighbouring segments so there are
/// no gaps a ball edge could slip through.
fn rim_ring_collider() -> Collider {
    let half_chord = RIM_RADIUS * (std::f32::consts::PI / RIM_SEGMENTS as f32).sin();
    let segments = (0..RIM_SEGMENTS)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / RIM_SEGMENTS as f32;
            let position = Vec3::new(RIM_RADIUS * theta.cos(), 0.0, RIM_RADIUS * theta.sin());
            let tangent = Vec3::new(-theta.sin(), 0.0, theta.cos());
            let rotation = Quat::from_rotation_arc(Vec3::Y, tangent);
            (
                position,
                rotation,
                Collider::capsule_y(half_chord, RIM_TUBE_RADIUS),
            )
        })
        .collect();
    Collider::compound(segments)
}

/// Spawn the complete hoop assembly at `placement` (a hit-test pose on a
/// vertical plane) and return the root entity.
///
/// The root is a single fixed rigid body; backboard, rim, sensors, and
/// scoreboard hang off it as child colliders/entities. The hoop's transform
/// is immutable for the rest of the session.
pub fn spawn_hoop(
    commands: &mut Commands,
    rig: &HoopRig,
    config: &GameConfig,
    placement: Transform,
) -> Entity {
    let rotation = placement.rotation * Quat::from_rotation_x(-FRAC_PI_2);
    let root = commands
        .spawn((
            Hoop,
            Transform::from_translation(placement.translation).with_rotation(rotation),
            Visibility::default(),
            RigidBody::Fixed,
        ))
        .id();

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Backboard,
            rig.board,
            Visibility::default(),
            Collider::cuboid(BOARD_HALF_W, BOARD_HALF_T, BOARD_HALF_H),
            structure_groups(),
        ));

        // Rim entity rotated so its local Y (the ring axis) aligns with
        // hoop-local +Z, i.e. world up after placement.
        let mut rim = parent.spawn((
            RimRing,
            Transform::from_translation(rig.rim_pivot)
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            Visibility::default(),
            rim_ring_collider(),
            structure_groups(),
            Restitution::coefficient(config.ball_restitution),
        ));
        if rig.net.is_some() {
            rim.with_children(|rim| {
                rim.spawn((
                    Net {
                        top_radius: RIM_RADIUS,
                        bottom_radius: NET_BOTTOM_RADIUS,
                        depth: NET_DEPTH,
                    },
                    Transform::IDENTITY,
                    Visibility::default(),
                ));
            });
        }

        for (kind, offset) in [
            (SensorKind::Upper, SENSOR_UPPER_OFFSET),
            (SensorKind::Lower, SENSOR_LOWER_OFFSET),
        ] {
            parent.spawn((
                SensorPlane { kind },
                Transform::from_translation(rig.rim_pivot + Vec3::Z * offset),
                // No mesh is ever attached: sensors stay invisible.
                Visibility::Hidden,
                Collider::cuboid(SENSOR_HALF_EXTENT, SENSOR_HALF_EXTENT, SENSOR_HALF_THICKNESS),
                Sensor,
                ActiveEvents::COLLISION_EVENTS,
                CollisionGroups::new(Group::GROUP_4, Group::GROUP_3),
            ));
        }

        parent.spawn((
            ScoreBoard {
                value: "0".to_string(),
            },
            Transform::from_translation(
                rig.rim_pivot + Vec3::new(SCOREBOARD_SIDE_SHIFT, 0.0, SCOREBOARD_HEIGHT),
            ),
            Visibility::default(),
        ));
    });

    info!("Hoop placed at {:?}", placement.translation);
    root
}
