//! Simulated tracking backend: a virtual room whose walls are "discovered"
//! over time, a fly camera standing in for the handheld device, and mouse
//! input lifted into [`TapDetected`] messages.
//!
//! Everything in this module is replaceable plumbing. The game core never
//! queries the room; it only sees [`PlaneDetected`] and [`TapDetected`]
//! messages and the device camera's transform, exactly what a real AR
//! bridge would feed it.
//!
//! ## Controls
//!
//! * `W/A/S/D` — move, `Space` / `ControlLeft` — up / down
//! * hold right mouse button — look around
//! * left click — tap (place the hoop, then throw balls)

use crate::config::GameConfig;
use crate::graphics::DeviceCamera;
use crate::session::TapDetected;
use crate::tracking::{PlaneDetected, TrackedPlane};
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

// ── Components & resources ────────────────────────────────────────────────────

/// Marker for the demo room floor.
#[derive(Component)]
pub struct Floor;

/// One vertical wall panel of the demo room, carrying its face extent.
/// Gains a [`TrackedPlane`] once the simulated tracker announces it.
#[derive(Component, Clone, Copy, Debug)]
pub struct WallPanel {
    pub extent: Vec2,
}

/// Timer pacing the simulated tracker's wall announcements.
#[derive(Resource)]
pub struct PlaneAnnouncer {
    pub timer: Timer,
}

/// Mouse-look state for the fly camera.
#[derive(Component, Default)]
pub struct FlyRig {
    pub yaw: f32,
    pub pitch: f32,
}

// ── Room geometry ─────────────────────────────────────────────────────────────

/// Pose and extent of wall `index` (0..4), each facing the room centre with
/// local +Z inward and local +Y up, matching the tracked-plane convention.
pub fn wall_pose(index: usize, half_size: f32, height: f32) -> (Transform, Vec2) {
    let y = height / 2.0;
    let extent = Vec2::new(2.0 * half_size, height);
    let transform = match index {
        0 => Transform::from_xyz(0.0, y, -half_size),
        1 => Transform::from_xyz(0.0, y, half_size)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
        2 => Transform::from_xyz(-half_size, y, 0.0)
            .with_rotation(Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2)),
        _ => Transform::from_xyz(half_size, y, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
    };
    (transform, extent)
}

/// Startup system: spawn the floor and the four walls of the demo room.
///
/// Walls get fixed colliders immediately so balls bounce off them even
/// before the tracker has announced them; they only become placement
/// candidates once [`TrackedPlane`] is attached.
pub fn spawn_room(mut commands: Commands, config: Res<GameConfig>) {
    let half = config.room_half_size;
    let height = config.room_height;

    commands.spawn((
        Floor,
        Transform::IDENTITY,
        Visibility::default(),
        RigidBody::Fixed,
        Collider::cuboid(half, 0.05, half),
        CollisionGroups::new(Group::GROUP_1, Group::ALL),
    ));

    for index in 0..4 {
        let (transform, extent) = wall_pose(index, half, height);
        commands.spawn((
            WallPanel { extent },
            transform,
            Visibility::default(),
            RigidBody::Fixed,
            Collider::cuboid(extent.x / 2.0, extent.y / 2.0, 0.02),
            CollisionGroups::new(Group::GROUP_1, Group::ALL),
        ));
    }
    eprintln!("[SETUP] Demo room spawned ({half} x {height})");
}

// ── Simulated tracker ─────────────────────────────────────────────────────────

/// Announce one not-yet-tracked wall per timer tick.
///
/// Keeps firing for the whole session, like a real tracker would; once the
/// hoop is placed the core simply ignores the messages.
pub fn plane_announce_system(
    mut commands: Commands,
    mut announcer: ResMut<PlaneAnnouncer>,
    mut detections: MessageWriter<PlaneDetected>,
    q_pending: Query<(Entity, &WallPanel), Without<TrackedPlane>>,
    time: Res<Time>,
) {
    announcer.timer.tick(time.delta());
    if !announcer.timer.just_finished() {
        return;
    }

    let Some((entity, panel)) = q_pending.iter().next() else {
        return;
    };
    commands
        .entity(entity)
        .insert(TrackedPlane { extent: panel.extent });
    detections.write(PlaneDetected {
        plane: entity,
        extent: panel.extent,
    });
    info!("Tracked vertical plane {entity} ({} x {})", panel.extent.x, panel.extent.y);
}

// ── Device camera ─────────────────────────────────────────────────────────────

/// WASD + mouse-look fly camera standing in for the handheld device.
///
/// Look is only active while the right mouse button is held, so left-click
/// taps never yank the view.
pub fn fly_camera_system(
    mut q_camera: Query<(&mut Transform, &mut FlyRig), With<DeviceCamera>>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let Ok((mut transform, mut rig)) = q_camera.single_mut() else {
        return;
    };

    if buttons.pressed(MouseButton::Right) {
        rig.yaw -= motion.delta.x * config.camera_look_speed;
        rig.pitch = (rig.pitch - motion.delta.y * config.camera_look_speed)
            .clamp(-1.5, 1.5);
        transform.rotation = Quat::from_euler(EulerRot::YXZ, rig.yaw, rig.pitch, 0.0);
    }

    let mut wish = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        wish += *transform.forward();
    }
    if keys.pressed(KeyCode::KeyS) {
        wish += *transform.back();
    }
    if keys.pressed(KeyCode::KeyA) {
        wish += *transform.left();
    }
    if keys.pressed(KeyCode::KeyD) {
        wish += *transform.right();
    }
    if keys.pressed(KeyCode::Space) {
        wish += Vec3::Y;
    }
    if keys.pressed(KeyCode::ControlLeft) {
        wish -= Vec3::Y;
    }
    if wish != Vec3::ZERO {
        transform.translation +=
            wish.normalize() * config.camera_move_speed * time.delta_secs();
    }
}

/// Turn left clicks into [`TapDetected`] messages.
///
/// The tap carries the pick ray through the cursor and the device pose at
/// tap time. If the cursor is outside the window or the camera has no valid
/// frame yet, the tap is silently dropped (no-op, not an error).
pub fn mouse_tap_system(
    buttons: Res<ButtonInput<MouseButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<DeviceCamera>>,
    mut taps: MessageWriter<TapDetected>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = q_window.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    taps.write(TapDetected {
        ray,
        camera_pose: camera_transform.compute_transform(),
    });
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// The desktop stand-in for an AR tracking session.
pub struct RoomPlugin;

impl Plugin for RoomPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            // Config must be final before the room reads its dimensions.
            (spawn_room, init_announcer).after(crate::config::load_game_config),
        )
        .add_systems(
            Update,
            (plane_announce_system, fly_camera_system, mouse_tap_system),
        );
    }
}

/// Build the announcement timer from the loaded config.
fn init_announcer(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(PlaneAnnouncer {
        timer: Timer::from_seconds(config.plane_announce_secs, TimerMode::Repeating),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_face_the_room_centre() {
        for index in 0..4 {
            let (transform, _) = wall_pose(index, 4.0, 3.0);
            let normal = transform.rotation * Vec3::Z;
            let to_centre = -Vec3::new(transform.translation.x, 0.0, transform.translation.z);
            assert!(
                normal.dot(to_centre.normalize()) > 0.99,
                "wall {index} normal must point inward"
            );
        }
    }

    #[test]
    fn wall_extent_spans_the_room() {
        let (_, extent) = wall_pose(0, 4.0, 3.0);
        assert_eq!(extent, Vec2::new(8.0, 3.0));
    }
}
