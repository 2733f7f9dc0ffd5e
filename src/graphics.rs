//! Camera and lighting setup.

use crate::constants::CAMERA_EYE_HEIGHT;
use crate::room::FlyRig;
use bevy::prelude::*;

/// Marker for the camera that stands in for the handheld device.
///
/// Its transform is the "device pose": balls spawn from it and pick rays
/// are cast through it.
#[derive(Component)]
pub struct DeviceCamera;

/// Setup the 3D camera and lights.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        DeviceCamera,
        FlyRig::default(),
        Transform::from_xyz(0.0, CAMERA_EYE_HEIGHT, 2.5),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 150.0,
        ..default()
    });
    eprintln!("[SETUP] Camera spawned");
}
