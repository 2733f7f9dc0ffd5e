//! Tracked-plane bookkeeping: detection messages, surface markers, and the
//! hit-test used to place the hoop.
//!
//! The tracking backend (simulated room, or a real AR bridge) announces each
//! vertical plane it finds with a [`PlaneDetected`] message and attaches a
//! [`TrackedPlane`] to the plane entity. While the session is still in
//! `Scouting`, every announced plane gets a translucent [`SurfaceMarker`]
//! quad so the player can see where a hoop may hang. All markers are removed
//! in one sweep the moment the hoop is placed; detections arriving after
//! that are silently dropped.
//!
//! ## Plane convention
//!
//! A tracked plane's local +Z is its outward normal and local +Y runs up
//! along the surface; `extent` is the full width/height in local X/Y.

use bevy::prelude::*;

// ── Messages ──────────────────────────────────────────────────────────────────

/// A tracking backend observed (or re-measured) a vertical plane.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaneDetected {
    /// The plane entity; carries the plane's transform and [`TrackedPlane`].
    pub plane: Entity,
    /// Current full extent of the plane (local X, local Y).
    pub extent: Vec2,
}

// ── Components ────────────────────────────────────────────────────────────────

/// A surface the tracker considers a candidate for hoop placement.
#[derive(Component, Clone, Copy, Debug)]
pub struct TrackedPlane {
    /// Full extent of the plane (local X, local Y).
    pub extent: Vec2,
}

/// Translucent placement-preview quad drawn over one tracked plane.
#[derive(Component, Clone, Copy, Debug)]
pub struct SurfaceMarker {
    /// The plane this marker previews, so re-detections resize instead of
    /// duplicating.
    pub plane: Entity,
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Spawn (or resize) one marker per detected plane. Gated to `Scouting`;
/// once the hoop is up, detections fall on the floor.
pub fn surface_marker_system(
    mut commands: Commands,
    mut detections: MessageReader<PlaneDetected>,
    mut q_markers: Query<(&SurfaceMarker, &mut Transform)>,
) {
    for detection in detections.read() {
        let scale = detection.extent.extend(1.0);

        // Re-detection of a known plane just refreshes the marker size.
        let mut known = false;
        for (marker, mut transform) in q_markers.iter_mut() {
            if marker.plane == detection.plane {
                transform.scale = scale;
                known = true;
            }
        }
        if known {
            continue;
        }

        // Plane may have despawned between announcement and this frame.
        let Ok(mut plane) = commands.get_entity(detection.plane) else {
            continue;
        };
        plane.with_children(|parent| {
            parent.spawn((
                SurfaceMarker {
                    plane: detection.plane,
                },
                // Unit quad scaled to the extent, nudged off the surface to
                // avoid z-fighting with the wall itself.
                Transform::from_xyz(0.0, 0.0, 0.01).with_scale(scale),
                Visibility::default(),
            ));
        });
    }
}

/// Remove every surface marker in one sweep. Runs on entry to `Playing`, so
/// the markers disappear atomically with hoop placement.
pub fn clear_surface_markers(
    mut commands: Commands,
    q_markers: Query<Entity, With<SurfaceMarker>>,
) {
    for marker in q_markers.iter() {
        commands.entity(marker).despawn();
    }
}

// ── Hit-testing ───────────────────────────────────────────────────────────────

/// Intersect `ray` with every tracked plane and return the pose of the
/// nearest hit, if any.
///
/// The returned pose sits at the intersection point and carries the plane's
/// orientation, ready to be handed to the hoop spawner. Rays parallel to a
/// plane, hits behind the ray origin, and hits outside the plane's extent
/// all miss.
pub fn hit_test<'a>(
    ray: Ray3d,
    planes: impl Iterator<Item = (&'a GlobalTransform, &'a TrackedPlane)>,
) -> Option<Transform> {
    const EPS: f32 = 1e-6;

    let mut best: Option<(f32, Transform)> = None;
    for (transform, plane) in planes {
        let (_, rotation, center) = transform.to_scale_rotation_translation();
        let normal = rotation * Vec3::Z;

        let denom = ray.direction.dot(normal);
        if denom.abs() < EPS {
            continue;
        }
        let t = (center - ray.origin).dot(normal) / denom;
        if t <= 1e-3 {
            continue;
        }

        let point = ray.origin + ray.direction * t;
        let local = rotation.inverse() * (point - center);
        if local.x.abs() > plane.extent.x / 2.0 || local.y.abs() > plane.extent.y / 2.0 {
            continue;
        }

        if best.is_none_or(|(best_t, _)| t < best_t) {
            best = Some((t, Transform::from_translation(point).with_rotation(rotation)));
        }
    }
    best.map(|(_, pose)| pose)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(transform: Transform, extent: Vec2) -> (GlobalTransform, TrackedPlane) {
        (GlobalTransform::from(transform), TrackedPlane { extent })
    }

    fn run_hit_test(ray: Ray3d, planes: &[(GlobalTransform, TrackedPlane)]) -> Option<Transform> {
        hit_test(ray, planes.iter().map(|(t, p)| (t, p)))
    }

    #[test]
    fn ray_through_plane_center_hits() {
        let planes = [plane(Transform::IDENTITY, Vec2::splat(2.0))];
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::NEG_Z);
        let pose = run_hit_test(ray, &planes).unwrap();
        assert!(pose.translation.length() < 1e-4);
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }

    #[test]
    fn hit_outside_extent_misses() {
        let planes = [plane(Transform::IDENTITY, Vec2::splat(2.0))];
        let ray = Ray3d::new(Vec3::new(5.0, 0.0, 5.0), Dir3::NEG_Z);
        assert!(run_hit_test(ray, &planes).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let planes = [plane(Transform::IDENTITY, Vec2::splat(2.0))];
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::X);
        assert!(run_hit_test(ray, &planes).is_none());
    }

    #[test]
    fn plane_behind_ray_misses() {
        let planes = [plane(Transform::from_xyz(0.0, 0.0, 10.0), Vec2::splat(2.0))];
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::NEG_Z);
        assert!(run_hit_test(ray, &planes).is_none());
    }

    #[test]
    fn nearest_of_two_planes_wins() {
        let planes = [
            plane(Transform::IDENTITY, Vec2::splat(2.0)),
            plane(Transform::from_xyz(0.0, 0.0, 2.0), Vec2::splat(2.0)),
        ];
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::NEG_Z);
        let pose = run_hit_test(ray, &planes).unwrap();
        assert!((pose.translation.z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_plane_reports_its_orientation() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let planes = [plane(
            Transform::from_xyz(2.0, 0.0, 0.0).with_rotation(rotation),
            Vec2::splat(2.0),
        )];
        // Plane normal now faces −X... rotated +Z is world +X, so approach
        // from +X.
        let ray = Ray3d::new(Vec3::new(5.0, 0.0, 0.0), Dir3::NEG_X);
        let pose = run_hit_test(ray, &planes).unwrap();
        assert!((pose.translation - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert!(pose.rotation.angle_between(rotation) < 1e-5);
    }

    // ── Marker systems (headless) ─────────────────────────────────────────────

    fn marker_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<PlaneDetected>();
        app.add_systems(Update, surface_marker_system);
        app
    }

    fn spawn_plane(app: &mut App, extent: Vec2) -> Entity {
        app.world_mut()
            .spawn((Transform::IDENTITY, Visibility::default(), TrackedPlane { extent }))
            .id()
    }

    fn detect(app: &mut App, plane: Entity, extent: Vec2) {
        app.world_mut().write_message(PlaneDetected { plane, extent });
        app.update();
    }

    fn marker_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&SurfaceMarker>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn one_marker_per_distinct_plane() {
        let mut app = marker_test_app();
        let extent = Vec2::new(3.0, 2.0);
        let first = spawn_plane(&mut app, extent);
        let second = spawn_plane(&mut app, extent);

        detect(&mut app, first, extent);
        detect(&mut app, second, extent);
        assert_eq!(marker_count(&mut app), 2);
    }

    #[test]
    fn re_detection_resizes_instead_of_duplicating() {
        let mut app = marker_test_app();
        let plane = spawn_plane(&mut app, Vec2::splat(1.0));

        detect(&mut app, plane, Vec2::splat(1.0));
        detect(&mut app, plane, Vec2::new(4.0, 2.5));
        assert_eq!(marker_count(&mut app), 1);

        let mut markers = app.world_mut().query::<(&SurfaceMarker, &Transform)>();
        let (_, transform) = markers.single(app.world()).unwrap();
        assert!((transform.scale.truncate() - Vec2::new(4.0, 2.5)).length() < 1e-6);
    }

    #[test]
    fn clear_sweep_removes_every_marker() {
        let mut app = marker_test_app();
        let extent = Vec2::splat(2.0);
        for _ in 0..3 {
            let plane = spawn_plane(&mut app, extent);
            detect(&mut app, plane, extent);
        }
        assert_eq!(marker_count(&mut app), 3);

        app.add_systems(PostUpdate, clear_surface_markers);
        app.update();
        assert_eq!(marker_count(&mut app), 0);
    }
}
