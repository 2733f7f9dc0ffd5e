//! Visual attachment and HUD systems.
//!
//! Game-logic spawners (`hoop`, `ball`, `tracking`, `room`) create entities
//! with colliders and logic components only; the systems here notice the
//! freshly added markers and attach meshes and materials. That split keeps
//! every logic system runnable in a headless test app with no render world.
//!
//! | System                        | Schedule | Purpose                          |
//! |-------------------------------|----------|----------------------------------|
//! | `setup_visual_assets`         | Startup  | Shared mesh/material handles     |
//! | `setup_hud`                   | Startup  | Score HUD + placement hint       |
//! | `attach_ball_visual_system`   | Update   | Sphere on each new ball          |
//! | `attach_hoop_visual_system`   | Update   | Board, rim, scoreboard visuals   |
//! | `attach_net_visual_system`    | Update   | Procedural net cone mesh         |
//! | `attach_marker_visual_system` | Update   | Translucent placement quads      |
//! | `attach_room_visual_system`   | Update   | Demo room walls and floor        |
//! | `hud_score_display_system`    | Update   | Refresh score HUD text           |
//! | `hide_placement_hint`         | OnEnter  | Drop the hint once the hoop is up|

use crate::ball::Ball;
use crate::config::GameConfig;
use crate::hoop::{Backboard, Net, RimRing, ScoreBoard};
use crate::room::{Floor, WallPanel};
use crate::scoring::ShotStats;
use crate::session::SessionPhase;
use crate::tracking::SurfaceMarker;
use crate::{constants, graphics};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

// ── Shared handles ────────────────────────────────────────────────────────────

/// Mesh and material handles shared by every instance of a visual kind,
/// created once at startup.
#[derive(Resource)]
pub struct VisualAssets {
    pub ball_mesh: Handle<Mesh>,
    pub ball_mat: Handle<StandardMaterial>,
    pub marker_mesh: Handle<Mesh>,
    pub marker_mat: Handle<StandardMaterial>,
    pub board_mesh: Handle<Mesh>,
    pub board_mat: Handle<StandardMaterial>,
    pub rim_mesh: Handle<Mesh>,
    pub rim_mat: Handle<StandardMaterial>,
    pub net_mat: Handle<StandardMaterial>,
    pub scoreboard_mesh: Handle<Mesh>,
    pub scoreboard_mat: Handle<StandardMaterial>,
    pub wall_mat: Handle<StandardMaterial>,
    pub floor_mat: Handle<StandardMaterial>,
}

/// Build the shared visual assets.
pub fn setup_visual_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameConfig>,
) {
    let assets = VisualAssets {
        ball_mesh: meshes.add(Sphere::new(config.ball_radius)),
        ball_mat: materials.add(StandardMaterial {
            base_color: Color::srgb(0.92, 0.45, 0.12),
            perceptual_roughness: 0.7,
            ..default()
        }),
        // Unit quad facing local +Z; scaled per marker to the plane extent.
        marker_mesh: meshes.add(Plane3d::new(Vec3::Z, Vec2::splat(0.5))),
        marker_mat: materials.add(StandardMaterial {
            base_color: Color::srgba(0.25, 0.45, 1.0, config.marker_opacity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            ..default()
        }),
        board_mesh: meshes.add(Cuboid::new(
            2.0 * constants::BOARD_HALF_W,
            2.0 * constants::BOARD_HALF_T,
            2.0 * constants::BOARD_HALF_H,
        )),
        board_mat: materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.9, 0.88),
            ..default()
        }),
        rim_mesh: meshes.add(Torus::new(
            constants::RIM_RADIUS - constants::RIM_TUBE_RADIUS,
            constants::RIM_RADIUS + constants::RIM_TUBE_RADIUS,
        )),
        rim_mat: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.25, 0.1),
            metallic: 0.6,
            perceptual_roughness: 0.4,
            ..default()
        }),
        net_mat: materials.add(StandardMaterial {
            base_color: Color::srgba(0.95, 0.95, 0.95, 0.55),
            alpha_mode: AlphaMode::Blend,
            cull_mode: None,
            double_sided: true,
            ..default()
        }),
        scoreboard_mesh: meshes.add(Plane3d::new(Vec3::NEG_Y, Vec2::new(0.15, 0.1))),
        scoreboard_mat: materials.add(StandardMaterial {
            base_color: Color::srgba(0.1, 0.1, 0.12, 0.7),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            ..default()
        }),
        wall_mat: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.37, 0.4),
            perceptual_roughness: 0.95,
            ..default()
        }),
        floor_mat: materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.26, 0.28),
            perceptual_roughness: 1.0,
            ..default()
        }),
    };
    commands.insert_resource(assets);
}

// ── Attach systems ────────────────────────────────────────────────────────────

/// Attach the shared sphere mesh to every freshly launched ball.
pub fn attach_ball_visual_system(
    mut commands: Commands,
    query: Query<Entity, Added<Ball>>,
    assets: Res<VisualAssets>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.ball_mesh.clone()),
            MeshMaterial3d(assets.ball_mat.clone()),
        ));
    }
}

/// Attach board, rim, and scoreboard visuals when a hoop comes up.
pub fn attach_hoop_visual_system(
    mut commands: Commands,
    q_boards: Query<Entity, Added<Backboard>>,
    q_rims: Query<Entity, Added<RimRing>>,
    q_scoreboards: Query<Entity, Added<ScoreBoard>>,
    assets: Res<VisualAssets>,
) {
    for entity in q_boards.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.board_mesh.clone()),
            MeshMaterial3d(assets.board_mat.clone()),
        ));
    }
    for entity in q_rims.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.rim_mesh.clone()),
            MeshMaterial3d(assets.rim_mat.clone()),
        ));
    }
    for entity in q_scoreboards.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.scoreboard_mesh.clone()),
            MeshMaterial3d(assets.scoreboard_mat.clone()),
        ));
    }
}

/// Build and attach the truncated-cone net mesh for each new net.
pub fn attach_net_visual_system(
    mut commands: Commands,
    query: Query<(Entity, &Net), Added<Net>>,
    mut meshes: ResMut<Assets<Mesh>>,
    assets: Res<VisualAssets>,
) {
    for (entity, net) in query.iter() {
        let mesh = meshes.add(net_mesh(net.top_radius, net.bottom_radius, net.depth));
        commands.entity(entity).insert((
            Mesh3d(mesh),
            MeshMaterial3d(assets.net_mat.clone()),
        ));
    }
}

/// Attach the translucent preview quad to each new surface marker.
pub fn attach_marker_visual_system(
    mut commands: Commands,
    query: Query<Entity, Added<SurfaceMarker>>,
    assets: Res<VisualAssets>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.marker_mesh.clone()),
            MeshMaterial3d(assets.marker_mat.clone()),
        ));
    }
}

/// Attach meshes to the demo room's walls and floor.
pub fn attach_room_visual_system(
    mut commands: Commands,
    q_walls: Query<(Entity, &WallPanel), Added<WallPanel>>,
    q_floors: Query<Entity, Added<Floor>>,
    mut meshes: ResMut<Assets<Mesh>>,
    assets: Res<VisualAssets>,
    config: Res<GameConfig>,
) {
    for (entity, panel) in q_walls.iter() {
        let mesh = meshes.add(Cuboid::new(panel.extent.x, panel.extent.y, 0.04));
        commands.entity(entity).insert((
            Mesh3d(mesh),
            MeshMaterial3d(assets.wall_mat.clone()),
        ));
    }
    for entity in q_floors.iter() {
        let mesh = meshes.add(Cuboid::new(
            2.0 * config.room_half_size,
            0.1,
            2.0 * config.room_half_size,
        ));
        commands.entity(entity).insert((
            Mesh3d(mesh),
            MeshMaterial3d(assets.floor_mat.clone()),
        ));
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Marker for the permanent score HUD node.
#[derive(Component)]
pub struct HudScoreDisplay;

/// Marker for the placement hint shown while scouting.
#[derive(Component)]
pub struct HudHint;

/// Spawn the permanent score HUD and the placement hint.
pub fn setup_hud(mut commands: Commands, config: Res<GameConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudScoreDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Score: 0"),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0 + config.hud_font_size + 6.0),
                ..default()
            },
            HudHint,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Left-click a highlighted wall to hang the hoop"),
                TextFont {
                    font_size: config.hud_font_size * 0.75,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.8, 1.0)),
            ));
        });
}

/// Refresh the score HUD when the stats change.
pub fn hud_score_display_system(
    stats: Res<ShotStats>,
    parent_query: Query<&Children, With<HudScoreDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !stats.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format!("Score: {}", stats.made));
            }
        }
    }
}

/// Hide the placement hint once the hoop is up.
pub fn hide_placement_hint(mut query: Query<&mut Visibility, With<HudHint>>) {
    for mut visibility in query.iter_mut() {
        *visibility = Visibility::Hidden;
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build the truncated-cone net mesh: a ring of quads from the rim circle
/// down to a narrower bottom opening, circling the local Y axis.
fn net_mesh(top_radius: f32, bottom_radius: f32, depth: f32) -> Mesh {
    const SEGMENTS: u32 = 16;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let slope = (top_radius - bottom_radius) / depth;

    for i in 0..=SEGMENTS {
        let theta = std::f32::consts::TAU * i as f32 / SEGMENTS as f32;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(cos, slope, sin).normalize();
        positions.push([top_radius * cos, 0.0, top_radius * sin]);
        positions.push([bottom_radius * cos, -depth, bottom_radius * sin]);
        normals.push(normal.to_array());
        normals.push(normal.to_array());
        uvs.push([i as f32 / SEGMENTS as f32, 0.0]);
        uvs.push([i as f32 / SEGMENTS as f32, 1.0]);
    }

    let mut indices: Vec<u32> = Vec::new();
    for i in 0..SEGMENTS {
        let a = 2 * i;
        let b = a + 1;
        let c = a + 2;
        let d = a + 3;
        indices.extend_from_slice(&[a, c, b, b, c, d]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (graphics::setup_camera, setup_visual_assets, setup_hud)
                .after(crate::config::load_game_config),
        )
        .add_systems(
            Update,
            (
                attach_ball_visual_system,
                attach_hoop_visual_system,
                attach_net_visual_system,
                attach_marker_visual_system,
                attach_room_visual_system,
                hud_score_display_system,
            ),
        )
        .add_systems(OnEnter(SessionPhase::Playing), hide_placement_hint);
    }
}
