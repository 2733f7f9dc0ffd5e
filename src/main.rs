use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

mod ball;
mod config;
mod constants;
mod error;
mod graphics;
mod hoop;
mod rendering;
mod room;
mod scoring;
mod session;
mod tracking;

use config::GameConfig;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hoopshot".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)))
        // Insert GameConfig with compiled defaults; load_game_config will
        // overwrite it from assets/game.toml (if present) in the Startup
        // schedule, before any system that reads it.
        .insert_resource(GameConfig::default())
        .add_systems(Startup, config::load_game_config)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(session::SessionPlugin)
        .add_plugins(room::RoomPlugin)
        .add_plugins(rendering::RenderingPlugin)
        .run();
}
