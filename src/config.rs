//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tuneable subset of
//! [`crate::constants`]. At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! Hoop and sensor geometry is intentionally absent here: the classifier's
//! contract depends on it, so it stays compile-time only.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.launch_power`, `config.ball_radius`, etc.

use crate::constants::*;
use crate::error;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`. Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Ball ─────────────────────────────────────────────────────────────────
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub launch_power: f32,
    pub ball_restitution: f32,
    pub ball_spin_jitter: f32,
    pub ball_lifetime_secs: f32,
    pub cull_floor_y: f32,

    // ── Markers ──────────────────────────────────────────────────────────────
    pub marker_opacity: f32,

    // ── Simulated room ───────────────────────────────────────────────────────
    pub room_half_size: f32,
    pub room_height: f32,
    pub plane_announce_secs: f32,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_move_speed: f32,
    pub camera_look_speed: f32,

    // ── HUD ──────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            launch_power: LAUNCH_POWER,
            ball_restitution: BALL_RESTITUTION,
            ball_spin_jitter: BALL_SPIN_JITTER,
            ball_lifetime_secs: BALL_LIFETIME_SECS,
            cull_floor_y: CULL_FLOOR_Y,
            marker_opacity: MARKER_OPACITY,
            room_half_size: ROOM_HALF_SIZE,
            room_height: ROOM_HEIGHT,
            plane_announce_secs: PLANE_ANNOUNCE_SECS,
            camera_move_speed: CAMERA_MOVE_SPEED,
            camera_look_speed: CAMERA_LOOK_SPEED,
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults. TOML parse errors are printed
/// to stderr but do not abort the game. A missing file is silently ignored
/// (defaults are already in place from `insert_resource`). Values that fail
/// range validation are rejected and the defaults kept.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                if let Err(e) = validate(&loaded) {
                    eprintln!("⚠ Rejecting {path}: {e}; using defaults");
                    return;
                }
                *config = loaded;
                println!("✓ Loaded game config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present, defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

/// Range-check the loaded values that can break the game if mis-set.
fn validate(config: &GameConfig) -> error::GameResult<()> {
    error::validate_launch_power(config.launch_power)?;
    error::validate_ball_radius(config.ball_radius)?;
    Ok(())
}
