//! Centralised gameplay and geometry constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Runtime overrides for the subset that is safe to tune live in
//! [`crate::config::GameConfig`] (`assets/game.toml`).
//!
//! Geometry constants describing the hoop rig and the sensor layout are
//! deliberately *not* runtime-configurable: the classifier's contract depends
//! on the relative positions of the rim and the two sensor planes.

// ── Ball ──────────────────────────────────────────────────────────────────────

/// Radius of a launched ball (world units / metres).
pub const BALL_RADIUS: f32 = 0.125;

/// Mass of a launched ball (kg).
///
/// Kept at 1.0 so the launch impulse magnitude equals the launch speed in
/// m/s. Changing this rescales every shot; retune [`LAUNCH_POWER`] with it.
pub const BALL_MASS: f32 = 1.0;

/// Magnitude of the one-shot launch impulse applied along the camera's
/// forward axis at spawn time.
pub const LAUNCH_POWER: f32 = 10.0;

/// Bounciness of the ball against the rim, backboard, and room surfaces.
pub const BALL_RESTITUTION: f32 = 0.8;

/// Half-range of the random torque impulse applied at launch so balls
/// tumble in flight instead of flying perfectly still.
pub const BALL_SPIN_JITTER: f32 = 0.02;

/// Seconds a ball lives before it is despawned.
///
/// Balls are classified long before this expires; the cleanup exists so a
/// long session does not accumulate hundreds of settled rigid bodies.
pub const BALL_LIFETIME_SECS: f32 = 12.0;

/// Balls that fall below this world-space height are despawned immediately,
/// whatever their age. Catches balls that escape the room.
pub const CULL_FLOOR_Y: f32 = -5.0;

// ── Hoop rig ──────────────────────────────────────────────────────────────────

/// Radius of the rim ring, measured to the centre of the tube (world units).
pub const RIM_RADIUS: f32 = 0.23;

/// Radius of the rim tube itself.
pub const RIM_TUBE_RADIUS: f32 = 0.02;

/// Number of capsule segments approximating the rim ring collider.
///
/// The ring must stay concave so balls pass through the middle; 12 segments
/// keep the chord error well under the ball radius.
pub const RIM_SEGMENTS: usize = 12;

/// Backboard half-extents: width, thickness, height (hoop-local X, Y, Z).
pub const BOARD_HALF_W: f32 = 0.45;
pub const BOARD_HALF_T: f32 = 0.01;
pub const BOARD_HALF_H: f32 = 0.3;

/// Gap between the mounting surface and the backboard face.
pub const BOARD_STANDOFF: f32 = 0.03;

/// Depth of the net below the rim ring.
pub const NET_DEPTH: f32 = 0.3;

/// Radius of the net's bottom opening.
pub const NET_BOTTOM_RADIUS: f32 = 0.15;

// ── Sensor planes ─────────────────────────────────────────────────────────────

/// Vertical offset of the upper sensor plane from the rim centre.
pub const SENSOR_UPPER_OFFSET: f32 = 0.1;

/// Vertical offset of the lower sensor plane from the rim centre.
/// Sits at the bottom of the net so only balls that fell through reach it.
pub const SENSOR_LOWER_OFFSET: f32 = -0.3;

/// Half-extent of the square sensor plane (matches the ball radius so a
/// centred pass is always detected).
pub const SENSOR_HALF_EXTENT: f32 = 0.125;

/// Half-thickness of the sensor plane collider. Thin, but thick enough that
/// CCD-enabled balls register the overlap between substeps.
pub const SENSOR_HALF_THICKNESS: f32 = 0.005;

// ── Scoreboard ────────────────────────────────────────────────────────────────

/// Height of the scoreboard above the rim centre.
pub const SCOREBOARD_HEIGHT: f32 = 0.5;

/// Sideways shift of the scoreboard so it does not sit dead-centre over the
/// net.
pub const SCOREBOARD_SIDE_SHIFT: f32 = -0.05;

// ── Surface markers ───────────────────────────────────────────────────────────

/// Opacity of the translucent quad drawn over each tracked plane while the
/// player is still choosing where to hang the hoop.
pub const MARKER_OPACITY: f32 = 0.125;

// ── Simulated room ────────────────────────────────────────────────────────────

/// Half-width of the demo room floor (the room spans ±`ROOM_HALF_SIZE` in X
/// and Z).
pub const ROOM_HALF_SIZE: f32 = 4.0;

/// Wall height of the demo room.
pub const ROOM_HEIGHT: f32 = 3.0;

/// Seconds between successive wall "detections" by the simulated tracker.
pub const PLANE_ANNOUNCE_SECS: f32 = 2.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Fly-camera translation speed (units per second).
pub const CAMERA_MOVE_SPEED: f32 = 2.5;

/// Mouse-look sensitivity (radians per pixel of mouse travel).
pub const CAMERA_LOOK_SPEED: f32 = 0.003;

/// Initial camera height, roughly standing eye level.
pub const CAMERA_EYE_HEIGHT: f32 = 1.6;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Font size for the score HUD and the placement hint.
pub const HUD_FONT_SIZE: f32 = 22.0;
