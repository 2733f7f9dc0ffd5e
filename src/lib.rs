//! hoopshot game library
//!
//! An AR-style basketball mini-game: vertical surfaces are tracked over
//! time, the player hangs a hoop on one with a tap, then throws
//! physics-simulated balls at it. Two invisible sensor planes above and
//! below the rim classify each ball's flight as a made shot or not.

pub mod ball;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod hoop;
pub mod rendering;
pub mod room;
pub mod scoring;
pub mod session;
pub mod tracking;
