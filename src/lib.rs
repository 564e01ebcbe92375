//! Tunnel Run - a scrolling-tunnel shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, terrain, collisions, world)
//! - `display`: Render/score output seam the host platform implements
//! - `config`: Data-driven game tunables
//! - `rng`: The game's fixed pseudo-random generator
//!
//! The simulation is a set of cooperating hierarchical state machines
//! (Tunnel, Ship, Missile, pooled Mines) driven purely by events: a fixed
//! ~30 Hz tick, player input, and software timers. There is no rendering,
//! no platform I/O and no wall-clock time in here; everything behind the
//! [`display::Display`] trait is the host's problem.

pub mod config;
pub mod display;
pub mod rng;
pub mod sim;

pub use config::GameConfig;
pub use display::{Display, NullDisplay};
pub use rng::SuperDuperRng;
pub use sim::world::{GameWorld, TickInput};

/// Game geometry and pacing constants
///
/// These mirror the reference hardware (a 96x16 1-bit display) and are
/// baked in as constants rather than configuration: the sprite bitmaps
/// and the bit-grid column type are sized for them.
pub mod consts {
    /// Screen width in pixels (one bit-grid column per pixel)
    pub const SCREEN_WIDTH: u8 = 96;
    /// Screen height in pixels (rows grow downward, bit 0 = top row)
    pub const SCREEN_HEIGHT: u8 = 16;
    /// Mask selecting the on-screen rows of a column word
    pub const ROW_MASK: u32 = (1 << SCREEN_HEIGHT) - 1;

    /// Horizontal scroll speed of the tunnel, pixels per tick
    pub const SPEED_X: u8 = 1;
    /// Horizontal speed of a flying missile, pixels per tick
    pub const MISSILE_SPEED_X: u8 = 2;

    /// Maximum number of concurrently planted mines (pool slots)
    pub const MINES_MAX: usize = 5;

    /// Ship spawn position
    pub const SHIP_X: u8 = 10;
    pub const SHIP_Y: u8 = 10;
    /// Ship sprite height in rows (used for missile launch / explosion offsets)
    pub const SHIP_HEIGHT: u8 = 3;

    /// Simulation tick rate
    pub const TICKS_PER_SEC: u32 = 30;

    /// Number of ticks an explosion animation runs (4 frames, 4 ticks each)
    pub const EXPLOSION_TICKS: u8 = 15;
}
