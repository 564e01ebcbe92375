//! The deterministic game simulation
//!
//! Everything here advances in lockstep with the ~30 Hz tick:
//! - `terrain`: The scrolling tunnel walls (seeded random walk)
//! - `bitmap`: 1-bit sprites, the frame grid and pixel-exact collision
//! - `events`: The one event enum every entity speaks
//! - `hsm`: Flat hierarchical-state-machine helpers (parent table,
//!   transition path computation)
//! - `ship`, `missile`, `mine`: The player-facing entities
//! - `tunnel`: The orchestrator that owns terrain, frame and mine pool
//! - `world`: Mailboxes, timers and the per-tick run-to-completion loop
//!
//! Given the same seed, config and input sequence, a run is bit-for-bit
//! reproducible.

pub mod bitmap;
pub mod events;
pub mod hsm;
pub mod mine;
pub mod missile;
pub mod ship;
pub mod terrain;
pub mod tunnel;
pub mod world;

pub use bitmap::{BitGrid, BitmapId};
pub use events::GameEvent;
pub use mine::{Mine, MineKind};
pub use missile::Missile;
pub use ship::Ship;
pub use terrain::Terrain;
pub use tunnel::{Tunnel, TunnelState};
pub use world::{GameWorld, Outbox, Recipient, TickInput, TimerId};
