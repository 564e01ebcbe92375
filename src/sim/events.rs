//! The event vocabulary of the game
//!
//! One sum type covers every signal that moves between entities, so each
//! state machine's handler is an exhaustive match and an unhandled signal
//! is a compile-time hole, not a runtime surprise. Events are small value
//! types, copied into mailboxes; no entity keeps one past its handler.

use crate::sim::bitmap::BitmapId;
use crate::sim::mine::MineKind;

/// Every event any entity can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    // === Published by the platform ===
    /// The fixed-rate simulation tick (~30 Hz)
    TimeTick,
    /// Player pressed the fire/start button
    PlayerTrigger,
    /// Player asked to quit
    PlayerQuit,
    /// Player moved the ship to an absolute position (Ship only)
    PlayerShipMove { x: u8, y: u8 },

    // === Software timers (Tunnel only) ===
    /// Recurring prompt/banner blink timer
    BlinkTimeout,
    /// One-shot mode-change timer (screen saver, game over, saver phases)
    ScreenTimeout,

    // === Game script events ===
    /// Tunnel grants the Ship permission to take off
    TakeOff,
    /// Ship launches the missile from its nose at `(x, y)`
    MissileFire { x: u8, y: u8 },
    /// Ship asks Tunnel to draw it (and test collisions) this tick
    ShipImage { x: u8, y: i8, bmp: BitmapId },
    /// Missile asks Tunnel to draw it (and test collisions) this tick
    MissileImage { x: u8, y: i8, bmp: BitmapId },
    /// A mine asks Tunnel to draw it this tick (composite only)
    MineImage { x: u8, y: i8, bmp: BitmapId },
    /// An explosion frame to composite (from any exploding entity)
    Explosion { x: u8, y: i8, bmp: BitmapId },
    /// Tunnel plants a pooled mine at `(x, y)` (direct dispatch)
    MinePlant { x: u8, y: u8 },
    /// A mine left its `used` super-state; Tunnel must clear slot `id`
    MineDisabled { id: u8 },
    /// Tunnel resets the whole mine pool (leaving the playing mode)
    MineRecycle,
    /// Tunnel tells Ship or Missile its sprite touched a wall
    HitWall,
    /// A mine tells Ship it was rammed
    HitMine { kind: MineKind },
    /// A mine tells Missile it was destroyed, carrying the score award
    DestroyedMine { score: u16 },
    /// Ship reports its running score to Tunnel
    Score { score: u16 },
    /// Ship finished exploding; the run is over with this final score
    GameOver { score: u16 },
}
