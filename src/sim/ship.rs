//! The ship entity
//!
//! The player's ship and the owner of the only persistent score counter.
//! `Parked`/`Flying`/`Exploding` nest inside `Active`, which handles the
//! player move event no matter which sub-state is current - the one
//! cross-cutting handler in the hierarchy.

use crate::consts::{EXPLOSION_TICKS, SCREEN_HEIGHT, SCREEN_WIDTH, SHIP_HEIGHT, SHIP_X, SHIP_Y};
use crate::sim::bitmap::BitmapId;
use crate::sim::events::GameEvent;
use crate::sim::hsm::{Reaction, StateId, transition_path};
use crate::sim::world::{Outbox, Recipient};

/// How many ticks between score re-publications while flying
const SCORE_PUBLISH_EVERY: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipState {
    Active,
    Parked,
    Flying,
    Exploding,
}

impl StateId for ShipState {
    fn parent(self) -> Option<Self> {
        match self {
            ShipState::Parked | ShipState::Flying | ShipState::Exploding => Some(ShipState::Active),
            ShipState::Active => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    x: u8,
    y: u8,
    explosion_ctr: u8,
    score: u16,
    state: ShipState,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Ship {
    pub fn new() -> Self {
        Self {
            x: SHIP_X,
            y: SHIP_Y,
            explosion_ctr: 0,
            score: 0,
            state: ShipState::Parked,
        }
    }

    pub fn state(&self) -> ShipState {
        self.state
    }

    pub fn pos(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn dispatch(&mut self, out: &mut Outbox, evt: &GameEvent) {
        let mut state = Some(self.state);
        while let Some(cur) = state {
            match self.handle(cur, evt, out) {
                Reaction::Handled => return,
                Reaction::Ignored => state = cur.parent(),
                Reaction::Transition(target) => {
                    self.transition_to(target, out);
                    return;
                }
            }
        }
    }

    fn transition_to(&mut self, target: ShipState, out: &mut Outbox) {
        let (_, entries) = transition_path(self.state, target);
        for s in entries {
            self.on_entry(s, out);
        }
        self.state = target;
    }

    fn on_entry(&mut self, state: ShipState, out: &mut Outbox) {
        match state {
            ShipState::Flying => {
                // Every take-off starts a fresh run
                self.score = 0;
                out.post(Recipient::Tunnel, GameEvent::Score { score: self.score });
            }
            ShipState::Exploding => {
                log::debug!("ship: exploding at ({}, {})", self.x, self.y);
                self.explosion_ctr = 0;
            }
            ShipState::Active | ShipState::Parked => {}
        }
    }

    fn handle(&mut self, state: ShipState, evt: &GameEvent, out: &mut Outbox) -> Reaction<ShipState> {
        match (state, evt) {
            // Cross-cutting: the player may steer in any sub-state.
            // Host input is unvalidated; clamp to the screen.
            (ShipState::Active, GameEvent::PlayerShipMove { x, y }) => {
                self.x = (*x).min(SCREEN_WIDTH - 1);
                self.y = (*y).min(SCREEN_HEIGHT - 1);
                Reaction::Handled
            }

            (ShipState::Parked, GameEvent::TakeOff) => Reaction::Transition(ShipState::Flying),

            (ShipState::Flying, GameEvent::TimeTick) => {
                // Ask the Tunnel to draw us; it tests walls and fans the
                // image out to the mines
                out.post(
                    Recipient::Tunnel,
                    GameEvent::ShipImage {
                        x: self.x,
                        y: self.y as i8,
                        bmp: BitmapId::Ship,
                    },
                );

                // Survived another tick; the counter wraps at 16 bits
                // like the score display it feeds
                self.score = self.score.wrapping_add(1);
                if self.score % SCORE_PUBLISH_EVERY == 0 {
                    out.post(Recipient::Tunnel, GameEvent::Score { score: self.score });
                }
                Reaction::Handled
            }

            (ShipState::Flying, GameEvent::PlayerTrigger) => {
                // Fire from the nose
                out.post(
                    Recipient::Missile,
                    GameEvent::MissileFire {
                        x: self.x,
                        y: self.y + SHIP_HEIGHT - 1,
                    },
                );
                Reaction::Handled
            }

            (ShipState::Flying, GameEvent::DestroyedMine { score }) => {
                // Display catches up on the next round-score tick
                self.score = self.score.wrapping_add(*score);
                Reaction::Handled
            }

            (ShipState::Flying, GameEvent::HitWall | GameEvent::HitMine { .. }) => {
                Reaction::Transition(ShipState::Exploding)
            }

            (ShipState::Exploding, GameEvent::TimeTick) => {
                if self.explosion_ctr < EXPLOSION_TICKS {
                    self.explosion_ctr += 1;
                    out.post(
                        Recipient::Tunnel,
                        GameEvent::Explosion {
                            x: self.x,
                            // center the 7-row explosion on the ship sprite
                            y: self.y as i8 - 4 + SHIP_HEIGHT as i8,
                            bmp: BitmapId::explosion_frame(self.explosion_ctr),
                        },
                    );
                    Reaction::Handled
                } else {
                    out.post(Recipient::Tunnel, GameEvent::GameOver { score: self.score });
                    Reaction::Transition(ShipState::Parked)
                }
            }

            _ => Reaction::Ignored,
        }
    }
}
