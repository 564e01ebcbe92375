//! The missile entity
//!
//! A single reusable missile: `Armed` until the Ship fires it, then it
//! streaks right until it leaves the screen, hits a wall (explodes in
//! place) or destroys a mine (re-arms immediately; the mine animates its
//! own explosion). Highest-priority entity so its position update lands
//! before the Tunnel composites and tests collisions each tick.

use crate::consts::{EXPLOSION_TICKS, MISSILE_SPEED_X, SCREEN_WIDTH};
use crate::sim::bitmap::BitmapId;
use crate::sim::events::GameEvent;
use crate::sim::hsm::{Reaction, StateId, transition_path};
use crate::sim::world::{Outbox, Recipient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileState {
    Armed,
    Flying,
    Exploding,
}

impl StateId for MissileState {
    fn parent(self) -> Option<Self> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Missile {
    x: u8,
    y: u8,
    explosion_ctr: u8,
    state: MissileState,
}

impl Default for Missile {
    fn default() -> Self {
        Self::new()
    }
}

impl Missile {
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            explosion_ctr: 0,
            state: MissileState::Armed,
        }
    }

    pub fn state(&self) -> MissileState {
        self.state
    }

    pub fn pos(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    pub fn dispatch(&mut self, out: &mut Outbox, evt: &GameEvent) {
        let mut state = Some(self.state);
        while let Some(cur) = state {
            match self.handle(cur, evt, out) {
                Reaction::Handled => return,
                Reaction::Ignored => state = cur.parent(),
                Reaction::Transition(target) => {
                    self.transition_to(target);
                    return;
                }
            }
        }
    }

    fn transition_to(&mut self, target: MissileState) {
        let (_, entries) = transition_path(self.state, target);
        for s in entries {
            if s == MissileState::Exploding {
                self.explosion_ctr = 0;
            }
        }
        self.state = target;
    }

    fn handle(
        &mut self,
        state: MissileState,
        evt: &GameEvent,
        out: &mut Outbox,
    ) -> Reaction<MissileState> {
        match (state, evt) {
            (MissileState::Armed, GameEvent::MissileFire { x, y }) => {
                // Launch positions are clamped on-screen, same as ship
                // moves, so the flight arithmetic stays in u8 range
                self.x = (*x).min(SCREEN_WIDTH - 1);
                self.y = *y;
                Reaction::Transition(MissileState::Flying)
            }

            (MissileState::Flying, GameEvent::TimeTick) => {
                if self.x + MISSILE_SPEED_X < SCREEN_WIDTH {
                    self.x += MISSILE_SPEED_X;
                    // The Tunnel draws the missile and reflects a
                    // HitWall back if it struck the terrain
                    out.post(
                        Recipient::Tunnel,
                        GameEvent::MissileImage {
                            x: self.x,
                            y: self.y as i8,
                            bmp: BitmapId::Missile,
                        },
                    );
                    Reaction::Handled
                } else {
                    // Flew off the right edge
                    Reaction::Transition(MissileState::Armed)
                }
            }

            (MissileState::Flying, GameEvent::HitWall) => {
                Reaction::Transition(MissileState::Exploding)
            }

            (MissileState::Flying, GameEvent::DestroyedMine { score }) => {
                // Credit the Ship and re-arm; the destroyed mine runs
                // its own explosion sequence
                out.post(Recipient::Ship, GameEvent::DestroyedMine { score: *score });
                Reaction::Transition(MissileState::Armed)
            }

            (MissileState::Exploding, GameEvent::TimeTick) => {
                if self.explosion_ctr < EXPLOSION_TICKS {
                    self.explosion_ctr += 1;
                    out.post(
                        Recipient::Tunnel,
                        GameEvent::Explosion {
                            x: self.x + 1,
                            // center the 7-row explosion on the 1-row sprite
                            y: self.y as i8 - 3,
                            bmp: BitmapId::explosion_frame(self.explosion_ctr),
                        },
                    );
                    Reaction::Handled
                } else {
                    Reaction::Transition(MissileState::Armed)
                }
            }

            _ => Reaction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_captures_ship_position() {
        let mut missile = Missile::new();
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::MissileFire { x: 10, y: 5 });
        assert_eq!(missile.state(), MissileState::Flying);
        assert_eq!(missile.pos(), (10, 5));
    }

    #[test]
    fn test_flying_advances_until_off_screen_then_rearms() {
        let mut missile = Missile::new();
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::MissileFire { x: 10, y: 5 });

        let mut ticks = 0u32;
        while missile.state() == MissileState::Flying {
            let mut out = Outbox::default();
            missile.dispatch(&mut out, &GameEvent::TimeTick);
            ticks += 1;
            if missile.state() == MissileState::Flying {
                let (x, _) = missile.pos();
                assert_eq!(
                    out.posts(),
                    &[(
                        Recipient::Tunnel,
                        GameEvent::MissileImage { x, y: 5, bmp: BitmapId::Missile }
                    )]
                );
                assert!(x + MISSILE_SPEED_X <= SCREEN_WIDTH);
            }
            assert!(ticks < 100, "missile never left the screen");
        }
        // From x=10, steps of 2: last on-screen position is 94
        assert_eq!(missile.pos().0, 94);
        assert_eq!(missile.state(), MissileState::Armed);
    }

    #[test]
    fn test_fire_beyond_right_edge_clamps_then_rearms() {
        let mut missile = Missile::new();
        missile.dispatch(&mut Outbox::default(), &GameEvent::MissileFire { x: 255, y: 5 });
        assert_eq!(missile.state(), MissileState::Flying);
        assert_eq!(missile.pos().0, SCREEN_WIDTH - 1);

        // Clamped to the last column, the next step is off-screen
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(missile.state(), MissileState::Armed);
        assert!(out.posts().is_empty());
    }

    #[test]
    fn test_wall_hit_explodes_then_rearms() {
        let mut missile = Missile::new();
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::MissileFire { x: 40, y: 6 });
        missile.dispatch(&mut out, &GameEvent::HitWall);
        assert_eq!(missile.state(), MissileState::Exploding);

        for _ in 0..EXPLOSION_TICKS {
            let mut out = Outbox::default();
            missile.dispatch(&mut out, &GameEvent::TimeTick);
            assert_eq!(missile.state(), MissileState::Exploding);
            // Explosion frames composite only; the missile stays put
            assert!(matches!(
                out.posts()[0].1,
                GameEvent::Explosion { x: 41, y: 3, .. }
            ));
        }
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(missile.state(), MissileState::Armed);
        assert!(out.posts().is_empty());
    }

    #[test]
    fn test_mine_destruction_forwards_score_and_rearms() {
        let mut missile = Missile::new();
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::MissileFire { x: 40, y: 6 });

        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::DestroyedMine { score: 45 });
        assert_eq!(missile.state(), MissileState::Armed);
        assert_eq!(
            out.posts(),
            &[(Recipient::Ship, GameEvent::DestroyedMine { score: 45 })]
        );
    }

    #[test]
    fn test_armed_ignores_tick_and_hits() {
        let mut missile = Missile::new();
        let mut out = Outbox::default();
        missile.dispatch(&mut out, &GameEvent::TimeTick);
        missile.dispatch(&mut out, &GameEvent::HitWall);
        assert_eq!(missile.state(), MissileState::Armed);
        assert!(out.posts().is_empty());
    }
}
