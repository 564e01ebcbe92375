//! Pooled mine entities
//!
//! Mines are pre-constructed once per pool slot and never allocated
//! afterward; "destroying" one is a transition back to `Unused`. The two
//! variants share one state machine and differ only in sprites, hit
//! silhouettes and score value. State chart:
//!
//! ```text
//! Unused --MinePlant--> Used/Planted --missile hit--> Used/Exploding
//!    ^                       |  |                          |
//!    |   (ship hit, off-screen, recycle)        (15 ticks or off-screen)
//!    +-----------------------+--+--------------------------+
//! ```
//!
//! Exiting `Used` on *any* path posts `MineDisabled` so the Tunnel
//! clears its slot reference.

use crate::consts::{EXPLOSION_TICKS, SPEED_X};
use crate::sim::bitmap::{BitmapId, overlaps};
use crate::sim::events::GameEvent;
use crate::sim::hsm::{Reaction, StateId, transition_path};
use crate::sim::world::{Outbox, Recipient};

/// The two mine variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineKind {
    /// Type-1: small plus shape, destroyed by hitting it anywhere
    Standard,
    /// Type-2: four tentacles that all hit the Ship, but only the
    /// narrow center can be destroyed by a missile
    Tentacle,
}

impl MineKind {
    /// The sprite drawn each tick, also the ship-collision silhouette
    pub fn sprite(self) -> BitmapId {
        match self {
            MineKind::Standard => BitmapId::Mine1,
            MineKind::Tentacle => BitmapId::Mine2,
        }
    }

    /// The silhouette a missile must hit to destroy the mine
    pub fn destroy_sprite(self) -> BitmapId {
        match self {
            MineKind::Standard => BitmapId::Mine1,
            MineKind::Tentacle => BitmapId::Mine2Core,
        }
    }

    /// Score awarded for destroying this mine
    pub fn score_value(self) -> u16 {
        match self {
            MineKind::Standard => 25,
            MineKind::Tentacle => 45,
        }
    }
}

/// Mine state hierarchy: `Planted` and `Exploding` nest inside `Used`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineState {
    Unused,
    Used,
    Planted,
    Exploding,
}

impl StateId for MineState {
    fn parent(self) -> Option<Self> {
        match self {
            MineState::Planted | MineState::Exploding => Some(MineState::Used),
            MineState::Unused | MineState::Used => None,
        }
    }
}

/// One pooled mine
#[derive(Debug, Clone)]
pub struct Mine {
    kind: MineKind,
    /// Pool slot index, carried in the disable notification
    id: u8,
    x: u8,
    y: u8,
    explosion_ctr: u8,
    state: MineState,
}

impl Mine {
    pub fn new(kind: MineKind, id: u8) -> Self {
        Self {
            kind,
            id,
            x: 0,
            y: 0,
            explosion_ctr: 0,
            state: MineState::Unused,
        }
    }

    pub fn state(&self) -> MineState {
        self.state
    }

    pub fn kind(&self) -> MineKind {
        self.kind
    }

    pub fn pos(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    /// Run one event to completion through the state hierarchy
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
        // Fell through to the root: the event is a no-op for this state
    }

    fn transition_to(&mut self, target: MineState, out: &mut Outbox) {
        let (exits, entries) = transition_path(self.state, target);
        for s in exits {
            self.on_exit(s, out);
        }
        for s in entries {
            self.on_entry(s);
        }
        self.state = target;
    }

    fn on_entry(&mut self, state: MineState) {
        if state == MineState::Exploding {
            self.explosion_ctr = 0;
        }
    }

    fn on_exit(&mut self, state: MineState, out: &mut Outbox) {
        if state == MineState::Used {
            // Fires on every path out of Used: scrolled off, rammed the
            // ship, finished exploding, or recycled by the Tunnel
            log::trace!("mine[{}] ({:?}) disabled", self.id, self.kind);
            out.post(Recipient::Tunnel, GameEvent::MineDisabled { id: self.id });
        }
    }

    fn handle(&mut self, state: MineState, evt: &GameEvent, out: &mut Outbox) -> Reaction<MineState> {
        match (state, evt) {
            (MineState::Unused, GameEvent::MinePlant { x, y }) => {
                self.x = *x;
                self.y = *y;
                Reaction::Transition(MineState::Planted)
            }

            (MineState::Used, GameEvent::MineRecycle) => Reaction::Transition(MineState::Unused),

            (MineState::Planted, GameEvent::TimeTick) => {
                if self.x >= SPEED_X {
                    self.x -= SPEED_X;
                    out.post(
                        Recipient::Tunnel,
                        GameEvent::MineImage {
                            x: self.x,
                            y: self.y as i8,
                            bmp: self.kind.sprite(),
                        },
                    );
                    Reaction::Handled
                } else {
                    // Scrolled off the left edge
                    Reaction::Transition(MineState::Unused)
                }
            }

            (MineState::Planted, GameEvent::ShipImage { x, y, bmp }) => {
                if overlaps(self.kind.sprite(), self.x, self.y as i8, *bmp, *x, *y) {
                    out.post(Recipient::Ship, GameEvent::HitMine { kind: self.kind });
                    // The Ship runs the explosion animation, not the mine
                    Reaction::Transition(MineState::Unused)
                } else {
                    Reaction::Handled
                }
            }

            (MineState::Planted, GameEvent::MissileImage { x, y, bmp }) => {
                if overlaps(self.kind.destroy_sprite(), self.x, self.y as i8, *bmp, *x, *y) {
                    out.post(
                        Recipient::Missile,
                        GameEvent::DestroyedMine {
                            score: self.kind.score_value(),
                        },
                    );
                    Reaction::Transition(MineState::Exploding)
                } else {
                    Reaction::Handled
                }
            }

            (MineState::Exploding, GameEvent::TimeTick) => {
                if self.x >= SPEED_X && self.explosion_ctr < EXPLOSION_TICKS {
                    self.explosion_ctr += 1;
                    self.x -= SPEED_X;
                    out.post(
                        Recipient::Tunnel,
                        GameEvent::Explosion {
                            x: self.x + 1,
                            // center the 7-row explosion on the mine sprite
                            y: self.y as i8 - 2,
                            bmp: BitmapId::explosion_frame(self.explosion_ctr),
                        },
                    );
                    Reaction::Handled
                } else {
                    Reaction::Transition(MineState::Unused)
                }
            }

            _ => Reaction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_WIDTH;

    fn planted_mine(kind: MineKind, x: u8, y: u8) -> (Mine, Outbox) {
        let mut mine = Mine::new(kind, 3);
        let mut out = Outbox::default();
        mine.dispatch(&mut out, &GameEvent::MinePlant { x, y });
        (mine, out)
    }

    #[test]
    fn test_unused_ignores_everything_but_plant() {
        let mut mine = Mine::new(MineKind::Standard, 0);
        let mut out = Outbox::default();
        for evt in [
            GameEvent::TimeTick,
            GameEvent::ShipImage { x: 0, y: 0, bmp: BitmapId::Ship },
            GameEvent::MissileImage { x: 0, y: 0, bmp: BitmapId::Missile },
            GameEvent::MineRecycle,
        ] {
            mine.dispatch(&mut out, &evt);
            assert_eq!(mine.state(), MineState::Unused);
        }
        assert!(out.posts().is_empty());

        mine.dispatch(&mut out, &GameEvent::MinePlant { x: 50, y: 8 });
        assert_eq!(mine.state(), MineState::Planted);
        assert_eq!(mine.pos(), (50, 8));
    }

    #[test]
    fn test_planted_tick_scrolls_and_reports_image() {
        let (mut mine, _) = planted_mine(MineKind::Standard, 50, 8);
        let mut out = Outbox::default();
        mine.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(mine.pos().0, 50 - SPEED_X);
        assert_eq!(
            out.posts(),
            &[(
                Recipient::Tunnel,
                GameEvent::MineImage { x: 50 - SPEED_X, y: 8, bmp: BitmapId::Mine1 }
            )]
        );
    }

    #[test]
    fn test_planted_scrolls_off_screen_to_unused() {
        let (mut mine, _) = planted_mine(MineKind::Standard, 0, 8);
        let mut out = Outbox::default();
        mine.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(mine.state(), MineState::Unused);
        // The Used exit hook must have told the Tunnel
        assert_eq!(out.posts(), &[(Recipient::Tunnel, GameEvent::MineDisabled { id: 3 })]);
    }

    #[test]
    fn test_ship_collision_notifies_and_disables_without_exploding() {
        let (mut mine, _) = planted_mine(MineKind::Standard, 50, 8);
        let mut out = Outbox::default();
        mine.dispatch(
            &mut out,
            &GameEvent::ShipImage { x: 49, y: 7, bmp: BitmapId::Ship },
        );
        assert_eq!(mine.state(), MineState::Unused);
        assert_eq!(
            out.posts(),
            &[
                (Recipient::Ship, GameEvent::HitMine { kind: MineKind::Standard }),
                (Recipient::Tunnel, GameEvent::MineDisabled { id: 3 }),
            ]
        );
    }

    #[test]
    fn test_missile_destruction_explodes_then_returns_to_unused() {
        let (mut mine, _) = planted_mine(MineKind::Standard, 50, 8);
        let mut out = Outbox::default();
        mine.dispatch(
            &mut out,
            &GameEvent::MissileImage { x: 48, y: 9, bmp: BitmapId::Missile },
        );
        assert_eq!(mine.state(), MineState::Exploding);
        assert_eq!(
            out.posts(),
            &[(Recipient::Missile, GameEvent::DestroyedMine { score: 25 })]
        );

        // Exactly 15 further ticks of animation (x stays >= speed), then
        // back to Unused on the 16th
        for n in 1..=15u8 {
            let mut out = Outbox::default();
            mine.dispatch(&mut out, &GameEvent::TimeTick);
            assert_eq!(mine.state(), MineState::Exploding, "tick {n}");
            assert_eq!(out.posts().len(), 1);
        }
        let mut out = Outbox::default();
        mine.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(mine.state(), MineState::Unused);
        assert_eq!(out.posts(), &[(Recipient::Tunnel, GameEvent::MineDisabled { id: 3 })]);
    }

    #[test]
    fn test_tentacle_mine_hits_ship_wider_than_it_can_be_destroyed() {
        // Missile at the tentacle: silhouette overlap but no destroy
        let (mut mine, _) = planted_mine(MineKind::Tentacle, 50, 8);
        let mut out = Outbox::default();
        mine.dispatch(
            &mut out,
            &GameEvent::MissileImage { x: 48, y: 8, bmp: BitmapId::Missile },
        );
        assert_eq!(mine.state(), MineState::Planted, "tentacle graze must not destroy");
        assert!(out.posts().is_empty());

        // Missile dead center: destroyed, 45 points
        mine.dispatch(
            &mut out,
            &GameEvent::MissileImage { x: 49, y: 9, bmp: BitmapId::Missile },
        );
        assert_eq!(mine.state(), MineState::Exploding);
        assert_eq!(
            out.posts(),
            &[(Recipient::Missile, GameEvent::DestroyedMine { score: 45 })]
        );
    }

    #[test]
    fn test_recycle_from_any_used_substate_notifies_tunnel() {
        for explode_first in [false, true] {
            let (mut mine, _) = planted_mine(MineKind::Tentacle, 50, 8);
            if explode_first {
                let mut out = Outbox::default();
                mine.dispatch(
                    &mut out,
                    &GameEvent::MissileImage { x: 49, y: 9, bmp: BitmapId::Missile },
                );
                assert_eq!(mine.state(), MineState::Exploding);
            }
            let mut out = Outbox::default();
            mine.dispatch(&mut out, &GameEvent::MineRecycle);
            assert_eq!(mine.state(), MineState::Unused);
            assert_eq!(out.posts(), &[(Recipient::Tunnel, GameEvent::MineDisabled { id: 3 })]);
        }
    }

    #[test]
    fn test_plant_at_right_edge() {
        // Mines always enter at the right edge, partially off-screen
        let (mut mine, _) = planted_mine(MineKind::Standard, SCREEN_WIDTH, 8);
        let mut out = Outbox::default();
        mine.dispatch(&mut out, &GameEvent::TimeTick);
        assert_eq!(mine.state(), MineState::Planted);
        assert_eq!(mine.pos().0, SCREEN_WIDTH - SPEED_X);
    }
}
