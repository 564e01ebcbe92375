//! The Tunnel orchestrator
//!
//! Owns the terrain, the frame buffer, the mine pool and the top-level
//! game mode machine:
//!
//! ```text
//! Active -> { Demo, Playing, GameOver, ScreenSaver { Hide, Show } }
//! Final (teardown, reached from Active on quit)
//! ```
//!
//! The Tunnel is the sole renderer: every entity that wants pixels on
//! screen sends it an image event; the Tunnel composites those into the
//! frame, runs the wall-collision test for ship/missile sprites, and
//! relays the same events to the planted mines so they can test their
//! own collisions.

use crate::config::GameConfig;
use crate::consts::{MINES_MAX, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::Display;
use crate::rng::SuperDuperRng;
use crate::sim::bitmap::{BitGrid, BitmapId};
use crate::sim::events::GameEvent;
use crate::sim::hsm::{Reaction, StateId, transition_path};
use crate::sim::mine::{Mine, MineKind};
use crate::sim::terrain::Terrain;
use crate::sim::world::{Outbox, Recipient, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Active,
    Demo,
    Playing,
    GameOver,
    ScreenSaver,
    SaverHide,
    SaverShow,
    /// Teardown: blank the screen and stop the world
    Final,
}

impl StateId for TunnelState {
    fn parent(self) -> Option<Self> {
        match self {
            TunnelState::Demo
            | TunnelState::Playing
            | TunnelState::GameOver
            | TunnelState::ScreenSaver => Some(TunnelState::Active),
            TunnelState::SaverHide | TunnelState::SaverShow => Some(TunnelState::ScreenSaver),
            TunnelState::Active | TunnelState::Final => None,
        }
    }
}

/// One pool slot: both mine variants pre-built, at most one active
#[derive(Debug, Clone)]
struct MineSlot {
    standard: Mine,
    tentacle: Mine,
    /// Which variant currently owns the slot, if either
    active: Option<MineKind>,
}

impl MineSlot {
    fn new(id: u8) -> Self {
        Self {
            standard: Mine::new(MineKind::Standard, id),
            tentacle: Mine::new(MineKind::Tentacle, id),
            active: None,
        }
    }

    fn mine_mut(&mut self, kind: MineKind) -> &mut Mine {
        match kind {
            MineKind::Standard => &mut self.standard,
            MineKind::Tentacle => &mut self.tentacle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tunnel {
    state: TunnelState,
    config: GameConfig,
    rng: SuperDuperRng,
    terrain: Terrain,
    /// Per-tick composited frame: walls plus every entity image
    frame: BitGrid,
    slots: [MineSlot; MINES_MAX],
    /// Position of the most recently planted mine, used to keep mines
    /// spaced out and to stop walls growing over a fresh mine
    last_mine_x: u8,
    last_mine_y: u8,
    blink_ctr: u8,
}

impl Tunnel {
    pub fn new(config: GameConfig, seed: u32) -> Self {
        Self {
            state: TunnelState::Active,
            config,
            rng: SuperDuperRng::new(seed),
            terrain: Terrain::new(),
            frame: BitGrid::new(),
            slots: std::array::from_fn(|id| MineSlot::new(id as u8)),
            last_mine_x: 0,
            last_mine_y: 0,
            blink_ctr: 0,
        }
    }

    /// Top-most initial transition: start in demo mode
    pub fn start(&mut self, display: &mut dyn Display, out: &mut Outbox) {
        self.transition_to(TunnelState::Demo, display, out);
    }

    pub fn state(&self) -> TunnelState {
        self.state
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn frame(&self) -> &BitGrid {
        &self.frame
    }

    /// Number of currently planted (or exploding) mines
    pub fn active_mines(&self) -> usize {
        self.slots.iter().filter(|s| s.active.is_some()).count()
    }

    pub fn dispatch(&mut self, display: &mut dyn Display, out: &mut Outbox, evt: &GameEvent) {
        let mut state = Some(self.state);
        while let Some(cur) = state {
            match self.handle(cur, evt, display, out) {
                Reaction::Handled => return,
                Reaction::Ignored => state = cur.parent(),
                Reaction::Transition(target) => {
                    self.transition_to(target, display, out);
                    return;
                }
            }
        }
    }

    fn transition_to(&mut self, target: TunnelState, display: &mut dyn Display, out: &mut Outbox) {
        log::debug!("tunnel: {:?} -> {:?}", self.state, target);
        let (exits, entries) = transition_path(self.state, target);
        for s in exits {
            self.on_exit(s, display, out);
        }
        for s in entries {
            self.on_entry(s, display, out);
        }
        self.state = target;
        // Drill into initial sub-states (screen saver starts hidden)
        while let Some(sub) = initial_substate(self.state) {
            self.on_entry(sub, display, out);
            self.state = sub;
        }
    }

    fn on_entry(&mut self, state: TunnelState, display: &mut dyn Display, out: &mut Outbox) {
        match state {
            TunnelState::Demo => {
                self.last_mine_x = 0;
                self.last_mine_y = 0;
                self.terrain.reset();
                self.blink_ctr = 0;
                out.arm_periodic(TimerId::Blink, self.config.blink_ticks());
                out.arm_one_shot(TimerId::Screen, self.config.demo_timeout_ticks());
            }
            TunnelState::Playing => {
                self.terrain.minimal_gap = self.config.minimal_gap_for_score(0);
                self.terrain.walls.clear();
                out.post(Recipient::Ship, GameEvent::TakeOff);
            }
            TunnelState::GameOver => {
                self.blink_ctr = 0;
                out.arm_periodic(TimerId::Blink, self.config.blink_ticks());
                out.arm_one_shot(TimerId::Screen, self.config.game_over_timeout_ticks());
                display.draw_string(banner_x("Game Over"), 0, "Game Over");
            }
            TunnelState::SaverHide => {
                display.power_off();
                out.arm_one_shot(TimerId::Screen, self.config.saver_hide_ticks());
            }
            TunnelState::SaverShow => {
                // One draw positions the prompt both ways
                let rnd = self.rng.next();
                self.frame.clear();
                let w = BitmapId::PressButton.width();
                self.frame.or_bitmap_at(
                    BitmapId::PressButton,
                    (rnd % u32::from(SCREEN_WIDTH - w)) as u8,
                    (rnd % u32::from(SCREEN_HEIGHT - 8)) as i8,
                );
                display.draw_frame(&self.frame);
                out.arm_one_shot(TimerId::Screen, self.config.saver_show_ticks());
            }
            TunnelState::Final => {
                self.frame.clear();
                display.draw_frame(&self.frame);
                out.request_stop();
            }
            TunnelState::Active | TunnelState::ScreenSaver => {}
        }
    }

    fn on_exit(&mut self, state: TunnelState, display: &mut dyn Display, out: &mut Outbox) {
        match state {
            TunnelState::Demo => {
                out.disarm(TimerId::Blink);
                out.disarm(TimerId::Screen);
            }
            TunnelState::Playing => {
                // Reset the whole pool before any other mode runs
                self.dispatch_to_all_mines(out, &GameEvent::MineRecycle);
            }
            TunnelState::GameOver => {
                out.disarm(TimerId::Blink);
                out.disarm(TimerId::Screen);
                display.update_score(0);
            }
            TunnelState::SaverHide => {
                out.disarm(TimerId::Screen);
                display.power_on();
            }
            TunnelState::SaverShow => {
                out.disarm(TimerId::Screen);
                self.frame.clear();
                display.draw_frame(&self.frame);
            }
            TunnelState::Active | TunnelState::ScreenSaver | TunnelState::Final => {}
        }
    }

    fn handle(
        &mut self,
        state: TunnelState,
        evt: &GameEvent,
        display: &mut dyn Display,
        out: &mut Outbox,
    ) -> Reaction<TunnelState> {
        match (state, evt) {
            // === Cross-cutting, any mode ===
            (TunnelState::Active, GameEvent::MineDisabled { id }) => {
                let slot = &mut self.slots[usize::from(*id)];
                assert!(slot.active.is_some(), "mine slot {id} disabled twice");
                slot.active = None;
                Reaction::Handled
            }
            (TunnelState::Active, GameEvent::PlayerQuit) => {
                Reaction::Transition(TunnelState::Final)
            }

            // === Demo (attract mode) ===
            (TunnelState::Demo, GameEvent::BlinkTimeout) => {
                self.blink_ctr ^= 1;
                Reaction::Handled
            }
            (TunnelState::Demo, GameEvent::ScreenTimeout) => {
                Reaction::Transition(TunnelState::ScreenSaver)
            }
            (TunnelState::Demo, GameEvent::TimeTick) => {
                self.advance_terrain();
                if self.blink_ctr != 0 {
                    let w = BitmapId::PressButton.width();
                    self.frame.or_bitmap_at(
                        BitmapId::PressButton,
                        (SCREEN_WIDTH - w) / 2,
                        ((SCREEN_HEIGHT - 8) / 2) as i8,
                    );
                }
                display.draw_frame(&self.frame);
                Reaction::Handled
            }
            (TunnelState::Demo, GameEvent::PlayerTrigger) => {
                Reaction::Transition(TunnelState::Playing)
            }

            // === Playing ===
            (TunnelState::Playing, GameEvent::TimeTick) => {
                // Show what last tick composited, then start the next frame
                display.draw_frame(&self.frame);
                self.advance_terrain();
                self.plant_mine(out);
                self.dispatch_to_all_mines(out, evt);
                Reaction::Handled
            }
            (
                TunnelState::Playing,
                GameEvent::ShipImage { x, y, bmp } | GameEvent::MissileImage { x, y, bmp },
            ) => {
                if self.terrain.is_wall_hit(*bmp, *x, *y) {
                    let target = if matches!(evt, GameEvent::ShipImage { .. }) {
                        Recipient::Ship
                    } else {
                        Recipient::Missile
                    };
                    out.post(target, GameEvent::HitWall);
                }
                self.frame.or_bitmap_at(*bmp, *x, *y);
                // Let the mines test their own collisions
                self.dispatch_to_all_mines(out, evt);
                Reaction::Handled
            }
            (
                TunnelState::Playing,
                GameEvent::MineImage { x, y, bmp } | GameEvent::Explosion { x, y, bmp },
            ) => {
                // Composite only: mines cannot hit other mines
                self.frame.or_bitmap_at(*bmp, *x, *y);
                Reaction::Handled
            }
            (TunnelState::Playing, GameEvent::Score { score }) => {
                display.update_score(*score);
                // The tunnel narrows as the score climbs
                self.terrain.minimal_gap = self.config.minimal_gap_for_score(*score);
                Reaction::Handled
            }
            (TunnelState::Playing, GameEvent::GameOver { score }) => {
                display.update_score(*score);
                self.frame.clear();
                display.draw_frame(&self.frame);
                display.draw_string(banner_x("Score:0000"), 1, "Score:");
                display.draw_string(
                    banner_x("Score:0000") + 6 * 6,
                    1,
                    &format!("{score:04}"),
                );
                Reaction::Transition(TunnelState::GameOver)
            }

            // === Game over ===
            (TunnelState::GameOver, GameEvent::BlinkTimeout) => {
                self.blink_ctr ^= 1;
                let text = if self.blink_ctr == 0 { "Game Over" } else { "         " };
                display.draw_string(banner_x("Game Over"), 0, text);
                Reaction::Handled
            }
            (TunnelState::GameOver, GameEvent::ScreenTimeout) => {
                Reaction::Transition(TunnelState::Demo)
            }

            // === Screen saver ===
            (TunnelState::ScreenSaver, GameEvent::PlayerTrigger) => {
                Reaction::Transition(TunnelState::Demo)
            }
            (TunnelState::SaverHide, GameEvent::ScreenTimeout) => {
                Reaction::Transition(TunnelState::SaverShow)
            }
            (TunnelState::SaverShow, GameEvent::ScreenTimeout) => {
                Reaction::Transition(TunnelState::SaverHide)
            }

            _ => Reaction::Ignored,
        }
    }

    /// Advance the corridor and rebase the frame on the new walls
    fn advance_terrain(&mut self) {
        self.terrain
            .advance(&mut self.rng, self.last_mine_x, self.last_mine_y);
        self.frame.copy_from(&self.terrain.walls);
    }

    /// Maybe plant a mine at the right edge (~3% per tick, spaced out)
    fn plant_mine(&mut self, out: &mut Outbox) {
        let rnd = self.rng.next_byte();

        if self.last_mine_x > 0 {
            self.last_mine_x -= 1; // track the scroll
        }

        let far_enough = self.last_mine_x + self.config.mine_dist_min < SCREEN_WIDTH;
        if !far_enough || rnd >= self.config.mine_plant_threshold {
            return;
        }
        // Out of free slots is not an error: just skip this tick
        let Some(idx) = self.slots.iter().position(|s| s.active.is_none()) else {
            return;
        };

        let rnd = self.rng.next() & 0xFFFF;
        let kind = if rnd & 1 == 0 {
            MineKind::Standard
        } else {
            MineKind::Tentacle
        };

        // New mines always enter at the right edge, bounded 2 px off
        // both walls
        self.last_mine_x = SCREEN_WIDTH;
        let span = u32::from(self.terrain.gap().saturating_sub(4).max(1));
        self.last_mine_y = self.terrain.top + 2 + (rnd % span) as u8;

        log::debug!(
            "tunnel: planting {kind:?} mine in slot {idx} at y={}",
            self.last_mine_y
        );
        self.slots[idx].active = Some(kind);
        self.slots[idx].mine_mut(kind).dispatch(
            out,
            &GameEvent::MinePlant {
                x: self.last_mine_x,
                y: self.last_mine_y,
            },
        );
    }

    /// Relay an event to every active mine, in slot order
    fn dispatch_to_all_mines(&mut self, out: &mut Outbox, evt: &GameEvent) {
        for slot in &mut self.slots {
            if let Some(kind) = slot.active {
                slot.mine_mut(kind).dispatch(out, evt);
            }
        }
    }
}

/// Initial sub-state table (QHsm-style nested initial transitions)
fn initial_substate(state: TunnelState) -> Option<TunnelState> {
    match state {
        TunnelState::ScreenSaver => Some(TunnelState::SaverHide),
        _ => None,
    }
}

/// Centered x position for a 6-px-per-character banner string
fn banner_x(text: &str) -> u8 {
    (SCREEN_WIDTH - 6 * text.len() as u8) / 2
}
