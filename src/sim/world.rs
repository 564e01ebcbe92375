//! Event plumbing and the per-tick driver
//!
//! Entities never call each other. During a dispatch they record
//! everything they want to happen in an [`Outbox`]: events posted to
//! other entities, timer arm/disarm requests, and the stop flag. The
//! [`GameWorld`] applies the outbox after each dispatch, queueing the
//! posted events into per-entity mailboxes.
//!
//! Each [`GameWorld::tick`] runs to completion: timers fire, player
//! input and the shared time tick are queued, then the mailboxes drain
//! until empty. The missile is served before the ship, and the ship
//! before the tunnel, so a hit registered mid-tick lands before the
//! frame it belongs to is composited.

use std::collections::VecDeque;

use crate::config::GameConfig;
use crate::display::Display;
use crate::sim::events::GameEvent;
use crate::sim::missile::Missile;
use crate::sim::ship::Ship;
use crate::sim::tunnel::Tunnel;

/// Delivery priority is the declaration order: missile first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Missile,
    Ship,
    Tunnel,
}

const RECIPIENTS: [Recipient; 3] = [Recipient::Missile, Recipient::Ship, Recipient::Tunnel];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Periodic prompt/banner blink
    Blink,
    /// Mode timeout: demo idle, game-over linger, saver phases
    Screen,
}

impl TimerId {
    fn index(self) -> usize {
        match self {
            TimerId::Blink => 0,
            TimerId::Screen => 1,
        }
    }

    fn expiry_event(self) -> GameEvent {
        match self {
            TimerId::Blink => GameEvent::BlinkTimeout,
            TimerId::Screen => GameEvent::ScreenTimeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCmd {
    ArmOneShot(TimerId, u32),
    ArmPeriodic(TimerId, u32),
    Disarm(TimerId),
}

/// Deferred effects of one dispatch
#[derive(Debug, Default)]
pub struct Outbox {
    posts: Vec<(Recipient, GameEvent)>,
    timer_cmds: Vec<TimerCmd>,
    stop: bool,
}

impl Outbox {
    pub fn post(&mut self, to: Recipient, evt: GameEvent) {
        self.posts.push((to, evt));
    }

    pub fn arm_one_shot(&mut self, id: TimerId, ticks: u32) {
        self.timer_cmds.push(TimerCmd::ArmOneShot(id, ticks));
    }

    pub fn arm_periodic(&mut self, id: TimerId, ticks: u32) {
        self.timer_cmds.push(TimerCmd::ArmPeriodic(id, ticks));
    }

    pub fn disarm(&mut self, id: TimerId) {
        self.timer_cmds.push(TimerCmd::Disarm(id));
    }

    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    pub fn posts(&self) -> &[(Recipient, GameEvent)] {
        &self.posts
    }

    pub fn timer_cmds(&self) -> &[TimerCmd] {
        &self.timer_cmds
    }

    pub fn stop_requested(&self) -> bool {
        self.stop
    }
}

/// Player input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Fire button edge; also starts/restarts the game
    pub trigger: bool,
    pub quit: bool,
    /// Absolute ship position request (both axes, original wheel input)
    pub move_to: Option<(u8, u8)>,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    remaining: u32,
    /// `Some` reloads on expiry; `None` is one-shot
    period: Option<u32>,
}

/// The whole game: three actors, their mailboxes, and the tick clock
pub struct GameWorld<D: Display> {
    display: D,
    tunnel: Tunnel,
    ship: Ship,
    missile: Missile,
    mailboxes: [VecDeque<GameEvent>; 3],
    timers: [Option<Timer>; 2],
    stopped: bool,
}

impl<D: Display> GameWorld<D> {
    pub fn new(config: GameConfig, seed: u32, display: D) -> Self {
        let mut world = Self {
            display,
            tunnel: Tunnel::new(config, seed),
            ship: Ship::new(),
            missile: Missile::new(),
            mailboxes: Default::default(),
            timers: [None, None],
            stopped: false,
        };
        let mut out = Outbox::default();
        world.tunnel.start(&mut world.display, &mut out);
        world.apply(out);
        world.drain();
        world
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn tunnel(&self) -> &Tunnel {
        &self.tunnel
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn missile(&self) -> &Missile {
        &self.missile
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Advance the game by one clock tick
    pub fn tick(&mut self, input: TickInput) {
        if self.stopped {
            return;
        }

        self.advance_timers();

        if let Some((x, y)) = input.move_to {
            self.enqueue(Recipient::Ship, GameEvent::PlayerShipMove { x, y });
        }
        if input.trigger {
            // Published: the ship fires, the tunnel starts a game
            self.enqueue(Recipient::Ship, GameEvent::PlayerTrigger);
            self.enqueue(Recipient::Tunnel, GameEvent::PlayerTrigger);
        }
        if input.quit {
            self.enqueue(Recipient::Tunnel, GameEvent::PlayerQuit);
        }

        for to in RECIPIENTS {
            self.enqueue(to, GameEvent::TimeTick);
        }

        self.drain();
    }

    fn enqueue(&mut self, to: Recipient, evt: GameEvent) {
        self.mailboxes[to as usize].push_back(evt);
    }

    fn advance_timers(&mut self) {
        for id in [TimerId::Blink, TimerId::Screen] {
            let Some(timer) = &mut self.timers[id.index()] else {
                continue;
            };
            timer.remaining -= 1;
            if timer.remaining > 0 {
                continue;
            }
            match timer.period {
                Some(period) => timer.remaining = period,
                None => self.timers[id.index()] = None,
            }
            self.enqueue(Recipient::Tunnel, id.expiry_event());
        }
    }

    /// Run-to-completion: pop from the highest-priority non-empty
    /// mailbox until all three are empty
    fn drain(&mut self) {
        loop {
            let Some((to, evt)) = RECIPIENTS
                .into_iter()
                .find_map(|to| self.mailboxes[to as usize].pop_front().map(|evt| (to, evt)))
            else {
                return;
            };

            let mut out = Outbox::default();
            match to {
                Recipient::Missile => self.missile.dispatch(&mut out, &evt),
                Recipient::Ship => self.ship.dispatch(&mut out, &evt),
                Recipient::Tunnel => self.tunnel.dispatch(&mut self.display, &mut out, &evt),
            }
            self.apply(out);
        }
    }

    fn apply(&mut self, out: Outbox) {
        for (to, evt) in out.posts {
            self.mailboxes[to as usize].push_back(evt);
        }
        for cmd in out.timer_cmds {
            match cmd {
                TimerCmd::ArmOneShot(id, ticks) => {
                    self.timers[id.index()] = Some(Timer {
                        remaining: ticks.max(1),
                        period: None,
                    });
                }
                TimerCmd::ArmPeriodic(id, ticks) => {
                    self.timers[id.index()] = Some(Timer {
                        remaining: ticks.max(1),
                        period: Some(ticks.max(1)),
                    });
                }
                TimerCmd::Disarm(id) => {
                    self.timers[id.index()] = None;
                }
            }
        }
        if out.stop && !self.stopped {
            log::info!("world stopped");
            self.stopped = true;
        }
    }
}
