//! Procedural tunnel terrain
//!
//! A scrolling two-wall corridor advanced one step per tick by a
//! constrained random walk: each wall independently shrinks or grows by
//! one pixel with ~18.75% probability, growth gated so the gap never
//! drops below `minimal_gap` and so the wall cannot seal in a freshly
//! planted mine. The updated thickness fills the vacated rightmost
//! column(s) after the scroll.

use crate::consts::{ROW_MASK, SCREEN_HEIGHT, SCREEN_WIDTH, SPEED_X};
use crate::rng::SuperDuperRng;
use crate::sim::bitmap::{BitGrid, BitmapId};

/// Each 8-bit draw decides both walls at once: values below `THRESH_LO`
/// act on the top wall, values above `THRESH_HI` on the bottom wall
/// (~18.75% each, never both).
const THRESH_LO: u8 = 48;
const THRESH_HI: u8 = 208;

/// A column word with `top` bits set from the top edge and `bottom` bits
/// set from the bottom edge
fn wall_column(top: u8, bottom: u8) -> u32 {
    let top_bits = !(u32::MAX.checked_shl(u32::from(top)).unwrap_or(0));
    let bottom_bits = u32::MAX
        .checked_shl(u32::from(SCREEN_HEIGHT - bottom))
        .unwrap_or(0);
    (top_bits | bottom_bits) & ROW_MASK
}

/// The tunnel walls and their growth state
#[derive(Debug, Clone)]
pub struct Terrain {
    /// Solid wall pixels only (mines/ship/missile are composited
    /// separately into the frame)
    pub walls: BitGrid,
    /// Top wall thickness in pixels
    pub top: u8,
    /// Bottom wall thickness in pixels
    pub bottom: u8,
    /// Smallest corridor the walls may close to; shrinks as the score
    /// grows
    pub minimal_gap: u8,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    pub fn new() -> Self {
        Self {
            walls: BitGrid::new(),
            top: 0,
            bottom: 0,
            minimal_gap: SCREEN_HEIGHT - 3,
        }
    }

    /// Flatten the walls and restore the widest gap (demo entry)
    pub fn reset(&mut self) {
        self.walls.clear();
        self.top = 0;
        self.bottom = 0;
        self.minimal_gap = SCREEN_HEIGHT - 3;
    }

    /// Current corridor height
    pub fn gap(&self) -> u8 {
        SCREEN_HEIGHT - self.top - self.bottom
    }

    /// Advance the corridor one game step to the left
    ///
    /// `last_mine_x`/`last_mine_y` is the most recently planted mine;
    /// wall growth near it is suppressed unless the mine is far enough
    /// left of the entry edge or vertically clear of the grown wall.
    pub fn advance(&mut self, rng: &mut SuperDuperRng, last_mine_x: u8, last_mine_y: u8) {
        let rnd = rng.next_byte();

        // Shrink each wall 18.75% of the time, independently (the two
        // ranges of one draw cannot both fire)
        if rnd < THRESH_LO && self.top > 0 {
            self.top -= 1;
        }
        if rnd > THRESH_HI && self.bottom > 0 {
            self.bottom -= 1;
        }

        let rnd = rng.next_byte();
        let mine_clear_of_edge = last_mine_x < SCREEN_WIDTH - 5;

        if rnd < THRESH_LO
            && self.gap() > self.minimal_gap
            && (mine_clear_of_edge || last_mine_y > self.top + 1)
        {
            self.top += 1;
        }
        if rnd > THRESH_HI
            && self.gap() > self.minimal_gap
            && (mine_clear_of_edge || last_mine_y + 1 < SCREEN_HEIGHT - self.bottom)
        {
            self.bottom += 1;
        }

        self.walls
            .scroll_left(SPEED_X, wall_column(self.top, self.bottom));

        debug_assert!(self.gap() >= self.minimal_gap.min(SCREEN_HEIGHT - 3));
    }

    /// Does a sprite at `(x, y)` touch a wall pixel?
    pub fn is_wall_hit(&self, bmp: BitmapId, x: u8, y: i8) -> bool {
        self.walls.hits_bitmap(bmp, x, y)
    }
}
