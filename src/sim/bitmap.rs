//! Sprite catalog and 1-bit collision primitives
//!
//! Every sprite is a vertical-strip bitmap: one byte per column, bit 0 is
//! the top row, rows grow downward. A sprite placed at `(x, y)` occupies
//! column word `bits[col] << y` in screen space, which makes both
//! collision predicates a per-column shift-and-AND:
//! - [`overlaps`] between two sprites at integer offsets
//! - [`BitGrid::hits_bitmap`] between a sprite and the wall grid
//!
//! Sprites that extend past the right screen edge are clipped to the
//! visible width before either test (no wraparound).

use crate::consts::{ROW_MASK, SCREEN_WIDTH};

/// Identifies a sprite in the static catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BitmapId {
    /// "Press Button" prompt text
    PressButton,
    Ship,
    Missile,
    /// Type-1 mine (plus shape)
    Mine1,
    /// Type-2 mine (four tentacles)
    Mine2,
    /// The narrow center of a type-2 mine: the only part a missile can
    /// destroy, while any tentacle can hit the Ship
    Mine2Core,
    Explosion0,
    Explosion1,
    Explosion2,
    Explosion3,
}

impl BitmapId {
    /// All catalog entries, in catalog order
    pub const ALL: [BitmapId; 10] = [
        BitmapId::PressButton,
        BitmapId::Ship,
        BitmapId::Missile,
        BitmapId::Mine1,
        BitmapId::Mine2,
        BitmapId::Mine2Core,
        BitmapId::Explosion0,
        BitmapId::Explosion1,
        BitmapId::Explosion2,
        BitmapId::Explosion3,
    ];

    /// Explosion animation frame for a 0..=15 counter (4 ticks per frame)
    pub fn explosion_frame(counter: u8) -> Self {
        match counter >> 2 {
            0 => BitmapId::Explosion0,
            1 => BitmapId::Explosion1,
            2 => BitmapId::Explosion2,
            _ => BitmapId::Explosion3,
        }
    }

    /// The sprite's column bytes
    pub fn bits(self) -> &'static [u8] {
        match self {
            BitmapId::PressButton => PRESS_BUTTON_BITS,
            BitmapId::Ship => SHIP_BITS,
            BitmapId::Missile => MISSILE_BITS,
            BitmapId::Mine1 => MINE1_BITS,
            BitmapId::Mine2 => MINE2_BITS,
            BitmapId::Mine2Core => MINE2_CORE_BITS,
            BitmapId::Explosion0 => EXPLOSION0_BITS,
            BitmapId::Explosion1 => EXPLOSION1_BITS,
            BitmapId::Explosion2 => EXPLOSION2_BITS,
            BitmapId::Explosion3 => EXPLOSION3_BITS,
        }
    }

    /// Width in columns
    pub fn width(self) -> u8 {
        self.bits().len() as u8
    }
}

/* The "Press Button" text:

   xxx.........................xxx........x...x...........
   x..x........................x..x.......x...x...........
   x..x.x.xx..xx...xxx..xxx....x..x.x..x.xxx.xxx..xx..xxx.
   xxx..xx...x..x.x....x.......xxx..x..x..x...x..x..x.x..x
   x....x....xxxx..xx...xx.....x..x.x..x..x...x..x..x.x..x
   x....x....x.......x....x....x..x.x..x..x...x..x..x.x..x
   x....x.....xxx.xxx..xxx.....xxx...xxx...x...x..xx..x..x
   .......................................................
*/
const PRESS_BUTTON_BITS: &[u8] = &[
    0x7F, 0x09, 0x09, 0x06, 0x00, 0x7C, 0x08, 0x04, 0x04, 0x00, 0x38, 0x54, 0x54, 0x58, 0x00,
    0x48, 0x54, 0x54, 0x24, 0x00, 0x48, 0x54, 0x54, 0x24, 0x00, 0x00, 0x00, 0x00, 0x7F, 0x49,
    0x49, 0x36, 0x00, 0x3C, 0x40, 0x40, 0x7C, 0x00, 0x04, 0x3F, 0x44, 0x00, 0x04, 0x3F, 0x44,
    0x00, 0x38, 0x44, 0x44, 0x38, 0x00, 0x7C, 0x04, 0x04, 0x78,
];

/* Ship:        Missile:
   x....
   xxx..        xxx
   xxxxx
*/
const SHIP_BITS: &[u8] = &[0x07, 0x06, 0x06, 0x04, 0x04];
const MISSILE_BITS: &[u8] = &[0x01, 0x01, 0x01];

/* Mine type-1:   Mine type-2:   Mine type-2 center:
   .x.            x..x           ....
   xxx            .xx.           .xx.
   .x.            .xx.           .xx.
                  x..x           ....
*/
const MINE1_BITS: &[u8] = &[0x02, 0x07, 0x02];
const MINE2_BITS: &[u8] = &[0x09, 0x06, 0x06, 0x09];
const MINE2_CORE_BITS: &[u8] = &[0x00, 0x06, 0x06, 0x00];

// Explosion stages 0..3, growing outward from a 4-px diamond
const EXPLOSION0_BITS: &[u8] = &[0x00, 0x00, 0x08, 0x14, 0x08, 0x00, 0x00];
const EXPLOSION1_BITS: &[u8] = &[0x00, 0x00, 0x14, 0x08, 0x14, 0x00, 0x00];
const EXPLOSION2_BITS: &[u8] = &[0x00, 0x22, 0x14, 0x08, 0x14, 0x22, 0x00];
const EXPLOSION3_BITS: &[u8] = &[0x49, 0x2A, 0x14, 0x6B, 0x14, 0x2A, 0x49];

/// A sprite column byte shifted into screen space at vertical offset `y`
/// (negative offsets shift off the top edge)
#[inline]
fn shift_column(bits: u8, y: i8) -> u32 {
    let bits = u32::from(bits);
    if y >= 0 {
        bits.checked_shl(y as u32).unwrap_or(0)
    } else {
        bits.checked_shr((-i32::from(y)) as u32).unwrap_or(0)
    }
}

/// Effective width of a sprite placed at column `x`, clipped to the
/// visible screen
#[inline]
fn clipped_width(id: BitmapId, x: u8) -> u8 {
    id.width().min(SCREEN_WIDTH.saturating_sub(x))
}

/// Do two sprites at integer positions share any lit pixel?
///
/// Only the horizontally overlapping column range is compared; each
/// column pair is tested with one AND after shifting both sprites into
/// screen rows. Symmetric in its two arguments.
pub fn overlaps(a: BitmapId, xa: u8, ya: i8, b: BitmapId, xb: u8, yb: i8) -> bool {
    let (left, xl, yl, right, xr, yr) = if xa <= xb {
        (a, xa, ya, b, xb, yb)
    } else {
        (b, xb, yb, a, xa, ya)
    };

    let left_w = clipped_width(left, xl);
    // No shared columns unless the left sprite reaches the right one
    if u16::from(xl) + u16::from(left_w) <= u16::from(xr) {
        return false;
    }

    let x0 = xr - xl; // first overlapping column, in left-sprite space
    let w = (left_w - x0).min(clipped_width(right, xr));
    for col in 0..w {
        let left_bits = shift_column(left.bits()[usize::from(x0 + col)], yl);
        let right_bits = shift_column(right.bits()[usize::from(col)], yr);
        if left_bits & right_bits != 0 {
            return true;
        }
    }
    false
}

/// One `u32` column word per horizontal pixel; bit `n` of column `x` is
/// the pixel at `(x, n)`.
///
/// Used both for the static tunnel walls and for the per-tick composited
/// frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    cols: [u32; SCREEN_WIDTH as usize],
}

impl Default for BitGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BitGrid {
    pub const fn new() -> Self {
        Self {
            cols: [0; SCREEN_WIDTH as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cols.fill(0);
    }

    /// Raw column word at `x`
    pub fn col(&self, x: u8) -> u32 {
        self.cols[usize::from(x)]
    }

    /// Is the pixel at `(x, y)` lit?
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        self.col(x) & (1 << y) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.cols.iter().all(|&c| c == 0)
    }

    /// Scroll the grid `n` columns to the left, filling every vacated
    /// rightmost column with `new_col`
    pub fn scroll_left(&mut self, n: u8, new_col: u32) {
        let n = usize::from(n).min(self.cols.len());
        self.cols.copy_within(n.., 0);
        let len = self.cols.len();
        self.cols[len - n..].fill(new_col & ROW_MASK);
    }

    /// Overwrite this grid with another (walls -> frame copy each tick)
    pub fn copy_from(&mut self, other: &BitGrid) {
        self.cols = other.cols;
    }

    /// OR a sprite into the grid at `(x, y)`, clipped to the screen
    pub fn or_bitmap_at(&mut self, id: BitmapId, x: u8, y: i8) {
        let w = clipped_width(id, x);
        for col in 0..w {
            let word = shift_column(id.bits()[usize::from(col)], y) & ROW_MASK;
            self.cols[usize::from(x + col)] |= word;
        }
    }

    /// Does a sprite at `(x, y)` touch any lit pixel of this grid?
    pub fn hits_bitmap(&self, id: BitmapId, x: u8, y: i8) -> bool {
        let w = clipped_width(id, x);
        (0..w).any(|col| {
            let word = shift_column(id.bits()[usize::from(col)], y);
            self.cols[usize::from(x + col)] & word != 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_HEIGHT;
    use proptest::prelude::*;

    #[test]
    fn test_identity_position_overlap() {
        // Any two sprites sharing row/col 0 overlap at the same position
        for &a in &BitmapId::ALL {
            for &b in &BitmapId::ALL {
                if a.bits()[0] & b.bits()[0] != 0 {
                    assert!(overlaps(a, 5, 5, b, 5, 5), "{a:?} vs {b:?}");
                }
            }
        }
        assert!(overlaps(BitmapId::Mine1, 5, 5, BitmapId::Mine1, 5, 5));
    }

    #[test]
    fn test_disjoint_columns_never_overlap() {
        // Mine1 is 3 wide: columns 5..8 cannot reach column 8
        assert!(!overlaps(BitmapId::Mine1, 5, 0, BitmapId::Mine1, 8, 0));
        assert!(!overlaps(BitmapId::Mine1, 8, 0, BitmapId::Mine1, 5, 0));
    }

    #[test]
    fn test_vertical_separation() {
        // Missile is a single row; 8 rows below a mine there is nothing
        assert!(!overlaps(BitmapId::Missile, 5, 12, BitmapId::Mine1, 5, 0));
        assert!(overlaps(BitmapId::Missile, 5, 1, BitmapId::Mine1, 5, 0));
    }

    #[test]
    fn test_mine2_core_is_narrower_than_its_silhouette() {
        // A missile grazing the top-left tentacle of a type-2 mine hits
        // the full silhouette but not the destroy core
        let (mx, my) = (20u8, 4i8);
        assert!(overlaps(BitmapId::Mine2, mx, my, BitmapId::Missile, 18, my));
        assert!(!overlaps(BitmapId::Mine2Core, mx, my, BitmapId::Missile, 18, my));
        // Dead center hits both
        assert!(overlaps(BitmapId::Mine2, mx, my, BitmapId::Missile, mx, my + 1));
        assert!(overlaps(BitmapId::Mine2Core, mx, my, BitmapId::Missile, mx, my + 1));
    }

    #[test]
    fn test_right_edge_clipping() {
        // A sprite hanging off the right edge only collides with its
        // visible columns
        let x = SCREEN_WIDTH - 1;
        // Mine2's column 0 (x..x) vs Missile row: row 1 of column 0 is clear
        assert!(!overlaps(BitmapId::Mine2, x, 0, BitmapId::Missile, x, 1));
        // Mine1's column 0 has bit 1 set
        assert!(overlaps(BitmapId::Mine1, x, 0, BitmapId::Missile, x, 1));
    }

    #[test]
    fn test_grid_scroll_left() {
        let mut grid = BitGrid::new();
        grid.or_bitmap_at(BitmapId::Missile, 10, 3);
        assert!(grid.pixel(10, 3));
        grid.scroll_left(2, 0x8001);
        assert!(grid.pixel(8, 3));
        assert!(!grid.pixel(10, 3));
        for x in [SCREEN_WIDTH - 2, SCREEN_WIDTH - 1] {
            assert_eq!(grid.col(x), 0x8001);
        }
    }

    #[test]
    fn test_negative_y_clips_top() {
        let mut grid = BitGrid::new();
        // Explosion sprite shifted 2 rows above the screen: row 3 bits
        // land on row 1, rows shifted past bit 0 vanish
        grid.or_bitmap_at(BitmapId::Explosion0, 0, -2);
        assert!(grid.pixel(2, 1));
        assert!(grid.pixel(3, 0));
        assert!(grid.pixel(3, 2));
        assert!(!grid.pixel(2, 3));
    }

    #[test]
    fn test_wall_hit_matches_composited_walls() {
        let mut walls = BitGrid::new();
        // Solid 3-px top wall everywhere
        for _ in 0..SCREEN_WIDTH {
            walls.scroll_left(1, 0b111);
        }
        assert!(walls.hits_bitmap(BitmapId::Ship, 40, 1));
        assert!(!walls.hits_bitmap(BitmapId::Ship, 40, 5));
        // Missile flying in the open gap
        assert!(!walls.hits_bitmap(BitmapId::Missile, 40, 8));
    }

    fn any_bitmap() -> impl Strategy<Value = BitmapId> {
        (0..BitmapId::ALL.len()).prop_map(|i| BitmapId::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            a in any_bitmap(),
            b in any_bitmap(),
            xa in 0..SCREEN_WIDTH,
            xb in 0..SCREEN_WIDTH,
            ya in -8i8..(SCREEN_HEIGHT as i8),
            yb in -8i8..(SCREEN_HEIGHT as i8),
        ) {
            prop_assert_eq!(
                overlaps(a, xa, ya, b, xb, yb),
                overlaps(b, xb, yb, a, xa, ya)
            );
        }

        #[test]
        fn prop_overlap_agrees_with_grid_compositing(
            a in any_bitmap(),
            b in any_bitmap(),
            xa in 0..SCREEN_WIDTH,
            xb in 0..SCREEN_WIDTH,
            ya in 0..(SCREEN_HEIGHT as i8 - 7),
            yb in 0..(SCREEN_HEIGHT as i8 - 7),
        ) {
            // Compositing one sprite into an empty grid and testing the
            // other against it must agree with the direct predicate
            // (both sprites fully on-screen vertically).
            let mut grid = BitGrid::new();
            grid.or_bitmap_at(a, xa, ya);
            prop_assert_eq!(
                grid.hits_bitmap(b, xb, yb),
                overlaps(a, xa, ya, b, xb, yb)
            );
        }
    }
}
