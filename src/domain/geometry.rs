/// Grid ↔ pixel conversions and rectangle overlap.
///
/// Rectangles are inclusive-exclusive: a rect covers `x..x+w` and `y..y+h`,
/// so two rects that only share an edge do not overlap.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }

    /// Same rect moved horizontally by `dx`.
    pub fn shifted_x(&self, dx: i32) -> Rect {
        Rect { x: self.x + dx, ..*self }
    }
}

/// Square of side `size` centered in cell `(col, row)`.
pub fn to_pixel_rect(col: usize, row: usize, size: i32, cell_size: i32) -> Rect {
    let pad = (cell_size - size) / 2;
    Rect::new(
        col as i32 * cell_size + pad,
        row as i32 * cell_size + pad,
        size,
        size,
    )
}

/// Standard AABB intersection. Touching edges are not an overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
