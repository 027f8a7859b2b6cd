use macroquad::prelude::*;

/// Strict AABB overlap: touching edges do not count.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x + a.w > b.x && a.x < b.x + b.w && a.y + a.h > b.y && a.y < b.y + b.h
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which side of `platform` a moving rect should resolve against, judged from
/// its position before this frame's displacement (rect minus velocity).
/// Checked in fixed priority order; ties go to the earlier branch. Returns
/// `None` when the rects do not overlap or no branch matches (fast diagonal
/// clips stay unresolved, same as the swept heuristic this approximates).
pub fn collision_side(body: Rect, vel: Vec2, platform: Rect) -> Option<Side> {
    if !overlaps(body, platform) {
        return None;
    }
    if body.y + body.h - vel.y <= platform.y {
        Some(Side::Top)
    } else if body.y - vel.y >= platform.y + platform.h {
        Some(Side::Bottom)
    } else if body.x + body.w - vel.x <= platform.x {
        Some(Side::Left)
    } else if body.x - vel.x >= platform.x + platform.w {
        Some(Side::Right)
    } else {
        None
    }
}

pub fn center(rect: Rect) -> Vec2 {
    vec2(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5)
}
