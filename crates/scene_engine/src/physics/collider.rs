//! Axis-aligned colliders and the swept overlap test
//!
//! A [`Collider`] is a rectangle anchored to its owner's position by an
//! offset. [`Collider::check_collision`] tests a moving rectangle against a
//! stationary one with a single discrete sweep: the mover's extent is
//! stretched by this frame's velocity along one axis, then tested for
//! strict overlap. Fast, thin objects can tunnel; there is no time-of-impact
//! solve.

use serde::{Deserialize, Serialize};

/// Side reported by a swept test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionSide {
    /// Horizontal hit while moving in +X (or stationary)
    Right,
    /// Vertical hit while moving in +Y (or stationary)
    Top,
    /// Horizontal hit while moving in -X
    Left,
    /// Vertical hit while moving in -Y
    Bottom,
}

impl CollisionSide {
    /// All sides in result-slot order
    pub const ALL: [Self; 4] = [Self::Right, Self::Top, Self::Left, Self::Bottom];

    /// Integer code: 1 Right, 2 Top, 3 Left, 4 Bottom
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Right => 1,
            Self::Top => 2,
            Self::Left => 3,
            Self::Bottom => 4,
        }
    }

    /// Slot in a [`CollisionResults`] vector
    #[must_use]
    pub const fn index(self) -> usize {
        self.code() as usize - 1
    }

    /// Inverse of [`CollisionSide::code`]; 0 and unknown codes map to `None`
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Right),
            2 => Some(Self::Top),
            3 => Some(Self::Left),
            4 => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Per-side collision flags in fixed order {Right, Top, Left, Bottom}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResults(pub [bool; 4]);

impl CollisionResults {
    /// No sides touched
    pub const NONE: Self = Self([false; 4]);

    /// Mark a side as touched
    pub fn set(&mut self, side: CollisionSide) {
        self.0[side.index()] = true;
    }

    /// Whether a side was touched
    #[must_use]
    pub const fn get(&self, side: CollisionSide) -> bool {
        self.0[side.index()]
    }

    /// Whether any side was touched
    #[must_use]
    pub fn any(&self) -> bool {
        self.0.iter().any(|hit| *hit)
    }

    /// OR another result into this one
    pub fn merge(&mut self, other: Self) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            *mine |= theirs;
        }
    }

    /// Raw flags
    #[must_use]
    pub const fn as_array(&self) -> [bool; 4] {
        self.0
    }
}

/// Axis-aligned rectangle relative to its owner's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Offset of the left edge from the owner's X
    pub offset_x: f32,
    /// Offset of the bottom edge from the owner's Y
    pub offset_y: f32,
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub height: f32,
}

/// World-space bounds of a placed collider
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Bounds {
    fn overlaps_x(&self, other: &Self) -> bool {
        self.min_x < other.max_x && self.max_x > other.min_x
    }

    fn overlaps_y(&self, other: &Self) -> bool {
        self.min_y < other.max_y && self.max_y > other.min_y
    }

    fn swept_x(mut self, vx: f32) -> Self {
        self.min_x += vx.min(0.0);
        self.max_x += vx.max(0.0);
        self
    }

    fn swept_y(mut self, vy: f32) -> Self {
        self.min_y += vy.min(0.0);
        self.max_y += vy.max(0.0);
        self
    }
}

impl Collider {
    /// Create a collider with explicit offsets
    #[must_use]
    pub const fn new(offset_x: f32, offset_y: f32, width: f32, height: f32) -> Self {
        Self { offset_x, offset_y, width, height }
    }

    /// Collider whose lower-left corner sits on the owner's position
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Square collider centered on the owner's position
    #[must_use]
    pub fn centered(size: f32) -> Self {
        Self::new(-size / 2.0, -size / 2.0, size, size)
    }

    fn bounds_at(&self, x: f32, y: f32) -> Bounds {
        let min_x = x + self.offset_x;
        let min_y = y + self.offset_y;
        Bounds {
            min_x,
            max_x: min_x + self.width,
            min_y,
            max_y: min_y + self.height,
        }
    }

    /// Swept test of this collider, owned by a mover at `(x, y)` with this
    /// frame's displacement `(vx, vy)`, against `other` placed at
    /// `(other_x, other_y)`.
    ///
    /// The vertical sweep is tested first and wins ties; the horizontal
    /// sweep is only evaluated when the vertical one misses. Edges that merely
    /// touch do not collide.
    #[must_use]
    pub fn check_collision(
        &self,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        other_x: f32,
        other_y: f32,
        other: &Self,
    ) -> Option<CollisionSide> {
        let mover = self.bounds_at(x, y);
        let target = other.bounds_at(other_x, other_y);

        if mover.overlaps_x(&target) && mover.swept_y(vy).overlaps_y(&target) {
            return Some(if vy < 0.0 { CollisionSide::Bottom } else { CollisionSide::Top });
        }

        if mover.swept_x(vx).overlaps_x(&target) && mover.overlaps_y(&target) {
            return Some(if vx < 0.0 { CollisionSide::Left } else { CollisionSide::Right });
        }

        None
    }

    /// [`Collider::check_collision`] as an integer code, 0 meaning no hit
    #[must_use]
    pub fn check_collision_code(
        &self,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        other_x: f32,
        other_y: f32,
        other: &Self,
    ) -> u8 {
        self.check_collision(x, y, vx, vy, other_x, other_y, other)
            .map_or(0, CollisionSide::code)
    }
}
