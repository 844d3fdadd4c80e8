//! Hexagonal coordinate system using axial coordinates.
//!
//! Axial coordinates use two axes (q, r) at 60 degrees, with an implicit
//! third axis s = -q - r. Tiles are pointy-top hexes laid out on the world
//! XZ plane; Y carries elevation.

use std::ops::{Add, Mul, Neg, Sub};

use bevy::math::Vec3;

use crate::constants::{ELEVATION_STEP, HEX_SIZE};

const SQRT_3: f32 = 1.732_050_8;

/// The six hex directions in the canonical order used throughout the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Direction {
    /// All six directions, in canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Axial offset of one step in this direction.
    pub const fn offset(self) -> HexCoord {
        match self {
            Direction::East => HexCoord { q: 1, r: 0 },
            Direction::NorthEast => HexCoord { q: 1, r: -1 },
            Direction::NorthWest => HexCoord { q: 0, r: -1 },
            Direction::West => HexCoord { q: -1, r: 0 },
            Direction::SouthWest => HexCoord { q: -1, r: 1 },
            Direction::SouthEast => HexCoord { q: 0, r: 1 },
        }
    }
}

/// A position on the hexagonal lattice.
///
/// The implicit third axis is s = -q - r, so q + r + s == 0 always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    /// Origin of the coordinate system.
    pub const ZERO: Self = Self { q: 0, r: 0 };

    /// Create a new coordinate.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Compute the implicit third axis: s = -q - r.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hexagonal distance between two coordinates: (|dq| + |dr| + |ds|) / 2.
    pub fn distance(&self, other: Self) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        let ds = self.s() - other.s();
        (dq.abs() + dr.abs() + ds.abs()) / 2
    }

    /// The neighboring coordinate one step in the given direction.
    pub const fn neighbor(&self, dir: Direction) -> Self {
        let d = dir.offset();
        Self {
            q: self.q + d.q,
            r: self.r + d.r,
        }
    }

    /// All six neighbors, in canonical direction order.
    pub fn neighbors(&self) -> [Self; 6] {
        Direction::ALL.map(|d| *self + d.offset())
    }

    /// Snap fractional axial coordinates to the nearest hex.
    ///
    /// Rounds q, r, s to the nearest integers, then recomputes whichever
    /// axis had the largest rounding error from the other two so the
    /// q + r + s == 0 invariant survives.
    pub fn round(q: f32, r: f32) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();
        let dq = (rq - q).abs();
        let dr = (rr - r).abs();
        let ds = (rs - s).abs();
        if dq > dr && dq > ds {
            rq = -rr - rs;
        } else if dr > ds {
            rr = -rq - rs;
        }
        Self::new(rq as i32, rr as i32)
    }

    /// Every coordinate on the straight line from `self` to `target`,
    /// inclusive of both endpoints.
    ///
    /// Linear interpolation in cube space, one sample per step, snapped
    /// with [`HexCoord::round`]. The tiny offset on r breaks exact-halfway
    /// ties consistently so consecutive samples stay adjacent.
    pub fn line_to(&self, target: Self) -> Vec<Self> {
        let n = self.distance(target);
        if n == 0 {
            return vec![*self];
        }
        let mut line = Vec::with_capacity(n as usize + 1);
        for i in 0..=n {
            let t = i as f32 / n as f32;
            let q = lerp(self.q as f32, target.q as f32, t);
            let r = lerp(self.r as f32 + 1e-6, target.r as f32 + 1e-6, t);
            line.push(Self::round(q, r));
        }
        line
    }

    /// All coordinates at exactly `radius` steps from `self`, walked
    /// edge-by-edge around the ring (6 * radius tiles). Radius 0 yields
    /// just `self`.
    pub fn ring(&self, radius: i32) -> Vec<Self> {
        if radius <= 0 {
            return vec![*self];
        }
        let mut results = Vec::with_capacity(6 * radius as usize);
        let mut hex = *self + Direction::SouthWest.offset() * radius;
        for dir in Direction::ALL {
            for _ in 0..radius {
                results.push(hex);
                hex = hex.neighbor(dir);
            }
        }
        results
    }

    /// All coordinates within `radius` steps of `self`, including `self`.
    pub fn area(&self, radius: i32) -> Vec<Self> {
        let mut results = Vec::new();
        for q in -radius..=radius {
            let r_min = (-radius).max(-q - radius);
            let r_max = radius.min(-q + radius);
            for r in r_min..=r_max {
                results.push(*self + Self::new(q, r));
            }
        }
        results
    }

    /// World-space center of this hex at the given elevation step.
    pub fn to_world(&self, elevation: i32) -> Vec3 {
        let q = self.q as f32;
        let r = self.r as f32;
        Vec3::new(
            HEX_SIZE * (SQRT_3 * q + SQRT_3 / 2.0 * r),
            elevation as f32 * ELEVATION_STEP,
            HEX_SIZE * 1.5 * r,
        )
    }

    /// The hex whose footprint contains the given world position.
    ///
    /// Inverts the XZ part of [`HexCoord::to_world`]; Y is ignored.
    pub fn from_world(pos: Vec3) -> Self {
        let q = (SQRT_3 / 3.0 * pos.x - pos.z / 3.0) / HEX_SIZE;
        let r = (2.0 / 3.0 * pos.z) / HEX_SIZE;
        Self::round(q, r)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Add for HexCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            q: self.q + other.q,
            r: self.r + other.r,
        }
    }
}

impl Sub for HexCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            q: self.q - other.q,
            r: self.r - other.r,
        }
    }
}

impl Neg for HexCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            q: -self.q,
            r: -self.r,
        }
    }
}

impl Mul<i32> for HexCoord {
    type Output = Self;

    #[inline]
    fn mul(self, scale: i32) -> Self {
        Self {
            q: self.q * scale,
            r: self.r * scale,
        }
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_axis_constraint() {
        let coords = [
            HexCoord::ZERO,
            HexCoord::new(1, 0),
            HexCoord::new(1, -1),
            HexCoord::new(-3, 5),
            HexCoord::new(100, -42),
        ];
        for c in coords {
            assert_eq!(c.q + c.r + c.s(), 0);
        }
    }

    #[test]
    fn distance_properties() {
        let a = HexCoord::new(2, -1);
        let b = HexCoord::new(-3, 4);
        let c = HexCoord::new(7, 0);

        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(b), b.distance(a));
        // Triangle inequality
        assert!(a.distance(c) <= a.distance(b) + b.distance(c));

        for dir in Direction::ALL {
            assert_eq!(HexCoord::ZERO.distance(dir.offset()), 1);
        }
        assert_eq!(HexCoord::ZERO.distance(HexCoord::new(2, 0)), 2);
        assert_eq!(HexCoord::ZERO.distance(HexCoord::new(1, 1)), 2);
    }

    #[test]
    fn neighbors_in_canonical_order() {
        let expected = [
            HexCoord::new(1, 0),
            HexCoord::new(1, -1),
            HexCoord::new(0, -1),
            HexCoord::new(-1, 0),
            HexCoord::new(-1, 1),
            HexCoord::new(0, 1),
        ];
        assert_eq!(HexCoord::ZERO.neighbors(), expected);

        let off = HexCoord::new(3, -2);
        for (n, e) in off.neighbors().iter().zip(expected) {
            assert_eq!(*n, off + e);
        }
    }

    #[test]
    fn ring_sizes_and_membership() {
        let center = HexCoord::new(1, 2);
        assert_eq!(center.ring(0), vec![center]);

        let ring1 = center.ring(1);
        assert_eq!(ring1.len(), 6);
        let mut sorted: Vec<_> = ring1.clone();
        sorted.sort_by_key(|c| (c.q, c.r));
        let mut expected: Vec<_> = center.neighbors().to_vec();
        expected.sort_by_key(|c| (c.q, c.r));
        assert_eq!(sorted, expected);

        for radius in 2..5 {
            let ring = center.ring(radius);
            assert_eq!(ring.len(), 6 * radius as usize);
            for c in &ring {
                assert_eq!(center.distance(*c), radius);
            }
        }
    }

    #[test]
    fn area_counts() {
        // 1 + 3r(r+1) tiles within radius r
        for radius in 0..4 {
            let area = HexCoord::new(-2, 3).area(radius);
            assert_eq!(area.len() as i32, 1 + 3 * radius * (radius + 1));
            for c in &area {
                assert!(HexCoord::new(-2, 3).distance(*c) <= radius);
            }
        }
    }

    #[test]
    fn line_endpoints_and_steps() {
        let a = HexCoord::new(-2, 1);
        let b = HexCoord::new(4, -3);
        let line = a.line_to(b);

        assert_eq!(*line.first().unwrap(), a);
        assert_eq!(*line.last().unwrap(), b);
        assert_eq!(line.len() as i32, a.distance(b) + 1);
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1);
        }

        assert_eq!(a.line_to(a), vec![a]);
    }

    #[test]
    fn world_round_trip() {
        for q in -20..=20 {
            for r in -20..=20 {
                let c = HexCoord::new(q, r);
                assert_eq!(HexCoord::from_world(c.to_world(0)), c);
                // Elevation must not affect the lattice position
                assert_eq!(HexCoord::from_world(c.to_world(3)), c);
            }
        }
    }

    #[test]
    fn rounding_prefers_nearest() {
        assert_eq!(HexCoord::round(0.1, -0.1), HexCoord::ZERO);
        assert_eq!(HexCoord::round(0.9, 0.1), HexCoord::new(1, 0));
        let snapped = HexCoord::round(2.4, -1.7);
        assert_eq!(snapped.q + snapped.r + snapped.s(), 0);
    }

    #[test]
    fn operator_arithmetic() {
        let a = HexCoord::new(1, 2);
        let b = HexCoord::new(4, -1);
        assert_eq!(a + b, HexCoord::new(5, 1));
        assert_eq!(a - b, HexCoord::new(-3, 3));
        assert_eq!(a + (-b), a - b);
        assert_eq!(b * 3, HexCoord::new(12, -3));
        assert_eq!(format!("{}", a), "(1, 2)");
    }
}
