use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Firing directions (vessel local frame)
// ---------------------------------------------------------------------------

/// One of the six RCS firing directions.
///
/// A direction names where the exhaust goes: thrusters firing along
/// `+X` push the vessel towards `-X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction6 {
    Right,    // +X
    Left,     // -X
    Up,       // +Y
    Down,     // -Y
    Forward,  // +Z
    Back,     // -Z
}

impl Direction6 {
    pub const ALL: [Direction6; 6] = [
        Direction6::Right,
        Direction6::Left,
        Direction6::Up,
        Direction6::Down,
        Direction6::Forward,
        Direction6::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector of this direction in the local frame.
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Direction6::Right => Vector3::x(),
            Direction6::Left => -Vector3::x(),
            Direction6::Up => Vector3::y(),
            Direction6::Down => -Vector3::y(),
            Direction6::Forward => Vector3::z(),
            Direction6::Back => -Vector3::z(),
        }
    }

    /// Local axis (0..3) this direction lies on.
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// `1.0` for the positive half of an axis, `-1.0` for the negative.
    pub fn sign(self) -> f64 {
        if self.index() % 2 == 0 { 1.0 } else { -1.0 }
    }

    /// Direction along local axis `axis` (0..3) with the sign of `value`.
    pub fn along_axis(axis: usize, value: f64) -> Direction6 {
        let positive = value >= 0.0;
        match (axis, positive) {
            (0, true) => Direction6::Right,
            (0, false) => Direction6::Left,
            (1, true) => Direction6::Up,
            (1, false) => Direction6::Down,
            (_, true) => Direction6::Forward,
            (_, false) => Direction6::Back,
        }
    }
}

// ---------------------------------------------------------------------------
// Available thrust table
// ---------------------------------------------------------------------------

/// Available RCS thrust per firing direction, N. Indexed by [`Direction6`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThrusterTable {
    pub thrust: [f64; 6],
}

impl ThrusterTable {
    pub fn new(thrust: [f64; 6]) -> Self {
        Self { thrust }
    }

    /// Same thrust in all six directions.
    pub fn uniform(thrust: f64) -> Self {
        Self { thrust: [thrust; 6] }
    }

    pub fn get(&self, dir: Direction6) -> f64 {
        self.thrust[dir.index()]
    }

    pub fn set(&mut self, dir: Direction6, thrust: f64) {
        self.thrust[dir.index()] = thrust;
    }

    /// Available acceleration per direction (thrust / mass), m/s^2.
    /// A non-positive mass leaves every direction unavailable.
    pub fn accelerations(&self, mass: f64) -> [f64; 6] {
        if mass <= 0.0 {
            return [0.0; 6];
        }
        self.thrust.map(|t| t / mass)
    }
}

// ---------------------------------------------------------------------------
// Thruster table builder
// ---------------------------------------------------------------------------

pub struct ThrusterTableBuilder {
    thrust: [f64; 6],
}

impl ThrusterTableBuilder {
    pub fn new() -> Self {
        Self { thrust: [0.0; 6] }
    }

    pub fn right(mut self, v: f64) -> Self { self.thrust[Direction6::Right.index()] = v; self }
    pub fn left(mut self, v: f64) -> Self { self.thrust[Direction6::Left.index()] = v; self }
    pub fn up(mut self, v: f64) -> Self { self.thrust[Direction6::Up.index()] = v; self }
    pub fn down(mut self, v: f64) -> Self { self.thrust[Direction6::Down.index()] = v; self }
    pub fn forward(mut self, v: f64) -> Self { self.thrust[Direction6::Forward.index()] = v; self }
    pub fn back(mut self, v: f64) -> Self { self.thrust[Direction6::Back.index()] = v; self }

    pub fn build(self) -> ThrusterTable {
        ThrusterTable { thrust: self.thrust }
    }
}

impl Default for ThrusterTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Preset layouts
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Four-way quad blocks on every side: same authority everywhere.
    pub fn symmetric_block() -> ThrusterTable {
        ThrusterTable::uniform(4_000.0)
    }

    /// Docking tug: strong aft-firing translation, weak forward and a
    /// single small block firing down.
    pub fn docking_tug() -> ThrusterTable {
        ThrusterTableBuilder::new()
            .right(2_000.0)
            .left(2_000.0)
            .up(1_500.0)
            .down(500.0)
            .forward(1_000.0)
            .back(6_000.0)
            .build()
    }
}
