//! Plain component payloads used by the built-in systems.

use std::ops::{Add, Mul};

/// 2D vector in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Placement of an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponent {
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f64,
}

impl TransformComponent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidBodyComponent {
    pub velocity: Vec2,
}

impl RigidBodyComponent {
    pub fn with_velocity(x: f64, y: f64) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }
}

/// Size of the sprite drawn for an entity, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteComponent {
    pub width: u32,
    pub height: u32,
}

impl SpriteComponent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}
