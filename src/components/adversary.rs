//! Host-driven hazard that walks back and forth.
//!
//! This is the reference loop's own simple enemy, not the generic patrol
//! behavior: it starts at `start_x`, walks right, and reverses whenever it
//! leaves `[start_x, start_x + range]`.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Adversary {
    pub start_x: f32,
    /// Walk distance in world units.
    pub range: f32,
    /// `1.0` moving right, `-1.0` moving left.
    pub direction: f32,
    /// World units per second.
    pub speed: f32,
}

impl Adversary {
    pub fn new(start_x: f32, range: f32, direction: f32, speed: f32) -> Self {
        Self {
            start_x,
            range,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            speed,
        }
    }

    /// Advance `x` by one step and flip direction once outside the range.
    pub fn step(&mut self, x: f32, dt: f32) -> f32 {
        let next = x + self.direction * self.speed * dt;
        if next > self.start_x + self.range || next < self.start_x {
            self.direction = -self.direction;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverses_past_right_edge() {
        let mut a = Adversary::new(0.0, 10.0, 1.0, 100.0);
        let x = a.step(9.0, 0.02);
        assert_eq!(x, 11.0);
        assert_eq!(a.direction, -1.0);
    }

    #[test]
    fn test_reverses_past_start() {
        let mut a = Adversary::new(0.0, 10.0, -1.0, 100.0);
        let x = a.step(1.0, 0.02);
        assert_eq!(x, -1.0);
        assert_eq!(a.direction, 1.0);
    }

    #[test]
    fn test_normalizes_direction() {
        let a = Adversary::new(0.0, 10.0, -3.0, 1.0);
        assert_eq!(a.direction, -1.0);
    }
}
