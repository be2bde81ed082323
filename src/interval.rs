//! Interval arithmetic for ray parameter ranges.
//!
//! The nearest-hit search narrows an open interval `(epsilon, best_t)` as it
//! walks the primitive list.

/// Interval between `min` and `max`, tested with exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Open ray interval `(min, +inf)`, used for every fresh intersection query.
    pub fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(self, max: f32) -> Self {
        Self { max, ..self }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }
}
