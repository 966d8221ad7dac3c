/// A closed range of ray parameters `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if the open interiors of the two intervals share a point.
    ///
    /// Touching intervals (`a.max == b.min`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.max > other.min && other.max > self.min
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_overlaps() {
        let a = Interval::new(1.0, 3.0);
        assert!(a.overlaps(&Interval::new(2.0, 5.0)));
        assert!(a.overlaps(&Interval::new(0.0, 10.0)));
        assert!(a.overlaps(&a));
        assert!(!a.overlaps(&Interval::new(3.0, 4.0)));
        assert!(!a.overlaps(&Interval::new(5.0, 7.0)));
    }

    #[test]
    fn test_empty_interval() {
        let empty = Interval::EMPTY;
        assert!(empty.min > empty.max);
        assert!(!empty.contains(0.0));
        assert!(!empty.overlaps(&Interval::new(-1e10, 1e10)));
    }
}
