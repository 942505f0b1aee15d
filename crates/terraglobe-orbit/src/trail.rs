//! Fixed-capacity history of recent positions, oldest evicted first.

use glam::DVec3;

/// Ring buffer of the most recent positions of an orbiting body.
///
/// Pushing past capacity overwrites the oldest point in place, so a full
/// trail costs nothing extra per frame.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: Vec<DVec3>,
    capacity: usize,
    /// Index the next push writes to once the buffer is full.
    head: usize,
}

impl TrailBuffer {
    /// Create an empty trail holding at most `capacity` points (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append a point, evicting the oldest one if the trail is full.
    pub fn push(&mut self, point: DVec3) {
        if self.points.len() < self.capacity {
            self.points.push(point);
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Point `i`, where 0 is the oldest retained point.
    pub fn get(&self, i: usize) -> Option<DVec3> {
        if i >= self.points.len() {
            return None;
        }
        Some(self.points[(self.head + i) % self.points.len()])
    }

    /// Most recently pushed point.
    pub fn latest(&self) -> Option<DVec3> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer).copied()
    }

    /// Points from oldest to newest, collected.
    pub fn to_vec(&self) -> Vec<DVec3> {
        self.iter().collect()
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points have been pushed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of retained points.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.head = 0;
    }

    /// Change the capacity, keeping the newest points that still fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.capacity {
            return;
        }
        let ordered = self.to_vec();
        let keep = ordered.len().min(capacity);
        let mut points = Vec::with_capacity(capacity);
        points.extend_from_slice(&ordered[ordered.len() - keep..]);
        self.points = points;
        self.capacity = capacity;
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> DVec3 {
        DVec3::new(i as f64, 0.0, 0.0)
    }

    #[test]
    fn test_five_ticks_capacity_three() {
        let mut trail = TrailBuffer::new(3);
        for tick in 1..=5 {
            trail.push(p(tick));
        }
        assert_eq!(trail.to_vec(), vec![p(3), p(4), p(5)]);
        assert_eq!(trail.latest(), Some(p(5)));
    }

    #[test]
    fn test_length_is_min_of_ticks_and_capacity() {
        for cap in [1, 2, 5, 8] {
            for n in 0..20 {
                let mut trail = TrailBuffer::new(cap);
                for i in 0..n {
                    trail.push(p(i));
                }
                assert_eq!(trail.len(), n.min(cap));
                if n > cap {
                    assert_eq!(trail.get(0), Some(p(n - cap)));
                }
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let mut trail = TrailBuffer::new(4);
        assert!(trail.get(0).is_none());
        assert!(trail.latest().is_none());
        trail.push(p(1));
        assert!(trail.get(1).is_none());
    }

    #[test]
    fn test_shrink_keeps_newest() {
        let mut trail = TrailBuffer::new(5);
        for i in 0..7 {
            trail.push(p(i));
        }
        trail.set_capacity(2);
        assert_eq!(trail.to_vec(), vec![p(5), p(6)]);
        trail.push(p(7));
        assert_eq!(trail.to_vec(), vec![p(6), p(7)]);
    }

    #[test]
    fn test_grow_keeps_everything() {
        let mut trail = TrailBuffer::new(2);
        for i in 0..4 {
            trail.push(p(i));
        }
        trail.set_capacity(4);
        trail.push(p(4));
        assert_eq!(trail.to_vec(), vec![p(2), p(3), p(4)]);
    }

    #[test]
    fn test_clear() {
        let mut trail = TrailBuffer::new(2);
        trail.push(p(0));
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 2);
    }
}
