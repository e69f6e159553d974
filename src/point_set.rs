//! Point records derived from a source image.
//!
//! A [`PointSet`] stores one record per sampled pixel as five parallel
//! arrays. The arrays are private and only grow together through
//! [`PointSet::push`], so index `i` always names the same point in each.

use glam::Vec3;

/// One sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    /// World-space position; z comes from luminance.
    pub position: Vec3,
    /// Undeformed rest position the per-frame motion is computed from.
    pub reference_position: Vec3,
    /// Source colour, channels in `[0, 1]`.
    pub color: Vec3,
    /// Per-point phase seed in `[0, 1)`.
    pub random_seed: f32,
    /// Distance from the image centre over the centre-to-corner distance.
    pub edge_factor: f32,
}

impl PointRecord {
    /// A fresh record whose reference position equals its position.
    pub fn new(position: Vec3, color: Vec3, random_seed: f32, edge_factor: f32) -> Self {
        Self {
            position,
            reference_position: position,
            color,
            random_seed,
            edge_factor,
        }
    }
}

/// All points sampled from one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    positions: Vec<Vec3>,
    reference_positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    random_seeds: Vec<f32>,
    edge_factors: Vec<f32>,
}

impl PointSet {
    /// An empty set reserving room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            reference_positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            random_seeds: Vec::with_capacity(capacity),
            edge_factors: Vec::with_capacity(capacity),
        }
    }

    /// Append a record to every array.
    pub fn push(&mut self, record: PointRecord) {
        self.positions.push(record.position);
        self.reference_positions.push(record.reference_position);
        self.colors.push(record.color);
        self.random_seeds.push(record.random_seed);
        self.edge_factors.push(record.edge_factor);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn reference_positions(&self) -> &[Vec3] {
        &self.reference_positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn random_seeds(&self) -> &[f32] {
        &self.random_seeds
    }

    pub fn edge_factors(&self) -> &[f32] {
        &self.edge_factors
    }

    /// Reassemble the record at `index`.
    pub fn get(&self, index: usize) -> Option<PointRecord> {
        Some(PointRecord {
            position: *self.positions.get(index)?,
            reference_position: self.reference_positions[index],
            color: self.colors[index],
            random_seed: self.random_seeds[index],
            edge_factor: self.edge_factors[index],
        })
    }

    /// Iterate over records in sampling order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = PointRecord> + '_ {
        (0..self.len()).map(move |i| PointRecord {
            position: self.positions[i],
            reference_position: self.reference_positions[i],
            color: self.colors[i],
            random_seed: self.random_seeds[i],
            edge_factor: self.edge_factors[i],
        })
    }
}

impl FromIterator<PointRecord> for PointSet {
    fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = PointSet::with_capacity(iter.size_hint().0);
        for record in iter {
            set.push(record);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f32) -> PointRecord {
        PointRecord::new(Vec3::new(x, 0.0, 0.0), Vec3::ONE, 0.25, 0.5)
    }

    #[test]
    fn test_push_keeps_arrays_aligned() {
        let mut set = PointSet::default();
        set.push(record(1.0));
        set.push(record(2.0));

        assert_eq!(set.len(), 2);
        assert_eq!(set.reference_positions().len(), 2);
        assert_eq!(set.colors().len(), 2);
        assert_eq!(set.random_seeds().len(), 2);
        assert_eq!(set.edge_factors().len(), 2);
        assert_eq!(set.get(1).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_reference_equals_position_at_creation() {
        let r = record(3.0);
        assert_eq!(r.position, r.reference_position);
    }

    #[test]
    fn test_get_out_of_range() {
        let set: PointSet = std::iter::once(record(0.0)).collect();
        assert!(set.get(1).is_none());
        assert_eq!(set.iter().count(), 1);
    }
}
