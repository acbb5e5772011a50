//! # CSG Tree - Operator and Bounding Box Primitives
//!
//! Shared building blocks for the CSG algebra in [`products`]: the three
//! boolean operators and the axis-aligned bounding box used throughout
//! for overlap tests and pruning.

pub mod products;

use crate::mesh::Mesh;
use glam::DVec3;

/// CSG operation types.
///
/// # Variants
///
/// - `Union`: A ∪ B - combines both volumes
/// - `Difference`: A - B - subtracts B from A
/// - `Intersection`: A ∩ B - keeps only common volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgOp {
    /// Union operation: A ∪ B
    Union,
    /// Difference operation: A - B
    Difference,
    /// Intersection operation: A ∩ B
    Intersection,
}

impl CsgOp {
    /// Returns the operation name for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            CsgOp::Union => "union",
            CsgOp::Difference => "difference",
            CsgOp::Intersection => "intersection",
        }
    }
}

/// Bounding box for early rejection tests.
///
/// # Fields
///
/// - `min`: Minimum corner of the box
/// - `max`: Maximum corner of the box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: DVec3,
    /// Maximum corner (x, y, z)
    pub max: DVec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min/max corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (invalid) bounding box.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Checks if this bounding box overlaps with another.
    ///
    /// # Arguments
    ///
    /// * `other` - The other bounding box
    ///
    /// # Returns
    ///
    /// True if boxes overlap on all three axes.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Expands this bounding box to include another.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: DVec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: DVec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Computes the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: DVec3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: DVec3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    /// Checks if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && 
        self.min.y <= self.max.y && 
        self.min.z <= self.max.z
    }

    /// Computes bounding box from a mesh.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let (min, max) = mesh.bounding_box();
        Self { min, max }
    }

    /// Computes the volume of the bounding box.
    pub fn volume(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let size = self.max - self.min;
        size.x * size.y * size.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_overlap() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let b = BoundingBox::new(DVec3::splat(0.5), DVec3::splat(1.5));
        let c = BoundingBox::new(DVec3::splat(2.0), DVec3::splat(3.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_bounding_box_volume() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::new(2.0, 3.0, 4.0));
        assert_eq!(a.volume(), 24.0);
        assert_eq!(BoundingBox::empty().volume(), 0.0);
    }
}
