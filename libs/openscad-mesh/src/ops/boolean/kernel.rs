//! # Exact-Arithmetic Kernel Interface
//!
//! The geometry evaluator's operator lowering (§ `from_ir`'s node match)
//! is written against this trait rather than against the boolean/hull/
//! minkowski functions directly, so the exact-arithmetic backend stays
//! swappable: a real CGAL-equivalent binding could implement `Kernel`
//! without the evaluator noticing. `PolysetKernel` is the one
//! implementation this crate ships, built entirely from the BSP-tree
//! Boolean algorithm in [`super`] and the QuickHull/Minkowski modules
//! next door — there is no vendored exact-predicate library here, only
//! `robust`-backed floating point, so `is_manifold` is a best-effort
//! topological check rather than a certified one.
//!
//! `Kernel` is object-safe on purpose: a `Box<dyn Kernel>` is what a
//! `MeshSession` actually holds, so tests can substitute a kernel that
//! fails on command without touching the evaluator.

use crate::error::MeshError;
use crate::geometry::{Aabb, Geometry, NefHandle};
use crate::mesh::Mesh;
use glam::DVec3;

/// The operator surface the geometry evaluator lowers CSG nodes onto.
///
/// Every method takes already-evaluated `Geometry` operands and returns
/// a new `Geometry`; none of them see the AST or the cache, which stay
/// the evaluator's concern. A failure should be reported via
/// `MeshError::KernelFailure` so the caller can downgrade it to a
/// warning plus empty geometry, per the failure semantics in
/// `ops::boolean`'s own fallible functions.
pub trait Kernel: Send + Sync {
    fn union_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError>;
    fn intersection_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError>;
    fn difference_3d(&self, base: Geometry, subtrahends: Vec<Geometry>) -> Result<Geometry, MeshError>;
    fn minkowski_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError>;
    fn hull_3d(&self, points: &[DVec3]) -> Result<Geometry, MeshError>;
    fn convex_decompose(&self, geometry: &Geometry) -> Result<Vec<Geometry>, MeshError>;
    fn triangulate_faces(&self, geometry: &mut Geometry);
    fn is_manifold(&self, geometry: &Geometry) -> bool;
    fn bounding_box(&self, geometry: &Geometry) -> Aabb;
    fn polyset_from_nef(&self, geometry: &Geometry) -> Result<Mesh, MeshError>;
}

fn geometry_to_mesh(geometry: &Geometry, reason: &str) -> Result<Mesh, MeshError> {
    match geometry {
        Geometry::PolySet(m) => Ok(m.clone()),
        Geometry::Nef3(n) => Ok(n.as_mesh().clone()),
        Geometry::FastPoly { mesh, .. } => Ok(mesh.clone()),
        _ => Err(MeshError::kernel_failure(format!(
            "{reason}: expected a 3D solid, got {geometry:?}"
        ))),
    }
}

/// The exact kernel realized on top of the crate's own BSP Boolean
/// engine. Every operand is flattened to a `Mesh` first; there is no
/// separate exact number representation underneath, so `polyset_from_nef`
/// is just a clone rather than a real triangulation of an arbitrary-
/// precision solid.
#[derive(Debug, Default, Clone, Copy)]
pub struct PolysetKernel;

impl Kernel for PolysetKernel {
    fn union_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError> {
        let mut meshes = Vec::with_capacity(operands.len());
        for g in &operands {
            meshes.push(geometry_to_mesh(g, "union_3d")?);
        }
        let mut acc = Mesh::new();
        for mesh in meshes {
            acc = super::union(&acc, &mesh)?;
        }
        Ok(Geometry::PolySet(acc))
    }

    fn intersection_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError> {
        let mut iter = operands.iter();
        let Some(first) = iter.next() else {
            return Ok(Geometry::PolySet(Mesh::new()));
        };
        let mut acc = geometry_to_mesh(first, "intersection_3d")?;
        for g in iter {
            let mesh = geometry_to_mesh(g, "intersection_3d")?;
            acc = super::intersection(&acc, &mesh)?;
        }
        Ok(Geometry::PolySet(acc))
    }

    fn difference_3d(&self, base: Geometry, subtrahends: Vec<Geometry>) -> Result<Geometry, MeshError> {
        let mut acc = geometry_to_mesh(&base, "difference_3d")?;
        for g in &subtrahends {
            let mesh = geometry_to_mesh(g, "difference_3d")?;
            acc = super::difference(&acc, &mesh)?;
        }
        Ok(Geometry::PolySet(acc))
    }

    fn minkowski_3d(&self, operands: Vec<Geometry>) -> Result<Geometry, MeshError> {
        let mut meshes = Vec::with_capacity(operands.len());
        for g in &operands {
            meshes.push(geometry_to_mesh(g, "minkowski_3d")?);
        }
        let refs: Vec<&Mesh> = meshes.iter().collect();
        let result = crate::ops::minkowski(&refs)?;
        Ok(Geometry::PolySet(result))
    }

    fn hull_3d(&self, points: &[DVec3]) -> Result<Geometry, MeshError> {
        if points.len() < 4 {
            return Err(MeshError::degenerate(
                "hull requires at least 4 non-coplanar points",
                None,
            ));
        }
        let mesh = crate::ops::hull::convex_hull(points)?;
        Ok(Geometry::PolySet(mesh))
    }

    fn convex_decompose(&self, geometry: &Geometry) -> Result<Vec<Geometry>, MeshError> {
        // No exact convex decomposition library is wired in; a single
        // mesh is already "decomposed" into one (possibly non-convex)
        // piece, which keeps callers that just want a Vec<Geometry> to
        // re-union correct, if not minimal.
        let mesh = geometry_to_mesh(geometry, "convex_decompose")?;
        Ok(vec![Geometry::PolySet(mesh)])
    }

    fn triangulate_faces(&self, geometry: &mut Geometry) {
        // Every Geometry variant this kernel produces is already a
        // triangle soup; nothing to fan out.
        let _ = geometry;
    }

    fn is_manifold(&self, geometry: &Geometry) -> bool {
        match geometry_to_mesh(geometry, "is_manifold") {
            Ok(mesh) => mesh.validate(),
            Err(_) => false,
        }
    }

    fn bounding_box(&self, geometry: &Geometry) -> Aabb {
        geometry.bounding_box()
    }

    fn polyset_from_nef(&self, geometry: &Geometry) -> Result<Mesh, MeshError> {
        geometry_to_mesh(geometry, "polyset_from_nef")
    }
}

impl PolysetKernel {
    /// Wraps a finished mesh as an exact-kernel result, for callers that
    /// want to hand a freshly unioned/hulled mesh into `CGALCache`.
    pub fn as_nef(mesh: Mesh) -> Geometry {
        Geometry::Nef3(NefHandle::from_triangulated(mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn cube() -> Mesh {
        let mut mesh = Mesh::new();
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        for c in corners {
            mesh.add_vertex(c);
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    #[test]
    fn union_3d_of_no_operands_is_empty() {
        let kernel = PolysetKernel;
        let result = kernel.union_3d(vec![]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn intersection_3d_rejects_non_solid_operands() {
        let kernel = PolysetKernel;
        let err = kernel
            .intersection_3d(vec![Geometry::Polygon2d(Default::default())])
            .unwrap_err();
        assert!(matches!(err, MeshError::KernelFailure { .. }));
    }

    #[test]
    fn hull_3d_rejects_too_few_points() {
        let kernel = PolysetKernel;
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = kernel.hull_3d(&points).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateGeometry { .. }));
    }

    #[test]
    fn bounding_box_delegates_to_geometry() {
        let kernel = PolysetKernel;
        let geometry = Geometry::PolySet(cube());
        assert_eq!(kernel.bounding_box(&geometry), geometry.bounding_box());
    }

    #[test]
    fn polyset_from_nef_recovers_the_triangulated_mesh() {
        let kernel = PolysetKernel;
        let nef = PolysetKernel::as_nef(cube());
        let mesh = kernel.polyset_from_nef(&nef).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }
}
