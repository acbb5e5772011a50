//! # Geometry Capability Set
//!
//! `Geometry` is the result type every evaluator operator (§ the node
//! lowering table in `from_ir`) ultimately produces and every cache
//! stores. It is a tagged union over the concrete representations the
//! pipeline can hold — a 3D triangle soup, a 2D outline set, an exact
//! solid, a manifold-fast solid with a lazy exact fallback, or a flat
//! list of any of the above — rather than a trait object, so that
//! `memsize`/`bounding_box`/`dump`/`copy` are plain `match` arms instead
//! of virtual dispatch.
//!
//! The exact-arithmetic kernel itself (CGAL-equivalent Boolean ops on
//! exact polyhedra) is an external collaborator; `Nef3` wraps whatever
//! that kernel handed back without exposing its internal number types
//! to the rest of the core.

use crate::mesh::Mesh;
use crate::ops::boolean::csg_tree::BoundingBox;
use glam::{DMat4, DVec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box; alias of the CSG tree's box type so the
/// whole pipeline shares one representation.
pub type Aabb = BoundingBox;

/// A single closed 2D loop, tagged as outer boundary or hole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline2d {
    /// Loop vertices, outer boundaries CCW and holes CW (OpenSCAD
    /// convention, matched by the offset/extrude operators).
    pub points: Vec<DVec2>,
    /// Whether this loop subtracts from (rather than adds to) its union.
    pub is_hole: bool,
}

impl Outline2d {
    pub fn new(points: Vec<DVec2>, is_hole: bool) -> Self {
        Self { points, is_hole }
    }

    fn memsize(&self) -> usize {
        self.points.len() * std::mem::size_of::<DVec2>()
    }
}

/// A set of 2D outlines — the evaluated form of `square`/`circle`/
/// `polygon`/`projection`/`offset` and any union of such shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polygon2d {
    pub outlines: Vec<Outline2d>,
}

impl Polygon2d {
    pub fn new(outlines: Vec<Outline2d>) -> Self {
        Self { outlines }
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.iter().all(|o| o.points.len() < 3)
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut bbox = Aabb::empty();
        for outline in &self.outlines {
            for p in &outline.points {
                let v = glam::DVec3::new(p.x, p.y, 0.0);
                bbox = bbox.union(&Aabb::new(v, v));
            }
        }
        bbox
    }

    fn memsize(&self) -> usize {
        self.outlines.iter().map(Outline2d::memsize).sum()
    }
}

/// A handle to an exact 3D solid produced by the out-of-core kernel
/// (`union_3d`/`intersection_3d`/... in the operator interface). The
/// core never inspects the kernel's own number representation; it only
/// ever re-derives a `PolySet` from it via `polyset_from_nef`-style
/// triangulation, which is why this wraps a `Mesh` rather than a kernel
/// type.
#[derive(Debug, Clone)]
pub struct NefHandle {
    triangulated: Mesh,
}

impl NefHandle {
    pub fn from_triangulated(mesh: Mesh) -> Self {
        Self { triangulated: mesh }
    }

    pub fn as_mesh(&self) -> &Mesh {
        &self.triangulated
    }
}

/// Capability set for evaluated geometry, matching every variant the
/// geometry evaluator can produce. `GeometryList` composes a flat bag of
/// sibling results (e.g. after flattening a `GroupNode`/`RootNode`
/// union); flattening is idempotent, see [`Geometry::flatten`].
#[derive(Debug, Clone)]
pub enum Geometry {
    /// 3D triangle/polygon soup — the common case produced by most
    /// booleans, extrusions, and primitives.
    PolySet(Mesh),
    /// A set of 2D outlines.
    Polygon2d(Polygon2d),
    /// An exact 3D solid from the kernel.
    Nef3(NefHandle),
    /// A manifold-fast solid (produced by the disjoint-union fast path,
    /// § fast union clustering) carrying a lazily-computed exact
    /// fallback for operators that require one.
    FastPoly {
        mesh: Mesh,
        nef_fallback: Option<NefHandle>,
    },
    /// A flat bag of `(node_ref, geometry)` pairs.
    GeometryList(Vec<(i64, Geometry)>),
}

impl Geometry {
    /// Approximate resident byte cost; used as the `cost` argument to
    /// the LRU cache.
    pub fn memsize(&self) -> usize {
        match self {
            Geometry::PolySet(m) => mesh_memsize(m),
            Geometry::Polygon2d(p) => p.memsize(),
            Geometry::Nef3(n) => mesh_memsize(n.as_mesh()),
            Geometry::FastPoly { mesh, nef_fallback } => {
                mesh_memsize(mesh)
                    + nef_fallback.as_ref().map(|n| mesh_memsize(n.as_mesh())).unwrap_or(0)
            }
            Geometry::GeometryList(items) => items.iter().map(|(_, g)| g.memsize()).sum(),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Geometry::PolySet(m) => Aabb::from_mesh(m),
            Geometry::Polygon2d(p) => p.bounding_box(),
            Geometry::Nef3(n) => Aabb::from_mesh(n.as_mesh()),
            Geometry::FastPoly { mesh, .. } => Aabb::from_mesh(mesh),
            Geometry::GeometryList(items) => {
                let mut bbox = Aabb::empty();
                for (_, g) in items {
                    bbox = bbox.union(&g.bounding_box());
                }
                bbox
            }
        }
    }

    /// Dimensionality: 2 for outline sets, 3 for everything solid, 0 for
    /// an empty list with nothing inside.
    pub fn dimension(&self) -> u8 {
        match self {
            Geometry::PolySet(_) | Geometry::Nef3(_) | Geometry::FastPoly { .. } => 3,
            Geometry::Polygon2d(_) => 2,
            Geometry::GeometryList(items) => items.first().map(|(_, g)| g.dimension()).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::PolySet(m) => m.is_empty(),
            Geometry::Polygon2d(p) => p.is_empty(),
            Geometry::Nef3(n) => n.as_mesh().is_empty(),
            Geometry::FastPoly { mesh, .. } => mesh.is_empty(),
            Geometry::GeometryList(items) => items.iter().all(|(_, g)| g.is_empty()),
        }
    }

    pub fn num_facets(&self) -> usize {
        match self {
            Geometry::PolySet(m) => m.triangle_count(),
            Geometry::Nef3(n) => n.as_mesh().triangle_count(),
            Geometry::FastPoly { mesh, .. } => mesh.triangle_count(),
            Geometry::Polygon2d(_) => 0,
            Geometry::GeometryList(items) => items.iter().map(|(_, g)| g.num_facets()).sum(),
        }
    }

    /// Applies an affine transform in place. No-op on 2D/list variants
    /// that do not carry one directly on this node (callers transform
    /// the leaves instead).
    pub fn transform(&mut self, matrix: &DMat4) {
        match self {
            Geometry::PolySet(m) => m.transform(matrix),
            Geometry::Nef3(n) => n.triangulated.transform(matrix),
            Geometry::FastPoly { mesh, nef_fallback } => {
                mesh.transform(matrix);
                *nef_fallback = None; // fallback invalidated by the transform
            }
            Geometry::GeometryList(items) => {
                for (_, g) in items.iter_mut() {
                    g.transform(matrix);
                }
            }
            Geometry::Polygon2d(_) => {}
        }
    }

    /// Only `CGALCache` admits exact kinds; everything else routes to
    /// `GeometryCache`. See § the cache admission rule.
    pub fn is_exact(&self) -> bool {
        matches!(self, Geometry::Nef3(_))
    }

    /// Flattens a `GeometryList` recursively into one flat list.
    /// Idempotent: flattening an already-flat list returns it unchanged.
    pub fn flatten(self) -> Geometry {
        fn flatten_into(g: Geometry, out: &mut Vec<(i64, Geometry)>) {
            match g {
                Geometry::GeometryList(items) => {
                    for (_, child) in items {
                        flatten_into(child, out);
                    }
                }
                other => out.push((out.len() as i64, other)),
            }
        }
        let mut out = Vec::new();
        flatten_into(self, &mut out);
        Geometry::GeometryList(out)
    }
}

fn mesh_memsize(mesh: &Mesh) -> usize {
    use std::mem::size_of;
    mesh.vertex_count() * size_of::<glam::DVec3>()
        + mesh.triangle_count() * size_of::<[u32; 3]>()
        + mesh.colors().map(|c| c.len() * size_of::<[f32; 4]>()).unwrap_or(0)
        + mesh.normals().map(|n| n.len() * size_of::<glam::DVec3>()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn polyset_memsize_is_positive_for_nonempty_mesh() {
        let g = Geometry::PolySet(unit_triangle());
        assert!(g.memsize() > 0);
        assert_eq!(g.dimension(), 3);
        assert!(!g.is_empty());
    }

    #[test]
    fn nef3_is_the_only_exact_kind() {
        let exact = Geometry::Nef3(NefHandle::from_triangulated(unit_triangle()));
        let poly = Geometry::PolySet(unit_triangle());
        assert!(exact.is_exact());
        assert!(!poly.is_exact());
    }

    #[test]
    fn flatten_is_idempotent() {
        let list = Geometry::GeometryList(vec![
            (0, Geometry::PolySet(unit_triangle())),
            (1, Geometry::GeometryList(vec![(0, Geometry::PolySet(unit_triangle()))])),
        ]);
        let flat = list.flatten();
        match &flat {
            Geometry::GeometryList(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected GeometryList"),
        }
        let flat_again = flat.clone().flatten();
        match flat_again {
            Geometry::GeometryList(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected GeometryList"),
        }
    }

    #[test]
    fn empty_geometry_list_has_dimension_zero() {
        let g = Geometry::GeometryList(vec![]);
        assert_eq!(g.dimension(), 0);
        assert!(g.is_empty());
    }
}
