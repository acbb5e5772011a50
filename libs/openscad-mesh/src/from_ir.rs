//! # Geometry Node to Mesh Lowering
//!
//! Converts the evaluator's resolved [`GeometryNode`] tree into triangle
//! meshes. This is the node lowering table referenced from `geometry.rs`:
//! every operator the evaluator can produce has a branch here, and the
//! boolean/hull/minkowski branches consult [`GeometryCache`] first so that
//! repeated subtrees (common under `for` loops and module instantiation)
//! are only evaluated once per fingerprint.

use crate::error::MeshError;
use crate::geometry::Geometry;
use crate::mesh::Mesh;
use crate::ops::boolean::cache::{CacheEntry, GeometryCache};
use crate::ops::boolean::fast_union::{self, FastUnionConfig};
use crate::ops::extrude::{LinearExtrudeParams, Polygon2D, RotateExtrudeParams};
use crate::ops::offset::OffsetParams;
use crate::ops::{boolean, extrude, hull, minkowski, offset};
use crate::primitives::{create_cube, create_cylinder, create_sphere};
use glam::{DMat4, DVec2, DVec3};
use openscad_eval::GeometryNode;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

/// Converts a list of top-level geometry nodes to a single mesh.
///
/// Multiple top-level nodes are combined via union, mirroring the
/// implicit root union OpenSCAD performs over a file's statements.
pub fn geometry_to_mesh(nodes: &[GeometryNode]) -> Result<Mesh, MeshError> {
    if nodes.is_empty() {
        return Ok(Mesh::new());
    }

    if nodes.len() == 1 {
        return node_to_mesh(&nodes[0]);
    }

    let mut result = Mesh::new();
    for node in nodes {
        let mesh = node_to_mesh(node)?;
        result.merge(&mesh);
    }
    Ok(result)
}

/// Converts a single geometry node to a mesh.
pub fn node_to_mesh(node: &GeometryNode) -> Result<Mesh, MeshError> {
    match node {
        // =====================================================================
        // 3D PRIMITIVES
        // =====================================================================
        GeometryNode::Cube { size, center } => {
            create_cube(DVec3::from_array(*size), *center)
        }

        GeometryNode::Sphere { radius, fn_ } => create_sphere(*radius, *fn_),

        GeometryNode::Cylinder {
            height,
            radius1,
            radius2,
            center,
            fn_,
        } => create_cylinder(*height, *radius1, *radius2, *center, *fn_),

        GeometryNode::Polyhedron { points, faces } => create_polyhedron(points, faces),

        // =====================================================================
        // 2D PRIMITIVES
        // =====================================================================
        // 2D shapes have no 3D rendering on their own; they only lower to a
        // mesh once extruded. A bare 2D node at the mesh boundary is the
        // evaluator's mistake, not a geometry error, so it surfaces as
        // unsupported rather than an empty mesh.
        GeometryNode::Circle { .. } | GeometryNode::Square { .. } | GeometryNode::Polygon { .. } => {
            Err(MeshError::unsupported(
                "2D primitives require extrusion before they can be rendered as a mesh",
                None,
            ))
        }

        // =====================================================================
        // TRANSFORMS
        // =====================================================================
        GeometryNode::Translate { offset, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.translate(DVec3::from_array(*offset));
            Ok(mesh)
        }

        GeometryNode::Rotate { angles, child } => {
            let mut mesh = node_to_mesh(child)?;
            let [rx, ry, rz] = angles.map(f64::to_radians);
            let matrix = DMat4::from_euler(glam::EulerRot::XYZ, rx, ry, rz);
            mesh.transform(&matrix);
            Ok(mesh)
        }

        GeometryNode::Scale { factors, child } => {
            let mut mesh = node_to_mesh(child)?;
            let matrix = DMat4::from_scale(DVec3::from_array(*factors));
            mesh.transform(&matrix);
            Ok(mesh)
        }

        GeometryNode::Mirror { normal, child } => {
            let mut mesh = node_to_mesh(child)?;
            let n = DVec3::from_array(*normal).normalize();
            let matrix = DMat4::from_cols(
                (1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0).into(),
                (-2.0 * n.y * n.x, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0).into(),
                (-2.0 * n.z * n.x, -2.0 * n.z * n.y, 1.0 - 2.0 * n.z * n.z, 0.0).into(),
                (0.0, 0.0, 0.0, 1.0).into(),
            );
            mesh.transform(&matrix);
            Ok(mesh)
        }

        GeometryNode::Multmatrix { matrix, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.transform(&DMat4::from_cols_array_2d(matrix));
            Ok(mesh)
        }

        GeometryNode::Color { rgba, child } => {
            let mut mesh = node_to_mesh(child)?;
            let [r, g, b, a] = rgba.map(|c| c as f32);
            mesh.set_uniform_color([r, g, b, a]);
            Ok(mesh)
        }

        // =====================================================================
        // BOOLEAN OPERATIONS
        // =====================================================================
        // Routed through the fast-union disjointness clusterer rather
        // than a plain pairwise fold: most unions of many solids (grids,
        // bolt patterns) are mutually disjoint and never need the exact
        // Boolean kernel at all. `fast_union` itself falls back to
        // `boolean::union` for whichever clusters turn out to overlap.
        GeometryNode::Union { children } => {
            with_cache(node, children, |meshes| {
                fast_union::fast_union(&meshes, &FastUnionConfig::with_default_budget())
            })
        }

        GeometryNode::Difference { children } => {
            with_cache(node, children, |meshes| {
                fold(meshes, |a, b| boolean::difference(a, b))
            })
        }

        GeometryNode::Intersection { children } => {
            with_cache(node, children, |meshes| {
                fold(meshes, |a, b| boolean::intersection(a, b))
            })
        }

        // `fill()`: union the children as a 2D profile, then drop any
        // interior holes, keeping only the outer boundary. Lowered the
        // same way `offset()` is — a hairline-thickness extrusion, since
        // a bare 2D operator has no height of its own.
        GeometryNode::Fill { children } => {
            if children.is_empty() {
                return Ok(Mesh::new());
            }
            let merged = GeometryNode::Group { children: children.clone() };
            let polygon = extract_2d_polygon(&merged)?;
            let filled = Polygon2D::new(polygon.outer);
            let params = LinearExtrudeParams {
                height: 0.01,
                center: true,
                twist: 0.0,
                slices: 1,
                scale: [1.0, 1.0],
            };
            extrude::linear_extrude(&filled, &params)
        }

        // =====================================================================
        // EXTRUSIONS
        // =====================================================================
        GeometryNode::LinearExtrude {
            height,
            center,
            twist,
            slices,
            scale,
            child,
        } => {
            let polygon = extract_2d_polygon(child)?;
            let params = LinearExtrudeParams {
                height: *height,
                center: *center,
                twist: *twist,
                slices: *slices,
                scale: *scale,
            };
            extrude::linear_extrude(&polygon, &params)
        }

        GeometryNode::RotateExtrude { angle, fn_, child } => {
            let polygon = extract_2d_polygon(child)?;
            let params = RotateExtrudeParams {
                angle: *angle,
                segments: (*fn_).max(8) as usize,
            };
            extrude::rotate_extrude(&polygon, &params)
        }

        // =====================================================================
        // 2D-ONLY OPERATIONS (unsupported as a standalone mesh result)
        // =====================================================================
        GeometryNode::Offset { delta, chamfer, child } => {
            let polygon = extract_2d_polygon(child)?;
            let params = OffsetParams { amount: *delta, chamfer: *chamfer };
            let offset_polygon = offset::offset_polygon(&polygon, &params)
                .map_err(|msg| MeshError::degenerate(msg, None))?;
            // A bare `offset()` has no height; give it a hairline
            // thickness so the result is still a renderable solid.
            let params = LinearExtrudeParams {
                height: 0.01,
                center: true,
                twist: 0.0,
                slices: 1,
                scale: [1.0, 1.0],
            };
            extrude::linear_extrude(&offset_polygon, &params)
        }

        // Orthogonal projection of the 3D child down to the XY plane,
        // lowered like `offset()` to a hairline-thickness extrusion so
        // the result is still a renderable mesh.
        GeometryNode::Projection { cut, child } => {
            let mesh = node_to_mesh(child)?;
            let polygon = if *cut {
                slice_at_z0(&mesh)?
            } else {
                project_silhouette(&mesh)
            };
            let params = LinearExtrudeParams {
                height: 0.01,
                center: true,
                twist: 0.0,
                slices: 1,
                scale: [1.0, 1.0],
            };
            extrude::linear_extrude(&polygon, &params)
        }

        // =====================================================================
        // COMPOUND OPERATIONS
        // =====================================================================
        GeometryNode::Hull { children } => with_cache(node, children, |meshes| {
            let refs: Vec<&Mesh> = meshes.iter().collect();
            hull::hull(&refs)
        }),

        GeometryNode::Minkowski { children } => with_cache(node, children, |meshes| {
            let refs: Vec<&Mesh> = meshes.iter().collect();
            minkowski::minkowski(&refs)
        }),

        GeometryNode::Resize { new_size, autosize, child } => {
            let mut mesh = node_to_mesh(child)?;
            resize_mesh(&mut mesh, *new_size, *autosize);
            Ok(mesh)
        }

        GeometryNode::Text { .. } => Err(MeshError::unsupported(
            "text() glyph rendering is not implemented",
            None,
        )),

        GeometryNode::Render { child, .. } => node_to_mesh(child),

        // =====================================================================
        // META
        // =====================================================================
        GeometryNode::Group { children } => geometry_to_mesh(children),

        // `%` excludes the subtree from the result the rest of the tree
        // contributes to.
        GeometryNode::Background { .. } => Ok(Mesh::new()),

        // `#` renders in addition to the normal result; at the single-mesh
        // boundary that just means "render it".
        GeometryNode::Highlight { child } => node_to_mesh(child),

        GeometryNode::Empty => Ok(Mesh::new()),
    }
}

/// Builds every child mesh, consults [`GeometryCache`] for `node`'s
/// fingerprint before running `op`, and inserts the result on a miss.
fn with_cache(
    node: &GeometryNode,
    children: &[GeometryNode],
    op: impl FnOnce(Vec<Mesh>) -> Result<Mesh, MeshError>,
) -> Result<Mesh, MeshError> {
    if children.is_empty() {
        return Ok(Mesh::new());
    }

    let fingerprint = fingerprint_of(node);
    if let Some(entry) = GeometryCache::global().get(&fingerprint) {
        if let Geometry::PolySet(mesh) = entry.geometry {
            return Ok(mesh);
        }
    }

    let meshes: Result<Vec<Mesh>, MeshError> = children.iter().map(node_to_mesh).collect();
    let mesh = op(meshes?)?;

    GeometryCache::global().insert(
        fingerprint,
        CacheEntry::new(Geometry::PolySet(mesh.clone()), String::new()),
    );
    Ok(mesh)
}

fn fold(
    meshes: Vec<Mesh>,
    op: impl Fn(&Mesh, &Mesh) -> Result<Mesh, MeshError>,
) -> Result<Mesh, MeshError> {
    let mut iter = meshes.into_iter();
    let mut result = iter.next().unwrap_or_default();
    for mesh in iter {
        result = op(&result, &mesh)?;
    }
    Ok(result)
}

/// Structural fingerprint of a geometry node: nodes that serialize
/// identically are guaranteed to evaluate to identical geometry, so this
/// doubles as the cache key the evaluator's memoization rule requires.
fn fingerprint_of(node: &GeometryNode) -> String {
    let bytes = serde_json::to_vec(node).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

/// Extracts a 2D profile from a geometry node for extrusion/offset.
///
/// Handles the three 2D primitives directly, and unwraps `Union` and the
/// linear transforms (translate only, since extrusion profiles are
/// evaluated in their own local XY plane) to find an inner 2D primitive.
fn extract_2d_polygon(node: &GeometryNode) -> Result<Polygon2D, MeshError> {
    match node {
        GeometryNode::Square { size, center } => {
            Ok(Polygon2D::square(DVec2::new(size[0], size[1]), *center))
        }

        GeometryNode::Circle { radius, fn_ } => Ok(Polygon2D::circle(*radius, *fn_)),

        GeometryNode::Polygon { points, .. } => {
            let vertices: Vec<DVec2> = points.iter().map(|p| DVec2::new(p[0], p[1])).collect();
            if vertices.len() < 3 {
                return Err(MeshError::degenerate(
                    "polygon() needs at least 3 vertices",
                    None,
                ));
            }
            Ok(Polygon2D::new(vertices))
        }

        GeometryNode::Union { children } | GeometryNode::Group { children } => {
            if children.is_empty() {
                return Err(MeshError::degenerate(
                    "extrusion child produced no 2D geometry",
                    None,
                ));
            }
            // TODO: compose a union of multiple 2D outlines instead of
            // taking only the first child.
            extract_2d_polygon(&children[0])
        }

        GeometryNode::Translate { offset, child } => {
            let mut polygon = extract_2d_polygon(child)?;
            polygon.translate(DVec2::new(offset[0], offset[1]));
            Ok(polygon)
        }

        _ => Err(MeshError::unsupported(
            "extrusion requires a 2D primitive (square, circle, polygon)",
            None,
        )),
    }
}

/// Orthogonal silhouette of `mesh` onto the XY plane, approximated as the
/// 2D convex hull of its projected vertices. The kernel has no general
/// 2D polygon union to compute the exact (possibly concave) outline of
/// an arbitrary solid's shadow, so this is the same approximation a
/// convex-hull-only 2D layer would produce.
fn project_silhouette(mesh: &Mesh) -> Polygon2D {
    let points: Vec<DVec2> = mesh.vertices().iter().map(|v| DVec2::new(v.x, v.y)).collect();
    Polygon2D::new(convex_hull_2d(&points))
}

/// Cross-section of `mesh` at `z = 0`. Every triangle edge that crosses
/// the plane contributes an intersection point; triangles straddling
/// the plane contribute a segment between their two crossing points.
/// The segments are chained into closed loops, the largest becomes the
/// outer boundary and the rest become holes.
fn slice_at_z0(mesh: &Mesh) -> Result<Polygon2D, MeshError> {
    let mut segments: Vec<(DVec2, DVec2)> = Vec::new();

    for tri in mesh.triangles() {
        let verts = [mesh.vertex(tri[0]), mesh.vertex(tri[1]), mesh.vertex(tri[2])];
        let mut crossings = Vec::new();
        for i in 0..3 {
            let a = verts[i];
            let b = verts[(i + 1) % 3];
            if (a.z <= 0.0 && b.z > 0.0) || (a.z >= 0.0 && b.z < 0.0) {
                let denom = a.z - b.z;
                if denom.abs() > f64::EPSILON {
                    let t = a.z / denom;
                    let p = a + (b - a) * t;
                    crossings.push(DVec2::new(p.x, p.y));
                }
            }
        }
        if crossings.len() == 2 {
            segments.push((crossings[0], crossings[1]));
        }
    }

    let mut loops = chain_segments(&segments);
    if loops.is_empty() {
        return Err(MeshError::degenerate(
            "projection(cut=true) plane does not intersect the child geometry",
            None,
        ));
    }

    loops.sort_by(|a, b| polygon_area(b).partial_cmp(&polygon_area(a)).unwrap());
    let outer = loops.remove(0);
    Ok(Polygon2D::with_holes(outer, loops))
}

/// Interns `p` into `points`, returning the index of an existing point
/// within `1e-6` of it if one exists, so segments sharing an endpoint up
/// to floating-point noise chain together.
fn intern_point(p: DVec2, points: &mut Vec<DVec2>, index_of: &mut HashMap<(i64, i64), usize>) -> usize {
    const EPS: f64 = 1e-6;
    let key = ((p.x / EPS).round() as i64, (p.y / EPS).round() as i64);
    *index_of.entry(key).or_insert_with(|| {
        points.push(p);
        points.len() - 1
    })
}

/// Chains unordered line segments into closed polygon loops by matching
/// shared endpoints. Segments that don't close into a loop are dropped.
fn chain_segments(segments: &[(DVec2, DVec2)]) -> Vec<Vec<DVec2>> {
    let mut points: Vec<DVec2> = Vec::new();
    let mut index_of: HashMap<(i64, i64), usize> = HashMap::new();
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();

    for &(a, b) in segments {
        let ia = intern_point(a, &mut points, &mut index_of);
        let ib = intern_point(b, &mut points, &mut index_of);
        if ia != ib {
            adjacency.entry(ia).or_default().push(ib);
            adjacency.entry(ib).or_default().push(ia);
        }
    }

    let mut visited_edges: HashSet<(usize, usize)> = HashSet::new();
    let mut loops = Vec::new();

    let starts: Vec<usize> = adjacency.keys().copied().collect();
    for start in starts {
        let neighbors = adjacency.get(&start).cloned().unwrap_or_default();
        for next in neighbors {
            if visited_edges.contains(&(start, next)) {
                continue;
            }

            let mut loop_pts = vec![points[start]];
            let mut prev = start;
            let mut current = next;
            visited_edges.insert((prev, current));
            visited_edges.insert((current, prev));
            loop_pts.push(points[current]);

            while current != start {
                let candidates = adjacency.get(&current).cloned().unwrap_or_default();
                let next_node = candidates
                    .into_iter()
                    .find(|&c| c != prev && !visited_edges.contains(&(current, c)));
                match next_node {
                    Some(n) => {
                        visited_edges.insert((current, n));
                        visited_edges.insert((n, current));
                        prev = current;
                        current = n;
                        loop_pts.push(points[current]);
                    }
                    None => break,
                }
            }

            if current == start && loop_pts.len() >= 4 {
                loop_pts.pop(); // drop the duplicate closing point
                loops.push(loop_pts);
            }
        }
    }

    loops
}

fn polygon_area(points: &[DVec2]) -> f64 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area.abs() * 0.5
}

/// Andrew's monotone chain convex hull.
fn convex_hull_2d(points: &[DVec2]) -> Vec<DVec2> {
    let mut pts: Vec<DVec2> = points.to_vec();
    pts.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap().then(a.y.partial_cmp(&b.y).unwrap()));
    pts.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);

    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: DVec2, a: DVec2, b: DVec2) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut lower: Vec<DVec2> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<DVec2> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Rescales `mesh` in place to `new_size`, axis by axis. A `new_size`
/// component of `0.0` (whether or not its `autosize` flag is set) leaves
/// that axis's extent unchanged, matching OpenSCAD's `resize()`: there is
/// no remaining dimension to infer a uniform scale from once the target
/// is already given explicitly.
fn resize_mesh(mesh: &mut Mesh, new_size: [f64; 3], _autosize: [bool; 3]) {
    if mesh.is_empty() {
        return;
    }
    let (min, max) = mesh.bounding_box();
    let extent = max - min;
    let scale = DVec3::new(
        if new_size[0] > 0.0 && extent.x > 0.0 { new_size[0] / extent.x } else { 1.0 },
        if new_size[1] > 0.0 && extent.y > 0.0 { new_size[1] / extent.y } else { 1.0 },
        if new_size[2] > 0.0 && extent.z > 0.0 { new_size[2] / extent.z } else { 1.0 },
    );
    let center = (min + max) * 0.5;
    let matrix = DMat4::from_translation(center)
        * DMat4::from_scale(scale)
        * DMat4::from_translation(-center);
    mesh.transform(&matrix);
}

/// Builds a mesh from an explicit vertex/face list (`polyhedron()`).
fn create_polyhedron(points: &[[f64; 3]], faces: &[Vec<usize>]) -> Result<Mesh, MeshError> {
    if points.is_empty() {
        return Err(MeshError::invalid_topology("polyhedron() has no points", None));
    }
    if faces.is_empty() {
        return Err(MeshError::invalid_topology("polyhedron() has no faces", None));
    }

    let mut mesh = Mesh::with_capacity(points.len(), faces.len() * 2);
    for point in points {
        mesh.add_vertex(DVec3::from_array(*point));
    }

    for face in faces {
        if face.len() < 3 {
            return Err(MeshError::invalid_topology(
                format!("face has fewer than 3 vertices: {face:?}"),
                None,
            ));
        }
        for &idx in face {
            if idx >= points.len() {
                return Err(MeshError::invalid_topology(
                    format!("face index {idx} out of range (max {})", points.len() - 1),
                    None,
                ));
            }
        }
        // Fan triangulation; OpenSCAD faces wind clockwise from outside,
        // so the fan is emitted in reverse to land on our CCW convention.
        for i in 1..face.len() - 1 {
            mesh.add_triangle(face[0] as u32, face[i + 1] as u32, face[i] as u32);
        }
    }

    Ok(mesh)
}
