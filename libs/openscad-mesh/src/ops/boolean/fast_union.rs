//! # Fast Union of Disjoint Solids
//!
//! Unioning dozens of mutually disjoint solids (a grid of cubes, an
//! array of bolt holes) through the exact Boolean path costs far more
//! than the geometry warrants: no pair of them actually intersects, so
//! the "union" is just concatenation. This module finds which operands
//! are disjoint and short-circuits them into a single concatenated,
//! quantized mesh, falling back to the real Boolean union only for
//! clusters that turn out not to be manifold after concatenation.
//!
//! Pipeline:
//! 1. Sort operands along a Hilbert curve over their bounding-box
//!    centers, so spatially close operands are tried against each other
//!    first.
//! 2. Union-find clusters operands whose accumulated AABB sets are
//!    pairwise disjoint, within a per-element exploration budget.
//! 3. Each cluster of size >= 2 is concatenated, vertex-quantized, and
//!    validated; a validation failure falls back to the real union.

use super::csg_tree::BoundingBox as Aabb;
use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;
use std::collections::HashMap;

/// Tuning knobs for the clusterer.
#[derive(Debug, Clone, Copy)]
pub struct FastUnionConfig {
    /// Max pair tests attempted per element before giving up on further
    /// merges for it.
    pub exploration_budget: usize,
    /// Skip the post-concatenation manifold check entirely. Trades
    /// correctness for speed; matches `OPTIMISTIC_FAST_UNION`.
    pub optimistic: bool,
}

impl FastUnionConfig {
    pub fn with_default_budget() -> Self {
        Self {
            exploration_budget: config::constants::FAST_UNION_EXPLORATION_BUDGET,
            optimistic: false,
        }
    }
}

impl Default for FastUnionConfig {
    fn default() -> Self {
        Self::with_default_budget()
    }
}

/// Unions `meshes`, taking the disjointness fast path for clusters that
/// qualify and falling back to the exact Boolean union for the rest.
pub fn fast_union(meshes: &[Mesh], cfg: &FastUnionConfig) -> Result<Mesh, MeshError> {
    match meshes.len() {
        0 => return Ok(Mesh::new()),
        1 => return Ok(meshes[0].clone()),
        _ => {}
    }

    let clusters = cluster_disjoint(meshes, cfg);
    let mut result = Mesh::new();

    for cluster in clusters {
        if cluster.len() == 1 {
            result.merge(&meshes[cluster[0]]);
            continue;
        }

        let concatenated = concatenate_cluster(meshes, &cluster);
        let quantized = quantize_vertices(&concatenated, config::constants::COORDINATE_SCALE);

        if cfg.optimistic || quantized.validate() {
            result.merge(&quantized);
        } else {
            let mut acc = meshes[cluster[0]].clone();
            for &idx in &cluster[1..] {
                acc = super::union(&acc, &meshes[idx])?;
            }
            result.merge(&acc);
        }
    }

    Ok(result)
}

/// Groups operand indices into clusters that are pairwise disjoint
/// (across cluster boundaries) under the Hilbert-order, budgeted pair
/// test described in the module docs.
pub fn cluster_disjoint(meshes: &[Mesh], cfg: &FastUnionConfig) -> Vec<Vec<usize>> {
    let n = meshes.len();
    if n == 0 {
        return Vec::new();
    }

    let aabbs: Vec<Aabb> = meshes.iter().map(Aabb::from_mesh).collect();

    let mut world = Aabb::empty();
    for b in &aabbs {
        world = world.union(b);
    }
    let extent = (world.max - world.min).max(DVec3::splat(1e-9));

    const HILBERT_BITS: u32 = 12;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| hilbert_key(&aabbs[i], world.min, extent, HILBERT_BITS));

    let mut clusters = ClusterState::new(n, &aabbs);

    for (pos, &i) in order.iter().enumerate() {
        let mut attempts = 0;
        for &j in order.iter().skip(pos + 1) {
            if attempts >= cfg.exploration_budget {
                break;
            }
            attempts += 1;

            let ri = clusters.find(i);
            let rj = clusters.find(j);
            if ri == rj {
                continue;
            }
            if clusters.are_disjoint(ri, rj) {
                clusters.union(ri, rj);
            }
        }
    }

    clusters.into_groups()
}

fn concatenate_cluster(meshes: &[Mesh], indices: &[usize]) -> Mesh {
    let mut merged = Mesh::new();
    for &i in indices {
        merged.merge(&meshes[i]);
    }
    merged
}

/// Rounds every vertex to the nearest `1 / scale` grid point, closing
/// the tiny cracks concatenation leaves between abutting solids.
fn quantize_vertices(mesh: &Mesh, scale: f64) -> Mesh {
    let mut out = Mesh::with_capacity(mesh.vertex_count(), mesh.triangle_count());
    for v in mesh.vertices() {
        out.add_vertex(DVec3::new(
            (v.x * scale).round() / scale,
            (v.y * scale).round() / scale,
            (v.z * scale).round() / scale,
        ));
    }
    for tri in mesh.triangles() {
        out.add_triangle(tri[0], tri[1], tri[2]);
    }
    out
}

struct ClusterState {
    parent: Vec<usize>,
    size: Vec<usize>,
    boxes: Vec<Vec<Aabb>>,
}

impl ClusterState {
    fn new(n: usize, aabbs: &[Aabb]) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            boxes: aabbs.iter().map(|b| vec![*b]).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn are_disjoint(&self, a: usize, b: usize) -> bool {
        self.boxes[a].iter().all(|x| self.boxes[b].iter().all(|y| !x.overlaps(y)))
    }

    fn union(&mut self, a: usize, b: usize) {
        let (keep, drop) = if self.size[a] >= self.size[b] { (a, b) } else { (b, a) };
        self.parent[drop] = keep;
        self.size[keep] += self.size[drop];
        let moved = std::mem::take(&mut self.boxes[drop]);
        self.boxes[keep].extend(moved);
    }

    fn into_groups(mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..n {
            let root = self.find(i);
            groups.entry(root).or_default().push(i);
        }
        groups.into_values().collect()
    }
}

/// Maps an AABB's center into a single Hilbert-curve distance, via
/// Skilling's axes-to-transpose construction. `bits` is the per-axis
/// resolution; 12 bits (4096 buckets/axis) comfortably separates any
/// realistic scene after normalizing into the world bounding box.
fn hilbert_key(bbox: &Aabb, world_min: DVec3, world_extent: DVec3, bits: u32) -> u64 {
    let center = (bbox.min + bbox.max) * 0.5;
    let normalized = (center - world_min) / world_extent;
    let scale = ((1u64 << bits) - 1) as f64;

    let mut coords = [
        (normalized.x.clamp(0.0, 1.0) * scale) as u32,
        (normalized.y.clamp(0.0, 1.0) * scale) as u32,
        (normalized.z.clamp(0.0, 1.0) * scale) as u32,
    ];
    axes_to_transpose(&mut coords, bits);

    let mut h: u64 = 0;
    for b in (0..bits).rev() {
        for axis in coords {
            h = (h << 1) | ((axis >> b) & 1) as u64;
        }
    }
    h
}

fn axes_to_transpose(x: &mut [u32; 3], bits: u32) {
    let m: u32 = 1 << (bits - 1);
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..3 {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q >>= 1;
    }
    for i in 1..3 {
        x[i] ^= x[i - 1];
    }
    let mut t = 0u32;
    q = m;
    while q > 1 {
        if x[2] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for v in x.iter_mut() {
        *v ^= t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_at(offset: f64) -> Mesh {
        let mut mesh = Mesh::new();
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        for c in corners {
            mesh.add_vertex(c + DVec3::splat(offset));
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    #[test]
    fn single_mesh_passes_through_unchanged() {
        let mesh = cube_at(0.0);
        let result = fast_union(std::slice::from_ref(&mesh), &FastUnionConfig::default()).unwrap();
        assert_eq!(result.vertex_count(), mesh.vertex_count());
    }

    #[test]
    fn disjoint_operands_cluster_together() {
        let meshes = vec![cube_at(0.0), cube_at(100.0), cube_at(200.0)];
        let clusters = cluster_disjoint(&meshes, &FastUnionConfig::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn fast_union_concatenates_disjoint_operands() {
        let meshes = vec![cube_at(0.0), cube_at(100.0)];
        let result = fast_union(&meshes, &FastUnionConfig::default()).unwrap();
        assert_eq!(result.vertex_count(), 8);
        assert_eq!(result.triangle_count(), 4);
    }

    #[test]
    fn quantize_vertices_snaps_to_grid() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(1.0000001, 2.0, 3.0));
        let quantized = quantize_vertices(&mesh, 1e6);
        assert!((quantized.vertex(0).x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hilbert_key_is_deterministic() {
        let bbox = Aabb::new(DVec3::new(1.0, 2.0, 3.0), DVec3::new(1.0, 2.0, 3.0));
        let a = hilbert_key(&bbox, DVec3::ZERO, DVec3::splat(10.0), 8);
        let b = hilbert_key(&bbox, DVec3::ZERO, DVec3::splat(10.0), 8);
        assert_eq!(a, b);
    }
}
