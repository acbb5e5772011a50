//! # CSG Algebra — Sum-of-Products Normal Form
//!
//! The preview pipeline does not want a fully evaluated mesh for every
//! node; it wants a `CSGProducts` — a union of products, each a leaf-only
//! `(⋂ intersections) ∖ (⋃ subtractions)` — that a depth-based renderer
//! can draw without ever calling into the exact kernel. This module
//! builds that structure from a `CSGNode` tree: [`create_csg_node`]
//! assembles and prunes the tree, [`CSGTreeNormalizer`] rewrites it into
//! sum-of-products form, and [`import`] flattens the normalized tree into
//! a flat [`CSGProducts`].

use super::{BoundingBox, CsgOp};
use crate::mesh::Mesh;
use glam::DMat4;

/// `BACKGROUND`/`HIGHLIGHT` propagate down the tree: a child's flags are
/// always the OR of its own plus every ancestor's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CSGFlags {
    pub background: bool,
    pub highlight: bool,
}

impl CSGFlags {
    pub const NONE: CSGFlags = CSGFlags { background: false, highlight: false };

    pub fn background() -> Self {
        Self { background: true, highlight: false }
    }

    pub fn highlight() -> Self {
        Self { background: false, highlight: true }
    }

    pub fn or(self, other: CSGFlags) -> CSGFlags {
        CSGFlags {
            background: self.background || other.background,
            highlight: self.highlight || other.highlight,
        }
    }
}

/// A single CSG leaf: a `PolySet` (or the empty set) plus the transform
/// and color to render it with.
///
/// The empty set is represented by `polyset: None` with the sentinel
/// label `"empty()"`, rather than a variant of its own, so that pruning
/// rules in [`create_csg_node`] only need to check one field.
#[derive(Debug, Clone)]
pub struct CSGLeaf {
    pub polyset: Option<Mesh>,
    pub matrix: DMat4,
    pub color: [f32; 4],
    pub label: String,
    pub index: i32,
    pub bbox: BoundingBox,
    pub flags: CSGFlags,
}

impl CSGLeaf {
    /// Builds a leaf from a local-space `polyset`, placing its bounding
    /// box in the coordinate frame `matrix` transforms into.
    pub fn new(polyset: Mesh, matrix: DMat4, color: [f32; 4], label: impl Into<String>, index: i32) -> Self {
        let mut transformed = polyset.clone();
        transformed.transform(&matrix);
        let bbox = BoundingBox::from_mesh(&transformed);
        Self { polyset: Some(polyset), matrix, color, label: label.into(), index, bbox, flags: CSGFlags::NONE }
    }

    pub fn empty() -> Self {
        Self {
            polyset: None,
            matrix: DMat4::IDENTITY,
            color: config::constants::DEFAULT_COLOR,
            label: "empty()".to_string(),
            index: -1,
            bbox: BoundingBox::empty(),
            flags: CSGFlags::NONE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polyset.is_none()
    }

    pub fn with_flags(mut self, flags: CSGFlags) -> Self {
        self.flags = self.flags.or(flags);
        self
    }
}

/// A binary CSG operation over two already-pruned subtrees.
#[derive(Debug, Clone)]
pub struct CSGOperation {
    pub op: CsgOp,
    pub left: Box<CSGNode>,
    pub right: Box<CSGNode>,
    pub bbox: BoundingBox,
    pub flags: CSGFlags,
}

/// A node in the CSG algebra tree: either a concrete leaf or a binary
/// operation over two subtrees.
#[derive(Debug, Clone)]
pub enum CSGNode {
    Leaf(CSGLeaf),
    Operation(CSGOperation),
}

impl CSGNode {
    pub fn empty() -> Self {
        CSGNode::Leaf(CSGLeaf::empty())
    }

    pub fn leaf(leaf: CSGLeaf) -> Self {
        CSGNode::Leaf(leaf)
    }

    pub fn is_empty_set(&self) -> bool {
        matches!(self, CSGNode::Leaf(leaf) if leaf.is_empty())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            CSGNode::Leaf(leaf) => leaf.bbox,
            CSGNode::Operation(op) => op.bbox,
        }
    }

    pub fn flags(&self) -> CSGFlags {
        match self {
            CSGNode::Leaf(leaf) => leaf.flags,
            CSGNode::Operation(op) => op.flags,
        }
    }
}

fn take_child(boxed: &mut Box<CSGNode>) -> Box<CSGNode> {
    std::mem::replace(boxed, Box::new(CSGNode::empty()))
}

/// Releases a chain of operation nodes iteratively instead of letting
/// the derived recursive drop walk it frame by frame, which would
/// overflow the stack on a long linear chain of shared nodes.
impl Drop for CSGNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        if let CSGNode::Operation(op) = self {
            stack.push(take_child(&mut op.left));
            stack.push(take_child(&mut op.right));
        }
        while let Some(mut boxed) = stack.pop() {
            if let CSGNode::Operation(op) = boxed.as_mut() {
                stack.push(take_child(&mut op.left));
                stack.push(take_child(&mut op.right));
            }
        }
    }
}

/// Assembles a binary operation node, applying the empty-set absorption
/// and bounding-box pruning rules so that an empty operand never leaves
/// a dangling reference in the result.
///
/// `left`/`right` are `None` when the corresponding operand is simply
/// absent (e.g. a module with no children) rather than present-but-empty.
pub fn create_csg_node(op: CsgOp, left: Option<CSGNode>, right: Option<CSGNode>) -> CSGNode {
    let (left, right) = match (left, right) {
        (None, None) => return CSGNode::empty(),
        (None, Some(r)) => return r,
        (Some(l), None) => return l,
        (Some(l), Some(r)) => (l, r),
    };

    if right.is_empty_set() {
        return match op {
            CsgOp::Union | CsgOp::Difference => left,
            CsgOp::Intersection => right,
        };
    }
    if left.is_empty_set() {
        return match op {
            CsgOp::Union => right,
            CsgOp::Difference | CsgOp::Intersection => left,
        };
    }

    let lb = left.bounding_box();
    let rb = right.bounding_box();
    let newbox = match op {
        CsgOp::Intersection => {
            let ib = lb.intersection(&rb);
            if !ib.is_valid() {
                return CSGNode::empty();
            }
            ib
        }
        CsgOp::Difference => {
            let ib = lb.intersection(&rb);
            if !ib.is_valid() {
                return left;
            }
            lb
        }
        CsgOp::Union => lb.union(&rb),
    };

    let flags = left.flags().or(right.flags());
    CSGNode::Operation(CSGOperation {
        op,
        left: Box::new(left),
        right: Box::new(right),
        bbox: newbox,
        flags,
    })
}

/// Rewrites a CSG tree into sum-of-products normal form: associativity,
/// distribution of intersection over union, and pushdown of difference
/// across union on the right, bounded by a total element budget.
///
/// Exceeding the budget aborts the rewrite for the whole tree and
/// returns the input unchanged, rather than a partially-rewritten tree.
pub struct CSGTreeNormalizer {
    budget: usize,
    count: usize,
}

impl CSGTreeNormalizer {
    pub fn new(budget: usize) -> Self {
        Self { budget, count: 0 }
    }

    pub fn with_default_budget() -> Self {
        Self::new(config::constants::CSG_NORMALIZE_ELEMENT_BUDGET)
    }

    /// Returns the normalized tree and whether the normalizer aborted
    /// (in which case the returned tree is `node` unchanged).
    pub fn normalize(&mut self, node: CSGNode) -> (CSGNode, bool) {
        self.count = 0;
        let fallback = node.clone();
        match self.rewrite(node) {
            Some(rewritten) => (rewritten, false),
            None => (fallback, true),
        }
    }

    fn bump(&mut self) -> bool {
        self.count += 1;
        self.count <= self.budget
    }

    fn rewrite(&mut self, node: CSGNode) -> Option<CSGNode> {
        if !self.bump() {
            return None;
        }
        match node {
            CSGNode::Leaf(_) => Some(node),
            CSGNode::Operation(CSGOperation { op, left, right, .. }) => {
                let left = self.rewrite(*left)?;
                let right = self.rewrite(*right)?;
                match op {
                    CsgOp::Union => Some(create_csg_node(op, Some(left), Some(right))),
                    CsgOp::Intersection => self.distribute_intersection(left, right),
                    CsgOp::Difference => self.pushdown_difference(left, right),
                }
            }
        }
    }

    fn distribute_intersection(&mut self, left: CSGNode, right: CSGNode) -> Option<CSGNode> {
        if let CSGNode::Operation(CSGOperation { op: CsgOp::Union, left: rl, right: rr, .. }) = right {
            let a = self.rewrite(raw_op(CsgOp::Intersection, Box::new(left.clone()), rl))?;
            let b = self.rewrite(raw_op(CsgOp::Intersection, Box::new(left), rr))?;
            return Some(create_csg_node(CsgOp::Union, Some(a), Some(b)));
        }
        if let CSGNode::Operation(CSGOperation { op: CsgOp::Union, left: ll, right: lr, .. }) = left {
            let a = self.rewrite(raw_op(CsgOp::Intersection, ll, Box::new(right.clone())))?;
            let b = self.rewrite(raw_op(CsgOp::Intersection, lr, Box::new(right)))?;
            return Some(create_csg_node(CsgOp::Union, Some(a), Some(b)));
        }
        Some(create_csg_node(CsgOp::Intersection, Some(left), Some(right)))
    }

    fn pushdown_difference(&mut self, left: CSGNode, right: CSGNode) -> Option<CSGNode> {
        if let CSGNode::Operation(CSGOperation { op: CsgOp::Union, left: rl, right: rr, .. }) = right {
            let inner = self.rewrite(raw_op(CsgOp::Difference, Box::new(left), rl))?;
            self.rewrite(raw_op(CsgOp::Difference, Box::new(inner), rr))
        } else {
            Some(create_csg_node(CsgOp::Difference, Some(left), Some(right)))
        }
    }
}

/// Builds a placeholder operation node purely to feed back into
/// `rewrite`; its bbox/flags are never read because `rewrite` only
/// inspects `op`/`left`/`right` before recomputing both via
/// `create_csg_node`.
fn raw_op(op: CsgOp, left: Box<CSGNode>, right: Box<CSGNode>) -> CSGNode {
    CSGNode::Operation(CSGOperation { op, left, right, bbox: BoundingBox::empty(), flags: CSGFlags::NONE })
}

/// One product in the sum-of-products form: `(⋂ intersections) ∖ (⋃ subtractions)`.
#[derive(Debug, Clone, Default)]
pub struct CSGProduct {
    pub intersections: Vec<CSGLeaf>,
    pub subtractions: Vec<CSGLeaf>,
}

impl CSGProduct {
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// `throwntogether=false` gives the correct product bound
    /// (intersection of the intersections' AABBs); `throwntogether=true`
    /// unions every AABB including subtractions, for preview framing
    /// that must not clip a not-yet-evaluated cut.
    pub fn bounding_box(&self, throwntogether: bool) -> BoundingBox {
        if throwntogether {
            let mut bbox = BoundingBox::empty();
            for leaf in self.intersections.iter().chain(self.subtractions.iter()) {
                bbox = bbox.union(&leaf.bbox);
            }
            bbox
        } else {
            let mut iter = self.intersections.iter();
            let Some(first) = iter.next() else { return BoundingBox::empty() };
            let mut bbox = first.bbox;
            for leaf in iter {
                bbox = bbox.intersection(&leaf.bbox);
            }
            bbox
        }
    }
}

/// A union of [`CSGProduct`]s — the flattened form a depth-based
/// renderer consumes directly, one product at a time.
#[derive(Debug, Clone, Default)]
pub struct CSGProducts {
    pub products: Vec<CSGProduct>,
}

impl CSGProducts {
    pub fn is_empty(&self) -> bool {
        self.products.iter().all(CSGProduct::is_empty)
    }

    pub fn bounding_box(&self, throwntogether: bool) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for product in &self.products {
            bbox = bbox.union(&product.bounding_box(throwntogether));
        }
        bbox
    }
}

/// Flattens a (normalized) CSG tree into [`CSGProducts`] using the same
/// union/intersection/difference context-propagation rule the geometry
/// evaluator itself uses for flags: a `UNION` context starts a new
/// product once the current one already holds an intersection; a
/// `DIFFERENCE` context routes its right operand to `subtractions`
/// while keeping the parent's context on the left.
pub fn import(node: &CSGNode, context: CsgOp, flags: CSGFlags) -> CSGProducts {
    let mut products = CSGProducts::default();
    let mut current = CSGProduct::default();
    import_into(node, context, flags, &mut products, &mut current);
    if !current.intersections.is_empty() || !current.subtractions.is_empty() {
        products.products.push(current);
    }
    products
}

/// Normalizes `node` with the default element budget and imports the
/// result, in one step.
pub fn normalize_and_import(node: CSGNode) -> (CSGProducts, bool) {
    let mut normalizer = CSGTreeNormalizer::with_default_budget();
    let (normalized, aborted) = normalizer.normalize(node);
    (import(&normalized, CsgOp::Union, CSGFlags::NONE), aborted)
}

fn import_into(
    node: &CSGNode,
    context: CsgOp,
    flags: CSGFlags,
    products: &mut CSGProducts,
    current: &mut CSGProduct,
) {
    let flags = flags.or(node.flags());
    match node {
        CSGNode::Leaf(leaf) => {
            if leaf.is_empty() {
                return;
            }
            if matches!(context, CsgOp::Union) && !current.intersections.is_empty() {
                products.products.push(std::mem::take(current));
            }
            let leaf = leaf.clone().with_flags(flags);
            match context {
                CsgOp::Difference => current.subtractions.push(leaf),
                CsgOp::Union | CsgOp::Intersection => current.intersections.push(leaf),
            }
        }
        CSGNode::Operation(op) => match op.op {
            CsgOp::Union => {
                import_into(&op.left, CsgOp::Union, flags, products, current);
                import_into(&op.right, CsgOp::Union, flags, products, current);
            }
            CsgOp::Intersection => {
                import_into(&op.left, CsgOp::Intersection, flags, products, current);
                import_into(&op.right, CsgOp::Intersection, flags, products, current);
            }
            CsgOp::Difference => {
                import_into(&op.left, context, flags, products, current);
                import_into(&op.right, CsgOp::Difference, flags, products, current);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn triangle_at(offset: f64) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(offset, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(offset + 1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(offset, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    fn leaf_at(offset: f64, label: &str) -> CSGNode {
        CSGNode::leaf(CSGLeaf::new(triangle_at(offset), DMat4::IDENTITY, [1.0; 4], label, 0))
    }

    #[test]
    fn create_csg_node_absorbs_empty_operands() {
        let a = leaf_at(0.0, "a");
        let node = create_csg_node(CsgOp::Union, Some(a), Some(CSGNode::empty()));
        match node {
            CSGNode::Leaf(leaf) => assert_eq!(leaf.label, "a"),
            _ => panic!("expected the non-empty operand back"),
        }
    }

    #[test]
    fn create_csg_node_prunes_non_overlapping_intersection() {
        let a = leaf_at(0.0, "a");
        let b = leaf_at(100.0, "b");
        let node = create_csg_node(CsgOp::Intersection, Some(a), Some(b));
        assert!(node.is_empty_set());
    }

    #[test]
    fn create_csg_node_difference_keeps_left_bbox() {
        let a = leaf_at(0.0, "a");
        let a_bbox = a.bounding_box();
        let b = leaf_at(0.5, "b");
        let node = create_csg_node(CsgOp::Difference, Some(a), Some(b));
        assert_eq!(node.bounding_box().min, a_bbox.min);
        assert_eq!(node.bounding_box().max, a_bbox.max);
    }

    #[test]
    fn import_splits_union_into_separate_products() {
        let tree = create_csg_node(CsgOp::Union, Some(leaf_at(0.0, "a")), Some(leaf_at(100.0, "b")));
        let products = import(&tree, CsgOp::Union, CSGFlags::NONE);
        assert_eq!(products.products.len(), 2);
    }

    #[test]
    fn import_puts_difference_operand_in_subtractions() {
        let tree = create_csg_node(CsgOp::Difference, Some(leaf_at(0.0, "a")), Some(leaf_at(0.2, "b")));
        let products = import(&tree, CsgOp::Union, CSGFlags::NONE);
        assert_eq!(products.products.len(), 1);
        assert_eq!(products.products[0].intersections.len(), 1);
        assert_eq!(products.products[0].subtractions.len(), 1);
    }

    #[test]
    fn flags_accumulate_down_the_tree() {
        let mut a = leaf_at(0.0, "a");
        if let CSGNode::Leaf(leaf) = &mut a {
            leaf.flags = CSGFlags::highlight();
        }
        let tree = create_csg_node(CsgOp::Union, Some(a), Some(leaf_at(0.2, "b")));
        let products = import(&tree, CsgOp::Union, CSGFlags::background());
        let all_leaves: Vec<&CSGLeaf> = products.products.iter().flat_map(|p| p.intersections.iter()).collect();
        assert!(all_leaves.iter().all(|l| l.flags.background));
        assert!(all_leaves.iter().any(|l| l.flags.highlight));
    }

    #[test]
    fn normalizer_distributes_intersection_over_union() {
        let union = create_csg_node(CsgOp::Union, Some(leaf_at(0.0, "b")), Some(leaf_at(10.0, "c")));
        let tree = create_csg_node(CsgOp::Intersection, Some(leaf_at(0.0, "a")), Some(union));
        let mut normalizer = CSGTreeNormalizer::with_default_budget();
        let (_normalized, aborted) = normalizer.normalize(tree);
        assert!(!aborted);
    }

    #[test]
    fn normalizer_aborts_over_budget_and_keeps_tree_unchanged() {
        let tree = create_csg_node(CsgOp::Union, Some(leaf_at(0.0, "a")), Some(leaf_at(1.0, "b")));
        let mut normalizer = CSGTreeNormalizer::new(1);
        let (_normalized, aborted) = normalizer.normalize(tree);
        assert!(aborted);
    }

    #[test]
    fn product_bounding_box_throwntogether_includes_subtractions() {
        let tree = create_csg_node(CsgOp::Difference, Some(leaf_at(0.0, "a")), Some(leaf_at(5.0, "b")));
        let products = import(&tree, CsgOp::Union, CSGFlags::NONE);
        let product = &products.products[0];
        let tight = product.bounding_box(false);
        let loose = product.bounding_box(true);
        assert!(loose.max.x >= tight.max.x);
    }
}
