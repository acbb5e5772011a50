//! # Geometry Types
//!
//! Evaluated geometry node types representing resolved OpenSCAD geometry.
//!
//! These types have all expressions evaluated - sizes are concrete numbers,
//! transforms are resolved matrices, etc.

use serde::{Deserialize, Serialize};

// =============================================================================
// EVALUATED AST
// =============================================================================

/// Result of AST evaluation.
///
/// Contains the root geometry node and any warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedAst {
    /// Root geometry node.
    pub geometry: GeometryNode,
    /// Evaluation warnings.
    pub warnings: Vec<String>,
}

impl EvaluatedAst {
    /// Create new evaluated AST.
    pub fn new(geometry: GeometryNode) -> Self {
        Self {
            geometry,
            warnings: Vec::new(),
        }
    }

    /// Create with warnings.
    pub fn with_warnings(geometry: GeometryNode, warnings: Vec<String>) -> Self {
        Self { geometry, warnings }
    }
}

// =============================================================================
// GEOMETRY NODE
// =============================================================================

/// A node in the evaluated geometry tree.
///
/// All values are fully resolved (no variables, expressions evaluated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeometryNode {
    // =========================================================================
    // 3D PRIMITIVES
    // =========================================================================

    /// Cube primitive.
    ///
    /// ## OpenSCAD Equivalent
    /// 
    /// ```text
    /// cube(size);
    /// cube([x, y, z], center=true);
    /// ```
    Cube {
        /// Size as [x, y, z].
        size: [f64; 3],
        /// Whether centered at origin.
        center: bool,
    },

    /// Sphere primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// sphere(r=5);
    /// sphere(d=10, $fn=32);
    /// ```
    Sphere {
        /// Radius.
        radius: f64,
        /// Number of fragments ($fn).
        fn_: u32,
    },

    /// Cylinder primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// cylinder(h=10, r=5);
    /// cylinder(h=10, r1=5, r2=3, center=true);
    /// ```
    Cylinder {
        /// Height.
        height: f64,
        /// Bottom radius.
        radius1: f64,
        /// Top radius.
        radius2: f64,
        /// Whether centered.
        center: bool,
        /// Number of fragments.
        fn_: u32,
    },

    /// Polyhedron primitive.
    Polyhedron {
        /// Vertex positions.
        points: Vec<[f64; 3]>,
        /// Face indices.
        faces: Vec<Vec<usize>>,
    },

    // =========================================================================
    // 2D PRIMITIVES
    // =========================================================================

    /// Circle primitive.
    Circle {
        /// Radius.
        radius: f64,
        /// Number of fragments.
        fn_: u32,
    },

    /// Square/rectangle primitive.
    Square {
        /// Size as [x, y].
        size: [f64; 2],
        /// Whether centered.
        center: bool,
    },

    /// Polygon primitive.
    Polygon {
        /// Vertex positions.
        points: Vec<[f64; 2]>,
        /// Optional paths.
        paths: Option<Vec<Vec<usize>>>,
    },

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Translation transform.
    Translate {
        /// Translation vector [x, y, z].
        offset: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Rotation transform.
    Rotate {
        /// Rotation angles [x, y, z] in degrees.
        angles: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Scale transform.
    Scale {
        /// Scale factors [x, y, z].
        factors: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Mirror transform.
    Mirror {
        /// Mirror plane normal.
        normal: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// General matrix transform.
    Multmatrix {
        /// 4x4 transformation matrix.
        matrix: [[f64; 4]; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Color modifier.
    Color {
        /// RGBA color.
        rgba: [f64; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // BOOLEAN OPERATIONS
    // =========================================================================

    /// Union of children.
    Union {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Difference (first child minus rest).
    Difference {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Intersection of children.
    Intersection {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// 2D fill: unions the children, then discards any interior holes,
    /// keeping only the outer boundaries.
    Fill {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    // =========================================================================
    // EXTRUSIONS
    // =========================================================================

    /// Linear extrusion.
    LinearExtrude {
        /// Extrusion height.
        height: f64,
        /// Twist angle in degrees.
        twist: f64,
        /// Scale at top.
        scale: [f64; 2],
        /// Number of slices.
        slices: u32,
        /// Whether centered.
        center: bool,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Rotational extrusion.
    RotateExtrude {
        /// Sweep angle in degrees.
        angle: f64,
        /// Number of fragments.
        fn_: u32,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// 2D offset (inset/outset) of a child polygon.
    Offset {
        /// Straight or round offset distance.
        delta: f64,
        /// If true and `delta` mode, use chamfered (straight) corners
        /// instead of mitered ones.
        chamfer: bool,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Projection of a 3D child down to 2D.
    Projection {
        /// If true, take the Z=0 cross-section instead of the full outline.
        cut: bool,
        /// Child 3D geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // COMPOUND OPERATIONS
    // =========================================================================

    /// Convex hull of the children.
    Hull {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Minkowski sum of the children.
    Minkowski {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Resize to an explicit bounding box, optionally preserving aspect
    /// ratio on axes marked in `autosize`.
    Resize {
        /// Target size per axis; 0.0 means "keep this axis's extent".
        new_size: [f64; 3],
        /// Which axes participate in autosize.
        autosize: [bool; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// 2D text rendered as an outline.
    Text {
        /// String content.
        text: String,
        /// Font size.
        size: f64,
        /// Font family/style descriptor (e.g. "Liberation Sans:style=Bold").
        font: Option<String>,
        /// Number of fragments used to approximate glyph curves.
        fn_: u32,
    },

    /// Explicit request to force exact (CGAL-equivalent) evaluation of a
    /// subtree, bypassing the fast-union path.
    Render {
        /// Convexity hint forwarded to the boolean kernel.
        convexity: u32,
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // META
    // =========================================================================

    /// Group of geometries (implicit union).
    Group {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// `%` background modifier: rendered transparently, excluded from the
    /// final CSG result this node's siblings contribute to.
    Background {
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// `#` highlight modifier: rendered in addition to the final result.
    Highlight {
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Empty geometry (for conditionals, disabled subtrees, or modules that
    /// produce nothing).
    Empty,
}

impl GeometryNode {
    /// Check if this is an empty node.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if this is a 2D node.
    pub fn is_2d(&self) -> bool {
        matches!(
            self,
            Self::Circle { .. }
                | Self::Square { .. }
                | Self::Polygon { .. }
                | Self::Offset { .. }
                | Self::Projection { .. }
                | Self::Fill { .. }
                | Self::Text { .. }
        )
    }

    /// Check if this is a 3D node.
    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            Self::Cube { .. }
                | Self::Sphere { .. }
                | Self::Cylinder { .. }
                | Self::Polyhedron { .. }
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_node() {
        let cube = GeometryNode::Cube {
            size: [10.0, 10.0, 10.0],
            center: false,
        };
        assert!(cube.is_3d());
        assert!(!cube.is_2d());
    }

    #[test]
    fn test_circle_node() {
        let circle = GeometryNode::Circle {
            radius: 5.0,
            fn_: 32,
        };
        assert!(circle.is_2d());
        assert!(!circle.is_3d());
    }

    #[test]
    fn test_empty_node() {
        let empty = GeometryNode::Empty;
        assert!(empty.is_empty());
    }
}
