//! Centralized configuration values shared across the Rust OpenSCAD pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Examples
/// ```
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Numerical tolerance used by geometry kernels. Same value as [`EPSILON`];
/// kept as a distinct name because kernel call sites read more clearly with
/// "tolerance" than "epsilon".
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = EPSILON;

/// Epsilon for vertex deduplication.
///
/// Slightly larger tolerance used when merging nearly-identical vertices
/// during mesh optimization. This helps clean up numerical noise from
/// boolean operations and transformations.
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Scaling factor for converting f64 coordinates to i64 for integer
/// algorithms (vertex quantization in the fast-union path, polygon
/// clipping).
pub const COORDINATE_SCALE: f64 = 1e6;

// =============================================================================
// RESOLUTION CONSTANTS (OpenSCAD $fn, $fa, $fs)
// =============================================================================

/// Default value for $fn (fragment count override). 0 means "use $fa/$fs".
pub const DEFAULT_FN: f64 = 0.0;

/// Default value for $fa (minimum fragment angle in degrees).
pub const DEFAULT_FA: f64 = 12.0;

/// Default value for $fs (minimum fragment size).
pub const DEFAULT_FS: f64 = 2.0;

/// Default tessellation segment count for primitives that require angular
/// resolution such as cylinders or spheres, for call sites that don't go
/// through the full $fn/$fa/$fs formula (e.g. customizer schema defaults).
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_SEGMENTS;
/// assert!(DEFAULT_SEGMENTS >= 12);
/// ```
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Minimum number of fragments for any circular shape.
pub const MIN_FRAGMENTS: u32 = 5;

/// Maximum number of fragments for any circular shape.
pub const MAX_FRAGMENTS: u32 = 1000;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum recursion depth for evaluator. The `Recursion` error kind fires
/// once a subtree exceeds this.
pub const MAX_RECURSION_DEPTH: usize = 1000;

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Maximum number of vertices in a single mesh.
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

/// Maximum file size for imported files (in bytes). 100 MB default.
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Maximum number of documents the LSP server keeps in memory simultaneously.
///
/// # Examples
/// ```
/// use config::constants::MAX_LSP_DOCUMENTS;
/// assert!(MAX_LSP_DOCUMENTS >= 16);
/// ```
pub const MAX_LSP_DOCUMENTS: usize = 64;

// =============================================================================
// GEOMETRY CONSTANTS
// =============================================================================

/// Default convexity value for extrusions and other operations.
pub const DEFAULT_CONVEXITY: u32 = 1;

/// Default number of slices for linear_extrude with twist.
pub const DEFAULT_EXTRUDE_SLICES: u32 = 1;

/// Default color when none is specified (light gray), RGBA in [0,1].
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// =============================================================================
// CACHE CONSTANTS
// =============================================================================

/// Default byte budget for the in-memory geometry cache.
pub const GEOMETRY_CACHE_DEFAULT_BYTES: usize = 100 * 1024 * 1024;

/// Default byte budget for the in-memory exact-geometry cache.
pub const CGAL_CACHE_DEFAULT_BYTES: usize = 100 * 1024 * 1024;

/// Local disk cache high-water mark before trimming.
pub const LOCAL_CACHE_HIGH_WATER_BYTES: u64 = 10 * 1024 * 1024;

/// Local disk cache low-water mark trimmed down to on overflow.
pub const LOCAL_CACHE_LOW_WATER_BYTES: u64 = 8 * 1024 * 1024;

/// Directory-name prefix for exact (CGAL-equivalent) entries on disk.
pub const LOCAL_CACHE_PREFIX_EXACT: &str = "c";

/// Directory-name prefix for approximate/fast geometry entries on disk.
pub const LOCAL_CACHE_PREFIX_GEOMETRY: &str = "g";

/// Remote KV key prefix for exact cache entries.
pub const REMOTE_CACHE_PREFIX_EXACT: &str = "CGAL-";

/// Remote KV key prefix for geometry cache entries.
pub const REMOTE_CACHE_PREFIX_GEOMETRY: &str = "GEOM-";

/// Per-element exploration budget for the fast-union disjointness
/// clusterer. Named `FAST_JOIN_EXPLORATION_BUDGET` in the original
/// implementation this is grounded on; kept as a tunable constant rather
/// than a hard contract.
pub const FAST_UNION_EXPLORATION_BUDGET: usize = 100;

/// Default element-count budget for the CSG tree normalizer before it
/// aborts the rewrite and leaves the tree unchanged.
pub const CSG_NORMALIZE_ELEMENT_BUDGET: usize = 100_000;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance propagated into geometry kernels.
    pub tolerance: f64,
    /// Default segment count for primitives that require polygonal subdivision.
    pub default_segments: u32,
    /// Byte budget for the in-memory geometry cache.
    pub geometry_cache_bytes: usize,
    /// Byte budget for the in-memory exact-geometry cache.
    pub cgal_cache_bytes: usize,
    /// Whether any warning should be promoted to a fatal error
    /// (`--hardwarnings` on the host CLI surface).
    pub hard_warnings: bool,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and default segments.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 24).expect("valid config");
    /// assert_eq!(cfg.default_segments, 24);
    /// ```
    pub fn new(tolerance: f64, default_segments: u32) -> Result<Self, ConfigError> {
        if tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if default_segments < 3 {
            return Err(ConfigError::InvalidSegments(default_segments));
        }
        Ok(Self {
            tolerance,
            default_segments,
            geometry_cache_bytes: GEOMETRY_CACHE_DEFAULT_BYTES,
            cgal_cache_bytes: CGAL_CACHE_DEFAULT_BYTES,
            hard_warnings: false,
        })
    }

    /// Returns a copy with `hard_warnings` set.
    pub fn with_hard_warnings(mut self, enabled: bool) -> Self {
        self.hard_warnings = enabled;
        self
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            default_segments: DEFAULT_SEGMENTS,
            geometry_cache_bytes: GEOMETRY_CACHE_DEFAULT_BYTES,
            cgal_cache_bytes: CGAL_CACHE_DEFAULT_BYTES,
            hard_warnings: false,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero or negative.
    InvalidTolerance(f64),
    /// Raised when the requested segment count is too small to form a polygon.
    InvalidSegments(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidSegments(value) => {
                write!(f, "default_segments must be >= 3: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the number of fragments for a circular shape.
///
/// Implements OpenSCAD's resolution formula:
/// - If $fn > 0: use $fn (clamped to MIN_FRAGMENTS..MAX_FRAGMENTS)
/// - Otherwise: ceil(min(360/$fa, 2*PI*r/$fs)) clamped to MIN_FRAGMENTS..MAX_FRAGMENTS
///
/// # Examples
/// ```
/// use config::constants::{compute_fragments, DEFAULT_FA, DEFAULT_FS};
///
/// let fragments = compute_fragments(10.0, 32.0, DEFAULT_FA, DEFAULT_FS);
/// assert_eq!(fragments, 32);
///
/// let fragments = compute_fragments(10.0, 0.0, DEFAULT_FA, DEFAULT_FS);
/// assert!(fragments >= 5);
/// ```
pub fn compute_fragments(radius: f64, fn_value: f64, fa_value: f64, fs_value: f64) -> u32 {
    let fragments = if fn_value > 0.0 {
        fn_value as u32
    } else {
        let from_angle = 360.0 / fa_value;
        let from_size = (2.0 * std::f64::consts::PI * radius) / fs_value;
        from_angle.min(from_size).ceil() as u32
    };

    fragments.clamp(MIN_FRAGMENTS, MAX_FRAGMENTS)
}

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Examples
/// ```
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Examples
/// ```
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

#[cfg(test)]
mod tests;
