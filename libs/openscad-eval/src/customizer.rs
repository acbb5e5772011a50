//! # Parameter Customization
//!
//! Extracts a typed parameter schema from `@Parameter`-annotated top-level
//! assignments, encodes/decodes named parameter sets as JSON, and rebinds
//! assignments to a set's values before re-evaluation.
//!
//! ```text
//! source AST --extract--> Vec<ParameterObject> (the schema)
//!                              |  import(set)
//!                              v
//!                         current values
//!                              |  apply(ast)
//!                              v
//!                     AST with literal-bound assignments
//! ```
//!
//! This is the only sanctioned mutation path into the source AST: `apply`
//! replaces an assignment's expression with a literal reflecting the
//! parameter's current value, nothing else in the pipeline rewrites AST
//! nodes in place.

use openscad_ast::ast::{Ast, CustomizerAnnotation, Expression, Statement, UnaryOp};
use serde_json::Value as Json;
use std::collections::BTreeMap;

use crate::error::EvalError;

/// Group name that suppresses a parameter from the customizer schema.
const HIDDEN_GROUP: &str = "Hidden";
/// Default group for parameters with no explicit `@Group(...)`.
const DEFAULT_GROUP: &str = "Parameters";
/// Schema version written to and expected in parameter set files.
pub const FILE_FORMAT_VERSION: &str = "1";

// =============================================================================
// PARAMETER OBJECT
// =============================================================================

/// A single enum option: a `(key, value)` pair, where `key` is the label
/// shown to users and `value` is what gets bound into the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem {
    pub key: String,
    pub value: EnumValue,
}

/// The value half of an [`EnumItem`], either a number or a string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Number(f64),
    String(String),
}

/// A typed parameter extracted from one `@Parameter`-annotated assignment.
///
/// Each variant owns its current value (mutated by [`ParameterObject::import_value`])
/// alongside the default recovered from the assignment's own expression,
/// so [`ParameterObject::reset`] never has to re-read the source.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterObject {
    Bool {
        name: String,
        description: Option<String>,
        group: String,
        value: bool,
        default: bool,
    },
    String {
        name: String,
        description: Option<String>,
        group: String,
        value: String,
        default: String,
        max_len: Option<usize>,
    },
    Number {
        name: String,
        description: Option<String>,
        group: String,
        value: f64,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Vector {
        name: String,
        description: Option<String>,
        group: String,
        value: Vec<f64>,
        default: Vec<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Enum {
        name: String,
        description: Option<String>,
        group: String,
        items: Vec<EnumItem>,
        value_index: usize,
        default_index: usize,
    },
}

impl ParameterObject {
    /// The assignment name this parameter binds to.
    pub fn name(&self) -> &str {
        match self {
            Self::Bool { name, .. }
            | Self::String { name, .. }
            | Self::Number { name, .. }
            | Self::Vector { name, .. }
            | Self::Enum { name, .. } => name,
        }
    }

    /// The customizer group this parameter is shown under. Never
    /// `"Hidden"` — those are dropped during extraction.
    pub fn group(&self) -> &str {
        match self {
            Self::Bool { group, .. }
            | Self::String { group, .. }
            | Self::Number { group, .. }
            | Self::Vector { group, .. }
            | Self::Enum { group, .. } => group,
        }
    }

    /// Reset the current value back to the assignment's own default,
    /// undoing any prior [`import_value`](Self::import_value).
    pub fn reset(&mut self) {
        match self {
            Self::Bool { value, default, .. } => *value = *default,
            Self::String { value, default, .. } => value.clone_from(default),
            Self::Number { value, default, .. } => *value = *default,
            Self::Vector { value, default, .. } => value.clone_from(default),
            Self::Enum { value_index, default_index, .. } => *value_index = *default_index,
        }
    }

    /// Decode `encoded` and, if `store` is set, adopt it as the current
    /// value (clamped/truncated per §4.6.2). Returns whether the encoded
    /// value was well-formed for this parameter's type; a malformed value
    /// never mutates `self` regardless of `store`.
    pub fn import_value(&mut self, encoded: &Json, store: bool) -> bool {
        match self {
            Self::Bool { value, .. } => match encoded.as_bool() {
                Some(b) => {
                    if store {
                        *value = b;
                    }
                    true
                }
                None => false,
            },
            Self::String { value, max_len, .. } => match encoded.as_str() {
                Some(s) => {
                    if store {
                        *value = match max_len {
                            Some(max) => s.chars().take(*max).collect(),
                            None => s.to_string(),
                        };
                    }
                    true
                }
                None => false,
            },
            Self::Number { value, min, max, .. } => match encoded.as_f64() {
                Some(n) => {
                    if store {
                        *value = clamp(n, *min, *max);
                    }
                    true
                }
                None => false,
            },
            Self::Vector { value, min, max, .. } => match decode_vector(encoded) {
                Some(decoded) if decoded.len() == value.len() => {
                    if store {
                        for (slot, n) in value.iter_mut().zip(decoded) {
                            *slot = clamp(n, *min, *max);
                        }
                    }
                    true
                }
                _ => false,
            },
            Self::Enum { items, value_index, .. } => {
                let found = items.iter().position(|item| match (&item.value, encoded) {
                    (EnumValue::Number(n), Json::Number(_)) => encoded.as_f64() == Some(*n),
                    (EnumValue::String(s), Json::String(_)) => encoded.as_str() == Some(s.as_str()),
                    _ => false,
                });
                match found {
                    Some(idx) => {
                        if store {
                            *value_index = idx;
                        }
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Encode the current value for persistence in a parameter set file.
    pub fn export_value(&self) -> Json {
        match self {
            Self::Bool { value, .. } => Json::Bool(*value),
            Self::String { value, .. } => Json::String(value.clone()),
            Self::Number { value, .. } => json_number(*value),
            Self::Vector { value, .. } => Json::String(encode_vector(value)),
            Self::Enum { items, value_index, .. } => match &items[*value_index].value {
                EnumValue::Number(n) => json_number(*n),
                EnumValue::String(s) => Json::String(s.clone()),
            },
        }
    }

    /// The literal expression to splice into the assignment's `value` slot
    /// for the current (possibly imported) value. The only place in the
    /// core allowed to mutate the source AST ultimately calls this.
    pub fn apply_expr(&self) -> Expression {
        match self {
            Self::Bool { value, .. } => Expression::Boolean(*value),
            Self::String { value, .. } => Expression::String(value.clone()),
            Self::Number { value, .. } => Expression::Number(*value),
            Self::Vector { value, .. } => {
                Expression::List(value.iter().map(|n| Expression::Number(*n)).collect())
            }
            Self::Enum { items, value_index, .. } => match &items[*value_index].value {
                EnumValue::Number(n) => Expression::Number(*n),
                EnumValue::String(s) => Expression::String(s.clone()),
            },
        }
    }
}

fn clamp(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = match min {
        Some(min) if value < min => min,
        _ => value,
    };
    match max {
        Some(max) if value > max => max,
        _ => value,
    }
}

fn json_number(n: f64) -> Json {
    serde_json::Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}

fn decode_vector(encoded: &Json) -> Option<Vec<f64>> {
    let raw = encoded.as_str()?;
    let trimmed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return Some(Vec::new());
    }
    inner.split(',').map(|tok| tok.parse::<f64>().ok()).collect()
}

fn encode_vector(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

// =============================================================================
// EXTRACTION (§4.6.1)
// =============================================================================

/// Extract the customizer schema from a source AST's top-level
/// assignments, in source order. Assignments with no `@Parameter`
/// annotation, or whose `@Group` is `"Hidden"`, are skipped.
pub fn extract_parameters(ast: &Ast) -> Vec<ParameterObject> {
    ast.statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::Assignment { name, value, annotation: Some(ann), .. } if ann.is_parameter => {
                from_assignment(name, value, ann)
            }
            _ => None,
        })
        .collect()
}

fn from_assignment(name: &str, value: &Expression, ann: &CustomizerAnnotation) -> Option<ParameterObject> {
    let group = ann.group.clone().unwrap_or_else(|| DEFAULT_GROUP.to_string());
    if group == HIDDEN_GROUP {
        return None;
    }
    let description = ann.description.clone();
    let param = ann.parameter.as_ref();

    if let Some(b) = expr_bool(value) {
        return Some(ParameterObject::Bool { name: name.to_string(), description, group, value: b, default: b });
    }

    if let Some(n) = expr_number(value) {
        if let Some(enumerated) = parse_enum_items(param, &format_number(n), EnumValue::Number(n)) {
            return Some(ParameterObject::Enum {
                name: name.to_string(),
                description,
                group,
                value_index: enumerated.default_index,
                default_index: enumerated.default_index,
                items: enumerated.items,
            });
        }
        let limits = parse_numeric_limits(param, &[n]);
        return Some(ParameterObject::Number {
            name: name.to_string(),
            description,
            group,
            value: n,
            default: n,
            min: limits.min,
            max: limits.max,
            step: limits.step,
        });
    }

    if let Expression::String(s) = value {
        if let Some(enumerated) = parse_enum_items(param, s, EnumValue::String(s.clone())) {
            return Some(ParameterObject::Enum {
                name: name.to_string(),
                description,
                group,
                value_index: enumerated.default_index,
                default_index: enumerated.default_index,
                items: enumerated.items,
            });
        }
        let max_len = param.and_then(expr_number).map(|n| (n as usize).max(s.chars().count()));
        return Some(ParameterObject::String {
            name: name.to_string(),
            description,
            group,
            value: s.clone(),
            default: s.clone(),
            max_len,
        });
    }

    if let Expression::List(items) = value {
        if items.is_empty() || items.len() > 4 {
            return None;
        }
        let nums: Option<Vec<f64>> = items.iter().map(expr_number).collect();
        let nums = nums?;
        let limits = parse_numeric_limits(param, &nums);
        return Some(ParameterObject::Vector {
            name: name.to_string(),
            description,
            group,
            default: nums.clone(),
            value: nums,
            min: limits.min,
            max: limits.max,
            step: limits.step,
        });
    }

    None
}

fn expr_number(e: &Expression) -> Option<f64> {
    match e {
        Expression::Number(n) => Some(*n),
        Expression::UnaryOp { op: UnaryOp::Neg, operand } => expr_number(operand).map(|n| -n),
        Expression::UnaryOp { op: UnaryOp::Pos, operand } => expr_number(operand),
        _ => None,
    }
}

fn expr_bool(e: &Expression) -> Option<bool> {
    match e {
        Expression::Boolean(b) => Some(*b),
        _ => None,
    }
}

fn format_number(n: f64) -> String {
    n.to_string()
}

#[derive(Default)]
struct NumericLimits {
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
}

/// Mirrors the original `parseNumericLimits`: a bare scalar annotation is a
/// step, a single-element vector is a maximum-only bound, and a range is a
/// full `[min:step:max]` spec. The default value(s) widen whichever bound
/// is already present so the default is never out of its own range.
fn parse_numeric_limits(param: Option<&Expression>, values: &[f64]) -> NumericLimits {
    let mut out = NumericLimits::default();
    match param {
        Some(Expression::Range { start, end, step }) => {
            if let (Some(min), Some(max)) = (expr_number(start), expr_number(end)) {
                out.min = Some(min);
                out.max = Some(max);
                if let Some(step_expr) = step {
                    out.step = expr_number(step_expr);
                }
            }
        }
        Some(Expression::List(items)) if items.len() == 1 => {
            out.max = expr_number(&items[0]);
        }
        Some(other) => {
            out.step = expr_number(other);
        }
        None => {}
    }
    for &v in values {
        if let Some(min) = out.min {
            if v < min {
                out.min = Some(v);
            }
        }
        if let Some(max) = out.max {
            if v > max {
                out.max = Some(v);
            }
        }
    }
    out
}

struct EnumValues {
    items: Vec<EnumItem>,
    default_index: usize,
}

/// Mirrors the original `parseEnumItems`: the annotation must be a list of
/// either bare literals, or `[value, key]` pairs. A list with a single
/// bare number is rejected here — that shape means "maximum only", handled
/// by [`parse_numeric_limits`] instead. If the default value isn't among
/// the declared items it's inserted at the front so it's always selectable.
fn parse_enum_items(param: Option<&Expression>, default_key: &str, default_value: EnumValue) -> Option<EnumValues> {
    let elements = match param {
        Some(Expression::List(items)) => items,
        _ => return None,
    };

    let mut items = Vec::with_capacity(elements.len());
    for element in elements {
        let item = match element {
            Expression::Number(n) => {
                if elements.len() == 1 {
                    // A vector with a single numeric element is a
                    // maximum-only bound, not an enum specifier.
                    return None;
                }
                EnumItem { key: format_number(*n), value: EnumValue::Number(*n) }
            }
            Expression::String(s) => EnumItem { key: s.clone(), value: EnumValue::String(s.clone()) },
            Expression::List(pair) if pair.len() == 2 => {
                let value = enum_value(&pair[0])?;
                let key = match &pair[1] {
                    Expression::Number(n) => format_number(*n),
                    Expression::String(s) => s.clone(),
                    _ => return None,
                };
                EnumItem { key, value }
            }
            _ => return None,
        };
        items.push(item);
    }
    if items.is_empty() {
        return None;
    }

    match items.iter().position(|it| it.value == default_value) {
        Some(default_index) => Some(EnumValues { items, default_index }),
        None => {
            items.insert(0, EnumItem { key: default_key.to_string(), value: default_value });
            Some(EnumValues { items, default_index: 0 })
        }
    }
}

fn enum_value(e: &Expression) -> Option<EnumValue> {
    match e {
        Expression::Number(n) => Some(EnumValue::Number(*n)),
        Expression::String(s) => Some(EnumValue::String(s.clone())),
        _ => None,
    }
}

// =============================================================================
// PARAMETER SETS (§4.6.2)
// =============================================================================

/// A single named set of parameter name → encoded-value bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    pub name: String,
    pub values: BTreeMap<String, Json>,
}

/// An ordered collection of [`ParameterSet`]s persisted as JSON with shape:
///
/// ```text
/// {
///   "fileFormatVersion": "1",
///   "parameterSets": { "<set name>": { "<param name>": <value>, ... }, ... }
/// }
/// ```
///
/// Unknown top-level keys survive a read/write round-trip untouched, per
/// §6's "unknown top-level keys are preserved on rewrite".
#[derive(Debug, Clone, Default)]
pub struct ParameterSets {
    pub sets: Vec<ParameterSet>,
    extra_top_level: serde_json::Map<String, Json>,
}

impl ParameterSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a parameter-sets JSON document.
    pub fn parse(text: &str) -> Result<Self, EvalError> {
        let root: Json = serde_json::from_str(text)
            .map_err(|e| EvalError::CustomizerError(format!("invalid JSON: {e}")))?;
        let mut obj = match root {
            Json::Object(obj) => obj,
            _ => return Err(EvalError::CustomizerError("root is not an object".to_string())),
        };

        let sets_value = obj.remove("parameterSets");
        obj.remove("fileFormatVersion");

        let mut sets = Vec::new();
        if let Some(Json::Object(named)) = sets_value {
            for (name, values) in named {
                let values = match values {
                    Json::Object(map) => map.into_iter().collect(),
                    _ => continue,
                };
                sets.push(ParameterSet { name, values });
            }
        }

        Ok(Self { sets, extra_top_level: obj })
    }

    /// Serialize back to the on-disk shape, preserving any unknown
    /// top-level keys captured on [`parse`](Self::parse).
    pub fn to_json(&self) -> Json {
        let mut named = serde_json::Map::new();
        for set in &self.sets {
            named.insert(set.name.clone(), Json::Object(set.values.clone().into_iter().collect()));
        }

        let mut root = self.extra_top_level.clone();
        root.insert("fileFormatVersion".to_string(), Json::String(FILE_FORMAT_VERSION.to_string()));
        root.insert("parameterSets".to_string(), Json::Object(named));
        Json::Object(root)
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Insert or replace a set by name.
    pub fn upsert(&mut self, set: ParameterSet) {
        match self.sets.iter_mut().find(|s| s.name == set.name) {
            Some(existing) => *existing = set,
            None => self.sets.push(set),
        }
    }

    /// Drop entries referring to parameters no longer present in `schema`,
    /// and drop any entry whose encoded value no longer imports cleanly
    /// into its parameter's current type/bounds.
    pub fn clean_sets(&mut self, schema: &[ParameterObject]) {
        for set in &mut self.sets {
            set.values.retain(|name, encoded| {
                schema.iter().find(|p| p.name() == name).is_some_and(|p| {
                    let mut probe = p.clone();
                    probe.import_value(encoded, false)
                })
            });
        }
    }
}

/// Rebind `schema`'s current values onto `ast`'s top-level assignments.
/// For every assignment whose name matches a schema parameter not hidden,
/// its expression is replaced with that parameter's current value as a
/// literal. This is the only sanctioned mutation of the source AST.
pub fn apply(ast: &mut Ast, schema: &[ParameterObject]) {
    for stmt in &mut ast.statements {
        if let Statement::Assignment { name, value, .. } = stmt {
            if let Some(param) = schema.iter().find(|p| p.name() == name.as_str()) {
                *value = param.apply_expr();
            }
        }
    }
}

/// Import a named set's values onto `schema`, in place. Parameters absent
/// from the set are reset to their own default (mirrors the original
/// `ParameterObjects::importValues`).
pub fn import_set(schema: &mut [ParameterObject], set: &ParameterSet) {
    for param in schema.iter_mut() {
        match set.values.get(param.name()) {
            Some(encoded) => {
                if !param.import_value(encoded, true) {
                    param.reset();
                }
            }
            None => param.reset(),
        }
    }
}

/// Export `schema`'s current values as a new named [`ParameterSet`].
pub fn export_set(schema: &[ParameterObject], set_name: &str) -> ParameterSet {
    ParameterSet {
        name: set_name.to_string(),
        values: schema.iter().map(|p| (p.name().to_string(), p.export_value())).collect(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use openscad_ast::parse;

    fn extract(source: &str) -> Vec<ParameterObject> {
        let ast = parse(source).unwrap();
        extract_parameters(&ast)
    }

    #[test]
    fn test_bool_parameter() {
        let params = extract("@Parameter(true) flag = true;");
        assert_eq!(params.len(), 1);
        assert!(matches!(params[0], ParameterObject::Bool { value: true, .. }));
    }

    #[test]
    fn test_number_with_range() {
        let params = extract("@Parameter([0:1:10]) radius = 5;");
        match &params[0] {
            ParameterObject::Number { min, max, step, value, .. } => {
                assert_eq!(*min, Some(0.0));
                assert_eq!(*max, Some(10.0));
                assert_eq!(*step, Some(1.0));
                assert_eq!(*value, 5.0);
            }
            other => panic!("expected Number, got {other:?}"),
        }
    }

    #[test]
    fn test_number_max_only() {
        let params = extract("@Parameter([10]) count = 3;");
        match &params[0] {
            ParameterObject::Number { min, max, .. } => {
                assert_eq!(*min, None);
                assert_eq!(*max, Some(10.0));
            }
            other => panic!("expected Number, got {other:?}"),
        }
    }

    #[test]
    fn test_string_max_len() {
        let params = extract("@Parameter(5) label = \"hi\";");
        match &params[0] {
            ParameterObject::String { max_len, .. } => assert_eq!(*max_len, Some(5)),
            other => panic!("expected String, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_from_number_list() {
        let params = extract("@Parameter([1, 2, 3]) mode = 2;");
        match &params[0] {
            ParameterObject::Enum { items, value_index, .. } => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[*value_index].value, EnumValue::Number(2.0));
            }
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_inserts_missing_default() {
        let params = extract("@Parameter([1, 2, 3]) mode = 9;");
        match &params[0] {
            ParameterObject::Enum { items, default_index, .. } => {
                assert_eq!(items[*default_index].value, EnumValue::Number(9.0));
                assert_eq!(items.len(), 4);
            }
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_parameter() {
        let params = extract("@Parameter([0:1:100]) size = [10, 20, 30];");
        match &params[0] {
            ParameterObject::Vector { value, min, max, .. } => {
                assert_eq!(*value, vec![10.0, 20.0, 30.0]);
                assert_eq!(*min, Some(0.0));
                assert_eq!(*max, Some(100.0));
            }
            other => panic!("expected Vector, got {other:?}"),
        }
    }

    #[test]
    fn test_group_hidden_is_dropped() {
        let params = extract("@Parameter(true) @Group(\"Hidden\") internal = true;");
        assert!(params.is_empty());
    }

    #[test]
    fn test_no_annotation_is_skipped() {
        let params = extract("x = 10;");
        assert!(params.is_empty());
    }

    #[test]
    fn test_description_and_group_captured() {
        let params = extract(
            "@Parameter([0:10]) @Description(\"Wall thickness\") @Group(\"Dimensions\") t = 2;",
        );
        assert_eq!(params[0].group(), "Dimensions");
        if let ParameterObject::Number { description, .. } = &params[0] {
            assert_eq!(description.as_deref(), Some("Wall thickness"));
        } else {
            panic!("expected Number");
        }
    }

    #[test]
    fn test_import_clamps_number() {
        let mut params = extract("@Parameter([0:10]) radius = 5;");
        let encoded = serde_json::json!(42.0);
        assert!(params[0].import_value(&encoded, true));
        match &params[0] {
            ParameterObject::Number { value, .. } => assert_eq!(*value, 10.0),
            other => panic!("expected Number, got {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_malformed_vector() {
        let mut params = extract("@Parameter([0:100]) size = [1, 2, 3];");
        let encoded = serde_json::json!("[1, 2]");
        assert!(!params[0].import_value(&encoded, true));
        match &params[0] {
            ParameterObject::Vector { value, .. } => assert_eq!(*value, vec![1.0, 2.0, 3.0]),
            other => panic!("expected Vector, got {other:?}"),
        }
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let mut params = extract("@Parameter([0:10]) radius = 5;");
        let set = export_set(&params, "mine");
        params[0].import_value(&serde_json::json!(9.0), true);
        import_set(&mut params, &set);
        match &params[0] {
            ParameterObject::Number { value, .. } => assert_eq!(*value, 5.0),
            other => panic!("expected Number, got {other:?}"),
        }
    }

    #[test]
    fn test_parameter_sets_json_round_trip() {
        let text = r#"{
            "fileFormatVersion": "1",
            "parameterSets": {
                "Small": { "radius": 2.0 }
            }
        }"#;
        let sets = ParameterSets::parse(text).unwrap();
        assert_eq!(sets.sets.len(), 1);
        assert_eq!(sets.get("Small").unwrap().values["radius"], serde_json::json!(2.0));

        let json = sets.to_json();
        assert_eq!(json["fileFormatVersion"], serde_json::json!("1"));
        assert_eq!(json["parameterSets"]["Small"]["radius"], serde_json::json!(2.0));
    }

    #[test]
    fn test_clean_sets_drops_stale_entries() {
        let params = extract("@Parameter([0:10]) radius = 5;");
        let mut sets = ParameterSets::new();
        sets.upsert(ParameterSet {
            name: "mine".to_string(),
            values: BTreeMap::from([
                ("radius".to_string(), serde_json::json!(3.0)),
                ("ghost".to_string(), serde_json::json!(true)),
            ]),
        });
        sets.clean_sets(&params);
        let set = sets.get("mine").unwrap();
        assert!(set.values.contains_key("radius"));
        assert!(!set.values.contains_key("ghost"));
    }

    #[test]
    fn test_apply_rebinds_assignment() {
        let mut ast = parse("@Parameter([0:10]) radius = 5; cube(radius);").unwrap();
        let mut schema = extract_parameters(&ast);
        schema[0].import_value(&serde_json::json!(7.0), true);
        apply(&mut ast, &schema);
        match &ast.statements[0] {
            Statement::Assignment { value, .. } => assert_eq!(*value, Expression::Number(7.0)),
            _ => panic!("expected Assignment"),
        }
    }
}
