// Schema renderer
//
// Produces a compact, indented text outline of a schema: scalars as a single
// parenthesized line with their constraints, arrays and objects as bracketed
// blocks, composition keywords as labelled lists of branches.

use tracing::{debug, trace};

use crate::internal::error::{Error, Result};
use crate::schema::guard::RecursionGuard;
use crate::schema::inference::infer_type;
use crate::schema::types::{
    AdditionalProperties, Mode, NodeId, SchemaGraph, SchemaNode, SchemaRef, SchemaType,
};
use crate::schema::utils::{format_number, literal_text, ANY_ARRAY, ANY_KEY, RECURSIVE_REF};

/// Rendering of an object schema that declares no shape at all.
const EMPTY_OBJECT: &str = "(object)";

/// Configuration for schema rendering
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Indentation added per nesting level
    pub indent: String,
    /// Maximum nesting depth before rendering is aborted
    pub max_depth: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            max_depth: 128,
        }
    }
}

/// Schema renderer
#[derive(Debug, Default)]
pub struct SchemaRenderer {
    config: RendererConfig,
}

impl SchemaRenderer {
    /// Creates a new renderer with default configuration
    pub fn new() -> Self {
        Self {
            config: RendererConfig::default(),
        }
    }

    /// Creates a new renderer with custom configuration
    pub fn with_config(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Renders the graph's root schema
    pub fn render(&self, graph: &SchemaGraph, mode: Mode) -> Result<String> {
        self.render_node(graph, graph.root(), mode)
    }

    /// Renders any node of the graph
    pub fn render_node(&self, graph: &SchemaGraph, id: NodeId, mode: Mode) -> Result<String> {
        debug!(node = %id, ?mode, "rendering schema");
        let mut walk = Rendering {
            graph,
            mode,
            unit: &self.config.indent,
            max_depth: self.config.max_depth,
            guard: RecursionGuard::new(),
            depth: 0,
        };
        walk.text_of(id, "")
    }
}

/// State of one top-level render call
struct Rendering<'g, 'c> {
    graph: &'g SchemaGraph,
    mode: Mode,
    unit: &'c str,
    max_depth: usize,
    guard: RecursionGuard,
    depth: usize,
}

impl<'g, 'c> Rendering<'g, 'c> {
    fn text_of(&mut self, id: NodeId, indent: &str) -> Result<String> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        let result = self.render_inner(self.graph.node(id), indent);
        self.depth -= 1;
        result
    }

    /// Renders a sub-schema unless it is already being expanded.
    ///
    /// Returns `None` when the recursion guard blocks the descent.
    fn descend(&mut self, reference: &SchemaRef, indent: &str) -> Result<Option<String>> {
        let (id, node) = self.graph.resolve(reference)?;
        let visit = self.guard.enter(node);
        if visit.is_blocked() {
            trace!(node = %id, fingerprint = %node.fingerprint, "recursive schema, not descending");
            return Ok(None);
        }
        let result = self.text_of(id, indent);
        self.guard.leave(visit);
        result.map(Some)
    }

    fn render_inner(&mut self, node: &'g SchemaNode, indent: &str) -> Result<String> {
        infer_type(node);

        for (label, branches) in [
            ("allOf", &node.all_of),
            ("oneOf", &node.one_of),
            ("anyOf", &node.any_of),
        ] {
            if !branches.is_empty() {
                return self.composition(label, branches, indent);
            }
        }

        match node.primary_type() {
            Some(t) if t.is_scalar() => Ok(scalar_line(node)),
            Some(SchemaType::Array) => self.array_block(node, indent),
            Some(SchemaType::Object) => self.object_block(node, indent),
            _ => Ok(ANY_KEY.to_string()),
        }
    }

    fn composition(&mut self, label: &str, branches: &[SchemaRef], indent: &str) -> Result<String> {
        let inner = format!("{}{}", indent, self.unit);
        let mut out = format!("{}{{\n", label);
        for branch in branches {
            let text = self
                .descend(branch, &inner)?
                .unwrap_or_else(|| RECURSIVE_REF.to_string());
            out.push_str(&format!("{}{}\n", inner, text));
        }
        out.push_str(indent);
        out.push('}');
        Ok(out)
    }

    fn array_block(&mut self, node: &SchemaNode, indent: &str) -> Result<String> {
        let Some(items) = &node.items else {
            return Ok(ANY_ARRAY.to_string());
        };

        let inner = format!("{}{}", indent, self.unit);
        match self.descend(items, &inner)? {
            Some(text) => Ok(format!("[\n{}{}\n{}]", inner, text, indent)),
            None => Ok(format!("[{}]", RECURSIVE_REF)),
        }
    }

    fn object_block(&mut self, node: &SchemaNode, indent: &str) -> Result<String> {
        if node.properties.is_empty() && node.additional_properties.is_none() {
            return Ok(EMPTY_OBJECT.to_string());
        }

        let inner = format!("{}{}", indent, self.unit);
        let mut out = String::from("{\n");

        let mut properties: Vec<_> = node.properties.iter().collect();
        properties.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (name, property) in properties {
            let (_, property_node) = self.graph.resolve(property)?;
            if !self.mode.includes(property_node) {
                continue;
            }

            let label = if node.is_required(name) {
                format!("{}*", name)
            } else {
                name.clone()
            };
            let text = self
                .descend(property, &inner)?
                .unwrap_or_else(|| RECURSIVE_REF.to_string());
            out.push_str(&format!("{}{}: {}\n", inner, label, text));
        }

        match &node.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => {
                let text = self
                    .descend(schema, &inner)?
                    .unwrap_or_else(|| RECURSIVE_REF.to_string());
                out.push_str(&format!("{}{}: {}\n", inner, ANY_KEY, text));
            }
            Some(AdditionalProperties::Allowed(true)) => {
                out.push_str(&format!("{}{}: {}\n", inner, ANY_KEY, ANY_KEY));
            }
            Some(AdditionalProperties::Allowed(false)) | None => {}
        }

        out.push_str(indent);
        out.push('}');
        Ok(out)
    }
}

/// Renders a scalar as `(<types> <tags>) <doc>`
fn scalar_line(node: &SchemaNode) -> String {
    let mut tags = Vec::new();

    if node.nullable {
        tags.push("nullable:true".to_string());
    }
    if let Some(minimum) = node.minimum {
        let (value, exclusive) = minimum.effective();
        let key = if exclusive { "exclusiveMin" } else { "min" };
        tags.push(format!("{}:{}", key, format_number(value)));
    }
    if let Some(maximum) = node.maximum {
        let (value, exclusive) = maximum.effective();
        let key = if exclusive { "exclusiveMax" } else { "max" };
        tags.push(format!("{}:{}", key, format_number(value)));
    }
    if let Some(multiple) = node.multiple_of.filter(|m| *m != 0.0) {
        tags.push(format!("multiple:{}", format_number(multiple)));
    }
    if let Some(default) = &node.default {
        tags.push(format!("default:{}", literal_text(default)));
    }
    if let Some(format) = &node.format {
        tags.push(format!("format:{}", format));
    }
    if let Some(pattern) = &node.pattern {
        tags.push(format!("pattern:{}", pattern));
    }
    if let Some(min_length) = node.min_length.filter(|n| *n != 0) {
        tags.push(format!("minLen:{}", min_length));
    }
    if let Some(max_length) = node.max_length.filter(|n| *n != 0) {
        tags.push(format!("maxLen:{}", max_length));
    }
    if !node.enum_values.is_empty() {
        let members: Vec<String> = node.enum_values.iter().map(literal_text).collect();
        tags.push(format!("enum:{}", members.join(",")));
    }

    let types: Vec<&str> = node.effective_types().iter().map(|t| t.as_str()).collect();
    let mut line = format!("({}", types.join("|"));
    if !tags.is_empty() {
        line.push(' ');
        line.push_str(&tags.join(" "));
    }
    line.push(')');
    if let Some(doc) = node.doc() {
        line.push(' ');
        line.push_str(doc);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::SchemaParser;
    use serde_json::{json, Value};

    fn render(schema: Value) -> String {
        let graph = SchemaParser::new().parse(&schema).unwrap();
        SchemaRenderer::new().render(&graph, Mode::Read).unwrap()
    }

    #[test]
    fn test_tag_order() {
        let text = render(json!({
            "type": "integer",
            "nullable": true,
            "minimum": 1,
            "exclusiveMaximum": 10,
            "multipleOf": 3,
            "default": 3,
            "format": "int32",
            "enum": [3, 6, 9],
            "description": "Step"
        }));
        assert_eq!(
            text,
            "(integer nullable:true min:1 exclusiveMax:10 multiple:3 default:3 format:int32 enum:3,6,9) Step"
        );
    }

    #[test]
    fn test_string_tags() {
        let text = render(json!({
            "type": "string",
            "pattern": "^a+$",
            "minLength": 1,
            "maxLength": 0,
            "title": "Name",
            "description": "ignored"
        }));
        assert_eq!(text, "(string pattern:^a+$ minLen:1) Name");
    }

    #[test]
    fn test_large_bounds_use_exponent_form() {
        assert_eq!(
            render(json!({"type": "number", "maximum": 1e21, "multipleOf": 0.00001})),
            "(number max:1e+21 multiple:1e-05)"
        );
    }

    #[test]
    fn test_structured_default_renders_as_json() {
        assert_eq!(
            render(json!({"type": "string", "default": {"foo": "hello"}})),
            r#"(string default:{"foo":"hello"})"#
        );
    }

    #[test]
    fn test_unresolvable_type() {
        assert_eq!(render(json!({})), "<any>");
        assert_eq!(render(json!({"type": "null"})), "<any>");
    }

    #[test]
    fn test_additional_properties_false_renders_empty_block() {
        assert_eq!(
            render(json!({"type": "object", "additionalProperties": false})),
            "{\n}"
        );
    }

    #[test]
    fn test_custom_indent() {
        let graph = SchemaParser::new()
            .parse(&json!({"type": "array", "items": {"type": "array", "items": {"type": "string"}}}))
            .unwrap();
        let renderer = SchemaRenderer::with_config(RendererConfig {
            indent: "    ".to_string(),
            ..Default::default()
        });
        assert_eq!(
            renderer.render(&graph, Mode::Read).unwrap(),
            "[\n    [\n        (string)\n    ]\n]"
        );
    }

    #[test]
    fn test_nested_composition_indents() {
        let text = render(json!({
            "type": "object",
            "properties": {
                "pet": {"oneOf": [{"type": "string"}, {"type": "object", "properties": {"name": {"type": "string"}}}]}
            }
        }));
        assert_eq!(
            text,
            "{\n  pet: oneOf{\n    (string)\n    {\n      name: (string)\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_unresolved_property_is_fatal() {
        let graph = SchemaParser::new()
            .parse(&json!({"type": "object", "properties": {"ghost": {"$ref": "#/nope"}}}))
            .unwrap();
        let result = SchemaRenderer::new().render(&graph, Mode::Read);
        assert!(matches!(result, Err(Error::ReferenceError { .. })));
    }

    #[test]
    fn test_composition_cycle_terminates() {
        let text = render(json!({
            "$defs": {
                "Tree": {"type": "object", "properties": {"children": {"anyOf": [{"$ref": "#/$defs/Tree"}, {"type": "null"}]}}}
            },
            "allOf": [{"$ref": "#/$defs/Tree"}]
        }));
        assert_eq!(
            text,
            "allOf{\n  {\n    children: anyOf{\n      <recursive ref>\n      <any>\n    }\n  }\n}"
        );
    }
}
