// Schema document parser for schemasketch
//
// Builds a SchemaGraph from a JSON (or YAML-decoded) schema document. Local
// `$ref`s are resolved against the whole document; every location is built at
// most once, so a reference back to a schema that is still being built links
// to it and the resulting graph contains the cycle.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::internal::error::{Error, Result};
use crate::schema::types::{
    AdditionalProperties, Bound, Fingerprint, NodeId, SchemaGraph, SchemaNode, SchemaRef,
    SchemaType,
};
use crate::schema::utils::escape_pointer_token;

/// Configuration for the schema parser
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Fail the build on a `$ref` that cannot be resolved.
    ///
    /// When false the reference is kept as [`SchemaRef::Unresolved`] and only
    /// reported if a traversal actually reaches it.
    pub strict_references: bool,
}

/// Parser for JSON-Schema-like schema documents
#[derive(Debug, Default)]
pub struct SchemaParser {
    config: ParserConfig,
}

impl SchemaParser {
    /// Creates a new schema parser with default configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Creates a new schema parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parses a whole document as a single schema
    pub fn parse(&self, document: &Value) -> Result<SchemaGraph> {
        self.parse_at(document, "")
    }

    /// Parses the schema found at `pointer` inside `document`
    ///
    /// `$ref`s are resolved against the whole document, so this is the entry
    /// point for OpenAPI component schemas (`/components/schemas/User`).
    pub fn parse_at(&self, document: &Value, pointer: &str) -> Result<SchemaGraph> {
        let source = document.pointer(pointer).ok_or_else(|| {
            Error::SchemaError(format!("Pointer '{}' does not resolve in the document", pointer))
        })?;

        let mut builder = GraphBuilder {
            document,
            config: &self.config,
            nodes: Vec::new(),
            by_location: HashMap::new(),
        };

        let root = match builder.build_ref(source, pointer.to_string())? {
            SchemaRef::Node(id) => id,
            SchemaRef::Unresolved { reference, reason } => {
                return Err(Error::ReferenceError { reference, reason })
            }
        };

        debug!(nodes = builder.nodes.len(), %root, pointer, "built schema graph");
        Ok(SchemaGraph::from_parts(builder.nodes, root))
    }
}

struct GraphBuilder<'a> {
    document: &'a Value,
    config: &'a ParserConfig,
    nodes: Vec<SchemaNode>,
    /// JSON pointer of each built location -> node
    by_location: HashMap<String, NodeId>,
}

impl<'a> GraphBuilder<'a> {
    fn build_ref(&mut self, value: &'a Value, location: String) -> Result<SchemaRef> {
        self.follow(value, location, &mut Vec::new())
    }

    /// Follows `$ref` chains until a concrete schema location is reached
    fn follow(
        &mut self,
        value: &'a Value,
        location: String,
        chain: &mut Vec<String>,
    ) -> Result<SchemaRef> {
        if let Some(reference) = value.get("$ref") {
            let reference = reference.as_str().ok_or_else(|| {
                Error::SchemaError(format!("$ref at '{}' must be a string", location))
            })?;

            if chain.iter().any(|seen| seen == reference) {
                return self.unresolved(reference, "reference chain loops back on itself");
            }
            chain.push(reference.to_string());

            let Some(target_pointer) = reference.strip_prefix('#') else {
                return self.unresolved(reference, "only local references are supported");
            };
            let Some(target) = self.document.pointer(target_pointer) else {
                return self.unresolved(reference, "pointer does not resolve in the document");
            };
            return self.follow(target, target_pointer.to_string(), chain);
        }

        if let Some(id) = self.by_location.get(&location) {
            return Ok(SchemaRef::Node(*id));
        }
        self.build_node(value, location).map(SchemaRef::Node)
    }

    fn unresolved(&self, reference: &str, reason: &str) -> Result<SchemaRef> {
        if self.config.strict_references {
            return Err(Error::ReferenceError {
                reference: reference.to_string(),
                reason: reason.to_string(),
            });
        }
        debug!(reference, reason, "keeping unresolved reference");
        Ok(SchemaRef::Unresolved {
            reference: reference.to_string(),
            reason: reason.to_string(),
        })
    }

    fn build_node(&mut self, value: &'a Value, location: String) -> Result<NodeId> {
        let fingerprint = Fingerprint::of(value);

        // Register before descending so references back here find this node
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode::new(fingerprint));
        self.by_location.insert(location.clone(), id);

        let node = match value {
            // `foo: null` and boolean schemas describe "anything"
            Value::Null | Value::Bool(_) => SchemaNode::new(fingerprint),
            Value::Object(obj) => self.parse_node(obj, &location, fingerprint)?,
            other => {
                return Err(Error::SchemaError(format!(
                    "Schema at '{}' must be an object, got {}",
                    location, other
                )))
            }
        };

        self.nodes[id.0] = node;
        Ok(id)
    }

    fn parse_node(
        &mut self,
        obj: &'a Map<String, Value>,
        location: &str,
        fingerprint: Fingerprint,
    ) -> Result<SchemaNode> {
        let mut node = SchemaNode::new(fingerprint);

        node.types = parse_types(obj.get("type"), location)?;

        node.all_of = self.parse_list(obj, "allOf", location)?;
        node.one_of = self.parse_list(obj, "oneOf", location)?;
        node.any_of = self.parse_list(obj, "anyOf", location)?;
        if obj.contains_key("not") {
            debug!(location, "ignoring unsupported keyword 'not'");
        }

        // Numeric constraints
        node.minimum = parse_bound(obj, "minimum", "exclusiveMinimum", location)?;
        node.maximum = parse_bound(obj, "maximum", "exclusiveMaximum", location)?;
        node.multiple_of = number_field(obj, "multipleOf", location)?;

        // String constraints
        node.pattern = string_field(obj, "pattern", location)?;
        node.min_length = count_field(obj, "minLength", location)?;
        node.max_length = count_field(obj, "maxLength", location)?;
        node.format = string_field(obj, "format", location)?;

        // Literals
        node.enum_values = array_field(obj, "enum", location)?;
        node.default = obj.get("default").cloned();
        node.example = obj.get("example").cloned();
        node.examples = array_field(obj, "examples", location)?;

        // Object shape
        if let Some(properties) = obj.get("properties") {
            let properties = properties.as_object().ok_or_else(|| {
                Error::SchemaError(format!("'properties' at '{}' must be an object", location))
            })?;
            for (name, sub) in properties {
                let sub_location =
                    format!("{}/properties/{}", location, escape_pointer_token(name));
                let sub_ref = self.build_ref(sub, sub_location)?;
                node.properties.insert(name.clone(), sub_ref);
            }
        }

        for name in array_field(obj, "required", location)? {
            match name {
                Value::String(name) => {
                    node.required.insert(name);
                }
                other => {
                    return Err(Error::SchemaError(format!(
                        "'required' at '{}' must list property names, got {}",
                        location, other
                    )))
                }
            }
        }

        node.additional_properties = match obj.get("additionalProperties") {
            None => None,
            Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
            Some(sub) => {
                let sub_location = format!("{}/additionalProperties", location);
                Some(AdditionalProperties::Schema(self.build_ref(sub, sub_location)?))
            }
        };

        // Array shape
        node.items = match obj.get("items") {
            Some(sub @ Value::Object(_)) => {
                Some(self.build_ref(sub, format!("{}/items", location))?)
            }
            Some(Value::Array(_)) => {
                debug!(location, "ignoring unsupported tuple-form 'items'");
                None
            }
            _ => None,
        };
        node.min_items = count_field(obj, "minItems", location)?;

        // Annotations
        node.nullable = bool_field(obj, "nullable", location)?;
        node.read_only = bool_field(obj, "readOnly", location)?;
        node.write_only = bool_field(obj, "writeOnly", location)?;
        node.title = string_field(obj, "title", location)?;
        node.description = string_field(obj, "description", location)?;

        Ok(node)
    }

    /// Parses a composition keyword (`allOf`, `oneOf`, `anyOf`)
    fn parse_list(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        location: &str,
    ) -> Result<Vec<SchemaRef>> {
        let Some(value) = obj.get(key) else {
            return Ok(Vec::new());
        };
        let entries = value.as_array().ok_or_else(|| {
            Error::SchemaError(format!("'{}' at '{}' must be an array", key, location))
        })?;

        let mut refs = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            refs.push(self.build_ref(entry, format!("{}/{}/{}", location, key, i))?);
        }
        Ok(refs)
    }
}

/// Parses `type`, which may be a single name or a list of names
fn parse_types(value: Option<&Value>, location: &str) -> Result<Vec<SchemaType>> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::String(name)) => Ok(vec![SchemaType::from_name(name)?]),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| match name {
                Value::String(name) => SchemaType::from_name(name),
                // YAML documents commonly write the null type unquoted
                Value::Null => Ok(SchemaType::Null),
                other => Err(Error::SchemaError(format!(
                    "Type names at '{}' must be strings, got {}",
                    location, other
                ))),
            })
            .collect(),
        Some(other) => Err(Error::SchemaError(format!(
            "'type' at '{}' must be a string or an array, got {}",
            location, other
        ))),
    }
}

/// Reads a bound in either exclusivity encoding
fn parse_bound(
    obj: &Map<String, Value>,
    key: &str,
    exclusive_key: &str,
    location: &str,
) -> Result<Option<Bound>> {
    let threshold = number_field(obj, key, location)?;
    let bound = match (threshold, obj.get(exclusive_key)) {
        (Some(value), Some(Value::Bool(exclusive))) => {
            Some(Bound::ExclusiveFlagPaired(value, *exclusive))
        }
        (Some(value), _) => Some(Bound::Numeric(value)),
        (None, Some(Value::Number(n))) => n.as_f64().map(Bound::ExclusiveNumeric),
        (None, Some(Value::Bool(_))) | (None, None) => None,
        (None, Some(other)) => {
            return Err(Error::SchemaError(format!(
                "'{}' at '{}' must be a boolean or a number, got {}",
                exclusive_key, location, other
            )))
        }
    };
    Ok(bound)
}

fn number_field(obj: &Map<String, Value>, key: &str, location: &str) -> Result<Option<f64>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(Error::SchemaError(format!(
            "'{}' at '{}' must be a number, got {}",
            key, location, other
        ))),
    }
}

fn count_field(obj: &Map<String, Value>, key: &str, location: &str) -> Result<Option<u64>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            Error::SchemaError(format!(
                "'{}' at '{}' must be a non-negative integer, got {}",
                key, location, n
            ))
        }),
        Some(other) => Err(Error::SchemaError(format!(
            "'{}' at '{}' must be a non-negative integer, got {}",
            key, location, other
        ))),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str, location: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::SchemaError(format!(
            "'{}' at '{}' must be a string, got {}",
            key, location, other
        ))),
    }
}

fn bool_field(obj: &Map<String, Value>, key: &str, location: &str) -> Result<bool> {
    match obj.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(Error::SchemaError(format!(
            "'{}' at '{}' must be a boolean, got {}",
            key, location, other
        ))),
    }
}

fn array_field(obj: &Map<String, Value>, key: &str, location: &str) -> Result<Vec<Value>> {
    match obj.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(values)) => Ok(values.clone()),
        Some(other) => Err(Error::SchemaError(format!(
            "'{}' at '{}' must be an array, got {}",
            key, location, other
        ))),
    }
}
