// Schema graph types for schemasketch
//
// This module defines the in-memory schema graph: an arena of nodes owned by
// the document, with sub-schema references expressed as non-owning node ids so
// that cyclic documents can be represented without shared ownership.

use std::fmt;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::internal::error::{Error, Result};

/// Index of a node inside its owning [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Content-derived identity of a schema node.
///
/// Computed from the node's source JSON, so two places that describe the same
/// sub-schema share one fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprints a source value.
    pub fn of(source: &Value) -> Self {
        // Value's Display is its compact JSON encoding; with preserve_order the
        // key order is the document order, which keeps this stable across runs.
        let encoded = source.to_string();
        Self(*blake3::hash(encoded.as_bytes()).as_bytes())
    }

    /// Full hex representation of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell nodes apart in logs
        write!(f, "{}", hex::encode(&self.0[..6]))
    }
}

/// The JSON-Schema type names understood by the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaType {
    /// Parses a JSON-Schema type name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "object" => Ok(SchemaType::Object),
            "array" => Ok(SchemaType::Array),
            "string" => Ok(SchemaType::String),
            "number" => Ok(SchemaType::Number),
            "integer" => Ok(SchemaType::Integer),
            "boolean" => Ok(SchemaType::Boolean),
            "null" => Ok(SchemaType::Null),
            _ => Err(Error::SchemaError(format!("Unknown type: {}", name))),
        }
    }

    /// Returns the JSON-Schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
        }
    }

    /// Returns true for the types rendered as a single parenthesized line.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            SchemaType::String | SchemaType::Number | SchemaType::Integer | SchemaType::Boolean
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of an API exchange an example or rendering describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Response bodies: write-only properties are hidden.
    #[default]
    Read,
    /// Request bodies: read-only properties are hidden.
    Write,
}

impl Mode {
    /// Returns true if a property described by `node` is visible in this mode.
    pub fn includes(&self, node: &SchemaNode) -> bool {
        match self {
            Mode::Read => !node.write_only,
            Mode::Write => !node.read_only,
        }
    }
}

/// A numeric lower or upper bound.
///
/// OpenAPI 3.0 pairs the threshold with a boolean exclusivity flag while
/// OpenAPI 3.1 stores the exclusive threshold itself; both normalize through
/// [`Bound::effective`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// `minimum: v` with no exclusivity information.
    Numeric(f64),
    /// `minimum: v` alongside `exclusiveMinimum: <bool>`.
    ExclusiveFlagPaired(f64, bool),
    /// `exclusiveMinimum: v` on its own.
    ExclusiveNumeric(f64),
}

impl Bound {
    /// Returns the bound value and whether it is exclusive.
    pub fn effective(&self) -> (f64, bool) {
        match *self {
            Bound::Numeric(value) => (value, false),
            Bound::ExclusiveFlagPaired(value, exclusive) => (value, exclusive),
            Bound::ExclusiveNumeric(value) => (value, true),
        }
    }
}

/// A reference from one node to a sub-schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    /// A concrete node in the same graph.
    Node(NodeId),
    /// A reference the builder could not resolve; raised when traversal reaches it.
    Unresolved { reference: String, reason: String },
}

/// The `additionalProperties` keyword, which is either a schema or a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalProperties {
    Schema(SchemaRef),
    Allowed(bool),
}

/// One schema in the graph.
#[derive(Debug, Default)]
pub struct SchemaNode {
    /// Identity used by the recursion guard
    pub fingerprint: Fingerprint,
    /// Declared `type` list, empty when the document leaves it out
    pub types: Vec<SchemaType>,
    /// Type filled in by inference when `types` is empty
    pub(crate) inferred_type: OnceLock<SchemaType>,

    pub all_of: Vec<SchemaRef>,
    pub one_of: Vec<SchemaRef>,
    pub any_of: Vec<SchemaRef>,

    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    pub multiple_of: Option<f64>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub format: Option<String>,
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    pub examples: Vec<Value>,

    pub properties: IndexMap<String, SchemaRef>,
    pub required: IndexSet<String>,
    pub additional_properties: Option<AdditionalProperties>,

    pub items: Option<SchemaRef>,
    pub min_items: Option<u64>,

    pub nullable: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SchemaNode {
    /// Creates an empty node with the given identity.
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            ..Default::default()
        }
    }

    /// The declared types, or the inferred type if none were declared.
    pub fn effective_types(&self) -> &[SchemaType] {
        if !self.types.is_empty() {
            return &self.types;
        }
        match self.inferred_type.get() {
            Some(inferred) => std::slice::from_ref(inferred),
            None => &[],
        }
    }

    /// The first non-null type. Only this one drives synthesis and rendering.
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.effective_types()
            .iter()
            .copied()
            .find(|t| *t != SchemaType::Null)
    }

    /// Returns true if `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Title if present, otherwise description.
    pub fn doc(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.description.as_deref().filter(|d| !d.is_empty()))
    }
}

/// An arena-owned schema graph with a designated root.
#[derive(Debug)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
    root: NodeId,
}

impl SchemaGraph {
    pub(crate) fn from_parts(nodes: Vec<SchemaNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// The node traversal starts from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node by id.
    ///
    /// Ids are only handed out by the graph that owns the node, so a lookup
    /// with an id from another graph is a caller bug.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Resolves a sub-schema reference, failing if the builder left it unresolved.
    pub fn resolve(&self, reference: &SchemaRef) -> Result<(NodeId, &SchemaNode)> {
        match reference {
            SchemaRef::Node(id) => Ok((*id, self.node(*id))),
            SchemaRef::Unresolved { reference, reason } => Err(Error::ReferenceError {
                reference: reference.clone(),
                reason: reason.clone(),
            }),
        }
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every node with its id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}
