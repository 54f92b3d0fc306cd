// Schema module for schemasketch
//
// This module provides the schema graph and the pieces shared by both
// traversals:
//
// 1. Schema graph types (arena-owned nodes, non-owning references)
// 2. Document parser with local `$ref` resolution
// 3. Type inference for schemas without a declared type
// 4. Recursion guard for cyclic graphs

// Re-export public types and functions
pub use self::guard::{is_simple, RecursionGuard, Visit};
pub use self::inference::infer_type;
pub use self::parser::{ParserConfig, SchemaParser};
pub use self::types::{
    AdditionalProperties, Bound, Fingerprint, Mode, NodeId, SchemaGraph, SchemaNode, SchemaRef,
    SchemaType,
};

// Sub-modules
pub mod guard;
pub mod inference;
pub mod parser;
pub mod types;

// Internal module for shared utilities
pub(crate) mod utils;
