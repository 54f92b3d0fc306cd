// schemasketch library entry point
//
// Walks JSON-Schema / OpenAPI schema graphs, including cyclic ones, to
// synthesize example values and render text outlines.

//! Example synthesis and outline rendering for JSON-Schema-like documents.
//!
//! ```
//! use schemasketch::{generate_example, render_schema, Mode, SchemaParser};
//! use serde_json::json;
//!
//! let graph = SchemaParser::new()
//!     .parse(&json!({
//!         "type": "object",
//!         "properties": {"name": {"type": "string"}},
//!         "required": ["name"]
//!     }))
//!     .unwrap();
//!
//! let example = generate_example(&graph, Mode::Read).unwrap();
//! assert_eq!(serde_json::to_string(&example).unwrap(), r#"{"name":"string"}"#);
//!
//! let outline = render_schema(&graph, Mode::Read).unwrap();
//! assert_eq!(outline, "{\n  name*: (string)\n}");
//! ```

pub mod example;
pub mod internal;
pub mod render;
pub mod schema;

pub use crate::example::{generate_example, ExampleSynthesizer, ExampleValue, SynthesizerConfig};
pub use crate::internal::error::{Error, Result};
pub use crate::render::{render_schema, RendererConfig, SchemaRenderer};
pub use crate::schema::{Mode, ParserConfig, SchemaGraph, SchemaNode, SchemaParser, SchemaType};
