// Render module for schemasketch
//
// Turns a schema graph into a human-readable outline.

pub use self::renderer::{RendererConfig, SchemaRenderer};

pub mod renderer;

use crate::internal::error::Result;
use crate::schema::{Mode, SchemaGraph};

/// Renders the graph's root with the default configuration.
pub fn render_schema(graph: &SchemaGraph, mode: Mode) -> Result<String> {
    SchemaRenderer::new().render(graph, mode)
}
