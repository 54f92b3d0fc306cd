// Example module for schemasketch
//
// Synthesizes a representative value for a schema graph.

pub use self::synthesizer::{ExampleSynthesizer, SynthesizerConfig};
pub use self::value::ExampleValue;

pub mod formats;
pub mod pattern;
pub mod synthesizer;
pub mod value;

use crate::internal::error::Result;
use crate::schema::{Mode, SchemaGraph};

/// Synthesizes an example for the graph's root with the default configuration.
pub fn generate_example(graph: &SchemaGraph, mode: Mode) -> Result<ExampleValue> {
    ExampleSynthesizer::new().synthesize(graph, mode)
}
