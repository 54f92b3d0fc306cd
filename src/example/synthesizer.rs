// Example synthesizer
//
// Produces one concrete value for a schema node. Sources are tried in a fixed
// order: composition keywords, literals from the document, numeric
// constraints, enum, pattern, format, and finally a default per type.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::example::formats::format_example;
use crate::example::pattern::{PatternGenerator, DEFAULT_PATTERN_SEED, DEFAULT_REPEAT_LIMIT};
use crate::example::value::ExampleValue;
use crate::internal::error::{Error, Result};
use crate::schema::guard::RecursionGuard;
use crate::schema::inference::infer_type;
use crate::schema::types::{
    AdditionalProperties, Mode, NodeId, SchemaGraph, SchemaNode, SchemaRef, SchemaType,
};
use crate::schema::utils::{ANY_ARRAY, ANY_KEY};

/// Strings shorter than this threshold are bounded by `maxLength`, longer ones by `minLength`.
const STRING_LENGTH_THRESHOLD: u64 = 6;

/// Configuration for example synthesis
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// Seed for pattern-derived strings
    pub pattern_seed: u64,
    /// Total repetitions allowed for unbounded regex quantifiers
    pub pattern_repeat_limit: u32,
    /// Maximum nesting depth before traversal is aborted
    pub max_depth: usize,
    /// Largest `minLength`/`maxLength` string or `minItems` array that will be built
    pub max_generated_len: usize,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            pattern_seed: DEFAULT_PATTERN_SEED,
            pattern_repeat_limit: DEFAULT_REPEAT_LIMIT,
            max_depth: 128,
            max_generated_len: 1 << 16,
        }
    }
}

/// Example synthesizer
#[derive(Debug, Default)]
pub struct ExampleSynthesizer {
    config: SynthesizerConfig,
}

impl ExampleSynthesizer {
    /// Creates a new synthesizer with default configuration
    pub fn new() -> Self {
        Self {
            config: SynthesizerConfig::default(),
        }
    }

    /// Creates a new synthesizer with custom configuration
    pub fn with_config(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    /// Synthesizes an example for the graph's root schema
    pub fn synthesize(&self, graph: &SchemaGraph, mode: Mode) -> Result<ExampleValue> {
        self.synthesize_node(graph, graph.root(), mode)
    }

    /// Synthesizes an example for any node of the graph
    pub fn synthesize_node(
        &self,
        graph: &SchemaGraph,
        id: NodeId,
        mode: Mode,
    ) -> Result<ExampleValue> {
        debug!(node = %id, ?mode, "synthesizing example");
        let mut walk = Synthesis {
            graph,
            mode,
            max_depth: self.config.max_depth,
            max_generated_len: self.config.max_generated_len,
            patterns: PatternGenerator::new(
                self.config.pattern_seed,
                self.config.pattern_repeat_limit,
            ),
            guard: RecursionGuard::new(),
            depth: 0,
        };
        walk.value_of(id)
    }
}

/// State of one top-level synthesis call
struct Synthesis<'g> {
    graph: &'g SchemaGraph,
    mode: Mode,
    max_depth: usize,
    max_generated_len: usize,
    patterns: PatternGenerator,
    guard: RecursionGuard,
    depth: usize,
}

impl<'g> Synthesis<'g> {
    fn value_of(&mut self, id: NodeId) -> Result<ExampleValue> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        let result = self.resolve_value(self.graph.node(id));
        self.depth -= 1;
        result
    }

    /// Descends into a sub-schema unless it is already being expanded.
    ///
    /// Returns `None` when the recursion guard blocks the descent.
    fn descend(&mut self, reference: &SchemaRef) -> Result<Option<ExampleValue>> {
        let (id, node) = self.graph.resolve(reference)?;
        let visit = self.guard.enter(node);
        if visit.is_blocked() {
            trace!(node = %id, fingerprint = %node.fingerprint, "recursive schema, not descending");
            return Ok(None);
        }
        let result = self.value_of(id);
        self.guard.leave(visit);
        result.map(Some)
    }

    fn resolve_value(&mut self, node: &'g SchemaNode) -> Result<ExampleValue> {
        infer_type(node);

        if let Some(first) = node.one_of.first() {
            return Ok(self.descend(first)?.unwrap_or(ExampleValue::Null));
        }
        if let Some(first) = node.any_of.first() {
            return Ok(self.descend(first)?.unwrap_or(ExampleValue::Null));
        }
        if !node.all_of.is_empty() {
            return self.merge_all_of(&node.all_of);
        }

        if let Some(example) = &node.example {
            return ExampleValue::try_from(example);
        }
        if let Some(first) = node.examples.first() {
            return ExampleValue::try_from(first);
        }
        if let Some(default) = &node.default {
            return ExampleValue::try_from(default);
        }

        if let Some(minimum) = node.minimum {
            let (value, exclusive) = minimum.effective();
            return Ok(number_for(node, if exclusive { value + 1.0 } else { value }));
        }
        if let Some(maximum) = node.maximum {
            let (value, exclusive) = maximum.effective();
            return Ok(number_for(node, if exclusive { value - 1.0 } else { value }));
        }
        if let Some(multiple) = node.multiple_of.filter(|m| *m != 0.0) {
            return Ok(number_for(node, multiple));
        }

        if let Some(first) = node.enum_values.first() {
            return ExampleValue::try_from(first);
        }

        if let Some(pattern) = &node.pattern {
            match self.patterns.generate(pattern) {
                Ok(generated) => return Ok(ExampleValue::String(generated)),
                Err(err) => debug!(%err, "pattern unusable, falling back"),
            }
        }

        if let Some(literal) = node.format.as_deref().and_then(format_example) {
            return Ok(ExampleValue::from(literal));
        }

        match node.primary_type() {
            Some(SchemaType::Boolean) => Ok(ExampleValue::Bool(true)),
            Some(SchemaType::Integer) => Ok(ExampleValue::Integer(1)),
            Some(SchemaType::Number) => Ok(ExampleValue::Float(1.0)),
            Some(SchemaType::String) => self.string_for(node),
            Some(SchemaType::Array) => self.array_for(node),
            Some(SchemaType::Object) => self.object_for(node),
            Some(SchemaType::Null) | None => Ok(ExampleValue::Null),
        }
    }

    /// Shallow-merges the object results of every `allOf` branch; later keys win
    fn merge_all_of(&mut self, branches: &[SchemaRef]) -> Result<ExampleValue> {
        let mut merged = IndexMap::new();
        for branch in branches {
            if let Some(ExampleValue::Object(entries)) = self.descend(branch)? {
                merged.extend(entries);
            }
        }
        Ok(ExampleValue::Object(merged))
    }

    fn array_for(&mut self, node: &SchemaNode) -> Result<ExampleValue> {
        let Some(items) = &node.items else {
            return Ok(ExampleValue::from(ANY_ARRAY));
        };

        let Some(item) = self.descend(items)? else {
            return Ok(ExampleValue::Array(vec![ExampleValue::Null]));
        };

        let count = match node.min_items {
            Some(n) if n > 0 => self.generated_len("minItems", n)?,
            _ => 1,
        };
        Ok(ExampleValue::Array(vec![item; count]))
    }

    fn string_for(&self, node: &SchemaNode) -> Result<ExampleValue> {
        let len = match (node.min_length, node.max_length) {
            (Some(min), _) if min > STRING_LENGTH_THRESHOLD => {
                self.generated_len("minLength", min)?
            }
            (_, Some(max)) if max < STRING_LENGTH_THRESHOLD => {
                self.generated_len("maxLength", max)?
            }
            _ => return Ok(ExampleValue::from("string")),
        };
        Ok(ExampleValue::String("s".repeat(len)))
    }

    /// Checks a length keyword against the configured generation limit
    fn generated_len(&self, keyword: &str, len: u64) -> Result<usize> {
        match usize::try_from(len) {
            Ok(len) if len <= self.max_generated_len => Ok(len),
            _ => Err(Error::SchemaError(format!(
                "{} {} exceeds the generation limit of {}",
                keyword, len, self.max_generated_len
            ))),
        }
    }

    fn object_for(&mut self, node: &SchemaNode) -> Result<ExampleValue> {
        let mut entries = IndexMap::new();

        for (name, property) in &node.properties {
            let (_, property_node) = self.graph.resolve(property)?;
            if !self.mode.includes(property_node) {
                continue;
            }
            let value = self.descend(property)?.unwrap_or(ExampleValue::Null);
            entries.insert(name.clone(), value);
        }

        match &node.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => {
                let value = self.descend(schema)?.unwrap_or(ExampleValue::Null);
                entries.insert(ANY_KEY.to_string(), value);
            }
            Some(AdditionalProperties::Allowed(true)) => {
                entries.insert(ANY_KEY.to_string(), ExampleValue::Null);
            }
            Some(AdditionalProperties::Allowed(false)) | None => {}
        }

        Ok(ExampleValue::Object(entries))
    }
}

/// Numeric constraint results are integers for integer schemas when they can be
fn number_for(node: &SchemaNode, value: f64) -> ExampleValue {
    let integral = value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64;
    if node.primary_type() == Some(SchemaType::Integer) && integral {
        ExampleValue::Integer(value as i64)
    } else {
        ExampleValue::Float(value)
    }
}
