use crate::template::{self, Segment};
use crate::value::{Value, ValueKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A run variable: the value plus its inferred type tag, write timestamp
/// and provenance (which node produced it, under which output slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeValue {
    pub value: Value,
    pub kind: ValueKind,
    pub timestamp: DateTime<Utc>,
    pub source_node_id: String,
    pub output_key: String,
}

/// Live variable state shared across a run.
///
/// A single flat namespace with last-write-wins semantics: `set` is the
/// only mutation path, and every reader goes through `get` or `resolve`,
/// so the write order stays auditable. Created fresh per run and
/// discarded at completion.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    vars: HashMap<String, RuntimeValue>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context pre-populated with caller-supplied variables
    pub fn seeded(seed: HashMap<String, Value>) -> Self {
        let mut ctx = Self::new();
        for (name, value) in seed {
            ctx.set(&name, value, "__input__", "value");
        }
        ctx
    }

    /// Overwrite a variable, recording its type tag and provenance
    pub fn set(&mut self, name: &str, value: Value, source_node_id: &str, output_key: &str) {
        let kind = ValueKind::of(&value);
        tracing::debug!(name, %kind, source = source_node_id, "variable set");
        self.vars.insert(
            name.to_string(),
            RuntimeValue {
                value,
                kind,
                timestamp: Utc::now(),
                source_node_id: source_node_id.to_string(),
                output_key: output_key.to_string(),
            },
        );
    }

    /// Look up a variable by bare name or `${name}` reference.
    /// Returns `None` when absent, never errors.
    pub fn get(&self, reference: &str) -> Option<&RuntimeValue> {
        self.vars.get(template::strip_reference(reference))
    }

    /// Substitute variable references throughout an input payload.
    ///
    /// Strings have two modes: a string that is exactly one `${name}`
    /// reference passes the stored value through with its type intact
    /// (an array survives as an array), falling back to the literal text
    /// when the name is unbound; any other string is interpolated in
    /// place, with unbound references replaced by the empty string.
    /// Objects and arrays recurse element-wise; everything else passes
    /// through unchanged.
    pub fn resolve(&self, input: &Value) -> Value {
        match input {
            Value::String(text) => {
                if let Some(name) = template::as_reference(text) {
                    match self.vars.get(name) {
                        Some(var) => var.value.clone(),
                        None => input.clone(),
                    }
                } else {
                    Value::String(self.interpolate(text))
                }
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), self.resolve(value)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.resolve(item)).collect())
            }
            other => other.clone(),
        }
    }

    /// Resolve every entry of a parameter map
    pub fn resolve_map(&self, params: &HashMap<String, Value>) -> HashMap<String, Value> {
        params
            .iter()
            .map(|(key, value)| (key.clone(), self.resolve(value)))
            .collect()
    }

    fn interpolate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in template::parse(text) {
            match segment {
                Segment::Literal(literal) => out.push_str(literal),
                Segment::Reference(name) => {
                    if let Some(var) = self.vars.get(name) {
                        out.push_str(&var.value.coerce_string());
                    }
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
