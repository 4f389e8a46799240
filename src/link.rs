//! Link descriptors (graph edges)

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::value::Value;

/// Conversion applied by a link
pub type TransformFn = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

/// A named, directed conversion between two types.
///
/// `input` and `output` are type names resolved when the link is executed,
/// not when it is registered.
#[derive(Clone)]
pub struct Link {
    name: String,
    input: String,
    output: String,
    transform: TransformFn,
}

impl Link {
    pub fn new<F>(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        transform: F,
    ) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            transform: Arc::new(transform),
        }
    }

    /// Link named after `type_name` that returns its input unchanged
    pub fn identity(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(type_name.clone(), type_name.clone(), type_name, Ok)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn apply(&self, value: Value) -> Result<Value, BoxError> {
        (self.transform)(value)
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.input, self.output)
    }
}
