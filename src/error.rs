//! Container error types.

use thiserror::Error;

/// Errors raised while building a container or looking components up.
///
/// Every variant is terminal: a failed build leaves no container behind and a
/// failed lookup leaves the container untouched.
#[derive(Error, Debug)]
pub enum ContainerError {
    // Build errors
    #[error("Invalid configuration '{source_name}': {reason}")]
    InvalidConfiguration { source_name: String, reason: String },

    #[error("Duplicate component name '{name}' in {source_name} (already declared by {existing_source})")]
    DuplicateComponentName {
        name: String,
        source_name: String,
        existing_source: String,
    },

    #[error("Unresolved dependency {parameter} for producer '{producer}' in {source_name}")]
    UnresolvedDependency {
        parameter: &'static str,
        producer: String,
        source_name: String,
    },

    #[error("Ambiguous dependency {parameter} for producer '{producer}' in {source_name}: candidates {candidates:?}")]
    AmbiguousDependency {
        parameter: &'static str,
        producer: String,
        source_name: String,
        candidates: Vec<String>,
    },

    #[error("Producer '{producer}' in {source_name} failed: {cause}")]
    ProducerInvocationFailure {
        producer: String,
        source_name: String,
        #[source]
        cause: anyhow::Error,
    },

    // Lookup errors
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("More than one component registered under '{key}': {candidates:?}")]
    AmbiguousComponent {
        key: String,
        candidates: Vec<String>,
    },

    #[error("Component '{key}' is {actual}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}
