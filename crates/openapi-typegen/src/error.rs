//! Typed error enum for the `openapi-typegen` library API.
//!
//! Every generation failure is fatal to the pass that raised it. Library
//! consumers can match on specific variants; the CLI (`main.rs`) converts
//! these to `anyhow::Error` at the binary boundary for richer context.

/// Errors produced by `openapi-typegen` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading config or document files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A `$ref` pointer has no target in `components`.
    #[error("unresolved reference '{reference}'")]
    UnresolvedReference {
        /// The pointer that could not be resolved.
        reference: String,
    },

    /// A `$ref` pointer is outside `#/components/<namespace>/<name>`, or
    /// points into a namespace the call site does not accept.
    #[error("unsupported reference '{reference}': {reason}")]
    UnsupportedReferenceShape {
        /// The offending pointer.
        reference: String,
        /// What was expected instead.
        reason: String,
    },

    /// Two operations share an `operationId`, or ids that only differ in
    /// casing and so name the same declarations.
    #[error("duplicate operationId '{operation_id}'")]
    DuplicateOperationId {
        /// The repeated id.
        operation_id: String,
    },

    /// An `enum` lists a value that cannot become a literal type or an
    /// enum member (objects and arrays).
    #[error("unsupported enum value {value}")]
    UnsupportedEnumValueType {
        /// The offending value, rendered as JSON.
        value: String,
    },

    /// An operation's wrapper override is not `useQuery` or `useMutate`.
    #[error(
        "invalid component override '{value}' on operation '{operation_id}'; \
         expected 'useQuery' or 'useMutate'"
    )]
    InvalidComponentOverride {
        /// The operation carrying the override.
        operation_id: String,
        /// The rejected value.
        value: String,
    },
}

impl Error {
    pub(crate) fn unresolved(reference: &str) -> Self {
        Self::UnresolvedReference {
            reference: reference.to_string(),
        }
    }

    pub(crate) fn unsupported_ref(reference: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedReferenceShape {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
