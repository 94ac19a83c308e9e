/// Typed build failure. Raised through `anyhow::Error` and recovered with
/// `downcast_ref::<BuildError>()` wherever the kind of failure matters
/// (exit codes in the binary, assertions in tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Transport, authentication, or page-fetch failure against the inventory.
    InventoryUnavailable { operation: String, reason: String },
    /// The reader could not resolve an object another object refers to.
    InventoryInconsistent { resource: String, id: String },
    /// The assembler could not find a system resource it depends on.
    MissingSystemResource(String),
    /// A malformed value in the inventory. Only ever logged and downgraded.
    InvalidInventoryData { field: String, value: String },
    /// A filter pre/post-condition was violated.
    Filter(String),
    /// An entity could not be rendered to YAML.
    Serialization { kind: String, reason: String },
}

impl BuildError {
    pub fn unavailable(operation: &str, reason: impl std::fmt::Display) -> Self {
        Self::InventoryUnavailable {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn inconsistent(resource: &str, id: &str) -> Self {
        Self::InventoryInconsistent {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingSystemResource(message.into())
    }

    pub fn invalid(field: &str, value: &str) -> Self {
        Self::InvalidInventoryData {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    pub fn serialization(kind: &str, reason: impl std::fmt::Display) -> Self {
        Self::Serialization {
            kind: kind.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InventoryUnavailable { operation, reason } => {
                write!(f, "inventory unavailable: {}: {}", operation, reason)
            }
            Self::InventoryInconsistent { resource, id } => {
                write!(f, "inventory inconsistent: {} {} not found", resource, id)
            }
            Self::MissingSystemResource(msg) => write!(f, "missing system resource: {}", msg),
            Self::InvalidInventoryData { field, value } => {
                write!(f, "invalid inventory data: {}={:?}", field, value)
            }
            Self::Filter(msg) => write!(f, "filter error: {}", msg),
            Self::Serialization { kind, reason } => {
                write!(f, "failed to render {} to YAML: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Returns the typed kind of an error raised anywhere in the pipeline.
pub fn kind_of(err: &anyhow::Error) -> Option<&BuildError> {
    err.chain().find_map(|cause| cause.downcast_ref::<BuildError>())
}
