//! Error types for repository operations.
//!
//! Every failure carries an [`ErrorContext`] naming the operation and the
//! entity involved so that handlers and logs can report it without
//! re-deriving where it came from.

use std::fmt;

use crate::models::{EntityKind, EntityRef};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "create", "link")
    pub operation: Option<String>,
    /// The entity kind involved
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity kind.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set kind and id from a typed reference.
    pub fn with_ref(self, entity: &EntityRef) -> Self {
        self.with_entity(entity.kind.label())
            .with_entity_id(&entity.id)
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The targeted id does not exist in its collection.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A caller-supplied id is already in use.
    #[error("Conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// A field constraint or relationship kind was violated.
    /// Nothing was written.
    #[error("Invalid argument: {message} {context}")]
    InvalidArgument {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Not found error for a specific entity.
    pub fn missing_entity(operation: &str, entity: &EntityRef) -> Self {
        Self::not_found_with_context(
            format!("{} {} not found", capitalize(entity.kind), entity.id),
            ErrorContext::new(operation).with_ref(entity),
        )
    }

    /// Create a conflict error with context.
    pub fn conflict_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an invalid argument error with context.
    pub fn invalid_argument_with_context(
        message: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error with context.
    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    /// The bare message without the context suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::InvalidArgument { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::InternalError { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::InvalidArgument { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::InvalidArgument { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }

    /// Fill in the entity kind and id if the error does not name one yet.
    pub fn with_entity_if_missing(mut self, kind: EntityKind, id: impl ToString) -> Self {
        match &mut self {
            Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::InvalidArgument { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => {
                if context.entity.is_none() {
                    context.entity = Some(kind.label().to_string());
                    context.entity_id = Some(id.to_string());
                }
            }
        }
        self
    }
}

fn capitalize(kind: EntityKind) -> String {
    let label = kind.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entity_message_and_context() {
        let err = RepositoryError::missing_entity(
            "get",
            &EntityRef::new(EntityKind::Participant, "p-9"),
        );

        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert_eq!(err.message(), "Participant p-9 not found");
        assert_eq!(err.context().entity.as_deref(), Some("participant"));
        assert_eq!(err.context().entity_id.as_deref(), Some("p-9"));
        assert!(err.to_string().contains("operation=get"));
    }

    #[test]
    fn test_with_operation_overrides_context() {
        let err = RepositoryError::invalid_argument("bad").with_operation("update");
        assert_eq!(err.context().operation.as_deref(), Some("update"));
    }

    #[test]
    fn test_with_entity_if_missing_keeps_existing_entity() {
        let err = RepositoryError::missing_entity(
            "link",
            &EntityRef::new(EntityKind::Attachment, "a1"),
        )
        .with_entity_if_missing(EntityKind::Meeting, "m1");
        assert_eq!(err.context().entity.as_deref(), Some("attachment"));

        let err = RepositoryError::invalid_argument("too long")
            .with_entity_if_missing(EntityKind::Calendar, "c1");
        assert_eq!(err.context().entity.as_deref(), Some("calendar"));
        assert_eq!(err.context().entity_id.as_deref(), Some("c1"));
    }
}
