//! Error types for object map construction.
//!
//! This module provides the `ObjectMapError` enum for errors raised while
//! walking serializer declarations and classifying model field descriptors.

use std::fmt;

/// Error type for object map operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMapError {
    /// The attribute's descriptor is not one of the five relationship kinds.
    ///
    /// This signals a mismatch between a serializer declaration and its model
    /// and is never recovered internally.
    UnrecognizedRelationshipDescriptor {
        model: String,
        attribute: String,
        descriptor_type: String,
    },
    /// The bound model has no attribute with the declared property name
    UnknownAttribute { model: String, attribute: String },
    /// The descriptor was classified but lacks the metadata the active API reads
    MissingMetadata {
        model: String,
        attribute: String,
        path: &'static str,
    },
    /// Recursion went deeper than the configured maximum
    DepthLimitExceeded { serializer: String, max_depth: usize },
    /// A serializer name could not be resolved by the registry
    UnknownSerializer(String),
    /// A model name could not be resolved by the registry
    UnknownModel(String),
    /// A related serializer is bound to a different model than the attribute targets
    RelatedModelMismatch {
        serializer: String,
        attribute: String,
        expected: String,
        actual: String,
    },
    /// The schema document could not be parsed or declares a name twice
    Schema(String),
}

impl fmt::Display for ObjectMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectMapError::UnrecognizedRelationshipDescriptor {
                model,
                attribute,
                descriptor_type,
            } => write!(
                f,
                "Unhandled field type for {model}.{attribute}: {descriptor_type}"
            ),
            ObjectMapError::UnknownAttribute { model, attribute } => {
                write!(f, "Model {model} has no attribute {attribute}")
            }
            ObjectMapError::MissingMetadata {
                model,
                attribute,
                path,
            } => write!(
                f,
                "Descriptor for {model}.{attribute} is missing metadata at {path}"
            ),
            ObjectMapError::DepthLimitExceeded {
                serializer,
                max_depth,
            } => write!(
                f,
                "Object map depth limit of {max_depth} exceeded at serializer {serializer}"
            ),
            ObjectMapError::UnknownSerializer(name) => {
                write!(f, "Unknown serializer: {name}")
            }
            ObjectMapError::UnknownModel(name) => write!(f, "Unknown model: {name}"),
            ObjectMapError::RelatedModelMismatch {
                serializer,
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "Serializer {serializer} declares {attribute} targeting {expected}, \
                 but the related serializer is bound to {actual}"
            ),
            ObjectMapError::Schema(msg) => write!(f, "Schema error: {msg}"),
        }
    }
}

impl std::error::Error for ObjectMapError {}

impl From<serde_json::Error> for ObjectMapError {
    fn from(err: serde_json::Error) -> Self {
        ObjectMapError::Schema(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ObjectMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_descriptor_names_runtime_type() {
        let err = ObjectMapError::UnrecognizedRelationshipDescriptor {
            model: "post".to_string(),
            attribute: "title".to_string(),
            descriptor_type: "DeferredAttribute".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DeferredAttribute"));
        assert!(msg.contains("post.title"));
    }

    #[test]
    fn test_missing_metadata_display() {
        let err = ObjectMapError::MissingMetadata {
            model: "post".to_string(),
            attribute: "author".to_string(),
            path: "field.rel",
        };
        assert_eq!(
            err.to_string(),
            "Descriptor for post.author is missing metadata at field.rel"
        );
    }

    #[test]
    fn test_related_model_mismatch_display() {
        let err = ObjectMapError::RelatedModelMismatch {
            serializer: "UserSerializer".to_string(),
            attribute: "posts".to_string(),
            expected: "post".to_string(),
            actual: "tag".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Serializer UserSerializer declares posts targeting post, \
             but the related serializer is bound to tag"
        );
    }

    #[test]
    fn test_schema_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ObjectMapError = parse_err.into();
        assert!(matches!(err, ObjectMapError::Schema(_)));
    }
}
