//! Serializer contract consumed by the object map builder.
//!
//! A serializer type describes how a model and its relationships are
//! represented. The builder only needs three things from it: an identity for
//! cycle suppression, a zero-argument instantiation exposing the bound model,
//! and the ordered list of related serializers it declares.

use crate::model::{ModelIntrospect, ModelRef};
use std::fmt;
use std::sync::Arc;

/// Options of an instantiated serializer
#[derive(Clone)]
pub struct SerializerOptions {
    /// Model the serializer is bound to
    pub model: ModelRef,
}

/// An instantiated serializer
#[derive(Clone)]
pub struct SerializerInstance {
    pub opts: SerializerOptions,
}

impl SerializerInstance {
    pub fn new(model: ModelRef) -> Self {
        Self {
            opts: SerializerOptions { model },
        }
    }

    /// The bound model
    pub fn model(&self) -> &ModelRef {
        &self.opts.model
    }
}

impl fmt::Debug for SerializerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerInstance")
            .field("model", &self.opts.model.model_name())
            .finish()
    }
}

/// A serializer type
///
/// # Example
///
/// ```
/// use objectmap::model::{ModelIntrospect, ModelMeta};
/// use objectmap::serializer::{RelatedSerializer, SerializerInstance, SerializerType};
///
/// struct TagSerializer;
///
/// impl SerializerType for TagSerializer {
///     fn serializer_name(&self) -> &str {
///         "TagSerializer"
///     }
///
///     fn instantiate(&self) -> SerializerInstance {
///         SerializerInstance::new(ModelMeta::new("tag").into_ref())
///     }
///
///     fn related_serializers(&self) -> Vec<RelatedSerializer> {
///         Vec::new()
///     }
/// }
///
/// assert_eq!(TagSerializer.instantiate().model().model_name(), "tag");
/// ```
pub trait SerializerType: Send + Sync {
    /// Identity used to track (serializer, related serializer) pairs
    fn serializer_name(&self) -> &str;

    /// Zero-argument construction
    fn instantiate(&self) -> SerializerInstance;

    /// Declared relationships, in declaration order
    fn related_serializers(&self) -> Vec<RelatedSerializer>;
}

/// Shared handle to a serializer type
pub type SerializerRef = Arc<dyn SerializerType>;

/// One declared relationship: the related serializer and the property
/// exposing it on the declaring serializer
#[derive(Clone)]
pub struct RelatedSerializer {
    pub serializer: SerializerRef,
    pub field_name: String,
}

impl RelatedSerializer {
    pub fn new<S>(serializer: S, field_name: impl Into<String>) -> Self
    where
        S: SerializerType + 'static,
    {
        Self {
            serializer: Arc::new(serializer),
            field_name: field_name.into(),
        }
    }

    pub fn from_ref(serializer: SerializerRef, field_name: impl Into<String>) -> Self {
        Self {
            serializer,
            field_name: field_name.into(),
        }
    }
}

impl fmt::Debug for RelatedSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelatedSerializer")
            .field("serializer", &self.serializer.serializer_name())
            .field("field_name", &self.field_name)
            .finish()
    }
}
