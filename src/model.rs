//! Model metadata.
//!
//! The object map never touches model instances, only their type metadata:
//! a stable lowercase type name and a descriptor per attribute.

use crate::relation::descriptor::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Type-level metadata a model exposes to the object map
pub trait ModelIntrospect: Send + Sync {
    /// Stable lowercase type identifier (e.g. `blogpost`)
    fn model_name(&self) -> &str;

    /// Descriptor for the attribute `name`, if the model has one
    fn attribute(&self, name: &str) -> Option<&FieldDescriptor>;
}

/// Shared handle to a model's metadata
pub type ModelRef = Arc<dyn ModelIntrospect>;

/// The stable type identifier for a model or relationship target name
pub fn normalize_model_name(name: &str) -> String {
    name.to_lowercase()
}

/// Concrete model metadata
///
/// # Example
///
/// ```
/// use objectmap::model::{ModelIntrospect, ModelMeta};
/// use objectmap::relation::FieldDescriptor;
///
/// let post = ModelMeta::new("BlogPost")
///     .with_attribute("author", FieldDescriptor::foreign_key("user", "posts"))
///     .with_attribute("title", FieldDescriptor::other("DeferredAttribute"));
///
/// assert_eq!(post.model_name(), "blogpost");
/// assert!(post.attribute("author").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawModelMeta")]
pub struct ModelMeta {
    model_name: String,
    attributes: BTreeMap<String, FieldDescriptor>,
}

/// Wire form of `ModelMeta`, normalized through [`ModelMeta::new`]
#[derive(Deserialize)]
struct RawModelMeta {
    model_name: String,
    #[serde(default)]
    attributes: BTreeMap<String, FieldDescriptor>,
}

impl From<RawModelMeta> for ModelMeta {
    fn from(raw: RawModelMeta) -> Self {
        let mut meta = ModelMeta::new(raw.model_name);
        for (name, descriptor) in raw.attributes {
            meta.insert_attribute(name, descriptor);
        }
        meta
    }
}

impl ModelMeta {
    /// Create metadata for a model; the name is lowercased
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            model_name: normalize_model_name(name.as_ref()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.attributes.insert(name.into(), descriptor);
        self
    }

    pub fn insert_attribute(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) {
        self.attributes.insert(name.into(), descriptor);
    }

    /// Descriptors in attribute name order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.attributes
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Attribute names in sorted order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn into_ref(self) -> ModelRef {
        Arc::new(self)
    }
}

impl ModelIntrospect for ModelMeta {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn attribute(&self, name: &str) -> Option<&FieldDescriptor> {
        self.attributes.get(name)
    }
}
