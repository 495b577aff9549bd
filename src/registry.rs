//! Declarative schema registry.
//!
//! Models and serializers can be described in a JSON document instead of
//! being implemented by hand. The registry validates the document once and
//! then hands out [`SerializerRef`]s that behave exactly like hand-written
//! [`SerializerType`] implementations.
//!
//! ```json
//! {
//!   "models": [
//!     { "model_name": "user", "attributes": {
//!         "posts": { "type": "ForeignRelatedObjectsDescriptor",
//!                    "related": { "related_model": "post",
//!                                 "field": { "name": "author", "attname": "author_id" } } } } }
//!   ],
//!   "serializers": [
//!     { "name": "UserSerializer", "model": "user",
//!       "related": [ { "serializer": "PostSerializer", "field": "posts" } ] }
//!   ]
//! }
//! ```

use crate::error::{ObjectMapError, Result};
use crate::model::{normalize_model_name, ModelIntrospect, ModelMeta, ModelRef};
use crate::object_map::{ObjectMap, ObjectMapBuilder};
use crate::serializer::{RelatedSerializer, SerializerInstance, SerializerRef, SerializerType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Top-level schema document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub models: Vec<ModelMeta>,
    #[serde(default)]
    pub serializers: Vec<SerializerDecl>,
}

/// A serializer bound to a model by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerDecl {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub related: Vec<RelatedDecl>,
}

/// A related serializer declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDecl {
    pub serializer: String,
    pub field: String,
}

struct RegistryInner {
    models: HashMap<String, ModelRef>,
    serializers: HashMap<String, SerializerDecl>,
}

/// Validated models and serializers
#[derive(Clone)]
pub struct SchemaRegistry {
    inner: Arc<RegistryInner>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut serializers: Vec<_> = self.inner.serializers.keys().collect();
        serializers.sort();
        f.debug_struct("SchemaRegistry")
            .field("models", &self.inner.models.len())
            .field("serializers", &serializers)
            .finish()
    }
}

impl SchemaRegistry {
    /// Parse and validate a JSON schema document
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Validate a schema document
    ///
    /// Names must be unique, every relationship attribute must target a
    /// declared model, every serializer must be bound to a declared model and
    /// every related declaration must name a declared serializer bound to the
    /// model its attribute targets.
    pub fn from_document(document: SchemaDocument) -> Result<Self> {
        let mut models: HashMap<String, ModelMeta> = HashMap::new();
        for meta in document.models {
            let name = meta.model_name().to_string();
            if models.contains_key(&name) {
                return Err(ObjectMapError::Schema(format!("duplicate model {name}")));
            }
            models.insert(name, meta);
        }

        let mut serializers: HashMap<String, SerializerDecl> = HashMap::new();
        for mut decl in document.serializers {
            if serializers.contains_key(&decl.name) {
                return Err(ObjectMapError::Schema(format!(
                    "duplicate serializer {}",
                    decl.name
                )));
            }
            decl.model = normalize_model_name(&decl.model);
            serializers.insert(decl.name.clone(), decl);
        }

        for model in models.values() {
            for target in relationship_targets(model) {
                if !models.contains_key(&target) {
                    return Err(ObjectMapError::UnknownModel(target));
                }
            }
        }

        for decl in serializers.values() {
            let model = models
                .get(&decl.model)
                .ok_or_else(|| ObjectMapError::UnknownModel(decl.model.clone()))?;
            for related in &decl.related {
                let related_decl = serializers
                    .get(&related.serializer)
                    .ok_or_else(|| ObjectMapError::UnknownSerializer(related.serializer.clone()))?;
                check_related_model(decl, model, &related.field, &related_decl.model)?;
            }
        }

        log::debug!(
            "Loaded schema with {} model(s) and {} serializer(s)",
            models.len(),
            serializers.len()
        );

        let models = models
            .into_iter()
            .map(|(name, meta)| (name, meta.into_ref()))
            .collect();
        Ok(Self {
            inner: Arc::new(RegistryInner { models, serializers }),
        })
    }

    /// Look up a serializer by name
    pub fn serializer(&self, name: &str) -> Result<SerializerRef> {
        RegisteredSerializer::resolve(&self.inner, name)
            .map(|serializer| Arc::new(serializer) as SerializerRef)
            .ok_or_else(|| ObjectMapError::UnknownSerializer(name.to_string()))
    }

    /// Look up a model by name
    pub fn model(&self, name: &str) -> Result<ModelRef> {
        self.inner
            .models
            .get(&normalize_model_name(name))
            .cloned()
            .ok_or_else(|| ObjectMapError::UnknownModel(name.to_string()))
    }

    /// Build the object map for the serializer named `name`
    pub fn object_map(&self, builder: &ObjectMapBuilder, name: &str) -> Result<ObjectMap> {
        let serializer = self.serializer(name)?;
        builder.build(serializer.as_ref())
    }
}

/// Normalized related model names of every relationship attribute on `model`
fn relationship_targets(model: &ModelMeta) -> Vec<String> {
    model
        .attributes()
        .filter(|(_, descriptor)| descriptor.kind().is_some())
        .flat_map(|(_, descriptor)| descriptor.target_models())
        .map(normalize_model_name)
        .collect()
}

/// The related serializer must be bound to the model the attribute targets.
///
/// Attributes that are missing or not relationships are left for the builder
/// to report, with the model and attribute that failed.
fn check_related_model(
    decl: &SerializerDecl,
    model: &ModelMeta,
    attribute: &str,
    related_model: &str,
) -> Result<()> {
    let Some(descriptor) = model.attribute(attribute) else {
        return Ok(());
    };
    if descriptor.kind().is_none() {
        return Ok(());
    }
    match descriptor
        .target_models()
        .into_iter()
        .map(normalize_model_name)
        .find(|target| target != related_model)
    {
        Some(expected) => Err(ObjectMapError::RelatedModelMismatch {
            serializer: decl.name.clone(),
            attribute: attribute.to_string(),
            expected,
            actual: related_model.to_string(),
        }),
        None => Ok(()),
    }
}

/// A serializer backed by a registry declaration
struct RegisteredSerializer {
    registry: Arc<RegistryInner>,
    name: String,
    model: ModelRef,
}

impl RegisteredSerializer {
    fn resolve(registry: &Arc<RegistryInner>, name: &str) -> Option<Self> {
        let decl = registry.serializers.get(name)?;
        let model = registry.models.get(&decl.model)?.clone();
        Some(Self {
            registry: Arc::clone(registry),
            name: decl.name.clone(),
            model,
        })
    }
}

impl SerializerType for RegisteredSerializer {
    fn serializer_name(&self) -> &str {
        &self.name
    }

    fn instantiate(&self) -> SerializerInstance {
        SerializerInstance::new(Arc::clone(&self.model))
    }

    fn related_serializers(&self) -> Vec<RelatedSerializer> {
        let Some(decl) = self.registry.serializers.get(&self.name) else {
            return Vec::new();
        };
        // declarations were validated on load
        decl.related
            .iter()
            .filter_map(|related| {
                RegisteredSerializer::resolve(&self.registry, &related.serializer)
                    .map(|serializer| {
                        RelatedSerializer::from_ref(Arc::new(serializer), related.field.clone())
                    })
            })
            .collect()
    }
}
