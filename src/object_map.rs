//! Object map construction.
//!
//! An object map is the flat, ordered list of relationship edges reachable
//! from a root serializer. Downstream serialization walks it to nest related
//! objects, so the order is depth-first pre-order: a serializer's edge always
//! precedes the edges contributed by the serializer it points to.
//!
//! # Strategy
//!
//! 1. Instantiate the serializer to reach its bound model
//! 2. For every declared related serializer, skip it if the
//!    (serializer, related serializer) pair was already expanded
//! 3. Classify the model attribute named by the declaration and read the
//!    related model and back-reference through the active introspector
//! 4. Emit the edge, record the pair, then recurse into the related serializer
//!
//! Recording the pair before recursing is what terminates cycles such as
//! `User -> Post -> User`.

use crate::config::ObjectMapConfig;
use crate::error::{ObjectMapError, Result};
use crate::model::{normalize_model_name, ModelIntrospect};
use crate::relation::introspect::{MetadataApi, RelationshipIntrospector};
use crate::serializer::SerializerType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "tracing")]
use crate::tracing_helpers;

/// One discovered relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectMapEdge {
    /// Model name of the owning model
    pub parent_type: String,
    /// Model name of the related model
    pub child_type: String,
    /// Attribute on the related model that back-references the parent
    pub via: String,
    /// Property on the parent serializer exposing the relationship
    pub prop_name: String,
    /// Whether the relationship yields multiple related instances
    pub is_collection: bool,
}

fn construct_edge(
    parent_type: &str,
    child_type: &str,
    via: &str,
    is_collection: bool,
    prop_name: &str,
) -> ObjectMapEdge {
    ObjectMapEdge {
        parent_type: parent_type.to_string(),
        child_type: child_type.to_string(),
        via: via.to_string(),
        prop_name: prop_name.to_string(),
        is_collection,
    }
}

/// Ordered edges reachable from a root serializer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectMap {
    edges: Vec<ObjectMapEdge>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[ObjectMapEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectMapEdge> {
        self.edges.iter()
    }

    pub fn into_edges(self) -> Vec<ObjectMapEdge> {
        self.edges
    }

    /// Edges whose parent is `parent_type`, in map order
    pub fn children_of<'a>(&'a self, parent_type: &'a str) -> impl Iterator<Item = &'a ObjectMapEdge> {
        self.edges.iter().filter(move |edge| edge.parent_type == parent_type)
    }

    /// JSON rendering: an array of edge objects
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<Vec<ObjectMapEdge>> for ObjectMap {
    fn from(edges: Vec<ObjectMapEdge>) -> Self {
        Self { edges }
    }
}

impl IntoIterator for ObjectMap {
    type Item = ObjectMapEdge;
    type IntoIter = std::vec::IntoIter<ObjectMapEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectMap {
    type Item = &'a ObjectMapEdge;
    type IntoIter = std::slice::Iter<'a, ObjectMapEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// A (serializer, related serializer) pair, by serializer name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializerPair {
    pub serializer: String,
    pub related: String,
}

impl fmt::Display for SerializerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.serializer, self.related)
    }
}

/// Pairs already expanded during a traversal
///
/// The accumulator is shared by every recursive call of one build, including
/// sibling branches. Passing the same value to several builds carries the
/// suppression across them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredPairs {
    pairs: Vec<SerializerPair>,
}

impl IgnoredPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, serializer: &str, related: &str) -> bool {
        self.pairs
            .iter()
            .any(|pair| pair.serializer == serializer && pair.related == related)
    }

    /// Record a pair; returns `false` if it was already present
    pub fn insert(&mut self, serializer: impl Into<String>, related: impl Into<String>) -> bool {
        let serializer = serializer.into();
        let related = related.into();
        if self.contains(&serializer, &related) {
            return false;
        }
        self.pairs.push(SerializerPair { serializer, related });
        true
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in the order they were recorded
    pub fn iter(&self) -> std::slice::Iter<'_, SerializerPair> {
        self.pairs.iter()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

/// Builds object maps using one metadata API
///
/// # Example
///
/// ```
/// use objectmap::object_map::ObjectMapBuilder;
/// use objectmap::relation::MetadataApi;
///
/// let builder = ObjectMapBuilder::new(MetadataApi::Modern).with_max_depth(8);
/// assert_eq!(builder.metadata_api(), MetadataApi::Modern);
/// assert_eq!(builder.max_depth(), Some(8));
/// ```
#[derive(Clone, Copy)]
pub struct ObjectMapBuilder {
    introspector: &'static dyn RelationshipIntrospector,
    max_depth: Option<usize>,
}

impl fmt::Debug for ObjectMapBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMapBuilder")
            .field("metadata_api", &self.introspector.api())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for ObjectMapBuilder {
    fn default() -> Self {
        Self::new(MetadataApi::default())
    }
}

impl ObjectMapBuilder {
    pub fn new(api: MetadataApi) -> Self {
        Self {
            introspector: api.introspector(),
            max_depth: None,
        }
    }

    pub fn from_config(config: &ObjectMapConfig) -> Self {
        Self {
            introspector: config.metadata_api.introspector(),
            max_depth: config.max_depth,
        }
    }

    /// Fail builds that nest deeper than `max_depth` serializer levels
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn metadata_api(&self) -> MetadataApi {
        self.introspector.api()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Build the object map rooted at `serializer` with a fresh accumulator
    pub fn build(&self, serializer: &dyn SerializerType) -> Result<ObjectMap> {
        let mut ignored = IgnoredPairs::new();
        self.build_with_ignored(serializer, &mut ignored)
    }

    /// Build the object map rooted at `serializer`, treating the pairs in
    /// `ignored` as already expanded
    ///
    /// Every pair expanded during the build is recorded in `ignored`. On
    /// error the pairs recorded before the failure remain in the accumulator
    /// and no map is returned.
    pub fn build_with_ignored(
        &self,
        serializer: &dyn SerializerType,
        ignored: &mut IgnoredPairs,
    ) -> Result<ObjectMap> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::build_object_map_span(
            serializer.serializer_name(),
            self.introspector.api(),
        )
        .entered();

        let mut edges = Vec::new();
        self.expand(serializer, ignored, 0, &mut edges)?;
        log::debug!(
            "Built object map for {} with {} edge(s)",
            serializer.serializer_name(),
            edges.len()
        );
        Ok(ObjectMap::from(edges))
    }

    fn expand(
        &self,
        serializer: &dyn SerializerType,
        ignored: &mut IgnoredPairs,
        depth: usize,
        edges: &mut Vec<ObjectMapEdge>,
    ) -> Result<()> {
        let instance = serializer.instantiate();
        let model = instance.model();
        let serializer_name = serializer.serializer_name();

        for related in serializer.related_serializers() {
            let related_name = related.serializer.serializer_name();
            if ignored.contains(serializer_name, related_name) {
                log::trace!("Skipping already mapped pair ({serializer_name}, {related_name})");
                continue;
            }

            let edge = self.edge_for(model.as_ref(), &related.field_name)?;
            log::debug!(
                "{} -> {} via {} ({})",
                edge.parent_type,
                edge.child_type,
                edge.via,
                edge.prop_name
            );
            edges.push(edge);
            ignored.insert(serializer_name, related_name);

            if let Some(max_depth) = self.max_depth {
                if depth + 1 > max_depth {
                    return Err(ObjectMapError::DepthLimitExceeded {
                        serializer: related_name.to_string(),
                        max_depth,
                    });
                }
            }
            self.expand(related.serializer.as_ref(), ignored, depth + 1, edges)?;
        }

        Ok(())
    }

    fn edge_for(&self, model: &dyn ModelIntrospect, field_name: &str) -> Result<ObjectMapEdge> {
        let descriptor = model
            .attribute(field_name)
            .ok_or_else(|| ObjectMapError::UnknownAttribute {
                model: model.model_name().to_string(),
                attribute: field_name.to_string(),
            })?;

        let kind = descriptor.kind().ok_or_else(|| {
            ObjectMapError::UnrecognizedRelationshipDescriptor {
                model: model.model_name().to_string(),
                attribute: field_name.to_string(),
                descriptor_type: descriptor.class.type_name().to_string(),
            }
        })?;

        let relationship = self
            .introspector
            .introspect(kind, descriptor)
            .map_err(|path| ObjectMapError::MissingMetadata {
                model: model.model_name().to_string(),
                attribute: field_name.to_string(),
                path,
            })?;

        // the target is named the way the related model names itself
        let child_type = normalize_model_name(relationship.model);
        Ok(construct_edge(
            model.model_name(),
            &child_type,
            relationship.attname,
            relationship.is_collection(),
            field_name,
        ))
    }
}

static DEFAULT_BUILDER: Lazy<ObjectMapBuilder> = Lazy::new(|| match ObjectMapConfig::load() {
    Ok(config) => ObjectMapBuilder::from_config(&config),
    Err(err) => {
        log::warn!("Failed to load object map configuration, using defaults: {err}");
        ObjectMapBuilder::default()
    }
});

/// Build the object map for `serializer` with the process-wide configuration
///
/// The metadata API and depth limit are resolved from [`ObjectMapConfig::load`]
/// on first use and reused afterwards.
pub fn get_object_map(serializer: &dyn SerializerType) -> Result<ObjectMap> {
    DEFAULT_BUILDER.build(serializer)
}

/// Like [`get_object_map`], sharing `ignored` with the caller
pub fn get_object_map_with_ignored(
    serializer: &dyn SerializerType,
    ignored: &mut IgnoredPairs,
) -> Result<ObjectMap> {
    DEFAULT_BUILDER.build_with_ignored(serializer, ignored)
}
