//! # objectmap
//!
//! Derives the relationship graph ("object map") of a serializer and all
//! serializers reachable from it, for driving nested serialization of model
//! object graphs.
//!
//! ```
//! use objectmap::{
//!     FieldDescriptor, ModelMeta, ObjectMapBuilder, RelatedSerializer, SerializerInstance,
//!     SerializerType,
//! };
//!
//! struct AuthorSerializer;
//! struct BookSerializer;
//!
//! impl SerializerType for AuthorSerializer {
//!     fn serializer_name(&self) -> &str { "AuthorSerializer" }
//!     fn instantiate(&self) -> SerializerInstance {
//!         SerializerInstance::new(
//!             ModelMeta::new("Author")
//!                 .with_attribute("books", FieldDescriptor::reverse_foreign_key("book", "author"))
//!                 .into_ref(),
//!         )
//!     }
//!     fn related_serializers(&self) -> Vec<RelatedSerializer> {
//!         vec![RelatedSerializer::new(BookSerializer, "books")]
//!     }
//! }
//!
//! impl SerializerType for BookSerializer {
//!     fn serializer_name(&self) -> &str { "BookSerializer" }
//!     fn instantiate(&self) -> SerializerInstance {
//!         SerializerInstance::new(ModelMeta::new("Book").into_ref())
//!     }
//!     fn related_serializers(&self) -> Vec<RelatedSerializer> { Vec::new() }
//! }
//!
//! let map = ObjectMapBuilder::default().build(&AuthorSerializer).unwrap();
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.edges()[0].via, "author_id");
//! assert!(map.edges()[0].is_collection);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod object_map;
pub mod registry;
pub mod relation;
pub mod serializer;
#[cfg(feature = "tracing")]
pub mod tracing_helpers;

pub use config::ObjectMapConfig;
pub use error::{ObjectMapError, Result};
pub use model::{ModelIntrospect, ModelMeta, ModelRef};
pub use object_map::{
    get_object_map, get_object_map_with_ignored, IgnoredPairs, ObjectMap, ObjectMapBuilder,
    ObjectMapEdge, SerializerPair,
};
pub use registry::{RelatedDecl, SchemaDocument, SchemaRegistry, SerializerDecl};
pub use relation::{
    DescriptorClass, FieldDescriptor, MetadataApi, RelationKind, RelationshipIntrospector,
};
pub use serializer::{RelatedSerializer, SerializerInstance, SerializerRef, SerializerType};
