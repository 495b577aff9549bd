//! Relationship metadata for object maps
//!
//! Provides classification of model attribute descriptors into one of the
//! five relationship kinds:
//! - foreign_key: many-to-one, the model owns the join column
//! - one_to_one: single related instance on either side
//! - reverse_foreign_key: one-to-many
//! - many_to_many / reverse_many_to_many: collections on both sides

pub mod descriptor;
pub mod introspect;
pub mod kind;

pub use descriptor::{FieldDescriptor, ForwardField, LegacyRelation, RelatedField, RelatedObject, RemoteRel};
pub use introspect::{
    LegacyIntrospector, MetadataApi, ModernIntrospector, Relationship, RelationshipIntrospector,
};
pub use kind::{DescriptorClass, RelationKind};
