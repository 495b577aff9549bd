//! Relationship introspection strategies.
//!
//! The model layer's descriptor metadata changed shape between API versions.
//! Instead of branching on the version at every classification site, the
//! version is resolved once into a [`MetadataApi`] and the matching
//! [`RelationshipIntrospector`] is used for the whole build.

use super::descriptor::{FieldDescriptor, ForwardField, RelatedObject};
use super::kind::RelationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of introspecting one relationship attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship<'a> {
    /// Classified relationship kind
    pub kind: RelationKind,
    /// Name of the related model
    pub model: &'a str,
    /// Back-reference attribute name on the related model
    pub attname: &'a str,
}

impl Relationship<'_> {
    pub fn is_collection(&self) -> bool {
        self.kind.is_collection()
    }
}

/// Reads the related model and back-reference name out of a descriptor
///
/// Implementations differ only in the metadata path they read. When the path
/// is absent the offending path is returned as the error so the caller can
/// report it against the model and attribute.
pub trait RelationshipIntrospector: Send + Sync {
    /// The metadata API this introspector reads
    fn api(&self) -> MetadataApi;

    /// Name of the related model for `kind`
    fn related_model<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str>;

    /// Back-reference attribute name for `kind`
    fn back_reference<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str>;

    /// Introspect an already classified descriptor
    fn introspect<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<Relationship<'a>, &'static str> {
        Ok(Relationship {
            kind,
            model: self.related_model(kind, descriptor)?,
            attname: self.back_reference(kind, descriptor)?,
        })
    }
}

fn forward_field(descriptor: &FieldDescriptor) -> Result<&ForwardField, &'static str> {
    descriptor.field.as_ref().ok_or("field")
}

fn related_object(descriptor: &FieldDescriptor) -> Result<&RelatedObject, &'static str> {
    descriptor.related.as_ref().ok_or("related")
}

/// Back-reference shared by both APIs for reverse-side descriptors
fn related_field_name(kind: RelationKind, related: &RelatedObject) -> &str {
    match kind {
        RelationKind::ReverseForeignKey => &related.field.attname,
        _ => &related.field.name,
    }
}

/// Introspector for the metadata API before `field.rel` existed
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyIntrospector;

impl RelationshipIntrospector for LegacyIntrospector {
    fn api(&self) -> MetadataApi {
        MetadataApi::Legacy
    }

    fn related_model<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str> {
        if kind.reads_forward_field() {
            let related = forward_field(descriptor)?
                .related
                .as_ref()
                .ok_or("field.related")?;
            Ok(&related.parent_model)
        } else {
            related_object(descriptor)?
                .model
                .as_deref()
                .ok_or("related.model")
        }
    }

    fn back_reference<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str> {
        if kind.reads_forward_field() {
            let related = forward_field(descriptor)?
                .related
                .as_ref()
                .ok_or("field.related")?;
            Ok(&related.var_name)
        } else {
            Ok(related_field_name(kind, related_object(descriptor)?))
        }
    }
}

/// Introspector for the metadata API exposing `field.rel` and `related_model`
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernIntrospector;

impl RelationshipIntrospector for ModernIntrospector {
    fn api(&self) -> MetadataApi {
        MetadataApi::Modern
    }

    fn related_model<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str> {
        if kind.reads_forward_field() {
            let rel = forward_field(descriptor)?
                .rel
                .as_ref()
                .ok_or("field.rel")?;
            Ok(&rel.model)
        } else {
            related_object(descriptor)?
                .related_model
                .as_deref()
                .ok_or("related.related_model")
        }
    }

    fn back_reference<'a>(
        &self,
        kind: RelationKind,
        descriptor: &'a FieldDescriptor,
    ) -> Result<&'a str, &'static str> {
        if kind.reads_forward_field() {
            let rel = forward_field(descriptor)?
                .rel
                .as_ref()
                .ok_or("field.rel")?;
            Ok(&rel.name)
        } else {
            Ok(related_field_name(kind, related_object(descriptor)?))
        }
    }
}

static LEGACY: LegacyIntrospector = LegacyIntrospector;
static MODERN: ModernIntrospector = ModernIntrospector;

/// Version of the model layer's descriptor metadata API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataApi {
    /// `field.related.parent_model` / `related.model`
    Legacy,
    /// `field.rel.model` / `related.related_model`
    #[default]
    Modern,
}

impl MetadataApi {
    /// The introspector reading this API's metadata shape
    pub fn introspector(self) -> &'static dyn RelationshipIntrospector {
        match self {
            MetadataApi::Legacy => &LEGACY,
            MetadataApi::Modern => &MODERN,
        }
    }

    /// Select the API from a host framework `(major, minor)` version.
    ///
    /// The metadata changed shape in 1.8.
    pub fn for_version(major: u32, minor: u32) -> Self {
        if (major, minor) < (1, 8) {
            MetadataApi::Legacy
        } else {
            MetadataApi::Modern
        }
    }
}

impl fmt::Display for MetadataApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataApi::Legacy => f.write_str("legacy"),
            MetadataApi::Modern => f.write_str("modern"),
        }
    }
}

impl FromStr for MetadataApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(MetadataApi::Legacy),
            "modern" => Ok(MetadataApi::Modern),
            other => Err(format!("unknown metadata api: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::descriptor::RelatedField;

    fn both() -> [&'static dyn RelationshipIntrospector; 2] {
        [MetadataApi::Legacy.introspector(), MetadataApi::Modern.introspector()]
    }

    #[test]
    fn test_foreign_key_reads_join_role_name() {
        let descriptor = FieldDescriptor::foreign_key("user", "posts");
        for introspector in both() {
            let rel = introspector
                .introspect(RelationKind::ForeignKey, &descriptor)
                .unwrap();
            assert_eq!(rel.model, "user");
            assert_eq!(rel.attname, "posts");
            assert!(!rel.is_collection());
        }
    }

    #[test]
    fn test_reverse_foreign_key_reads_attname() {
        let descriptor = FieldDescriptor::reverse(
            RelationKind::ReverseForeignKey,
            RelatedObject::new("post", RelatedField::with_attname("author", "author_pk")),
        );
        for introspector in both() {
            let rel = introspector
                .introspect(RelationKind::ReverseForeignKey, &descriptor)
                .unwrap();
            assert_eq!(rel.model, "post");
            assert_eq!(rel.attname, "author_pk");
            assert!(rel.is_collection());
        }
    }

    #[test]
    fn test_one_to_one_and_many_to_many_read_field_name() {
        let o2o = FieldDescriptor::one_to_one("profile", "user");
        let m2m = FieldDescriptor::many_to_many("tag", "posts");
        for introspector in both() {
            let rel = introspector.introspect(RelationKind::OneToOne, &o2o).unwrap();
            assert_eq!((rel.model, rel.attname), ("profile", "user"));
            let rel = introspector.introspect(RelationKind::ManyToMany, &m2m).unwrap();
            assert_eq!((rel.model, rel.attname), ("tag", "posts"));
        }
    }

    #[test]
    fn test_reverse_many_to_many_reads_forward_field() {
        let descriptor = FieldDescriptor::reverse_many_to_many("post", "tags");
        for introspector in both() {
            let rel = introspector
                .introspect(RelationKind::ReverseManyToMany, &descriptor)
                .unwrap();
            assert_eq!((rel.model, rel.attname), ("post", "tags"));
        }
    }

    #[test]
    fn test_modern_rejects_legacy_only_metadata() {
        // EDGE CASE: descriptor only carries the legacy shape
        let descriptor =
            FieldDescriptor::forward(RelationKind::ForeignKey, ForwardField::legacy("user", "posts"));
        let err = ModernIntrospector
            .introspect(RelationKind::ForeignKey, &descriptor)
            .unwrap_err();
        assert_eq!(err, "field.rel");
        assert!(LegacyIntrospector
            .introspect(RelationKind::ForeignKey, &descriptor)
            .is_ok());
    }

    #[test]
    fn test_legacy_rejects_modern_only_metadata() {
        let descriptor = FieldDescriptor::reverse(
            RelationKind::ManyToMany,
            RelatedObject::modern("tag", RelatedField::new("posts")),
        );
        let err = LegacyIntrospector
            .introspect(RelationKind::ManyToMany, &descriptor)
            .unwrap_err();
        assert_eq!(err, "related.model");
    }

    #[test]
    fn test_missing_related_object() {
        let descriptor = FieldDescriptor::forward(
            RelationKind::OneToOne,
            ForwardField::new("profile", "user"),
        );
        let err = ModernIntrospector
            .introspect(RelationKind::OneToOne, &descriptor)
            .unwrap_err();
        assert_eq!(err, "related");
    }

    #[test]
    fn test_metadata_api_for_version() {
        assert_eq!(MetadataApi::for_version(1, 7), MetadataApi::Legacy);
        assert_eq!(MetadataApi::for_version(1, 8), MetadataApi::Modern);
        assert_eq!(MetadataApi::for_version(2, 0), MetadataApi::Modern);
        assert_eq!(MetadataApi::for_version(0, 9), MetadataApi::Legacy);
    }

    #[test]
    fn test_metadata_api_parse() {
        assert_eq!("Legacy".parse::<MetadataApi>(), Ok(MetadataApi::Legacy));
        assert_eq!("modern".parse::<MetadataApi>(), Ok(MetadataApi::Modern));
        assert!("v2".parse::<MetadataApi>().is_err());
        assert_eq!(MetadataApi::default(), MetadataApi::Modern);
    }

    #[test]
    fn test_introspector_reports_its_api() {
        assert_eq!(MetadataApi::Legacy.introspector().api(), MetadataApi::Legacy);
        assert_eq!(MetadataApi::Modern.introspector().api(), MetadataApi::Modern);
    }
}
