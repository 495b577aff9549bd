//! Relationship kind definitions.
//!
//! This module provides the `RelationKind` enum which represents the five
//! relationship kinds an object map understands, and the `DescriptorClass`
//! tag identifying the runtime type of a model attribute's descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of relationship between a model and a related model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Forward foreign key (many-to-one, the model owns the join column)
    ForeignKey,
    /// One-to-one relationship
    OneToOne,
    /// Reverse side of a foreign key (one-to-many)
    ReverseForeignKey,
    /// Many-to-many relationship
    ManyToMany,
    /// Reverse side of a many-to-many relationship
    ReverseManyToMany,
}

impl RelationKind {
    /// All kinds, in classification order
    pub const ALL: [RelationKind; 5] = [
        RelationKind::ForeignKey,
        RelationKind::OneToOne,
        RelationKind::ReverseForeignKey,
        RelationKind::ManyToMany,
        RelationKind::ReverseManyToMany,
    ];

    /// Whether the relationship yields multiple related instances
    pub fn is_collection(self) -> bool {
        match self {
            RelationKind::ForeignKey | RelationKind::OneToOne => false,
            RelationKind::ReverseForeignKey
            | RelationKind::ManyToMany
            | RelationKind::ReverseManyToMany => true,
        }
    }

    /// Whether `model`/`attname` are read from the descriptor's forward field
    /// (`field.*`) rather than its related object (`related.*`)
    pub fn reads_forward_field(self) -> bool {
        matches!(
            self,
            RelationKind::ForeignKey | RelationKind::ReverseManyToMany
        )
    }

    /// The descriptor class that classifies into this kind
    pub fn descriptor_class(self) -> DescriptorClass {
        match self {
            RelationKind::ForeignKey => DescriptorClass::ReverseSingleRelatedObject,
            RelationKind::OneToOne => DescriptorClass::SingleRelatedObject,
            RelationKind::ReverseForeignKey => DescriptorClass::ForeignRelatedObjects,
            RelationKind::ManyToMany => DescriptorClass::ManyRelatedObjects,
            RelationKind::ReverseManyToMany => DescriptorClass::ReverseManyRelatedObjects,
        }
    }
}

/// Runtime type of a model attribute's descriptor
///
/// The five relationship descriptor classes are recognized; anything else is
/// carried verbatim in `Other` so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DescriptorClass {
    ReverseSingleRelatedObject,
    SingleRelatedObject,
    ForeignRelatedObjects,
    ManyRelatedObjects,
    ReverseManyRelatedObjects,
    Other(String),
}

impl DescriptorClass {
    /// The runtime type name of the descriptor
    pub fn type_name(&self) -> &str {
        match self {
            DescriptorClass::ReverseSingleRelatedObject => "ReverseSingleRelatedObjectDescriptor",
            DescriptorClass::SingleRelatedObject => "SingleRelatedObjectDescriptor",
            DescriptorClass::ForeignRelatedObjects => "ForeignRelatedObjectsDescriptor",
            DescriptorClass::ManyRelatedObjects => "ManyRelatedObjectsDescriptor",
            DescriptorClass::ReverseManyRelatedObjects => "ReverseManyRelatedObjectsDescriptor",
            DescriptorClass::Other(name) => name,
        }
    }

    /// Classify this descriptor class into a relationship kind
    ///
    /// Returns `None` for `Other`, which callers turn into an
    /// unrecognized-descriptor error.
    pub fn kind(&self) -> Option<RelationKind> {
        match self {
            DescriptorClass::ReverseSingleRelatedObject => Some(RelationKind::ForeignKey),
            DescriptorClass::SingleRelatedObject => Some(RelationKind::OneToOne),
            DescriptorClass::ForeignRelatedObjects => Some(RelationKind::ReverseForeignKey),
            DescriptorClass::ManyRelatedObjects => Some(RelationKind::ManyToMany),
            DescriptorClass::ReverseManyRelatedObjects => Some(RelationKind::ReverseManyToMany),
            DescriptorClass::Other(_) => None,
        }
    }
}

impl From<String> for DescriptorClass {
    fn from(name: String) -> Self {
        RelationKind::ALL
            .iter()
            .map(|kind| kind.descriptor_class())
            .find(|class| class.type_name() == name)
            .unwrap_or(DescriptorClass::Other(name))
    }
}

impl From<&str> for DescriptorClass {
    fn from(name: &str) -> Self {
        DescriptorClass::from(name.to_string())
    }
}

impl From<DescriptorClass> for String {
    fn from(class: DescriptorClass) -> Self {
        match class {
            DescriptorClass::Other(name) => name,
            known => known.type_name().to_string(),
        }
    }
}

impl fmt::Display for DescriptorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_collection() {
        assert!(!RelationKind::ForeignKey.is_collection());
        assert!(!RelationKind::OneToOne.is_collection());
        assert!(RelationKind::ReverseForeignKey.is_collection());
        assert!(RelationKind::ManyToMany.is_collection());
        assert!(RelationKind::ReverseManyToMany.is_collection());
    }

    #[test]
    fn test_descriptor_class_classifies_every_kind() {
        for kind in RelationKind::ALL {
            assert_eq!(kind.descriptor_class().kind(), Some(kind));
        }
    }

    #[test]
    fn test_descriptor_class_from_type_name() {
        assert_eq!(
            DescriptorClass::from("ForeignRelatedObjectsDescriptor"),
            DescriptorClass::ForeignRelatedObjects
        );
        assert_eq!(
            DescriptorClass::from("DeferredAttribute"),
            DescriptorClass::Other("DeferredAttribute".to_string())
        );
    }

    #[test]
    fn test_other_descriptor_has_no_kind() {
        // EDGE CASE: a plain column attribute is not a relationship
        let class = DescriptorClass::Other("DeferredAttribute".to_string());
        assert_eq!(class.kind(), None);
        assert_eq!(class.type_name(), "DeferredAttribute");
    }

    #[test]
    fn test_descriptor_class_serde_uses_type_name() {
        let json = serde_json::to_string(&DescriptorClass::ManyRelatedObjects).unwrap();
        assert_eq!(json, "\"ManyRelatedObjectsDescriptor\"");
        let back: DescriptorClass = serde_json::from_str("\"property\"").unwrap();
        assert_eq!(back, DescriptorClass::Other("property".to_string()));
    }
}
