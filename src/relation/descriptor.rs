//! Field descriptor metadata.
//!
//! A `FieldDescriptor` is what the model layer exposes for one named
//! attribute: the descriptor's runtime class plus the nested metadata that
//! points at the related model. Two metadata shapes exist side by side:
//!
//! - modern: `field.rel.{model,name}` and `related.related_model`
//! - legacy: `field.related.{parent_model,var_name}` and `related.model`
//!
//! A descriptor may carry either shape or both. The active
//! [`RelationshipIntrospector`](super::introspect::RelationshipIntrospector)
//! decides which one is read.

use super::kind::{DescriptorClass, RelationKind};
use serde::{Deserialize, Serialize};

/// Descriptor exposed by a model for one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Runtime class of the descriptor
    #[serde(rename = "type")]
    pub class: DescriptorClass,
    /// Forward field (present on foreign key and reverse many-to-many descriptors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<ForwardField>,
    /// Related object (present on one-to-one, reverse foreign key and many-to-many descriptors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedObject>,
}

/// The field a forward descriptor wraps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForwardField {
    /// Modern remote relation metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<RemoteRel>,
    /// Legacy related-object metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<LegacyRelation>,
}

/// Modern `field.rel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRel {
    /// Referenced model name
    pub model: String,
    /// Join-role name on the referenced model
    pub name: String,
}

/// Legacy `field.related`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRelation {
    /// Referenced model name
    pub parent_model: String,
    /// Join-role name on the referenced model
    pub var_name: String,
}

/// The related object a reverse-side descriptor wraps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedObject {
    /// Modern related model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_model: Option<String>,
    /// Legacy related model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Field on the related model pointing back
    pub field: RelatedField,
}

/// Field on the related model that points back at the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedField {
    /// Field name (e.g. `author`)
    pub name: String,
    /// Attribute name of the stored column (e.g. `author_id`)
    pub attname: String,
}

impl RelatedField {
    /// Field whose attribute name is `<name>_id`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let attname = format!("{name}_id");
        Self { name, attname }
    }

    pub fn with_attname(name: impl Into<String>, attname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attname: attname.into(),
        }
    }
}

impl ForwardField {
    /// Forward field carrying both metadata shapes
    pub fn new(model: impl Into<String>, join_name: impl Into<String>) -> Self {
        let model = model.into();
        let join_name = join_name.into();
        Self {
            rel: Some(RemoteRel {
                model: model.clone(),
                name: join_name.clone(),
            }),
            related: Some(LegacyRelation {
                parent_model: model,
                var_name: join_name,
            }),
        }
    }

    /// Forward field carrying only the modern shape
    pub fn modern(model: impl Into<String>, join_name: impl Into<String>) -> Self {
        Self {
            rel: Some(RemoteRel {
                model: model.into(),
                name: join_name.into(),
            }),
            related: None,
        }
    }

    /// Forward field carrying only the legacy shape
    pub fn legacy(model: impl Into<String>, join_name: impl Into<String>) -> Self {
        Self {
            rel: None,
            related: Some(LegacyRelation {
                parent_model: model.into(),
                var_name: join_name.into(),
            }),
        }
    }
}

impl RelatedObject {
    /// Related object carrying both metadata shapes
    pub fn new(model: impl Into<String>, field: RelatedField) -> Self {
        let model = model.into();
        Self {
            related_model: Some(model.clone()),
            model: Some(model),
            field,
        }
    }

    pub fn modern(model: impl Into<String>, field: RelatedField) -> Self {
        Self {
            related_model: Some(model.into()),
            model: None,
            field,
        }
    }

    pub fn legacy(model: impl Into<String>, field: RelatedField) -> Self {
        Self {
            related_model: None,
            model: Some(model.into()),
            field,
        }
    }
}

impl FieldDescriptor {
    /// Descriptor wrapping a forward field
    pub fn forward(kind: RelationKind, field: ForwardField) -> Self {
        Self {
            class: kind.descriptor_class(),
            field: Some(field),
            related: None,
        }
    }

    /// Descriptor wrapping a related object
    pub fn reverse(kind: RelationKind, related: RelatedObject) -> Self {
        Self {
            class: kind.descriptor_class(),
            field: None,
            related: Some(related),
        }
    }

    /// Forward foreign key to `model`, back-referenced as `join_name`
    pub fn foreign_key(model: impl Into<String>, join_name: impl Into<String>) -> Self {
        Self::forward(RelationKind::ForeignKey, ForwardField::new(model, join_name))
    }

    /// One-to-one with `model`, whose field `field_name` points back
    pub fn one_to_one(model: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::reverse(
            RelationKind::OneToOne,
            RelatedObject::new(model, RelatedField::new(field_name)),
        )
    }

    /// Reverse side of the foreign key `field_name` on `model`
    pub fn reverse_foreign_key(model: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::reverse(
            RelationKind::ReverseForeignKey,
            RelatedObject::new(model, RelatedField::new(field_name)),
        )
    }

    /// Many-to-many with `model`, whose field `field_name` points back
    pub fn many_to_many(model: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::reverse(
            RelationKind::ManyToMany,
            RelatedObject::new(model, RelatedField::new(field_name)),
        )
    }

    /// Reverse many-to-many to `model`, back-referenced as `join_name`
    pub fn reverse_many_to_many(model: impl Into<String>, join_name: impl Into<String>) -> Self {
        Self::forward(
            RelationKind::ReverseManyToMany,
            ForwardField::new(model, join_name),
        )
    }

    /// Descriptor of a non-relationship attribute
    pub fn other(type_name: impl Into<String>) -> Self {
        Self {
            class: DescriptorClass::from(type_name.into()),
            field: None,
            related: None,
        }
    }

    /// Classify this descriptor, `None` when it is not a relationship
    pub fn kind(&self) -> Option<RelationKind> {
        self.class.kind()
    }

    /// Every related model name the descriptor carries, in either shape
    pub fn target_models(&self) -> Vec<&str> {
        let mut targets = Vec::new();
        if let Some(field) = &self.field {
            if let Some(rel) = &field.rel {
                targets.push(rel.model.as_str());
            }
            if let Some(related) = &field.related {
                targets.push(related.parent_model.as_str());
            }
        }
        if let Some(related) = &self.related {
            targets.extend(related.related_model.as_deref());
            targets.extend(related.model.as_deref());
        }
        targets
    }
}
