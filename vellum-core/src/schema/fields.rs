//! Définitions de champs
//!
//! Un schéma de collection est une séquence ordonnée de [`FieldDefinition`].
//! Le variant [`FieldKind`] indique au pipeline de population si une valeur
//! référence d'autres documents (relationship, upload), contient des données
//! imbriquées (block, array, group) ou reste un simple scalaire.

use crate::query::Where;
use crate::schema::blocks::{BlockDefinition, BlockSet};
use serde::{Deserialize, Serialize};

/// Cible(s) d'une relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationTo {
    /// Une seule collection: la valeur stockée est l'id nu
    Single(String),
    /// Relation polymorphe: la valeur stockée est `{ relationTo, value }`
    Polymorphic(Vec<String>),
}

impl RelationTo {
    /// Toutes les collections ciblées
    pub fn targets(&self) -> Vec<&str> {
        match self {
            RelationTo::Single(slug) => vec![slug.as_str()],
            RelationTo::Polymorphic(slugs) => slugs.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self, RelationTo::Polymorphic(_))
    }

    /// Vérifie qu'une collection fait partie des cibles autorisées
    pub fn allows(&self, slug: &str) -> bool {
        self.targets().contains(&slug)
    }
}

/// Type de champ (discriminant `type` dans la config JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    /// Valeur terminale, jamais peuplée
    #[serde(
        alias = "text",
        alias = "textarea",
        alias = "email",
        alias = "code",
        alias = "number",
        alias = "checkbox",
        alias = "date",
        alias = "select",
        alias = "radio",
        alias = "point",
        alias = "json",
        alias = "richText"
    )]
    Scalar,
    /// Référence vers un ou plusieurs documents d'autres collections
    Relationship {
        #[serde(rename = "relationTo")]
        relation_to: RelationTo,
        #[serde(default, rename = "hasMany")]
        has_many: bool,
        #[serde(default, rename = "maxDepth", skip_serializing_if = "Option::is_none")]
        max_depth: Option<u32>,
    },
    /// Référence vers un document d'une collection d'upload
    Upload {
        #[serde(rename = "relationTo")]
        relation_to: String,
        #[serde(default, rename = "maxDepth", skip_serializing_if = "Option::is_none")]
        max_depth: Option<u32>,
    },
    /// Contenu polymorphe sélectionné par `blockType`
    #[serde(alias = "blocks")]
    Block { blocks: BlockSet },
    /// Liste de lignes partageant le même sous-schéma
    Array { fields: Vec<FieldDefinition> },
    /// Objet imbriqué unique
    Group { fields: Vec<FieldDefinition> },
}

impl FieldKind {
    /// Type name as written in schema files
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Relationship { .. } => "relationship",
            FieldKind::Upload { .. } => "upload",
            FieldKind::Block { .. } => "block",
            FieldKind::Array { .. } => "array",
            FieldKind::Group { .. } => "group",
        }
    }

    /// Per-field population cap, if any
    pub fn max_depth(&self) -> Option<u32> {
        match self {
            FieldKind::Relationship { max_depth, .. } | FieldKind::Upload { max_depth, .. } => {
                *max_depth
            }
            _ => None,
        }
    }
}

/// Définition complète d'un champ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Retiré des documents lus, sauf si la requête demande les champs cachés
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Valeur stockée par locale (`{ "en": .., "fr": .. }`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub localized: bool,
    /// Rôles autorisés à lire ce champ (vide = public)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_roles: Vec<String>,
    /// Condition évaluée sur le document parent; si elle échoue le champ n'est pas peuplé
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Where>,
}

impl FieldDefinition {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            hidden: false,
            localized: false,
            read_roles: Vec::new(),
            visible_when: None,
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    pub fn relationship(name: impl Into<String>, relation_to: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Relationship {
                relation_to: RelationTo::Single(relation_to.into()),
                has_many: false,
                max_depth: None,
            },
        )
    }

    pub fn polymorphic<I, S>(name: impl Into<String>, relation_to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Relationship {
                relation_to: RelationTo::Polymorphic(
                    relation_to.into_iter().map(Into::into).collect(),
                ),
                has_many: false,
                max_depth: None,
            },
        )
    }

    pub fn upload(name: impl Into<String>, relation_to: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Upload { relation_to: relation_to.into(), max_depth: None })
    }

    pub fn blocks(name: impl Into<String>, blocks: Vec<BlockDefinition>) -> Self {
        Self::new(name, FieldKind::Block { blocks: BlockSet::new(blocks) })
    }

    pub fn array(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldKind::Array { fields })
    }

    pub fn group(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldKind::Group { fields })
    }

    /// Mark a relationship as holding a list of references
    pub fn has_many(mut self) -> Self {
        if let FieldKind::Relationship { has_many, .. } = &mut self.kind {
            *has_many = true;
        }
        self
    }

    /// Cap population depth for this field (relationship/upload only)
    pub fn max_depth(mut self, depth: u32) -> Self {
        match &mut self.kind {
            FieldKind::Relationship { max_depth, .. } | FieldKind::Upload { max_depth, .. } => {
                *max_depth = Some(depth);
            }
            _ => {}
        }
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    pub fn read_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn visible_when(mut self, condition: Where) -> Self {
        self.visible_when = Some(condition);
        self
    }

    /// Does this field's value (or any nested value) possibly reference other documents?
    pub fn may_reference(&self) -> bool {
        match &self.kind {
            FieldKind::Scalar => false,
            FieldKind::Relationship { .. } | FieldKind::Upload { .. } => true,
            FieldKind::Array { fields } | FieldKind::Group { fields } => {
                fields.iter().any(FieldDefinition::may_reference)
            }
            FieldKind::Block { blocks } => {
                blocks.iter().any(|b| b.fields.iter().any(FieldDefinition::may_reference))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_relationship() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "author",
            "type": "relationship",
            "relationTo": "users",
            "maxDepth": 1
        }))
        .unwrap();

        assert_eq!(field.name, "author");
        assert_eq!(
            field.kind,
            FieldKind::Relationship {
                relation_to: RelationTo::Single("users".to_string()),
                has_many: false,
                max_depth: Some(1),
            }
        );
        assert!(!field.hidden);
    }

    #[test]
    fn test_deserialize_polymorphic_has_many() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "selectedDocs",
            "type": "relationship",
            "relationTo": ["posts", "projects"],
            "hasMany": true
        }))
        .unwrap();

        match field.kind {
            FieldKind::Relationship { relation_to, has_many, .. } => {
                assert!(relation_to.is_polymorphic());
                assert!(relation_to.allows("projects"));
                assert!(has_many);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_scalar_aliases() {
        for ty in ["text", "number", "richText", "checkbox", "scalar"] {
            let field: FieldDefinition =
                serde_json::from_value(json!({ "name": "f", "type": ty })).unwrap();
            assert_eq!(field.kind, FieldKind::Scalar);
        }
    }

    #[test]
    fn test_deserialize_blocks_and_flags() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "layout",
            "type": "blocks",
            "readRoles": ["editor"],
            "blocks": [
                { "slug": "mediaBlock", "fields": [{ "name": "media", "type": "upload", "relationTo": "media" }] }
            ]
        }))
        .unwrap();

        let FieldKind::Block { blocks } = &field.kind else { panic!("expected block field") };
        assert!(blocks.find("mediaBlock").is_some());
        assert_eq!(field.read_roles, vec!["editor".to_string()]);
        assert!(field.may_reference());
    }

    #[test]
    fn test_builder_helpers() {
        let field = FieldDefinition::relationship("tags", "tags").has_many().max_depth(1).hidden();
        assert!(field.hidden);
        assert_eq!(field.kind.max_depth(), Some(1));
        assert!(matches!(field.kind, FieldKind::Relationship { has_many: true, .. }));

        let scalar = FieldDefinition::scalar("title").has_many().max_depth(3);
        assert_eq!(scalar.kind, FieldKind::Scalar);
        assert!(!FieldDefinition::group("meta", vec![scalar]).may_reference());
    }
}
