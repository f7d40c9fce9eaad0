//! Hypermedia representations
//!
//! Entities are wrapped in an [`EntityModel`] carrying `_links`, and lists in
//! a [`CollectionModel`] with the members under `_embedded`, in the HAL
//! layout:
//!
//! ```json
//! {
//!   "_embedded": { "adminList": [ { "id": 1, "...": "...", "_links": { "self": { "href": "/admins/1" } } } ] },
//!   "_links": { "self": { "href": "/admins" } }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::Admin;

pub const SELF_REL: &str = "self";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Links keyed by relation, in insertion order
pub type Links = IndexMap<String, Link>;

/// A single resource together with its links
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: Links::new(),
        }
    }

    pub fn with_link(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.links.insert(rel.into(), Link { href: href.into() });
        self
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links.get(SELF_REL).map(|link| link.href.as_str())
    }
}

/// A list of resources with links on the list itself
#[derive(Debug, Clone, Serialize)]
pub struct CollectionModel<T> {
    #[serde(rename = "_embedded", skip_serializing_if = "IndexMap::is_empty")]
    pub embedded: IndexMap<String, Vec<EntityModel<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> CollectionModel<T> {
    pub fn new(rel: impl Into<String>, content: Vec<EntityModel<T>>) -> Self {
        let mut embedded = IndexMap::new();
        if !content.is_empty() {
            embedded.insert(rel.into(), content);
        }
        Self {
            embedded,
            links: Links::new(),
        }
    }

    pub fn with_link(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.links.insert(rel.into(), Link { href: href.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.embedded.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns entities into their hypermedia representation
pub trait ModelAssembler {
    type Entity;

    /// Key the members are embedded under
    fn collection_rel(&self) -> &'static str;

    fn collection_href(&self) -> String;

    fn to_model(&self, entity: Self::Entity) -> EntityModel<Self::Entity>;

    fn to_collection_model(&self, entities: Vec<Self::Entity>) -> CollectionModel<Self::Entity> {
        let models = entities.into_iter().map(|e| self.to_model(e)).collect();
        CollectionModel::new(self.collection_rel(), models)
            .with_link(SELF_REL, self.collection_href())
    }
}

/// Links admins to themselves and to the admin collection
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminModelAssembler;

impl ModelAssembler for AdminModelAssembler {
    type Entity = Admin;

    fn collection_rel(&self) -> &'static str {
        "adminList"
    }

    fn collection_href(&self) -> String {
        "/admins".to_string()
    }

    fn to_model(&self, admin: Admin) -> EntityModel<Admin> {
        let href = format!("/admins/{}", admin.id);
        EntityModel::new(admin)
            .with_link(SELF_REL, href)
            .with_link("admins", self.collection_href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminRole;

    fn admin(id: i64) -> Admin {
        Admin {
            id,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: format!("john{}@example.com", id),
            password: "hash".to_string(),
            date_of_birth: None,
            phone_number: None,
            address: None,
            role: AdminRole::Admin,
        }
    }

    #[test]
    fn test_entity_model_links() {
        let model = AdminModelAssembler.to_model(admin(1));
        assert_eq!(model.self_href(), Some("/admins/1"));

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["firstName"], "John");
        assert!(value.get("password").is_none());
        assert_eq!(value["_links"]["self"]["href"], "/admins/1");
        assert_eq!(value["_links"]["admins"]["href"], "/admins");
    }

    #[test]
    fn test_collection_model() {
        let collection = AdminModelAssembler.to_collection_model(vec![admin(1), admin(2)]);
        assert_eq!(collection.len(), 2);

        let value = serde_json::to_value(&collection).unwrap();
        let members = value["_embedded"]["adminList"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1]["_links"]["self"]["href"], "/admins/2");
        assert_eq!(value["_links"]["self"]["href"], "/admins");
    }

    #[test]
    fn test_empty_collection_has_no_embedded() {
        let collection = AdminModelAssembler.to_collection_model(Vec::new());
        assert!(collection.is_empty());

        let value = serde_json::to_value(&collection).unwrap();
        assert!(value.get("_embedded").is_none());
        assert_eq!(value["_links"]["self"]["href"], "/admins");
    }
}
